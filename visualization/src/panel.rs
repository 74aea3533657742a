//! Side panels: playback controls, display options and read-only info.

use crate::select::Select;
use common::mapping::MappingList;
use viz_lib::control::ControlAction;
use viz_lib::panel::{InfoView, LegendView, MetaView, SelectionView, StatsView};
use viz_lib::preferences::{PacketStyle, PrefChange, Preferences};
use web_sys::{File, HtmlInputElement};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct InfoProps {
    pub info: InfoView,
}

#[function_component]
pub fn InfoPanel(props: &InfoProps) -> Html {
    let info = &props.info;
    html! {
        <div class="info">
            <span>{ info.time.clone() }</span>{" "}
            <span>{ info.event.clone() }</span>{" "}
            <span>{ if info.playing { "▶" } else { "⏸" } }</span>
            if let Some(speed) = info.speed {
                <span>{ format!(" ×{speed}") }</span>
            }
        </div>
    }
}

fn row(label: &str, value: &str) -> Html {
    html! {
        <tr><th>{ label.to_string() }</th><td>{ value.to_string() }</td></tr>
    }
}

#[derive(Properties, PartialEq)]
pub struct MetaProps {
    pub meta: MetaView,
}

#[function_component]
pub fn MetaPanel(props: &MetaProps) -> Html {
    let m = &props.meta;
    html! {
        <table class="meta">
            { row("Description", &m.description) }
            { row("Field", &m.size) }
            { row("Nodes", &m.nodes) }
            { row("Density", &m.density) }
            { row("Radius", &m.radius) }
            { row("Max sim time", &m.simtime) }
            { row("Events", &m.events) }
        </table>
    }
}

#[derive(Properties, PartialEq)]
pub struct StatsProps {
    pub stats: StatsView,
}

#[function_component]
pub fn StatsPanel(props: &StatsProps) -> Html {
    let s = &props.stats;
    html! {
        <div class="stats">
            <table>
                { row("Avg degree", &s.avg_degree) }
                { row("Max degree", &s.max_degree) }
                { row("Components", &s.components) }
                { row("Packet rate", &s.packet_rate) }
            </table>
            <div class="histogram">
            {
                s.histogram.iter().map(|(label, count, share)| {
                    let style = format!("width:{:.0}%", share * 100.0);
                    html! {
                        <div class="bar" title={format!("degree {label}: {count}")}>
                            <span class="bar-label">{ label.clone() }</span>
                            <span class="bar-fill" {style}></span>
                        </div>
                    }
                }).collect::<Html>()
            }
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct SelectionProps {
    pub selection: SelectionView,
    pub on_clear: Callback<()>,
}

#[function_component]
pub fn SelectionPanel(props: &SelectionProps) -> Html {
    let s = &props.selection;
    let onclick = props.on_clear.reform(|_: MouseEvent| ());
    html! {
        <div class="selection">
            <table>
                { row("Id", &s.id) }
                { row("Type", &s.kind) }
                { row("Position", &s.position) }
                { row("Radius", &s.radius) }
                { row("Neighbours", &s.neighbor_count) }
                { row("Neighbour ids", &s.neighbors) }
            </table>
            <button {onclick}>{"Clear selection"}</button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct LegendProps {
    pub legend: LegendView,
}

#[function_component]
pub fn LegendPanel(props: &LegendProps) -> Html {
    match &props.legend {
        LegendView::Categorical { title, badges } => html! {
            <div class="legend">
                <strong>{ format!("{title}:") }</strong>{" "}
                {
                    badges.iter().map(|(label, color)| html! {
                        <span class="badge" style={format!("background:{color}; color:#fff")}>{ label.clone() }</span>
                    }).collect::<Html>()
                }
            </div>
        },
        LegendView::Gradient {
            title,
            from,
            to,
            colors,
        } => {
            let style = format!(
                "display:inline-block;width:160px;height:10px;border-radius:8px;\
                 background:linear-gradient(90deg, {}, {});vertical-align:middle",
                colors.0, colors.1
            );
            html! {
                <div class="legend">
                    <strong>{ format!("{title}:") }</strong>
                    <span class="from">{ from.clone() }</span>
                    <span {style}></span>
                    <span class="to">{ to.clone() }</span>
                </div>
            }
        }
        LegendView::Note { title, note } => html! {
            <div class="legend"><strong>{ format!("{title}:") }</strong>{" "}{ note.clone() }</div>
        },
        LegendView::Empty => html! { <div class="legend"></div> },
    }
}

#[derive(Properties, PartialEq)]
pub struct ControlProps {
    pub mappings: MappingList,
    pub on_action: Callback<ControlAction>,
    pub on_upload: Callback<File>,
}

/// Playback, speed, mapping, close and upload.
#[function_component]
pub fn SimControls(props: &ControlProps) -> Html {
    let speed_ref = use_node_ref();
    let file_ref = use_node_ref();

    let button = |label: &'static str, action: ControlAction| {
        let onclick = props.on_action.reform(move |_: MouseEvent| action.clone());
        html! { <button {onclick}>{ label }</button> }
    };

    let on_speed = {
        let speed_ref = speed_ref.clone();
        let on_action = props.on_action.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(input) = speed_ref.cast::<HtmlInputElement>() {
                on_action.emit(ControlAction::Speed(input.value()));
            }
        })
    };

    let on_mapping = props.on_action.reform(ControlAction::SetMapping);

    let on_submit = {
        let file_ref = file_ref.clone();
        let on_upload = props.on_upload.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let file = file_ref
                .cast::<HtmlInputElement>()
                .and_then(|input| input.files())
                .and_then(|files| files.get(0));
            match file {
                Some(file) => on_upload.emit(file),
                None => tracing::warn!("No scenario file chosen"),
            }
        })
    };

    html! {
        <div class="controls">
            <div class="playback">
                { button("⏮", ControlAction::Back) }
                { button("◀", ControlAction::StepBack) }
                { button("Play", ControlAction::Play) }
                { button("Pause", ControlAction::Pause) }
                { button("▶", ControlAction::StepForward) }
            </div>
            <div class="speed">
                <input ref={speed_ref} type="number" min="0" step="0.1" value="1" />
                <button onclick={on_speed}>{"Set speed"}</button>
            </div>
            <div class="mapping">
                <Select options={props.mappings.mappings.clone()} current={props.mappings.current.clone()} onchange={on_mapping} />
            </div>
            <form class="upload" onsubmit={on_submit}>
                <input ref={file_ref} type="file" name="file" />
                <button type="submit">{"Upload"}</button>
            </form>
            { button("Close simulation", ControlAction::Close) }
        </div>
    }
}

/// Viewport commands that are not preference changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewCommand {
    ZoomIn,
    ZoomOut,
    Fit,
    SavePng,
}

#[derive(Properties, PartialEq)]
pub struct ViewProps {
    pub prefs: Preferences,
    pub on_pref: Callback<PrefChange>,
    pub on_command: Callback<ViewCommand>,
}

fn checkbox(label: &'static str, checked: bool, on_pref: &Callback<PrefChange>, make: fn(bool) -> PrefChange) -> Html {
    let onchange = on_pref.reform(move |e: Event| {
        let checked = e
            .target_dyn_into::<HtmlInputElement>()
            .is_some_and(|input| input.checked());
        make(checked)
    });
    html! {
        <label><input type="checkbox" {checked} {onchange} />{ label }</label>
    }
}

/// Display options and viewport buttons.
#[function_component]
pub fn ViewControls(props: &ViewProps) -> Html {
    let p = &props.prefs;
    let command = |label: &'static str, cmd: ViewCommand| {
        let onclick = props.on_command.reform(move |_: MouseEvent| cmd);
        html! { <button {onclick}>{ label }</button> }
    };
    let pref_button = |label: &'static str, change: PrefChange, pressed: bool| {
        let onclick = props.on_pref.reform(move |_: MouseEvent| change);
        let class = classes!(pressed.then_some("active"));
        html! { <button {class} aria-pressed={pressed.to_string()} {onclick}>{ label }</button> }
    };

    html! {
        <div class="view-controls">
            <div class="zoom">
                { command("+", ViewCommand::ZoomIn) }
                { command("−", ViewCommand::ZoomOut) }
                { command("Fit", ViewCommand::Fit) }
                { command("Save PNG", ViewCommand::SavePng) }
            </div>
            <div class="toggles">
                { checkbox("Ids", p.show_ids, &props.on_pref, PrefChange::ShowIds) }
                { checkbox("Graph", p.show_graph, &props.on_pref, PrefChange::ShowGraph) }
                { checkbox("Sprites", p.show_sprites, &props.on_pref, PrefChange::ShowSprites) }
                { checkbox("Trails", p.show_trails, &props.on_pref, PrefChange::ShowTrails) }
            </div>
            <div class="node-size">
                <span>{ format!("Node size {}", p.node_size) }</span>
                { pref_button("−", PrefChange::ShrinkNodes, false) }
                { pref_button("+", PrefChange::GrowNodes, false) }
                { pref_button("Reset", PrefChange::ResetNodeSize, false) }
            </div>
            <div class="packet-style">
                { pref_button("Packet", PrefChange::PacketStyle(PacketStyle::Packet), p.packet_style == PacketStyle::Packet) }
                { pref_button("Wave", PrefChange::PacketStyle(PacketStyle::Wave), p.packet_style == PacketStyle::Wave) }
            </div>
        </div>
    }
}
