use common::mapping::MappingList;
use common::snapshot::Snapshot;
use gloo_events::EventListener;
use std::cell::RefCell;
use std::rc::Rc;
use tracing_subscriber::fmt::format::Pretty;
use tracing_subscriber::prelude::*;
use tracing_web::{performance_layer, MakeWebConsoleWriter};
use viz_lib::control::ControlAction;
use viz_lib::panel::PanelView;
use viz_lib::preferences::{PrefChange, Preferences};
use web_sys::{File, HtmlCanvasElement};
use yew::prelude::*;

mod canvas;
mod frame;
mod http;
mod panel;
mod select;
mod session;
mod storage;

use crate::panel::{
    InfoPanel, LegendPanel, MetaPanel, SelectionPanel, SimControls, StatsPanel, ViewCommand,
    ViewControls,
};
use crate::session::{Outputs, Session};

type SessionSlot = Rc<RefCell<Option<Rc<Session>>>>;

/// Callback that forwards to the mounted session, if there is one yet.
fn on_session<T: 'static>(slot: &SessionSlot, f: impl Fn(&Rc<Session>, T) + 'static) -> Callback<T> {
    let slot = slot.clone();
    Callback::from(move |value: T| {
        let session = slot.borrow().clone();
        match session {
            Some(session) => f(&session, value),
            None => tracing::debug!("Viewer not mounted yet, ignoring input"),
        }
    })
}

/// Keeps the session's listeners alive; dropping it stops the poll loop.
struct Mounted {
    session: Rc<Session>,
    _listeners: Vec<EventListener>,
}

impl Drop for Mounted {
    fn drop(&mut self) {
        self.session.stop();
    }
}

fn mount(canvas: HtmlCanvasElement, outputs: Outputs, slot: &SessionSlot) -> Option<Mounted> {
    let session = match Session::new(canvas, outputs) {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(?e, "Failed to set up the canvas");
            return None;
        }
    };
    *slot.borrow_mut() = Some(session.clone());
    let listeners = session.listen();
    wasm_bindgen_futures::spawn_local(session.clone().load_mappings());
    wasm_bindgen_futures::spawn_local(session.clone().poll());
    tracing::info!("Viewer mounted");
    Some(Mounted {
        session,
        _listeners: listeners,
    })
}

#[function_component(App)]
fn app() -> Html {
    let canvas_ref = use_node_ref();
    let slot: SessionSlot = use_mut_ref(|| None);
    let panel = use_state_eq(|| PanelView::new(&Snapshot::default(), None));
    let prefs = use_state_eq(Preferences::default);
    let mappings = use_state_eq(MappingList::default);

    {
        let canvas_ref = canvas_ref.clone();
        let slot = slot.clone();
        let outputs = Outputs {
            panel: {
                let panel = panel.setter();
                Callback::from(move |view| panel.set(view))
            },
            prefs: {
                let prefs = prefs.setter();
                Callback::from(move |p| prefs.set(p))
            },
            mappings: {
                let mappings = mappings.setter();
                Callback::from(move |list| mappings.set(list))
            },
        };
        use_effect_with((), move |_| {
            let mounted = canvas_ref
                .cast::<HtmlCanvasElement>()
                .and_then(|canvas| mount(canvas, outputs, &slot));
            move || {
                slot.borrow_mut().take();
                drop(mounted);
            }
        });
    }

    let on_action = on_session(&slot, |s, action: ControlAction| {
        wasm_bindgen_futures::spawn_local(s.clone().control(action));
    });
    let on_upload = on_session(&slot, |s, file: File| {
        wasm_bindgen_futures::spawn_local(s.clone().upload(file));
    });
    let on_pref = on_session(&slot, |s, change: PrefChange| s.change_pref(change));
    let on_command = on_session(&slot, |s, cmd: ViewCommand| match cmd {
        ViewCommand::ZoomIn => s.zoom_in(),
        ViewCommand::ZoomOut => s.zoom_out(),
        ViewCommand::Fit => s.fit(),
        ViewCommand::SavePng => s.save_png(),
    });
    let on_clear = on_session(&slot, |s, ()| s.clear_selection());

    html! {
        <div class="viewer" style="display:flex; gap:1rem; height:100vh">
            <canvas ref={canvas_ref} style="flex:1; min-width:0; height:100%; background:#fafafa"></canvas>
            <aside style="width:22rem; overflow-y:auto">
                <InfoPanel info={panel.info.clone()} />
                <SimControls mappings={(*mappings).clone()} {on_action} {on_upload} />
                <ViewControls prefs={(*prefs).clone()} {on_pref} {on_command} />
                <LegendPanel legend={panel.legend.clone()} />
                <SelectionPanel selection={panel.selection.clone()} {on_clear} />
                <MetaPanel meta={panel.meta.clone()} />
                <StatsPanel stats={panel.stats.clone()} />
            </aside>
        </div>
    }
}

fn main() {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false) // Only partially supported across browsers
        .without_time() // std::time is not available in browsers
        .with_writer(MakeWebConsoleWriter::new());
    let perf_layer = performance_layer().with_details_from_fields(Pretty::default());

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(perf_layer)
        .init();
    yew::Renderer::<App>::new().render();
}
