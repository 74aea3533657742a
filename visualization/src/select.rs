use common::mapping::MappingEntry;
use web_sys::{Event, HtmlSelectElement};
use yew::{function_component, html, use_node_ref, Callback, Html, Properties};

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub options: Vec<MappingEntry>,
    #[prop_or_default]
    pub current: Option<String>,
    pub onchange: Callback<String>,
}

/// Drop-down of the colour mappings the backend offers.
#[function_component]
pub fn Select(props: &Props) -> Html {
    let select_ref = use_node_ref();
    let onchange = {
        let select_ref = select_ref.clone();
        let on_change_cb = props.onchange.clone();
        Callback::from(move |_: Event| {
            if let Some(select) = select_ref.cast::<HtmlSelectElement>() {
                tracing::info!(mapping = select.value(), "Colour mapping chosen");
                on_change_cb.emit(select.value());
            }
        })
    };
    html! {
        <select ref={select_ref} onchange={onchange} disabled={props.options.is_empty()}>
        {
            props.options.iter().map(|entry| {
                let selected = props.current.as_deref() == Some(entry.key.as_str());
                html! {
                    <option value={entry.key.clone()} {selected}>{entry.label.clone()}</option>
                }
            }).collect::<Html>()
        }
        </select>
    }
}
