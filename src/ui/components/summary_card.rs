use dioxus::prelude::*;

#[component]
pub fn SummaryCard(title: String, value: String, hint: Option<String>) -> Element {
    rsx! {
        div { class: "kpi-card",
            h3 { "{title}" }
            p { class: "kpi-value", "{value}" }
            if let Some(hint) = hint {
                p { class: "kpi-hint", "{hint}" }
            }
        }
    }
}
