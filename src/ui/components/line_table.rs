use dioxus::prelude::*;

use crate::domain::PLACEHOLDER;

/// One catalog row as rendered: raw quantity text plus the projected amount.
#[derive(Clone, Debug, PartialEq)]
pub struct LineRow {
    pub id: String,
    pub label: String,
    pub quantity: String,
    pub amount: String,
}

#[component]
pub fn LineItemTable(rows: Vec<LineRow>, on_change: EventHandler<(String, String)>) -> Element {
    rsx! {
        table { class: "line-table",
            thead {
                tr {
                    th { "Artikel" }
                    th { "Antal" }
                    th { class: "amount", "Belopp" }
                }
            }
            tbody {
                for row in rows {
                    LineRowView { row: row, on_change: on_change }
                }
            }
        }
    }
}

#[component]
fn LineRowView(row: LineRow, on_change: EventHandler<(String, String)>) -> Element {
    let field_id = row.id.clone();
    let amount_class = if row.amount == PLACEHOLDER {
        "amount placeholder"
    } else {
        "amount"
    };

    rsx! {
        tr {
            td { "{row.label}" }
            td {
                input {
                    class: "field-input qty-input",
                    r#type: "number",
                    min: "0",
                    value: row.quantity,
                    oninput: move |evt| on_change.call((field_id.clone(), evt.value())),
                }
            }
            td { class: amount_class, "{row.amount}" }
        }
    }
}
