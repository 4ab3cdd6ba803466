use dioxus::prelude::*;

use crate::{
    app::dispatch_field_change,
    domain::{
        compute, project,
        quote::{
            FIELD_COUNT, FIELD_DEPTH, FIELD_DISCOUNT, FIELD_HEIGHT, FIELD_SHAPE, FIELD_SHELVES,
            FIELD_WIDTH,
        },
        AppState, FieldValue, PriceOrigin, PriceStatus, ShapeType, VatPolicy, CATALOG, PLACEHOLDER,
    },
    ui::components::{
        line_table::{LineItemTable, LineRow},
        summary_card::SummaryCard,
    },
};

const SIDE_LABELS: &[(&str, &str)] = &[
    ("spec_utv", "Utvändigt"),
    ("spec_bak", "Baksida"),
    ("spec_under", "Undersida"),
    ("spec_inv", "Invändigt"),
];

#[component]
pub fn QuotePage() -> Element {
    let state = use_context::<Signal<AppState>>();

    // One immutable snapshot per render; the whole page is a projection of
    // the pure compute cycle over it.
    let fields = state.with(|st| st.fields.clone());
    let prices = state.with(|st| st.effective_prices());
    let config = state.with(|st| st.config.clone());
    let status = state.with(|st| st.price_status);

    let result = compute(&fields, &prices, &config);
    let slots = project(&result);
    let slot = |id: &str| {
        slots
            .get(id)
            .cloned()
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    };

    let rows: Vec<LineRow> = CATALOG
        .iter()
        .map(|(id, label)| LineRow {
            id: (*id).to_string(),
            label: (*label).to_string(),
            quantity: fields.text(id).to_string(),
            amount: slot(&format!("line_{id}")),
        })
        .collect();

    let shape = ShapeType::from_field(fields.text(FIELD_SHAPE));
    let side_checks: Vec<(&'static str, &'static str, bool)> = SIDE_LABELS
        .iter()
        .map(|(flag, label)| (*flag, *label, fields.read_flag(flag)))
        .collect();

    // (field, label, current input text, projected amount)
    let extra_rows: Vec<(String, String, String, String)> = config
        .extras
        .iter()
        .map(|extra| {
            (
                extra.field.clone(),
                extra.label.clone(),
                fields.text(&extra.field).to_string(),
                slot(&format!("res_{}", extra.field)),
            )
        })
        .collect();

    let belopp_text = slot("belopp");
    let spec_m2 = slot("spec_m2");
    let spec_sum = slot("spec_sum");
    let spec_m2_class = if spec_m2 == PLACEHOLDER { "placeholder" } else { "" };
    let spec_sum_class = if spec_sum == PLACEHOLDER { "placeholder" } else { "" };
    let discount_text = slot("res_rabatt");
    let summa_text = slot("summa");
    let rot_text = slot("exkl_rot");
    let moms_text = slot("inkl_moms");

    rsx! {
        if let Some(notice) = price_status_line(status) {
            p { class: "hint", "{notice}" }
        }

        section { class: "panel",
            h2 { class: "panel-title", "Material" }
            LineItemTable {
                rows: rows,
                on_change: move |(id, value): (String, String)| {
                    dispatch_field_change(state, &id, FieldValue::text(value));
                },
            }
            ul { class: "result-list",
                li { class: "result-row",
                    span { class: "label", "Summa material + special" }
                    span { "{belopp_text}" }
                }
            }
        }

        section { class: "panel",
            h2 { class: "panel-title", "Specialmått" }
            div { class: "form-grid",
                div {
                    label { class: "field-label", "Typ" }
                    select {
                        class: "field-input",
                        value: shape.field_value(),
                        onchange: move |evt| {
                            dispatch_field_change(state, FIELD_SHAPE, FieldValue::text(evt.value()));
                        },
                        option { value: "skiva", "Skiva" }
                        option { value: "mobel", "Möbel" }
                    }
                }
                NumberField {
                    id: FIELD_COUNT.to_string(),
                    label: "Antal".to_string(),
                    value: fields.text(FIELD_COUNT).to_string(),
                }
                NumberField {
                    id: FIELD_WIDTH.to_string(),
                    label: "Bredd (mm)".to_string(),
                    value: fields.text(FIELD_WIDTH).to_string(),
                }
                NumberField {
                    id: FIELD_DEPTH.to_string(),
                    label: "Djup (mm)".to_string(),
                    value: fields.text(FIELD_DEPTH).to_string(),
                }
                NumberField {
                    id: FIELD_HEIGHT.to_string(),
                    label: "Höjd (mm)".to_string(),
                    value: fields.text(FIELD_HEIGHT).to_string(),
                }
                NumberField {
                    id: FIELD_SHELVES.to_string(),
                    label: "Hyllplan".to_string(),
                    value: fields.text(FIELD_SHELVES).to_string(),
                }
            }
            div { class: "check-group",
                for (flag, label, checked) in side_checks {
                    label { class: "check",
                        input {
                            r#type: "checkbox",
                            checked: checked,
                            onchange: move |evt| {
                                dispatch_field_change(state, flag, FieldValue::flag(evt.checked()));
                            },
                        }
                        "{label}"
                    }
                }
            }
            ul { class: "result-list",
                li { class: "result-row",
                    span { class: "label", "Yta (m²)" }
                    span { class: spec_m2_class, "{spec_m2}" }
                }
                li { class: "result-row",
                    span { class: "label", "Summa special" }
                    span { class: spec_sum_class, "{spec_sum}" }
                }
            }
        }

        section { class: "panel",
            h2 { class: "panel-title", "Tillägg" }
            div { class: "form-grid",
                for (field, label, value, _) in extra_rows.clone() {
                    NumberField { id: field, label: label, value: value }
                }
            }
            ul { class: "result-list",
                for (_, label, _, amount) in extra_rows {
                    li { class: "result-row",
                        span { class: "label", "{label}" }
                        span { "{amount}" }
                    }
                }
            }
        }

        section { class: "panel",
            h2 { class: "panel-title", "Rabatt & moms" }
            div { class: "form-grid",
                NumberField {
                    id: FIELD_DISCOUNT.to_string(),
                    label: "Rabatt (%)".to_string(),
                    value: fields.text(FIELD_DISCOUNT).to_string(),
                }
                match config.vat.clone() {
                    VatPolicy::PercentField { field } => rsx! {
                        NumberField {
                            id: field.clone(),
                            label: "Moms (%)".to_string(),
                            value: fields.text(&field).to_string(),
                        }
                    },
                    VatPolicy::Toggle { field, rate } => rsx! {
                        VatToggle {
                            field: field.clone(),
                            label: format!("Moms {:.0} %", rate * 100.0),
                            checked: fields.read_flag(&field),
                        }
                    },
                }
            }
            ul { class: "result-list",
                li { class: "result-row",
                    span { class: "label", "Rabatt" }
                    span { "{discount_text}" }
                }
            }
        }

        section { class: "panel",
            h2 { class: "panel-title", "Summering" }
            div { class: "kpi-grid",
                SummaryCard {
                    title: "Summa".to_string(),
                    value: summa_text,
                    hint: Some("Efter rabatt, exkl. moms".to_string()),
                }
                SummaryCard {
                    title: "Efter ROT-avdrag".to_string(),
                    value: rot_text,
                    hint: Some("70 % av summan".to_string()),
                }
                SummaryCard {
                    title: "Inkl. moms".to_string(),
                    value: moms_text,
                    hint: None,
                }
            }
        }
    }
}

/// A labeled numeric input wired to the single field-change dispatcher.
#[component]
fn NumberField(id: String, label: String, value: String) -> Element {
    let state = use_context::<Signal<AppState>>();
    let field_id = id.clone();

    rsx! {
        div {
            label { class: "field-label", "{label}" }
            input {
                class: "field-input",
                r#type: "number",
                value: value,
                oninput: move |evt| {
                    dispatch_field_change(state, &field_id, FieldValue::text(evt.value()));
                },
            }
        }
    }
}

#[component]
fn VatToggle(field: String, label: String, checked: bool) -> Element {
    let state = use_context::<Signal<AppState>>();
    let field_id = field.clone();

    rsx! {
        div {
            label { class: "field-label", "Moms" }
            label { class: "check",
                input {
                    r#type: "checkbox",
                    checked: checked,
                    onchange: move |evt| {
                        dispatch_field_change(state, &field_id, FieldValue::flag(evt.checked()));
                    },
                }
                "{label}"
            }
        }
    }
}

fn price_status_line(status: PriceStatus) -> Option<String> {
    match status {
        PriceStatus::Pending => Some("Hämtar prislista...".to_string()),
        PriceStatus::Failed => {
            Some("Ingen prislista kunde läsas; alla priser räknas som 0.".to_string())
        }
        PriceStatus::Loaded {
            origin: PriceOrigin::Network,
            ..
        } => None,
        PriceStatus::Loaded { origin, .. } => Some(format!("Priser: {}", origin.label())),
    }
}
