use std::time::SystemTime;

use dioxus::prelude::*;

use crate::{
    app::persist_user_state,
    domain::{
        quote::SHELF_PRICE_KEY, AppState, EngineConfig, PriceStatus, ShapeType, SideSurcharge,
        VatPolicy, CATALOG,
    },
    infra::cache::prune_stale_caches,
    ui::components::toast::{push_toast, ToastKind, ToastMessage},
};

#[component]
pub fn SettingsPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let reload_prices = use_context::<Signal<u32>>();

    let mut url_input = use_signal(|| state.with(|st| st.price_url.clone().unwrap_or_default()));

    let config = state.with(|st| st.config.clone());
    let status = state.with(|st| st.price_status);
    let override_count = state.with(|st| st.price_overrides.len());

    let table_rate_active = matches!(config.side_surcharge, SideSurcharge::RateKey { .. });
    let percent_vat_active = matches!(config.vat, VatPolicy::PercentField { .. });

    // (key, label, current effective price as text, overridden?)
    let price_rows: Vec<(String, String, String, bool)> = {
        let prices = state.with(|st| st.effective_prices());
        let overrides = state.with(|st| st.price_overrides.clone());
        price_keys(&config)
            .into_iter()
            .map(|(key, label)| {
                let text = format_price(prices.lookup(&key));
                let overridden = overrides.contains_key(&key);
                (key, label, text, overridden)
            })
            .collect()
    };

    let on_apply_url = {
        let state = state.clone();
        let toasts = toasts.clone();
        move |_| {
            let mut state = state.clone();
            let url = url_input().trim().to_string();
            state.with_mut(|st| st.price_url = if url.is_empty() { None } else { Some(url) });
            persist_user_state(&state);
            push_toast(toasts.clone(), ToastKind::Success, "Priskälla sparad.");
        }
    };

    let on_fetch_now = {
        let toasts = toasts.clone();
        move |_| {
            let mut reload = reload_prices.clone();
            reload.set(reload() + 1);
            push_toast(toasts.clone(), ToastKind::Info, "Hämtar prislistan...");
        }
    };

    let on_clear_overrides = {
        let state = state.clone();
        let toasts = toasts.clone();
        move |_| {
            let mut state = state.clone();
            state.with_mut(|st| st.price_overrides.clear());
            persist_user_state(&state);
            push_toast(toasts.clone(), ToastKind::Info, "Lokala prisändringar borttagna.");
        }
    };

    let on_prune_caches = {
        let toasts = toasts.clone();
        move |_| {
            let removed = prune_stale_caches();
            push_toast(
                toasts.clone(),
                ToastKind::Info,
                format!("{removed} gamla priscacher rensades."),
            );
        }
    };

    rsx! {
        section { class: "panel",
            h2 { class: "panel-title", "Priskälla" }
            div {
                label { class: "field-label", "URL till prislista (JSON)" }
                input {
                    class: "field-input",
                    value: url_input(),
                    placeholder: "https://.../priser.json",
                    oninput: move |evt| url_input.set(evt.value()),
                }
            }
            p { class: "hint", "{price_status_text(status)}" }
            div { class: "btn-row",
                button { class: "btn", onclick: on_apply_url, "Spara källa" }
                button { class: "btn btn-ghost", onclick: on_fetch_now, "Hämta nu" }
                button { class: "btn btn-ghost", onclick: on_prune_caches, "Rensa gamla cacher" }
            }
        }

        section { class: "panel",
            h2 { class: "panel-title", "Beräkningsregler" }
            div {
                label { class: "field-label", "Påslag per vald sida" }
                div { class: "choice-row",
                    PolicyChoice {
                        active: table_rate_active,
                        label: "Procent från prislistan".to_string(),
                        onclick: move |_| {
                            set_side_policy(state, toasts, SideSurcharge::RateKey {
                                key: "p_paslag_side_pct".to_string(),
                            });
                        },
                    }
                    PolicyChoice {
                        active: !table_rate_active,
                        label: "100 % per sida".to_string(),
                        onclick: move |_| {
                            set_side_policy(state, toasts, SideSurcharge::PerSide { rate: 1.0 });
                        },
                    }
                }
            }
            div {
                label { class: "field-label", "Moms" }
                div { class: "choice-row",
                    PolicyChoice {
                        active: percent_vat_active,
                        label: "Procentfält".to_string(),
                        onclick: move |_| {
                            set_vat_policy(state, toasts, VatPolicy::PercentField {
                                field: "vat".to_string(),
                            });
                        },
                    }
                    PolicyChoice {
                        active: !percent_vat_active,
                        label: "Fast 25 % (kryssruta)".to_string(),
                        onclick: move |_| {
                            set_vat_policy(state, toasts, VatPolicy::Toggle {
                                field: "moms".to_string(),
                                rate: 0.25,
                            });
                        },
                    }
                }
            }
        }

        section { class: "panel",
            h2 { class: "panel-title", "Priser" }
            p { class: "hint",
                "Ändringar här gäller lokalt och skuggar den hämtade prislistan. "
                "Aktiva ändringar: {override_count}"
            }
            div { class: "price-grid",
                for (key, label, value, overridden) in price_rows {
                    PriceRowEditor { key_id: key, label: label, value: value, overridden: overridden }
                }
            }
            div { class: "btn-row",
                button { class: "btn btn-ghost", onclick: on_clear_overrides, "Återställ till prislistan" }
            }
        }
    }
}

#[component]
fn PolicyChoice(active: bool, label: String, onclick: EventHandler<()>) -> Element {
    let class = if active { "choice active" } else { "choice" };
    rsx! {
        button {
            class: "{class}",
            onclick: move |_| onclick.call(()),
            "{label}"
        }
    }
}

#[component]
fn PriceRowEditor(key_id: String, label: String, value: String, overridden: bool) -> Element {
    let state = use_context::<Signal<AppState>>();
    let key = key_id.clone();
    let label_text = if overridden {
        format!("{label} *")
    } else {
        label
    };

    rsx! {
        span { class: "label", "{label_text}" }
        input {
            class: "field-input",
            r#type: "number",
            value: value,
            onchange: move |evt| {
                let mut state = state.clone();
                let raw = evt.value();
                state.with_mut(|st| match raw.trim().parse::<f64>() {
                    Ok(price) if price.is_finite() => {
                        st.price_overrides.insert(key.clone(), price);
                    }
                    _ => {
                        st.price_overrides.remove(&key);
                    }
                });
                persist_user_state(&state);
            },
        }
    }
}

fn set_side_policy(
    state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
    policy: SideSurcharge,
) {
    let mut state = state;
    state.with_mut(|st| st.config.side_surcharge = policy);
    persist_user_state(&state);
    push_toast(toasts, ToastKind::Success, "Påslagsregel uppdaterad.");
}

fn set_vat_policy(state: Signal<AppState>, toasts: Signal<Vec<ToastMessage>>, policy: VatPolicy) {
    let mut state = state;
    state.with_mut(|st| st.config.vat = policy);
    persist_user_state(&state);
    push_toast(toasts, ToastKind::Success, "Momsregel uppdaterad.");
}

/// Every price key the form can consume, with a display label.
fn price_keys(config: &EngineConfig) -> Vec<(String, String)> {
    let mut keys: Vec<(String, String)> = CATALOG
        .iter()
        .map(|(id, label)| (format!("p_{id}"), (*label).to_string()))
        .collect();

    keys.push((
        ShapeType::Panel.area_price_key().to_string(),
        "Special: skiva per m²".to_string(),
    ));
    keys.push((
        ShapeType::Furniture.area_price_key().to_string(),
        "Special: möbel per m²".to_string(),
    ));
    keys.push((SHELF_PRICE_KEY.to_string(), "Hyllplan".to_string()));

    if let SideSurcharge::RateKey { key } = &config.side_surcharge {
        keys.push((key.clone(), "Påslag per sida (%)".to_string()));
    }

    for extra in &config.extras {
        keys.push((extra.price_key.clone(), extra.label.clone()));
    }

    keys
}

fn format_price(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

fn price_status_text(status: PriceStatus) -> String {
    match status {
        PriceStatus::Pending => "Hämtar prislista...".to_string(),
        PriceStatus::Failed => "Ingen prislista kunde läsas.".to_string(),
        PriceStatus::Loaded { origin, fetched_at } => {
            format!("{} ({})", origin.label(), humanize_age(fetched_at))
        }
    }
}

fn humanize_age(time: SystemTime) -> String {
    let secs = time.elapsed().map(|d| d.as_secs()).unwrap_or(0);
    if secs < 60 {
        "nyss".to_string()
    } else if secs < 3600 {
        format!("{} min sedan", secs / 60)
    } else if secs < 86400 {
        format!("{} h sedan", secs / 3600)
    } else {
        format!("{} d sedan", secs / 86400)
    }
}
