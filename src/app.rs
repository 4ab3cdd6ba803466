use std::time::{Duration, SystemTime, UNIX_EPOCH};

use dioxus::{prelude::*, signals::Signal};

use crate::{
    domain::{AppState, FieldValue, PriceOrigin, PriceStatus},
    infra::{
        cache::{load_price_cache, save_price_cache, PriceCache},
        prices::{parse_price_json, PriceClient},
    },
    ui::{
        components::toast::{push_toast, Toast, ToastKind, ToastMessage},
        pages::{QuotePage, SettingsPage},
        shell::Shell,
    },
    util::{
        assets,
        persistence::{load_persisted_state, save_persisted_state},
    },
};

#[derive(Routable, Clone, PartialEq)]
pub enum Route {
    #[route("/")]
    Quote {},
    #[route("/installningar")]
    Settings {},
}

#[component]
fn Quote() -> Element {
    rsx! { Shell { QuotePage {} } }
}

#[component]
fn Settings() -> Element {
    rsx! { Shell { SettingsPage {} } }
}

#[component]
pub fn App() -> Element {
    let state = use_signal(AppState::default);
    use_hook({
        let mut state = state.clone();
        move || {
            if let Some(saved) = load_persisted_state() {
                state.with_mut(|st| st.apply_persisted(saved));
            }
        }
    });
    use_context_provider(|| state.clone());

    let toasts = use_signal(Vec::<ToastMessage>::new);
    use_context_provider(|| toasts.clone());

    // Bumped by the settings page to re-run the one-shot price load.
    let reload_prices = use_signal(|| 0u32);
    use_context_provider(|| reload_prices.clone());

    let _prices = use_resource({
        let state = state.clone();
        let toasts = toasts.clone();
        let reload_prices = reload_prices.clone();
        move || async move {
            let _generation = reload_prices();
            load_price_table(state.clone(), toasts.clone()).await;
        }
    });

    rsx! {
        document::Style { "{assets::main_css()}" }
        Router::<Route> {}
        Toast {}
    }
}

pub fn persist_user_state(state: &Signal<AppState>) {
    let snapshot = state.with(|st| st.to_persisted());
    if let Err(err) = save_persisted_state(&snapshot) {
        println!("Failed to persist user state: {err}");
    }
}

/// The single change-notification dispatcher: record the raw value, persist
/// the form, and let the next render recompute everything from the snapshot.
pub fn dispatch_field_change(state: Signal<AppState>, id: &str, value: FieldValue) {
    let mut state = state;
    state.with_mut(|st| st.set_field(id, value));
    persist_user_state(&state);
}

/// One-shot price load with offline degradation: network when a source URL
/// is configured, then the versioned disk cache, then the embedded default
/// table. A total failure leaves the empty table in place; the calculator
/// keeps producing zero-priced but structurally correct output.
async fn load_price_table(mut state: Signal<AppState>, toasts: Signal<Vec<ToastMessage>>) {
    let url = state.with(|st| st.price_url.clone());

    if let Some(url) = url {
        match PriceClient::new(&url) {
            Ok(client) => match client.fetch_price_table().await {
                Ok(table) if !table.is_empty() => {
                    if let Err(err) = save_price_cache(&PriceCache::new(&table)) {
                        println!("[prices] Failed to write price cache: {err}");
                    }
                    state.with_mut(|st| {
                        st.base_prices = table;
                        st.price_status = PriceStatus::Loaded {
                            origin: PriceOrigin::Network,
                            fetched_at: SystemTime::now(),
                        };
                    });
                    push_toast(toasts.clone(), ToastKind::Success, "Prislistan hämtades.");
                    return;
                }
                Ok(_) => println!("[prices] Price resource contained no usable entries"),
                Err(err) => println!("[prices] Fetch failed: {err}"),
            },
            Err(err) => println!("[prices] Bad price URL: {err}"),
        }
        push_toast(
            toasts.clone(),
            ToastKind::Warning,
            "Kunde inte hämta prislistan, använder senast kända priser.",
        );
    }

    if let Some(cache) = load_price_cache() {
        let fetched_at = UNIX_EPOCH + Duration::from_secs(cache.cached_at);
        state.with_mut(|st| {
            st.base_prices = cache.table();
            st.price_status = PriceStatus::Loaded {
                origin: PriceOrigin::DiskCache,
                fetched_at,
            };
        });
        return;
    }

    match parse_price_json(assets::default_prices_json()) {
        Ok(table) => {
            state.with_mut(|st| {
                st.base_prices = table;
                st.price_status = PriceStatus::Loaded {
                    origin: PriceOrigin::Embedded,
                    fetched_at: SystemTime::now(),
                };
            });
        }
        Err(err) => {
            println!("[prices] Embedded price table unusable: {err}");
            state.with_mut(|st| st.price_status = PriceStatus::Failed);
        }
    }
}
