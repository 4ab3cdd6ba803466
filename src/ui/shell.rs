use dioxus::prelude::*;

use crate::app::Route;
use crate::util::version::{version_label, APP_NAME};

#[component]
pub fn Shell(children: Element) -> Element {
    let current_route = use_route::<Route>();
    let nav = use_navigator();

    rsx! {
        div {
            header { class: "shell-header",
                div { class: "brand",
                    h1 { "{APP_NAME}" }
                    span { class: "version-tag", "{version_label()}" }
                }
                nav { class: "nav",
                    NavButton {
                        active: matches!(current_route, Route::Quote {}),
                        onclick: move |_| { nav.push(Route::Quote {}); },
                        label: "Kalkyl",
                    }
                    NavButton {
                        active: matches!(current_route, Route::Settings {}),
                        onclick: move |_| { nav.push(Route::Settings {}); },
                        label: "Priser & inställningar",
                    }
                }
            }
            main { class: "content",
                {children}
            }
        }
    }
}

#[component]
fn NavButton(active: bool, onclick: EventHandler<()>, label: &'static str) -> Element {
    let class = if active { "nav-btn active" } else { "nav-btn" };
    rsx! {
        button {
            class: "{class}",
            onclick: move |_| onclick.call(()),
            "{label}"
        }
    }
}
