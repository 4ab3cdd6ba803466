#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

mod app;
mod domain;
mod infra;
mod ui;
mod util;

use dioxus::prelude::*;

#[cfg(feature = "desktop")]
use dioxus_desktop::{
    tao::{dpi::LogicalSize, window::WindowBuilder},
    Config as DesktopConfig,
};

use crate::util::version::APP_NAME;

fn main() {
    // On Wayland the default WGPU backend and WebKit's DMABUF renderer both
    // hit explicit-sync bugs on some driver stacks. Steer around both unless
    // the environment already says otherwise.
    if std::env::var("WAYLAND_DISPLAY").is_ok() {
        if std::env::var("WGPU_BACKEND").is_err() {
            std::env::set_var("WGPU_BACKEND", "gl");
        }
        if std::env::var("WEBKIT_DISABLE_DMABUF_RENDERER").is_err() {
            std::env::set_var("WEBKIT_DISABLE_DMABUF_RENDERER", "1");
        }
    }

    let builder = LaunchBuilder::new();

    #[cfg(feature = "desktop")]
    let builder = {
        // Wide enough for the quote form's three-column sections; the
        // minimum keeps the line table usable on small screens.
        let config = desktop! {
            DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title(APP_NAME)
                    .with_inner_size(LogicalSize::new(1120.0, 820.0))
                    .with_min_inner_size(LogicalSize::new(760.0, 560.0)),
            )
        };
        builder.with_cfg(config)
    };

    #[cfg(not(feature = "desktop"))]
    let builder = builder;

    builder.launch(app::App);
}
