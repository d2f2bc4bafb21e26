//! Browser control panel for the SmartControl display hub.
//!
//! Serve with:
//!   cd crates/smartcontrol_panel
//!   trunk serve --open
//!
//! Append `?hub=ws://<host>:10000/SmartControlHub` to the page URL to talk to
//! a hub other than the local one.

mod app;
mod form;

use std::sync::Arc;

use leptos::prelude::*;
use smartcontrol_client::HubConfig;
use smartcontrol_common::Catalog;

use crate::app::App;

fn main() {
    console_error_panic_hook::set_once();
    _ = console_log::init_with_level(log::Level::Debug);

    let catalog = match Catalog::standard() {
        Ok(catalog) => Arc::new(catalog),
        Err(error) => {
            log::error!("[main] command catalog is invalid: {}", error);
            return;
        }
    };
    log::info!("[main] {} commands available", catalog.len());

    let mut config = HubConfig::default();
    if let Some(url) = hub_override() {
        log::info!("[main] using hub {}", url);
        config = config.with_url(url);
    }

    leptos::mount::mount_to_body(move || view! { <App config=config.clone() catalog=catalog.clone() /> });
}

/// The `hub` query parameter of the page URL, if present.
fn hub_override() -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    let params = web_sys::UrlSearchParams::new_with_str(&search).ok()?;
    params.get("hub").filter(|url| !url.is_empty())
}
