//! # SmartControl Client
//!
//! Reactive client for the display-control hub, with Leptos integration.
//!
//! The crate is split into a plain core and a thin reactive shell:
//!
//! - [`SessionManager`] decides when to open, close and retry the single hub
//!   connection. It returns [`SessionAction`]s instead of touching the socket.
//! - [`Dispatcher`] sends every command as `target(token, ...args)` with a
//!   fresh [`CorrelationToken`].
//! - [`UpdateRouter`] turns pushed payloads into [`PanelUpdate`]s.
//! - [`HubProvider`] and [`HubContext`] run all of the above against a real
//!   WebSocket and expose the results as signals.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use leptos::prelude::*;
//! use smartcontrol_client::{use_command, use_panel, HubConfig, HubProvider};
//! use smartcontrol_common::Catalog;
//!
//! #[component]
//! fn App() -> impl IntoView {
//!     let catalog = Arc::new(Catalog::standard().unwrap());
//!     view! {
//!         <HubProvider config=HubConfig::default() catalog=catalog>
//!             <Brightness/>
//!         </HubProvider>
//!     }
//! }
//!
//! #[component]
//! fn Brightness() -> impl IntoView {
//!     let panel = use_panel();
//!     let run = use_command();
//!     view! {
//!         <span>{move || panel.get().brightness}</span>
//!         <button on:click=move |_| { let _ = run("setBrightness", vec!["30".into()]); }>
//!             "30%"
//!         </button>
//!     }
//! }
//! ```

pub mod components;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod hooks;
pub mod panel;
pub mod provider;
pub mod router;
pub mod session;

pub use components::ConnectionBadge;
pub use config::HubConfig;
pub use context::{HubConnection, HubContext};
pub use dispatch::{CorrelationToken, Dispatcher, FrameSink, TokenSource, UuidTokens};
pub use error::{DispatchError, HubError};
pub use hooks::{use_command, use_connection, use_hub, use_last_error, use_panel};
pub use panel::{PanelState, PanelUpdate, SourceOption};
pub use provider::HubProvider;
pub use router::{BoundControl, BoundField, RouteOutcome, UpdateRouter, BOUND_FIELDS};
pub use session::{SessionAction, SessionManager, SessionState};

// Re-export the shared protocol crate so apps need only one dependency path
pub use smartcontrol_common;
