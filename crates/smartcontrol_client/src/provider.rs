use std::sync::Arc;

use leptos::prelude::*;
use leptos_use::core::ConnectionReadyState;
use leptos_use::{
    use_interval_fn, use_websocket_with_options, DummyEncoder, ReconnectLimit, UseWebSocketOptions,
    UseWebSocketReturn,
};
use smartcontrol_common::{Catalog, ClientFrame, HubFrame, HubJsonCodec};
use web_sys::CloseEvent;

use crate::config::HubConfig;
use crate::context::HubContext;
use crate::error::{DispatchError, HubError};

/// Provider component that manages the hub session.
///
/// Owns the WebSocket and the retry loop, and exposes a [`HubContext`] to all
/// children.
///
/// # Example
///
/// ```rust,ignore
/// use leptos::prelude::*;
/// use smartcontrol_client::{HubConfig, HubProvider};
/// use smartcontrol_common::Catalog;
/// use std::sync::Arc;
///
/// #[component]
/// fn App() -> impl IntoView {
///     let catalog = Arc::new(Catalog::standard().unwrap());
///
///     view! {
///         <HubProvider config=HubConfig::default() catalog=catalog>
///             <MyPanel />
///         </HubProvider>
///     }
/// }
/// ```
#[component]
pub fn HubProvider(
    /// Hub endpoint and timings (default: [`HubConfig::default`])
    #[prop(optional)]
    config: Option<HubConfig>,
    /// Validated command catalog
    catalog: Arc<Catalog>,
    /// Whether to start connecting on mount (default: true)
    #[prop(optional)]
    auto_connect: Option<bool>,
    /// Child components
    children: Children,
) -> impl IntoView {
    let config = config.unwrap_or_default();
    let auto_connect = auto_connect.unwrap_or(true);

    // The socket functions only exist after use_websocket returns, but the
    // context has to exist before so the callbacks can reach it
    let send_fn: StoredValue<Option<Arc<dyn Fn(&ClientFrame) -> Result<(), DispatchError> + Send + Sync>>> =
        StoredValue::new(None);
    let open_fn: StoredValue<Option<Arc<dyn Fn() + Send + Sync>>> = StoredValue::new(None);
    let close_fn: StoredValue<Option<Arc<dyn Fn() + Send + Sync>>> = StoredValue::new(None);

    let send_arc = Arc::new(move |frame: &ClientFrame| match send_fn.get_value() {
        Some(send) => send(frame),
        None => Err(DispatchError::Transport("socket not initialized".to_string())),
    });
    let open_arc = Arc::new(move || {
        if let Some(open) = open_fn.get_value() {
            open();
        }
    });
    let close_arc = Arc::new(move || {
        if let Some(close) = close_fn.get_value() {
            close();
        }
    });

    let ctx = HubContext::new(config.clone(), catalog, send_arc, open_arc, close_arc);

    // Provide context to children early so closures can use it
    provide_context(ctx.clone());

    let on_open_url = config.url.clone();
    let on_close_ctx = ctx.clone();
    let on_error_ctx = ctx.clone();
    let on_message_ctx = ctx.clone();

    // Reconnection is owned by the session manager, so the hook never retries
    let UseWebSocketReturn {
        ready_state,
        send: raw_send,
        open,
        close,
        ..
    } = use_websocket_with_options::<ClientFrame, HubFrame, HubJsonCodec, (), DummyEncoder>(
        &config.url,
        UseWebSocketOptions::default()
            .immediate(false)
            .reconnect_limit(ReconnectLimit::Limited(0))
            .on_open(move |_| log::info!("[HubProvider] WebSocket opened: {}", on_open_url))
            .on_close(move |event: CloseEvent| {
                let reason = event.reason();
                let reason = if reason.is_empty() {
                    format!("closed with code {}", event.code())
                } else {
                    reason
                };
                on_close_ctx.handle_transport_closed(Some(reason));
            })
            .on_error(move |error| {
                on_error_ctx.report(HubError::WebSocket {
                    message: format!("{:?}", error),
                });
            })
            .on_message_raw(move |text: &str| on_message_ctx.handle_frame(text)),
    );

    send_fn.set_value(Some(Arc::new(move |frame: &ClientFrame| {
        if ready_state.get_untracked() != ConnectionReadyState::Open {
            return Err(DispatchError::Transport("socket is not open".to_string()));
        }
        raw_send(frame);
        Ok(())
    })));
    open_fn.set_value(Some(Arc::new(move || open())));
    close_fn.set_value(Some(Arc::new(move || close())));

    // Sync the ready_state from the WebSocket into the session; the handshake
    // goes out from here once the socket accepts frames
    let ready_ctx = ctx.clone();
    Effect::new(move || ready_ctx.handle_ready_state(ready_state.get()));

    let keep_alive_ctx = ctx.clone();
    let keep_alive_ms = u64::try_from(config.keep_alive().as_millis()).unwrap_or(u64::MAX);
    use_interval_fn(move || keep_alive_ctx.keep_alive(), keep_alive_ms);

    if auto_connect {
        ctx.connect();
    }

    children()
}
