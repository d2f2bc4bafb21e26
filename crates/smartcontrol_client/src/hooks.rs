use leptos::prelude::*;
use serde_json::Value;

use crate::context::{HubConnection, HubContext};
use crate::dispatch::CorrelationToken;
use crate::error::HubError;
use crate::panel::PanelState;

/// Hook to access the hub context directly.
///
/// # Panics
///
/// Panics if called outside of a `HubProvider` context.
pub fn use_hub() -> HubContext {
    expect_context::<HubContext>()
}

/// Hook to get the connection state and a manual connect trigger.
///
/// # Example
///
/// ```rust,ignore
/// use smartcontrol_client::use_connection;
///
/// #[component]
/// fn StatusLine() -> impl IntoView {
///     let connection = use_connection();
///     view! { <span>{move || connection.state.get().label()}</span> }
/// }
/// ```
pub fn use_connection() -> HubConnection {
    use_hub().connection()
}

/// Read-only view of what the controller form shows.
pub fn use_panel() -> Signal<PanelState> {
    use_hub().panel.into()
}

pub fn use_last_error() -> Signal<Option<HubError>> {
    use_hub().last_error.into()
}

/// Hook returning a callback that runs a catalog command by name.
///
/// Errors are also recorded in the context's `last_error`, so callers that
/// only display errors can ignore the result.
///
/// # Example
///
/// ```rust,ignore
/// let run = use_command();
/// let on_click = move |_| {
///     let _ = run("setBrightness", vec![serde_json::json!("30")]);
/// };
/// ```
pub fn use_command() -> impl Fn(&str, Vec<Value>) -> Result<CorrelationToken, HubError> + Clone {
    let ctx = use_hub();
    move |name: &str, args: Vec<Value>| ctx.run(name, &args)
}
