//! Ready-to-use components for the hub session.

use leptos::prelude::*;

use crate::hooks::{use_connection, use_last_error};
use crate::session::SessionState;

/// Small connection indicator.
///
/// Shows the session state, and the last local error when there is one.
#[component]
pub fn ConnectionBadge(
    /// CSS class for the outer element (optional)
    #[prop(optional, into)]
    class: Option<String>,
) -> impl IntoView {
    let connection = use_connection();
    let last_error = use_last_error();
    let state = connection.state;

    let dot_class = move || match state.get() {
        SessionState::Connected => "w-2 h-2 rounded-full bg-green-500",
        SessionState::Connecting | SessionState::Reconnecting => "w-2 h-2 rounded-full bg-yellow-500 animate-pulse",
        SessionState::Disconnected => "w-2 h-2 rounded-full bg-red-500",
    };

    view! {
        <div class=class.unwrap_or_else(|| "flex items-center gap-2 text-xs".to_string())>
            <span class=dot_class></span>
            <span>{move || state.get().label()}</span>
            <Show when=move || last_error.get().is_some()>
                <span class="text-red-400 truncate" title=move || last_error.get().map(|e| e.to_string())>
                    {move || last_error.get().map(|e| e.to_string())}
                </span>
            </Show>
        </div>
    }
}
