use std::sync::Arc;

use leptos::prelude::*;
use leptos_use::core::ConnectionReadyState;
use serde_json::Value;
use smartcontrol_common::{
    Catalog, ClientFrame, HandshakeRequest, HandshakeResponse, HubMessage, UpdateChannel,
};

use crate::config::HubConfig;
use crate::dispatch::{CorrelationToken, Dispatcher, FrameSink};
use crate::error::{DispatchError, HubError};
use crate::panel::{PanelState, PanelUpdate};
use crate::router::UpdateRouter;
use crate::session::{SessionAction, SessionManager, SessionState};

/// Connection control interface exposed to components.
#[derive(Clone)]
pub struct HubConnection {
    /// Current session state
    pub state: Signal<SessionState>,
    /// Start connecting if no attempt is in flight
    pub connect: Arc<dyn Fn() + Send + Sync>,
}

/// Context providing access to the hub session.
///
/// Provided once by [`HubProvider`](crate::HubProvider) and consumed through
/// the hooks in this crate. It owns the session state machine, the update
/// router and the dispatcher, and mirrors their results into signals.
#[derive(Clone)]
pub struct HubContext {
    /// Current session state
    pub session_state: RwSignal<SessionState>,
    /// What the controller form shows
    pub panel: RwSignal<PanelState>,
    /// Last local error (dispatch, catalog, payload shape or transport)
    pub last_error: RwSignal<Option<HubError>>,
    config: HubConfig,
    catalog: Arc<Catalog>,
    session: StoredValue<SessionManager>,
    router: StoredValue<UpdateRouter>,
    dispatcher: Arc<Dispatcher>,
    /// Function to send frames to the hub
    send: Arc<dyn Fn(&ClientFrame) -> Result<(), DispatchError> + Send + Sync>,
    /// Function to open the WebSocket
    open: Arc<dyn Fn() + Send + Sync>,
    /// Function to close the WebSocket
    close: Arc<dyn Fn() + Send + Sync>,
}

impl HubContext {
    /// Create a new HubContext.
    ///
    /// This is typically called by `HubProvider`, not by user code.
    pub fn new(
        config: HubConfig,
        catalog: Arc<Catalog>,
        send: Arc<dyn Fn(&ClientFrame) -> Result<(), DispatchError> + Send + Sync>,
        open: Arc<dyn Fn() + Send + Sync>,
        close: Arc<dyn Fn() + Send + Sync>,
    ) -> Self {
        let session = SessionManager::new(config.retry_delay());
        Self {
            session_state: RwSignal::new(session.state()),
            panel: RwSignal::new(PanelState::default()),
            last_error: RwSignal::new(None),
            config,
            catalog,
            session: StoredValue::new(session),
            router: StoredValue::new(UpdateRouter::new()),
            dispatcher: Arc::new(Dispatcher::new()),
            send,
            open,
            close,
        }
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    pub fn catalog(&self) -> Arc<Catalog> {
        self.catalog.clone()
    }

    /// Get connection control interface.
    pub fn connection(&self) -> HubConnection {
        let ctx = self.clone();
        HubConnection {
            state: self.session_state.into(),
            connect: Arc::new(move || ctx.connect()),
        }
    }

    pub fn connect(&self) {
        self.drive(SessionManager::connect);
    }

    /// Runs a catalog command by name.
    ///
    /// Unknown names, arity mismatches and dispatch failures are logged,
    /// recorded in `last_error` and returned.
    pub fn run(&self, name: &str, args: &[Value]) -> Result<CorrelationToken, HubError> {
        let result = self
            .catalog
            .invocation(name, args)
            .map_err(HubError::from)
            .and_then(|invocation| self.invoke(&invocation.target, invocation.arguments));
        if let Err(error) = &result {
            self.report(error.clone());
        }
        result
    }

    /// Sends `target(token, ...args)` through the dispatcher.
    pub fn invoke(&self, target: &str, args: Vec<Value>) -> Result<CorrelationToken, HubError> {
        let result = self
            .session
            .try_with_value(|session| self.dispatcher.invoke(session, self, target, args))
            .unwrap_or_else(|| {
                Err(DispatchError::NotConnected {
                    target: target.to_string(),
                })
            });
        result.map_err(HubError::from)
    }

    /// Applies a local edit, e.g. the user dragging the brightness slider.
    pub fn edit_panel(&self, update: PanelUpdate) {
        self.panel.update(|panel| panel.apply(update));
    }

    pub fn report(&self, error: HubError) {
        log::warn!("[HubContext] {}", error);
        // Use try_update_untracked + notify so this is safe to call from
        // socket callbacks and effects alike
        self.last_error.try_update_untracked(|last| *last = Some(error));
        self.last_error.notify();
    }

    /// Follows the socket's ready state.
    ///
    /// The handshake goes out once the socket reports `Open`. The socket's
    /// own open callback fires before that, while sends are still refused.
    pub(crate) fn handle_ready_state(&self, state: ConnectionReadyState) {
        log::debug!("[HubContext] socket {:?}: {}", state, self.config.url);
        if state == ConnectionReadyState::Open {
            self.drive(SessionManager::on_transport_open);
        }
    }

    pub(crate) fn handle_transport_closed(&self, reason: Option<String>) {
        self.drive(move |session| session.on_transport_closed(reason));
    }

    /// Handles one inbound text frame, which may batch several records.
    pub(crate) fn handle_frame(&self, text: &str) {
        for record in smartcontrol_common::protocol::split_records(text) {
            let awaiting_handshake = self
                .session
                .try_with_value(SessionManager::awaiting_handshake)
                .unwrap_or(false);

            if awaiting_handshake {
                let result = HandshakeResponse::parse(record).and_then(HandshakeResponse::into_result);
                self.drive(move |session| session.on_handshake(result));
                continue;
            }

            match HubMessage::parse(record) {
                Ok(message) => self.handle_message(message),
                Err(error) => self.report(error.into()),
            }
        }
    }

    fn handle_message(&self, message: HubMessage) {
        match message {
            HubMessage::Invocation { target, arguments, .. } => match target.parse::<UpdateChannel>() {
                Ok(channel) => {
                    let payload = arguments.into_iter().next().unwrap_or(Value::Null);
                    self.route(channel, &payload);
                }
                Err(_) => {
                    log::debug!("[HubContext] no handler for pushed target '{}'", target);
                }
            },
            HubMessage::Completion {
                invocation_id,
                error: Some(error),
                ..
            } => {
                log::warn!("[HubContext] invocation {} failed: {}", invocation_id, error);
            }
            HubMessage::Completion { invocation_id, .. } => {
                log::debug!("[HubContext] invocation {} completed", invocation_id);
            }
            HubMessage::Ping => {}
            HubMessage::Close { error, .. } => {
                self.drive(|session| session.on_hub_close(error.as_deref()));
            }
            HubMessage::Ignored(kind) => {
                log::debug!("[HubContext] ignoring hub message type {}", kind);
            }
        }
    }

    fn route(&self, channel: UpdateChannel, payload: &Value) {
        let Some(outcome) = self.router.try_update_value(|router| router.route(channel, payload)) else {
            return;
        };

        // Use try_update_untracked + notify to avoid reactive graph issues
        // when this runs inside the socket callback
        self.panel.try_update_untracked(|panel| panel.apply_all(outcome.updates));
        self.panel.notify();

        if let Some(error) = outcome.errors.into_iter().last() {
            self.last_error.try_update_untracked(|last| {
                *last = Some(HubError::Payload {
                    channel: channel.to_string(),
                    error,
                })
            });
            self.last_error.notify();
        }
    }

    /// Sends a keep-alive ping while the session is live.
    pub(crate) fn keep_alive(&self) {
        let connected = self
            .session
            .try_with_value(SessionManager::is_connected)
            .unwrap_or(false);
        if connected {
            if let Err(error) = self.send_frame(&ClientFrame::Message(HubMessage::Ping)) {
                self.report(error.into());
            }
        }
    }

    /// Feeds one event into the session state machine and performs the
    /// actions it asks for.
    fn drive(&self, event: impl FnOnce(&mut SessionManager) -> Vec<SessionAction>) {
        let Some(actions) = self.session.try_update_value(event) else {
            return;
        };

        if let Some(state) = self.session.try_with_value(SessionManager::state) {
            self.session_state.set(state);
        }

        for action in actions {
            self.perform(action);
        }
    }

    fn perform(&self, action: SessionAction) {
        match action {
            SessionAction::OpenTransport => (self.open)(),
            SessionAction::CloseTransport => (self.close)(),
            SessionAction::SendHandshake => {
                if let Err(error) = self.send_frame(&ClientFrame::Handshake(HandshakeRequest::default())) {
                    self.report(error.into());
                }
            }
            SessionAction::ScheduleRetry(delay) => {
                let ctx = self.clone();
                set_timeout(move || ctx.drive(SessionManager::on_retry_elapsed), delay);
            }
            SessionAction::InvokeSystemStart => {
                // Failures are already reported by run
                let _ = self.run("systemStart", &[]);
            }
            SessionAction::SetFormEnabled(enabled) => {
                self.panel.try_update_untracked(|panel| panel.apply(PanelUpdate::SetFormEnabled(enabled)));
                self.panel.notify();
            }
        }
    }
}

impl FrameSink for HubContext {
    fn send_frame(&self, frame: &ClientFrame) -> Result<(), DispatchError> {
        (self.send)(frame)
    }
}
