//! Connection lifecycle for the single hub session.
//!
//! [`SessionManager`] is a plain state machine: every event method returns the
//! [`SessionAction`]s the caller must perform (open the socket, schedule a
//! retry, toggle the form, ...). The Leptos provider executes them against the
//! real WebSocket; tests execute them against nothing at all.
//!
//! ```text
//! Disconnected --connect--> Connecting --handshake ok--> Connected
//!      ^                        |                            |
//!      +---- retry after delay -+ (closed / rejected)        | closed
//!      |                                                     v
//!      +---- retry after delay ---------------------- Reconnecting
//! ```

use std::time::Duration;

use smartcontrol_common::ProtocolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Disconnected,
    /// First attempt, or a retry after a failed attempt.
    Connecting,
    Connected,
    /// Attempt started immediately after an established session closed.
    Reconnecting,
}

impl SessionState {
    pub fn is_attempting(&self) -> bool {
        matches!(self, SessionState::Connecting | SessionState::Reconnecting)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Disconnected => "Disconnected",
            SessionState::Connecting => "Connecting...",
            SessionState::Connected => "Connected",
            SessionState::Reconnecting => "Reconnecting...",
        }
    }
}

/// Side effects requested by the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    OpenTransport,
    CloseTransport,
    SendHandshake,
    /// Call [`SessionManager::on_retry_elapsed`] after the delay.
    ScheduleRetry(Duration),
    /// Issue the initial "system start" command.
    InvokeSystemStart,
    SetFormEnabled(bool),
}

#[derive(Debug, Clone)]
pub struct SessionManager {
    state: SessionState,
    retry_delay: Duration,
    attempts: u64,
    awaiting_handshake: bool,
    last_failure: Option<String>,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

impl SessionManager {
    pub fn new(retry_delay: Duration) -> Self {
        Self {
            state: SessionState::Disconnected,
            retry_delay,
            attempts: 0,
            awaiting_handshake: false,
            last_failure: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == SessionState::Connected
    }

    /// Whether the next inbound record is the handshake response.
    pub fn awaiting_handshake(&self) -> bool {
        self.awaiting_handshake
    }

    /// Connection attempts started since the page loaded.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    /// Starts an attempt unless one is in flight or the session is live.
    pub fn connect(&mut self) -> Vec<SessionAction> {
        if self.state != SessionState::Disconnected {
            log::debug!("[SessionManager] connect ignored while {:?}", self.state);
            return Vec::new();
        }
        self.begin_attempt(SessionState::Connecting)
    }

    pub fn on_retry_elapsed(&mut self) -> Vec<SessionAction> {
        self.connect()
    }

    /// The socket is open and accepts frames. Repeated reports for the same
    /// attempt send the handshake only once.
    pub fn on_transport_open(&mut self) -> Vec<SessionAction> {
        if !self.state.is_attempting() || self.awaiting_handshake {
            log::debug!("[SessionManager] socket open ignored while {:?}", self.state);
            return Vec::new();
        }
        self.awaiting_handshake = true;
        vec![SessionAction::SendHandshake]
    }

    pub fn on_handshake(&mut self, result: Result<(), ProtocolError>) -> Vec<SessionAction> {
        if !self.awaiting_handshake {
            return Vec::new();
        }
        self.awaiting_handshake = false;

        match result {
            Ok(()) => {
                self.state = SessionState::Connected;
                self.last_failure = None;
                log::info!("[SessionManager] connected after {} attempt(s)", self.attempts);
                vec![SessionAction::InvokeSystemStart, SessionAction::SetFormEnabled(true)]
            }
            Err(error) => {
                let mut actions = vec![SessionAction::CloseTransport];
                actions.extend(self.fail(error.to_string()));
                actions
            }
        }
    }

    /// The hub announced it is closing the connection.
    pub fn on_hub_close(&mut self, error: Option<&str>) -> Vec<SessionAction> {
        match error {
            Some(error) => log::warn!("[SessionManager] hub closed the connection: {}", error),
            None => log::info!("[SessionManager] hub closed the connection"),
        }
        vec![SessionAction::CloseTransport]
    }

    /// The socket reached the fully closed state.
    pub fn on_transport_closed(&mut self, reason: Option<String>) -> Vec<SessionAction> {
        match self.state {
            SessionState::Connecting | SessionState::Reconnecting => {
                self.fail(reason.unwrap_or_else(|| "connection closed before handshake".to_string()))
            }
            SessionState::Connected => {
                log::warn!(
                    "[SessionManager] connection lost ({}), reconnecting",
                    reason.as_deref().unwrap_or("no reason")
                );
                let mut actions = vec![SessionAction::SetFormEnabled(false)];
                actions.extend(self.begin_attempt(SessionState::Reconnecting));
                actions
            }
            // A retry is already pending for the failure that got us here.
            SessionState::Disconnected => Vec::new(),
        }
    }

    fn begin_attempt(&mut self, state: SessionState) -> Vec<SessionAction> {
        self.state = state;
        self.attempts += 1;
        self.awaiting_handshake = false;
        log::info!("[SessionManager] connection attempt {} ({:?})", self.attempts, state);
        vec![SessionAction::OpenTransport]
    }

    fn fail(&mut self, reason: String) -> Vec<SessionAction> {
        self.state = SessionState::Disconnected;
        self.awaiting_handshake = false;
        log::warn!(
            "[SessionManager] attempt {} failed: {}; retrying in {:?}",
            self.attempts,
            reason,
            self.retry_delay
        );
        self.last_failure = Some(reason);
        vec![SessionAction::ScheduleRetry(self.retry_delay)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handshake_ok(session: &mut SessionManager) -> Vec<SessionAction> {
        session.on_transport_open();
        session.on_handshake(Ok(()))
    }

    #[test]
    fn test_first_connect() {
        let mut session = SessionManager::default();

        assert_eq!(session.connect(), vec![SessionAction::OpenTransport]);
        assert_eq!(session.state(), SessionState::Connecting);
        assert_eq!(session.on_transport_open(), vec![SessionAction::SendHandshake]);
        assert!(session.awaiting_handshake());

        assert_eq!(
            session.on_handshake(Ok(())),
            vec![SessionAction::InvokeSystemStart, SessionAction::SetFormEnabled(true)]
        );
        assert!(session.is_connected());
        assert_eq!(session.attempts(), 1);
    }

    #[test]
    fn test_failed_attempt_schedules_fixed_retry() {
        let mut session = SessionManager::new(Duration::from_secs(5));
        session.connect();

        let actions = session.on_transport_closed(Some("refused".to_string()));
        assert_eq!(actions, vec![SessionAction::ScheduleRetry(Duration::from_secs(5))]);
        assert_eq!(session.state(), SessionState::Disconnected);
        assert_eq!(session.last_failure(), Some("refused"));

        // The close that follows a failure must not stack a second retry.
        assert!(session.on_transport_closed(None).is_empty());
    }

    #[test]
    fn test_connect_is_ignored_while_attempting_or_connected() {
        let mut session = SessionManager::default();
        session.connect();
        assert!(session.connect().is_empty());

        handshake_ok(&mut session);
        assert!(session.connect().is_empty());
        assert_eq!(session.attempts(), 1);
    }

    #[test]
    fn test_rejected_handshake_closes_and_retries() {
        let mut session = SessionManager::default();
        session.connect();
        session.on_transport_open();

        let actions = session.on_handshake(Err(ProtocolError::HandshakeRejected("nope".to_string())));
        assert_eq!(
            actions,
            vec![
                SessionAction::CloseTransport,
                SessionAction::ScheduleRetry(Duration::from_secs(5))
            ]
        );
        assert!(!session.is_connected());
        assert!(session.on_transport_closed(None).is_empty());
    }

    #[test]
    fn test_close_of_live_session_reconnects_immediately() {
        let mut session = SessionManager::default();
        session.connect();
        handshake_ok(&mut session);

        let actions = session.on_transport_closed(None);
        assert_eq!(
            actions,
            vec![SessionAction::SetFormEnabled(false), SessionAction::OpenTransport]
        );
        assert_eq!(session.state(), SessionState::Reconnecting);
        assert_eq!(session.attempts(), 2);
    }

    #[test]
    fn test_failed_reconnect_falls_back_to_retry_loop() {
        let mut session = SessionManager::default();
        session.connect();
        handshake_ok(&mut session);
        session.on_transport_closed(None);

        let actions = session.on_transport_closed(None);
        assert_eq!(actions, vec![SessionAction::ScheduleRetry(Duration::from_secs(5))]);
        assert_eq!(session.on_retry_elapsed(), vec![SessionAction::OpenTransport]);
        assert_eq!(session.state(), SessionState::Connecting);
    }

    #[test]
    fn test_hub_close_requests_socket_close() {
        let mut session = SessionManager::default();
        session.connect();
        handshake_ok(&mut session);

        assert_eq!(session.on_hub_close(Some("server shutting down")), vec![SessionAction::CloseTransport]);
        assert!(session.is_connected());
    }

    #[test]
    fn test_repeated_open_sends_one_handshake() {
        let mut session = SessionManager::default();
        session.connect();

        assert_eq!(session.on_transport_open(), vec![SessionAction::SendHandshake]);
        assert!(session.on_transport_open().is_empty());

        session.on_handshake(Ok(()));
        assert!(session.on_transport_open().is_empty());
    }

    #[test]
    fn test_stray_handshake_is_ignored() {
        let mut session = SessionManager::default();
        assert!(session.on_handshake(Ok(())).is_empty());
        assert!(session.on_transport_open().is_empty());
        assert_eq!(session.state(), SessionState::Disconnected);
    }
}
