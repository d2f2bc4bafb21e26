//! The single choke point for outbound commands.
//!
//! Every command, catalog-shaped or not, passes through
//! [`Dispatcher::invoke`], which tags it with a fresh [`CorrelationToken`] as
//! the first wire argument and hands it to a [`FrameSink`].

use std::fmt;

use serde_json::Value;
use smartcontrol_common::{ClientFrame, HubMessage, Invocation};

use crate::error::DispatchError;
use crate::session::SessionManager;

/// Per-call identifier the hub uses to pair requests with their results.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationToken(String);

impl CorrelationToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of correlation tokens.
pub trait TokenSource {
    fn next_token(&self) -> CorrelationToken;
}

/// Random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidTokens;

impl TokenSource for UuidTokens {
    fn next_token(&self) -> CorrelationToken {
        CorrelationToken(uuid::Uuid::new_v4().to_string())
    }
}

/// Where encoded frames go. Implemented by the hub context over the
/// WebSocket and by in-memory recorders in tests.
pub trait FrameSink {
    fn send_frame(&self, frame: &ClientFrame) -> Result<(), DispatchError>;
}

#[derive(Debug, Clone, Default)]
pub struct Dispatcher<T = UuidTokens> {
    tokens: T,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T: TokenSource> Dispatcher<T> {
    pub fn with_tokens(tokens: T) -> Self {
        Self { tokens }
    }

    /// Sends `target(token, ...args)` as a non-blocking invocation.
    ///
    /// Fails with [`DispatchError::NotConnected`] unless the session is live;
    /// nothing is sent in that case.
    pub fn invoke(
        &self,
        session: &SessionManager,
        sink: &dyn FrameSink,
        target: &str,
        args: Vec<Value>,
    ) -> Result<CorrelationToken, DispatchError> {
        if !session.is_connected() {
            return Err(DispatchError::NotConnected {
                target: target.to_string(),
            });
        }

        let token = self.tokens.next_token();
        let mut arguments = Vec::with_capacity(args.len() + 1);
        arguments.push(Value::String(token.to_string()));
        arguments.extend(args);

        sink.send_frame(&ClientFrame::Message(HubMessage::invocation(target, arguments)))?;
        log::debug!("[Dispatcher] invoked {} ({})", target, token);

        Ok(token)
    }

    pub fn dispatch(
        &self,
        session: &SessionManager,
        sink: &dyn FrameSink,
        invocation: &Invocation,
    ) -> Result<CorrelationToken, DispatchError> {
        self.invoke(session, sink, &invocation.target, invocation.arguments.clone())
    }
}
