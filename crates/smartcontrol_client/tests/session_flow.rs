use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::time::Duration;

use serde_json::{json, Value};
use smartcontrol_client::{
    CorrelationToken, DispatchError, Dispatcher, FrameSink, PanelState, PanelUpdate, SessionAction,
    SessionManager, SessionState, SourceOption, TokenSource, UpdateRouter,
};
use smartcontrol_common::{Catalog, ClientFrame, HubMessage, ProtocolError, UpdateChannel};

// Sequential tokens so assertions can name them
#[derive(Default)]
struct CountingTokens {
    next: Cell<u32>,
}

impl TokenSource for CountingTokens {
    fn next_token(&self) -> CorrelationToken {
        let n = self.next.get() + 1;
        self.next.set(n);
        CorrelationToken::new(format!("token-{n}"))
    }
}

#[derive(Default)]
struct Wire {
    frames: RefCell<Vec<ClientFrame>>,
}

impl FrameSink for Wire {
    fn send_frame(&self, frame: &ClientFrame) -> Result<(), DispatchError> {
        self.frames.borrow_mut().push(frame.clone());
        Ok(())
    }
}

impl Wire {
    fn invocations(&self) -> Vec<(String, Vec<Value>)> {
        self.frames
            .borrow()
            .iter()
            .filter_map(|frame| match frame {
                ClientFrame::Message(HubMessage::Invocation { target, arguments, .. }) => {
                    Some((target.clone(), arguments.clone()))
                }
                _ => None,
            })
            .collect()
    }
}

/// Runs the plain core the same way the provider does, with a fake socket.
struct Harness {
    session: SessionManager,
    dispatcher: Dispatcher<CountingTokens>,
    router: UpdateRouter,
    catalog: Catalog,
    panel: PanelState,
    wire: Wire,
    opens: usize,
    closes: usize,
    retries: Vec<Duration>,
}

impl Harness {
    fn new() -> Self {
        Self {
            session: SessionManager::new(Duration::from_secs(5)),
            dispatcher: Dispatcher::with_tokens(CountingTokens::default()),
            router: UpdateRouter::new(),
            catalog: Catalog::standard().unwrap(),
            panel: PanelState::default(),
            wire: Wire::default(),
            opens: 0,
            closes: 0,
            retries: Vec::new(),
        }
    }

    fn perform(&mut self, actions: Vec<SessionAction>) {
        for action in actions {
            match action {
                SessionAction::OpenTransport => self.opens += 1,
                SessionAction::CloseTransport => self.closes += 1,
                SessionAction::SendHandshake => {}
                SessionAction::ScheduleRetry(delay) => self.retries.push(delay),
                SessionAction::InvokeSystemStart => {
                    self.run("systemStart", &[]).unwrap();
                }
                SessionAction::SetFormEnabled(enabled) => {
                    self.panel.apply(PanelUpdate::SetFormEnabled(enabled));
                }
            }
        }
    }

    fn run(&self, name: &str, args: &[Value]) -> Result<CorrelationToken, DispatchError> {
        let invocation = self.catalog.invocation(name, args).unwrap();
        self.dispatcher.dispatch(&self.session, &self.wire, &invocation)
    }

    fn fail_attempt(&mut self) {
        let actions = self.session.on_transport_closed(Some("refused".to_string()));
        self.perform(actions);
    }

    fn retry(&mut self) {
        let actions = self.session.on_retry_elapsed();
        self.perform(actions);
    }

    fn succeed_attempt(&mut self) {
        let actions = self.session.on_transport_open();
        self.perform(actions);
        let actions = self.session.on_handshake(Ok(()));
        self.perform(actions);
    }

    fn push(&mut self, channel: UpdateChannel, payload: &Value) {
        let outcome = self.router.route(channel, payload);
        self.panel.apply_all(outcome.updates);
    }
}

fn display_payload(luminance: &str, source: &str) -> Value {
    json!({
        "err_code": 0,
        "err_msg": "",
        "tag": {"osdInfo": {
            "attributeInfos": [
                {"evcpOpCode": "OP_10_Luminance", "value": luminance},
                {"evcpOpCode": "OP_60_InputSource", "value": source}
            ],
            "ddcHelInfo": {"supportList": [
                {"name": "OP_60_InputSource", "supportChild": [
                    {"name": "Normal__DigitalHDMI1", "value": "17"},
                    {"name": "Normal__USBC1", "value": "27"}
                ]}
            ]}
        }}
    })
}

#[test]
fn test_failed_attempts_retry_until_success() {
    for failures in [0, 1, 3, 7] {
        let mut hub = Harness::new();
        let actions = hub.session.connect();
        hub.perform(actions);

        for _ in 0..failures {
            hub.fail_attempt();
            assert!(!hub.panel.form_enabled);
            hub.retry();
        }
        assert!(!hub.panel.form_enabled);
        hub.succeed_attempt();

        assert_eq!(hub.opens, failures + 1);
        assert_eq!(hub.session.attempts(), failures as u64 + 1);
        assert_eq!(hub.retries, vec![Duration::from_secs(5); failures]);
        assert!(hub.panel.form_enabled);
        assert!(hub.session.is_connected());
    }
}

#[test]
fn test_connect_sends_system_start() {
    let mut hub = Harness::new();
    let actions = hub.session.connect();
    hub.perform(actions);
    hub.succeed_attempt();

    assert_eq!(
        hub.wire.invocations(),
        vec![("start".to_string(), vec![json!("token-1")])]
    );
}

#[test]
fn test_tokens_are_unique_and_lead_the_arguments() {
    let mut hub = Harness::new();
    let actions = hub.session.connect();
    hub.perform(actions);
    hub.succeed_attempt();

    hub.run("setBrightness", &[json!("30")]).unwrap();
    hub.run("setInputSource", &[json!("17")]).unwrap();
    hub.run("rescan", &[]).unwrap();

    let invocations = hub.wire.invocations();
    let tokens: HashSet<&Value> = invocations.iter().map(|(_, args)| &args[0]).collect();
    assert_eq!(tokens.len(), invocations.len());
    assert_eq!(
        invocations[1],
        ("SetOSD".to_string(), vec![json!("token-2"), json!("OP_10_Luminance"), json!("30")])
    );
    assert_eq!(
        invocations[2],
        ("InputsourceChange".to_string(), vec![json!("token-3"), json!("17"), json!(-1)])
    );
}

#[test]
fn test_commands_fail_without_a_session() {
    let hub = Harness::new();
    let result = hub.run("setBrightness", &[json!("30")]);
    assert_eq!(
        result,
        Err(DispatchError::NotConnected {
            target: "SetOSD".to_string()
        })
    );
    assert!(hub.wire.frames.borrow().is_empty());
}

#[test]
fn test_replayed_payload_is_idempotent() {
    let mut hub = Harness::new();
    let payload = display_payload("42", "17");

    hub.push(UpdateChannel::DisplayData, &payload);
    let first = hub.panel.clone();
    hub.push(UpdateChannel::DisplayData, &payload);

    assert!(hub.router.is_initialized());
    assert_eq!(hub.panel, first);
    assert_eq!(
        hub.panel.source_options,
        vec![
            SourceOption {
                value: "17".to_string(),
                label: "HDMI1".to_string()
            },
            SourceOption {
                value: "27".to_string(),
                label: "USBC1".to_string()
            },
        ]
    );
}

#[test]
fn test_error_status_leaves_bound_fields_alone() {
    let mut hub = Harness::new();
    hub.push(UpdateChannel::DisplayData, &display_payload("42", "17"));

    let mut rejected = display_payload("90", "27");
    rejected["err_code"] = json!(3);
    rejected["err_msg"] = json!("busy");
    hub.push(UpdateChannel::DisplayData, &rejected);

    assert_eq!(hub.panel.brightness, "42");
    assert_eq!(hub.panel.input_source, "17");
    assert_eq!(hub.panel.output, rejected.to_string());
}

#[test]
fn test_bare_luminance_payload_sets_brightness() {
    let mut hub = Harness::new();
    let payload = json!({
        "err_code": 0,
        "tag": {"osdInfo": {
            "attributeInfos": [{"evcpOpCode": "OP_10_Luminance", "value": "42"}],
            "ddcHelInfo": {"supportList": [{"name": "OP_10_Luminance", "supportChild": []}]}
        }}
    });

    hub.push(UpdateChannel::DisplayData, &payload);
    assert_eq!(hub.panel.brightness, "42");
    assert_eq!(hub.panel.output, payload.to_string());
}

#[test]
fn test_source_option_appended_once_per_page_load() {
    let mut hub = Harness::new();
    for luminance in ["10", "20", "30"] {
        hub.push(UpdateChannel::DisplayData, &display_payload(luminance, "17"));
    }

    let hdmi: Vec<_> = hub
        .panel
        .source_options
        .iter()
        .filter(|option| option.label == "HDMI1")
        .collect();
    assert_eq!(hdmi.len(), 1);
    assert_eq!(hub.panel.brightness, "30");
}

#[test]
fn test_other_channels_only_reach_the_output() {
    let mut hub = Harness::new();
    let payload = json!({"err_code": 0, "tag": {"version": "1.0.4"}});

    hub.push(UpdateChannel::SystemData, &payload);
    assert_eq!(hub.panel.output, payload.to_string());
    assert!(hub.panel.brightness.is_empty());
    assert!(!hub.router.is_initialized());
}

#[test]
fn test_lost_session_reconnects_without_delay() {
    let mut hub = Harness::new();
    let actions = hub.session.connect();
    hub.perform(actions);
    hub.succeed_attempt();
    assert!(hub.panel.form_enabled);

    let actions = hub.session.on_transport_closed(None);
    hub.perform(actions);

    assert!(!hub.panel.form_enabled);
    assert_eq!(hub.session.state(), SessionState::Reconnecting);
    assert_eq!(hub.opens, 2);
    assert!(hub.retries.is_empty());

    hub.succeed_attempt();
    assert!(hub.panel.form_enabled);
}

#[test]
fn test_rejected_handshake_closes_socket_and_waits() {
    let mut hub = Harness::new();
    let actions = hub.session.connect();
    hub.perform(actions);

    let actions = hub.session.on_transport_open();
    hub.perform(actions);
    let actions = hub
        .session
        .on_handshake(Err(ProtocolError::HandshakeRejected("version".to_string())));
    hub.perform(actions);
    // The socket close that follows must not add a second retry
    hub.fail_attempt();

    assert_eq!(hub.closes, 1);
    assert_eq!(hub.retries, vec![Duration::from_secs(5)]);
    assert!(!hub.panel.form_enabled);
    assert!(hub.wire.invocations().is_empty());
}
