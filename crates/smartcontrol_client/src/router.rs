//! Routing of pushed updates into panel changes.
//!
//! Every channel's payload ends up verbatim in the output area. Only an ok
//! payload on the display-status channel is looked into: its bound fields are
//! refreshed on every push, and the source option list is populated once per
//! page load, the first time the device reports its supported sources.

use std::collections::HashSet;

use serde_json::Value;
use smartcontrol_common::{opcode, OsdInfo, PayloadError, StatusPayload, UpdateChannel};

use crate::panel::{PanelUpdate, SourceOption};

/// Form control a pushed value is written into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundControl {
    Brightness,
    InputSource,
}

impl BoundControl {
    fn update(self, value: String) -> PanelUpdate {
        match self {
            BoundControl::Brightness => PanelUpdate::SetBrightness(value),
            BoundControl::InputSource => PanelUpdate::SetInputSource(value),
        }
    }
}

/// How one piece of pushed data maps onto one control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundField {
    pub channel: UpdateChannel,
    pub opcode: &'static str,
    pub control: BoundControl,
}

pub const BOUND_FIELDS: &[BoundField] = &[
    BoundField {
        channel: UpdateChannel::DisplayData,
        opcode: opcode::LUMINANCE,
        control: BoundControl::Brightness,
    },
    BoundField {
        channel: UpdateChannel::DisplayData,
        opcode: opcode::INPUT_SOURCE,
        control: BoundControl::InputSource,
    },
];

/// Result of routing one payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RouteOutcome {
    /// Status code was zero and the message empty.
    pub ok: bool,
    /// Panel changes, in the order they must be applied. The output text is
    /// always last.
    pub updates: Vec<PanelUpdate>,
    /// Shape problems met while extracting fields. None of them stop the
    /// remaining fields or the output update.
    pub errors: Vec<PayloadError>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateRouter {
    initialized: bool,
    listed_sources: HashSet<String>,
}

impl UpdateRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the one-time setup has run.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn route(&mut self, channel: UpdateChannel, payload: &Value) -> RouteOutcome {
        let mut outcome = RouteOutcome::default();

        match StatusPayload::from_value(payload) {
            Ok(status) => {
                outcome.ok = status.is_ok();
                if outcome.ok && channel.is_primary() {
                    self.refresh_display(channel, &status, &mut outcome);
                }
            }
            Err(error) => outcome.errors.push(error),
        }

        for error in &outcome.errors {
            log::warn!("[UpdateRouter] {}: {}", channel, error);
        }

        outcome.updates.push(PanelUpdate::SetOutput(payload.to_string()));
        outcome
    }

    fn refresh_display(&mut self, channel: UpdateChannel, status: &StatusPayload, outcome: &mut RouteOutcome) {
        let tag = match status.display_tag() {
            Ok(tag) => tag,
            Err(error) => {
                outcome.errors.push(error);
                return;
            }
        };
        let osd = match tag.osd_info() {
            Ok(osd) => osd,
            Err(error) => {
                outcome.errors.push(error);
                return;
            }
        };

        // Options go in before the current values so the selector can
        // select a value that was only just listed.
        if !self.initialized {
            self.populate_sources(osd, outcome);
        }

        for field in BOUND_FIELDS.iter().filter(|field| field.channel == channel) {
            match osd.current(field.opcode) {
                Ok(info) => outcome.updates.push(field.control.update(info.value_text())),
                Err(error) => outcome.errors.push(error),
            }
        }
    }

    fn populate_sources(&mut self, osd: &OsdInfo, outcome: &mut RouteOutcome) {
        let children = match osd.supported(opcode::INPUT_SOURCE) {
            Ok(children) => children,
            Err(error) => {
                outcome.errors.push(error);
                return;
            }
        };

        for child in children {
            let value = child.value_text();
            if self.listed_sources.insert(value.clone()) {
                outcome.updates.push(PanelUpdate::AppendSourceOption(SourceOption {
                    value,
                    label: child.label(),
                }));
            }
        }

        self.initialized = true;
        outcome.updates.push(PanelUpdate::SetFormEnabled(true));
        log::info!(
            "[UpdateRouter] initialized with {} input source(s)",
            self.listed_sources.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn display_payload(luminance: &str) -> Value {
        json!({
            "err_code": 0,
            "err_msg": "",
            "tag": {
                "osdInfo": {
                    "attributeInfos": [
                        {"evcpOpCode": "OP_10_Luminance", "value": luminance},
                        {"evcpOpCode": "OP_60_InputSource", "value": "17"}
                    ],
                    "ddcHelInfo": {
                        "supportList": [
                            {"name": "OP_10_Luminance", "supportChild": []},
                            {"name": "OP_60_InputSource", "supportChild": [
                                {"name": "Normal__DigitalHDMI1", "value": "17"},
                                {"name": "Normal__DisplayPort1", "value": "15"}
                            ]}
                        ]
                    }
                }
            }
        })
    }

    fn appended(outcome: &RouteOutcome) -> Vec<&SourceOption> {
        outcome
            .updates
            .iter()
            .filter_map(|update| match update {
                PanelUpdate::AppendSourceOption(option) => Some(option),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_first_display_payload_initializes() {
        let mut router = UpdateRouter::new();
        let payload = display_payload("42");
        let outcome = router.route(UpdateChannel::DisplayData, &payload);

        assert!(outcome.ok);
        assert!(outcome.errors.is_empty());
        assert!(router.is_initialized());
        assert_eq!(
            outcome.updates,
            vec![
                PanelUpdate::AppendSourceOption(SourceOption {
                    value: "17".to_string(),
                    label: "HDMI1".to_string()
                }),
                PanelUpdate::AppendSourceOption(SourceOption {
                    value: "15".to_string(),
                    label: "DP1".to_string()
                }),
                PanelUpdate::SetFormEnabled(true),
                PanelUpdate::SetBrightness("42".to_string()),
                PanelUpdate::SetInputSource("17".to_string()),
                PanelUpdate::SetOutput(payload.to_string()),
            ]
        );
    }

    #[test]
    fn test_later_payloads_refresh_values_only() {
        let mut router = UpdateRouter::new();
        router.route(UpdateChannel::DisplayData, &display_payload("42"));

        let outcome = router.route(UpdateChannel::DisplayData, &display_payload("70"));
        assert!(appended(&outcome).is_empty());
        assert!(!outcome.updates.contains(&PanelUpdate::SetFormEnabled(true)));
        assert!(outcome.updates.contains(&PanelUpdate::SetBrightness("70".to_string())));
        assert!(router.is_initialized());
    }

    #[test]
    fn test_error_status_only_updates_output() {
        let mut router = UpdateRouter::new();
        let payload = json!({"err_code": 5, "err_msg": "busy", "tag": display_payload("42")["tag"].clone()});

        let outcome = router.route(UpdateChannel::DisplayData, &payload);
        assert!(!outcome.ok);
        assert_eq!(outcome.updates, vec![PanelUpdate::SetOutput(payload.to_string())]);
        assert!(!router.is_initialized());
    }

    #[test]
    fn test_other_channels_only_update_output() {
        let mut router = UpdateRouter::new();
        let payload = display_payload("42");

        let outcome = router.route(UpdateChannel::GameSyncData, &payload);
        assert!(outcome.ok);
        assert_eq!(outcome.updates, vec![PanelUpdate::SetOutput(payload.to_string())]);
    }

    #[test]
    fn test_missing_opcode_is_recoverable() {
        let mut router = UpdateRouter::new();
        let payload = json!({
            "err_code": 0,
            "tag": {"osdInfo": {
                "attributeInfos": [{"evcpOpCode": "OP_10_Luminance", "value": "42"}],
                "ddcHelInfo": {"supportList": [{"name": "OP_10_Luminance", "supportChild": []}]}
            }}
        });

        let outcome = router.route(UpdateChannel::DisplayData, &payload);
        assert!(outcome.updates.contains(&PanelUpdate::SetBrightness("42".to_string())));
        assert!(outcome.updates.contains(&PanelUpdate::SetOutput(payload.to_string())));
        assert_eq!(
            outcome.errors,
            vec![
                PayloadError::MissingSupportEntry("OP_60_InputSource".to_string()),
                PayloadError::MissingAttribute("OP_60_InputSource".to_string()),
            ]
        );
        // Setup did not happen, so the window stays open.
        assert!(!router.is_initialized());
    }

    #[test]
    fn test_malformed_payload_still_reaches_output() {
        let mut router = UpdateRouter::new();
        let payload = json!("garbage");

        let outcome = router.route(UpdateChannel::DisplayData, &payload);
        assert!(!outcome.ok);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.updates, vec![PanelUpdate::SetOutput("\"garbage\"".to_string())]);
    }

    #[test]
    fn test_missing_tag_on_ok_display_payload() {
        let mut router = UpdateRouter::new();
        let outcome = router.route(UpdateChannel::DisplayData, &json!({"err_code": 0}));
        assert_eq!(outcome.errors, vec![PayloadError::MissingTag]);
        assert_eq!(outcome.updates.len(), 1);
    }
}
