//! Record types for pushed update payloads.
//!
//! Every channel delivers at least `{err_code, err_msg?, tag?}`. Only the
//! display-status channel has a tag this client looks inside; its shape is
//! modelled by [`DisplayTag`] with every level optional so that shape drift
//! surfaces as a [`PayloadError`] rather than a panic.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PayloadError;

/// Status envelope shared by every channel.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct StatusPayload {
    #[serde(default)]
    pub err_code: Option<Value>,
    #[serde(default)]
    pub err_msg: Option<Value>,
    #[serde(default)]
    pub tag: Option<Value>,
}

impl StatusPayload {
    pub fn from_value(value: &Value) -> Result<Self, PayloadError> {
        StatusPayload::deserialize(value).map_err(|e| PayloadError::Malformed(e.to_string()))
    }

    /// A payload is ok when the code is exactly zero and the message is
    /// absent or blank (empty, zero or false). A missing code is not ok.
    pub fn is_ok(&self) -> bool {
        let code_is_zero = self
            .err_code
            .as_ref()
            .and_then(Value::as_f64)
            .is_some_and(|code| code == 0.0);

        code_is_zero && self.err_msg.as_ref().is_none_or(is_blank)
    }

    pub fn display_tag(&self) -> Result<DisplayTag, PayloadError> {
        let tag = self.tag.as_ref().ok_or(PayloadError::MissingTag)?;
        DisplayTag::deserialize(tag).map_err(|e| PayloadError::Malformed(e.to_string()))
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n == 0.0),
        Value::Array(_) | Value::Object(_) => false,
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DisplayTag {
    #[serde(default)]
    pub osd_info: Option<OsdInfo>,
}

impl DisplayTag {
    pub fn osd_info(&self) -> Result<&OsdInfo, PayloadError> {
        self.osd_info.as_ref().ok_or(PayloadError::MissingOsdInfo)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct OsdInfo {
    #[serde(default)]
    pub attribute_infos: Vec<AttributeInfo>,
    #[serde(default)]
    pub ddc_hel_info: Option<DdcHelInfo>,
}

impl OsdInfo {
    /// Current value reported for `opcode`.
    pub fn current(&self, opcode: &str) -> Result<&AttributeInfo, PayloadError> {
        self.attribute_infos
            .iter()
            .find(|info| info.evcp_op_code == opcode)
            .ok_or_else(|| PayloadError::MissingAttribute(opcode.to_string()))
    }

    /// Options the device supports for `opcode`.
    pub fn supported(&self, opcode: &str) -> Result<&[SupportChild], PayloadError> {
        let support = self.ddc_hel_info.as_ref().ok_or(PayloadError::MissingSupportList)?;
        support
            .support_list
            .iter()
            .find(|entry| entry.name == opcode)
            .map(|entry| entry.support_child.as_slice())
            .ok_or_else(|| PayloadError::MissingSupportEntry(opcode.to_string()))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AttributeInfo {
    pub evcp_op_code: String,
    #[serde(default)]
    pub value: Value,
}

impl AttributeInfo {
    pub fn value_text(&self) -> String {
        value_text(&self.value)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DdcHelInfo {
    #[serde(default)]
    pub support_list: Vec<SupportEntry>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SupportEntry {
    pub name: String,
    #[serde(default)]
    pub support_child: Vec<SupportChild>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SupportChild {
    pub name: String,
    #[serde(default)]
    pub value: Value,
}

impl SupportChild {
    /// Human-readable label, falling back to the raw name.
    pub fn label(&self) -> String {
        source_label(&self.name)
            .map(str::to_string)
            .unwrap_or_else(|| self.name.clone())
    }

    pub fn value_text(&self) -> String {
        value_text(&self.value)
    }
}

/// Renders a scalar the way a form control holds it: strings verbatim,
/// numbers and booleans in JSON notation, null as empty.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Short label for an input source name reported by the device.
pub fn source_label(name: &str) -> Option<&'static str> {
    let label = match name {
        "Normal__DisplayPort1" => "DP1",
        "Normal__DisplayPort2" => "DP2",
        "Normal__DigitalHDMI1" => "HDMI1",
        "Normal__DigitalHDMI2" => "HDMI2",
        "Normal__DigitalHDMI3" => "HDMI3",
        "Normal__VGA1" => "VGA1",
        "Normal__DSub" => "DSub",
        "Normal__DVI" => "DVI",
        "Normal__USBC1" => "USBC1",
        "Normal__USBC2" => "USBC2",
        _ => return None,
    };
    Some(label)
}
