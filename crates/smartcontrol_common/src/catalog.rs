//! The fixed table of remote commands the panel can issue.
//!
//! Each [`CatalogEntry`] maps a panel-facing operation name to the hub method
//! it invokes and a list of [`Slot`]s describing how the ordered argument list
//! is built from the caller's values. Shaping is pure: the same arguments
//! always produce the same [`Invocation`].

use std::collections::HashMap;

use serde_json::Value;

use crate::error::CatalogError;
use crate::opcode;

/// One position in a command's outbound argument list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Caller value, sent unchanged.
    Arg(&'static str),
    /// Caller value coerced to `1` or `0`.
    Flag(&'static str),
    /// Caller value serialized to a JSON string.
    Json(&'static str),
    /// Optional caller value; the integer is sent when it is omitted.
    ArgOr(&'static str, i64),
    /// Fixed opcode key, no caller input.
    Key(&'static str),
    /// Fixed integer, no caller input.
    Int(i64),
}

impl Slot {
    /// Name of the caller parameter this slot consumes, if any.
    pub fn param(&self) -> Option<&'static str> {
        match *self {
            Slot::Arg(name) | Slot::Flag(name) | Slot::Json(name) | Slot::ArgOr(name, _) => Some(name),
            Slot::Key(_) | Slot::Int(_) => None,
        }
    }

    fn is_optional(&self) -> bool {
        matches!(self, Slot::ArgOr(..))
    }
}

/// A command ready to be handed to the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub target: String,
    pub arguments: Vec<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub target: &'static str,
    pub slots: &'static [Slot],
}

impl CatalogEntry {
    pub const fn new(name: &'static str, target: &'static str, slots: &'static [Slot]) -> Self {
        Self { name, target, slots }
    }

    /// Caller parameters in positional order.
    pub fn params(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.slots.iter().filter_map(Slot::param)
    }

    /// Inclusive range of accepted caller argument counts.
    pub fn arity(&self) -> (usize, usize) {
        let max = self.params().count();
        let optional = self.slots.iter().filter(|slot| slot.is_optional()).count();
        (max - optional, max)
    }

    /// Builds the outbound argument list from the caller's values.
    pub fn shape(&self, args: &[Value]) -> Result<Invocation, CatalogError> {
        let (min, max) = self.arity();
        if args.len() < min || args.len() > max {
            return Err(CatalogError::Arity {
                name: self.name,
                min,
                max,
                given: args.len(),
            });
        }

        let mut supplied = args.iter();
        let arguments = self
            .slots
            .iter()
            .map(|slot| match *slot {
                Slot::Arg(_) => supplied.next().cloned().unwrap_or(Value::Null),
                Slot::Flag(_) => Value::from(u8::from(supplied.next().is_some_and(truthy))),
                Slot::Json(_) => Value::String(supplied.next().unwrap_or(&Value::Null).to_string()),
                Slot::ArgOr(_, default) => supplied.next().cloned().unwrap_or(Value::from(default)),
                Slot::Key(key) => Value::from(key),
                Slot::Int(n) => Value::from(n),
            })
            .collect();

        Ok(Invocation {
            target: self.target.to_string(),
            arguments,
        })
    }
}

/// Truthiness of a UI value when a boolean is expected.
///
/// Form controls hand over text, so `""`, `"0"`, `"false"` and `"off"` count
/// as false alongside JSON `false`, `null` and zero.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !matches!(s.trim().to_ascii_lowercase().as_str(), "" | "0" | "false" | "off"),
        Value::Array(_) | Value::Object(_) => true,
    }
}

use Slot::*;

/// Shared remote method of the "set setting" family; the opcode key in front
/// of the value selects the setting.
const SET_OSD: &str = "SetOSD";

const VALUE: &[Slot] = &[Arg("value")];
const FLAG: &[Slot] = &[Flag("value")];

/// All commands known to the panel.
pub static STANDARD_ENTRIES: &[CatalogEntry] = &[
    CatalogEntry::new("systemStart", "start", &[]),
    CatalogEntry::new("rescan", "Rescan", &[]),
    CatalogEntry::new("getDisplayData", "GetDisplayData", &[]),
    CatalogEntry::new("getGameSyncData", "GetGameSyncData2", &[]),
    CatalogEntry::new("setMontiorMode", "SetMonitorMode", VALUE),
    CatalogEntry::new("checkUpstreamCable", "CheckUpstreamCable", &[]),
    CatalogEntry::new("getMonitorConnectedCount", "GetMonitorCount", &[]),
    CatalogEntry::new("getFirmwareData", "GetDeviceList", &[]),
    CatalogEntry::new("installDriver", "InstallDriver", &[Arg("type"), Arg("path")]),
    CatalogEntry::new(
        "updateFirmware",
        "UpdateFirmware",
        &[Arg("modelName"), Arg("deviceType"), Arg("binPath")],
    ),
    // remote control
    CatalogEntry::new("getDeviceBodyData", "GetRemoteControlDeviceBodyData", &[]),
    CatalogEntry::new("getSupportData", "GetRemoteControlSupportData", &[]),
    CatalogEntry::new("getConfigData", "GetRemoteControlConfigData", &[]),
    CatalogEntry::new("setOsdBatch", "SetOSDs", &[Arg("data")]),
    // picture
    CatalogEntry::new("setPictureFormat", SET_OSD, &[Key(opcode::DISPLAY_SCALING), Arg("value")]),
    CatalogEntry::new("setBrightness", SET_OSD, &[Key(opcode::LUMINANCE), Arg("value")]),
    CatalogEntry::new("setContrast", SET_OSD, &[Key(opcode::CONTRAST), Arg("value")]),
    CatalogEntry::new(
        "setResolutionNotify",
        SET_OSD,
        &[Key(opcode::RESOLUTION_NOTIFIER), Arg("value")],
    ),
    CatalogEntry::new("setResolution", "SetResolution", VALUE),
    CatalogEntry::new("setInputSource", "InputsourceChange", &[Arg("value"), Int(-1)]),
    CatalogEntry::new("setInputSourceAutoEnable", SET_OSD, &[Key(opcode::INPUT_AUTO), Flag("value")]),
    CatalogEntry::new("setPIPPBP", "SetPIPPBP", &[Arg("data")]),
    CatalogEntry::new("swapPippbp", "PIPPBPSwap", &[]),
    // color
    CatalogEntry::new(
        "setColorTemperature",
        SET_OSD,
        &[Key(opcode::SELECT_COLOR_PRESET), Arg("value")],
    ),
    CatalogEntry::new("setColorTemperatureRed", SET_OSD, &[Key(opcode::VIDEO_GAIN_RED), Arg("value")]),
    CatalogEntry::new(
        "setColorTemperatureGreen",
        SET_OSD,
        &[Key(opcode::VIDEO_GAIN_GREEN), Arg("value")],
    ),
    CatalogEntry::new("setColorTemperatureBlue", SET_OSD, &[Key(opcode::VIDEO_GAIN_BLUE), Arg("value")]),
    CatalogEntry::new("setBlackLevel", SET_OSD, &[Key(opcode::BLACK_LEVEL), Arg("value")]),
    CatalogEntry::new("setGamma", SET_OSD, &[Key(opcode::GAMMA), Arg("value")]),
    CatalogEntry::new("setSamrtImage", SET_OSD, &[Key(opcode::DISPLAY_APPLICATION), Arg("value")]),
    CatalogEntry::new("gameSyncStart", "GameSyncStart", FLAG),
    CatalogEntry::new("processGameSyncStart", "GameModeStart", &[Arg("processName")]),
    CatalogEntry::new("setProcessGameSync", "GameModeSet2", &[Arg("path"), ArgOr("mode", -1)]),
    CatalogEntry::new("removeProcessGameSync", "GameSyncRemove2", &[Arg("path")]),
    // setting
    CatalogEntry::new("monitorChange", "MonitorChange", &[Arg("name")]),
    CatalogEntry::new("setAudioMute", SET_OSD, &[Key(opcode::AUDIO_MUTE), Arg("value")]),
    CatalogEntry::new("setAudio", SET_OSD, &[Key(opcode::AUDIO_SPEAKER_VOLUME), Arg("value")]),
    CatalogEntry::new("readOSD", "ReadOSD", &[Key(opcode::SCREEN_ORIENTATION)]),
    CatalogEntry::new("setOrientation", "SetOrientation", VALUE),
    CatalogEntry::new("restoreFactoryDefaults", "RestoreFactoryDefaults", &[Arg("displayName")]),
    // power
    CatalogEntry::new("setEcoMode", "SetECOModeData", &[Arg("data")]),
    CatalogEntry::new("setActivationTimer", "SetActivationTimer", FLAG),
    CatalogEntry::new("setStandbyTimer", "SetStandbyTimer", VALUE),
    CatalogEntry::new("setShutdownTimer", "SetShutdownTimer", VALUE),
    CatalogEntry::new("setActivationShutdown", "SetActivationShutdown", FLAG),
    CatalogEntry::new("setHourMinute", "SetHourMinute", VALUE),
    CatalogEntry::new("setDayOfWeeks", "SetDayOfWeeks", &[Json("days")]),
    CatalogEntry::new("standby", "ImmediateStandby", &[]),
    CatalogEntry::new("powerOff", "ImmediatePowerOff", &[]),
    CatalogEntry::new("setPowerLed", SET_OSD, &[Key(opcode::POWER_LED), Arg("value")]),
    // other
    CatalogEntry::new("setOsdLanguage", SET_OSD, &[Key(opcode::OSD_LANGUAGE), Arg("value")]),
    CatalogEntry::new("splitScreenInit", "SplitScreenIni", &[]),
    CatalogEntry::new("getSplitScreenData", "GetSplitScreenId", &[]),
    CatalogEntry::new("setSplitScreen", "SetSplitScreen", &[Arg("displayName"), Arg("value")]),
    CatalogEntry::new("splitScreenExit", "ExitScreen", &[]),
];

/// Validated lookup over a table of [`CatalogEntry`]s.
///
/// Built once at startup; a duplicate name or a required slot following an
/// optional one is rejected here rather than discovered on first use.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: &'static [CatalogEntry],
    index: HashMap<&'static str, usize>,
}

impl Catalog {
    pub fn new(entries: &'static [CatalogEntry]) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(entries.len());

        for (position, entry) in entries.iter().enumerate() {
            let first_optional = entry.slots.iter().position(Slot::is_optional);
            if let Some(first_optional) = first_optional {
                let required_after = entry.slots[first_optional..]
                    .iter()
                    .any(|slot| slot.param().is_some() && !slot.is_optional());
                if required_after {
                    return Err(CatalogError::SlotOrder(entry.name));
                }
            }

            if index.insert(entry.name, position).is_some() {
                return Err(CatalogError::Duplicate(entry.name));
            }
        }

        Ok(Self { entries, index })
    }

    /// The panel's command table.
    pub fn standard() -> Result<Self, CatalogError> {
        Self::new(STANDARD_ENTRIES)
    }

    pub fn lookup(&self, name: &str) -> Result<&'static CatalogEntry, CatalogError> {
        let entries = self.entries;
        self.index
            .get(name)
            .map(|&position| &entries[position])
            .ok_or_else(|| CatalogError::UnknownCommand(name.to_string()))
    }

    /// Looks up `name` and shapes `args` in one step.
    pub fn invocation(&self, name: &str, args: &[Value]) -> Result<Invocation, CatalogError> {
        self.lookup(name)?.shape(args)
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &'static [CatalogEntry] {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
