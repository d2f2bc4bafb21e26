use std::fmt;
use std::str::FromStr;

use crate::error::ProtocolError;

macro_rules! update_channels {
    ($($variant:ident),+ $(,)?) => {
        /// A named stream of pushed payloads from the hub.
        ///
        /// The set is closed: the client registers a handler for every variant
        /// at startup and ignores pushes on any other target.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum UpdateChannel {
            $($variant),+
        }

        impl UpdateChannel {
            pub const ALL: &'static [UpdateChannel] = &[$(UpdateChannel::$variant),+];

            /// The hub method name the channel is pushed on.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(UpdateChannel::$variant => stringify!($variant)),+
                }
            }
        }

        impl FromStr for UpdateChannel {
            type Err = ProtocolError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($variant) => Ok(UpdateChannel::$variant),)+
                    other => Err(ProtocolError::UnknownChannel(other.to_string())),
                }
            }
        }
    };
}

update_channels! {
    DisplayData,
    GameSyncData,
    OSDAttributeData,
    SystemData,
    ECOModeData,
    PackageMessageData,
    PIPPBPData,
    SplitScreenIni,
    GetSplitScreenId,
    ExitScreen,
    RemoteControlDeviceBodyData,
    RemoteControlSupportData,
    RemoteControlConfigData,
    FirmwareUpdateProgressData,
    FirmwareData,
    AutoSourceEnable,
    GetFancyZonesVersion,
    StartFancyZonesEditor,
    EnableFancyZones,
    GameSyncData2,
    UpdateFirmware,
    FancyZonesData,
    NotifyPIPPBPData,
    CheckUpstreamCable,
    GetMonitorCount,
    GetDeviceList,
    InstallDriver,
}

impl UpdateChannel {
    /// The display-status channel whose tag feeds the bound form fields.
    pub const PRIMARY: UpdateChannel = UpdateChannel::DisplayData;

    pub fn is_primary(&self) -> bool {
        *self == Self::PRIMARY
    }
}

impl fmt::Display for UpdateChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_channel_set_is_closed_and_unique() {
        assert_eq!(UpdateChannel::ALL.len(), 27);
        let names: HashSet<&str> = UpdateChannel::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(names.len(), 27);
    }

    #[test]
    fn test_names_parse_back() {
        for channel in UpdateChannel::ALL {
            assert_eq!(channel.as_str().parse::<UpdateChannel>(), Ok(*channel));
        }
        assert_eq!(
            "Unknown".parse::<UpdateChannel>(),
            Err(ProtocolError::UnknownChannel("Unknown".to_string()))
        );
    }

    #[test]
    fn test_primary_channel() {
        assert!(UpdateChannel::DisplayData.is_primary());
        assert!(!UpdateChannel::GameSyncData.is_primary());
    }
}
