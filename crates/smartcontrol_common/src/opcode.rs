//! Opcode keys selecting a device setting inside the generic OSD commands
//! and the display-status payload.

pub const DISPLAY_SCALING: &str = "OP_86_DisplayScaling";
pub const LUMINANCE: &str = "OP_10_Luminance";
pub const CONTRAST: &str = "OP_12_Contrast";
pub const RESOLUTION_NOTIFIER: &str = "OP_E9_ResolutionNotifier";
pub const INPUT_SOURCE: &str = "OP_60_InputSource";
pub const INPUT_AUTO: &str = "OP_ED_InputAuto";
pub const SELECT_COLOR_PRESET: &str = "OP_14_SelectColorPreset";
pub const VIDEO_GAIN_RED: &str = "OP_16_VideoGainDriveRed";
pub const VIDEO_GAIN_GREEN: &str = "OP_18_VideoGainDriveGreen";
pub const VIDEO_GAIN_BLUE: &str = "OP_1A_VideoGainDriveBlue";
pub const BLACK_LEVEL: &str = "OP_92_TVBlackLevelLuminance";
pub const GAMMA: &str = "OP_72_Gamma";
pub const DISPLAY_APPLICATION: &str = "OP_DC_DisplayApplication";
pub const AUDIO_MUTE: &str = "OP_8D_AudioMute";
pub const AUDIO_SPEAKER_VOLUME: &str = "OP_62_AudioSpeakerVolume";
pub const SCREEN_ORIENTATION: &str = "OP_AA_ScreenOrientation";
pub const POWER_LED: &str = "OP_F2_PowerLED";
pub const OSD_LANGUAGE: &str = "OP_CC_OSDLanguage";
