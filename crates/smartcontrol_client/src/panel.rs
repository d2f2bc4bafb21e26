use serde::{Deserialize, Serialize};

/// One entry of the input source selector.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SourceOption {
    pub value: String,
    pub label: String,
}

/// A single change to the controller form.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelUpdate {
    SetBrightness(String),
    SetInputSource(String),
    AppendSourceOption(SourceOption),
    SetFormEnabled(bool),
    /// Raw text shown in the output area.
    SetOutput(String),
}

/// What the controller form currently shows.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct PanelState {
    pub brightness: String,
    pub input_source: String,
    pub source_options: Vec<SourceOption>,
    pub form_enabled: bool,
    pub output: String,
}

impl PanelState {
    /// Applies one update. Later values overwrite earlier ones; an option
    /// whose value is already listed is not appended again.
    pub fn apply(&mut self, update: PanelUpdate) {
        match update {
            PanelUpdate::SetBrightness(value) => self.brightness = value,
            PanelUpdate::SetInputSource(value) => self.input_source = value,
            PanelUpdate::AppendSourceOption(option) => {
                if !self.source_options.iter().any(|existing| existing.value == option.value) {
                    self.source_options.push(option);
                }
            }
            PanelUpdate::SetFormEnabled(enabled) => self.form_enabled = enabled,
            PanelUpdate::SetOutput(text) => self.output = text,
        }
    }

    pub fn apply_all(&mut self, updates: impl IntoIterator<Item = PanelUpdate>) {
        for update in updates {
            self.apply(update);
        }
    }
}
