pub mod actions;
pub mod key;
pub mod keybindings;
pub mod loader;
pub mod resolver;

pub use actions::*;
use keybindings::KeybindingsConfig;
pub use loader::load;
pub use resolver::KeyResolver;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: "Catppuccin Mocha".to_string(),
        }
    }
}

/// Modal behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalConfig {
    /// Logical identifier shared by every open of the application form.
    pub storage_key: String,
    /// Remember scroll position and last focused field between opens.
    pub restore_state: bool,
    /// Ticks a closing modal stays on screen before it is unmounted.
    pub exit_transition_ticks: u8,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            storage_key: "application-form".to_string(),
            restore_state: true,
            exit_transition_ticks: 2,
        }
    }
}

impl ModalConfig {
    /// Storage key to hand to the accessibility controller, if restoring is enabled.
    pub fn effective_storage_key(&self) -> Option<String> {
        self.restore_state.then(|| self.storage_key.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub modal: ModalConfig,
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}
