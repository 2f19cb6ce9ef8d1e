use serde::{Deserialize, Serialize};

use crate::aba::{FileOptions, LineEnding, TextPolicy};

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub originator: Originator,
    #[serde(default)]
    pub file: FileSettings,
}

/// The remitting organisation's own bank identity
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Originator {
    pub name: String,
    pub routing_code: String,
    pub account_number: String,
    /// Header description, also the fallback lodgement reference
    #[serde(default)]
    pub description: String,
    /// Financial institution mnemonic (e.g., CBA, WBC)
    #[serde(default)]
    pub institution: Option<String>,
    /// APCA user identification number
    #[serde(default)]
    pub user_id: Option<u32>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct FileSettings {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default)]
    pub line_ending: LineEnding,
    #[serde(default)]
    pub uppercase: bool,
    #[serde(default = "default_ascii_only")]
    pub ascii_only: bool,
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_ascii_only() -> bool {
    true
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            line_ending: LineEnding::default(),
            uppercase: false,
            ascii_only: default_ascii_only(),
        }
    }
}

impl FileSettings {
    pub fn options(&self) -> FileOptions {
        FileOptions {
            line_ending: self.line_ending,
            text: TextPolicy {
                uppercase: self.uppercase,
                ascii_only: self.ascii_only,
            },
        }
    }
}
