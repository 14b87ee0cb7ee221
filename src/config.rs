use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};

/// Runtime settings for a render pass. Every field has a default, so a
/// config file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Letterhead used where a report leaves its identity fields blank
    pub letterhead: Letterhead,
    /// Images wider or taller than this many pixels are downscaled before
    /// embedding; 0 keeps them untouched
    pub max_image_px: u32,
    /// PDF document title; defaults to the event name (single report) or
    /// "Event Reports" (bulk)
    pub document_title: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            letterhead: Letterhead::default(),
            max_image_px: 800,
            document_title: None,
        }
    }
}

impl EngineConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ReportError::ConfigError(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| ReportError::ConfigError(format!("Invalid JSON: {}", e)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Letterhead {
    pub club_name: String,
    pub parent_club: String,
    pub group: String,
    pub rid: String,
    pub club_id: String,
}

impl Default for Letterhead {
    fn default() -> Self {
        Letterhead {
            club_name: "ROTARACT CLUB OF COIMBATORE UNIQUE".to_string(),
            parent_club: "PARENTED BY ROTARY CLUB OF THONDAMUTHUR".to_string(),
            group: "GROUP 1".to_string(),
            rid: "RI DISTRICT : 3206".to_string(),
            club_id: "CLUB ID : 50295".to_string(),
        }
    }
}
