//! Editor configuration

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::StudioError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Pointer travel before a press on a handle becomes a drag.
    #[serde(default = "default_activation_distance")]
    pub activation_distance: f32,
    /// Distance one arrow key press moves a keyboard drag.
    #[serde(default = "default_keyboard_step")]
    pub keyboard_step: f32,
    /// Width of the document's content column; the drag overlay uses it.
    #[serde(default = "default_content_width")]
    pub content_width: u32,
    #[serde(default = "default_overlay_scale")]
    pub overlay_scale: f32,
    #[serde(default = "default_drop_animation_ms")]
    pub drop_animation_ms: u64,
    #[serde(default)]
    pub failure_mode: FailureMode,
}

fn default_activation_distance() -> f32 { 8.0 }
fn default_keyboard_step() -> f32 { 25.0 }
fn default_content_width() -> u32 { 600 }
fn default_overlay_scale() -> f32 { 1.02 }
fn default_drop_animation_ms() -> u64 { 200 }

/// How validation violations translate into a verdict.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    #[default]
    Block,
    Warn,
    Log,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            activation_distance: default_activation_distance(),
            keyboard_step: default_keyboard_step(),
            content_width: default_content_width(),
            overlay_scale: default_overlay_scale(),
            drop_animation_ms: default_drop_animation_ms(),
            failure_mode: FailureMode::default(),
        }
    }
}

impl EditorConfig {
    pub fn load(path: &Path) -> Result<Self, StudioError> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        tracing::debug!(path = %path.display(), ?config, "loaded editor config");
        Ok(config)
    }

    pub fn drop_animation(&self) -> Duration {
        Duration::from_millis(self.drop_animation_ms)
    }
}
