//! Swipe configuration
//!
//! A `SwipeConfig` is an explicit value handed to each row at construction.
//! It can be persisted as YAML (default location
//! `~/.config/swipe-reveal/config.yaml`); every field has a serde default so
//! partial files are valid.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::transition::{Transition, TransitionCurve};

/// How action items are exposed while the row is dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutEffect {
    /// The visible area is divided between all items, which grow together
    Border,
    /// Items are dragged in as a block attached to the row content
    Drag,
    /// Items sit behind the content, pinned to the row edge
    #[default]
    Static,
}

/// Corner radius applied by the host to panels and items
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CornerRadius {
    Custom(f32),
    /// Half the row height
    Round,
}

impl Default for CornerRadius {
    fn default() -> Self {
        CornerRadius::Custom(0.0)
    }
}

impl CornerRadius {
    pub fn resolve(&self, height: f32) -> f32 {
        match *self {
            CornerRadius::Custom(radius) => radius,
            CornerRadius::Round => height / 2.0,
        }
    }
}

/// Empirical interaction constants
///
/// UX tuning values; hosts may adjust them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Release speed (points/s) below which the decision is position based
    pub release_velocity_threshold: f32,
    /// Extra drag beyond the panel width that triggers a full swipe (≤ 2 actions)
    pub expand_trigger_few: f32,
    /// Same as `expand_trigger_few` for edges with more than two actions
    pub expand_trigger_many: f32,
    /// Travel (points) before the direction lock decides
    pub direction_slop: f32,
    /// Dominance ratio between the two axes for the direction lock
    pub direction_ratio: f32,
    /// Exponent applied to drags toward an edge without actions
    pub attenuation_exponent: f32,
    /// Bound on the relative initial velocity handed to settle springs
    pub max_spring_velocity: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            release_velocity_threshold: 100.0,
            expand_trigger_few: 60.0,
            expand_trigger_many: 40.0,
            direction_slop: 4.0,
            direction_ratio: 2.5,
            attenuation_exponent: 0.7,
            max_spring_velocity: 10.0,
        }
    }
}

/// Configuration snapshot for a swipe row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwipeConfig {
    /// Whether a full swipe automatically performs the edge-most action
    pub allows_full_swipe: bool,
    pub layout_effect: LayoutEffect,
    /// Spacing between adjacent action items
    pub item_spacing: f32,
    /// Gap between the row content and the revealed panel
    pub edge_gap: f32,
    pub rubber_band_enabled: bool,
    /// Exponent in (0, 1); larger values resist less
    pub rubber_band_factor: f32,
    pub corner_radius: CornerRadius,
    pub transition_duration_ms: u64,
    pub transition_curve: TransitionCurve,
    /// Close other rows in the same group when this one starts opening
    pub close_others_on_open: bool,
    /// Ask the host for haptic feedback when a full swipe arms
    pub feedback_enabled: bool,
    pub tuning: Tuning,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            allows_full_swipe: true,
            layout_effect: LayoutEffect::Static,
            item_spacing: 0.0,
            edge_gap: 0.0,
            rubber_band_enabled: true,
            rubber_band_factor: 0.9,
            corner_radius: CornerRadius::default(),
            transition_duration_ms: 300,
            transition_curve: TransitionCurve::EaseInOut,
            close_others_on_open: true,
            feedback_enabled: true,
            tuning: Tuning::default(),
        }
    }
}

impl SwipeConfig {
    pub fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.transition_duration_ms)
    }

    /// The transition used for programmatic opens/closes and outcome settles
    pub fn default_transition(&self) -> Transition {
        Transition::Animated {
            duration: self.transition_duration(),
            curve: self.transition_curve,
        }
    }

    /// Distance beyond the preferred panel width that arms a full swipe
    pub fn expanded_trigger_offset(&self, action_count: usize) -> f32 {
        if !self.allows_full_swipe {
            0.0
        } else if action_count > 2 {
            self.tuning.expand_trigger_many
        } else {
            self.tuning.expand_trigger_few
        }
    }

    /// Load config from the default location, or defaults if unavailable
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from `path`, falling back to defaults on any failure
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(config) => {
                    tracing::info!("Loaded swipe config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self, String> {
        let config: SwipeConfig =
            serde_yaml::from_str(content).map_err(|e| format!("Invalid config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the interaction math cannot work with
    pub fn validate(&self) -> Result<(), String> {
        if !(self.rubber_band_factor > 0.0 && self.rubber_band_factor < 1.0) {
            return Err(format!(
                "rubber_band_factor must be in (0, 1), got {}",
                self.rubber_band_factor
            ));
        }
        if self.item_spacing < 0.0 || self.edge_gap < 0.0 {
            return Err("item_spacing and edge_gap must not be negative".to_string());
        }
        Ok(())
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    /// Save config to `path`, creating the parent directory if needed
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved swipe config to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expanded_trigger_offset() {
        let config = SwipeConfig::default();
        assert_eq!(config.expanded_trigger_offset(1), 60.0);
        assert_eq!(config.expanded_trigger_offset(2), 60.0);
        assert_eq!(config.expanded_trigger_offset(3), 40.0);

        let config = SwipeConfig {
            allows_full_swipe: false,
            ..SwipeConfig::default()
        };
        assert_eq!(config.expanded_trigger_offset(3), 0.0);
    }

    #[test]
    fn test_round_corner_radius() {
        assert_eq!(CornerRadius::Round.resolve(44.0), 22.0);
        assert_eq!(CornerRadius::Custom(8.0).resolve(44.0), 8.0);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = SwipeConfig::from_yaml("layout_effect: border\nedge_gap: 5\n").unwrap();
        assert_eq!(config.layout_effect, LayoutEffect::Border);
        assert_eq!(config.edge_gap, 5.0);
        assert!(config.allows_full_swipe);
        assert_eq!(config.tuning.release_velocity_threshold, 100.0);
    }

    #[test]
    fn test_invalid_rubber_band_factor_rejected() {
        let err = SwipeConfig::from_yaml("rubber_band_factor: 1.5\n").unwrap_err();
        assert!(err.contains("rubber_band_factor"));
    }
}
