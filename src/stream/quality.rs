//! Quality levels and audio tracks as the player sees them.

use super::engine::{EngineLevel, AUTO_LEVEL};

/// A selectable quality level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityLevel {
    pub label: String,
    pub short_label: String,
    /// Engine level index; [`AUTO_LEVEL`] only for the auto sentinel.
    pub index: i32,
    pub width: u32,
    pub height: u32,
    pub is_auto: bool,
}

impl QualityLevel {
    /// The adaptive-selection sentinel. Not a measured rendition.
    pub fn auto() -> Self {
        Self {
            label: "auto".to_string(),
            short_label: "auto".to_string(),
            index: AUTO_LEVEL,
            width: 1,
            height: 1,
            is_auto: true,
        }
    }

    /// Build a concrete level from the engine's `index`-th rendition.
    pub fn from_engine(index: usize, level: &EngineLevel) -> Self {
        let index = i32::try_from(index).unwrap_or(i32::MAX);
        Self {
            label: format!("{}x{}", level.width, level.height),
            short_label: format!("{}p", level.height),
            index,
            width: level.width,
            height: level.height,
            is_auto: false,
        }
    }
}

/// An audio track reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioTrack {
    pub id: String,
    pub label: String,
    pub language: Option<String>,
    pub selected: bool,
}

impl AudioTrack {
    pub fn new(id: impl Into<String>, label: impl Into<String>, selected: bool) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            language: None,
            selected,
        }
    }

    /// The single implicit track of a natively played stream.
    pub fn implicit() -> Self {
        Self::new("default", "default", true)
    }
}

/// Auto sentinel followed by the engine's renditions in engine order.
pub fn quality_levels(levels: &[EngineLevel]) -> Vec<QualityLevel> {
    std::iter::once(QualityLevel::auto())
        .chain(
            levels
                .iter()
                .enumerate()
                .map(|(i, level)| QualityLevel::from_engine(i, level)),
        )
        .collect()
}
