//! Zoom levels offered by the viewer toolbar
//!
//! Zoom is a closed set of discrete levels rather than a free factor, so
//! every scale the viewer can reach is one of [`ZoomLevel::ALL`].

use serde::{Deserialize, Serialize};

/// Discrete zoom level for page rendering
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum ZoomLevel {
    /// 100%
    #[default]
    Actual,
    /// 150%
    OneAndHalf,
    /// 200%
    Double,
    /// 250%
    DoubleAndHalf,
}

impl ZoomLevel {
    /// Every level in menu order
    pub const ALL: [ZoomLevel; 4] = [
        ZoomLevel::Actual,
        ZoomLevel::OneAndHalf,
        ZoomLevel::Double,
        ZoomLevel::DoubleAndHalf,
    ];

    /// Multiplier applied to the page width (1.0 = 100%)
    #[must_use]
    pub const fn factor(self) -> f32 {
        match self {
            Self::Actual => 1.0,
            Self::OneAndHalf => 1.5,
            Self::Double => 2.0,
            Self::DoubleAndHalf => 2.5,
        }
    }

    #[must_use]
    pub const fn percent(self) -> u16 {
        match self {
            Self::Actual => 100,
            Self::OneAndHalf => 150,
            Self::Double => 200,
            Self::DoubleAndHalf => 250,
        }
    }

    #[must_use]
    pub fn from_percent(percent: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.percent() == percent)
    }

    /// Position of this level in [`ZoomLevel::ALL`]
    #[must_use]
    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|level| *level == self)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn label(self) -> String {
        format!("{}%", self.percent())
    }

    /// Width in pixels for a container of `base_width_px` at this level
    #[must_use]
    pub fn scaled_width(self, base_width_px: u32) -> u32 {
        ((base_width_px as f32) * self.factor()).round().max(1.0) as u32
    }
}

impl TryFrom<u16> for ZoomLevel {
    type Error = String;

    fn try_from(percent: u16) -> Result<Self, Self::Error> {
        Self::from_percent(percent).ok_or_else(|| {
            format!("unsupported zoom {percent}%, expected one of 100, 150, 200, 250")
        })
    }
}

impl From<ZoomLevel> for u16 {
    fn from(level: ZoomLevel) -> Self {
        level.percent()
    }
}

impl std::fmt::Display for ZoomLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factors_are_the_four_menu_values() {
        let factors: Vec<f32> = ZoomLevel::ALL.iter().map(|z| z.factor()).collect();
        assert_eq!(factors, vec![1.0, 1.5, 2.0, 2.5]);
    }

    #[test]
    fn percent_round_trips_for_menu_values_only() {
        assert_eq!(ZoomLevel::from_percent(150), Some(ZoomLevel::OneAndHalf));
        assert_eq!(ZoomLevel::from_percent(125), None);
        assert!(ZoomLevel::try_from(300).is_err());
    }

    #[test]
    fn scaled_width_rounds_and_never_hits_zero() {
        assert_eq!(ZoomLevel::OneAndHalf.scaled_width(81), 122);
        assert_eq!(ZoomLevel::Actual.scaled_width(0), 1);
    }

    #[test]
    fn deserializes_from_percent_number() {
        let level: ZoomLevel = serde_yaml::from_str("200").unwrap();
        assert_eq!(level, ZoomLevel::Double);
        assert!(serde_yaml::from_str::<ZoomLevel>("120").is_err());
    }
}
