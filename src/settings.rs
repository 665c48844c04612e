//! Collision tolerances
//!
//! Loaded from JSON alongside a scene; missing fields fall back to the
//! defaults in [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::{LINE_THICKNESS, PARALLEL_EPSILON, POINT_EPSILON};
use crate::error::GeometryResult;

/// Tolerance preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TolerancePreset {
    /// Exact arithmetic, lines have no thickness
    Exact,
    #[default]
    Pixel,
    /// Generous thresholds for coarse or jittery input
    Loose,
}

impl TolerancePreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            TolerancePreset::Exact => "Exact",
            TolerancePreset::Pixel => "Pixel",
            TolerancePreset::Loose => "Loose",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "exact" => Some(TolerancePreset::Exact),
            "pixel" | "px" => Some(TolerancePreset::Pixel),
            "loose" => Some(TolerancePreset::Loose),
            _ => None,
        }
    }
}

/// Numeric thresholds used by the collision tests
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    /// Max distance for two points to count as the same point
    pub point_epsilon: f32,
    /// Distance from a line within which points and endpoints touch it
    pub line_thickness: f32,
    /// |cross| at or below this treats two segments as parallel
    pub parallel_epsilon: f32,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            point_epsilon: POINT_EPSILON,
            line_thickness: LINE_THICKNESS,
            parallel_epsilon: PARALLEL_EPSILON,
        }
    }
}

impl Tolerances {
    pub fn from_preset(preset: TolerancePreset) -> Self {
        match preset {
            TolerancePreset::Exact => Self {
                point_epsilon: f32::EPSILON,
                line_thickness: 0.0,
                parallel_epsilon: PARALLEL_EPSILON,
            },
            TolerancePreset::Pixel => Self::default(),
            TolerancePreset::Loose => Self {
                point_epsilon: 0.5,
                line_thickness: 1.0,
                parallel_epsilon: 1e-3,
            },
        }
    }

    pub fn from_json(json: &str) -> GeometryResult<Self> {
        let tolerances = serde_json::from_str(json)?;
        log::debug!("Loaded tolerances: {:?}", tolerances);
        Ok(tolerances)
    }

    pub fn to_json(&self) -> GeometryResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_names() {
        for preset in [
            TolerancePreset::Exact,
            TolerancePreset::Pixel,
            TolerancePreset::Loose,
        ] {
            assert_eq!(TolerancePreset::from_str(preset.as_str()), Some(preset));
        }
        assert_eq!(TolerancePreset::from_str("PX"), Some(TolerancePreset::Pixel));
        assert_eq!(TolerancePreset::from_str("fuzzy"), None);
        assert_eq!(TolerancePreset::default(), TolerancePreset::Pixel);
    }

    #[test]
    fn test_pixel_preset_is_default() {
        assert_eq!(
            Tolerances::from_preset(TolerancePreset::Pixel),
            Tolerances::default()
        );
        assert_eq!(Tolerances::default().line_thickness, LINE_THICKNESS);
    }

    #[test]
    fn test_presets_are_ordered() {
        let exact = Tolerances::from_preset(TolerancePreset::Exact);
        let pixel = Tolerances::default();
        let loose = Tolerances::from_preset(TolerancePreset::Loose);
        assert!(exact.line_thickness < pixel.line_thickness);
        assert!(pixel.line_thickness < loose.line_thickness);
        assert!(exact.point_epsilon < loose.point_epsilon);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let tol = Tolerances::from_json(r#"{ "line_thickness": 2.0 }"#).unwrap();
        assert_eq!(tol.line_thickness, 2.0);
        assert_eq!(tol.point_epsilon, POINT_EPSILON);
        assert_eq!(tol.parallel_epsilon, PARALLEL_EPSILON);

        let empty = Tolerances::from_json("{}").unwrap();
        assert_eq!(empty, Tolerances::default());
    }

    #[test]
    fn test_json_save_and_load() {
        let loose = Tolerances::from_preset(TolerancePreset::Loose);
        let json = loose.to_json().unwrap();
        assert_eq!(Tolerances::from_json(&json).unwrap(), loose);
        assert!(Tolerances::from_json("not json").is_err());
    }
}
