//! Per-renderer options. Unspecified keys fall back to the documented defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::format::LocalizedText;
use crate::projection::GeoPoint;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse chart config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be a positive number, got {value}"),
        })
    }
}

fn headroom(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be at least 1 so the maximum stays on the axis, got {value}"),
        })
    }
}

fn fraction(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be within 0..=1, got {value}"),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BarConfig {
    pub width: f64,
    pub height: f64,
    pub x_axis_annotation_height: f64,
    pub y_axis_annotation_width: f64,
    pub y_axis_max_factor: f64,
    pub x_axis_padding: f64,
    pub y_axis_tick_count: usize,
    pub x_axis_label_rotation: f64,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: (1280 * 9 / 21) as f64,
            x_axis_annotation_height: 50.0,
            y_axis_annotation_width: 75.0,
            y_axis_max_factor: 1.1,
            x_axis_padding: 0.2,
            y_axis_tick_count: 10,
            x_axis_label_rotation: -45.0,
        }
    }
}

impl BarConfig {
    pub fn plot_width(&self) -> f64 {
        self.width - 2.0 * self.y_axis_annotation_width
    }

    pub fn plot_height(&self) -> f64 {
        self.height - 2.0 * self.x_axis_annotation_height
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("width", self.width)?;
        positive("height", self.height)?;
        positive("plotWidth", self.plot_width())?;
        positive("plotHeight", self.plot_height())?;
        headroom("yAxisMaxFactor", self.y_axis_max_factor)?;
        fraction("xAxisPadding", self.x_axis_padding)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BubbleMapConfig {
    pub width: f64,
    pub height: f64,
    pub center: GeoPoint,
    pub scale: f64,
    pub min_marker_size: f64,
    pub marker_domain: (f64, f64),
    pub marker_range: (f64, f64),
    pub marker_exponent: f64,
    /// Density is reported per this many inhabitants.
    pub density_base: f64,
    /// Maximum density below which the fine three-bucket palette is used.
    pub fine_palette_below: f64,
    pub country_name: LocalizedText,
}

impl Default for BubbleMapConfig {
    fn default() -> Self {
        Self {
            width: 1440.0,
            height: 650.0,
            center: GeoPoint { lon: 35.3, lat: 39.0 },
            scale: 4200.0,
            min_marker_size: 2.0,
            marker_domain: (1.0, 100_000.0),
            marker_range: (1.0, 50.0),
            marker_exponent: 0.2,
            density_base: 1_000_000.0,
            fine_palette_below: 100.0,
            country_name: LocalizedText::new("Turkey", "Türkiye"),
        }
    }
}

impl BubbleMapConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("width", self.width)?;
        positive("height", self.height)?;
        positive("scale", self.scale)?;
        positive("markerExponent", self.marker_exponent)?;
        positive("densityBase", self.density_base)?;
        if self.min_marker_size < 0.0 {
            return Err(ConfigError::Invalid {
                field: "minMarkerSize",
                reason: "must not be negative".into(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LollipopConfig {
    pub width: f64,
    pub height: f64,
    pub x_axis_annotation_height: f64,
    pub y_axis_annotation_width: f64,
    pub x_axis_scale_exponent: f64,
    pub x_axis_max_factor: f64,
    pub y_axis_padding: f64,
    pub circle_radius: f64,
    pub x_axis_tick_count: usize,
    pub x_axis_label_rotation: f64,
}

impl Default for LollipopConfig {
    fn default() -> Self {
        Self {
            width: 780.0,
            height: (780 * 3 / 4) as f64,
            x_axis_annotation_height: 50.0,
            y_axis_annotation_width: 230.0,
            x_axis_scale_exponent: 0.5,
            x_axis_max_factor: 1.1,
            y_axis_padding: 1.0,
            circle_radius: 780.0 / 150.0,
            x_axis_tick_count: 10,
            x_axis_label_rotation: -45.0,
        }
    }
}

impl LollipopConfig {
    pub fn plot_width(&self) -> f64 {
        self.width - 1.2 * self.y_axis_annotation_width
    }

    pub fn plot_height(&self) -> f64 {
        self.height - 2.0 * self.x_axis_annotation_height
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("width", self.width)?;
        positive("height", self.height)?;
        positive("plotWidth", self.plot_width())?;
        positive("plotHeight", self.plot_height())?;
        positive("xAxisScaleExponent", self.x_axis_scale_exponent)?;
        headroom("xAxisMaxFactor", self.x_axis_max_factor)?;
        fraction("yAxisPadding", self.y_axis_padding)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PieConfig {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    /// Inner radius of the label annulus, as a share of the pie radius.
    pub label_inner_ratio: f64,
}

impl Default for PieConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            margin: 50.0,
            label_inner_ratio: 0.6,
        }
    }
}

impl PieConfig {
    pub fn radius(&self) -> f64 {
        self.width.min(self.height) / 2.0 - self.margin
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("width", self.width)?;
        positive("height", self.height)?;
        positive("radius", self.radius())?;
        fraction("labelInnerRatio", self.label_inner_ratio)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WordCloudConfig {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    pub padding: f64,
    pub font_family: String,
    pub angle_step: f64,
    pub seed: u32,
}

impl Default for WordCloudConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 800.0,
            margin: 10.0,
            padding: 5.0,
            font_family: "Impact".to_string(),
            angle_step: 0.1,
            seed: 0,
        }
    }
}

impl WordCloudConfig {
    pub fn layout_size(&self) -> (f64, f64) {
        (self.width - 2.0 * self.margin, self.height - 2.0 * self.margin)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (w, h) = self.layout_size();
        positive("layoutWidth", w)?;
        positive("layoutHeight", h)?;
        positive("angleStep", self.angle_step)?;
        if self.padding < 0.0 {
            return Err(ConfigError::Invalid {
                field: "padding",
                reason: "must not be negative".into(),
            });
        }
        Ok(())
    }
}

/// Options for every chart of a report, loadable from one JSON document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartConfigs {
    pub bar: BarConfig,
    pub bubble_map: BubbleMapConfig,
    pub lollipop: LollipopConfig,
    pub pie: PieConfig,
    pub word_cloud: WordCloudConfig,
}

impl ChartConfigs {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let configs: Self = serde_json::from_str(json)?;
        configs.validate()?;
        Ok(configs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bar.validate()?;
        self.bubble_map.validate()?;
        self.lollipop.validate()?;
        self.pie.validate()?;
        self.word_cloud.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        ChartConfigs::default().validate().expect("defaults validate");
        assert_eq!(BarConfig::default().height, 548.0);
        assert_eq!(LollipopConfig::default().height, 585.0);
        assert_eq!(LollipopConfig::default().plot_width(), 504.0);
        assert_eq!(PieConfig::default().radius(), 250.0);
        assert_eq!(WordCloudConfig::default().layout_size(), (780.0, 780.0));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let configs = ChartConfigs::from_json_str(
            r#"{"lollipop": {"xAxisScaleExponent": 0.3}, "pie": {"margin": 20}}"#,
        )
        .expect("valid config");
        assert_eq!(configs.lollipop.x_axis_scale_exponent, 0.3);
        assert_eq!(configs.lollipop.x_axis_max_factor, 1.1);
        assert_eq!(configs.pie.margin, 20.0);
        assert_eq!(configs.bar, BarConfig::default());
    }

    #[test]
    fn headroom_below_one_is_rejected() {
        let err = ChartConfigs::from_json_str(r#"{"lollipop": {"xAxisMaxFactor": 0.9}}"#)
            .expect_err("invalid factor");
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "xAxisMaxFactor",
                ..
            }
        ));
    }

    #[test]
    fn non_positive_exponent_is_rejected() {
        let config = LollipopConfig {
            x_axis_scale_exponent: 0.0,
            ..LollipopConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "xAxisScaleExponent",
                ..
            })
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            ChartConfigs::from_json_str("{\"bar\": 3}"),
            Err(ConfigError::Parse(_))
        ));
    }
}
