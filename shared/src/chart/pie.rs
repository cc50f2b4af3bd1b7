use std::fmt::Write;

use crate::colors::{SET2, ordinal};
use crate::config::PieConfig;
use crate::dataset::Dataset;
use crate::format::LocalizedText;
use crate::scene::{EntityId, Scene, Shape, ShapeKind, TextAnchor, TextSpan, Transform};
use crate::tooltip::TooltipField;

use super::ChartError;

/// Full-circle partition of a dataset, one slice per entry in input order.
#[derive(Debug, Clone)]
pub struct PieChart {
    pub data: Dataset,
    pub config: PieConfig,
}

/// Angles in degrees, clockwise from twelve o'clock.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl PieSlice {
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// Share of the whole, in percent.
    pub fn percent(&self) -> f64 {
        self.sweep() / 3.6
    }

    fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }
}

impl PieChart {
    pub fn new(data: Dataset, config: PieConfig) -> Self {
        Self { data, config }
    }

    pub fn slices(&self) -> Result<Vec<PieSlice>, ChartError> {
        self.data.validate_non_empty()?;
        let total = self.data.total();
        if total <= 0.0 {
            return Err(ChartError::ZeroTotal);
        }

        let last = self.data.len() - 1;
        let mut start = 0.0;
        let mut slices = Vec::with_capacity(self.data.len());
        for (i, (label, value)) in self.data.iter().enumerate() {
            // The final slice closes the circle exactly.
            let end = if i == last {
                360.0
            } else {
                start + value / total * 360.0
            };
            slices.push(PieSlice {
                label: label.to_string(),
                value,
                start_angle: start,
                end_angle: end,
            });
            start = end;
        }
        Ok(slices)
    }

    pub fn render(&self) -> Result<Scene, ChartError> {
        self.config.validate()?;
        let slices = self.slices()?;
        let radius = self.config.radius();
        let label_radius = radius * (1.0 + self.config.label_inner_ratio) / 2.0;

        let mut scene = Scene::new(self.config.width, self.config.height);
        scene.origin = (self.config.width / 2.0, self.config.height / 2.0);

        for (i, slice) in slices.iter().enumerate() {
            let id = scene.push(
                Shape::new(
                    ShapeKind::Path {
                        d: arc_path(radius, slice.start_angle, slice.end_angle),
                    },
                    "pie-chart-slice",
                )
                .with_fill(ordinal(&SET2, i)),
            );
            let percent = LocalizedText::number(round_percent(slice.percent()));
            scene.bind(
                id,
                EntityId::key(slice.label.as_str()),
                vec![
                    TooltipField::new("label", LocalizedText::same(slice.label.as_str())),
                    TooltipField::new("value", LocalizedText::number(slice.value)),
                    TooltipField::new("percent", percent),
                ],
            );
        }

        // Every slice is labelled, however thin.
        for slice in &slices {
            let (x, y) = polar(label_radius, slice.mid_angle());
            scene.push(
                Shape::new(
                    ShapeKind::Text {
                        x: 0.0,
                        y: 0.0,
                        spans: vec![
                            TextSpan {
                                x: Some(0.0),
                                y_em: Some(0.0),
                                bold: true,
                                ..TextSpan::plain(slice.label.as_str())
                            },
                            TextSpan {
                                x: Some(0.0),
                                y_em: Some(1.1),
                                ..TextSpan::plain(format!("({}%)", round_percent(slice.percent())))
                            },
                        ],
                        anchor: TextAnchor::Middle,
                        font_size: None,
                        font_family: None,
                    },
                    "pie-chart-label",
                )
                .with_transform(Transform::translate(x, y)),
            );
        }
        Ok(scene)
    }
}

fn round_percent(p: f64) -> f64 {
    (p * 10.0).round() / 10.0
}

/// Point at `degrees` clockwise from twelve o'clock.
fn polar(radius: f64, degrees: f64) -> (f64, f64) {
    let a = degrees.to_radians();
    (radius * a.sin(), -radius * a.cos())
}

fn arc_path(radius: f64, start: f64, end: f64) -> String {
    let mut d = String::with_capacity(64);
    let sweep = end - start;
    if sweep >= 360.0 - 1e-9 {
        // A single arc cannot close on itself; draw two half circles.
        let _ = write!(
            d,
            "M0,{top}A{radius},{radius},0,1,1,0,{radius}A{radius},{radius},0,1,1,0,{top}Z",
            top = -radius
        );
        return d;
    }
    let (x0, y0) = polar(radius, start);
    let (x1, y1) = polar(radius, end);
    let large_arc = u8::from(sweep > 180.0);
    let _ = write!(
        d,
        "M{x0},{y0}A{radius},{radius},0,{large_arc},1,{x1},{y1}L0,0Z"
    );
    d
}
