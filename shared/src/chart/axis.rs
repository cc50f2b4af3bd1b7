use crate::format::plain_number;
use crate::scale::{BandScale, ScaleError};
use crate::scene::{Scene, Shape, ShapeKind, TextAnchor, TextSpan, Transform};

const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;

/// Offset applied before rotating bottom-axis labels, so their end sits under the tick.
const ROTATED_LABEL_SHIFT: f64 = -10.0;

/// A tick at pixel offset `position` along the axis, labelled `label`.
pub(super) struct Tick {
    pub position: f64,
    pub label: String,
}

impl Tick {
    pub fn value(value: f64, position: f64) -> Self {
        Self {
            position,
            label: plain_number(value),
        }
    }
}

pub(super) fn band_ticks(scale: &BandScale) -> Result<Vec<Tick>, ScaleError> {
    scale
        .labels()
        .iter()
        .map(|label| {
            Ok(Tick {
                position: scale.center(label)?,
                label: label.clone(),
            })
        })
        .collect()
}

fn label(x: f64, y: f64, text: &str, dy_em: f64, anchor: TextAnchor) -> Shape {
    Shape::new(
        ShapeKind::Text {
            x,
            y,
            spans: vec![TextSpan {
                y_em: Some(dy_em),
                ..TextSpan::plain(text)
            }],
            anchor,
            font_size: None,
            font_family: None,
        },
        "axis-label",
    )
}

/// Horizontal axis along `y`, spanning `extent`. Labels are rotated by
/// `rotation` degrees when it is non-zero.
pub(super) fn bottom(scene: &mut Scene, ticks: &[Tick], extent: (f64, f64), y: f64, rotation: f64) {
    scene.push(Shape::new(
        ShapeKind::Line {
            x1: extent.0,
            y1: y,
            x2: extent.1,
            y2: y,
        },
        "axis-domain",
    ));
    for tick in ticks {
        scene.push(Shape::new(
            ShapeKind::Line {
                x1: tick.position,
                y1: y,
                x2: tick.position,
                y2: y + TICK_SIZE,
            },
            "axis-tick",
        ));
        let text_y = TICK_SIZE + TICK_PADDING;
        let shape = if rotation == 0.0 {
            label(tick.position, y + text_y, &tick.label, 0.71, TextAnchor::Middle)
        } else {
            label(0.0, text_y, &tick.label, 0.71, TextAnchor::End).with_transform(
                Transform::translate(tick.position + ROTATED_LABEL_SHIFT, y).rotated(rotation),
            )
        };
        scene.push(shape);
    }
}

/// Vertical axis along `x`, spanning `extent`.
pub(super) fn left(scene: &mut Scene, ticks: &[Tick], extent: (f64, f64), x: f64) {
    scene.push(Shape::new(
        ShapeKind::Line {
            x1: x,
            y1: extent.0,
            x2: x,
            y2: extent.1,
        },
        "axis-domain",
    ));
    for tick in ticks {
        scene.push(Shape::new(
            ShapeKind::Line {
                x1: x - TICK_SIZE,
                y1: tick.position,
                x2: x,
                y2: tick.position,
            },
            "axis-tick",
        ));
        scene.push(label(
            x - TICK_SIZE - TICK_PADDING,
            tick.position,
            &tick.label,
            0.32,
            TextAnchor::End,
        ));
    }
}
