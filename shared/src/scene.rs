//! Drawable output of a render call: positioned shapes tagged with CSS classes,
//! plus the hover bindings the tooltip controller reads.

use std::fmt::Write;

use crate::layout::LayoutSummary;
use crate::tooltip::TooltipField;

pub type ShapeId = usize;

/// What a hovered shape stands for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityId {
    /// The dataset-wide aggregate shown when nothing is hovered.
    Aggregate,
    Key(String),
}

impl EntityId {
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key(key.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub text: String,
    /// Absolute x reset for multi-line labels.
    pub x: Option<f64>,
    /// Vertical offset in em.
    pub y_em: Option<f64>,
    pub bold: bool,
}

impl TextSpan {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            x: None,
            y_em: None,
            bold: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Path {
        d: String,
    },
    Text {
        x: f64,
        y: f64,
        spans: Vec<TextSpan>,
        anchor: TextAnchor,
        font_size: Option<f64>,
        font_family: Option<String>,
    },
}

/// `translate(x,y)` followed by an optional `rotate(deg)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translate: (f64, f64),
    pub rotate: f64,
}

impl Transform {
    pub fn translate(x: f64, y: f64) -> Self {
        Self {
            translate: (x, y),
            rotate: 0.0,
        }
    }

    pub fn rotated(mut self, degrees: f64) -> Self {
        self.rotate = degrees;
        self
    }

    pub fn to_svg(&self) -> String {
        let mut out = String::with_capacity(32);
        let _ = write!(out, "translate({},{})", self.translate.0, self.translate.1);
        if self.rotate != 0.0 {
            let _ = write!(out, "rotate({})", self.rotate);
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    /// Space-separated CSS classes.
    pub class: String,
    pub fill: Option<String>,
    pub transform: Option<Transform>,
    /// Dimmed while a sibling shape is highlighted.
    pub dimmable: bool,
    /// Extra `data-*` attributes (name without the prefix, value).
    pub data: Vec<(&'static str, String)>,
}

impl Shape {
    pub fn new(kind: ShapeKind, class: impl Into<String>) -> Self {
        Self {
            kind,
            class: class.into(),
            fill: None,
            transform: None,
            dimmable: false,
            data: Vec::new(),
        }
    }

    pub fn text(x: f64, y: f64, text: impl Into<String>, class: impl Into<String>) -> Self {
        Self::new(
            ShapeKind::Text {
                x,
                y,
                spans: vec![TextSpan::plain(text)],
                anchor: TextAnchor::default(),
                font_size: None,
                font_family: None,
            },
            class,
        )
    }

    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn with_anchor(mut self, anchor: TextAnchor) -> Self {
        if let ShapeKind::Text { anchor: a, .. } = &mut self.kind {
            *a = anchor;
        }
        self
    }

    pub fn dimmable(mut self) -> Self {
        self.dimmable = true;
        self
    }

    pub fn with_data(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.data.push((name, value.into()));
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.class.split_whitespace().any(|c| c == class)
    }
}

/// Precomputed tooltip content for one hoverable shape.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverBinding {
    pub shape: ShapeId,
    pub entity: EntityId,
    pub fields: Vec<TooltipField>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    /// View box size.
    pub width: f64,
    pub height: f64,
    /// Class on the root element, if any.
    pub class: Option<&'static str>,
    /// Translation of the plotting group inside the view box.
    pub origin: (f64, f64),
    pub shapes: Vec<Shape>,
    pub hover: Vec<HoverBinding>,
    /// Content shown while nothing is hovered. `None` hides the tooltip instead.
    pub aggregate: Option<Vec<TooltipField>>,
    pub layout: Option<LayoutSummary>,
}

impl Scene {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn push(&mut self, shape: Shape) -> ShapeId {
        self.shapes.push(shape);
        self.shapes.len() - 1
    }

    pub fn bind(&mut self, shape: ShapeId, entity: EntityId, fields: Vec<TooltipField>) {
        self.hover.push(HoverBinding {
            shape,
            entity,
            fields,
        });
    }

    pub fn binding(&self, shape: ShapeId) -> Option<&HoverBinding> {
        self.hover.iter().find(|b| b.shape == shape)
    }

    pub fn view_box(&self) -> String {
        format!("0 0 {} {}", self.width, self.height)
    }

    pub fn with_class(&self, class: &str) -> impl Iterator<Item = (ShapeId, &Shape)> {
        self.shapes
            .iter()
            .enumerate()
            .filter(move |(_, s)| s.has_class(class))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_renders_translate_then_rotate() {
        assert_eq!(Transform::translate(3.0, -4.5).to_svg(), "translate(3,-4.5)");
        assert_eq!(
            Transform::translate(-10.0, 9.0).rotated(-45.0).to_svg(),
            "translate(-10,9)rotate(-45)"
        );
    }

    #[test]
    fn push_returns_sequential_ids_and_bindings_resolve() {
        let mut scene = Scene::new(10.0, 10.0);
        let a = scene.push(Shape::text(0.0, 0.0, "a", "label"));
        let b = scene.push(Shape::text(0.0, 0.0, "b", "label bold"));
        assert_eq!((a, b), (0, 1));
        scene.bind(b, EntityId::key("b"), Vec::new());
        assert!(scene.binding(a).is_none());
        assert_eq!(
            scene.binding(b).map(|h| &h.entity),
            Some(&EntityId::key("b"))
        );
        assert_eq!(scene.with_class("bold").count(), 1);
        assert_eq!(scene.with_class("label").count(), 2);
        assert_eq!(scene.view_box(), "0 0 10 10");
    }
}
