//! Pointer-driven tooltip and highlight state.
//!
//! The controller is a plain value: each pointer event produces the next state
//! from the current one and the scene's precomputed hover bindings. Nothing is
//! recomputed on hover.

use crate::format::LocalizedText;
use crate::scene::{EntityId, Scene, ShapeId};

/// One line of tooltip content. `key` names the slot it fills
/// (e.g. `province-count`).
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipField {
    pub key: &'static str,
    pub text: LocalizedText,
}

impl TooltipField {
    pub fn new(key: &'static str, text: LocalizedText) -> Self {
        Self { key, text }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum TooltipState {
    #[default]
    Hidden,
    Visible {
        entity: EntityId,
        fields: Vec<TooltipField>,
    },
}

impl TooltipState {
    pub fn entity(&self) -> Option<&EntityId> {
        match self {
            Self::Hidden => None,
            Self::Visible { entity, .. } => Some(entity),
        }
    }

    pub fn field(&self, key: &str) -> Option<&LocalizedText> {
        match self {
            Self::Hidden => None,
            Self::Visible { fields, .. } => fields.iter().find(|f| f.key == key).map(|f| &f.text),
        }
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Visible { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Enter { shape: ShapeId, x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Leave { shape: ShapeId },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TooltipController {
    state: TooltipState,
    active: Option<ShapeId>,
    pointer: (f64, f64),
}

impl TooltipController {
    /// Resting state for `scene`: its aggregate if it has one, hidden otherwise.
    pub fn for_scene(scene: &Scene) -> Self {
        Self {
            state: resting_state(scene),
            active: None,
            pointer: (0.0, 0.0),
        }
    }

    /// Next state after `event`.
    ///
    /// A new enter replaces the previous content in one step (last enter wins).
    /// A leave from a shape that is no longer active is ignored, so a late
    /// leave cannot clear a newer highlight.
    pub fn handle(&self, event: PointerEvent, scene: &Scene) -> Self {
        match event {
            PointerEvent::Enter { shape, x, y } => {
                let Some(binding) = scene.binding(shape) else {
                    return self.clone();
                };
                Self {
                    state: TooltipState::Visible {
                        entity: binding.entity.clone(),
                        fields: binding.fields.clone(),
                    },
                    active: Some(shape),
                    pointer: (x, y),
                }
            }
            PointerEvent::Move { x, y } => Self {
                pointer: (x, y),
                ..self.clone()
            },
            PointerEvent::Leave { shape } => {
                if self.active != Some(shape) {
                    return self.clone();
                }
                Self {
                    state: resting_state(scene),
                    active: None,
                    pointer: self.pointer,
                }
            }
        }
    }

    pub fn state(&self) -> &TooltipState {
        &self.state
    }

    pub fn active(&self) -> Option<ShapeId> {
        self.active
    }

    pub fn pointer(&self) -> (f64, f64) {
        self.pointer
    }

    /// Whether `shape` should render dimmed: it is dimmable and some other
    /// shape is highlighted.
    pub fn is_dimmed(&self, shape: ShapeId, scene: &Scene) -> bool {
        match self.active {
            Some(active) if active != shape => {
                scene.shapes.get(shape).is_some_and(|s| s.dimmable)
            }
            _ => false,
        }
    }
}

fn resting_state(scene: &Scene) -> TooltipState {
    match &scene.aggregate {
        Some(fields) => TooltipState::Visible {
            entity: EntityId::Aggregate,
            fields: fields.clone(),
        },
        None => TooltipState::Hidden,
    }
}
