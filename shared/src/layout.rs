//! Word cloud packing: Archimedean spiral search with box collision tests.
//!
//! Best-effort. A word that finds no free slot before the spiral leaves the
//! canvas is dropped and reported in [`LayoutOutcome::dropped`].

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::channel::oneshot;
use serde::{Deserialize, Serialize};

/// Measures the unrotated `(width, height)` of `text` at `font_size`.
pub trait TextMeasure {
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64);
}

/// Fixed-advance estimate: every glyph is `advance * font_size` wide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproxMeasure {
    pub advance: f64,
    pub line_height: f64,
}

impl Default for ApproxMeasure {
    fn default() -> Self {
        Self {
            advance: 0.6,
            line_height: 1.0,
        }
    }
}

impl TextMeasure for ApproxMeasure {
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64) {
        let glyphs = text.chars().count() as f64;
        (glyphs * self.advance * font_size, self.line_height * font_size)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordItem {
    pub text: String,
    /// Final font size; any sizing transform is applied by the caller.
    pub weight: f64,
}

impl WordItem {
    pub fn new(text: impl Into<String>, weight: f64) -> Self {
        Self {
            text: text.into(),
            weight,
        }
    }
}

/// Axis-aligned box, min/max corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Bounds {
    fn centered(cx: f64, cy: f64, w: f64, h: f64) -> Self {
        Self {
            x0: cx - w / 2.0,
            y0: cy - h / 2.0,
            x1: cx + w / 2.0,
            y1: cy + h / 2.0,
        }
    }

    /// Interiors intersect; shared edges do not count.
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.x0 < other.x1 && other.x0 < self.x1 && self.y0 < other.y1 && other.y0 < self.y1
    }

    fn within(&self, half_w: f64, half_h: f64) -> bool {
        self.x0 >= -half_w && self.x1 <= half_w && self.y0 >= -half_h && self.y1 <= half_h
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub text: String,
    pub size: f64,
    /// Centre, relative to the canvas centre.
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    /// Padded footprint used for collision tests.
    pub bounds: Bounds,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutOutcome {
    pub placed: Vec<PlacedWord>,
    pub dropped: Vec<WordItem>,
}

impl LayoutOutcome {
    pub fn summary(&self) -> LayoutSummary {
        LayoutSummary {
            attempted: self.placed.len() + self.dropped.len(),
            placed: self.placed.len(),
        }
    }
}

/// Placement diagnostics carried on a rendered scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutSummary {
    pub attempted: usize,
    pub placed: usize,
}

impl LayoutSummary {
    pub fn dropped(&self) -> usize {
        self.attempted - self.placed
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    pub width: f64,
    pub height: f64,
    /// Minimum gap between neighbouring words.
    pub padding: f64,
    /// Spiral sampling step, radians.
    pub angle_step: f64,
    /// Seed for the per-word rotation choice.
    pub seed: u32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            width: 780.0,
            height: 780.0,
            padding: 5.0,
            angle_step: 0.1,
            seed: 0,
        }
    }
}

pub struct WordLayout<'m> {
    params: LayoutParams,
    measure: &'m dyn TextMeasure,
}

impl<'m> WordLayout<'m> {
    pub fn new(params: LayoutParams, measure: &'m dyn TextMeasure) -> Self {
        Self { params, measure }
    }

    /// Place every word, largest first, and signal completion exactly once.
    pub fn start(&self, words: &[WordItem]) -> LayoutCompletion {
        let (tx, rx) = oneshot::channel();
        let outcome = self.run(words);
        // The receiver is held by the returned future, so this cannot fail.
        let _ = tx.send(outcome);
        LayoutCompletion { rx }
    }

    /// Synchronous placement of `words`.
    pub fn run(&self, words: &[WordItem]) -> LayoutOutcome {
        let mut order: Vec<&WordItem> = words.iter().collect();
        // Stable: equal sizes keep input order.
        order.sort_by(|a, b| b.weight.total_cmp(&a.weight));

        let mut outcome = LayoutOutcome::default();
        for word in order {
            match self.place(word, &outcome.placed) {
                Some(placed) => outcome.placed.push(placed),
                None => {
                    tracing::debug!(word = %word.text, size = word.weight, "no free slot, word dropped");
                    outcome.dropped.push(word.clone());
                }
            }
        }

        let summary = outcome.summary();
        tracing::info!(
            attempted = summary.attempted,
            placed = summary.placed,
            dropped = summary.dropped(),
            "word layout finished"
        );
        outcome
    }

    fn place(&self, word: &WordItem, placed: &[PlacedWord]) -> Option<PlacedWord> {
        if word.text.is_empty() || !word.weight.is_finite() || word.weight <= 0.0 {
            return None;
        }

        let rotation = rotation_for(self.params.seed, &word.text);
        let (w, h) = self.measure.measure(&word.text, word.weight);
        let (w, h) = if rotation == 0.0 { (w, h) } else { (h, w) };
        let (w, h) = (w + self.params.padding, h + self.params.padding);

        let LayoutParams {
            width,
            height,
            angle_step,
            ..
        } = self.params;
        let (half_w, half_h) = (width / 2.0, height / 2.0);
        if angle_step <= 0.0 || w > width || h > height {
            return None;
        }

        let aspect = width / height;
        let max_radius = half_w.hypot(half_h);
        let mut theta = 0.0f64;
        loop {
            // Archimedean: radius grows linearly with the angle swept.
            let r = theta;
            if r > max_radius {
                return None;
            }
            let x = aspect * r * theta.cos();
            let y = r * theta.sin();
            let bounds = Bounds::centered(x, y, w, h);
            if bounds.within(half_w, half_h) && !placed.iter().any(|p| p.bounds.overlaps(&bounds)) {
                return Some(PlacedWord {
                    text: word.text.clone(),
                    size: word.weight,
                    x,
                    y,
                    rotation,
                    bounds,
                });
            }
            theta += angle_step;
        }
    }
}

/// Completion signal of [`WordLayout::start`]; resolves once with the outcome.
pub struct LayoutCompletion {
    rx: oneshot::Receiver<LayoutOutcome>,
}

impl Future for LayoutCompletion {
    type Output = LayoutOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|result| result.unwrap_or_default())
    }
}

/// 0 or 90 degrees, chosen per word from a hash of the seed and text.
fn rotation_for(seed: u32, text: &str) -> f64 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&seed.to_le_bytes());
    hasher.update(text.as_bytes());
    if hasher.finalize() & 1 == 0 { 0.0 } else { 90.0 }
}
