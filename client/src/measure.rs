use std::cell::RefCell;
use std::collections::HashMap;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use oss_report_shared::layout::{ApproxMeasure, TextMeasure};

const TEXT_WIDTH_CACHE_MAX_ENTRIES: usize = 4_096;

type TextWidthCache = HashMap<(String, u16), f64>;

#[inline]
fn quantize_font_size_tenths(size_px: f64) -> u16 {
    (size_px * 10.0).round().clamp(1.0, u16::MAX as f64) as u16
}

/// Measures text with an offscreen 2D canvas in the given font family.
/// Falls back to a fixed-advance estimate when no canvas is available.
pub struct CanvasMeasure {
    ctx: Option<CanvasRenderingContext2d>,
    font_family: String,
    cache: RefCell<TextWidthCache>,
    fallback: ApproxMeasure,
}

impl CanvasMeasure {
    pub fn new(font_family: &str) -> Self {
        let ctx = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.create_element("canvas").ok())
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
            .and_then(|canvas| canvas.get_context("2d").ok().flatten())
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok());
        if ctx.is_none() {
            web_sys::console::warn_1(&"2d canvas unavailable, estimating text widths".into());
        }
        Self {
            ctx,
            font_family: font_family.to_string(),
            cache: RefCell::new(HashMap::new()),
            fallback: ApproxMeasure::default(),
        }
    }
}

impl TextMeasure for CanvasMeasure {
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64) {
        let Some(ctx) = &self.ctx else {
            return self.fallback.measure(text, font_size);
        };
        let key = (text.to_string(), quantize_font_size_tenths(font_size));
        if let Some(&w) = self.cache.borrow().get(&key) {
            return (w, font_size);
        }

        ctx.set_font(&format!("{font_size}px {}", self.font_family));
        let w = ctx.measure_text(text).map(|m| m.width()).unwrap_or(0.0);
        let mut cache = self.cache.borrow_mut();
        if cache.len() >= TEXT_WIDTH_CACHE_MAX_ENTRIES {
            cache.clear();
        }
        cache.insert(key, w);
        (w, font_size)
    }
}
