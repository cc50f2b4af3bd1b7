pub mod chart;
pub mod colors;
pub mod config;
pub mod dataset;
pub mod format;
pub mod geo;
pub mod layout;
pub mod projection;
pub mod scale;
pub mod scene;
pub mod tooltip;

pub use chart::{Chart, ChartError};
pub use config::ChartConfigs;
pub use dataset::{Dataset, WeightTransform};
pub use format::{Locale, LocalizedText};
pub use geo::ProvinceTables;
pub use layout::{TextMeasure, WordItem};
pub use scene::Scene;
pub use tooltip::{PointerEvent, TooltipController, TooltipState};
