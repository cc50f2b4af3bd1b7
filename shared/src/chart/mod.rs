//! The five report charts. Each variant owns its data and options and turns
//! them into a [`Scene`]; they share the scale and projection primitives.

mod axis;
mod bar;
mod bubble_map;
mod lollipop;
mod pie;
mod word_cloud;

pub use bar::BarChart;
pub use bubble_map::{BubbleMap, ProvinceStats};
pub use lollipop::LollipopChart;
pub use pie::{PieChart, PieSlice};
pub use word_cloud::WordCloud;

use thiserror::Error;

use crate::config::ConfigError;
use crate::dataset::DatasetError;
use crate::geo::GeoError;
use crate::layout::TextMeasure;
use crate::projection::ProjectionError;
use crate::scale::ScaleError;
use crate::scene::Scene;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Scale(#[from] ScaleError),
    #[error(transparent)]
    Projection(#[from] ProjectionError),
    #[error(transparent)]
    Geo(#[from] GeoError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no coordinates for province `{0}`")]
    MissingCoordinates(String),
    #[error("`{0}` is neither a known province nor the unknown bucket")]
    UnknownProvince(String),
    #[error("pie values sum to zero")]
    ZeroTotal,
}

#[derive(Debug, Clone)]
pub enum Chart {
    Bar(BarChart),
    BubbleMap(BubbleMap),
    Lollipop(LollipopChart),
    Pie(PieChart),
    WordCloud(WordCloud),
}

impl Chart {
    /// Build the scene for this chart. Only the word cloud suspends, once,
    /// while its layout completes.
    pub async fn render(&self, measure: &dyn TextMeasure) -> Result<Scene, ChartError> {
        match self {
            Chart::Bar(chart) => chart.render(),
            Chart::BubbleMap(chart) => chart.render(),
            Chart::Lollipop(chart) => chart.render(),
            Chart::Pie(chart) => chart.render(),
            Chart::WordCloud(chart) => chart.render(measure).await,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Chart::Bar(_) => "bar",
            Chart::BubbleMap(_) => "bubble-map",
            Chart::Lollipop(_) => "lollipop",
            Chart::Pie(_) => "pie",
            Chart::WordCloud(_) => "word-cloud",
        }
    }
}

impl From<BarChart> for Chart {
    fn from(chart: BarChart) -> Self {
        Chart::Bar(chart)
    }
}

impl From<BubbleMap> for Chart {
    fn from(chart: BubbleMap) -> Self {
        Chart::BubbleMap(chart)
    }
}

impl From<LollipopChart> for Chart {
    fn from(chart: LollipopChart) -> Self {
        Chart::Lollipop(chart)
    }
}

impl From<PieChart> for Chart {
    fn from(chart: PieChart) -> Self {
        Chart::Pie(chart)
    }
}

impl From<WordCloud> for Chart {
    fn from(chart: WordCloud) -> Self {
        Chart::WordCloud(chart)
    }
}

/// Upper domain bound for a value axis: `max * factor`, or `1` when every
/// value is zero so the axis keeps a usable span.
fn value_domain_top(max: f64, factor: f64) -> f64 {
    if max > 0.0 { max * factor } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BarConfig, PieConfig};
    use crate::dataset::Dataset;
    use crate::layout::ApproxMeasure;
    use futures::executor::block_on;

    fn dataset() -> Dataset {
        [("Go", 50.0), ("Rust", 30.0), ("Other", 20.0)]
            .into_iter()
            .collect()
    }

    #[test]
    fn every_variant_dispatches_to_its_renderer() {
        let measure = ApproxMeasure::default();
        let chart: Chart = PieChart::new(dataset(), PieConfig::default()).into();
        assert_eq!(chart.kind(), "pie");
        let scene = block_on(chart.render(&measure)).expect("pie renders");
        assert_eq!(scene.with_class("pie-chart-slice").count(), 3);

        let chart: Chart = BarChart::new(dataset(), BarConfig::default()).into();
        let scene = block_on(chart.render(&measure)).expect("bar renders");
        assert_eq!(scene.with_class("bar-chart-bar").count(), 3);
    }

    #[test]
    fn malformed_input_fails_at_the_boundary() {
        let measure = ApproxMeasure::default();
        let empty: Chart = BarChart::new(Dataset::new(), BarConfig::default()).into();
        assert!(matches!(
            block_on(empty.render(&measure)),
            Err(ChartError::Dataset(DatasetError::Empty))
        ));

        let negative: Dataset = [("a", 1.0), ("b", -2.0)].into_iter().collect();
        let chart: Chart = PieChart::new(negative, PieConfig::default()).into();
        assert!(matches!(
            block_on(chart.render(&measure)),
            Err(ChartError::Dataset(DatasetError::Negative { .. }))
        ));
    }

    #[test]
    fn zero_maximum_still_yields_a_value_axis() {
        assert_eq!(value_domain_top(0.0, 1.1), 1.0);
        assert!((value_domain_top(100.0, 1.1) - 110.0).abs() < 1e-9);
    }
}
