use crate::config::BarConfig;
use crate::dataset::Dataset;
use crate::format::LocalizedText;
use crate::scale::{BandScale, LinearScale};
use crate::scene::{EntityId, Scene, Shape, ShapeKind};
use crate::tooltip::TooltipField;

use super::axis::{self, Tick};
use super::{ChartError, value_domain_top};

/// Vertical bars, one per bucket, in input order.
#[derive(Debug, Clone)]
pub struct BarChart {
    pub data: Dataset,
    pub config: BarConfig,
}

impl BarChart {
    pub fn new(data: Dataset, config: BarConfig) -> Self {
        Self { data, config }
    }

    pub fn render(&self) -> Result<Scene, ChartError> {
        let config = &self.config;
        config.validate()?;
        self.data.validate_non_empty()?;

        let (plot_w, plot_h) = (config.plot_width(), config.plot_height());
        let x = BandScale::new(self.data.labels(), (0.0, plot_w), config.x_axis_padding)?;
        let top = value_domain_top(self.data.max(), config.y_axis_max_factor);
        let y = LinearScale::new((0.0, top), (plot_h, 0.0))?;

        let mut scene = Scene::new(config.width, config.height);
        scene.origin = (config.y_axis_annotation_width, config.x_axis_annotation_height);

        axis::bottom(
            &mut scene,
            &axis::band_ticks(&x)?,
            (0.0, plot_w),
            plot_h,
            config.x_axis_label_rotation,
        );
        let y_ticks: Vec<Tick> = y
            .ticks(config.y_axis_tick_count)
            .into_iter()
            .map(|v| Tick::value(v, y.map(v)))
            .collect();
        axis::left(&mut scene, &y_ticks, (plot_h, 0.0), 0.0);

        for (label, value) in self.data.iter() {
            let bar_y = y.map(value);
            let id = scene.push(Shape::new(
                ShapeKind::Rect {
                    x: x.position(label)?,
                    y: bar_y,
                    width: x.bandwidth(),
                    height: plot_h - bar_y,
                },
                "bar-chart-bar",
            ));
            scene.bind(
                id,
                EntityId::key(label),
                vec![
                    TooltipField::new("bucket", LocalizedText::same(label)),
                    TooltipField::new("value", LocalizedText::number(value)),
                ],
            );
        }
        Ok(scene)
    }
}
