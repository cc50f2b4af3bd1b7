use crate::config::LollipopConfig;
use crate::dataset::Dataset;
use crate::format::plain_number;
use crate::scale::{BandScale, PowScale};
use crate::scene::{Scene, Shape, ShapeKind};

use super::axis::{self, Tick};
use super::{ChartError, value_domain_top};

/// Horizontal stems ranked from the largest value down.
#[derive(Debug, Clone)]
pub struct LollipopChart {
    pub data: Dataset,
    pub config: LollipopConfig,
}

impl LollipopChart {
    pub fn new(data: Dataset, config: LollipopConfig) -> Self {
        Self { data, config }
    }

    /// Labels in drawing order, top to bottom.
    pub fn ranking(&self) -> Vec<(&str, f64)> {
        self.data.ranked()
    }

    pub fn render(&self) -> Result<Scene, ChartError> {
        let config = &self.config;
        config.validate()?;
        self.data.validate_non_empty()?;

        let ranked = self.ranking();
        let (plot_w, plot_h) = (config.plot_width(), config.plot_height());
        let top = value_domain_top(self.data.max(), config.x_axis_max_factor);
        let x = PowScale::new((0.0, top), (0.0, plot_w), config.x_axis_scale_exponent)?;
        let y = BandScale::new(
            ranked.iter().map(|(label, _)| *label),
            (0.0, plot_h),
            config.y_axis_padding,
        )?;

        let mut scene = Scene::new(config.width, config.height);
        scene.class = Some("lollipop-chart");
        scene.origin = (config.y_axis_annotation_width, config.x_axis_annotation_height);

        let x_ticks: Vec<Tick> = x
            .ticks(config.x_axis_tick_count)
            .into_iter()
            .map(|v| Tick::value(v, x.map(v)))
            .collect();
        axis::bottom(
            &mut scene,
            &x_ticks,
            (0.0, plot_w),
            plot_h,
            config.x_axis_label_rotation,
        );
        axis::left(&mut scene, &axis::band_ticks(&y)?, (0.0, plot_h), 0.0);

        let r = config.circle_radius;
        let origin_x = x.map(0.0);
        let mut stems = Vec::with_capacity(ranked.len());
        for (label, value) in &ranked {
            stems.push((x.map(*value), y.center(label)?, *value));
        }

        // Stems first, then circles, then labels, so circles cover stem ends.
        for &(cx, cy, _) in &stems {
            scene.push(Shape::new(
                ShapeKind::Line {
                    x1: cx,
                    y1: cy,
                    x2: origin_x,
                    y2: cy,
                },
                "lollipop-chart-line",
            ));
        }
        for &(cx, cy, _) in &stems {
            scene.push(Shape::new(
                ShapeKind::Circle { cx, cy, r },
                "lollipop-chart-circle",
            ));
        }
        for &(cx, cy, value) in &stems {
            scene.push(Shape::text(
                cx + 2.0 * r,
                cy + r / 2.0,
                plain_number(value),
                "lollipop-chart-text",
            ));
        }
        Ok(scene)
    }
}
