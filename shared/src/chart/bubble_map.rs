//! Province choropleth with count markers.
//!
//! Regions are coloured by count density (per [`BubbleMapConfig::density_base`]
//! inhabitants); markers are sized by raw count. Hovering either shows that
//! province's figures and dims every other region; leaving restores the
//! country-wide aggregate.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::colors::{BLUES_4, BLUES_6};
use crate::config::BubbleMapConfig;
use crate::dataset::Dataset;
use crate::format::LocalizedText;
use crate::geo::{ProvinceTables, UNKNOWN_PROVINCE, UNKNOWN_PROVINCE_TR, boundary_path};
use crate::projection::MercatorProjection;
use crate::scale::{PowScale, ThresholdScale};
use crate::scene::{EntityId, Scene, Shape, ShapeKind};
use crate::tooltip::TooltipField;

use super::ChartError;

const FINE_BREAKPOINTS: [f64; 3] = [1.0, 5.0, 10.0];
const COARSE_BREAKPOINTS: [f64; 5] = [50.0, 100.0, 300.0, 800.0, 1500.0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProvinceStats {
    pub count: f64,
    pub population: u64,
    pub density: f64,
}

impl ProvinceStats {
    fn new(count: f64, population: u64, density_base: f64) -> Self {
        Self {
            count,
            population,
            density: density(count, population, density_base),
        }
    }
}

/// Count per `base` inhabitants; zero when the population is unknown.
fn density(count: f64, population: u64, base: f64) -> f64 {
    if population == 0 {
        0.0
    } else {
        count / (population as f64 / base)
    }
}

#[derive(Debug, Clone)]
pub struct BubbleMap {
    pub data: Dataset,
    pub tables: Arc<ProvinceTables>,
    pub config: BubbleMapConfig,
}

impl BubbleMap {
    pub fn new(data: Dataset, tables: Arc<ProvinceTables>, config: BubbleMapConfig) -> Self {
        Self {
            data,
            tables,
            config,
        }
    }

    /// Counts joined with populations, in population-table order, with the
    /// unknown bucket last.
    pub fn merged(&self) -> Result<IndexMap<String, ProvinceStats>, ChartError> {
        self.data.validate_non_empty()?;
        if let Some(stray) = self
            .data
            .labels()
            .find(|key| *key != UNKNOWN_PROVINCE && !self.tables.populations.contains_key(*key))
        {
            return Err(ChartError::UnknownProvince(stray.to_string()));
        }

        let base = self.config.density_base;
        let mut merged: IndexMap<String, ProvinceStats> = self
            .tables
            .populations
            .iter()
            .map(|(name, &population)| {
                let count = self.data.get(name).unwrap_or(0.0);
                (name.clone(), ProvinceStats::new(count, population, base))
            })
            .collect();
        merged.insert(
            UNKNOWN_PROVINCE.to_string(),
            ProvinceStats::new(self.data.get(UNKNOWN_PROVINCE).unwrap_or(0.0), 0, base),
        );
        Ok(merged)
    }

    /// Country-wide totals shown while nothing is hovered.
    pub fn aggregate(&self) -> ProvinceStats {
        ProvinceStats::new(
            self.data.total(),
            self.tables.total_population(),
            self.config.density_base,
        )
    }

    /// Density buckets: a fine four-step palette for sparse data, a coarse
    /// six-step one otherwise. Each palette has one colour per bucket, so
    /// densities above the last breakpoint get the darkest step.
    pub fn color_scale(
        &self,
        merged: &IndexMap<String, ProvinceStats>,
    ) -> Result<ThresholdScale<&'static str>, ChartError> {
        let max_density = merged.values().map(|s| s.density).fold(0.0, f64::max);
        let scale = if max_density < self.config.fine_palette_below {
            ThresholdScale::new(FINE_BREAKPOINTS.to_vec(), BLUES_4.to_vec())?
        } else {
            ThresholdScale::new(COARSE_BREAKPOINTS.to_vec(), BLUES_6.to_vec())?
        };
        Ok(scale)
    }

    pub fn render(&self) -> Result<Scene, ChartError> {
        let config = &self.config;
        config.validate()?;
        let merged = self.merged()?;
        let colors = self.color_scale(&merged)?;
        let projection = MercatorProjection::new(
            config.center,
            config.scale,
            (config.width / 2.0, config.height / 2.0),
        )?;
        let marker = PowScale::new(
            config.marker_domain,
            config.marker_range,
            config.marker_exponent,
        )?;

        let mut scene = Scene::new(config.width, config.height);

        for feature in &self.tables.boundaries {
            let name = feature.name();
            let stats = match merged.get(name) {
                Some(stats) => *stats,
                None => {
                    tracing::warn!(province = %name, "boundary has no population entry, drawn in the lowest bucket");
                    ProvinceStats::new(0.0, 0, config.density_base)
                }
            };
            let id = scene.push(
                Shape::new(
                    ShapeKind::Path {
                        d: boundary_path(feature, &projection)?,
                    },
                    "map-section",
                )
                .with_fill(*colors.map(stats.density))
                .dimmable(),
            );
            scene.bind(id, EntityId::key(name), province_fields(name, &stats));
        }

        for (name, stats) in &merged {
            let point = self
                .tables
                .coordinates
                .get(name)
                .ok_or_else(|| ChartError::MissingCoordinates(name.clone()))?;
            let (cx, cy) = projection.project_point(*point)?;
            // Any non-zero count stays visible; zero hides the marker.
            let r = if stats.count > 0.0 {
                marker.map(stats.count).max(0.0) + config.min_marker_size
            } else {
                0.0
            };

            let class = if name == UNKNOWN_PROVINCE {
                "bubble unknown-province"
            } else {
                "bubble"
            };
            let id = scene.push(
                Shape::new(ShapeKind::Circle { cx, cy, r }, class)
                    .with_data("province-name", name.as_str())
                    .with_data("province-count", stats.count.to_string()),
            );
            scene.bind(id, EntityId::key(name.as_str()), province_fields(name, stats));
        }

        scene.aggregate = Some(stats_fields(config.country_name.clone(), &self.aggregate()));
        Ok(scene)
    }
}

fn province_fields(name: &str, stats: &ProvinceStats) -> Vec<TooltipField> {
    let name = if name == UNKNOWN_PROVINCE {
        LocalizedText::new(UNKNOWN_PROVINCE, UNKNOWN_PROVINCE_TR)
    } else {
        LocalizedText::same(name)
    };
    stats_fields(name, stats)
}

/// Zero population or density means "not applicable" and shows as `-`.
fn stats_fields(name: LocalizedText, stats: &ProvinceStats) -> Vec<TooltipField> {
    let or_dash = |v: f64| {
        if v == 0.0 {
            LocalizedText::same("-")
        } else {
            LocalizedText::number(v)
        }
    };
    vec![
        TooltipField::new("province-name", name),
        TooltipField::new("province-count", LocalizedText::number(stats.count)),
        TooltipField::new("province-population", or_dash(stats.population as f64)),
        TooltipField::new(
            "province-count-population-ratio",
            or_dash(stats.density.floor()),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetError;
    use crate::geo::{FeatureProperties, Geometry, ProvinceFeature};
    use crate::projection::GeoPoint;
    use crate::tooltip::{PointerEvent, TooltipController};

    fn assert_close(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        assert!(diff < 1e-9, "expected {expected}, got {actual} (diff: {diff})");
    }

    fn square(name: &str, lon: f64, lat: f64) -> ProvinceFeature {
        ProvinceFeature {
            properties: FeatureProperties {
                name: name.to_string(),
            },
            geometry: Geometry::Polygon(vec![vec![
                vec![lon, lat],
                vec![lon + 1.0, lat],
                vec![lon + 1.0, lat + 1.0],
                vec![lon, lat + 1.0],
            ]]),
        }
    }

    fn tables() -> Arc<ProvinceTables> {
        let coordinates = [
            ("34", GeoPoint { lon: 28.97, lat: 41.01 }),
            ("06", GeoPoint { lon: 32.85, lat: 39.93 }),
            (UNKNOWN_PROVINCE, GeoPoint { lon: 42.0, lat: 36.5 }),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        let populations = [("34", 1_000_000u64), ("06", 500_000)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        Arc::new(ProvinceTables {
            coordinates,
            populations,
            boundaries: vec![square("34", 28.5, 40.8), square("06", 32.5, 39.5)],
        })
    }

    fn scenario() -> BubbleMap {
        let data: Dataset = [("34", 100.0), ("06", 40.0), (UNKNOWN_PROVINCE, 5.0)]
            .into_iter()
            .collect();
        BubbleMap::new(data, tables(), BubbleMapConfig::default())
    }

    #[test]
    fn densities_and_total_for_reference_scenario() {
        let map = scenario();
        let merged = map.merged().expect("merge");
        assert_close(merged["34"].density, 100.0);
        assert_close(merged["06"].density, 80.0);
        assert_eq!(merged[UNKNOWN_PROVINCE].density, 0.0);
        assert_eq!(merged[UNKNOWN_PROVINCE].population, 0);
        assert_eq!(
            merged.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["34", "06", UNKNOWN_PROVINCE]
        );

        let total = map.aggregate();
        assert_eq!(total.count, 145.0);
        assert_eq!(total.population, 1_500_000);
        assert_close(total.density, 145.0 / 1.5);
    }

    #[test]
    fn density_matches_definition_or_is_zero_without_population() {
        for population in [0u64, 1, 250, 1_000_000, 83_000_000] {
            for count in [0.0, 1.0, 17.0, 12_345.0] {
                let d = density(count, population, 1_000_000.0);
                if population == 0 {
                    assert_eq!(d, 0.0);
                } else {
                    assert_close(d, count / (population as f64 / 1_000_000.0));
                }
            }
        }
    }

    #[test]
    fn palette_switches_on_max_density() {
        let map = scenario();
        let merged = map.merged().expect("merge");
        // Max density is exactly 100, so the coarse palette applies.
        let scale = map.color_scale(&merged).expect("scale");
        assert_eq!(scale.outputs().len(), 6);
        assert_eq!(*scale.map(80.0), BLUES_6[1]);

        let sparse: Dataset = [("34", 3.0)].into_iter().collect();
        let map = BubbleMap::new(sparse, tables(), BubbleMapConfig::default());
        let merged = map.merged().expect("merge");
        let scale = map.color_scale(&merged).expect("scale");
        assert_eq!(scale.breakpoints(), &FINE_BREAKPOINTS);
        assert_eq!(*scale.map(0.0), BLUES_4[0]);
        assert_eq!(*scale.map(3.0), BLUES_4[1]);
        assert_eq!(*scale.map(7.0), BLUES_4[2]);
        assert_eq!(*scale.map(12.0), BLUES_4[3]);
    }

    #[test]
    fn sparse_map_renders_on_fine_palette() {
        let sparse: Dataset = [("34", 3.0)].into_iter().collect();
        let scene = BubbleMap::new(sparse, tables(), BubbleMapConfig::default())
            .render()
            .expect("renders");
        let fills: Vec<_> = scene
            .with_class("map-section")
            .filter_map(|(_, s)| s.fill.clone())
            .collect();
        // 34 has density 3, 06 has none.
        assert_eq!(fills, vec![BLUES_4[1].to_string(), BLUES_4[0].to_string()]);
    }

    #[test]
    fn empty_or_negative_counts_are_rejected() {
        let empty = BubbleMap::new(Dataset::new(), tables(), BubbleMapConfig::default());
        assert!(matches!(
            empty.render(),
            Err(ChartError::Dataset(DatasetError::Empty))
        ));

        let negative: Dataset = [("34", -2.0)].into_iter().collect();
        let map = BubbleMap::new(negative, tables(), BubbleMapConfig::default());
        assert!(matches!(
            map.render(),
            Err(ChartError::Dataset(DatasetError::Negative { .. }))
        ));
    }

    #[test]
    fn unlisted_key_is_rejected() {
        let data: Dataset = [("99", 1.0)].into_iter().collect();
        let map = BubbleMap::new(data, tables(), BubbleMapConfig::default());
        assert!(matches!(map.merged(), Err(ChartError::UnknownProvince(k)) if k == "99"));
    }

    fn marker_radii(scene: &Scene) -> Vec<(String, f64)> {
        scene
            .with_class("bubble")
            .map(|(_, s)| {
                let name = s
                    .data
                    .iter()
                    .find(|(k, _)| *k == "province-name")
                    .map(|(_, v)| v.clone())
                    .unwrap_or_default();
                match s.kind {
                    ShapeKind::Circle { r, .. } => (name, r),
                    _ => (name, f64::NAN),
                }
            })
            .collect()
    }

    #[test]
    fn markers_hide_zero_counts_and_tag_unknown() {
        let data: Dataset = [("34", 1.0), (UNKNOWN_PROVINCE, 5.0)].into_iter().collect();
        let map = BubbleMap::new(data, tables(), BubbleMapConfig::default());
        let scene = map.render().expect("renders");

        let radii = marker_radii(&scene);
        assert_eq!(radii.len(), 3);
        // count 1 sits at the bottom of the marker range: 1 + min size.
        assert_close(radii[0].1, 3.0);
        assert_eq!(radii[1], ("06".to_string(), 0.0));
        assert!(radii[2].1 > 3.0);
        assert_eq!(scene.with_class("unknown-province").count(), 1);
    }

    #[test]
    fn fractional_count_below_marker_domain_stays_visible() {
        let data: Dataset = [("34", 0.01)].into_iter().collect();
        let scene = BubbleMap::new(data, tables(), BubbleMapConfig::default())
            .render()
            .expect("renders");
        let radii = marker_radii(&scene);
        // The scale output is negative here; the marker keeps the minimum size.
        assert_close(radii[0].1, 2.0);
        assert_eq!(radii[1].1, 0.0);
    }

    #[test]
    fn zero_count_is_hidden_even_when_domain_starts_at_zero() {
        let config = BubbleMapConfig {
            marker_domain: (0.0, 100_000.0),
            ..BubbleMapConfig::default()
        };
        let data: Dataset = [("34", 10.0)].into_iter().collect();
        let scene = BubbleMap::new(data, tables(), config).render().expect("renders");
        let radii = marker_radii(&scene);
        assert!(radii[0].1 > 3.0);
        assert_eq!(radii[1], ("06".to_string(), 0.0));
        assert_eq!(radii[2], (UNKNOWN_PROVINCE.to_string(), 0.0));
    }

    #[test]
    fn tooltip_fields_use_dashes_for_missing_figures() {
        let scene = scenario().render().expect("renders");
        let (unknown, _) = scene.with_class("unknown-province").next().expect("marker");
        let controller = TooltipController::for_scene(&scene)
            .handle(PointerEvent::Enter { shape: unknown, x: 0.0, y: 0.0 }, &scene);
        let state = controller.state();
        assert_eq!(
            state.field("province-name"),
            Some(&LocalizedText::new(UNKNOWN_PROVINCE, UNKNOWN_PROVINCE_TR))
        );
        assert_eq!(state.field("province-count"), Some(&LocalizedText::same("5")));
        assert_eq!(state.field("province-population"), Some(&LocalizedText::same("-")));
        assert_eq!(
            state.field("province-count-population-ratio"),
            Some(&LocalizedText::same("-"))
        );

        // Both regions dim while the unknown marker is active.
        let regions: Vec<_> = scene.with_class("map-section").map(|(id, _)| id).collect();
        assert_eq!(regions.len(), 2);
        assert!(regions.iter().all(|id| controller.is_dimmed(*id, &scene)));
    }

    #[test]
    fn leaving_a_region_restores_country_aggregate() {
        let scene = scenario().render().expect("renders");
        let rest = TooltipController::for_scene(&scene);
        assert_eq!(
            rest.state().field("province-name"),
            Some(&LocalizedText::new("Turkey", "Türkiye"))
        );
        assert_eq!(
            rest.state().field("province-population"),
            Some(&LocalizedText::new("1,500,000", "1.500.000"))
        );
        assert_eq!(
            rest.state().field("province-count-population-ratio"),
            Some(&LocalizedText::same("96"))
        );

        let (region, _) = scene.with_class("map-section").next().expect("region");
        let hovered = rest.handle(PointerEvent::Enter { shape: region, x: 1.0, y: 1.0 }, &scene);
        assert_eq!(hovered.state().entity(), Some(&EntityId::key("34")));
        assert_eq!(
            hovered.state().field("province-count-population-ratio"),
            Some(&LocalizedText::same("100"))
        );

        let left = hovered.handle(PointerEvent::Leave { shape: region }, &scene);
        assert_eq!(left.state(), rest.state());
        assert!(scene.shapes.iter().enumerate().all(|(id, _)| !left.is_dimmed(id, &scene)));
    }

    /// Collects formatted log output for assertions.
    #[derive(Clone, Default)]
    struct CapturedLog(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("log lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLog {
        type Writer = CapturedLog;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn boundary_without_stats_warns_and_uses_lowest_bucket() {
        let mut reference = (*tables()).clone();
        reference.boundaries.push(square("07", 30.5, 36.9));
        let map = BubbleMap::new(
            [("34", 3.0)].into_iter().collect(),
            Arc::new(reference),
            BubbleMapConfig::default(),
        );

        let log = CapturedLog::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(log.clone())
            .with_ansi(false)
            .without_time()
            .finish();
        let scene = tracing::subscriber::with_default(subscriber, || map.render()).expect("renders");

        let output = String::from_utf8(log.0.lock().expect("log lock").clone()).expect("utf8");
        assert!(output.contains("WARN"), "no warning in {output:?}");
        assert!(output.contains("province=07"), "province missing from {output:?}");

        let (_, stray) = scene.with_class("map-section").nth(2).expect("third region");
        assert_eq!(stray.fill.as_deref(), Some(BLUES_4[0]));
    }

    #[test]
    fn regions_are_filled_by_density_bucket() {
        let scene = scenario().render().expect("renders");
        let fills: Vec<_> = scene
            .with_class("map-section")
            .filter_map(|(_, s)| s.fill.clone())
            .collect();
        // 34 has density 100, 06 has 80, on the coarse palette.
        assert_eq!(fills, vec![BLUES_6[2].to_string(), BLUES_6[1].to_string()]);
    }
}
