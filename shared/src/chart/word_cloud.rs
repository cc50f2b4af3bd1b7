use crate::config::WordCloudConfig;
use crate::dataset::{Dataset, DatasetError};
use crate::layout::{LayoutParams, TextMeasure, WordItem, WordLayout};
use crate::scene::{Scene, Shape, ShapeKind, TextAnchor, TextSpan, Transform};

use super::ChartError;

/// Words sized by weight, packed around the centre. Weights are used as font
/// sizes directly; callers apply any sizing transform beforehand.
#[derive(Debug, Clone)]
pub struct WordCloud {
    pub words: Vec<WordItem>,
    pub config: WordCloudConfig,
}

impl WordCloud {
    pub fn new(words: Vec<WordItem>, config: WordCloudConfig) -> Self {
        Self { words, config }
    }

    pub fn from_dataset(data: &Dataset, config: WordCloudConfig) -> Self {
        let words = data
            .iter()
            .map(|(text, weight)| WordItem::new(text, weight))
            .collect();
        Self::new(words, config)
    }

    fn layout_params(&self) -> LayoutParams {
        let (width, height) = self.config.layout_size();
        LayoutParams {
            width,
            height,
            padding: self.config.padding,
            angle_step: self.config.angle_step,
            seed: self.config.seed,
        }
    }

    /// Weights become font sizes, so each must be finite and non-negative.
    fn validate(&self) -> Result<(), DatasetError> {
        for word in &self.words {
            if !word.weight.is_finite() {
                return Err(DatasetError::NonFinite {
                    label: word.text.clone(),
                });
            }
            if word.weight < 0.0 {
                return Err(DatasetError::Negative {
                    label: word.text.clone(),
                    value: word.weight,
                });
            }
        }
        Ok(())
    }

    /// Waits for the layout to finish, then emits only the placed words.
    pub async fn render(&self, measure: &dyn TextMeasure) -> Result<Scene, ChartError> {
        self.config.validate()?;
        self.validate()?;
        let params = self.layout_params();
        let outcome = WordLayout::new(params, measure).start(&self.words).await;

        let mut scene = Scene::new(self.config.width, self.config.height);
        scene.origin = (params.width / 2.0, params.height / 2.0);
        scene.layout = Some(outcome.summary());

        for word in &outcome.placed {
            scene.push(
                Shape::new(
                    ShapeKind::Text {
                        x: 0.0,
                        y: 0.0,
                        spans: vec![TextSpan::plain(word.text.as_str())],
                        anchor: TextAnchor::Middle,
                        font_size: Some(word.size),
                        font_family: Some(self.config.font_family.clone()),
                    },
                    "word-cloud-item",
                )
                .with_transform(Transform::translate(word.x, word.y).rotated(word.rotation)),
            );
        }
        Ok(scene)
    }
}
