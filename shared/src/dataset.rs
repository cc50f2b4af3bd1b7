use std::cmp::Ordering;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DatasetError {
    #[error("dataset is empty")]
    Empty,
    #[error("value for `{label}` is negative: {value}")]
    Negative { label: String, value: f64 },
    #[error("value for `{label}` is not a finite number")]
    NonFinite { label: String },
}

/// Label -> non-negative value, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    entries: IndexMap<String, f64>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn insert(&mut self, label: impl Into<String>, value: f64) {
        self.entries.insert(label.into(), value);
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn total(&self) -> f64 {
        self.entries.values().sum()
    }

    /// Largest value, or 0 for an empty dataset.
    pub fn max(&self) -> f64 {
        self.entries.values().copied().fold(0.0, f64::max)
    }

    /// Every value must be finite and non-negative.
    pub fn validate(&self) -> Result<(), DatasetError> {
        for (label, &value) in &self.entries {
            if !value.is_finite() {
                return Err(DatasetError::NonFinite {
                    label: label.clone(),
                });
            }
            if value < 0.0 {
                return Err(DatasetError::Negative {
                    label: label.clone(),
                    value,
                });
            }
        }
        Ok(())
    }

    /// [`validate`](Self::validate) plus a non-empty check.
    pub fn validate_non_empty(&self) -> Result<(), DatasetError> {
        if self.entries.is_empty() {
            return Err(DatasetError::Empty);
        }
        self.validate()
    }

    /// Entries by descending value; equal values by ascending label.
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut out: Vec<(&str, f64)> = self.iter().collect();
        out.sort_by(|a, b| match b.1.partial_cmp(&a.1) {
            Some(Ordering::Equal) | None => a.0.cmp(b.0),
            Some(ord) => ord,
        });
        out
    }

    /// The `n` highest-ranked entries as a new dataset, in rank order.
    pub fn top_n(&self, n: usize) -> Dataset {
        let mut out = Dataset::new();
        for (label, value) in self.ranked().into_iter().take(n) {
            out.insert(label, value);
        }
        out
    }

    pub fn map_values(&self, transform: WeightTransform) -> Dataset {
        Dataset {
            entries: self
                .entries
                .iter()
                .map(|(k, v)| (k.clone(), transform.apply(*v)))
                .collect(),
        }
    }

    /// Grand total plus the `n` largest entries, leaving out `exclude`.
    pub fn summary(&self, n: usize, exclude: &str) -> CountSummary {
        let top = self
            .ranked()
            .into_iter()
            .filter(|(label, _)| *label != exclude)
            .take(n)
            .map(|(label, value)| (label.to_string(), value))
            .collect();
        CountSummary {
            total: self.total(),
            top,
        }
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Dataset {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Figures shown on the count cards beside each map.
#[derive(Debug, Clone, PartialEq)]
pub struct CountSummary {
    pub total: f64,
    pub top: Vec<(String, f64)>,
}

/// Value-to-weight transforms applied by callers before word layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum WeightTransform {
    Identity,
    Sqrt { factor: f64 },
    Log2 { factor: f64 },
}

impl WeightTransform {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Self::Identity => value,
            Self::Sqrt { factor } => value.max(0.0).sqrt() * factor,
            // log2 of values at or below 1 would give an empty or negative size.
            Self::Log2 { factor } => value.max(1.0).log2() * factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        [("b", 3.0), ("a", 3.0), ("c", 10.0), ("d", 1.0)]
            .into_iter()
            .collect()
    }

    #[test]
    fn json_preserves_input_order() {
        let ds = Dataset::from_json(r#"{"Go": 50, "Rust": 30, "Other": 20}"#).expect("parse");
        assert_eq!(ds.labels().collect::<Vec<_>>(), vec!["Go", "Rust", "Other"]);
        assert_eq!(ds.total(), 100.0);
        assert_eq!(ds.max(), 50.0);
    }

    #[test]
    fn validate_rejects_negative_and_non_finite() {
        let mut ds = sample();
        assert_eq!(ds.validate(), Ok(()));
        ds.insert("neg", -1.0);
        assert_eq!(
            ds.validate(),
            Err(DatasetError::Negative {
                label: "neg".into(),
                value: -1.0
            })
        );

        let nan: Dataset = [("x", f64::NAN)].into_iter().collect();
        assert_eq!(
            nan.validate(),
            Err(DatasetError::NonFinite { label: "x".into() })
        );
        assert_eq!(Dataset::new().validate_non_empty(), Err(DatasetError::Empty));
    }

    #[test]
    fn ranked_breaks_ties_by_label() {
        let ds = sample();
        let ranked = ds.ranked();
        assert_eq!(
            ranked,
            vec![("c", 10.0), ("a", 3.0), ("b", 3.0), ("d", 1.0)]
        );
    }

    #[test]
    fn top_n_keeps_rank_order() {
        let top = sample().top_n(2);
        assert_eq!(top.labels().collect::<Vec<_>>(), vec!["c", "a"]);
        assert_eq!(sample().top_n(99).len(), 4);
    }

    #[test]
    fn summary_excludes_sentinel_but_counts_it_in_total() {
        let ds: Dataset = [("34", 100.0), ("-Unknown-", 500.0), ("06", 40.0), ("35", 7.0)]
            .into_iter()
            .collect();
        let summary = ds.summary(2, "-Unknown-");
        assert_eq!(summary.total, 647.0);
        assert_eq!(
            summary.top,
            vec![("34".to_string(), 100.0), ("06".to_string(), 40.0)]
        );
    }

    #[test]
    fn weight_transforms() {
        assert_eq!(WeightTransform::Identity.apply(7.0), 7.0);
        assert_eq!(WeightTransform::Sqrt { factor: 4.0 }.apply(25.0), 20.0);
        assert_eq!(WeightTransform::Log2 { factor: 2.0 }.apply(1024.0), 20.0);
        assert_eq!(WeightTransform::Log2 { factor: 2.0 }.apply(0.5), 0.0);

        let mapped = sample().map_values(WeightTransform::Sqrt { factor: 1.0 });
        assert_eq!(mapped.labels().collect::<Vec<_>>(), vec!["b", "a", "c", "d"]);
        assert_eq!(mapped.get("d"), Some(1.0));
    }
}
