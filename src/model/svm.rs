//! One-vs-rest linear SVM over standardized features.
use super::trainer::TrainingParams;
use crate::classifier::FEATURE_LEN;
use crate::error::{Result, SudokuError};
use serde::{Deserialize, Serialize};

pub const MODEL_VERSION: u32 = 1;

/// Trained classifier parameters. Immutable once loaded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub version: u32,
    pub feature_len: usize,
    /// Digit predicted by each row of `weights`.
    pub classes: Vec<u8>,
    pub mean: Vec<f32>,
    /// Zero for constant features, which then drop out.
    pub inv_std: Vec<f32>,
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
    #[serde(default)]
    pub params: TrainingParams,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    pub digit: u8,
    /// Softmax probability of `digit` over all class scores.
    pub confidence: f32,
    pub scores: Vec<f32>,
}

impl Model {
    /// Parse and validate a serialized model. `origin` names the source in
    /// error messages.
    pub fn from_json_bytes(bytes: &[u8], origin: &str) -> Result<Self> {
        let model: Model = serde_json::from_slice(bytes)
            .map_err(|e| SudokuError::model_load(origin, format!("invalid model JSON: {e}")))?;
        model
            .validate()
            .map_err(|reason| SudokuError::model_load(origin, reason))?;
        Ok(model)
    }

    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| SudokuError::TrainingData(format!("model is not serializable: {e}")))
    }

    /// Structural checks: dimensions agree, classes are distinct digits and
    /// every number is finite.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.version != MODEL_VERSION {
            return Err(format!(
                "unsupported model version {} (expected {MODEL_VERSION})",
                self.version
            ));
        }
        if self.feature_len != FEATURE_LEN {
            return Err(format!(
                "feature length {} does not match extractor length {FEATURE_LEN}",
                self.feature_len
            ));
        }
        if self.classes.len() < 2 {
            return Err(format!("model has {} classes, need at least 2", self.classes.len()));
        }
        let mut seen = [false; 10];
        for &c in &self.classes {
            if !(1..=9).contains(&c) {
                return Err(format!("class {c} is not a digit 1..=9"));
            }
            if std::mem::replace(&mut seen[c as usize], true) {
                return Err(format!("class {c} appears twice"));
            }
        }
        if self.mean.len() != self.feature_len || self.inv_std.len() != self.feature_len {
            return Err("normalization vectors do not match feature length".into());
        }
        if self.weights.len() != self.classes.len() || self.bias.len() != self.classes.len() {
            return Err("weights and biases do not match class count".into());
        }
        if self.weights.iter().any(|w| w.len() != self.feature_len) {
            return Err("weight row length does not match feature length".into());
        }
        let finite = self
            .mean
            .iter()
            .chain(&self.inv_std)
            .chain(&self.bias)
            .chain(self.weights.iter().flatten())
            .all(|v| v.is_finite());
        if !finite {
            return Err("model contains non-finite values".into());
        }
        Ok(())
    }

    pub fn standardize(&self, features: &[f32]) -> Vec<f32> {
        features
            .iter()
            .zip(self.mean.iter().zip(&self.inv_std))
            .map(|(&x, (&m, &s))| (x - m) * s)
            .collect()
    }

    /// Raw decision value per class for already standardized features.
    pub fn decision_values(&self, standardized: &[f32]) -> Vec<f32> {
        self.weights
            .iter()
            .zip(&self.bias)
            .map(|(w, &b)| dot(w, standardized) + b)
            .collect()
    }

    /// Most probable digit for a raw feature vector.
    pub fn predict(&self, features: &[f32]) -> std::result::Result<Prediction, String> {
        if features.len() != self.feature_len {
            return Err(format!(
                "feature vector has {} values, model expects {}",
                features.len(),
                self.feature_len
            ));
        }
        let scores = self.decision_values(&self.standardize(features));
        let (best, &top) = scores
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .ok_or_else(|| "model has no classes".to_string())?;
        let denom: f32 = scores.iter().map(|s| (s - top).exp()).sum();
        Ok(Prediction {
            digit: self.classes[best],
            confidence: 1.0 / denom,
            scores,
        })
    }
}

#[inline]
pub(crate) fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::model::test_support::constant_model;

    #[test]
    fn constant_model_predicts_its_digit() {
        let model = constant_model(6);
        let p = model.predict(&vec![0.3; FEATURE_LEN]).expect("prediction");
        assert_eq!(p.digit, 6);
        assert!(p.confidence > 1.0 / 9.0 && p.confidence < 1.0);
        assert_eq!(p.scores.len(), 9);
    }

    #[test]
    fn json_round_trip_is_lossless() {
        let model = constant_model(2);
        let bytes = model.to_json_bytes().expect("serialize");
        let back = Model::from_json_bytes(&bytes, "memory").expect("parse");
        assert_eq!(back, model);
    }

    #[test]
    fn corrupt_json_is_model_load() {
        let err = Model::from_json_bytes(b"{\"version\":1", "memory").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ModelLoad);
    }

    #[test]
    fn validation_rejects_bad_classes_and_shapes() {
        let mut model = constant_model(1);
        model.classes[0] = 0;
        assert!(model.validate().is_err());

        let mut model = constant_model(1);
        model.classes[1] = model.classes[0];
        assert!(model.validate().is_err());

        let mut model = constant_model(1);
        model.weights[3].pop();
        assert!(model.validate().is_err());

        let mut model = constant_model(1);
        model.mean[0] = f32::NAN;
        assert!(model.validate().is_err());
    }

    #[test]
    fn wrong_feature_length_is_reported() {
        let model = constant_model(5);
        assert!(model.predict(&[0.0; 4]).is_err());
    }
}
