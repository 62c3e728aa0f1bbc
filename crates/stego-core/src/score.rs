//! Risk scoring: embedding -> confidence percentage -> labeled bucket.
//!
//! The embedding is reduced to a single raw scalar by averaging its
//! components, squashed into [0, 1] with a logistic function, and
//! thresholded into a risk label. For low-risk images the reported
//! confidence is the confidence of being clean (100 - c), not the
//! confidence of being risky; callers must not "fix" that inversion.

use std::fmt;
use std::sync::Arc;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::ScanError;
use crate::extractor::FeatureExtractor;
use crate::preprocess::preprocess;

/// Confidence at or above this is high risk.
pub const HIGH_RISK_THRESHOLD: f32 = 75.0;
/// Confidence at or above this (and below high) is medium risk.
pub const MEDIUM_RISK_THRESHOLD: f32 = 60.0;

/// Risk bucket assigned to a scanned image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLabel {
    LowRisk,
    MediumRisk,
    HighRisk,
}

impl RiskLabel {
    /// Low risk counts as clean in the session summary.
    pub fn is_risky(self) -> bool {
        !matches!(self, RiskLabel::LowRisk)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLabel::LowRisk => "Low Risk",
            RiskLabel::MediumRisk => "Medium Risk",
            RiskLabel::HighRisk => "High Risk",
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable scoring outcome for one image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub label: RiskLabel,
    /// Percentage in [0, 100]. For `LowRisk` this is confidence of being
    /// clean; for the other labels, confidence of being risky.
    pub confidence: f32,
}

/// Detection sensitivity level, selected by the user.
///
/// Remapping is a pure post-scoring step: it only moves borderline labels
/// and never touches the stored confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sensitivity {
    /// Level 1: conservative alerts, medium risk demotes to low.
    Low,
    /// Level 2: balanced detection, labels pass through unchanged.
    Balanced,
    /// Level 3: aggressive detection, low risk promotes to medium.
    Aggressive,
}

impl Sensitivity {
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Sensitivity::Low),
            2 => Some(Sensitivity::Balanced),
            3 => Some(Sensitivity::Aggressive),
            _ => None,
        }
    }

    /// Remap a borderline label according to this sensitivity.
    pub fn remap(self, label: RiskLabel) -> RiskLabel {
        match (self, label) {
            (Sensitivity::Low, RiskLabel::MediumRisk) => RiskLabel::LowRisk,
            (Sensitivity::Aggressive, RiskLabel::LowRisk) => RiskLabel::MediumRisk,
            _ => label,
        }
    }
}

/// Fixed human-readable sentence for each label.
pub fn explanation(label: RiskLabel) -> &'static str {
    match label {
        RiskLabel::HighRisk => "Strong indicators of embedded data were found in the image features.",
        RiskLabel::MediumRisk => "Some statistical irregularities suggest possible hidden content.",
        RiskLabel::LowRisk => "No significant indicators of hidden data; the image appears clean.",
    }
}

/// Average the embedding components into the raw score.
pub fn raw_score(embedding: &[f32]) -> Result<f32, ScanError> {
    if embedding.is_empty() {
        return Err(ScanError::Model("extractor returned an empty embedding".into()));
    }
    Ok(embedding.iter().sum::<f32>() / embedding.len() as f32)
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Bucket a risk confidence percentage into a labeled result.
///
/// Below the medium threshold, the reported confidence flips to
/// confidence-of-clean.
pub fn classify(confidence: f32) -> ScoreResult {
    if confidence >= HIGH_RISK_THRESHOLD {
        ScoreResult {
            label: RiskLabel::HighRisk,
            confidence,
        }
    } else if confidence >= MEDIUM_RISK_THRESHOLD {
        ScoreResult {
            label: RiskLabel::MediumRisk,
            confidence,
        }
    } else {
        ScoreResult {
            label: RiskLabel::LowRisk,
            confidence: 100.0 - confidence,
        }
    }
}

/// Scores decoded images against an injected feature extractor.
pub struct Scorer {
    extractor: Arc<dyn FeatureExtractor>,
}

impl Scorer {
    pub fn new(extractor: Arc<dyn FeatureExtractor>) -> Self {
        Self { extractor }
    }

    /// Score one decoded image. Deterministic for a fixed extractor; no
    /// side effects beyond the inference call.
    pub fn score(&self, img: &DynamicImage) -> Result<ScoreResult, ScanError> {
        let input = preprocess(img);
        let embedding = self.extractor.embed(&input)?;
        let raw = raw_score(&embedding)?;
        let confidence = sigmoid(raw) * 100.0;
        Ok(classify(confidence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array4;

    struct StubExtractor {
        raw: f32,
    }

    impl FeatureExtractor for StubExtractor {
        fn embed(&self, _input: &Array4<f32>) -> Result<Vec<f32>, ScanError> {
            Ok(vec![self.raw; 16])
        }
    }

    fn test_image() -> DynamicImage {
        DynamicImage::ImageRgb8(image::RgbImage::from_pixel(8, 8, image::Rgb([100, 150, 200])))
    }

    #[test]
    fn threshold_boundaries() {
        assert_eq!(classify(59.99).label, RiskLabel::LowRisk);
        assert_eq!(classify(60.0).label, RiskLabel::MediumRisk);
        assert_eq!(classify(74.99).label, RiskLabel::MediumRisk);
        assert_eq!(classify(75.0).label, RiskLabel::HighRisk);
    }

    #[test]
    fn low_risk_reports_confidence_of_clean() {
        let result = classify(20.0);
        assert_eq!(result.label, RiskLabel::LowRisk);
        assert!((result.confidence - 80.0).abs() < 1e-4);

        // Medium and high keep the risk confidence as-is.
        assert!((classify(60.0).confidence - 60.0).abs() < 1e-4);
        assert!((classify(90.0).confidence - 90.0).abs() < 1e-4);
    }

    #[test]
    fn zero_raw_score_is_fifty_percent_low_risk() {
        let scorer = Scorer::new(Arc::new(StubExtractor { raw: 0.0 }));
        let result = scorer.score(&test_image()).unwrap();

        // sigmoid(0) = 0.5 -> 50% risk -> low risk, reported as 100 - 50 = 50.
        assert_eq!(result.label, RiskLabel::LowRisk);
        assert!((result.confidence - 50.0).abs() < 1e-3);
    }

    #[test]
    fn large_raw_score_is_high_risk() {
        let scorer = Scorer::new(Arc::new(StubExtractor { raw: 10.0 }));
        let result = scorer.score(&test_image()).unwrap();

        assert_eq!(result.label, RiskLabel::HighRisk);
        assert!(result.confidence > 99.9);
    }

    #[test]
    fn raw_score_averages_components() {
        assert!((raw_score(&[1.0, 2.0, 3.0]).unwrap() - 2.0).abs() < 1e-6);
        assert!(raw_score(&[]).is_err());
    }

    #[test]
    fn sensitivity_low_demotes_only_medium() {
        let s = Sensitivity::Low;
        assert_eq!(s.remap(RiskLabel::MediumRisk), RiskLabel::LowRisk);
        assert_eq!(s.remap(RiskLabel::LowRisk), RiskLabel::LowRisk);
        assert_eq!(s.remap(RiskLabel::HighRisk), RiskLabel::HighRisk);
    }

    #[test]
    fn sensitivity_aggressive_promotes_only_low() {
        let s = Sensitivity::Aggressive;
        assert_eq!(s.remap(RiskLabel::LowRisk), RiskLabel::MediumRisk);
        assert_eq!(s.remap(RiskLabel::MediumRisk), RiskLabel::MediumRisk);
        assert_eq!(s.remap(RiskLabel::HighRisk), RiskLabel::HighRisk);
    }

    #[test]
    fn sensitivity_balanced_is_identity() {
        let s = Sensitivity::Balanced;
        for label in [RiskLabel::LowRisk, RiskLabel::MediumRisk, RiskLabel::HighRisk] {
            assert_eq!(s.remap(label), label);
        }
    }

    #[test]
    fn sensitivity_levels_parse() {
        assert_eq!(Sensitivity::from_level(1), Some(Sensitivity::Low));
        assert_eq!(Sensitivity::from_level(2), Some(Sensitivity::Balanced));
        assert_eq!(Sensitivity::from_level(3), Some(Sensitivity::Aggressive));
        assert_eq!(Sensitivity::from_level(0), None);
        assert_eq!(Sensitivity::from_level(4), None);
    }

    #[test]
    fn explanations_are_fixed_per_label() {
        assert!(explanation(RiskLabel::HighRisk).contains("embedded data"));
        assert!(explanation(RiskLabel::LowRisk).contains("clean"));
    }
}
