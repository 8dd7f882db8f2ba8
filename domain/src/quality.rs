//! Quality and confidence scoring.
//!
//! Heuristic, deterministic scores in `0..=100`. The weights are a plain
//! struct so deployments can tune them without touching the formula.

use crate::core::string::is_round_trip_utf8;
use crate::generation::GenerationResult;
use crate::subject::SubjectContext;
use serde::{Deserialize, Serialize};

/// Tunable scoring constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Starting quality score
    pub baseline: f64,
    /// Points awarded at 100% context completeness (scaled linearly)
    pub completeness_weight: f64,
    /// Points for content length strictly between the two bounds
    pub length_bonus: f64,
    pub min_content_chars: usize,
    pub max_content_chars: usize,
    /// Points for content that is clean UTF-8
    pub encoding_bonus: f64,
    /// Confidence points when token accounting is present
    pub token_accounting_bonus: f64,
    /// Confidence points when completeness exceeds the threshold
    pub high_completeness_bonus: f64,
    pub high_completeness_threshold: u8,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            baseline: 50.0,
            completeness_weight: 30.0,
            length_bonus: 10.0,
            min_content_chars: 100,
            max_content_chars: 5000,
            encoding_bonus: 10.0,
            token_accounting_bonus: 5.0,
            high_completeness_bonus: 10.0,
            high_completeness_threshold: 80,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityScores {
    pub quality_score: u8,
    pub confidence_level: u8,
}

/// Derives quality and confidence from a result and the context it used.
#[derive(Debug, Clone, Default)]
pub struct QualityScorer {
    weights: ScoringWeights,
}

impl QualityScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Pure function of its inputs. Completeness is recomputed from
    /// `context` rather than trusted from the result.
    pub fn score(&self, result: &GenerationResult, context: &SubjectContext) -> QualityScores {
        let w = &self.weights;
        let completeness = context.completeness();

        let mut quality = w.baseline;
        quality += (f64::from(completeness) / 100.0) * w.completeness_weight;

        let len = result.content_len();
        if len > w.min_content_chars && len < w.max_content_chars {
            quality += w.length_bonus;
        }

        if let Some(content) = result.content.as_deref()
            && is_round_trip_utf8(content.as_bytes())
        {
            quality += w.encoding_bonus;
        }

        let quality_score = clamp_score(quality);

        let mut confidence = f64::from(quality_score);
        if result.metadata.has_token_accounting() {
            confidence += w.token_accounting_bonus;
        }
        if completeness > w.high_completeness_threshold {
            confidence += w.high_completeness_bonus;
        }

        QualityScores {
            quality_score,
            confidence_level: clamp_score(confidence),
        }
    }

    /// Score `result` and write the scores back into it.
    pub fn apply(&self, result: &mut GenerationResult, context: &SubjectContext) -> QualityScores {
        let scores = self.score(result, context);
        result.quality_score = scores.quality_score;
        result.confidence_level = scores.confidence_level;
        scores
    }
}

fn clamp_score(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::TokenUsage;
    use crate::request::ServiceType;

    fn full_context() -> SubjectContext {
        let mut context = SubjectContext::default();
        context.profile.id = "s-1".to_string();
        context
            .current_levels
            .insert("math".to_string(), "basic".to_string());
        context.support_needs.push("visual supports".to_string());
        context
    }

    fn result_with(content: Option<&str>, tokens: TokenUsage) -> GenerationResult {
        let mut result = GenerationResult::new("gen-1", ServiceType::LessonPlan, "s-1");
        result.content = content.map(str::to_string);
        result.metadata.tokens = tokens;
        result
    }

    #[test]
    fn test_full_marks() {
        let content = "a".repeat(500);
        let result = result_with(Some(&content), TokenUsage::new(100, 200));
        let scores = QualityScorer::default().score(&result, &full_context());

        // 50 + 30 + 10 + 10
        assert_eq!(scores.quality_score, 100);
        // 100 + 5 + 10, clamped
        assert_eq!(scores.confidence_level, 100);
    }

    #[test]
    fn test_empty_context_and_no_content() {
        let result = result_with(None, TokenUsage::default());
        let scores = QualityScorer::default().score(&result, &SubjectContext::default());

        assert_eq!(scores.quality_score, 50);
        assert_eq!(scores.confidence_level, 50);
    }

    #[test]
    fn test_length_band_is_exclusive() {
        let scorer = QualityScorer::default();
        let context = SubjectContext::default();

        let at_min = result_with(Some(&"x".repeat(100)), TokenUsage::default());
        let inside = result_with(Some(&"x".repeat(101)), TokenUsage::default());
        let at_max = result_with(Some(&"x".repeat(5000)), TokenUsage::default());

        // 50 + encoding 10
        assert_eq!(scorer.score(&at_min, &context).quality_score, 60);
        assert_eq!(scorer.score(&inside, &context).quality_score, 70);
        assert_eq!(scorer.score(&at_max, &context).quality_score, 60);
    }

    #[test]
    fn test_partial_completeness_rounds() {
        let mut context = SubjectContext::default();
        context.support_needs.push("wait time".to_string());
        // completeness 33 -> 50 + 9.9 = 59.9 -> 60
        let result = result_with(None, TokenUsage::new(1, 1));
        let scores = QualityScorer::default().score(&result, &context);
        assert_eq!(scores.quality_score, 60);
        assert_eq!(scores.confidence_level, 65);
    }

    #[test]
    fn test_replacement_character_keeps_encoding_bonus() {
        // U+FFFD is well-formed text; only malformed byte sequences lose the bonus.
        let content = format!("{}\u{FFFD}", "y".repeat(200));
        let result = result_with(Some(&content), TokenUsage::default());
        let scores = QualityScorer::default().score(&result, &SubjectContext::default());
        assert_eq!(scores.quality_score, 70);
    }

    #[test]
    fn test_length_band_counts_utf16_units() {
        let scorer = QualityScorer::default();
        let context = SubjectContext::default();

        // 60 chars, 120 UTF-16 units
        let astral = result_with(Some(&"\u{1F600}".repeat(60)), TokenUsage::default());
        assert_eq!(scorer.score(&astral, &context).quality_score, 70);

        // 2600 chars, 5200 UTF-16 units
        let too_long = result_with(Some(&"\u{1F600}".repeat(2600)), TokenUsage::default());
        assert_eq!(scorer.score(&too_long, &context).quality_score, 60);
    }

    #[test]
    fn test_scores_stay_in_bounds_for_extreme_weights() {
        let weights = ScoringWeights {
            baseline: 500.0,
            token_accounting_bonus: -1000.0,
            ..ScoringWeights::default()
        };
        let result = result_with(Some("short"), TokenUsage::new(1, 0));
        let scores = QualityScorer::new(weights).score(&result, &SubjectContext::default());
        assert_eq!(scores.quality_score, 100);
        assert_eq!(scores.confidence_level, 0);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let scorer = QualityScorer::default();
        let result = result_with(Some(&"z".repeat(300)), TokenUsage::new(10, 20));
        let context = full_context();
        let first = scorer.score(&result, &context);
        for _ in 0..10 {
            assert_eq!(scorer.score(&result, &context), first);
        }
    }

    #[test]
    fn test_apply_writes_scores() {
        let mut result = result_with(Some(&"w".repeat(150)), TokenUsage::new(10, 20));
        let scores = QualityScorer::default().apply(&mut result, &full_context());
        assert_eq!(result.quality_score, scores.quality_score);
        assert_eq!(result.confidence_level, scores.confidence_level);
    }
}
