use serde::{Deserialize, Serialize};

use super::domain::SynthesisResult;

/// Structural and content bounds applied to synthesized output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SanityRules {
    /// Summary must be strictly longer than this many characters.
    pub min_summary_chars: usize,
    pub max_key_points: usize,
    pub max_risks: usize,
    pub max_recommendations: usize,
    pub min_confidence: f64,
    pub max_confidence: f64,
    /// Lowercase phrases that signal a degenerate or hallucinated answer.
    pub hallucination_phrases: Vec<String>,
}

impl Default for SanityRules {
    fn default() -> Self {
        Self {
            min_summary_chars: 10,
            max_key_points: 10,
            max_risks: 20,
            max_recommendations: 15,
            min_confidence: 0.0,
            max_confidence: 1.0,
            hallucination_phrases: [
                "i'm not sure",
                "i apologize",
                "i cannot",
                "i don't know",
                "unclear",
                "unable to determine",
                "insufficient information",
            ]
            .iter()
            .map(|phrase| phrase.to_string())
            .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanityViolation {
    MissingResult,
    InvalidSummary,
    IncompleteKeyPoints,
    MalformedRisks,
    InvalidRecommendations,
    InvalidConfidence,
    PotentialHallucination,
}

impl SanityViolation {
    pub fn message(&self) -> &'static str {
        match self {
            SanityViolation::MissingResult => "analysis result is null",
            SanityViolation::InvalidSummary => "summary invalid or missing",
            SanityViolation::IncompleteKeyPoints => "key points missing or incomplete",
            SanityViolation::MalformedRisks => "risks malformed",
            SanityViolation::InvalidRecommendations => "recommendations invalid",
            SanityViolation::InvalidConfidence => "confidence invalid",
            SanityViolation::PotentialHallucination => "potential hallucinations detected",
        }
    }
}

impl std::fmt::Display for SanityViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of a check. `errors()` gives the reason strings in rule order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanityCheckResult {
    pub valid: bool,
    pub violations: Vec<SanityViolation>,
}

impl SanityCheckResult {
    fn from_violations(violations: Vec<SanityViolation>) -> Self {
        Self {
            valid: violations.is_empty(),
            violations,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn errors(&self) -> Vec<String> {
        self.violations
            .iter()
            .map(|violation| violation.message().to_string())
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SanityChecker {
    rules: SanityRules,
}

impl SanityChecker {
    pub fn new(mut rules: SanityRules) -> Self {
        rules.hallucination_phrases = rules
            .hallucination_phrases
            .into_iter()
            .map(|phrase| phrase.to_lowercase())
            .filter(|phrase| !phrase.is_empty())
            .collect();
        Self { rules }
    }

    /// Accumulates every violated rule rather than stopping at the first.
    pub fn check(&self, result: Option<&SynthesisResult>) -> SanityCheckResult {
        let Some(result) = result else {
            return SanityCheckResult::from_violations(vec![SanityViolation::MissingResult]);
        };

        let rules = &self.rules;
        let mut violations = Vec::new();

        let summary = result.summary.trim();
        if summary.is_empty() || result.summary.chars().count() <= rules.min_summary_chars {
            violations.push(SanityViolation::InvalidSummary);
        }

        if result.key_points.is_empty() || result.key_points.len() > rules.max_key_points {
            violations.push(SanityViolation::IncompleteKeyPoints);
        }

        if result.risks.len() > rules.max_risks {
            violations.push(SanityViolation::MalformedRisks);
        }

        if result.recommendations.len() > rules.max_recommendations {
            violations.push(SanityViolation::InvalidRecommendations);
        }

        if !(rules.min_confidence..=rules.max_confidence).contains(&result.confidence) {
            violations.push(SanityViolation::InvalidConfidence);
        }

        if self.contains_hallucination(result) {
            violations.push(SanityViolation::PotentialHallucination);
        }

        SanityCheckResult::from_violations(violations)
    }

    fn contains_hallucination(&self, result: &SynthesisResult) -> bool {
        let combined = format!("{} {}", result.summary, result.key_points.join(" ")).to_lowercase();
        self.rules
            .hallucination_phrases
            .iter()
            .any(|phrase| combined.contains(phrase.as_str()))
    }
}
