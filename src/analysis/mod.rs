//! Document analysis pipeline.
//!
//! A request flows through six stages: validation, classification, risk category mapping,
//! narrative synthesis, sanity checking and response assembly. The stages are plain values
//! composed by [`DocumentAnalysisService`]; only synthesis talks to the outside world, via a
//! [`TextGenerator`].

pub mod classifier;
pub mod domain;
pub mod formatter;
pub mod framework;
pub mod router;
pub mod sanity;
pub mod service;
pub mod synthesis;
pub mod validation;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

pub use classifier::{ClassificationRule, ClassifierRules, DocumentClassifier};
pub use domain::{
    AnalysisRequest, AnalysisResponse, DocumentType, ResponseMetadata, RiskCategory, RiskFinding,
    RiskItem, SynthesisResult,
};
pub use formatter::{ResponseFormatter, ANALYZER_VERSION};
pub use framework::RiskFrameworkSelector;
pub use router::analysis_router;
pub use sanity::{SanityCheckResult, SanityChecker, SanityRules, SanityViolation};
pub use service::{AnalysisServiceError, DocumentAnalysisService};
pub use synthesis::{
    ConfiguredGenerator, GenerationError, HttpGenerator, NarrativeSynthesizer, ScriptedGenerator,
    TextGenerator,
};
pub use validation::{RequestLimits, RequestValidator, ValidationError};

/// Tunable constants for every rule-driven stage. Missing sections fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisRules {
    pub limits: RequestLimits,
    pub classifier: ClassifierRules,
    pub sanity: SanityRules,
}
