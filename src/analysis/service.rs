use std::time::Duration;

use tracing::{debug, info, warn};

use super::classifier::DocumentClassifier;
use super::domain::{AnalysisRequest, AnalysisResponse};
use super::formatter::ResponseFormatter;
use super::framework::RiskFrameworkSelector;
use super::sanity::SanityChecker;
use super::synthesis::{NarrativeSynthesizer, TextGenerator};
use super::validation::{RequestValidator, ValidationError};
use super::AnalysisRules;
use crate::assessment::{
    AnalysisFramework, CategoryClassification, CategoryClassifier, RiskAssessment, RiskAssessor,
};

/// Service composing the validation, classification, synthesis and sanity stages.
pub struct DocumentAnalysisService<G> {
    validator: RequestValidator,
    classifier: DocumentClassifier,
    selector: RiskFrameworkSelector,
    synthesizer: NarrativeSynthesizer<G>,
    checker: SanityChecker,
    formatter: ResponseFormatter,
    assessor: RiskAssessor,
    categorizer: CategoryClassifier,
}

impl<G> DocumentAnalysisService<G>
where
    G: TextGenerator + 'static,
{
    pub fn new(rules: AnalysisRules, generator: G) -> Self {
        Self::from_parts(rules, NarrativeSynthesizer::new(generator))
    }

    pub fn with_timeout(rules: AnalysisRules, generator: G, timeout: Duration) -> Self {
        Self::from_parts(rules, NarrativeSynthesizer::with_timeout(generator, timeout))
    }

    fn from_parts(rules: AnalysisRules, synthesizer: NarrativeSynthesizer<G>) -> Self {
        Self {
            validator: RequestValidator::new(rules.limits),
            classifier: DocumentClassifier::new(rules.classifier),
            selector: RiskFrameworkSelector,
            synthesizer,
            checker: SanityChecker::new(rules.sanity),
            formatter: ResponseFormatter,
            assessor: RiskAssessor,
            categorizer: CategoryClassifier,
        }
    }

    pub fn generator(&self) -> &G {
        self.synthesizer.generator()
    }

    /// Run the full pipeline. Validation failures are rejected before any generation work;
    /// a synthesized result that fails sanity checks surfaces every reason at once.
    pub async fn analyze(
        &self,
        request: AnalysisRequest,
    ) -> Result<AnalysisResponse, AnalysisServiceError> {
        self.validator.validate(&request)?;
        let text = request.text();
        debug!(
            chars = text.chars().count(),
            file_name = request.file_name.as_deref().unwrap_or("-"),
            "request validated"
        );

        let document_type = self.classifier.classify(text);
        let risk_category = self.selector.select_category(Some(document_type));
        debug!(?document_type, ?risk_category, "document classified");

        let result = self
            .synthesizer
            .synthesize(text, document_type, risk_category)
            .await;

        let check = self.checker.check(Some(&result));
        if !check.is_valid() {
            let reasons = check.errors();
            warn!(?reasons, "synthesized analysis rejected");
            return Err(AnalysisServiceError::Analysis { reasons });
        }

        let response = self
            .formatter
            .format(Some(document_type), Some(risk_category), Some(&result));
        info!(
            document_type = %response.document_type,
            risk_category = %response.risk_category,
            risks = response.risks.len(),
            "document analysis completed"
        );
        Ok(response)
    }

    /// Score the request text for sensitive content after the same input validation.
    pub fn assess(
        &self,
        request: &AnalysisRequest,
        framework: AnalysisFramework,
    ) -> Result<RiskAssessment, AnalysisServiceError> {
        self.validator.validate(request)?;
        let assessment = self
            .assessor
            .assess(request.text(), request.file_name.as_deref(), framework);
        info!(
            framework = framework.label(),
            level = assessment.risk_level.label(),
            score = assessment.risk_score,
            "risk assessment completed"
        );
        Ok(assessment)
    }

    /// File the request under a business-document category after input validation.
    pub fn categorize(
        &self,
        request: &AnalysisRequest,
    ) -> Result<CategoryClassification, AnalysisServiceError> {
        self.validator.validate(request)?;
        let classification = self
            .categorizer
            .classify(request.text(), request.file_name.as_deref());
        info!(
            category = classification.category.label(),
            confidence = classification.confidence,
            accurate = classification.accurate,
            "document categorised"
        );
        Ok(classification)
    }
}

/// Error raised by the analysis service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("analysis failed sanity check: {}", .reasons.join(", "))]
    Analysis { reasons: Vec<String> },
}

impl AnalysisServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisServiceError::Validation(_) => "Validation Error",
            AnalysisServiceError::Analysis { .. } => "Analysis Error",
        }
    }
}
