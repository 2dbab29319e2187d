mod extract;
mod generator;

pub use extract::{ExtractionError, FieldExtractors, FieldValue, SynthesisField};
pub use generator::{
    ConfiguredGenerator, GenerationError, HttpGenerator, ScriptedGenerator, TextGenerator,
};

use std::time::Duration;

use tracing::{debug, warn};

use super::domain::{DocumentType, RiskCategory, SynthesisResult};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const INSTRUCTION_PREAMBLE: &str = "\
You are a legal document analyzer. Analyze the provided document and extract:
1. A concise summary
2. Key points
3. Identified risks with level (HIGH, MEDIUM, LOW), description, and impact
4. Recommendations

Respond in JSON format with fields: summary, keyPoints, risks, recommendations, confidence";

pub fn build_prompt(text: &str, document_type: DocumentType, risk_category: RiskCategory) -> String {
    format!(
        "{INSTRUCTION_PREAMBLE}\n\nDocument Type: {}\nRisk Category: {}\n\nDocument content:\n{}",
        document_type.display_name(),
        risk_category.display_name(),
        text
    )
}

/// Turns document text into a [`SynthesisResult`] through an external generator.
///
/// Never fails: blank input, generator errors, timeouts and undecodable output all come
/// back as degenerate results with zero confidence.
pub struct NarrativeSynthesizer<G> {
    generator: G,
    extractors: FieldExtractors,
    timeout: Duration,
}

impl<G> NarrativeSynthesizer<G>
where
    G: TextGenerator,
{
    pub fn new(generator: G) -> Self {
        Self::with_timeout(generator, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(generator: G, timeout: Duration) -> Self {
        Self {
            generator,
            extractors: FieldExtractors::default(),
            timeout,
        }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub async fn synthesize(
        &self,
        text: &str,
        document_type: DocumentType,
        risk_category: RiskCategory,
    ) -> SynthesisResult {
        if text.trim().is_empty() {
            return SynthesisResult::no_content();
        }

        let prompt = build_prompt(text, document_type, risk_category);
        let raw = match tokio::time::timeout(self.timeout, self.generator.generate(&prompt)).await
        {
            Ok(Ok(raw)) => raw,
            Ok(Err(err)) => {
                warn!(error = %err, "text generation failed; degrading synthesis");
                return SynthesisResult::failed();
            }
            Err(_) => {
                warn!(timeout = ?self.timeout, "text generation timed out; degrading synthesis");
                return SynthesisResult::failed();
            }
        };

        debug!(response_len = raw.len(), "text generation returned");
        self.parse(&raw)
    }

    /// Field-by-field extraction; a located but undecodable field fails the whole result.
    pub fn parse(&self, raw: &str) -> SynthesisResult {
        match self.extractors.extract(raw) {
            Ok(result) => result,
            Err(err) => {
                warn!(error = %err, "generator output could not be decoded");
                SynthesisResult::failed()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingGenerator {
        calls: AtomicUsize,
        inner: ScriptedGenerator,
    }

    impl TextGenerator for CountingGenerator {
        fn generate(
            &self,
            prompt: &str,
        ) -> impl Future<Output = Result<String, GenerationError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.generate(prompt)
        }
    }

    struct StalledGenerator;

    impl TextGenerator for StalledGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("{}".to_string())
        }
    }

    struct BrokenGenerator;

    impl TextGenerator for BrokenGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
            Err(GenerationError::Transport("connection refused".to_string()))
        }
    }

    #[test]
    fn prompt_embeds_context_and_full_text() {
        let prompt = build_prompt(
            "Full document body",
            DocumentType::Nda,
            RiskCategory::DataPrivacy,
        );
        assert!(prompt.starts_with("You are a legal document analyzer."));
        assert!(prompt.contains("Document Type: Non-Disclosure Agreement"));
        assert!(prompt.contains("Risk Category: Data Privacy"));
        assert!(prompt.ends_with("Document content:\nFull document body"));
    }

    #[tokio::test]
    async fn reference_generator_produces_complete_result() {
        let synthesizer = NarrativeSynthesizer::new(ScriptedGenerator::reference());
        let result = synthesizer
            .synthesize("Some text", DocumentType::Other, RiskCategory::Other)
            .await;
        assert_eq!(result.summary, "Document analysis summary based on content");
        assert_eq!(result.key_points.len(), 3);
        assert_eq!(result.risks.len(), 2);
        assert_eq!(result.recommendations.len(), 2);
        assert_eq!(result.confidence, 0.85);
    }

    #[tokio::test]
    async fn blank_text_skips_the_generator() {
        let generator = CountingGenerator {
            calls: AtomicUsize::new(0),
            inner: ScriptedGenerator::reference(),
        };
        let synthesizer = NarrativeSynthesizer::new(generator);
        let result = synthesizer
            .synthesize("  \n ", DocumentType::Other, RiskCategory::Other)
            .await;
        assert_eq!(result, SynthesisResult::no_content());
        assert_eq!(synthesizer.generator().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn timeout_degrades_to_failed_result() {
        let synthesizer =
            NarrativeSynthesizer::with_timeout(StalledGenerator, Duration::from_millis(50));
        let result = synthesizer
            .synthesize("text", DocumentType::Other, RiskCategory::Other)
            .await;
        assert_eq!(result, SynthesisResult::failed());
    }

    #[tokio::test]
    async fn transport_failure_degrades_to_failed_result() {
        let synthesizer = NarrativeSynthesizer::new(BrokenGenerator);
        let result = synthesizer
            .synthesize("text", DocumentType::B2BContract, RiskCategory::Contractual)
            .await;
        assert_eq!(result.summary, "Analysis failed");
        assert_eq!(result.confidence, 0.0);
        assert!(result.key_points.is_empty());
    }

    #[tokio::test]
    async fn undecodable_number_degrades_to_failed_result() {
        let synthesizer = NarrativeSynthesizer::new(ScriptedGenerator::new(
            r#"{"summary": "A perfectly fine summary", "confidence": 0.8.1}"#,
        ));
        let result = synthesizer
            .synthesize("text", DocumentType::Other, RiskCategory::Other)
            .await;
        assert_eq!(result, SynthesisResult::failed());
    }
}
