use super::domain::{DocumentType, RiskCategory};

/// Maps a document type to the compliance domain its risks are reviewed under.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskFrameworkSelector;

impl RiskFrameworkSelector {
    pub fn select_category(&self, document_type: Option<DocumentType>) -> RiskCategory {
        match document_type {
            Some(DocumentType::PlatformTerms) => RiskCategory::LegalCompliance,
            Some(DocumentType::B2BContract) => RiskCategory::Contractual,
            Some(DocumentType::Nda) => RiskCategory::DataPrivacy,
            Some(DocumentType::EmailChangeOfTerms) => RiskCategory::LegalCompliance,
            Some(DocumentType::Other) | None => RiskCategory::Other,
        }
    }
}
