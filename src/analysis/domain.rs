use serde::{Deserialize, Serialize};

/// Inbound analysis call: document text plus optional file name metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    /// Set when the text came from bytes that failed UTF-8 decoding.
    #[serde(skip)]
    undecodable: bool,
}

impl AnalysisRequest {
    pub fn new(text: impl Into<String>, file_name: Option<String>) -> Self {
        Self {
            text: Some(text.into()),
            file_name,
            undecodable: false,
        }
    }

    /// Decode raw document bytes. Invalid UTF-8 is kept in lossy form and flagged so
    /// validation reports the encoding problem instead of analysing replacement characters.
    pub fn from_bytes(bytes: &[u8], file_name: Option<String>) -> Self {
        match std::str::from_utf8(bytes) {
            Ok(text) => Self::new(text, file_name),
            Err(_) => Self {
                text: Some(String::from_utf8_lossy(bytes).into_owned()),
                file_name,
                undecodable: true,
            },
        }
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    pub fn is_undecodable(&self) -> bool {
        self.undecodable
    }
}

/// Coarse document category inferred from the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    PlatformTerms,
    B2BContract,
    #[serde(rename = "NDA")]
    Nda,
    EmailChangeOfTerms,
    Other,
}

impl DocumentType {
    pub fn ordered() -> [DocumentType; 5] {
        [
            DocumentType::PlatformTerms,
            DocumentType::B2BContract,
            DocumentType::Nda,
            DocumentType::EmailChangeOfTerms,
            DocumentType::Other,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DocumentType::PlatformTerms => "Platform Terms",
            DocumentType::B2BContract => "B2B Contract",
            DocumentType::Nda => "Non-Disclosure Agreement",
            DocumentType::EmailChangeOfTerms => "Email Change of Terms",
            DocumentType::Other => "Other",
        }
    }
}

/// Compliance domain associated with a document type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskCategory {
    LegalCompliance,
    Financial,
    Operational,
    Contractual,
    DataPrivacy,
    Security,
    Other,
}

impl RiskCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            RiskCategory::LegalCompliance => "Legal & Compliance",
            RiskCategory::Financial => "Financial",
            RiskCategory::Operational => "Operational",
            RiskCategory::Contractual => "Contractual",
            RiskCategory::DataPrivacy => "Data Privacy",
            RiskCategory::Security => "Security",
            RiskCategory::Other => "Other",
        }
    }
}

/// Single risk reported by the generator. Sub-fields stay `None` when the generator
/// omitted them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RiskFinding {
    pub level: Option<String>,
    pub description: Option<String>,
    pub impact: Option<String>,
}

/// Typed narrative extracted from the generator output, prior to sanity checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisResult {
    pub summary: String,
    pub key_points: Vec<String>,
    pub risks: Vec<RiskFinding>,
    pub recommendations: Vec<String>,
    pub confidence: f64,
}

impl SynthesisResult {
    /// Degenerate result carrying only a summary line.
    pub fn empty(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            key_points: Vec::new(),
            risks: Vec::new(),
            recommendations: Vec::new(),
            confidence: 0.0,
        }
    }

    pub fn no_content() -> Self {
        Self::empty("No content to analyze")
    }

    pub fn failed() -> Self {
        Self::empty("Analysis failed")
    }
}

/// Final, caller-facing analysis record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub document_type: String,
    pub risk_category: String,
    pub summary: String,
    pub key_points: Vec<String>,
    pub risks: Vec<RiskItem>,
    pub recommendations: Vec<String>,
    pub metadata: ResponseMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskItem {
    pub level: String,
    pub description: String,
    pub impact: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub analysis_timestamp: String,
    pub analyzer_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,
}
