//! Business-document categorisation from file name and extracted text.
//!
//! Runs beside the legal pipeline's [`DocumentClassifier`](crate::analysis::DocumentClassifier):
//! that one picks the review framework, this one files the document.

use serde::{Deserialize, Serialize};

const JSON_EXTENSION: &str = ".json";
const JSON_CONFIDENCE: f32 = 0.95;
const UNNAMED_CONFIDENCE: f32 = 0.45;
const NAMED_BASE_CONFIDENCE: f32 = 0.50;
const MATCH_POINTS_PER_UNIT: f32 = 200.0;
const ACCURACY_THRESHOLD: f32 = 0.80;
const UNNAMED_DOCUMENT: &str = "unnamed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentCategory {
    Contract,
    Invoice,
    Report,
    Policy,
    Agreement,
    Form,
    Other,
}

impl DocumentCategory {
    pub fn label(&self) -> &'static str {
        match self {
            DocumentCategory::Contract => "CONTRACT",
            DocumentCategory::Invoice => "INVOICE",
            DocumentCategory::Report => "REPORT",
            DocumentCategory::Policy => "POLICY",
            DocumentCategory::Agreement => "AGREEMENT",
            DocumentCategory::Form => "FORM",
            DocumentCategory::Other => "OTHER",
        }
    }
}

/// One category test: a file-name term or any of the content terms.
struct CategoryRule {
    category: DocumentCategory,
    name_terms: &'static [&'static str],
    text_terms: &'static [&'static str],
}

impl CategoryRule {
    fn matches(&self, name: &str, text: &str) -> bool {
        self.name_terms.iter().any(|term| name.contains(term))
            || self.text_terms.iter().any(|term| text.contains(term))
    }
}

const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: DocumentCategory::Contract,
        name_terms: &["contract"],
        text_terms: &["contract", "agreement"],
    },
    CategoryRule {
        category: DocumentCategory::Invoice,
        name_terms: &["invoice"],
        text_terms: &["invoice", "bill"],
    },
    CategoryRule {
        category: DocumentCategory::Report,
        name_terms: &["report"],
        text_terms: &["report", "analysis"],
    },
    CategoryRule {
        category: DocumentCategory::Policy,
        name_terms: &["policy"],
        text_terms: &["policy", "guideline"],
    },
    CategoryRule {
        category: DocumentCategory::Form,
        name_terms: &["form"],
        text_terms: &["form", "application"],
    },
    CategoryRule {
        category: DocumentCategory::Agreement,
        name_terms: &["agreement"],
        text_terms: &["agreement"],
    },
];

/// File-name terms and the points each adds to the confidence score.
const NAME_MATCH_POINTS: &[(&str, u32)] = &[
    ("contract", 30),
    ("invoice", 30),
    ("report", 25),
    ("policy", 25),
    ("form", 20),
    ("agreement", 30),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryClassification {
    pub category: DocumentCategory,
    pub confidence: f32,
    pub reason: String,
    /// Confidence reached the accuracy threshold.
    pub accurate: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryClassifier;

impl CategoryClassifier {
    pub fn classify(&self, text: &str, file_name: Option<&str>) -> CategoryClassification {
        let category = self.infer_category(text, file_name);
        let confidence = self.confidence(file_name);
        CategoryClassification {
            category,
            confidence,
            reason: reason(category, file_name),
            accurate: is_accurate(confidence),
        }
    }

    /// First matching rule in order; JSON data is always [`DocumentCategory::Other`].
    pub fn infer_category(&self, text: &str, file_name: Option<&str>) -> DocumentCategory {
        let name = file_name.unwrap_or_default().to_lowercase();
        let text = text.to_lowercase();

        if is_json(&name, &text) {
            return DocumentCategory::Other;
        }
        CATEGORY_RULES
            .iter()
            .find(|rule| rule.matches(&name, &text))
            .map(|rule| rule.category)
            .unwrap_or(DocumentCategory::Other)
    }

    /// Scored from the file name alone.
    pub fn confidence(&self, file_name: Option<&str>) -> f32 {
        let name = file_name.unwrap_or_default().to_lowercase();
        if name.ends_with(JSON_EXTENSION) {
            return JSON_CONFIDENCE;
        }
        if name.trim().is_empty() {
            return UNNAMED_CONFIDENCE;
        }

        let points: u32 = NAME_MATCH_POINTS
            .iter()
            .filter(|(term, _)| name.contains(term))
            .map(|(_, points)| points)
            .sum();
        (NAMED_BASE_CONFIDENCE + points as f32 / MATCH_POINTS_PER_UNIT).min(1.0)
    }
}

pub fn is_accurate(confidence: f32) -> bool {
    confidence >= ACCURACY_THRESHOLD
}

fn is_json(name: &str, text: &str) -> bool {
    name.ends_with(JSON_EXTENSION) || (text.trim_start().starts_with('{') && text.contains(':'))
}

fn reason(category: DocumentCategory, file_name: Option<&str>) -> String {
    let json_file = file_name
        .map(|name| name.to_lowercase().ends_with(JSON_EXTENSION))
        .unwrap_or(false);
    let name = file_name.unwrap_or(UNNAMED_DOCUMENT);

    if category == DocumentCategory::Other && json_file {
        format!("Document '{name}' is a JSON data file. Detected as structured data format.")
    } else {
        format!(
            "Document '{name}' has been classified as {} based on content analysis and document structure.",
            category.label()
        )
    }
}
