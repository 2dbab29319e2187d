use serde::{Deserialize, Serialize};

use super::domain::DocumentType;

/// One "any keyword occurs" predicate and the tag it yields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRule {
    pub document_type: DocumentType,
    /// Lowercase substrings; containment, not token matching.
    pub keywords: Vec<String>,
}

impl ClassificationRule {
    fn new(document_type: DocumentType, keywords: &[&str]) -> Self {
        Self {
            document_type,
            keywords: keywords.iter().map(|keyword| keyword.to_string()).collect(),
        }
    }

    fn matches(&self, folded: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| folded.contains(keyword.as_str()))
    }
}

/// Ordered rule list; the first matching rule decides the document type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierRules {
    pub rules: Vec<ClassificationRule>,
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self {
            rules: vec![
                ClassificationRule::new(
                    DocumentType::Nda,
                    &[
                        "nda",
                        "non-disclosure",
                        "confidential",
                        "proprietary information",
                        "trade secret",
                        "confidentiality agreement",
                    ],
                ),
                ClassificationRule::new(
                    DocumentType::EmailChangeOfTerms,
                    &[
                        "changes to",
                        "policy update",
                        "effective date",
                        "subject: changes",
                        "from:",
                        "dear customer",
                    ],
                ),
                ClassificationRule::new(
                    DocumentType::PlatformTerms,
                    &[
                        "terms of service",
                        "terms and conditions",
                        "user agreement",
                        "service agreement",
                        "platform terms",
                        "acceptable use",
                    ],
                ),
                ClassificationRule::new(
                    DocumentType::B2BContract,
                    &[
                        "contract",
                        "agreement",
                        "vendor",
                        "supplier",
                        "service level agreement",
                        "sla",
                        "deliverables",
                    ],
                ),
            ],
        }
    }
}

/// Heuristic keyword classifier. Total: anything unmatched is [`DocumentType::Other`].
#[derive(Debug, Clone)]
pub struct DocumentClassifier {
    rules: Vec<ClassificationRule>,
}

impl Default for DocumentClassifier {
    fn default() -> Self {
        Self::new(ClassifierRules::default())
    }
}

impl DocumentClassifier {
    pub fn new(config: ClassifierRules) -> Self {
        let rules = config
            .rules
            .into_iter()
            .map(|rule| ClassificationRule {
                document_type: rule.document_type,
                keywords: rule
                    .keywords
                    .into_iter()
                    .map(|keyword| fold_case(&keyword))
                    .filter(|keyword| !keyword.is_empty())
                    .collect(),
            })
            .collect();
        Self { rules }
    }

    pub fn classify(&self, text: &str) -> DocumentType {
        if text.trim().is_empty() {
            return DocumentType::Other;
        }

        let folded = fold_case(text);
        self.rules
            .iter()
            .find(|rule| rule.matches(&folded))
            .map(|rule| rule.document_type)
            .unwrap_or(DocumentType::Other)
    }
}

/// Upper then lower: a text and its uppercase form fold to the same string even when
/// uppercasing maps a letter such as `ſ` or `ı` onto ASCII.
fn fold_case(text: &str) -> String {
    text.to_uppercase().to_lowercase()
}
