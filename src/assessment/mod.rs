//! Content-aware sensitivity scoring.
//!
//! Keyword signals raise a base score, the score maps to a [`RiskLevel`], and each level
//! carries a fixed mitigation playbook. Independent of the narrative pipeline; callers run
//! request validation first.

pub mod category;

use serde::{Deserialize, Serialize};

pub use category::{CategoryClassification, CategoryClassifier, DocumentCategory};

const BASE_SCORE: f32 = 0.05;
const SHORT_CONTENT_CHARS: usize = 100;
const SHORT_CONTENT_PENALTY: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AnalysisFramework {
    Owasp,
    Nist,
    #[serde(rename = "ISO27001")]
    Iso27001,
    Gdpr,
    #[default]
    Custom,
}

impl AnalysisFramework {
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisFramework::Owasp => "OWASP",
            AnalysisFramework::Nist => "NIST",
            AnalysisFramework::Iso27001 => "ISO27001",
            AnalysisFramework::Gdpr => "GDPR",
            AnalysisFramework::Custom => "CUSTOM",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "OWASP" => Some(Self::Owasp),
            "NIST" => Some(Self::Nist),
            "ISO27001" | "ISO-27001" => Some(Self::Iso27001),
            "GDPR" => Some(Self::Gdpr),
            "CUSTOM" => Some(Self::Custom),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Minimal,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn from_score(score: f32) -> Self {
        if score >= 0.8 {
            RiskLevel::Critical
        } else if score >= 0.6 {
            RiskLevel::High
        } else if score >= 0.4 {
            RiskLevel::Medium
        } else if score >= 0.2 {
            RiskLevel::Low
        } else {
            RiskLevel::Minimal
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Minimal => "MINIMAL",
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }

    fn note(&self) -> Option<&'static str> {
        match self {
            RiskLevel::Critical => Some("CRITICAL: Immediate remediation action required"),
            RiskLevel::High => Some("HIGH: Elevated risk requires security review"),
            _ => None,
        }
    }

    fn mitigations(&self) -> &'static [&'static str] {
        match self {
            RiskLevel::Critical => &[
                "Quarantine document from unsecured access",
                "Conduct emergency security audit",
                "Implement strict access controls (need-to-know basis)",
                "Notify security team and relevant stakeholders",
                "Consider data classification and encryption",
            ],
            RiskLevel::High => &[
                "Implement role-based access controls (RBAC)",
                "Enable document access logging",
                "Conduct compliance review",
                "Schedule security assessment",
                "Implement encryption for storage and transmission",
            ],
            RiskLevel::Medium => &[
                "Ensure appropriate access controls are in place",
                "Monitor document access patterns",
                "Document data classification",
                "Implement version control and audit trails",
                "Review and update access documentation",
            ],
            RiskLevel::Low | RiskLevel::Minimal => &[
                "Maintain current security measures",
                "Continue regular monitoring",
                "Keep data access controls current",
                "Document any sensitive data properly",
                "Train staff on data handling best practices",
            ],
        }
    }
}

/// A family of sensitive content. `scored` terms add `weight`; `noted` terms only surface
/// the finding.
struct RiskSignal {
    weight: f32,
    scored: &'static [&'static str],
    noted: &'static [&'static str],
    finding: &'static str,
}

impl RiskSignal {
    fn scores(&self, content: &str) -> bool {
        self.scored.iter().any(|term| content.contains(term))
    }

    fn fires(&self, content: &str) -> bool {
        self.scores(content) || self.noted.iter().any(|term| content.contains(term))
    }
}

const CONTENT_SIGNALS: &[RiskSignal] = &[
    RiskSignal {
        weight: 0.35,
        scored: &["password", "api key", "api_key", "secret", "token", "credential"],
        noted: &[],
        finding: "Potential credentials, API keys, or security tokens detected in document",
    },
    RiskSignal {
        weight: 0.25,
        scored: &["confidential", "restricted", "proprietary"],
        noted: &[],
        finding: "Document contains proprietary or confidential information",
    },
    RiskSignal {
        weight: 0.30,
        scored: &["personal data", "pii", "ssn", "social security", "email address"],
        noted: &["phone number"],
        finding: "Personally Identifiable Information (PII) or personal data detected",
    },
    RiskSignal {
        weight: 0.35,
        scored: &["credit card", "bank account", "financial", "payment"],
        noted: &["bank", "account number"],
        finding: "Financial or payment information may be present",
    },
    RiskSignal {
        weight: 0.30,
        scored: &["medical", "health", "diagnosis", "patient", "prescription"],
        noted: &["treatment"],
        finding: "Protected Health Information (PHI) or medical records detected",
    },
    RiskSignal {
        weight: 0.20,
        scored: &["nda", "non-disclosure", "agreement", "contract"],
        noted: &["legal"],
        finding: "Legal agreements or confidentiality clauses present",
    },
];

const STRUCTURED_EXTENSIONS: &[&str] = &[".json", ".csv", ".xlsx", ".xml"];
const STRUCTURED_WEIGHT: f32 = 0.15;
const STRUCTURED_FINDING: &str =
    "Structured data format detected - verify access controls on data repository";

const BASELINE_FINDINGS: &[&str] = &[
    "Document analyzed with standard risk assessment",
    "No critical security indicators identified",
    "Continue regular security monitoring",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub framework: AnalysisFramework,
    pub risk_level: RiskLevel,
    pub risk_score: f32,
    pub identified_risks: Vec<String>,
    pub mitigation_recommendations: Vec<String>,
    pub rationale: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RiskAssessor;

impl RiskAssessor {
    pub fn assess(
        &self,
        text: &str,
        file_name: Option<&str>,
        framework: AnalysisFramework,
    ) -> RiskAssessment {
        let content = text.to_lowercase();
        let file_name = file_name.unwrap_or_default().to_lowercase();
        let structured = STRUCTURED_EXTENSIONS
            .iter()
            .any(|extension| file_name.ends_with(extension));

        let mut score = BASE_SCORE;
        for signal in CONTENT_SIGNALS {
            if signal.scores(&content) {
                score += signal.weight;
            }
        }
        if structured {
            score += STRUCTURED_WEIGHT;
        }
        if content.chars().count() < SHORT_CONTENT_CHARS {
            score -= SHORT_CONTENT_PENALTY;
        }
        let score = score.clamp(BASE_SCORE, 1.0);
        let level = RiskLevel::from_score(score);

        let mut identified_risks: Vec<String> = CONTENT_SIGNALS
            .iter()
            .filter(|signal| signal.fires(&content))
            .map(|signal| signal.finding.to_string())
            .collect();
        if structured {
            identified_risks.push(STRUCTURED_FINDING.to_string());
        }
        if let Some(note) = level.note() {
            identified_risks.push(note.to_string());
        }
        if identified_risks.is_empty() {
            identified_risks = BASELINE_FINDINGS.iter().map(|line| line.to_string()).collect();
        }

        RiskAssessment {
            framework,
            risk_level: level,
            risk_score: score,
            identified_risks,
            mitigation_recommendations: level
                .mitigations()
                .iter()
                .map(|line| line.to_string())
                .collect(),
            rationale: format!(
                "Risk Analysis using {} framework: Score {:.2}, Level: {}",
                framework.label(),
                score,
                level.label()
            ),
        }
    }
}
