use chrono::{DateTime, SecondsFormat, Utc};

use super::domain::{
    AnalysisResponse, DocumentType, ResponseMetadata, RiskCategory, RiskFinding, RiskItem,
    SynthesisResult,
};

pub const ANALYZER_VERSION: &str = "1.0.0";

const UNKNOWN_LABEL: &str = "Unknown";
const UNKNOWN_LEVEL: &str = "UNKNOWN";

/// Assembles the caller-facing [`AnalysisResponse`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseFormatter;

impl ResponseFormatter {
    pub fn format(
        &self,
        document_type: Option<DocumentType>,
        risk_category: Option<RiskCategory>,
        result: Option<&SynthesisResult>,
    ) -> AnalysisResponse {
        self.format_at(document_type, risk_category, result, Utc::now())
    }

    pub fn format_at(
        &self,
        document_type: Option<DocumentType>,
        risk_category: Option<RiskCategory>,
        result: Option<&SynthesisResult>,
        now: DateTime<Utc>,
    ) -> AnalysisResponse {
        let document_type = document_type
            .map(|value| value.display_name())
            .unwrap_or(UNKNOWN_LABEL)
            .to_string();
        let risk_category = risk_category
            .map(|value| value.display_name())
            .unwrap_or(UNKNOWN_LABEL)
            .to_string();
        let analysis_timestamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);

        let Some(result) = result else {
            return AnalysisResponse {
                document_type,
                risk_category,
                summary: "No analysis available".to_string(),
                key_points: Vec::new(),
                risks: Vec::new(),
                recommendations: Vec::new(),
                metadata: ResponseMetadata {
                    analysis_timestamp,
                    analyzer_version: ANALYZER_VERSION.to_string(),
                    confidence_score: None,
                },
            };
        };

        AnalysisResponse {
            document_type,
            risk_category,
            summary: result.summary.clone(),
            key_points: result.key_points.clone(),
            risks: result.risks.iter().map(risk_item).collect(),
            recommendations: result.recommendations.clone(),
            metadata: ResponseMetadata {
                analysis_timestamp,
                analyzer_version: ANALYZER_VERSION.to_string(),
                confidence_score: Some(result.confidence),
            },
        }
    }
}

fn risk_item(finding: &RiskFinding) -> RiskItem {
    RiskItem {
        level: finding
            .level
            .clone()
            .unwrap_or_else(|| UNKNOWN_LEVEL.to_string()),
        description: finding.description.clone().unwrap_or_default(),
        impact: finding.impact.clone().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap()
    }

    #[test]
    fn missing_result_produces_minimal_response() {
        let response = ResponseFormatter.format_at(
            Some(DocumentType::Nda),
            None,
            None,
            fixed_now(),
        );
        assert_eq!(response.document_type, "Non-Disclosure Agreement");
        assert_eq!(response.risk_category, "Unknown");
        assert_eq!(response.summary, "No analysis available");
        assert!(response.key_points.is_empty());
        assert!(response.risks.is_empty());
        assert!(response.metadata.confidence_score.is_none());
        assert_eq!(response.metadata.analysis_timestamp, "2025-03-14T09:26:53.000Z");
        assert_eq!(response.metadata.analyzer_version, ANALYZER_VERSION);
    }

    #[test]
    fn risks_map_in_order_with_defaults_for_missing_fields() {
        let result = SynthesisResult {
            summary: "Vendor agreement with broad indemnity".to_string(),
            key_points: vec!["Net 60 payment".to_string()],
            risks: vec![
                RiskFinding {
                    level: Some("HIGH".to_string()),
                    description: Some("Uncapped indemnity".to_string()),
                    impact: Some("Unlimited exposure".to_string()),
                },
                RiskFinding::default(),
            ],
            recommendations: vec!["Cap indemnity".to_string()],
            confidence: 0.6,
        };

        let response = ResponseFormatter.format_at(
            Some(DocumentType::B2BContract),
            Some(RiskCategory::Contractual),
            Some(&result),
            fixed_now(),
        );

        assert_eq!(response.document_type, "B2B Contract");
        assert_eq!(response.risk_category, "Contractual");
        assert_eq!(
            response.risks,
            vec![
                RiskItem {
                    level: "HIGH".to_string(),
                    description: "Uncapped indemnity".to_string(),
                    impact: "Unlimited exposure".to_string(),
                },
                RiskItem {
                    level: "UNKNOWN".to_string(),
                    description: String::new(),
                    impact: String::new(),
                },
            ]
        );
        assert_eq!(response.metadata.confidence_score, Some(0.6));
    }

    #[test]
    fn serialized_shape_uses_camel_case_keys() {
        let result = SynthesisResult::empty("Summary long enough");
        let response = ResponseFormatter.format_at(
            Some(DocumentType::PlatformTerms),
            Some(RiskCategory::LegalCompliance),
            Some(&result),
            fixed_now(),
        );
        let value = serde_json::to_value(&response).expect("serializes");
        assert_eq!(value["documentType"], "Platform Terms");
        assert_eq!(value["riskCategory"], "Legal & Compliance");
        assert!(value["keyPoints"].is_array());
        assert_eq!(value["metadata"]["confidenceScore"], 0.0);
        assert_eq!(value["metadata"]["analyzerVersion"], "1.0.0");
    }
}
