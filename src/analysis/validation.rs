use serde::{Deserialize, Serialize};

use super::domain::AnalysisRequest;

const DEFAULT_MAX_CHARS: usize = 50_000;

/// Input bounds applied before any analysis work starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestLimits {
    /// Maximum text length in Unicode scalar values.
    pub max_chars: usize,
}

impl Default for RequestLimits {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

/// Rejection reasons, in the order the rules are evaluated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Text field is required")]
    TextRequired,
    #[error("Text exceeds maximum length of {max} characters")]
    ExceedsMaximumLength { max: usize, found: usize },
    #[error("Text contains invalid encoding")]
    InvalidEncoding,
    #[error("Text rejected: binary content detected at character {position}")]
    BinaryContent { position: usize },
}

#[derive(Debug, Clone, Default)]
pub struct RequestValidator {
    limits: RequestLimits,
}

impl RequestValidator {
    pub fn new(limits: RequestLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &RequestLimits {
        &self.limits
    }

    /// First failing rule wins; `file_name` is never inspected.
    pub fn validate(&self, request: &AnalysisRequest) -> Result<(), ValidationError> {
        let text = match request.text.as_deref() {
            Some(text) if !text.trim().is_empty() => text,
            _ => return Err(ValidationError::TextRequired),
        };

        let length = text.chars().count();
        if length > self.limits.max_chars {
            return Err(ValidationError::ExceedsMaximumLength {
                max: self.limits.max_chars,
                found: length,
            });
        }

        if request.is_undecodable() {
            return Err(ValidationError::InvalidEncoding);
        }

        if let Some(position) = text.chars().position(is_binary_char) {
            return Err(ValidationError::BinaryContent { position });
        }

        Ok(())
    }
}

fn is_binary_char(c: char) -> bool {
    (c as u32) < 32 && !matches!(c, '\n' | '\r' | '\t')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(text: &str) -> Result<(), ValidationError> {
        RequestValidator::default().validate(&AnalysisRequest::new(text, None))
    }

    #[test]
    fn missing_or_blank_text_is_required() {
        let validator = RequestValidator::default();
        let missing = AnalysisRequest::default();
        assert_eq!(validator.validate(&missing), Err(ValidationError::TextRequired));
        assert_eq!(validate(""), Err(ValidationError::TextRequired));
        assert_eq!(validate(" \n\t "), Err(ValidationError::TextRequired));
        assert!(ValidationError::TextRequired
            .to_string()
            .contains("required"));
    }

    #[test]
    fn length_boundary_is_inclusive() {
        let exact = "a".repeat(50_000);
        assert_eq!(validate(&exact), Ok(()));

        let over = "a".repeat(50_001);
        match validate(&over) {
            Err(ValidationError::ExceedsMaximumLength { max, found }) => {
                assert_eq!(max, 50_000);
                assert_eq!(found, 50_001);
            }
            other => panic!("expected length error, got {other:?}"),
        }
    }

    #[test]
    fn length_counts_code_points_not_bytes() {
        let exact = "é".repeat(50_000);
        assert!(exact.len() > 50_000);
        assert_eq!(validate(&exact), Ok(()));
    }

    #[test]
    fn control_characters_are_binary_content() {
        for control in ['\0', '\u{1}', '\u{7}', '\u{b}', '\u{c}', '\u{1b}', '\u{1f}'] {
            let text = format!("header{control}payload");
            assert_eq!(
                validate(&text),
                Err(ValidationError::BinaryContent { position: 6 }),
                "control {:?} should be rejected",
                control
            );
        }
    }

    #[test]
    fn newlines_tabs_and_carriage_returns_are_allowed() {
        assert_eq!(validate("line one\r\nline two\tcolumn"), Ok(()));
    }

    #[test]
    fn undecodable_bytes_report_invalid_encoding() {
        let request = AnalysisRequest::from_bytes(b"contract \xff\xfe terms", None);
        assert_eq!(
            RequestValidator::default().validate(&request),
            Err(ValidationError::InvalidEncoding)
        );
    }

    #[test]
    fn length_rule_precedes_encoding_and_binary_rules() {
        let mut bytes = vec![b'a'; 50_001];
        bytes.push(0xff);
        let request = AnalysisRequest::from_bytes(&bytes, None);
        assert!(matches!(
            RequestValidator::default().validate(&request),
            Err(ValidationError::ExceedsMaximumLength { .. })
        ));
    }

    #[test]
    fn custom_limits_are_respected() {
        let validator = RequestValidator::new(RequestLimits { max_chars: 5 });
        assert!(validator
            .validate(&AnalysisRequest::new("123456", None))
            .is_err());
        assert!(validator
            .validate(&AnalysisRequest::new("12345", Some("x.txt".into())))
            .is_ok());
    }
}
