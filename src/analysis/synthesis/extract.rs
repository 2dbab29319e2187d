//! Tolerant field-by-field extraction from generator output that merely resembles JSON.
//!
//! Every field has its own pattern and default; a field that cannot be located falls back
//! to the default without affecting the others. A field that is located but undecodable is
//! an [`ExtractionError`].

use regex::Regex;

use super::super::domain::{RiskFinding, SynthesisResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisField {
    Summary,
    KeyPoints,
    Risks,
    Recommendations,
    Confidence,
}

impl SynthesisField {
    pub fn key(&self) -> &'static str {
        match self {
            SynthesisField::Summary => "summary",
            SynthesisField::KeyPoints => "keyPoints",
            SynthesisField::Risks => "risks",
            SynthesisField::Recommendations => "recommendations",
            SynthesisField::Confidence => "confidence",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    QuotedString,
    StringList,
    ObjectList,
    Number,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Findings(Vec<RiskFinding>),
    Number(f64),
}

impl FieldValue {
    fn default_for(strategy: Strategy) -> Self {
        match strategy {
            Strategy::QuotedString => FieldValue::Text(String::new()),
            Strategy::StringList => FieldValue::List(Vec::new()),
            Strategy::ObjectList => FieldValue::Findings(Vec::new()),
            Strategy::Number => FieldValue::Number(0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("field '{field}' could not be decoded: {reason}")]
pub struct ExtractionError {
    pub field: &'static str,
    pub reason: String,
}

struct FieldExtractor {
    field: SynthesisField,
    strategy: Strategy,
    pattern: Regex,
}

impl FieldExtractor {
    fn new(field: SynthesisField, strategy: Strategy) -> Self {
        let key = regex::escape(field.key());
        let pattern = match strategy {
            Strategy::QuotedString => format!(r#""{key}"\s*:\s*"([^"]*)""#),
            Strategy::StringList => format!(r#""{key}"\s*:\s*\[([^\]]*)\]"#),
            Strategy::ObjectList => format!(r#""{key}"\s*:\s*\["#),
            Strategy::Number => format!(r#""{key}"\s*:\s*(-?[\d.]+)"#),
        };
        let pattern = Regex::new(&pattern).expect("extraction pattern is a valid regex");
        Self {
            field,
            strategy,
            pattern,
        }
    }

    fn extract(&self, raw: &str) -> Result<FieldValue, ExtractionError> {
        let value = match self.strategy {
            Strategy::QuotedString => self
                .pattern
                .captures(raw)
                .map(|captures| FieldValue::Text(captures[1].to_string())),
            Strategy::StringList => self
                .pattern
                .captures(raw)
                .map(|captures| FieldValue::List(split_string_list(&captures[1]))),
            Strategy::ObjectList => self
                .pattern
                .find(raw)
                .map(|found| FieldValue::Findings(scan_findings(&raw[found.end()..]))),
            Strategy::Number => match self.pattern.captures(raw) {
                Some(captures) => {
                    let literal = &captures[1];
                    let number = literal.parse::<f64>().map_err(|err| ExtractionError {
                        field: self.field.key(),
                        reason: format!("'{literal}' is not a number ({err})"),
                    })?;
                    Some(FieldValue::Number(number))
                }
                None => None,
            },
        };

        Ok(value.unwrap_or_else(|| FieldValue::default_for(self.strategy)))
    }
}

/// The extractor table, compiled once and shared across requests.
pub struct FieldExtractors {
    extractors: Vec<FieldExtractor>,
}

impl Default for FieldExtractors {
    fn default() -> Self {
        Self {
            extractors: vec![
                FieldExtractor::new(SynthesisField::Summary, Strategy::QuotedString),
                FieldExtractor::new(SynthesisField::KeyPoints, Strategy::StringList),
                FieldExtractor::new(SynthesisField::Risks, Strategy::ObjectList),
                FieldExtractor::new(SynthesisField::Recommendations, Strategy::StringList),
                FieldExtractor::new(SynthesisField::Confidence, Strategy::Number),
            ],
        }
    }
}

impl std::fmt::Debug for FieldExtractors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.extractors.iter().map(|extractor| extractor.field))
            .finish()
    }
}

impl FieldExtractors {
    pub fn extract(&self, raw: &str) -> Result<SynthesisResult, ExtractionError> {
        let mut result = SynthesisResult::empty(String::new());
        for extractor in &self.extractors {
            let value = extractor.extract(raw)?;
            apply(&mut result, extractor.field, value);
        }
        Ok(result)
    }
}

fn apply(result: &mut SynthesisResult, field: SynthesisField, value: FieldValue) {
    match (field, value) {
        (SynthesisField::Summary, FieldValue::Text(summary)) => result.summary = summary,
        (SynthesisField::KeyPoints, FieldValue::List(items)) => result.key_points = items,
        (SynthesisField::Risks, FieldValue::Findings(findings)) => result.risks = findings,
        (SynthesisField::Recommendations, FieldValue::List(items)) => {
            result.recommendations = items
        }
        (SynthesisField::Confidence, FieldValue::Number(number)) => result.confidence = number,
        (field, value) => {
            tracing::warn!(?field, ?value, "extractor produced a mismatched value; ignored")
        }
    }
}

fn split_string_list(content: &str) -> Vec<String> {
    let quoted = quoted_items();
    let items: Vec<String> = if content.contains('"') {
        quoted
            .captures_iter(content)
            .map(|captures| captures[1].trim().to_string())
            .collect()
    } else {
        content.split(',').map(|item| item.trim().to_string()).collect()
    };

    items.into_iter().filter(|item| !item.is_empty()).collect()
}

fn quoted_items() -> &'static Regex {
    static QUOTED: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    QUOTED.get_or_init(|| Regex::new(r#""([^"]*)""#).expect("quoted item regex is valid"))
}

/// Collect the top-level `{...}` objects of a list whose opening `[` was already consumed.
/// Stops at the closing `]`, or at end of input for a truncated response.
fn scan_findings(rest: &str) -> Vec<RiskFinding> {
    let mut findings = Vec::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut start = None;

    for (index, c) in rest.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => {
                if depth == 0 {
                    start = Some(index);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(begin) = start.take() {
                        findings.push(parse_finding(&rest[begin..=index]));
                    }
                }
            }
            ']' if depth == 0 => break,
            _ => {}
        }
    }

    findings
}

fn parse_finding(object: &str) -> RiskFinding {
    let [level, description, impact] = finding_patterns();
    RiskFinding {
        level: quoted_value(level, object),
        description: quoted_value(description, object),
        impact: quoted_value(impact, object),
    }
}

fn finding_patterns() -> &'static [Regex; 3] {
    static PATTERNS: std::sync::OnceLock<[Regex; 3]> = std::sync::OnceLock::new();
    PATTERNS.get_or_init(|| {
        ["level", "description", "impact"].map(|key| {
            Regex::new(&format!(r#""{key}"\s*:\s*"([^"]*)""#))
                .expect("finding pattern is a valid regex")
        })
    })
}

fn quoted_value(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .map(|captures| captures[1].to_string())
}
