//! Cognitive-load assessment of a single email.
//!
//! Recovers a subject line (email store first, text heuristics second),
//! sends the cognitive-load instruction block to the model, and parses the
//! JSON verdict it is contractually required to return.

use crate::config::Config;
use crate::email::{extract_body, extract_subject, EmailRecord};
use crate::email_api::EmailStoreClient;
use crate::gemini::{GeminiClient, GeminiError};
use crate::prompt::cognitive_load_prompt;
use serde::Deserialize;
use std::time::Duration;

pub struct LoadScan {
    config: Config,
}

/// The model's verdict. Key spellings (`Action_Intent`, `CLS_Score`) are part
/// of the output contract in the prompt and must match here.
#[derive(Debug, Deserialize)]
pub struct LoadAssessment {
    pub reasoning: LoadReasoning,
    #[serde(rename = "Action_Intent")]
    pub action_intent: String,
    #[serde(rename = "CLS_Score")]
    pub cls_score: f64,
}

#[derive(Debug, Deserialize)]
pub struct LoadReasoning {
    #[serde(default)]
    pub linguistic_load_analysis: String,
    #[serde(default)]
    pub action_load_analysis: String,
    #[serde(default)]
    pub final_justification: String,
}

impl LoadScan {
    pub fn new(config: &Config) -> Self {
        LoadScan {
            config: config.clone(),
        }
    }

    pub async fn assess(&self, email: &EmailRecord) -> Result<LoadAssessment, GeminiError> {
        let (subject, body) = self.recover_subject_and_body(email).await;
        let email_text = format!(
            "Subject: {}\n\n{}",
            if subject.is_empty() {
                "(No Subject)"
            } else {
                subject.as_str()
            },
            body
        );

        let prompt = cognitive_load_prompt(&email_text);
        let client = GeminiClient::from_config(&self.config)?;
        let reply = client.generate(&prompt).await?;
        parse_assessment(&reply)
    }

    /// Subject/body recovery order: the email store when reachable, then the
    /// headers map, then the raw-text heuristics. Store failures are silent.
    async fn recover_subject_and_body(&self, email: &EmailRecord) -> (String, String) {
        let timeout = Duration::from_secs(self.config.timeout_seconds);
        if let Ok(store) = EmailStoreClient::new(self.config.email_api_url(), timeout) {
            if let Some(found) = store.find(&email.sender, &email.message).await {
                return found;
            }
        }

        let subject = email
            .header_subject()
            .map(str::to_string)
            .or_else(|| extract_subject(&email.message))
            .unwrap_or_default();
        (subject, extract_body(&email.message))
    }
}

/// Parse the model's JSON verdict, tolerating a markdown code fence around
/// the object.
pub fn parse_assessment(reply: &str) -> Result<LoadAssessment, GeminiError> {
    let json = strip_markdown_fences(reply);
    serde_json::from_str(&json).map_err(|e| {
        GeminiError::InvalidResponse(format!("cognitive load verdict is not valid JSON: {e}"))
    })
}

fn strip_markdown_fences(input: &str) -> String {
    let trimmed = input.trim();

    let after_open = if let Some(stripped) = trimmed.strip_prefix("```json") {
        stripped
    } else if let Some(stripped) = trimmed.strip_prefix("```") {
        stripped
    } else {
        return trimmed.to_string();
    };
    let after_open = after_open.strip_prefix('\n').unwrap_or(after_open);

    match after_open.trim_end().strip_suffix("```") {
        Some(stripped) => stripped.trim_end().to_string(),
        None => after_open.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERDICT: &str = r#"{
        "reasoning": {
            "linguistic_load_analysis": "Simple and casual.",
            "action_load_analysis": "Single reply required.",
            "final_justification": "Low load overall."
        },
        "Action_Intent": "Simple Information Share",
        "CLS_Score": 1.4
    }"#;

    #[test]
    fn parses_plain_json_verdict() {
        let assessment = parse_assessment(VERDICT).unwrap();
        assert_eq!(assessment.action_intent, "Simple Information Share");
        assert!((assessment.cls_score - 1.4).abs() < f64::EPSILON);
        assert_eq!(
            assessment.reasoning.final_justification,
            "Low load overall."
        );
    }

    #[test]
    fn parses_fenced_json_verdict() {
        let fenced = format!("```json\n{VERDICT}\n```");
        let assessment = parse_assessment(&fenced).unwrap();
        assert_eq!(assessment.action_intent, "Simple Information Share");

        let bare_fence = format!("```\n{VERDICT}\n```");
        assert!(parse_assessment(&bare_fence).is_ok());
    }

    #[test]
    fn rejects_non_json_verdict() {
        let err = parse_assessment("the email looks easy to read").unwrap_err();
        assert!(matches!(err, GeminiError::InvalidResponse(_)));
    }

    #[test]
    fn rejects_verdict_missing_score() {
        let missing = r#"{"reasoning": {}, "Action_Intent": "x"}"#;
        assert!(parse_assessment(missing).is_err());
    }

    #[test]
    fn fence_stripping_leaves_plain_text_alone() {
        assert_eq!(strip_markdown_fences("  {\"a\":1} "), "{\"a\":1}");
    }
}
