//! Single-shot rewrite of embed text through the configured model.

use {
    serde::{Deserialize, Serialize},
    tracing::{debug, warn},
};

use crate::{
    Error, Result,
    model::{ChatMessage, LlmProvider},
    prompt::{SYSTEM_PROMPT, build_user_prompt},
};

/// The text-bearing subset of an embed. Icons, image and color are never
/// sent to the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PolishFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer_text: Option<String>,
}

impl PolishFields {
    /// At least one field carries non-blank text.
    pub fn has_text(&self) -> bool {
        !self.supplied().is_empty()
    }

    /// Non-blank fields as `(json_key, label, text)`, in display order.
    fn supplied(&self) -> Vec<(&'static str, &'static str, &str)> {
        [
            ("authorName", "Author Name", &self.author_name),
            ("title", "Title", &self.title),
            ("description", "Description", &self.description),
            ("fieldName", "Field Name", &self.field_name),
            ("fieldValue", "Field Value", &self.field_value),
            ("footerText", "Footer Text", &self.footer_text),
        ]
        .into_iter()
        .filter_map(|(key, label, value)| {
            value
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .map(|v| (key, label, v))
        })
        .collect()
    }

    fn slot(&mut self, key: &str) -> Option<&mut Option<String>> {
        match key {
            "authorName" => Some(&mut self.author_name),
            "title" => Some(&mut self.title),
            "description" => Some(&mut self.description),
            "fieldName" => Some(&mut self.field_name),
            "fieldValue" => Some(&mut self.field_value),
            "footerText" => Some(&mut self.footer_text),
            _ => None,
        }
    }
}

/// Ask the model for a polished version of every supplied field.
///
/// The result only carries keys that were supplied and came back as strings.
/// Nothing is retried.
pub async fn polish(provider: &dyn LlmProvider, fields: &PolishFields) -> Result<PolishFields> {
    let supplied = fields.supplied();
    if supplied.is_empty() {
        return Err(Error::NothingToImprove);
    }

    let messages = [
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(build_user_prompt(&supplied)),
    ];
    debug!(
        provider = provider.name(),
        model = provider.id(),
        fields = supplied.len(),
        "requesting text polish"
    );
    let reply = provider.complete(&messages).await?;

    let parsed: serde_json::Value =
        serde_json::from_str(strip_code_fences(&reply)).map_err(|e| {
            warn!(error = %e, "model reply is not JSON");
            Error::UnparsableModelResponse {
                reason: e.to_string(),
            }
        })?;
    let serde_json::Value::Object(map) = parsed else {
        return Err(Error::UnparsableModelResponse {
            reason: "expected a JSON object".into(),
        });
    };

    let mut out = PolishFields::default();
    for (key, ..) in supplied {
        if let (Some(slot), Some(text)) = (out.slot(key), map.get(key).and_then(|v| v.as_str())) {
            *slot = Some(text.to_string());
        }
    }
    Ok(out)
}

/// Remove a Markdown code fence (with optional language tag) wrapped around
/// the reply.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Language tag, on its own line or inline before the payload.
    let body = rest
        .trim_start_matches(|c: char| c.is_ascii_alphanumeric())
        .trim_start();
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use {async_trait::async_trait, rstest::rstest};

    use super::*;

    struct CannedProvider {
        reply: String,
        seen: Mutex<Vec<ChatMessage>>,
    }

    impl CannedProvider {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.into(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for CannedProvider {
        fn name(&self) -> &str {
            "canned"
        }

        fn id(&self) -> &str {
            "canned-1"
        }

        async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
            self.seen.lock().unwrap().extend_from_slice(messages);
            Ok(self.reply.clone())
        }
    }

    #[rstest]
    #[case("{\"a\":1}", "{\"a\":1}")]
    #[case("```json\n{\"a\":1}\n```", "{\"a\":1}")]
    #[case("```\n{\"a\":1}```", "{\"a\":1}")]
    #[case("  ```JSON\n{\"a\":1}\n```  ", "{\"a\":1}")]
    #[case("```json {\"title\":\"Hi\"}```", "{\"title\":\"Hi\"}")]
    #[case("```json{\"a\":1}```", "{\"a\":1}")]
    #[case("```{\"a\":1}```", "{\"a\":1}")]
    fn fences_are_stripped(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_code_fences(input), expected);
    }

    #[tokio::test]
    async fn nothing_to_improve_skips_the_model() {
        let provider = CannedProvider::new("{}");
        let fields = PolishFields {
            title: Some("   ".into()),
            ..Default::default()
        };
        assert!(!fields.has_text());
        let err = polish(&provider, &fields).await.unwrap_err();
        assert!(matches!(err, Error::NothingToImprove));
        assert!(provider.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn only_supplied_string_keys_are_returned() {
        let provider = CannedProvider::new(
            "```json\n{\"title\":\"Release Notes\",\"description\":42,\"footerText\":\"Thanks\"}\n```",
        );
        let fields = PolishFields {
            title: Some("relase notes".into()),
            description: Some("fixd bugs".into()),
            ..Default::default()
        };
        let out = polish(&provider, &fields).await.unwrap();
        assert_eq!(out, PolishFields {
            title: Some("Release Notes".into()),
            ..Default::default()
        });

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], ChatMessage::system(SYSTEM_PROMPT));
    }

    #[tokio::test]
    async fn inline_fenced_reply_is_parsed() {
        let provider = CannedProvider::new("```json {\"title\":\"Hi there\"}```");
        let fields = PolishFields {
            title: Some("hi ther".into()),
            ..Default::default()
        };
        let out = polish(&provider, &fields).await.unwrap();
        assert_eq!(out.title.as_deref(), Some("Hi there"));
    }

    #[rstest]
    #[case("Sure! Here you go.")]
    #[case("[\"title\"]")]
    #[tokio::test]
    async fn unparsable_reply_is_reported(#[case] reply: &str) {
        let provider = CannedProvider::new(reply);
        let fields = PolishFields {
            title: Some("x".into()),
            ..Default::default()
        };
        let err = polish(&provider, &fields).await.unwrap_err();
        assert!(matches!(err, Error::UnparsableModelResponse { .. }));
    }

    #[test]
    fn output_serializes_camel_case_without_nulls() {
        let out = PolishFields {
            footer_text: Some("Bye".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(out).unwrap(),
            serde_json::json!({ "footerText": "Bye" })
        );
    }
}
