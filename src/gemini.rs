//! Gemini client for grounded legal analysis.
//!
//! Sends `generateContent` requests with the `google_search` tool enabled and
//! extracts both the narrative answer and the grounding references, so the
//! UI can show the analysis alongside supporting links.

use std::collections::HashSet;

use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::jurisdiction::LawSystem;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Rendered in place of a result for any analysis failure; the cause is
/// logged but never distinguished in the UI.
pub const ANALYSIS_FALLBACK: &str =
    "حدث خطأ أثناء التحليل. يرجى التحقق من اتصال الإنترنت أو صلاحية مفتاح الـ API.";

/// One grounding citation attached to an analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLink {
    pub title: String,
    pub uri: String,
}

/// The narrative plus citation list returned for one submitted case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    pub text: String,
    pub sources: Vec<SourceLink>,
}

impl AnalysisResult {
    pub fn fallback() -> Self {
        Self {
            text: ANALYSIS_FALLBACK.to_string(),
            sources: Vec::new(),
        }
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    tools: Vec<Tool>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize, Default)]
struct Tool {
    google_search: GoogleSearchConfig,
}

#[derive(Serialize, Default)]
struct GoogleSearchConfig {}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    /// Run one grounded analysis of a case under the given law system.
    ///
    /// Any failure (network, non-2xx status, payload without text) is an
    /// error; the caller substitutes [`AnalysisResult::fallback`].
    pub async fn analyze(&self, law_system: LawSystem, details: &str) -> Result<AnalysisResult> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            BASE_URL, self.model, self.api_key
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: build_analysis_prompt(law_system, details),
                }],
            }],
            tools: vec![Tool::default()],
        };

        tracing::info!(
            law_system = law_system.as_str(),
            model = %self.model,
            "Submitting case for analysis"
        );

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Gemini API error {}: {}", status, body));
        }

        let payload: Value = response.json().await?;

        let text =
            extract_text(&payload).ok_or_else(|| anyhow!("Gemini response contained no text"))?;
        let sources = extract_sources(&payload);

        tracing::info!(sources = sources.len(), "Analysis complete");

        Ok(AnalysisResult { text, sources })
    }
}

fn build_analysis_prompt(law_system: LawSystem, details: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str("أنت مستشار قانوني خبير متخصص في ");
    prompt.push_str(law_system.label());
    prompt.push_str(". قدّم دراسة قانونية مبدئية للحالة التالية: ");
    prompt.push_str("التكييف القانوني للوقائع، المواد والأنظمة ذات الصلة، ");
    prompt.push_str("ثم الخطوات العملية المقترحة. ");
    prompt.push_str("اختم بتنبيه واضح أن هذا التحليل مبدئي ولا يغني عن استشارة محامٍ مرخص.\n\n");
    prompt.push_str("وقائع الحالة:\n");
    prompt.push_str(details);

    prompt
}

/// Concatenate the text parts of every candidate.
fn extract_text(root: &Value) -> Option<String> {
    let candidates = root.get("candidates")?.as_array()?;

    let mut collected = Vec::new();
    for candidate in candidates {
        if let Some(parts) = candidate
            .get("content")
            .and_then(|content| content.get("parts"))
            .and_then(|parts| parts.as_array())
        {
            for part in parts {
                if let Some(text) = part.get("text").and_then(|t| t.as_str()) {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        collected.push(trimmed.to_string());
                    }
                }
            }
        }
    }

    if collected.is_empty() {
        None
    } else {
        Some(collected.join("\n\n"))
    }
}

/// Pull `{title, uri}` pairs out of the grounding metadata, deduplicated by
/// uri. A chunk without a uri is skipped; a missing title falls back to the
/// uri itself.
fn extract_sources(root: &Value) -> Vec<SourceLink> {
    let mut seen = HashSet::new();
    let mut sources = Vec::new();

    let candidates = match root.get("candidates").and_then(|c| c.as_array()) {
        Some(list) => list,
        None => return sources,
    };

    for candidate in candidates {
        let chunks = match candidate
            .get("groundingMetadata")
            .and_then(|m| m.get("groundingChunks"))
            .and_then(|chunks| chunks.as_array())
        {
            Some(list) => list,
            None => continue,
        };

        for chunk in chunks {
            let Some(web) = chunk.get("web") else {
                continue;
            };

            let Some(uri) = web.get("uri").and_then(|v| v.as_str()) else {
                continue;
            };

            if !seen.insert(uri.to_string()) {
                continue;
            }

            let title = web
                .get("title")
                .and_then(|v| v.as_str())
                .filter(|t| !t.is_empty())
                .unwrap_or(uri)
                .to_string();

            sources.push(SourceLink {
                title,
                uri: uri.to_string(),
            });
        }
    }

    sources
}
