use color_eyre::eyre::{eyre, Result};
use serde::Deserialize;
use serde_json::json;
use tracing::{instrument, warn};

use crate::clients::Clients;

pub const MODEL: &str = "gemini-pro";
pub const MISSING_KEY_ANSWER: &str = "API 키 확인 필요";
pub const FAILURE_ANSWER: &str = "AI 응답 오류";

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[instrument(skip(clients, api_key, prompt))]
async fn try_generate(clients: &Clients, api_key: &str, prompt: &str) -> Result<String> {
    let response = clients
        .http
        .post(format!(
            "{}/v1beta/models/{MODEL}:generateContent",
            clients.gemini_url
        ))
        .query(&[("key", api_key)])
        .json(&json!({ "contents": [{ "parts": [{ "text": prompt }] }] }))
        .send()
        .await?
        .error_for_status()?
        .json::<GenerateContentResponse>()
        .await?;
    let text = response
        .candidates
        .into_iter()
        .next()
        .ok_or(eyre!("No candidates in response"))?
        .content
        .parts
        .into_iter()
        .map(|part| part.text)
        .collect::<String>();
    if text.is_empty() {
        Err(eyre!("Empty answer"))
    } else {
        Ok(text)
    }
}

/// Answer a free text prompt. Never fails: errors become a fixed apology.
pub async fn answer(clients: &Clients, prompt: &str) -> String {
    let Some(api_key) = clients.gemini_api_key.as_deref() else {
        return MISSING_KEY_ANSWER.to_string();
    };
    try_generate(clients, api_key, prompt)
        .await
        .unwrap_or_else(|err| {
            warn!("assistant request failed: {err}");
            FAILURE_ANSWER.to_string()
        })
}
