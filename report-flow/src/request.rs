//! Outbound generation request and the Gemini `generateContent` wire types.

use serde::{Deserialize, Serialize};

pub const JSON_MIME_TYPE: &str = "application/json";

/// Sampling parameters. Defaults are fully deterministic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingConfig {
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            top_p: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
}

impl HarmCategory {
    pub const ALL: [HarmCategory; 4] = [
        HarmCategory::HateSpeech,
        HarmCategory::DangerousContent,
        HarmCategory::SexuallyExplicit,
        HarmCategory::Harassment,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockNone,
    BlockOnlyHigh,
    BlockMediumAndAbove,
    BlockLowAndAbove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

/// One remote call. Built fresh for every attempt and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt_text: String,
    pub system_instruction: String,
    pub sampling: SamplingConfig,
    pub response_mime_type: &'static str,
    pub safety_settings: Vec<SafetySetting>,
    pub search_grounding: bool,
}

impl GenerationRequest {
    /// Deterministic sampling, JSON response hint and every harm category
    /// relaxed to `BLOCK_NONE`: the input is clinical text.
    pub fn new(
        system_instruction: impl Into<String>,
        prompt_text: impl Into<String>,
        search_grounding: bool,
    ) -> Self {
        Self {
            prompt_text: prompt_text.into(),
            system_instruction: system_instruction.into(),
            sampling: SamplingConfig::default(),
            response_mime_type: JSON_MIME_TYPE,
            safety_settings: HarmCategory::ALL
                .iter()
                .map(|&category| SafetySetting {
                    category,
                    threshold: HarmBlockThreshold::BlockNone,
                })
                .collect(),
            search_grounding,
        }
    }

    pub fn to_gemini(&self) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent::text("user", &self.prompt_text)],
            system_instruction: GeminiContent::text("model", &self.system_instruction),
            generation_config: GeminiGenerationConfig {
                temperature: self.sampling.temperature,
                top_p: self.sampling.top_p,
                response_mime_type: self.response_mime_type.to_string(),
            },
            safety_settings: self.safety_settings.clone(),
            tools: if self.search_grounding {
                vec![GeminiTool {
                    google_search: GoogleSearch {},
                }]
            } else {
                Vec::new()
            },
        }
    }
}

/// Gemini API request structure
#[derive(Debug, Serialize)]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(rename = "systemInstruction")]
    pub system_instruction: GeminiContent,
    #[serde(rename = "generationConfig")]
    pub generation_config: GeminiGenerationConfig,
    #[serde(rename = "safetySettings")]
    pub safety_settings: Vec<SafetySetting>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<GeminiTool>,
}

#[derive(Debug, Serialize)]
pub struct GeminiContent {
    pub role: String,
    pub parts: Vec<GeminiPart>,
}

impl GeminiContent {
    fn text(role: &str, text: &str) -> Self {
        Self {
            role: role.to_string(),
            parts: vec![GeminiPart {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GeminiPart {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct GeminiGenerationConfig {
    pub temperature: f32,
    #[serde(rename = "topP")]
    pub top_p: f32,
    #[serde(rename = "responseMimeType")]
    pub response_mime_type: String,
}

#[derive(Debug, Serialize)]
pub struct GeminiTool {
    #[serde(rename = "googleSearch")]
    pub google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
pub struct GoogleSearch {}

/// Response from the Gemini API. Every level may be missing when the
/// service blocks or truncates a candidate.
#[derive(Debug, Default, Deserialize)]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
pub struct GeminiCandidate {
    #[serde(default)]
    pub content: Option<GeminiResponseContent>,
    #[serde(rename = "finishReason", default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GeminiResponseContent {
    #[serde(default)]
    pub parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct GeminiResponsePart {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub thought: bool,
}

impl GeminiResponse {
    /// Text of the first candidate, joined across its non-thought parts.
    /// `None` when there is no text at all.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter(|part| !part.thought)
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.is_empty() { None } else { Some(text) }
    }

    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates.first()?.finish_reason.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_carries_deterministic_contract() {
        let request = GenerationRequest::new("system text", "prompt text", false);
        let wire = serde_json::to_value(request.to_gemini()).unwrap();

        assert_eq!(
            wire["contents"],
            json!([{ "role": "user", "parts": [{ "text": "prompt text" }] }])
        );
        assert_eq!(
            wire["systemInstruction"],
            json!({ "role": "model", "parts": [{ "text": "system text" }] })
        );
        assert_eq!(wire["generationConfig"]["temperature"], json!(0.0));
        assert_eq!(wire["generationConfig"]["topP"], json!(1.0));
        assert_eq!(
            wire["generationConfig"]["responseMimeType"],
            json!("application/json")
        );
        assert!(wire.get("tools").is_none());
    }

    #[test]
    fn every_harm_category_is_relaxed() {
        let request = GenerationRequest::new("s", "p", false);
        let wire = serde_json::to_value(request.to_gemini()).unwrap();
        let settings = wire["safetySettings"].as_array().unwrap();

        assert_eq!(settings.len(), 4);
        assert!(settings.iter().all(|s| s["threshold"] == "BLOCK_NONE"));
        assert!(
            settings
                .iter()
                .any(|s| s["category"] == "HARM_CATEGORY_DANGEROUS_CONTENT")
        );
    }

    #[test]
    fn search_grounding_adds_tool() {
        let request = GenerationRequest::new("s", "p", true);
        let wire = serde_json::to_value(request.to_gemini()).unwrap();
        assert_eq!(wire["tools"], json!([{ "googleSearch": {} }]));
    }

    #[test]
    fn response_text_joins_parts_of_first_candidate() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "parts": [
                    { "text": "thinking...", "thought": true },
                    { "text": "{\"a\":" },
                    { "text": " 1}" }
                ] }, "finishReason": "STOP" },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }))
        .unwrap();

        assert_eq!(response.text().as_deref(), Some("{\"a\": 1}"));
        assert_eq!(response.finish_reason(), Some("STOP"));
    }

    #[test]
    fn blocked_response_has_no_text() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        }))
        .unwrap();
        assert_eq!(response.text(), None);

        let empty: GeminiResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.text(), None);
    }
}
