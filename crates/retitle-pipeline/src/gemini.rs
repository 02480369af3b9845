//! Gemini client for title generation.
//!
//! One generateContent request per job: the prompt enumerates every video
//! title and the model is asked for a JSON completion with a `titles`
//! array. Sampling parameters are fixed so results stay comparable across
//! jobs.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use retitle_models::Video;

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};

/// System instruction sent with every generation request.
const SYSTEM_INSTRUCTION: &str =
    "You are a Youtube CEO and engagement expert who help creators write better video title.";

/// Gemini API client.
#[derive(Debug, Clone)]
pub struct TitleGenClient {
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: Client,
}

/// Gemini API request.
#[derive(Debug, Serialize)]
struct GeminiRequest {
    system_instruction: SystemInstruction,
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "topP")]
    top_p: f32,
    #[serde(rename = "topK")]
    top_k: u32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

/// Gemini API response.
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    #[serde(default)]
    error: Option<GeminiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    #[serde(default)]
    message: String,
}

/// One improved title in the completion, before the watch URL is attached.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedTitle {
    pub original: String,
    pub improved: String,
    pub rationale: String,
}

#[derive(Debug, Deserialize)]
struct TitlesCompletion {
    titles: Vec<GeneratedTitle>,
}

impl TitleGenClient {
    /// Create a client from pipeline configuration.
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            base_url: config.ai_api_base.trim_end_matches('/').to_string(),
            model: config.ai_model.clone(),
            api_key: config.ai_api_key.clone(),
            client: Client::new(),
        }
    }

    /// Whether an API credential is configured.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Ask the model for one improved title per input video.
    ///
    /// The returned sequence follows the model's output order; the caller
    /// is responsible for checking it against the input count before
    /// mapping titles back to videos.
    pub async fn improve_titles(
        &self,
        channel_name: &str,
        videos: &[Video],
    ) -> PipelineResult<Vec<GeneratedTitle>> {
        let api_key = self.api_key.as_deref().ok_or(PipelineError::MissingApiKey)?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let request = GeminiRequest {
            system_instruction: SystemInstruction {
                parts: vec![Part {
                    text: SYSTEM_INSTRUCTION.to_string(),
                }],
            },
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(channel_name, videos),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.7,
                top_p: 0.8,
                top_k: 10,
                response_mime_type: "application/json".to_string(),
            },
        };

        debug!(model = %self.model, videos = videos.len(), "Requesting improved titles");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| PipelineError::ai_failed(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            // Surface the collaborator's own error message when it sends one.
            let message = response
                .json::<GeminiErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .map(|detail| detail.message)
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| "Unknown API Error".to_string());
            return Err(PipelineError::AiApi(message));
        }

        let completion: GeminiResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::ai_failed(format!("failed to parse response: {e}")))?;

        let text = completion
            .candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .map(|part| part.text.as_str())
            .ok_or_else(|| PipelineError::ai_failed("no content in response"))?;

        let parsed: TitlesCompletion = serde_json::from_str(strip_fences(text))
            .map_err(|e| PipelineError::ai_failed(format!("failed to parse titles JSON: {e}")))?;

        info!(count = parsed.titles.len(), "Generated improved titles");
        Ok(parsed.titles)
    }
}

/// Strip the markdown code fence the model sometimes wraps around JSON.
fn strip_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text.strip_prefix("```json").unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}

fn build_prompt(channel_name: &str, videos: &[Video]) -> String {
    let video_titles = videos
        .iter()
        .enumerate()
        .map(|(idx, video)| format!("{}. \"{}\"", idx + 1, video.title))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a YouTube title optimization expert. Below are {count} video titles from the channel "{channel_name}".

For each title, provide:
1. An improved version that is more engaging, SEO-friendly, and likely to get more clicks
2. A brief rationale (1-2 sentences) explaining why the improved title is better

Guidelines:
- Keep the core topic and authenticity
- Use action verbs, numbers, and specific value propositions
- Make it curiosity-inducing without being clickbait
- Optimize for searchability and clarity

Video Titles:
{video_titles}

Respond in JSON format:
{{
    "titles": [
        {{
            "original": "...",
            "improved": "...",
            "rationale": "..."
        }}
    ]
}}
"#,
        count = videos.len(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn video(id: &str, title: &str) -> Video {
        Video {
            id: id.to_string(),
            title: title.to_string(),
            thumbnail: None,
            published_at: String::new(),
            views: String::new(),
            channel: None,
            is_live: false,
        }
    }

    fn client_for(server: &MockServer) -> TitleGenClient {
        TitleGenClient::new(&PipelineConfig {
            ai_api_base: server.uri(),
            ai_api_key: Some("test-key".to_string()),
            ..PipelineConfig::default()
        })
    }

    #[tokio::test]
    async fn test_improve_titles_parses_fenced_completion() {
        let server = MockServer::start().await;
        let inner = json!({
            "titles": [
                { "original": "A", "improved": "Better A", "rationale": "Clearer." },
            ]
        })
        .to_string();
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [
                    { "content": { "parts": [ { "text": format!("```json\n{inner}\n```") } ] } }
                ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let titles = client
            .improve_titles("Example Channel", &[video("vid0", "A")])
            .await
            .unwrap();

        assert_eq!(titles.len(), 1);
        assert_eq!(titles[0].improved, "Better A");
    }

    #[tokio::test]
    async fn test_non_success_surfaces_collaborator_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": { "message": "Quota exhausted" }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .improve_titles("Example Channel", &[video("vid0", "A")])
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Gemini API Error: Quota exhausted");
    }

    #[tokio::test]
    async fn test_missing_api_key_is_rejected_before_any_request() {
        let client = TitleGenClient::new(&PipelineConfig {
            ai_api_key: None,
            ..PipelineConfig::default()
        });
        assert!(!client.is_configured());

        let err = client
            .improve_titles("Example Channel", &[video("vid0", "A")])
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::MissingApiKey));
    }

    #[test]
    fn test_prompt_enumerates_titles_in_order() {
        let prompt = build_prompt(
            "Example Channel",
            &[video("vid0", "First"), video("vid1", "Second")],
        );
        assert!(prompt.contains("2 video titles"));
        assert!(prompt.contains("1. \"First\""));
        assert!(prompt.contains("2. \"Second\""));
        assert!(prompt.contains("\"Example Channel\""));
    }

    #[test]
    fn test_strip_fences() {
        assert_eq!(strip_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_fences("{\"a\":1}"), "{\"a\":1}");
    }
}
