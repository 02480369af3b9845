//! Pipeline configuration.

/// Process-wide pipeline configuration, read from the environment once at
/// startup and passed into the collaborator clients explicitly.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Base URL of the channel lookup service
    pub youtube_api_base: String,
    /// Base URL of the generative AI service
    pub ai_api_base: String,
    /// Generative AI API key; the titles stage fails jobs when unset
    pub ai_api_key: Option<String>,
    /// Generative AI model name
    pub ai_model: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            youtube_api_base: "http://localhost:3001".to_string(),
            ai_api_base: "https://generativelanguage.googleapis.com".to_string(),
            ai_api_key: None,
            ai_model: "gemini-2.5-flash".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            youtube_api_base: std::env::var("YOUTUBE_API")
                .unwrap_or_else(|_| "http://localhost:3001".to_string()),
            ai_api_base: std::env::var("AI_API_BASE")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string()),
            ai_api_key: std::env::var("AI_API_KEY").ok().filter(|k| !k.is_empty()),
            ai_model: std::env::var("AI_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".to_string()),
        }
    }
}
