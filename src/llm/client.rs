//! Client and handle for the language-model service

use crate::error::Result;
use crate::llm::http::HttpClient;
use crate::llm::types::{Content, GenerateContentResponse, GenerationConfig};
use serde::Serialize;
use tracing::{debug, instrument};

/// Request for generating content
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    /// The contents to generate from
    contents: Vec<Content>,

    /// Generation configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,

    /// The system prompt
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
}

/// Client for the language-model API
#[derive(Clone)]
pub struct Client {
    http_client: HttpClient,
}

impl Client {
    /// Create a new client with an API key
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self> {
        let http_client = HttpClient::with_api_key(api_key.into())?;
        Ok(Self { http_client })
    }

    #[cfg(test)]
    pub(crate) fn set_base_url(&mut self, url: String) {
        self.http_client.set_base_url(url);
    }

    /// Generate content from a model
    #[instrument(skip(self, system_instruction, contents, config), level = "debug")]
    pub async fn generate_content(
        &self,
        model: &str,
        system_instruction: Option<Content>,
        contents: Vec<Content>,
        config: Option<GenerationConfig>,
    ) -> Result<GenerateContentResponse> {
        let request = GenerateContentRequest {
            contents,
            generation_config: config,
            system_instruction,
        };

        let path = format!("models/{}:generateContent", model);

        debug!("Generating content from model {}", model);
        self.http_client.post(&path, &request).await
    }
}

/// The model-service handle passed into the synthesizer.
///
/// Construction happens once at startup; the two degraded states let
/// callers detect an unusable service without attempting a call.
#[derive(Clone)]
pub enum ModelHandle {
    /// A working client
    Ready(Client),

    /// No credential was configured
    NoCredential,

    /// Client construction failed
    Failed(String),
}

impl ModelHandle {
    /// Build a handle from an optional credential
    pub fn from_credential(api_key: Option<&str>) -> Self {
        match api_key {
            None => ModelHandle::NoCredential,
            Some(key) => match Client::with_api_key(key) {
                Ok(client) => ModelHandle::Ready(client),
                Err(e) => ModelHandle::Failed(e.to_string()),
            },
        }
    }

    /// The client, when the service is usable
    pub fn client(&self) -> Option<&Client> {
        match self {
            ModelHandle::Ready(client) => Some(client),
            _ => None,
        }
    }
}
