use async_trait::async_trait;
use axum::body::Bytes;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::tts::{AudioEncoding, SpeechSynthesizer, SynthesisParams, TokenSource};

pub const DEFAULT_API_BASE_URL: &str = "https://texttospeech.googleapis.com";

/// Google Cloud Text-to-Speech over its REST API.
pub struct GoogleTts {
    client: Client,
    base_url: String,
    project_id: Option<String>,
    tokens: TokenSource,
}

impl GoogleTts {
    pub fn new(
        client: Client,
        base_url: String,
        project_id: Option<String>,
        tokens: TokenSource,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            project_id,
            tokens,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    input: TextInput<'a>,
    voice: VoiceSelection<'a>,
    audio_config: AudioConfig,
}

#[derive(Serialize)]
struct TextInput<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection<'a> {
    language_code: &'a str,
    name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: AudioEncoding,
    #[serde(skip_serializing_if = "Option::is_none")]
    speaking_rate: Option<f64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    #[serde(default)]
    audio_content: String,
}

impl<'a> From<&'a SynthesisParams> for SynthesizeRequest<'a> {
    fn from(params: &'a SynthesisParams) -> Self {
        Self {
            input: TextInput { text: &params.text },
            voice: VoiceSelection {
                language_code: &params.locale,
                name: &params.voice,
            },
            audio_config: AudioConfig {
                audio_encoding: params.encoding,
                speaking_rate: params.speaking_rate,
            },
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTts {
    async fn synthesize(&self, params: &SynthesisParams) -> Result<Bytes, ProviderError> {
        let url = format!("{}/v1/text:synthesize", self.base_url);
        let token = self.tokens.access_token().await?;

        tracing::debug!(
            "Google TTS request: locale={}, voice={}, input_len={}",
            params.locale,
            params.voice,
            params.text.len()
        );

        let mut request = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&SynthesizeRequest::from(params));

        if let Some(project) = &self.project_id {
            request = request.header("x-goog-user-project", project.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::Connection(format!("Failed to reach Google TTS: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            return Err(match status.as_u16() {
                401 | 403 => ProviderError::Authentication(message),
                code => ProviderError::Api {
                    status: code,
                    message,
                },
            });
        }

        let body: SynthesizeResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        let audio = STANDARD
            .decode(body.audio_content.as_bytes())
            .map_err(|e| ProviderError::InvalidResponse(format!("audioContent: {}", e)))?;

        tracing::debug!("Google TTS synthesis complete, {} bytes", audio.len());

        Ok(Bytes::from(audio))
    }
}
