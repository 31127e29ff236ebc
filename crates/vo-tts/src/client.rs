//! The two TTS HTTP request shapes the system speaks: a raw JSON POST to a
//! self-hosted `chatterbox`-style endpoint, and the OpenAI-compatible
//! `/v1/audio/speech` shape.

use reqwest::Client;
use vo_models::{TTSParams, TTSProfile, VoiceMode};

use crate::error::{TtsError, TtsResult};

const DEFAULT_CHATTERBOX_ENDPOINT: &str = "http://localhost:8004/tts";
const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/audio/speech";

#[derive(Clone)]
pub struct TtsClient {
    http: Client,
    openai_api_key: Option<String>,
}

impl TtsClient {
    pub fn new(http: Client, openai_api_key: Option<String>) -> Self {
        Self { http, openai_api_key }
    }

    /// Synthesize `text` with `profile`, returning raw WAV bytes.
    pub async fn synthesize(&self, profile: &TTSProfile, text: &str, params: &TTSParams) -> TtsResult<Vec<u8>> {
        match profile.provider.as_str() {
            "openai" => self.synthesize_openai(profile, text, params).await,
            _ => self.synthesize_chatterbox(profile, text, params).await,
        }
    }

    async fn synthesize_chatterbox(&self, profile: &TTSProfile, text: &str, params: &TTSParams) -> TtsResult<Vec<u8>> {
        let endpoint = profile.endpoint.as_deref().unwrap_or(DEFAULT_CHATTERBOX_ENDPOINT);

        let mut body = serde_json::json!({ "text": text });
        if let serde_json::Value::Object(map) = &mut body {
            match profile.voice_mode {
                VoiceMode::PredefinedVoice => {
                    if let Some(voice_id) = &profile.predefined_voice_id {
                        map.insert("voice_id".to_string(), serde_json::json!(voice_id));
                    }
                }
                VoiceMode::ReferenceAudio => {
                    if let Some(audio_prompt_path) = &profile.audio_prompt_path {
                        map.insert("audio_prompt_path".to_string(), serde_json::json!(audio_prompt_path));
                    }
                }
            }
            for (k, v) in params {
                map.insert(k.clone(), v.clone());
            }
        }

        let response = self.http.post(endpoint).json(&body).send().await?;
        self.extract_audio_bytes(response).await
    }

    async fn synthesize_openai(&self, profile: &TTSProfile, text: &str, params: &TTSParams) -> TtsResult<Vec<u8>> {
        let endpoint = profile.endpoint.as_deref().unwrap_or(DEFAULT_OPENAI_ENDPOINT);
        let voice = profile.predefined_voice_id.as_deref().unwrap_or("alloy");
        let model = params
            .get("model")
            .and_then(|v| v.as_str())
            .unwrap_or("tts-1");

        let body = serde_json::json!({
            "model": model,
            "voice": voice,
            "input": text,
            "response_format": "wav",
        });

        let mut request = self.http.post(endpoint).json(&body);
        if let Some(key) = &self.openai_api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        self.extract_audio_bytes(response).await
    }

    async fn extract_audio_bytes(&self, response: reqwest::Response) -> TtsResult<Vec<u8>> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TtsError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn synthesizes_against_chatterbox_json_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tts"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"RIFF....".to_vec()))
            .mount(&server)
            .await;

        let mut profile = TTSProfile::default_profile();
        profile.endpoint = Some(format!("{}/tts", server.uri()));

        let client = TtsClient::new(Client::new(), None);
        let audio = client.synthesize(&profile, "hello", &profile.params.clone()).await.unwrap();
        assert_eq!(audio, b"RIFF....".to_vec());
    }

    #[tokio::test]
    async fn surfaces_upstream_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tts"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let mut profile = TTSProfile::default_profile();
        profile.endpoint = Some(format!("{}/tts", server.uri()));

        let client = TtsClient::new(Client::new(), None);
        let err = client
            .synthesize(&profile, "hello", &profile.params.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, TtsError::UpstreamStatus { status: 500, .. }));
    }
}
