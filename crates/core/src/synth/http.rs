use crate::config::ServerUrl;
use crate::synth::{
    SubmissionRequest, SynthesisClient, SynthesisError, SynthesisResult, SynthesizedAudio,
};
use futures::future::BoxFuture;
use futures::FutureExt;
use hyper::ext::ReasonPhrase;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE, PRAGMA};
use reqwest::Client;
use url::Url;

pub const TTS_ENDPOINT_PATH: &str = "/api/tts";

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";
const LOG_TARGET: &str = "synth::http";

#[derive(Clone)]
pub struct HttpSynthesisClient {
    client: Client,
    endpoint: Url,
}

impl HttpSynthesisClient {
    pub fn new(server_url: &ServerUrl) -> Self {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(client: Client, server_url: &ServerUrl) -> Self {
        let mut endpoint = server_url.as_url().clone();
        endpoint.set_query(None);
        endpoint.set_fragment(None);
        // http(s) urls always have a path to extend.
        if let Ok(mut segments) = endpoint.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(TTS_ENDPOINT_PATH.trim_start_matches('/').split('/'));
        }
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn request_url(&self, request: &SubmissionRequest) -> Url {
        let mut url = self.endpoint.clone();
        url.set_query(Some(&encode_query(request)));
        url
    }
}

/// Builds `text=..&speaker_id=..&style_wav=..`, encoding each value on its own.
///
/// Spaces become `%20` rather than `+`, and every reserved character is
/// escaped so one field can never bleed into the next.
pub fn encode_query(request: &SubmissionRequest) -> String {
    format!(
        "text={}&speaker_id={}&style_wav={}",
        urlencoding::encode(request.text()),
        urlencoding::encode(request.speaker_id()),
        urlencoding::encode(request.style_wav()),
    )
}

/// The reason phrase the server sent, else the standard one, else the code.
///
/// hyper only records a [`ReasonPhrase`] when it differs from the canonical
/// text for the status.
fn status_reason(response: &reqwest::Response) -> String {
    let status = response.status();
    response
        .extensions()
        .get::<ReasonPhrase>()
        .and_then(|phrase| std::str::from_utf8(phrase.as_bytes()).ok())
        .or_else(|| status.canonical_reason())
        .map(str::to_owned)
        .unwrap_or_else(|| status.as_str().to_owned())
}

impl SynthesisClient for HttpSynthesisClient {
    fn synthesize(&self, request: SubmissionRequest) -> BoxFuture<'_, SynthesisResult> {
        async move {
            let url = self.request_url(&request);
            tracing::debug!(target: LOG_TARGET, %url, "requesting synthesis");

            let response = self
                .client
                .get(url)
                .header(CACHE_CONTROL, "no-cache")
                .header(PRAGMA, "no-cache")
                .send()
                .await
                .map_err(|e| {
                    tracing::debug!(target: LOG_TARGET, error = %e, "synthesis request failed");
                    SynthesisError::Transport(e.to_string())
                })?;

            let status = response.status();
            if !status.is_success() {
                let reason = status_reason(&response);
                tracing::debug!(
                    target: LOG_TARGET,
                    status = status.as_u16(),
                    %reason,
                    "synthesis rejected"
                );
                return Err(SynthesisError::Service {
                    status: status.as_u16(),
                    reason,
                });
            }

            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or(FALLBACK_CONTENT_TYPE)
                .to_owned();

            let bytes = response
                .bytes()
                .await
                .map_err(|e| SynthesisError::Transport(e.to_string()))?;

            tracing::debug!(
                target: LOG_TARGET,
                bytes = bytes.len(),
                %content_type,
                "synthesis complete"
            );

            Ok(SynthesizedAudio {
                bytes,
                content_type,
            })
        }
        .boxed()
    }
}
