mod http;

use bytes::Bytes;
use futures::future::BoxFuture;

pub use http::{encode_query, HttpSynthesisClient, TTS_ENDPOINT_PATH};

/// One submission, consumed by exactly one `synthesize` call.
///
/// `text` is kept verbatim; it is only guaranteed to contain something other
/// than whitespace. Speaker and style default to the empty string so they are
/// always present on the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionRequest {
    text: String,
    speaker_id: String,
    style_wav: String,
}

impl SubmissionRequest {
    pub fn new<S: Into<String>>(text: S) -> Result<Self, SynthesisError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(SynthesisError::EmptyText);
        }
        Ok(Self {
            text,
            speaker_id: String::new(),
            style_wav: String::new(),
        })
    }

    pub fn with_speaker_id<S: Into<String>>(mut self, speaker_id: S) -> Self {
        self.speaker_id = speaker_id.into();
        self
    }

    pub fn with_style_wav<S: Into<String>>(mut self, style_wav: S) -> Self {
        self.style_wav = style_wav.into();
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn speaker_id(&self) -> &str {
        &self.speaker_id
    }

    pub fn style_wav(&self) -> &str {
        &self.style_wav
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SynthesizedAudio {
    pub bytes: Bytes,
    pub content_type: String,
}

/// Why a submission produced no audio.
///
/// `Display` is the bare reason so callers can prefix it however they like.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    #[error("text must not be empty")]
    EmptyText,

    #[error("{0}")]
    Transport(String),

    #[error("{reason}")]
    Service { status: u16, reason: String },
}

pub type SynthesisResult = Result<SynthesizedAudio, SynthesisError>;

pub trait SynthesisClient: Send + Sync {
    fn synthesize(&self, request: SubmissionRequest) -> BoxFuture<'_, SynthesisResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_text_is_rejected() {
        assert_eq!(SubmissionRequest::new(""), Err(SynthesisError::EmptyText));
        assert_eq!(
            SubmissionRequest::new(" \t\n "),
            Err(SynthesisError::EmptyText)
        );
    }

    #[test]
    fn text_is_kept_verbatim_and_optionals_default_to_empty() {
        let request = SubmissionRequest::new("  hi there ").expect("non-empty");
        assert_eq!(request.text(), "  hi there ");
        assert_eq!(request.speaker_id(), "");
        assert_eq!(request.style_wav(), "");
    }

    #[test]
    fn error_display_is_the_bare_reason() {
        let service = SynthesisError::Service {
            status: 500,
            reason: "Internal Server Error".to_owned(),
        };
        assert_eq!(service.to_string(), "Internal Server Error");
        assert_eq!(
            SynthesisError::Transport("connection refused".to_owned()).to_string(),
            "connection refused"
        );
    }
}
