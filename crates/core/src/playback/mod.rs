mod audio;
mod silent;

use crate::history::AudioHandle;
use futures::future::BoxFuture;

pub use audio::RodioAudioPlayer;
pub use silent::SilentAudioPlayer;

#[derive(thiserror::Error, Debug)]
pub enum PlaybackError {
    #[error("audio output unavailable: {details}")]
    AudioOutputUnavailable { details: String },

    #[error("cannot decode {content_type} audio: {details}")]
    Decode {
        content_type: String,
        details: String,
    },
}

pub trait AudioPlayer: Send + Sync {
    fn play(&self, audio: AudioHandle) -> BoxFuture<'_, Result<(), PlaybackError>>;
}
