use crate::history::AudioHandle;
use crate::playback::{AudioPlayer, PlaybackError};
use futures::future::BoxFuture;
use futures::FutureExt;

const LOG_TARGET: &str = "playback";

/// Accepts every clip and plays nothing.
#[derive(Clone)]
pub struct SilentAudioPlayer;

impl SilentAudioPlayer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SilentAudioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioPlayer for SilentAudioPlayer {
    fn play(&self, audio: AudioHandle) -> BoxFuture<'_, Result<(), PlaybackError>> {
        async move {
            tracing::debug!(
                target: LOG_TARGET,
                bytes = audio.bytes().len(),
                content_type = %audio.content_type(),
                "playback skipped (silent player)"
            );
            Ok(())
        }
        .boxed()
    }
}
