use crate::history::AudioHandle;
use crate::playback::{AudioPlayer, PlaybackError};
use futures::future::BoxFuture;
use futures::FutureExt;
use rodio::cpal::traits::DeviceTrait;
use rodio::cpal::traits::HostTrait;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, StreamError};
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

const LOG_TARGET: &str = "playback";

/// A minimal, poison-tolerant, lazy initializer for a single value.
///
/// [`rodio::OutputStream`] must outlive every clip played through it, so one
/// stream is opened on first use and shared by all clones of the player.
struct LazyInit<T> {
    value: Mutex<Option<T>>,
}

impl<T> LazyInit<T> {
    fn new() -> Self {
        Self {
            value: Mutex::new(None),
        }
    }

    fn get_or_try_init_with<R, E>(
        &self,
        init: impl FnOnce() -> Result<T, E>,
        f: impl FnOnce(&T) -> R,
        invariant_err: impl FnOnce() -> E,
    ) -> Result<R, E> {
        let mut guard = match self.value.lock() {
            Ok(g) => g,
            Err(poisoned) => {
                tracing::warn!("output stream cache lock was poisoned; recovering and continuing");
                poisoned.into_inner()
            }
        };

        if guard.is_none() {
            *guard = Some(init()?);
        }

        match guard.as_ref() {
            Some(v) => Ok(f(v)),
            None => Err(invariant_err()),
        }
    }
}

/// Plays history audio on a local output device.
#[derive(Clone)]
pub struct RodioAudioPlayer {
    output_device_name: Option<String>,
    disabled: Arc<AtomicBool>,
    disabled_details: Arc<OnceLock<String>>,

    output_stream: Arc<LazyInit<OutputStream>>,
    output_stream_open_attempts: Arc<AtomicUsize>,
}

impl RodioAudioPlayer {
    pub fn new() -> Self {
        Self {
            output_device_name: None,
            disabled: Arc::new(AtomicBool::new(false)),
            disabled_details: Arc::new(OnceLock::new()),

            output_stream: Arc::new(LazyInit::new()),
            output_stream_open_attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_output_device_name<S: Into<String>>(mut self, name: S) -> Self {
        self.output_device_name = Some(name.into());
        self
    }

    /// Why playback was switched off, if no output device could be found.
    pub fn disabled_reason(&self) -> Option<&str> {
        self.disabled_details.get().map(String::as_str)
    }

    fn open_output_stream(&self) -> Result<OutputStream, PlaybackError> {
        let attempt = self
            .output_stream_open_attempts
            .fetch_add(1, Ordering::Relaxed)
            + 1;
        tracing::debug!(
            target: LOG_TARGET,
            attempt,
            configured_output_device = %self.output_device_name.as_deref().unwrap_or("<default>"),
            "opening output stream"
        );

        let Some(wanted) = self.output_device_name.as_deref() else {
            return OutputStreamBuilder::open_default_stream().map_err(|e| {
                PlaybackError::AudioOutputUnavailable {
                    details: format_stream_error_details(e, None, "open default output stream"),
                }
            });
        };

        let context = match open_named_output_stream(wanted) {
            Ok(stream) => return Ok(stream),
            Err(NamedDeviceStreamError::DeviceNotFound { available }) => {
                tracing::warn!(
                    wanted_device = %wanted,
                    available_devices = %format_device_list(&available),
                    "configured output device not found; falling back to default output device"
                );
                "default-device fallback after named device not found"
            }
            Err(NamedDeviceStreamError::OpenFailed { error, available }) => {
                tracing::warn!(
                    wanted_device = %wanted,
                    %error,
                    available_devices = %format_device_list(&available),
                    "failed to open configured output device; falling back to default output device"
                );
                "default-device fallback after named device open failed"
            }
        };

        OutputStreamBuilder::open_default_stream().map_err(|e| {
            PlaybackError::AudioOutputUnavailable {
                details: format_stream_error_details(e, Some(wanted), context),
            }
        })
    }

    fn connect_sink(&self) -> Result<Sink, PlaybackError> {
        self.output_stream.get_or_try_init_with(
            || self.open_output_stream(),
            |stream| Sink::connect_new(stream.mixer()),
            || PlaybackError::AudioOutputUnavailable {
                details: "internal error: output stream cache invariant violated".to_owned(),
            },
        )
    }
}

impl Default for RodioAudioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioPlayer for RodioAudioPlayer {
    fn play(&self, audio: AudioHandle) -> BoxFuture<'_, Result<(), PlaybackError>> {
        async move {
            if self.disabled.load(Ordering::Relaxed) {
                return Ok(());
            }

            if audio.bytes().is_empty() {
                tracing::debug!(
                    target: LOG_TARGET,
                    content_type = %audio.content_type(),
                    "skipping playback of empty audio"
                );
                return Ok(());
            }

            let content_type = audio.content_type().to_owned();
            let source = Decoder::new(Cursor::new(audio.bytes().clone())).map_err(|e| {
                PlaybackError::Decode {
                    content_type,
                    details: e.to_string(),
                }
            })?;

            let sink = match self.connect_sink() {
                Ok(s) => s,
                Err(e) => {
                    if let PlaybackError::AudioOutputUnavailable { details } = &e {
                        if details.contains("NoDevice") {
                            self.disabled.store(true, Ordering::Relaxed);
                            let _ = self.disabled_details.set(details.clone());
                        }
                    }
                    return Err(e);
                }
            };

            sink.append(source);
            sink.sleep_until_end();

            Ok(())
        }
        .boxed()
    }
}

#[derive(Debug)]
enum NamedDeviceStreamError {
    DeviceNotFound {
        available: Vec<String>,
    },
    OpenFailed {
        error: StreamError,
        available: Vec<String>,
    },
}

fn normalize_device_name(s: &str) -> String {
    s.trim().to_ascii_lowercase()
}

fn open_named_output_stream(wanted: &str) -> Result<OutputStream, NamedDeviceStreamError> {
    let wanted_norm = normalize_device_name(wanted);

    let host = rodio::cpal::default_host();
    let mut available: Vec<String> = Vec::new();
    let mut selected = None;

    if let Ok(devices) = host.output_devices() {
        for d in devices {
            let name = d.name().unwrap_or_else(|_| "<unnamed>".to_owned());
            if normalize_device_name(&name) == wanted_norm {
                selected = Some(d);
            }
            available.push(name);
        }
    }

    let Some(device) = selected else {
        return Err(NamedDeviceStreamError::DeviceNotFound { available });
    };

    OutputStreamBuilder::from_device(device)
        .and_then(|b| b.open_stream_or_fallback())
        .map_err(|error| NamedDeviceStreamError::OpenFailed { error, available })
}

fn format_device_list(devices: &[String]) -> String {
    if devices.is_empty() {
        return "<unknown>".to_owned();
    }
    devices.join(", ")
}

fn format_stream_error_details(err: StreamError, wanted: Option<&str>, context: &str) -> String {
    let mut s = format!("{context}: {err}");
    if let Some(w) = wanted {
        s.push_str(&format!(" (configured_device={w})"));
    }
    s
}
