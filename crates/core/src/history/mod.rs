mod render;

use crate::surface::Surface;
use crate::synth::SynthesizedAudio;
use bytes::Bytes;
use chrono::{DateTime, Local};
use std::collections::VecDeque;

pub use render::{escape_html, format_day, render_row, TOOLTIP_TOGGLE};

const LOG_TARGET: &str = "history";

/// Encoded audio plus its declared content type. Clones share the bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioHandle {
    bytes: Bytes,
    content_type: String,
}

impl AudioHandle {
    pub fn new<S: Into<String>>(bytes: Bytes, content_type: S) -> Self {
        Self {
            bytes,
            content_type: content_type.into(),
        }
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }
}

impl From<SynthesizedAudio> for AudioHandle {
    fn from(audio: SynthesizedAudio) -> Self {
        Self::new(audio.bytes, audio.content_type)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    created_at: DateTime<Local>,
    source_text: String,
    audio: AudioHandle,
}

impl HistoryEntry {
    pub fn new<S: Into<String>>(
        created_at: DateTime<Local>,
        source_text: S,
        audio: AudioHandle,
    ) -> Self {
        Self {
            created_at,
            source_text: source_text.into(),
            audio,
        }
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn audio(&self) -> &AudioHandle {
        &self.audio
    }
}

/// Enhancement applied to every element flagged with [`TOOLTIP_TOGGLE`].
///
/// Called after each insertion with the whole collection in place, so it must
/// be safe to run any number of times.
pub trait Decorator {
    fn activate(&self);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoDecorations;

impl Decorator for NoDecorations {
    fn activate(&self) {}
}

/// Newest-first list of past syntheses.
pub struct HistoryView<D> {
    container: String,
    decorator: D,
    entries: VecDeque<HistoryEntry>,
}

impl<D: Decorator> HistoryView<D> {
    pub fn new<S: Into<String>>(container: S, decorator: D) -> Self {
        Self {
            container: container.into(),
            decorator,
            entries: VecDeque::new(),
        }
    }

    pub fn prepend<S: Surface + ?Sized>(&mut self, surface: &mut S, entry: HistoryEntry) {
        let url = surface.create_object_url(entry.audio());
        let markup = render_row(&entry, &url);
        surface.prepend_row(&self.container, markup);
        tracing::debug!(
            target: LOG_TARGET,
            container = %self.container,
            object_url = %url,
            entries = self.entries.len() + 1,
            "history entry added"
        );
        self.entries.push_front(entry);
        self.decorator.activate();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `index` 0 is the newest entry.
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }
}
