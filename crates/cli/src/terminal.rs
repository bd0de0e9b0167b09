use tts_client_core::history::AudioHandle;
use tts_client_core::surface::{MemorySurface, Surface};

/// In-memory document that echoes status messages to stderr.
pub struct TerminalSurface {
    inner: MemorySurface,
    message_id: String,
}

impl TerminalSurface {
    pub fn new(inner: MemorySurface, message_id: &str) -> Self {
        Self {
            inner,
            message_id: message_id.to_owned(),
        }
    }

    pub fn set_field(&mut self, id: &str, value: &str) {
        self.inner.set_field(id, value);
    }
}

impl Surface for TerminalSurface {
    fn read_field(&self, id: &str) -> Option<String> {
        self.inner.read_field(id)
    }

    fn set_text(&mut self, id: &str, value: &str) {
        if id == self.message_id && !value.is_empty() {
            eprintln!("{value}");
        }
        self.inner.set_text(id, value);
    }

    fn set_disabled(&mut self, id: &str, disabled: bool) {
        self.inner.set_disabled(id, disabled);
    }

    fn prepend_row(&mut self, id: &str, markup: String) {
        self.inner.prepend_row(id, markup);
    }

    fn create_object_url(&mut self, audio: &AudioHandle) -> String {
        self.inner.create_object_url(audio)
    }

    fn focus(&mut self, id: &str) {
        self.inner.focus(id);
    }

    fn focused(&self) -> Option<&str> {
        self.inner.focused()
    }
}
