use crate::history::AudioHandle;
use crate::surface::Surface;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

const OBJECT_URL_PREFIX: &str = "blob:tts-client/";

/// A document kept entirely in memory.
///
/// Fields must be declared with [`MemorySurface::with_field`] before they can be
/// read; undeclared fields behave like elements missing from the markup.
#[derive(Clone, Debug, Default)]
pub struct MemorySurface {
    fields: BTreeMap<String, String>,
    texts: BTreeMap<String, String>,
    disabled: BTreeSet<String>,
    rows: BTreeMap<String, VecDeque<String>>,
    objects: BTreeMap<String, AudioHandle>,
    next_object: u64,
    focused: Option<String>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, id: &str, value: &str) -> Self {
        self.set_field(id, value);
        self
    }

    /// Types `value` into the field, creating it if needed.
    pub fn set_field(&mut self, id: &str, value: &str) {
        self.fields.insert(id.to_owned(), value.to_owned());
    }

    pub fn remove_field(&mut self, id: &str) {
        self.fields.remove(id);
    }

    pub fn text(&self, id: &str) -> &str {
        self.texts.get(id).map(String::as_str).unwrap_or("")
    }

    pub fn is_disabled(&self, id: &str) -> bool {
        self.disabled.contains(id)
    }

    /// Rows of the container, head first.
    pub fn rows(&self, id: &str) -> Vec<&str> {
        self.rows
            .get(id)
            .map(|rows| rows.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn row_count(&self, id: &str) -> usize {
        self.rows.get(id).map(VecDeque::len).unwrap_or(0)
    }

    pub fn object(&self, url: &str) -> Option<&AudioHandle> {
        self.objects.get(url)
    }
}

impl Surface for MemorySurface {
    fn read_field(&self, id: &str) -> Option<String> {
        self.fields.get(id).cloned()
    }

    fn set_text(&mut self, id: &str, value: &str) {
        self.texts.insert(id.to_owned(), value.to_owned());
    }

    fn set_disabled(&mut self, id: &str, disabled: bool) {
        if disabled {
            self.disabled.insert(id.to_owned());
        } else {
            self.disabled.remove(id);
        }
    }

    fn prepend_row(&mut self, id: &str, markup: String) {
        self.rows.entry(id.to_owned()).or_default().push_front(markup);
    }

    fn create_object_url(&mut self, audio: &AudioHandle) -> String {
        self.next_object += 1;
        let url = format!("{OBJECT_URL_PREFIX}{}", self.next_object);
        self.objects.insert(url.clone(), audio.clone());
        url
    }

    fn focus(&mut self, id: &str) {
        self.focused = Some(id.to_owned());
    }

    fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn undeclared_fields_read_as_missing() {
        let surface = MemorySurface::new().with_field("text", "hi");
        assert_eq!(surface.read_field("text").as_deref(), Some("hi"));
        assert_eq!(surface.read_field("speaker_id"), None);
    }

    #[test]
    fn rows_are_prepended() {
        let mut surface = MemorySurface::new();
        surface.prepend_row("t", "first".to_owned());
        surface.prepend_row("t", "second".to_owned());
        assert_eq!(surface.rows("t"), vec!["second", "first"]);
        assert_eq!(surface.row_count("missing"), 0);
    }

    #[test]
    fn object_urls_are_unique_and_resolve() {
        let mut surface = MemorySurface::new();
        let audio = AudioHandle::new(Bytes::from_static(&[1, 2]), "audio/wav");
        let a = surface.create_object_url(&audio);
        let b = surface.create_object_url(&audio);
        assert_ne!(a, b);
        assert!(a.starts_with(OBJECT_URL_PREFIX));
        assert_eq!(surface.object(&b), Some(&audio));
    }

    #[test]
    fn disabled_flag_toggles() {
        let mut surface = MemorySurface::new();
        surface.set_disabled("btn", true);
        assert!(surface.is_disabled("btn"));
        surface.set_disabled("btn", false);
        assert!(!surface.is_disabled("btn"));
    }
}
