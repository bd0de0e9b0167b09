use crate::config::ElementIds;
use crate::surface::Surface;
use crate::synth::{SubmissionRequest, SynthesisError};

/// Reads the submission fields off a surface.
pub struct InputReader<'a, S: ?Sized> {
    surface: &'a S,
    ids: &'a ElementIds,
}

impl<'a, S: Surface + ?Sized> InputReader<'a, S> {
    pub fn new(surface: &'a S, ids: &'a ElementIds) -> Self {
        Self { surface, ids }
    }

    /// The primary input, verbatim. Empty if the field is missing.
    pub fn read_text(&self) -> String {
        self.read_optional(&self.ids.text)
    }

    pub fn read_optional(&self, id: &str) -> String {
        self.surface.read_field(id).unwrap_or_default()
    }

    /// Fails with [`SynthesisError::EmptyText`] when there is nothing to say.
    pub fn read_request(&self) -> Result<SubmissionRequest, SynthesisError> {
        Ok(SubmissionRequest::new(self.read_text())?
            .with_speaker_id(self.read_optional(&self.ids.speaker_id))
            .with_style_wav(self.read_optional(&self.ids.style_wav)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;

    #[test]
    fn missing_fields_read_as_empty() {
        let ids = ElementIds::default();
        let surface = MemorySurface::new();
        let reader = InputReader::new(&surface, &ids);
        assert_eq!(reader.read_text(), "");
        assert_eq!(reader.read_optional("speaker_id"), "");
        assert_eq!(reader.read_request(), Err(SynthesisError::EmptyText));
    }

    #[test]
    fn request_collects_all_fields() {
        let ids = ElementIds::default();
        let surface = MemorySurface::new()
            .with_field("text", " Hello ")
            .with_field("speaker_id", "p225")
            .with_field("style_wav", "ref.wav");
        let request = InputReader::new(&surface, &ids)
            .read_request()
            .expect("non-empty");
        assert_eq!(request.text(), " Hello ");
        assert_eq!(request.speaker_id(), "p225");
        assert_eq!(request.style_wav(), "ref.wav");
    }

    #[test]
    fn whitespace_text_is_not_a_request() {
        let ids = ElementIds::default();
        let surface = MemorySurface::new().with_field("text", "   ");
        let reader = InputReader::new(&surface, &ids);
        assert_eq!(reader.read_text(), "   ");
        assert_eq!(reader.read_request(), Err(SynthesisError::EmptyText));
    }
}
