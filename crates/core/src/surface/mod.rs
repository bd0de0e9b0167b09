mod memory;

use crate::history::AudioHandle;

pub use memory::MemorySurface;

/// The document the session talks to.
///
/// Element ids are opaque strings agreed on with the markup; a missing element
/// is never an error. Reads yield `None` and writes are dropped.
pub trait Surface {
    /// Current value of an input field, `None` if no such field exists.
    fn read_field(&self, id: &str) -> Option<String>;

    fn set_text(&mut self, id: &str, value: &str);

    fn set_disabled(&mut self, id: &str, disabled: bool);

    /// Inserts rendered row markup at the head of the container `id`.
    fn prepend_row(&mut self, id: &str, markup: String);

    /// Mints a playable reference to `audio` that stays valid for the session.
    fn create_object_url(&mut self, audio: &AudioHandle) -> String;

    fn focus(&mut self, id: &str);

    fn focused(&self) -> Option<&str>;
}
