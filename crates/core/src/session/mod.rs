use crate::config::ElementIds;
use crate::history::{Decorator, HistoryEntry, HistoryView};
use crate::input::InputReader;
use crate::surface::Surface;
use crate::synth::{SynthesisClient, SynthesisError};
use chrono::Local;

pub const SUBMIT_KEY: &str = "Enter";
pub const BUSY_MESSAGE: &str = "Synthesizing...";
pub const ERROR_PREFIX: &str = "Error: ";

const LOG_TARGET: &str = "session";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum UiState {
    #[default]
    Idle,
    Busy,
    /// Idle, with the last failure still on display.
    Error(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing to submit, or a submission is already running.
    Skipped,
    Completed,
    Failed(SynthesisError),
}

/// Drives one session: reads input, runs at most one synthesis at a time and
/// reflects the result on the surface.
pub struct SessionController<S, C, D> {
    surface: S,
    client: C,
    history: HistoryView<D>,
    ids: ElementIds,
    state: UiState,
}

impl<S, C, D> SessionController<S, C, D>
where
    S: Surface,
    C: SynthesisClient,
    D: Decorator,
{
    pub fn new(mut surface: S, client: C, decorator: D, ids: ElementIds) -> Self {
        surface.focus(&ids.text);
        let history = HistoryView::new(ids.history.clone(), decorator);
        Self {
            surface,
            client,
            history,
            ids,
            state: UiState::Idle,
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn history(&self) -> &HistoryView<D> {
        &self.history
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn ids(&self) -> &ElementIds {
        &self.ids
    }

    /// The submit control was activated.
    pub async fn on_activate(&mut self) -> SubmitOutcome {
        self.submit().await
    }

    /// A key was released; only [`SUBMIT_KEY`] inside the primary input submits.
    pub async fn on_key_up(&mut self, key: &str) -> SubmitOutcome {
        if key != SUBMIT_KEY || self.surface.focused() != Some(self.ids.text.as_str()) {
            return SubmitOutcome::Skipped;
        }
        self.submit().await
    }

    async fn submit(&mut self) -> SubmitOutcome {
        if self.state == UiState::Busy {
            tracing::debug!(target: LOG_TARGET, "submission ignored while busy");
            return SubmitOutcome::Skipped;
        }

        let request = match InputReader::new(&self.surface, &self.ids).read_request() {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!(target: LOG_TARGET, reason = %e, "nothing to submit");
                return SubmitOutcome::Skipped;
            }
        };
        let source_text = request.text().to_owned();

        self.enter_busy();
        let result = self.client.synthesize(request).await;

        match result {
            Ok(audio) => {
                let entry = HistoryEntry::new(Local::now(), source_text, audio.into());
                self.history.prepend(&mut self.surface, entry);
                self.surface.set_text(&self.ids.message, "");
                self.surface.set_disabled(&self.ids.submit, false);
                self.state = UiState::Idle;
                tracing::debug!(
                    target: LOG_TARGET,
                    entries = self.history.len(),
                    "synthesis succeeded"
                );
                SubmitOutcome::Completed
            }
            Err(e) => {
                let reason = e.to_string();
                self.surface
                    .set_text(&self.ids.message, &format!("{ERROR_PREFIX}{reason}"));
                self.surface.set_disabled(&self.ids.submit, false);
                self.state = UiState::Error(reason);
                tracing::debug!(target: LOG_TARGET, error = %e, "synthesis failed");
                SubmitOutcome::Failed(e)
            }
        }
    }

    fn enter_busy(&mut self) {
        self.state = UiState::Busy;
        self.surface.set_disabled(&self.ids.submit, true);
        self.surface.set_text(&self.ids.message, BUSY_MESSAGE);
    }
}
