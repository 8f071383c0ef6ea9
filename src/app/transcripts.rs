//! Transcript persistence for the running session.

use pcdoctor::session::SessionController;
use pcdoctor::transcript::{local_stamp, TranscriptStore};
use pcdoctor::tui::RenderSink;
use std::path::{Path, PathBuf};

/// Writes the current session after every controller operation.
///
/// Failures are reported once as a warning and then writing stops; a full
/// disk should not interrupt a diagnosis.
pub(crate) struct TranscriptWriter {
    store: Option<TranscriptStore>,
    fallback_key: String,
}

impl TranscriptWriter {
    pub(crate) fn disabled() -> Self {
        Self {
            store: None,
            fallback_key: local_stamp(),
        }
    }

    pub(crate) fn open(dir: &Path, renderer: &dyn RenderSink) -> Self {
        match TranscriptStore::open(dir) {
            Ok(store) => Self {
                store: Some(store),
                fallback_key: local_stamp(),
            },
            Err(err) => {
                renderer.warn(&format!("transcripts disabled: {err}"));
                Self::disabled()
            }
        }
    }

    pub(crate) fn dir(&self) -> Option<&Path> {
        self.store.as_ref().map(TranscriptStore::dir)
    }

    pub(crate) fn save(
        &mut self,
        controller: &SessionController,
        renderer: &dyn RenderSink,
    ) -> Option<PathBuf> {
        let store = self.store.as_ref()?;
        if controller.log().is_empty() {
            return None;
        }
        match store.save(controller.session(), controller.log(), &self.fallback_key) {
            Ok(path) => Some(path),
            Err(err) => {
                renderer.warn(&format!("transcripts disabled: {err}"));
                self.store = None;
                None
            }
        }
    }

    /// Start keying a fresh session.
    pub(crate) fn restart(&mut self) {
        self.fallback_key = local_stamp();
    }
}
