//! Interactive editing session: a pipeline plus its display history

use crate::{
    error::Result,
    history::HistoryStore,
    pipeline::RemovalPipeline,
    types::{RemovalResult, Selection},
};
use image::RgbImage;

/// A single-user editing session. Owns one pipeline (and therefore one
/// embedding cache slot) and one history store; completed results are
/// appended to the history automatically.
pub struct EraserSession {
    pipeline: RemovalPipeline,
    history: HistoryStore,
}

impl EraserSession {
    /// Create a session around a configured pipeline. The history cap comes
    /// from the pipeline configuration.
    #[must_use]
    pub fn new(pipeline: RemovalPipeline) -> Self {
        let history = HistoryStore::with_limit(pipeline.config().history_limit);
        Self { pipeline, history }
    }

    /// Remove the selected object and record the result in the session
    /// history.
    ///
    /// # Errors
    ///
    /// Propagates pipeline errors; failed operations are not recorded.
    pub fn remove_object(
        &mut self,
        image: &RgbImage,
        selection: &Selection,
    ) -> Result<RemovalResult> {
        let result = self.pipeline.run(image, selection)?;
        self.history.append(result.image.clone());
        Ok(result)
    }

    /// The session's display history, most recent first
    #[must_use]
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Clear the display history
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Access the underlying pipeline
    #[must_use]
    pub fn pipeline(&self) -> &RemovalPipeline {
        &self.pipeline
    }
}
