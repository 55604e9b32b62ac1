use serde::{Deserialize, Serialize};

use crate::error::{StudyError, StudyResult};

/// Import pipeline configuration.
///
/// Serializable so hosts can persist it next to their study descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Run file import tasks concurrently (requires the `parallel-import` feature).
    #[serde(default = "default_parallel_import")]
    pub parallel_import: bool,
    /// Size of a dedicated worker pool; `None` uses the global rayon pool.
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            parallel_import: default_parallel_import(),
            worker_threads: None,
        }
    }
}

impl ImportConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables concurrent file import.
    #[must_use]
    pub fn with_parallel_import(mut self, enabled: bool) -> Self {
        self.parallel_import = enabled;
        self
    }

    /// Runs imports on a dedicated pool of `threads` workers.
    #[must_use]
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = Some(threads);
        self
    }

    pub(super) fn validate(self) -> StudyResult<Self> {
        if self.worker_threads == Some(0) {
            return Err(StudyError::InvalidConfig(
                "import worker thread count must be > 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

fn default_parallel_import() -> bool {
    true
}
