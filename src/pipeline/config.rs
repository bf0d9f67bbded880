use crate::error::PipelineError;
use sablon_layout::LayoutConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// Engine settings loadable from a JSON file.
///
/// ```json
/// { "workerThreads": 4, "parallelPages": true,
///   "layout": { "headerRowHeight": 18, "dataRowHeight": 16 },
///   "compressStreams": true }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Worker threads for page rendering. `None` uses one per CPU.
    pub worker_threads: Option<usize>,
    /// Render the pages of one document in parallel.
    pub parallel_pages: bool,
    pub layout: LayoutConfig,
    pub compress_streams: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            worker_threads: None,
            parallel_pages: true,
            layout: LayoutConfig::default(),
            compress_streams: true,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| {
            PipelineError::Io(io::Error::new(
                e.kind(),
                format!("Failed to read engine config from '{}': {}", path.display(), e),
            ))
        })?;
        Self::from_json(&source)
    }

    pub fn resolved_worker_threads(&self) -> usize {
        self.worker_threads.unwrap_or_else(num_cpus::get).max(1)
    }
}
