//! File-based source.
//!
//! Polls a JSON file holding an array of samples. The file is re-read only
//! when its modification time moves forward, and only samples past the ones
//! already emitted are yielded. A file that shrinks is treated as rewritten
//! and replayed from the start.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::HealthDataSource;
use crate::data::HealthSample;

#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
    /// Number of samples from the file already queued.
    consumed: usize,
    pending: VecDeque<HealthSample>,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            last_modified: None,
            consumed: 0,
            pending: VecDeque::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    fn read_file(&mut self) -> Option<Vec<HealthSample>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str::<Vec<HealthSample>>(&content) {
                Ok(samples) => {
                    self.last_error = None;
                    Some(samples)
                }
                Err(e) => {
                    self.last_error = Some(format!("Parse error: {}", e));
                    None
                }
            },
            Err(e) => {
                self.last_error = Some(format!("Read error: {}", e));
                None
            }
        }
    }

    fn refresh(&mut self) {
        let current_modified = self.modified_time();

        let file_changed = match (&self.last_modified, &current_modified) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(last), Some(current)) => current > last,
        };
        if !file_changed {
            return;
        }

        let Some(samples) = self.read_file() else {
            return;
        };
        self.last_modified = current_modified;

        if samples.len() < self.consumed {
            tracing::debug!(path = %self.path.display(), "sample file shrank, replaying");
            self.consumed = 0;
        }
        let queued = self.pending.len();
        self.pending.extend(samples.into_iter().skip(self.consumed));
        self.consumed += self.pending.len() - queued;
    }
}

impl HealthDataSource for FileSource {
    fn poll(&mut self) -> Option<HealthSample> {
        if self.pending.is_empty() {
            self.refresh();
        }
        self.pending.pop_front()
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.clone()
    }
}
