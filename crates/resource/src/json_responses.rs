//! Quiz responses read from a JSON array on disk.

use standee_traits::{ResponseError, ResponseProvider, select_responses};
use standee_types::{DateRange, ListingId, QuizResponse};
use std::path::{Path, PathBuf};

/// Read-only response store. The file is read on every query; a missing file
/// holds no responses.
#[derive(Debug)]
pub struct JsonResponseProvider {
    path: PathBuf,
}

impl JsonResponseProvider {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn read_file(&self) -> Result<Vec<QuizResponse>, ResponseError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(ResponseError::Unavailable(format!("{}: {}", self.path.display(), e)));
            }
        };
        serde_json::from_slice(&bytes).map_err(|e| {
            ResponseError::Unavailable(format!("{} is not a response array: {}", self.path.display(), e))
        })
    }
}

impl ResponseProvider for JsonResponseProvider {
    fn responses_for(
        &self,
        id: &ListingId,
        range: &DateRange,
    ) -> Result<Vec<QuizResponse>, ResponseError> {
        let responses = select_responses(self.read_file()?, id, range);
        log::debug!(
            "{} responses for listing {} in {}",
            responses.len(),
            id,
            self.path.display()
        );
        Ok(responses)
    }

    fn name(&self) -> &'static str {
        "JsonResponseProvider"
    }
}
