use crate::error::MockError;
use crate::store::MockStore;
use crate::types::mock::creation_time;
use crate::types::{MockCandidate, MockId, MockRecord, MockRecordSummary};
use crate::validation::validate_candidate;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Operations the HTTP layer needs from the mock catalogue.
pub trait Mocker: Send + Sync {
    fn get(&self, id: &MockId) -> Result<MockRecord, MockError>;

    fn list(&self) -> Result<Vec<MockRecordSummary>, MockError>;

    /// Builds a mock from request parameters and body, validates it and
    /// persists it under a fresh id.
    fn create(
        &self,
        params: &HashMap<String, Vec<String>>,
        body: Vec<u8>,
    ) -> Result<MockId, MockError>;

    /// Keeps only the `limit` most recent mocks and returns how many were
    /// removed. A `limit` below 1 disables eviction.
    fn clean(&self, limit: i64) -> Result<usize, MockError>;
}

pub struct MockService<S: MockStore> {
    store: S,
}

impl<S: MockStore> MockService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: MockStore + Send + Sync> Mocker for MockService<S> {
    fn get(&self, id: &MockId) -> Result<MockRecord, MockError> {
        self.store.get(id)
    }

    fn list(&self) -> Result<Vec<MockRecordSummary>, MockError> {
        self.store.list()
    }

    fn create(
        &self,
        params: &HashMap<String, Vec<String>>,
        body: Vec<u8>,
    ) -> Result<MockId, MockError> {
        let candidate = MockCandidate::from_params(params, body);
        let status = validate_candidate(&candidate).inspect_err(|err| {
            debug!(error = %err, "rejected mock candidate");
        })?;
        let record = candidate.into_record(MockId::generate(), creation_time(), status);
        self.store.put(&record)?;
        info!(mock_id = %record.id, status = record.status, "mock created");
        Ok(record.id)
    }

    fn clean(&self, limit: i64) -> Result<usize, MockError> {
        if limit < 1 {
            return Ok(0);
        }
        let summaries = self.store.list()?;
        let keep = usize::try_from(limit).unwrap_or(usize::MAX);
        if summaries.len() <= keep {
            return Ok(0);
        }
        let mut removed = 0;
        for summary in &summaries[keep..] {
            match self.store.delete(&summary.id) {
                Ok(true) => removed += 1,
                Ok(false) => debug!(mock_id = %summary.id, "mock already gone"),
                Err(err) => warn!(mock_id = %summary.id, error = %err, "failed to remove mock"),
            }
        }
        Ok(removed)
    }
}
