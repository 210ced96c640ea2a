use crate::error::MockError;
use crate::types::{MockId, MockRecord, MockRecordSummary};

/// Keyed persistence for mock records. Every call goes to the backing storage;
/// implementations keep no cache.
pub trait MockStore {
    fn get(&self, id: &MockId) -> Result<MockRecord, MockError>;
    /// All records, newest first. One unreadable record fails the whole listing.
    fn list(&self) -> Result<Vec<MockRecordSummary>, MockError>;
    fn put(&self, record: &MockRecord) -> Result<(), MockError>;
    /// Returns whether a record was actually removed.
    fn delete(&self, id: &MockId) -> Result<bool, MockError>;
}
