pub mod ids;
pub mod mock;

pub use ids::{IdError, MockId};
pub use mock::{MockCandidate, MockRecord, MockRecordSummary, RawStatus};
