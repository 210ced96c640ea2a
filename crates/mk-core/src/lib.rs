pub mod error;
pub mod reference;
pub mod service;
pub mod store;
pub mod validation;

pub mod types;

pub use crate::error::MockError;
pub use crate::service::{MockService, Mocker};
pub use crate::store::MockStore;
