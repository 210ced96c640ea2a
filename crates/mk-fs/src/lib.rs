pub mod store;
pub mod util;

pub use store::FileStore;
