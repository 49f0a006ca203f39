pub mod initialize;
pub mod locks;
pub mod migrate;
pub mod queries;
pub mod retry;
pub mod store;

pub use store::Store;
