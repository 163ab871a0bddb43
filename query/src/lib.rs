//! Shareable query state: the key/value snapshot behind the converter form.

pub mod adapter;
pub mod field;
pub mod memory;
pub mod state;
pub mod store;

pub use adapter::QueryStateAdapter;
pub use field::{QueryError, QueryField};
pub use memory::InMemoryQueryStore;
pub use state::{FormState, PersistedState, QueryValue};
pub use store::QueryStore;
