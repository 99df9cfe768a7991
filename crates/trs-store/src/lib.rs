pub mod error;
pub mod io;
pub mod snapshot;
pub mod store;

pub use error::{Result, StoreError};
pub use io::{load_store, save_store};
pub use snapshot::{CURRENT_SCHEMA_VERSION, STORE_EXTENSION, StoreSnapshot, TemplateRecord};
pub use store::{TemplateDetails, TemplateSnapshot, TemplateStore};
