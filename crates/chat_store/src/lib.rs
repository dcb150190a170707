mod catalog;
mod error;
mod paths;
mod schema;
mod store;

pub use catalog::{display_timestamp, preview, CatalogEntry, PREVIEW_LIMIT, TRUNCATION_MARKER};
pub use error::ChatStoreError;
pub use paths::{
    format_identity, record_file_name, resolve_storage_root, RecordRef, CHAT_DIR_NAME,
};
pub use schema::SessionRecord;
pub use store::{local_now, ChatStore, Clock};
