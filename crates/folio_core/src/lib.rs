//! Content store for the portfolio site.
//!
//! Projects, academia entries and social links live as JSON arrays under
//! fixed keys of an injected key-value [`Store`]. A [`ContentManager`] per
//! record type loads one array, applies add/update/delete, and rewrites the
//! whole array on every change.

pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, LogSettings, LoggingError};
pub use model::academia::AcademiaEntry;
pub use model::project::{normalize_technologies, NamedLink, Project, ProjectLinks};
pub use model::record::{Record, RecordId, RecordValidationError, Showcase};
pub use model::social::SocialLink;
pub use model::visibility::{Section, SectionVisibility};
pub use service::content_manager::{ContentError, ContentManager, ContentResult, ContentView};
pub use service::section_settings::SectionSettings;
pub use store::json::{read_list, try_read_list, write_list};
pub use store::memory::MemoryStore;
pub use store::sqlite::SqliteStore;
pub use store::{Store, StoreError, StoreResult};
