//! Resource providers that need the host platform.
//!
//! - [`FilesystemResourceProvider`]: images and backdrop PDFs next to a template file
//!
//! The in-memory provider lives in `sablon-traits` and is re-exported here.

mod filesystem;

pub use filesystem::FilesystemResourceProvider;

pub use sablon_traits::InMemoryResourceProvider;
