pub mod executor;
pub mod resource;

pub use executor::{Executor, ExecutorError, SyncExecutor};
pub use resource::{
    InMemoryResourceProvider, MediaType, ResourceError, ResourceProvider, SharedResourceData,
};
