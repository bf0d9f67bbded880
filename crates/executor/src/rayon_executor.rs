use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use sablon_traits::{Executor, ExecutorError};
use std::fmt;
use std::sync::Arc;

/// Runs page jobs on a rayon pool.
///
/// [`RayonExecutor::new`] uses rayon's global pool; [`RayonExecutor::with_threads`]
/// builds a dedicated one.
#[derive(Clone, Default)]
pub struct RayonExecutor {
    pool: Option<Arc<ThreadPool>>,
}

impl RayonExecutor {
    pub fn new() -> Self {
        Self { pool: None }
    }

    pub fn with_threads(threads: usize) -> Result<Self, ExecutorError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .thread_name(|i| format!("sablon-page-{}", i))
            .build()
            .map_err(|e| ExecutorError::PoolBuild(e.to_string()))?;
        Ok(Self {
            pool: Some(Arc::new(pool)),
        })
    }
}

impl fmt::Debug for RayonExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RayonExecutor")
            .field("threads", &self.parallelism())
            .finish()
    }
}

impl Executor for RayonExecutor {
    fn execute_all<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + Clone + 'static,
    {
        let run = move || -> Vec<R> { items.into_par_iter().map(f).collect() };
        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }

    fn parallelism(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    fn name(&self) -> &'static str {
        "RayonExecutor"
    }
}
