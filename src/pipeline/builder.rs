use super::config::EngineConfig;
use super::orchestrator::DocumentPipeline;
use crate::error::PipelineError;
use sablon_executor::ExecutorImpl;
use sablon_layout::LayoutConfig;
use sablon_render_core::PainterRegistry;
use sablon_render_lopdf::LopdfRenderer;
use sablon_resolve::{TransformFn, TransformRegistry};
use sablon_traits::ResourceProvider;
use std::sync::Arc;

/// A builder for creating a PDF-producing `DocumentPipeline`.
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    config: EngineConfig,
    transforms: TransformRegistry,
    painters: PainterRegistry,
    resources: Option<Arc<dyn ResourceProvider>>,
    executor: Option<ExecutorImpl>,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            transforms: TransformRegistry::default(),
            painters: PainterRegistry::default(),
            resources: None,
            executor: None,
        }
    }
}

impl PipelineBuilder {
    /// Creates a new `PipelineBuilder` with the built-in transforms and painters.
    pub fn new() -> Self {
        Default::default()
    }

    /// Starts from settings loaded from an engine config file.
    pub fn from_config(config: EngineConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Default row heights for tables that do not set their own.
    pub fn with_layout_config(mut self, layout: LayoutConfig) -> Self {
        self.config.layout = layout;
        self
    }

    /// Registers an extra transform for `computed` mappings, replacing a
    /// built-in of the same name.
    pub fn with_transform(mut self, name: &str, func: TransformFn) -> Self {
        self.transforms.register(name, func);
        self
    }

    /// Replaces the whole transform registry.
    pub fn with_transforms(mut self, transforms: TransformRegistry) -> Self {
        self.transforms = transforms;
        self
    }

    pub fn with_painters(mut self, painters: PainterRegistry) -> Self {
        self.painters = painters;
        self
    }

    /// Where image URIs and backdrop documents are loaded from.
    pub fn with_resources(mut self, resources: Arc<dyn ResourceProvider>) -> Self {
        self.resources = Some(resources);
        self
    }

    pub fn with_worker_threads(mut self, workers: usize) -> Self {
        self.config.worker_threads = Some(workers);
        self
    }

    /// Render pages one after another on the calling thread when `false`.
    pub fn with_parallel_pages(mut self, parallel: bool) -> Self {
        self.config.parallel_pages = parallel;
        self
    }

    pub fn with_compression(mut self, compress: bool) -> Self {
        self.config.compress_streams = compress;
        self
    }

    /// Uses this executor instead of one derived from the worker settings.
    pub fn with_executor(mut self, executor: ExecutorImpl) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Consumes the builder and creates the `DocumentPipeline`.
    pub fn build(self) -> Result<DocumentPipeline, PipelineError> {
        let executor = match self.executor {
            Some(executor) => executor,
            None => ExecutorImpl::for_workers(
                self.config.parallel_pages,
                self.config.resolved_worker_threads(),
            )
            .map_err(|e| PipelineError::Config(e.to_string()))?,
        };

        let mut renderer = LopdfRenderer::new()
            .with_painters(self.painters)
            .with_compression(self.config.compress_streams);
        if let Some(resources) = self.resources {
            log::info!("Loading resources through {}", resources.name());
            renderer = renderer.with_resources(resources);
        }

        log::debug!(
            "Building pipeline: executor={:?}, transforms={:?}",
            executor,
            self.transforms.names()
        );
        Ok(DocumentPipeline::new(renderer, executor)
            .with_transforms(self.transforms)
            .with_layout_config(self.config.layout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sablon_executor::Executor;
    use sablon_resolve::{ResolvedValue, TransformArgs, TransformError};

    fn kdv(_: &TransformArgs<'_>) -> Result<ResolvedValue, TransformError> {
        Ok(ResolvedValue::Text("%20".into()))
    }

    #[test]
    fn sequential_builds_use_the_sync_executor() {
        let pipeline = PipelineBuilder::new().with_parallel_pages(false).build().unwrap();
        assert_eq!(pipeline.executor().name(), "SyncExecutor");
    }

    #[test]
    fn extra_transforms_join_the_builtins() {
        let pipeline = PipelineBuilder::new()
            .with_transform("kdv", kdv)
            .with_worker_threads(1)
            .build()
            .unwrap();
        assert!(pipeline.transforms().contains("KDV"));
        assert!(pipeline.transforms().contains("currency"));
    }

    #[test]
    fn config_values_reach_the_pipeline() {
        let config = EngineConfig {
            layout: LayoutConfig {
                header_row_height: 22.0,
                data_row_height: 11.0,
            },
            ..EngineConfig::default()
        };
        let pipeline = PipelineBuilder::from_config(config).build().unwrap();
        assert_eq!(pipeline.layout_config().data_row_height, 11.0);
    }
}
