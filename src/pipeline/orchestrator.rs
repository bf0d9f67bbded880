use super::output::{OverflowWarning, RenderOutput};
use super::stage::{CancelOnDrop, CancellationToken, RenderStage};
use super::validate::{ValidationReport, validate};
use crate::error::PipelineError;
use crate::registry::TemplateStore;
use log::{debug, info, warn};
use sablon_executor::{Executor, ExecutorImpl};
use sablon_layout::{LayoutConfig, LayoutPlan, compute_layout_plan};
use sablon_render_core::{DocumentRenderer, PageJob, RenderError};
use sablon_render_lopdf::LopdfRenderer;
use sablon_resolve::{ResolvedValues, TransformRegistry, resolve};
use sablon_template::{FieldMapping, Template};
use sablon_types::TemplateId;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// The render pipeline: validate, resolve, lay out, render.
///
/// The pipeline holds only configuration. Resolved values and layout plans
/// live for one request, so any number of renders may run on clones of the
/// same pipeline at once.
#[derive(Debug)]
pub struct DocumentPipeline<R: DocumentRenderer = LopdfRenderer, E: Executor = ExecutorImpl> {
    renderer: Arc<R>,
    executor: E,
    transforms: Arc<TransformRegistry>,
    layout: LayoutConfig,
}

impl<R: DocumentRenderer, E: Executor> Clone for DocumentPipeline<R, E> {
    fn clone(&self) -> Self {
        Self {
            renderer: Arc::clone(&self.renderer),
            executor: self.executor.clone(),
            transforms: Arc::clone(&self.transforms),
            layout: self.layout,
        }
    }
}

/// Values and plans for one request, ready to paint.
struct Prepared {
    values: Arc<ResolvedValues>,
    plans: Vec<LayoutPlan>,
}

impl<R: DocumentRenderer, E: Executor + 'static> DocumentPipeline<R, E> {
    /// A pipeline with the built-in transforms and default layout settings.
    pub fn new(renderer: R, executor: E) -> Self {
        Self {
            renderer: Arc::new(renderer),
            executor,
            transforms: Arc::new(TransformRegistry::default()),
            layout: LayoutConfig::default(),
        }
    }

    pub fn with_transforms(mut self, transforms: TransformRegistry) -> Self {
        self.transforms = Arc::new(transforms);
        self
    }

    pub fn with_layout_config(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn transforms(&self) -> &TransformRegistry {
        &self.transforms
    }

    pub fn layout_config(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Runs only the validation stage.
    pub fn validate(&self, template: &Template, mappings: &[FieldMapping]) -> ValidationReport {
        validate(template, mappings, &self.transforms)
    }

    /// Validates, resolves and lays out every page without drawing anything.
    pub fn plan(
        &self,
        template: &Template,
        mappings: &[FieldMapping],
        record: &Value,
    ) -> Result<Vec<LayoutPlan>, PipelineError> {
        let token = CancellationToken::new();
        self.prepare(template, mappings, record, &token).map(|p| p.plans)
    }

    pub fn render(
        &self,
        template: &Template,
        mappings: &[FieldMapping],
        record: &Value,
    ) -> Result<RenderOutput, PipelineError> {
        self.render_with_cancel(template, mappings, record, &CancellationToken::new())
    }

    /// Renders unless `token` is cancelled first. Cancellation is noticed at
    /// the next stage boundary and yields `PipelineError::Cancelled`.
    pub fn render_with_cancel(
        &self,
        template: &Template,
        mappings: &[FieldMapping],
        record: &Value,
        token: &CancellationToken,
    ) -> Result<RenderOutput, PipelineError> {
        self.run(Arc::new(template.clone()), mappings, record, token)
    }

    /// Renders on tokio's blocking pool.
    ///
    /// Dropping the returned future cancels the render at its next stage
    /// boundary.
    pub async fn render_async(
        &self,
        template: Arc<Template>,
        mappings: Vec<FieldMapping>,
        record: Value,
    ) -> Result<RenderOutput, PipelineError> {
        let pipeline = self.clone();
        let token = CancellationToken::new();
        let guard = CancelOnDrop::new(token.clone());

        let handle = tokio::task::spawn_blocking(move || {
            pipeline.run(template, &mappings, &record, &token)
        });
        let result = handle.await.map_err(|e| {
            if e.is_cancelled() {
                PipelineError::Cancelled(RenderStage::Validating)
            } else {
                PipelineError::Render(RenderError::Other(format!("render task failed: {}", e)))
            }
        });
        guard.disarm();
        result?
    }

    /// Fetches a template and its mappings from `store`, then renders.
    pub async fn render_from_store<S: TemplateStore>(
        &self,
        store: &S,
        id: &TemplateId,
        record: Value,
    ) -> Result<RenderOutput, PipelineError> {
        let template = store.fetch_template(id).await?.ok_or_else(|| {
            warn!("Template '{}' not found in store", id);
            PipelineError::Validation(ValidationReport::not_found(id.clone()))
        })?;
        let mappings = store.fetch_mappings(id).await?;
        self.render_async(Arc::new(template), mappings, record).await
    }

    fn run(
        &self,
        template: Arc<Template>,
        mappings: &[FieldMapping],
        record: &Value,
        token: &CancellationToken,
    ) -> Result<RenderOutput, PipelineError> {
        let started = Instant::now();
        info!(
            "Rendering template '{}' ({} pages) with {}",
            template.id,
            template.page_count(),
            self.executor.name()
        );

        let result = self
            .prepare(&template, mappings, record, token)
            .and_then(|prepared| self.draw(&template, prepared, token));

        match &result {
            Ok(output) => info!(
                "Rendered '{}': {} pages, {} bytes in {:.2?}",
                template.id,
                output.page_count,
                output.bytes.len(),
                started.elapsed()
            ),
            Err(e) => debug!(
                "[{}] {} after {:.2?}: {}",
                template.id,
                RenderStage::Failed,
                started.elapsed(),
                e
            ),
        }
        result
    }

    fn enter(&self, template: &Template, stage: RenderStage, token: &CancellationToken) -> Result<(), PipelineError> {
        if token.is_cancelled() {
            info!("Render of '{}' cancelled before {}", template.id, stage);
            return Err(PipelineError::Cancelled(stage));
        }
        debug!("[{}] {}", template.id, stage);
        Ok(())
    }

    fn prepare(
        &self,
        template: &Template,
        mappings: &[FieldMapping],
        record: &Value,
        token: &CancellationToken,
    ) -> Result<Prepared, PipelineError> {
        self.enter(template, RenderStage::Validating, token)?;
        let report = validate(template, mappings, &self.transforms);
        if !report.is_ok() {
            debug!("Validation of '{}' found {} issues", template.id, report.issues.len());
            return Err(PipelineError::from_report(report));
        }

        self.enter(template, RenderStage::Resolving, token)?;
        let values = resolve(template, mappings, record, &self.transforms)?;

        self.enter(template, RenderStage::LayingOut, token)?;
        let row_counts = values.table_row_counts();
        let usable_height = template.base_surface.usable_height();
        let plans = template
            .pages
            .iter()
            .map(|schema| compute_layout_plan(schema, &row_counts, usable_height, &self.layout))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Prepared {
            values: Arc::new(values),
            plans,
        })
    }

    fn draw(
        &self,
        template: &Arc<Template>,
        prepared: Prepared,
        token: &CancellationToken,
    ) -> Result<RenderOutput, PipelineError> {
        self.enter(template, RenderStage::Rendering, token)?;

        let warnings: Vec<OverflowWarning> = prepared
            .plans
            .iter()
            .enumerate()
            .filter(|(_, plan)| plan.overflow)
            .map(|(page_index, plan)| OverflowWarning {
                page_index,
                content_bottom: plan.content_bottom,
                usable_height: plan.usable_height,
            })
            .collect();
        for w in &warnings {
            warn!(
                "Page {} of '{}' overflows: content ends at {:.1}pt, usable height is {:.1}pt",
                w.page_index + 1,
                template.id,
                w.content_bottom,
                w.usable_height
            );
        }

        let jobs: Vec<PageJob> = prepared
            .plans
            .into_iter()
            .enumerate()
            .map(|(page_index, plan)| PageJob {
                template: Arc::clone(template),
                page_index,
                plan,
                values: Arc::clone(&prepared.values),
            })
            .collect();

        let renderer = Arc::clone(&self.renderer);
        let mut results = self.executor.execute_all_fallible(jobs, move |job: PageJob| {
            renderer
                .render_page(&job)
                .map(|page| (job.page_index, page))
                .map_err(|e| (job.page_index, e))
        });
        // Executors may finish pages in any order; output follows declared order.
        results.sort_by_key(|r| match r {
            Ok((index, _)) | Err((index, _)) => *index,
        });
        let pages = results
            .into_iter()
            .map(|r| r.map(|(_, page)| page).map_err(|(_, e)| PipelineError::from(e)))
            .collect::<Result<Vec<_>, _>>()?;

        if token.is_cancelled() {
            info!("Render of '{}' cancelled before {}", template.id, RenderStage::Complete);
            return Err(PipelineError::Cancelled(RenderStage::Complete));
        }
        let page_count = pages.len();
        let bytes = self.renderer.assemble(template, pages)?;
        debug!("[{}] {}", template.id, RenderStage::Complete);

        Ok(RenderOutput {
            bytes,
            media_type: self.renderer.media_type(),
            page_count,
            overflow_pages: warnings.iter().map(|w| w.page_index).collect(),
            warnings,
        })
    }
}
