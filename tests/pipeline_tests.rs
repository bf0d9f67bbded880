mod common;

use common::fixtures::*;
use common::{GeneratedPdf, TestResult, init_logging, readable_pipeline};
use pretty_assertions::assert_eq;
use sablon::{
    BaseSurface, CancellationToken, DocumentPipeline, DocumentRenderer, Executor,
    InMemoryResourceProvider, LopdfRenderer, MappingSource, PageJob, PdfPage, PipelineBuilder, PipelineError,
    RenderError, RenderStage, ResourceUri, SyncExecutor, Template, ValidationIssue,
};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn renders_every_declared_page() -> TestResult {
    init_logging();
    let output = readable_pipeline()?.render(&quote_template(), &quote_mappings(), &quote_record(3))?;

    assert_eq!(output.media_type, "application/pdf");
    assert_eq!(output.page_count, 2);
    assert!(!output.has_overflow());

    let pdf = GeneratedPdf::from_output(output)?;
    assert_pdf_page_count!(pdf, 2);
    assert_page_shows!(pdf, 1, "Acme Makina A.S.");
    assert_page_shows!(pdf, 1, "Kalem 3");
    assert_page_shows!(pdf, 2, "Fiyatlara KDV dahil degildir.");
    Ok(())
}

#[test]
fn currency_totals_are_formatted_independent_of_locale() -> TestResult {
    let output = readable_pipeline()?.render(&quote_template(), &quote_mappings(), &quote_record(1))?;
    let pdf = GeneratedPdf::from_output(output)?;
    // ₺ is not in the PDF font encoding and is written as TL.
    assert_page_shows!(pdf, 1, "TL8.260,00");
    assert_page_shows!(pdf, 1, "TL10,00");
    Ok(())
}

#[test]
fn null_customer_fails_with_exactly_that_field() -> TestResult {
    let mut record = quote_record(2);
    record["customer"] = json!(null);

    let err = readable_pipeline()?
        .render(&quote_template(), &quote_mappings(), &record)
        .unwrap_err();
    match &err {
        PipelineError::MissingFields(fields) => assert_eq!(fields, &vec!["customerName".to_string()]),
        other => panic!("expected MissingFields, got {other:?}"),
    }
    assert_eq!(err.stage(), Some(RenderStage::Resolving));
    Ok(())
}

#[test]
fn table_rows_move_the_total() -> TestResult {
    let pipeline = readable_pipeline()?;
    let template = quote_template();
    let mappings = quote_mappings();

    let empty = pipeline.plan(&template, &mappings, &quote_record(0))?;
    let items = empty[0].get("items").map(|p| p.height);
    assert_eq!(items, Some(15.0));
    assert_eq!(empty[0].get("totalAmount").map(|p| p.y), Some(340.0 - 185.0));
    assert_eq!(empty[0].get("pageLabel").map(|p| p.y), Some(20.0));

    let ten = pipeline.plan(&template, &mappings, &quote_record(10))?;
    assert_eq!(ten[0].get("items").map(|p| p.height), Some(165.0));
    assert_eq!(ten[0].get("totalAmount").map(|p| p.y), Some(340.0 - 35.0));

    assert_eq!(ten[1], empty[1]);
    Ok(())
}

#[test]
fn overflowing_pages_are_flagged_but_still_rendered() -> TestResult {
    init_logging();
    let output = readable_pipeline()?.render(&quote_template(), &quote_mappings(), &quote_record(60))?;

    assert_eq!(output.overflow_pages, vec![0]);
    assert_eq!(output.warnings.len(), 1);
    let warning = &output.warnings[0];
    assert_eq!(warning.page_index, 0);
    assert!(warning.content_bottom > warning.usable_height);

    let pdf = GeneratedPdf::from_output(output)?;
    assert_pdf_page_count!(pdf, 2);
    Ok(())
}

#[test]
fn repeated_renders_are_byte_identical() -> TestResult {
    let pipeline = PipelineBuilder::new().with_worker_threads(4).build()?;
    let template = quote_template();
    let mappings = quote_mappings();
    let record = quote_record(12);

    let first = pipeline.render(&template, &mappings, &record)?;
    let second = pipeline.render(&template, &mappings, &record)?;
    assert_eq!(first.bytes, second.bytes);
    Ok(())
}

/// Runs jobs last to first and hands results back in that order.
#[derive(Debug, Clone)]
struct ReversingExecutor;

impl Executor for ReversingExecutor {
    fn execute_all<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + Clone + 'static,
    {
        items.into_iter().rev().map(f).collect()
    }

    fn parallelism(&self) -> usize {
        1
    }

    fn name(&self) -> &'static str {
        "ReversingExecutor"
    }
}

#[test]
fn pages_keep_declared_order_whatever_finishes_first() -> TestResult {
    let pipeline = DocumentPipeline::new(LopdfRenderer::new().with_compression(false), ReversingExecutor);
    let output = pipeline.render(&quote_template(), &quote_mappings(), &quote_record(2))?;

    let pdf = GeneratedPdf::from_output(output)?;
    assert_pdf_page_count!(pdf, 2);
    assert_page_shows!(pdf, 1, "Sayfa 1");
    assert_page_not_shows!(pdf, 1, "Sayfa 2");
    assert_page_shows!(pdf, 2, "Sayfa 2");
    Ok(())
}

/// Counts the pages it is asked to draw.
#[derive(Debug, Default)]
struct CountingRenderer {
    inner: LopdfRenderer,
    pages: Arc<AtomicUsize>,
    cancel_after_page: Option<CancellationToken>,
}

impl DocumentRenderer for CountingRenderer {
    type Page = PdfPage;

    fn media_type(&self) -> &'static str {
        self.inner.media_type()
    }

    fn render_page(&self, job: &PageJob) -> Result<PdfPage, RenderError> {
        self.pages.fetch_add(1, Ordering::SeqCst);
        if let Some(token) = &self.cancel_after_page {
            token.cancel();
        }
        self.inner.render_page(job)
    }

    fn assemble(&self, template: &Template, pages: Vec<PdfPage>) -> Result<Vec<u8>, RenderError> {
        self.inner.assemble(template, pages)
    }
}

#[test]
fn skipped_required_field_never_reaches_rendering() {
    let pages = Arc::new(AtomicUsize::new(0));
    let renderer = CountingRenderer {
        pages: Arc::clone(&pages),
        ..CountingRenderer::default()
    };
    let pipeline = DocumentPipeline::new(renderer, SyncExecutor::new());

    let mut mappings = quote_mappings();
    remap(&mut mappings, "customerName", json!({ "type": "skip" }));
    let err = pipeline
        .render(&quote_template(), &mappings, &quote_record(2))
        .unwrap_err();

    let PipelineError::Validation(report) = &err else {
        panic!("expected a validation failure, got {err:?}");
    };
    assert_eq!(
        report.issues,
        vec![ValidationIssue::SkippedRequiredField {
            field: "customerName".into()
        }]
    );
    assert_eq!(err.stage(), Some(RenderStage::Validating));
    assert_eq!(pages.load(Ordering::SeqCst), 0);
}

#[test]
fn validation_lists_every_problem() -> TestResult {
    let mut mappings = quote_mappings();
    mappings.retain(|m| m.field_name != "customerName");
    remap(&mut mappings, "terms", json!({ "type": "table", "rows": "items", "columns": [] }));

    let err = readable_pipeline()?
        .render(&quote_template(), &mappings, &quote_record(1))
        .unwrap_err();
    assert_eq!(err.field_names(), vec!["customerName", "terms"]);
    Ok(())
}

#[test]
fn a_second_mapping_for_the_same_field_fails_validation() -> TestResult {
    let mut mappings = quote_mappings();
    let mut extra = mappings
        .iter()
        .find(|m| m.field_name == "customerName")
        .cloned()
        .ok_or("no customerName mapping")?;
    extra.source = MappingSource::literal("BASKA");
    mappings.push(extra);

    let err = readable_pipeline()?
        .render(&quote_template(), &mappings, &quote_record(1))
        .unwrap_err();
    let PipelineError::Validation(report) = &err else {
        panic!("expected a validation failure, got {err:?}");
    };
    assert_eq!(
        report.issues,
        vec![ValidationIssue::DuplicateMapping { field: "customerName".into() }]
    );
    Ok(())
}

#[test]
fn mappings_written_for_another_template_fail_validation() -> TestResult {
    let mut mappings = quote_mappings();
    for mapping in &mut mappings {
        mapping.template_id = "fatura-standart".into();
    }
    let err = readable_pipeline()?
        .render(&quote_template(), &mappings, &quote_record(1))
        .unwrap_err();
    let PipelineError::Validation(report) = &err else {
        panic!("expected a validation failure, got {err:?}");
    };
    assert_eq!(report.issues.len(), mappings.len());
    assert!(report
        .issues
        .iter()
        .all(|i| matches!(i, ValidationIssue::ForeignMapping { .. })));
    Ok(())
}

#[test]
fn unknown_transforms_are_caught_before_resolution() -> TestResult {
    let mut mappings = quote_mappings();
    remap(
        &mut mappings,
        "totalAmount",
        json!({ "type": "computed", "transform": "kdvDahil", "inputs": ["total_amount"] }),
    );
    let err = readable_pipeline()?
        .render(&quote_template(), &mappings, &quote_record(1))
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::UnknownTransform { ref field, ref transform }
            if field == "totalAmount" && transform == "kdvDahil"
    ));
    Ok(())
}

#[test]
fn plain_values_on_tables_fail_at_rendering() -> TestResult {
    let mut mappings = quote_mappings();
    remap(&mut mappings, "items", json!({ "type": "literal", "value": "kalem yok" }));
    let err = readable_pipeline()?
        .render(&quote_template(), &mappings, &quote_record(1))
        .unwrap_err();
    assert!(matches!(err, PipelineError::RenderType { ref field, .. } if field == "items"));
    assert_eq!(err.stage(), Some(RenderStage::Rendering));
    Ok(())
}

#[test]
fn cancelled_before_start_does_no_work() {
    let pages = Arc::new(AtomicUsize::new(0));
    let renderer = CountingRenderer {
        pages: Arc::clone(&pages),
        ..CountingRenderer::default()
    };
    let pipeline = DocumentPipeline::new(renderer, SyncExecutor::new());
    let token = CancellationToken::new();
    token.cancel();

    let err = pipeline
        .render_with_cancel(&quote_template(), &quote_mappings(), &quote_record(1), &token)
        .unwrap_err();
    assert!(matches!(err, PipelineError::Cancelled(RenderStage::Validating)));
    assert_eq!(pages.load(Ordering::SeqCst), 0);
}

#[test]
fn cancelling_mid_render_returns_no_bytes() {
    let token = CancellationToken::new();
    let renderer = CountingRenderer {
        cancel_after_page: Some(token.clone()),
        ..CountingRenderer::default()
    };
    let pipeline = DocumentPipeline::new(renderer, SyncExecutor::new());

    let result = pipeline.render_with_cancel(&quote_template(), &quote_mappings(), &quote_record(1), &token);
    assert!(matches!(result, Err(PipelineError::Cancelled(RenderStage::Complete))));
}

#[test]
fn backdrop_pages_sit_under_the_fields() -> TestResult {
    let pipeline = readable_pipeline()?;
    let letterhead = pipeline.render(&quote_template(), &quote_mappings(), &quote_record(0))?;

    let provider = InMemoryResourceProvider::new().with("antet.pdf", letterhead.bytes)?;
    let pipeline = PipelineBuilder::new()
        .with_compression(false)
        .with_resources(Arc::new(provider))
        .build()?;
    let mut template = quote_template();
    template.base_surface = BaseSurface::Backdrop {
        source: ResourceUri::new("antet.pdf"),
        size: template.base_surface.page_size(),
        padding: template.base_surface.padding(),
    };

    let pdf = GeneratedPdf::from_output(pipeline.render(&template, &quote_mappings(), &quote_record(2))?)?;
    for page in [1, 2] {
        let content = common::pdf_assertions::page_content(&pdf.doc, page);
        assert!(content.starts_with("q 1 0 0 1 0 0 cm /Bg Do Q"), "page {page}: {content}");
        assert!(common::pdf_assertions::page_xobjects(&pdf.doc, page).contains(&"Bg".to_string()));
    }
    Ok(())
}

#[test]
fn concurrent_renders_do_not_interfere() -> TestResult {
    let pipeline = PipelineBuilder::new().build()?;
    let template = Arc::new(quote_template());
    let mappings = Arc::new(quote_mappings());

    let handles: Vec<_> = [1usize, 40, 5, 60]
        .into_iter()
        .map(|rows| {
            let (pipeline, template, mappings) = (pipeline.clone(), Arc::clone(&template), Arc::clone(&mappings));
            std::thread::spawn(move || {
                pipeline
                    .render(&template, &mappings, &quote_record(rows))
                    .map(|o| (rows, o.overflow_pages))
            })
        })
        .collect();

    for handle in handles {
        let (rows, overflow) = handle.join().map_err(|_| "render thread panicked")??;
        let expected: Vec<usize> = if rows > 38 { vec![0] } else { vec![] };
        assert_eq!(overflow, expected, "{rows} rows");
    }
    Ok(())
}
