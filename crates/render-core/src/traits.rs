use crate::error::RenderError;
use sablon_layout::LayoutPlan;
use sablon_resolve::ResolvedValues;
use sablon_template::{Schema, Template};
use std::fmt::Debug;
use std::sync::Arc;

/// Everything needed to draw one page of a template.
///
/// Jobs are independent of each other so the pipeline can hand them to any
/// executor.
#[derive(Debug, Clone)]
pub struct PageJob {
    pub template: Arc<Template>,
    pub page_index: usize,
    pub plan: LayoutPlan,
    pub values: Arc<ResolvedValues>,
}

impl PageJob {
    pub fn schema(&self) -> Result<&Schema, RenderError> {
        self.template.pages.get(self.page_index).ok_or_else(|| {
            RenderError::Other(format!(
                "template '{}' has no page {}",
                self.template.id, self.page_index
            ))
        })
    }
}

/// A rendering backend.
///
/// Pages are drawn independently (possibly on several threads) into the
/// backend's intermediate `Page` form, then assembled in declared order into
/// the final byte stream.
pub trait DocumentRenderer: Send + Sync + Debug + 'static {
    type Page: Send + 'static;

    /// Media type of the assembled bytes, e.g. `application/pdf`.
    fn media_type(&self) -> &'static str;

    fn render_page(&self, job: &PageJob) -> Result<Self::Page, RenderError>;

    /// Joins rendered pages. `pages` arrive in the template's page order.
    fn assemble(&self, template: &Template, pages: Vec<Self::Page>) -> Result<Vec<u8>, RenderError>;
}
