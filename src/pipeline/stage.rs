use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Where a render request is in its life.
///
/// A request moves strictly forward through
/// `Validating → Resolving → LayingOut → Rendering → Complete`; any step may
/// end in `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RenderStage {
    Validating,
    Resolving,
    LayingOut,
    Rendering,
    Complete,
    Failed,
}

impl RenderStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderStage::Validating => "validating",
            RenderStage::Resolving => "resolving",
            RenderStage::LayingOut => "laying out",
            RenderStage::Rendering => "rendering",
            RenderStage::Complete => "complete",
            RenderStage::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RenderStage::Complete | RenderStage::Failed)
    }
}

impl fmt::Display for RenderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A flag a caller flips to abandon a render.
///
/// The pipeline looks at it between stages, so a cancelled render stops at
/// the next boundary and returns no bytes. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Cancels its token when dropped unless disarmed first.
#[derive(Debug)]
pub(crate) struct CancelOnDrop {
    token: Option<CancellationToken>,
}

impl CancelOnDrop {
    pub(crate) fn new(token: CancellationToken) -> Self {
        Self { token: Some(token) }
    }

    pub(crate) fn disarm(mut self) {
        self.token = None;
    }
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
    }
}
