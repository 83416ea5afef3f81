//! `LayoutError` — the contract-violation channel between the engine and
//! its embedder (§7 addendum in `SPEC_FULL.md`). This is distinct from the
//! input-malformation recovery policy in §7, which is handled locally by
//! clamping and never surfaces here.

use webbox_dom::NodeId;

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("node {0} is not present in this pass's arena")]
    UnknownNode(NodeId),
    #[error("recursion depth exceeded the configured limit ({limit})")]
    DepthExceeded { limit: u32 },
    #[error("layout() was invoked without a usable viewport")]
    NoViewport,
}

pub type LayoutResult<T> = Result<T, LayoutError>;
