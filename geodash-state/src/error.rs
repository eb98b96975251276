use geodash_core::error::{FetchError, ValidationError};
use thiserror::Error;

/// Why a panel action did not complete.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PanelError {
    #[error("{}", .0.message())]
    Validation(#[from] ValidationError),

    #[error("no region selected; draw a polygon first")]
    NoRegion,

    #[error("WMS URL not available")]
    NoWmsUrl,

    /// A statistics submission is already running
    #[error("a request is already in progress")]
    Busy,

    #[error(transparent)]
    Transport(#[from] FetchError),

    #[error("could not copy the link: {0}")]
    Clipboard(String),
}

impl PanelError {
    /// Whether the user can fix this by filling in the form.
    pub fn is_validation(&self) -> bool {
        matches!(self, PanelError::Validation(_))
    }
}
