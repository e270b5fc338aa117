use crate::assets::{AssetCounts, AssetError};

/// Reasons a backdrop scene could not be mounted.
#[derive(Debug, thiserror::Error)]
pub enum BackdropError {
    #[error("invalid scene parameters: {0}")]
    InvalidParams(&'static str),
    #[error("asset allocation failed: {source} (rolled back, {} still live)", .counts.live)]
    Allocation {
        #[source]
        source: AssetError,
        counts: AssetCounts,
    },
}
