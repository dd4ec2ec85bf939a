use scrub_model::HookPosition;
use scrub_store::StoreError;
use thiserror::Error;

use crate::hooks::HookError;

/// Runtime failure during a pipeline run. Store and hook errors propagate
/// as-is; there is no retry or recovery path, and a failure mid-record
/// aborts processing at that point with no rollback.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("hook `{position}` failed: {source}")]
    Hook {
        position: HookPosition,
        #[source]
        source: HookError,
    },
}
