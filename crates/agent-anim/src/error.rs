//! Animation configuration errors.
//!
//! These never escape the tick loop: the public machine API logs them and
//! degrades to a no-op, per the `try_*` / logging split in `machine`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnimError {
    #[error("unknown animation parameter '{0}'")]
    UnknownParameter(String),

    #[error("unknown animation clip '{0}'")]
    UnknownClip(String),

    #[error("layer {0} out of range ({1} layers)")]
    LayerOutOfRange(usize, usize),
}
