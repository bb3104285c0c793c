use crate::content::ContentError;
use crate::effect::ParameterKind;

/// Errors raised while preparing or drawing an entity.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("effect '{effect}' has no parameter '{parameter}'")]
    MissingParameter { effect: String, parameter: String },
    #[error("parameter '{parameter}' expects {expected:?}, got {found:?}")]
    ParameterType {
        parameter: String,
        expected: ParameterKind,
        found: ParameterKind,
    },
    #[error("effect '{effect}' parameter '{parameter}' was never set")]
    UnsetParameter { effect: String, parameter: String },
    #[error("model has no effect in slot {0}")]
    UnknownEffectSlot(usize),
    #[error("invalid model: {0}")]
    InvalidModel(String),
    #[error("content error: {0}")]
    Content(#[from] ContentError),
}
