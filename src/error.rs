use crate::editor::CodeError;
use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures surfaced to the page. Display text is what the user sees.
#[derive(Debug, Error)]
pub enum TutorialError {
    #[error("Add blocks first.")]
    EmptySequence,
    #[error("Write some code first.")]
    EmptyCode,
    #[error(transparent)]
    Code(#[from] CodeError),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("malformed configuration: {0}")]
    Config(String),
    #[error("page element #{0} not found")]
    MissingElement(&'static str),
}

impl From<TutorialError> for JsValue {
    fn from(err: TutorialError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
