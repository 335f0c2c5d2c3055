use arbor_ast::ModelError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum TraverseError {
    #[error("required argument `{0}` is missing")]
    InvalidArgument(&'static str),
    #[error("cannot descend into unsupported node kind `{0}`")]
    UnsupportedNode(String),
    #[error("invalid rebuild: {0}")]
    Model(#[from] ModelError),
}
