use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ModelError {
    #[error("{parent} expects a {expected} node in its {slot} slot, found {found}")]
    InvalidChild {
        parent: &'static str,
        slot: &'static str,
        expected: &'static str,
        found: String,
    },
}
