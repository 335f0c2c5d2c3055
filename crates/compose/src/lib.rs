//! Helpers that splice typed lambdas into one another by parameter substitution.

pub mod error;
pub mod splice;

pub use self::{
    error::ComposeError,
    splice::{append_to, combine_body_with, compose, pipe, prepend_to, tuple_parameters},
};
