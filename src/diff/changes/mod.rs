//! Change computer implementations.
//!
//! [`TitleChangeComputer`] produces the identity diff and
//! [`ParameterChangeComputer`] the content diff.

mod parameters;
mod titles;

pub use parameters::ParameterChangeComputer;
pub use titles::TitleChangeComputer;
