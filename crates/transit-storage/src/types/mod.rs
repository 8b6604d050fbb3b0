//! Type definitions for transit storage.

mod accounts;
mod ids;
mod roles;
mod verification;

pub use accounts::*;
pub use ids::*;
pub use roles::*;
pub use verification::*;
