//! Searching the bounded certificate space for one the verifier accepts.

mod enumerator;
mod feasibility;
mod prefix_iterator;

pub use enumerator::*;
pub use feasibility::*;
pub use prefix_iterator::*;
