//! Turing machines, tapes and the interpreter that walks them.

mod error;
mod limits;
mod machine;
mod tape;
mod walk;

pub use error::*;
pub use limits::*;
pub use machine::*;
pub use tape::*;
pub use walk::*;
