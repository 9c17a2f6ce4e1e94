//! Conversions between problem instances and the text the machines read.

mod dimacs;
mod tape;

pub use dimacs::*;
pub use tape::*;
