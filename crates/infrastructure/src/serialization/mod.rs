//! JSON input and output for the command line.
//!
//! Output is stable: 2-space indentation, fields in declaration order and a
//! trailing newline, so printed states diff cleanly.

mod json;

pub use json::*;
