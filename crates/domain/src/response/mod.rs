//! Incoming response description.

mod spec;

pub use spec::ApiResponse;
