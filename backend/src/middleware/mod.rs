//! Request middleware.
//!
//! [`Trace`] assigns each request a trace id and a tracing span.

pub mod trace;

pub use trace::Trace;
