//! SQLScope Storage Layer
//!
//! SQLite access through a [`TracedConnection`], which reports every
//! statement to a [`Logger`](sqlscope_logging::Logger) with its bind values.

mod bind;
mod connection;

pub use bind::{to_scalar, to_scalars, trace_template};
pub use connection::TracedConnection;
