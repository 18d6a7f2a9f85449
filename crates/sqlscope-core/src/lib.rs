//! # SQLScope Core Library
//!
//! Domain types and pure services behind SQL trace logging.
//!
//! ## Modules
//!
//! - `domain` - Bound values, trace payloads and logger configuration
//! - `service` - Value formatting, SQL reconstruction and trace filtering
//! - `config` - Loading `logger.<profile>.yml`
//! - `error` - `ConfigurationError`
//!
//! ```text
//! driver hook args ──▶ filter_trace ──▶ SqlEvent
//!                                         │
//!                     format_values ◀─────┤ values
//!                           │             │ template
//!                           ▼             ▼
//!                         reconstruct(template, values) ──▶ "[sql] : ..."
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod service;

// Re-export commonly used types
pub use domain::*;
pub use error::{ConfigurationError, Result};
pub use service::{
    filter_trace, format_value, format_values, reconstruct, sql_line, Dialect, SQL_LINE_PREFIX,
};
