//! Core domain types

pub mod log_config;
pub mod trace;
pub mod value;

pub use log_config::*;
pub use trace::*;
pub use value::*;
