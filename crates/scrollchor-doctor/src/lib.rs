#![forbid(unsafe_code)]

pub mod builtin;
pub mod cli;
pub mod config;
pub mod error;
pub mod inspect;
pub mod logging;
pub mod simulate;
pub mod snap;

pub use cli::{run, run_from_env};
pub use error::{DoctorError, Result};
