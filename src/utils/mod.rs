pub mod env_reader;
mod sanitize;

pub use sanitize::*;
