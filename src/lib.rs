pub mod filters;
pub mod gemini;
pub mod http;
pub mod model;
pub mod rate_limit;
pub mod repo;
pub mod storage;
pub mod tasks;
pub mod utils;
