//! Infrastructure adapters and runtime bootstrap.

pub mod assets;
pub mod content_fs;
pub mod error;
pub mod http;
pub mod telemetry;
