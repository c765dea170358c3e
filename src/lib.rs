//! Ardesia: a personal blog and marketing site server.
//!
//! Library root exposing the application, configuration, domain,
//! infrastructure, and presentation layers used by the `ardesia` binary
//! and the integration test suite.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
