//! Construction documentation generator.
//!
//! Turns a structured BIM model snapshot into a professional construction
//! document through an LLM provider's structured-output endpoint, and serves
//! the result over HTTP.

pub mod api;
pub mod app;
pub mod cancellation;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod services;
