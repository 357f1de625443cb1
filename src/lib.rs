//! Customer Context API Library
//!
//! This library provides the customer context service: a small HTTP API that
//! composes account summary, support history and account metadata for a
//! customer into one response, plus the widget page that renders it.
//!
//! # Modules
//!
//! - `config`: Configuration management.
//! - `context`: Customer context aggregation.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `models`: Core data models.
//! - `openapi`: OpenAPI document for the JSON routes.
//! - `router`: HTTP routes and middleware.
//! - `services`: Customer data sources (stub and remote HTTP).

pub mod config;
pub mod context;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod router;
pub mod services;
