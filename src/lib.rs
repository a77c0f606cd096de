//! Serve translation catalogs to browser clients.
//!
//! A request names a domain, an optional comma-separated locale list and an
//! output format. The response is either a JSON document or a script that
//! registers every message on a client-side translator object.

pub mod aggregate;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod dump;
pub mod error;
pub mod i18n;
pub mod render;
pub mod server;
pub mod service;

pub use error::RenderError;
