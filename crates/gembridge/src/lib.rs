//! Gembridge - Gemini client shim for relay gateways without a Files API
//!
//! Some relay gateways expose the Gemini generation endpoint but not the
//! Files API. This crate provides a facade client that buffers uploads in
//! memory and rewrites generation requests to carry the bytes inline, so the
//! outbound request never touches the unsupported upload path.

pub mod buffer;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod rewrite;
pub mod types;
pub mod upload;

pub use client::GeminiClient;
pub use error::GembridgeError;
