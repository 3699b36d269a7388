// src/gateway/mod.rs

//! External transformation service.
//!
//! - [`client`] defines the [`ImageGateway`] trait and request descriptor.
//! - [`http`] is the production implementation over a Gemini-style HTTP API.

pub mod client;
pub mod http;

pub use client::{ImageGateway, TransformRequest};
pub use http::HttpGateway;
