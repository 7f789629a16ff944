//! # Quill API Server Library
//!
//! Core of the Quill articles API: a small JSON service where anyone can
//! read articles and registered users can write their own.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `dispatch`: Path-based routing to handlers
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Response hardening
//! - `response`: The `{status, data?, message}` envelope
//! - `routes`: Route handlers

pub mod app;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod middleware;
pub mod response;
pub mod routes;
