//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate service client calls into use-case level APIs.
//! - Keep callers decoupled from the concrete client implementation.

pub mod identity_service;
