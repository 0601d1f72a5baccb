//! # Core Runtime Module
//!
//! Provides the ambient runtime infrastructure shared by every core crate:
//! - Logging and tracing setup
//! - Configuration management and capability validation
//!
//! ## Overview
//!
//! Nothing in here issues requests. This crate decides how the rest of the
//! workspace logs, how it is configured, and which host capabilities must be
//! present before a `CoreService` can be assembled.

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
