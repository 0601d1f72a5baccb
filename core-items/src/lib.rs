//! # Core Items
//!
//! Domain operations on backend items (list, get, create, update, delete)
//! plus the backend's status and health endpoints. Every operation returns an
//! [`Envelope`]; failures are reduced to a message string.

pub mod envelope;
pub mod error;
pub mod models;
pub mod service;

pub use envelope::{Envelope, Timing};
pub use error::{ItemsError, Result};
pub use models::{Item, ItemInput, ItemList, ItemUpdate, ValidationReport};
pub use service::ItemService;
