//! Clients for external services.

pub mod notion;

pub use notion::Notion;
