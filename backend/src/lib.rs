//! Task and inventory tracker core.
//!
//! The crate is organised as a hexagon: `domain` holds entities, ports, and
//! the services implementing the use-cases; `outbound` holds storage
//! adapters; `config` loads the settings shared by both.

pub mod config;
pub mod domain;
pub mod outbound;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
