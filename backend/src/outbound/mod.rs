//! Outbound adapters implementing domain ports.
//!
//! This module follows the hexagonal architecture pattern: adapters translate
//! between domain types and their storage representation and contain no
//! business logic.
//!
//! - **memory**: process-local repositories guarded by async locks

pub mod memory;
