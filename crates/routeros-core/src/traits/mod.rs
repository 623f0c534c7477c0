//! Core traits for RouterOS reconciliation
//!
//! - [`Transport`]: Issue REST calls against the device
//! - [`ManagedResource`]: Describe one key-attribute resource family

pub mod resource;
pub mod transport;

pub use resource::{ManagedResource, TargetState};
pub use transport::{Method, Transport};
