// # routeros-core
//
// Core library for reconciling RouterOS configuration over the REST API.
//
// ## Architecture Overview
//
// - **Transport**: Trait for issuing authenticated REST calls to the device
// - **ResourceLocator**: Finds a live record by its natural key
// - **Reconciler**: Compares desired vs. live state and applies the minimal change
// - **Outcome**: Structured `{changed, result}` report handed back to the caller
// - **ManagedResource**: Trait describing one key-attribute resource family
//
// ## Design Principles
//
// 1. **No hidden inputs**: Connection settings arrive as a resolved `ConnectionConfig`;
//    nothing in this crate reads the environment
// 2. **Fresh state**: Every reconciliation re-reads the device, nothing is cached
// 3. **One call per action**: At most one GET to locate and one PUT/DELETE to apply
// 4. **Single error contract**: Every failure is an [`Error`], adapters decide how to surface it

pub mod codec;
pub mod config;
pub mod engine;
pub mod error;
pub mod facts;
pub mod locator;
pub mod report;
pub mod resources;
pub mod traits;

// Re-export core types for convenience
pub use config::ConnectionConfig;
pub use engine::{Action, ChangeDecision, Reconciler};
pub use error::{Error, Result};
pub use facts::{RouterFacts, gather_facts};
pub use locator::{CurrentRecord, ResourceLocator};
pub use report::{Outcome, OutcomeBody};
pub use resources::dns::{DnsEntryAttributes, DnsStaticEntry};
pub use traits::{ManagedResource, Method, TargetState, Transport};
