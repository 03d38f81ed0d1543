//! # Summit Engine
//!
//! Core domain logic for the Summit conference API.
//!
//! This crate holds everything that can be decided without talking to a
//! datastore: filter compilation, registration state transitions, the typed
//! entity model, opaque entity keys, and the derived announcement strings.
//! The same inputs always produce the same outputs.
//!
//! ## Design Principles
//!
//! - **No IO**: the engine has no knowledge of HTTP, SQL, or caches
//! - **Explicit configuration**: filter whitelists are values passed in,
//!   never ambient globals
//! - **Testable**: pure logic, no mocks needed
//!
//! ## Core Concepts
//!
//! ### Query plans
//!
//! Caller-supplied filter tuples are compiled by [`filter::compile`] against
//! an immutable [`FilterConfig`] whitelist into a [`QueryPlan`]: validated
//! clauses plus a sort-key sequence. The plan is decoupled from any backend.
//! The datastore allows only one inequality field per query and requires it
//! to lead the sort order; the compiler enforces that rule.
//!
//! ### Registration transitions
//!
//! [`registration`] moves a (profile, target) pair between `NOT_REGISTERED`
//! and `REGISTERED` for conference attendance and session wishlists. The
//! functions mutate both entities in memory; the caller wraps them in a
//! store transaction so both writes commit or neither does.
//!
//! ### Keys
//!
//! [`Key`] encodes an entity reference (kind, id, ancestor path) into a
//! URL-safe string. Malformed inputs decode to [`Error::NotFound`].
//!
//! ## Quick Start
//!
//! ```rust
//! use summit_engine::{compile, FilterConfig, FilterSpec};
//!
//! let config = FilterConfig::conferences();
//! let plan = compile(
//!     &config,
//!     &[FilterSpec {
//!         field: "MONTH".into(),
//!         operator: "GT".into(),
//!         value: "3".into(),
//!     }],
//! )
//! .unwrap();
//!
//! assert_eq!(plan.order_by, vec!["month", "name"]);
//! ```

pub mod announce;
pub mod entity;
pub mod error;
pub mod filter;
pub mod key;
pub mod registration;

// Re-export main types at crate root
pub use entity::{
    Conference, ConferenceBuilder, ConferencePatch, Profile, Session, SessionBuilder,
    SessionPatch, Speaker, TeeShirtSize,
};
pub use error::Error;
pub use filter::{
    compile, FilterClause, FilterConfig, FilterSpec, FilterValue, Operator, QueryPlan,
};
pub use key::{Key, KeyId, Kind};
