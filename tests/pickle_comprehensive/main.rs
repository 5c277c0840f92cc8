//! Pickle Comprehensive Test Suite
//!
//! End-to-end tests for pickling values that hold live entities, driven
//! through the public `refpack` facade.
//!
//! ## Test Structure
//!
//! - **Reference Invariants**: round trips, proxies and facades, absent and
//!   stale references, dbrefs
//! - **Unresolved Types**: pass-through and error policies
//! - **Wire Format**: token layout, sentinel collisions, empty results
//! - **Consistency**: sync barrier, shared directory, entity placement
//!   property
//! - **Configuration**: `refpack.toml` driven picklers
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test pickle_comprehensive
//!
//! # With log output
//! cargo test --test pickle_comprehensive -- --nocapture
//! ```

mod common;

mod reference_invariants;
mod unresolved_types;
