//! # memberset-core — Foundational Types
//!
//! Leaf crate of the memberset workspace. It defines the vocabulary shared
//! by the tag match index and the IP-set calculator, and nothing more.
//!
//! ## Contents
//!
//! 1. **Identifier newtypes.** `ProfileId`, `Tag` and `IpSetId` are distinct
//!    types so a tag can never be handed to an API expecting an IP-set name
//!    without going through an explicit naming step.
//!
//! 2. **Endpoint keys.** The indices are generic over any `EndpointKey`
//!    (anything `Eq + Hash + Clone + Debug`). `EndpointId` is the concrete
//!    workload/host key used by drivers and tests.
//!
//! 3. **Collections.** `MultiMap` is a key to value-set map that deletes a
//!    key the moment its set empties. `diff` is the set-semantics slice diff
//!    both indices use to turn a full replacement into added/removed deltas.
//!
//! 4. **Configuration and errors.** `PipelineConfig` (YAML) and
//!    `MembersetError`. The index operations themselves are total and never
//!    return errors; errors exist only at driver boundaries.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `memberset-*` crates.
//! - No `unsafe` code.
//! - No `.unwrap()` outside tests.

pub mod collections;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod identity;

// Re-export primary types for ergonomic imports.
pub use collections::{diff, MultiMap, SliceDiff};
pub use config::PipelineConfig;
pub use endpoint::{EndpointId, EndpointKey};
pub use error::{ConfigError, MembersetError};
pub use identity::{IpSetId, ProfileId, Tag};
