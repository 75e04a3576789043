//! # memberset-tags — Tag Match Index
//!
//! Maintains, for every endpoint, the set of tags it currently matches. An
//! endpoint matches a tag when at least one of the profiles it references
//! carries that tag. For each `(tag, endpoint)` pair the index tracks the
//! exact set of profiles responsible, and notifies its `MatchListener` only
//! when that set goes from empty to non-empty (match started) or back
//! (match stopped).
//!
//! ## Inputs
//!
//! - `update_profile_tags` / `delete_profile_tags` — full replacement of a
//!   profile's tag list.
//! - `update_endpoint` / `delete_endpoint` — full replacement of an
//!   endpoint's profile list.
//!
//! ## Ordering
//!
//! When an endpoint's profiles change, added profiles are applied before
//! removed ones. Renaming a profile (old ID out, new ID with the same tags
//! in) therefore never drops a shared tag to zero contributors, and no
//! spurious stop/start pair is emitted.
//!
//! Listeners run inline on the caller's thread before the update returns.
//! A panicking listener unwinds straight through the update.

pub mod index;
pub mod listener;

pub use index::TagIndex;
pub use listener::{MatchCallbacks, MatchEvent, MatchListener};
