//! # memberset-ipsets — IP-Set Calculator
//!
//! Turns two independent inputs into per-IP-set membership:
//!
//! - which IP sets each endpoint contributes to, delivered as
//!   `match_started` / `match_stopped` (typically by a tag index);
//! - which IP addresses each endpoint currently owns, delivered as
//!   `update_endpoint_ips` / `delete_endpoint`.
//!
//! An IP belongs to a set while at least one endpoint contributing to that
//! set holds it. The `IpSetListener` hears about an IP only when its
//! contributor count moves between zero and non-zero, so two endpoints
//! sharing an address (during a migration, say) never make the set flap.

pub mod calculator;
pub mod listener;

pub use calculator::IpSetCalculator;
pub use listener::{IpSetCallbacks, IpSetListener, MembershipEvent};
