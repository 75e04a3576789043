//! # memberset-pipeline — Tag Index to IP Set Wiring
//!
//! The usual deployment of the two indices: the tag index's match events
//! feed the IP-set calculator directly, with each tag mapped to an IP-set
//! identifier by `IpSetNaming`. Delivery is synchronous, so by the time
//! any update returns both indices have fully settled and every resulting
//! `MembershipEvent` has reached the listener.
//!
//! ```text
//! profile tags ──┐
//!                ├─▶ TagIndex ──(match start/stop)──▶ IpSetCalculator ──▶ IpSetListener
//! endpoint profiles ┘                                   ▲
//! endpoint IPs ─────────────────────────────────────────┘
//! ```

pub mod bridge;
pub mod naming;
pub mod pipeline;
pub mod recorder;
pub mod update;

pub use bridge::TagIpSetBridge;
pub use naming::IpSetNaming;
pub use pipeline::Pipeline;
pub use recorder::EventRecorder;
pub use update::Update;

pub use memberset_ipsets::{IpSetListener, MembershipEvent};
