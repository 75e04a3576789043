//! # Event Recorder
//!
//! An `IpSetListener` that keeps every membership change in arrival order
//! and counts them through the `metrics` facade. Without an installed
//! metrics recorder the counters are no-ops.

use std::net::IpAddr;

use memberset_core::IpSetId;
use memberset_ipsets::{IpSetListener, MembershipEvent};

#[derive(Debug, Default, Clone)]
pub struct EventRecorder {
    events: Vec<MembershipEvent>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded since the last `take`.
    pub fn events(&self) -> &[MembershipEvent] {
        &self.events
    }

    /// Drain the recorded events.
    pub fn take(&mut self) -> Vec<MembershipEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl IpSetListener for EventRecorder {
    fn on_ip_added(&mut self, ip_set_id: &IpSetId, ip: IpAddr) {
        metrics::counter!("memberset_ip_added_total").increment(1);
        self.events.push(MembershipEvent::IpAdded {
            ip_set: ip_set_id.clone(),
            ip,
        });
    }

    fn on_ip_removed(&mut self, ip_set_id: &IpSetId, ip: IpAddr) {
        metrics::counter!("memberset_ip_removed_total").increment(1);
        self.events.push(MembershipEvent::IpRemoved {
            ip_set: ip_set_id.clone(),
            ip,
        });
    }
}
