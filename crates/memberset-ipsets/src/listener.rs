//! # IP-Set Listeners
//!
//! Output seam of the calculator. `IpSetCallbacks` adapts closures and
//! `Vec<MembershipEvent>` records events in order.

use std::net::IpAddr;

use memberset_core::IpSetId;
use serde::{Deserialize, Serialize};

/// Receives IP set membership changes from an `IpSetCalculator`.
pub trait IpSetListener {
    /// `ip` joined `ip_set_id`.
    fn on_ip_added(&mut self, ip_set_id: &IpSetId, ip: IpAddr);

    /// `ip` left `ip_set_id`.
    fn on_ip_removed(&mut self, ip_set_id: &IpSetId, ip: IpAddr);
}

impl<L: IpSetListener + ?Sized> IpSetListener for &mut L {
    fn on_ip_added(&mut self, ip_set_id: &IpSetId, ip: IpAddr) {
        (**self).on_ip_added(ip_set_id, ip);
    }

    fn on_ip_removed(&mut self, ip_set_id: &IpSetId, ip: IpAddr) {
        (**self).on_ip_removed(ip_set_id, ip);
    }
}

/// A listener built from two closures.
pub struct IpSetCallbacks<A, R> {
    on_added: A,
    on_removed: R,
}

impl<A, R> IpSetCallbacks<A, R>
where
    A: FnMut(&IpSetId, IpAddr),
    R: FnMut(&IpSetId, IpAddr),
{
    pub fn new(on_added: A, on_removed: R) -> Self {
        Self {
            on_added,
            on_removed,
        }
    }
}

impl<A, R> IpSetListener for IpSetCallbacks<A, R>
where
    A: FnMut(&IpSetId, IpAddr),
    R: FnMut(&IpSetId, IpAddr),
{
    fn on_ip_added(&mut self, ip_set_id: &IpSetId, ip: IpAddr) {
        (self.on_added)(ip_set_id, ip);
    }

    fn on_ip_removed(&mut self, ip_set_id: &IpSetId, ip: IpAddr) {
        (self.on_removed)(ip_set_id, ip);
    }
}

/// A single IP set membership change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MembershipEvent {
    /// `ip` joined `ip_set`.
    IpAdded { ip_set: IpSetId, ip: IpAddr },
    /// `ip` left `ip_set`.
    IpRemoved { ip_set: IpSetId, ip: IpAddr },
}

impl MembershipEvent {
    pub fn ip_set(&self) -> &IpSetId {
        match self {
            Self::IpAdded { ip_set, .. } | Self::IpRemoved { ip_set, .. } => ip_set,
        }
    }

    pub fn ip(&self) -> IpAddr {
        match self {
            Self::IpAdded { ip, .. } | Self::IpRemoved { ip, .. } => *ip,
        }
    }
}

impl std::fmt::Display for MembershipEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IpAdded { ip_set, ip } => write!(f, "+ {ip_set} {ip}"),
            Self::IpRemoved { ip_set, ip } => write!(f, "- {ip_set} {ip}"),
        }
    }
}

impl IpSetListener for Vec<MembershipEvent> {
    fn on_ip_added(&mut self, ip_set_id: &IpSetId, ip: IpAddr) {
        self.push(MembershipEvent::IpAdded {
            ip_set: ip_set_id.clone(),
            ip,
        });
    }

    fn on_ip_removed(&mut self, ip_set_id: &IpSetId, ip: IpAddr) {
        self.push(MembershipEvent::IpRemoved {
            ip_set: ip_set_id.clone(),
            ip,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_shape() {
        let event = MembershipEvent::IpAdded {
            ip_set: IpSetId::new("red"),
            ip: "10.0.0.1".parse().unwrap(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"kind":"ip_added","ip_set":"red","ip":"10.0.0.1"}"#);
        let parsed: MembershipEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_event_display() {
        let event = MembershipEvent::IpRemoved {
            ip_set: IpSetId::new("blue"),
            ip: "fd00::1".parse().unwrap(),
        };
        assert_eq!(event.to_string(), "- blue fd00::1");
        assert_eq!(event.ip_set().as_str(), "blue");
    }

    #[test]
    fn test_callbacks_adapter() {
        let mut added = Vec::new();
        {
            let mut listener = IpSetCallbacks::new(
                |id: &IpSetId, ip: IpAddr| added.push((id.clone(), ip)),
                |_: &IpSetId, _: IpAddr| {},
            );
            listener.on_ip_added(&IpSetId::new("s"), "10.0.0.9".parse().unwrap());
            listener.on_ip_removed(&IpSetId::new("s"), "10.0.0.9".parse().unwrap());
        }
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].0, IpSetId::new("s"));
    }
}
