//! # Endpoint Keys
//!
//! The indices never look inside an endpoint key; they only need equality,
//! hashing, cloning and a debug rendering for logs. `EndpointKey` captures
//! that bound and is implemented for every type that satisfies it.
//!
//! `EndpointId` is the concrete key used by drivers: either a workload
//! endpoint (an interface of a container or VM) or a host endpoint (an
//! interface of the host itself).

use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Bound required of endpoint keys by the indices.
pub trait EndpointKey: Eq + Hash + Clone + Debug {}

impl<T: Eq + Hash + Clone + Debug> EndpointKey for T {}

/// Identity of a workload or host network endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EndpointId {
    /// An interface belonging to an orchestrated workload.
    Workload {
        /// Host the workload runs on.
        hostname: String,
        /// Orchestrator that owns the workload (e.g. "k8s").
        orchestrator: String,
        /// Workload identifier within the orchestrator.
        workload: String,
        /// Endpoint (interface) identifier within the workload.
        endpoint: String,
    },
    /// An interface of the host itself.
    Host {
        /// Host owning the interface.
        hostname: String,
        /// Endpoint (interface) identifier on the host.
        endpoint: String,
    },
}

impl EndpointId {
    /// Construct a workload endpoint key.
    pub fn workload(
        hostname: impl Into<String>,
        orchestrator: impl Into<String>,
        workload: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self::Workload {
            hostname: hostname.into(),
            orchestrator: orchestrator.into(),
            workload: workload.into(),
            endpoint: endpoint.into(),
        }
    }

    /// Construct a host endpoint key.
    pub fn host(hostname: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self::Host {
            hostname: hostname.into(),
            endpoint: endpoint.into(),
        }
    }

    /// The host this endpoint lives on.
    pub fn hostname(&self) -> &str {
        match self {
            Self::Workload { hostname, .. } | Self::Host { hostname, .. } => hostname,
        }
    }
}

impl std::fmt::Display for EndpointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Workload {
                hostname,
                orchestrator,
                workload,
                endpoint,
            } => write!(f, "workload:{hostname}/{orchestrator}/{workload}/{endpoint}"),
            Self::Host { hostname, endpoint } => write!(f, "host:{hostname}/{endpoint}"),
        }
    }
}
