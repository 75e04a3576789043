//! # Update Records
//!
//! Serializable form of every pipeline input, so update streams can be
//! captured and replayed. One JSON object per update:
//!
//! ```json
//! {"op":"profile_tags","profile":"p1","tags":["red"]}
//! {"op":"endpoint_profiles","endpoint":{"kind":"host","hostname":"h1","endpoint":"eth0"},"profiles":["p1"]}
//! {"op":"endpoint_ips","endpoint":{"kind":"host","hostname":"h1","endpoint":"eth0"},"ips":["10.0.0.1"]}
//! ```

use std::net::IpAddr;

use memberset_core::{ProfileId, Tag};
use serde::{Deserialize, Serialize};

/// One input to a `Pipeline`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Update<K> {
    /// Replace a profile's tags.
    ProfileTags {
        profile: ProfileId,
        #[serde(default)]
        tags: Vec<Tag>,
    },
    /// Remove all of a profile's tags.
    DeleteProfileTags { profile: ProfileId },
    /// Replace an endpoint's profiles.
    EndpointProfiles {
        endpoint: K,
        #[serde(default)]
        profiles: Vec<ProfileId>,
    },
    /// Replace an endpoint's IP addresses.
    EndpointIps {
        endpoint: K,
        #[serde(default)]
        ips: Vec<IpAddr>,
    },
    /// Remove an endpoint from both indices.
    DeleteEndpoint { endpoint: K },
}

impl<K> Update<K> {
    /// Short operation name, matching the serialized `op` field.
    pub fn op_name(&self) -> &'static str {
        match self {
            Self::ProfileTags { .. } => "profile_tags",
            Self::DeleteProfileTags { .. } => "delete_profile_tags",
            Self::EndpointProfiles { .. } => "endpoint_profiles",
            Self::EndpointIps { .. } => "endpoint_ips",
            Self::DeleteEndpoint { .. } => "delete_endpoint",
        }
    }
}
