//! # Pipeline
//!
//! Owns a `TagIndex` whose listener is a `TagIpSetBridge` around an
//! `IpSetCalculator`. All inputs go through here; all output reaches the
//! caller-supplied `IpSetListener`.

use std::net::IpAddr;

use memberset_core::{EndpointKey, IpSetId, PipelineConfig, ProfileId, Tag};
use memberset_ipsets::{IpSetCalculator, IpSetListener};
use memberset_tags::TagIndex;
use tracing::debug;

use crate::bridge::TagIpSetBridge;
use crate::naming::IpSetNaming;
use crate::update::Update;

/// Tag index feeding an IP-set calculator.
#[derive(Debug)]
pub struct Pipeline<K, L> {
    tags: TagIndex<K, TagIpSetBridge<K, L>>,
}

impl<K: EndpointKey, L: IpSetListener> Pipeline<K, L> {
    /// Pipeline naming each IP set exactly after its tag.
    pub fn new(listener: L) -> Self {
        Self::with_naming(IpSetNaming::default(), listener)
    }

    pub fn with_naming(naming: IpSetNaming, listener: L) -> Self {
        let bridge = TagIpSetBridge::new(naming, IpSetCalculator::new(listener));
        Self {
            tags: TagIndex::new(bridge),
        }
    }

    pub fn from_config(config: &PipelineConfig, listener: L) -> Self {
        Self::with_naming(IpSetNaming::from_config(config), listener)
    }

    pub fn update_profile_tags(&mut self, profile_id: ProfileId, tags: Vec<Tag>) {
        self.tags.update_profile_tags(profile_id, tags);
    }

    pub fn delete_profile_tags(&mut self, profile_id: ProfileId) {
        self.tags.delete_profile_tags(profile_id);
    }

    pub fn update_endpoint_profiles(&mut self, key: K, profile_ids: Vec<ProfileId>) {
        self.tags.update_endpoint(key, profile_ids);
    }

    pub fn update_endpoint_ips(&mut self, key: K, ips: Vec<IpAddr>) {
        self.calculator_mut().update_endpoint_ips(key, ips);
    }

    /// Remove an endpoint from both indices.
    ///
    /// The tag index goes first, so every match stop (and the IP removals it
    /// causes) is delivered before the endpoint's addresses are dropped.
    pub fn delete_endpoint(&mut self, key: K) {
        debug!(endpoint = ?key, "deleting endpoint");
        self.tags.delete_endpoint(key.clone());
        self.calculator_mut().delete_endpoint(key);
    }

    /// Apply a recorded update.
    pub fn apply(&mut self, update: Update<K>) {
        match update {
            Update::ProfileTags { profile, tags } => self.update_profile_tags(profile, tags),
            Update::DeleteProfileTags { profile } => self.delete_profile_tags(profile),
            Update::EndpointProfiles { endpoint, profiles } => {
                self.update_endpoint_profiles(endpoint, profiles)
            }
            Update::EndpointIps { endpoint, ips } => self.update_endpoint_ips(endpoint, ips),
            Update::DeleteEndpoint { endpoint } => self.delete_endpoint(endpoint),
        }
    }

    pub fn listener_mut(&mut self) -> &mut L {
        self.calculator_mut().listener_mut()
    }

    fn calculator_mut(&mut self) -> &mut IpSetCalculator<K, L> {
        self.tags.listener_mut().calculator_mut()
    }
}

impl<K: EndpointKey, L> Pipeline<K, L> {
    /// The IP set a tag's members are published to.
    pub fn ip_set_for(&self, tag: &Tag) -> IpSetId {
        self.tags.listener().naming().ip_set_for(tag)
    }

    /// Current members of an IP set.
    pub fn members<'a>(&'a self, ip_set_id: &IpSetId) -> impl Iterator<Item = &'a IpAddr> + 'a {
        self.calculator().members(ip_set_id)
    }

    pub fn tag_index(&self) -> &TagIndex<K, TagIpSetBridge<K, L>> {
        &self.tags
    }

    pub fn calculator(&self) -> &IpSetCalculator<K, L> {
        self.tags.listener().calculator()
    }

    pub fn listener(&self) -> &L {
        self.calculator().listener()
    }

    pub fn into_listener(self) -> L {
        self.tags.into_listener().into_calculator().into_listener()
    }

    /// True when neither index holds any state.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.calculator().is_empty()
    }
}
