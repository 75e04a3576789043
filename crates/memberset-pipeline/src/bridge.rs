//! # Tag Index → Calculator Bridge
//!
//! A `MatchListener` that owns the IP-set calculator and forwards each
//! match start/stop to it inline, translating the tag through
//! `IpSetNaming`.

use memberset_core::{EndpointKey, Tag};
use memberset_ipsets::{IpSetCalculator, IpSetListener};
use memberset_tags::MatchListener;

use crate::naming::IpSetNaming;

#[derive(Debug)]
pub struct TagIpSetBridge<K, L> {
    naming: IpSetNaming,
    calculator: IpSetCalculator<K, L>,
}

impl<K: EndpointKey, L: IpSetListener> TagIpSetBridge<K, L> {
    pub fn new(naming: IpSetNaming, calculator: IpSetCalculator<K, L>) -> Self {
        Self { naming, calculator }
    }
}

impl<K, L> TagIpSetBridge<K, L> {
    pub fn naming(&self) -> &IpSetNaming {
        &self.naming
    }

    pub fn calculator(&self) -> &IpSetCalculator<K, L> {
        &self.calculator
    }

    pub fn calculator_mut(&mut self) -> &mut IpSetCalculator<K, L> {
        &mut self.calculator
    }

    pub fn into_calculator(self) -> IpSetCalculator<K, L> {
        self.calculator
    }
}

impl<K: EndpointKey, L: IpSetListener> MatchListener<K> for TagIpSetBridge<K, L> {
    fn on_match_started(&mut self, key: &K, tag: &Tag) {
        let ip_set_id = self.naming.ip_set_for(tag);
        self.calculator.match_started(key, &ip_set_id);
    }

    fn on_match_stopped(&mut self, key: &K, tag: &Tag) {
        let ip_set_id = self.naming.ip_set_for(tag);
        self.calculator.match_stopped(key, &ip_set_id);
    }
}
