//! # IP-Set Calculator
//!
//! ## Maintained State
//!
//! - `endpoint_ips`: endpoint → IP list, last update verbatim. Absent when
//!   the endpoint has no IPs.
//! - `endpoint_ip_sets`: endpoint → IP sets it contributes to, driven only
//!   by `match_started` / `match_stopped`.
//! - `ip_set_members`: IP set → (IP → contributing endpoints). An IP entry
//!   exists iff it has a contributor; a set entry exists iff it tracks at
//!   least one IP.

use std::collections::HashMap;
use std::net::IpAddr;

use indexmap::IndexMap;
use memberset_core::{diff, EndpointKey, IpSetId, MultiMap, SliceDiff};
use tracing::{debug, trace};

use crate::listener::IpSetListener;

type IpToEndpoints<K> = MultiMap<IpAddr, K>;

/// Incremental calculator of IP set membership.
#[derive(Debug)]
pub struct IpSetCalculator<K, L> {
    endpoint_ips: HashMap<K, Vec<IpAddr>>,
    endpoint_ip_sets: MultiMap<K, IpSetId>,
    ip_set_members: IndexMap<IpSetId, IpToEndpoints<K>>,
    listener: L,
}

impl<K: EndpointKey, L: IpSetListener> IpSetCalculator<K, L> {
    /// Create an empty calculator that reports to `listener`.
    pub fn new(listener: L) -> Self {
        Self {
            endpoint_ips: HashMap::new(),
            endpoint_ip_sets: MultiMap::new(),
            ip_set_members: IndexMap::new(),
            listener,
        }
    }

    // ─── Updates ─────────────────────────────────────────────────────

    /// Record that `key` now contributes to `ip_set_id`.
    ///
    /// Every IP the endpoint holds is added to the set. Repeating a start for
    /// a pair that is already recorded changes nothing.
    pub fn match_started(&mut self, key: &K, ip_set_id: &IpSetId) {
        if !self.endpoint_ip_sets.insert(key.clone(), ip_set_id.clone()) {
            debug!(endpoint = ?key, ip_set = %ip_set_id, "endpoint already in IP set");
            return;
        }
        debug!(endpoint = ?key, ip_set = %ip_set_id, "adding endpoint to IP set");
        let ips = self
            .endpoint_ips
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or_default();
        Self::add_ips(&mut self.ip_set_members, &mut self.listener, ip_set_id, key, ips);
    }

    /// Record that `key` no longer contributes to `ip_set_id`.
    ///
    /// Stopping a pair that was never started changes nothing.
    pub fn match_stopped(&mut self, key: &K, ip_set_id: &IpSetId) {
        if !self.endpoint_ip_sets.remove(key, ip_set_id) {
            debug!(endpoint = ?key, ip_set = %ip_set_id, "endpoint was not in IP set");
            return;
        }
        debug!(endpoint = ?key, ip_set = %ip_set_id, "removing endpoint from IP set");
        let ips = self
            .endpoint_ips
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or_default();
        Self::remove_ips(&mut self.ip_set_members, &mut self.listener, ip_set_id, key, ips);
    }

    /// Replace the IP list of an endpoint. An empty list deletes it.
    pub fn update_endpoint_ips(&mut self, key: K, ips: Vec<IpAddr>) {
        debug!(endpoint = ?key, ?ips, "endpoint IPs updated");
        let old_ips = self
            .endpoint_ips
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let SliceDiff { removed, added } = diff(old_ips, &ips);
        if !removed.is_empty() || !added.is_empty() {
            trace!(endpoint = ?key, ?added, ?removed, "endpoint IP delta");
        }

        if ips.is_empty() {
            self.endpoint_ips.remove(&key);
        } else {
            self.endpoint_ips.insert(key.clone(), ips);
        }

        for ip_set_id in self.endpoint_ip_sets.values(&key) {
            Self::add_ips(&mut self.ip_set_members, &mut self.listener, ip_set_id, &key, &added);
            Self::remove_ips(&mut self.ip_set_members, &mut self.listener, ip_set_id, &key, &removed);
        }
    }

    /// Remove all IPs of an endpoint.
    pub fn delete_endpoint(&mut self, key: K) {
        self.update_endpoint_ips(key, Vec::new());
    }

    fn add_ips(
        members: &mut IndexMap<IpSetId, IpToEndpoints<K>>,
        listener: &mut L,
        ip_set_id: &IpSetId,
        key: &K,
        ips: &[IpAddr],
    ) {
        if ips.is_empty() {
            return;
        }
        trace!(ip_set = %ip_set_id, ?ips, via = ?key, "IP set now matches IPs");
        let ip_to_keys = members.entry(ip_set_id.clone()).or_default();
        for ip in ips {
            if !ip_to_keys.contains_key(ip) {
                trace!(ip_set = %ip_set_id, %ip, "new IP in IP set");
                listener.on_ip_added(ip_set_id, *ip);
            }
            ip_to_keys.insert(*ip, key.clone());
        }
    }

    fn remove_ips(
        members: &mut IndexMap<IpSetId, IpToEndpoints<K>>,
        listener: &mut L,
        ip_set_id: &IpSetId,
        key: &K,
        ips: &[IpAddr],
    ) {
        if ips.is_empty() {
            return;
        }
        trace!(ip_set = %ip_set_id, ?ips, via = ?key, "IP set no longer matches IPs");
        let Some(ip_to_keys) = members.get_mut(ip_set_id) else {
            return;
        };
        for ip in ips {
            if !ip_to_keys.remove(ip, key) {
                continue;
            }
            if !ip_to_keys.contains_key(ip) {
                trace!(ip_set = %ip_set_id, %ip, "IP no longer in IP set");
                listener.on_ip_removed(ip_set_id, *ip);
            }
        }
        if ip_to_keys.is_empty() {
            members.swap_remove(ip_set_id);
        }
    }
}

impl<K: EndpointKey, L> IpSetCalculator<K, L> {
    // ─── Queries ─────────────────────────────────────────────────────

    /// Current IP list of an endpoint, as last supplied.
    pub fn endpoint_ips(&self, key: &K) -> Option<&[IpAddr]> {
        self.endpoint_ips.get(key).map(Vec::as_slice)
    }

    /// IP sets the endpoint currently contributes to.
    pub fn ip_sets_for<'a>(&'a self, key: &K) -> impl Iterator<Item = &'a IpSetId> + 'a {
        self.endpoint_ip_sets.values(key)
    }

    /// IP sets with at least one member.
    pub fn ip_sets(&self) -> impl Iterator<Item = &IpSetId> {
        self.ip_set_members.keys()
    }

    /// Current members of an IP set.
    pub fn members<'a>(&'a self, ip_set_id: &IpSetId) -> impl Iterator<Item = &'a IpAddr> + 'a {
        self.ip_set_members
            .get(ip_set_id)
            .into_iter()
            .flat_map(|ip_to_keys| ip_to_keys.keys())
    }

    /// Whether `ip` is currently in `ip_set_id`.
    pub fn contains(&self, ip_set_id: &IpSetId, ip: &IpAddr) -> bool {
        self.ip_set_members
            .get(ip_set_id)
            .map_or(false, |ip_to_keys| ip_to_keys.contains_key(ip))
    }

    /// Endpoints keeping `ip` in `ip_set_id`.
    pub fn contributors<'a>(
        &'a self,
        ip_set_id: &IpSetId,
        ip: IpAddr,
    ) -> impl Iterator<Item = &'a K> + 'a {
        self.ip_set_members
            .get(ip_set_id)
            .into_iter()
            .flat_map(move |ip_to_keys| ip_to_keys.values(&ip))
    }

    /// True when no endpoint has IPs, no endpoint contributes to a set and
    /// no set has members.
    pub fn is_empty(&self) -> bool {
        self.endpoint_ips.is_empty()
            && self.endpoint_ip_sets.is_empty()
            && self.ip_set_members.is_empty()
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    pub fn into_listener(self) -> L {
        self.listener
    }
}
