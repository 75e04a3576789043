//! # Tag Index
//!
//! ## Maintained State
//!
//! - `profile_tags`: profile → tag list, last update verbatim. Absent when
//!   the profile has no tags.
//! - `endpoint_profiles`: endpoint → profile list, last update verbatim.
//!   Absent when the endpoint has no profiles.
//! - `profile_endpoints`: exact inverse of `endpoint_profiles`, used to fan
//!   a profile's tag change out to its endpoints.
//! - `matches`: `(tag, endpoint)` → profiles contributing the match. Present
//!   iff non-empty.
//! - `endpoint_tags`: endpoint → tags it currently matches. Mirrors the keys
//!   of `matches`.
//!
//! A listener fires exactly when a `matches` entry is created or deleted.

use std::collections::HashMap;

use memberset_core::{diff, EndpointKey, MultiMap, ProfileId, SliceDiff, Tag};
use tracing::{debug, trace};

use crate::listener::MatchListener;

/// Key of the main match index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MatchKey<K> {
    tag: Tag,
    key: K,
}

impl<K: Clone> MatchKey<K> {
    fn new(key: &K, tag: &Tag) -> Self {
        Self {
            tag: tag.clone(),
            key: key.clone(),
        }
    }
}

/// Incremental index of `(endpoint, tag)` matches.
#[derive(Debug)]
pub struct TagIndex<K, L> {
    profile_tags: HashMap<ProfileId, Vec<Tag>>,
    endpoint_profiles: HashMap<K, Vec<ProfileId>>,
    profile_endpoints: MultiMap<ProfileId, K>,
    matches: MultiMap<MatchKey<K>, ProfileId>,
    endpoint_tags: MultiMap<K, Tag>,
    listener: L,
}

impl<K: EndpointKey, L: MatchListener<K>> TagIndex<K, L> {
    /// Create an empty index that reports to `listener`.
    pub fn new(listener: L) -> Self {
        Self {
            profile_tags: HashMap::new(),
            endpoint_profiles: HashMap::new(),
            profile_endpoints: MultiMap::new(),
            matches: MultiMap::new(),
            endpoint_tags: MultiMap::new(),
            listener,
        }
    }

    // ─── Updates ─────────────────────────────────────────────────────

    /// Replace the tag list of a profile. An empty list deletes the profile.
    ///
    /// Every endpoint currently referencing the profile gains the added tags
    /// and loses the removed ones. The stored list is replaced even when the
    /// set of tags is unchanged.
    pub fn update_profile_tags(&mut self, profile_id: ProfileId, tags: Vec<Tag>) {
        debug!(profile = %profile_id, ?tags, "updating profile tags");
        let old_tags = self
            .profile_tags
            .get(&profile_id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let SliceDiff { removed, added } = diff(old_tags, &tags);

        for key in self.profile_endpoints.values(&profile_id) {
            for tag in &added {
                Self::add_match(
                    &mut self.matches,
                    &mut self.endpoint_tags,
                    &mut self.listener,
                    key,
                    tag,
                    &profile_id,
                );
            }
            for tag in &removed {
                Self::remove_match(
                    &mut self.matches,
                    &mut self.endpoint_tags,
                    &mut self.listener,
                    key,
                    tag,
                    &profile_id,
                );
            }
        }

        if tags.is_empty() {
            self.profile_tags.remove(&profile_id);
        } else {
            self.profile_tags.insert(profile_id, tags);
        }
    }

    /// Remove all tags from a profile.
    pub fn delete_profile_tags(&mut self, profile_id: ProfileId) {
        self.update_profile_tags(profile_id, Vec::new());
    }

    /// Replace the profile list of an endpoint. An empty list deletes the
    /// endpoint.
    ///
    /// Added profiles are indexed before removed ones are dropped, so a tag
    /// shared by an outgoing and an incoming profile keeps matching
    /// throughout.
    pub fn update_endpoint(&mut self, key: K, profile_ids: Vec<ProfileId>) {
        debug!(endpoint = ?key, profiles = ?profile_ids, "updating endpoint profiles");
        let old_ids = self
            .endpoint_profiles
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let SliceDiff { removed, added } = diff(old_ids, &profile_ids);

        if profile_ids.is_empty() {
            self.endpoint_profiles.remove(&key);
        } else {
            self.endpoint_profiles.insert(key.clone(), profile_ids);
        }

        for id in &added {
            self.profile_endpoints.insert(id.clone(), key.clone());
            for tag in self.profile_tags.get(id).into_iter().flatten() {
                Self::add_match(
                    &mut self.matches,
                    &mut self.endpoint_tags,
                    &mut self.listener,
                    &key,
                    tag,
                    id,
                );
            }
        }

        for id in &removed {
            self.profile_endpoints.remove(id, &key);
            for tag in self.profile_tags.get(id).into_iter().flatten() {
                Self::remove_match(
                    &mut self.matches,
                    &mut self.endpoint_tags,
                    &mut self.listener,
                    &key,
                    tag,
                    id,
                );
            }
        }
    }

    /// Remove an endpoint and all of its matches.
    pub fn delete_endpoint(&mut self, key: K) {
        self.update_endpoint(key, Vec::new());
    }

    fn add_match(
        matches: &mut MultiMap<MatchKey<K>, ProfileId>,
        endpoint_tags: &mut MultiMap<K, Tag>,
        listener: &mut L,
        key: &K,
        tag: &Tag,
        profile_id: &ProfileId,
    ) {
        let match_key = MatchKey::new(key, tag);
        if !matches.contains_key(&match_key) {
            trace!(endpoint = ?key, %tag, via = %profile_id, "match started");
            endpoint_tags.insert(key.clone(), tag.clone());
            listener.on_match_started(key, tag);
        }
        matches.insert(match_key, profile_id.clone());
    }

    fn remove_match(
        matches: &mut MultiMap<MatchKey<K>, ProfileId>,
        endpoint_tags: &mut MultiMap<K, Tag>,
        listener: &mut L,
        key: &K,
        tag: &Tag,
        profile_id: &ProfileId,
    ) {
        let match_key = MatchKey::new(key, tag);
        if !matches.remove(&match_key, profile_id) {
            return;
        }
        if !matches.contains_key(&match_key) {
            // No profile keeps this tag alive any more.
            trace!(endpoint = ?key, %tag, via = %profile_id, "match stopped");
            endpoint_tags.remove(key, tag);
            listener.on_match_stopped(key, tag);
        }
    }
}

impl<K: EndpointKey, L> TagIndex<K, L> {
    // ─── Queries ─────────────────────────────────────────────────────

    /// Current tag list of a profile, as last supplied.
    pub fn profile_tags(&self, profile_id: &ProfileId) -> Option<&[Tag]> {
        self.profile_tags.get(profile_id).map(Vec::as_slice)
    }

    /// Current profile list of an endpoint, as last supplied.
    pub fn endpoint_profiles(&self, key: &K) -> Option<&[ProfileId]> {
        self.endpoint_profiles.get(key).map(Vec::as_slice)
    }

    /// Endpoints currently referencing a profile.
    pub fn endpoints_with_profile<'a>(
        &'a self,
        profile_id: &ProfileId,
    ) -> impl Iterator<Item = &'a K> + 'a {
        self.profile_endpoints.values(profile_id)
    }

    /// Whether `key` currently matches `tag`.
    pub fn is_match(&self, key: &K, tag: &Tag) -> bool {
        self.matches.contains_key(&MatchKey::new(key, tag))
    }

    /// Profiles through which `key` matches `tag`.
    pub fn matching_profiles<'a>(
        &'a self,
        key: &K,
        tag: &Tag,
    ) -> impl Iterator<Item = &'a ProfileId> + 'a {
        self.matches.values(&MatchKey::new(key, tag))
    }

    /// Tags currently matched by `key`.
    pub fn matched_tags<'a>(&'a self, key: &K) -> impl Iterator<Item = &'a Tag> + 'a {
        self.endpoint_tags.values(key)
    }

    /// Number of live `(endpoint, tag)` matches.
    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// True when no profile has tags, no endpoint has profiles and nothing
    /// matches.
    pub fn is_empty(&self) -> bool {
        self.profile_tags.is_empty()
            && self.endpoint_profiles.is_empty()
            && self.profile_endpoints.is_empty()
            && self.matches.is_empty()
            && self.endpoint_tags.is_empty()
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


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::listener::MatchEvent;
    use proptest::prelude::*;
    use std::collections::{HashMap, HashSet};

    #[derive(Debug, Clone)]
    enum Op {
        ProfileTags(u8, Vec<u8>),
        EndpointProfiles(u8, Vec<u8>),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..4, prop::collection::vec(0u8..4, 0..4))
                .prop_map(|(p, t)| Op::ProfileTags(p, t)),
            (0u8..4, prop::collection::vec(0u8..4, 0..4))
                .prop_map(|(e, p)| Op::EndpointProfiles(e, p)),
        ]
    }

    /// Matches recomputed from scratch out of the raw inputs.
    fn expected_matches(
        profile_tags: &HashMap<u8, Vec<u8>>,
        endpoint_profiles: &HashMap<u8, Vec<u8>>,
    ) -> HashSet<(u8, Tag)> {
        let mut out = HashSet::new();
        for (endpoint, ids) in endpoint_profiles {
            for id in ids {
                for tag in profile_tags.get(id).into_iter().flatten() {
                    out.insert((*endpoint, Tag::new(format!("t{tag}"))));
                }
            }
        }
        out
    }

    proptest! {
        /// Events strictly alternate per pair and the live set always equals
        /// the from-scratch computation.
        #[test]
        fn events_alternate_and_track_model(ops in prop::collection::vec(op(), 0..40)) {
            let mut idx: TagIndex<u8, Vec<MatchEvent<u8>>> = TagIndex::new(Vec::new());
            let mut profile_tags: HashMap<u8, Vec<u8>> = HashMap::new();
            let mut endpoint_profiles: HashMap<u8, Vec<u8>> = HashMap::new();
            let mut live: HashSet<(u8, Tag)> = HashSet::new();

            for op in ops {
                match op {
                    Op::ProfileTags(p, t) => {
                        let tag_list = t.iter().map(|t| Tag::new(format!("t{t}"))).collect();
                        idx.update_profile_tags(ProfileId::new(format!("p{p}")), tag_list);
                        profile_tags.insert(p, t);
                    }
                    Op::EndpointProfiles(e, ps) => {
                        let ids = ps.iter().map(|p| ProfileId::new(format!("p{p}"))).collect();
                        idx.update_endpoint(e, ids);
                        endpoint_profiles.insert(e, ps);
                    }
                }

                for event in std::mem::take(idx.listener_mut()) {
                    match event {
                        MatchEvent::Started { key, tag } => {
                            prop_assert!(live.insert((key, tag)), "double start");
                        }
                        MatchEvent::Stopped { key, tag } => {
                            prop_assert!(live.remove(&(key, tag)), "stop without start");
                        }
                    }
                }

                let expected = expected_matches(&profile_tags, &endpoint_profiles);
                prop_assert_eq!(&live, &expected);
                prop_assert_eq!(idx.match_count(), expected.len());
                for (endpoint, tag) in &expected {
                    prop_assert!(idx.matched_tags(endpoint).any(|t| t == tag));
                }
            }
        }

        /// Re-applying the current value of any input fires nothing.
        #[test]
        fn replaying_current_state_is_silent(ops in prop::collection::vec(op(), 0..20)) {
            let mut idx: TagIndex<u8, Vec<MatchEvent<u8>>> = TagIndex::new(Vec::new());
            for op in &ops {
                match op {
                    Op::ProfileTags(p, t) => idx.update_profile_tags(
                        ProfileId::new(format!("p{p}")),
                        t.iter().map(|t| Tag::new(format!("t{t}"))).collect(),
                    ),
                    Op::EndpointProfiles(e, ps) => idx.update_endpoint(
                        *e,
                        ps.iter().map(|p| ProfileId::new(format!("p{p}"))).collect(),
                    ),
                }
            }
            idx.listener_mut().clear();
            for op in &ops {
                match op {
                    Op::ProfileTags(p, _) => {
                        let id = ProfileId::new(format!("p{p}"));
                        let current = idx.profile_tags(&id).map(<[Tag]>::to_vec).unwrap_or_default();
                        idx.update_profile_tags(id, current);
                    }
                    Op::EndpointProfiles(e, _) => {
                        let current = idx.endpoint_profiles(e).map(<[ProfileId]>::to_vec).unwrap_or_default();
                        idx.update_endpoint(*e, current);
                    }
                }
            }
            prop_assert!(idx.listener().is_empty());
        }
    }
}
