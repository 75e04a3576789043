//! # Match Listeners
//!
//! The output seam of the tag index. Anything implementing
//! `MatchListener` can be driven by a `TagIndex`; `MatchCallbacks` adapts a
//! pair of closures and `Vec<MatchEvent<K>>` records events in order.

use memberset_core::Tag;

/// Receives match start/stop notifications from a `TagIndex`.
pub trait MatchListener<K> {
    /// `key` now matches `tag` through at least one profile.
    fn on_match_started(&mut self, key: &K, tag: &Tag);

    /// `key` no longer matches `tag` through any profile.
    fn on_match_stopped(&mut self, key: &K, tag: &Tag);
}

impl<K, L: MatchListener<K> + ?Sized> MatchListener<K> for &mut L {
    fn on_match_started(&mut self, key: &K, tag: &Tag) {
        (**self).on_match_started(key, tag);
    }

    fn on_match_stopped(&mut self, key: &K, tag: &Tag) {
        (**self).on_match_stopped(key, tag);
    }
}

/// A listener built from two closures.
pub struct MatchCallbacks<S, T> {
    on_started: S,
    on_stopped: T,
}

impl<S, T> MatchCallbacks<S, T> {
    pub fn new(on_started: S, on_stopped: T) -> Self {
        Self {
            on_started,
            on_stopped,
        }
    }
}

impl<K, S, T> MatchListener<K> for MatchCallbacks<S, T>
where
    S: FnMut(&K, &Tag),
    T: FnMut(&K, &Tag),
{
    fn on_match_started(&mut self, key: &K, tag: &Tag) {
        (self.on_started)(key, tag);
    }

    fn on_match_stopped(&mut self, key: &K, tag: &Tag) {
        (self.on_stopped)(key, tag);
    }
}

/// A recorded match notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchEvent<K> {
    Started { key: K, tag: Tag },
    Stopped { key: K, tag: Tag },
}

impl<K: Clone> MatchListener<K> for Vec<MatchEvent<K>> {
    fn on_match_started(&mut self, key: &K, tag: &Tag) {
        self.push(MatchEvent::Started {
            key: key.clone(),
            tag: tag.clone(),
        });
    }

    fn on_match_stopped(&mut self, key: &K, tag: &Tag) {
        self.push(MatchEvent::Stopped {
            key: key.clone(),
            tag: tag.clone(),
        });
    }
}
