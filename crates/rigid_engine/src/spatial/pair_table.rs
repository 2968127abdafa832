//! Active-pair bookkeeping for the broadphase
//!
//! The pair table is a set: pair identity is canonical (low proxy first),
//! so self-pairs and duplicates are structurally impossible. Transitions
//! accumulate between ticks and are flushed as an ordered event stream.

use std::collections::BTreeSet;

use super::sweep_prune::ProxyId;

/// Canonical unordered pair of broadphase proxies (low handle stored first)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProxyPair {
    first: ProxyId,
    second: ProxyId,
}

impl ProxyPair {
    /// Create a canonical pair; the two proxies must be distinct
    pub fn new(a: ProxyId, b: ProxyId) -> Self {
        debug_assert_ne!(a, b, "self-pairs are not representable");
        if a < b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    /// Lower proxy handle of the pair
    pub fn first(&self) -> ProxyId {
        self.first
    }

    /// Higher proxy handle of the pair
    pub fn second(&self) -> ProxyId {
        self.second
    }

    /// Whether either side of the pair is `proxy`
    pub fn involves(&self, proxy: ProxyId) -> bool {
        self.first == proxy || self.second == proxy
    }
}

/// Pair transition emitted by the broadphase tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairEvent {
    /// The pair began overlapping this tick
    Started(ProxyPair),
    /// The pair is overlapping (emitted once per active pair per tick,
    /// including the tick it starts)
    Updated(ProxyPair),
    /// The pair stopped overlapping this tick
    Stopped(ProxyPair),
}

/// Set of currently-overlapping proxy pairs plus pending transitions
///
/// Ordered sets keep event emission deterministic for a fixed sequence of
/// operations, which the simulation relies on for reproducible resolution
/// order.
#[derive(Debug, Default)]
pub(crate) struct PairTable {
    active: BTreeSet<ProxyPair>,
    began: BTreeSet<ProxyPair>,
    ended: BTreeSet<ProxyPair>,
}

impl PairTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record that a pair's padded intervals now overlap on all axes
    pub(crate) fn add(&mut self, pair: ProxyPair) {
        if self.active.insert(pair) {
            // A pair removed and re-added within one tick never stopped
            // from the observer's point of view.
            if !self.ended.remove(&pair) {
                self.began.insert(pair);
            }
        }
    }

    /// Record that a pair's padded intervals stopped overlapping
    pub(crate) fn remove(&mut self, pair: ProxyPair) {
        if self.active.remove(&pair) {
            if !self.began.remove(&pair) {
                self.ended.insert(pair);
            }
        }
    }

    /// Drop every pair involving `proxy` (used when a proxy is removed)
    pub(crate) fn remove_proxy(&mut self, proxy: ProxyId) {
        let doomed: Vec<ProxyPair> = self
            .active
            .iter()
            .copied()
            .filter(|pair| pair.involves(proxy))
            .collect();
        for pair in doomed {
            self.remove(pair);
        }
    }

    /// Emit this tick's transitions: starts, then one update per active
    /// pair, then stops
    pub(crate) fn flush(&mut self, events: &mut Vec<PairEvent>) {
        for pair in std::mem::take(&mut self.began) {
            events.push(PairEvent::Started(pair));
        }
        for pair in &self.active {
            events.push(PairEvent::Updated(*pair));
        }
        for pair in std::mem::take(&mut self.ended) {
            events.push(PairEvent::Stopped(pair));
        }
    }

    pub(crate) fn contains(&self, pair: ProxyPair) -> bool {
        self.active.contains(&pair)
    }

    pub(crate) fn len(&self) -> usize {
        self.active.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(a: u16, b: u16) -> ProxyPair {
        ProxyPair::new(ProxyId::from_slot(a), ProxyId::from_slot(b))
    }

    #[test]
    fn test_pair_is_canonical() {
        assert_eq!(pair(3, 7), pair(7, 3));
    }

    #[test]
    fn test_add_then_flush_emits_started_and_updated() {
        let mut table = PairTable::new();
        table.add(pair(0, 1));

        let mut events = Vec::new();
        table.flush(&mut events);
        assert_eq!(
            events,
            vec![
                PairEvent::Started(pair(0, 1)),
                PairEvent::Updated(pair(0, 1)),
            ]
        );

        // Next tick the pair is only updated.
        events.clear();
        table.flush(&mut events);
        assert_eq!(events, vec![PairEvent::Updated(pair(0, 1))]);
    }

    #[test]
    fn test_remove_within_same_tick_cancels_start() {
        let mut table = PairTable::new();
        table.add(pair(0, 1));
        table.remove(pair(0, 1));

        let mut events = Vec::new();
        table.flush(&mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn test_readd_within_same_tick_cancels_stop() {
        let mut table = PairTable::new();
        table.add(pair(0, 1));
        let mut events = Vec::new();
        table.flush(&mut events);
        events.clear();

        table.remove(pair(0, 1));
        table.add(pair(0, 1));
        table.flush(&mut events);
        assert_eq!(events, vec![PairEvent::Updated(pair(0, 1))]);
    }

    #[test]
    fn test_remove_proxy_stops_all_pairs() {
        let mut table = PairTable::new();
        table.add(pair(0, 1));
        table.add(pair(0, 2));
        table.add(pair(1, 2));
        let mut events = Vec::new();
        table.flush(&mut events);

        table.remove_proxy(ProxyId::from_slot(0));
        events.clear();
        table.flush(&mut events);
        assert_eq!(
            events,
            vec![
                PairEvent::Updated(pair(1, 2)),
                PairEvent::Stopped(pair(0, 1)),
                PairEvent::Stopped(pair(0, 2)),
            ]
        );
    }
}
