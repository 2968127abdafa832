//! Incremental sweep-and-prune broadphase
//!
//! Maintains, per axis, a sorted array of padded-interval endpoints and
//! repositions endpoints one swap at a time when a proxy moves. Because
//! motion between sub-steps is small, each endpoint travels O(1) positions
//! on average, so a full update pass costs amortized O(n) instead of the
//! O(n log n) of re-sorting from scratch. Pair transitions are detected
//! during the swaps themselves: moving an endpoint across another proxy's
//! opposite endpoint is the moment an axis overlap can start or stop, and
//! every such crossing re-tests the full three-axis box overlap.
//!
//! Boundary convention: exactly touching intervals are separated. At equal
//! keys a max endpoint orders before a min endpoint, which keeps the sorted
//! arrays consistent with the strict overlap predicate of [`AABB`].

use thiserror::Error;

use crate::foundation::math::Vec3;
use crate::physics::collision_layers::{should_collide, CollisionLayers};

use super::bounds::AABB;
use super::endpoint::{EndPoint, SortableKey, SENTINEL_OWNER};
use super::pair_table::{PairEvent, PairTable, ProxyPair};

/// Handle to a proxy tracked by the broadphase
///
/// Handles live in a 16-bit slot space; one slot is reserved for the
/// sentinel endpoints, leaving 65535 usable proxies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProxyId(u16);

impl ProxyId {
    pub(crate) fn from_slot(slot: u16) -> Self {
        Self(slot)
    }

    pub(crate) fn slot(self) -> usize {
        usize::from(self.0)
    }
}

/// Errors reported by the broadphase
#[derive(Debug, Error)]
pub enum BroadphaseError {
    /// Every slot of the 16-bit handle space is in use
    #[error("broadphase handle pool exhausted ({0} proxies in use)")]
    HandlePoolExhausted(usize),
}

/// Per-proxy bookkeeping: filter masks, padded box, and the position of its
/// six endpoints in the axis arrays
#[derive(Debug, Clone)]
struct ProxyRecord {
    layers: CollisionLayers,
    mask: CollisionLayers,
    padded: AABB,
    min_index: [usize; 3],
    max_index: [usize; 3],
    live: bool,
    pending_removal: bool,
}

/// Sweep-and-prune spatial pair tracker
///
/// Owns three sorted endpoint arrays (one per axis), the proxy records, and
/// the active pair table. All state is instance-local; there is no shared
/// or global broadphase table.
#[derive(Debug)]
pub struct SweepAndPrune {
    axes: [Vec<EndPoint>; 3],
    proxies: Vec<ProxyRecord>,
    free_slots: Vec<u16>,
    pending_removal: Vec<ProxyId>,
    pairs: PairTable,
    margin: f32,
    unit_meter: f32,
}

fn masks_compatible(a: &ProxyRecord, b: &ProxyRecord) -> bool {
    should_collide(a.layers, a.mask, b.layers, b.mask)
}

impl SweepAndPrune {
    /// Create an empty broadphase with the given collision-boundary margin
    ///
    /// The margin (scaled by the unit-meter factor) pads every box before it
    /// is inserted, so small motion does not churn the pair table.
    pub fn new(margin: f32) -> Self {
        let sentinel_axis = || vec![EndPoint::sentinel_min(), EndPoint::sentinel_max()];
        Self {
            axes: [sentinel_axis(), sentinel_axis(), sentinel_axis()],
            proxies: Vec::new(),
            free_slots: Vec::new(),
            pending_removal: Vec::new(),
            pairs: PairTable::new(),
            margin,
            unit_meter: 1.0,
        }
    }

    /// Rescale the collision-boundary padding
    ///
    /// Takes effect on the next `update` of each proxy.
    pub fn set_unit_meter(&mut self, unit_meter: f32) {
        self.unit_meter = unit_meter;
    }

    /// Track a new box; returns its proxy handle
    ///
    /// The box is padded, its endpoints are appended just before the
    /// trailing sentinel of each axis, then walked into sorted position,
    /// establishing any pairs it overlaps.
    pub fn add(
        &mut self,
        layers: CollisionLayers,
        mask: CollisionLayers,
        aabb: &AABB,
    ) -> Result<ProxyId, BroadphaseError> {
        let slot = if let Some(slot) = self.free_slots.pop() {
            slot
        } else if self.proxies.len() < usize::from(SENTINEL_OWNER) {
            let slot = self.proxies.len() as u16;
            self.proxies.push(ProxyRecord {
                layers: CollisionLayers::empty(),
                mask: CollisionLayers::empty(),
                padded: AABB::from_center_extents(Vec3::zeros(), Vec3::zeros()),
                min_index: [0; 3],
                max_index: [0; 3],
                live: false,
                pending_removal: false,
            });
            slot
        } else {
            log::warn!("broadphase handle pool exhausted");
            return Err(BroadphaseError::HandlePoolExhausted(self.proxies.len()));
        };

        let padded = aabb.expanded(self.margin * self.unit_meter);
        {
            let record = &mut self.proxies[usize::from(slot)];
            record.layers = layers;
            record.mask = mask;
            record.padded = padded;
            record.live = true;
            record.pending_removal = false;
        }

        // Append both endpoints immediately before the trailing sentinel.
        for axis in 0..3 {
            let insert_at = self.axes[axis].len() - 1;
            self.axes[axis].insert(
                insert_at,
                EndPoint {
                    key: SortableKey::UNSORTED,
                    owner: slot,
                    is_max: false,
                },
            );
            self.axes[axis].insert(
                insert_at + 1,
                EndPoint {
                    key: SortableKey::UNSORTED,
                    owner: slot,
                    is_max: true,
                },
            );
            let record = &mut self.proxies[usize::from(slot)];
            record.min_index[axis] = insert_at;
            record.max_index[axis] = insert_at + 1;
        }

        self.apply_bounds(usize::from(slot), &padded);
        Ok(ProxyId(slot))
    }

    /// Reposition a proxy's padded box
    ///
    /// Silently ignored for proxies pending removal: they are about to
    /// disappear at the next tick.
    pub fn update(&mut self, proxy: ProxyId, aabb: &AABB) {
        let Some(record) = self.proxies.get(proxy.slot()) else {
            return;
        };
        if !record.live || record.pending_removal {
            return;
        }
        let padded = aabb.expanded(self.margin * self.unit_meter);
        self.proxies[proxy.slot()].padded = padded;
        self.apply_bounds(proxy.slot(), &padded);
    }

    /// Mark a proxy for removal
    ///
    /// Removal is deferred: the next [`tick`](Self::tick) flushes the
    /// proxy's pairs, then compacts the endpoint arrays in one pass per
    /// axis instead of splicing immediately (which would shift indices on
    /// every call).
    pub fn remove(&mut self, proxy: ProxyId) {
        let Some(record) = self.proxies.get_mut(proxy.slot()) else {
            return;
        };
        if !record.live || record.pending_removal {
            return;
        }
        record.pending_removal = true;
        self.pending_removal.push(proxy);
    }

    /// Drive the per-frame lifecycle
    ///
    /// Flushes pending pair removals for proxies marked for removal, emits
    /// the tick's pair transitions into `events`, then physically compacts
    /// the endpoint arrays and frees the removed slots.
    pub fn tick(&mut self, events: &mut Vec<PairEvent>) {
        let pending = std::mem::take(&mut self.pending_removal);
        for proxy in &pending {
            self.pairs.remove_proxy(*proxy);
        }

        self.pairs.flush(events);

        if pending.is_empty() {
            return;
        }
        for axis in 0..3 {
            let proxies = &self.proxies;
            self.axes[axis].retain(|endpoint| {
                endpoint.owner == SENTINEL_OWNER
                    || !proxies[usize::from(endpoint.owner)].pending_removal
            });
            for index in 0..self.axes[axis].len() {
                self.fix_endpoint_index(axis, index);
            }
        }
        for proxy in pending {
            let record = &mut self.proxies[proxy.slot()];
            record.live = false;
            record.pending_removal = false;
            self.free_slots.push(proxy.slot() as u16);
        }
    }

    /// Number of currently-overlapping pairs
    pub fn active_pair_count(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the pair (a, b) is currently active
    pub fn contains_pair(&self, a: ProxyId, b: ProxyId) -> bool {
        self.pairs.contains(ProxyPair::new(a, b))
    }

    /// Current padded box of a live proxy
    pub fn padded_bounds(&self, proxy: ProxyId) -> Option<AABB> {
        let record = self.proxies.get(proxy.slot())?;
        record.live.then_some(record.padded)
    }

    /// Sortedness invariant of all three endpoint arrays (test support)
    pub(crate) fn axes_sorted(&self) -> bool {
        self.axes.iter().all(|axis| {
            axis.windows(2).all(|pair| pair[0].rank() <= pair[1].rank())
        })
    }

    fn apply_bounds(&mut self, slot: usize, padded: &AABB) {
        let min_values = [padded.min.x, padded.min.y, padded.min.z];
        let max_values = [padded.max.x, padded.max.y, padded.max.z];
        for axis in 0..3 {
            let min_index = self.proxies[slot].min_index[axis];
            self.move_endpoint(axis, min_index, SortableKey::from_f32(min_values[axis]));
            let max_index = self.proxies[slot].max_index[axis];
            self.move_endpoint(axis, max_index, SortableKey::from_f32(max_values[axis]));
        }
    }

    fn move_endpoint(&mut self, axis: usize, index: usize, new_key: SortableKey) {
        let old_key = self.axes[axis][index].key;
        if new_key == old_key {
            return;
        }
        self.axes[axis][index].key = new_key;
        if new_key < old_key {
            self.walk_left(axis, index);
        } else {
            self.walk_right(axis, index);
        }
    }

    fn walk_left(&mut self, axis: usize, mut index: usize) {
        loop {
            let prev = self.axes[axis][index - 1];
            let cur = self.axes[axis][index];
            // The rank comparison lets a max swap past a min at an equal
            // key, so a pair separating into exact touch is still removed.
            if prev.owner == SENTINEL_OWNER || prev.rank() <= cur.rank() {
                break;
            }
            if prev.owner != cur.owner {
                if cur.is_max {
                    if !prev.is_max {
                        // A max sliding below another proxy's min: the
                        // intervals no longer overlap on this axis.
                        self.remove_pair(cur.owner, prev.owner);
                    }
                } else if prev.is_max {
                    // A min sliding below another proxy's max may start an
                    // overlap; the full box test decides.
                    self.try_add_pair(cur.owner, prev.owner);
                }
            }
            self.axes[axis].swap(index - 1, index);
            self.fix_endpoint_index(axis, index - 1);
            self.fix_endpoint_index(axis, index);
            index -= 1;
        }
    }

    fn walk_right(&mut self, axis: usize, mut index: usize) {
        loop {
            if index + 1 >= self.axes[axis].len() {
                break;
            }
            let next = self.axes[axis][index + 1];
            let cur = self.axes[axis][index];
            if next.owner == SENTINEL_OWNER || next.rank() >= cur.rank() {
                break;
            }
            if next.owner != cur.owner {
                if cur.is_max {
                    if !next.is_max {
                        // A max sliding above another proxy's min may start
                        // an overlap; the full box test decides.
                        self.try_add_pair(cur.owner, next.owner);
                    }
                } else if next.is_max {
                    // A min sliding above another proxy's max: the
                    // intervals no longer overlap on this axis.
                    self.remove_pair(cur.owner, next.owner);
                }
            }
            self.axes[axis].swap(index, index + 1);
            self.fix_endpoint_index(axis, index);
            self.fix_endpoint_index(axis, index + 1);
            index += 1;
        }
    }

    fn fix_endpoint_index(&mut self, axis: usize, index: usize) {
        let endpoint = self.axes[axis][index];
        if endpoint.owner == SENTINEL_OWNER {
            return;
        }
        let record = &mut self.proxies[usize::from(endpoint.owner)];
        if endpoint.is_max {
            record.max_index[axis] = index;
        } else {
            record.min_index[axis] = index;
        }
    }

    fn overlap_on_axis(&self, a: usize, b: usize, axis: usize) -> bool {
        let ra = &self.proxies[a];
        let rb = &self.proxies[b];
        let a_min = self.axes[axis][ra.min_index[axis]].key;
        let a_max = self.axes[axis][ra.max_index[axis]].key;
        let b_min = self.axes[axis][rb.min_index[axis]].key;
        let b_max = self.axes[axis][rb.max_index[axis]].key;
        a_min < b_max && b_min < a_max
    }

    fn try_add_pair(&mut self, a: u16, b: u16) {
        let (a, b) = (usize::from(a), usize::from(b));
        {
            let ra = &self.proxies[a];
            let rb = &self.proxies[b];
            if ra.pending_removal || rb.pending_removal || !masks_compatible(ra, rb) {
                return;
            }
        }
        // A crossing is only a hint: a large move can sweep one endpoint
        // across a proxy whose interval the box as a whole has already
        // passed on that very axis, so all three axes are re-tested.
        if (0..3).all(|axis| self.overlap_on_axis(a, b, axis)) {
            self.pairs
                .add(ProxyPair::new(ProxyId(a as u16), ProxyId(b as u16)));
        }
    }

    fn remove_pair(&mut self, a: u16, b: u16) {
        self.pairs
            .remove(ProxyPair::new(ProxyId(a), ProxyId(b)));
    }
}
