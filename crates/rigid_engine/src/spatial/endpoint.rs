//! Sortable interval endpoints for the sweep-and-prune axes

/// Monotonic unsigned sort key packing an `f32` endpoint value.
///
/// Raw IEEE-754 bits do not order correctly once negative values are
/// involved. Flipping all bits of negative floats and setting the sign bit
/// of non-negative ones yields a `u32` whose unsigned order matches the
/// float order, so endpoint comparisons stay branchless integer compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SortableKey(u32);

impl SortableKey {
    /// Sentinel key below every representable float (-inf equivalent)
    pub const MIN: SortableKey = SortableKey(0);

    /// Sentinel key above every representable float (+inf equivalent)
    pub const MAX: SortableKey = SortableKey(u32::MAX);

    /// Placeholder for freshly inserted endpoints, just under the trailing
    /// sentinel so the first update walks them left into position
    pub const UNSORTED: SortableKey = SortableKey(u32::MAX - 1);

    /// Pack a float into its order-preserving key
    pub fn from_f32(value: f32) -> Self {
        let bits = value.to_bits();
        if bits & 0x8000_0000 != 0 {
            Self(!bits)
        } else {
            Self(bits | 0x8000_0000)
        }
    }
}

/// Owner slot reserved for the two sentinel endpoints of each axis
pub(crate) const SENTINEL_OWNER: u16 = u16::MAX;

/// One min or max endpoint of a proxy's padded interval on a single axis
#[derive(Debug, Clone, Copy)]
pub(crate) struct EndPoint {
    /// Sort key of the endpoint value
    pub key: SortableKey,
    /// Slot of the owning proxy, or [`SENTINEL_OWNER`]
    pub owner: u16,
    /// True for the interval maximum, false for the minimum
    pub is_max: bool,
}

impl EndPoint {
    /// Composite sort rank: key first, max endpoints before min endpoints
    /// at equal keys, so exactly-touching intervals order as separated
    pub(crate) fn rank(&self) -> (SortableKey, u8) {
        (self.key, u8::from(!self.is_max))
    }

    pub(crate) fn sentinel_min() -> Self {
        Self {
            key: SortableKey::MIN,
            owner: SENTINEL_OWNER,
            is_max: false,
        }
    }

    pub(crate) fn sentinel_max() -> Self {
        Self {
            key: SortableKey::MAX,
            owner: SENTINEL_OWNER,
            is_max: true,
        }
    }
}
