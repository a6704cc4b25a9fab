use core::fmt;
use core::num::NonZeroU32;

/// Compact, stable handle for a record owned by a grouping engine.
///
/// - `u32` keeps group member lists small
/// - `NonZero` enables `Option<RecordKey>` to be pointer-optimized
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey(NonZeroU32);

impl RecordKey {
    /// Create a key from a 0-based arena index by storing index+1.
    ///
    /// Returns `None` once the arena would exceed `u32::MAX - 1` entries.
    pub fn from_index(index: usize) -> Option<Self> {
        let raw = u32::try_from(index).ok()?.checked_add(1)?;
        NonZeroU32::new(raw).map(Self)
    }

    /// Recover the 0-based index.
    pub fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl fmt::Debug for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordKey({})", self.index())
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_round_trip_index() {
        for i in [0_usize, 1, 2, 42, 10_000] {
            let key = RecordKey::from_index(i).unwrap();
            assert_eq!(key.index(), i);
        }
    }

    #[test]
    fn key_rejects_overflowing_index() {
        assert!(RecordKey::from_index(u32::MAX as usize).is_none());
    }

    #[test]
    fn option_key_is_small() {
        assert_eq!(
            core::mem::size_of::<RecordKey>(),
            core::mem::size_of::<Option<RecordKey>>()
        );
    }
}
