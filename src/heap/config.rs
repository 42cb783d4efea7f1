//! Runtime-overridable heap configuration.
//!
//! The reference implementation fixes capacity and dynamic-region start as compile-time
//! constants. This crate keeps those values as the default but makes them configurable, the same
//! way this crate family makes on-disk format parameters like page size overridable rather than
//! hard-wired (see `Tablespace::open_with_page_size` in the sibling binary-format crate this one
//! was adapted from).

use crate::HeapError;

/// Size of one allocation record, in bytes: a 2-byte offset, a 2-byte size, and a 1-byte pointer
/// count.
pub const RECORD_SIZE: u16 = 5;

/// Minimum payload size after rounding. The reference clamps every allocation request up to this
/// many bytes before rounding to a multiple of 8.
pub const MIN_ALLOC_SIZE: u16 = 8;

/// Capacity, dynamic-region start, and pointer width for a [`super::Heap`].
///
/// `HeapConfig::default()` reproduces the reference values: a 64 KiB heap with a 4 KiB metadata
/// region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapConfig {
    /// Total heap size in bytes, `C` in the design document. An exclusive upper bound on every
    /// valid offset, so it must be wide enough to hold the reference value (65536) one past the
    /// largest `u16` offset — hence `u32`, not `u16`, even though every offset and size inside the
    /// heap stays a `u16`.
    pub capacity: u32,
    /// Byte offset where the dynamic (payload) region begins, `D` in the design document. Bytes
    /// `[0, dynamic_start)` hold the allocation table and its sentinel.
    pub dynamic_start: u16,
    /// Width, in bytes, of a pointer-sized candidate slot scanned by the collector. In this port a
    /// heap pointer *is* a `u16` offset (see the design notes on exposing offsets instead of raw
    /// pointers), so the natural default is `size_of::<u16>()`. It is overridable so a binding
    /// that stores candidates in wider, native-pointer-sized fields can still be scanned
    /// correctly.
    pub pointer_width: u8,
}

impl Default for HeapConfig {
    fn default() -> Self {
        HeapConfig {
            capacity: 65536,
            dynamic_start: 4096,
            pointer_width: std::mem::size_of::<u16>() as u8,
        }
    }
}

impl HeapConfig {
    /// The maximum number of live records the metadata region can hold: `(dynamic_start - 2) /
    /// RECORD_SIZE`. The `- 2` reserves room for the trailing two-byte sentinel.
    pub fn max_records(&self) -> u16 {
        if self.dynamic_start < 2 {
            return 0;
        }
        (self.dynamic_start - 2) / RECORD_SIZE
    }

    /// Reject configurations that cannot hold at least a sentinel, or where the dynamic region is
    /// empty or inverted.
    pub fn validate(&self) -> Result<(), HeapError> {
        if self.dynamic_start as u32 >= self.capacity {
            return Err(HeapError::Config(format!(
                "dynamic_start ({}) must be less than capacity ({})",
                self.dynamic_start, self.capacity
            )));
        }
        if self.dynamic_start < 2 {
            return Err(HeapError::Config(format!(
                "dynamic_start ({}) leaves no room for the table sentinel",
                self.dynamic_start
            )));
        }
        if self.pointer_width == 0 {
            return Err(HeapError::Config(
                "pointer_width must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_reference_constants() {
        let cfg = HeapConfig::default();
        assert_eq!(cfg.capacity, 65536);
        assert_eq!(cfg.dynamic_start, 4096);
        assert_eq!(cfg.max_records(), (4096 - 2) / 5);
    }

    #[test]
    fn rejects_inverted_region() {
        let cfg = HeapConfig {
            capacity: 100,
            dynamic_start: 100,
            pointer_width: 8,
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_table_with_no_room_for_sentinel() {
        let cfg = HeapConfig {
            capacity: 100,
            dynamic_start: 1,
            pointer_width: 8,
        };
        assert!(cfg.validate().is_err());
    }
}
