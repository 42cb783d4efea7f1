//! Big-endian 16-bit field codec for the allocation table.
//!
//! Offset and size fields in [`super::table::AllocationRecord`] are stored big-endian regardless
//! of host byte order, the same way every other on-disk/on-heap fixed-width field in this crate
//! family is read and written: via [`byteorder::BigEndian`].

use byteorder::{BigEndian, ByteOrder};

/// Read a big-endian `u16` at byte position `pos` in `buf`.
///
/// Callers are expected to keep `pos + 1` within `buf`; this is enforced by `debug_assert!`
/// rather than a `Result`, matching the reference's "positions are assumed to be within the heap"
/// contract.
pub fn read_u16(buf: &[u8], pos: usize) -> u16 {
    debug_assert!(pos + 2 <= buf.len(), "read_u16 out of bounds at {pos}");
    BigEndian::read_u16(&buf[pos..])
}

/// Write `value` as a big-endian `u16` at byte position `pos` in `buf`.
pub fn write_u16(buf: &mut [u8], pos: usize, value: u16) {
    debug_assert!(pos + 2 <= buf.len(), "write_u16 out of bounds at {pos}");
    BigEndian::write_u16(&mut buf[pos..], value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_big_endian() {
        let mut buf = [0u8; 4];
        write_u16(&mut buf, 1, 0x1234);
        assert_eq!(buf, [0x00, 0x12, 0x34, 0x00]);
        assert_eq!(read_u16(&buf, 1), 0x1234);
    }

    #[test]
    fn zero_round_trips() {
        let mut buf = [0xffu8; 2];
        write_u16(&mut buf, 0, 0);
        assert_eq!(buf, [0, 0]);
        assert_eq!(read_u16(&buf, 0), 0);
    }
}
