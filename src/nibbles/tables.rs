//! Translation tables for Steve Wozniak's nibbles
//!
//! A disk byte must have its high bit set and must not contain runs of zero bits that
//! would upset the drive's clock recovery.  Only a few byte values qualify, the ones in
//! the forward tables below, and the position within the table is the value carried.

use super::NibbleCode;

pub const INVALID_NIB_BYTE: u8 = 0xff;

/// Legal disk bytes for 5&3 encoding, index is the 5-bit value
pub const DISK_BYTES_53: [u8;32] = [
    0xab, 0xad, 0xae, 0xaf, 0xb5, 0xb6, 0xb7, 0xba,
    0xbb, 0xbd, 0xbe, 0xbf, 0xd6, 0xd7, 0xda, 0xdb,
    0xdd, 0xde, 0xdf, 0xea, 0xeb, 0xed, 0xee, 0xef,
    0xf5, 0xf6, 0xf7, 0xfa, 0xfb, 0xfd, 0xfe, 0xff
];

/// Legal disk bytes for 6&2 encoding, index is the 6-bit value
pub const DISK_BYTES_62: [u8;64] = [
    0x96, 0x97, 0x9a, 0x9b, 0x9d, 0x9e, 0x9f, 0xa6,
    0xa7, 0xab, 0xac, 0xad, 0xae, 0xaf, 0xb2, 0xb3,
    0xb4, 0xb5, 0xb6, 0xb7, 0xb9, 0xba, 0xbb, 0xbc,
    0xbd, 0xbe, 0xbf, 0xcb, 0xcd, 0xce, 0xcf, 0xd3,
    0xd6, 0xd7, 0xd9, 0xda, 0xdb, 0xdc, 0xdd, 0xde,
    0xdf, 0xe5, 0xe6, 0xe7, 0xe9, 0xea, 0xeb, 0xec,
    0xed, 0xee, 0xef, 0xf2, 0xf3, 0xf4, 0xf5, 0xf6,
    0xf7, 0xf9, 0xfa, 0xfb, 0xfc, 0xfd, 0xfe, 0xff
];

/// Inverse of `DISK_BYTES_53`, computed at compile time
pub static REV_53: [u8;256] = invert_53();
/// Inverse of `DISK_BYTES_62`, computed at compile time
pub static REV_62: [u8;256] = invert_62();

/// Map each disk byte to its 5-bit value, illegal bytes map to `INVALID_NIB_BYTE`
pub const fn invert_53() -> [u8;256] {
    let mut ans: [u8;256] = [INVALID_NIB_BYTE;256];
    let mut i = 0;
    while i < 32 {
        ans[DISK_BYTES_53[i] as usize] = i as u8;
        i += 1;
    }
    ans
}

/// Map each disk byte to its 6-bit value, illegal bytes map to `INVALID_NIB_BYTE`
pub const fn invert_62() -> [u8;256] {
    let mut ans: [u8;256] = [INVALID_NIB_BYTE;256];
    let mut i = 0;
    while i < 64 {
        ans[DISK_BYTES_62[i] as usize] = i as u8;
        i += 1;
    }
    ans
}

/// encode a normal byte as two 4&4 nibbles, odd bits first
pub fn encode_44(val: u8) -> [u8;2] {
    [(val >> 1) | 0xaa, val | 0xaa]
}

/// decode two 4&4 nibbles as a normal byte, the nibble carrying the odd bits comes first
pub fn decode_44(nibs: [u8;2]) -> u8 {
    (((nibs[0] as u16) << 1 | 0x01) & nibs[1] as u16) as u8
}

/// encode a 5-bit value as a 5&3 nibble
pub fn encode_53(val: u8) -> u8 {
    DISK_BYTES_53[(val & 0x1f) as usize]
}

/// decode a 5&3 nibble, returning a 5-bit value or `INVALID_NIB_BYTE`
pub fn decode_53(byte: u8,inv: &[u8;256]) -> u8 {
    inv[byte as usize]
}

/// encode a 6-bit value as a 6&2 nibble
pub fn encode_62(val: u8) -> u8 {
    DISK_BYTES_62[(val & 0x3f) as usize]
}

/// decode a 6&2 nibble, returning a 6-bit value or `INVALID_NIB_BYTE`
pub fn decode_62(byte: u8,inv: &[u8;256]) -> u8 {
    inv[byte as usize]
}

/// Is this a legal disk byte for the given code.  Codes without a table
/// (4&4, none) never validate anything.
pub fn is_disk_byte(byte: u8,code: NibbleCode) -> bool {
    match code {
        NibbleCode::N53 => REV_53[byte as usize] != INVALID_NIB_BYTE,
        NibbleCode::N62 => REV_62[byte as usize] != INVALID_NIB_BYTE,
        _ => false
    }
}
