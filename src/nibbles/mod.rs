//! # Nibble Module
//!
//! Describes the standard ways an Apple II track is laid out as a stream of disk nibbles,
//! and produces annotated listings of such streams.
//!
//! * `tables` has the GCR translation tables and the 4&4, 5&3, 6&2 codecs
//! * `dump` walks a track and produces the hex + mnemonic listing
//!
//! The nibbles themselves always come from the backend, already aligned, so nothing
//! in this module knows about disk image containers or bit streams.

pub mod tables;
pub mod dump;

#[cfg(test)]
mod dump_test;

use std::fmt;
use std::str::FromStr;

pub use dump::track_dump;

/// Errors pertaining to nibble descriptors
#[derive(thiserror::Error,Debug,PartialEq)]
pub enum Error {
    #[error("invalid nibble type")]
    UnsupportedNibbleWidth,
    #[error("unknown nibble code")]
    UnknownNibbleCode,
    #[error("unknown standard format")]
    UnknownStandard
}

/// Indicates how flux transitions are encoded on the track
#[derive(PartialEq,Eq,Clone,Copy,Debug)]
pub enum FluxCode {
    FM,
    MFM,
    GCR
}

/// Indicates how the bytes of a disk field are split into nibbles
#[derive(PartialEq,Eq,Clone,Copy,Debug)]
pub enum NibbleCode {
    None,
    N44,
    N53,
    N62
}

/// Immutable description of one encoding standard.
/// Prologs and epilogs are matched against the aligned nibble stream.
#[derive(PartialEq,Eq,Clone,Copy,Debug)]
pub struct NibbleDesc {
    pub flux: FluxCode,
    pub addr_nibs: NibbleCode,
    pub addr_prolog: [u8;3],
    pub addr_epilog: [u8;3],
    pub data_nibs: NibbleCode,
    pub data_prolog: [u8;3],
    pub data_epilog: [u8;3]
}

/// DOS 3.2 and earlier, 13 sectors per track
pub const STD13: NibbleDesc = NibbleDesc {
    flux: FluxCode::GCR,
    addr_nibs: NibbleCode::N44,
    addr_prolog: [0xd5,0xaa,0xb5],
    addr_epilog: [0xde,0xaa,0xeb],
    data_nibs: NibbleCode::N53,
    data_prolog: [0xd5,0xaa,0xad],
    data_epilog: [0xde,0xaa,0xeb]
};

/// DOS 3.3 and ProDOS on 5.25 inch disks, 16 sectors per track
pub const STD16: NibbleDesc = NibbleDesc {
    flux: FluxCode::GCR,
    addr_nibs: NibbleCode::N44,
    addr_prolog: [0xd5,0xaa,0x96],
    addr_epilog: [0xde,0xaa,0xeb],
    data_nibs: NibbleCode::N62,
    data_prolog: [0xd5,0xaa,0xad],
    data_epilog: [0xde,0xaa,0xeb]
};

/// Apple 3.5 inch disks (400K/800K)
pub const STD35: NibbleDesc = NibbleDesc {
    flux: FluxCode::GCR,
    addr_nibs: NibbleCode::N62,
    addr_prolog: [0xd5,0xaa,0x96],
    addr_epilog: [0xde,0xaa,0x00],
    data_nibs: NibbleCode::N62,
    data_prolog: [0xd5,0xaa,0xad],
    data_epilog: [0xde,0xaa,0x00]
};

impl NibbleDesc {
    /// Get one of the standard descriptors from a short key, `13`, `16`, or `35`
    pub fn from_std(key: &str) -> Result<Self,Error> {
        match key {
            "13" => Ok(STD13),
            "16" => Ok(STD16),
            "35" | "3.5" => Ok(STD35),
            _ => Err(Error::UnknownStandard)
        }
    }
    pub fn name(&self) -> &'static str {
        match *self {
            STD13 => "13 sector",
            STD16 => "16 sector",
            STD35 => "3.5 inch",
            _ => "custom"
        }
    }
    /// Expected number of nibbles in the address field payload
    pub fn addr_nib_count(&self) -> usize {
        match self.addr_nibs {
            NibbleCode::N44 => 8,
            _ => 5
        }
    }
}

fn hex_seq(seq: &[u8;3]) -> String {
    seq.iter().map(|b| format!("{:02X}",b)).collect::<Vec<String>>().join(" ")
}

impl fmt::Display for FluxCode {
    fn fmt(&self,f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            FluxCode::FM => write!(f,"FM"),
            FluxCode::MFM => write!(f,"MFM"),
            FluxCode::GCR => write!(f,"GCR")
        }
    }
}

impl fmt::Display for NibbleCode {
    fn fmt(&self,f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            NibbleCode::N44 => write!(f,"4&4"),
            NibbleCode::N53 => write!(f,"5&3"),
            NibbleCode::N62 => write!(f,"6&2"),
            NibbleCode::None => write!(f,"none")
        }
    }
}

impl FromStr for NibbleCode {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self,Self::Err> {
        match s {
            "4&4" => Ok(NibbleCode::N44),
            "5&3" => Ok(NibbleCode::N53),
            "6&2" => Ok(NibbleCode::N62),
            "none" => Ok(NibbleCode::None),
            _ => Err(Error::UnknownNibbleCode)
        }
    }
}

impl fmt::Display for NibbleDesc {
    fn fmt(&self,f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,"{}, address {} {} / {}, data {} {} / {}",
            self.flux,
            self.addr_nibs,hex_seq(&self.addr_prolog),hex_seq(&self.addr_epilog),
            self.data_nibs,hex_seq(&self.data_prolog),hex_seq(&self.data_epilog))
    }
}
