//! # `a2nib` main library
//!
//! This library lists the nibble streams of Apple II disk tracks, showing each byte in hex
//! alongside a one-character mnemonic that marks sync bytes, address and data fields,
//! and bytes that cannot occur in a valid field.
//!
//! ## Architecture
//!
//! Understanding disk image containers is delegated to the `a2kit` executable.
//! * `nibbles` holds the descriptor catalog, the GCR tables, and the track dump engine
//! * `select` decides which descriptor applies to an image, using metadata and at most one probe
//! * `backend` defines the `DiskBackend` trait and the subprocess implementation
//! * `display` formats sector and block data
//! * `commands` runs the CLI subcommands
//!
//! ## Descriptors
//!
//! Three standard descriptors are supported:
//! * 13 sector 5.25 inch (DOS 3.2), 5&3 data nibbles
//! * 16 sector 5.25 inch (DOS 3.3, ProDOS), 6&2 data nibbles
//! * 3.5 inch, 6&2 data nibbles with 6&2 address nibbles

pub mod nibbles;
pub mod backend;
pub mod select;
pub mod display;
pub mod commands;


type DYNERR = Box<dyn std::error::Error>;
type STDRESULT = Result<(),Box<dyn std::error::Error>>;
