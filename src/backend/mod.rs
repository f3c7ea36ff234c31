//! # Backend Module
//!
//! Everything that requires understanding a disk image container or file system is
//! delegated to `a2kit`.  The `DiskBackend` trait is the seam: the descriptor selection
//! and the commands only ever see this trait, `process::A2kitProcess` is the
//! implementation that spawns `a2kit`, and tests can substitute their own.

pub mod process;

use std::fmt;
use std::str::FromStr;
use crate::DYNERR;

/// Errors arising while talking to the backend
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("unable to find backend")]
    NotFound,
    #[error("error spawning a2kit (is it installed and in the path?)")]
    Spawn,
    #[error("a2kit says: {0}")]
    Backend(String),
    #[error("a2kit did not respond in time")]
    Timeout,
    #[error("could not interpret metadata")]
    BadMetadata,
    #[error("a2kit version is incompatible: {0}")]
    IncompatibleVersion(String)
}

/// Methodology the backend uses to extract nibbles from a track
#[derive(PartialEq,Eq,Clone,Copy,Debug)]
pub enum Method {
    Auto,
    Fast,
    Analyze,
    Emulate
}

impl FromStr for Method {
    type Err = crate::commands::CommandError;
    fn from_str(s: &str) -> Result<Self,Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "fast" => Ok(Self::Fast),
            "analyze" => Ok(Self::Analyze),
            "emulate" => Ok(Self::Emulate),
            _ => Err(crate::commands::CommandError::InvalidCommand)
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self,f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f,"auto"),
            Self::Fast => write!(f,"fast"),
            Self::Analyze => write!(f,"analyze"),
            Self::Emulate => write!(f,"emulate")
        }
    }
}

/// Access to one mounted disk image.  Reading can mutate the object, e.g., if
/// the implementation keeps a cache or a connection.
pub trait DiskBackend {
    /// Image metadata as a JSON string, keys are named for the image type, e.g. `woz2`
    fn read_metadata(&mut self) -> Result<String,DYNERR>;
    /// Read the physical sector at cylinder, head, sector
    fn read_sector(&mut self,cyl: usize,head: usize,sec: usize) -> Result<Vec<u8>,DYNERR>;
    /// Read a list of `[cyl,head,sec]` physical sectors, concatenating the data
    fn read_sectors(&mut self,secs: &[[usize;3]]) -> Result<Vec<u8>,DYNERR> {
        let mut ans = Vec::new();
        for [cyl,head,sec] in secs {
            ans.append(&mut self.read_sector(*cyl,*head,*sec)?);
        }
        Ok(ans)
    }
    /// Read a logical block as the file system sees it
    fn read_block(&mut self,block: usize) -> Result<Vec<u8>,DYNERR>;
    /// Get the track bytes as aligned nibbles
    fn read_track_nibbles(&mut self,cyl: usize,head: usize) -> Result<Vec<u8>,DYNERR>;
    /// Disk geometry as a JSON string, including track solutions
    fn read_geometry(&mut self) -> Result<String,DYNERR>;
    /// File system statistics as a JSON string
    fn read_stat(&mut self) -> Result<String,DYNERR>;
}
