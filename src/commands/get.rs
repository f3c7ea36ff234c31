//! ## get subcommands
//!
//! Retrieve tracks, sectors, blocks, and metadata from a mounted image and format them.
//! Every handler other than `dump` goes through the `DiskBackend` trait.

use clap;
use std::io::{Read,Write};
use log::{info,error};
use super::CommandError;
use crate::backend::DiskBackend;
use crate::nibbles::{self,NibbleDesc};
use crate::{select,display,STDRESULT,DYNERR};

const RCH: &str = "unreachable was reached";

/// Hex dump on a console, raw bytes otherwise, unless `--console` forces the hex dump
fn output_bytes(cmd: &clap::ArgMatches,dat: &[u8]) -> STDRESULT {
    if atty::is(atty::Stream::Stdout) || cmd.get_flag("console") {
        print!("{}",display::hex_dump(0,dat));
    } else {
        std::io::stdout().write_all(dat)?;
    }
    Ok(())
}

/// Format nibbles of a track using the descriptor selected from the image
pub fn track_listing(disk: &mut dyn DiskBackend,cyl: usize,head: usize) -> Result<String,DYNERR> {
    let desc = match select::select_descriptor(disk)? {
        Some(d) => d,
        None => {
            error!("image type does not provide nibbles");
            return Err(Box::new(CommandError::NibblesNotSupported));
        }
    };
    info!("using {} nibbles",desc.name());
    let trk = disk.read_track_nibbles(cyl,head)?;
    Ok(nibbles::track_dump(&trk,&desc)?)
}

pub fn track(cmd: &clap::ArgMatches) -> STDRESULT {
    let [cyl,head] = super::parse_track_request(cmd.get_one::<String>("file").expect(RCH))?;
    let mut disk = super::open_backend(cmd)?;
    print!("{}",track_listing(&mut disk,cyl,head)?);
    Ok(())
}

pub fn sec(cmd: &clap::ArgMatches) -> STDRESULT {
    let secs = super::parse_sector_request(cmd.get_one::<String>("file").expect(RCH))?;
    let mut disk = super::open_backend(cmd)?;
    let dat = disk.read_sectors(&secs)?;
    output_bytes(cmd,&dat)
}

pub fn block(cmd: &clap::ArgMatches) -> STDRESULT {
    let b = super::parse_block_request(cmd.get_one::<String>("file").expect(RCH))?;
    let mut disk = super::open_backend(cmd)?;
    let dat = disk.read_block(b)?;
    output_bytes(cmd,&dat)
}

/// Re-indent JSON from the backend, `--indent` defaults to 4
fn output_json(cmd: &clap::ArgMatches,raw: &str) -> STDRESULT {
    let parsed = match json::parse(raw) {
        Ok(m) => m,
        Err(e) => {
            error!("backend JSON did not parse: {}",e);
            return Err(Box::new(crate::backend::Error::BadMetadata));
        }
    };
    let spaces = *cmd.get_one::<u16>("indent").expect(RCH);
    println!("{}",json::stringify_pretty(parsed,spaces));
    Ok(())
}

pub fn meta(cmd: &clap::ArgMatches) -> STDRESULT {
    let mut disk = super::open_backend(cmd)?;
    output_json(cmd,&disk.read_metadata()?)
}

pub fn geometry(cmd: &clap::ArgMatches) -> STDRESULT {
    let mut disk = super::open_backend(cmd)?;
    output_json(cmd,&disk.read_geometry()?)
}

pub fn stat(cmd: &clap::ArgMatches) -> STDRESULT {
    let mut disk = super::open_backend(cmd)?;
    output_json(cmd,&disk.read_stat()?)
}

/// Summarize the selection, `none` if the image has no nibble descriptor
pub fn describe_selection(maybe_desc: Option<NibbleDesc>) -> String {
    match maybe_desc {
        Some(desc) => format!("{}: {}",desc.name(),desc),
        None => "none".to_string()
    }
}

pub fn nibdesc(cmd: &clap::ArgMatches) -> STDRESULT {
    let mut disk = super::open_backend(cmd)?;
    println!("{}",describe_selection(select::select_descriptor(&mut disk)?));
    Ok(())
}

pub fn has_nibbles(cmd: &clap::ArgMatches) -> STDRESULT {
    let mut disk = super::open_backend(cmd)?;
    println!("{}",select::nibbles_available(&mut disk));
    Ok(())
}

/// List nibbles that are already aligned, no backend needed
pub fn dump(cmd: &clap::ArgMatches) -> STDRESULT {
    let desc = NibbleDesc::from_std(cmd.get_one::<String>("std").expect(RCH))?;
    let trk = match cmd.get_one::<String>("file") {
        Some(path) => std::fs::read(path)?,
        None => {
            if atty::is(atty::Stream::Stdin) {
                error!("pipe nibbles or use `--file`");
                return Err(Box::new(CommandError::InvalidCommand));
            }
            let mut dat = Vec::new();
            std::io::stdin().read_to_end(&mut dat)?;
            dat
        }
    };
    print!("{}",nibbles::track_dump(&trk,&desc)?);
    Ok(())
}
