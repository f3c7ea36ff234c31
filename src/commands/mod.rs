//! # CLI Subcommands
//!
//! Contains modules that run the subcommands, and helpers they share.
//! Requests for disk regions are strings like `cyl,head,sec` which are parsed here.

pub mod get;
pub mod completions;

use std::io::Read;
use std::str::FromStr;
use std::time::Duration;
use log::{debug,warn,error};
use crate::backend::Method;
use crate::backend::process::A2kitProcess;
use crate::DYNERR;

#[derive(thiserror::Error,Debug)]
pub enum CommandError {
    #[error("Command could not be interpreted")]
    InvalidCommand,
    #[error("One of the parameters was out of range")]
    OutOfRange,
    #[error("Nibbles not supported for this image")]
    NibblesNotSupported
}

fn parse_list(farg: &str,expected: usize,form: &str) -> Result<Vec<usize>,DYNERR> {
    let it: Vec<&str> = farg.split(',').map(|s| s.trim()).collect();
    if it.len()!=expected {
        error!("specification should be in form `{}`",form);
        return Err(Box::new(CommandError::InvalidCommand));
    }
    let mut ans = Vec::new();
    for s in it {
        match usize::from_str(s) {
            Ok(v) => ans.push(v),
            Err(_) => {
                error!("`{}` is not a valid unsigned integer",s);
                return Err(Box::new(CommandError::InvalidCommand));
            }
        }
    }
    Ok(ans)
}

fn verify_head(head: usize) -> Result<(),DYNERR> {
    if head > 1 {
        error!("head must be 0 or 1");
        return Err(Box::new(CommandError::OutOfRange));
    }
    Ok(())
}

/// Parse `cylinder,head`
pub fn parse_track_request(farg: &str) -> Result<[usize;2],DYNERR> {
    let v = parse_list(farg,2,"cylinder,head")?;
    verify_head(v[1])?;
    debug!("user requested cyl {} head {}",v[0],v[1]);
    Ok([v[0],v[1]])
}

/// Parse `cylinder,head,sector`, more sectors on the same track can follow,
/// e.g. `17,0,1,2,3` reads sectors 1 through 3 of cylinder 17
pub fn parse_sector_request(farg: &str) -> Result<Vec<[usize;3]>,DYNERR> {
    let count = farg.split(',').count();
    if count < 3 {
        error!("specification should be in form `cylinder,head,sector[,sector...]`");
        return Err(Box::new(CommandError::InvalidCommand));
    }
    let v = parse_list(farg,count,"cylinder,head,sector[,sector...]")?;
    verify_head(v[1])?;
    let mut ans = Vec::new();
    for sec in &v[2..] {
        if *sec > 255 {
            error!("sector {} is out of range",sec);
            return Err(Box::new(CommandError::OutOfRange));
        }
        ans.push([v[0],v[1],*sec]);
    }
    debug!("user requested cyl {} head {} secs {:?}",v[0],v[1],&v[2..]);
    Ok(ans)
}

/// Parse a block number
pub fn parse_block_request(farg: &str) -> Result<usize,DYNERR> {
    let v = parse_list(farg,1,"block")?;
    if v[0] > 0xffff {
        error!("block {} is out of range",v[0]);
        return Err(Box::new(CommandError::OutOfRange));
    }
    debug!("user requested block {}",v[0]);
    Ok(v[0])
}

/// Read image bytes from `--dimg`, or from stdin if the option is absent
pub fn read_image(cmd: &clap::ArgMatches) -> Result<Vec<u8>,DYNERR> {
    match cmd.get_one::<String>("dimg") {
        Some(path) => Ok(std::fs::read(path)?),
        None => {
            if atty::is(atty::Stream::Stdin) {
                error!("pipe a disk image or use `--dimg`");
                return Err(Box::new(CommandError::InvalidCommand));
            }
            let mut dat = Vec::new();
            std::io::stdin().read_to_end(&mut dat)?;
            Ok(dat)
        }
    }
}

/// Mount the disk image using the options common to the image subcommands
pub fn open_backend(cmd: &clap::ArgMatches) -> Result<A2kitProcess,DYNERR> {
    let img = read_image(cmd)?;
    let exe = A2kitProcess::locate(cmd.get_one::<String>("backend").map(|s| s.as_str()))?;
    let mut disk = A2kitProcess::new(exe,img);
    if let Some(method) = cmd.get_one::<String>("method") {
        disk = disk.with_method(Method::from_str(method)?);
    }
    if let Some(fmt) = cmd.get_one::<String>("pro") {
        disk = disk.with_pro(fmt);
    }
    if let Some(secs) = cmd.get_one::<u64>("timeout") {
        disk = disk.with_timeout(Duration::from_secs(*secs));
    }
    if let Err(e) = disk.check_version() {
        warn!("{}",e);
    }
    Ok(disk)
}
