//! # Descriptor Selection
//!
//! Decide which standard nibble descriptor applies to a mounted image.
//! The image metadata settles the question for most WOZ images.  For NIB, 2MG-nibble,
//! and WOZ1 images the sector count is not recorded, so we try to read sector 15 on
//! track 0: this exists with 16-sector addressing and does not with 13-sector addressing.

use log::{debug,info};
use crate::backend::{self,DiskBackend};
use crate::nibbles::{NibbleDesc,STD13,STD16,STD35};
use crate::DYNERR;

/// Outcome of looking at the metadata alone
#[derive(PartialEq,Debug)]
pub enum Selection {
    Known(NibbleDesc),
    /// 13 or 16 sectors, need to look at the disk
    Probe,
    Unsupported
}

/// Presence test with the loose semantics of JSON producers,
/// e.g. `{}` and `true` are present, `null`, `false`, `0`, `""` are not.
fn present(val: &json::JsonValue) -> bool {
    match val {
        json::JsonValue::Null => false,
        json::JsonValue::Boolean(b) => *b,
        json::JsonValue::Number(n) => !n.is_zero() && !n.is_nan(),
        json::JsonValue::Short(_) | json::JsonValue::String(_) => !val.is_empty(),
        json::JsonValue::Object(_) | json::JsonValue::Array(_) => true
    }
}

/// Apply the metadata decision table, first match wins
pub fn select_from_metadata(meta: &json::JsonValue) -> Selection {
    let woz2_info = &meta["woz2"]["info"];
    if present(&meta["nib"]) {
        debug!("nib image, sector count is ambiguous");
        Selection::Probe
    } else if meta["2mg"]["header"]["img_fmt"]["_raw"].as_str() == Some("02000000") {
        debug!("2mg wrapping nib, sector count is ambiguous");
        Selection::Probe
    } else if present(&meta["woz1"]) {
        debug!("woz1 image, sector count is ambiguous");
        Selection::Probe
    } else if woz2_info["disk_type"]["_raw"].as_str() == Some("01") {
        match woz2_info["boot_sector_format"]["_raw"].as_str() {
            Some("01") => Selection::Known(STD16),
            Some("02") => Selection::Known(STD13),
            _ => Selection::Probe
        }
    } else if woz2_info["disk_type"]["_raw"].as_str() == Some("02") {
        Selection::Known(STD35)
    } else {
        Selection::Unsupported
    }
}

/// Try to read sector 15 of track 0.  Any failure means 13 sectors, the error is not propagated.
pub fn probe_sector_count(disk: &mut dyn DiskBackend) -> NibbleDesc {
    match disk.read_sector(0,0,15) {
        Ok(_) => {
            info!("sector 15 found, assuming 16 sectors");
            STD16
        },
        Err(e) => {
            debug!("probe of sector 15 failed: {}",e);
            info!("sector 15 not found, assuming 13 sectors");
            STD13
        }
    }
}

/// Use the image data to find the nibble descriptor, `None` means nibbles
/// cannot be displayed for this image.  Errors come only from retrieving the metadata.
pub fn select_descriptor(disk: &mut dyn DiskBackend) -> Result<Option<NibbleDesc>,DYNERR> {
    let raw_meta = disk.read_metadata()?;
    let meta = match json::parse(&raw_meta) {
        Ok(m) => m,
        Err(e) => {
            debug!("metadata parser says {}",e);
            return Err(Box::new(backend::Error::BadMetadata));
        }
    };
    Ok(match select_from_metadata(&meta) {
        Selection::Known(desc) => Some(desc),
        Selection::Probe => Some(probe_sector_count(disk)),
        Selection::Unsupported => None
    })
}

/// Test whether the image can produce track nibbles at all, by reading the first
/// track listed in the geometry.  Any failure along the way means no.
pub fn nibbles_available(disk: &mut dyn DiskBackend) -> bool {
    let geometry = match disk.read_geometry() {
        Ok(s) => match json::parse(&s) {
            Ok(g) => g,
            Err(_) => return false
        },
        Err(_) => return false
    };
    if geometry.is_null() {
        return false;
    }
    let mut ch = [0,0];
    for trk in geometry["tracks"].members() {
        if !trk.is_null() {
            ch = [
                trk["cylinder"].as_f64().unwrap_or(0.0) as usize,
                trk["head"].as_usize().unwrap_or(0)
            ];
            break;
        }
    }
    debug!("testing nibbles on track {},{}",ch[0],ch[1]);
    disk.read_track_nibbles(ch[0],ch[1]).is_ok()
}
