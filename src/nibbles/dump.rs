//! ## Track dump
//!
//! Produces a listing of aligned track nibbles in columns of hex and mnemonics.
//! The mnemonics are
//! * `>` self-sync run
//! * `(` start of a prolog, `A` or `D` marks address or data, `:` ends the marker
//! * `:` then `A` or `D` then `)` for epilogs
//! * hex digits for decoded address nibbles, `^` if the value does not fit in a digit
//! * `R` for a reserved byte outside of any marker
//! * `.` for ordinary data, `?` for a byte that cannot appear on a valid track

use std::fmt::Write;
use log::debug;
use super::{Error,NibbleCode,NibbleDesc};
use super::tables::{self,INVALID_NIB_BYTE};

const RCH: &str = "unreachable was reached";
const ROW_LEN: usize = 16;

/// Working state while walking a track; lives for one call only.
struct Cursor {
    in_addr_field: bool,
    addr_count: usize,
    err_count: usize
}

/// Classify one byte inside an address field
fn addr_mnemonic(desc: &NibbleDesc,addr_count: usize,bak: u8,curr: u8,fwd: u8) -> char {
    match desc.addr_nibs {
        NibbleCode::N62 => match tables::decode_62(curr,&tables::REV_62) {
            INVALID_NIB_BYTE => '?',
            x if x < 16 => hex_digit(x),
            _ => '^'
        },
        NibbleCode::N44 => match addr_count % 2 {
            1 => hex_digit(tables::decode_44([curr,fwd]) >> 4),
            _ => hex_digit(tables::decode_44([bak,curr]) & 0x0f)
        },
        _ => '?'
    }
}

fn hex_digit(val: u8) -> char {
    std::char::from_digit(val as u32,16).unwrap_or('?')
}

/// Classify one byte outside an address field.  The order of the arms matters,
/// earlier patterns win when several match.
fn marker_mnemonic(desc: &NibbleDesc,cur: &mut Cursor,bak: u8,curr: u8,fwd: u8) -> char {
    let [apro,aepi,dpro,depi] = [desc.addr_prolog,desc.addr_epilog,desc.data_prolog,desc.data_epilog];
    let field = if cur.in_addr_field { 'A' } else { 'D' };
    match (bak,curr,fwd) {
        (0xff,0xff,_) => '>',
        (_,0xff,0xff) => '>',
        // address prolog
        (_,a0,a1) if [a0,a1]==apro[0..2] => '(',
        (a0,a1,a2) if [a0,a1,a2]==apro => {
            cur.in_addr_field = true;
            'A'
        },
        (a1,a2,_) if [a1,a2]==apro[1..3] => {
            cur.addr_count = 1;
            ':'
        },
        // data prolog
        (_,d0,d1) if [d0,d1]==dpro[0..2] => '(',
        (d0,d1,d2) if [d0,d1,d2]==dpro => 'D',
        (d1,d2,_) if [d1,d2]==dpro[1..3] => ':',
        // address epilog
        (_,e0,e1) if [e0,e1]==aepi[0..2] => ':',
        (e0,e1,_) if [e0,e1]==aepi[0..2] => field,
        (e1,_,_) if e1==aepi[1] => {
            cur.in_addr_field = false;
            ')'
        },
        // data epilog
        (_,e0,e1) if [e0,e1]==depi[0..2] => ':',
        (e0,e1,_) if [e0,e1]==depi[0..2] => field,
        (e1,_,_) if e1==depi[1] => {
            cur.in_addr_field = false;
            ')'
        },
        (_,0xd5,_) => 'R',
        (_,0xaa,_) => 'R',
        _ => '.'
    }
}

/// Get display string for a track including mnemonics.
/// The track should already be resolved into aligned nibbles by the backend.
/// Bytes that cannot appear on a track are flagged and counted, but never stop the listing.
/// The only failure is a descriptor whose data field is not 5&3 or 6&2.
pub fn track_dump(trk: &[u8],desc: &NibbleDesc) -> Result<String,Error> {
    let nib_code = match desc.data_nibs {
        NibbleCode::N53 | NibbleCode::N62 => desc.data_nibs,
        _ => return Err(Error::UnsupportedNibbleWidth)
    };
    let addr_nib_count = desc.addr_nib_count();
    let mut ans = String::new();
    let mut cur = Cursor {
        in_addr_field: false,
        addr_count: 0,
        err_count: 0
    };
    let mut slice_start = 0;
    while slice_start < trk.len() {
        let slice_end = usize::min(slice_start + ROW_LEN,trk.len());
        let mut mnemonics = String::new();
        for i in slice_start..slice_end {
            let curr = trk[i];
            let bak = match i {
                x if x>0 => trk[x-1],
                _ => 0
            };
            let fwd = match i {
                x if x+1<trk.len() => trk[x+1],
                _ => 0
            };
            if !tables::is_disk_byte(curr,nib_code) && curr!=0xaa && curr!=0xd5 {
                mnemonics.push('?');
                cur.err_count += 1;
            } else if cur.addr_count > 0 {
                mnemonics.push(addr_mnemonic(desc,cur.addr_count,bak,curr,fwd));
                cur.addr_count += 1;
            } else {
                mnemonics.push(marker_mnemonic(desc,&mut cur,bak,curr,fwd));
            }
            if cur.addr_count > addr_nib_count {
                cur.addr_count = 0;
            }
        }
        write!(ans,"{:04X} : ",slice_start).expect(RCH);
        for byte in &trk[slice_start..slice_end] {
            write!(ans,"{:02X} ",byte).expect(RCH);
        }
        for _blank in slice_end..slice_start+ROW_LEN {
            ans += "   ";
        }
        writeln!(ans,"|{:<16}|",mnemonics).expect(RCH);
        slice_start += ROW_LEN;
    }
    debug!("dumped {} nibbles with {} invalid",trk.len(),cur.err_count);
    if cur.err_count > 0 {
        writeln!(ans).expect(RCH);
        writeln!(ans,"Encountered {} invalid bytes",cur.err_count).expect(RCH);
    }
    Ok(ans)
}
