//! # Display
//!
//! Console formatting for sector and block data.  Track nibbles have their own
//! listing in `nibbles::dump`.

use std::fmt::Write;

const RCH: &str = "unreachable was reached";

/// Format binary in columns of hex, +ascii, and -ascii.
/// Negative ascii is the high-bit-set text that Apple II software commonly stores.
pub fn hex_dump(start_addr: usize,dat: &[u8]) -> String {
    let mut ans = String::new();
    let mut slice_start = 0;
    while slice_start < dat.len() {
        let row_label = start_addr + slice_start;
        let slice_end = usize::min(slice_start + 16,dat.len());
        let slice = &dat[slice_start..slice_end];
        let txt: Vec<u8> = slice.iter().map(|c| match *c {
            x if x<32 => '.' as u8,
            x if x<127 => x,
            _ => '.' as u8
        }).collect();
        let neg_txt: Vec<u8> = slice.iter().map(|c| match *c {
            x if x>=160 && x<255 => x - 128,
            _ => 46
        }).collect();
        write!(ans,"{:04X} : ",row_label).expect(RCH);
        for byte in slice {
            write!(ans,"{:02X} ",byte).expect(RCH);
        }
        for _blank in slice_end..slice_start+16 {
            ans += "   ";
        }
        write!(ans,"|+| {} ",String::from_utf8_lossy(&txt)).expect(RCH);
        for _blank in slice_end..slice_start+16 {
            ans += " ";
        }
        writeln!(ans,"|-| {}",String::from_utf8_lossy(&neg_txt)).expect(RCH);
        slice_start += 16;
    }
    ans
}
