#[cfg(test)]
use super::{track_dump,Error,NibbleCode,NibbleDesc,STD13,STD16,STD35};
#[cfg(test)]
use hex;

#[cfg(test)]
fn test_dump(hex_nibs: &str, desc: &NibbleDesc, expected: &str) {
    let nibs = hex::decode(hex_nibs).expect("hex error");
    let actual = track_dump(&nibs,desc).expect("dump error");
    assert_eq!(actual,expected);
}

#[cfg(test)]
fn count_hex_tokens(dump: &str) -> usize {
    dump.lines()
        .filter(|line| line.contains('|'))
        .map(|line| {
            let hex_part = line.split('|').next().unwrap();
            hex_part.split(" : ").nth(1).unwrap().split_whitespace().count()
        })
        .sum()
}

mod address_fields {
    use super::*;
    #[test]
    fn dos33_address() {
        // volume 254, track 17, sector 15
        let expected = format!("{}{}",
            "0000 : FF FF FF D5 AA 96 FF FE AA BB AF AF FA EA DE AA |>>>(A:fe110fe0:A|\n",
            format!("0010 : EB FF FF {}|)>>{}|\n"," ".repeat(39)," ".repeat(13)));
        test_dump("FFFFFFD5AA96FFFEAABBAFAFFAEADEAAEBFFFF",&STD16,&expected);
    }
    #[test]
    fn disk35_address() {
        let expected = format!("0000 : FF FF D5 AA 96 96 97 9A DE AA {}|>>(A:012^?{}|\n"," ".repeat(18)," ".repeat(6));
        test_dump("FFFFD5AA9696979ADEAA",&STD35,&expected);
    }
    #[test]
    fn disk35_damaged_address() {
        let expected = "0000 : FF FF D5 AA 96 00 00 00 00 00 00 00 00 DE AA 00 |>>(A:????????^??|\n\nEncountered 9 invalid bytes\n";
        test_dump("FFFFD5AA960000000000000000DEAA00",&STD35,expected);
    }
}

mod data_fields {
    use super::*;
    #[test]
    fn dos33_data_markers() {
        let expected = format!("0000 : FF FF D5 AA AD 96 97 DE AA EB {}|>>(D:..:D){}|\n"," ".repeat(18)," ".repeat(6));
        test_dump("FFFFD5AAAD9697DEAAEB",&STD16,&expected);
    }
    #[test]
    fn table_follows_data_nibbles() {
        // 0x96 and 0x97 are legal 6&2 bytes but not legal 5&3 bytes
        let expected13 = format!("0000 : 96 97 AB {}|??.{}|\n\nEncountered 2 invalid bytes\n"," ".repeat(39)," ".repeat(13));
        let expected16 = format!("0000 : 96 97 AB {}|...{}|\n"," ".repeat(39)," ".repeat(13));
        test_dump("9697AB",&STD13,&expected13);
        test_dump("9697AB",&STD16,&expected16);
    }
    #[test]
    fn reserved_bytes() {
        let expected = format!("0000 : 96 D5 96 {}|.R.{}|\n"," ".repeat(39)," ".repeat(13));
        test_dump("96D596",&STD16,&expected);
    }
}

mod accounting {
    use super::*;
    #[test]
    fn all_invalid() {
        let nibs = vec![0x00;20];
        let dump = track_dump(&nibs,&STD16).expect("dump error");
        assert!(dump.ends_with("\nEncountered 20 invalid bytes\n"));
        let mnemonics: String = dump.lines()
            .filter(|line| line.contains('|'))
            .map(|line| line.split('|').nth(1).unwrap().trim_end().to_string())
            .collect();
        assert_eq!(mnemonics,"?".repeat(20));
    }
    #[test]
    fn rows_and_tokens() {
        let nibs: Vec<u8> = (0..100).map(|i| super::super::tables::DISK_BYTES_62[i % 64]).collect();
        let dump = track_dump(&nibs,&STD16).expect("dump error");
        assert_eq!(dump.lines().count(),7);
        assert_eq!(count_hex_tokens(&dump),100);
        assert!(dump.lines().all(|line| line.len()==4 + 3 + 16*3 + 18));
    }
    #[test]
    fn idempotent() {
        let nibs = hex::decode("FFFFFFD5AA96FFFEAABBAFAFFAEADEAAEBFFFF00").expect("hex error");
        assert_eq!(track_dump(&nibs,&STD16),track_dump(&nibs,&STD16));
    }
    #[test]
    fn empty_track() {
        assert_eq!(track_dump(&[],&STD16),Ok(String::new()));
    }
    #[test]
    fn unsupported_data_nibbles() {
        let mut desc = STD16;
        desc.data_nibs = NibbleCode::N44;
        let res = track_dump(&[0xff,0xff],&desc);
        assert_eq!(res,Err(Error::UnsupportedNibbleWidth));
        assert_eq!(Error::UnsupportedNibbleWidth.to_string(),"invalid nibble type");
    }
}
