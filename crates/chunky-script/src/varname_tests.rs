use std::collections::HashSet;

use crate::{ScriptError, pack_char, pack_name, unpack_char, unpack_name};

#[test]
fn packs_most_significant_bit_first() {
    let packed = pack_name("siiLoop").unwrap();
    assert_eq!(packed, [0xDE, 0xDB, 0x56, 0xCF, 0x3D, 0x00]);
    assert_eq!(unpack_name(&packed), "siiLoop");
}

#[test]
fn full_length_name_fills_all_bits() {
    let packed = pack_name("________").unwrap();
    assert_eq!(packed, [0xFF; 6]);
    assert_eq!(unpack_name(&packed), "________");
}

#[test]
fn character_codes_are_a_bijection() {
    let mut seen = Vec::new();
    for ch in ('0'..='9').chain('A'..='Z').chain('a'..='z').chain(['_']) {
        let code = pack_char(ch).unwrap();
        assert!((1..=63).contains(&code));
        assert_eq!(unpack_char(code), Some(ch));
        seen.push(code);
    }
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), 63);
    assert_eq!(unpack_char(0), None);
}

#[test]
fn names_round_trip_and_pack_uniquely() {
    let alphabet: Vec<char> = ('0'..='9').chain('A'..='Z').chain('a'..='z').chain(['_']).collect();
    let mut packed = HashSet::new();
    for len in 1..=8 {
        for start in 0..alphabet.len() {
            let name: String = (0..len)
                .map(|i| alphabet[(start + i * 17 + len) % alphabet.len()])
                .collect();
            let bytes = pack_name(&name).unwrap();
            assert_eq!(unpack_name(&bytes), name);
            assert!(packed.insert(bytes), "{name} collides");
        }
    }
    assert_eq!(packed.len(), 8 * 63);
}

#[test]
fn long_names_are_truncated() {
    let packed = pack_name("kidsCountLoop").unwrap();
    assert_eq!(packed, pack_name("kidsCoun").unwrap());
    assert_eq!(unpack_name(&packed), "kidsCoun");
}

#[test]
fn empty_name_is_all_padding() {
    assert_eq!(pack_name("").unwrap(), [0; 6]);
    assert_eq!(unpack_name(&[0; 6]), "");
}

#[test]
fn unpacking_stops_at_padding() {
    let mut packed = pack_name("ab").unwrap();
    // Third code zero, fourth code 'c'.
    packed[2] |= pack_char('c').unwrap();
    assert_eq!(unpack_name(&packed), "ab");
}

#[test]
fn invalid_character() {
    let err = pack_name("my-var").unwrap_err();
    assert_eq!(
        err,
        ScriptError::InvalidVariableChar {
            ch: '-',
            name: "my-var".into(),
        }
    );
    insta::assert_snapshot!(err.to_string(), @r#"invalid character '-' in variable name "my-var""#);
}
