use chunky_core::CharacterSet;

use crate::group::GroupList;
use crate::{StringTable, StringTableError};

fn ansi_table() -> StringTable {
    let mut table = StringTable::new(CharacterSet::Ansi);
    table.insert(1, "hi");
    table.insert(2, "yo!");
    table
}

#[test]
fn ansi_layout() {
    let bytes = ansi_table().to_bytes().unwrap();

    #[rustfmt::skip]
    assert_eq!(bytes, [
        0x01, 0x00, 0x03, 0x03,
        0x08, 0x00, 0x00, 0x00,
        0x02, 0x00, 0x00, 0x00,
        0x07, 0x00, 0x00, 0x00,
        0xFF, 0xFF, 0xFF, 0xFF,
        // heap
        0x02, b'h', b'i',
        0x03, b'y', b'o', b'!',
        // index
        0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
        0x03, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00,
    ]);
}

#[test]
fn wide_heap_offsets_count_bytes() {
    let mut table = StringTable::new(CharacterSet::Utf16Le);
    table.insert(5, "é");
    table.insert(6, "ok");
    let bytes = table.to_bytes().unwrap();

    let list = GroupList::from_bytes(&bytes).unwrap();
    assert_eq!(list.heap, [0x01, 0x00, 0xE9, 0x00, 0x02, 0x00, b'o', 0x00, b'k', 0x00]);
    let offsets: Vec<&[u8]> = list.entries().map(|e| &e[..4]).collect();
    assert_eq!(offsets, [&[0, 0, 0, 0][..], &[4, 0, 0, 0][..]]);
}

#[test]
fn round_trip_both_character_sets() {
    for charset in [CharacterSet::Ansi, CharacterSet::Utf16Le] {
        let mut table = StringTable::new(charset);
        table.insert(10, "Ready");
        table.insert(3, "");
        table.insert(0x8000_0001, "Café");

        let back = StringTable::from_bytes(&table.to_bytes().unwrap()).unwrap();
        assert_eq!(back, table);
        assert_eq!(back.get(0x8000_0001), Some("Café"));
    }
}

#[test]
fn wide_tables_hold_non_latin_text() {
    let mut table = StringTable::new(CharacterSet::Utf16Le);
    table.insert(1, "日本語");
    let back = StringTable::from_bytes(&table.to_bytes().unwrap()).unwrap();
    assert_eq!(back.get(1), Some("日本語"));

    let mut table = StringTable::new(CharacterSet::Ansi);
    table.insert(1, "日本語");
    assert!(matches!(table.to_bytes(), Err(StringTableError::Codec(_))));
}

#[test]
fn iteration_is_insertion_order() {
    let mut table = ansi_table();
    table.insert(0, "zero");
    assert_eq!(table.insert(1, "hello"), Some("hi".to_string()));

    let ids: Vec<u32> = table.iter().map(|(id, _)| id).collect();
    assert_eq!(ids, [1, 2, 0]);
    assert_eq!(table.remove(2), Some("yo!".to_string()));
    assert!(!table.contains(2));
    assert_eq!(table.len(), 2);
}

#[test]
fn empty_table() {
    let table = StringTable::new(CharacterSet::Ansi);
    let bytes = table.to_bytes().unwrap();
    assert_eq!(bytes.len(), 20);
    assert!(StringTable::from_bytes(&bytes).unwrap().is_empty());
}

#[test]
fn sentinel_is_required() {
    let mut bytes = ansi_table().to_bytes().unwrap();
    bytes[16..20].copy_from_slice(&[0, 0, 0, 0]);
    let err = StringTable::from_bytes(&bytes).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"unsupported list format: list sentinel is 0x0, expected 0xffffffff");
}

#[test]
fn other_entry_widths_are_unsupported() {
    let bytes =
        crate::group::encode_group(Default::default(), CharacterSet::Ansi, 12, &[], &[0; 24])
            .unwrap();
    assert_eq!(GroupList::from_bytes(&bytes).unwrap().len(), 2);

    let err = StringTable::from_bytes(&bytes).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"unsupported list format: 12-byte list entries, string tables use 8");
}

#[test]
fn unsupported_character_sets() {
    let mut bytes = ansi_table().to_bytes().unwrap();
    bytes[2..4].copy_from_slice(&0x0202u16.to_le_bytes());
    let err = StringTable::from_bytes(&bytes).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"unsupported string table: Macintosh character set is not supported");

    bytes[0..2].copy_from_slice(&0x0100u16.to_le_bytes());
    let err = StringTable::from_bytes(&bytes).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"unsupported string table: big-endian data is not supported");
}

#[test]
fn heap_offset_out_of_range() {
    let mut bytes = ansi_table().to_bytes().unwrap();
    let index = bytes.len() - 8;
    bytes[index..index + 4].copy_from_slice(&9u32.to_le_bytes());
    let err = StringTable::from_bytes(&bytes).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"string heap truncated: expected 0x9 bytes, got 0x7");
}

#[test]
fn string_past_heap_end() {
    let mut bytes = ansi_table().to_bytes().unwrap();
    // second string claims 9 characters
    bytes[20 + 3] = 9;
    let err = StringTable::from_bytes(&bytes).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"string data truncated: expected 0x9 bytes, got 0x3");
}

#[test]
fn declared_heap_must_fit() {
    let mut bytes = ansi_table().to_bytes().unwrap();
    bytes[12..16].copy_from_slice(&0x1000u32.to_le_bytes());
    let err = StringTable::from_bytes(&bytes).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"list heap truncated: expected 0x1000 bytes, got 0x17");
}

#[test]
fn serde_keeps_order() {
    let mut table = StringTable::new(CharacterSet::Utf16Le);
    table.insert(9, "nine");
    table.insert(1, "one");

    let json = serde_json::to_string(&table).unwrap();
    assert_eq!(
        json,
        r#"{"character_set":"Utf16Le","strings":{"9":"nine","1":"one"}}"#
    );
    let back: StringTable = serde_json::from_str(&json).unwrap();
    assert_eq!(back, table);
}
