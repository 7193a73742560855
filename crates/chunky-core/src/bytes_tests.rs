use crate::{ByteReader, Error, Tag, U24_MAX, pack_u24, unpack_u24};

#[test]
fn reads_little_endian_fields_in_order() {
    let bytes = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A];
    let mut reader = ByteReader::new(&bytes, "test");

    assert_eq!(reader.u8().unwrap(), 0x01);
    assert_eq!(reader.u16().unwrap(), 0x0302);
    assert_eq!(reader.u24().unwrap(), 0x060504);
    assert_eq!(reader.u32().unwrap(), 0x0A090807);
    assert!(reader.is_empty());
}

#[test]
fn short_read_names_structure_and_sizes() {
    let bytes = [0u8; 6];
    let mut reader = ByteReader::new(&bytes, "index header");
    reader.skip(4).unwrap();

    let err = reader.u32().unwrap_err();
    assert_eq!(
        err,
        Error::Truncated {
            what: "index header",
            expected: 4,
            actual: 2,
        }
    );
    // A failed read does not advance.
    assert_eq!(reader.position(), 4);
}

#[test]
fn context_renames_later_errors() {
    let mut reader = ByteReader::new(&[], "first");
    reader.context("second");
    insta::assert_snapshot!(reader.u8().unwrap_err(), @"second truncated: expected 0x1 bytes, got 0x0");
}

#[test]
fn tag_is_read_byte_reversed() {
    let mut reader = ByteReader::new(b"CSLG", "tag");
    assert_eq!(reader.tag().unwrap(), Tag::new("GLSC").unwrap());
}

#[test]
fn u24_pack_and_limits() {
    assert_eq!(pack_u24(0x123456).unwrap(), [0x56, 0x34, 0x12]);
    assert_eq!(unpack_u24([0x56, 0x34, 0x12]), 0x123456);
    assert_eq!(pack_u24(U24_MAX).unwrap(), [0xFF, 0xFF, 0xFF]);
    assert!(matches!(
        pack_u24(U24_MAX + 1),
        Err(Error::Overflow { bits: 24, .. })
    ));
}
