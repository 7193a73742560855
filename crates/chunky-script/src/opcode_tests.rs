use crate::OpcodeTable;

#[test]
fn base_table() {
    let table = OpcodeTable::base();
    assert_eq!(table.len(), 16 + 61);
    assert_eq!(table.get(0x01), Some("PushLocVar"));
    assert_eq!(table.get(0x10), Some("PopRemoteArray"));
    assert_eq!(table.get(0x100), Some("Add"));
    assert_eq!(table.get(0x12A), Some("Go"));
    assert_eq!(table.get(0x13C), Some("CopySubStr"));
    assert_eq!(table.get(0x13D), None);
    assert_eq!(table.get(0), None);
}

#[test]
fn unknown_opcodes_render_as_hex() {
    let table = OpcodeTable::base();
    assert_eq!(table.mnemonic(0x12B), "Exit");
    assert_eq!(table.mnemonic(0x1001), "Op0x1001");
    assert_eq!(OpcodeTable::empty().mnemonic(0x100), "Op0x100");
}

#[test]
fn lookup_ignores_case() {
    let table = OpcodeTable::base();
    assert_eq!(table.lookup("pushthisvar"), Some(0x03));
    assert_eq!(table.lookup("GOZ"), Some(0x128));
    assert_eq!(table.lookup("op0x1001"), Some(0x1001));
    assert_eq!(table.lookup("Op0x12a"), Some(0x12A));
    assert_eq!(table.lookup("Launch"), None);
    assert_eq!(table.lookup("Op0xZZ"), None);
}

#[test]
fn insert_replaces_mnemonic() {
    let mut table = OpcodeTable::base();
    table.insert(0x12A, "Jump");
    assert_eq!(table.get(0x12A), Some("Jump"));
    assert_eq!(table.lookup("jump"), Some(0x12A));
    assert_eq!(table.lookup("go"), None);
    assert_eq!(table.len(), 77);

    table.insert(0x200, "CreateChildThis");
    let last = table.iter().last().unwrap();
    assert_eq!(last, (0x200, "CreateChildThis"));
}
