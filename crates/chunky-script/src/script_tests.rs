use chunky_core::{CharacterSet, Endianness, Version};

use crate::{Instruction, Script, ScriptError, assemble, disassemble};

/// Push `$L_0002`, then `Go`.
#[rustfmt::skip]
const LOOP: [u8; 28] = [
    0x01, 0x00, 0x03, 0x03,
    0x04, 0x00, 0x00, 0x00,
    0x04, 0x00, 0x00, 0x00,
    0x1D, 0x10, 0x1D, 0x10,
    // 2: push
    0x00, 0x00, 0x01, 0x00,
    0x01, 0x00, 0x00, 0xCC,
    // 4: Go
    0x2A, 0x01, 0x00, 0x00,
];

fn loop_script() -> Script {
    let mut script = Script::new();
    script.instructions = vec![
        Instruction::push(vec![0xCC00_0001]),
        Instruction::new(0x12A),
    ];
    script.assign_addresses();
    script
}

#[test]
fn layout() {
    assert_eq!(assemble(&loop_script()).unwrap(), LOOP);
}

#[test]
fn disassemble_numbers_words_from_two() {
    let script = disassemble(&LOOP).unwrap();
    assert_eq!(script, loop_script());
    assert_eq!(script.endianness, Endianness::Little);
    assert_eq!(script.character_set, CharacterSet::Ansi);
    assert_eq!(script.compiler_version, Version::new(0x1D, 0x10));

    let addresses: Vec<u32> = script.instructions.iter().map(|i| i.address).collect();
    assert_eq!(addresses, [2, 4]);
    assert_eq!(script.last_address(), Some(4));
    assert_eq!(script.body_size(), 4);
}

#[test]
fn variable_instructions_take_two_words() {
    let mut script = Script::new();
    script.instructions = vec![
        Instruction::new(0x03).with_variable("siiLoop"),
        Instruction::push(vec![7, 8]),
        Instruction::new(0x12B),
    ];
    script.assign_addresses();

    let addresses: Vec<u32> = script.instructions.iter().map(|i| i.address).collect();
    assert_eq!(addresses, [2, 4, 7]);

    let bytes = script.to_bytes().unwrap();
    assert_eq!(bytes.len(), 16 + 4 * 6);
    assert_eq!(bytes[8..12], [7, 0, 0, 0]);
    assert_eq!(Script::from_bytes(&bytes).unwrap(), script);
}

#[test]
fn empty_script() {
    let bytes = assemble(&Script::new()).unwrap();
    assert_eq!(bytes.len(), 16);
    assert_eq!(bytes[8..12], [1, 0, 0, 0]);

    let script = disassemble(&bytes).unwrap();
    assert!(script.instructions.is_empty());
    assert_eq!(script.last_address(), None);
}

#[test]
fn compiler_version_is_written_twice() {
    let mut script = Script::new();
    script.compiler_version = Version::new(3, 7);
    let bytes = assemble(&script).unwrap();
    assert_eq!(bytes[12..16], [3, 7, 3, 7]);
}

#[test]
fn body_shorter_than_declared() {
    let err = disassemble(&LOOP[..24]).unwrap_err();
    assert_eq!(
        err,
        ScriptError::Truncated {
            what: "script body",
            expected: 12,
            actual: 8,
        }
    );
}

#[test]
fn body_ends_inside_an_instruction() {
    #[rustfmt::skip]
    let bytes = [
        0x01, 0x00, 0x03, 0x03,
        0x04, 0x00, 0x00, 0x00,
        0x02, 0x00, 0x00, 0x00,
        0x1D, 0x10, 0x1D, 0x10,
        // `Add` with one parameter, only the first word inside the body.
        0x00, 0x01, 0x01, 0x00,
        0x05, 0x00, 0x00, 0x00,
        0xAA, 0xAA, 0xAA, 0xAA,
    ];
    let err = disassemble(&bytes).unwrap_err();
    assert_eq!(
        err,
        ScriptError::Truncated {
            what: "instruction parameters",
            expected: 4,
            actual: 0,
        }
    );
}

#[test]
fn truncated_header() {
    let err = disassemble(&LOOP[..10]).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"script header truncated: expected 0x4 bytes, got 0x2");
}

#[test]
fn bytes_past_the_body_are_ignored() {
    let mut bytes = LOOP.to_vec();
    bytes.extend_from_slice(&[0xAA; 4]);
    assert_eq!(disassemble(&bytes).unwrap(), loop_script());
}

#[test]
fn big_endian_is_rejected() {
    let mut bytes = LOOP;
    bytes[..2].copy_from_slice(&[0x00, 0x01]);
    let err = disassemble(&bytes).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"unsupported script: big-endian data is not supported");

    let mut script = loop_script();
    script.endianness = Endianness::Big;
    assert!(matches!(assemble(&script), Err(ScriptError::Unsupported(_))));
}

#[test]
fn serializes_to_json() {
    let script = disassemble(&LOOP).unwrap();
    let json = serde_json::to_string(&script.instructions[0]).unwrap();
    insta::assert_snapshot!(json, @r#"{"opcode":0,"variable":null,"params":[3422552065],"address":2}"#);
}
