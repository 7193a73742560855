use chunky_core::Tag;
use chunky_file::{ChunkChild, ChunkId, STRING_TABLE_TAG};
use indoc::indoc;

use crate::{AssembleError, Assembly, Instruction, OpcodeTable, assemble_text, disassemble};

const SOURCE: &str = indoc! {r#"
    # greeting loop
    stringtable 1
    string 3 "Hello world"
    script GLSC 0x10

    loop:
        push string:3
        push 'MBMP'
        PushThisVar siiLoop
        push loop
        Go
"#};

fn assemble(source: &str) -> Result<Assembly, AssembleError> {
    assemble_text(source, &OpcodeTable::base())
}

fn error(source: &str) -> String {
    assemble(source).unwrap_err().to_string()
}

fn glsc(number: u32) -> ChunkId {
    ChunkId::new(Tag::new("GLSC").unwrap(), number)
}

#[test]
fn assembles_script_and_strings() {
    let assembly = assemble(SOURCE).unwrap();

    let (strings_id, strings) = assembly.strings.unwrap();
    assert_eq!(strings_id, ChunkId::new(STRING_TABLE_TAG, 1));
    assert_eq!(strings.get(3), Some("Hello world"));
    assert_eq!(strings.len(), 1);

    let (id, script) = assembly.script.unwrap();
    assert_eq!(id, glsc(0x10));
    assert_eq!(
        script.instructions,
        [
            Instruction {
                address: 2,
                ..Instruction::push(vec![0x8000_0003, u32::from_be_bytes(*b"MBMP")])
            },
            Instruction {
                address: 5,
                ..Instruction::new(0x03).with_variable("siiLoop")
            },
            Instruction {
                address: 7,
                ..Instruction::push(vec![0xCC00_0001])
            },
            Instruction {
                address: 9,
                ..Instruction::new(0x12A)
            },
        ]
    );
}

#[test]
fn container_links_script_to_strings() {
    let assembly = assemble(SOURCE).unwrap();
    let container = assembly.to_container().unwrap();
    assert_eq!(container.file_type.to_string(), "ASMX");
    assert_eq!(container.len(), 2);

    let strings_id = ChunkId::new(STRING_TABLE_TAG, 1);
    assert!(container.get(strings_id).unwrap().flags.is_loner());

    let chunk = container.get(glsc(0x10)).unwrap();
    assert!(!chunk.flags.is_loner());
    assert_eq!(chunk.children, [ChunkChild::new(0, strings_id)]);

    let bytes = chunky_file::save(&container).unwrap();
    let loaded = chunky_file::load_bytes(&bytes).unwrap();
    for chunk in &container {
        assert_eq!(loaded.get(chunk.id()), Some(chunk));
    }

    let payload = loaded.get(glsc(0x10)).unwrap().decoded_payload().unwrap();
    let (_, script) = assembly.script.unwrap();
    assert_eq!(disassemble(payload).unwrap(), script);
}

#[test]
fn script_without_strings() {
    let assembly = assemble("script glop 7\nExit\n").unwrap();
    assert!(assembly.strings.is_none());

    let container = assembly.to_container().unwrap();
    let chunk = container.get(ChunkId::new(Tag::new("GLOP").unwrap(), 7)).unwrap();
    assert!(chunk.children.is_empty());
}

#[test]
fn empty_source() {
    let assembly = assemble("\n  # nothing\n").unwrap();
    assert_eq!(assembly, Assembly::default());
    assert!(assembly.to_container().unwrap().is_empty());
}

#[test]
fn labels_share_an_address() {
    let source = indoc! {"
        script GLSC 1
        push 1
        @a: B: Exit
        push a
        push $b
        push @START
        Go
    "};
    let (_, script) = assemble(source).unwrap().script.unwrap();
    assert_eq!(script.instructions[1].address, 4);
    assert_eq!(script.instructions[2].params, [0xCC00_0001; 3]);
}

#[test]
fn label_after_a_push_addresses_the_push() {
    let (_, script) = assemble("script GLSC 1\npush 1\nL:\nGo\npush L\nGo\n")
        .unwrap()
        .script
        .unwrap();
    let layout: Vec<(u32, u16)> = script
        .instructions
        .iter()
        .map(|i| (i.address, i.opcode))
        .collect();
    assert_eq!(layout, [(2, 0), (4, 0x12A), (5, 0), (7, 0x12A)]);
    assert_eq!(script.instructions[2].params, [0xCC00_0001]);
}

#[test]
fn endpush_splits_pushes() {
    let source = indoc! {"
        script GLSC 1
        push 1
        a: push 2
        EndPush
        b: push b
        push a
        Go
    "};
    let (_, script) = assemble(source).unwrap().script.unwrap();
    let params: Vec<&[u32]> = script.instructions.iter().map(|i| i.params.as_slice()).collect();
    assert_eq!(params, [&[1u32, 2][..], &[0xCC00_0004, 0xCC00_0001], &[]]);

    insta::assert_snapshot!(
        error("script GLSC 1\nendpush 1"),
        @"line 2: syntax: endpush"
    );
    insta::assert_snapshot!(error("endpush"), @"line 1: instruction outside of a script");
}

#[test]
fn commands_ignore_case() {
    let (_, script) = assemble("SCRIPT GLSC 1\nPUSH 0X1f\npushthisvar Abc\nOp0x1001\n")
        .unwrap()
        .script
        .unwrap();
    let opcodes: Vec<u16> = script.instructions.iter().map(|i| i.opcode).collect();
    assert_eq!(opcodes, [0, 0x03, 0x1001]);
    assert_eq!(script.instructions[0].params, [0x1F]);
    assert_eq!(script.instructions[1].variable.as_deref(), Some("Abc"));
}

#[test]
fn unquoted_strings_take_the_rest_of_the_line() {
    let source = indoc! {"
        stringtable 2
        string 4 Hello there  # note
        string 5 \"# not a comment\"
    "};
    let (_, strings) = assemble(source).unwrap().strings.unwrap();
    assert_eq!(strings.get(4), Some("Hello there"));
    assert_eq!(strings.get(5), Some("# not a comment"));
}

#[test]
fn errors_carry_line_numbers() {
    let err = assemble("script GLSC 1\nGo\n\nFly\n").unwrap_err();
    assert_eq!(err.kind(), &AssembleError::UnknownMnemonic("Fly".into()));
    insta::assert_snapshot!(err.to_string(), @r#"line 4: unknown mnemonic "Fly""#);
}

#[test]
fn directive_errors() {
    insta::assert_snapshot!(error("Go"), @"line 1: instruction outside of a script");
    insta::assert_snapshot!(error("push 1"), @"line 1: instruction outside of a script");
    insta::assert_snapshot!(
        error("stringtable 1\nstringtable 2"),
        @"line 2: string table is already defined"
    );
    insta::assert_snapshot!(
        error("script GLSC 1\nscript GLOP 2"),
        @"line 2: script is already defined"
    );
    insta::assert_snapshot!(
        error("string 1 \"x\""),
        @"line 1: string outside of a string table"
    );
    insta::assert_snapshot!(
        error("script GLXX 1"),
        @"line 1: script chunks are GLSC or GLOP, not GLXX"
    );
    insta::assert_snapshot!(
        error("script GLSC"),
        @"line 1: syntax: script <GLSC|GLOP> <chunk-number>"
    );
    insta::assert_snapshot!(error("stringtable x"), @r#"line 1: expected a number, found "x""#);
}

#[test]
fn operand_errors() {
    insta::assert_snapshot!(
        error("script GLSC 1\npush 'ABC'"),
        @"line 2: 'ABC' is not four single-byte characters"
    );
    insta::assert_snapshot!(
        error("script GLSC 1\npush 99999999999"),
        @"line 2: number 99999999999 does not fit in 32 bits"
    );
    insta::assert_snapshot!(
        error("script GLSC 1\npush 1 2"),
        @"line 2: syntax: push <number|string:<id>|'TAGS'|label>"
    );
    insta::assert_snapshot!(error("script GLSC 1\npush 1 %"), @r#"line 2: unexpected "%""#);
}

#[test]
fn instruction_errors() {
    insta::assert_snapshot!(
        error("script GLSC 1\nGo x"),
        @"line 2: opcode 0x12a cannot carry a variable name"
    );
    insta::assert_snapshot!(
        error("script GLSC 1\n: Go"),
        @r#"line 2: expected a command, found ":""#
    );
    insta::assert_snapshot!(
        error("script GLSC 1\nx:\nX: Go"),
        @r#"line 3: label "X" is already defined"#
    );
}

#[test]
fn undefined_labels_are_reported_after_the_last_line() {
    let err = assemble("script GLSC 1\npush nowhere\nGo\n").unwrap_err();
    assert_eq!(err, AssembleError::UndefinedLabel("nowhere".into()));
}
