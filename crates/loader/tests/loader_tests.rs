//! Integration tests for the XML program loader.

use ippcode_common::{Mode, Opcode, Operand, ProgramError, Scope, Value};
use ippcode_loader::{load, LoadError};

/// Wrap instruction elements in the standard program envelope.
fn program(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<program language="IPPcode22">{body}</program>"#
    )
}

#[test]
fn empty_program_loads() {
    let program = load(&program("")).unwrap();
    assert!(program.is_empty());
}

#[test]
fn decodes_operands_and_signature() {
    let program = load(&program(
        r#"<instruction order="1" opcode="DEFVAR">
             <arg1 type="var">GF@x</arg1>
           </instruction>
           <instruction order="2" opcode="MOVE">
             <arg1 type="var">GF@x</arg1>
             <arg2 type="int">-7</arg2>
           </instruction>"#,
    ))
    .unwrap();
    assert_eq!(program.len(), 2);
    let mov = program.fetch(1).unwrap();
    assert_eq!(mov.opcode, Opcode::Move);
    assert!(matches!(
        mov.operand(0),
        Some(Operand::Var(v)) if v.scope == Scope::Global && v.name == "x"
    ));
    assert_eq!(mov.operand(1), Some(&Operand::Literal(Value::Int(-7))));
}

#[test]
fn instructions_execute_in_ascending_order() {
    // Document order is 3, 1, 10; execution order must be 1, 3, 10.
    let program = load(&program(
        r#"<instruction order="3" opcode="POPFRAME"/>
           <instruction order="1" opcode="CREATEFRAME"/>
           <instruction order="10" opcode="PUSHFRAME"/>"#,
    ))
    .unwrap();
    assert_eq!(program.fetch(0).unwrap().opcode, Opcode::CreateFrame);
    assert_eq!(program.fetch(1).unwrap().opcode, Opcode::PopFrame);
    assert_eq!(program.fetch(2).unwrap().opcode, Opcode::PushFrame);
}

#[test]
fn operand_document_order_is_irrelevant() {
    let program = load(&program(
        r#"<instruction order="1" opcode="MOVE">
             <arg2 type="string">v</arg2>
             <arg1 type="var">GF@x</arg1>
           </instruction>"#,
    ))
    .unwrap();
    assert!(matches!(
        program.fetch(0).unwrap().operand(0),
        Some(Operand::Var(_))
    ));
}

#[test]
fn string_escapes_are_decoded() {
    let program = load(&program(
        r#"<instruction order="1" opcode="WRITE">
             <arg1 type="string">a\032b\092</arg1>
           </instruction>"#,
    ))
    .unwrap();
    assert_eq!(
        program.fetch(0).unwrap().operand(0),
        Some(&Operand::Literal(Value::Str("a b\\".to_string())))
    );
}

#[test]
fn empty_string_element_is_an_empty_string() {
    let program = load(&program(
        r#"<instruction order="1" opcode="WRITE">
             <arg1 type="string"></arg1>
           </instruction>"#,
    ))
    .unwrap();
    assert_eq!(
        program.fetch(0).unwrap().operand(0),
        Some(&Operand::Literal(Value::Str(String::new())))
    );
}

#[test]
fn float_literals_accept_hex_and_decimal() {
    let program = load(&program(
        r#"<instruction order="1" opcode="PUSHS">
             <arg1 type="float">0x1.4p+1</arg1>
           </instruction>
           <instruction order="2" opcode="PUSHS">
             <arg1 type="float">2.5</arg1>
           </instruction>"#,
    ))
    .unwrap();
    for index in 0..2 {
        assert_eq!(
            program.fetch(index).unwrap().operand(0),
            Some(&Operand::Literal(Value::Float(2.5)))
        );
    }
}

#[test]
fn stack_opcodes_take_no_operands() {
    let program = load(&program(
        r#"<instruction order="1" opcode="ADDS"/>
           <instruction order="2" opcode="JUMPIFEQS">
             <arg1 type="label">end</arg1>
           </instruction>
           <instruction order="3" opcode="LABEL">
             <arg1 type="label">end</arg1>
           </instruction>"#,
    ))
    .unwrap();
    assert_eq!(program.fetch(0).unwrap().opcode, Opcode::Add(Mode::Stack));
    assert_eq!(
        program.fetch(1).unwrap().opcode,
        Opcode::JumpIfEq(Mode::Stack)
    );
}

#[test]
fn malformed_xml_is_error_31() {
    let err = load("<program language=").unwrap_err();
    assert!(matches!(err, LoadError::Malformed(_)));
    assert_eq!(err.exit_code(), 31);
}

#[test]
fn wrong_root_element() {
    let err = load(r#"<code language="IPPcode22"/>"#).unwrap_err();
    assert!(matches!(err, LoadError::UnexpectedRoot(name) if name == "code"));
}

#[test]
fn wrong_language_attribute() {
    for source in [
        r#"<program/>"#,
        r#"<program language="IPPcode21"/>"#,
        r#"<program language="ippcode22"/>"#,
    ] {
        let err = load(source).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedLanguage));
        assert_eq!(err.exit_code(), 32);
    }
}

#[test]
fn unknown_opcode() {
    let err = load(&program(r#"<instruction order="1" opcode="FROBNICATE"/>"#)).unwrap_err();
    assert!(matches!(err, LoadError::UnknownOpcode(ref op) if op == "FROBNICATE"));
    assert_eq!(err.exit_code(), 32);
}

#[test]
fn opcode_is_case_insensitive() {
    let program = load(&program(r#"<instruction order="1" opcode="createFrame"/>"#)).unwrap();
    assert_eq!(program.fetch(0).unwrap().opcode, Opcode::CreateFrame);
}

#[test]
fn orders_must_be_positive() {
    for order in ["0", "-1", "abc", ""] {
        let err = load(&program(&format!(
            r#"<instruction order="{order}" opcode="BREAK"/>"#
        )))
        .unwrap_err();
        assert!(matches!(err, LoadError::InvalidOrder(_)), "order {order}");
    }
}

#[test]
fn duplicate_orders_are_rejected() {
    let err = load(&program(
        r#"<instruction order="2" opcode="BREAK"/>
           <instruction order="2" opcode="BREAK"/>"#,
    ))
    .unwrap_err();
    assert!(matches!(err, LoadError::DuplicateOrder(2)));
}

#[test]
fn operand_arity_is_checked() {
    // Missing arg2, extra arg2, and duplicate arg1.
    for body in [
        r#"<instruction order="1" opcode="MOVE">
             <arg1 type="var">GF@x</arg1>
           </instruction>"#,
        r#"<instruction order="1" opcode="DEFVAR">
             <arg1 type="var">GF@x</arg1>
             <arg2 type="int">1</arg2>
           </instruction>"#,
        r#"<instruction order="1" opcode="PUSHS">
             <arg1 type="int">1</arg1>
             <arg1 type="int">2</arg1>
           </instruction>"#,
    ] {
        let err = load(&program(body)).unwrap_err();
        assert!(matches!(err, LoadError::WrongOperands(_)), "{body}");
    }
}

#[test]
fn var_position_rejects_literals() {
    let err = load(&program(
        r#"<instruction order="1" opcode="DEFVAR">
             <arg1 type="int">1</arg1>
           </instruction>"#,
    ))
    .unwrap_err();
    assert!(matches!(err, LoadError::InvalidOperand { .. }));
}

#[test]
fn bad_literals_are_rejected() {
    for (ty, text) in [
        ("int", "4.2"),
        ("int", "abc"),
        ("bool", "maybe"),
        ("nil", "null"),
        ("float", "xyz"),
        ("widget", "1"),
    ] {
        let err = load(&program(&format!(
            r#"<instruction order="1" opcode="PUSHS">
                 <arg1 type="{ty}">{text}</arg1>
               </instruction>"#
        )))
        .unwrap_err();
        assert!(matches!(err, LoadError::InvalidOperand { .. }), "{ty} {text}");
    }
}

#[test]
fn bad_variable_spellings_are_rejected() {
    for text in ["XF@x", "GF@", "GFx", "gf@x"] {
        let err = load(&program(&format!(
            r#"<instruction order="1" opcode="DEFVAR">
                 <arg1 type="var">{text}</arg1>
               </instruction>"#
        )))
        .unwrap_err();
        assert!(matches!(err, LoadError::InvalidOperand { .. }), "{text}");
    }
}

#[test]
fn stray_elements_are_rejected() {
    for body in [
        r#"<banana/>"#,
        r#"<instruction order="1" opcode="BREAK"><arg4 type="int">1</arg4></instruction>"#,
    ] {
        let err = load(&program(body)).unwrap_err();
        assert!(matches!(err, LoadError::UnexpectedElement(_)), "{body}");
    }
}

#[test]
fn duplicate_label_is_error_52() {
    let err = load(&program(
        r#"<instruction order="1" opcode="LABEL">
             <arg1 type="label">loop</arg1>
           </instruction>
           <instruction order="2" opcode="LABEL">
             <arg1 type="label">loop</arg1>
           </instruction>"#,
    ))
    .unwrap_err();
    assert!(matches!(
        err,
        LoadError::Semantic(ProgramError::DuplicateLabel(ref l)) if l == "loop"
    ));
    assert_eq!(err.exit_code(), 52);
}
