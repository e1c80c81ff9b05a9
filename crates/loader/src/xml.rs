//! Decoding of the XML program representation.
//!
//! A program is a `<program language="IPPcode22">` root holding
//! `<instruction order=".." opcode="..">` elements, each with up to
//! three `<argN type="..">` operand children. Instructions execute in
//! ascending `order`; orders may be sparse but must be positive and
//! unique.

use std::collections::BTreeMap;

use roxmltree::{Document, Node};

use ippcode_common::{
    hexfloat, ArgKind, Instruction, Opcode, Operand, Program, Scope, Value, VarRef,
};

use crate::error::LoadError;

pub fn load(source: &str) -> Result<Program, LoadError> {
    let doc = Document::parse(source)?;
    let root = doc.root_element();
    if root.tag_name().name() != "program" {
        return Err(LoadError::UnexpectedRoot(root.tag_name().name().to_string()));
    }
    if root.attribute("language") != Some("IPPcode22") {
        return Err(LoadError::UnsupportedLanguage);
    }

    let mut ordered = BTreeMap::new();
    for node in root.children().filter(|n| n.is_element()) {
        if node.tag_name().name() != "instruction" {
            return Err(LoadError::UnexpectedElement(
                node.tag_name().name().to_string(),
            ));
        }
        let (order, instr) = decode_instruction(node)?;
        if ordered.insert(order, instr).is_some() {
            return Err(LoadError::DuplicateOrder(order));
        }
    }

    // BTreeMap iteration yields ascending order.
    Ok(Program::new(ordered.into_values().collect())?)
}

fn decode_instruction(node: Node) -> Result<(i64, Instruction), LoadError> {
    let order_text = node
        .attribute("order")
        .ok_or(LoadError::MissingAttribute("order"))?;
    let order = order_text
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|&o| o >= 1)
        .ok_or_else(|| LoadError::InvalidOrder(order_text.to_string()))?;

    let opcode_text = node
        .attribute("opcode")
        .ok_or(LoadError::MissingAttribute("opcode"))?;
    let opcode = Opcode::from_mnemonic(&opcode_text.trim().to_ascii_uppercase())
        .ok_or_else(|| LoadError::UnknownOpcode(opcode_text.to_string()))?;

    Ok((order, Instruction::new(opcode, decode_operands(opcode, node)?)))
}

/// Collect `arg1..arg3` children, accept them in any document order,
/// and check the result against the opcode's signature.
fn decode_operands(opcode: Opcode, node: Node) -> Result<Vec<Operand>, LoadError> {
    let signature = opcode.signature();
    let mut slots: [Option<Operand>; 3] = [None, None, None];
    let mut count = 0usize;

    for arg in node.children().filter(|n| n.is_element()) {
        let index = match arg.tag_name().name() {
            "arg1" => 0,
            "arg2" => 1,
            "arg3" => 2,
            other => return Err(LoadError::UnexpectedElement(other.to_string())),
        };
        let kind = *signature
            .get(index)
            .ok_or(LoadError::WrongOperands(opcode.mnemonic()))?;
        if slots[index].replace(decode_operand(kind, arg)?).is_some() {
            return Err(LoadError::WrongOperands(opcode.mnemonic()));
        }
        count += 1;
    }

    if count != signature.len() {
        return Err(LoadError::WrongOperands(opcode.mnemonic()));
    }
    Ok(slots.into_iter().flatten().collect())
}

fn decode_operand(kind: ArgKind, arg: Node) -> Result<Operand, LoadError> {
    let ty = arg
        .attribute("type")
        .ok_or(LoadError::MissingAttribute("type"))?;
    let text = arg.text().unwrap_or("");
    let invalid = || LoadError::InvalidOperand {
        kind: ty.to_string(),
        text: text.to_string(),
    };

    match kind {
        ArgKind::Var => {
            if ty != "var" {
                return Err(invalid());
            }
            Ok(Operand::Var(parse_var(text).ok_or_else(invalid)?))
        }
        ArgKind::Symb => match ty {
            "var" => Ok(Operand::Var(parse_var(text).ok_or_else(invalid)?)),
            _ => Ok(Operand::Literal(
                parse_literal(ty, text).ok_or_else(invalid)?,
            )),
        },
        ArgKind::Label => {
            if ty != "label" || text.trim().is_empty() {
                return Err(invalid());
            }
            Ok(Operand::Literal(Value::Label(text.trim().to_string())))
        }
        ArgKind::Type => {
            if ty != "type" {
                return Err(invalid());
            }
            Ok(Operand::Literal(Value::Type(text.trim().to_string())))
        }
    }
}

fn parse_var(text: &str) -> Option<VarRef> {
    let (prefix, name) = text.trim().split_once('@')?;
    if name.is_empty() {
        return None;
    }
    Some(VarRef::new(Scope::from_prefix(prefix)?, name))
}

fn parse_literal(ty: &str, text: &str) -> Option<Value> {
    match ty {
        "int" => text.trim().parse().map(Value::Int).ok(),
        "float" => hexfloat::parse(text).map(Value::Float),
        "bool" => parse_bool(text.trim()).map(Value::Bool),
        // String text is taken verbatim; only escapes are decoded.
        "string" => Some(Value::Str(decode_escapes(text))),
        "nil" => (text.trim() == "nil").then_some(Value::Nil),
        _ => None,
    }
}

/// The accepted boolean spellings, after lower-casing.
fn parse_bool(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "y" | "yes" | "t" | "true" | "on" | "1" => Some(true),
        "n" | "no" | "f" | "false" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Replace each `\ddd` sequence (exactly three decimal digits) with
/// the code point it names. Any other backslash passes through
/// verbatim.
fn decode_escapes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let rest = chars.as_str();
        let code = rest
            .get(..3)
            .filter(|d| d.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|d| d.parse::<u32>().ok())
            .and_then(char::from_u32);
        match code {
            Some(decoded) => {
                out.push(decoded);
                chars = rest[3..].chars();
            }
            None => out.push(c),
        }
    }
    out
}
