//! Two-pass assembler: builds the word stream with zero placeholders for
//! any operand that references a label, recording where each placeholder
//! lives, then patches them once every label's address is known.

use std::collections::HashMap;

use crate::error::{AssembleError, AssembleErrorKind, SourcePos};
use crate::operand::{parse_operand, Operand, Value};

fn basic_opcode(mnemonic: &str) -> Option<u8> {
    Some(match mnemonic {
        "SET" => 0x01,
        "ADD" => 0x02,
        "SUB" => 0x03,
        "MUL" => 0x04,
        "MLI" => 0x05,
        "DIV" => 0x06,
        "DVI" => 0x07,
        "MOD" => 0x08,
        "MDI" => 0x09,
        "AND" => 0x0a,
        "BOR" => 0x0b,
        "XOR" => 0x0c,
        "SHR" => 0x0d,
        "ASR" => 0x0e,
        "SHL" => 0x0f,
        "IFB" => 0x10,
        "IFC" => 0x11,
        "IFE" => 0x12,
        "IFN" => 0x13,
        "IFG" => 0x14,
        "IFA" => 0x15,
        "IFL" => 0x16,
        "IFU" => 0x17,
        "ADX" => 0x1a,
        "SBX" => 0x1b,
        "STI" => 0x1e,
        "STD" => 0x1f,
        _ => return None,
    })
}

fn special_opcode(mnemonic: &str) -> Option<u8> {
    Some(match mnemonic {
        "JSR" => 0x01,
        "INT" => 0x08,
        "IAG" => 0x09,
        "IAS" => 0x0a,
        "RFI" => 0x0b,
        "IAQ" => 0x0c,
        "HWN" => 0x10,
        "HWQ" => 0x11,
        "HWI" => 0x12,
        _ => return None,
    })
}

/// Either nothing, a word known at encode time, or a word whose value
/// depends on a label this line hasn't resolved yet.
enum ExtraWord {
    None,
    Known(u16),
    Label(String),
}

fn value_to_extra(value: &Value) -> ExtraWord {
    match value {
        Value::Number(n) => ExtraWord::Known(*n as u16),
        Value::Label(l) => ExtraWord::Label(l.clone()),
    }
}

fn encode_operand(op: &Operand, is_a: bool) -> (u8, ExtraWord) {
    match op {
        Operand::Register(r) => (r.index(), ExtraWord::None),
        Operand::RegisterIndirect(r) => (0x08 + r.index(), ExtraWord::None),
        Operand::RegisterIndirectOffset(r, value) => (0x10 + r.index(), value_to_extra(value)),
        // PUSH and POP are just two names for 0x18; which one it means is
        // determined purely by field position at runtime (A = POP, B =
        // PUSH), not by which keyword the programmer wrote.
        Operand::Push | Operand::Pop => (0x18, ExtraWord::None),
        Operand::Peek => (0x19, ExtraWord::None),
        Operand::Pick(value) => (0x1a, value_to_extra(value)),
        Operand::Sp => (0x1b, ExtraWord::None),
        Operand::Pc => (0x1c, ExtraWord::None),
        Operand::Ex => (0x1d, ExtraWord::None),
        Operand::Indirect(value) => (0x1e, value_to_extra(value)),
        Operand::Immediate(Value::Number(n)) => {
            if is_a && (-1..=30).contains(n) {
                ((0x21 + n) as u8, ExtraWord::None)
            } else {
                (0x1f, ExtraWord::Known(*n as u16))
            }
        }
        Operand::Immediate(Value::Label(l)) => (0x1f, ExtraWord::Label(l.clone())),
    }
}

struct Line<'a> {
    label: Option<&'a str>,
    mnemonic: Option<&'a str>,
    operand_text: &'a str,
    pos: SourcePos,
}

fn split_top_level(s: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut in_quotes = false;
    let mut current = String::new();
    for c in s.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            '[' if !in_quotes => {
                depth += 1;
                current.push(c);
            }
            ']' if !in_quotes => {
                depth -= 1;
                current.push(c);
            }
            c if c == sep && depth == 0 && !in_quotes => {
                parts.push(current.trim().to_string());
                current = String::new();
            }
            c => current.push(c),
        }
    }
    if !current.trim().is_empty() || !parts.is_empty() {
        parts.push(current.trim().to_string());
    }
    parts
}

fn strip_comment(line: &str) -> &str {
    let mut in_quotes = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => return &line[..i],
            _ => {}
        }
    }
    line
}

fn parse_line(raw: &str, line_no: usize) -> Option<Line<'_>> {
    let without_comment = strip_comment(raw);
    let trimmed = without_comment.trim_start();
    let indent = without_comment.len() - trimmed.len();
    let pos = SourcePos {
        line: line_no,
        column: indent + 1,
    };
    let trimmed = trimmed.trim_end();
    if trimmed.is_empty() {
        return None;
    }
    let (label, rest) = if let Some(after_colon) = trimmed.strip_prefix(':') {
        let end = after_colon
            .find(char::is_whitespace)
            .unwrap_or(after_colon.len());
        (Some(&after_colon[..end]), after_colon[end..].trim_start())
    } else {
        (None, trimmed)
    };
    if rest.is_empty() {
        return Some(Line {
            label,
            mnemonic: None,
            operand_text: "",
            pos,
        });
    }
    let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let mnemonic = &rest[..end];
    let operand_text = rest[end..].trim_start();
    Some(Line {
        label,
        mnemonic: Some(mnemonic),
        operand_text,
        pos,
    })
}

const MAX_DAT_ITEMS: usize = 256;

fn parse_dat_item(text: &str, pos: &SourcePos) -> Result<Vec<(u16, Option<String>)>, AssembleError> {
    let text = text.trim();
    if let Some(inner) = text.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        return Ok(inner.chars().map(|c| (c as u16, None)).collect());
    }
    let operand = parse_operand(text, pos).map_err(|kind| AssembleError {
        pos: pos.clone(),
        kind,
    })?;
    match operand {
        Operand::Immediate(Value::Number(n)) => Ok(vec![(n as u16, None)]),
        Operand::Immediate(Value::Label(l)) => Ok(vec![(0, Some(l))]),
        _ => Err(AssembleError {
            pos: pos.clone(),
            kind: AssembleErrorKind::BadOperand(format!("'{text}' is not a valid DAT item")),
        }),
    }
}

/// Assemble DCPU-16 1.7 source into a word image. `source` should already
/// have been run through [`crate::preprocessor::preprocess`].
pub fn assemble(source: &str) -> Result<Vec<u16>, AssembleError> {
    let mut words: Vec<u16> = Vec::new();
    let mut labels: HashMap<String, u16> = HashMap::new();
    let mut patches: Vec<(usize, String, SourcePos)> = Vec::new();

    for (idx, raw_line) in source.lines().enumerate() {
        let line_no = idx + 1;
        let Some(line) = parse_line(raw_line, line_no) else {
            continue;
        };
        if let Some(label) = line.label {
            if labels
                .insert(label.to_string(), words.len() as u16)
                .is_some()
            {
                return Err(AssembleError {
                    pos: line.pos,
                    kind: AssembleErrorKind::DuplicateLabel(label.to_string()),
                });
            }
        }
        let Some(mnemonic) = line.mnemonic else {
            continue;
        };
        let mnemonic_upper = mnemonic.to_ascii_uppercase();

        if mnemonic_upper == "DAT" {
            let items = split_top_level(line.operand_text, ',');
            if items.len() > MAX_DAT_ITEMS {
                return Err(AssembleError {
                    pos: line.pos,
                    kind: AssembleErrorKind::TooManyDatItems(items.len()),
                });
            }
            for item in items {
                for (value, label) in parse_dat_item(&item, &line.pos)? {
                    if let Some(label) = label {
                        patches.push((words.len(), label, line.pos.clone()));
                    }
                    words.push(value);
                }
            }
            continue;
        }

        if let Some(opcode) = basic_opcode(&mnemonic_upper) {
            let operand_strs = split_top_level(line.operand_text, ',');
            if operand_strs.len() != 2 {
                return Err(AssembleError {
                    pos: line.pos,
                    kind: AssembleErrorKind::UnexpectedToken(format!(
                        "{mnemonic} takes exactly two operands"
                    )),
                });
            }
            let b_op = parse_operand(&operand_strs[0], &line.pos).map_err(|kind| AssembleError {
                pos: line.pos.clone(),
                kind,
            })?;
            let a_op = parse_operand(&operand_strs[1], &line.pos).map_err(|kind| AssembleError {
                pos: line.pos.clone(),
                kind,
            })?;
            let (a_code, a_extra) = encode_operand(&a_op, true);
            let (b_code, b_extra) = encode_operand(&b_op, false);
            let instruction = (u16::from(a_code) << 10) | (u16::from(b_code) << 5) | u16::from(opcode);
            words.push(instruction);
            push_extra(&mut words, &mut patches, a_extra, &line.pos);
            push_extra(&mut words, &mut patches, b_extra, &line.pos);
            continue;
        }

        if let Some(special) = special_opcode(&mnemonic_upper) {
            let a_op = if mnemonic_upper == "RFI" && line.operand_text.trim().is_empty() {
                Operand::Immediate(Value::Number(0))
            } else {
                let operand_strs = split_top_level(line.operand_text, ',');
                let Some(first) = operand_strs.first() else {
                    return Err(AssembleError {
                        pos: line.pos,
                        kind: AssembleErrorKind::MissingOperand,
                    });
                };
                parse_operand(first, &line.pos).map_err(|kind| AssembleError {
                    pos: line.pos.clone(),
                    kind,
                })?
            };
            let (a_code, a_extra) = encode_operand(&a_op, true);
            let instruction = (u16::from(a_code) << 10) | (u16::from(special) << 5);
            words.push(instruction);
            push_extra(&mut words, &mut patches, a_extra, &line.pos);
            continue;
        }

        return Err(AssembleError {
            pos: line.pos,
            kind: AssembleErrorKind::UnknownMnemonic(mnemonic.to_string()),
        });
    }

    for (index, label, pos) in patches {
        let Some(&address) = labels.get(&label) else {
            return Err(AssembleError {
                pos,
                kind: AssembleErrorKind::UndefinedLabel(label),
            });
        };
        words[index] = address;
    }

    Ok(words)
}

fn push_extra(
    words: &mut Vec<u16>,
    patches: &mut Vec<(usize, String, SourcePos)>,
    extra: ExtraWord,
    pos: &SourcePos,
) {
    match extra {
        ExtraWord::None => {}
        ExtraWord::Known(value) => words.push(value),
        ExtraWord::Label(label) => {
            patches.push((words.len(), label, pos.clone()));
            words.push(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_a_with_next_word_literal() {
        let words = assemble("SET A, 0x30\n").unwrap();
        assert_eq!(words, vec![0x7c01, 0x0030]);
    }

    #[test]
    fn set_a_with_in_range_literal_omits_the_next_word() {
        let words = assemble("SET A, 5\n").unwrap();
        assert_eq!(words.len(), 1);
        let a_code = (words[0] >> 10) & 0x3f;
        assert_eq!(a_code, 0x21 + 5);
    }

    #[test]
    fn forward_label_reference_resolves_to_its_address() {
        let source = "SET PC, loop\n:loop\nSET A, 1\n";
        let words = assemble(source).unwrap();
        // SET PC, loop: b=PC(0x1c), a=next-word(0x1f) -> two words, loop=2
        assert_eq!(words[0], (0x1fu16 << 10) | (0x1cu16 << 5) | 0x01);
        assert_eq!(words[1], 2);
    }

    #[test]
    fn undefined_label_is_an_error() {
        let err = assemble("SET PC, nowhere\n").unwrap_err();
        assert!(matches!(err.kind, AssembleErrorKind::UndefinedLabel(_)));
    }

    #[test]
    fn dat_mixes_strings_and_numbers() {
        let words = assemble("DAT \"hi\", 0\n").unwrap();
        assert_eq!(words, vec!['h' as u16, 'i' as u16, 0]);
    }

    #[test]
    fn rfi_with_no_operand_encodes_a_zero_literal() {
        let words = assemble("RFI\n").unwrap();
        assert_eq!(words.len(), 1);
        let a_code = (words[0] >> 10) & 0x3f;
        assert_eq!(a_code, 0x21); // short literal 0
    }

    #[test]
    fn duplicate_labels_are_rejected() {
        let err = assemble(":loop\nSET A,1\n:loop\nSET B,2\n").unwrap_err();
        assert!(matches!(err.kind, AssembleErrorKind::DuplicateLabel(_)));
    }

    #[test]
    fn register_indirect_with_offset_either_order() {
        let words = assemble("SET A, [I+1]\n").unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(words[1], 1);
    }

    #[test]
    fn push_and_pop_both_encode_as_0x18_regardless_of_field() {
        let as_dest = assemble("SET PUSH, A\n").unwrap();
        let b_code = (as_dest[0] >> 5) & 0x1f;
        assert_eq!(b_code, 0x18);
        let as_src = assemble("SET A, POP\n").unwrap();
        let a_code = (as_src[0] >> 10) & 0x3f;
        assert_eq!(a_code, 0x18);
    }

    #[test]
    fn undefined_label_named_o_gets_an_ex_hint() {
        let err = assemble("SET PC, o\n").unwrap_err();
        assert!(err.to_string().contains("use EX instead"));
    }
}
