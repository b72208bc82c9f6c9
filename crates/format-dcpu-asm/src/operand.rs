//! Source-level operand grammar: parses one comma-separated operand into
//! an AST node. Encoding that node into a word (and deciding between a
//! short literal and a next-word literal) is `assembler.rs`'s job, since
//! that choice depends on whether the value is known yet.

use crate::error::{AssembleErrorKind, SourcePos};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegName {
    A,
    B,
    C,
    X,
    Y,
    Z,
    I,
    J,
}

impl RegName {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            "X" => Some(Self::X),
            "Y" => Some(Self::Y),
            "Z" => Some(Self::Z),
            "I" => Some(Self::I),
            "J" => Some(Self::J),
            _ => None,
        }
    }

    #[must_use]
    pub fn index(self) -> u8 {
        self as u8
    }
}

/// A value that isn't known to be a plain in-range literal until label
/// resolution: either a literal number or a reference to a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Number(i32),
    Label(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Register(RegName),
    RegisterIndirect(RegName),
    RegisterIndirectOffset(RegName, Value),
    Push,
    Pop,
    Peek,
    Pick(Value),
    Sp,
    Pc,
    Ex,
    Indirect(Value),
    Immediate(Value),
}

pub fn parse_operand(text: &str, pos: &SourcePos) -> Result<Operand, AssembleErrorKind> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AssembleErrorKind::MissingOperand);
    }
    if let Some(inner) = text.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        return parse_indirect(inner.trim(), pos);
    }
    let upper = text.to_ascii_uppercase();
    match upper.as_str() {
        "PUSH" => return Ok(Operand::Push),
        "POP" => return Ok(Operand::Pop),
        "PEEK" => return Ok(Operand::Peek),
        "SP" => return Ok(Operand::Sp),
        "PC" => return Ok(Operand::Pc),
        "EX" => return Ok(Operand::Ex),
        _ => {}
    }
    if let Some(rest) = upper.strip_prefix("PICK") {
        let rest = rest.trim();
        let value = parse_value(rest)?;
        return Ok(Operand::Pick(value));
    }
    if let Some(reg) = RegName::parse(text) {
        return Ok(Operand::Register(reg));
    }
    let value = parse_value(text)?;
    Ok(Operand::Immediate(value))
}

fn parse_indirect(inner: &str, pos: &SourcePos) -> Result<Operand, AssembleErrorKind> {
    if let Some(plus) = inner.find('+') {
        let lhs = inner[..plus].trim();
        let rhs = inner[plus + 1..].trim();
        let lhs_reg = RegName::parse(lhs);
        let rhs_reg = RegName::parse(rhs);
        return match (lhs_reg, rhs_reg) {
            (Some(_), Some(_)) => Err(AssembleErrorKind::BadOperand(format!(
                "[{inner}]: register+register is not allowed"
            ))),
            (Some(reg), None) => Ok(Operand::RegisterIndirectOffset(reg, parse_value(rhs)?)),
            (None, Some(reg)) => Ok(Operand::RegisterIndirectOffset(reg, parse_value(lhs)?)),
            (None, None) => match (parse_value(lhs)?, parse_value(rhs)?) {
                (Value::Number(l), Value::Number(r)) => Ok(Operand::Indirect(Value::Number(l + r))),
                _ => Err(AssembleErrorKind::BadOperand(format!(
                    "[{inner}]: only one side of a label offset may be a label"
                ))),
            },
        };
    }
    let _ = pos;
    if let Some(reg) = RegName::parse(inner) {
        return Ok(Operand::RegisterIndirect(reg));
    }
    Ok(Operand::Indirect(parse_value(inner)?))
}

fn parse_value(text: &str) -> Result<Value, AssembleErrorKind> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AssembleErrorKind::MissingOperand);
    }
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let looks_numeric = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .map_or_else(
            || digits.chars().next().is_some_and(|c| c.is_ascii_digit()),
            |_| true,
        );
    if !looks_numeric {
        return Ok(Value::Label(text.to_string()));
    }
    let magnitude = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        if hex.is_empty() || hex.len() > 4 {
            return Err(AssembleErrorKind::BadNumber(text.to_string()));
        }
        u32::from_str_radix(hex, 16).map_err(|_| AssembleErrorKind::BadNumber(text.to_string()))?
    } else {
        if digits.len() > 5 {
            return Err(AssembleErrorKind::BadNumber(text.to_string()));
        }
        digits
            .parse::<u32>()
            .map_err(|_| AssembleErrorKind::BadNumber(text.to_string()))?
    };
    if magnitude > 0xffff {
        return Err(AssembleErrorKind::BadNumber(text.to_string()));
    }
    let signed = if negative { -(magnitude as i32) } else { magnitude as i32 };
    Ok(Value::Number(signed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos() -> SourcePos {
        SourcePos { line: 1, column: 1 }
    }

    #[test]
    fn parses_bare_register() {
        assert_eq!(parse_operand("A", &pos()), Ok(Operand::Register(RegName::A)));
    }

    #[test]
    fn parses_register_indirect() {
        assert_eq!(
            parse_operand("[J]", &pos()),
            Ok(Operand::RegisterIndirect(RegName::J))
        );
    }

    #[test]
    fn parses_register_plus_offset_either_order() {
        assert_eq!(
            parse_operand("[I+4]", &pos()),
            Ok(Operand::RegisterIndirectOffset(RegName::I, Value::Number(4)))
        );
        assert_eq!(
            parse_operand("[4+I]", &pos()),
            Ok(Operand::RegisterIndirectOffset(RegName::I, Value::Number(4)))
        );
    }

    #[test]
    fn rejects_register_plus_register() {
        assert!(matches!(
            parse_operand("[A+B]", &pos()),
            Err(AssembleErrorKind::BadOperand(_))
        ));
    }

    #[test]
    fn sums_value_plus_value() {
        assert_eq!(
            parse_operand("[5+3]", &pos()),
            Ok(Operand::Indirect(Value::Number(8)))
        );
    }

    #[test]
    fn rejects_label_plus_value() {
        assert!(matches!(
            parse_operand("[loop+3]", &pos()),
            Err(AssembleErrorKind::BadOperand(_))
        ));
    }

    #[test]
    fn parses_negative_decimal_literal() {
        assert_eq!(parse_operand("-5", &pos()), Ok(Operand::Immediate(Value::Number(-5))));
    }

    #[test]
    fn parses_hex_literal() {
        assert_eq!(
            parse_operand("0x1234", &pos()),
            Ok(Operand::Immediate(Value::Number(0x1234)))
        );
    }

    #[test]
    fn parses_label_reference() {
        assert_eq!(
            parse_operand("loop", &pos()),
            Ok(Operand::Immediate(Value::Label("loop".to_string())))
        );
    }

    #[test]
    fn parses_pick_with_offset() {
        assert_eq!(
            parse_operand("PICK 3", &pos()),
            Ok(Operand::Pick(Value::Number(3)))
        );
    }
}
