//! Hand-rolled error types with source position, in the style of the
//! other format crates in this workspace: no `thiserror`, just `Display`
//! and `std::error::Error`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePos {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssembleErrorKind {
    UnknownMnemonic(String),
    BadOperand(String),
    UndefinedLabel(String),
    DuplicateLabel(String),
    BadNumber(String),
    TooManyDatItems(usize),
    UnexpectedToken(String),
    MissingOperand,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembleError {
    pub pos: SourcePos,
    pub kind: AssembleErrorKind,
}

impl fmt::Display for AssembleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            AssembleErrorKind::UnknownMnemonic(m) => {
                write!(f, "{}: unknown mnemonic '{m}'", self.pos)
            }
            AssembleErrorKind::BadOperand(s) => write!(f, "{}: bad operand '{s}'", self.pos),
            AssembleErrorKind::UndefinedLabel(l) => {
                write!(f, "{}: undefined label '{l}'", self.pos)?;
                if l.eq_ignore_ascii_case("o") {
                    write!(f, " (this is the old name for overflow, maybe you should use EX instead?)")?;
                }
                Ok(())
            }
            AssembleErrorKind::DuplicateLabel(l) => {
                write!(f, "{}: label '{l}' already defined", self.pos)
            }
            AssembleErrorKind::BadNumber(s) => write!(f, "{}: bad number '{s}'", self.pos),
            AssembleErrorKind::TooManyDatItems(n) => {
                write!(f, "{}: DAT has {n} items, max is 256", self.pos)
            }
            AssembleErrorKind::UnexpectedToken(s) => {
                write!(f, "{}: unexpected token '{s}'", self.pos)
            }
            AssembleErrorKind::MissingOperand => write!(f, "{}: missing operand", self.pos),
        }
    }
}

impl std::error::Error for AssembleError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreprocessErrorKind {
    IncludeNotFound(String),
    IncludeMissingPath,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreprocessError {
    pub pos: SourcePos,
    pub kind: PreprocessErrorKind,
}

impl fmt::Display for PreprocessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            PreprocessErrorKind::IncludeNotFound(path) => {
                write!(f, "{}: cannot read included file '{path}'", self.pos)
            }
            PreprocessErrorKind::IncludeMissingPath => {
                write!(f, "{}: #include requires a quoted path", self.pos)
            }
        }
    }
}

impl std::error::Error for PreprocessError {}
