//! Two-pass DCPU-16 1.7 assembler and its line-oriented preprocessor.

mod assembler;
mod error;
mod operand;
mod preprocessor;

pub use assembler::assemble;
pub use error::{AssembleError, AssembleErrorKind, PreprocessError, PreprocessErrorKind, SourcePos};
pub use operand::{Operand, RegName, Value};
pub use preprocessor::{preprocess, preprocess_file};
