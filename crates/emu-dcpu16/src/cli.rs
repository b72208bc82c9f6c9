//! Argument parsing and the runner's own error type. No `clap`/`anyhow`,
//! matching this workspace's other command-line runners.

use std::fmt;

#[derive(Debug)]
pub enum CliError {
    BadArguments,
    Io(String),
    Preprocess(String),
    Assemble(String),
    Image(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::BadArguments => write!(
                f,
                "bad arguments\n\
                 usage: emu-dcpu16 <program.dasm>\n\
                 usage: emu-dcpu16 -pp <in.dasm> <out.dasm>\n\
                 usage: emu-dcpu16 -cvf <font.png> <out.dasm>"
            ),
            CliError::Io(msg) => write!(f, "I/O error: {msg}"),
            CliError::Preprocess(msg) => write!(f, "preprocessor error: {msg}"),
            CliError::Assemble(msg) => write!(f, "assembler error: {msg}"),
            CliError::Image(msg) => write!(f, "image error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}

pub enum Command {
    Run { program: String },
    Preprocess { input: String, output: String },
    ConvertFont { image: String, output: String },
}

pub fn parse_args(args: &[String]) -> Result<Command, CliError> {
    match args {
        [_, program] => Ok(Command::Run {
            program: program.clone(),
        }),
        [_, flag, input, output] if flag == "-pp" => Ok(Command::Preprocess {
            input: input.clone(),
            output: output.clone(),
        }),
        [_, flag, image, output] if flag == "-cvf" => Ok(Command::ConvertFont {
            image: image.clone(),
            output: output.clone(),
        }),
        _ => Err(CliError::BadArguments),
    }
}
