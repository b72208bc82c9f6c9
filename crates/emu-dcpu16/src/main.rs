mod cli;
mod font_convert;
mod memory_dump;
mod run;

use cli::{Command, CliError};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if let Err(err) = dispatch(&args) {
        eprintln!("E: {err}");
        std::process::exit(-1);
    }
}

fn dispatch(args: &[String]) -> Result<(), CliError> {
    match cli::parse_args(args)? {
        Command::Run { program } => run::run(&program),
        Command::Preprocess { input, output } => preprocess(&input, &output),
        Command::ConvertFont { image, output } => {
            font_convert::convert(std::path::Path::new(&image), std::path::Path::new(&output))
        }
    }
}

fn preprocess(input: &str, output: &str) -> Result<(), CliError> {
    let path = std::path::Path::new(input);
    let source = std::fs::read_to_string(path).map_err(|e| CliError::Io(e.to_string()))?;
    let base_dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
    let result = format_dcpu_asm::preprocess(&source, base_dir, &mut |p| std::fs::read_to_string(p))
        .map_err(|e| CliError::Preprocess(e.to_string()))?;
    std::fs::write(output, result).map_err(|e| CliError::Io(e.to_string()))
}
