//! Line-oriented preprocessor: expands `#include "path"` one level deep.
//! `#define` is recognized but reserved (a no-op), matching the original
//! implementation's unfinished handling of it.

use std::path::{Path, PathBuf};

use crate::error::{PreprocessError, PreprocessErrorKind, SourcePos};

/// Preprocess `source`, resolving `#include` directives relative to
/// `base_dir` by calling `read_file` for each included path. Splitting the
/// file read out as a callback keeps this testable without a filesystem.
pub fn preprocess(
    source: &str,
    base_dir: &Path,
    read_file: &mut dyn FnMut(&Path) -> std::io::Result<String>,
) -> Result<String, PreprocessError> {
    let mut out = String::new();
    expand(source, base_dir, read_file, &mut out, 1)?;
    Ok(out)
}

fn expand(
    source: &str,
    base_dir: &Path,
    read_file: &mut dyn FnMut(&Path) -> std::io::Result<String>,
    out: &mut String,
    start_line: usize,
) -> Result<(), PreprocessError> {
    for (offset, raw_line) in source.lines().enumerate() {
        let line_no = start_line + offset;
        let trimmed = raw_line.trim_start();
        let indent = raw_line.len() - trimmed.len();
        if let Some(rest) = trimmed.strip_prefix("#include") {
            let path_str = parse_quoted_path(rest).ok_or(PreprocessError {
                pos: SourcePos {
                    line: line_no,
                    column: indent + 1,
                },
                kind: PreprocessErrorKind::IncludeMissingPath,
            })?;
            let full_path = base_dir.join(&path_str);
            let contents = read_file(&full_path).map_err(|_| PreprocessError {
                pos: SourcePos {
                    line: line_no,
                    column: indent + 1,
                },
                kind: PreprocessErrorKind::IncludeNotFound(path_str.clone()),
            })?;
            let included_dir = full_path.parent().map_or_else(
                || base_dir.to_path_buf(),
                std::path::Path::to_path_buf,
            );
            expand(&contents, &included_dir, read_file, out, 1)?;
        } else if trimmed.starts_with("#define") {
            // reserved; emitted as a blank line to keep downstream line
            // numbers meaningful for diagnostics.
        } else {
            out.push_str(raw_line);
            out.push('\n');
        }
    }
    Ok(())
}

fn parse_quoted_path(rest: &str) -> Option<String> {
    let rest = rest.trim_start();
    let rest = rest.strip_prefix('"')?;
    let end = rest.find('"')?;
    Some(rest[..end].to_string())
}

/// Convenience entry point that reads included files straight off disk.
pub fn preprocess_file(path: &Path) -> Result<String, PreprocessError> {
    let source = std::fs::read_to_string(path).map_err(|_| PreprocessError {
        pos: SourcePos { line: 0, column: 0 },
        kind: PreprocessErrorKind::IncludeNotFound(path.display().to_string()),
    })?;
    let base_dir = path.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    preprocess(&source, &base_dir, &mut |p| std::fs::read_to_string(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_ordinary_lines_through_unchanged() {
        let source = "SET A, 1\n:loop\nSET PC, loop\n";
        let out = preprocess(source, Path::new("."), &mut |_| unreachable!()).unwrap();
        assert_eq!(out, source);
    }

    #[test]
    fn inlines_an_included_file() {
        let source = "SET A, 1\n#include \"consts.dasm\"\nSET B, 2\n";
        let out = preprocess(source, Path::new("."), &mut |p| {
            assert_eq!(p, Path::new("./consts.dasm"));
            Ok(":one\nDAT 1\n".to_string())
        })
        .unwrap();
        assert_eq!(out, "SET A, 1\n:one\nDAT 1\nSET B, 2\n");
    }

    #[test]
    fn missing_include_reports_its_line() {
        let source = "SET A, 1\n#include \"missing.dasm\"\n";
        let err = preprocess(source, Path::new("."), &mut |_| {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "nope"))
        })
        .unwrap_err();
        assert_eq!(err.pos.line, 2);
    }

    #[test]
    fn define_is_accepted_but_has_no_effect() {
        let source = "#define FOO 1\nSET A, 1\n";
        let out = preprocess(source, Path::new("."), &mut |_| unreachable!()).unwrap();
        assert_eq!(out, "SET A, 1\n");
    }
}
