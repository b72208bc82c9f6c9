//! Plain hex text memory dumps, written before and after a run so a
//! session can be diffed offline.

use std::io::Write;
use std::path::Path;

use dcpu16::Memory;

const WORDS_PER_LINE: usize = 8;

pub fn dump(path: &Path, memory: &Memory) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    let words = memory.as_slice();
    for (line_index, chunk) in words.chunks(WORDS_PER_LINE).enumerate() {
        write!(file, "{:04x}:", line_index * WORDS_PER_LINE)?;
        for word in chunk {
            write!(file, " {word:04x}")?;
        }
        writeln!(file)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dump_writes_one_line_per_eight_words() {
        let mut mem = Memory::new();
        mem.write(0, 0x1234);
        let dir = std::env::temp_dir().join("dcpu16-dump-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("dump.txt");
        dump(&path, &mem).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("0000: 1234 0000 0000 0000 0000 0000 0000 0000"));
    }
}
