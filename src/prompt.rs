use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::config::split_list;

/// Line-oriented questions on a reader/writer pair (stdin/stderr in the binary).
pub struct Prompter<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Print `question` and return the trimmed answer. EOF yields "".
    pub fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.writer, "{}", question)?;
        self.writer.flush()?;

        let mut line = String::new();
        self.reader.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    pub fn ask_exclusions(&mut self) -> io::Result<Vec<PathBuf>> {
        let answer =
            self.ask("Enter directories to exclude (comma-separated, leave empty for none): ")?;
        Ok(split_list(&answer))
    }

    pub fn ask_pattern(&mut self) -> io::Result<String> {
        self.ask("Enter the regex pattern to match file names: ")
    }

    pub fn ask_replacement(&mut self) -> io::Result<String> {
        self.ask("Enter the replacement string: ")
    }

    /// Only "Y" or "y" confirms.
    pub fn confirm(&mut self, pattern: &str, replacement: &str) -> io::Result<bool> {
        let answer = self.ask(&format!(
            "Matched files names will change {} to {}. \
             Do you wish to perform file changes? Y/N: ",
            pattern, replacement
        ))?;
        Ok(answer.eq_ignore_ascii_case("y"))
    }
}
