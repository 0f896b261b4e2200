//! Interactive prompt channel backed by a reader and a writer (normally
//! stdin and stdout).

use crate::error::{Error, Result};
use crate::index::FolderIndex;
use crate::resolve::Disambiguator;
use crate::score::ScoredPath;
use crate::store::{IndexChoice, RefreshPolicy};
use colored::Colorize;
use std::io::{self, BufRead, Write};

pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `question` and read one line. End of input is an error.
    pub fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{}", question).map_err(Error::Prompt)?;
        self.output.flush().map_err(Error::Prompt)?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(Error::Prompt)?;
        if read == 0 {
            return Err(Error::Prompt(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed",
            )));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: BufRead, W: Write> Disambiguator for TerminalPrompt<R, W> {
    fn choose(&mut self, ranked: &[ScoredPath]) -> Result<String> {
        writeln!(self.output, "\n{}", "Multiple similar folders found:".yellow().bold())
            .map_err(Error::Prompt)?;
        for (i, candidate) in ranked.iter().enumerate() {
            writeln!(
                self.output,
                "{}. {}  {}",
                (i + 1).to_string().cyan(),
                candidate.path,
                format!("(score={})", candidate.score).dimmed()
            )
            .map_err(Error::Prompt)?;
        }
        self.ask("Select folder number: ")
    }
}

impl<R: BufRead, W: Write> RefreshPolicy for TerminalPrompt<R, W> {
    fn decide(&mut self, existing: &FolderIndex) -> Result<IndexChoice> {
        writeln!(
            self.output,
            "\nCurrently storing {} indexed folder names.",
            existing.len().to_string().cyan()
        )
        .map_err(Error::Prompt)?;
        let answer = self.ask("Use existing index or refresh? (use/refresh): ")?;
        if answer.trim().eq_ignore_ascii_case("refresh") {
            Ok(IndexChoice::Refresh)
        } else {
            Ok(IndexChoice::Reuse)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompt(input: &str) -> TerminalPrompt<Cursor<Vec<u8>>, Vec<u8>> {
        colored::control::set_override(false);
        TerminalPrompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_choose_lists_candidates_and_returns_reply() {
        let mut p = prompt("2\n");
        let ranked = vec![
            ScoredPath { score: 15, path: "/Users/ana/Reports".to_string() },
            ScoredPath { score: 15, path: "/Users/ana/Old/Reports".to_string() },
        ];

        assert_eq!(p.choose(&ranked).unwrap(), "2");

        let (_, out) = p.into_parts();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("1. /Users/ana/Reports  (score=15)"));
        assert!(out.contains("2. /Users/ana/Old/Reports  (score=15)"));
        assert!(out.ends_with("Select folder number: "));
    }

    #[test]
    fn test_refresh_answers() {
        let index = FolderIndex::new();
        assert_eq!(prompt("refresh\n").decide(&index).unwrap(), IndexChoice::Refresh);
        assert_eq!(prompt("REFRESH\r\n").decide(&index).unwrap(), IndexChoice::Refresh);
        assert_eq!(prompt("use\n").decide(&index).unwrap(), IndexChoice::Reuse);
        assert_eq!(prompt("whatever\n").decide(&index).unwrap(), IndexChoice::Reuse);
    }

    #[test]
    fn test_closed_input_is_prompt_error() {
        let err = prompt("").ask("? ").unwrap_err();
        assert!(matches!(err, Error::Prompt(_)));
    }
}
