use std::io::{BufRead, Write};

use anyhow::Result;
use rocchio::{DocId, RelevanceJudge, SearchRecord};

/// Judgment collaborator: shows each consumable result and reads a yes/no
/// answer. Generic over reader and writer so tests can drive it with
/// in-memory buffers.
pub struct ConsoleJudge<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsoleJudge<R, W> {
    pub fn new(input: R, output: W) -> ConsoleJudge<R, W> {
        ConsoleJudge { input, output }
    }
}

impl<R: BufRead, W: Write> RelevanceJudge for ConsoleJudge<R, W> {
    fn judge(&mut self, doc_id: DocId, record: &SearchRecord) -> Result<bool> {
        writeln!(self.output, "Result {}", doc_id + 1)?;
        writeln!(self.output, "[")?;
        writeln!(self.output, " URL: {}", record.link)?;
        writeln!(
            self.output,
            " Title: {}",
            record.title.as_deref().unwrap_or("N/A")
        )?;
        writeln!(
            self.output,
            " Summary: {}",
            record.snippet.as_deref().unwrap_or("N/A")
        )?;
        writeln!(self.output, "]")?;
        write!(self.output, "Relevant (y/n): ")?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(is_affirmative(&line))
    }
}

/// Affirmative iff the answer starts with `y` or `Y`.
fn is_affirmative(line: &str) -> bool {
    matches!(line.trim_start().chars().next(), Some('y' | 'Y'))
}
