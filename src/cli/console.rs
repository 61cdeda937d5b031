//! Line-oriented console I/O
//!
//! Generic over the reader and writer so the shell can be driven from a
//! terminal, a pipe, or a byte buffer in tests.

use std::fmt::Display;
use std::io::{BufRead, Write};

use zeroize::Zeroizing;

use crate::error::{FinanceError, FinanceResult};

/// Prompted input and plain output for the shell
pub struct Console<R, W> {
    input: R,
    output: W,
    /// Read passwords from the terminal without echo
    hide_passwords: bool,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            hide_passwords: false,
        }
    }

    /// Read passwords with `rpassword` instead of from `input`
    ///
    /// Only meaningful when `input` is the process's terminal.
    pub fn with_hidden_passwords(mut self, hide: bool) -> Self {
        self.hide_passwords = hide;
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Write without a trailing newline and flush
    pub fn print(&mut self, text: impl Display) -> FinanceResult<()> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        Ok(())
    }

    pub fn println(&mut self, text: impl Display) -> FinanceResult<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    /// Next input line without its line ending; `None` at end of input
    pub fn read_line(&mut self) -> FinanceResult<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed_len = line.trim_end_matches(|c: char| c == '\r' || c == '\n').len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }

    /// Print `label` and read the answer
    pub fn ask(&mut self, label: &str) -> FinanceResult<String> {
        self.print(label)?;
        self.read_line()?.ok_or_else(input_closed)
    }

    /// Print `label` and read a password into a zeroizing buffer
    pub fn ask_password(&mut self, label: &str) -> FinanceResult<Zeroizing<String>> {
        if self.hide_passwords {
            self.output.flush()?;
            let password = rpassword::prompt_password(label)?;
            return Ok(Zeroizing::new(password));
        }
        self.ask(label).map(Zeroizing::new)
    }
}

fn input_closed() -> FinanceError {
    FinanceError::InvalidInput("input ended before the command was complete".into())
}
