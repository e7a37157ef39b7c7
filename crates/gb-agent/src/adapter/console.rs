use std::io::{BufRead, Stdout, StdinLock, Write};

use crate::error::{AgentError, AgentResult};

use super::{Decision, DecisionAdapter, DecisionContext};

/// Reads picks from a line-based input.
///
/// An empty input stream or `q` cancels the session.
#[derive(Debug)]
pub struct ConsoleAdapter<R, W> {
    input: R,
    output: W,
}

impl ConsoleAdapter<StdinLock<'static>, Stdout> {
    /// Read from stdin, prompt on stdout.
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleAdapter<R, W> {
    /// Read picks from `input` and write prompts to `output`.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Hand back the output, for inspecting prompts.
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> DecisionAdapter for ConsoleAdapter<R, W> {
    fn name(&self) -> &str {
        "human"
    }

    fn decide(&mut self, ctx: &DecisionContext<'_>) -> AgentResult<Decision> {
        if let Some(reason) = ctx.last_rejection {
            writeln!(self.output, "Not allowed: {reason}")?;
        }
        let available = ctx.choice_count();
        write!(self.output, "Choose 1-{available} (q to quit): ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(AgentError::Cancelled);
        }
        let answer = line.trim();
        if answer.eq_ignore_ascii_case("q") || answer.eq_ignore_ascii_case("quit") {
            return Err(AgentError::Cancelled);
        }
        let index: usize = answer
            .parse()
            .map_err(|_| AgentError::InvalidInput(answer.to_string()))?;
        if index == 0 || index > available {
            return Err(AgentError::OutOfRange { index, available });
        }
        Ok(Decision::new(index, "player choice"))
    }
}
