use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};

use crate::agent::{Agent, AgentError, MoveRequest};

/// Shows the board on `output` and reads one line per move from `input`.
pub struct HumanAgent<R, W> {
    name: String,
    input: R,
    output: W,
}

impl HumanAgent<BufReader<Stdin>, Stdout> {
    pub fn stdio(name: impl Into<String>) -> Self {
        Self::new(name, BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> HumanAgent<R, W> {
    pub fn new(name: impl Into<String>, input: R, output: W) -> Self {
        Self {
            name: name.into(),
            input,
            output,
        }
    }

    fn prompt(&mut self, request: &MoveRequest) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "{}", request.diagram)?;
        if !request.history.is_empty() {
            writeln!(self.output, "Moves: {}", request.history)?;
        }
        if let Some(failure) = &request.previous_failure {
            writeln!(self.output, "Not accepted: {failure}")?;
        }
        write!(self.output, "{} to move> ", request.side)?;
        self.output.flush()
    }
}

impl<R: BufRead + Send, W: Write + Send> Agent for HumanAgent<R, W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn propose(&mut self, request: &MoveRequest) -> Result<String, AgentError> {
        self.prompt(request)
            .map_err(|e| AgentError::Unavailable(e.to_string()))?;
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => Err(AgentError::Unavailable("input closed".into())),
            Ok(_) => Ok(line.trim().to_string()),
            Err(e) => Err(AgentError::Unavailable(e.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "human_tests.rs"]
mod human_tests;
