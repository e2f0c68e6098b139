//! Session loop
//!
//! Drives the dispatcher from a line-oriented input (interactive mode) or a
//! single query (one-shot mode) and writes rendered reports to an output.

use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::backends::SearchBackend;
use crate::core::model::SearchQuery;
use crate::core::render::Renderer;
use crate::flows::search::Dispatcher;

/// Inputs that end an interactive session (case-sensitive)
pub const EXIT_TOKENS: [&str; 3] = ["quit", "exit", "q"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingInput,
    Dispatching,
    Terminated,
}

/// What a line of input asks the session to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Exit,
    Skip,
    Query(SearchQuery),
}

/// Classify one line of input; `None` is end of input
pub fn classify(line: Option<&str>) -> Input {
    let Some(line) = line else {
        return Input::Exit;
    };

    let trimmed = line.trim();
    if EXIT_TOKENS.contains(&trimmed) {
        return Input::Exit;
    }

    match SearchQuery::new(trimmed) {
        Some(query) => Input::Query(query),
        None => Input::Skip,
    }
}

pub struct Session<'a, B, W> {
    dispatcher: &'a Dispatcher<B>,
    renderer: &'a Renderer,
    output: W,
    state: SessionState,
    dispatches: usize,
}

impl<'a, B: SearchBackend, W: Write> Session<'a, B, W> {
    pub fn new(dispatcher: &'a Dispatcher<B>, renderer: &'a Renderer, output: W) -> Self {
        Self {
            dispatcher,
            renderer,
            output,
            state: SessionState::AwaitingInput,
            dispatches: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Number of queries dispatched so far
    pub fn dispatches(&self) -> usize {
        self.dispatches
    }

    /// Dispatch exactly one query, then terminate
    pub fn run_one_shot(&mut self, query: &SearchQuery) -> io::Result<()> {
        self.dispatch(query)?;
        self.terminate()
    }

    /// Read queries until an exit token or end of input
    pub fn run_interactive<R: BufRead>(&mut self, mut input: R) -> io::Result<()> {
        while self.state == SessionState::AwaitingInput {
            let prompt = self.renderer.prompt();
            if let Some(prompt) = prompt {
                write!(self.output, "{}", prompt)?;
                self.output.flush()?;
            }

            // Bytes, not `read_line`: a non-UTF-8 line must not end the session
            let mut buf = Vec::new();
            let read = input.read_until(b'\n', &mut buf)?;
            if read == 0 && prompt.is_some() {
                // Finish the prompt line when input ends without a newline
                writeln!(self.output)?;
            }
            let line = String::from_utf8_lossy(&buf);

            match classify((read > 0).then_some(line.as_ref())) {
                Input::Exit => self.terminate()?,
                Input::Skip => continue,
                Input::Query(query) => self.dispatch(&query)?,
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, query: &SearchQuery) -> io::Result<()> {
        self.state = SessionState::Dispatching;
        let report = self.dispatcher.dispatch(query);
        self.dispatches += 1;
        debug!(
            query = %query,
            commits = report.history.outcome.items().len(),
            files = report.files.outcome.items().len(),
            failed = report.failed_stages(),
            "query finished"
        );

        writeln!(self.output, "{}", self.renderer.render_report(&report))?;
        self.output.flush()?;
        self.state = SessionState::AwaitingInput;
        Ok(())
    }

    fn terminate(&mut self) -> io::Result<()> {
        self.state = SessionState::Terminated;
        if let Some(farewell) = self.renderer.farewell() {
            writeln!(self.output, "{}", farewell)?;
        }
        self.output.flush()
    }
}
