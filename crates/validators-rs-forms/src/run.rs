//! Accumulating the results of one validation run.

use serde::Serialize;

use crate::dispatch::RuleResult;

/// The lifecycle of a [`ValidationRun`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Created; no rule evaluated yet.
    NotStarted,
    /// Rules are being evaluated.
    Running,
    /// Every rule settled and the outcome was taken.
    Done,
}

/// The aggregate result of a run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ValidationOutcome {
    /// `true` if every evaluated rule passed.
    pub status: bool,
    /// Failure messages in rule declaration order, duplicates kept.
    pub messages: Vec<String>,
}

/// Status and messages of one run, in the making.
///
/// Results may be recorded in any order; messages come out ordered by the
/// declaration index they were recorded under.
#[derive(Debug)]
pub struct ValidationRun {
    state: RunState,
    status: bool,
    messages: Vec<(usize, String)>,
    evaluated: usize,
}

impl Default for ValidationRun {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationRun {
    /// Creates a run in [`RunState::NotStarted`].
    pub const fn new() -> Self {
        Self {
            state: RunState::NotStarted,
            status: true,
            messages: Vec::new(),
            evaluated: 0,
        }
    }

    /// Moves the run to [`RunState::Running`].
    pub fn begin(&mut self) {
        debug_assert_eq!(self.state, RunState::NotStarted, "run started twice");
        self.state = RunState::Running;
    }

    /// Records the result of the rule declared at `index`.
    pub fn record(&mut self, index: usize, result: &RuleResult) {
        debug_assert_eq!(self.state, RunState::Running, "result recorded outside a run");
        self.evaluated += 1;
        if !result.passed {
            self.status = false;
            if let Some(message) = &result.message {
                self.messages.push((index, message.clone()));
            }
        }
    }

    /// Completes the run and returns its outcome.
    pub fn finish(&mut self) -> ValidationOutcome {
        self.state = RunState::Done;
        let mut messages = std::mem::take(&mut self.messages);
        messages.sort_by_key(|(index, _)| *index);
        ValidationOutcome {
            status: self.status,
            messages: messages.into_iter().map(|(_, message)| message).collect(),
        }
    }

    /// The current state.
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// How many results were recorded.
    pub const fn evaluated(&self) -> usize {
        self.evaluated
    }
}
