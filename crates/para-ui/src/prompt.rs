//! Interactive prompts.
//!
//! Prompts are asynchronous so that a pending read never blocks the runtime
//! and a cancellation signal stays observable while waiting for the user.

use crate::Style;
use async_trait::async_trait;
use para_core::Failure;
use para_core::env::is_ci;
use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::Mutex;

/// Source of answers to interactive questions.
#[async_trait]
pub trait Prompter: Send + Sync {
    /// Ask a question and return the answer line without its line ending.
    ///
    /// End of input counts as a cancellation.
    async fn ask(&self, question: &str) -> Result<String, Failure>;

    /// Whether a user can answer questions at all.
    fn is_interactive(&self) -> bool;
}

/// Prompts on stderr and reads answers from stdin.
#[derive(Debug, Clone, Copy)]
pub struct TerminalPrompter {
    interactive: bool,
}

impl TerminalPrompter {
    /// Detect whether prompting is possible.
    ///
    /// Prompting is disabled in CI, when stdin is not a terminal, or when the
    /// user asked for no input.
    pub fn detect(no_input: bool) -> Self {
        Self {
            interactive: !no_input && !is_ci() && atty::is(atty::Stream::Stdin),
        }
    }
}

#[async_trait]
impl Prompter for TerminalPrompter {
    async fn ask(&self, question: &str) -> Result<String, Failure> {
        let question = question.to_string();
        tokio::task::spawn_blocking(move || read_answer(&question))
            .await
            .map_err(|e| Failure::InternalDefect {
                message: "prompt task failed".to_string(),
                source: Some(Box::new(e)),
            })?
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

fn read_answer(question: &str) -> Result<String, Failure> {
    let mut stderr = io::stderr();
    write!(stderr, "{} {}", Style::prompt(">"), question)
        .and_then(|()| stderr.flush())
        .map_err(|e| Failure::collaborator_with("failed to write prompt", e))?;

    let mut input = String::new();
    let read = io::stdin()
        .read_line(&mut input)
        .map_err(|e| Failure::collaborator_with("failed to read input", e))?;
    if read == 0 {
        return Err(Failure::UserCancelled);
    }
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}

/// Answers questions from a fixed script.
///
/// Every question asked is recorded. Once the script runs out, further
/// questions are treated as end of input.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<String>>,
    questions: Mutex<Vec<String>>,
    non_interactive: bool,
}

impl ScriptedPrompter {
    /// Create a prompter that gives the answers in order.
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            questions: Mutex::new(Vec::new()),
            non_interactive: false,
        }
    }

    /// Create a prompter that reports no user is present.
    pub fn non_interactive() -> Self {
        Self {
            non_interactive: true,
            ..Self::default()
        }
    }

    /// Questions asked so far.
    pub fn questions(&self) -> Vec<String> {
        self.questions
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn ask(&self, question: &str) -> Result<String, Failure> {
        if let Ok(mut questions) = self.questions.lock() {
            questions.push(question.to_string());
        }
        self.answers
            .lock()
            .ok()
            .and_then(|mut answers| answers.pop_front())
            .ok_or(Failure::UserCancelled)
    }

    fn is_interactive(&self) -> bool {
        !self.non_interactive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use para_core::FailureKind;

    #[tokio::test]
    async fn test_scripted_answers_in_order() {
        let prompter = ScriptedPrompter::new(["y", "n"]);
        assert_eq!(prompter.ask("first?").await.unwrap(), "y");
        assert_eq!(prompter.ask("second?").await.unwrap(), "n");
        assert_eq!(prompter.questions(), vec!["first?", "second?"]);
    }

    #[tokio::test]
    async fn test_exhausted_script_cancels() {
        let prompter = ScriptedPrompter::new(Vec::<String>::new());
        let err = prompter.ask("anything?").await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::UserCancelled);
    }

    #[test]
    fn test_non_interactive() {
        assert!(!ScriptedPrompter::non_interactive().is_interactive());
        assert!(ScriptedPrompter::new(["y"]).is_interactive());
    }
}
