//! Single-use completion signals for actions
//!
//! Every action receives a [`Continuation`] and must resume it exactly once.
//! Resuming consumes the token, so a second resume cannot be expressed. The
//! signal travels through the engine's completion channel, which lets device
//! subsystems resume from another thread; the host then calls
//! `Engine::process_completions` to continue the open firing.

use crate::FiringId;
use std::sync::mpsc::Sender;

/// The signal sent when an action completes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// The firing the action belongs to
    pub firing: FiringId,
    /// Index of the action in its rule's action list
    pub step: usize,
}

/// Token an action resumes to hand control back to the executor
#[must_use = "an action must resume its continuation exactly once"]
#[derive(Debug)]
pub struct Continuation {
    completion: Option<Completion>,
    sender: Sender<Completion>,
}

impl Continuation {
    pub(crate) fn new(completion: Completion, sender: Sender<Completion>) -> Self {
        Self {
            completion: Some(completion),
            sender,
        }
    }

    /// The completion this token will signal
    pub fn completion(&self) -> Option<Completion> {
        self.completion
    }

    /// Signal that the action is finished
    pub fn resume(mut self) {
        if let Some(completion) = self.completion.take() {
            if self.sender.send(completion).is_err() {
                tracing::debug!(
                    firing = %completion.firing,
                    step = completion.step,
                    "engine dropped before completion was delivered"
                );
            }
        }
    }
}

impl Drop for Continuation {
    fn drop(&mut self) {
        if let Some(completion) = self.completion {
            tracing::warn!(
                firing = %completion.firing,
                step = completion.step,
                "continuation dropped without being resumed; firing stays open"
            );
        }
    }
}
