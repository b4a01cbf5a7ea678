//! Device capability contracts consumed by actions
//!
//! The engine only depends on these narrow traits. Hosts plug in the real
//! speech recognition, media playback and text output subsystems.

use crate::Continuation;

/// Speech recognition subsystem
pub trait Recognition {
    /// Whether a recognition session is currently listening
    fn is_active(&self) -> bool;

    /// Start listening; results come back to the host as facts
    fn start(&mut self);

    /// Cancel the current recognition session, if any
    fn cancel(&mut self);
}

/// Media playback subsystem
pub trait Playback {
    /// Whether something is currently playing
    fn is_active(&self) -> bool;

    /// Stop the current playback, if any
    fn stop(&mut self);

    /// Play a media reference and resume `on_finish` when playback ends
    ///
    /// With `auto_continue` the firing goes on as soon as the media ends. Without
    /// it the player keeps the continuation until the user dismisses the media
    /// (or [`Playback::stop`] is called), so the next action waits for them.
    /// Either way `on_finish` is resumed exactly once.
    fn play(&mut self, reference: &str, auto_continue: bool, on_finish: Continuation);
}

/// Text output (speech synthesis and on-screen text)
///
/// Both calls are synchronous from the engine's point of view.
pub trait Announcer {
    /// Speak a text
    fn announce(&mut self, text: &str);

    /// Show a text
    fn pretty_print(&mut self, text: &str);
}

/// Recognition stand-in for hosts without a recognizer
#[derive(Debug, Default)]
pub struct NullRecognition;

impl Recognition for NullRecognition {
    fn is_active(&self) -> bool {
        false
    }

    fn start(&mut self) {}

    fn cancel(&mut self) {}
}

/// Playback stand-in that finishes immediately, whatever `auto_continue` says
#[derive(Debug, Default)]
pub struct NullPlayback;

impl Playback for NullPlayback {
    fn is_active(&self) -> bool {
        false
    }

    fn stop(&mut self) {}

    fn play(&mut self, reference: &str, _auto_continue: bool, on_finish: Continuation) {
        tracing::debug!(reference, "no playback device, skipping media");
        on_finish.resume();
    }
}

/// Announcer that only traces the texts
#[derive(Debug, Default)]
pub struct NullAnnouncer;

impl Announcer for NullAnnouncer {
    fn announce(&mut self, text: &str) {
        tracing::info!(text, "announce");
    }

    fn pretty_print(&mut self, text: &str) {
        tracing::info!(text, "print");
    }
}

/// The device bundle owned by the engine
pub struct Devices {
    pub recognition: Box<dyn Recognition>,
    pub playback: Box<dyn Playback>,
    pub announcer: Box<dyn Announcer>,
}

impl Devices {
    /// Create a bundle from concrete devices
    pub fn new(
        recognition: impl Recognition + 'static,
        playback: impl Playback + 'static,
        announcer: impl Announcer + 'static,
    ) -> Self {
        Self {
            recognition: Box::new(recognition),
            playback: Box::new(playback),
            announcer: Box::new(announcer),
        }
    }
}

impl Default for Devices {
    fn default() -> Self {
        Self::new(NullRecognition, NullPlayback, NullAnnouncer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Completion, FiringId};
    use std::sync::mpsc;

    #[test]
    fn test_null_playback_finishes_immediately() {
        let (tx, rx) = mpsc::channel();
        let k = Continuation::new(
            Completion {
                firing: FiringId::new(1),
                step: 2,
            },
            tx,
        );

        let mut devices = Devices::default();
        assert!(!devices.playback.is_active());
        devices.playback.play("intro.mp3", true, k);

        assert_eq!(rx.try_recv().map(|c| c.step).ok(), Some(2));
    }
}
