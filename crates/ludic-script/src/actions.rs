//! Custom actions shared by quiz programs
//!
//! These drive the recognition and playback devices in response to the
//! host's navigation gestures, which arrive as `seek_section` facts.

use ludic_core::{CustomAction, Fact};

/// Fact holding the current section of a question program
pub const QR_SECTION: &str = "QR_section";
/// Fact asking the next section to play
pub const PLAY_NEXT_SECTION: &str = "Play_next_section";
/// Fact holding a navigation request from the host
pub const SEEK_SECTION: &str = "seek_section";
/// Fact asking the host to start recognition
pub const SR_START: &str = "SR_start";
/// Recognized text
pub const SR_TEXT: &str = "SR_text";
/// Recognition failure
pub const SR_ERROR: &str = "SR_error";
/// Recognition aborted by the user
pub const SR_ABORT: &str = "SR_abort";

pub const GO_TO_FIRST: &str = "Go to first";
pub const CANCEL_MEDIA: &str = "Cancel media";
pub const UPDATE_SECTION: &str = "Update QR_section";

/// Restart the program from its first section
///
/// A listening recognizer is cancelled instead; the host reports the abort
/// back as an `SR_abort` fact, which replays the question.
pub fn go_to_first() -> CustomAction {
    CustomAction::new(GO_TO_FIRST, |ctx, _, k| {
        if ctx.recognition().is_active() {
            ctx.recognition().cancel();
        } else {
            ctx.insert(Fact::bool(PLAY_NEXT_SECTION, true));
        }
        k.resume();
    })
}

/// Stop the media player if something is playing
pub fn cancel_media() -> CustomAction {
    CustomAction::new(CANCEL_MEDIA, |ctx, _, k| {
        if ctx.playback().is_active() {
            ctx.playback().stop();
        }
        k.resume();
    })
}

/// Seek back to the first section while the recognizer listens
///
/// Only "previous" (-1) and "current" (-2) are handled, and both require an
/// active recognizer: a -2 seek with the recognizer idle is ignored too.
pub fn update_section() -> CustomAction {
    CustomAction::new(UPDATE_SECTION, |ctx, bindings, k| {
        let seek = bindings.int(SEEK_SECTION).unwrap_or(0);
        if ctx.recognition().is_active() && (seek == -1 || seek == -2) {
            ctx.insert(Fact::int(QR_SECTION, 1));
            ctx.recognition().cancel();
        } else {
            tracing::debug!(seek, "seek ignored");
        }
        k.resume();
    })
    .reading(SEEK_SECTION)
}

/// All actions in this module
pub fn standard_actions() -> Vec<CustomAction> {
    vec![go_to_first(), cancel_media(), update_section()]
}
