//! Vocal multiple-choice question programs
//!
//! A question is spoken (or played, for media URLs), the allowed answers are
//! listed and recognition is requested through `SR_start`. Recognized text
//! arrives as `SR_text` and is checked against one rule per answer; anything
//! else falls through to the unknown-answer rule.

use crate::actions::{
    cancel_media, go_to_first, PLAY_NEXT_SECTION, QR_SECTION, SEEK_SECTION, SR_ABORT, SR_ERROR,
    SR_START, SR_TEXT,
};
use crate::error::{Error, Result};
use crate::loader::Program;
use ludic_core::{Action, Fact, FactKind, HeadAtom, Rule};
use serde::{Deserialize, Serialize};

/// Seek value asking to replay the whole question
pub const SEEK_REPLAY: i64 = -1000;
/// Seek value asking to stop the media player
pub const SEEK_STOP: i64 = 0;

/// One possible answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerDef {
    /// Short letter the player may say instead of the text
    pub letter: String,
    /// Whether this answer is right
    pub correct: bool,
    /// Answer text
    pub text: String,
}

/// Definition of a vocal multiple-choice question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QcmDef {
    /// Question text, or an http(s) URL of a media to play
    pub question: String,
    pub answers: Vec<AnswerDef>,
    /// Accept the answer letter as well as its text
    #[serde(default)]
    pub answer_by_letter: bool,
    /// Spoken after a right answer
    pub success_text: String,
    /// Spoken after a wrong answer
    pub failure_text: String,
}

/// Host texts used by generated programs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub allowed_answers: String,
    pub unknown_answer: String,
    pub not_understood: String,
    pub beginner_help: String,
    pub media_playing: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            allowed_answers: "Les réponses possibles sont".to_string(),
            unknown_answer: "Votre réponse ne fait pas partie de la liste des réponses possibles"
                .to_string(),
            not_understood: "Je n'ai pas reconnu votre réponse".to_string(),
            beginner_help: "C'est une question à reconnaissance vocale".to_string(),
            media_playing: "Lecture du média en cours".to_string(),
        }
    }
}

impl QcmDef {
    /// Whether the question is a media to play rather than a text to speak
    pub fn is_media(&self) -> bool {
        self.question.starts_with("http://") || self.question.starts_with("https://")
    }

    /// Pattern accepted for an answer
    fn answer_pattern(&self, answer: &AnswerDef) -> String {
        let text = regex_lite::escape(&answer.text);
        if self.answer_by_letter && !answer.letter.is_empty() {
            format!("({}|{})", text, regex_lite::escape(&answer.letter))
        } else {
            format!("({})", text)
        }
    }

    /// Generate the program for this question
    pub fn build(&self, messages: &Messages) -> Result<Program> {
        if self.question.is_empty() {
            return Err(Error::MissingField("question".to_string()));
        }
        if self.answers.is_empty() {
            return Err(Error::InvalidSchema("question has no answers".to_string()));
        }
        if self.answers.iter().any(|a| a.text.is_empty()) {
            return Err(Error::InvalidSchema("answer with an empty text".to_string()));
        }

        let mut rules = Vec::new();

        for answer in &self.answers {
            let head = HeadAtom::regex(SR_TEXT, self.answer_pattern(answer))?;
            let rule = if answer.correct {
                Rule::new("Check_right_answer")
                    .when(head)
                    .then(Action::remove(SR_TEXT))
                    .then(Action::announce(&self.success_text))
            } else {
                Rule::new("Check_wrong_answer")
                    .when(head)
                    .then(Action::remove(SR_TEXT))
                    .then(Action::announce(&self.failure_text))
                    .then(Action::add(Fact::bool(SR_START, true)))
            };
            rules.push(rule);
        }

        let mut play = Rule::new("Play_section_1")
            .when(HeadAtom::exact(QR_SECTION, 1i64))
            .when_present(PLAY_NEXT_SECTION, FactKind::Boolean)
            .then(Action::remove(PLAY_NEXT_SECTION))
            .then(Action::add(Fact::int(QR_SECTION, 2)));
        play = if self.is_media() {
            play.then(Action::pretty_print(&messages.media_playing))
                .then(Action::play_media(&self.question, true))
        } else {
            play.then(Action::pretty_print(&self.question))
                .then(Action::announce(&self.question))
        };
        play = play
            .then(Action::announce(&messages.allowed_answers))
            .then_all(self.answers.iter().map(|a| Action::announce(&a.text)))
            .then(Action::announce_help(&messages.beginner_help))
            .then(Action::add(Fact::bool(SR_START, true)))
            .then(Action::add(Fact::bool(PLAY_NEXT_SECTION, true)));
        rules.push(play);

        rules.push(
            Rule::new("Say_unknown_answer")
                .when_present(SR_TEXT, FactKind::Text)
                .then(Action::remove(SR_TEXT))
                .then(Action::announce(&messages.unknown_answer))
                .then(Action::add(Fact::bool(SR_START, true))),
        );
        rules.push(
            Rule::new("Say_unrecognized_answer")
                .when_present(SR_ERROR, FactKind::Text)
                .then(Action::remove(SR_ERROR))
                .then(Action::announce(&messages.not_understood))
                .then(Action::add(Fact::bool(SR_START, true))),
        );
        rules.push(
            Rule::new("Replay_on_SR_abort")
                .when_present(SR_ABORT, FactKind::Text)
                .then(Action::remove(SR_ABORT))
                .then(Action::add(Fact::int(QR_SECTION, 1)))
                .then(Action::add(Fact::bool(PLAY_NEXT_SECTION, true))),
        );
        rules.push(
            Rule::new("Play_section_clear")
                .when(HeadAtom::exact(QR_SECTION, 2i64))
                .when_present(PLAY_NEXT_SECTION, FactKind::Boolean)
                .then(Action::remove(PLAY_NEXT_SECTION))
                .then(Action::remove(QR_SECTION)),
        );

        rules.push(
            Rule::new("RePlay_QR")
                .when(HeadAtom::exact(SEEK_SECTION, SEEK_REPLAY))
                .then(Action::remove(SEEK_SECTION))
                .then(Action::add(Fact::int(QR_SECTION, 1)))
                .then(Action::Custom(go_to_first())),
        );
        // seek_section is consumed here, otherwise the rule would match again
        rules.push(
            Rule::new("Stop_media")
                .when(HeadAtom::exact(SEEK_SECTION, SEEK_STOP))
                .then(Action::remove(SEEK_SECTION))
                .then(Action::Custom(cancel_media())),
        );
        rules.push(
            Rule::new("Play_seek")
                .when_present(SEEK_SECTION, FactKind::Integer)
                .when_present(QR_SECTION, FactKind::Integer)
                .then(Action::remove(SEEK_SECTION))
                .then(Action::Custom(crate::actions::update_section())),
        );

        tracing::debug!(
            rules = rules.len(),
            answers = self.answers.len(),
            "quiz program generated"
        );

        Ok(Program {
            rules,
            facts: vec![Fact::int(QR_SECTION, 1), Fact::bool(PLAY_NEXT_SECTION, true)],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ludic_core::device::{NullPlayback, NullRecognition};
    use ludic_core::{Announcer, Devices, Engine, PumpOutcome, Recognition};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<String>>>;

    struct RecordingAnnouncer(Log);

    impl Announcer for RecordingAnnouncer {
        fn announce(&mut self, text: &str) {
            self.0.lock().unwrap().push(text.to_string());
        }

        fn pretty_print(&mut self, text: &str) {
            self.0.lock().unwrap().push(format!("[{}]", text));
        }
    }

    fn country_quiz(answer_by_letter: bool) -> QcmDef {
        QcmDef {
            question: "Quel est notre pays".to_string(),
            answers: vec![
                AnswerDef {
                    letter: "A".to_string(),
                    correct: true,
                    text: "France".to_string(),
                },
                AnswerDef {
                    letter: "B".to_string(),
                    correct: false,
                    text: "Angleterre".to_string(),
                },
                AnswerDef {
                    letter: "C".to_string(),
                    correct: false,
                    text: "Belgique".to_string(),
                },
            ],
            answer_by_letter,
            success_text: "Bien joué".to_string(),
            failure_text: "Raté".to_string(),
        }
    }

    fn installed(quiz: &QcmDef) -> (Engine, Log) {
        let log = Log::default();
        let mut engine = Engine::new().with_devices(Devices::new(
            NullRecognition,
            NullPlayback,
            RecordingAnnouncer(log.clone()),
        ));
        quiz.build(&Messages::default())
            .unwrap()
            .install(&mut engine)
            .unwrap();
        (engine, log)
    }

    #[test]
    fn test_rule_order() {
        let program = country_quiz(false).build(&Messages::default()).unwrap();
        let labels: Vec<_> = program.rules.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Check_right_answer",
                "Check_wrong_answer",
                "Check_wrong_answer",
                "Play_section_1",
                "Say_unknown_answer",
                "Say_unrecognized_answer",
                "Replay_on_SR_abort",
                "Play_section_clear",
                "RePlay_QR",
                "Stop_media",
                "Play_seek",
            ]
        );
        assert_eq!(
            program.rules[0].to_string(),
            "Check_right_answer @ Regex:SR_text[(France)] --> Remove(SR_text), Announce(Bien joué)"
        );
    }

    #[test]
    fn test_question_is_asked_on_install() {
        let (engine, log) = installed(&country_quiz(false));

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "[Quel est notre pays]",
                "Quel est notre pays",
                "Les réponses possibles sont",
                "France",
                "Angleterre",
                "Belgique",
                "C'est une question à reconnaissance vocale",
            ]
        );
        assert_eq!(engine.store_to_string(), "{ Bool:SR_start(true) }");
    }

    #[test]
    fn test_right_answer() {
        let (mut engine, log) = installed(&country_quiz(false));
        log.lock().unwrap().clear();
        engine.remove(SR_START).unwrap();

        engine.insert(Fact::text(SR_TEXT, "France")).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["Bien joué"]);
        assert!(engine.store().is_empty());
    }

    #[test]
    fn test_wrong_answer_by_letter() {
        let (mut engine, log) = installed(&country_quiz(true));
        log.lock().unwrap().clear();
        engine.remove(SR_START).unwrap();

        engine.insert(Fact::text(SR_TEXT, "B")).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["Raté"]);
        assert_eq!(engine.get(SR_START), Some(Fact::bool(SR_START, true)));
    }

    #[test]
    fn test_letter_refused_when_not_allowed() {
        let (mut engine, log) = installed(&country_quiz(false));
        log.lock().unwrap().clear();

        engine.insert(Fact::text(SR_TEXT, "A")).unwrap();
        assert_eq!(
            *log.lock().unwrap(),
            vec!["Votre réponse ne fait pas partie de la liste des réponses possibles"]
        );
    }

    #[test]
    fn test_abort_replays_question() {
        let (mut engine, log) = installed(&country_quiz(false));
        log.lock().unwrap().clear();

        let outcome = engine.insert(Fact::text(SR_ABORT, "")).unwrap();
        assert_eq!(outcome, PumpOutcome::Quiescent { firings: 3 });
        assert_eq!(log.lock().unwrap()[1], "Quel est notre pays");
    }

    #[test]
    fn test_stop_media_terminates() {
        let (mut engine, _log) = installed(&country_quiz(false));

        let outcome = engine.insert(Fact::int(SEEK_SECTION, SEEK_STOP)).unwrap();
        assert_eq!(outcome, PumpOutcome::Quiescent { firings: 1 });
        assert!(engine.get(SEEK_SECTION).is_none());
    }

    #[test]
    fn test_media_question() {
        let mut quiz = country_quiz(false);
        quiz.question = "https://example.org/question.mp3".to_string();
        let program = quiz.build(&Messages::default()).unwrap();

        let play = &program.rules[3];
        assert!(play
            .actions
            .iter()
            .any(|a| matches!(a, Action::PlayMedia { reference, .. } if reference == &quiz.question)));
    }

    #[test]
    fn test_answer_text_is_literal() {
        let mut quiz = country_quiz(false);
        quiz.answers[0].text = "C++".to_string();
        let (mut engine, log) = installed(&quiz);
        log.lock().unwrap().clear();

        engine.insert(Fact::text(SR_TEXT, "C++")).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["Bien joué"]);
    }

    /// Recognizer whose cancellation the host reports back as `SR_abort`
    struct ReportingRecognition {
        listening: Arc<AtomicBool>,
        aborted: Arc<AtomicBool>,
    }

    impl Recognition for ReportingRecognition {
        fn is_active(&self) -> bool {
            self.listening.load(Ordering::SeqCst)
        }

        fn start(&mut self) {
            self.listening.store(true, Ordering::SeqCst);
        }

        fn cancel(&mut self) {
            self.listening.store(false, Ordering::SeqCst);
            self.aborted.store(true, Ordering::SeqCst);
        }
    }

    struct ListeningHost {
        engine: Engine,
        log: Log,
        listening: Arc<AtomicBool>,
        aborted: Arc<AtomicBool>,
    }

    impl ListeningHost {
        fn new(quiz: &QcmDef) -> Self {
            let log = Log::default();
            let listening = Arc::new(AtomicBool::new(false));
            let aborted = Arc::new(AtomicBool::new(false));
            let mut engine = Engine::new().with_devices(Devices::new(
                ReportingRecognition {
                    listening: listening.clone(),
                    aborted: aborted.clone(),
                },
                NullPlayback,
                RecordingAnnouncer(log.clone()),
            ));
            engine
                .register_system_rule(
                    Rule::new("Start_recognition")
                        .when_present(SR_START, FactKind::Boolean)
                        .then(Action::remove(SR_START))
                        .then(Action::custom("Start recognition", |ctx, _, k| {
                            ctx.recognition().start();
                            k.resume();
                        })),
                )
                .unwrap();
            quiz.build(&Messages::default())
                .unwrap()
                .install(&mut engine)
                .unwrap();

            Self {
                engine,
                log,
                listening,
                aborted,
            }
        }

        /// Insert a fact, then report a cancelled recognition if there was one
        fn send(&mut self, fact: Fact) {
            self.engine.insert(fact).unwrap();
            if self.aborted.swap(false, Ordering::SeqCst) {
                self.engine.insert(Fact::text(SR_ABORT, "")).unwrap();
            }
        }

        fn question_count(&self) -> usize {
            self.log
                .lock()
                .unwrap()
                .iter()
                .filter(|line| *line == "Quel est notre pays")
                .count()
        }
    }

    #[test]
    fn test_replay_gesture_asks_again() {
        let mut host = ListeningHost::new(&country_quiz(false));
        assert!(host.listening.load(Ordering::SeqCst));
        assert_eq!(host.question_count(), 1);

        host.send(Fact::int(SEEK_SECTION, SEEK_REPLAY));
        assert_eq!(host.question_count(), 2);
        assert!(host.listening.load(Ordering::SeqCst));
        assert!(host.engine.store().is_empty());

        host.send(Fact::text(SR_TEXT, "France"));
        assert_eq!(host.log.lock().unwrap().last().map(String::as_str), Some("Bien joué"));
    }

    #[test]
    fn test_seek_previous_asks_again() {
        let mut host = ListeningHost::new(&country_quiz(false));

        // QR_section is cleared once the question is asked; the host restores it
        host.engine.insert(Fact::int(QR_SECTION, 2)).unwrap();
        host.send(Fact::int(SEEK_SECTION, -1));
        assert_eq!(host.question_count(), 2);
        assert!(host.listening.load(Ordering::SeqCst));
    }

    #[test]
    fn test_invalid_definitions() {
        let mut quiz = country_quiz(false);
        quiz.answers.clear();
        assert!(matches!(
            quiz.build(&Messages::default()),
            Err(Error::InvalidSchema(_))
        ));

        let mut quiz = country_quiz(false);
        quiz.question.clear();
        assert!(matches!(
            quiz.build(&Messages::default()),
            Err(Error::MissingField(_))
        ));
    }
}
