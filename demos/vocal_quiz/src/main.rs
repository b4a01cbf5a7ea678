//! Vocal Quiz
//!
//! A console rendition of a vocal multiple-choice question.
//! - The question is loaded from a RON file and turned into a rule program
//! - Typed lines stand in for recognized speech
//! - Media playback runs on a thread and resumes the engine when it ends
//!
//! Commands: an answer, `<` (seek previous), `<<` (replay), `stop`, `abort`,
//! an empty line (not understood), `?` (dump rules and store), `quit`.

use ludic_core::{
    Action, Announcer, Continuation, CustomAction, Devices, Engine, EngineConfig, EngineState,
    Fact, FactKind, Playback, Recognition, Rule,
};
use ludic_script::actions::{SEEK_SECTION, SR_ABORT, SR_ERROR, SR_START, SR_TEXT};
use ludic_script::qcm::SEEK_REPLAY;
use ludic_script::{Messages, QcmDef};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Quiz file contents
#[derive(serde::Deserialize)]
struct QuizData {
    quiz: QcmDef,
    #[serde(default)]
    messages: Messages,
    #[serde(default)]
    config: EngineConfig,
}

const MEDIA_DURATION_MS: u64 = 1500;
const POLL_INTERVAL_MS: u64 = 50;

/// Typed input stands in for the recognizer; this tracks listening and
/// remembers a cancellation so the host can report it as `SR_abort`
struct ConsoleRecognition {
    listening: Arc<AtomicBool>,
    aborted: Arc<AtomicBool>,
}

impl Recognition for ConsoleRecognition {
    fn is_active(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    fn start(&mut self) {
        println!("(listening...)");
        self.listening.store(true, Ordering::SeqCst);
    }

    fn cancel(&mut self) {
        println!("(recognition cancelled)");
        self.listening.store(false, Ordering::SeqCst);
        self.aborted.store(true, Ordering::SeqCst);
    }
}

/// Pretends to play a media for a fixed time on a background thread
struct ConsolePlayback {
    playing: Arc<AtomicBool>,
}

impl Playback for ConsolePlayback {
    fn is_active(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    fn stop(&mut self) {
        println!("(media stopped)");
        self.playing.store(false, Ordering::SeqCst);
    }

    fn play(&mut self, reference: &str, _auto_continue: bool, on_finish: Continuation) {
        println!("(playing {})", reference);
        self.playing.store(true, Ordering::SeqCst);
        let playing = self.playing.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(MEDIA_DURATION_MS));
            playing.store(false, Ordering::SeqCst);
            on_finish.resume();
        });
    }
}

struct ConsoleAnnouncer;

impl Announcer for ConsoleAnnouncer {
    fn announce(&mut self, text: &str) {
        println!("  >> {}", text);
    }

    fn pretty_print(&mut self, text: &str) {
        println!("== {} ==", text);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let data = load_quiz()?;
    let listening = Arc::new(AtomicBool::new(false));
    let aborted = Arc::new(AtomicBool::new(false));

    let mut engine = Engine::with_config(data.config).with_devices(Devices::new(
        ConsoleRecognition {
            listening: listening.clone(),
            aborted: aborted.clone(),
        },
        ConsolePlayback {
            playing: Arc::new(AtomicBool::new(false)),
        },
        ConsoleAnnouncer,
    ));

    // The host turns recognition requests into device calls
    engine.register_system_rule(
        Rule::new("Start_recognition")
            .when_present(SR_START, FactKind::Boolean)
            .then(Action::remove(SR_START))
            .then(Action::Custom(CustomAction::new(
                "Start recognition",
                |ctx, _, k| {
                    ctx.recognition().start();
                    k.resume();
                },
            ))),
    )?;

    data.quiz.build(&data.messages)?.install(&mut engine)?;
    settle(&mut engine, &aborted)?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let input = line.trim();

        let fact = match input {
            "quit" => break,
            "?" => {
                println!("{}", engine.rules_to_string());
                println!("{}", engine.store_to_string());
                continue;
            }
            "<" => Fact::int(SEEK_SECTION, -1),
            "<<" => Fact::int(SEEK_SECTION, SEEK_REPLAY),
            "stop" => Fact::int(SEEK_SECTION, 0),
            "abort" => {
                listening.store(false, Ordering::SeqCst);
                Fact::text(SR_ABORT, "")
            }
            _ if !listening.load(Ordering::SeqCst) => {
                println!("(not listening)");
                continue;
            }
            "" => {
                listening.store(false, Ordering::SeqCst);
                Fact::text(SR_ERROR, "")
            }
            answer => {
                listening.store(false, Ordering::SeqCst);
                Fact::text(SR_TEXT, answer)
            }
        };

        if let Err(e) = engine.insert(fact) {
            tracing::error!(error = %e, "engine error");
        }
        settle(&mut engine, &aborted)?;
    }

    Ok(())
}

/// Wait for open firings to complete, then report a cancelled recognition
fn settle(engine: &mut Engine, aborted: &AtomicBool) -> Result<(), ludic_core::Error> {
    loop {
        while engine.state() == EngineState::Firing {
            thread::sleep(Duration::from_millis(POLL_INTERVAL_MS));
            engine.process_completions()?;
        }
        if !aborted.swap(false, Ordering::SeqCst) {
            return Ok(());
        }
        engine.insert(Fact::text(SR_ABORT, ""))?;
    }
}

fn load_quiz() -> Result<QuizData, Box<dyn std::error::Error>> {
    let paths = ["demos/vocal_quiz/data/quiz.ron", "data/quiz.ron"];

    for path in &paths {
        if Path::new(path).exists() {
            let content = fs::read_to_string(path)?;
            return Ok(ron::from_str(&content)?);
        }
    }

    Err("Could not find quiz.ron file".into())
}
