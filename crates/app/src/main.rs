use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

use speaknotes_app::config::ConfigStore;
use speaknotes_app::draft::{DraftStore, AUTOSAVE_INTERVAL};
use speaknotes_app::history::HistoryStore;
use speaknotes_app::jobs::{JobController, JobError, JobEvent, JobMode, JobRequest};
use speaknotes_app::presets::PresetTable;
use speaknotes_app::session::{SessionEvent, SessionState};
use speaknotes_tts::{TtsEngine, VoiceInfo};
use speaknotes_tts_say::SayEngine;

const CONFIG_FILE: &str = "config.json";
const HISTORY_FILE: &str = "history.json";
const DRAFT_FILE: &str = "draft.txt";
const OUTPUT_DIR: &str = "outputs";

/// Quick text-to-speech notes tool: preview text aloud or export it to audio
#[derive(Parser, Debug)]
#[command(name = "speaknotes", version)]
struct Cli {
    /// Read the input text from a file instead of prompting for it
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Preset name (study, podcast, relax, custom)
    #[arg(short, long)]
    preset: Option<String>,

    /// Voice index from --list-voices
    #[arg(long)]
    voice: Option<usize>,

    /// Mode: preview, export, or both
    #[arg(short, long)]
    mode: Option<String>,

    /// Export every paragraph to its own audio file (requires --file)
    #[arg(long)]
    bulk: bool,

    /// List available voices and exit
    #[arg(long)]
    list_voices: bool,

    /// Play the most recent export and exit
    #[arg(long)]
    play_latest: bool,

    /// Open the outputs folder and exit
    #[arg(long)]
    open_outputs: bool,

    /// Rewrite relative history paths to absolute ones and exit
    #[arg(long)]
    migrate_history: bool,
}

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all("logs")?;
    let file_appender = RollingFileAppender::new(Rotation::DAILY, "logs", "speaknotes.log");
    let (non_blocking_file, _guard) = tracing_appender::non_blocking(file_appender);
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    // File only: stdout belongs to the interactive prompts
    tracing_subscriber::fmt()
        .with_writer(non_blocking_file)
        .with_env_filter(log_level)
        .init();
    std::mem::forget(_guard);
    Ok(())
}

fn prompt(message: &str) -> io::Result<String> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn print_voices(voices: &[VoiceInfo]) {
    for (idx, voice) in voices.iter().enumerate() {
        println!("{}: {}", idx, voice.name);
    }
}

/// Prompt-or-load flow for the input text, mirroring the tool's console UX:
/// paste directly, or give a .txt path with paste as the fallback.
fn gather_text(
    cli: &Cli,
    session: &mut SessionState,
    restored_draft: Option<&str>,
) -> anyhow::Result<String> {
    if let Some(path) = &cli.file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display()))?;
        session.apply(SessionEvent::TextLoadedFromFile(path.clone()));
        println!("Loaded: {}", path.display());
        return Ok(content.trim().to_string());
    }

    println!("\nChoose input method:");
    println!("  1) Paste text");
    println!("  2) Load from .txt file");
    let choice = prompt("Select 1 or 2 [1]: ")?;

    if choice == "2" {
        let path_str = prompt("Enter the path to your .txt file: ")?;
        let path = PathBuf::from(path_str);
        match std::fs::read_to_string(&path) {
            Ok(content) if !content.trim().is_empty() => {
                session.apply(SessionEvent::TextLoadedFromFile(path.clone()));
                println!("Loaded: {}", path.display());
                return Ok(content.trim().to_string());
            }
            Ok(_) => println!("File was empty."),
            Err(_) => println!("File not found."),
        }
    }

    let hint = if restored_draft.is_some() {
        "Paste your text (Enter reuses your saved draft): "
    } else {
        "Paste your text: "
    };
    let mut text = prompt(hint)?;
    if text.is_empty() {
        if let Some(draft) = restored_draft {
            println!("Restored draft.");
            text = draft.to_string();
        }
    }
    session.apply(SessionEvent::TextEdited);
    Ok(text)
}

/// Drain job events onto stdout so status is visible while a job runs
fn spawn_event_printer(
    mut events: tokio::sync::mpsc::UnboundedReceiver<JobEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                JobEvent::Status { message, .. } => println!("{}", message),
                JobEvent::Progress { index, total, .. } => {
                    println!("Exporting paragraph {} of {}...", index, total)
                }
                JobEvent::Finished { .. } => {}
                JobEvent::Failed { error, .. } => println!("Job failed: {}", error),
            }
        }
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging().map_err(|e| anyhow::anyhow!("logging setup failed: {}", e))?;
    let cli = Cli::parse();
    tracing::info!("Starting SpeakNotes");

    let history = HistoryStore::new(HISTORY_FILE);
    if cli.migrate_history {
        let updated = history.migrate_paths(&std::env::current_dir()?)?;
        println!("Updated {} history entries.", updated);
        return Ok(());
    }

    let engine = Arc::new(
        SayEngine::detect()
            .await
            .context("no speech backend available")?,
    );
    let voices = engine.list_voices().await.unwrap_or_default();

    if cli.list_voices {
        print_voices(&voices);
        return Ok(());
    }

    let (controller, events) = JobController::new(engine, history, OUTPUT_DIR);
    let controller = Arc::new(controller);
    let printer = spawn_event_printer(events);

    if cli.play_latest || cli.open_outputs {
        let result = if cli.play_latest {
            controller.play_latest().await
        } else {
            controller.reveal_latest().await
        };
        match result {
            Ok(path) => println!("{}", path.display()),
            Err(JobError::NoExportYet) => println!("No exported audio files found yet."),
            Err(e) => return Err(e.into()),
        }
        return Ok(());
    }

    let config = ConfigStore::new(CONFIG_FILE);
    let snapshot = config.load();
    let mut session = SessionState::restore(&snapshot);

    let draft = DraftStore::new(DRAFT_FILE);
    let restored_draft = draft.restore();
    let autosave = draft.spawn_autosave(AUTOSAVE_INTERVAL);

    println!("\nSpeakNotes — quick TTS tool\n");

    let text = gather_text(&cli, &mut session, restored_draft.as_deref())?;
    draft.set_text(&text);

    // Preset
    let preset_names = PresetTable::names().join("/");
    let preset_input = match &cli.preset {
        Some(name) => name.clone(),
        None => prompt(&format!(
            "Preset ({}) [{}]: ",
            preset_names,
            session.preset()
        ))?,
    };
    if !preset_input.is_empty() {
        session.apply(SessionEvent::PresetSelected(preset_input.to_lowercase()));
    }

    // Voice
    let voice_index = match cli.voice {
        Some(index) => Some(index),
        None => {
            let pick = prompt("Pick a specific voice? (y/n) [n]: ")?;
            if pick.eq_ignore_ascii_case("y") {
                print_voices(&voices);
                prompt("Voice number: ")?.parse::<usize>().ok()
            } else {
                None
            }
        }
    };
    if let Some(index) = voice_index {
        match voices.get(index) {
            Some(voice) => session.apply(SessionEvent::VoiceSelected(Some(voice.name.clone()))),
            None => println!("No voice with number {}; using the system default.", index),
        }
    }

    // Mode
    let default_mode = JobMode::parse(&snapshot.mode).unwrap_or(JobMode::Export);
    let mode_input = match &cli.mode {
        Some(mode) => mode.clone(),
        None => prompt(&format!(
            "Mode: preview / export / both [{}]: ",
            default_mode.as_str()
        ))?,
    };
    let mode = if mode_input.is_empty() {
        default_mode
    } else {
        JobMode::parse(&mode_input).unwrap_or(JobMode::Export)
    };

    // Persist the full current snapshot; losing it only costs convenience
    if let Err(e) = config.save(&session.to_snapshot(mode.as_str())) {
        tracing::warn!("Config save failed: {}", e);
    }

    let request = JobRequest {
        text,
        settings: session.resolve(&voices),
        mode,
        source: session.source().clone(),
    };

    let outcome = if cli.bulk {
        let job = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.run_bulk(request).await })
        };
        job.await?.map(|bulk| {
            println!("Exported {} paragraphs.", bulk.written.len());
            bulk.written.last().cloned()
        })
    } else {
        let job = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.run(request).await })
        };
        job.await?.map(|outcome| outcome.output)
    };

    match outcome {
        Ok(Some(path)) => println!("\n✅ Audio saved: {}\n", path.display()),
        Ok(None) => println!("\nPreview finished.\n"),
        Err(JobError::EmptyInput) => println!("Please enter or load text first."),
        Err(JobError::BulkNotApplicable) => {
            println!("Bulk export needs a loaded .txt file with at least two paragraphs.")
        }
        Err(e) => {
            autosave.abort();
            draft.save_now();
            return Err(e.into());
        }
    }

    autosave.abort();
    draft.save_now();
    // Dropping the controller closes the event channel and ends the printer
    drop(controller);
    let _ = printer.await;
    tracing::info!("SpeakNotes finished");
    Ok(())
}
