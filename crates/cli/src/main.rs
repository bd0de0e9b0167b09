#![deny(warnings)]

mod commands;
mod terminal;

use anyhow::Context;
use clap::Parser;
use std::path::Path;
use commands::Command;
use terminal::TerminalSurface;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use tts_client_core::config::{
    resolve_optional_string, resolve_server_url, ClientConfig, ElementIds, Env, StdEnv,
    ENV_TTS_SPEAKER_ID, ENV_TTS_STYLE_WAV,
};
use tts_client_core::history::{format_day, HistoryView, NoDecorations};
use tts_client_core::playback::{AudioPlayer, RodioAudioPlayer, SilentAudioPlayer};
use tts_client_core::session::{SessionController, SubmitOutcome, SUBMIT_KEY};
use tts_client_core::surface::MemorySurface;
use tts_client_core::synth::HttpSynthesisClient;

type Session = SessionController<TerminalSurface, HttpSynthesisClient, NoDecorations>;

#[derive(Parser, Debug)]
#[command(name = "tts-client")]
#[command(about = "Interactive client for a text-to-speech server (/api/tts)")]
struct Args {
    /// Base URL of the synthesis server [env: TTS_SERVER_URL]
    #[arg(long)]
    server_url: Option<String>,

    /// Initial speaker id [env: TTS_SPEAKER_ID]
    #[arg(long)]
    speaker_id: Option<String>,

    /// Initial style reference [env: TTS_STYLE_WAV]
    #[arg(long)]
    style_wav: Option<String>,

    #[arg(long)]
    output_device: Option<String>,

    /// Play every new entry as soon as it arrives
    #[arg(long, default_value_t = false)]
    autoplay: bool,

    /// Never open an audio device
    #[arg(long, default_value_t = false)]
    no_audio: bool,

    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let env = StdEnv;
    let player = build_player(&args);
    let autoplay = args.autoplay;
    let cfg = build_config(args, &env)?;

    tracing::info!(
        server_url = %cfg.server_url.as_url(),
        speaker_id = cfg.default_speaker_id.as_deref().unwrap_or(""),
        style_wav = cfg.default_style_wav.as_deref().unwrap_or(""),
        "config loaded"
    );

    let mut session = build_session(&cfg);
    run_prompt(&mut session, player.as_ref(), autoplay).await
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(
            level
                .parse()
                .with_context(|| format!("invalid --log-level: {level}"))?,
        )
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn build_config(args: Args, env: &impl Env) -> anyhow::Result<ClientConfig> {
    let server_url = resolve_server_url(args.server_url, env).context("resolving server url")?;

    Ok(ClientConfig {
        server_url,
        ids: ElementIds::default(),
        default_speaker_id: resolve_optional_string(args.speaker_id, ENV_TTS_SPEAKER_ID, env),
        default_style_wav: resolve_optional_string(args.style_wav, ENV_TTS_STYLE_WAV, env),
    })
}

fn build_player(args: &Args) -> Box<dyn AudioPlayer> {
    if args.no_audio {
        return Box::new(SilentAudioPlayer::new());
    }
    let player = RodioAudioPlayer::new();
    match args.output_device.clone() {
        Some(name) => Box::new(player.with_output_device_name(name)),
        None => Box::new(player),
    }
}

fn build_session(cfg: &ClientConfig) -> Session {
    let ids = cfg.ids.clone();
    let mut document = MemorySurface::new().with_field(&ids.text, "");
    if let Some(speaker) = &cfg.default_speaker_id {
        document.set_field(&ids.speaker_id, speaker);
    }
    if let Some(style) = &cfg.default_style_wav {
        document.set_field(&ids.style_wav, style);
    }

    let surface = TerminalSurface::new(document, &ids.message);
    let client = HttpSynthesisClient::new(&cfg.server_url);
    SessionController::new(surface, client, NoDecorations, ids)
}

async fn run_prompt(
    session: &mut Session,
    player: &dyn AudioPlayer,
    autoplay: bool,
) -> anyhow::Result<()> {
    eprintln!(
        "Type text and press Enter to synthesize. \
         :history, :play <n>, :save <n> <path>, :speaker <id>, :style <ref>, :quit"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        match Command::parse(&line) {
            Command::Say(text) => {
                let id = session.ids().text.clone();
                session.surface_mut().set_field(&id, &text);
                let outcome = session.on_key_up(SUBMIT_KEY).await;
                if outcome == SubmitOutcome::Completed {
                    println!("#1 {}", summarize(session.history(), 0));
                    if autoplay {
                        play(session, player, 1).await;
                    }
                }
            }
            Command::Speaker(value) => {
                let id = session.ids().speaker_id.clone();
                session.surface_mut().set_field(&id, &value);
            }
            Command::Style(value) => {
                let id = session.ids().style_wav.clone();
                session.surface_mut().set_field(&id, &value);
            }
            Command::History => {
                for i in 0..session.history().len() {
                    println!("#{} {}", i + 1, summarize(session.history(), i));
                }
            }
            Command::Play(n) => play(session, player, n).await,
            Command::Save(n, path) => match save(session.history(), n, &path).await {
                Ok(bytes) => tracing::info!(path = %path.display(), bytes, "audio saved"),
                Err(e) => {
                    tracing::warn!(error = %e, entry = n, "saving audio failed");
                    eprintln!("{e:#}");
                }
            },
            Command::Quit => break,
            Command::Invalid(message) => eprintln!("{message}"),
        }
    }

    Ok(())
}

async fn play(session: &Session, player: &dyn AudioPlayer, n: usize) {
    let Some(entry) = session.history().get(n - 1) else {
        eprintln!("no entry #{n}");
        return;
    };
    if let Err(e) = player.play(entry.audio().clone()).await {
        tracing::warn!(error = %e, entry = n, "playback failed");
    }
}

/// Writes entry `n` (1-based) to `path` and returns the byte count.
async fn save(
    history: &HistoryView<NoDecorations>,
    n: usize,
    path: &Path,
) -> anyhow::Result<usize> {
    let entry = history
        .get(n.wrapping_sub(1))
        .with_context(|| format!("no entry #{n}"))?;
    let bytes = entry.audio().bytes();
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(bytes.len())
}

fn summarize(history: &HistoryView<NoDecorations>, index: usize) -> String {
    match history.get(index) {
        Some(entry) => format!(
            "{}  {}  [{}, {} bytes]",
            format_day(&entry.created_at()),
            entry.source_text(),
            entry.audio().content_type(),
            entry.audio().bytes().len()
        ),
        None => String::new(),
    }
}
