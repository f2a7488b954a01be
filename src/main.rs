//! emo-tts-rs CLI entry point.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;

use emo_tts_rs::api::{self, ApiState, handlers::MAX_TEXT_LEN};
use emo_tts_rs::audio;
use emo_tts_rs::cli::Args;
use emo_tts_rs::engine::{
    EngineKind, NeuralEngine, SynthesisSpec, SystemEngine, TtsSystem,
};

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    // Probe both engines once; availability is fixed from here on.
    let neural = NeuralEngine::probe(&args.neural_host, args.neural_port);
    let system = SystemEngine::probe();
    let tts = Arc::new(
        TtsSystem::new(Arc::new(neural), Arc::new(system))
            .context("no TTS engines available")?,
    );

    if args.status {
        return show_status(&tts);
    }

    if args.list_voices {
        return list_voices(&tts);
    }

    if args.serve {
        return run_server(tts, &args);
    }

    let (Some(text), Some(output)) = (args.text.clone(), args.output.clone()) else {
        bail!("both text and output arguments are required (or use --serve, --status, --list-voices)");
    };

    synthesize(&tts, &args, &text, &output)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "emo_tts_rs=debug,info"
    } else {
        "emo_tts_rs=info,warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn show_status(tts: &TtsSystem) -> Result<()> {
    let status = tts.status();
    let describe = |available: bool| if available { "available" } else { "not available" };

    println!("TTS Engine Status:");
    println!("  neural: {}", describe(status.neural_available));
    println!("  system: {}", describe(status.system_available));
    println!("  default engine: {}", status.default_engine);
    Ok(())
}

fn list_voices(tts: &TtsSystem) -> Result<()> {
    for kind in [EngineKind::Neural, EngineKind::System] {
        let voices = tts.voices(kind);
        println!("{} voices:", kind.as_str());
        if voices.is_empty() {
            println!("  (none)");
            continue;
        }
        for (index, voice) in voices.iter().enumerate() {
            println!(
                "  [{index}] {} ({}, {})",
                voice.name,
                voice.language,
                voice.gender.as_str()
            );
        }
    }
    Ok(())
}

fn run_server(tts: Arc<TtsSystem>, args: &Args) -> Result<()> {
    let state = ApiState::new(tts, args.resolve_audio_dir());
    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime
        .block_on(api::serve(state, addr))
        .context("API server error")
}

fn synthesize(tts: &TtsSystem, args: &Args, text: &str, output: &Path) -> Result<()> {
    if text.trim().is_empty() {
        bail!("text input cannot be empty");
    }
    if text.chars().count() > MAX_TEXT_LEN {
        bail!("text too long (max {MAX_TEXT_LEN} characters)");
    }
    if let Some(speed) = args.speed
        && !(speed.is_finite() && speed > 0.0)
    {
        bail!("speed must be a positive number");
    }

    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create output directory: {}", parent.display()))?;
    }

    let mut spec = SynthesisSpec::new(text)
        .with_style(args.style)
        .with_intensity(args.intensity);
    if let Some(voice) = &args.voice {
        spec = spec.with_voice(voice.clone());
    }
    if let Some(speed) = args.speed {
        spec = spec.with_speed(speed);
    }

    println!(
        "Synthesizing: style={}, intensity={}",
        args.style.id(),
        args.intensity
    );

    let engine = tts
        .synthesize(args.engine, &spec, output)
        .context("synthesis failed")?;

    println!("Audio saved to: {}", output.display());
    println!("  Engine: {}", engine.as_str());
    if let Some(info) = audio::wav_info(output) {
        println!(
            "  Duration: {:.2}s ({} ch, {} Hz)",
            info.duration_secs, info.channels, info.sample_rate
        );
    }

    Ok(())
}
