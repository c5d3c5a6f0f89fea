//! Gridiron CLI
//!
//! Drives the choreography engine from the command line: choreograph a
//! single play request into a frame timeline, or walk a whole drive file
//! play by play and report each phase transition.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use gridiron_core::{
    choreograph_play_json, PlayOutcome, PlayPhase, PlayScript, Possession,
};

#[derive(Parser)]
#[command(name = "gridiron")]
#[command(about = "Choreograph football play outcomes into animation timelines", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Choreograph one play request into a sampled frame timeline
    Play {
        /// Input play request JSON file
        #[arg(long)]
        r#in: PathBuf,

        /// Output timeline JSON file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Walk a drive file play by play, printing phase transitions
    Drive {
        /// Input drive JSON file (array of drive plays)
        #[arg(long)]
        r#in: PathBuf,

        /// Playback step in milliseconds
        #[arg(long, default_value = "100")]
        step_ms: u64,
    },
}

/// One play of a scripted drive.
#[derive(Debug, serde::Deserialize)]
struct DrivePlay {
    outcome: PlayOutcome,
    ball_on_yard: f32,
    possession: Possession,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Play { r#in, out } => run_play(&r#in, out.as_deref()),
        Commands::Drive { r#in, step_ms } => run_drive(&r#in, step_ms),
    }
}

fn run_play(input: &std::path::Path, out: Option<&std::path::Path>) -> Result<()> {
    let request = fs::read_to_string(input)
        .with_context(|| format!("reading play request {}", input.display()))?;
    let timeline = choreograph_play_json(&request)?;
    match out {
        Some(path) => {
            fs::write(path, &timeline)
                .with_context(|| format!("writing timeline {}", path.display()))?;
            info!(out = %path.display(), bytes = timeline.len(), "timeline written");
        }
        None => println!("{timeline}"),
    }
    Ok(())
}

fn run_drive(input: &std::path::Path, step_ms: u64) -> Result<()> {
    let raw = fs::read_to_string(input)
        .with_context(|| format!("reading drive file {}", input.display()))?;
    let plays: Vec<DrivePlay> = serde_json::from_str(&raw).context("parsing drive file")?;
    let step_ms = step_ms.max(1);

    for (number, play) in plays.into_iter().enumerate() {
        let script = PlayScript::compile(play.outcome, play.ball_on_yard, play.possession)?;
        println!(
            "play {}: {:?} from yard {} ({} ms)",
            number + 1,
            script.context().outcome.play_type,
            play.ball_on_yard,
            script.total_ms()
        );

        let mut last_phase = None;
        let mut elapsed = 0;
        while elapsed <= script.total_ms() {
            let (phase, _) = script.phase_at(elapsed);
            if last_phase != Some(phase) {
                println!("  {elapsed:>6} ms  {phase:?}");
                last_phase = Some(phase);
            }
            elapsed += step_ms;
        }
        if last_phase != Some(PlayPhase::Idle) {
            println!("  {:>6} ms  {:?}", script.total_ms(), PlayPhase::Idle);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_play_command_writes_a_timeline() {
        let dir = tempfile::tempdir().unwrap();
        let in_path = dir.path().join("request.json");
        let out_path = dir.path().join("timeline.json");

        let request = r#"{
            "outcome": {"play_type": "run", "yards_gained": 8},
            "ball_on_yard": 35.0,
            "possession": "home"
        }"#;
        let mut f = fs::File::create(&in_path).unwrap();
        f.write_all(request.as_bytes()).unwrap();

        run_play(&in_path, Some(&out_path)).unwrap();
        let timeline = fs::read_to_string(&out_path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&timeline).unwrap();
        assert!(parsed["total_ms"].as_u64().unwrap() > 0);
        assert!(!parsed["frames"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_drive_command_accepts_a_drive_file() {
        let dir = tempfile::tempdir().unwrap();
        let in_path = dir.path().join("drive.json");

        let drive = r#"[
            {"outcome": {"play_type": "run", "yards_gained": 4}, "ball_on_yard": 25.0, "possession": "away"},
            {"outcome": {"play_type": "pass-complete", "yards_gained": 17}, "ball_on_yard": 29.0, "possession": "away"}
        ]"#;
        fs::write(&in_path, drive).unwrap();
        run_drive(&in_path, 100).unwrap();
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let missing = std::path::Path::new("/nonexistent/request.json");
        assert!(run_play(missing, None).is_err());
    }
}
