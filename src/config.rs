//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

use crate::{
    engine::EngineOptions,
    state::{FeedbackPrefs, Settings, WorkoutConfig},
};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "hiit-timer")]
#[command(about = "A drift-correcting interval workout timer controlled over HTTP")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Get-ready countdown in seconds (0 skips it)
    #[arg(long, default_value = "10")]
    pub countdown: u32,

    /// Work phase length in seconds
    #[arg(short, long, default_value = "120")]
    pub work: u32,

    /// Rest phase length in seconds (0 skips it)
    #[arg(short, long, default_value = "30")]
    pub rest: u32,

    /// Number of work rounds
    #[arg(long, default_value = "8")]
    pub rounds: u32,

    /// Cooldown length in seconds (0 skips it)
    #[arg(long, default_value = "0")]
    pub cooldown: u32,

    /// Disable all audio cues
    #[arg(long)]
    pub no_audio: bool,

    /// Disable the beeps over the last ten seconds of a phase
    #[arg(long)]
    pub no_final_beeps: bool,

    /// Disable the phase transition sound
    #[arg(long)]
    pub no_transition_sounds: bool,

    /// Disable haptic pulses
    #[arg(long)]
    pub no_haptics: bool,

    /// Maximum progress updates per second
    #[arg(long, default_value = "12")]
    pub fps: u32,

    /// Spacing of engine frames in milliseconds
    #[arg(long, default_value = "16")]
    pub frame_interval_ms: u64,

    /// Ring the terminal bell on audio cues
    #[arg(long)]
    pub bell: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Workout settings from the command line, clamped into their allowed ranges
    pub fn settings(&self) -> Settings {
        Settings {
            workout: WorkoutConfig {
                countdown_sec: self.countdown,
                work_sec: self.work,
                rest_sec: self.rest,
                cooldown_sec: self.cooldown,
                rounds: self.rounds,
            },
            feedback: FeedbackPrefs {
                audio_enabled: !self.no_audio,
                final_10_beeps: !self.no_final_beeps,
                transition_sounds: !self.no_transition_sounds,
                haptics_enabled: !self.no_haptics,
            },
        }
        .sanitize()
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            max_fps: self.fps.max(1),
            frame_interval: Duration::from_millis(self.frame_interval_ms.max(1)),
        }
    }
}
