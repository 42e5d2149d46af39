use clap::Parser;
use std::path::PathBuf;

// Build version with engine info
const VERSION_INFO: &str = const_format::concatcp!(
    env!("CARGO_PKG_VERSION"), "\n",
    "Engine: sequence timeline (flatten + wall-clock playback)\n",
    "Target: ", std::env::consts::ARCH, "-", std::env::consts::OS
);

/// Yoga sequence player
#[derive(Parser, Debug)]
#[command(author, version = VERSION_INFO, about, long_about = None)]
pub struct Args {
    /// Sequence JSON file to load (alternatively use --id with a store)
    #[arg(value_name = "FILE")]
    pub file_path: Option<PathBuf>,

    /// Load sequence by id from the store
    #[arg(short = 'i', long = "id", value_name = "UUID")]
    pub sequence_id: Option<String>,

    /// Store directory (default: platform data dir)
    #[arg(short = 's', long = "store", value_name = "DIR")]
    pub store_dir: Option<PathBuf>,

    /// List sequences in the store and exit
    #[arg(long = "list")]
    pub list: bool,

    /// Print the structure/duration outline and exit
    #[arg(short = 'e', long = "export")]
    pub export: bool,

    /// Play the sequence in the terminal (narration is logged)
    #[arg(short = 'p', long = "play")]
    pub play: bool,

    /// Playback speed multiplier (snapped to the preset table)
    #[arg(long = "speed", value_name = "X", default_value = "1.0")]
    pub speed: f32,

    /// Tick period for the playback loop, in milliseconds
    #[arg(long = "tick", value_name = "MS", default_value = "100")]
    pub tick_ms: u64,

    /// Write log output to a file instead of stderr
    #[arg(short = 'l', long = "log", value_name = "LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

impl Args {
    /// Log level filter derived from repeated -v flags
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["sadhana"]);
        assert!(args.file_path.is_none());
        assert!(!args.play);
        assert_eq!(args.speed, 1.0);
        assert_eq!(args.tick_ms, 100);
        assert_eq!(args.log_level(), log::LevelFilter::Warn);
    }

    #[test]
    fn test_play_with_speed() {
        let args = Args::parse_from(["sadhana", "flow.json", "--play", "--speed", "2.0", "-vv"]);
        assert_eq!(args.file_path.clone().unwrap(), PathBuf::from("flow.json"));
        assert!(args.play);
        assert_eq!(args.speed, 2.0);
        assert_eq!(args.log_level(), log::LevelFilter::Debug);
    }
}
