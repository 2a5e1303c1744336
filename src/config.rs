use crate::persist::DEFAULT_SAVE_FILE;
use clap::Parser;
use std::path::PathBuf;

/// Tenor's public demo key.
pub const DEMO_TENOR_KEY: &str = "LIVDSRZULELA";
pub const OFFLINE_POOL_SIZE: u32 = 500;

/// GIF lootbox in the terminal.
#[derive(Debug, Clone, Parser)]
#[command(name = "gif-gacha", version, about)]
pub struct Config {
    /// Where progress is saved
    #[arg(long, env = "GACHA_SAVE_FILE", default_value = DEFAULT_SAVE_FILE)]
    pub save_file: PathBuf,

    /// Tenor API key
    #[arg(long, env = "TENOR_API_KEY", default_value = DEMO_TENOR_KEY)]
    pub tenor_key: String,

    /// Generate placeholder artifacts instead of calling Tenor
    #[arg(long)]
    pub offline: bool,

    /// Seed for tier draws (and offline artifacts)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log output file; the terminal belongs to the UI
    #[arg(long, default_value = "gif-gacha.log")]
    pub log_file: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_overrides() {
        let config = Config::parse_from(["gif-gacha"]);
        assert_eq!(config.save_file, PathBuf::from(DEFAULT_SAVE_FILE));
        assert!(!config.offline);
        assert!(config.seed.is_none());

        let config = Config::parse_from(["gif-gacha", "--offline", "--seed", "9"]);
        assert!(config.offline);
        assert_eq!(config.seed, Some(9));
    }
}
