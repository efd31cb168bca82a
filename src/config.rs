use std::path::PathBuf;

use clap::Parser;

use crate::loader::sample_loader::SourceResolver;
use crate::pipeline::storage::PADBOARD_DIR;

const LOG_FILE: &str = "padboard.log";
const SOUNDS_DIR: &str = "sounds";

#[derive(Parser, Debug, Clone)]
#[command(name = "padboard", about = "Terminal soundboard: pads, a track player, and a layout that remembers itself")]
pub struct Config {
    /// Board directory; state is kept in <DIR>/.padboard (defaults to the current directory)
    pub dir: Option<PathBuf>,

    /// Where the bumbo/caixa/prato samples live (defaults to <DIR>/sounds)
    #[arg(long, value_name = "DIR")]
    pub sounds: Option<PathBuf>,

    /// Don't open an audio device; everything else still works
    #[arg(long)]
    pub mute: bool,
}

impl Config {
    pub fn project_dir(&self) -> PathBuf {
        self.dir
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_default())
    }

    pub fn sounds_dir(&self) -> PathBuf {
        self.sounds
            .clone()
            .unwrap_or_else(|| self.project_dir().join(SOUNDS_DIR))
    }

    pub fn log_path(&self) -> PathBuf {
        self.project_dir().join(PADBOARD_DIR).join(LOG_FILE)
    }

    pub fn resolver(&self) -> SourceResolver {
        SourceResolver {
            project_dir: self.project_dir(),
            sounds_dir: self.sounds_dir(),
        }
    }
}
