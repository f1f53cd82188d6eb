use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::corpus::{BundledCorpus, Corpus};
use crate::error::Result;
use crate::generator::{GenConfig, DEFAULT_MIN_PARAGRAPH_CHARS, DEFAULT_SENTENCES_PER_PARAGRAPH};
use crate::session::{SessionConfig, DEFAULT_DURATION_SECS};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub duration_secs: u32,
    pub min_paragraph_chars: usize,
    pub sentences_per_paragraph: usize,
    pub corpus: String,
    pub corpus_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
            min_paragraph_chars: DEFAULT_MIN_PARAGRAPH_CHARS,
            sentences_per_paragraph: DEFAULT_SENTENCES_PER_PARAGRAPH,
            corpus: BundledCorpus::Classics.to_string(),
            corpus_file: None,
        }
    }
}

impl Config {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            duration_secs: self.duration_secs.max(1),
        }
    }

    pub fn gen_config(&self) -> GenConfig {
        GenConfig {
            min_paragraph_chars: self.min_paragraph_chars,
            sentences_per_paragraph: self.sentences_per_paragraph,
        }
    }

    /// A corpus file takes precedence over the bundled corpus name
    pub fn load_corpus(&self) -> Result<Corpus> {
        match &self.corpus_file {
            Some(path) => Corpus::from_path(path),
            None => Corpus::bundled(&self.corpus),
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "clacker") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("clacker_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };

        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "ignoring unreadable config file");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
