use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analyzer::{AnalyzerKind, Capability};
use crate::constants::KOALA_ANALYZERS_ENV;
use crate::dictionary::{Dictionary, DictionaryBackend};
use crate::error::{KoalaError, Result};
use crate::runtime::{Analyzer, Engine};
use crate::types::{AnalyzeOptions, DictEntry};

fn all_analyzers() -> Vec<AnalyzerKind> {
    AnalyzerKind::all().to_vec()
}

/// Parses a comma-separated list of analyzer codes. Unknown codes are
/// skipped with a warning; a blank list enables every variant.
pub(crate) fn parse_analyzer_list(list: &str) -> Vec<AnalyzerKind> {
    let mut analyzers = Vec::new();
    for code in list.split(',').map(str::trim).filter(|code| !code.is_empty()) {
        match AnalyzerKind::from_code(code) {
            Ok(kind) if !analyzers.contains(&kind) => analyzers.push(kind),
            Ok(_) => {}
            Err(_) => log::warn!("ignoring unknown analyzer code `{}` in {}", code, KOALA_ANALYZERS_ENV),
        }
    }
    if analyzers.is_empty() {
        all_analyzers()
    } else {
        analyzers
    }
}

/// Settings consumed by [`AnalyzerContext`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KoalaConfig {
    /// Analyzer variants that may be used.
    #[serde(default = "all_analyzers")]
    pub analyzers: Vec<AnalyzerKind>,
    /// Options handed to every analyzer the context creates.
    #[serde(default)]
    pub default_analyze_options: AnalyzeOptions,
    /// Entries loaded into every dictionary the context creates.
    #[serde(default)]
    pub user_entries: Vec<DictEntry>,
}

impl Default for KoalaConfig {
    /// Reads the enabled variants from `KOALA_ANALYZERS` (e.g. `kkma,okt`);
    /// every variant is enabled when it is unset.
    fn default() -> Self {
        let analyzers = match env::var(KOALA_ANALYZERS_ENV) {
            Ok(list) => parse_analyzer_list(&list),
            Err(_) => all_analyzers(),
        };
        Self {
            analyzers,
            default_analyze_options: AnalyzeOptions::default(),
            user_entries: Vec::new(),
        }
    }
}

impl KoalaConfig {
    /// Enables exactly `analyzers`.
    pub fn with_analyzers(mut self, analyzers: impl IntoIterator<Item = AnalyzerKind>) -> Self {
        self.analyzers.clear();
        for kind in analyzers {
            if !self.analyzers.contains(&kind) {
                self.analyzers.push(kind);
            }
        }
        self
    }

    /// Sets the options handed to created analyzers.
    pub fn with_default_analyze_options(mut self, options: AnalyzeOptions) -> Self {
        self.default_analyze_options = options;
        self
    }

    /// Queues an entry for every dictionary the context creates.
    pub fn add_user_entry(mut self, entry: DictEntry) -> Self {
        self.user_entries.push(entry);
        self
    }

    /// Whether `kind` is enabled.
    pub fn is_enabled(&self, kind: AnalyzerKind) -> bool {
        self.analyzers.contains(&kind)
    }

    /// Pretty-printed JSON form.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses JSON written by [`Self::to_json`]. Missing fields take their
    /// defaults, except that the analyzer list never consults the
    /// environment.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Writes this config as JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Explicit initialization object. Analyzers and dictionaries are created
/// through it, so nothing depends on process-wide state.
#[derive(Debug, Clone)]
pub struct AnalyzerContext {
    config: KoalaConfig,
}

impl AnalyzerContext {
    /// Creates a context from `config`.
    pub fn new(config: KoalaConfig) -> Self {
        log::info!(
            "analyzer context ready with {}",
            config
                .analyzers
                .iter()
                .map(|kind| kind.code())
                .collect::<Vec<_>>()
                .join(",")
        );
        Self { config }
    }

    /// Creates a context from [`KoalaConfig::default`].
    pub fn from_env() -> Self {
        Self::new(KoalaConfig::default())
    }

    /// Active configuration.
    pub fn config(&self) -> &KoalaConfig {
        &self.config
    }

    fn require_enabled(&self, kind: AnalyzerKind) -> Result<()> {
        if self.config.is_enabled(kind) {
            Ok(())
        } else {
            Err(KoalaError::NotEnabled(kind))
        }
    }

    /// Wraps `engine` in an [`Analyzer`] using the configured options.
    pub fn analyzer<E: Engine>(&self, engine: E) -> Result<Analyzer<E>> {
        self.require_enabled(engine.kind())?;
        Analyzer::new(engine, self.config.default_analyze_options)
    }

    /// Wraps `backend` in a [`Dictionary`] and loads the configured user
    /// entries into it. Variants that cannot add entries skip the preload.
    pub fn dictionary<B: DictionaryBackend>(&self, backend: B) -> Result<Dictionary<B>> {
        let kind = backend.analyzer();
        self.require_enabled(kind)?;
        let mut dictionary = Dictionary::new(backend);
        if !self.config.user_entries.is_empty() {
            if kind.supports(Capability::DictionaryAdd) {
                dictionary.add(&self.config.user_entries)?;
            } else {
                log::warn!(
                    "{} cannot add dictionary entries; skipping {} configured entries",
                    kind,
                    self.config.user_entries.len()
                );
            }
        }
        Ok(dictionary)
    }
}
