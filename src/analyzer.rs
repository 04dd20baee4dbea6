//! Analyzer variants and what each of them can do.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{KoalaError, Result};

/// Morphological or dependency analyzer whose output this crate unifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerKind {
    /// KAIST Hannanum.
    Hannanum,
    /// Seoul National University Kkma.
    Kkma,
    /// Shineware Komoran.
    Komoran,
    /// Eunjeon (mecab-ko-dic).
    Eunjeon,
    /// Open Korean Text (formerly Twitter).
    Okt,
    /// Daon.
    Daon,
    /// Kiwi.
    Kiwi,
    /// ETRI open API.
    Etri,
}

/// Operation an analyzer variant may or may not offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Splitting raw text into sentences.
    SentenceSplit,
    /// Morpheme tagging.
    Tagging,
    /// Dependency parsing.
    Parsing,
    /// Named entity recognition.
    EntityRecognition,
    /// Semantic role labeling.
    RoleLabeling,
    /// Adding user dictionary entries.
    DictionaryAdd,
    /// Listing or probing dictionary entries.
    DictionaryQuery,
}

impl Capability {
    /// Stable kebab-case name used in messages.
    pub fn name(self) -> &'static str {
        match self {
            Capability::SentenceSplit => "sentence-split",
            Capability::Tagging => "tagging",
            Capability::Parsing => "parsing",
            Capability::EntityRecognition => "entity-recognition",
            Capability::RoleLabeling => "role-labeling",
            Capability::DictionaryAdd => "dictionary-add",
            Capability::DictionaryQuery => "dictionary-query",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const ALL_KINDS: [AnalyzerKind; 8] = [
    AnalyzerKind::Hannanum,
    AnalyzerKind::Kkma,
    AnalyzerKind::Komoran,
    AnalyzerKind::Eunjeon,
    AnalyzerKind::Okt,
    AnalyzerKind::Daon,
    AnalyzerKind::Kiwi,
    AnalyzerKind::Etri,
];

impl AnalyzerKind {
    /// All variants in declaration order.
    pub fn all() -> &'static [AnalyzerKind] {
        &ALL_KINDS
    }

    /// Short code used in configuration, e.g. `"kmr"` for Komoran.
    pub fn code(self) -> &'static str {
        match self {
            AnalyzerKind::Hannanum => "hnn",
            AnalyzerKind::Kkma => "kkma",
            AnalyzerKind::Komoran => "kmr",
            AnalyzerKind::Eunjeon => "eunjeon",
            AnalyzerKind::Okt => "okt",
            AnalyzerKind::Daon => "daon",
            AnalyzerKind::Kiwi => "kiwi",
            AnalyzerKind::Etri => "etri",
        }
    }

    /// Parses a short code or a lowercase variant name, ignoring ASCII case.
    pub fn from_code(code: &str) -> Result<Self> {
        let wanted = code.trim().to_ascii_lowercase();
        ALL_KINDS
            .iter()
            .copied()
            .find(|kind| kind.code() == wanted || kind.name() == wanted)
            .ok_or_else(|| KoalaError::InvalidArgument(format!("unknown analyzer code: {code}")))
    }

    fn name(self) -> &'static str {
        match self {
            AnalyzerKind::Hannanum => "hannanum",
            AnalyzerKind::Kkma => "kkma",
            AnalyzerKind::Komoran => "komoran",
            AnalyzerKind::Eunjeon => "eunjeon",
            AnalyzerKind::Okt => "okt",
            AnalyzerKind::Daon => "daon",
            AnalyzerKind::Kiwi => "kiwi",
            AnalyzerKind::Etri => "etri",
        }
    }

    /// Returns whether this variant offers `capability`.
    pub fn supports(self, capability: Capability) -> bool {
        use AnalyzerKind::*;
        match capability {
            Capability::SentenceSplit | Capability::Tagging => true,
            Capability::Parsing => matches!(self, Hannanum | Kkma | Etri),
            Capability::EntityRecognition | Capability::RoleLabeling => matches!(self, Etri),
            Capability::DictionaryAdd => !matches!(self, Etri),
            Capability::DictionaryQuery => !matches!(self, Etri | Kiwi),
        }
    }

    /// Fails with [`KoalaError::Unsupported`] unless this variant offers
    /// `capability`.
    pub fn require(self, capability: Capability) -> Result<()> {
        if self.supports(capability) {
            Ok(())
        } else {
            Err(KoalaError::Unsupported {
                analyzer: self,
                capability,
            })
        }
    }
}

impl fmt::Display for AnalyzerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnalyzerKind {
    type Err = KoalaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_code(s)
    }
}
