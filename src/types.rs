use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ENTRY_SCORE, ROOT_SENTINEL};
use crate::error::{KoalaError, Result};
use crate::model::MorphemeRef;
use crate::tag::POS;

/// One morpheme as emitted by an analyzer, before tag normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMorpheme {
    /// Surface form.
    pub surface: String,
    /// Tag in the analyzer's own vocabulary.
    pub raw_tag: String,
    /// Dictionary sense number, when the analyzer disambiguated it.
    pub word_sense: Option<u32>,
}

impl RawMorpheme {
    /// Creates a raw morpheme.
    pub fn new(surface: impl Into<String>, raw_tag: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            raw_tag: raw_tag.into(),
            word_sense: None,
        }
    }

    /// Sets the dictionary sense number.
    pub fn with_word_sense(mut self, sense: u32) -> Self {
        self.word_sense = Some(sense);
        self
    }
}

/// Head reference of a word in flat analyzer output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadRef {
    /// The word is the root of the sentence.
    Root,
    /// The word depends on the word at this index.
    Word(usize),
}

impl HeadRef {
    /// Converts an analyzer's raw head value, where [`ROOT_SENTINEL`] marks
    /// the root. Other negative values are rejected.
    pub fn from_raw(raw: i64) -> Result<Self> {
        if raw == ROOT_SENTINEL {
            return Ok(HeadRef::Root);
        }
        usize::try_from(raw)
            .map(HeadRef::Word)
            .map_err(|_| KoalaError::InvalidArgument(format!("head index must be >= -1, got {raw}")))
    }
}

/// One word as emitted by an analyzer, before assembly.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawWord {
    /// Surface form reported by the analyzer.
    pub surface: String,
    /// Morphemes in order.
    pub morphemes: Vec<RawMorpheme>,
    /// Head of this word, absent for tagging-only output.
    pub head: Option<HeadRef>,
    /// Raw dependency label of the edge to the head.
    pub relation: Option<String>,
}

impl RawWord {
    /// Creates a word with no dependency data.
    pub fn new(surface: impl Into<String>, morphemes: Vec<RawMorpheme>) -> Self {
        Self {
            surface: surface.into(),
            morphemes,
            head: None,
            relation: None,
        }
    }

    /// Sets the head of this word.
    pub fn with_head(mut self, head: HeadRef) -> Self {
        self.head = Some(head);
        self
    }

    /// Sets the raw dependency label of this word.
    pub fn with_relation(mut self, relation: impl Into<String>) -> Self {
        self.relation = Some(relation.into());
        self
    }
}

/// Named entity as emitted by an analyzer, addressed by morpheme
/// positions in the already assembled sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntity {
    /// Surface form of the entity.
    pub surface: String,
    /// Label in the analyzer's own vocabulary, e.g. `LCP_COUNTRY`.
    pub label: String,
    /// Covered morphemes in sentence order.
    pub morphemes: Vec<MorphemeRef>,
    /// Entities sharing a key refer to the same thing.
    pub coreference: Option<usize>,
}

impl RawEntity {
    /// Creates an entity with no coreference key.
    pub fn new(surface: impl Into<String>, label: impl Into<String>, morphemes: Vec<MorphemeRef>) -> Self {
        Self {
            surface: surface.into(),
            label: label.into(),
            morphemes,
            coreference: None,
        }
    }

    /// Sets the coreference key.
    pub fn with_coreference(mut self, key: usize) -> Self {
        self.coreference = Some(key);
        self
    }
}

/// Semantic role edge as emitted by an analyzer, between word indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRole {
    /// Index of the predicate word.
    pub predicate: usize,
    /// Index of the argument word.
    pub argument: usize,
    /// Label in the analyzer's own vocabulary, e.g. `ARGM-LOC`.
    pub label: String,
    /// Indices of words modifying the argument.
    pub modifiers: Vec<usize>,
}

impl RawRole {
    /// Creates a role edge without modifiers.
    pub fn new(predicate: usize, argument: usize, label: impl Into<String>) -> Self {
        Self {
            predicate,
            argument,
            label: label.into(),
            modifiers: Vec::new(),
        }
    }

    /// Sets the modifier words of the argument.
    pub fn with_modifiers(mut self, modifiers: Vec<usize>) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// User dictionary entry: surface form, canonical tag and score.
///
/// Deserialization applies the same checks as [`DictEntry::with_score`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DictEntryFields")]
pub struct DictEntry {
    /// Surface form of the entry.
    pub surface: String,
    /// Canonical tag of the entry.
    pub tag: POS,
    /// Analyzer-specific weight. Backends that ignore weights ignore it.
    pub score: f32,
}

#[derive(Deserialize)]
struct DictEntryFields {
    surface: String,
    tag: POS,
    #[serde(default)]
    score: f32,
}

impl TryFrom<DictEntryFields> for DictEntry {
    type Error = KoalaError;

    fn try_from(fields: DictEntryFields) -> Result<Self> {
        DictEntry::with_score(fields.surface, fields.tag, fields.score)
    }
}

impl DictEntry {
    /// Creates an entry with the default score. Empty surfaces are rejected.
    pub fn new(surface: impl Into<String>, tag: POS) -> Result<Self> {
        Self::with_score(surface, tag, DEFAULT_ENTRY_SCORE)
    }

    /// Creates an entry with an explicit score.
    pub fn with_score(surface: impl Into<String>, tag: POS, score: f32) -> Result<Self> {
        let surface = surface.into();
        if surface.is_empty() {
            return Err(KoalaError::EmptySurface);
        }
        Ok(Self {
            surface,
            tag,
            score,
        })
    }

    /// `(surface, tag)` key used for de-duplication and existence checks.
    pub fn key(&self) -> (&str, POS) {
        (self.surface.as_str(), self.tag)
    }
}

/// Options applied by [`Analyzer::tag`](crate::Analyzer::tag) and
/// [`Analyzer::parse`](crate::Analyzer::parse).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeOptions {
    /// Split input text into sentences before tagging. When false the whole
    /// input is handed to the engine as one sentence.
    pub split_sentences: bool,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            split_sentences: true,
        }
    }
}

impl AnalyzeOptions {
    /// Enables or disables sentence splitting.
    pub fn with_split_sentences(mut self, split_sentences: bool) -> Self {
        self.split_sentences = split_sentences;
        self
    }
}
