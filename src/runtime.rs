use std::sync::Arc;

use crate::analyzer::{AnalyzerKind, Capability};
use crate::annotate::{annotate_entities, annotate_roles};
use crate::assemble::{assemble, relink};
use crate::error::{DependencyError, KoalaError, Result};
use crate::model::Morpheme;
use crate::sentence::Sentence;
use crate::tagset::{TagNormalizer, TagTable};
use crate::types::{AnalyzeOptions, RawEntity, RawMorpheme, RawRole, RawWord};

fn unsupported(analyzer: AnalyzerKind, capability: Capability) -> KoalaError {
    KoalaError::Unsupported {
        analyzer,
        capability,
    }
}

/// Native analyzer engine producing flat, unnormalized output.
///
/// Implementations wrap their own failures with [`KoalaError::engine`];
/// [`Analyzer`] passes them through untouched. Every method other than
/// [`Engine::kind`] defaults to [`KoalaError::Unsupported`].
pub trait Engine {
    /// Analyzer variant this engine runs.
    fn kind(&self) -> AnalyzerKind;

    /// Splits raw text into sentences.
    fn split(&self, text: &str) -> Result<Vec<String>> {
        let _ = text;
        Err(unsupported(self.kind(), Capability::SentenceSplit))
    }

    /// Tags one sentence.
    fn tag(&self, sentence: &str) -> Result<Vec<RawWord>> {
        let _ = sentence;
        Err(unsupported(self.kind(), Capability::Tagging))
    }

    /// Tags and parses one sentence. Every returned word carries a head.
    fn parse(&self, sentence: &str) -> Result<Vec<RawWord>> {
        let _ = sentence;
        Err(unsupported(self.kind(), Capability::Parsing))
    }

    /// Parses words that were already tagged, keeping their morphemes.
    fn parse_tagged(&self, words: &[RawWord]) -> Result<Vec<RawWord>> {
        let _ = words;
        Err(unsupported(self.kind(), Capability::Parsing))
    }

    /// Finds named entities in tagged words. Morpheme references index
    /// into `words`.
    fn recognize_entities(&self, words: &[RawWord]) -> Result<Vec<RawEntity>> {
        let _ = words;
        Err(unsupported(self.kind(), Capability::EntityRecognition))
    }

    /// Labels the semantic roles of predicates in tagged words.
    fn label_roles(&self, words: &[RawWord]) -> Result<Vec<RawRole>> {
        let _ = words;
        Err(unsupported(self.kind(), Capability::RoleLabeling))
    }
}

/// Analysis pipeline over one [`Engine`]: engine output is normalized with
/// the variant's [`TagTable`] and assembled into [`Sentence`]s.
///
/// Obtain one through [`AnalyzerContext::analyzer`](crate::AnalyzerContext::analyzer).
#[derive(Debug, Clone)]
pub struct Analyzer<E> {
    engine: E,
    table: TagTable,
    options: AnalyzeOptions,
}

impl<E: Engine> Analyzer<E> {
    pub(crate) fn new(engine: E, options: AnalyzeOptions) -> Result<Self> {
        let table = TagTable::new(engine.kind())?;
        Ok(Self {
            engine,
            table,
            options,
        })
    }

    /// Analyzer variant of the wrapped engine.
    pub fn kind(&self) -> AnalyzerKind {
        self.engine.kind()
    }

    /// Wrapped engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Tag table used to normalize the engine's output.
    pub fn tag_table(&self) -> &TagTable {
        &self.table
    }

    /// Options applied by [`Self::tag`] and [`Self::parse`].
    pub fn options(&self) -> AnalyzeOptions {
        self.options
    }

    /// Replaces the analysis options.
    pub fn with_options(mut self, options: AnalyzeOptions) -> Self {
        self.options = options;
        self
    }

    /// Replaces the tag table, e.g. one extended with
    /// [`TagTable::with_pattern`]. The table must belong to the same variant.
    pub fn with_tag_table(mut self, table: TagTable) -> Result<Self> {
        if table.analyzer() != self.kind() {
            return Err(KoalaError::InvalidArgument(format!(
                "tag table for {} cannot normalize {} output",
                table.analyzer(),
                self.kind()
            )));
        }
        self.table = table;
        Ok(self)
    }

    /// Splits `text` into sentences, dropping blank ones.
    pub fn split_sentences(&self, text: &str) -> Result<Vec<String>> {
        self.kind().require(Capability::SentenceSplit)?;
        let sentences = self.engine.split(text)?;
        Ok(sentences
            .into_iter()
            .filter(|sentence| !sentence.trim().is_empty())
            .collect())
    }

    fn sentences_of(&self, text: &str) -> Result<Vec<String>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        if self.options.split_sentences {
            self.split_sentences(text)
        } else {
            Ok(vec![text.to_string()])
        }
    }

    /// Tags `text`, splitting it into sentences first unless
    /// [`AnalyzeOptions::split_sentences`] is off. Blank text yields no
    /// sentences.
    pub fn tag(&self, text: &str) -> Result<Vec<Sentence>> {
        self.kind().require(Capability::Tagging)?;
        self.sentences_of(text)?
            .iter()
            .map(|sentence| self.tag_sentence(sentence))
            .collect()
    }

    /// Tags one sentence without splitting it.
    pub fn tag_sentence(&self, sentence: &str) -> Result<Sentence> {
        self.kind().require(Capability::Tagging)?;
        let raw = self.engine.tag(sentence)?;
        log::debug!("{} tagged {} words", self.kind(), raw.len());
        assemble(raw, &self.table)
    }

    /// Parses `text`, splitting it as [`Self::tag`] does.
    pub fn parse(&self, text: &str) -> Result<Vec<Sentence>> {
        self.kind().require(Capability::Parsing)?;
        self.sentences_of(text)?
            .iter()
            .map(|sentence| self.parse_sentence(sentence))
            .collect()
    }

    /// Parses one sentence without splitting it. The result always carries
    /// a dependency tree.
    pub fn parse_sentence(&self, sentence: &str) -> Result<Sentence> {
        self.kind().require(Capability::Parsing)?;
        let raw = self.engine.parse(sentence)?;
        log::debug!("{} parsed {} words", self.kind(), raw.len());
        require_tree(assemble(raw, &self.table)?)
    }

    /// Parses an already analyzed sentence, keeping its morphemes. The
    /// result records the input as its [`Sentence::source`].
    ///
    /// The input may come from any analyzer. Raw tags this engine does not
    /// understand are sent as canonical codes.
    pub fn reparse(&self, sentence: impl Into<Arc<Sentence>>) -> Result<Sentence> {
        self.kind().require(Capability::Parsing)?;
        let source: Arc<Sentence> = sentence.into();
        let words = self.encode(&source);

        let raw = self.engine.parse_tagged(&words)?;
        log::debug!("{} re-parsed {} words", self.kind(), raw.len());
        let parsed = require_tree(relink(&source, raw, &self.table)?)?;
        Ok(parsed.with_source(source))
    }

    /// Adds the engine's named entities and coreference groups to `sentence`.
    pub fn recognize_entities(&self, sentence: Sentence) -> Result<Sentence> {
        self.kind().require(Capability::EntityRecognition)?;
        let raw = self.engine.recognize_entities(&self.encode(&sentence))?;
        log::debug!("{} found {} entities", self.kind(), raw.len());
        annotate_entities(sentence, raw, &self.table)
    }

    /// Adds the engine's semantic role edges to `sentence`.
    pub fn label_roles(&self, sentence: Sentence) -> Result<Sentence> {
        self.kind().require(Capability::RoleLabeling)?;
        let raw = self.engine.label_roles(&self.encode(&sentence))?;
        log::debug!("{} labeled {} roles", self.kind(), raw.len());
        annotate_roles(sentence, raw, &self.table)
    }

    fn encode(&self, sentence: &Sentence) -> Vec<RawWord> {
        sentence
            .iter()
            .map(|word| {
                RawWord::new(
                    word.surface(),
                    word.iter().map(|morpheme| self.encode_morpheme(morpheme)).collect(),
                )
            })
            .collect()
    }

    fn encode_morpheme(&self, morpheme: &Morpheme) -> RawMorpheme {
        let tag = match morpheme.raw_tag() {
            Some(raw) if self.table.normalize_tag(raw).ok() == Some(morpheme.tag()) => raw,
            _ => morpheme.tag().code(),
        };
        let encoded = RawMorpheme::new(morpheme.surface(), tag);
        match morpheme.word_sense() {
            Some(sense) => encoded.with_word_sense(sense),
            None => encoded,
        }
    }
}

fn require_tree(sentence: Sentence) -> Result<Sentence> {
    if sentence.is_parsed() {
        Ok(sentence)
    } else {
        Err(DependencyError::NoRoot.into())
    }
}
