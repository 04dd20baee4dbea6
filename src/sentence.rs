use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::annotate::{attach_entities, attach_roles};
use crate::assemble::{link, EdgeLabel, PendingWord};
use crate::constants::DEFAULT_WORD_DELIMITER;
use crate::error::{KoalaError, Result};
use crate::model::{CoreferenceGroup, Entity, Morpheme, MorphemeRef, Relationship, RoleEdge};
use crate::tag::POS;
use crate::types::HeadRef;
use crate::word::Word;

/// Analyzed sentence: words in order and, when parsed, one dependency tree.
///
/// A sentence built from tagging output carries no edges and no root.
/// A parsed sentence has exactly one root and every word is reachable from
/// it through [`Word::dependents`]. Named entities and semantic roles are
/// attached afterwards and address words and morphemes by index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    words: Vec<Word>,
    root: Option<usize>,
    entities: Vec<Entity>,
    coreference: Vec<CoreferenceGroup>,
    source: Option<Arc<Sentence>>,
}

impl Sentence {
    pub(crate) fn from_parts(words: Vec<Word>, root: Option<usize>) -> Self {
        Self {
            words,
            root,
            entities: Vec::new(),
            coreference: Vec::new(),
            source: None,
        }
    }

    pub(crate) fn extend_entities(&mut self, entities: Vec<Entity>, groups: Vec<CoreferenceGroup>) {
        self.entities.extend(entities);
        self.coreference.extend(groups);
    }

    pub(crate) fn push_role(&mut self, edge: RoleEdge) {
        if let Some(word) = self.words.get_mut(edge.predicate()) {
            word.push_argument_role(edge);
        }
    }

    pub(crate) fn with_source(mut self, source: Arc<Sentence>) -> Self {
        self.source = Some(source);
        self
    }

    /// Words in order.
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always false for assembled sentences.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Word at `index`.
    pub fn get(&self, index: usize) -> Option<&Word> {
        self.words.get(index)
    }

    /// Iterates over words in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Word> {
        self.words.iter()
    }

    /// Index of the root word, present only for parsed sentences.
    pub fn root(&self) -> Option<usize> {
        self.root
    }

    /// Root word, present only for parsed sentences.
    pub fn root_word(&self) -> Option<&Word> {
        self.root.and_then(|index| self.words.get(index))
    }

    /// Whether this sentence carries dependency data.
    pub fn is_parsed(&self) -> bool {
        self.root.is_some()
    }

    /// Earlier-stage sentence this one was re-analyzed from.
    pub fn source(&self) -> Option<&Sentence> {
        self.source.as_deref()
    }

    /// First word satisfying `predicate`.
    pub fn find<P>(&self, mut predicate: P) -> Option<&Word>
    where
        P: FnMut(&Word) -> bool,
    {
        self.words.iter().find(|word| predicate(word))
    }

    /// Whether any word satisfies `predicate`.
    pub fn exists<P>(&self, mut predicate: P) -> bool
    where
        P: FnMut(&Word) -> bool,
    {
        self.words.iter().any(|word| predicate(word))
    }

    /// All words satisfying `predicate`.
    pub fn filter<P>(&self, mut predicate: P) -> Vec<&Word>
    where
        P: FnMut(&Word) -> bool,
    {
        self.words.iter().filter(|word| predicate(word)).collect()
    }

    /// Words that work as nouns, judged by their last derivational suffix
    /// or transforming ending ([`Word::is_nominal`]).
    pub fn nouns(&self) -> Vec<&Word> {
        self.filter(Word::is_nominal)
    }

    /// Words that work as predicates ([`Word::is_predicative`]).
    pub fn verbs(&self) -> Vec<&Word> {
        self.filter(Word::is_predicative)
    }

    /// Words that work as modifiers ([`Word::is_adnominal`]).
    pub fn modifiers(&self) -> Vec<&Word> {
        self.filter(Word::is_adnominal)
    }

    /// Word surfaces joined with `delimiter`.
    pub fn surface_string(&self, delimiter: &str) -> String {
        self.words
            .iter()
            .map(Word::surface)
            .collect::<Vec<_>>()
            .join(delimiter)
    }

    /// Every word in single-line form, separated by spaces, e.g.
    /// `나/NP+는/JX 가/VV+ㄴ다/EF`.
    pub fn single_line_string(&self) -> String {
        self.words
            .iter()
            .map(Word::single_line_string)
            .collect::<Vec<_>>()
            .join(DEFAULT_WORD_DELIMITER)
    }

    /// Whether the words contain, in order but not necessarily adjacent,
    /// words matching each pattern as in [`Word::matches`].
    pub fn matches(&self, patterns: &[&[&str]]) -> bool {
        let mut words = self.words.iter();
        patterns
            .iter()
            .all(|pattern| words.any(|word| word.matches(pattern)))
    }

    /// Every dependency edge, grouped by governor in word order.
    pub fn dependencies(&self) -> Vec<&Relationship> {
        self.words
            .iter()
            .flat_map(|word| word.dependents().iter())
            .collect()
    }

    /// Edge in which word `index` is the dependent. `None` for the root and
    /// for unparsed sentences.
    pub fn governor_edge(&self, index: usize) -> Option<&Relationship> {
        self.words
            .iter()
            .flat_map(|word| word.dependents().iter())
            .find(|edge| edge.target() == index)
    }

    /// Edges governed by word `index`; empty when the index is out of range.
    pub fn dependents_of(&self, index: usize) -> &[Relationship] {
        self.words
            .get(index)
            .map(Word::dependents)
            .unwrap_or(&[])
    }

    /// Named entities in the order the analyzer reported them.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Entities covering any morpheme of word `index`.
    pub fn entities_of_word(&self, index: usize) -> Vec<&Entity> {
        self.entities
            .iter()
            .filter(|entity| entity.touches_word(index))
            .collect()
    }

    /// Entities covering the morpheme at `at`.
    pub fn entities_at(&self, at: MorphemeRef) -> Vec<&Entity> {
        self.entities
            .iter()
            .filter(|entity| entity.morphemes().contains(&at))
            .collect()
    }

    /// Groups of entities referring to the same thing.
    pub fn coreference_groups(&self) -> &[CoreferenceGroup] {
        &self.coreference
    }

    /// Coreference group containing entity `entity`, if any.
    pub fn coreference_group_of(&self, entity: usize) -> Option<&CoreferenceGroup> {
        self.coreference
            .iter()
            .find(|group| group.entities().contains(&entity))
    }

    /// Every semantic role edge, grouped by predicate in word order.
    pub fn roles(&self) -> Vec<&RoleEdge> {
        self.words
            .iter()
            .flat_map(|word| word.argument_roles().iter())
            .collect()
    }

    /// Role edges whose predicate is word `index`.
    pub fn argument_roles(&self, index: usize) -> &[RoleEdge] {
        self.words
            .get(index)
            .map(Word::argument_roles)
            .unwrap_or(&[])
    }

    /// Role edges in which word `index` is the argument.
    pub fn predicate_roles(&self, index: usize) -> Vec<&RoleEdge> {
        self.words
            .iter()
            .flat_map(|word| word.argument_roles().iter())
            .filter(|edge| edge.argument() == index)
            .collect()
    }

    /// Indented rendering of the dependency tree, one word per line.
    ///
    /// ```text
    /// 간다 [ROOT]
    ///   나는 [NP_SBJ]
    /// ```
    ///
    /// Unparsed sentences render each word on its own line without
    /// indentation.
    pub fn tree_string(&self) -> String {
        let mut out = String::new();
        match self.root {
            Some(root) => self.write_subtree(&mut out, root, None, 0),
            None => {
                for word in &self.words {
                    out.push_str(word.surface());
                    out.push('\n');
                }
            }
        }
        out
    }

    fn write_subtree(&self, out: &mut String, index: usize, edge: Option<&Relationship>, depth: usize) {
        let Some(word) = self.words.get(index) else {
            return;
        };
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push_str(word.surface());
        match edge {
            Some(edge) => match edge.phrase() {
                Some(phrase) => out.push_str(&format!(" [{}_{}]", phrase, edge.relation())),
                None => out.push_str(&format!(" [{}]", edge.relation())),
            },
            None => out.push_str(" [ROOT]"),
        }
        out.push('\n');
        for child in word.dependents() {
            self.write_subtree(out, child.target(), Some(child), depth + 1);
        }
    }

    /// Structured record of this sentence.
    pub fn to_record(&self) -> SentenceRecord {
        SentenceRecord {
            words: self
                .words
                .iter()
                .map(|word| WordRecord {
                    index: word.index(),
                    surface: word.surface().to_string(),
                    morphemes: word.iter().map(MorphemeRecord::from).collect(),
                    dependents: word.dependents().to_vec(),
                    argument_roles: word.argument_roles().to_vec(),
                })
                .collect(),
            root: self.root,
            entities: self.entities.clone(),
            coreference: self.coreference.clone(),
        }
    }

    /// Rebuilds a sentence from a record, validating it like fresh analyzer
    /// output. The source sentence is not part of the record.
    pub fn from_record(record: SentenceRecord) -> Result<Self> {
        let len = record.words.len();
        let parsed = record.root.is_some()
            || record.words.iter().any(|word| !word.dependents.is_empty());

        let mut pending: Vec<PendingWord> = Vec::with_capacity(len);
        for (position, word) in record.words.iter().enumerate() {
            if word.index != position {
                return Err(KoalaError::InvalidArgument(format!(
                    "word record at position {position} carries index {}",
                    word.index
                )));
            }
            let morphemes = word
                .morphemes
                .iter()
                .enumerate()
                .map(|(index, m)| -> Result<Morpheme> {
                    let morpheme = Morpheme::new(m.surface.clone(), m.tag, m.raw_tag.clone(), index)?;
                    Ok(match m.word_sense {
                        Some(sense) => morpheme.with_word_sense(sense),
                        None => morpheme,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            pending.push(PendingWord {
                surface: word.surface.clone(),
                morphemes,
                head: if parsed { Some(HeadRef::Root) } else { None },
                relation: EdgeLabel::default(),
            });
        }

        for word in &record.words {
            for edge in &word.dependents {
                if edge.governor() != word.index {
                    return Err(KoalaError::InvalidArgument(format!(
                        "edge {edge} is stored under word #{}",
                        word.index
                    )));
                }
                let Some(target) = pending.get_mut(edge.target()) else {
                    return Err(KoalaError::InvalidArgument(format!(
                        "edge {edge} targets a word outside the sentence of {len} words"
                    )));
                };
                if matches!(target.head, Some(HeadRef::Word(_))) {
                    return Err(KoalaError::InvalidArgument(format!(
                        "word #{} has more than one governor",
                        edge.target()
                    )));
                }
                target.head = Some(HeadRef::Word(edge.governor()));
                target.relation = EdgeLabel {
                    relation: edge.relation(),
                    phrase: edge.phrase(),
                    raw: edge.raw_relation().map(str::to_string),
                };
            }
        }

        let sentence = link(pending)?;
        if sentence.root != record.root {
            return Err(KoalaError::InvalidArgument(format!(
                "record root {:?} does not match its edges (root {:?})",
                record.root, sentence.root
            )));
        }

        let mut roles = Vec::new();
        for word in record.words {
            for edge in word.argument_roles {
                if edge.predicate() != word.index {
                    return Err(KoalaError::InvalidArgument(format!(
                        "role {edge} is stored under word #{}",
                        word.index
                    )));
                }
                roles.push(edge);
            }
        }
        let sentence = attach_roles(sentence, roles)?;
        attach_entities(sentence, record.entities, record.coreference)
    }

    /// JSON form of [`Self::to_record`].
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_record())?)
    }

    /// Parses JSON produced by [`Self::to_json`] and validates it.
    pub fn from_json(json: &str) -> Result<Self> {
        let record: SentenceRecord = serde_json::from_str(json)?;
        Self::from_record(record)
    }
}

impl<'a> IntoIterator for &'a Sentence {
    type Item = &'a Word;
    type IntoIter = std::slice::Iter<'a, Word>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.iter()
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.surface_string(DEFAULT_WORD_DELIMITER))
    }
}

/// Structured form of a [`Morpheme`]. Its index is its position in the
/// enclosing word record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MorphemeRecord {
    /// Surface form.
    pub surface: String,
    /// Canonical tag.
    pub tag: POS,
    /// Raw analyzer tag.
    #[serde(default)]
    pub raw_tag: Option<String>,
    /// Dictionary sense number.
    #[serde(default)]
    pub word_sense: Option<u32>,
}

impl From<&Morpheme> for MorphemeRecord {
    fn from(morpheme: &Morpheme) -> Self {
        Self {
            surface: morpheme.surface().to_string(),
            tag: morpheme.tag(),
            raw_tag: morpheme.raw_tag().map(str::to_string),
            word_sense: morpheme.word_sense(),
        }
    }
}

/// Structured form of a [`Word`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordRecord {
    /// Position in the sentence.
    pub index: usize,
    /// Surface form.
    pub surface: String,
    /// Morphemes in order.
    pub morphemes: Vec<MorphemeRecord>,
    /// Edges governed by this word, serialized as
    /// `{governor, target, relation, phrase, raw_relation}`.
    #[serde(default)]
    pub dependents: Vec<Relationship>,
    /// Semantic role edges whose predicate is this word.
    #[serde(default)]
    pub argument_roles: Vec<RoleEdge>,
}

/// Structured form of a [`Sentence`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceRecord {
    /// Words in order.
    pub words: Vec<WordRecord>,
    /// Root word index, absent for unparsed sentences.
    #[serde(default)]
    pub root: Option<usize>,
    /// Named entities.
    #[serde(default)]
    pub entities: Vec<Entity>,
    /// Coreference groups over [`Self::entities`].
    #[serde(default)]
    pub coreference: Vec<CoreferenceGroup>,
}
