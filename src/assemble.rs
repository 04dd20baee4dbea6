//! Turns flat analyzer output into a validated [`Sentence`].

use std::collections::VecDeque;

use crate::error::{DependencyError, KoalaError, Result};
use crate::model::{Morpheme, Relationship};
use crate::sentence::Sentence;
use crate::tag::{DependencyTag, PhraseTag};
use crate::tagset::TagNormalizer;
use crate::types::{HeadRef, RawWord};
use crate::word::Word;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EdgeLabel {
    pub(crate) relation: DependencyTag,
    pub(crate) phrase: Option<PhraseTag>,
    pub(crate) raw: Option<String>,
}

impl Default for EdgeLabel {
    fn default() -> Self {
        Self {
            relation: DependencyTag::UNDEF,
            phrase: None,
            raw: None,
        }
    }
}

/// Word with canonical morphemes whose head has not been checked yet.
#[derive(Debug, Clone)]
pub(crate) struct PendingWord {
    pub(crate) surface: String,
    pub(crate) morphemes: Vec<Morpheme>,
    pub(crate) head: Option<HeadRef>,
    pub(crate) relation: EdgeLabel,
}

/// Normalizes every raw tag of `raw_words` with `normalizer` and links the
/// words into a sentence.
///
/// Words without any head data produce an unparsed sentence. Otherwise the
/// heads must form a single tree rooted at the one word whose head is
/// [`HeadRef::Root`]; each dependent is attached to its governor in input
/// order. Nothing is returned on failure, partially assembled or not.
///
/// The root word has no governor edge, so any relation label on it (ETRI
/// marks the root with a bare phrase label such as `VP`) is dropped.
///
/// ```
/// use koala_rs::{assemble, AnalyzerKind, HeadRef, RawMorpheme, RawWord, TagTable};
///
/// let table = TagTable::new(AnalyzerKind::Kkma).unwrap();
/// let words = vec![
///     RawWord::new("나는", vec![RawMorpheme::new("나", "NP"), RawMorpheme::new("는", "JX")])
///         .with_head(HeadRef::Word(1))
///         .with_relation("주어"),
///     RawWord::new("간다", vec![RawMorpheme::new("가", "VV"), RawMorpheme::new("ㄴ다", "EFN")])
///         .with_head(HeadRef::Root),
/// ];
/// let sentence = assemble(words, &table).unwrap();
/// assert_eq!(sentence.root_word().unwrap().surface(), "간다");
/// ```
pub fn assemble(raw_words: Vec<RawWord>, normalizer: &dyn TagNormalizer) -> Result<Sentence> {
    let analyzer = normalizer.analyzer();
    log::debug!("assembling {} words from {}", raw_words.len(), analyzer);

    let result = normalize(raw_words, normalizer).and_then(link);
    if let Err(error) = &result {
        log::warn!("rejected {} output: {}", analyzer, error);
    }
    result
}

/// Links `source`'s words under the heads and relations of `raw_words`,
/// keeping `source`'s canonical morphemes. Only relation labels are
/// normalized, so the engine may echo morphemes in any vocabulary.
pub(crate) fn relink(
    source: &Sentence,
    raw_words: Vec<RawWord>,
    normalizer: &dyn TagNormalizer,
) -> Result<Sentence> {
    if raw_words.len() != source.len() {
        return Err(KoalaError::InvalidArgument(format!(
            "{} returned {} words for a sentence of {}",
            normalizer.analyzer(),
            raw_words.len(),
            source.len()
        )));
    }

    let mut pending = Vec::with_capacity(source.len());
    for (word, raw) in source.iter().zip(raw_words) {
        let relation = edge_label(raw.head, raw.relation, normalizer)?;
        pending.push(PendingWord {
            surface: word.surface().to_string(),
            morphemes: word.morphemes().to_vec(),
            head: raw.head,
            relation,
        });
    }
    link(pending)
}

// Root and headless words carry no edge, so their labels are not consulted.
fn edge_label(
    head: Option<HeadRef>,
    raw: Option<String>,
    normalizer: &dyn TagNormalizer,
) -> Result<EdgeLabel> {
    if !matches!(head, Some(HeadRef::Word(_))) {
        return Ok(EdgeLabel::default());
    }
    let (relation, phrase) = normalizer.normalize_relation(raw.as_deref())?;
    Ok(EdgeLabel {
        relation,
        phrase,
        raw,
    })
}

fn normalize(raw_words: Vec<RawWord>, normalizer: &dyn TagNormalizer) -> Result<Vec<PendingWord>> {
    let mut pending = Vec::with_capacity(raw_words.len());
    for (position, raw) in raw_words.into_iter().enumerate() {
        if raw.morphemes.is_empty() {
            return Err(DependencyError::EmptyWord { word: position }.into());
        }

        let morphemes = raw
            .morphemes
            .into_iter()
            .enumerate()
            .map(|(index, morpheme)| -> Result<Morpheme> {
                let tag = normalizer.normalize_tag(&morpheme.raw_tag)?;
                let normalized = Morpheme::new(morpheme.surface, tag, Some(morpheme.raw_tag), index)?;
                Ok(match morpheme.word_sense {
                    Some(sense) => normalized.with_word_sense(sense),
                    None => normalized,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let relation = edge_label(raw.head, raw.relation, normalizer)?;

        pending.push(PendingWord {
            surface: raw.surface,
            morphemes,
            head: raw.head,
            relation,
        });
    }
    Ok(pending)
}

/// Validates head data and builds the sentence over an index-addressed
/// word array.
pub(crate) fn link(pending: Vec<PendingWord>) -> Result<Sentence> {
    let len = pending.len();
    if len == 0 {
        return Err(DependencyError::EmptySentence.into());
    }
    if let Some(word) = pending.iter().position(|word| word.morphemes.is_empty()) {
        return Err(DependencyError::EmptyWord { word }.into());
    }

    if pending.iter().all(|word| word.head.is_none()) {
        let words = pending
            .into_iter()
            .enumerate()
            .map(|(index, word)| Word::new(word.surface, word.morphemes, index))
            .collect();
        return Ok(Sentence::from_parts(words, None));
    }
    if let Some(word) = pending.iter().position(|word| word.head.is_none()) {
        return Err(DependencyError::MissingHead { word }.into());
    }

    let mut roots = Vec::new();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); len];
    for (word, pending_word) in pending.iter().enumerate() {
        match pending_word.head {
            Some(HeadRef::Word(head)) if head >= len => {
                return Err(DependencyError::HeadOutOfRange { word, head, len }.into());
            }
            Some(HeadRef::Word(head)) if head == word => {
                return Err(DependencyError::SelfLoop { word }.into());
            }
            Some(HeadRef::Word(head)) => children[head].push(word),
            _ => roots.push(word),
        }
    }

    if roots.len() > 1 {
        return Err(DependencyError::MultipleRoots { roots }.into());
    }
    let Some(&root) = roots.first() else {
        return Err(DependencyError::NoRoot.into());
    };

    let mut reached = vec![false; len];
    let mut queue = VecDeque::from([root]);
    reached[root] = true;
    while let Some(current) = queue.pop_front() {
        for &child in &children[current] {
            if !reached[child] {
                reached[child] = true;
                queue.push_back(child);
            }
        }
    }
    if let Some(word) = reached.iter().position(|reached| !reached) {
        return Err(DependencyError::Cycle { word }.into());
    }

    let mut heads = Vec::with_capacity(len);
    let mut words = Vec::with_capacity(len);
    for (index, word) in pending.into_iter().enumerate() {
        heads.push((word.head, word.relation));
        words.push(Word::new(word.surface, word.morphemes, index));
    }
    for (target, (head, label)) in heads.into_iter().enumerate() {
        if let Some(HeadRef::Word(governor)) = head {
            words[governor].push_dependent(Relationship::new(
                governor,
                target,
                label.relation,
                label.phrase,
                label.raw,
            ));
        }
    }

    log::debug!("linked {} words under root #{}", len, root);
    Ok(Sentence::from_parts(words, Some(root)))
}
