use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::{KoalaError, Result};
use crate::tag::{CoarseEntityType, DependencyTag, PhraseTag, RoleType, POS};

/// Smallest analyzed unit: a surface form with its canonical tag.
///
/// Equality compares `surface`, `tag` and `index`. The raw tag is kept for
/// inspection only, so two analyzers that agree on the canonical tag produce
/// equal morphemes.
#[derive(Debug, Clone)]
pub struct Morpheme {
    surface: String,
    tag: POS,
    raw_tag: Option<String>,
    index: usize,
    word_sense: Option<u32>,
}

impl Morpheme {
    /// Creates a morpheme. Fails with [`KoalaError::EmptySurface`] when
    /// `surface` is empty.
    pub fn new(
        surface: impl Into<String>,
        tag: POS,
        raw_tag: Option<String>,
        index: usize,
    ) -> Result<Self> {
        let surface = surface.into();
        if surface.is_empty() {
            return Err(KoalaError::EmptySurface);
        }
        Ok(Self {
            surface,
            tag,
            raw_tag,
            index,
            word_sense: None,
        })
    }

    /// Attaches a dictionary sense number from word sense disambiguation.
    pub fn with_word_sense(mut self, sense: u32) -> Self {
        self.word_sense = Some(sense);
        self
    }

    /// Surface form.
    pub fn surface(&self) -> &str {
        &self.surface
    }

    /// Canonical tag.
    pub fn tag(&self) -> POS {
        self.tag
    }

    /// Tag as emitted by the analyzer, if it recorded one.
    pub fn raw_tag(&self) -> Option<&str> {
        self.raw_tag.as_deref()
    }

    /// Position within the owning word.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Dictionary sense number, when word sense disambiguation ran.
    pub fn word_sense(&self) -> Option<u32> {
        self.word_sense
    }

    /// Equality ignoring tags: surface and index only.
    pub fn equals_without_tag(&self, other: &Morpheme) -> bool {
        self.surface == other.surface && self.index == other.index
    }

    /// Exact canonical tag check.
    pub fn has_tag(&self, tag: POS) -> bool {
        self.tag == tag
    }

    /// Partial canonical tag check, see [`POS::starts_with`].
    pub fn has_tag_prefix(&self, partial: &str) -> bool {
        self.tag.starts_with(partial)
    }

    /// True when any of `partials` matches as in [`Self::has_tag_prefix`].
    pub fn has_tag_one_of(&self, partials: &[&str]) -> bool {
        partials.iter().any(|partial| self.has_tag_prefix(partial))
    }

    /// Exact raw tag check. False when no raw tag was recorded.
    pub fn has_raw_tag(&self, raw_tag: &str) -> bool {
        self.raw_tag.as_deref() == Some(raw_tag)
    }

    /// Case-insensitive raw tag prefix check. False when no raw tag was
    /// recorded.
    pub fn has_raw_tag_prefix(&self, partial: &str) -> bool {
        self.raw_tag
            .as_deref()
            .is_some_and(|raw| raw.to_uppercase().starts_with(&partial.to_uppercase()))
    }

    /// Shortcut for [`POS::is_noun`].
    pub fn is_noun(&self) -> bool {
        self.tag.is_noun()
    }

    /// Shortcut for [`POS::is_predicate`].
    pub fn is_predicate(&self) -> bool {
        self.tag.is_predicate()
    }

    /// Shortcut for [`POS::is_modifier`].
    pub fn is_modifier(&self) -> bool {
        self.tag.is_modifier()
    }

    /// Shortcut for [`POS::is_postposition`].
    pub fn is_josa(&self) -> bool {
        self.tag.is_postposition()
    }
}

impl PartialEq for Morpheme {
    fn eq(&self, other: &Self) -> bool {
        self.surface == other.surface && self.tag == other.tag && self.index == other.index
    }
}

impl Eq for Morpheme {}

impl Hash for Morpheme {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.surface.hash(state);
        self.tag.hash(state);
        self.index.hash(state);
    }
}

impl fmt::Display for Morpheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.raw_tag {
            Some(raw) => write!(f, "{}/{}({})", self.surface, self.tag, raw),
            None => write!(f, "{}/{}", self.surface, self.tag),
        }
    }
}

/// Dependency edge between two words of one sentence.
///
/// Both endpoints are word indices within the owning sentence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relationship {
    governor: usize,
    target: usize,
    relation: DependencyTag,
    phrase: Option<PhraseTag>,
    raw_relation: Option<String>,
}

impl Relationship {
    pub(crate) fn new(
        governor: usize,
        target: usize,
        relation: DependencyTag,
        phrase: Option<PhraseTag>,
        raw_relation: Option<String>,
    ) -> Self {
        Self {
            governor,
            target,
            relation,
            phrase,
            raw_relation,
        }
    }

    /// Index of the head word.
    pub fn governor(&self) -> usize {
        self.governor
    }

    /// Index of the dependent word.
    pub fn target(&self) -> usize {
        self.target
    }

    /// Canonical function label.
    pub fn relation(&self) -> DependencyTag {
        self.relation
    }

    /// Canonical phrase label, when the analyzer gives one.
    pub fn phrase(&self) -> Option<PhraseTag> {
        self.phrase
    }

    /// Label as emitted by the analyzer.
    pub fn raw_relation(&self) -> Option<&str> {
        self.raw_relation.as_deref()
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.phrase {
            Some(phrase) => write!(
                f,
                "{}_{}({} -> {})",
                phrase, self.relation, self.governor, self.target
            ),
            None => write!(f, "{}({} -> {})", self.relation, self.governor, self.target),
        }
    }
}

/// Address of one morpheme inside a sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MorphemeRef {
    /// Word index within the sentence.
    pub word: usize,
    /// Morpheme index within that word.
    pub morpheme: usize,
}

impl MorphemeRef {
    /// Addresses morpheme `morpheme` of word `word`.
    pub fn new(word: usize, morpheme: usize) -> Self {
        Self { word, morpheme }
    }
}

/// Named entity spanning one or more morphemes of a sentence.
///
/// The fine label always starts with the coarse label's code, e.g.
/// `LCP_COUNTRY` under [`CoarseEntityType::LC`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    surface: String,
    label: CoarseEntityType,
    fine_label: String,
    raw_label: Option<String>,
    morphemes: Vec<MorphemeRef>,
}

impl Entity {
    pub(crate) fn new(
        surface: String,
        label: CoarseEntityType,
        fine_label: String,
        raw_label: Option<String>,
        morphemes: Vec<MorphemeRef>,
    ) -> Self {
        Self {
            surface,
            label,
            fine_label,
            raw_label,
            morphemes,
        }
    }

    /// Surface form of the entity.
    pub fn surface(&self) -> &str {
        &self.surface
    }

    /// Coarse class.
    pub fn label(&self) -> CoarseEntityType {
        self.label
    }

    /// Fine class, prefixed by [`Self::label`].
    pub fn fine_label(&self) -> &str {
        &self.fine_label
    }

    /// Label as emitted by the analyzer.
    pub fn raw_label(&self) -> Option<&str> {
        self.raw_label.as_deref()
    }

    /// Morphemes covered by the entity, in sentence order.
    pub fn morphemes(&self) -> &[MorphemeRef] {
        &self.morphemes
    }

    /// Whether the entity covers any morpheme of word `word`.
    pub fn touches_word(&self, word: usize) -> bool {
        self.morphemes.iter().any(|at| at.word == word)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}; '{}')", self.label, self.fine_label, self.surface)
    }
}

/// Entities of one sentence that refer to the same thing, by entity index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoreferenceGroup {
    entities: Vec<usize>,
}

impl CoreferenceGroup {
    pub(crate) fn new(entities: Vec<usize>) -> Self {
        Self { entities }
    }

    /// Indices into [`Sentence::entities`](crate::Sentence::entities).
    pub fn entities(&self) -> &[usize] {
        &self.entities
    }
}

/// Semantic role edge from a predicate word to one of its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleEdge {
    predicate: usize,
    argument: usize,
    label: RoleType,
    modifiers: Vec<usize>,
    raw_label: Option<String>,
}

impl RoleEdge {
    pub(crate) fn new(
        predicate: usize,
        argument: usize,
        label: RoleType,
        modifiers: Vec<usize>,
        raw_label: Option<String>,
    ) -> Self {
        Self {
            predicate,
            argument,
            label,
            modifiers,
            raw_label,
        }
    }

    /// Index of the predicate word.
    pub fn predicate(&self) -> usize {
        self.predicate
    }

    /// Index of the argument word.
    pub fn argument(&self) -> usize {
        self.argument
    }

    /// Canonical role.
    pub fn label(&self) -> RoleType {
        self.label
    }

    /// Indices of words modifying the argument.
    pub fn modifiers(&self) -> &[usize] {
        &self.modifiers
    }

    /// Label as emitted by the analyzer.
    pub fn raw_label(&self) -> Option<&str> {
        self.raw_label.as_deref()
    }
}

impl fmt::Display for RoleEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({} -> {})", self.label, self.predicate, self.argument)
    }
}

#[cfg(test)]
mod model_tests {
    use super::{Entity, Morpheme, MorphemeRef, Relationship, RoleEdge};
    use crate::error::KoalaError;
    use crate::tag::{CoarseEntityType, DependencyTag, PhraseTag, RoleType, POS};
    use proptest::prelude::*;

    fn morpheme(surface: &str, tag: POS, raw: Option<&str>, index: usize) -> Morpheme {
        Morpheme::new(surface, tag, raw.map(str::to_string), index).unwrap()
    }

    #[test]
    fn empty_surface_is_rejected() {
        assert!(matches!(
            Morpheme::new("", POS::NNG, None, 0),
            Err(KoalaError::EmptySurface)
        ));
    }

    #[test]
    fn equality_ignores_raw_tag() {
        let kkma = morpheme("가", POS::VV, Some("VV"), 0);
        let hnn = morpheme("가", POS::VV, Some("PV"), 0);
        assert_eq!(kkma, hnn);
        assert_ne!(kkma, morpheme("가", POS::VX, Some("VXV"), 0));
        assert_ne!(kkma, morpheme("가", POS::VV, Some("VV"), 1));
        assert!(kkma.equals_without_tag(&morpheme("가", POS::VX, None, 0)));
        assert!(!kkma.equals_without_tag(&morpheme("가", POS::VV, None, 1)));
    }

    #[test]
    fn tag_queries() {
        let m = morpheme("는", POS::JX, Some("jxc"), 1);
        assert!(m.has_tag(POS::JX));
        assert!(m.has_tag_prefix("j"));
        assert!(m.has_tag_one_of(&["NN", "JX"]));
        assert!(!m.has_tag_one_of(&["NN", "V"]));
        assert!(m.has_raw_tag("jxc"));
        assert!(!m.has_raw_tag("JXC"));
        assert!(m.has_raw_tag_prefix("JX"));
        assert!(m.is_josa());
        assert!(!m.is_noun());

        let bare = morpheme("나", POS::NP, None, 0);
        assert!(!bare.has_raw_tag("NP"));
        assert!(!bare.has_raw_tag_prefix(""));
        assert!(bare.is_noun());
    }

    #[test]
    fn display_shows_raw_tag_when_present() {
        assert_eq!(morpheme("가", POS::VV, Some("PV"), 0).to_string(), "가/VV(PV)");
        assert_eq!(morpheme("가", POS::VV, None, 0).to_string(), "가/VV");
    }

    #[test]
    fn word_sense_is_not_part_of_equality() {
        let plain = morpheme("눈", POS::NNG, None, 0);
        let sensed = plain.clone().with_word_sense(2);
        assert_eq!(sensed.word_sense(), Some(2));
        assert_eq!(plain.word_sense(), None);
        assert_eq!(plain, sensed);
    }

    #[test]
    fn entity_and_role_display() {
        let entity = Entity::new(
            "미국".to_string(),
            CoarseEntityType::LC,
            "LCP_COUNTRY".to_string(),
            None,
            vec![MorphemeRef::new(1, 0)],
        );
        assert_eq!(entity.to_string(), "LC(LCP_COUNTRY; '미국')");
        assert!(entity.touches_word(1));
        assert!(!entity.touches_word(0));

        let role = RoleEdge::new(2, 0, RoleType::ARG0, vec![], Some("ARG0".to_string()));
        assert_eq!(role.to_string(), "ARG0(2 -> 0)");
        assert!(role.modifiers().is_empty());
    }

    #[test]
    fn relationship_display() {
        let edge = Relationship::new(1, 0, DependencyTag::SBJ, Some(PhraseTag::NP), None);
        assert_eq!(edge.to_string(), "NP_SBJ(1 -> 0)");
        let bare = Relationship::new(2, 1, DependencyTag::UNDEF, None, Some("x".to_string()));
        assert_eq!(bare.to_string(), "UNDEF(2 -> 1)");
        assert_eq!(bare.raw_relation(), Some("x"));
    }

    fn any_pos() -> impl Strategy<Value = POS> {
        proptest::sample::select(POS::values().to_vec())
    }

    proptest! {
        #[test]
        fn equal_morphemes_are_equal_without_tag(
            surface in "[가-힣]{1,4}",
            tag in any_pos(),
            other_tag in any_pos(),
            index in 0usize..8,
        ) {
            let a = morpheme(&surface, tag, None, index);
            let b = morpheme(&surface, tag, Some("raw"), index);
            let c = morpheme(&surface, other_tag, None, index);
            prop_assert_eq!(&a, &b);
            prop_assert!(a.equals_without_tag(&b));
            prop_assert!(a.equals_without_tag(&c));
            prop_assert_eq!(a == c, tag == other_tag);
        }
    }
}
