use std::fmt;

use crate::constants::MORPHEME_SEPARATOR;
use crate::model::{Morpheme, Relationship, RoleEdge};
use crate::tag::POS;

/// Space-delimited unit of a sentence (eojeol) and its morphemes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    surface: String,
    morphemes: Vec<Morpheme>,
    index: usize,
    dependents: Vec<Relationship>,
    argument_roles: Vec<RoleEdge>,
}

impl Word {
    pub(crate) fn new(surface: String, morphemes: Vec<Morpheme>, index: usize) -> Self {
        Self {
            surface,
            morphemes,
            index,
            dependents: Vec::new(),
            argument_roles: Vec::new(),
        }
    }

    pub(crate) fn push_dependent(&mut self, edge: Relationship) {
        self.dependents.push(edge);
    }

    pub(crate) fn push_argument_role(&mut self, edge: RoleEdge) {
        self.argument_roles.push(edge);
    }

    /// Surface form as reported by the analyzer. Not necessarily the
    /// concatenation of the morpheme surfaces.
    pub fn surface(&self) -> &str {
        &self.surface
    }

    /// Morphemes in order.
    pub fn morphemes(&self) -> &[Morpheme] {
        &self.morphemes
    }

    /// Position of this word in its sentence.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Edges whose governor is this word, in analyzer emission order.
    pub fn dependents(&self) -> &[Relationship] {
        &self.dependents
    }

    /// Semantic role edges in which this word is the predicate.
    pub fn argument_roles(&self) -> &[RoleEdge] {
        &self.argument_roles
    }

    /// Number of morphemes.
    pub fn len(&self) -> usize {
        self.morphemes.len()
    }

    /// Always false for assembled words.
    pub fn is_empty(&self) -> bool {
        self.morphemes.is_empty()
    }

    /// Morpheme at `index`.
    pub fn get(&self, index: usize) -> Option<&Morpheme> {
        self.morphemes.get(index)
    }

    /// Iterates over morphemes in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Morpheme> {
        self.morphemes.iter()
    }

    /// First morpheme satisfying `predicate`.
    pub fn find<P>(&self, mut predicate: P) -> Option<&Morpheme>
    where
        P: FnMut(&Morpheme) -> bool,
    {
        self.morphemes.iter().find(|morpheme| predicate(morpheme))
    }

    /// Whether any morpheme satisfies `predicate`.
    pub fn exists<P>(&self, mut predicate: P) -> bool
    where
        P: FnMut(&Morpheme) -> bool,
    {
        self.morphemes.iter().any(|morpheme| predicate(morpheme))
    }

    /// All morphemes satisfying `predicate`.
    pub fn filter<P>(&self, mut predicate: P) -> Vec<&Morpheme>
    where
        P: FnMut(&Morpheme) -> bool,
    {
        self.morphemes
            .iter()
            .filter(|morpheme| predicate(morpheme))
            .collect()
    }

    /// Whether the morphemes contain, in order but not necessarily
    /// adjacent, tags matching each partial code of `tags`.
    ///
    /// `["N", "J"]` matches `나/NP+는/JX` but `["J", "N"]` does not.
    pub fn matches(&self, tags: &[&str]) -> bool {
        let mut morphemes = self.morphemes.iter();
        tags.iter()
            .all(|partial| morphemes.any(|morpheme| morpheme.has_tag_prefix(partial)))
    }

    /// Whether this word works as a noun: it holds a noun, `ETN` or `XSN`
    /// later than any `XSV`, `XSA` or `XSM`.
    ///
    /// `살/VV+ㅁ/ETN` is nominal; `공부/NNG+하/XSV+다/EF` is not.
    pub fn is_nominal(&self) -> bool {
        self.last_decides(
            |tag| tag.is_noun() || matches!(tag, POS::ETN | POS::XSN),
            |tag| matches!(tag, POS::XSV | POS::XSA | POS::XSM),
        )
    }

    /// Whether this word works as a predicate: it holds a predicate or
    /// `XSV` later than any `ETN`, `ETM`, `XSN`, `XSA` or `XSM`.
    pub fn is_predicative(&self) -> bool {
        self.last_decides(
            |tag| tag.is_predicate() || tag == POS::XSV,
            |tag| matches!(tag, POS::ETN | POS::ETM | POS::XSN | POS::XSA | POS::XSM),
        )
    }

    /// Whether this word works as a modifier: it holds a modifier, `ETM`,
    /// `XSA` or `XSM` later than any `ETN`, `XSN` or `XSV`.
    ///
    /// `멋지/VA+ㄴ/ETM` is a modifier.
    pub fn is_adnominal(&self) -> bool {
        self.last_decides(
            |tag| tag.is_modifier() || matches!(tag, POS::ETM | POS::XSA | POS::XSM),
            |tag| matches!(tag, POS::ETN | POS::XSN | POS::XSV),
        )
    }

    // The last including morpheme must come after the last excluding one.
    fn last_decides(&self, include: impl Fn(POS) -> bool, exclude: impl Fn(POS) -> bool) -> bool {
        let last = |test: &dyn Fn(POS) -> bool| {
            self.morphemes
                .iter()
                .rposition(|morpheme| test(morpheme.tag()))
        };
        match (last(&include), last(&exclude)) {
            (Some(included), Some(excluded)) => included > excluded,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    /// `surface/TAG` pairs joined with `+`, e.g. `나/NP+는/JX`.
    pub fn single_line_string(&self) -> String {
        let mut out = String::new();
        for (position, morpheme) in self.morphemes.iter().enumerate() {
            if position > 0 {
                out.push(MORPHEME_SEPARATOR);
            }
            out.push_str(morpheme.surface());
            out.push('/');
            out.push_str(morpheme.tag().code());
        }
        out
    }
}

impl<'a> IntoIterator for &'a Word {
    type Item = &'a Morpheme;
    type IntoIter = std::slice::Iter<'a, Morpheme>;

    fn into_iter(self) -> Self::IntoIter {
        self.morphemes.iter()
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.surface, self.single_line_string())
    }
}

#[cfg(test)]
mod word_tests {
    use super::Word;
    use crate::model::Morpheme;
    use crate::tag::POS;

    fn word(pairs: &[(&str, POS)]) -> Word {
        let morphemes = pairs
            .iter()
            .enumerate()
            .map(|(index, (surface, tag))| Morpheme::new(*surface, *tag, None, index).unwrap())
            .collect();
        let surface: String = pairs.iter().map(|(surface, _)| *surface).collect();
        Word::new(surface, morphemes, 0)
    }

    #[test]
    fn renders_single_line() {
        let w = word(&[("나", POS::NP), ("는", POS::JX)]);
        assert_eq!(w.single_line_string(), "나/NP+는/JX");
        assert_eq!(w.to_string(), "나는 = 나/NP+는/JX");
    }

    #[test]
    fn queries_are_lazy_and_ordered() {
        let w = word(&[("먹", POS::VV), ("었", POS::EP), ("다", POS::EF)]);
        assert_eq!(w.find(|m| m.tag().is_ending()).map(|m| m.surface()), Some("었"));
        assert!(w.exists(|m| m.has_tag(POS::EF)));
        assert!(!w.exists(|m| m.is_noun()));
        assert_eq!(w.filter(|m| m.tag().is_ending()).len(), 2);
        assert_eq!(w.len(), 3);
        assert!(!w.is_empty());
        assert_eq!(w.get(2).map(|m| m.surface()), Some("다"));
        assert_eq!((&w).into_iter().count(), 3);
    }

    #[test]
    fn matches_ordered_subsequence() {
        let w = word(&[("먹", POS::VV), ("었", POS::EP), ("다", POS::EF)]);
        assert!(w.matches(&["V", "EF"]));
        assert!(w.matches(&["VV", "EP", "EF"]));
        assert!(w.matches(&[]));
        assert!(!w.matches(&["EF", "V"]));
        assert!(!w.matches(&["N"]));
    }

    #[test]
    fn last_suffix_or_ending_decides_the_word_class() {
        let study = word(&[("공부", POS::NNG), ("하", POS::XSV), ("다", POS::EF)]);
        assert!(!study.is_nominal());
        assert!(study.is_predicative());
        assert!(!study.is_adnominal());

        let life = word(&[("살", POS::VV), ("ㅁ", POS::ETN)]);
        assert!(life.is_nominal());
        assert!(!life.is_predicative());
        assert!(!life.is_adnominal());

        let stylish = word(&[("멋지", POS::VA), ("ㄴ", POS::ETM)]);
        assert!(stylish.is_adnominal());
        assert!(!stylish.is_predicative());
        assert!(!stylish.is_nominal());

        let particle = word(&[("나", POS::NP), ("는", POS::JX)]);
        assert!(particle.is_nominal());
        assert!(!particle.is_predicative());

        let studying = word(&[("공부", POS::NNG), ("하", POS::XSV), ("기", POS::ETN)]);
        assert!(studying.is_nominal());
        assert!(!studying.is_predicative());
    }
}
