//! User dictionaries: the backend boundary and the merger on top of it.

use std::collections::HashSet;

use crate::analyzer::{AnalyzerKind, Capability};
use crate::error::Result;
use crate::tag::POS;
use crate::types::DictEntry;

/// Dictionary store of one analyzer, usually backed by the native engine.
///
/// Implementations are not expected to check capabilities;
/// [`Dictionary`] does that before every call.
pub trait DictionaryBackend {
    /// Analyzer this dictionary belongs to.
    fn analyzer(&self) -> AnalyzerKind;

    /// Adds entries to the user dictionary.
    fn add_entries(&mut self, entries: &[DictEntry]) -> Result<()>;

    /// Whether `surface` is known under any of `tags`.
    fn contains(&self, surface: &str, tags: &[POS]) -> Result<bool>;

    /// Entries added by users.
    fn items(&self) -> Result<Vec<DictEntry>>;

    /// System dictionary entries whose tag passes `filter`.
    fn base_entries(&self, filter: &dyn Fn(POS) -> bool) -> Result<Vec<DictEntry>>;

    /// Subset of `pairs` that is not known. With `only_system`, user entries
    /// do not count as known.
    fn get_not_exists(&self, only_system: bool, pairs: &[(String, POS)]) -> Result<Vec<(String, POS)>>;
}

/// Capability-checked view over a [`DictionaryBackend`].
///
/// ```
/// use koala_rs::{AnalyzerKind, DictEntry, Dictionary, MemoryDictionary, POS};
///
/// let mut dict = Dictionary::new(MemoryDictionary::new(AnalyzerKind::Komoran));
/// dict.add(&[DictEntry::new("코알라", POS::NNG).unwrap()]).unwrap();
/// assert!(dict.contains_noun("코알라").unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct Dictionary<B> {
    backend: B,
}

impl<B: DictionaryBackend> Dictionary<B> {
    /// Wraps `backend`.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Analyzer of the wrapped backend.
    pub fn analyzer(&self) -> AnalyzerKind {
        self.backend.analyzer()
    }

    /// Wrapped backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Unwraps the backend.
    pub fn into_inner(self) -> B {
        self.backend
    }

    fn require(&self, capability: Capability) -> Result<()> {
        self.analyzer().require(capability)
    }

    /// Adds entries. Adding the same entry twice is left to the backend.
    pub fn add(&mut self, entries: &[DictEntry]) -> Result<()> {
        self.require(Capability::DictionaryAdd)?;
        log::debug!("adding {} entries to {} dictionary", entries.len(), self.analyzer());
        self.backend.add_entries(entries)
    }

    /// Copies the system entries and user items of `other` whose tag passes
    /// `filter` into this dictionary and returns how many were added.
    ///
    /// Duplicates are dropped. Unless `fast_append` is set, entries this
    /// dictionary already knows are dropped too, which needs
    /// [`Capability::DictionaryQuery`] on this side.
    pub fn import_from<O, F>(&mut self, other: &Dictionary<O>, fast_append: bool, filter: F) -> Result<usize>
    where
        O: DictionaryBackend,
        F: Fn(POS) -> bool,
    {
        self.require(Capability::DictionaryAdd)?;
        other.require(Capability::DictionaryQuery)?;
        if !fast_append {
            self.require(Capability::DictionaryQuery)?;
        }

        let mut candidates = other.backend.base_entries(&filter)?;
        candidates.extend(other.backend.items()?.into_iter().filter(|entry| filter(entry.tag)));

        let mut seen = HashSet::new();
        candidates.retain(|entry| seen.insert((entry.surface.clone(), entry.tag)));

        if !fast_append {
            let pairs: Vec<(String, POS)> = candidates
                .iter()
                .map(|entry| (entry.surface.clone(), entry.tag))
                .collect();
            let missing: HashSet<(String, POS)> =
                self.backend.get_not_exists(false, &pairs)?.into_iter().collect();
            candidates.retain(|entry| missing.contains(&(entry.surface.clone(), entry.tag)));
        }

        if !candidates.is_empty() {
            self.backend.add_entries(&candidates)?;
        }
        log::info!(
            "imported {} entries from {} into {}",
            candidates.len(),
            other.analyzer(),
            self.analyzer()
        );
        Ok(candidates.len())
    }

    /// Whether `surface` is known under any of `tags`.
    pub fn contains(&self, surface: &str, tags: &[POS]) -> Result<bool> {
        self.require(Capability::DictionaryQuery)?;
        self.backend.contains(surface, tags)
    }

    /// [`Self::contains`] with the proper and common noun tags.
    pub fn contains_noun(&self, surface: &str) -> Result<bool> {
        self.contains(surface, &[POS::NNP, POS::NNG])
    }

    /// Subset of `pairs` this dictionary does not know.
    pub fn get_not_exists(&self, only_system: bool, pairs: &[(String, POS)]) -> Result<Vec<(String, POS)>> {
        self.require(Capability::DictionaryQuery)?;
        self.backend.get_not_exists(only_system, pairs)
    }

    /// Entries added by users.
    pub fn items(&self) -> Result<Vec<DictEntry>> {
        self.require(Capability::DictionaryQuery)?;
        self.backend.items()
    }

    /// System entries whose tag passes `filter`.
    pub fn base_entries<F>(&self, filter: F) -> Result<Vec<DictEntry>>
    where
        F: Fn(POS) -> bool,
    {
        self.require(Capability::DictionaryQuery)?;
        self.backend.base_entries(&filter)
    }
}

/// In-process dictionary: a fixed system lexicon plus user entries.
#[derive(Debug, Clone)]
pub struct MemoryDictionary {
    kind: AnalyzerKind,
    system: Vec<DictEntry>,
    user: Vec<DictEntry>,
}

impl MemoryDictionary {
    /// Empty dictionary reporting itself as `kind`.
    pub fn new(kind: AnalyzerKind) -> Self {
        Self {
            kind,
            system: Vec::new(),
            user: Vec::new(),
        }
    }

    /// Replaces the system lexicon.
    pub fn with_system_entries(mut self, entries: Vec<DictEntry>) -> Self {
        self.system = entries;
        self
    }

    fn in_system(&self, surface: &str, tag: POS) -> bool {
        self.system.iter().any(|entry| entry.key() == (surface, tag))
    }

    fn in_user(&self, surface: &str, tag: POS) -> bool {
        self.user.iter().any(|entry| entry.key() == (surface, tag))
    }
}

impl DictionaryBackend for MemoryDictionary {
    fn analyzer(&self) -> AnalyzerKind {
        self.kind
    }

    fn add_entries(&mut self, entries: &[DictEntry]) -> Result<()> {
        for entry in entries {
            if !self.in_user(&entry.surface, entry.tag) {
                self.user.push(entry.clone());
            }
        }
        Ok(())
    }

    fn contains(&self, surface: &str, tags: &[POS]) -> Result<bool> {
        Ok(tags
            .iter()
            .any(|tag| self.in_system(surface, *tag) || self.in_user(surface, *tag)))
    }

    fn items(&self) -> Result<Vec<DictEntry>> {
        Ok(self.user.clone())
    }

    fn base_entries(&self, filter: &dyn Fn(POS) -> bool) -> Result<Vec<DictEntry>> {
        Ok(self
            .system
            .iter()
            .filter(|entry| filter(entry.tag))
            .cloned()
            .collect())
    }

    fn get_not_exists(&self, only_system: bool, pairs: &[(String, POS)]) -> Result<Vec<(String, POS)>> {
        Ok(pairs
            .iter()
            .filter(|(surface, tag)| {
                !(self.in_system(surface, *tag) || (!only_system && self.in_user(surface, *tag)))
            })
            .cloned()
            .collect())
    }
}
