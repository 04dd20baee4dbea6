#![deny(missing_docs)]

//! One data model and one tag vocabulary over Korean morphological and
//! dependency analyzers.
//!
//! Analyzers such as Kkma, Komoran, Hannanum, Okt, Eunjeon, Daon, Kiwi and
//! ETRI each emit their own tag strings and their own flat head-index
//! dependency output. This crate normalizes that output onto the Sejong tag
//! set ([`POS`]), assembles it into validated [`Sentence`]s, and merges user
//! dictionary entries across analyzers. ETRI's named entities and semantic
//! roles are attached to sentences as index-addressed [`Entity`] and
//! [`RoleEdge`] records.
//!
//! ## Quick Start
//! ```no_run
//! use koala_rs::{AnalyzerContext, AnalyzerKind, Engine, KoalaConfig, RawWord, Result};
//!
//! struct MyKomoran;
//!
//! impl Engine for MyKomoran {
//!     fn kind(&self) -> AnalyzerKind {
//!         AnalyzerKind::Komoran
//!     }
//!
//!     fn split(&self, text: &str) -> Result<Vec<String>> {
//!         // call into the native splitter here
//!         Ok(vec![text.to_string()])
//!     }
//!
//!     fn tag(&self, sentence: &str) -> Result<Vec<RawWord>> {
//!         // call into the native tagger here
//!         unimplemented!()
//!     }
//! }
//!
//! fn main() -> Result<()> {
//!     let context = AnalyzerContext::new(KoalaConfig::default());
//!     let komoran = context.analyzer(MyKomoran)?;
//!     for sentence in komoran.tag("나는 간다. 너는 온다.")? {
//!         println!("{}", sentence.single_line_string());
//!         for word in sentence.nouns() {
//!             println!("noun word: {}", word.surface());
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Assembling Output Directly
//! Flat analyzer output can be normalized and linked without an engine:
//!
//! ```
//! use koala_rs::{assemble, AnalyzerKind, HeadRef, RawMorpheme, RawWord, TagTable};
//!
//! let table = TagTable::new(AnalyzerKind::Etri).unwrap();
//! let words = vec![
//!     RawWord::new("나는", vec![RawMorpheme::new("나", "NP"), RawMorpheme::new("는", "JX")])
//!         .with_head(HeadRef::from_raw(1).unwrap())
//!         .with_relation("NP_SBJ"),
//!     RawWord::new("간다", vec![RawMorpheme::new("가", "VV"), RawMorpheme::new("ㄴ다", "EF")])
//!         .with_head(HeadRef::from_raw(-1).unwrap()),
//! ];
//! let sentence = assemble(words, &table).unwrap();
//! assert_eq!(sentence.single_line_string(), "나/NP+는/JX 가/VV+ㄴ다/EF");
//! assert_eq!(sentence.dependents_of(1)[0].target(), 0);
//! ```
//!
//! ## Environment Variables
//! - `KOALA_ANALYZERS`: comma-separated analyzer codes enabled by
//!   [`KoalaConfig::default`] (`hnn`, `kkma`, `kmr`, `eunjeon`, `okt`,
//!   `daon`, `kiwi`, `etri`). Every analyzer is enabled when unset.

mod analyzer;
mod annotate;
mod assemble;
mod config;
mod constants;
mod dictionary;
mod error;
mod model;
mod runtime;
mod sentence;
mod tag;
mod tagset;
mod types;
mod word;

pub use analyzer::{AnalyzerKind, Capability};
pub use annotate::{annotate_entities, annotate_roles};
pub use assemble::assemble;
pub use config::{AnalyzerContext, KoalaConfig};
pub use constants::*;
pub use dictionary::{Dictionary, DictionaryBackend, MemoryDictionary};
pub use error::{AnnotationError, DependencyError, KoalaError, Result};
pub use model::{CoreferenceGroup, Entity, Morpheme, MorphemeRef, Relationship, RoleEdge};
pub use runtime::{Analyzer, Engine};
pub use sentence::{MorphemeRecord, Sentence, SentenceRecord, WordRecord};
pub use tag::{CoarseEntityType, DependencyTag, PhraseTag, RoleType, TagCategory, POS};
pub use tagset::{TagNormalizer, TagTable};
pub use types::{AnalyzeOptions, DictEntry, HeadRef, RawEntity, RawMorpheme, RawRole, RawWord};
pub use word::Word;

#[cfg(test)]
mod test_support;
