use thiserror::Error;

use crate::analyzer::{AnalyzerKind, Capability};
use crate::tag::CoarseEntityType;

/// Error type returned by koala-rs public APIs.
#[derive(Debug, Error)]
pub enum KoalaError {
    /// The tag normalizer received a raw tag outside its analyzer's vocabulary.
    #[error("tag `{tag}` is not recognized for analyzer {analyzer}")]
    UnrecognizedTag {
        /// Analyzer whose table was consulted.
        analyzer: AnalyzerKind,
        /// Raw tag as emitted by the analyzer.
        tag: String,
    },
    /// The tag normalizer received a raw dependency label it cannot map.
    #[error("relation `{relation}` is not recognized for analyzer {analyzer}")]
    UnrecognizedRelation {
        /// Analyzer whose table was consulted.
        analyzer: AnalyzerKind,
        /// Raw relation label as emitted by the analyzer.
        relation: String,
    },
    /// The tag normalizer received a semantic role label it cannot map.
    #[error("role `{label}` is not recognized for analyzer {analyzer}")]
    UnrecognizedRole {
        /// Analyzer whose table was consulted.
        analyzer: AnalyzerKind,
        /// Raw role label as emitted by the analyzer.
        label: String,
    },
    /// The tag normalizer received a named entity label it cannot map.
    #[error("entity label `{label}` is not recognized for analyzer {analyzer}")]
    UnrecognizedEntity {
        /// Analyzer whose table was consulted.
        analyzer: AnalyzerKind,
        /// Raw entity label as emitted by the analyzer.
        label: String,
    },
    /// A canonical code string did not name any canonical value.
    #[error("unknown canonical code: {0}")]
    UnknownTagCode(String),
    /// Dependency data returned by an analyzer does not form a valid tree.
    #[error("malformed dependency data: {0}")]
    MalformedDependency(#[from] DependencyError),
    /// Entity, coreference or semantic role data does not fit its sentence.
    #[error("malformed annotation: {0}")]
    MalformedAnnotation(#[from] AnnotationError),
    /// The analyzer variant does not offer the requested capability.
    #[error("{analyzer} does not support {capability}")]
    Unsupported {
        /// Analyzer that was asked.
        analyzer: AnalyzerKind,
        /// Capability that was requested.
        capability: Capability,
    },
    /// The analyzer variant was not enabled in the active context.
    #[error("{0} is not enabled in this analyzer context")]
    NotEnabled(AnalyzerKind),
    /// A morpheme or dictionary entry was constructed with an empty surface.
    #[error("surface form must not be empty")]
    EmptySurface,
    /// User-provided arguments were invalid.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Failure raised by an external analyzer engine, passed through as-is.
    #[error("analyzer engine error: {0}")]
    Engine(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
    /// Structured record could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Reading or writing a config file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl KoalaError {
    /// Wraps an engine failure without reinterpreting it.
    pub fn engine<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        KoalaError::Engine(Box::new(error))
    }

    /// Returns whether this error reports a missing analyzer capability.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, KoalaError::Unsupported { .. })
    }

    /// Returns the reason when this error reports malformed entity or role
    /// data.
    pub fn annotation_error(&self) -> Option<&AnnotationError> {
        match self {
            KoalaError::MalformedAnnotation(reason) => Some(reason),
            _ => None,
        }
    }

    /// Returns the structural reason when this error reports malformed
    /// dependency data.
    pub fn dependency_error(&self) -> Option<&DependencyError> {
        match self {
            KoalaError::MalformedDependency(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Structural reason a sentence's dependency data was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DependencyError {
    /// The analyzer returned no words for the sentence.
    #[error("sentence has no words")]
    EmptySentence,
    /// A word carried no morphemes.
    #[error("word #{word} has no morphemes")]
    EmptyWord {
        /// Index of the offending word.
        word: usize,
    },
    /// A head index points outside the sentence.
    #[error("word #{word} has head {head}, but the sentence has {len} words")]
    HeadOutOfRange {
        /// Index of the dependent word.
        word: usize,
        /// Head index as emitted.
        head: usize,
        /// Number of words in the sentence.
        len: usize,
    },
    /// A word names itself as its head.
    #[error("word #{word} is its own head")]
    SelfLoop {
        /// Index of the offending word.
        word: usize,
    },
    /// No word carries the root sentinel.
    #[error("no root word")]
    NoRoot,
    /// More than one word carries the root sentinel.
    #[error("multiple root words: {roots:?}")]
    MultipleRoots {
        /// Indices of every root candidate.
        roots: Vec<usize>,
    },
    /// A word cannot be reached from the root, so it sits on a cycle.
    #[error("word #{word} is not reachable from the root")]
    Cycle {
        /// Smallest index of an unreachable word.
        word: usize,
    },
    /// Some words carry head data and others do not.
    #[error("word #{word} has no head while other words do")]
    MissingHead {
        /// Index of the first word without a head.
        word: usize,
    },
}

/// Reason entity, coreference or semantic role data was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
    /// A word index points outside the sentence.
    #[error("word #{word} is outside the sentence of {len} words")]
    WordOutOfRange {
        /// Word index as given.
        word: usize,
        /// Number of words in the sentence.
        len: usize,
    },
    /// A morpheme index points outside its word.
    #[error("morpheme #{morpheme} is outside word #{word} of {len} morphemes")]
    MorphemeOutOfRange {
        /// Word index.
        word: usize,
        /// Morpheme index as given.
        morpheme: usize,
        /// Number of morphemes in the word.
        len: usize,
    },
    /// An entity covers no morphemes.
    #[error("entity #{entity} covers no morphemes")]
    EmptyEntity {
        /// Index of the entity.
        entity: usize,
    },
    /// An entity's morphemes are repeated or out of sentence order.
    #[error("entity #{entity} lists its morphemes out of order")]
    UnorderedEntity {
        /// Index of the entity.
        entity: usize,
    },
    /// An entity's fine label does not start with its coarse label.
    #[error("entity #{entity} has fine label `{fine_label}` outside class {label}")]
    FineLabelMismatch {
        /// Index of the entity.
        entity: usize,
        /// Coarse class.
        label: CoarseEntityType,
        /// Fine label as given.
        fine_label: String,
    },
    /// A coreference group names an entity that does not exist.
    #[error("coreference group names entity #{entity}, but the sentence has {len} entities")]
    EntityOutOfRange {
        /// Entity index as given.
        entity: usize,
        /// Number of entities in the sentence.
        len: usize,
    },
    /// An entity sits in more than one coreference group.
    #[error("entity #{entity} belongs to more than one coreference group")]
    SharedEntity {
        /// Index of the entity.
        entity: usize,
    },
    /// A role edge names the same word as predicate and argument.
    #[error("word #{word} is its own semantic argument")]
    SelfRole {
        /// Index of the offending word.
        word: usize,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, KoalaError>;
