//! Sentinels, environment variable names, and defaults shared across the crate.

/// Raw head value analyzers emit for the root word of a sentence.
pub const ROOT_SENTINEL: i64 = -1;

/// Environment variable listing the analyzer codes enabled by
/// [`KoalaConfig::default`](crate::KoalaConfig::default), comma separated.
pub const KOALA_ANALYZERS_ENV: &str = "KOALA_ANALYZERS";

/// Score given to dictionary entries when the caller does not pick one.
pub const DEFAULT_ENTRY_SCORE: f32 = 0.0;

/// Delimiter used by [`Sentence::surface_string`](crate::Sentence::surface_string)
/// when rendering with the default spacing.
pub const DEFAULT_WORD_DELIMITER: &str = " ";

/// Separator placed between morphemes of one word in single-line renderings.
pub const MORPHEME_SEPARATOR: char = '+';

/// Separator between the components of a composite raw tag such as `VV+EP`.
pub const COMPOSITE_TAG_SEPARATOR: char = '+';

/// Separator between phrase and function parts of a raw relation label
/// such as `NP_SBJ`.
pub const RELATION_LABEL_SEPARATOR: char = '_';

/// Leading characters of a raw entity label naming its coarse class, as in
/// `LC` for `LCP_COUNTRY`.
pub const ENTITY_CLASS_LEN: usize = 2;
