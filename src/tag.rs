//! Canonical tag vocabulary shared by every analyzer.
//!
//! [`POS`] is the Sejong part-of-speech tag set. Every value belongs to
//! exactly one [`TagCategory`], and the category predicates (`is_noun`,
//! `is_predicate`, ...) are answered from that partition.
//!
//! [`DependencyTag`] and [`PhraseTag`] are the canonical function and phrase
//! labels carried by dependency edges; [`RoleType`] labels semantic role
//! edges and [`CoarseEntityType`] classifies named entities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{KoalaError, Result};

macro_rules! canonical_tags {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $doc:expr,)+ }) => {
        $(#[$meta])*
        #[allow(clippy::upper_case_acronyms)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[doc = $doc]
                $variant,
            )+
        }

        impl $name {
            const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Every value in declaration order.
            pub fn values() -> &'static [$name] {
                Self::ALL
            }

            /// Canonical code of this value, e.g. `"NNG"`.
            pub fn code(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant),)+
                }
            }

            /// Parses a canonical code, ignoring ASCII case.
            pub fn from_code(code: &str) -> Result<Self> {
                let trimmed = code.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|value| value.code().eq_ignore_ascii_case(trimmed))
                    .ok_or_else(|| KoalaError::UnknownTagCode(code.to_string()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }

        impl FromStr for $name {
            type Err = KoalaError;

            fn from_str(s: &str) -> Result<Self> {
                Self::from_code(s)
            }
        }
    };
}

canonical_tags! {
    /// Sejong part-of-speech tag.
    POS {
        NNG => "General noun.",
        NNP => "Proper noun.",
        NNB => "Bound noun.",
        NNM => "Unit bound noun.",
        NR => "Numeral.",
        NP => "Pronoun.",
        VV => "Verb.",
        VA => "Adjective.",
        VX => "Auxiliary predicate.",
        VCP => "Positive copula.",
        VCN => "Negative copula.",
        MM => "Determiner.",
        MAG => "General adverb.",
        MAJ => "Conjunctive adverb.",
        IC => "Interjection.",
        JKS => "Subjective case particle.",
        JKC => "Complemental case particle.",
        JKG => "Adnominal case particle.",
        JKO => "Objective case particle.",
        JKB => "Adverbial case particle.",
        JKV => "Vocative case particle.",
        JKQ => "Quotative case particle.",
        JC => "Conjunctive particle.",
        JX => "Auxiliary particle.",
        EP => "Prefinal ending.",
        EF => "Final ending.",
        EC => "Conjunctive ending.",
        ETN => "Nominalizing ending.",
        ETM => "Adnominalizing ending.",
        XPN => "Noun prefix.",
        XPV => "Predicate prefix.",
        XSN => "Noun-derivational suffix.",
        XSV => "Verb-derivational suffix.",
        XSA => "Adjective-derivational suffix.",
        XSM => "Adverb-derivational suffix.",
        XSO => "Other suffix.",
        XR => "Root.",
        SF => "Sentence-final punctuation.",
        SP => "Separator punctuation.",
        SS => "Quotation mark or bracket.",
        SE => "Ellipsis.",
        SO => "Dash or tilde.",
        SW => "Other symbol.",
        NF => "Word guessed to be a noun.",
        NV => "Word guessed to be a predicate.",
        NA => "Unanalyzable word.",
        SL => "Foreign-script word.",
        SH => "Chinese character.",
        SN => "Number.",
    }
}

canonical_tags! {
    /// Function label of a dependency edge.
    DependencyTag {
        SBJ => "Subject.",
        OBJ => "Object.",
        MOD => "Adnominal modifier.",
        AJT => "Adverbial adjunct.",
        CMP => "Complement.",
        CNJ => "Conjunct.",
        INT => "Vocative or independent word.",
        PRN => "Parenthetical.",
        UNDEF => "Function unknown or not given by the analyzer.",
    }
}

canonical_tags! {
    /// Phrase label of a dependency edge's dependent.
    PhraseTag {
        S => "Sentence.",
        Q => "Quoted clause.",
        NP => "Noun phrase.",
        VP => "Verb phrase.",
        VNP => "Copula phrase.",
        AP => "Adverb phrase.",
        DP => "Determiner phrase.",
        IP => "Interjection phrase.",
        X => "Pseudo phrase.",
        L => "Opening bracket.",
        R => "Closing bracket.",
        PRN => "Parenthetical phrase.",
    }
}

canonical_tags! {
    /// Semantic role of an argument relative to its predicate.
    RoleType {
        ARG0 => "Agent or experiencer.",
        ARG1 => "Patient or theme.",
        ARG2 => "Starting point, benefactive or instrument.",
        ARG3 => "End point.",
        ARGM_COM => "Accompanier.",
        ARGM_LOC => "Location.",
        ARGM_DIR => "Direction.",
        ARGM_GOL => "Goal.",
        ARGM_CND => "Condition.",
        ARGM_MNR => "Manner.",
        ARGM_TMP => "Time.",
        ARGM_EXT => "Extent.",
        ARGM_PRD => "Secondary predication.",
        ARGM_PRP => "Purpose.",
        ARGM_CAU => "Cause.",
        ARGM_DIS => "Discourse marker.",
        ARGM_ADV => "Adverbial.",
        ARGM_NEG => "Negation.",
        ARGM_INS => "Instrument.",
    }
}

canonical_tags! {
    /// Top-level class of a named entity.
    CoarseEntityType {
        PS => "Person.",
        LC => "Location.",
        OG => "Organization.",
        AF => "Artifact.",
        DT => "Date.",
        TI => "Time.",
        CV => "Civilization and culture.",
        AM => "Animal.",
        PT => "Plant.",
        QT => "Quantity.",
        FD => "Field of study.",
        TR => "Theory.",
        EV => "Event.",
        MT => "Material.",
        TM => "Term.",
        X => "Unclassified.",
    }
}

/// Coarse grouping of [`POS`] values. Every tag belongs to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagCategory {
    /// `NNG NNP NNB NNM NR NP`
    Noun,
    /// `VV VA VX VCP VCN`
    Predicate,
    /// `MM MAG MAJ`
    Modifier,
    /// `IC`
    Interjection,
    /// `JKS JKC JKG JKO JKB JKV JKQ JC JX`
    Postposition,
    /// `EP EF EC ETN ETM`
    Ending,
    /// `XPN XPV XSN XSV XSA XSM XSO XR`
    Affix,
    /// `SF SP SS SE SO SW SL SH SN`
    Symbol,
    /// `NF NV NA`
    Unknown,
}

impl POS {
    /// Category this tag belongs to.
    pub fn category(self) -> TagCategory {
        use POS::*;
        match self {
            NNG | NNP | NNB | NNM | NR | NP => TagCategory::Noun,
            VV | VA | VX | VCP | VCN => TagCategory::Predicate,
            MM | MAG | MAJ => TagCategory::Modifier,
            IC => TagCategory::Interjection,
            JKS | JKC | JKG | JKO | JKB | JKV | JKQ | JC | JX => TagCategory::Postposition,
            EP | EF | EC | ETN | ETM => TagCategory::Ending,
            XPN | XPV | XSN | XSV | XSA | XSM | XSO | XR => TagCategory::Affix,
            SF | SP | SS | SE | SO | SW | SL | SH | SN => TagCategory::Symbol,
            NF | NV | NA => TagCategory::Unknown,
        }
    }

    /// Nouns, pronouns and numerals.
    pub fn is_noun(self) -> bool {
        self.category() == TagCategory::Noun
    }

    /// Verbs, adjectives, auxiliaries and copulas.
    pub fn is_predicate(self) -> bool {
        self.category() == TagCategory::Predicate
    }

    /// Determiners and adverbs.
    pub fn is_modifier(self) -> bool {
        self.category() == TagCategory::Modifier
    }

    /// Interjections (`IC`).
    pub fn is_interjection(self) -> bool {
        self.category() == TagCategory::Interjection
    }

    /// Case, conjunctive and auxiliary particles.
    pub fn is_postposition(self) -> bool {
        self.category() == TagCategory::Postposition
    }

    /// Prefinal, final, conjunctive and transforming endings.
    pub fn is_ending(self) -> bool {
        self.category() == TagCategory::Ending
    }

    /// Prefixes, suffixes and roots.
    pub fn is_affix(self) -> bool {
        self.category() == TagCategory::Affix
    }

    /// Derivational suffixes, a subset of [`POS::is_affix`].
    pub fn is_suffix(self) -> bool {
        matches!(self, POS::XSN | POS::XSV | POS::XSA | POS::XSM | POS::XSO)
    }

    /// Punctuation and other symbols, foreign words, hanja and numbers.
    pub fn is_symbol(self) -> bool {
        self.category() == TagCategory::Symbol
    }

    /// Words the analyzer could not classify.
    pub fn is_unknown(self) -> bool {
        self.category() == TagCategory::Unknown
    }

    /// Returns whether this tag's code starts with `partial`, ignoring case.
    ///
    /// Unknown tags (`NF`, `NV`, `NA`) are not nouns, so they never match
    /// the noun prefix `"N"` even though their codes start with it.
    ///
    /// ```
    /// use koala_rs::POS;
    ///
    /// assert!(POS::NNG.starts_with("nn"));
    /// assert!(POS::JKS.starts_with("J"));
    /// assert!(!POS::NA.starts_with("N"));
    /// assert!(POS::NA.starts_with("NA"));
    /// ```
    pub fn starts_with(self, partial: &str) -> bool {
        let partial = partial.trim().to_ascii_uppercase();
        if self.is_unknown() && partial == "N" {
            return false;
        }
        self.code().starts_with(&partial)
    }
}

#[cfg(test)]
mod tag_tests {
    use super::{CoarseEntityType, DependencyTag, PhraseTag, RoleType, TagCategory, POS};
    use proptest::prelude::*;

    fn any_pos() -> impl Strategy<Value = POS> {
        proptest::sample::select(POS::values().to_vec())
    }

    #[test]
    fn codes_round_trip_through_from_code() {
        for tag in POS::values() {
            assert_eq!(POS::from_code(tag.code()).unwrap(), *tag);
            assert_eq!(tag.to_string(), tag.code());
        }
        assert_eq!(POS::from_code("nnp").unwrap(), POS::NNP);
        assert_eq!("XSV".parse::<POS>().unwrap(), POS::XSV);
        assert!(POS::from_code("NNX").is_err());
        assert!(POS::from_code("").is_err());
    }

    #[test]
    fn relation_labels_parse() {
        assert_eq!(DependencyTag::from_code("sbj").unwrap(), DependencyTag::SBJ);
        assert_eq!(PhraseTag::from_code("VNP").unwrap(), PhraseTag::VNP);
        assert!(DependencyTag::from_code("NP").is_err());
        assert_eq!(DependencyTag::values().len(), 9);
        assert_eq!(PhraseTag::values().len(), 12);
        assert_eq!(RoleType::from_code("argm_loc").unwrap(), RoleType::ARGM_LOC);
        assert_eq!(RoleType::ARG0.to_string(), "ARG0");
        assert_eq!(CoarseEntityType::from_code("og").unwrap(), CoarseEntityType::OG);
        assert!(CoarseEntityType::from_code("PS_NAME").is_err());
    }

    #[test]
    fn predicates_follow_documented_membership() {
        assert!(POS::NP.is_noun());
        assert!(POS::NR.is_noun());
        assert!(!POS::NA.is_noun());
        assert!(POS::VCN.is_predicate());
        assert!(POS::MAJ.is_modifier());
        assert!(POS::JX.is_postposition());
        assert!(POS::ETM.is_ending());
        assert!(POS::XPN.is_affix());
        assert!(!POS::XPN.is_suffix());
        assert!(POS::XSO.is_suffix());
        assert!(POS::SO.is_symbol());
        assert!(POS::NV.is_unknown());
        assert!(POS::XR.is_affix());
        assert!(!POS::XR.is_suffix());
        assert!(POS::SL.is_symbol());
        assert!(POS::SH.is_symbol());
        assert!(POS::SN.is_symbol());
        assert!(POS::IC.is_interjection());
        assert_eq!(POS::IC.category(), TagCategory::Interjection);
        assert_eq!(POS::XR.category(), TagCategory::Affix);
    }

    #[test]
    fn partial_codes_match_prefixes() {
        assert!(POS::NNG.starts_with("N"));
        assert!(POS::NNG.starts_with("NN"));
        assert!(POS::NNG.starts_with("nng"));
        assert!(!POS::NNG.starts_with("NNP"));
        assert!(!POS::NF.starts_with("N"));
        assert!(!POS::NV.starts_with("n"));
        assert!(POS::NF.starts_with("NF"));
        assert!(POS::VCP.starts_with("VC"));
        assert!(POS::XSA.starts_with("XS"));
    }

    #[test]
    fn tags_serialize_as_codes() {
        assert_eq!(serde_json::to_string(&POS::JKS).unwrap(), "\"JKS\"");
        let tag: DependencyTag = serde_json::from_str("\"AJT\"").unwrap();
        assert_eq!(tag, DependencyTag::AJT);
    }

    proptest! {
        #[test]
        fn every_tag_sits_in_exactly_one_predicate_group(tag in any_pos()) {
            let groups = [
                tag.is_noun(),
                tag.is_predicate(),
                tag.is_modifier(),
                tag.is_interjection(),
                tag.is_postposition(),
                tag.is_ending(),
                tag.is_affix(),
                tag.is_symbol(),
                tag.is_unknown(),
            ];
            let hits = groups.iter().filter(|hit| **hit).count();
            prop_assert_eq!(hits, 1);
        }

        #[test]
        fn suffixes_are_affixes(tag in any_pos()) {
            if tag.is_suffix() {
                prop_assert!(tag.is_affix());
            }
        }

        #[test]
        fn full_code_always_matches_itself(tag in any_pos()) {
            prop_assert!(tag.starts_with(tag.code()));
            prop_assert!(tag.starts_with(&tag.code().to_lowercase()));
        }
    }
}
