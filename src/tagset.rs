//! Per-analyzer raw tag tables and the normalizer built on them.

use std::collections::HashMap;

use regex::Regex;

use crate::analyzer::{AnalyzerKind, Capability};
use crate::constants::{COMPOSITE_TAG_SEPARATOR, ENTITY_CLASS_LEN, RELATION_LABEL_SEPARATOR};
use crate::error::{KoalaError, Result};
use crate::tag::{CoarseEntityType, DependencyTag, PhraseTag, RoleType, POS};

/// Maps an analyzer's raw tags and relation labels onto the canonical
/// vocabulary.
pub trait TagNormalizer: Send + Sync {
    /// Analyzer whose vocabulary this normalizer understands.
    fn analyzer(&self) -> AnalyzerKind;

    /// Maps one raw morpheme tag. Unmapped tags are errors, never defaults.
    fn normalize_tag(&self, raw: &str) -> Result<POS>;

    /// Maps a raw relation label. An absent label yields
    /// [`DependencyTag::UNDEF`] with no phrase.
    fn normalize_relation(&self, raw: Option<&str>) -> Result<(DependencyTag, Option<PhraseTag>)>;

    /// Maps a raw semantic role label such as `ARGM-LOC`.
    fn normalize_role(&self, raw: &str) -> Result<RoleType>;

    /// Maps a raw named entity label such as `LCP_COUNTRY` to its coarse
    /// class and canonical fine label.
    fn normalize_entity(&self, raw: &str) -> Result<(CoarseEntityType, String)>;
}

const KKMA_EXTRA: &[(&str, POS)] = &[
    ("VXV", POS::VX),
    ("VXA", POS::VX),
    ("MDT", POS::MM),
    ("MDN", POS::MM),
    ("MAC", POS::MAJ),
    ("JKM", POS::JKB),
    ("JKI", POS::JKV),
    ("EPH", POS::EP),
    ("EPT", POS::EP),
    ("EPP", POS::EP),
    ("EFN", POS::EF),
    ("EFQ", POS::EF),
    ("EFO", POS::EF),
    ("EFA", POS::EF),
    ("EFI", POS::EF),
    ("EFR", POS::EF),
    ("ECE", POS::EC),
    ("ECD", POS::EC),
    ("ECS", POS::EC),
    ("ETD", POS::ETM),
    ("UN", POS::NA),
    ("UV", POS::NV),
    ("UE", POS::NA),
    ("OL", POS::SL),
    ("OH", POS::SH),
    ("ON", POS::SN),
];

const EUNJEON_EXTRA: &[(&str, POS)] = &[
    ("NNBC", POS::NNM),
    ("SSO", POS::SS),
    ("SSC", POS::SS),
    ("SC", POS::SP),
    ("SY", POS::SW),
    ("UNKNOWN", POS::NA),
];

const HANNANUM_TABLE: &[(&str, POS)] = &[
    ("NC", POS::NNG),
    ("NQ", POS::NNP),
    ("NB", POS::NNB),
    ("NN", POS::NR),
    ("NP", POS::NP),
    ("PV", POS::VV),
    ("PA", POS::VA),
    ("PX", POS::VX),
    ("MM", POS::MM),
    ("MA", POS::MAG),
    ("II", POS::IC),
    ("JC", POS::JKB),
    ("JX", POS::JX),
    ("JP", POS::VCP),
    ("EP", POS::EP),
    ("EF", POS::EF),
    ("EC", POS::EC),
    ("ET", POS::ETM),
    ("XP", POS::XPN),
    ("XS", POS::XSN),
    ("S", POS::SW),
    ("F", POS::SL),
];

const OKT_TABLE: &[(&str, POS)] = &[
    ("Noun", POS::NNG),
    ("ProperNoun", POS::NNP),
    ("Verb", POS::VV),
    ("Adjective", POS::VA),
    ("Adverb", POS::MAG),
    ("Determiner", POS::MM),
    ("Exclamation", POS::IC),
    ("Josa", POS::JX),
    ("Eomi", POS::EF),
    ("PreEomi", POS::EP),
    ("Conjunction", POS::MAJ),
    ("Modifier", POS::MM),
    ("VerbPrefix", POS::XPV),
    ("Suffix", POS::XSN),
    ("Unknown", POS::NA),
    ("Alpha", POS::SL),
    ("Number", POS::SN),
    ("Punctuation", POS::SF),
    ("Foreign", POS::SL),
    ("Hashtag", POS::SW),
    ("ScreenName", POS::SW),
    ("Email", POS::SW),
    ("URL", POS::SW),
    ("CashTag", POS::SW),
    ("KoreanParticle", POS::NA),
];

const KIWI_EXTRA: &[(&str, POS)] = &[
    ("SSO", POS::SS),
    ("SSC", POS::SS),
    ("SB", POS::SW),
    ("UN", POS::NA),
    ("Z_CODA", POS::NA),
    ("Z_SIOT", POS::NA),
];

const KIWI_WEB_TAG: &str = r"^W_[A-Z]+$";
const KIWI_INFLECTION_MARKER: &str = r"^(.+)-[RI]$";

const KKMA_RELATIONS: &[(&str, DependencyTag)] = &[
    ("주어", DependencyTag::SBJ),
    ("목적어", DependencyTag::OBJ),
    ("보어", DependencyTag::CMP),
    ("수식", DependencyTag::MOD),
    ("관형어", DependencyTag::MOD),
    ("부사어", DependencyTag::AJT),
    ("접속", DependencyTag::CNJ),
    ("연결", DependencyTag::CNJ),
    ("독립어", DependencyTag::INT),
    ("삽입", DependencyTag::PRN),
];

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|error| {
        KoalaError::InvalidArgument(format!("invalid tag pattern `{pattern}`: {error}"))
    })
}

/// Static raw-to-canonical table for one analyzer variant.
///
/// Immutable once built; share it across threads freely.
///
/// ```
/// use koala_rs::{AnalyzerKind, TagNormalizer, TagTable, POS};
///
/// let table = TagTable::new(AnalyzerKind::Okt).unwrap();
/// assert_eq!(table.normalize_tag("ProperNoun").unwrap(), POS::NNP);
/// assert!(table.normalize_tag("NNP+JKS").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct TagTable {
    kind: AnalyzerKind,
    tags: HashMap<String, POS>,
    relations: HashMap<&'static str, DependencyTag>,
    patterns: Vec<(Regex, POS)>,
    inflection_marker: Option<Regex>,
}

impl TagTable {
    /// Builds the table for `kind`.
    pub fn new(kind: AnalyzerKind) -> Result<Self> {
        let mut table = Self {
            kind,
            tags: HashMap::new(),
            relations: HashMap::new(),
            patterns: Vec::new(),
            inflection_marker: None,
        };

        match kind {
            AnalyzerKind::Komoran | AnalyzerKind::Daon | AnalyzerKind::Etri => {
                table.insert_sejong();
            }
            AnalyzerKind::Kkma => {
                table.insert_sejong();
                table.insert_all(KKMA_EXTRA);
                table.relations = KKMA_RELATIONS.iter().copied().collect();
            }
            AnalyzerKind::Eunjeon => {
                table.insert_sejong();
                table.insert_all(EUNJEON_EXTRA);
            }
            AnalyzerKind::Hannanum => table.insert_all(HANNANUM_TABLE),
            AnalyzerKind::Okt => table.insert_all(OKT_TABLE),
            AnalyzerKind::Kiwi => {
                table.insert_sejong();
                table.insert_all(KIWI_EXTRA);
                table.patterns.push((compile(KIWI_WEB_TAG)?, POS::SW));
                table.inflection_marker = Some(compile(KIWI_INFLECTION_MARKER)?);
            }
        }

        log::debug!("built {} tag table with {} entries", kind, table.tags.len());
        Ok(table)
    }

    /// Adds a rule mapping every raw tag that matches `pattern` (after case
    /// folding) to `tag`. Exact table entries win over patterns.
    pub fn with_pattern(mut self, pattern: &str, tag: POS) -> Result<Self> {
        self.patterns.push((compile(pattern)?, tag));
        Ok(self)
    }

    /// Raw tags with an exact table entry, in no particular order.
    pub fn raw_tags(&self) -> impl Iterator<Item = &str> + '_ {
        self.tags.keys().map(String::as_str)
    }

    /// Raw relation labels with an exact table entry.
    pub fn raw_relations(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.relations.keys().copied()
    }

    fn insert_sejong(&mut self) {
        for tag in POS::values() {
            self.tags.insert(tag.code().to_string(), *tag);
        }
    }

    fn insert_all(&mut self, entries: &[(&str, POS)]) {
        for (raw, tag) in entries {
            self.tags.insert(raw.to_ascii_uppercase(), *tag);
        }
    }

    fn lookup(&self, key: &str) -> Option<POS> {
        if let Some(tag) = self.tags.get(key) {
            return Some(*tag);
        }
        self.patterns
            .iter()
            .find(|(pattern, _)| pattern.is_match(key))
            .map(|(_, tag)| *tag)
    }

    fn unrecognized_relation(&self, raw: &str) -> KoalaError {
        KoalaError::UnrecognizedRelation {
            analyzer: self.kind,
            relation: raw.to_string(),
        }
    }

    fn split_phrase_label(&self, raw: &str) -> Result<(DependencyTag, Option<PhraseTag>)> {
        let (phrase, function) = match raw.split_once(RELATION_LABEL_SEPARATOR) {
            Some((phrase, function)) => (phrase, Some(function)),
            None => (raw, None),
        };
        let phrase = PhraseTag::from_code(phrase).map_err(|_| self.unrecognized_relation(raw))?;
        let function = match function {
            Some(function) => {
                DependencyTag::from_code(function).map_err(|_| self.unrecognized_relation(raw))?
            }
            None => DependencyTag::UNDEF,
        };
        Ok((function, Some(phrase)))
    }
}

impl TagNormalizer for TagTable {
    fn analyzer(&self) -> AnalyzerKind {
        self.kind
    }

    fn normalize_tag(&self, raw: &str) -> Result<POS> {
        let mut key = raw.trim().to_ascii_uppercase();
        if self.kind == AnalyzerKind::Eunjeon {
            if let Some((head, _)) = key.split_once(COMPOSITE_TAG_SEPARATOR) {
                key = head.to_string();
            }
        }
        if let Some(marker) = &self.inflection_marker {
            if let Some(base) = marker.captures(&key).and_then(|caps| caps.get(1)) {
                key = base.as_str().to_string();
            }
        }

        self.lookup(&key).ok_or_else(|| KoalaError::UnrecognizedTag {
            analyzer: self.kind,
            tag: raw.to_string(),
        })
    }

    fn normalize_relation(&self, raw: Option<&str>) -> Result<(DependencyTag, Option<PhraseTag>)> {
        let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return Ok((DependencyTag::UNDEF, None));
        };
        if !self.kind.supports(Capability::Parsing) {
            return Err(self.unrecognized_relation(raw));
        }

        match self.kind {
            AnalyzerKind::Kkma => self
                .relations
                .get(raw)
                .map(|tag| (*tag, None))
                .ok_or_else(|| self.unrecognized_relation(raw)),
            _ => self.split_phrase_label(raw),
        }
    }

    fn normalize_role(&self, raw: &str) -> Result<RoleType> {
        let unrecognized = || KoalaError::UnrecognizedRole {
            analyzer: self.kind,
            label: raw.to_string(),
        };
        if !self.kind.supports(Capability::RoleLabeling) {
            return Err(unrecognized());
        }
        RoleType::from_code(&raw.trim().replace('-', "_")).map_err(|_| unrecognized())
    }

    fn normalize_entity(&self, raw: &str) -> Result<(CoarseEntityType, String)> {
        let unrecognized = || KoalaError::UnrecognizedEntity {
            analyzer: self.kind,
            label: raw.to_string(),
        };
        if !self.kind.supports(Capability::EntityRecognition) {
            return Err(unrecognized());
        }
        let fine = raw.trim().to_ascii_uppercase();
        let class = fine.split(RELATION_LABEL_SEPARATOR).next().unwrap_or_default();
        let class = class.get(..ENTITY_CLASS_LEN).unwrap_or(class);
        let label = CoarseEntityType::from_code(class).map_err(|_| unrecognized())?;
        Ok((label, fine))
    }
}

#[cfg(test)]
mod tagset_tests {
    use super::{TagNormalizer, TagTable, HANNANUM_TABLE, KIWI_EXTRA, KKMA_EXTRA, OKT_TABLE};
    use crate::analyzer::AnalyzerKind;
    use crate::error::KoalaError;
    use crate::tag::{CoarseEntityType, DependencyTag, PhraseTag, RoleType, POS};

    fn table(kind: AnalyzerKind) -> TagTable {
        TagTable::new(kind).expect("built-in tables compile")
    }

    #[test]
    fn every_listed_raw_tag_is_mapped() {
        for kind in AnalyzerKind::all() {
            let table = table(*kind);
            let raw: Vec<String> = table.raw_tags().map(str::to_string).collect();
            assert!(!raw.is_empty(), "{kind} has an empty table");
            for tag in raw {
                assert!(table.normalize_tag(&tag).is_ok(), "{kind} failed on {tag}");
            }
        }
    }

    #[test]
    fn sejong_tables_are_identity() {
        for kind in [AnalyzerKind::Komoran, AnalyzerKind::Daon, AnalyzerKind::Etri] {
            let table = table(kind);
            for tag in POS::values() {
                assert_eq!(table.normalize_tag(tag.code()).unwrap(), *tag);
            }
        }
    }

    #[test]
    fn kkma_extensions_collapse_onto_sejong() {
        let table = table(AnalyzerKind::Kkma);
        assert_eq!(table.normalize_tag("NNG").unwrap(), POS::NNG);
        assert_eq!(table.normalize_tag("VXV").unwrap(), POS::VX);
        assert_eq!(table.normalize_tag("EFN").unwrap(), POS::EF);
        assert_eq!(table.normalize_tag("ETD").unwrap(), POS::ETM);
        assert_eq!(table.normalize_tag("OL").unwrap(), POS::SL);
        assert_eq!(KKMA_EXTRA.len(), 26);
    }

    #[test]
    fn eunjeon_composite_tags_use_first_component() {
        let table = table(AnalyzerKind::Eunjeon);
        assert_eq!(table.normalize_tag("VV+EP").unwrap(), POS::VV);
        assert_eq!(table.normalize_tag("NNBC").unwrap(), POS::NNM);
        assert_eq!(table.normalize_tag("SSO").unwrap(), POS::SS);
        assert_eq!(table.normalize_tag("UNKNOWN").unwrap(), POS::NA);
        assert!(table.normalize_tag("QQ+EP").is_err());
    }

    #[test]
    fn hannanum_and_okt_tables_cover_their_vocabulary() {
        let hnn = table(AnalyzerKind::Hannanum);
        for (raw, tag) in HANNANUM_TABLE {
            assert_eq!(hnn.normalize_tag(raw).unwrap(), *tag);
        }
        assert!(hnn.normalize_tag("NNG").is_err());

        let okt = table(AnalyzerKind::Okt);
        for (raw, tag) in OKT_TABLE {
            assert_eq!(okt.normalize_tag(raw).unwrap(), *tag);
        }
        assert_eq!(okt.normalize_tag("propernoun").unwrap(), POS::NNP);
    }

    #[test]
    fn kiwi_strips_markers_and_maps_web_tags() {
        let kiwi = table(AnalyzerKind::Kiwi);
        assert_eq!(kiwi.normalize_tag("VV-R").unwrap(), POS::VV);
        assert_eq!(kiwi.normalize_tag("va-i").unwrap(), POS::VA);
        assert_eq!(kiwi.normalize_tag("W_URL").unwrap(), POS::SW);
        assert_eq!(kiwi.normalize_tag("w_hashtag").unwrap(), POS::SW);
        for (raw, tag) in KIWI_EXTRA {
            assert_eq!(kiwi.normalize_tag(raw).unwrap(), *tag);
        }
        assert!(kiwi.normalize_tag("W_").is_err());
    }

    #[test]
    fn unmapped_tags_name_the_analyzer() {
        let error = table(AnalyzerKind::Komoran).normalize_tag("XYZ").unwrap_err();
        match error {
            KoalaError::UnrecognizedTag { analyzer, tag } => {
                assert_eq!(analyzer, AnalyzerKind::Komoran);
                assert_eq!(tag, "XYZ");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn custom_patterns_extend_a_table() {
        let table = table(AnalyzerKind::Komoran)
            .with_pattern(r"^EMO_", POS::SW)
            .unwrap();
        assert_eq!(table.normalize_tag("EMO_SMILE").unwrap(), POS::SW);
        assert!(TagTable::new(AnalyzerKind::Komoran)
            .unwrap()
            .with_pattern("(", POS::SW)
            .is_err());
    }

    #[test]
    fn composite_relation_labels_split_into_phrase_and_function() {
        let etri = table(AnalyzerKind::Etri);
        assert_eq!(
            etri.normalize_relation(Some("NP_SBJ")).unwrap(),
            (DependencyTag::SBJ, Some(PhraseTag::NP))
        );
        assert_eq!(
            etri.normalize_relation(Some("VP")).unwrap(),
            (DependencyTag::UNDEF, Some(PhraseTag::VP))
        );
        assert_eq!(
            etri.normalize_relation(None).unwrap(),
            (DependencyTag::UNDEF, None)
        );
        assert!(etri.normalize_relation(Some("NP_XXX")).is_err());
        assert!(etri.normalize_relation(Some("ZP_SBJ")).is_err());

        let hnn = table(AnalyzerKind::Hannanum);
        assert_eq!(
            hnn.normalize_relation(Some("VNP_CMP")).unwrap(),
            (DependencyTag::CMP, Some(PhraseTag::VNP))
        );
    }

    #[test]
    fn kkma_relations_use_korean_labels() {
        let kkma = table(AnalyzerKind::Kkma);
        assert_eq!(
            kkma.normalize_relation(Some("주어")).unwrap(),
            (DependencyTag::SBJ, None)
        );
        assert_eq!(
            kkma.normalize_relation(Some("목적어")).unwrap(),
            (DependencyTag::OBJ, None)
        );
        for label in kkma.raw_relations() {
            assert!(kkma.normalize_relation(Some(label)).is_ok());
        }
        assert!(matches!(
            kkma.normalize_relation(Some("NP_SBJ")),
            Err(KoalaError::UnrecognizedRelation { .. })
        ));
    }

    #[test]
    fn taggers_without_parsing_reject_relations() {
        let okt = table(AnalyzerKind::Okt);
        assert!(okt.normalize_relation(Some("NP_SBJ")).is_err());
        assert_eq!(
            okt.normalize_relation(Some("  ")).unwrap(),
            (DependencyTag::UNDEF, None)
        );
    }

    #[test]
    fn etri_role_and_entity_labels() {
        let etri = table(AnalyzerKind::Etri);
        assert_eq!(etri.normalize_role("ARG0").unwrap(), RoleType::ARG0);
        assert_eq!(etri.normalize_role("ARGM-LOC").unwrap(), RoleType::ARGM_LOC);
        assert!(matches!(
            etri.normalize_role("ARGM-XYZ"),
            Err(KoalaError::UnrecognizedRole { .. })
        ));

        assert_eq!(
            etri.normalize_entity("LCP_COUNTRY").unwrap(),
            (CoarseEntityType::LC, "LCP_COUNTRY".to_string())
        );
        assert_eq!(
            etri.normalize_entity("ps_name").unwrap(),
            (CoarseEntityType::PS, "PS_NAME".to_string())
        );
        assert_eq!(etri.normalize_entity("X").unwrap().0, CoarseEntityType::X);
        assert!(matches!(
            etri.normalize_entity("ZZ_THING"),
            Err(KoalaError::UnrecognizedEntity { .. })
        ));
    }

    #[test]
    fn other_analyzers_reject_roles_and_entities() {
        let kkma = table(AnalyzerKind::Kkma);
        assert!(kkma.normalize_role("ARG0").is_err());
        assert!(kkma.normalize_entity("PS_NAME").is_err());
    }
}
