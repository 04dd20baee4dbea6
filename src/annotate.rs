//! Attaches named entities and semantic roles to an assembled [`Sentence`].
//!
//! Both are index cross-references into the sentence, checked the same way
//! dependency heads are: every address must land inside the sentence, and a
//! rejected batch leaves nothing behind.

use std::collections::BTreeMap;

use crate::error::{AnnotationError, Result};
use crate::model::{CoreferenceGroup, Entity, RoleEdge};
use crate::sentence::Sentence;
use crate::tagset::TagNormalizer;
use crate::types::{RawEntity, RawRole};

/// Normalizes raw entity labels and attaches the entities to `sentence`.
///
/// Entities sharing a [`RawEntity::coreference`] key form one
/// [`CoreferenceGroup`]; a key used by a single entity forms no group.
///
/// ```
/// use koala_rs::{annotate_entities, assemble, AnalyzerKind, CoarseEntityType, MorphemeRef,
///     RawEntity, RawMorpheme, RawWord, TagTable};
///
/// let table = TagTable::new(AnalyzerKind::Etri).unwrap();
/// let sentence = assemble(
///     vec![RawWord::new("미국", vec![RawMorpheme::new("미국", "NNP")])],
///     &table,
/// )
/// .unwrap();
/// let sentence = annotate_entities(
///     sentence,
///     vec![RawEntity::new("미국", "LCP_COUNTRY", vec![MorphemeRef::new(0, 0)])],
///     &table,
/// )
/// .unwrap();
/// assert_eq!(sentence.entities()[0].label(), CoarseEntityType::LC);
/// ```
pub fn annotate_entities(
    sentence: Sentence,
    raw_entities: Vec<RawEntity>,
    normalizer: &dyn TagNormalizer,
) -> Result<Sentence> {
    let base = sentence.entities().len();
    let mut entities = Vec::with_capacity(raw_entities.len());
    let mut keyed: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (offset, raw) in raw_entities.into_iter().enumerate() {
        let (label, fine_label) = normalizer.normalize_entity(&raw.label)?;
        if let Some(key) = raw.coreference {
            keyed.entry(key).or_default().push(base + offset);
        }
        entities.push(Entity::new(
            raw.surface,
            label,
            fine_label,
            Some(raw.label),
            raw.morphemes,
        ));
    }
    let groups = keyed
        .into_values()
        .filter(|members| members.len() > 1)
        .map(CoreferenceGroup::new)
        .collect();
    attach_entities(sentence, entities, groups)
}

/// Normalizes raw role labels and attaches the edges to their predicate
/// words.
pub fn annotate_roles(
    sentence: Sentence,
    raw_roles: Vec<RawRole>,
    normalizer: &dyn TagNormalizer,
) -> Result<Sentence> {
    let roles = raw_roles
        .into_iter()
        .map(|raw| -> Result<RoleEdge> {
            let label = normalizer.normalize_role(&raw.label)?;
            Ok(RoleEdge::new(
                raw.predicate,
                raw.argument,
                label,
                raw.modifiers,
                Some(raw.label),
            ))
        })
        .collect::<Result<Vec<_>>>()?;
    attach_roles(sentence, roles)
}

pub(crate) fn attach_entities(
    mut sentence: Sentence,
    entities: Vec<Entity>,
    groups: Vec<CoreferenceGroup>,
) -> Result<Sentence> {
    let base = sentence.entities().len();
    for (offset, entity) in entities.iter().enumerate() {
        check_entity(&sentence, base + offset, entity)?;
    }

    let total = base + entities.len();
    let mut grouped = vec![false; total];
    for member in sentence
        .coreference_groups()
        .iter()
        .flat_map(|group| group.entities().iter())
    {
        if let Some(slot) = grouped.get_mut(*member) {
            *slot = true;
        }
    }
    for &entity in groups.iter().flat_map(|group| group.entities().iter()) {
        let Some(slot) = grouped.get_mut(entity) else {
            return Err(AnnotationError::EntityOutOfRange { entity, len: total }.into());
        };
        if *slot {
            return Err(AnnotationError::SharedEntity { entity }.into());
        }
        *slot = true;
    }

    log::debug!(
        "attached {} entities and {} coreference groups",
        entities.len(),
        groups.len()
    );
    sentence.extend_entities(entities, groups);
    Ok(sentence)
}

fn check_entity(sentence: &Sentence, index: usize, entity: &Entity) -> Result<()> {
    if entity.morphemes().is_empty() {
        return Err(AnnotationError::EmptyEntity { entity: index }.into());
    }
    if !entity.fine_label().starts_with(entity.label().code()) {
        return Err(AnnotationError::FineLabelMismatch {
            entity: index,
            label: entity.label(),
            fine_label: entity.fine_label().to_string(),
        }
        .into());
    }
    for at in entity.morphemes() {
        let word = sentence.get(at.word).ok_or(AnnotationError::WordOutOfRange {
            word: at.word,
            len: sentence.len(),
        })?;
        if at.morpheme >= word.len() {
            return Err(AnnotationError::MorphemeOutOfRange {
                word: at.word,
                morpheme: at.morpheme,
                len: word.len(),
            }
            .into());
        }
    }
    if entity.morphemes().windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(AnnotationError::UnorderedEntity { entity: index }.into());
    }
    Ok(())
}

pub(crate) fn attach_roles(mut sentence: Sentence, roles: Vec<RoleEdge>) -> Result<Sentence> {
    let len = sentence.len();
    for role in &roles {
        let endpoints = [role.predicate(), role.argument()];
        if let Some(&word) = endpoints
            .iter()
            .chain(role.modifiers())
            .find(|word| **word >= len)
        {
            return Err(AnnotationError::WordOutOfRange { word, len }.into());
        }
        if role.predicate() == role.argument() {
            return Err(AnnotationError::SelfRole {
                word: role.predicate(),
            }
            .into());
        }
    }

    log::debug!("attached {} semantic roles", roles.len());
    for role in roles {
        sentence.push_role(role);
    }
    Ok(sentence)
}

#[cfg(test)]
mod annotate_tests {
    use super::{annotate_entities, annotate_roles};
    use crate::analyzer::AnalyzerKind;
    use crate::assemble::assemble;
    use crate::error::{AnnotationError, KoalaError};
    use crate::model::MorphemeRef;
    use crate::sentence::Sentence;
    use crate::tag::{CoarseEntityType, RoleType};
    use crate::tagset::TagTable;
    use crate::types::{HeadRef, RawEntity, RawMorpheme, RawRole, RawWord};

    fn etri() -> TagTable {
        TagTable::new(AnalyzerKind::Etri).unwrap()
    }

    // 트럼프 미국 대통령은 사우디를 감쌌다
    fn sentence() -> Sentence {
        let words = vec![
            RawWord::new("트럼프", vec![RawMorpheme::new("트럼프", "NNP")])
                .with_head(HeadRef::Word(2))
                .with_relation("NP"),
            RawWord::new("미국", vec![RawMorpheme::new("미국", "NNP")])
                .with_head(HeadRef::Word(2))
                .with_relation("NP"),
            RawWord::new(
                "대통령은",
                vec![RawMorpheme::new("대통령", "NNG"), RawMorpheme::new("은", "JX")],
            )
            .with_head(HeadRef::Word(4))
            .with_relation("NP_SBJ"),
            RawWord::new(
                "사우디를",
                vec![RawMorpheme::new("사우디", "NNP"), RawMorpheme::new("를", "JKO")],
            )
            .with_head(HeadRef::Word(4))
            .with_relation("NP_OBJ"),
            RawWord::new(
                "감쌌다",
                vec![
                    RawMorpheme::new("감싸", "VV"),
                    RawMorpheme::new("았", "EP"),
                    RawMorpheme::new("다", "EF"),
                ],
            )
            .with_head(HeadRef::Root)
            .with_relation("VP"),
        ];
        assemble(words, &etri()).unwrap()
    }

    fn entity(surface: &str, label: &str, at: &[(usize, usize)]) -> RawEntity {
        RawEntity::new(
            surface,
            label,
            at.iter().map(|(word, morpheme)| MorphemeRef::new(*word, *morpheme)).collect(),
        )
    }

    #[test]
    fn entities_are_normalized_and_indexed() {
        let annotated = annotate_entities(
            sentence(),
            vec![
                entity("트럼프", "PS_NAME", &[(0, 0)]).with_coreference(7),
                entity("미국", "LCP_COUNTRY", &[(1, 0)]),
                entity("대통령", "CV_POSITION", &[(2, 0)]).with_coreference(7),
                entity("사우디", "LCP_COUNTRY", &[(3, 0)]).with_coreference(9),
            ],
            &etri(),
        )
        .unwrap();

        let entities = annotated.entities();
        assert_eq!(entities.len(), 4);
        assert_eq!(entities[0].label(), CoarseEntityType::PS);
        assert_eq!(entities[1].fine_label(), "LCP_COUNTRY");
        assert_eq!(entities[1].raw_label(), Some("LCP_COUNTRY"));
        assert_eq!(annotated.entities_of_word(2)[0].surface(), "대통령");
        assert_eq!(annotated.entities_at(MorphemeRef::new(3, 0)).len(), 1);
        assert!(annotated.entities_at(MorphemeRef::new(3, 1)).is_empty());

        assert_eq!(annotated.coreference_groups().len(), 1);
        assert_eq!(annotated.coreference_group_of(2).unwrap().entities(), &[0, 2]);
        assert!(annotated.coreference_group_of(3).is_none());
    }

    #[test]
    fn entity_addresses_must_fit_the_sentence() {
        let cases = [
            (
                entity("?", "PS_NAME", &[(9, 0)]),
                AnnotationError::WordOutOfRange { word: 9, len: 5 },
            ),
            (
                entity("?", "PS_NAME", &[(2, 2)]),
                AnnotationError::MorphemeOutOfRange {
                    word: 2,
                    morpheme: 2,
                    len: 2,
                },
            ),
            (entity("?", "PS_NAME", &[]), AnnotationError::EmptyEntity { entity: 0 }),
            (
                entity("?", "PS_NAME", &[(2, 1), (2, 0)]),
                AnnotationError::UnorderedEntity { entity: 0 },
            ),
        ];
        for (raw, expected) in cases {
            let error = annotate_entities(sentence(), vec![raw], &etri()).unwrap_err();
            assert_eq!(error.annotation_error(), Some(&expected));
        }
    }

    #[test]
    fn unknown_entity_labels_are_rejected() {
        let error = annotate_entities(sentence(), vec![entity("?", "QQ", &[(0, 0)])], &etri())
            .unwrap_err();
        assert!(matches!(error, KoalaError::UnrecognizedEntity { .. }));
    }

    #[test]
    fn roles_attach_to_their_predicate() {
        let annotated = annotate_roles(
            sentence(),
            vec![
                RawRole::new(4, 2, "ARG0").with_modifiers(vec![0, 1]),
                RawRole::new(4, 3, "ARG1"),
            ],
            &etri(),
        )
        .unwrap();

        assert_eq!(annotated.roles().len(), 2);
        let roles = annotated.argument_roles(4);
        assert_eq!(roles[0].label(), RoleType::ARG0);
        assert_eq!(roles[0].modifiers(), &[0, 1]);
        assert_eq!(roles[1].raw_label(), Some("ARG1"));
        assert!(annotated.argument_roles(2).is_empty());
        assert_eq!(annotated.predicate_roles(3)[0].predicate(), 4);
        assert!(annotated.predicate_roles(4).is_empty());
    }

    #[test]
    fn role_endpoints_must_fit_the_sentence() {
        let error = annotate_roles(sentence(), vec![RawRole::new(4, 5, "ARG1")], &etri()).unwrap_err();
        assert_eq!(
            error.annotation_error(),
            Some(&AnnotationError::WordOutOfRange { word: 5, len: 5 })
        );

        let error = annotate_roles(
            sentence(),
            vec![RawRole::new(4, 3, "ARG1").with_modifiers(vec![6])],
            &etri(),
        )
        .unwrap_err();
        assert_eq!(
            error.annotation_error(),
            Some(&AnnotationError::WordOutOfRange { word: 6, len: 5 })
        );

        let error = annotate_roles(sentence(), vec![RawRole::new(4, 4, "ARG1")], &etri()).unwrap_err();
        assert_eq!(
            error.annotation_error(),
            Some(&AnnotationError::SelfRole { word: 4 })
        );
    }

    #[test]
    fn annotated_records_round_trip_and_are_revalidated() {
        let table = etri();
        let annotated = annotate_roles(
            annotate_entities(
                sentence(),
                vec![
                    entity("트럼프", "PS_NAME", &[(0, 0)]).with_coreference(1),
                    entity("대통령", "CV_POSITION", &[(2, 0)]).with_coreference(1),
                ],
                &table,
            )
            .unwrap(),
            vec![RawRole::new(4, 2, "ARG0")],
            &table,
        )
        .unwrap();

        let json = annotated.to_json().unwrap();
        assert_eq!(Sentence::from_json(&json).unwrap(), annotated);

        let mut record = annotated.to_record();
        record.coreference[0] = crate::model::CoreferenceGroup::new(vec![0, 3]);
        assert_eq!(
            Sentence::from_record(record).unwrap_err().annotation_error(),
            Some(&AnnotationError::EntityOutOfRange { entity: 3, len: 2 })
        );

        let mut record = annotated.to_record();
        let role = record.words[4].argument_roles.remove(0);
        record.words[2].argument_roles.push(role);
        assert!(matches!(
            Sentence::from_record(record),
            Err(KoalaError::InvalidArgument(_))
        ));
    }
}
