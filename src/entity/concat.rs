//! # Concatenation
//!
//! Joins same-shaped entities end-to-end. Every input must expose the same field names with
//! the same kinds; fields are joined in input order and the index is rebuilt from the source of
//! the first entity:
//!
//! * attribute index – re-derived from the concatenated field;
//! * explicit index – the per-row keys are concatenated when every input carries one,
//!   otherwise the result falls back to the range index;
//! * range index – a fresh range over the concatenated rows.
use itertools::Itertools;

use crate::{
    entity::Entity,
    field::{Field, FieldKind},
    index::{builder::check_member_validity, IndexSpec, IndexState},
    indexable_errors::IndexableError,
    value::Value,
};

fn describe(schema: &[(&str, FieldKind)]) -> String {
    schema
        .iter()
        .map(|(name, kind)| format!("{name}: {kind}"))
        .join(", ")
}

/// Check that `other` has the field names and kinds of `reference`.
fn check_schema(reference: &Entity, other: &Entity) -> Result<(), IndexableError> {
    let expected = reference.schema();
    let found = other.schema();

    let same = expected.len() == found.len()
        && expected
            .iter()
            .all(|(name, kind)| found.iter().any(|(n, k)| n == name && k == kind));

    if same {
        return Ok(());
    }

    Err(IndexableError::Consistency(format!(
        "schemas differ, expected [{}] but found [{}]",
        describe(&expected),
        describe(&found)
    )))
}

/// Concatenate `entities` end-to-end.
///
/// Arguments
/// -----------------
/// * `entities`: non-empty ordered sequence of entities sharing one schema.
///
/// Return
/// ----------
/// * A new entity whose rows are the rows of every input, in input order.
///
/// Errors
/// ----------
/// * [`IndexableError::EmptyConcatenation`] if `entities` is empty.
/// * [`IndexableError::Consistency`] on schema mismatch, on temporal fields in different time
///   scales and on opaque fields that differ between inputs.
pub fn concatenate<'a, I>(entities: I) -> Result<Entity, IndexableError>
where
    I: IntoIterator<Item = &'a Entity>,
{
    let entities: Vec<&Entity> = entities.into_iter().collect();
    let Some(first) = entities.first() else {
        return Err(IndexableError::EmptyConcatenation);
    };

    for other in &entities[1..] {
        check_schema(first, other)?;
    }

    let mut fields = Vec::with_capacity(first.fields.len());
    for (name, _) in &first.fields {
        let parts = entities
            .iter()
            .map(|entity| entity.require(name))
            .collect::<Result<Vec<&Field>, _>>()?;
        fields.push((name.clone(), Field::concat(name, &parts)?));
    }

    let member_length = check_member_validity(&fields)?;

    tracing::debug!(
        entities = entities.len(),
        rows = member_length,
        "concatenated entities"
    );

    let index = match first.index_spec() {
        IndexSpec::Range => IndexState::range(member_length),
        IndexSpec::Attribute(name) => {
            let keys = fields
                .iter()
                .find(|(n, _)| n == name)
                .ok_or_else(|| IndexableError::FieldNotFound(name.clone()))?
                .1
                .row_values(name, "concatenate")?;
            IndexState::from_row_keys(first.index_spec().clone(), &keys)
        }
        IndexSpec::Explicit(_) => {
            let explicit: Option<Vec<&[Value]>> = entities
                .iter()
                .map(|entity| match entity.index_spec() {
                    IndexSpec::Explicit(keys) => Some(keys.as_slice()),
                    _ => None,
                })
                .collect();

            match explicit {
                Some(parts) => IndexState::explicit(parts.concat()),
                None => {
                    tracing::debug!("not every entity carries explicit keys, using a range index");
                    IndexState::range(member_length)
                }
            }
        }
    };

    Ok(Entity { fields, index })
}

#[cfg(test)]
mod concat_test {
    use super::*;
    use crate::{field::ArrayColumn, time::EpochColumn};
    use hifitime::TimeScale;

    fn entity(ids: Vec<&str>, scale: TimeScale) -> Entity {
        let n = ids.len();
        Entity::builder()
            .array("id", ids)
            .temporal("times", EpochColumn::new(vec![0.0; n], scale))
            .opaque("frame", "ecliptic")
            .index("id")
            .build()
            .unwrap()
    }

    #[test]
    fn test_attribute_index_is_rederived() {
        let a = entity(vec!["a", "b"], TimeScale::TDB);
        let b = entity(vec!["a", "c"], TimeScale::TDB);
        let joined = concatenate([&a, &b]).unwrap();
        assert_eq!(joined.member_length(), 4);
        assert_eq!(
            joined.index(),
            &[Value::from("a"), Value::from("b"), Value::from("c")]
        );
        assert!(!joined.mapping().is_slice_form());
    }

    #[test]
    fn test_explicit_keys_are_concatenated() {
        let mut a = entity(vec!["a", "b"], TimeScale::TDB);
        let mut b = entity(vec!["c"], TimeScale::TDB);
        a.set_index(IndexSpec::explicit([10, 11])).unwrap();
        b.set_index(IndexSpec::explicit([12])).unwrap();

        let joined = concatenate([&a, &b]).unwrap();
        assert_eq!(
            joined.index_spec(),
            &IndexSpec::explicit([10, 11, 12])
        );

        b.reset_index();
        let joined = concatenate([&a, &b]).unwrap();
        assert_eq!(joined.index_spec(), &IndexSpec::Range);
        assert_eq!(joined.len(), 3);
    }

    #[test]
    fn test_consistency_errors() {
        let tdb = entity(vec!["a"], TimeScale::TDB);
        let utc = entity(vec!["b"], TimeScale::UTC);
        assert!(matches!(
            concatenate([&tdb, &utc]),
            Err(IndexableError::Consistency(_))
        ));

        let other_frame = Entity::builder()
            .array("id", vec!["b"])
            .temporal("times", EpochColumn::new(vec![0.0], TimeScale::TDB))
            .opaque("frame", "equatorial")
            .build()
            .unwrap();
        assert!(matches!(
            concatenate([&tdb, &other_frame]),
            Err(IndexableError::Consistency(_))
        ));

        let missing = Entity::builder()
            .array("id", vec!["b"])
            .build()
            .unwrap();
        assert_eq!(
            concatenate([&tdb, &missing]),
            Err(IndexableError::Consistency(
                "schemas differ, expected [id: array, times: temporal, frame: opaque] \
                 but found [id: array]"
                    .into()
            ))
        );
        assert_eq!(missing.schema(), vec![("id", FieldKind::Array)]);

        assert_eq!(
            concatenate(std::iter::empty()),
            Err(IndexableError::EmptyConcatenation)
        );
    }

    #[test]
    fn test_concat_through_sliceable() {
        use crate::field::Sliceable;
        let a = entity(vec!["a"], TimeScale::TDB);
        let joined = Entity::concat(&[&a, &a]).unwrap();
        assert_eq!(joined.member_length(), 2);
        assert_eq!(joined.len(), 1);
        assert_eq!(
            joined.array("id").unwrap(),
            &ArrayColumn::from(vec!["a", "a"])
        );
    }
}
