//! Binary relations between two typed fields.
//!
//! The kind of a relation is derived from the cardinalities of its two
//! fields. Arity is a user level property and is checked during validation;
//! the accessors below assume it already holds and panic otherwise, because
//! calling them on an invalid relation is a bug in the compiler, not in the
//! user's source.

use std::fmt;

use super::common::{impl_node, ContextSlot, NodeMeta};
use super::items::impl_declaration;
use super::types::TypeAnnotation;

/// Prefix of the class generated for each relation.
pub const CLASS_PREFIX: &str = "Relation_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    Single,
    Many,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    OneToOne,
    OneToMany,
    ManyToMany,
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RelationKind::OneToOne => "one-to-one",
            RelationKind::OneToMany => "one-to-many",
            RelationKind::ManyToMany => "many-to-many",
        })
    }
}

#[derive(Debug)]
pub struct RelationFieldDefinition {
    meta: NodeMeta,
    name: String,
    target: TypeAnnotation,
    cardinality: Cardinality,
}

impl_node!(RelationFieldDefinition);

impl RelationFieldDefinition {
    pub fn new(name: impl Into<String>, target: TypeAnnotation, cardinality: Cardinality) -> Self {
        let meta = NodeMeta::new();
        target.meta().bind_parent(meta.id());
        RelationFieldDefinition {
            meta,
            name: name.into(),
            target,
            cardinality,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> &TypeAnnotation {
        &self.target
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }
}

#[derive(Debug)]
pub struct RelationDefinition {
    meta: NodeMeta,
    context: ContextSlot,
    name: String,
    fields: Vec<RelationFieldDefinition>,
}

impl_node!(RelationDefinition);
impl_declaration!(RelationDefinition);

impl RelationDefinition {
    pub fn new(name: impl Into<String>, fields: Vec<RelationFieldDefinition>) -> Self {
        let meta = NodeMeta::new();
        for field in &fields {
            field.meta.bind_parent(meta.id());
        }
        RelationDefinition {
            meta,
            context: ContextSlot::default(),
            name: name.into(),
            fields,
        }
    }

    pub(crate) fn bind_context(&self, namespace: &str) {
        self.context.bind(namespace, self.id());
    }

    pub fn fields(&self) -> &[RelationFieldDefinition] {
        &self.fields
    }

    /// Whether the relation has the two fields every relation needs.
    pub fn has_valid_arity(&self) -> bool {
        self.fields.len() == 2
    }

    /// Name of the class generated for this relation.
    pub fn class_name(&self) -> String {
        format!("{}{}", CLASS_PREFIX, self.name)
    }

    /// Derives the relation kind from the two cardinalities.
    ///
    /// # Panics
    /// If the relation does not have exactly two fields.
    pub fn relation_kind(&self) -> RelationKind {
        self.assert_arity();
        let many = self.fields.iter().filter(|f| f.cardinality == Cardinality::Many).count();
        match many {
            0 => RelationKind::OneToOne,
            1 => RelationKind::OneToMany,
            2 => RelationKind::ManyToMany,
            _ => unreachable!("a relation with two fields has at most two many sides"),
        }
    }

    pub fn first_field(&self) -> &RelationFieldDefinition {
        self.assert_arity();
        &self.fields[0]
    }

    pub fn second_field(&self) -> &RelationFieldDefinition {
        self.assert_arity();
        &self.fields[1]
    }

    /// The `Single` side of a one-to-many relation, whatever its declaration order.
    ///
    /// # Panics
    /// If the relation is not one-to-many.
    pub fn single_field(&self) -> &RelationFieldDefinition {
        self.field_with(Cardinality::Single)
    }

    /// The `Many` side of a one-to-many relation, whatever its declaration order.
    ///
    /// # Panics
    /// If the relation is not one-to-many.
    pub fn many_field(&self) -> &RelationFieldDefinition {
        self.field_with(Cardinality::Many)
    }

    fn field_with(&self, cardinality: Cardinality) -> &RelationFieldDefinition {
        let kind = self.relation_kind();
        if kind != RelationKind::OneToMany {
            panic!(
                "relation `{}` is {}, only one-to-many relations have a {:?} field",
                self.name, kind, cardinality
            );
        }
        if self.fields[0].cardinality == cardinality {
            &self.fields[0]
        } else {
            &self.fields[1]
        }
    }

    fn assert_arity(&self) {
        if !self.has_valid_arity() {
            panic!(
                "relation `{}` has {} fields, accessors require exactly 2",
                self.name,
                self.fields.len()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, cardinality: Cardinality) -> RelationFieldDefinition {
        RelationFieldDefinition::new(name, TypeAnnotation::reference("Node"), cardinality)
    }

    fn relation(cardinalities: &[(&str, Cardinality)]) -> RelationDefinition {
        RelationDefinition::new(
            "Tree",
            cardinalities.iter().map(|(n, c)| field(n, *c)).collect(),
        )
    }

    #[test]
    fn test_one_to_many_in_either_order() {
        let single_first = relation(&[("parent", Cardinality::Single), ("children", Cardinality::Many)]);
        assert_eq!(single_first.relation_kind(), RelationKind::OneToMany);
        assert_eq!(single_first.single_field().name(), "parent");
        assert_eq!(single_first.many_field().name(), "children");

        let many_first = relation(&[("children", Cardinality::Many), ("parent", Cardinality::Single)]);
        assert_eq!(many_first.relation_kind(), RelationKind::OneToMany);
        assert_eq!(many_first.single_field().name(), "parent");
        assert_eq!(many_first.many_field().name(), "children");
    }

    #[test]
    fn test_one_to_one_and_many_to_many() {
        let one = relation(&[("a", Cardinality::Single), ("b", Cardinality::Single)]);
        assert_eq!(one.relation_kind(), RelationKind::OneToOne);
        assert_eq!(one.first_field().name(), "a");
        assert_eq!(one.second_field().name(), "b");

        let many = relation(&[("a", Cardinality::Many), ("b", Cardinality::Many)]);
        assert_eq!(many.relation_kind(), RelationKind::ManyToMany);
    }

    #[test]
    #[should_panic(expected = "only one-to-many relations")]
    fn test_many_field_on_one_to_one_panics() {
        let one = relation(&[("a", Cardinality::Single), ("b", Cardinality::Single)]);
        one.many_field();
    }

    #[test]
    #[should_panic(expected = "accessors require exactly 2")]
    fn test_kind_requires_two_fields() {
        let broken = relation(&[("a", Cardinality::Single)]);
        assert!(!broken.has_valid_arity());
        broken.relation_kind();
    }

    #[test]
    fn test_class_name_and_parents() {
        let tree = relation(&[("parent", Cardinality::Single), ("children", Cardinality::Many)]);
        assert_eq!(tree.class_name(), "Relation_Tree");
        assert!(tree.fields().iter().all(|f| f.meta().parent() == Some(tree.id())));
    }
}
