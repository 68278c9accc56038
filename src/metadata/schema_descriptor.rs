use parquet_format_safe::SchemaElement;

use crate::error::{Error, Result};
use crate::schema::types::ParquetType;
use crate::schema::Repetition;

use super::column_descriptor::ColumnDescriptor;

/// A schema descriptor. This encapsulates the top-level schema together with
/// the descriptors of all leaf columns, including the level assignments each
/// leaf needs to shred and re-assemble nested values. The level assignments
/// are computed once, here, when the schema is finalized.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDescriptor {
    name: String,
    // The top-level fields of the "message" type.
    fields: Vec<ParquetType>,

    // All descriptors of primitive columns, constructed from `fields` in
    // depth-first pre-order.
    leaves: Vec<ColumnDescriptor>,
}

impl SchemaDescriptor {
    /// Creates a new schema descriptor from the schema's top-level fields.
    pub fn new(name: String, fields: Vec<ParquetType>) -> Self {
        let mut leaves = vec![];
        for field in &fields {
            let walk = Walk {
                max_rep_level: 0,
                max_def_level: 0,
                repeated_ancestor_def_levels: vec![],
                null_list_def_levels: vec![],
                nullable_lists: vec![],
                parent_is_optional: false,
            };
            let mut path = vec![];
            build_tree(field, walk, &mut leaves, &mut path);
        }

        Self {
            name,
            fields,
            leaves,
        }
    }

    /// Returns [`ColumnDescriptor`] for a leaf position.
    pub fn column(&self, i: usize) -> &ColumnDescriptor {
        &self.leaves[i]
    }

    /// Returns slice of [`ColumnDescriptor`].
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.leaves
    }

    /// Returns number of leaf-level columns.
    pub fn num_columns(&self) -> usize {
        self.leaves.len()
    }

    /// The schema's top-level fields.
    pub fn fields(&self) -> &[ParquetType] {
        &self.fields
    }

    /// Returns schema name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn into_thrift(&self) -> Result<Vec<SchemaElement>> {
        let root = ParquetType::new_root(self.name.clone(), self.fields.clone());
        root.to_thrift()
    }

    pub(crate) fn try_from_thrift(elements: &[SchemaElement]) -> Result<Self> {
        let root = ParquetType::try_from_thrift(elements)?;
        match root {
            ParquetType::GroupType {
                basic_info, fields, ..
            } => Ok(Self::new(basic_info.name().to_string(), fields)),
            ParquetType::PrimitiveType { .. } => Err(Error::InvalidFile(
                "The root of the schema must be a group type".to_string(),
            )),
        }
    }
}

#[derive(Clone)]
struct Walk {
    max_rep_level: i16,
    max_def_level: i16,
    repeated_ancestor_def_levels: Vec<i16>,
    null_list_def_levels: Vec<i16>,
    nullable_lists: Vec<bool>,
    parent_is_optional: bool,
}

fn build_tree<'a>(
    tp: &'a ParquetType,
    mut walk: Walk,
    leaves: &mut Vec<ColumnDescriptor>,
    path_so_far: &mut Vec<&'a str>,
) {
    path_so_far.push(tp.name());
    match tp.get_basic_info().repetition() {
        Repetition::Optional => {
            walk.max_def_level += 1;
        }
        Repetition::Repeated => {
            // the level of a present but empty list excludes the repeated
            // node's own contribution; a null list additionally excludes its
            // optional parent's.
            walk.repeated_ancestor_def_levels.push(walk.max_def_level);
            if walk.parent_is_optional {
                walk.null_list_def_levels.push(walk.max_def_level - 1);
            } else {
                walk.null_list_def_levels.push(walk.max_def_level);
            }
            walk.nullable_lists.push(walk.parent_is_optional);
            walk.max_def_level += 1;
            walk.max_rep_level += 1;
        }
        Repetition::Required => {}
    }
    walk.parent_is_optional =
        tp.get_basic_info().repetition() == &Repetition::Optional;

    match tp {
        ParquetType::PrimitiveType { .. } => {
            let path_in_schema = path_so_far.iter().copied().map(String::from).collect();
            leaves.push(ColumnDescriptor::new(
                tp.clone(),
                walk.max_def_level,
                walk.max_rep_level,
                walk.repeated_ancestor_def_levels,
                walk.null_list_def_levels,
                walk.nullable_lists,
                path_in_schema,
            ));
        }
        ParquetType::GroupType { ref fields, .. } => {
            for field in fields {
                build_tree(field, walk.clone(), leaves, path_so_far);
                path_so_far.pop();
            }
        }
    }
}
