use crate::schema::types::{ParquetType, PhysicalType};
use crate::schema::Repetition;

/// A descriptor for leaf-level primitive columns.
/// This encapsulates the maximum definition and repetition levels and the
/// per-list-depth level assignments used to shred and re-assemble nested
/// data.
#[derive(Debug, PartialEq, Clone)]
pub struct ColumnDescriptor {
    // The "leaf" primitive type of this column
    primitive_type: ParquetType,

    // The maximum definition level for this column
    max_def_level: i16,

    // The maximum repetition level for this column
    max_rep_level: i16,

    // For each list depth `i` in `0..max_rep_level`, the definition level
    // assigned when the list at that depth is present but empty.
    repeated_ancestor_def_levels: Vec<i16>,

    // For each list depth `i`, the definition level assigned when the list
    // at that depth is itself null. Equals the empty-list level when the
    // list cannot be null.
    null_list_def_levels: Vec<i16>,

    // For each list depth `i`, whether the list may be null.
    nullable_lists: Vec<bool>,

    // The path of this column from the root, exclusive.
    path_in_schema: Vec<String>,
}

impl ColumnDescriptor {
    /// Creates new descriptor for leaf-level column.
    pub fn new(
        primitive_type: ParquetType,
        max_def_level: i16,
        max_rep_level: i16,
        repeated_ancestor_def_levels: Vec<i16>,
        null_list_def_levels: Vec<i16>,
        nullable_lists: Vec<bool>,
        path_in_schema: Vec<String>,
    ) -> Self {
        Self {
            primitive_type,
            max_def_level,
            max_rep_level,
            repeated_ancestor_def_levels,
            null_list_def_levels,
            nullable_lists,
            path_in_schema,
        }
    }

    /// Returns maximum definition level for this column.
    pub fn max_def_level(&self) -> i16 {
        self.max_def_level
    }

    /// Returns maximum repetition level for this column.
    pub fn max_rep_level(&self) -> i16 {
        self.max_rep_level
    }

    /// The definition level of a present but empty list at `depth`.
    pub fn empty_list_def_level(&self, depth: usize) -> i16 {
        self.repeated_ancestor_def_levels[depth]
    }

    /// The definition level of a null list at `depth`.
    pub fn null_list_def_level(&self, depth: usize) -> i16 {
        self.null_list_def_levels[depth]
    }

    pub fn repeated_ancestor_def_levels(&self) -> &[i16] {
        &self.repeated_ancestor_def_levels
    }

    pub fn null_list_def_levels(&self) -> &[i16] {
        &self.null_list_def_levels
    }

    /// Whether the list at `depth` may be null.
    pub fn list_is_nullable(&self, depth: usize) -> bool {
        self.nullable_lists[depth]
    }

    /// Whether a present slot at full list depth may hold a null leaf.
    pub fn leaf_is_nullable(&self) -> bool {
        if self.max_rep_level == 0 {
            self.max_def_level > 0
        } else {
            self.max_def_level - 1 > self.repeated_ancestor_def_levels[self.max_rep_level as usize - 1]
        }
    }

    pub fn path_in_schema(&self) -> &[String] {
        &self.path_in_schema
    }

    /// The leaf [`ParquetType`] of this column.
    pub fn type_(&self) -> &ParquetType {
        &self.primitive_type
    }

    /// The physical type of this column.
    pub fn physical_type(&self) -> &PhysicalType {
        match &self.primitive_type {
            ParquetType::PrimitiveType { physical_type, .. } => physical_type,
            ParquetType::GroupType { .. } => unreachable!(),
        }
    }

    /// Whether the leaf itself is declared optional.
    pub fn is_optional(&self) -> bool {
        self.primitive_type.get_basic_info().repetition() == &Repetition::Optional
    }

    /// Returns column name.
    pub fn name(&self) -> &str {
        self.primitive_type.name()
    }
}
