// see https://github.com/apache/parquet-format/blob/master/LogicalTypes.md
use crate::error::{Error, Result};
use crate::parquet_bridge::{GroupLogicalType, PrimitiveLogicalType};

use super::super::Repetition;
use super::{spec, BasicTypeInfo, GroupConvertedType, PhysicalType, PrimitiveConvertedType};

/// Representation of a Parquet type.
/// Used to describe primitive leaf fields and structs, including the
/// top-level schema. The top-level schema is represented by a `GroupType`
/// whose repetition is not serialized.
#[derive(Clone, Debug, PartialEq)]
pub enum ParquetType {
    PrimitiveType {
        basic_info: BasicTypeInfo,
        logical_type: Option<PrimitiveLogicalType>,
        converted_type: Option<PrimitiveConvertedType>,
        physical_type: PhysicalType,
    },
    GroupType {
        basic_info: BasicTypeInfo,
        logical_type: Option<GroupLogicalType>,
        converted_type: Option<GroupConvertedType>,
        fields: Vec<ParquetType>,
    },
}

/// Accessors
impl ParquetType {
    /// Returns [`BasicTypeInfo`] information about the type.
    pub fn get_basic_info(&self) -> &BasicTypeInfo {
        match *self {
            Self::PrimitiveType { ref basic_info, .. } => basic_info,
            Self::GroupType { ref basic_info, .. } => basic_info,
        }
    }

    /// Returns this type's field name.
    pub fn name(&self) -> &str {
        self.get_basic_info().name()
    }

    pub fn is_root(&self) -> bool {
        self.get_basic_info().is_root()
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Self::GroupType { .. })
    }

    /// The physical type of a leaf; `None` for groups.
    pub fn physical_type(&self) -> Option<&PhysicalType> {
        match self {
            Self::PrimitiveType { physical_type, .. } => Some(physical_type),
            Self::GroupType { .. } => None,
        }
    }

    /// The fields of a group; `None` for leaves.
    pub fn fields(&self) -> Option<&[ParquetType]> {
        match self {
            Self::GroupType { fields, .. } => Some(fields),
            Self::PrimitiveType { .. } => None,
        }
    }
}

/// Constructors
impl ParquetType {
    pub fn new_root(name: String, fields: Vec<ParquetType>) -> Self {
        let basic_info = BasicTypeInfo::new(name, Repetition::Optional, None, true);
        ParquetType::GroupType {
            basic_info,
            fields,
            logical_type: None,
            converted_type: None,
        }
    }

    pub fn from_converted(
        name: String,
        fields: Vec<ParquetType>,
        repetition: Repetition,
        converted_type: Option<GroupConvertedType>,
        id: Option<i32>,
    ) -> Self {
        let basic_info = BasicTypeInfo::new(name, repetition, id, false);
        ParquetType::GroupType {
            basic_info,
            fields,
            converted_type,
            logical_type: None,
        }
    }

    /// Returns a new leaf, validating the annotation invariants.
    pub fn try_from_primitive(
        name: String,
        physical_type: PhysicalType,
        repetition: Repetition,
        converted_type: Option<PrimitiveConvertedType>,
        logical_type: Option<PrimitiveLogicalType>,
        id: Option<i32>,
    ) -> Result<Self> {
        spec::check_converted_invariants(&physical_type, &converted_type)?;
        spec::check_logical_invariants(&physical_type, &logical_type)?;

        let basic_info = BasicTypeInfo::new(name, repetition, id, false);

        Ok(ParquetType::PrimitiveType {
            basic_info,
            converted_type,
            logical_type,
            physical_type,
        })
    }

    /// Returns a new required leaf with neither annotations nor id.
    pub fn from_physical(name: String, physical_type: PhysicalType) -> Self {
        let basic_info = BasicTypeInfo::new(name, Repetition::Required, None, false);
        ParquetType::PrimitiveType {
            basic_info,
            converted_type: None,
            logical_type: None,
            physical_type,
        }
    }

    /// Returns a new group; a group must have at least one field.
    pub fn try_from_group(
        name: String,
        repetition: Repetition,
        converted_type: Option<GroupConvertedType>,
        logical_type: Option<GroupLogicalType>,
        fields: Vec<ParquetType>,
        id: Option<i32>,
    ) -> Result<Self> {
        if fields.is_empty() {
            return Err(Error::OutOfSpec(format!(
                "The group \"{}\" must have at least one field",
                name
            )));
        }
        let basic_info = BasicTypeInfo::new(name, repetition, id, false);

        Ok(ParquetType::GroupType {
            basic_info,
            logical_type,
            converted_type,
            fields,
        })
    }

    /// The standard three-level encoding of a list: an annotated group with a
    /// repeated `list` group holding the element field.
    pub fn try_list(
        name: String,
        repetition: Repetition,
        element: ParquetType,
    ) -> Result<Self> {
        let list = ParquetType::try_from_group(
            "list".to_string(),
            Repetition::Repeated,
            None,
            None,
            vec![element],
            None,
        )?;
        ParquetType::try_from_group(
            name,
            repetition,
            Some(GroupConvertedType::List),
            Some(GroupLogicalType::List),
            vec![list],
            None,
        )
    }

    /// The standard encoding of a map: an annotated group with a repeated
    /// `key_value` group holding a required key and an optional value.
    pub fn try_map(
        name: String,
        repetition: Repetition,
        key: ParquetType,
        value: ParquetType,
    ) -> Result<Self> {
        if key.get_basic_info().repetition() != &Repetition::Required {
            return Err(Error::OutOfSpec(
                "A map key must be required".to_string(),
            ));
        }
        let key_value = ParquetType::try_from_group(
            "key_value".to_string(),
            Repetition::Repeated,
            None,
            None,
            vec![key, value],
            None,
        )?;
        ParquetType::try_from_group(
            name,
            repetition,
            Some(GroupConvertedType::Map),
            Some(GroupLogicalType::Map),
            vec![key_value],
            None,
        )
    }
}
