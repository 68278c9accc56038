use parquet_format_safe::SchemaElement;

use crate::error::{Error, Result};

use super::super::types::{
    group_converted_to_converted, logical_to_converted, physical_type_to_type,
    primitive_converted_to_converted, ParquetType,
};

impl ParquetType {
    /// Method to convert to Thrift: the schema flattened in depth-first
    /// pre-order.
    pub fn to_thrift(&self) -> Result<Vec<SchemaElement>> {
        if !self.is_root() {
            return Err(Error::OutOfSpec(
                "The root of the schema must be a group type".to_string(),
            ));
        }
        let mut elements: Vec<SchemaElement> = Vec::new();
        to_thrift_helper(self, &mut elements);
        Ok(elements)
    }
}

/// Constructs the list of `SchemaElement` using depth-first traversal.
/// Here we assume that the schema is always valid and starts with a group.
fn to_thrift_helper(schema: &ParquetType, elements: &mut Vec<SchemaElement>) {
    match schema {
        ParquetType::PrimitiveType {
            basic_info,
            logical_type,
            converted_type,
            physical_type,
        } => {
            let (type_, type_length) = physical_type_to_type(physical_type);
            // the legacy converted type is always populated for backwards
            // compatibility
            let converted_type = (*converted_type)
                .or_else(|| logical_type.as_ref().and_then(logical_to_converted));
            let converted_type =
                converted_type.map(|x| primitive_converted_to_converted(&x));
            let (converted_type, maybe_decimal) = converted_type
                .map(|x| (Some(x.0), x.1))
                .unwrap_or((None, None));

            let element = SchemaElement {
                type_: Some(type_),
                type_length,
                repetition_type: Some((*basic_info.repetition()).into()),
                name: basic_info.name().to_owned(),
                num_children: None,
                converted_type,
                precision: maybe_decimal.map(|x| x.0),
                scale: maybe_decimal.map(|x| x.1),
                field_id: *basic_info.id(),
                logical_type: logical_type.map(|x| x.into()),
            };

            elements.push(element);
        }
        ParquetType::GroupType {
            basic_info,
            fields,
            logical_type,
            converted_type,
        } => {
            let converted_type = converted_type.as_ref().map(group_converted_to_converted);

            let repetition_type = if basic_info.is_root() {
                // https://github.com/apache/parquet-format/blob/7f06e838cbd1b7dbd722ff2580b9c2525e37fc46/src/main/thrift/parquet.thrift#L363
                None
            } else {
                Some(*basic_info.repetition())
            };

            let element = SchemaElement {
                type_: None,
                type_length: None,
                repetition_type: repetition_type.map(|x| x.into()),
                name: basic_info.name().to_owned(),
                num_children: Some(fields.len() as i32),
                converted_type,
                scale: None,
                precision: None,
                field_id: *basic_info.id(),
                logical_type: logical_type.map(|x| x.into()),
            };

            elements.push(element);

            // Add child elements for a group
            for field in fields {
                to_thrift_helper(field, elements);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::types::{PhysicalType, PrimitiveLogicalType};
    use super::super::super::Repetition;
    use super::*;

    #[test]
    fn round_trip_nested() -> Result<()> {
        let element = ParquetType::try_from_primitive(
            "element".to_string(),
            PhysicalType::Int64,
            Repetition::Required,
            None,
            None,
            None,
        )?;
        let list = ParquetType::try_list("a".to_string(), Repetition::Optional, element)?;
        let string = ParquetType::try_from_primitive(
            "b".to_string(),
            PhysicalType::ByteArray,
            Repetition::Optional,
            None,
            Some(PrimitiveLogicalType::String),
            Some(42),
        )?;
        let root = ParquetType::new_root("schema".to_string(), vec![list, string]);

        let elements = root.to_thrift()?;
        assert_eq!(elements.len(), 5);
        assert_eq!(elements[0].num_children, Some(2));
        assert_eq!(elements[0].repetition_type, None);
        // the legacy converted type is derived from the logical annotation
        assert_eq!(
            elements[4].converted_type,
            Some(parquet_format_safe::ConvertedType::UTF8)
        );

        // on the way back the derived converted type is materialized
        let recovered = ParquetType::try_from_thrift(&elements)?;
        let expected_string = ParquetType::try_from_primitive(
            "b".to_string(),
            PhysicalType::ByteArray,
            Repetition::Optional,
            Some(super::super::super::types::PrimitiveConvertedType::Utf8),
            Some(PrimitiveLogicalType::String),
            Some(42),
        )?;
        match &recovered {
            ParquetType::GroupType { fields, .. } => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[1], expected_string);
            }
            _ => panic!("the root must be a group"),
        }
        assert_eq!(recovered.name(), root.name());
        Ok(())
    }
}
