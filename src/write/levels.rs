//! Shredding of nested values into parallel (values, repetition levels,
//! definition levels) streams.

use crate::error::{Error, Result};
use crate::metadata::ColumnDescriptor;
use crate::nested::Nested;
use crate::types::ParquetValue;

/// Folds `items` (one node per row) into the three parallel streams,
/// appending to the output buffers. Emits exactly one (rep, def) pair per
/// logical list entry, including empty and null ones.
pub fn shred_nested<T: ParquetValue>(
    items: &[Nested<T>],
    descriptor: &ColumnDescriptor,
    values: &mut Vec<T>,
    def_levels: &mut Vec<u32>,
    rep_levels: &mut Vec<u32>,
) -> Result<()> {
    for item in items {
        shred_node(item, 0, 0, descriptor, values, def_levels, rep_levels)?;
    }
    Ok(())
}

fn shred_node<T: ParquetValue>(
    node: &Nested<T>,
    depth: usize,
    rep_level: u32,
    descriptor: &ColumnDescriptor,
    values: &mut Vec<T>,
    def_levels: &mut Vec<u32>,
    rep_levels: &mut Vec<u32>,
) -> Result<()> {
    let max_rep = descriptor.max_rep_level() as usize;
    match node {
        Nested::List(items) => {
            if depth >= max_rep {
                return Err(Error::SchemaMismatch(format!(
                    "column \"{}\" holds lists nested at most {} deep",
                    descriptor.name(),
                    max_rep
                )));
            }
            if items.is_empty() {
                rep_levels.push(rep_level);
                def_levels.push(descriptor.empty_list_def_level(depth) as u32);
            } else {
                for (i, item) in items.iter().enumerate() {
                    // the first element continues the enclosing entry; the
                    // following ones repeat at this list's depth
                    let child_rep = if i == 0 { rep_level } else { depth as u32 + 1 };
                    shred_node(
                        item,
                        depth + 1,
                        child_rep,
                        descriptor,
                        values,
                        def_levels,
                        rep_levels,
                    )?;
                }
            }
        }
        Nested::Null => {
            if depth == max_rep {
                if !descriptor.leaf_is_nullable() {
                    return Err(Error::SchemaMismatch(format!(
                        "the elements of column \"{}\" are required",
                        descriptor.name()
                    )));
                }
                rep_levels.push(rep_level);
                def_levels.push(descriptor.max_def_level() as u32 - 1);
            } else {
                if !descriptor.list_is_nullable(depth) {
                    return Err(Error::SchemaMismatch(format!(
                        "the list at depth {} of column \"{}\" is required",
                        depth,
                        descriptor.name()
                    )));
                }
                rep_levels.push(rep_level);
                def_levels.push(descriptor.null_list_def_level(depth) as u32);
            }
        }
        Nested::Value(value) => {
            if depth != max_rep {
                return Err(Error::SchemaMismatch(format!(
                    "column \"{}\" expects lists nested {} deep, got a value at depth {}",
                    descriptor.name(),
                    max_rep,
                    depth
                )));
            }
            rep_levels.push(rep_level);
            def_levels.push(descriptor.max_def_level() as u32);
            values.push(value.clone());
        }
    }
    Ok(())
}

/// Fans a sequence of maps out into the key and value column streams. The
/// two streams share a common repetition shape; entries are sorted by key so
/// the emitted chunk is deterministic.
pub fn map_streams<K: ParquetValue + Ord, V: ParquetValue>(
    maps: &[Option<Vec<(K, Option<V>)>>],
) -> (Vec<Nested<K>>, Vec<Nested<V>>) {
    maps.iter()
        .map(|map| match map {
            None => (Nested::Null, Nested::Null),
            Some(entries) => {
                let mut entries = entries.clone();
                entries.sort_by(|a, b| a.0.cmp(&b.0));
                let keys = entries
                    .iter()
                    .map(|(key, _)| Nested::Value(key.clone()))
                    .collect();
                let values = entries
                    .into_iter()
                    .map(|(_, value)| Nested::from(value))
                    .collect();
                (Nested::List(keys), Nested::List(values))
            }
        })
        .unzip()
}
