//! Reconstruction of nested values from parallel (values, repetition,
//! definition) streams, the inverse of the write-side shredding.

use crate::error::{Error, Result};
use crate::metadata::ColumnDescriptor;
use crate::nested::Nested;

/// Assembles a flat nullable column: one entry per definition level, present
/// iff the level equals `max_def`.
pub fn to_optional<T>(
    values: Vec<T>,
    def_levels: &[u32],
    max_def: i16,
) -> Result<Vec<Option<T>>> {
    let expected = values.len();
    let mut values = values.into_iter();
    let mut out = Vec::with_capacity(def_levels.len());
    for &def in def_levels {
        if def as i16 == max_def {
            let value = values.next().ok_or(Error::ValueMismatch {
                expected,
                got: expected + 1,
            })?;
            out.push(Some(value));
        } else {
            out.push(None);
        }
    }
    if values.next().is_some() {
        return Err(Error::ValueMismatch {
            expected: out.iter().filter(|value| value.is_some()).count(),
            got: expected,
        });
    }
    Ok(out)
}

/// Reconstructs the nested structure of a list column. Depth transitions are
/// driven by the repetition levels; null and empty states by the definition
/// levels, using the same level assignments as the writer.
pub fn to_nested<T>(
    values: Vec<T>,
    rep_levels: &[u32],
    def_levels: &[u32],
    descriptor: &ColumnDescriptor,
) -> Result<Vec<Nested<T>>> {
    let max_rep = descriptor.max_rep_level() as usize;
    let max_def = descriptor.max_def_level();
    if max_rep == 0 {
        return Err(Error::SchemaMismatch(format!(
            "column \"{}\" is not a list column",
            descriptor.name()
        )));
    }
    if rep_levels.len() != def_levels.len() {
        return Err(Error::ValueMismatch {
            expected: rep_levels.len(),
            got: def_levels.len(),
        });
    }
    let leaf_nullable = descriptor.leaf_is_nullable();

    let num_present = values.len();
    let mut values = values.into_iter();
    let mut rows: Vec<Nested<T>> = vec![];
    // the open (incomplete) list at each depth; depth 0 is the outermost
    let mut open: Vec<Option<Vec<Nested<T>>>> = (0..max_rep).map(|_| None).collect();

    for (i, (&rep, &def)) in rep_levels.iter().zip(def_levels.iter()).enumerate() {
        let rep = rep as usize;
        if rep > max_rep {
            return Err(Error::OutOfSpec(format!(
                "repetition level {} exceeds the maximum {}",
                rep, max_rep
            )));
        }
        if i == 0 {
            if rep != 0 {
                return Err(Error::OutOfSpec(
                    "the first repetition level of a page must be 0".to_string(),
                ));
            }
        } else {
            close_lists(&mut open, &mut rows, rep);
        }

        if def as i16 == max_def {
            open_lists(&mut open, max_rep);
            let value = values.next().ok_or(Error::ValueMismatch {
                expected: num_present,
                got: num_present + 1,
            })?;
            open[max_rep - 1].as_mut().unwrap().push(Nested::Value(value));
        } else if leaf_nullable && def as i16 + 1 == max_def {
            open_lists(&mut open, max_rep);
            open[max_rep - 1].as_mut().unwrap().push(Nested::Null);
        } else {
            push_list_state(&mut open, &mut rows, descriptor, def as i16)?;
        }
    }
    close_lists(&mut open, &mut rows, 0);

    if values.next().is_some() {
        return Err(Error::ValueMismatch {
            expected: def_levels
                .iter()
                .filter(|&&level| level as i16 == max_def)
                .count(),
            got: num_present,
        });
    }
    Ok(rows)
}

/// Wraps and flushes open lists at depths `from..`, deepest first.
fn close_lists<T>(
    open: &mut [Option<Vec<Nested<T>>>],
    rows: &mut Vec<Nested<T>>,
    from: usize,
) {
    for depth in (from..open.len()).rev() {
        if let Some(items) = open[depth].take() {
            let list = Nested::List(items);
            if depth == 0 {
                rows.push(list);
            } else {
                open[depth - 1].get_or_insert_with(Vec::new).push(list);
            }
        }
    }
}

/// Opens lists at every depth below `to` that is not open yet.
fn open_lists<T>(open: &mut [Option<Vec<Nested<T>>>], to: usize) {
    for list in open.iter_mut().take(to) {
        if list.is_none() {
            *list = Some(vec![]);
        }
    }
}

/// An empty or null list at the depth encoded by `def`.
fn push_list_state<T>(
    open: &mut [Option<Vec<Nested<T>>>],
    rows: &mut Vec<Nested<T>>,
    descriptor: &ColumnDescriptor,
    def: i16,
) -> Result<()> {
    for depth in 0..open.len() {
        let state = if def == descriptor.empty_list_def_level(depth) {
            Nested::List(vec![])
        } else if descriptor.list_is_nullable(depth) && def == descriptor.null_list_def_level(depth)
        {
            Nested::Null
        } else {
            continue;
        };
        if depth == 0 {
            rows.push(state);
        } else {
            open_lists(open, depth);
            open[depth - 1].as_mut().unwrap().push(state);
        }
        return Ok(());
    }
    Err(Error::OutOfSpec(format!(
        "definition level {} does not match the column's level assignments",
        def
    )))
}
