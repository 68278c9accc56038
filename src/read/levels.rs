use crate::encoding::get_length;
use crate::error::{Error, Result};

/// Splits a v1 page body into its length-prefixed repetition-level,
/// definition-level and values sections.
pub fn split_buffer_v1(
    buffer: &[u8],
    has_rep: bool,
    has_def: bool,
) -> Result<(&[u8], &[u8], &[u8])> {
    let (rep, buffer) = if has_rep {
        split_level(buffer)?
    } else {
        (&[] as &[u8], buffer)
    };

    let (def, buffer) = if has_def {
        split_level(buffer)?
    } else {
        (&[] as &[u8], buffer)
    };

    Ok((rep, def, buffer))
}

/// Splits off one length-prefixed level stream, returning it with its
/// prefix.
fn split_level(buffer: &[u8]) -> Result<(&[u8], &[u8])> {
    if buffer.len() < 4 {
        return Err(Error::MissingLengthPrefix);
    }
    let length = get_length(buffer) as usize;
    if buffer.len() < 4 + length {
        return Err(Error::InvalidSize(format!(
            "a level stream declares {} bytes but the page has {}",
            length,
            buffer.len() - 4
        )));
    }
    Ok((&buffer[..4 + length], &buffer[4 + length..]))
}

/// Splits a v2 page body into its unframed repetition-level,
/// definition-level and values sections, by the lengths the header declares.
pub fn split_buffer_v2(
    buffer: &[u8],
    rep_levels_byte_length: usize,
    def_levels_byte_length: usize,
) -> Result<(&[u8], &[u8], &[u8])> {
    let levels = rep_levels_byte_length + def_levels_byte_length;
    if buffer.len() < levels {
        return Err(Error::InvalidSize(
            "the level sections are larger than the page".to_string(),
        ));
    }
    Ok((
        &buffer[..rep_levels_byte_length],
        &buffer[rep_levels_byte_length..levels],
        &buffer[levels..],
    ))
}
