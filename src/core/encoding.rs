use std::num::ParseIntError;

use crate::core::grid::GridIndex;

pub type DecodeResult<T> = Result<T, DecodeError>;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum DecodeError {
    #[error("invalid move {input:?}: expected two integers separated by a comma")]
    InvalidFormat { input: String },
    #[error("invalid coordinate {value:?}: {source}")]
    InvalidCoordinate {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// Decoding of the move string submitted by whatever UI or CLI drives the
/// system. The format is `"row,col"` with two non-negative integers; anything
/// else is rejected before it reaches game rules.
pub trait DecodeMove: Sized {
    fn decode_move(input: &str) -> DecodeResult<Self>;
}

impl DecodeMove for GridIndex {
    fn decode_move(input: &str) -> DecodeResult<Self> {
        let mut parts = input.splitn(3, ',');
        let (Some(row), Some(col), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(DecodeError::InvalidFormat {
                input: input.to_string(),
            });
        };
        Ok(GridIndex::new(parse_coord(row)?, parse_coord(col)?))
    }
}

fn parse_coord(value: &str) -> DecodeResult<usize> {
    value
        .parse::<usize>()
        .map_err(|source| DecodeError::InvalidCoordinate {
            value: value.to_string(),
            source,
        })
}
