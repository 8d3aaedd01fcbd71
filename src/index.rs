// Copyright 2024 ndview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Index modes and resolution of a single index against a dimension.
use std::fmt;
use std::str::FromStr;

use num_integer::Integer;

use crate::error::{from_kind, ErrorKind, ShapeError};
use crate::Ixs;

/// How an out-of-range index is treated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum IndexMode {
    /// Out of range indices are an error.
    #[default]
    Throw,
    /// Clamp to the nearest valid index.
    Clamp,
    /// Wrap around modulo the dimension length.
    Wrap,
    /// Negative indices count from the end; anything still out of range is
    /// an error.
    Normalize,
}

impl IndexMode {
    pub fn as_str(self) -> &'static str {
        match self {
            IndexMode::Throw => "throw",
            IndexMode::Clamp => "clamp",
            IndexMode::Wrap => "wrap",
            IndexMode::Normalize => "normalize",
        }
    }

    /// Enumeration constant used by the binary meta data format.
    pub fn code(self) -> i8 {
        match self {
            IndexMode::Throw => 1,
            IndexMode::Clamp => 2,
            IndexMode::Wrap => 3,
            IndexMode::Normalize => 4,
        }
    }

    pub fn from_code(code: i8) -> Option<IndexMode> {
        match code {
            1 => Some(IndexMode::Throw),
            2 => Some(IndexMode::Clamp),
            3 => Some(IndexMode::Wrap),
            4 => Some(IndexMode::Normalize),
            _ => None,
        }
    }
}

impl fmt::Display for IndexMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndexMode {
    type Err = ShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "throw" => Ok(IndexMode::Throw),
            "clamp" => Ok(IndexMode::Clamp),
            "wrap" => Ok(IndexMode::Wrap),
            "normalize" => Ok(IndexMode::Normalize),
            _ => Err(from_kind(ErrorKind::UnknownName)),
        }
    }
}

/// Clamp `idx` into `0..=max`.
#[inline]
pub fn clamp_index(idx: Ixs, max: Ixs) -> Ixs {
    idx.clamp(0, max.max(0))
}

/// Wrap `idx` into `0..=max` modulo `max + 1`.
#[inline]
pub fn wrap_index(idx: Ixs, max: Ixs) -> Ixs {
    idx.mod_floor(&(max + 1))
}

/// Normalize a possibly negative `idx` against the largest valid index
/// `max`. Returns `None` if the result is still out of range.
#[inline]
pub fn normalize_index(idx: Ixs, max: Ixs) -> Option<Ixs> {
    let i = if idx < 0 { idx + max + 1 } else { idx };
    if i < 0 || i > max {
        None
    } else {
        Some(i)
    }
}

/// Resolve `idx` against the largest valid index `max` using `mode`.
///
/// An empty range (`max < 0`) accepts no index in any mode.
///
/// **Errors** with `IndexOutOfBounds` if the index cannot be resolved.
pub fn resolve_index(idx: Ixs, max: Ixs, mode: IndexMode) -> Result<Ixs, ShapeError> {
    if max < 0 {
        return Err(from_kind(ErrorKind::IndexOutOfBounds));
    }
    match mode {
        IndexMode::Clamp => Ok(clamp_index(idx, max)),
        IndexMode::Wrap => Ok(wrap_index(idx, max)),
        IndexMode::Normalize => {
            normalize_index(idx, max).ok_or_else(|| from_kind(ErrorKind::IndexOutOfBounds))
        }
        IndexMode::Throw => {
            if idx < 0 || idx > max {
                Err(from_kind(ErrorKind::IndexOutOfBounds))
            } else {
                Ok(idx)
            }
        }
    }
}

/// Pick the mode for dimension `axis` from a list of per-dimension modes,
/// cycling when the list is shorter than the rank. An empty list means
/// `fallback`.
#[inline]
pub fn submode_for(submodes: &[IndexMode], axis: usize, fallback: IndexMode) -> IndexMode {
    if submodes.is_empty() {
        fallback
    } else {
        submodes[axis % submodes.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_and_wrap() {
        assert_eq!(clamp_index(-1, 10), 0);
        assert_eq!(clamp_index(15, 10), 10);
        assert_eq!(clamp_index(4, 10), 4);
        assert_eq!(wrap_index(-1, 10), 10);
        assert_eq!(wrap_index(13, 10), 2);
        assert_eq!(wrap_index(-12, 10), 10);
    }

    #[test]
    fn resolve_modes() {
        assert_eq!(resolve_index(-1, 9, IndexMode::Normalize), Ok(9));
        assert!(resolve_index(-11, 9, IndexMode::Normalize).is_err());
        assert!(resolve_index(10, 9, IndexMode::Throw).is_err());
        assert_eq!(resolve_index(9, 9, IndexMode::Throw), Ok(9));
        assert_eq!(resolve_index(10, 9, IndexMode::Wrap), Ok(0));
        assert_eq!(resolve_index(10, 9, IndexMode::Clamp), Ok(9));
        assert!(resolve_index(0, -1, IndexMode::Wrap).is_err());
    }

    #[test]
    fn submodes_cycle() {
        let modes = [IndexMode::Wrap, IndexMode::Clamp];
        assert_eq!(submode_for(&modes, 0, IndexMode::Throw), IndexMode::Wrap);
        assert_eq!(submode_for(&modes, 3, IndexMode::Throw), IndexMode::Clamp);
        assert_eq!(submode_for(&[], 3, IndexMode::Normalize), IndexMode::Normalize);
    }

    #[test]
    fn mode_names() {
        assert_eq!("wrap".parse::<IndexMode>().unwrap(), IndexMode::Wrap);
        assert_eq!(IndexMode::from_code(IndexMode::Clamp.code()), Some(IndexMode::Clamp));
        assert_eq!("bounce".parse::<IndexMode>().map_err(|e| e.kind()),
                   Err(ErrorKind::UnknownName));
    }
}
