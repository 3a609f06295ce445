// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

use crate::api::error::PixieError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of bits reserved for the node kind in a packed id
const KIND_BITS: u32 = 8;

const KIND_MASK: i64 = (1 << KIND_BITS) - 1;

/// Maximum value representable in the 56 signed bits left over for the
/// node value (2^55 - 1)
pub const MAX_NODE_VALUE: i64 = (1 << 55) - 1;

/// Minimum value representable in the 56 signed bits (-2^55)
pub const MIN_NODE_VALUE: i64 = -(1 << 55);

/// Partition label of a vertex. The graph is bipartite over these.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[repr(u8)]
pub enum NodeKind {
    Tag = 0,
    Post = 1,
}

impl NodeKind {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for NodeKind {
    type Error = PixieError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            0 => Ok(NodeKind::Tag),
            1 => Ok(NodeKind::Post),
            other => Err(PixieError::decode(format!("unknown node kind {other}"))),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Tag => write!(f, "tag"),
            NodeKind::Post => write!(f, "post"),
        }
    }
}

/// Typed node identifier: a 56-bit signed value tagged with its kind.
///
/// Packs into a single `i64` as `(value << 8) | kind`, which is the format
/// the centrality routine addresses nodes by.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Id {
    value: i64,
    kind: NodeKind,
}

impl Id {
    /// Creates a new id.
    ///
    /// # Panics
    ///
    /// Panics if `value` does not fit in 56 signed bits. Out-of-range values
    /// would silently corrupt the kind byte when packed.
    pub fn new(kind: NodeKind, value: i64) -> Self {
        assert!(
            (MIN_NODE_VALUE..=MAX_NODE_VALUE).contains(&value),
            "node value {value} outside the packable range"
        );
        Self { value, kind }
    }

    pub fn post(value: i64) -> Self {
        Self::new(NodeKind::Post, value)
    }

    pub fn tag(value: i64) -> Self {
        Self::new(NodeKind::Tag, value)
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Packs the id into an `i64`.
    pub fn to_i64(self) -> i64 {
        (self.value << KIND_BITS) | self.kind.as_u8() as i64
    }

    /// Unpacks an id produced by [`Id::to_i64`]. The arithmetic shift
    /// preserves negative values.
    ///
    /// # Errors
    ///
    /// Returns a decode error if the kind byte is not a known [`NodeKind`].
    pub fn from_i64(packed: i64) -> Result<Self, PixieError> {
        let kind = NodeKind::try_from((packed & KIND_MASK) as u8)?;
        Ok(Self {
            value: packed >> KIND_BITS,
            kind,
        })
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({}:{})", self.kind, self.value)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.value)
    }
}
