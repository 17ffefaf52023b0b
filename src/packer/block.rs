use std::fmt;

use crate::foundation::core::Rect;

/// Identity of a block within one packing run.
///
/// Serialized untagged, so both `3` and `"hero"` are accepted.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum BlockId {
    /// Numeric id (also used for blocks that arrive without one).
    Index(u64),
    /// Free-form string id.
    Name(String),
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Name(s) => f.write_str(s),
        }
    }
}

impl From<u64> for BlockId {
    fn from(value: u64) -> Self {
        Self::Index(value)
    }
}

impl From<&str> for BlockId {
    fn from(value: &str) -> Self {
        Self::Name(value.to_string())
    }
}

impl From<String> for BlockId {
    fn from(value: String) -> Self {
        Self::Name(value)
    }
}

/// A rectangle awaiting placement.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Block {
    /// Width in layout units. Zero or missing width halts packing.
    #[serde(default)]
    pub width: f64,
    /// Height in layout units.
    #[serde(default)]
    pub height: f64,
    /// Optional identity; the declaration index is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BlockId>,
}

impl Block {
    /// Block with an explicit id.
    pub fn new(width: f64, height: f64, id: impl Into<BlockId>) -> Self {
        Self {
            width,
            height,
            id: Some(id.into()),
        }
    }

    /// Block that takes its declaration index as id.
    pub fn anonymous(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            id: None,
        }
    }
}

/// Block after ingestion: identity resolved and declaration order fixed.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct QueuedBlock {
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) position: usize,
    pub(crate) id: BlockId,
}

impl QueuedBlock {
    pub(crate) fn ingest(block: &Block, position: usize) -> Self {
        Self {
            width: block.width,
            height: block.height,
            position,
            id: block
                .id
                .clone()
                .unwrap_or(BlockId::Index(position as u64)),
        }
    }

    /// Malformed blocks terminate packing when they reach the head of the queue.
    pub(crate) fn is_malformed(&self) -> bool {
        !self.width.is_finite()
            || self.width <= 0.0
            || !self.height.is_finite()
            || self.height < 0.0
    }
}

/// Side of the source placement a candidate was attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Attached to the source's right edge, same top.
    Right,
    /// Attached to the source's left edge, same top.
    Left,
    /// Attached below the source, same left edge.
    Bottom,
}

impl Side {
    /// Priority rank used by the `parentPosition` order key.
    pub fn rank(self) -> u8 {
        match self {
            Self::Right => 1,
            Self::Bottom => 2,
            Self::Left => 3,
        }
    }
}

/// A placed block.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Placed width.
    pub width: f64,
    /// Placed height.
    pub height: f64,
    /// Id of the placed block.
    pub id: BlockId,
    /// Id of the placement this one was anchored against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<BlockId>,
    /// Which side of the source this placement was derived from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_position: Option<Side>,
}

impl Position {
    /// Placement as a rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}
