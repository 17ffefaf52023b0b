use std::cmp::Ordering;

use super::block::Side;

/// Property used to rank valid placement candidates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OrderKey {
    /// Declaration order of the candidate's block.
    #[serde(rename = "position")]
    Position,
    /// Candidate top edge.
    #[serde(rename = "y")]
    Y,
    /// Candidate left edge.
    #[serde(rename = "x")]
    X,
    /// Side rank: right, then bottom, then left.
    #[serde(rename = "parentPosition")]
    ParentPosition,
}

/// Default priority: declaration order, vertical position, side rank, horizontal position.
pub const DEFAULT_ORDER: [OrderKey; 4] = [
    OrderKey::Position,
    OrderKey::Y,
    OrderKey::ParentPosition,
    OrderKey::X,
];

impl OrderKey {
    /// Parse a configured key name. Both `parentPosition` and `parent_position` are accepted.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "position" => Some(Self::Position),
            "y" => Some(Self::Y),
            "x" => Some(Self::X),
            "parentPosition" | "parent_position" => Some(Self::ParentPosition),
            _ => None,
        }
    }

    fn compare(self, a: &Candidate, b: &Candidate) -> Ordering {
        match self {
            Self::Position => a.position.cmp(&b.position),
            Self::Y => a.y.total_cmp(&b.y),
            Self::X => a.x.total_cmp(&b.x),
            Self::ParentPosition => a.side.rank().cmp(&b.side.rank()),
        }
    }
}

/// Resolve configured key names. Unknown names are reported and skipped; duplicates are
/// dropped. An empty result yields [`DEFAULT_ORDER`].
pub fn resolve_order(names: &[String]) -> Vec<OrderKey> {
    let mut keys = Vec::with_capacity(names.len());
    for name in names {
        match OrderKey::parse(name) {
            Some(key) if !keys.contains(&key) => keys.push(key),
            Some(_) => {}
            None => tracing::warn!(key = %name, "ignoring unknown packer order key"),
        }
    }
    if keys.is_empty() {
        return DEFAULT_ORDER.to_vec();
    }
    keys
}

/// A validated, overlap-free placement option.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Candidate {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) side: Side,
    /// Declaration order of the block this candidate would place.
    pub(crate) position: usize,
    /// Index into the packer queue.
    pub(crate) queue_idx: usize,
    /// Index of the source placement.
    pub(crate) source_idx: usize,
}

/// Compare two candidates key by key; `Equal` means generation order decides.
pub(crate) fn compare_candidates(order: &[OrderKey], a: &Candidate, b: &Candidate) -> Ordering {
    order
        .iter()
        .map(|key| key.compare(a, b))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// First candidate that no later candidate beats.
pub(crate) fn select<'a>(order: &[OrderKey], candidates: &'a [Candidate]) -> Option<&'a Candidate> {
    let mut best: Option<&Candidate> = None;
    for c in candidates {
        match best {
            Some(b) if compare_candidates(order, c, b).is_lt() => best = Some(c),
            None => best = Some(c),
            Some(_) => {}
        }
    }
    best
}

#[cfg(test)]
#[path = "../../tests/unit/packer/order.rs"]
mod tests;
