use std::collections::HashSet;

use crate::foundation::core::{Rect, Size, rects_overlap};
use crate::foundation::error::{FolioError, FolioResult};

use super::block::{Block, Position, QueuedBlock, Side};
use super::order::{Candidate, OrderKey, resolve_order, select};

/// Which container dimension may grow instead of bounding the layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoResize {
    /// Reserved; width is always enforced.
    Width,
    /// The height bound is not enforced and the container grows with content.
    Height,
}

/// How repeated block ids are treated on ingestion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdPolicy {
    /// Reject a block whose id is already queued.
    #[default]
    Strict,
    /// Accept duplicates; each queued block is placed on its own.
    Lenient,
}

/// Packer configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PackerOptions {
    /// Optional auto-resize mode.
    #[serde(default)]
    pub auto_resize: Option<AutoResize>,
    /// Candidate priority, drawn from `position`, `y`, `x`, `parentPosition`.
    #[serde(default)]
    pub order: Vec<String>,
    /// Number of most recent placements used as candidate sources. `None` searches all
    /// placements; smaller windows trade packing density for speed on long inputs.
    #[serde(default = "default_cache_window")]
    pub cache_window: Option<usize>,
    /// Duplicate id handling.
    #[serde(default)]
    pub id_policy: IdPolicy,
}

fn default_cache_window() -> Option<usize> {
    Some(8)
}

impl Default for PackerOptions {
    fn default() -> Self {
        Self {
            auto_resize: None,
            order: Vec::new(),
            cache_window: default_cache_window(),
            id_policy: IdPolicy::default(),
        }
    }
}

impl PackerOptions {
    /// Validate option values that cannot be recovered from.
    pub fn validate(&self) -> FolioResult<()> {
        if self.cache_window == Some(0) {
            return Err(FolioError::validation(
                "cache_window must be > 0 (use null to search every placement)",
            ));
        }
        Ok(())
    }
}

/// Greedy "next available slot" block packer.
///
/// Each instance owns its queue and results; separate instances share no state.
#[derive(Clone, Debug)]
pub struct Packer {
    width: f64,
    height: f64,
    auto_resize: Option<AutoResize>,
    order: Vec<OrderKey>,
    cache_window: Option<usize>,
    id_policy: IdPolicy,

    blocks: Vec<QueuedBlock>,
    placed: Vec<bool>,
    positions: Vec<Position>,
}

impl Packer {
    /// Create an empty packer for a `width` x `height` container.
    pub fn new(width: f64, height: f64, options: PackerOptions) -> FolioResult<Self> {
        options.validate()?;
        validate_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            auto_resize: options.auto_resize,
            order: resolve_order(&options.order),
            cache_window: options.cache_window,
            id_policy: options.id_policy,
            blocks: Vec::new(),
            placed: Vec::new(),
            positions: Vec::new(),
        })
    }

    /// Current container dimensions.
    pub fn dimensions(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Effective candidate priority.
    pub fn order(&self) -> &[OrderKey] {
        &self.order
    }

    /// Placements from the latest layout pass.
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Number of queued blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Queued blocks in declaration order, with resolved ids.
    pub fn blocks(&self) -> impl Iterator<Item = Block> + '_ {
        self.blocks
            .iter()
            .map(|q| Block::new(q.width, q.height, q.id.clone()))
    }

    /// `true` when every queued block received a placement.
    pub fn is_complete(&self) -> bool {
        self.positions.len() == self.blocks.len()
    }

    /// Bottom edge of the lowest placement; the required height in auto-resize mode.
    pub fn content_height(&self) -> f64 {
        self.positions
            .iter()
            .map(Position::bottom)
            .fold(0.0, f64::max)
    }

    /// Replace the queue and recompute the full layout.
    #[tracing::instrument(skip(self, blocks), fields(count = blocks.len()))]
    pub fn set_blocks(&mut self, blocks: &[Block]) -> FolioResult<&[Position]> {
        let queued: Vec<QueuedBlock> = blocks
            .iter()
            .enumerate()
            .map(|(i, b)| QueuedBlock::ingest(b, i))
            .collect();

        if self.id_policy == IdPolicy::Strict {
            let mut seen = HashSet::with_capacity(queued.len());
            for q in &queued {
                if !seen.insert(&q.id) {
                    return Err(FolioError::duplicate_id(q.id.clone()));
                }
            }
        }

        self.blocks = queued;
        self.relayout();
        Ok(self.positions.as_slice())
    }

    /// Append a block and place it without moving existing placements.
    ///
    /// Blocks left over from an earlier early termination are retried in the same pass.
    #[tracing::instrument(skip(self, block))]
    pub fn add_block(&mut self, block: Block) -> FolioResult<&[Position]> {
        let queued = QueuedBlock::ingest(&block, self.blocks.len());
        if self.id_policy == IdPolicy::Strict && self.blocks.iter().any(|b| b.id == queued.id) {
            return Err(FolioError::duplicate_id(queued.id));
        }
        self.blocks.push(queued);
        self.placed.push(false);
        self.place_remaining();
        Ok(self.positions.as_slice())
    }

    /// Update container bounds and recompute the full layout.
    ///
    /// Invalid bounds are rejected and leave the current layout in place.
    #[tracing::instrument(skip(self))]
    pub fn set_dimensions(&mut self, width: f64, height: f64) -> FolioResult<&[Position]> {
        validate_dimensions(width, height)?;
        self.width = width;
        self.height = height;
        self.relayout();
        Ok(self.positions.as_slice())
    }

    fn relayout(&mut self) {
        self.positions.clear();
        self.placed = vec![false; self.blocks.len()];
        self.place_remaining();
    }

    fn place_remaining(&mut self) {
        loop {
            let remaining: Vec<usize> = (0..self.blocks.len())
                .filter(|&i| !self.placed[i])
                .collect();
            let Some(&head) = remaining.first() else {
                break;
            };
            if self.blocks[head].is_malformed() {
                tracing::debug!(id = %self.blocks[head].id, "malformed block halts packing");
                break;
            }

            if self.positions.is_empty() {
                if !self.place_unanchored(head, 0.0) {
                    break;
                }
                continue;
            }

            let candidates = self.collect_candidates(&remaining);
            match select(&self.order, &candidates) {
                Some(c) => {
                    let block = &self.blocks[c.queue_idx];
                    let position = Position {
                        x: c.x,
                        y: c.y,
                        width: block.width,
                        height: block.height,
                        id: block.id.clone(),
                        source_id: Some(self.positions[c.source_idx].id.clone()),
                        parent_position: Some(c.side),
                    };
                    let idx = c.queue_idx;
                    self.commit(idx, position);
                }
                None => {
                    let y = self.content_height();
                    if !self.place_unanchored(head, y) {
                        break;
                    }
                }
            }
        }

        if !self.is_complete() {
            tracing::debug!(
                placed = self.positions.len(),
                queued = self.blocks.len(),
                "packing stopped early"
            );
        }
    }

    /// Place a block at the left edge of row `y`; `false` when it does not fit.
    fn place_unanchored(&mut self, queue_idx: usize, y: f64) -> bool {
        let block = &self.blocks[queue_idx];
        if !self.within_bounds(0.0, y, block.width, block.height) {
            return false;
        }
        let position = Position {
            x: 0.0,
            y,
            width: block.width,
            height: block.height,
            id: block.id.clone(),
            source_id: None,
            parent_position: None,
        };
        self.commit(queue_idx, position);
        true
    }

    fn commit(&mut self, queue_idx: usize, position: Position) {
        self.placed[queue_idx] = true;
        self.positions.push(position);
    }

    fn collect_candidates(&self, remaining: &[usize]) -> Vec<Candidate> {
        let start = match self.cache_window {
            Some(n) => self.positions.len().saturating_sub(n),
            None => 0,
        };

        let mut out = Vec::new();
        for source_idx in start..self.positions.len() {
            let source = &self.positions[source_idx];
            for side in [Side::Right, Side::Left, Side::Bottom] {
                for &queue_idx in remaining {
                    let block = &self.blocks[queue_idx];
                    if block.is_malformed() {
                        continue;
                    }
                    if let Some((x, y)) = self.fit(source, side, block.width, block.height) {
                        out.push(Candidate {
                            x,
                            y,
                            side,
                            position: block.position,
                            queue_idx,
                            source_idx,
                        });
                    }
                }
            }
        }
        out
    }

    /// Valid, overlap-free origin for a `w` x `h` block attached to `source` on `side`.
    fn fit(&self, source: &Position, side: Side, w: f64, h: f64) -> Option<(f64, f64)> {
        let (x, y) = match side {
            Side::Right => (source.right(), source.y),
            Side::Left => (source.x - w, source.y),
            Side::Bottom => (source.x, source.bottom()),
        };
        if !self.within_bounds(x, y, w, h) {
            return None;
        }

        match side {
            Side::Left => {
                let r = Rect::new(x, y, x + w, y + h);
                if self.positions.iter().any(|p| rects_overlap(&r, &p.rect())) {
                    return None;
                }
                Some((x, y))
            }
            Side::Right | Side::Bottom => {
                let y = self.relax_down(x, y, w, h);
                self.within_bounds(x, y, w, h).then_some((x, y))
            }
        }
    }

    /// Push `y` below every obstruction until the rectangle is clear.
    fn relax_down(&self, x: f64, mut y: f64, w: f64, h: f64) -> f64 {
        loop {
            let r = Rect::new(x, y, x + w, y + h);
            let obstruction = self
                .positions
                .iter()
                .filter(|p| rects_overlap(&r, &p.rect()))
                .map(Position::bottom)
                .fold(None, |acc: Option<f64>, b| Some(acc.map_or(b, |a| a.max(b))));
            match obstruction {
                Some(bottom) if bottom > y => y = bottom,
                _ => return y,
            }
        }
    }

    fn within_bounds(&self, x: f64, y: f64, w: f64, h: f64) -> bool {
        if x < 0.0 || x + w > self.width {
            return false;
        }
        self.auto_resize == Some(AutoResize::Height) || y + h <= self.height
    }
}

fn validate_dimensions(width: f64, height: f64) -> FolioResult<()> {
    if !width.is_finite() || width < 0.0 || !height.is_finite() || height < 0.0 {
        return Err(FolioError::validation(
            "container width/height must be finite and >= 0",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/packer/packer.rs"]
mod tests;
