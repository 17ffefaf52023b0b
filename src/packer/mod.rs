//! Greedy "next available slot" block packer.
//!
//! Blocks are placed one at a time. Each step derives right, left and bottom candidates
//! from recent placements, relaxes obstructed candidates downward, and picks one by the
//! configured order keys. With no candidate left, a new row is started below the
//! lowest placement.

pub(crate) mod block;
pub(crate) mod order;
#[allow(clippy::module_inception)]
pub(crate) mod packer;
