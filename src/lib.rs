//! Folio lays out portfolio blocks and keeps their on-page elements in a small physics
//! simulation.
//!
//! - [`Packer`] places axis-aligned blocks into a bounded container, greedily, in
//!   declaration order.
//! - [`PhysicsBridge`] mirrors tracked page elements as rigid bodies and writes each
//!   body's displacement back as a CSS transform. The page is reached through the
//!   [`Host`] and [`BlockElement`] traits.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod packer;
pub(crate) mod physics;

pub use crate::foundation::core::{Insets, Point, Rect, Size, Vec2};
pub use crate::foundation::debounce::Debouncer;
pub use crate::foundation::error::{FolioError, FolioResult};

pub use crate::packer::block::{Block, BlockId, Position, Side};
pub use crate::packer::order::{DEFAULT_ORDER, OrderKey, resolve_order};
pub use crate::packer::packer::{AutoResize, IdPolicy, Packer, PackerOptions};

pub use crate::physics::actor::{Actor, ActorId, Direction, Locomotion};
pub use crate::physics::bridge::{FrameStats, PhysicsBlock, PhysicsBridge};
pub use crate::physics::collision::{ACTOR, BOUNDARY, CollisionFilter, SCENERY};
pub use crate::physics::config::{ActorConfig, BridgeConfig, DEFAULT_BLOCK_TYPES};
pub use crate::physics::element::{BlockElement, BlockPatch, ElementTransform, Host};
