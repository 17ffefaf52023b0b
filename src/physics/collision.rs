use rapier2d::prelude::{Group, InteractionGroups};

/// Category bit for tracked page blocks.
pub const SCENERY: u32 = 0b0001;
/// Category bit for decorative actors.
pub const ACTOR: u32 = 0b0010;
/// Category bit for the synthetic ground and ceiling.
pub const BOUNDARY: u32 = 0b0100;

/// Bitmask collision filter: a body belongs to `category` and accepts contacts from any
/// category in `mask`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CollisionFilter {
    /// Membership bits.
    pub category: u32,
    /// Accepted categories.
    pub mask: u32,
}

impl CollisionFilter {
    /// Tracked block that actors can stand on.
    pub const SCENERY: Self = Self {
        category: SCENERY,
        mask: ACTOR,
    };

    /// Tracked block scrolled out above the viewport; it stays in the world but nothing
    /// touches it.
    pub const SCENERY_PASSIVE: Self = Self {
        category: SCENERY,
        mask: 0,
    };

    /// Actor segment. Actors skip their own category so chains never self-collide.
    pub const ACTOR: Self = Self {
        category: ACTOR,
        mask: SCENERY | BOUNDARY,
    };

    /// Ground and ceiling.
    pub const BOUNDARY: Self = Self {
        category: BOUNDARY,
        mask: ACTOR,
    };

    /// Symmetric check: each side must accept the other's category.
    pub fn can_collide(&self, other: &Self) -> bool {
        (self.mask & other.category) != 0 && (other.mask & self.category) != 0
    }

    /// Whether this filter accepts actor contacts.
    pub fn accepts_actors(&self) -> bool {
        self.can_collide(&Self::ACTOR)
    }

    pub(crate) fn to_groups(self) -> InteractionGroups {
        InteractionGroups::new(
            Group::from_bits_truncate(self.category),
            Group::from_bits_truncate(self.mask),
        )
    }

    pub(crate) fn from_groups(groups: InteractionGroups) -> Self {
        Self {
            category: groups.memberships.bits(),
            mask: groups.filter.bits(),
        }
    }
}
