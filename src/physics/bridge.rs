use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::time::Instant;

use crate::foundation::core::{Point, Rect, Size, Vec2, content_box, rects_overlap};
use crate::foundation::debounce::Debouncer;
use crate::foundation::error::{FolioError, FolioResult};

use super::actor::{Actor, ActorId, Direction};
use super::collision::CollisionFilter;
use super::config::{ActorConfig, BridgeConfig};
use super::element::{BlockElement, BlockPatch, ElementTransform, Host};
use super::world::{BodyHandles, BoxDesc, SimWorld};

/// A tracked page element and its simulated body.
#[derive(Debug)]
pub struct PhysicsBlock {
    id: String,
    rect: Rect,
    element: Weak<dyn BlockElement>,
    handles: BodyHandles,
    active: bool,
    transform: ElementTransform,
    written: Option<String>,
}

impl PhysicsBlock {
    /// Element id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Content box in page coordinates.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Whether the body is in the simulation (not culled).
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Last computed transform.
    pub fn transform(&self) -> ElementTransform {
        self.transform
    }

    /// Where the body rests, in viewport coordinates.
    fn anchor(&self, scroll: Vec2) -> Point {
        self.rect.center() - scroll
    }

    fn element(&self) -> Option<Rc<dyn BlockElement>> {
        self.element.upgrade().filter(|el| el.has_parent())
    }
}

/// Per-frame summary returned by [`PhysicsBridge::animation_frame`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct FrameStats {
    /// Blocks tracked after the frame.
    pub tracked: usize,
    /// Blocks simulated this frame.
    pub active: usize,
    /// Blocks registered by a scan during the frame.
    pub registered: usize,
    /// Blocks untracked because their element went away.
    pub dropped: usize,
    /// Blocks taken out of the simulation this frame.
    pub culled: usize,
    /// Blocks put back into the simulation this frame.
    pub restored: usize,
    /// Transforms written to elements.
    pub written: usize,
    /// Whether a debounced resize resync ran.
    pub resynced: bool,
}

fn box_desc(config: &BridgeConfig, center: Point, size: Size) -> BoxDesc {
    BoxDesc {
        center,
        size,
        density: config.block_density,
        damping: config.block_damping,
        filter: CollisionFilter::SCENERY,
    }
}

#[derive(Clone, Copy, Debug)]
struct Boundaries {
    ground: BodyHandles,
    ceiling: BodyHandles,
}

/// Keeps one rigid body per tracked page element in sync with layout and scroll, and
/// writes each body's displacement back as a visual transform.
pub struct PhysicsBridge<H: Host> {
    host: H,
    config: BridgeConfig,
    world: SimWorld,
    blocks: BTreeMap<String, PhysicsBlock>,
    boundaries: Option<Boundaries>,
    actors: BTreeMap<ActorId, Actor>,
    next_actor: u64,
    scroll: Vec2,
    viewport: Size,
    mutation: Debouncer,
    resize: Debouncer,
    running: bool,
}

impl<H: Host> PhysicsBridge<H> {
    /// Build an idle bridge; call [`start`](Self::start) to begin tracking.
    pub fn new(host: H, config: BridgeConfig) -> FolioResult<Self> {
        config.validate()?;
        let world = SimWorld::new(
            Vec2::new(0.0, config.gravity),
            config.timestep_s,
            config.pixels_per_meter,
        );
        let scroll = host.scroll_offset();
        let viewport = host.viewport_size();
        Ok(Self {
            mutation: Debouncer::new(config.mutation_debounce()),
            resize: Debouncer::new(config.resize_debounce()),
            host,
            config,
            world,
            blocks: BTreeMap::new(),
            boundaries: None,
            actors: BTreeMap::new(),
            next_actor: 0,
            scroll,
            viewport,
            running: false,
        })
    }

    /// Configuration in effect.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Injected host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Whether `start` has run and `dispose` has not.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Last observed scroll offset.
    pub fn scroll(&self) -> Vec2 {
        self.scroll
    }

    /// Last observed viewport size.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Create the ground and ceiling and scan the host for blocks. Idempotent.
    #[tracing::instrument(skip(self))]
    pub fn start(&mut self) -> FolioResult<()> {
        if self.running {
            return Ok(());
        }
        self.scroll = self.host.scroll_offset();
        self.viewport = self.host.viewport_size();
        self.ensure_boundaries()?;
        self.running = true;
        let registered = self.scan();
        tracing::debug!(registered, "bridge started");
        Ok(())
    }

    /// Tear down page state after a route change. Actors and boundaries survive; the
    /// next scan is scheduled through the mutation debouncer.
    pub fn on_navigate(&mut self, now: Instant) {
        let count = self.blocks.len();
        self.clear_blocks();
        self.mutation.cancel();
        self.resize.cancel();
        if self.running {
            self.scroll = self.host.scroll_offset();
            self.mutation.schedule(now);
        }
        tracing::debug!(cleared = count, "navigation teardown");
    }

    /// Release every body and stop. The bridge can be started again.
    pub fn dispose(&mut self) {
        self.clear_blocks();
        for (_, actor) in std::mem::take(&mut self.actors) {
            actor.remove(&mut self.world);
        }
        if let Some(b) = self.boundaries.take() {
            self.world.remove_body(b.ground.body);
            self.world.remove_body(b.ceiling.body);
        }
        self.mutation.cancel();
        self.resize.cancel();
        self.running = false;
    }

    fn clear_blocks(&mut self) {
        for (_, block) in std::mem::take(&mut self.blocks) {
            self.world.remove_body(block.handles.body);
        }
    }

    /// Track `element`, or resync it when already tracked. Returns whether a new block
    /// was registered.
    pub fn add_block(&mut self, element: &Rc<dyn BlockElement>) -> FolioResult<bool> {
        let id = element.id();
        if id.is_empty() {
            tracing::warn!("skipping block element without an id");
            return Ok(false);
        }
        if !element.has_parent() {
            tracing::warn!(%id, "skipping detached block element");
            return Ok(false);
        }
        let rect = self.extract_rect(&**element)?;

        if let Some(block) = self.blocks.get_mut(&id) {
            block.rect = rect;
            block.element = Rc::downgrade(element);
            Self::rebuild_body(&mut self.world, &self.config, self.scroll, block);
            return Ok(false);
        }

        let desc = box_desc(&self.config, rect.center() - self.scroll, rect.size());
        let handles = self.world.insert_floating_box(desc);
        tracing::debug!(
            %id,
            x = rect.x0,
            y = rect.y0,
            w = rect.width(),
            h = rect.height(),
            "tracking block"
        );
        self.blocks.insert(
            id.clone(),
            PhysicsBlock {
                id,
                rect,
                element: Rc::downgrade(element),
                handles,
                active: true,
                transform: ElementTransform::default(),
                written: None,
            },
        );
        Ok(true)
    }

    /// Apply a partial geometry update (page coordinates). The body is replaced by one
    /// sized to the new rect. Returns `false` for unknown ids.
    pub fn update_block(&mut self, id: &str, patch: BlockPatch) -> bool {
        let Some(block) = self.blocks.get_mut(id) else {
            tracing::warn!(%id, "update for untracked block");
            return false;
        };
        block.rect = patch.apply(block.rect);
        Self::rebuild_body(&mut self.world, &self.config, self.scroll, block);
        true
    }

    fn rebuild_body(
        world: &mut SimWorld,
        config: &BridgeConfig,
        scroll: Vec2,
        block: &mut PhysicsBlock,
    ) {
        world.remove_body(block.handles.body);
        let desc = box_desc(config, block.anchor(scroll), block.rect.size());
        block.handles = world.insert_floating_box(desc);
        if !block.active {
            world.set_enabled(block.handles.body, false);
        }
    }

    /// Content box of `element` in page coordinates.
    fn extract_rect(&self, element: &dyn BlockElement) -> FolioResult<Rect> {
        let border = element.bounding_client_rect();
        if ![border.x0, border.y0, border.x1, border.y1]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(FolioError::validation(format!(
                "block '{}' has a non-finite bounding rect",
                element.id()
            )));
        }
        Ok(content_box(border, element.padding()) + self.scroll)
    }

    /// Re-read scroll. Anchors move with the page; bodies catch up through correction.
    pub fn on_scroll(&mut self) {
        self.scroll = self.host.scroll_offset();
        self.refresh_filters();
    }

    /// Schedule a debounced resync of every block and the boundaries.
    pub fn on_resize(&mut self, now: Instant) {
        self.resize.schedule(now);
    }

    /// Schedule a debounced scan for new blocks.
    pub fn on_mutation(&mut self, now: Instant) {
        self.mutation.schedule(now);
    }

    /// Register every qualifying, untracked element the host reports. Returns how many
    /// blocks were added.
    pub fn scan(&mut self) -> usize {
        let mut registered = 0;
        for element in self.host.query_blocks() {
            let qualifies = element
                .block_type()
                .is_some_and(|t| self.config.block_types.iter().any(|b| *b == t));
            if !qualifies || self.blocks.contains_key(&element.id()) {
                continue;
            }
            match self.add_block(&element) {
                Ok(true) => {
                    element.add_class(&self.config.tracked_class);
                    registered += 1;
                }
                Ok(false) => {}
                Err(err) => tracing::warn!(%err, "skipping block"),
            }
        }
        registered
    }

    fn resync(&mut self) -> FolioResult<()> {
        self.scroll = self.host.scroll_offset();
        self.viewport = self.host.viewport_size();
        let ids: Vec<String> = self.blocks.keys().cloned().collect();
        for id in ids {
            let element = self.blocks.get(&id).and_then(PhysicsBlock::element);
            if let Some(element) = element {
                if let Err(err) = self.add_block(&element) {
                    tracing::warn!(%id, %err, "resync failed");
                }
            }
        }
        self.ensure_boundaries()
    }

    fn ensure_boundaries(&mut self) -> FolioResult<()> {
        let vw = self.viewport.width;
        let vh = self.viewport.height;
        if !(vw.is_finite() && vh.is_finite() && vw >= 0.0 && vh >= 0.0) {
            return Err(FolioError::physics(format!(
                "invalid viewport {vw}x{vh}"
            )));
        }
        let t = self.config.boundary_thickness;
        let size = Size::new(vw.max(1.0), t);
        let ground_center = Point::new(vw * 0.5, vh + t * 0.5 - self.config.ground_inset);
        let ceiling_center = Point::new(vw * 0.5, self.config.ceiling_y);

        match self.boundaries {
            Some(b) => {
                self.world.reshape_fixed_box(b.ground, ground_center, size);
                self.world.reshape_fixed_box(b.ceiling, ceiling_center, size);
            }
            None => {
                let desc = |center| BoxDesc {
                    center,
                    size,
                    density: 1.0,
                    damping: 0.0,
                    filter: CollisionFilter::BOUNDARY,
                };
                let ground = self.world.insert_fixed_box(desc(ground_center));
                let ceiling = self.world.insert_fixed_box(desc(ceiling_center));
                self.boundaries = Some(Boundaries { ground, ceiling });
            }
        }
        Ok(())
    }

    /// Blocks fully above the viewport stop accepting actor contacts.
    fn refresh_filters(&mut self) {
        for block in self.blocks.values() {
            let filter = if block.rect.y1 <= self.scroll.y {
                CollisionFilter::SCENERY_PASSIVE
            } else {
                CollisionFilter::SCENERY
            };
            self.world.set_filter(block.handles.collider, filter);
        }
    }

    /// Page-space region kept in the simulation.
    fn live_region(&self) -> Rect {
        let m = self.config.cull_margin_px;
        Rect::new(
            self.scroll.x - m,
            self.scroll.y - m,
            self.scroll.x + self.viewport.width + m,
            self.scroll.y + self.viewport.height + m,
        )
    }

    /// Advance one frame: debounced work, culling, correction, actors, step, transforms.
    #[tracing::instrument(skip(self, now))]
    pub fn animation_frame(&mut self, now: Instant) -> FrameStats {
        let mut stats = FrameStats::default();
        if !self.running {
            return stats;
        }

        if self.resize.fire_if_due(now) {
            if let Err(err) = self.resync() {
                tracing::warn!(%err, "resize resync failed");
            }
            stats.resynced = true;
        }
        if self.mutation.fire_if_due(now) {
            stats.registered = self.scan();
        }

        stats.dropped = self.drop_dead_blocks();
        let (culled, restored) = self.cull();
        stats.culled = culled;
        stats.restored = restored;
        self.refresh_filters();
        self.correct_toward_anchors();
        self.update_actors(now);
        self.world.step();
        stats.written = self.write_transforms();

        stats.tracked = self.blocks.len();
        stats.active = self.blocks.values().filter(|b| b.active).count();
        stats
    }

    fn drop_dead_blocks(&mut self) -> usize {
        let dead: Vec<String> = self
            .blocks
            .values()
            .filter(|b| b.element().is_none())
            .map(|b| b.id.clone())
            .collect();
        for id in &dead {
            if let Some(block) = self.blocks.remove(id) {
                self.world.remove_body(block.handles.body);
                tracing::debug!(%id, "untracking block with dropped element");
            }
        }
        dead.len()
    }

    fn cull(&mut self) -> (usize, usize) {
        let region = self.live_region();
        let scroll = self.scroll;
        let (mut culled, mut restored) = (0, 0);
        for block in self.blocks.values_mut() {
            let inside =
                rects_overlap(&region, &block.rect) || region.contains(block.rect.origin());
            match (block.active, inside) {
                (true, false) => {
                    self.world.set_enabled(block.handles.body, false);
                    block.active = false;
                    block.transform = ElementTransform::default();
                    culled += 1;
                    tracing::debug!(id = %block.id, "culling block");
                }
                (false, true) => {
                    self.world.set_enabled(block.handles.body, true);
                    self.world.teleport(block.handles.body, block.anchor(scroll));
                    block.active = true;
                    restored += 1;
                    tracing::debug!(id = %block.id, "restoring block");
                }
                _ => {}
            }
        }
        (culled, restored)
    }

    /// Steer each active body toward its anchor. Velocity is proportional to the
    /// remaining offset; `validate` keeps `correction_rate * timestep_s <= 1`, so a step
    /// never carries a body past its anchor.
    fn correct_toward_anchors(&mut self) {
        let rate = self.config.correction_rate;
        for block in self.blocks.values().filter(|b| b.active) {
            let Some((pos, angle)) = self.world.position(block.handles.body) else {
                continue;
            };
            let desired = (block.anchor(self.scroll) - pos) * rate;
            self.world.set_velocity(block.handles.body, desired, -angle * rate);
        }
    }

    fn write_transforms(&mut self) -> usize {
        let scroll = self.scroll;
        let precision = self.config.transform_precision;
        let mut written = 0;
        for block in self.blocks.values_mut() {
            if block.active {
                if let Some((pos, angle)) = self.world.position(block.handles.body) {
                    block.transform = ElementTransform {
                        translate: pos - block.anchor(scroll),
                        rotation_rad: angle,
                    }
                    .rounded(precision);
                }
            }
            let css = block.transform.to_css();
            if block.written.as_deref() == Some(css.as_str()) {
                continue;
            }
            if let Some(element) = block.element.upgrade() {
                element.set_transform(&css);
                block.written = Some(css);
                written += 1;
            }
        }
        written
    }

    /// Ground and ceiling boxes in viewport coordinates, once started.
    pub fn boundaries(&self) -> Option<(Rect, Rect)> {
        let b = self.boundaries?;
        Some((self.world.box_rect(b.ground)?, self.world.box_rect(b.ceiling)?))
    }

    /// Tracked block by element id.
    pub fn block(&self, id: &str) -> Option<&PhysicsBlock> {
        self.blocks.get(id)
    }

    /// Tracked blocks, ordered by id.
    pub fn blocks(&self) -> impl Iterator<Item = &PhysicsBlock> {
        self.blocks.values()
    }

    /// Last transform computed for `id`.
    pub fn transform(&self, id: &str) -> Option<ElementTransform> {
        self.blocks.get(id).map(|b| b.transform)
    }

    /// Current collision filter of the body tracking `id`.
    pub fn collision_filter(&self, id: &str) -> Option<CollisionFilter> {
        self.world.filter(self.blocks.get(id)?.handles.collider)
    }

    /// Whether `id` is tracked and not culled.
    pub fn is_active(&self, id: &str) -> bool {
        self.blocks.get(id).is_some_and(|b| b.active)
    }

    /// Add a decorative actor with its head at `origin` (viewport coordinates).
    pub fn spawn_actor(&mut self, config: ActorConfig, origin: Point) -> FolioResult<ActorId> {
        let actor = Actor::spawn(&mut self.world, config, origin)?;
        let id = ActorId(self.next_actor);
        self.next_actor += 1;
        self.actors.insert(id, actor);
        tracing::debug!(?id, x = origin.x, y = origin.y, "spawned actor");
        Ok(id)
    }

    /// Request a walking direction; `None` stops. Returns `false` for unknown actors.
    pub fn walk_actor(&mut self, id: ActorId, direction: Option<Direction>) -> bool {
        match self.actors.get_mut(&id) {
            Some(actor) => {
                actor.set_direction(direction);
                true
            }
            None => {
                tracing::warn!(?id, "walk request for unknown actor");
                false
            }
        }
    }

    /// Actor by handle.
    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    /// Remove an actor and its joints.
    pub fn remove_actor(&mut self, id: ActorId) -> bool {
        match self.actors.remove(&id) {
            Some(actor) => {
                actor.remove(&mut self.world);
                true
            }
            None => false,
        }
    }

    fn update_actors(&mut self, now: Instant) {
        let ids: Vec<ActorId> = self.actors.keys().copied().collect();
        for id in ids {
            let supported = self
                .actors
                .get(&id)
                .is_some_and(|actor| self.is_supported(actor));
            if let Some(actor) = self.actors.get_mut(&id) {
                actor.update(&mut self.world, now, supported);
            }
        }
    }

    /// Whether any segment is within contact tolerance of something it may collide with.
    fn is_supported(&self, actor: &Actor) -> bool {
        let tolerance = actor.config().contact_tolerance;
        let scenery = self
            .blocks
            .values()
            .filter(|b| b.active)
            .map(|b| b.handles.collider);
        let boundaries = self
            .boundaries
            .iter()
            .flat_map(|b| [b.ground.collider, b.ceiling.collider]);
        let candidates: Vec<_> = scenery.chain(boundaries).collect();

        actor.segments().iter().any(|seg| {
            let Some(seg_filter) = self.world.filter(seg.collider) else {
                return false;
            };
            candidates.iter().any(|&other| {
                self.world
                    .filter(other)
                    .is_some_and(|f| seg_filter.can_collide(&f))
                    && self
                        .world
                        .distance(seg.collider, other)
                        .is_some_and(|d| d <= tolerance)
            })
        })
    }
}

impl<H: Host> std::fmt::Debug for PhysicsBridge<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhysicsBridge")
            .field("running", &self.running)
            .field("blocks", &self.blocks.len())
            .field("actors", &self.actors.len())
            .field("scroll", &self.scroll)
            .field("viewport", &self.viewport)
            .finish()
    }
}
