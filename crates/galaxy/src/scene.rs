//! Scene registry and per-frame driver
//!
//! Entities live in one generational arena. Two orderings index into it:
//! the primary draw/update order and the asteroid grid (rows of keys). An
//! update pass never mutates either ordering; removals are queued and
//! compacted after the pass, and explosions spawned by the pass are appended
//! once it is over.

use galaxy_engine::assets::TextureCache;
use galaxy_engine::foundation::collections::{RemovalQueue, SlotMap};
use galaxy_engine::foundation::math::{heading_from_direction, try_normalize, Vec2};
use galaxy_engine::render::{
    Camera2D, Geometry, GeometryKind, Material, Mesh, RenderBackend, RenderResult, ShaderKind, ShaderLibrary,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{AssetConfig, GameplayConfig};
use crate::entity::motion::AvatarDrive;
use crate::entity::{AsteroidState, Capabilities, Entity, EntityKey, EntityKind, Transform};
use crate::session::SimulationContext;

/// Avatar spawn point
pub const AVATAR_START: Vec2 = Vec2::new(0.0, -0.75);
/// Where the scripted enemies enter
pub const ENEMY_START: Vec2 = Vec2::new(-1.2, 0.9);
/// Gravity well position
pub const BLACK_HOLE_POSITION: Vec2 = Vec2::new(0.0, 0.4);
/// Forward shots leave this far above the avatar
pub const PROJECTILE_OFFSET: Vec2 = Vec2::new(0.0, 0.1);
/// Aimed shots leave this far along their direction
pub const FIREBALL_OFFSET: f32 = 0.1;
/// Fireball sprite heading when travelling straight up
pub const FIREBALL_BASE_HEADING: f32 = 60.0;

const ORB_SHEET_DIM: i32 = 5;
const BOOM_SHEET_DIM: i32 = 6;

/// GPU resources shared by every entity
#[derive(Debug)]
struct SceneResources {
    shaders: ShaderLibrary,
    quad: Geometry,
    textures: TextureCache,
}

/// The entity registry and frame driver
#[derive(Debug)]
pub struct Scene {
    entities: SlotMap<EntityKey, Entity>,
    order: Vec<EntityKey>,
    grid: Vec<Vec<EntityKey>>,
    resources: Option<SceneResources>,
    avatar: Option<EntityKey>,
    black_hole: Option<EntityKey>,
    rng: StdRng,
    assets: AssetConfig,
    gameplay: GameplayConfig,
    explosions_spawned: u64,
}

impl Scene {
    /// Empty scene; nothing can be spawned until [`Scene::initialize`]
    pub fn new(assets: AssetConfig, gameplay: GameplayConfig) -> Self {
        let seed = gameplay.seed.unwrap_or_else(wall_clock_seed);
        log::debug!("Scene RNG seed {}", seed);
        if !gameplay.dramatic_exit_chance.is_finite() {
            log::warn!("dramatic_exit_chance {} is not a number; asteroids will not exit", gameplay.dramatic_exit_chance);
        }
        Self {
            entities: SlotMap::with_key(),
            order: Vec::new(),
            grid: Vec::new(),
            resources: None,
            avatar: None,
            black_hole: None,
            rng: StdRng::seed_from_u64(seed),
            assets,
            gameplay,
            explosions_spawned: 0,
        }
    }

    /// Compile shaders, load textures and build the opening layout
    ///
    /// Shader failures are returned; missing textures are logged and the
    /// affected sprites fall back to their flat color.
    pub fn initialize(&mut self, backend: &mut dyn RenderBackend) -> RenderResult<()> {
        let shaders = ShaderLibrary::compile(backend)?;
        let quad = Geometry::create(backend, GeometryKind::TexturedQuad)?;

        let mut textures = TextureCache::new(&self.assets.texture_dir);
        for name in self.texture_names() {
            textures.load(backend, &name);
        }
        self.resources = Some(SceneResources { shaders, quad, textures });

        let spaceship = self.assets.spaceship.clone();
        self.avatar = self.spawn_sprite(
            EntityKind::Avatar(AvatarDrive::default()),
            Transform::new(AVATAR_START, 0.8, 180.0),
            &spaceship,
            None,
        );

        let orb = self.assets.orb.clone();
        self.spawn_sprite(EntityKind::Heart, Transform::new(ENEMY_START, 0.2, 0.0), &orb, Some(ORB_SHEET_DIM));
        let rocket = self.assets.rocket.clone();
        self.spawn_sprite(EntityKind::Egg, Transform::new(ENEMY_START, 0.3, 0.0), &rocket, None);
        let fish = self.assets.fish.clone();
        self.spawn_sprite(
            EntityKind::Seeker { target: self.avatar },
            Transform::new(ENEMY_START, 0.2, 270.0),
            &fish,
            None,
        );

        self.build_asteroid_grid();
        log::info!(
            "Scene initialized: {} entities, {} asteroids",
            self.order.len(),
            self.asteroid_count()
        );
        Ok(())
    }

    fn texture_names(&self) -> Vec<String> {
        let a = &self.assets;
        let mut names = vec![
            a.spaceship.clone(),
            a.orb.clone(),
            a.rocket.clone(),
            a.fish.clone(),
            a.bullet.clone(),
            a.fireball.clone(),
            a.boom.clone(),
            a.black_hole.clone(),
        ];
        names.extend(a.asteroids.iter().cloned());
        names
    }

    fn build_asteroid_grid(&mut self) {
        let dim = self.gameplay.grid_size;
        let origin = Vec2::from(self.gameplay.grid_origin);
        let spacing = self.gameplay.grid_spacing;
        let variants = self.assets.asteroids.len();

        self.grid = Vec::with_capacity(dim);
        for i in 0..dim {
            let mut row = Vec::with_capacity(dim);
            for j in 0..dim {
                let variant = if variants == 0 { None } else { Some(self.rng.gen_range(0..variants)) };
                let angle = f32::from(self.rng.gen_range(0_u16..360));
                let texture = variant.map(|v| self.assets.asteroids[v].clone()).unwrap_or_default();
                let position = origin + Vec2::new(j as f32 * spacing, i as f32 * spacing);
                let entity = self.sprite(
                    EntityKind::Asteroid(AsteroidState::default()),
                    Transform::new(position, 0.2, angle),
                    &texture,
                    None,
                );
                if let Some(entity) = entity {
                    row.push(self.entities.insert(entity));
                }
            }
            self.grid.push(row);
        }
    }

    /// Build an entity using the shared quad and a cached texture
    fn sprite(&self, kind: EntityKind, transform: Transform, texture: &str, sheet_dim: Option<i32>) -> Option<Entity> {
        let Some(resources) = &self.resources else {
            log::warn!("Cannot spawn {} before the scene is initialized", kind.name());
            return None;
        };
        let texture = resources.textures.get(texture);
        let (material, shader) = match sheet_dim {
            Some(dim) => (Material::animated(texture, dim), ShaderKind::Animated),
            None => (Material::textured(texture), ShaderKind::Textured),
        };
        Some(Entity::new(kind, transform, Mesh::new(resources.quad, material), shader))
    }

    fn spawn_sprite(
        &mut self,
        kind: EntityKind,
        transform: Transform,
        texture: &str,
        sheet_dim: Option<i32>,
    ) -> Option<EntityKey> {
        self.sprite(kind, transform, texture, sheet_dim).map(|entity| self.spawn(entity))
    }

    /// Append an entity to the primary order
    pub fn spawn(&mut self, entity: Entity) -> EntityKey {
        log::trace!("Spawning {} at {:?}", entity.kind.name(), entity.position());
        let key = self.entities.insert(entity);
        self.order.push(key);
        key
    }

    /// Fire a forward shot from the avatar
    pub fn spawn_projectile(&mut self) -> Option<EntityKey> {
        let origin = self.avatar_position()? + PROJECTILE_OFFSET;
        let bullet = self.assets.bullet.clone();
        self.spawn_sprite(EntityKind::Projectile { origin }, Transform::new(origin, 0.4, 0.0), &bullet, None)
    }

    /// Fire an aimed shot from the avatar towards a world-space point
    pub fn spawn_fireball(&mut self, target: Vec2) -> Option<EntityKey> {
        let avatar = self.avatar_position()?;
        let direction = try_normalize(&(target - avatar))?;
        let origin = avatar + direction * FIREBALL_OFFSET;
        let orientation = heading_from_direction(&direction, FIREBALL_BASE_HEADING).unwrap_or(FIREBALL_BASE_HEADING);
        let fireball = self.assets.fireball.clone();
        self.spawn_sprite(
            EntityKind::Fireball { origin, direction },
            Transform::new(origin, 0.4, orientation),
            &fireball,
            None,
        )
    }

    /// Append an explosion at `position`, started at scene time `elapsed`
    pub fn explode(&mut self, position: Vec2, elapsed: f32) -> Option<EntityKey> {
        let boom = self.assets.boom.clone();
        let key = self.spawn_sprite(
            EntityKind::Explosion { spawned_at: elapsed },
            Transform::new(position, 0.4, 0.0),
            &boom,
            Some(BOOM_SHEET_DIM),
        );
        if key.is_some() {
            self.explosions_spawned += 1;
            log::debug!("Explosion at ({:.2}, {:.2})", position.x, position.y);
        }
        key
    }

    /// Draw the asteroid grid, then the primary order
    pub fn draw(&self, backend: &mut dyn RenderBackend, camera: &Camera2D) -> RenderResult<()> {
        let Some(resources) = &self.resources else {
            return Ok(());
        };
        let view = camera.view_matrix();
        for key in self.grid.iter().flatten().chain(self.order.iter()) {
            if let Some(entity) = self.entities.get(*key) {
                entity.draw(backend, &resources.shaders, &view)?;
            }
        }
        Ok(())
    }

    /// Broadcast the scene clock to every entity in the primary order
    pub fn set_time(&self, backend: &mut dyn RenderBackend, time: f32) {
        let Some(resources) = &self.resources else {
            return;
        };
        for key in &self.order {
            if let Some(entity) = self.entities.get(*key) {
                entity.set_time(backend, &resources.shaders, time);
            }
        }
    }

    /// Move, collide and retire entities for one frame
    pub fn update(&mut self, ctx: &SimulationContext<'_>) {
        let mut removals = RemovalQueue::new();
        let mut explosions = Vec::new();

        let order = self.order.clone();
        for key in order {
            let target = match self.entities.get(key).map(|entity| entity.kind) {
                Some(EntityKind::Seeker { target }) => target.and_then(|t| self.entities.get(t)).map(Entity::position),
                Some(_) => None,
                None => continue,
            };

            let Some(entity) = self.entities.get_mut(key) else { continue };
            entity.advance(ctx, target);
            if entity.capabilities().contains(Capabilities::INITIATES_COLLISION) {
                self.collide(key);
            }

            let Some(entity) = self.entities.get_mut(key) else { continue };
            if entity.should_be_deleted() {
                if entity.is_enemy() {
                    explosions.push(entity.position());
                }
                log::debug!("Removing {}", entity.kind.name());
                removals.mark(key);
            } else if entity.done_exploding(ctx.elapsed) {
                removals.mark(key);
            }
        }

        for key in self.grid.iter().flatten() {
            let Some(entity) = self.entities.get_mut(*key) else { continue };
            entity.advance(ctx, None);
            entity.dramatic_exit();
            if entity.should_be_deleted() {
                if entity.is_enemy() {
                    explosions.push(entity.position());
                }
                removals.mark(*key);
            }
        }

        // Targets hit after their own turn in this pass.
        for key in self.order.iter().chain(self.grid.iter().flatten()) {
            if removals.contains(*key) {
                continue;
            }
            if let Some(entity) = self.entities.get(*key).filter(|entity| entity.is_deleted()) {
                if entity.is_enemy() {
                    explosions.push(entity.position());
                }
                removals.mark(*key);
            }
        }

        if !removals.is_empty() {
            let mut orders: Vec<&mut Vec<EntityKey>> = std::iter::once(&mut self.order)
                .chain(self.grid.iter_mut())
                .collect();
            let removed = removals.apply(&mut self.entities, &mut orders);
            log::trace!("Compacted {} entities", removed.len());
        }

        for position in explosions {
            self.explode(position, ctx.elapsed);
        }
    }

    /// Hit-test every other entity against the shot at `aggressor`
    fn collide(&mut self, aggressor: EntityKey) {
        let Some(position) = self.entities.get(aggressor).map(Entity::position) else {
            return;
        };

        let mut hits = 0;
        for key in self.order.iter().chain(self.grid.iter().flatten()) {
            if *key == aggressor {
                continue;
            }
            if let Some(target) = self.entities.get_mut(*key) {
                if target.hit_by_projectile(&position) {
                    log::debug!("{} hit at ({:.2}, {:.2})", target.kind.name(), position.x, position.y);
                    hits += 1;
                }
            }
        }

        if hits > 0 {
            if let Some(shot) = self.entities.get_mut(aggressor) {
                shot.target_hit();
            }
        }
    }

    /// Roll each asteroid for the start of its dramatic exit
    pub fn asteroid_disappear(&mut self) {
        let chance = self.gameplay.exit_probability();
        for key in self.grid.iter().flatten() {
            if self.rng.gen_bool(chance) {
                if let Some(entity) = self.entities.get_mut(*key) {
                    entity.set_dramatic();
                }
            }
        }
    }

    /// Place the gravity well; does nothing if one is already placed
    pub fn place_black_hole(&mut self) -> Option<EntityKey> {
        if self.black_hole.is_some() {
            return self.black_hole;
        }
        let texture = self.assets.black_hole.clone();
        self.black_hole =
            self.spawn_sprite(EntityKind::BlackHole, Transform::new(BLACK_HOLE_POSITION, 0.5, 0.0), &texture, None);
        if self.black_hole.is_some() {
            log::info!("Black hole placed");
        }
        self.black_hole
    }

    /// Remove the gravity well
    pub fn remove_black_hole(&mut self) {
        let entities = &self.entities;
        let (wells, rest): (Vec<EntityKey>, Vec<EntityKey>) = self
            .order
            .iter()
            .copied()
            .partition(|key| entities.get(*key).is_some_and(Entity::is_black_hole));
        for key in wells {
            self.entities.remove(key);
        }
        self.order = rest;
        if self.black_hole.take().is_some() {
            log::info!("Black hole removed");
        }
    }

    /// Place the gravity well if absent, otherwise remove it
    pub fn toggle_black_hole(&mut self) {
        if self.black_hole.is_some() {
            self.remove_black_hole();
        } else {
            self.place_black_hole();
        }
    }

    /// Position of the gravity well, if placed
    pub fn gravity_well(&self) -> Option<Vec2> {
        self.black_hole.and_then(|key| self.entities.get(key)).map(Entity::position)
    }

    /// The player ship
    pub fn avatar(&self) -> Option<&Entity> {
        self.avatar.and_then(|key| self.entities.get(key))
    }

    fn avatar_position(&self) -> Option<Vec2> {
        let position = self.avatar().map(Entity::position);
        if position.is_none() {
            log::warn!("No avatar to fire from");
        }
        position
    }

    /// Look up an entity
    pub fn get(&self, key: EntityKey) -> Option<&Entity> {
        self.entities.get(key)
    }

    /// Look up an entity for modification
    pub fn get_mut(&mut self, key: EntityKey) -> Option<&mut Entity> {
        self.entities.get_mut(key)
    }

    /// Entities in primary order
    pub fn entities(&self) -> impl Iterator<Item = (EntityKey, &Entity)> + '_ {
        self.order.iter().filter_map(|key| self.entities.get(*key).map(|entity| (*key, entity)))
    }

    /// Asteroids in row-major grid order
    pub fn asteroids(&self) -> impl Iterator<Item = (EntityKey, &Entity)> + '_ {
        self.grid
            .iter()
            .flatten()
            .filter_map(|key| self.entities.get(*key).map(|entity| (*key, entity)))
    }

    /// Number of entities in the primary order
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the primary order is empty
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of asteroids left in the grid
    pub fn asteroid_count(&self) -> usize {
        self.grid.iter().map(Vec::len).sum()
    }

    /// Live entities across both orderings
    pub fn total_entities(&self) -> usize {
        self.entities.len()
    }

    /// Explosions spawned since the scene was created
    pub fn explosions_spawned(&self) -> u64 {
        self.explosions_spawned
    }
}

fn wall_clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_engine::input::InputState;
    use galaxy_engine::render::HeadlessBackend;

    fn seeded_scene(seed: u64) -> (Scene, HeadlessBackend) {
        let gameplay = GameplayConfig { seed: Some(seed), ..GameplayConfig::default() };
        let mut scene = Scene::new(AssetConfig::default(), gameplay);
        let mut backend = HeadlessBackend::new();
        scene.initialize(&mut backend).unwrap();
        (scene, backend)
    }

    #[test]
    fn test_initial_layout() {
        let (scene, _) = seeded_scene(1);
        let kinds: Vec<&str> = scene.entities().map(|(_, e)| e.kind.name()).collect();
        assert_eq!(kinds, ["avatar", "heart", "egg", "seeker"]);
        assert_eq!(scene.asteroid_count(), 36);
        assert_eq!(scene.avatar().unwrap().position(), AVATAR_START);

        let first = scene.asteroids().next().unwrap().1;
        assert_eq!(first.position(), Vec2::new(-0.75, -0.4));
    }

    #[test]
    fn test_spawn_before_initialize_is_refused() {
        let mut scene = Scene::new(AssetConfig::default(), GameplayConfig::default());
        assert!(scene.spawn_projectile().is_none());
        assert!(scene.place_black_hole().is_none());
        assert!(scene.is_empty());
    }

    #[test]
    fn test_non_finite_exit_chance_never_triggers() {
        let gameplay = GameplayConfig { seed: Some(9), dramatic_exit_chance: f64::NAN, ..GameplayConfig::default() };
        let mut scene = Scene::new(AssetConfig::default(), gameplay);
        scene.initialize(&mut HeadlessBackend::new()).unwrap();
        for _ in 0..10 {
            scene.asteroid_disappear();
        }
        assert!(scene
            .asteroids()
            .all(|(_, e)| matches!(e.kind, EntityKind::Asteroid(AsteroidState { dramatic: false, .. }))));
    }

    #[test]
    fn test_black_hole_toggle() {
        let (mut scene, _) = seeded_scene(2);
        scene.toggle_black_hole();
        assert_eq!(scene.gravity_well(), Some(BLACK_HOLE_POSITION));
        assert_eq!(scene.len(), 5);
        assert_eq!(scene.place_black_hole(), scene.place_black_hole());
        assert_eq!(scene.len(), 5);

        scene.toggle_black_hole();
        assert_eq!(scene.gravity_well(), None);
        assert_eq!(scene.len(), 4);
        assert_eq!(scene.total_entities(), 4 + 36);
    }

    #[test]
    fn test_draw_order_grid_first() {
        let (scene, mut backend) = seeded_scene(3);
        scene.draw(&mut backend, &Camera2D::default()).unwrap();
        let calls = backend.draw_calls();
        assert_eq!(calls.len(), 36 + 4);

        let asteroid_matrix = scene.asteroids().next().unwrap().1.transform.matrix(&Camera2D::default().view_matrix());
        assert_eq!(calls[0].transform, Some(asteroid_matrix));
        assert!(calls.iter().all(|call| call.blend && call.vertex_count == 4));
    }

    #[test]
    fn test_fireball_heading() {
        let (mut scene, _) = seeded_scene(4);
        let key = scene.spawn_fireball(AVATAR_START + Vec2::new(-1.0, 0.0)).unwrap();
        let fireball = scene.get(key).unwrap();
        assert!((fireball.transform.orientation - 150.0).abs() < 1e-3);
        assert!((fireball.position() - (AVATAR_START + Vec2::new(-0.1, 0.0))).norm() < 1e-6);

        assert!(scene.spawn_fireball(AVATAR_START).is_none());
    }

    #[test]
    fn test_update_keeps_orderings_consistent() {
        let (mut scene, _) = seeded_scene(5);
        let input = InputState::default();
        for frame in 0..120 {
            if frame % 10 == 0 {
                scene.spawn_projectile();
            }
            let ctx = SimulationContext::new(1.0 / 60.0, frame as f32 / 30.0, scene.gravity_well(), &input);
            scene.update(&ctx);
            assert_eq!(scene.total_entities(), scene.len() + scene.asteroid_count());
            assert!(scene.entities().all(|(_, e)| !e.is_deleted()));
        }
    }
}
