//! One simulation frame
//!
//! Frame order: timed spawners, then one update over a snapshot of the
//! then-live entity set, then removal reconciliation, then the elimination
//! check. Drawing is a separate read-only pass over the reconciled
//! registry, so nothing is ever drawn mid-removal.

use glam::Vec2;

use crate::audio::SoundEffect;
use crate::consts::{BONUS_DELAY_MAX, BONUS_DELAY_MIN};
use crate::input::InputSnapshot;
use crate::render::{Assets, Surface};
use crate::settings::ArenaConfig;
use crate::sim::SimError;
use crate::sim::block::Block;
use crate::sim::effects::{Bonus, BonusKind};
use crate::sim::entity::{Entity, EntityId, EntityKind};
use crate::sim::registry::Registry;
use crate::sim::state::{GamePhase, GameState};
use rand::Rng;
use rand_pcg::Pcg32;

/// Damage delivered to one entity
#[derive(Debug, Clone, Copy)]
pub struct Hit {
    pub amount: i32,
    /// Rank of the attacking tank at impact. Bullet hits always carry it;
    /// armor blocks refuse to resolve without it.
    pub attacker_rank: Option<u8>,
}

/// Everything an entity may touch during its update. The entity itself is
/// lifted out of the registry for the duration, so scans through
/// `registry` never find the updating entity.
pub struct TickCtx<'a> {
    pub registry: &'a mut Registry,
    pub input: &'a InputSnapshot,
    pub config: &'a ArenaConfig,
    pub assets: &'a Assets,
    pub rng: &'a mut Pcg32,
    pub audio: &'a mut Vec<SoundEffect>,
}

impl TickCtx<'_> {
    /// Request removal at end of pass; idempotent
    pub fn remove(&mut self, id: EntityId) {
        self.registry.mark_removed(id);
    }

    /// Queue a sound effect for the shell
    pub fn play(&mut self, effect: SoundEffect) {
        self.audio.push(effect);
    }

    /// Route a hit to its target. A stale target id (already gone) is
    /// quietly ignored; explosions and bonuses never take damage.
    pub fn deal_damage(&mut self, target: EntityId, hit: Hit) -> Result<(), SimError> {
        let Some((slot, mut entity)) = self.registry.take_by_id(target) else {
            return Ok(());
        };
        let result = match &mut entity {
            Entity::Tank(tank) => tank.apply_damage(&hit, self),
            Entity::Bullet(bullet) => {
                if bullet.apply_damage(hit.amount) {
                    self.remove(bullet.id);
                }
                Ok(())
            }
            Entity::Block(block) => {
                self.play(SoundEffect::BlockHit);
                if block.apply_damage(&hit) {
                    self.remove(block.id);
                }
                Ok(())
            }
            Entity::Explosion(_) | Entity::Bonus(_) => Ok(()),
        };
        self.registry.put_back(slot, entity);
        result
    }
}

/// Advance the game by one fixed tick
pub fn tick(state: &mut GameState, input: &InputSnapshot) -> Result<(), SimError> {
    if matches!(state.phase, GamePhase::GameOver { .. }) {
        return Ok(());
    }
    state.time_ticks += 1;

    spawn_timed_entities(state)?;

    let GameState {
        registry,
        config,
        assets,
        rng,
        audio_events,
        ..
    } = state;

    // Snapshot the slot count: entities appended mid-pass are visible to
    // collision scans but wait for the next pass to update.
    let pass_len = registry.slot_count();
    for i in 0..pass_len {
        let Some(mut entity) = registry.take_slot(i) else {
            continue;
        };
        if registry.is_marked(entity.id()) {
            // Removed earlier in this pass; do not revisit
            registry.put_back(i, entity);
            continue;
        }
        let mut ctx = TickCtx {
            registry: &mut *registry,
            input,
            config: &*config,
            assets: &*assets,
            rng: &mut *rng,
            audio: &mut *audio_events,
        };
        let result = entity.update(&mut ctx);
        registry.put_back(i, entity);
        result?;
    }

    let removed = state.registry.reconcile();
    if removed > 0 {
        log::trace!("tick {}: reconciled {} removals", state.time_ticks, removed);
    }

    finish_round_if_decided(state);
    Ok(())
}

/// Draw every live entity in insertion order. Runs strictly after
/// reconciliation, so only survivors are drawn.
pub fn draw(state: &GameState, surface: &mut dyn Surface) {
    for entity in state.registry.iter() {
        entity.draw(surface);
    }
}

/// Bonus drops on a randomized timer; the block replacement cycle tops the
/// arena back up to its configured block count.
fn spawn_timed_entities(state: &mut GameState) -> Result<(), SimError> {
    if state.bonus_timer > 0 {
        state.bonus_timer -= 1;
    } else {
        let kind = match state.rng.random_range(0..3) {
            0 => BonusKind::RankUp,
            1 => BonusKind::ExtraLife,
            _ => BonusKind::Heal,
        };
        let config = &state.config;
        let x = state.rng.random_range(50.0..config.screen_width - 50.0);
        let y = state
            .rng
            .random_range(config.reserved_band() + 16.0..config.screen_height - 16.0);
        let id = state.registry.allocate_id();
        state.registry.add(Entity::Bonus(Bonus::new(
            id,
            Vec2::new(x, y),
            kind,
            config.cell_size,
            &state.assets,
        )));
        state.bonus_timer = state.rng.random_range(BONUS_DELAY_MIN..=BONUS_DELAY_MAX);
        log::debug!("spawned {:?} bonus at ({:.0}, {:.0})", kind, x, y);
    }

    if state.block_timer > 0 {
        state.block_timer -= 1;
    } else {
        state.block_timer = state.config.block_cycle_ticks;
        if state.registry.count_kind(EntityKind::Block) < state.config.block_count {
            Block::spawn_non_colliding(
                &mut state.registry,
                &state.config,
                &mut state.rng,
                &state.assets,
            )?;
        }
    }
    Ok(())
}

/// A tank with no lives left ends the round; the surviving color wins.
/// Both falling in the same frame is a draw.
fn finish_round_if_decided(state: &mut GameState) {
    let mut survivors = Vec::new();
    let mut eliminated = 0;
    for tank in state.registry.tanks() {
        if tank.lives < 1 {
            eliminated += 1;
        } else {
            survivors.push(tank.color);
        }
    }
    if eliminated > 0 {
        let winner = (survivors.len() == 1).then(|| survivors[0]);
        state.phase = GamePhase::GameOver { winner };
        match winner {
            Some(color) => log::info!("round over after {} ticks: {} wins", state.time_ticks, color.label()),
            None => log::info!("round over after {} ticks: draw", state.time_ticks),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{BASE_SHOOT_COOLDOWN, BULLET_SPEED};
    use crate::input::Key;
    use crate::render::NullSurface;
    use crate::sim::block::BlockKind;
    use crate::sim::effects::Explosion;
    use crate::sim::entity::Facing;
    use crate::sim::rect::Rect;
    use crate::sim::tank::Tank;

    fn arena(block_count: usize) -> GameState {
        let config = ArenaConfig {
            block_count,
            ..Default::default()
        };
        GameState::new(config, Assets::placeholder(), 42).unwrap()
    }

    fn tank_ids(state: &GameState) -> (EntityId, EntityId) {
        let ids: Vec<_> = state.tanks().map(|t| t.id).collect();
        (ids[0], ids[1])
    }

    fn tank(state: &GameState, id: EntityId) -> &Tank {
        match state.registry.get(id) {
            Some(Entity::Tank(t)) => t,
            _ => panic!("tank {id} missing"),
        }
    }

    fn tank_mut(state: &mut GameState, id: EntityId) -> &mut Tank {
        match state.registry.get_mut(id) {
            Some(Entity::Tank(t)) => t,
            _ => panic!("tank {id} missing"),
        }
    }

    fn add_block(state: &mut GameState, kind: BlockKind, x: f32, y: f32) -> EntityId {
        let id = state.registry.allocate_id();
        let bounds = Rect::new(x, y, 32.0, 32.0);
        let block = Block::new(id, kind, bounds, &state.assets);
        state.registry.add(Entity::Block(block))
    }

    fn add_bullet(state: &mut GameState, owner: EntityId, pos: Vec2, vel: Vec2) -> EntityId {
        let id = state.registry.allocate_id();
        let bullet = crate::sim::bullet::Bullet::new(id, owner, pos, vel, 1);
        state.registry.add(Entity::Bullet(bullet))
    }

    fn input_with(keys: &[Key]) -> InputSnapshot {
        let mut input = InputSnapshot::new();
        for &key in keys {
            input.press(key);
        }
        input
    }

    fn count(state: &GameState, kind: EntityKind) -> usize {
        state.registry.count_kind(kind)
    }

    #[test]
    fn test_bullet_spawns_at_center_and_exits_silently() {
        // Spec scenario: 800x602 arena, tank at (80, 300) firing up
        let mut state = arena(0);
        let (red, _) = tank_ids(&state);
        tank_mut(&mut state, red).bounds = Rect::new(80.0, 300.0, 32.0, 32.0);

        tick(&mut state, &input_with(&[Key::Space])).unwrap();
        let bullet = state
            .registry
            .iter()
            .find_map(|e| match e {
                Entity::Bullet(b) => Some(b.clone()),
                _ => None,
            })
            .expect("bullet fired");
        assert_eq!(bullet.pos, Vec2::new(96.0, 316.0));
        assert_eq!(bullet.vel, Vec2::new(0.0, -BULLET_SPEED));
        assert_eq!(bullet.damage, 1);

        // Fly until it leaves the top edge; no obstruction, no explosion
        let idle = InputSnapshot::new();
        for _ in 0..700 {
            tick(&mut state, &idle).unwrap();
            assert_eq!(count(&state, EntityKind::Explosion), 0);
            if count(&state, EntityKind::Bullet) == 0 {
                return;
            }
        }
        panic!("bullet never left the arena");
    }

    #[test]
    fn test_bullet_destroys_brick_block() {
        let mut state = arena(0);
        let (red, _) = tank_ids(&state);
        tank_mut(&mut state, red).bounds = Rect::new(80.0, 300.0, 32.0, 32.0);
        let block = add_block(&mut state, BlockKind::Brick, 80.0, 264.0);

        tick(&mut state, &input_with(&[Key::Space])).unwrap();
        let idle = InputSnapshot::new();
        for _ in 0..20 {
            tick(&mut state, &idle).unwrap();
            if !state.registry.is_live(block) {
                // Same-tick consequences: bullet gone, explosion in place
                assert_eq!(count(&state, EntityKind::Bullet), 0);
                assert_eq!(count(&state, EntityKind::Explosion), 1);
                assert!(state
                    .drain_audio()
                    .contains(&SoundEffect::BlockHit));
                return;
            }
        }
        panic!("block never destroyed");
    }

    #[test]
    fn test_armor_block_shrugs_off_rank_zero() {
        let mut state = arena(0);
        let (red, _) = tank_ids(&state);
        tank_mut(&mut state, red).bounds = Rect::new(80.0, 300.0, 32.0, 32.0);
        let block = add_block(&mut state, BlockKind::Armor, 80.0, 264.0);

        tick(&mut state, &input_with(&[Key::Space])).unwrap();
        let idle = InputSnapshot::new();
        for _ in 0..20 {
            tick(&mut state, &idle).unwrap();
            if count(&state, EntityKind::Bullet) == 0 {
                // Bullet died on impact, block did not care
                assert!(state.registry.is_live(block));
                assert_eq!(count(&state, EntityKind::Explosion), 1);
                return;
            }
        }
        panic!("bullet never hit");
    }

    #[test]
    fn test_movement_priority_left_wins() {
        let mut state = arena(0);
        let (red, _) = tank_ids(&state);
        let before = tank(&state, red).bounds;
        tick(&mut state, &input_with(&[Key::A, Key::W])).unwrap();
        let after = tank(&state, red);
        assert_eq!(after.bounds.x, before.x - 2.0);
        assert_eq!(after.bounds.y, before.y);
        assert_eq!(after.facing, Facing::Left);
    }

    #[test]
    fn test_blocked_move_reverts_keeps_facing() {
        let mut state = arena(0);
        let (red, _) = tank_ids(&state);
        tank_mut(&mut state, red).bounds = Rect::new(80.0, 300.0, 32.0, 32.0);
        add_block(&mut state, BlockKind::Brick, 112.0, 300.0);

        tick(&mut state, &input_with(&[Key::D])).unwrap();
        let t = tank(&state, red);
        assert_eq!(t.bounds.top_left(), Vec2::new(80.0, 300.0));
        assert_eq!(t.facing, Facing::Right);
    }

    #[test]
    fn test_reserved_band_is_a_wall() {
        let mut state = arena(0);
        let (red, _) = tank_ids(&state);
        tank_mut(&mut state, red).bounds = Rect::new(80.0, 64.0, 32.0, 32.0);
        tick(&mut state, &input_with(&[Key::W])).unwrap();
        let t = tank(&state, red);
        assert_eq!(t.bounds.y, 64.0);
        assert_eq!(t.facing, Facing::Up);
    }

    #[test]
    fn test_shoot_cooldown_limits_fire_rate() {
        let mut state = arena(0);
        let input = input_with(&[Key::Space]);
        tick(&mut state, &input).unwrap();
        tick(&mut state, &input).unwrap();
        // Held trigger, one bullet: the cooldown is armed
        assert_eq!(count(&state, EntityKind::Bullet), 1);
        let (red, _) = tank_ids(&state);
        assert_eq!(tank(&state, red).shoot_timer, BASE_SHOOT_COOLDOWN - 2);
    }

    #[test]
    fn test_destroyed_tank_resets_with_base_stats() {
        let mut state = arena(0);
        let (red, blue) = tank_ids(&state);
        {
            let t = tank_mut(&mut state, red);
            t.bounds = Rect::new(80.0, 300.0, 32.0, 32.0);
            t.hit_points = 1;
            t.rank = 2;
            t.speed = 2.6;
        }
        add_bullet(&mut state, blue, Vec2::new(96.0, 290.0), Vec2::new(0.0, 5.0));

        let idle = InputSnapshot::new();
        tick(&mut state, &idle).unwrap();
        tick(&mut state, &idle).unwrap();

        let t = tank(&state, red).clone();
        assert_eq!(t.hit_points, state.config.hit_points);
        assert_eq!(t.rank, 0);
        assert_eq!(t.speed, state.config.speed);
        assert_eq!(t.shoot_delay, BASE_SHOOT_COOLDOWN);
        assert_eq!(t.lives, state.config.lives - 1);
        // Landed on a free grid cell
        assert_eq!(t.bounds.x % 32.0, 0.0);
        assert_eq!(t.bounds.y % 32.0, 0.0);
        assert!(t.bounds.y >= state.config.reserved_band());
        assert!(state
            .registry
            .iter()
            .filter(|e| e.id() != red && e.blocks_movement())
            .all(|e| !e.bounds().intersects(&t.bounds)));
    }

    #[test]
    fn test_elimination_ends_round() {
        let mut state = arena(0);
        let (red, blue) = tank_ids(&state);
        {
            let t = tank_mut(&mut state, red);
            t.bounds = Rect::new(80.0, 300.0, 32.0, 32.0);
            t.hit_points = 1;
            t.lives = 1;
        }
        add_bullet(&mut state, blue, Vec2::new(96.0, 290.0), Vec2::new(0.0, 5.0));

        let idle = InputSnapshot::new();
        tick(&mut state, &idle).unwrap();
        tick(&mut state, &idle).unwrap();
        assert_eq!(
            state.phase,
            GamePhase::GameOver {
                winner: Some(crate::sim::tank::TankColor::Blue)
            }
        );

        // Round is over; further ticks are no-ops
        let ticks = state.time_ticks;
        tick(&mut state, &idle).unwrap();
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_bullets_destroy_each_other() {
        let mut state = arena(0);
        let (red, blue) = tank_ids(&state);
        let a = add_bullet(&mut state, red, Vec2::new(300.0, 400.0), Vec2::new(5.0, 0.0));
        let b = add_bullet(&mut state, blue, Vec2::new(340.0, 400.0), Vec2::new(-5.0, 0.0));

        let idle = InputSnapshot::new();
        for _ in 0..10 {
            tick(&mut state, &idle).unwrap();
            if !state.registry.is_live(a) || !state.registry.is_live(b) {
                // Mutual destruction lands in one frame
                assert!(!state.registry.is_live(a));
                assert!(!state.registry.is_live(b));
                return;
            }
        }
        panic!("bullets never met");
    }

    #[test]
    fn test_bonus_pickup_is_exclusive() {
        let mut state = arena(0);
        let (red, blue) = tank_ids(&state);
        tank_mut(&mut state, red).bounds = Rect::new(80.0, 300.0, 32.0, 32.0);
        tank_mut(&mut state, blue).bounds = Rect::new(112.0, 300.0, 32.0, 32.0);
        let id = state.registry.allocate_id();
        // Overlaps both tanks at once
        let bonus = Bonus::new(
            id,
            Vec2::new(112.0, 316.0),
            BonusKind::ExtraLife,
            32.0,
            &state.assets,
        );
        state.registry.add(Entity::Bonus(bonus));

        tick(&mut state, &InputSnapshot::new()).unwrap();
        assert!(!state.registry.is_live(id));
        let lives: Vec<_> = state.tanks().map(|t| t.lives).collect();
        assert_eq!(lives, vec![state.config.lives + 1, state.config.lives]);
        assert!(state.drain_audio().contains(&SoundEffect::BonusCollected));
    }

    #[test]
    fn test_bonus_expires_unclaimed() {
        let mut state = arena(0);
        let id = state.registry.allocate_id();
        let bonus = Bonus::new(
            id,
            Vec2::new(400.0, 500.0),
            BonusKind::Heal,
            32.0,
            &state.assets,
        );
        state.registry.add(Entity::Bonus(bonus));

        let idle = InputSnapshot::new();
        for _ in 0..399 {
            tick(&mut state, &idle).unwrap();
        }
        assert!(state.registry.is_live(id));
        tick(&mut state, &idle).unwrap();
        assert!(!state.registry.is_live(id));
    }

    #[test]
    fn test_explosion_burns_out() {
        let mut state = arena(0);
        let id = state.registry.allocate_id();
        let explosion = Explosion::new(id, Vec2::new(400.0, 400.0), 32.0, &state.assets);
        state.registry.add(Entity::Explosion(explosion));

        let idle = InputSnapshot::new();
        for _ in 0..9 {
            tick(&mut state, &idle).unwrap();
        }
        // 9 ticks in, the animation is still short of its last frame
        assert!(state.registry.is_live(id));
        tick(&mut state, &idle).unwrap();
        tick(&mut state, &idle).unwrap();
        assert!(!state.registry.is_live(id));
    }

    #[test]
    fn test_block_cycle_replaces_losses() {
        let mut state = arena(3);
        // Knock one block out directly
        let block = state
            .registry
            .iter()
            .find(|e| e.kind() == EntityKind::Block)
            .map(|e| e.id())
            .unwrap();
        state.registry.mark_removed(block);
        state.registry.reconcile();
        assert_eq!(count(&state, EntityKind::Block), 2);

        let idle = InputSnapshot::new();
        for _ in 0..=state.config.block_cycle_ticks {
            tick(&mut state, &idle).unwrap();
        }
        assert_eq!(count(&state, EntityKind::Block), 3);
    }

    #[test]
    fn test_determinism() {
        let mut a = arena(30);
        let mut b = arena(30);
        let inputs = [
            input_with(&[Key::D, Key::Space]),
            input_with(&[Key::W]),
            input_with(&[Key::Left, Key::Return]),
            InputSnapshot::new(),
        ];
        for _ in 0..200 {
            for input in &inputs {
                tick(&mut a, input).unwrap();
                tick(&mut b, input).unwrap();
            }
        }
        assert_eq!(a.time_ticks, b.time_ticks);
        let bounds = |s: &GameState| -> Vec<Rect> { s.registry.iter().map(|e| e.bounds()).collect() };
        assert_eq!(bounds(&a), bounds(&b));
    }

    #[test]
    fn test_draw_covers_every_live_entity() {
        let mut state = arena(5);
        let mut surface = NullSurface::default();
        tick(&mut state, &InputSnapshot::new()).unwrap();
        draw(&state, &mut surface);
        // 2 tanks + 5 blocks blit; bullets would be circles
        assert_eq!(surface.blits + surface.circles, state.registry.iter().count());
    }
}
