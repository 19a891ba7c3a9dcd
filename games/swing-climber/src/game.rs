use swing_engine::{
    ActionState, EngineContext, Game, GameConfig, GameEvent, InputQueue, KeyValueStore,
    MemoryStore, SensorOverlap, SoundEvent,
};

use crate::camera::CameraTracker;
use crate::config::ClimberConfig;
use crate::holds::HoldField;
use crate::palette::HoldPalette;
use crate::rig::PlayerRig;
use crate::score::Scoreboard;
use crate::swing::{has_fallen, Catch, SwingController};

/// Sound IDs the shell maps to audio clips.
pub mod sounds {
    pub const JUMP: u32 = 1;
    pub const CATCH: u32 = 2;
    pub const MUSIC: u32 = 3;
}

/// Custom input kinds sent by the shell's menus.
pub mod events {
    /// PLAY button on the home and game-over screens.
    pub const PLAY: u32 = 1;
    /// The page was hidden or the shell opened a menu.
    pub const PAUSE: u32 = 2;
}

/// Game event kinds for the shell's overlays.
pub mod game_events {
    /// a = score, b = best.
    pub const SCORE: u32 = 1;
    /// a = score, b = best, c = 1 on a new best.
    pub const GAME_OVER: u32 = 2;
    /// a = 1 while a run is in progress.
    pub const RUN_STATE: u32 = 3;
}

/// Endless climber: catch holds, swing, let go, climb.
pub struct SwingClimber {
    config: ClimberConfig,
    field: HoldField,
    rig: Option<PlayerRig>,
    swing: SwingController,
    scoreboard: Scoreboard,
    tracker: CameraTracker,
    palette: HoldPalette,
    actions: ActionState,
    active: bool,
}

impl SwingClimber {
    /// Default tuning, best score kept in memory only.
    pub fn new() -> Self {
        Self::with_store(Box::new(MemoryStore::new()))
    }

    pub fn with_store(store: Box<dyn KeyValueStore>) -> Self {
        Self::with_config(ClimberConfig::default(), store)
    }

    pub fn with_config(config: ClimberConfig, store: Box<dyn KeyValueStore>) -> Self {
        Self {
            field: HoldField::new(&config),
            rig: None,
            swing: SwingController::new(),
            scoreboard: Scoreboard::load(store),
            tracker: CameraTracker::new(&config),
            palette: HoldPalette::new(config.hue_cycle_secs),
            actions: ActionState::new(),
            active: false,
            config,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn score(&self) -> u32 {
        self.scoreboard.score()
    }

    pub fn best_score(&self) -> u32 {
        self.scoreboard.best()
    }

    pub fn is_anchored(&self) -> bool {
        self.swing.is_anchored()
    }

    pub fn rig(&self) -> Option<&PlayerRig> {
        self.rig.as_ref()
    }

    pub fn field(&self) -> &HoldField {
        &self.field
    }

    /// Start (or resume) a run.
    pub fn on_run_activate(&mut self, ctx: &mut EngineContext) {
        if self.active {
            return;
        }
        self.active = true;
        log::info!("run started");
        ctx.emit_event(GameEvent::new(game_events::RUN_STATE, 1.0, 0.0, 0.0));
    }

    /// Freeze the run: no physics, no swing, no input transitions.
    pub fn on_run_deactivate(&mut self, ctx: &mut EngineContext) {
        if !self.active {
            return;
        }
        self.active = false;
        log::info!("run paused");
        ctx.emit_event(GameEvent::new(game_events::RUN_STATE, 0.0, 0.0, 0.0));
    }

    fn emit_score(&self, ctx: &mut EngineContext) {
        ctx.emit_event(GameEvent::new(
            game_events::SCORE,
            self.scoreboard.score() as f32,
            self.scoreboard.best() as f32,
            0.0,
        ));
    }

    fn handle_overlap(&mut self, ctx: &mut EngineContext, rig: &PlayerRig, overlap: SensorOverlap) {
        if overlap.watcher != rig.hand {
            return;
        }
        let Some(hold) = self.field.hold_at(overlap.other) else {
            return;
        };
        let release_held = self.actions.release_asserted();
        if let Some(catch) = self.swing.try_catch(ctx, rig, &hold, release_held) {
            self.on_catch(ctx, rig, catch);
        }
    }

    fn on_catch(&mut self, ctx: &mut EngineContext, rig: &PlayerRig, catch: Catch) {
        let torso_y = rig.torso_position(ctx).y;
        let target = self.tracker.recenter_on_catch(&mut ctx.camera, torso_y, catch.first);
        let viewport_height = ctx.camera.viewport_height;
        self.field.expand_field(ctx, &target, viewport_height);

        if catch.first {
            return;
        }
        ctx.emit_sound(SoundEvent(sounds::CATCH));
        if self.scoreboard.update_score(catch.level) {
            self.emit_score(ctx);
        }
    }

    fn game_over(&mut self, ctx: &mut EngineContext, rig: &PlayerRig) {
        let summary = self.scoreboard.commit_run();
        log::info!(
            "game over: score {}, best {}{}",
            summary.score,
            summary.best_score,
            if summary.new_best { " (new best)" } else { "" }
        );
        ctx.emit_event(GameEvent::new(
            game_events::GAME_OVER,
            summary.score as f32,
            summary.best_score as f32,
            if summary.new_best { 1.0 } else { 0.0 },
        ));
        self.on_run_deactivate(ctx);
        self.reset_run(ctx, rig);
    }

    /// Back to the start pose with a fresh field, ready for the next PLAY.
    fn reset_run(&mut self, ctx: &mut EngineContext, rig: &PlayerRig) {
        self.swing.release_joint(ctx);
        let viewport_height = ctx.camera.viewport_height;
        self.field.reset_field(ctx, viewport_height);
        rig.reset(ctx, self.config.spawn_point());
        self.tracker.frame_start(&mut ctx.camera);
        self.swing.rearm();
        self.actions.clear();
        self.emit_score(ctx);
    }
}

impl Default for SwingClimber {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for SwingClimber {
    fn config(&self) -> GameConfig {
        self.config.game_config()
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        let viewport_height = ctx.camera.viewport_height;
        self.field.reset_field(ctx, viewport_height);
        self.rig = Some(PlayerRig::create(ctx, &self.config));
        self.tracker.start(&mut ctx.camera);
        let stroke = self.palette.color();
        self.field.set_stroke(ctx, stroke);

        ctx.emit_sound(SoundEvent(sounds::MUSIC));
        self.emit_score(ctx);
        log::info!("swing climber ready, {} rows, best {}", self.field.len(), self.scoreboard.best());
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        for (kind, ..) in input.custom_events() {
            match kind {
                events::PLAY => self.on_run_activate(ctx),
                events::PAUSE => self.on_run_deactivate(ctx),
                _ => log::debug!("unknown custom event {}", kind),
            }
        }
        self.actions.apply_all(input.iter());

        let stroke = self.palette.tick(ctx.dt);
        self.field.set_stroke(ctx, stroke);

        let Some(rig) = self.rig else {
            return;
        };

        if self.active {
            self.tick_run(ctx, &rig);
        }
        ctx.camera.update(ctx.dt);
    }
}

impl SwingClimber {
    fn tick_run(&mut self, ctx: &mut EngineContext, rig: &PlayerRig) {
        ctx.step_physics();

        let overlaps = ctx.overlaps().to_vec();
        for overlap in overlaps {
            self.handle_overlap(ctx, rig, overlap);
        }

        let score = self.scoreboard.score();
        if self.actions.release_asserted() && self.swing.release(ctx, rig, score, &self.config) {
            ctx.emit_sound(SoundEvent(sounds::JUMP));
            self.tracker.on_release(&mut ctx.camera);
        }
        self.swing.drive(ctx, rig, score, &self.config);

        let torso = rig.torso_position(ctx);
        if has_fallen(&ctx.camera.world_view(), torso.y, self.config.fall_epsilon) {
            self.game_over(ctx, rig);
            return;
        }

        self.tracker.follow(&mut ctx.camera, torso);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use swing_engine::{InputEvent, JsonFileStore};

    use crate::score::BEST_SCORE_KEY;

    fn started(game: &mut SwingClimber) -> EngineContext {
        let mut ctx = EngineContext::from_config(&game.config());
        game.init(&mut ctx);
        ctx
    }

    fn queue(events: &[InputEvent]) -> InputQueue {
        let mut q = InputQueue::new();
        for e in events {
            q.push(*e);
        }
        q
    }

    fn play() -> InputEvent {
        InputEvent::Custom { kind: events::PLAY, a: 0.0, b: 0.0, c: 0.0 }
    }

    fn sound_count(ctx: &EngineContext, id: u32) -> usize {
        ctx.sounds.iter().filter(|s| s.0 == id).count()
    }

    fn events_of(ctx: &EngineContext, kind: u32) -> Vec<GameEvent> {
        ctx.events.iter().filter(|e| e.kind_id() == kind).copied().collect()
    }

    /// Activate and tick until the forced first catch happens.
    fn caught(game: &mut SwingClimber, ctx: &mut EngineContext) {
        game.update(ctx, &queue(&[play()]));
        for _ in 0..60 {
            if game.is_anchored() {
                return;
            }
            game.update(ctx, &InputQueue::new());
        }
        panic!("first catch never happened");
    }

    #[test]
    fn init_builds_field_rig_and_music() {
        let mut game = SwingClimber::new();
        let ctx = started(&mut game);

        let keys: Vec<i32> = game.field().rows().map(|r| r.row_level).collect();
        assert_eq!(keys, vec![-500, -250, 0]);
        assert!(game.rig().is_some());
        assert_eq!(sound_count(&ctx, sounds::MUSIC), 1);
        assert_eq!(events_of(&ctx, game_events::SCORE).len(), 1);
        assert!(!game.is_active());
    }

    #[test]
    fn inactive_run_is_frozen_but_camera_moves() {
        let mut game = SwingClimber::new();
        let mut ctx = started(&mut game);
        let rig = *game.rig().unwrap();
        let spawn = rig.torso_position(&ctx);

        for _ in 0..30 {
            game.update(&mut ctx, &queue(&[InputEvent::PointerDown { x: 0.0, y: 0.0 }]));
        }

        assert_eq!(rig.torso_position(&ctx), spawn);
        assert!(!game.is_anchored());
        assert!((ctx.camera.zoom - 0.8).abs() < 1e-5);
    }

    #[test]
    fn play_and_pause_toggle_run_state() {
        let mut game = SwingClimber::new();
        let mut ctx = started(&mut game);
        ctx.clear_frame_data();

        game.update(&mut ctx, &queue(&[play(), play()]));
        assert!(game.is_active());
        assert_eq!(events_of(&ctx, game_events::RUN_STATE).len(), 1);

        let pause = InputEvent::Custom { kind: events::PAUSE, a: 0.0, b: 0.0, c: 0.0 };
        game.update(&mut ctx, &queue(&[pause]));
        assert!(!game.is_active());
        let states = events_of(&ctx, game_events::RUN_STATE);
        assert_eq!(states.last().map(|e| e.a), Some(0.0));
    }

    #[test]
    fn first_catch_is_silent_and_scoreless() {
        let mut game = SwingClimber::new();
        let mut ctx = started(&mut game);
        caught(&mut game, &mut ctx);

        assert!(game.is_anchored());
        assert_eq!(game.score(), 0);
        assert_eq!(sound_count(&ctx, sounds::CATCH), 0);
        // Rig joint plus the climbing joint.
        assert_eq!(ctx.physics.joint_count(), 2);
        // Field grew to one screen above the target view.
        assert!(game.field().len() > 3);
    }

    #[test]
    fn holding_release_lets_go_with_a_jump() {
        let mut game = SwingClimber::new();
        let mut ctx = started(&mut game);
        caught(&mut game, &mut ctx);

        game.update(&mut ctx, &queue(&[InputEvent::KeyDown { key_code: swing_engine::keys::SPACE }]));
        assert!(!game.is_anchored());
        assert_eq!(sound_count(&ctx, sounds::JUMP), 1);
        assert_eq!(ctx.physics.joint_count(), 1);
    }

    #[test]
    fn catch_at_level_three_scores_three() {
        let mut game = SwingClimber::new();
        let mut ctx = started(&mut game);
        caught(&mut game, &mut ctx);
        let rig = *game.rig().unwrap();

        game.scoreboard.update_score(1);
        game.swing.release_joint(&mut ctx);

        let hold = game.field().row(-750).map(|r| r.holds[0]).unwrap();
        assert_eq!(hold.level, 3);
        game.handle_overlap(&mut ctx, &rig, SensorOverlap { watcher: rig.hand, other: hold.entity });

        assert!(game.is_anchored());
        assert_eq!(game.score(), 3);
        assert_eq!(sound_count(&ctx, sounds::CATCH), 1);
        let scores = events_of(&ctx, game_events::SCORE);
        assert_eq!(scores.last().map(|e| e.a), Some(3.0));
    }

    #[test]
    fn lower_catch_keeps_score() {
        let mut game = SwingClimber::new();
        let mut ctx = started(&mut game);
        caught(&mut game, &mut ctx);
        let rig = *game.rig().unwrap();

        game.scoreboard.update_score(4);
        game.swing.release_joint(&mut ctx);
        let hold = game.field().row(-500).map(|r| r.holds[1]).unwrap();
        game.handle_overlap(&mut ctx, &rig, SensorOverlap { watcher: rig.hand, other: hold.entity });

        assert_eq!(game.score(), 4);
        assert_eq!(sound_count(&ctx, sounds::CATCH), 1);
    }

    #[test]
    fn overlaps_from_other_bodies_are_ignored() {
        let mut game = SwingClimber::new();
        let mut ctx = started(&mut game);
        let rig = *game.rig().unwrap();
        let hold = game.field().row(0).map(|r| r.holds[0]).unwrap();

        game.handle_overlap(&mut ctx, &rig, SensorOverlap { watcher: rig.torso, other: hold.entity });
        game.handle_overlap(&mut ctx, &rig, SensorOverlap { watcher: rig.hand, other: rig.torso });
        assert!(!game.is_anchored());
    }

    #[test]
    fn fall_ends_run_and_persists_best() {
        let path = std::env::temp_dir().join(format!("swing-climber-fall-{}.json", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let mut game = SwingClimber::with_store(Box::new(JsonFileStore::new(&path)));
        let mut ctx = started(&mut game);
        caught(&mut game, &mut ctx);
        let rig = *game.rig().unwrap();
        game.scoreboard.update_score(4);

        // Drop the rig well below the view.
        game.swing.release_joint(&mut ctx);
        rig.reset(&mut ctx, Vec2::new(0.0, 2000.0));
        ctx.clear_frame_data();
        game.update(&mut ctx, &InputQueue::new());

        let over = events_of(&ctx, game_events::GAME_OVER);
        assert_eq!(over.len(), 1);
        assert_eq!((over[0].a, over[0].b, over[0].c), (4.0, 4.0, 1.0));

        assert!(!game.is_active());
        assert!(!game.is_anchored());
        assert_eq!(game.score(), 0);
        assert_eq!(game.best_score(), 4);
        assert_eq!(ctx.physics.joint_count(), 1);
        assert_eq!(rig.torso_position(&ctx), Vec2::new(-140.0, 0.0));
        let keys: Vec<i32> = game.field().rows().map(|r| r.row_level).collect();
        assert_eq!(keys, vec![-500, -250, 0]);
        assert_eq!(ctx.camera.center, Vec2::new(0.0, -160.0));

        let stored = JsonFileStore::new(&path).load(BEST_SCORE_KEY).unwrap();
        assert_eq!(stored.as_deref(), Some("4"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn best_survives_a_worse_run() {
        let mut game = SwingClimber::with_store(Box::new(MemoryStore::new().with_value(BEST_SCORE_KEY, "9")));
        let mut ctx = started(&mut game);
        caught(&mut game, &mut ctx);
        let rig = *game.rig().unwrap();
        game.scoreboard.update_score(2);

        game.swing.release_joint(&mut ctx);
        rig.reset(&mut ctx, Vec2::new(0.0, 2000.0));
        ctx.clear_frame_data();
        game.update(&mut ctx, &InputQueue::new());

        let over = events_of(&ctx, game_events::GAME_OVER);
        assert_eq!((over[0].a, over[0].b, over[0].c), (2.0, 9.0, 0.0));
        assert_eq!(game.best_score(), 9);
    }

    #[test]
    fn at_most_one_climbing_joint_while_playing() {
        let mut game = SwingClimber::new();
        let mut ctx = started(&mut game);
        game.update(&mut ctx, &queue(&[play()]));

        for i in 0..600 {
            let input = match i % 45 {
                0 => queue(&[InputEvent::PointerDown { x: 0.0, y: 0.0 }]),
                2 => queue(&[InputEvent::PointerUp { x: 0.0, y: 0.0 }]),
                _ => InputQueue::new(),
            };
            if !game.is_active() {
                game.update(&mut ctx, &queue(&[play()]));
            }
            game.update(&mut ctx, &input);
            assert!(ctx.physics.joint_count() <= 2);
            if game.is_anchored() {
                assert_eq!(ctx.physics.joint_count(), 2);
            }
        }
    }
}
