use swing_engine::{
    Game, GameConfig, EngineContext, RenderContext,
    InputEvent, InputQueue, ShapeBuffer, CameraUniform,
    FixedTimestep,
};
use swing_engine::systems::render::build_shape_buffer;

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner (see
/// [`export_game!`](crate::export_game)) and exports free functions via
/// `#[wasm_bindgen]`, because wasm-bindgen cannot export generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    idle_input: InputQueue,
    shape_buffer: ShapeBuffer,
    camera_uniform: CameraUniform,
    timestep: FixedTimestep,
    config: GameConfig,
    initialized: bool,
    /// Flat buffer of sound event IDs for the shell to read.
    sound_buffer: Vec<u8>,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let timestep = FixedTimestep::with_max_steps(config.fixed_dt, config.max_steps_per_frame);
        let ctx = EngineContext::from_config(&config);
        let camera_uniform = ctx.camera.uniform();

        Self {
            game,
            ctx,
            input: InputQueue::new(),
            idle_input: InputQueue::new(),
            shape_buffer: ShapeBuffer::with_capacity(config.max_shapes),
            camera_uniform,
            timestep,
            sound_buffer: Vec::with_capacity(config.max_sounds),
            config,
            initialized: false,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.game.init(&mut self.ctx);
        self.initialized = true;
        self.rebuild_frame();
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// The browser canvas changed size.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            log::warn!("ignoring resize to {}x{}", width, height);
            return;
        }
        self.config.viewport_width = width;
        self.config.viewport_height = height;
        self.ctx.camera.resize(width, height);
    }

    /// Run one frame: fixed-step updates, then rebuild the buffers the shell reads.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        // Clear per-frame transient data
        self.ctx.clear_frame_data();

        let steps = self.timestep.accumulate(dt);
        for step in 0..steps {
            // Queued input is seen by the first tick of the frame only
            let input = if step == 0 { &self.input } else { &self.idle_input };
            self.game.update(&mut self.ctx, input);
            #[cfg(feature = "physics")]
            if self.config.auto_step_physics {
                self.ctx.step_physics();
            }
        }

        // Keep input for the next frame if no tick consumed it
        if steps > 0 {
            self.input.drain();
        }

        self.rebuild_frame();
    }

    fn rebuild_frame(&mut self) {
        build_shape_buffer(self.ctx.scene.iter(), &mut self.shape_buffer);

        // Allow game to add custom draw commands
        {
            let mut render_ctx = RenderContext {
                shapes: &mut self.shape_buffer,
                camera: &self.ctx.camera,
            };
            self.game.render(&mut render_ctx);
        }

        self.camera_uniform = self.ctx.camera.uniform();

        self.sound_buffer.clear();
        for sound in self.ctx.sounds.iter().take(self.config.max_sounds) {
            self.sound_buffer.push(sound.0 as u8);
        }
    }

    // ---- Pointer accessors for shell reads ----

    pub fn shapes_ptr(&self) -> *const f32 {
        self.shape_buffer.instances_ptr()
    }

    pub fn shape_count(&self) -> u32 {
        self.shape_buffer.instance_count() as u32
    }

    pub fn camera_ptr(&self) -> *const f32 {
        &self.camera_uniform as *const CameraUniform as *const f32
    }

    pub fn sound_events_ptr(&self) -> *const u8 {
        self.sound_buffer.as_ptr()
    }

    pub fn sound_events_len(&self) -> u32 {
        self.sound_buffer.len() as u32
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len().min(self.config.max_events) as u32
    }

    pub fn viewport_width(&self) -> f32 {
        self.config.viewport_width
    }

    pub fn viewport_height(&self) -> f32 {
        self.config.viewport_height
    }

    pub fn max_shapes(&self) -> u32 {
        self.config.max_shapes as u32
    }

    // ---- Native access (headless drivers and tests) ----

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn shapes(&self) -> &ShapeBuffer {
        &self.shape_buffer
    }

    pub fn sounds(&self) -> &[u8] {
        &self.sound_buffer
    }
}
