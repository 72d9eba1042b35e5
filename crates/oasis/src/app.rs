//! Game loop and platform boundary
//!
//! The [`Platform`] trait is everything the loop needs from a window system:
//! a clock, input events, cursor control and a present call. [`HeadlessPlatform`]
//! implements it with a simulated clock and a scripted input timeline so the
//! whole game runs without a window.

use oasis_engine::foundation::math::{utils, Vec3};
use oasis_engine::foundation::time::TickGate;
use oasis_engine::input::{HeldKeys, InputEvent, InputState, Key, KeyAction};
use oasis_engine::render::{Camera, Renderer};
use oasis_engine::scene::UpdateContext;
use oasis_engine::assets::ResourceManager;

use crate::collisions::{self, OrbProgress};
use crate::config::{GameConfig, MovementMode};
use crate::error::GameError;
use crate::game_state::{GameState, GameStateMachine, RunStatus, StateEvent};
use crate::hud::Hud;
use crate::player::Player;
use crate::world::{self, World};

/// Requests from the game back to the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformCommand {
    /// Hide and capture the cursor (debug camera) or release it
    SetCursorLocked(bool),
    /// Close the window
    Close,
}

/// Window system seen by the game loop
pub trait Platform {
    /// Wall-clock time in seconds
    fn now(&self) -> f64;

    /// Events received since the last call
    fn poll_events(&mut self) -> Vec<InputEvent>;

    /// Carry out a request from the game
    fn apply(&mut self, command: PlatformCommand);

    /// Whether the window should close
    fn should_close(&self) -> bool;

    /// Present the finished frame
    fn present(&mut self);
}

/// Platform with a simulated clock and a scripted input timeline
#[derive(Debug, Clone)]
pub struct HeadlessPlatform {
    time: f64,
    frame_step: f64,
    duration: f64,
    script: Vec<(f64, InputEvent)>,
    cursor: usize,
    cursor_locked: bool,
    closed: bool,
}

impl HeadlessPlatform {
    /// Empty timeline running for `duration` seconds at `frame_step` per frame
    pub fn new(duration: f64, frame_step: f64) -> Self {
        Self {
            time: 0.0,
            frame_step,
            duration,
            script: Vec::new(),
            cursor: 0,
            cursor_locked: false,
            closed: false,
        }
    }

    /// Press start shortly after launch, then hold W for the rest of the run
    pub fn demo(duration: f64, frame_step: f64) -> Self {
        let mut platform = Self::new(duration, frame_step).with_event(0.2, InputEvent::press(Key::Space));
        platform.hold(Key::W, 0.3, duration);
        platform
    }

    /// Schedule one event
    pub fn with_event(mut self, at: f64, event: InputEvent) -> Self {
        self.push(at, event);
        self
    }

    /// Schedule a press at `from`, repeats every frame, and a release at `until`
    pub fn hold(&mut self, key: Key, from: f64, until: f64) {
        self.push(from, InputEvent::press(key));
        let mut at = from + self.frame_step;
        while at < until {
            self.push(at, InputEvent::Key { key, action: KeyAction::Repeat });
            at += self.frame_step;
        }
        self.push(until, InputEvent::release(key));
    }

    fn push(&mut self, at: f64, event: InputEvent) {
        let index = self.script.partition_point(|(time, _)| *time <= at);
        self.script.insert(index, (at, event));
    }

    /// Whether the game asked for the cursor to be captured
    pub fn cursor_locked(&self) -> bool {
        self.cursor_locked
    }
}

impl Platform for HeadlessPlatform {
    fn now(&self) -> f64 {
        self.time
    }

    fn poll_events(&mut self) -> Vec<InputEvent> {
        let end = self.cursor + self.script[self.cursor..].partition_point(|(time, _)| *time <= self.time);
        let events = self.script[self.cursor..end].iter().map(|(_, event)| *event).collect();
        self.cursor = end;
        events
    }

    fn apply(&mut self, command: PlatformCommand) {
        match command {
            PlatformCommand::SetCursorLocked(locked) => self.cursor_locked = locked,
            PlatformCommand::Close => self.closed = true,
        }
    }

    fn should_close(&self) -> bool {
        self.closed || self.time >= self.duration
    }

    fn present(&mut self) {
        self.time += self.frame_step;
    }
}

/// Outcome of a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    /// State when the loop ended
    pub final_state: GameState,
    /// Frames rendered
    pub frames: u64,
    /// Logic ticks run
    pub ticks: u64,
    /// Orbs collected
    pub orbs_collected: u32,
    /// Clock time when the loop ended
    pub elapsed: f64,
}

/// Game session: world, player, camera and the state machine
#[derive(Debug)]
pub struct Game {
    config: GameConfig,
    world: World,
    player: Player,
    camera: Camera,
    machine: GameStateMachine,
    hud: Hud,
    progress: OrbProgress,
    gate: TickGate,
    input: InputState,
    debug_mode: bool,
    quit: bool,
    commands: Vec<PlatformCommand>,
}

impl Game {
    /// Build the world and place the player and camera at the start
    pub fn new(config: GameConfig, resources: &ResourceManager) -> Result<Self, GameError> {
        let world = world::build(&config, resources)?;

        let view = &config.camera;
        let mut camera = Camera::default();
        camera.set_view(view.position, view.look_at, view.up);
        camera.set_projection(
            view.fov,
            view.near,
            view.far,
            config.window.width as f32,
            config.window.height as f32,
        );

        let mut player = Player::new(&config.player);
        player.init(view.position, view.look_at, view.up);
        player.set_shape(world.player_shape);

        let mut hud = Hud::new(world.orb_count);
        hud.sync_with_state(GameState::Init);

        let simulation = &config.simulation;
        let machine = GameStateMachine::new(simulation.death_effect, simulation.death_dwell, simulation.lost_dwell);
        let gate = TickGate::new(simulation.tick_threshold);
        let progress = OrbProgress::new(world.orb_count);

        log::info!("Game ready; press Space to start");

        Ok(Self {
            config,
            world,
            player,
            camera,
            machine,
            hud,
            progress,
            gate,
            input: InputState::new(),
            debug_mode: false,
            quit: false,
            commands: Vec::new(),
        })
    }

    /// React to one platform event received at `now`
    pub fn handle_event(&mut self, event: &InputEvent, now: f64) {
        self.input.handle_event(event);

        match *event {
            InputEvent::Key { key, action } => {
                if action != KeyAction::Release {
                    self.handle_key(key, action, now);
                }
            }
            InputEvent::Resized { width, height } => {
                if width > 0 && height > 0 {
                    let view = &self.config.camera;
                    self.camera.set_projection(view.fov, view.near, view.far, width as f32, height as f32);
                }
            }
            InputEvent::CloseRequested => self.quit = true,
            InputEvent::CursorMoved { .. } => {}
        }
    }

    fn handle_key(&mut self, key: Key, action: KeyAction, now: f64) {
        match key {
            Key::Q => {
                log::info!("Quit requested");
                self.quit = true;
                self.commands.push(PlatformCommand::Close);
            }
            Key::Space if self.machine.state() == GameState::Init => {
                self.machine.handle(StateEvent::Start, now);
                self.gate.reset(now);
            }
            _ if self.machine.state() != GameState::InProgress => {}
            Key::B if action == KeyAction::Press => {
                self.debug_mode = !self.debug_mode;
                log::info!("Debug camera {}", if self.debug_mode { "on" } else { "off" });
                self.commands.push(PlatformCommand::SetCursorLocked(self.debug_mode));
            }
            Key::Y | Key::H => {
                let step = if key == Key::Y {
                    self.config.light.height_step
                } else {
                    -self.config.light.height_step
                };
                if let Some(light) = self.world.scene.node_mut(self.world.light) {
                    light.translate(Vec3::new(0.0, step, 0.0));
                }
            }
            _ if self.debug_mode => {}
            _ => self.steer(key, self.gate.since_last_tick(now)),
        }
    }

    fn steer(&mut self, key: Key, since_last: f32) {
        let step = utils::deg_to_rad(self.config.player.rotation_step);
        let momentum = self.player.movement_mode() == MovementMode::Momentum;
        match key {
            Key::Up => self.player.pitch(step),
            Key::Down => self.player.pitch(-step),
            Key::Left => self.player.yaw(step),
            Key::Right => self.player.yaw(-step),
            Key::Z => self.player.roll(step),
            Key::X => self.player.roll(-step),
            Key::W if momentum => self.player.accelerate(since_last),
            Key::W => self.player.move_forward(),
            Key::S if momentum => self.player.decelerate(since_last),
            Key::S => self.player.move_backward(),
            _ => {}
        }
    }

    /// Run one outer-loop iteration at `now`: dwell timers, a gated tick, drawing
    pub fn frame(&mut self, now: f64, renderer: &mut dyn Renderer) -> RunStatus {
        if self.quit || self.machine.poll(now) == RunStatus::Exit {
            return RunStatus::Exit;
        }

        if self.machine.state() == GameState::InProgress {
            if let Some(dt) = self.gate.poll(now) {
                self.tick(dt, now);
            }
        }

        match self.machine.state() {
            GameState::Init | GameState::Lost => {}
            GameState::InProgress | GameState::Dead | GameState::Won => {
                self.world.scene.draw_all(renderer, &self.camera, now as f32);
            }
        }
        self.hud.sync_with_state(self.machine.state());
        RunStatus::Running
    }

    /// Advance the simulation by `dt`
    fn tick(&mut self, dt: f32, now: f64) {
        let scene = &mut self.world.scene;

        if let (Some(position), Some(light)) = (
            scene.world_position(self.world.light),
            scene.node(self.world.light).and_then(|node| node.light().copied()),
        ) {
            self.camera.update_light_info(position, light.color, light.spec_power);
        }

        let context = UpdateContext {
            player_position: self.player.position(),
        };
        scene.update_all(dt, &context);
        self.player.update(dt, scene);

        if self.debug_mode {
            self.fly_debug_camera();
        } else {
            self.camera.follow(
                self.player.orientation(),
                self.player.forward_basis(),
                self.player.side_basis(),
                self.player.position(),
            );
        }

        let report = collisions::resolve(
            &mut self.world.scene,
            &self.world.terrain,
            &mut self.player,
            &mut self.progress,
            &mut self.hud,
            self.config.world.powerup_boost,
        );
        if let Some(event) = report.event {
            self.machine.handle(event, now);
        }
    }

    fn fly_debug_camera(&mut self) {
        let settings = &self.config.debug_camera;
        let delta = self.input.take_mouse_delta() * settings.mouse_sensitivity;
        self.camera.yaw(-delta.x);
        self.camera.pitch(-delta.y);

        let held = self.input.held();
        let mut direction = Vec3::zeros();
        if held.contains(HeldKeys::W) {
            direction += self.camera.forward();
        }
        if held.contains(HeldKeys::S) {
            direction -= self.camera.forward();
        }
        if held.contains(HeldKeys::D) {
            direction += self.camera.side();
        }
        if held.contains(HeldKeys::A) {
            direction -= self.camera.side();
        }
        if held.contains(HeldKeys::SPACE) {
            direction += self.camera.up();
        }
        if held.contains(HeldKeys::SHIFT) {
            direction -= self.camera.up();
        }
        self.camera.translate(direction * settings.move_speed);
    }

    /// Drive the loop until the platform closes or the game exits
    pub fn run(&mut self, platform: &mut dyn Platform, renderer: &mut dyn Renderer) -> RunSummary {
        let mut frames = 0;
        while !platform.should_close() {
            let now = platform.now();
            for event in platform.poll_events() {
                self.handle_event(&event, now);
            }
            for command in self.commands.drain(..) {
                platform.apply(command);
            }
            if self.frame(now, renderer) == RunStatus::Exit {
                break;
            }
            frames += 1;
            platform.present();
        }

        let summary = RunSummary {
            final_state: self.machine.state(),
            frames,
            ticks: self.gate.tick_count(),
            orbs_collected: self.hud.collected(),
            elapsed: platform.now(),
        };
        log::info!("Run finished: {:?}", summary);
        summary
    }

    /// Current game state
    pub fn state(&self) -> GameState {
        self.machine.state()
    }

    /// HUD model
    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    /// Player
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Mutable player access (scripted scenarios)
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Camera
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Level contents
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Whether the debug free-fly camera is active
    pub fn debug_mode(&self) -> bool {
        self.debug_mode
    }

    /// Orbs left to collect
    pub fn orbs_remaining(&self) -> u32 {
        self.progress.remaining()
    }
}
