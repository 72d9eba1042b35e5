//! Game state machine
//!
//! ```text
//! Init --start--> InProgress --all orbs--> Won
//!                     |
//!                     +--terrain / hostile--> Dead --death dwell--> Lost --lost dwell--> exit
//!                                        (or Lost directly without a death effect)
//! ```

use oasis_engine::foundation::time::DwellTimer;

/// Top-level game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Start screen; waiting for the start input
    Init,
    /// Simulation running
    InProgress,
    /// Every orb collected
    Won,
    /// Loss screen
    Lost,
    /// Death effect playing before the loss screen
    Dead,
}

/// Things that can move the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateEvent {
    /// Designated start input
    Start,
    /// Player sank into the terrain
    TerrainContact,
    /// Player touched a hostile
    HostileContact,
    /// Last orb collected
    AllOrbsCollected,
    /// Death effect finished
    DeathDwellElapsed,
}

/// Whether the application should keep running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Keep looping
    Running,
    /// Loss dwell finished; shut down
    Exit,
}

/// Pure transition function.
///
/// Events that do not apply to the current state leave it unchanged.
pub fn transition(state: GameState, event: StateEvent, death_effect: bool) -> GameState {
    match (state, event) {
        (GameState::Init, StateEvent::Start) => GameState::InProgress,
        (GameState::InProgress, StateEvent::TerrainContact | StateEvent::HostileContact) => {
            if death_effect {
                GameState::Dead
            } else {
                GameState::Lost
            }
        }
        (GameState::InProgress, StateEvent::AllOrbsCollected) => GameState::Won,
        (GameState::Dead, StateEvent::DeathDwellElapsed) => GameState::Lost,
        (state, _) => state,
    }
}

/// State plus the dwell timers of the end screens
#[derive(Debug, Clone)]
pub struct GameStateMachine {
    state: GameState,
    death_effect: bool,
    death_dwell: f64,
    lost_dwell: f64,
    dwell: Option<DwellTimer>,
}

impl GameStateMachine {
    /// Start in `Init`
    pub fn new(death_effect: bool, death_dwell: f64, lost_dwell: f64) -> Self {
        Self {
            state: GameState::Init,
            death_effect,
            death_dwell,
            lost_dwell,
            dwell: None,
        }
    }

    /// Current state
    pub fn state(&self) -> GameState {
        self.state
    }

    /// Apply an event at wall-clock time `now`; returns the resulting state
    pub fn handle(&mut self, event: StateEvent, now: f64) -> GameState {
        let next = transition(self.state, event, self.death_effect);
        if next != self.state {
            log::info!("Game state {:?} -> {:?} ({:?})", self.state, next, event);
            self.dwell = match next {
                GameState::Dead => Some(DwellTimer::start(now, self.death_dwell)),
                GameState::Lost => Some(DwellTimer::start(now, self.lost_dwell)),
                GameState::Init | GameState::InProgress | GameState::Won => None,
            };
            self.state = next;
        }
        self.state
    }

    /// Advance dwell timers
    pub fn poll(&mut self, now: f64) -> RunStatus {
        let elapsed = self.dwell.is_some_and(|dwell| dwell.is_elapsed(now));
        match self.state {
            GameState::Dead if elapsed => {
                self.handle(StateEvent::DeathDwellElapsed, now);
                RunStatus::Running
            }
            GameState::Lost if elapsed => {
                log::info!("Loss screen dwell finished, exiting");
                RunStatus::Exit
            }
            _ => RunStatus::Running,
        }
    }
}
