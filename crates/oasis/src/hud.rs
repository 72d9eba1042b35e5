//! Heads-up display state
//!
//! Tracks which overlay screen is up and the collected-orb counter. Drawing
//! the overlay is up to the renderer.

use crate::game_state::GameState;

/// Overlay screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Assets loading
    Loading,
    /// Press-to-start screen
    Start,
    /// In-game counter overlay
    InGame,
    /// Loss screen
    GameOver,
    /// Win screen
    Victory,
}

/// HUD model
#[derive(Debug, Clone)]
pub struct Hud {
    screen: Screen,
    collected: u32,
    objective: u32,
}

impl Hud {
    /// HUD for a level with `objective` orbs
    pub fn new(objective: u32) -> Self {
        Self {
            screen: Screen::Loading,
            collected: 0,
            objective,
        }
    }

    /// Count one pickup; never exceeds the objective
    pub fn increment_collected(&mut self) {
        if self.collected < self.objective {
            self.collected += 1;
        }
        log::info!("Orbs collected: {}/{}", self.collected, self.objective);
    }

    /// Pick the screen for a game state.
    ///
    /// The death effect keeps the in-game overlay until the loss screen.
    pub fn sync_with_state(&mut self, state: GameState) {
        let screen = match state {
            GameState::Init => Screen::Start,
            GameState::InProgress | GameState::Dead => Screen::InGame,
            GameState::Lost => Screen::GameOver,
            GameState::Won => Screen::Victory,
        };
        if screen != self.screen {
            log::debug!("HUD screen {:?} -> {:?}", self.screen, screen);
            self.screen = screen;
        }
    }

    /// Current screen
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Orbs collected so far
    pub fn collected(&self) -> u32 {
        self.collected
    }

    /// Orbs in the level
    pub fn objective(&self) -> u32 {
        self.objective
    }

    /// Counter text
    pub fn label(&self) -> String {
        format!("{}/{}", self.collected, self.objective)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_caps_at_objective() {
        let mut hud = Hud::new(2);
        hud.increment_collected();
        hud.increment_collected();
        hud.increment_collected();
        assert_eq!(hud.collected(), 2);
        assert_eq!(hud.label(), "2/2");
    }

    #[test]
    fn test_screens_follow_state() {
        let mut hud = Hud::new(3);
        assert_eq!(hud.screen(), Screen::Loading);
        hud.sync_with_state(GameState::Init);
        assert_eq!(hud.screen(), Screen::Start);
        hud.sync_with_state(GameState::Dead);
        assert_eq!(hud.screen(), Screen::InGame);
        hud.sync_with_state(GameState::Lost);
        assert_eq!(hud.screen(), Screen::GameOver);
        hud.sync_with_state(GameState::Won);
        assert_eq!(hud.screen(), Screen::Victory);
    }
}
