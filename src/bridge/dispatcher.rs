//! Timed input dispatch
//!
//! A jump is a press, a release after the press duration, and a cooldown
//! during which further jumps are dropped. Instead of fire-and-forget sleeps
//! the dispatcher keeps an explicit timer: callers hand in the current time
//! and [`ActionDispatcher::poll`] fires whatever has come due.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use super::collaborator::GameCollaborator;
use super::config::BridgeConfig;
use crate::game::{Action, InputCode};

/// Where the jump timer stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpPhase {
    /// Ready for the next jump
    Idle,
    /// Key is held down until `release_at`
    Armed { code: InputCode, release_at: Instant },
    /// Key released, further jumps are dropped until `idle_at`
    Cooling { idle_at: Instant },
}

#[derive(Debug, Clone)]
pub struct ActionDispatcher {
    press: Duration,
    cooldown: Duration,
    start_hold: Duration,
    jump: JumpPhase,
    /// Pending release of the start key
    start_release_at: Option<Instant>,
}

impl ActionDispatcher {
    pub fn new(press: Duration, cooldown: Duration, start_hold: Duration) -> Self {
        Self {
            press,
            cooldown,
            start_hold,
            jump: JumpPhase::Idle,
            start_release_at: None,
        }
    }

    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::new(
            config.jump_press(),
            config.jump_cooldown(),
            config.start_hold(),
        )
    }

    pub fn phase(&self) -> JumpPhase {
        self.jump
    }

    /// True from the jump press until its cooldown has run out
    pub fn in_flight(&self) -> bool {
        self.jump != JumpPhase::Idle
    }

    /// True while the start key is held down
    pub fn start_pending(&self) -> bool {
        self.start_release_at.is_some()
    }

    /// Carry out an agent action
    ///
    /// A jump requested while another is in flight is dropped without error.
    /// Returns whether a key was pressed.
    pub fn dispatch<G: GameCollaborator>(
        &mut self,
        game: &G,
        action: Action,
        now: Instant,
    ) -> bool {
        let Some(code) = action.input() else {
            return false;
        };

        self.poll(game, now);
        if self.in_flight() {
            debug!(?action, "previous jump still in flight, dropping");
            return false;
        }

        game.press_input(code);
        self.jump = JumpPhase::Armed {
            code,
            release_at: now + self.press,
        };
        true
    }

    /// Press duration plus cooldown of one accepted jump
    pub fn jump_cycle(&self) -> Duration {
        self.press + self.cooldown
    }

    /// Press the start/continue key; not subject to the jump guard
    pub fn press_start<G: GameCollaborator>(&mut self, game: &G, now: Instant) {
        game.press_input(InputCode::Space);
        self.start_release_at = Some(now + self.start_hold);
    }

    /// Fire every transition due at `now`
    pub fn poll<G: GameCollaborator>(&mut self, game: &G, now: Instant) {
        if let Some(release_at) = self.start_release_at {
            if now >= release_at {
                game.release_input(InputCode::Space);
                self.start_release_at = None;
            }
        }

        if let JumpPhase::Armed { code, release_at } = self.jump {
            if now >= release_at {
                game.release_input(code);
                self.jump = JumpPhase::Cooling {
                    idle_at: release_at + self.cooldown,
                };
            }
        }

        if let JumpPhase::Cooling { idle_at } = self.jump {
            if now >= idle_at {
                self.jump = JumpPhase::Idle;
            }
        }
    }

    /// Release every held key now and forget pending timers
    ///
    /// Used when the loop stops serving, so no key stays down in a game that
    /// outlives it.
    pub fn release_all<G: GameCollaborator>(&mut self, game: &G) {
        if self.start_release_at.take().is_some() {
            game.release_input(InputCode::Space);
        }
        if let JumpPhase::Armed { code, .. } = self.jump {
            game.release_input(code);
        }
        self.jump = JumpPhase::Idle;
    }

    /// Earliest instant at which [`poll`](Self::poll) has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        let jump = match self.jump {
            JumpPhase::Idle => None,
            JumpPhase::Armed { release_at, .. } => Some(release_at),
            JumpPhase::Cooling { idle_at } => Some(idle_at),
        };
        [jump, self.start_release_at].into_iter().flatten().min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::collaborator::GameSnapshot;
    use std::cell::RefCell;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        Press(InputCode),
        Release(InputCode),
    }

    #[derive(Default)]
    struct Recorder {
        events: RefCell<Vec<Event>>,
    }

    impl Recorder {
        fn events(&self) -> Vec<Event> {
            self.events.borrow().clone()
        }

        fn presses(&self) -> usize {
            self.events()
                .iter()
                .filter(|e| matches!(e, Event::Press(_)))
                .count()
        }
    }

    impl GameCollaborator for Recorder {
        fn query_state(&self) -> Option<GameSnapshot> {
            None
        }
        fn is_terminal(&self) -> bool {
            false
        }
        fn is_running(&self) -> bool {
            true
        }
        fn distance_traveled(&self) -> f64 {
            0.0
        }
        fn press_input(&self, code: InputCode) {
            self.events.borrow_mut().push(Event::Press(code));
        }
        fn release_input(&self, code: InputCode) {
            self.events.borrow_mut().push(Event::Release(code));
        }
    }

    fn dispatcher() -> ActionDispatcher {
        ActionDispatcher::from_config(&BridgeConfig::default())
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_none_is_noop() {
        let game = Recorder::default();
        let mut dispatcher = dispatcher();

        assert!(!dispatcher.dispatch(&game, Action::None, Instant::now()));

        assert!(game.events().is_empty());
        assert!(!dispatcher.in_flight());
        assert_eq!(dispatcher.next_deadline(), None);
    }

    #[test]
    fn test_jump_press_release_cooldown() {
        let game = Recorder::default();
        let mut dispatcher = dispatcher();
        let t0 = Instant::now();

        dispatcher.dispatch(&game, Action::Jump, t0);
        assert_eq!(game.events(), vec![Event::Press(InputCode::Up)]);
        assert!(dispatcher.in_flight());
        assert_eq!(dispatcher.next_deadline(), Some(t0 + ms(100)));

        dispatcher.poll(&game, t0 + ms(99));
        assert_eq!(game.events().len(), 1);

        dispatcher.poll(&game, t0 + ms(100));
        assert_eq!(
            game.events(),
            vec![Event::Press(InputCode::Up), Event::Release(InputCode::Up)]
        );
        assert_eq!(
            dispatcher.phase(),
            JumpPhase::Cooling {
                idle_at: t0 + ms(500)
            }
        );

        dispatcher.poll(&game, t0 + ms(499));
        assert!(dispatcher.in_flight());

        dispatcher.poll(&game, t0 + ms(500));
        assert_eq!(dispatcher.phase(), JumpPhase::Idle);
        assert_eq!(dispatcher.next_deadline(), None);
    }

    #[test]
    fn test_back_to_back_jumps_press_once() {
        let game = Recorder::default();
        let mut dispatcher = dispatcher();
        let t0 = Instant::now();

        assert!(dispatcher.dispatch(&game, Action::Jump, t0));
        assert!(!dispatcher.dispatch(&game, Action::Jump, t0 + ms(10)));
        // Released but still cooling down
        assert!(!dispatcher.dispatch(&game, Action::Jump, t0 + ms(300)));

        assert_eq!(game.presses(), 1);
        assert_eq!(
            game.events(),
            vec![Event::Press(InputCode::Up), Event::Release(InputCode::Up)]
        );
    }

    #[test]
    fn test_jump_accepted_after_cooldown() {
        let game = Recorder::default();
        let mut dispatcher = dispatcher();
        let t0 = Instant::now();

        dispatcher.dispatch(&game, Action::Jump, t0);
        // No poll in between: dispatch catches up on its own
        dispatcher.dispatch(&game, Action::Jump, t0 + ms(500));

        assert_eq!(game.presses(), 2);
        assert_eq!(
            dispatcher.phase(),
            JumpPhase::Armed {
                code: InputCode::Up,
                release_at: t0 + ms(600)
            }
        );
    }

    #[test]
    fn test_start_ignores_jump_guard() {
        let game = Recorder::default();
        let mut dispatcher = dispatcher();
        let t0 = Instant::now();

        dispatcher.dispatch(&game, Action::Jump, t0);
        dispatcher.press_start(&game, t0 + ms(10));
        assert!(dispatcher.start_pending());
        assert_eq!(dispatcher.next_deadline(), Some(t0 + ms(100)));

        dispatcher.poll(&game, t0 + ms(100));
        assert!(dispatcher.start_pending());

        dispatcher.poll(&game, t0 + ms(310));
        assert!(!dispatcher.start_pending());
        assert_eq!(
            game.events(),
            vec![
                Event::Press(InputCode::Up),
                Event::Press(InputCode::Space),
                Event::Release(InputCode::Up),
                Event::Release(InputCode::Space),
            ]
        );
    }

    #[test]
    fn test_cooldown_survives_start_press() {
        let game = Recorder::default();
        let mut dispatcher = dispatcher();
        let t0 = Instant::now();

        dispatcher.dispatch(&game, Action::Jump, t0);
        // Restart pressed while the jump key is still down
        dispatcher.press_start(&game, t0 + ms(50));

        dispatcher.poll(&game, t0 + ms(100));
        assert_eq!(
            dispatcher.phase(),
            JumpPhase::Cooling {
                idle_at: t0 + ms(500)
            }
        );

        dispatcher.poll(&game, t0 + ms(350));
        assert!(!dispatcher.start_pending());
        assert!(dispatcher.in_flight());

        dispatcher.poll(&game, t0 + ms(499));
        assert!(dispatcher.in_flight());
        dispatcher.poll(&game, t0 + ms(500));
        assert!(!dispatcher.in_flight());
        assert_eq!(game.presses(), 2);
    }

    #[test]
    fn test_release_all_lets_go_of_held_keys() {
        let game = Recorder::default();
        let mut dispatcher = dispatcher();
        let t0 = Instant::now();

        dispatcher.press_start(&game, t0);
        dispatcher.dispatch(&game, Action::Jump, t0);
        dispatcher.release_all(&game);

        assert_eq!(
            game.events(),
            vec![
                Event::Press(InputCode::Space),
                Event::Press(InputCode::Up),
                Event::Release(InputCode::Space),
                Event::Release(InputCode::Up),
            ]
        );
        assert!(!dispatcher.start_pending());
        assert_eq!(dispatcher.phase(), JumpPhase::Idle);
        assert_eq!(dispatcher.next_deadline(), None);

        // Nothing left to release
        dispatcher.release_all(&game);
        assert_eq!(game.events().len(), 4);
    }
}
