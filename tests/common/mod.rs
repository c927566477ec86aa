//! Test doubles shared by the integration tests
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;
use dino_bridge::bridge::{
    AgentChannel, ChannelState, GameCollaborator, GameSnapshot, MemoryChannel, ObstacleView,
};
use dino_bridge::game::{InputCode, ObstacleKind};
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Press(InputCode),
    Release(InputCode),
}

struct Script {
    snapshot: RefCell<Option<GameSnapshot>>,
    terminal: Cell<bool>,
    running: Cell<bool>,
    distance: Cell<f64>,
    events: RefCell<Vec<(Instant, Event)>>,
    silenced: Cell<usize>,
}

/// Game whose every field is set by the test
///
/// Clones share state, so the test keeps one handle while the loop owns
/// another. Releasing Space on a crashed game restarts it from distance 0.
#[derive(Clone)]
pub struct ScriptedGame {
    script: Rc<Script>,
}

impl ScriptedGame {
    /// A running game with one ground obstacle 200 px ahead
    pub fn running() -> Self {
        Self {
            script: Rc::new(Script {
                snapshot: RefCell::new(Some(ground_ahead(200.0))),
                terminal: Cell::new(false),
                running: Cell::new(true),
                distance: Cell::new(0.0),
                events: RefCell::new(Vec::new()),
                silenced: Cell::new(0),
            }),
        }
    }

    pub fn idle() -> Self {
        let game = Self::running();
        game.script.running.set(false);
        game
    }

    /// Game instance not created yet
    pub fn absent() -> Self {
        let game = Self::running();
        game.set_snapshot(None);
        game
    }

    pub fn set_snapshot(&self, snapshot: Option<GameSnapshot>) {
        *self.script.snapshot.borrow_mut() = snapshot;
    }

    pub fn set_distance(&self, distance: f64) {
        self.script.distance.set(distance);
    }

    pub fn crash(&self) {
        self.script.terminal.set(true);
        self.script.running.set(false);
    }

    pub fn events(&self) -> Vec<Event> {
        self.script.events.borrow().iter().map(|(_, e)| *e).collect()
    }

    pub fn timed_events(&self) -> Vec<(Instant, Event)> {
        self.script.events.borrow().clone()
    }

    pub fn presses(&self, code: InputCode) -> usize {
        self.events()
            .iter()
            .filter(|e| **e == Event::Press(code))
            .count()
    }

    pub fn silenced(&self) -> usize {
        self.script.silenced.get()
    }
}

impl GameCollaborator for ScriptedGame {
    fn query_state(&self) -> Option<GameSnapshot> {
        self.script.snapshot.borrow().clone()
    }

    fn is_terminal(&self) -> bool {
        self.script.terminal.get()
    }

    fn is_running(&self) -> bool {
        self.script.running.get()
    }

    fn distance_traveled(&self) -> f64 {
        self.script.distance.get()
    }

    fn press_input(&self, code: InputCode) {
        self.script
            .events
            .borrow_mut()
            .push((Instant::now(), Event::Press(code)));
        if code == InputCode::Space && !self.is_terminal() {
            self.script.running.set(true);
        }
    }

    fn release_input(&self, code: InputCode) {
        self.script
            .events
            .borrow_mut()
            .push((Instant::now(), Event::Release(code)));
        if code == InputCode::Space && self.is_terminal() {
            self.script.terminal.set(false);
            self.script.running.set(true);
            self.script.distance.set(0.0);
        }
    }

    fn silence_audio(&self) {
        self.script.silenced.set(self.script.silenced.get() + 1);
    }
}

pub fn ground_ahead(x: f64) -> GameSnapshot {
    GameSnapshot {
        obstacles: vec![ObstacleView {
            x,
            y: 105.0,
            kind: ObstacleKind::CactusSmall,
        }],
        speed: 6.0,
    }
}

/// Memory channel that reports `Connecting` until `open_at`
pub struct GatedChannel {
    inner: MemoryChannel,
    open_at: Instant,
}

impl GatedChannel {
    pub fn new(inner: MemoryChannel, delay: Duration) -> Self {
        Self {
            inner,
            open_at: Instant::now() + delay,
        }
    }
}

impl AgentChannel for GatedChannel {
    fn state(&self) -> ChannelState {
        if Instant::now() < self.open_at {
            ChannelState::Connecting
        } else {
            self.inner.state()
        }
    }

    async fn send_text(&mut self, text: String) -> Result<()> {
        self.inner.send_text(text).await
    }

    async fn recv_text(&mut self) -> Option<String> {
        self.inner.recv_text().await
    }
}

pub fn action(label: &str) -> String {
    format!(r#"{{"action":"{label}"}}"#)
}
