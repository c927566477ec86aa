use crate::game::InputCode;

/// What a key event means for the runner at a given moment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Start,
    Jump,
    EndJump,
    Restart,
    None,
}

/// Coarse run status the key mapping depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Idle,
    Playing,
    Crashed,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_down(&self, key_code: u32, status: RunStatus) -> KeyAction {
        match (InputCode::from_key_code(key_code), status) {
            (Some(InputCode::Space), RunStatus::Idle) => KeyAction::Start,
            (Some(_), RunStatus::Playing) => KeyAction::Jump,
            // Crashed runs restart on key release, not on press
            _ => KeyAction::None,
        }
    }

    pub fn handle_key_up(&self, key_code: u32, status: RunStatus) -> KeyAction {
        match (InputCode::from_key_code(key_code), status) {
            (Some(_), RunStatus::Crashed) => KeyAction::Restart,
            (Some(_), RunStatus::Playing) => KeyAction::EndJump,
            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
