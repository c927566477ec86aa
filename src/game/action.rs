use std::fmt;

/// Physical key the runner listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputCode {
    /// Arrow up, used for jumps
    Up,
    /// Space bar, used to start or continue a game
    Space,
}

impl InputCode {
    /// Browser-style key code for this input
    pub fn key_code(&self) -> u32 {
        match self {
            InputCode::Up => 38,
            InputCode::Space => 32,
        }
    }

    /// Looks up an input by its key code
    pub fn from_key_code(code: u32) -> Option<Self> {
        match code {
            38 => Some(InputCode::Up),
            32 => Some(InputCode::Space),
            _ => None,
        }
    }
}

/// Action an agent can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    /// Keep running
    #[default]
    None,
    /// Jump over the next obstacle
    Jump,
}

impl Action {
    /// Wire label used by the agent protocol
    pub fn label(&self) -> &'static str {
        match self {
            Action::None => "none",
            Action::Jump => "jump",
        }
    }

    /// Parses a wire label; anything unrecognised is `None`
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "none" => Some(Action::None),
            "jump" => Some(Action::Jump),
            _ => None,
        }
    }

    /// Input pressed to carry out this action, if any
    pub fn input(&self) -> Option<InputCode> {
        match self {
            Action::None => None,
            Action::Jump => Some(InputCode::Up),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
