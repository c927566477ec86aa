/// Axis-aligned box in track coordinates (y grows downwards)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check if two boxes overlap
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// Kind of obstacle on the track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObstacleKind {
    CactusSmall,
    CactusLarge,
    Pterodactyl,
}

impl ObstacleKind {
    /// Width and height of the obstacle box
    pub fn size(&self) -> (f64, f64) {
        match self {
            ObstacleKind::CactusSmall => (17.0, 35.0),
            ObstacleKind::CactusLarge => (25.0, 50.0),
            ObstacleKind::Pterodactyl => (46.0, 40.0),
        }
    }

    /// Possible vertical positions; ground obstacles have exactly one
    pub fn y_positions(&self) -> &'static [f64] {
        match self {
            ObstacleKind::CactusSmall => &[105.0],
            ObstacleKind::CactusLarge => &[90.0],
            ObstacleKind::Pterodactyl => &[100.0, 75.0, 50.0],
        }
    }

    /// Extra speed on top of the track speed
    pub fn speed_offset(&self) -> f64 {
        match self {
            ObstacleKind::Pterodactyl => 0.8,
            _ => 0.0,
        }
    }

    /// Flying enemies, as opposed to ground obstacles
    pub fn is_flying(&self) -> bool {
        matches!(self, ObstacleKind::Pterodactyl)
    }
}

/// An obstacle moving towards the trex
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub x: f64,
    pub y: f64,
    /// Free track required behind this obstacle before the next spawn
    pub gap: f64,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, x: f64, y: f64, gap: f64) -> Self {
        Self { kind, x, y, gap }
    }

    pub fn bounds(&self) -> Rect {
        let (width, height) = self.kind.size();
        Rect::new(self.x, self.y, width, height)
    }

    /// Right edge of the obstacle
    pub fn right(&self) -> f64 {
        self.x + self.kind.size().0
    }
}

/// The player character
#[derive(Debug, Clone, PartialEq)]
pub struct Trex {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub ground_y: f64,
    /// Vertical velocity, negative while rising
    pub velocity: f64,
    pub jumping: bool,
}

impl Trex {
    pub fn new(x: f64, ground_y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y: ground_y,
            width,
            height,
            ground_y,
            velocity: 0.0,
            jumping: false,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn on_ground(&self) -> bool {
        !self.jumping
    }

    pub fn start_jump(&mut self, velocity: f64) {
        if self.on_ground() {
            self.jumping = true;
            self.velocity = velocity;
        }
    }

    /// Cut a jump short when the key is released early
    pub fn end_jump(&mut self, drop_velocity: f64) {
        if self.jumping && self.velocity < drop_velocity {
            self.velocity = drop_velocity;
        }
    }

    /// Advance the jump by one frame
    pub fn update(&mut self, gravity: f64) {
        if !self.jumping {
            return;
        }

        self.y += self.velocity;
        self.velocity += gravity;

        if self.y >= self.ground_y {
            self.y = self.ground_y;
            self.velocity = 0.0;
            self.jumping = false;
        }
    }
}

/// Complete runner state
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerState {
    pub trex: Trex,
    /// Obstacles ordered from nearest to farthest
    pub obstacles: Vec<Obstacle>,
    pub current_speed: f64,
    pub distance_ran: f64,
    /// Frames simulated since the current run started
    pub frames: u32,
    pub playing: bool,
    pub crashed: bool,
}

impl RunnerState {
    pub fn new(trex: Trex, initial_speed: f64) -> Self {
        Self {
            trex,
            obstacles: Vec::new(),
            current_speed: initial_speed,
            distance_ran: 0.0,
            frames: 0,
            playing: false,
            crashed: false,
        }
    }

    /// Nearest obstacle, which may already be level with the trex
    pub fn next_obstacle(&self) -> Option<&Obstacle> {
        self.obstacles.first()
    }
}
