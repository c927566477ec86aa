//! Per-episode statistics
//!
//! Rolling averages over the most recent episodes: shaped reward, number of
//! signals and distance reached before the crash.

use std::collections::VecDeque;

/// Episode statistics tracker with rolling averages
///
/// # Example
///
/// ```rust
/// use dino_bridge::metrics::EpisodeStats;
///
/// let mut stats = EpisodeStats::new(100);
/// stats.record_episode(-412.5, 87, 640.0);
///
/// println!("{}", stats.format_summary());
/// ```
#[derive(Debug, Clone)]
pub struct EpisodeStats {
    /// Summed rewards per episode (rolling window)
    episode_rewards: VecDeque<f64>,

    /// Signals per episode (rolling window)
    episode_lengths: VecDeque<usize>,

    /// Distance reached per episode (rolling window)
    episode_distances: VecDeque<f64>,

    total_episodes: usize,

    total_steps: usize,

    best_distance: f64,

    window_size: usize,
}

impl EpisodeStats {
    /// Create a tracker keeping the last `window_size` episodes
    pub fn new(window_size: usize) -> Self {
        Self {
            episode_rewards: VecDeque::with_capacity(window_size),
            episode_lengths: VecDeque::with_capacity(window_size),
            episode_distances: VecDeque::with_capacity(window_size),
            total_episodes: 0,
            total_steps: 0,
            best_distance: 0.0,
            window_size,
        }
    }

    /// Record a finished episode
    ///
    /// # Arguments
    ///
    /// * `reward` - Sum of the rewards sent during the episode
    /// * `length` - Number of signals sent during the episode
    /// * `distance` - Distance counter at the crash
    pub fn record_episode(&mut self, reward: f64, length: usize, distance: f64) {
        Self::push_deque(&mut self.episode_rewards, reward, self.window_size);
        Self::push_deque(&mut self.episode_lengths, length, self.window_size);
        Self::push_deque(&mut self.episode_distances, distance, self.window_size);
        self.total_episodes += 1;
        self.total_steps += length;
        if distance > self.best_distance {
            self.best_distance = distance;
        }
    }

    /// Mean episode reward over the window, or 0.0 with no episodes
    pub fn mean_episode_reward(&self) -> f64 {
        Self::mean(&self.episode_rewards)
    }

    pub fn mean_episode_length(&self) -> f64 {
        let sum: usize = self.episode_lengths.iter().sum();
        if self.episode_lengths.is_empty() {
            0.0
        } else {
            sum as f64 / self.episode_lengths.len() as f64
        }
    }

    pub fn mean_distance(&self) -> f64 {
        Self::mean(&self.episode_distances)
    }

    /// Best distance over the whole session, not just the window
    pub fn best_distance(&self) -> f64 {
        self.best_distance
    }

    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// One-line summary of the current statistics
    pub fn format_summary(&self) -> String {
        format!(
            "Episodes: {} | Steps: {} | Reward: {:.2} | Len: {:.1} | Distance: {:.1} | Best: {:.1}",
            self.total_episodes,
            self.total_steps,
            self.mean_episode_reward(),
            self.mean_episode_length(),
            self.mean_distance(),
            self.best_distance,
        )
    }

    fn mean(deque: &VecDeque<f64>) -> f64 {
        if deque.is_empty() {
            0.0
        } else {
            deque.iter().sum::<f64>() / deque.len() as f64
        }
    }

    fn push_deque<T>(deque: &mut VecDeque<T>, value: T, window_size: usize) {
        if deque.len() >= window_size {
            deque.pop_front();
        }
        deque.push_back(value);
    }
}

impl Default for EpisodeStats {
    fn default() -> Self {
        Self::new(100)
    }
}
