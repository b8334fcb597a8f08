//! What the pet says.
//!
//! Two sources of messages race for the speech bubble: celebrations fired by
//! completing work, and an ambient message picked on a fixed interval from the
//! pet's health and the state of the assignment list. Whichever wrote last is
//! shown.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

use crate::task::{Assignment, AssignmentStatus};

const ASSIGNMENT_CHEERS: &[&str] = &["Great job!", "You're on a roll!", "Awesome work!", "Keep it up!"];
const GOAL_CHEERS: &[&str] = &["Nice one!", "Goal achieved!", "Every little bit helps!"];

const UNWELL_LINES: &[&str] = &[
    "I'm not feeling so good...",
    "We need to finish some tasks!",
    "My health is low!",
];
const ALL_DONE_LINES: &[&str] = &["All tasks done! Great work!", "You're amazing! Time to relax."];
const SWAMPED_LINES: &[&str] = &[
    "That's a lot of tasks! Let's do it!",
    "We can handle this!",
    "One step at a time.",
];
const STEADY_LINES: &[&str] = &[
    "You're doing great!",
    "What should we work on next?",
    "Keep the productivity going!",
];

/// Which kind of work was just finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Assignment,
    Goal,
}

/// Pick a celebration line for a newly completed item.
pub fn celebrate<R: Rng + ?Sized>(kind: Completion, rng: &mut R) -> &'static str {
    let lines = match kind {
        Completion::Assignment => ASSIGNMENT_CHEERS,
        Completion::Goal => GOAL_CHEERS,
    };
    pick(lines, rng)
}

/// Thresholds for the ambient mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoodThresholds {
    /// Health strictly below this is `Unwell`.
    pub low_health_below: u8,
    /// More open `ToDo` assignments than this is `Swamped`.
    pub busy_todo_above: usize,
}

impl Default for MoodThresholds {
    fn default() -> Self {
        Self {
            low_health_below: 50,
            busy_todo_above: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Unwell,
    AllDone,
    Swamped,
    Steady,
}

impl Mood {
    /// First matching rule wins. An empty assignment list counts as all done.
    pub fn assess(health: u8, assignments: &[Assignment], thresholds: &MoodThresholds) -> Self {
        if health < thresholds.low_health_below {
            return Mood::Unwell;
        }
        if assignments.iter().all(Assignment::is_completed) {
            return Mood::AllDone;
        }
        let todo = assignments
            .iter()
            .filter(|a| a.status == AssignmentStatus::ToDo)
            .count();
        if todo > thresholds.busy_todo_above {
            Mood::Swamped
        } else {
            Mood::Steady
        }
    }

    pub fn lines(self) -> &'static [&'static str] {
        match self {
            Mood::Unwell => UNWELL_LINES,
            Mood::AllDone => ALL_DONE_LINES,
            Mood::Swamped => SWAMPED_LINES,
            Mood::Steady => STEADY_LINES,
        }
    }

    pub fn pick_line<R: Rng + ?Sized>(self, rng: &mut R) -> &'static str {
        pick(self.lines(), rng)
    }
}

fn pick<R: Rng + ?Sized>(lines: &'static [&'static str], rng: &mut R) -> &'static str {
    lines.choose(rng).copied().unwrap_or("")
}

/// Recurring trigger for ambient messages.
///
/// The first tick arrives one full period after creation and missed ticks are
/// skipped rather than bunched up. Dropping the ticker stops it.
#[derive(Debug)]
pub struct MoodTicker {
    interval: Interval,
}

impl MoodTicker {
    pub fn new(period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }

    pub fn period(&self) -> Duration {
        self.interval.period()
    }

    /// Wait for the next tick. Cancel safe.
    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }
}
