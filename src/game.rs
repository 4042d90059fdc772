//! Reaction test state machine
//!
//! Idle/Finished --start--> ArmedWaiting --delay elapsed--> Lit --press--> Finished
//!                                       \--press (early)--> Finished
//!
//! One instance owns the only session. It is advanced by `tick` once per poll
//! cycle, and each tick performs at most one transition. The bound is per
//! `tick` only: a start applied in the same cycle happens before the tick, so
//! a cycle can both arm and then light or abort the attempt.

use crate::edge::{Edge, EdgeDetector};
use crate::hardware::{DelaySource, Indicator};
use crate::leaderboard::Leaderboard;
use crate::protocol::ServerMessage;
use crate::types::{DelayRange, Millis, TestState};

/// The single attempt in progress (or the last one)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub state: TestState,
    pub player_name: String,
    pub armed_at: Millis,
    pub delay: Millis,
    /// Set only while `Lit`, and kept after a successful finish
    pub lit_at: Option<Millis>,
    /// Set only after a successful finish
    pub reaction_time: Option<Millis>,
}

impl Session {
    fn idle() -> Self {
        Self {
            state: TestState::Idle,
            player_name: String::new(),
            armed_at: 0,
            delay: 0,
            lit_at: None,
            reaction_time: None,
        }
    }
}

/// Result of a start request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Armed { delay: Millis },
    /// An attempt is already running; nothing changed
    Ignored { state: TestState },
}

pub struct ReactionGame<I, D> {
    session: Session,
    leaderboard: Leaderboard,
    trigger: EdgeDetector,
    indicator: I,
    delays: D,
    delay_range: DelayRange,
}

impl<I: Indicator, D: DelaySource> ReactionGame<I, D> {
    pub fn new(indicator: I, delays: D, delay_range: DelayRange, leaderboard_size: usize) -> Self {
        debug_assert!(
            delay_range.min <= delay_range.max,
            "delay range {}..={} is empty",
            delay_range.min,
            delay_range.max
        );
        indicator.set_lit(false);
        Self {
            session: Session::idle(),
            leaderboard: Leaderboard::new(leaderboard_size),
            // Pull-up: the trigger reads released until proven otherwise
            trigger: EdgeDetector::new(false),
            indicator,
            delays,
            delay_range,
        }
    }

    pub fn state(&self) -> TestState {
        self.session.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    /// Arm a new attempt for `name` if none is running
    pub fn request_start(&mut self, name: &str, now: Millis) -> StartOutcome {
        let state = self.session.state;
        if !state.accepts_start() {
            tracing::debug!(
                "Ignoring start request from {} while attempt is {:?}",
                name,
                state
            );
            return StartOutcome::Ignored { state };
        }

        let delay = self
            .delays
            .sample_delay(self.delay_range.min, self.delay_range.max);
        self.indicator.set_lit(false);
        self.session = Session {
            state: TestState::ArmedWaiting,
            player_name: name.to_string(),
            armed_at: now,
            delay,
            lit_at: None,
            reaction_time: None,
        };

        tracing::info!("Attempt armed for {} with {} ms delay", name, delay);
        StartOutcome::Armed { delay }
    }

    /// Advance one poll cycle with the current trigger sample.
    ///
    /// Returns the events to broadcast, in order.
    pub fn tick(&mut self, now: Millis, pressed: bool) -> Vec<ServerMessage> {
        // Edge memory is updated in every state so a press held across
        // arming is not counted as a new press.
        let press = self.trigger.update(pressed) == Edge::Rising;

        match self.session.state {
            TestState::Idle | TestState::Finished => Vec::new(),

            TestState::ArmedWaiting => {
                if press {
                    self.session.state = TestState::Finished;
                    tracing::info!(
                        "Early press by {} after {} ms, attempt aborted",
                        self.session.player_name,
                        now.saturating_sub(self.session.armed_at)
                    );
                    return vec![ServerMessage::early_press()];
                }

                if now.saturating_sub(self.session.armed_at) >= self.session.delay {
                    self.indicator.set_lit(true);
                    self.session.lit_at = Some(now);
                    self.session.state = TestState::Lit;
                    tracing::info!("Indicator lit for {}", self.session.player_name);
                }
                Vec::new()
            }

            TestState::Lit => {
                if !press {
                    return Vec::new();
                }

                let lit_at = self.session.lit_at.unwrap_or(now);
                let reaction_time = now.saturating_sub(lit_at);
                self.indicator.set_lit(false);
                self.session.reaction_time = Some(reaction_time);
                self.session.state = TestState::Finished;

                tracing::info!(
                    "{} reacted in {} ms",
                    self.session.player_name,
                    reaction_time
                );

                self.leaderboard
                    .record_score(self.session.player_name.clone(), reaction_time);

                vec![
                    ServerMessage::ReactionResult {
                        time: reaction_time,
                    },
                    ServerMessage::Leaderboard {
                        scores: self.leaderboard.snapshot(),
                    },
                ]
            }
        }
    }
}
