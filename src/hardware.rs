//! Hardware boundary: clock, random delay, trigger input and indicator output.
//!
//! The game only sees these traits. `SimulatedPanel` stands in for the two
//! GPIO pins so the service runs on any host; the trigger is modelled as an
//! active-low pin with a pull-up, so the released level is high.

use crate::types::Millis;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Monotonic millisecond time source
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> Millis;
}

/// Source of the randomized arming delay
pub trait DelaySource: Send {
    /// Sample a delay uniformly from `min..=max`
    fn sample_delay(&mut self, min: Millis, max: Millis) -> Millis;
}

/// Logical trigger state, already resolved from the pin level
pub trait TriggerInput: Send + Sync {
    fn is_pressed(&self) -> bool;
}

pub trait Indicator: Send + Sync {
    fn set_lit(&self, lit: bool);
}

impl<T: TriggerInput + ?Sized> TriggerInput for Arc<T> {
    fn is_pressed(&self) -> bool {
        (**self).is_pressed()
    }
}

impl<T: Indicator + ?Sized> Indicator for Arc<T> {
    fn set_lit(&self, lit: bool) {
        (**self).set_lit(lit)
    }
}

/// Clock counting from process start
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> Millis {
        self.origin.elapsed().as_millis() as Millis
    }
}

/// Uniform random delay
#[derive(Debug, Clone)]
pub struct RandomDelay {
    rng: StdRng,
}

impl RandomDelay {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic sequence, for reproducible runs
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl DelaySource for RandomDelay {
    fn sample_delay(&mut self, min: Millis, max: Millis) -> Millis {
        self.rng.random_range(min..=max)
    }
}

/// In-process stand-in for the trigger and indicator pins
#[derive(Debug)]
pub struct SimulatedPanel {
    /// Raw trigger pin level; high means released
    trigger_level: AtomicBool,
    lit: AtomicBool,
}

impl SimulatedPanel {
    pub fn new() -> Self {
        Self {
            trigger_level: AtomicBool::new(true),
            lit: AtomicBool::new(false),
        }
    }

    /// Pull the trigger pin low
    pub fn press(&self) {
        self.trigger_level.store(false, Ordering::SeqCst);
    }

    /// Let the pull-up bring the trigger pin back high
    pub fn release(&self) {
        self.trigger_level.store(true, Ordering::SeqCst);
    }

    pub fn trigger_level_high(&self) -> bool {
        self.trigger_level.load(Ordering::SeqCst)
    }

    pub fn is_lit(&self) -> bool {
        self.lit.load(Ordering::SeqCst)
    }
}

impl Default for SimulatedPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl TriggerInput for SimulatedPanel {
    fn is_pressed(&self) -> bool {
        // Active low
        !self.trigger_level_high()
    }
}

impl Indicator for SimulatedPanel {
    fn set_lit(&self, lit: bool) {
        let was = self.lit.swap(lit, Ordering::SeqCst);
        if was != lit {
            tracing::debug!("Indicator {}", if lit { "on" } else { "off" });
        }
    }
}
