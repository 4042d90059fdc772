//! The polling loop.
//!
//! Sole owner of the `ReactionGame`. Every cycle it applies queued commands,
//! samples the trigger once, advances the game and broadcasts what the game
//! emitted before sleeping until the next cycle.

use crate::game::ReactionGame;
use crate::hardware::{Clock, DelaySource, Indicator, TriggerInput};
use crate::protocol::ServerMessage;
use std::ops::ControlFlow;
use std::time::Duration;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Request handed from the channel handlers to the game loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    StartTest { name: String },
}

pub struct GameLoop<C, T, I, D> {
    game: ReactionGame<I, D>,
    clock: C,
    trigger: T,
    commands: mpsc::UnboundedReceiver<Command>,
    events: broadcast::Sender<ServerMessage>,
}

impl<C, T, I, D> GameLoop<C, T, I, D>
where
    C: Clock,
    T: TriggerInput,
    I: Indicator,
    D: DelaySource,
{
    pub fn new(
        game: ReactionGame<I, D>,
        clock: C,
        trigger: T,
        commands: mpsc::UnboundedReceiver<Command>,
        events: broadcast::Sender<ServerMessage>,
    ) -> Self {
        Self {
            game,
            clock,
            trigger,
            commands,
            events,
        }
    }

    pub fn game(&self) -> &ReactionGame<I, D> {
        &self.game
    }

    /// Run one poll cycle.
    ///
    /// Breaks once every command sender is gone and the queue is drained.
    pub fn run_cycle(&mut self) -> ControlFlow<()> {
        loop {
            match self.commands.try_recv() {
                Ok(command) => self.apply(command),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return ControlFlow::Break(()),
            }
        }

        let now = self.clock.now_ms();
        let pressed = self.trigger.is_pressed();
        for event in self.game.tick(now, pressed) {
            self.publish(event);
        }

        ControlFlow::Continue(())
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::StartTest { name } => {
                let now = self.clock.now_ms();
                self.game.request_start(&name, now);
            }
        }
    }

    fn publish(&self, event: ServerMessage) {
        // Ignore send errors (no viewers connected is fine)
        if self.events.send(event).is_err() {
            tracing::debug!("No viewers connected, event dropped");
        }
    }

    /// Poll forever at `poll_interval`, until the command queue closes
    pub async fn run(mut self, poll_interval: Duration) {
        let mut ticker = tokio::time::interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            if self.run_cycle().is_break() {
                tracing::info!("Command queue closed, stopping game loop");
                break;
            }
        }
    }
}

/// Spawn the game loop as a background task
pub fn spawn_game_loop<C, T, I, D>(
    game_loop: GameLoop<C, T, I, D>,
    poll_interval: Duration,
) -> JoinHandle<()>
where
    C: Clock + 'static,
    T: TriggerInput + 'static,
    I: Indicator + 'static,
    D: DelaySource + 'static,
{
    tokio::spawn(game_loop.run(poll_interval))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::SimulatedPanel;
    use crate::types::{DelayRange, Millis, TestState};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct ManualClock(Arc<AtomicU64>);

    impl ManualClock {
        fn set(&self, ms: Millis) {
            self.0.store(ms, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now_ms(&self) -> Millis {
            self.0.load(Ordering::SeqCst)
        }
    }

    struct FixedDelay(Millis);

    impl DelaySource for FixedDelay {
        fn sample_delay(&mut self, _min: Millis, _max: Millis) -> Millis {
            self.0
        }
    }

    type TestLoop = GameLoop<ManualClock, Arc<SimulatedPanel>, Arc<SimulatedPanel>, FixedDelay>;

    fn setup() -> (
        TestLoop,
        ManualClock,
        Arc<SimulatedPanel>,
        mpsc::UnboundedSender<Command>,
        broadcast::Receiver<ServerMessage>,
    ) {
        let panel = Arc::new(SimulatedPanel::new());
        let clock = ManualClock::default();
        let (tx, rx) = mpsc::unbounded_channel();
        let (events, events_rx) = broadcast::channel(16);
        let game = ReactionGame::new(panel.clone(), FixedDelay(5_000), DelayRange::default(), 10);
        let game_loop = GameLoop::new(game, clock.clone(), panel.clone(), rx, events);
        (game_loop, clock, panel, tx, events_rx)
    }

    fn start(name: &str) -> Command {
        Command::StartTest {
            name: name.to_string(),
        }
    }

    #[test]
    fn test_commands_applied_before_sampling() {
        let (mut game_loop, clock, _panel, tx, _rx) = setup();
        clock.set(100);
        tx.send(start("Ada")).unwrap();

        assert!(game_loop.run_cycle().is_continue());

        assert_eq!(game_loop.game().state(), TestState::ArmedWaiting);
        assert_eq!(game_loop.game().session().armed_at, 100);
    }

    #[test]
    fn test_second_queued_start_is_ignored() {
        let (mut game_loop, _clock, _panel, tx, _rx) = setup();
        tx.send(start("Ada")).unwrap();
        tx.send(start("Bob")).unwrap();

        assert!(game_loop.run_cycle().is_continue());

        assert_eq!(game_loop.game().session().player_name, "Ada");
    }

    #[test]
    fn test_success_broadcasts_result_then_leaderboard() {
        let (mut game_loop, clock, panel, tx, mut rx) = setup();
        tx.send(start("Ada")).unwrap();
        assert!(game_loop.run_cycle().is_continue());

        clock.set(5_000);
        assert!(game_loop.run_cycle().is_continue());
        assert!(panel.is_lit());

        clock.set(5_180);
        panel.press();
        assert!(game_loop.run_cycle().is_continue());

        assert_eq!(
            rx.try_recv().unwrap(),
            ServerMessage::ReactionResult { time: 180 }
        );
        match rx.try_recv().unwrap() {
            ServerMessage::Leaderboard { scores } => {
                assert_eq!(scores.len(), 1);
                assert_eq!(scores[0].name, "Ada");
                assert_eq!(scores[0].time, 180);
            }
            other => panic!("Expected leaderboard, got {:?}", other),
        }
        assert!(rx.try_recv().is_err());
        assert!(!panel.is_lit());
    }

    #[test]
    fn test_early_press_broadcasts_error() {
        let (mut game_loop, clock, panel, tx, mut rx) = setup();
        tx.send(start("Ada")).unwrap();
        assert!(game_loop.run_cycle().is_continue());

        clock.set(2_000);
        panel.press();
        assert!(game_loop.run_cycle().is_continue());

        assert_eq!(rx.try_recv().unwrap(), ServerMessage::early_press());
        assert_eq!(game_loop.game().state(), TestState::Finished);
        assert!(game_loop.game().leaderboard().is_empty());
    }

    #[test]
    fn test_start_and_press_in_same_cycle_aborts() {
        let (mut game_loop, _clock, panel, tx, mut rx) = setup();
        tx.send(start("Ada")).unwrap();
        panel.press();

        assert!(game_loop.run_cycle().is_continue());

        assert_eq!(game_loop.game().state(), TestState::Finished);
        assert_eq!(rx.try_recv().unwrap(), ServerMessage::early_press());
    }

    #[test]
    fn test_no_viewers_is_not_an_error() {
        let (mut game_loop, clock, panel, tx, rx) = setup();
        drop(rx);
        tx.send(start("Ada")).unwrap();
        assert!(game_loop.run_cycle().is_continue());
        clock.set(1);
        panel.press();

        assert!(game_loop.run_cycle().is_continue());
        assert_eq!(game_loop.game().state(), TestState::Finished);
    }

    #[test]
    fn test_drains_queue_before_stopping() {
        let (mut game_loop, _clock, _panel, tx, _rx) = setup();
        tx.send(start("Ada")).unwrap();
        drop(tx);

        assert!(game_loop.run_cycle().is_break());
        assert_eq!(game_loop.game().state(), TestState::ArmedWaiting);
    }

    #[tokio::test]
    async fn test_spawned_loop_stops_when_queue_closes() {
        let (game_loop, _clock, _panel, tx, _rx) = setup();
        let handle = spawn_game_loop(game_loop, Duration::from_millis(1));

        drop(tx);

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("game loop did not stop")
            .unwrap();
    }
}
