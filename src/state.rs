use crate::hardware::SimulatedPanel;
use crate::protocol::ServerMessage;
use crate::runtime::Command;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

/// Handles shared by the HTTP and WebSocket handlers.
///
/// Handlers never touch the game directly: start requests go through the
/// command queue, and only the game loop consumes it.
#[derive(Clone)]
pub struct AppState {
    /// Broadcast channel for sending events to all viewers
    pub broadcast: broadcast::Sender<ServerMessage>,
    /// Queue of commands for the game loop
    pub commands: mpsc::UnboundedSender<Command>,
    pub panel: Arc<SimulatedPanel>,
}

impl AppState {
    /// Create the shared state and the receiving end of the command queue
    pub fn new(
        broadcast_capacity: usize,
        panel: Arc<SimulatedPanel>,
    ) -> (Self, mpsc::UnboundedReceiver<Command>) {
        let (tx, _rx) = broadcast::channel(broadcast_capacity);
        let (commands, commands_rx) = mpsc::unbounded_channel();
        let state = Self {
            broadcast: tx,
            commands,
            panel,
        };
        (state, commands_rx)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServerMessage> {
        self.broadcast.subscribe()
    }

    pub fn viewer_count(&self) -> usize {
        self.broadcast.receiver_count()
    }

    /// Queue a start request for the next poll cycle.
    ///
    /// Returns false if the game loop is no longer running.
    pub fn request_start(&self, name: String) -> bool {
        self.commands.send(Command::StartTest { name }).is_ok()
    }
}
