//! Connection lifecycle state machine.
//!
//! Pure: no IO, no async. The service feeds it events and executes whatever
//! command it decides on. The attempt counter spans the whole authenticated
//! session and resets only when the session ends, so a flapping server
//! cannot trigger a reconnect storm.

/// Connection attempts allowed per authenticated session.
pub const MAX_CONNECT_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Disconnected,
    Connecting { attempt: u32 },
    Connected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelEvent {
    /// The service wants a live socket (session became authenticated, or a
    /// previous connection dropped).
    ConnectRequested,
    /// Handshake acknowledged.
    Opened,
    /// Handshake failed.
    ConnectFailed,
    /// An established connection dropped.
    StreamClosed,
    /// Logout; tears down and resets the attempt budget.
    SessionEnded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelCommand {
    OpenSocket { attempt: u32 },
    CloseSocket,
}

#[derive(Debug)]
pub struct RealtimeMachine {
    state: ChannelState,
    attempts: u32,
}

impl RealtimeMachine {
    pub fn new() -> Self {
        Self {
            state: ChannelState::Disconnected,
            attempts: 0,
        }
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ChannelState::Connected
    }

    pub fn attempts_used(&self) -> u32 {
        self.attempts
    }

    /// Process an event and optionally return a command.
    pub fn decide(&mut self, event: &ChannelEvent) -> Option<ChannelCommand> {
        match (self.state, event) {
            (ChannelState::Disconnected, ChannelEvent::ConnectRequested) => {
                if self.attempts >= MAX_CONNECT_ATTEMPTS {
                    // Budget exhausted: stay down until the session cycles.
                    return None;
                }
                self.attempts += 1;
                self.state = ChannelState::Connecting {
                    attempt: self.attempts,
                };
                Some(ChannelCommand::OpenSocket {
                    attempt: self.attempts,
                })
            }
            (ChannelState::Connecting { .. }, ChannelEvent::Opened) => {
                self.state = ChannelState::Connected;
                None
            }
            (ChannelState::Connecting { .. }, ChannelEvent::ConnectFailed) => {
                self.state = ChannelState::Disconnected;
                None
            }
            (ChannelState::Connected, ChannelEvent::StreamClosed) => {
                self.state = ChannelState::Disconnected;
                None
            }
            (_, ChannelEvent::SessionEnded) => {
                let was_up = self.state == ChannelState::Connected;
                self.state = ChannelState::Disconnected;
                self.attempts = 0;
                was_up.then_some(ChannelCommand::CloseSocket)
            }
            // Anything else is a stale or out-of-order event; ignore.
            _ => None,
        }
    }
}

impl Default for RealtimeMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_happy_path() {
        let mut m = RealtimeMachine::new();
        let cmd = m.decide(&ChannelEvent::ConnectRequested);
        assert_eq!(cmd, Some(ChannelCommand::OpenSocket { attempt: 1 }));
        assert_eq!(m.state(), ChannelState::Connecting { attempt: 1 });

        assert_eq!(m.decide(&ChannelEvent::Opened), None);
        assert!(m.is_connected());
    }

    #[test]
    fn attempts_are_capped_at_three() {
        let mut m = RealtimeMachine::new();
        for attempt in 1..=MAX_CONNECT_ATTEMPTS {
            let cmd = m.decide(&ChannelEvent::ConnectRequested);
            assert_eq!(cmd, Some(ChannelCommand::OpenSocket { attempt }));
            m.decide(&ChannelEvent::ConnectFailed);
        }

        // Fourth and later requests are refused.
        assert_eq!(m.decide(&ChannelEvent::ConnectRequested), None);
        assert_eq!(m.decide(&ChannelEvent::ConnectRequested), None);
        assert_eq!(m.attempts_used(), MAX_CONNECT_ATTEMPTS);
    }

    #[test]
    fn dropped_connection_consumes_remaining_budget() {
        let mut m = RealtimeMachine::new();
        m.decide(&ChannelEvent::ConnectRequested);
        m.decide(&ChannelEvent::Opened);

        m.decide(&ChannelEvent::StreamClosed);
        assert_eq!(m.state(), ChannelState::Disconnected);

        // Two attempts remain after the initial successful one.
        assert!(m.decide(&ChannelEvent::ConnectRequested).is_some());
        m.decide(&ChannelEvent::ConnectFailed);
        assert!(m.decide(&ChannelEvent::ConnectRequested).is_some());
        m.decide(&ChannelEvent::ConnectFailed);
        assert_eq!(m.decide(&ChannelEvent::ConnectRequested), None);
    }

    #[test]
    fn session_end_resets_the_counter() {
        let mut m = RealtimeMachine::new();
        for _ in 0..MAX_CONNECT_ATTEMPTS {
            m.decide(&ChannelEvent::ConnectRequested);
            m.decide(&ChannelEvent::ConnectFailed);
        }
        assert_eq!(m.decide(&ChannelEvent::ConnectRequested), None);

        assert_eq!(m.decide(&ChannelEvent::SessionEnded), None);
        assert_eq!(m.attempts_used(), 0);
        assert_eq!(
            m.decide(&ChannelEvent::ConnectRequested),
            Some(ChannelCommand::OpenSocket { attempt: 1 })
        );
    }

    #[test]
    fn session_end_while_connected_closes_the_socket() {
        let mut m = RealtimeMachine::new();
        m.decide(&ChannelEvent::ConnectRequested);
        m.decide(&ChannelEvent::Opened);

        assert_eq!(
            m.decide(&ChannelEvent::SessionEnded),
            Some(ChannelCommand::CloseSocket)
        );
        assert_eq!(m.state(), ChannelState::Disconnected);
    }

    #[test]
    fn stale_events_are_ignored() {
        let mut m = RealtimeMachine::new();
        assert_eq!(m.decide(&ChannelEvent::Opened), None);
        assert_eq!(m.decide(&ChannelEvent::StreamClosed), None);
        assert_eq!(m.state(), ChannelState::Disconnected);
        assert_eq!(m.attempts_used(), 0);
    }
}
