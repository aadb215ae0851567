//! Outbound command gate
//!
//! The shell gives no acknowledgement other than printing its prompt
//! again, so at most one command may be outstanding. Requests made while
//! the gate is closed collapse into a single pending slot: the most recent
//! request wins and earlier ones are dropped.

use tracing::debug;

use crate::constants::CRLF;

#[derive(Debug, Default)]
pub struct Dispatcher {
    ok_to_send: bool,
    pending: Option<String>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the next request goes straight to the wire
    pub fn ok_to_send(&self) -> bool {
        self.ok_to_send
    }

    /// Command waiting for the gate to open
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Mark the shell as ready for input
    pub fn open(&mut self) {
        self.ok_to_send = true;
    }

    /// Request `cmd`, returning the wire text if it should be sent now
    ///
    /// With the gate closed a non-empty `cmd` replaces whatever was pending.
    /// With the gate open, `cmd` (or the pending command when `cmd` is
    /// empty) is released and the gate closes behind it.
    pub fn request(&mut self, cmd: &str) -> Option<String> {
        if !self.ok_to_send {
            if !cmd.is_empty() {
                if let Some(dropped) = self.pending.replace(cmd.to_string()) {
                    debug!("pending command {:?} replaced by {:?}", dropped, cmd);
                }
            }
            return None;
        }

        let pending = self.pending.take();
        let cmd = if cmd.is_empty() {
            pending?
        } else {
            cmd.to_string()
        };

        self.ok_to_send = false;
        debug!("sending {:?}", cmd);

        Some(format!("{}{}", cmd, CRLF))
    }

    /// Release the pending command if the gate is open
    pub fn flush(&mut self) -> Option<String> {
        self.request("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_closed_gate_parks_command() {
        let mut dispatcher = Dispatcher::new();

        assert_eq!(dispatcher.request("camera home"), None);
        assert_eq!(dispatcher.pending(), Some("camera home"));
        assert!(!dispatcher.ok_to_send());
    }

    #[test]
    fn test_open_gate_sends_and_closes() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.open();

        assert_eq!(dispatcher.request("camera home").as_deref(), Some("camera home\r\n"));
        assert!(!dispatcher.ok_to_send());
        assert_eq!(dispatcher.request("camera pan stop"), None);
        assert_eq!(dispatcher.pending(), Some("camera pan stop"));
    }

    #[test]
    fn test_flush_releases_pending() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.request("camera led get");
        dispatcher.open();

        assert_eq!(dispatcher.flush().as_deref(), Some("camera led get\r\n"));
        assert_eq!(dispatcher.pending(), None);
        assert!(!dispatcher.ok_to_send());
    }

    #[test]
    fn test_flush_without_pending_keeps_gate_open() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.open();

        assert_eq!(dispatcher.flush(), None);
        assert!(dispatcher.ok_to_send());
    }

    #[test]
    fn test_explicit_command_clears_stale_pending() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.request("camera led get");
        dispatcher.open();

        assert_eq!(dispatcher.request("camera home").as_deref(), Some("camera home\r\n"));
        assert_eq!(dispatcher.pending(), None);
    }

    #[test]
    fn test_empty_request_does_not_clear_pending() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.request("camera home");

        assert_eq!(dispatcher.request(""), None);
        assert_eq!(dispatcher.pending(), Some("camera home"));
    }

    proptest! {
        #[test]
        fn prop_burst_collapses_to_last(burst in proptest::collection::vec("[a-z ]{1,20}", 1..10)) {
            let mut dispatcher = Dispatcher::new();

            for cmd in &burst {
                prop_assert_eq!(dispatcher.request(cmd), None);
            }

            dispatcher.open();
            let sent = dispatcher.flush();
            let expected = format!("{}\r\n", burst.last().unwrap());
            prop_assert_eq!(sent, Some(expected));

            // nothing left over for the next prompt
            dispatcher.open();
            prop_assert_eq!(dispatcher.flush(), None);
        }
    }
}
