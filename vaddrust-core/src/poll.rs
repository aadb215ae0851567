//! Status polling
//!
//! After login the session walks [`POLL_COMMANDS`] once, one entry per
//! shell prompt, to seed the camera state. Afterwards a timer rotates
//! through the same list, or only asks for standby while the camera sleeps.

use crate::constants::{POLL_COMMANDS, STANDBY_QUERY};

/// Outcome of a catch-up step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatchUp {
    /// Send this query and wait for the next prompt
    Send(&'static str),

    /// The list is exhausted
    Done,
}

#[derive(Debug)]
pub struct PollScheduler {
    catch_up: bool,
    last_index: isize,
}

impl PollScheduler {
    pub fn new() -> Self {
        Self {
            catch_up: false,
            last_index: -1,
        }
    }

    /// Whether the post-login sequence is running
    pub fn is_catching_up(&self) -> bool {
        self.catch_up
    }

    /// Index of the last query sent, -1 before catch-up starts
    pub fn last_index(&self) -> isize {
        self.last_index
    }

    pub fn begin_catch_up(&mut self) {
        self.catch_up = true;
        self.last_index = -1;
    }

    /// Advance the catch-up sequence on a shell prompt
    pub fn next_catch_up(&mut self) -> CatchUp {
        let next = self.last_index + 1;

        match usize::try_from(next).ok().and_then(|i| POLL_COMMANDS.get(i)) {
            Some(&cmd) => {
                self.last_index = next;
                CatchUp::Send(cmd)
            }
            None => {
                self.catch_up = false;
                CatchUp::Done
            }
        }
    }

    /// Query for one timer tick
    ///
    /// An awake camera gets the next list entry, wrapping to the start.
    /// Otherwise the rotation pauses and only standby is checked.
    pub fn tick(&mut self, awake: bool) -> &'static str {
        if !awake {
            return STANDBY_QUERY;
        }

        let next = usize::try_from(self.last_index + 1)
            .ok()
            .filter(|&i| i < POLL_COMMANDS.len())
            .unwrap_or(0);

        self.last_index = next as isize;
        POLL_COMMANDS[next]
    }
}

impl Default for PollScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_catch_up_walks_list_once() {
        let mut poll = PollScheduler::new();
        poll.begin_catch_up();

        let mut sent = Vec::new();
        while let CatchUp::Send(cmd) = poll.next_catch_up() {
            sent.push(cmd);
        }

        assert_eq!(sent, POLL_COMMANDS.to_vec());
        assert!(!poll.is_catching_up());
        assert_eq!(poll.last_index(), 4);
    }

    #[test]
    fn test_tick_rotates_and_wraps() {
        let mut poll = PollScheduler::new();
        poll.begin_catch_up();
        while poll.next_catch_up() != CatchUp::Done {}

        let ticks: Vec<_> = (0..7).map(|_| poll.tick(true)).collect();

        assert_eq!(
            ticks,
            vec![
                "camera standby get",
                "camera focus mode get",
                "camera ccu get all",
                "camera led get",
                "video mute get",
                "camera standby get",
                "camera focus mode get",
            ]
        );
    }

    #[test]
    fn test_tick_in_standby_only_checks_standby() {
        let mut poll = PollScheduler::new();
        poll.tick(true);
        poll.tick(true);

        for _ in 0..20 {
            assert_eq!(poll.tick(false), STANDBY_QUERY);
        }

        // rotation resumes where it paused
        assert_eq!(poll.tick(true), "camera ccu get all");
    }
}
