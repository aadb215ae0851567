//! Line framing for the camera's telnet shell
//!
//! The shell terminates replies with `\n`, but its prompts (`login:`,
//! `Password:` and the `>` shell prompt) are never newline terminated.
//! The framer therefore returns every complete line, keeps the
//! unterminated tail for the next chunk, and sniffs that tail for a prompt.

use bytes::BytesMut;
use tracing::trace;

use crate::constants::{LOGIN_PROMPT, PASSWORD_PROMPT, SHELL_PROMPT};

/// Prompt recognized in the unterminated tail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    /// `login:` - the shell wants the username
    Username,

    /// `password:` - the shell wants the password
    Password,

    /// `>` - the shell is ready for the next command
    Ready,
}

/// Result of feeding one chunk
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Framed {
    /// Complete lines, without the `\n`
    pub lines: Vec<String>,

    /// Prompt found in the tail after the lines were taken
    pub prompt: Option<Prompt>,
}

/// Incremental line decoder
#[derive(Debug, Default)]
pub struct LineFramer {
    buffer: BytesMut,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unterminated bytes carried over to the next chunk
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }

    /// Append a chunk and extract what it completes
    ///
    /// Lines are decoded only once their `\n` has arrived, so a UTF-8
    /// sequence split across chunks is never mangled.
    pub fn feed(&mut self, chunk: &[u8]) -> Framed {
        // The carried tail has no newline, only the new bytes need scanning
        let mut offset = self.buffer.len();
        self.buffer.extend_from_slice(chunk);

        let mut framed = Framed::default();

        while let Some(pos) = self.buffer[offset..].iter().position(|&b| b == b'\n') {
            let line = self.buffer.split_to(offset + pos + 1);
            let text = String::from_utf8_lossy(&line[..line.len() - 1]).into_owned();
            trace!("line: {:?}", text);
            framed.lines.push(text);
            offset = 0;
        }

        framed.prompt = detect_prompt(&self.buffer);

        if let Some(prompt) = framed.prompt {
            trace!("prompt {:?} in tail {:?}", prompt, String::from_utf8_lossy(&self.buffer));
            self.buffer.clear();
        }

        framed
    }
}

/// Check the tail for a prompt, `login:` first, then `password:`, then `>`
pub fn detect_prompt(tail: &[u8]) -> Option<Prompt> {
    if tail.is_empty() {
        return None;
    }

    let lowered = tail.to_ascii_lowercase();

    if contains(&lowered, LOGIN_PROMPT) {
        Some(Prompt::Username)
    } else if contains(&lowered, PASSWORD_PROMPT) {
        Some(Prompt::Password)
    } else if contains(&lowered, SHELL_PROMPT) {
        Some(Prompt::Ready)
    } else {
        None
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_complete_lines() {
        let mut framer = LineFramer::new();
        let framed = framer.feed(b"gain 6\r\nred_gain 128\r\n");

        assert_eq!(framed.lines, vec!["gain 6\r", "red_gain 128\r"]);
        assert_eq!(framed.prompt, None);
        assert!(framer.pending().is_empty());
    }

    #[test]
    fn test_partial_line_carried_over() {
        let mut framer = LineFramer::new();

        let first = framer.feed(b"standby: o");
        assert!(first.lines.is_empty());
        assert_eq!(framer.pending(), b"standby: o");

        let second = framer.feed(b"n\r\n");
        assert_eq!(second.lines, vec!["standby: on\r"]);
        assert!(framer.pending().is_empty());
    }

    #[test]
    fn test_prompt_after_lines() {
        let mut framer = LineFramer::new();
        let framed = framer.feed(b"System Version 2.1 RoboSHOT\r\ncamera> ");

        assert_eq!(framed.lines, vec!["System Version 2.1 RoboSHOT\r"]);
        assert_eq!(framed.prompt, Some(Prompt::Ready));
        assert!(framer.pending().is_empty());
    }

    #[test]
    fn test_prompt_priority() {
        assert_eq!(detect_prompt(b"login: "), Some(Prompt::Username));
        assert_eq!(detect_prompt(b"Login:"), Some(Prompt::Username));
        assert_eq!(detect_prompt(b"Password: "), Some(Prompt::Password));
        assert_eq!(detect_prompt(b"PASSWORD:"), Some(Prompt::Password));
        assert_eq!(detect_prompt(b"camera>"), Some(Prompt::Ready));
        // login wins over the shell marker
        assert_eq!(detect_prompt(b"> login:"), Some(Prompt::Username));
        assert_eq!(detect_prompt(b"password:>"), Some(Prompt::Password));
        assert_eq!(detect_prompt(b"login"), None);
        assert_eq!(detect_prompt(b""), None);
    }

    #[test]
    fn test_unmatched_tail_kept() {
        let mut framer = LineFramer::new();

        assert_eq!(framer.feed(b"came").prompt, None);
        assert_eq!(framer.feed(b"ra>").prompt, Some(Prompt::Ready));
        assert!(framer.pending().is_empty());
    }

    #[test]
    fn test_split_utf8_sequence() {
        let mut framer = LineFramer::new();
        let bytes = "caméra\n".as_bytes();

        // split inside the two-byte 'é'
        assert!(framer.feed(&bytes[..4]).lines.is_empty());
        assert_eq!(framer.feed(&bytes[4..]).lines, vec!["caméra"]);
    }

    proptest! {
        #[test]
        fn prop_line_survives_any_split(
            line in "[a-z0-9_ ]{0,40}",
            cuts in proptest::collection::vec(0usize..=42, 0..6),
        ) {
            let input = format!("{}\r\n", line);
            let bytes = input.as_bytes();

            let mut cuts: Vec<usize> = cuts.into_iter().map(|c| c.min(bytes.len())).collect();
            cuts.push(0);
            cuts.push(bytes.len());
            cuts.sort_unstable();
            cuts.dedup();

            let mut framer = LineFramer::new();
            let mut lines = Vec::new();
            for pair in cuts.windows(2) {
                let framed = framer.feed(&bytes[pair[0]..pair[1]]);
                prop_assert_eq!(framed.prompt, None);
                lines.extend(framed.lines);
            }

            prop_assert_eq!(lines, vec![format!("{}\r", line)]);
            prop_assert!(framer.pending().is_empty());
        }
    }
}
