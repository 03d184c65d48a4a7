use std::io;
use std::time::Duration;

const ESC: u8 = 0x1b;

/// How long one idle poll for input may block. This bounds the tick length
/// when no keys are pressed.
pub const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// How long to wait for the byte after an ESC before deciding the ESC stood
/// alone. Arrow keys arrive as `ESC [ A..D` in a single burst, so this is
/// near zero. On a sufficiently laggy channel (e.g. a slow SSH hop) a real
/// arrow sequence can straggle past this window and be read as a lone ESC;
/// that is inherent to timeout-based framing, not something a larger value
/// can fully remove.
pub const SEQ_TIMEOUT: Duration = Duration::from_millis(1);

/// One decoded keypress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Char(u8),
    Backspace,
    Enter,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    /// An ESC with nothing following it within `SEQ_TIMEOUT`.
    EscapeAlone,
    /// Shift+S, the friendly/vim mode toggle. In insert mode the consumer
    /// treats this as the letter it is.
    ToggleMode,
    /// Shift+X, exit without saving. Same insert-mode caveat as above.
    DiscardExit,
    Other(u8),
}

/// Anything that can hand over input bytes with a timeout. The terminal
/// adapter implements this; tests feed scripted bytes.
pub trait ByteSource {
    /// Block up to `timeout` for one byte. `Ok(None)` means no data arrived.
    fn read_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>>;
}

/// Decode exactly one event from the source, consuming as many bytes as the
/// event needs. Returns `Ok(None)` on an idle tick and on unrecognized
/// escape sequences, which are discarded without producing an event.
pub fn next_event<S: ByteSource>(source: &mut S) -> io::Result<Option<InputEvent>> {
    let byte = match source.read_byte(POLL_TIMEOUT)? {
        Some(byte) => byte,
        None => return Ok(None),
    };
    if byte == ESC {
        return decode_escape(source);
    }
    Ok(Some(map_byte(byte)))
}

fn decode_escape<S: ByteSource>(source: &mut S) -> io::Result<Option<InputEvent>> {
    let next = match source.read_byte(SEQ_TIMEOUT)? {
        Some(byte) => byte,
        None => return Ok(Some(InputEvent::EscapeAlone)),
    };
    if next != b'[' {
        return Ok(None);
    }
    let event = match source.read_byte(SEQ_TIMEOUT)? {
        Some(b'A') => Some(InputEvent::ArrowUp),
        Some(b'B') => Some(InputEvent::ArrowDown),
        Some(b'C') => Some(InputEvent::ArrowRight),
        Some(b'D') => Some(InputEvent::ArrowLeft),
        _ => None,
    };
    Ok(event)
}

fn map_byte(byte: u8) -> InputEvent {
    match byte {
        13 => InputEvent::Enter,
        127 | 8 => InputEvent::Backspace,
        b'S' => InputEvent::ToggleMode,
        b'X' => InputEvent::DiscardExit,
        0x20..=0x7e => InputEvent::Char(byte),
        _ => InputEvent::Other(byte),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// A byte source driven by a script: `Some(byte)` delivers a byte,
    /// `None` simulates a read timeout. Exhausting the script also times
    /// out.
    struct Scripted {
        reads: VecDeque<Option<u8>>,
    }

    impl Scripted {
        fn new(reads: &[Option<u8>]) -> Self {
            Self {
                reads: reads.iter().copied().collect(),
            }
        }
    }

    impl ByteSource for Scripted {
        fn read_byte(&mut self, _timeout: Duration) -> io::Result<Option<u8>> {
            Ok(self.reads.pop_front().flatten())
        }
    }

    fn decode_all(reads: &[Option<u8>]) -> Vec<InputEvent> {
        let mut source = Scripted::new(reads);
        let mut events = Vec::new();
        while !source.reads.is_empty() {
            if let Some(event) = next_event(&mut source).unwrap() {
                events.push(event);
            }
        }
        events
    }

    #[test]
    fn test_idle_poll_produces_no_event() {
        let mut source = Scripted::new(&[None]);
        assert_eq!(next_event(&mut source).unwrap(), None);
    }

    #[test]
    fn test_lone_escape_is_escape_alone() {
        let events = decode_all(&[Some(0x1b), None]);
        assert_eq!(events, vec![InputEvent::EscapeAlone]);
    }

    #[test]
    fn test_arrow_sequence_is_one_arrow_event() {
        let events = decode_all(&[Some(0x1b), Some(b'['), Some(b'A')]);
        assert_eq!(events, vec![InputEvent::ArrowUp]);
    }

    #[test]
    fn test_all_four_arrows_map() {
        for (suffix, expected) in [
            (b'A', InputEvent::ArrowUp),
            (b'B', InputEvent::ArrowDown),
            (b'C', InputEvent::ArrowRight),
            (b'D', InputEvent::ArrowLeft),
        ] {
            let events = decode_all(&[Some(0x1b), Some(b'['), Some(suffix)]);
            assert_eq!(events, vec![expected]);
        }
    }

    #[test]
    fn test_unknown_csi_suffix_is_discarded() {
        let events = decode_all(&[Some(0x1b), Some(b'['), Some(b'Z')]);
        assert!(events.is_empty());
    }

    #[test]
    fn test_truncated_csi_is_discarded() {
        let events = decode_all(&[Some(0x1b), Some(b'['), None]);
        assert!(events.is_empty());
    }

    #[test]
    fn test_escape_with_unrelated_byte_is_discarded() {
        let events = decode_all(&[Some(0x1b), Some(b'O')]);
        assert!(events.is_empty());
    }

    #[test]
    fn test_byte_map_covers_editing_keys() {
        assert_eq!(map_byte(13), InputEvent::Enter);
        assert_eq!(map_byte(127), InputEvent::Backspace);
        assert_eq!(map_byte(8), InputEvent::Backspace);
        assert_eq!(map_byte(b'S'), InputEvent::ToggleMode);
        assert_eq!(map_byte(b'X'), InputEvent::DiscardExit);
        assert_eq!(map_byte(b'a'), InputEvent::Char(b'a'));
        assert_eq!(map_byte(b' '), InputEvent::Char(b' '));
        assert_eq!(map_byte(b'~'), InputEvent::Char(b'~'));
    }

    #[test]
    fn test_byte_map_is_total() {
        for byte in 0..=u8::MAX {
            // Every byte maps to some event; control bytes outside the map
            // land in Other.
            let event = map_byte(byte);
            if byte == 9 || byte == 3 {
                assert_eq!(event, InputEvent::Other(byte));
            }
        }
    }

    #[test]
    fn test_mixed_stream_decodes_in_order() {
        let events = decode_all(&[
            Some(b'h'),
            Some(0x1b),
            Some(b'['),
            Some(b'B'),
            Some(b'i'),
            Some(0x1b),
            None,
        ]);
        assert_eq!(
            events,
            vec![
                InputEvent::Char(b'h'),
                InputEvent::ArrowDown,
                InputEvent::Char(b'i'),
                InputEvent::EscapeAlone,
            ]
        );
    }
}
