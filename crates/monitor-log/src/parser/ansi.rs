/// ANSI escape code stripping for monitor log lines
///
/// Monitor logs captured from a console appender often carry color codes
/// around the level and logger columns. Markers and frame lines must be
/// matched against the visible text only.

use std::borrow::Cow;

const ESC: u8 = 0x1b;

/// Strip ANSI escape codes from a log line.
///
/// Handles:
/// - CSI sequences: `\x1b[...m`
/// - OSC sequences: `\x1b]...` terminated by BEL or `ESC \`
/// - Two-byte Fe sequences (`ESC` + 0x40-0x5F)
///
/// Returns `Cow::Borrowed` when the line holds no escape byte.
pub fn strip_ansi_codes(input: &str) -> Cow<'_, str> {
    if !input.as_bytes().contains(&ESC) {
        return Cow::Borrowed(input);
    }

    let bytes = input.as_bytes();
    let mut output = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != ESC {
            output.push(bytes[i]);
            i += 1;
            continue;
        }

        // Lone trailing ESC
        if i + 1 >= bytes.len() {
            break;
        }

        match bytes[i + 1] {
            b'[' => {
                i += 2;
                while i < bytes.len() {
                    let b = bytes[i];
                    i += 1;
                    if (0x40..=0x7E).contains(&b) {
                        break;
                    }
                }
            }
            b']' => {
                i += 2;
                while i < bytes.len() {
                    if bytes[i] == 0x07 {
                        i += 1;
                        break;
                    }
                    if bytes[i] == ESC && i + 1 < bytes.len() && bytes[i + 1] == b'\\' {
                        i += 2;
                        break;
                    }
                    i += 1;
                }
            }
            0x40..=0x5F => i += 2,
            _ => {
                output.push(bytes[i]);
                i += 1;
            }
        }
    }

    // Only ASCII-delimited sequences are removed, so multi-byte characters
    // survive intact; the lossy path is never expected to replace anything.
    match String::from_utf8(output) {
        Ok(text) => Cow::Owned(text),
        Err(err) => Cow::Owned(String::from_utf8_lossy(err.as_bytes()).into_owned()),
    }
}
