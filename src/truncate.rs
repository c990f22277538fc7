/*!
 * Head/tail truncation of oversized file content
 */

/// Marker line inserted between the head and tail excerpts
pub const TRUNCATION_MARKER: &str = "... [truncated] ...";

/// Content ready to be fenced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub content: String,
    pub truncated: bool,
}

/// Size limits applied to every included file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncator {
    /// Byte cap per file; 0 disables truncation
    pub max_bytes: u64,
    /// Lines kept from the start of a truncated file
    pub head_lines: usize,
    /// Lines kept from the end of a truncated file
    pub tail_lines: usize,
}

impl Truncator {
    pub fn new(max_bytes: u64, head_lines: usize, tail_lines: usize) -> Self {
        Self {
            max_bytes,
            head_lines,
            tail_lines,
        }
    }

    /// Render `text`, cutting it down to head/tail excerpts when it is over the byte cap.
    ///
    /// A file over the cap whose line count fits in `head_lines + tail_lines`
    /// is returned whole: there is nothing to cut between the two excerpts.
    pub fn render(&self, text: &str) -> Rendered {
        if self.max_bytes == 0 || text.len() as u64 <= self.max_bytes {
            return Rendered::full(text);
        }

        let lines: Vec<&str> = text.lines().collect();
        if self.head_lines.saturating_add(self.tail_lines) >= lines.len() {
            return Rendered::full(text);
        }

        let head = &lines[..self.head_lines];
        let tail = &lines[lines.len() - self.tail_lines..];

        let mut kept = Vec::with_capacity(head.len() + tail.len() + 1);
        kept.extend_from_slice(head);
        kept.push(TRUNCATION_MARKER);
        kept.extend_from_slice(tail);

        Rendered {
            content: kept.join("\n"),
            truncated: true,
        }
    }
}

impl Rendered {
    fn full(text: &str) -> Self {
        Self {
            content: text.to_string(),
            truncated: false,
        }
    }
}
