//! Console echo of the tool's human-readable output.
//!
//! The gateway prints the tool's report the way a terminal user expects to
//! see it. Writes go through a [`Console`] so tests can capture them.

use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// Column width used when an error report has to be wrapped.
pub const WRAP_WIDTH: usize = 80;

#[derive(Debug, Clone)]
enum Sink {
    Stdout,
    Buffer(Arc<Mutex<String>>),
}

/// Destination for echoed tool output.
#[derive(Debug, Clone)]
pub struct Console {
    sink: Sink,
}

impl Console {
    /// Console writing to the process's stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self { sink: Sink::Stdout }
    }

    /// Console capturing everything in memory.
    #[must_use]
    pub fn buffer() -> Self {
        Self {
            sink: Sink::Buffer(Arc::new(Mutex::new(String::new()))),
        }
    }

    /// Print a block of text followed by a newline.
    pub fn print(&self, text: &str) {
        match &self.sink {
            Sink::Stdout => {
                let mut out = std::io::stdout().lock();
                // A closed stdout is not worth failing a tool call over.
                let _ = writeln!(out, "{text}");
            }
            Sink::Buffer(buffer) => {
                let mut buffer = buffer.lock();
                buffer.push_str(text);
                buffer.push('\n');
            }
        }
    }

    /// Print an error report, wrapped when its longest line exceeds
    /// [`WRAP_WIDTH`].
    pub fn print_error_report(&self, text: &str) {
        if longest_line(text) > WRAP_WIDTH {
            self.print(&fill(text, WRAP_WIDTH));
        } else {
            self.print(text);
        }
    }

    /// Print a local refusal in the tool's own `ERROR!` convention.
    pub fn print_refusal(&self, message: &str) {
        self.print("ERROR!");
        self.print(message);
    }

    /// Everything captured so far (empty for a stdout console).
    #[must_use]
    pub fn contents(&self) -> String {
        match &self.sink {
            Sink::Stdout => String::new(),
            Sink::Buffer(buffer) => buffer.lock().clone(),
        }
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::stdout()
    }
}

/// Length in characters of the longest line of `text`.
#[must_use]
pub fn longest_line(text: &str) -> usize {
    text.split('\n')
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0)
}

/// Greedy word wrap into lines of at most `width` characters.
///
/// Runs of whitespace, newlines included, collapse into single spaces. Words
/// longer than `width` are split.
#[must_use]
pub fn fill(text: &str, width: usize) -> String {
    let width = width.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        if word.is_empty() {
            continue;
        }

        let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
        if needed > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }

    if current_len > 0 {
        lines.push(current);
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_console_captures() {
        let console = Console::buffer();
        console.print("first");
        console.print("second");
        assert_eq!(console.contents(), "first\nsecond\n");
    }

    #[test]
    fn test_short_error_printed_unwrapped() {
        let console = Console::buffer();
        let report = "ERROR!\n  short   line with   spacing";
        console.print_error_report(report);
        assert_eq!(console.contents(), format!("{report}\n"));
    }

    #[test]
    fn test_exactly_eighty_columns_is_not_wrapped() {
        let console = Console::buffer();
        let report = format!("ERROR {}", "x".repeat(74));
        assert_eq!(report.len(), 80);
        console.print_error_report(&report);
        assert_eq!(console.contents(), format!("{report}\n"));
    }

    #[test]
    fn test_long_error_wrapped_to_width() {
        let console = Console::buffer();
        let report = format!("ERROR! {}", "word ".repeat(40));
        console.print_error_report(&report);
        let printed = console.contents();
        assert!(printed.lines().all(|line| line.chars().count() <= WRAP_WIDTH));
        assert!(printed.lines().count() > 1);
        assert!(printed.starts_with("ERROR! word"));
    }

    #[test]
    fn test_fill_splits_long_words() {
        let wrapped = fill(&"a".repeat(25), 10);
        assert_eq!(wrapped, "aaaaaaaaaa\naaaaaaaaaa\naaaaa");
    }

    #[test]
    fn test_fill_collapses_whitespace() {
        assert_eq!(fill("one\n two\t\tthree", 80), "one two three");
    }

    #[test]
    fn test_longest_line() {
        assert_eq!(longest_line(""), 0);
        assert_eq!(longest_line("ab\nabcd\nabc"), 4);
    }

    #[test]
    fn test_refusal_format() {
        let console = Console::buffer();
        console.print_refusal("hello is an existing contract definition.");
        assert_eq!(
            console.contents(),
            "ERROR!\nhello is an existing contract definition.\n"
        );
    }
}
