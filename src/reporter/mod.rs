//! Human-readable status output.
//!
//! The resolver reports progress through [`Reporter`]; only the process
//! boundary calls [`Reporter::fatal`].

mod console;

pub use console::{ConsoleReporter, Target};

/// Closing banner printed when a run halts.
pub const BANNER: &str =
    "---------------------------CUSTOM CONFIGURATION-------------------------";

/// Indent used for status and detail lines.
pub const INDENT: &str = "    ";

/// Sink for status messages.
pub trait Reporter {
    /// Clear the screen before a resolution starts.
    fn clear(&self) {}

    /// A step is starting.
    fn action(&self, message: &str);

    /// Neutral detail lines.
    fn info(&self, lines: &[String]);

    /// A step succeeded.
    fn ok(&self, message: &str);

    fn warn(&self, message: &str);

    fn error(&self, lines: &[String]);

    /// Print the closing banner and terminate the process with `code`.
    fn fatal(&self, code: i32) -> !;

    /// Terminate the process with `code` without the closing banner.
    fn exit(&self, code: i32) -> !;
}

impl<T: Reporter + ?Sized> Reporter for &T {
    fn clear(&self) {
        (**self).clear()
    }

    fn action(&self, message: &str) {
        (**self).action(message)
    }

    fn info(&self, lines: &[String]) {
        (**self).info(lines)
    }

    fn ok(&self, message: &str) {
        (**self).ok(message)
    }

    fn warn(&self, message: &str) {
        (**self).warn(message)
    }

    fn error(&self, lines: &[String]) {
        (**self).error(lines)
    }

    fn fatal(&self, code: i32) -> ! {
        (**self).fatal(code)
    }

    fn exit(&self, code: i32) -> ! {
        (**self).exit(code)
    }
}

/// Prefix `blank_lines` empty lines, then indent every line.
pub fn layout<S: AsRef<str>>(lines: &[S], blank_lines: usize, indent: &str) -> Vec<String> {
    std::iter::repeat(String::new())
        .take(blank_lines)
        .chain(lines.iter().map(|l| l.as_ref().to_string()))
        .map(|l| format!("{}{}", indent, l))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_prefixes_blank_lines() {
        let out = layout(&["Checking..."], 1, "");
        assert_eq!(out, vec!["".to_string(), "Checking...".to_string()]);
    }

    #[test]
    fn test_layout_indents_every_line() {
        let out = layout(&["a", "b"], 2, INDENT);
        assert_eq!(out.len(), 4);
        assert!(out.iter().all(|l| l.starts_with(INDENT)));
        assert_eq!(out[3], "    b");
    }
}
