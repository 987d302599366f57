//! Terminal reporter.

use super::{layout, Reporter, BANNER, INDENT};
use crate::config::OutputSettings;
use crossterm::cursor::MoveTo;
use crossterm::style::{style, Color, Stylize};
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, IsTerminal, Write};

/// Stream the reporter writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Stdout,
    Stderr,
}

impl Target {
    fn is_terminal(&self) -> bool {
        match self {
            Target::Stdout => io::stdout().is_terminal(),
            Target::Stderr => io::stderr().is_terminal(),
        }
    }

    fn writer(&self) -> Box<dyn Write> {
        match self {
            Target::Stdout => Box::new(io::stdout().lock()),
            Target::Stderr => Box::new(io::stderr().lock()),
        }
    }
}

/// Writes colored status lines to a terminal stream.
#[derive(Debug, Clone)]
pub struct ConsoleReporter {
    target: Target,
    colors: bool,
    banner: bool,
}

impl ConsoleReporter {
    /// Colors are enabled when `target` is a terminal.
    pub fn new(target: Target, output: &OutputSettings) -> Self {
        Self {
            target,
            colors: target.is_terminal(),
            banner: output.banner,
        }
    }

    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.colors && !text.is_empty() {
            style(text).with(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn emit(&self, lines: &[String]) {
        let mut out = self.target.writer();
        for line in lines {
            // Status output is best effort; a closed stream must not abort resolution.
            let _ = writeln!(out, "{}", line);
        }
        let _ = out.flush();
    }

    fn emit_painted(&self, lines: &[String], color: Color, blank_lines: usize, indent: &str) {
        let painted: Vec<String> = lines.iter().map(|l| self.paint(l, color)).collect();
        self.emit(&layout(&painted, blank_lines, indent));
    }
}

impl Reporter for ConsoleReporter {
    fn clear(&self) {
        if !self.target.is_terminal() {
            return;
        }
        let mut out = self.target.writer();
        let _ = crossterm::execute!(out, Clear(ClearType::All), Clear(ClearType::Purge), MoveTo(0, 0));
    }

    fn action(&self, message: &str) {
        self.emit_painted(&[message.to_string()], Color::Yellow, 1, "");
    }

    fn info(&self, lines: &[String]) {
        self.emit_painted(lines, Color::Cyan, 0, INDENT);
    }

    fn ok(&self, message: &str) {
        self.emit_painted(&[format!("✅   {}", message)], Color::Green, 0, INDENT);
    }

    fn warn(&self, message: &str) {
        self.emit_painted(&[format!("warning: {}", message)], Color::Yellow, 0, INDENT);
    }

    fn error(&self, lines: &[String]) {
        self.emit_painted(lines, Color::Red, 1, INDENT);
    }

    fn fatal(&self, code: i32) -> ! {
        if self.banner {
            self.emit(&layout(&[BANNER, "", ""], 2, INDENT));
        }
        self.exit(code)
    }

    fn exit(&self, code: i32) -> ! {
        tracing::debug!(code, "terminating");
        std::process::exit(code)
    }
}
