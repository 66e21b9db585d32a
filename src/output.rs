//! Output sinks for commands.
//!
//! Commands never print directly. They receive an [`Output`] so the same code
//! drives the colored terminal ([`Console`]) and tests ([`BufferedOutput`]).

use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

pub trait Output {
    /// General status, prefixed with a blue `o`.
    fn info(&mut self, msg: &str);
    /// Completed operation, prefixed with a green check mark.
    fn success(&mut self, msg: &str);
    /// Recoverable problem, prefixed with a yellow `!`.
    fn warning(&mut self, msg: &str);
    /// Failed operation, prefixed with a red `!`. Does not exit.
    fn failure(&mut self, msg: &str);
    /// Unadorned text such as rendered tables.
    fn line(&mut self, msg: &str);
    /// Starts or updates a transient progress message.
    fn progress(&mut self, msg: &str);
    /// Clears the progress message, if any.
    fn finish_progress(&mut self);
}

#[derive(Default)]
pub struct Console {
    spinner: Option<ProgressBar>,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    fn print(&mut self, marker: String, msg: &str) {
        let text = format!("[{}] {}", marker, msg);
        match &self.spinner {
            Some(pb) => pb.println(text),
            None => println!("{}", text),
        }
    }
}

impl Output for Console {
    fn info(&mut self, msg: &str) {
        self.print("o".blue().bold().to_string(), msg);
    }

    fn success(&mut self, msg: &str) {
        self.print("✓".green().bold().to_string(), msg);
    }

    fn warning(&mut self, msg: &str) {
        self.print("!".yellow().bold().to_string(), msg);
    }

    fn failure(&mut self, msg: &str) {
        self.print("!".red().bold().to_string(), msg);
    }

    fn line(&mut self, msg: &str) {
        match &self.spinner {
            Some(pb) => pb.println(msg),
            None => println!("{}", msg),
        }
    }

    fn progress(&mut self, msg: &str) {
        let pb = self.spinner.get_or_insert_with(|| {
            let pb = ProgressBar::new_spinner();
            pb.enable_steady_tick(Duration::from_millis(100));
            if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
                pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
            }
            pb
        });
        pb.set_message(msg.to_string());
    }

    fn finish_progress(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }
}

/// Severity of a recorded line.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Failure,
    Line,
    Progress,
}

/// Records everything written to it, in order.
#[derive(Debug, Default)]
pub struct BufferedOutput {
    pub lines: Vec<(Level, String)>,
}

impl BufferedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self, level: Level) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.as_str())
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|(_, m)| m.contains(needle))
    }
}

impl Output for BufferedOutput {
    fn info(&mut self, msg: &str) {
        self.lines.push((Level::Info, msg.to_string()));
    }

    fn success(&mut self, msg: &str) {
        self.lines.push((Level::Success, msg.to_string()));
    }

    fn warning(&mut self, msg: &str) {
        self.lines.push((Level::Warning, msg.to_string()));
    }

    fn failure(&mut self, msg: &str) {
        self.lines.push((Level::Failure, msg.to_string()));
    }

    fn line(&mut self, msg: &str) {
        self.lines.push((Level::Line, msg.to_string()));
    }

    fn progress(&mut self, msg: &str) {
        self.lines.push((Level::Progress, msg.to_string()));
    }

    fn finish_progress(&mut self) {}
}
