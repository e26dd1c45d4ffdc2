// Display sinks - write-only targets for the counter's status text

use serde::{Deserialize, Serialize};
use std::io::Write;
use tokio::sync::mpsc;

/// Where the counter writes what the user sees
///
/// Writes are synchronous and arrive in order from a single session.
pub trait DisplaySink: Send {
    /// "Starting in N..."
    fn set_countdown_text(&mut self, text: &str);

    /// "N seconds remaining"
    fn set_remaining_text(&mut self, text: &str);

    /// "N Pushup(s) counted"
    fn set_count_text(&mut self, text: &str);

    /// Show or hide the "Straighten Your Arm" prompt
    fn set_straighten_visible(&mut self, visible: bool);

    /// Persistent notice outside the counting flow (e.g. missing camera)
    fn show_notice(&mut self, text: &str);
}

/// One display write, as forwarded by `ChannelDisplay`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "target", content = "value")]
pub enum DisplayUpdate {
    Countdown(String),
    Remaining(String),
    Count(String),
    StraightenVisible(bool),
    Notice(String),
}

/// Forwards every write over a channel to a UI task
pub struct ChannelDisplay {
    tx: mpsc::UnboundedSender<DisplayUpdate>,
}

impl ChannelDisplay {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<DisplayUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, update: DisplayUpdate) {
        // Receiver gone means nobody is watching; the session carries on
        let _ = self.tx.send(update);
    }
}

impl DisplaySink for ChannelDisplay {
    fn set_countdown_text(&mut self, text: &str) {
        self.send(DisplayUpdate::Countdown(text.to_string()));
    }

    fn set_remaining_text(&mut self, text: &str) {
        self.send(DisplayUpdate::Remaining(text.to_string()));
    }

    fn set_count_text(&mut self, text: &str) {
        self.send(DisplayUpdate::Count(text.to_string()));
    }

    fn set_straighten_visible(&mut self, visible: bool) {
        self.send(DisplayUpdate::StraightenVisible(visible));
    }

    fn show_notice(&mut self, text: &str) {
        self.send(DisplayUpdate::Notice(text.to_string()));
    }
}

/// Renders the counter on one terminal line
pub struct TerminalDisplay {
    timer: String,
    count: String,
    straighten: bool,
}

impl TerminalDisplay {
    pub fn new() -> Self {
        Self {
            timer: String::new(),
            count: String::new(),
            straighten: false,
        }
    }

    fn redraw(&self) {
        let prompt = if self.straighten { "  [Straighten Your Arm]" } else { "" };
        let mut stdout = std::io::stdout().lock();
        let _ = write!(stdout, "\r\x1b[2K{}  {}{}", self.timer, self.count, prompt);
        let _ = stdout.flush();
    }
}

impl Default for TerminalDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySink for TerminalDisplay {
    fn set_countdown_text(&mut self, text: &str) {
        self.timer = text.to_string();
        self.redraw();
    }

    fn set_remaining_text(&mut self, text: &str) {
        if self.timer != text {
            self.timer = text.to_string();
            self.redraw();
        }
    }

    fn set_count_text(&mut self, text: &str) {
        if self.count != text {
            self.count = text.to_string();
            self.redraw();
        }
    }

    fn set_straighten_visible(&mut self, visible: bool) {
        if self.straighten != visible {
            self.straighten = visible;
            self.redraw();
        }
    }

    fn show_notice(&mut self, text: &str) {
        println!("\n{}", text);
    }
}
