//! # ironset-render — Presentation
//!
//! Pure functions from tracker data to [`Reply`] values. Nothing here reads
//! or writes state; the engine calls these after every step to redraw the
//! relevant view. All text is Telegram-style HTML, so anything that came from
//! users or program files goes through [`escape_html`].
//!
//! - [`messages`] — fixed prompts, confirmations and error texts
//! - [`views`] — in-session views (exercise list, keyboards, progress, summary)
//! - [`reports`] — history, statistics and recommendations
//! - [`chart`] — bar-style text chart of a weight series

pub mod chart;
pub mod messages;
pub mod reports;
pub mod views;

pub use chart::{BAR_LEVELS, bar_chart};
pub use ironset_protocol::{Keyboard, Reply};

/// Escapes the characters Telegram's HTML parse mode treats as markup.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Weights print without a trailing ".0" and with at most two decimals.
pub fn format_weight(weight: f64) -> String {
    let rounded = (weight * 100.0).round() / 100.0;
    format!("{rounded}")
}

pub fn format_set(weight: f64, reps: u32) -> String {
    format!("{} kg × {reps} reps", format_weight(weight))
}

/// "done/total" counter shown on session views.
pub fn completion_counter(done: usize, total: usize) -> String {
    format!("{done}/{total}")
}
