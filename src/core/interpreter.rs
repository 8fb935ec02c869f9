//! Line classifier for itinerary text.
//!
//! Rules are tried in a fixed order for every non-blank line:
//!
//! 1. `TimeBlock` when `(line contains " - " && line contains "AM") || line contains "PM"`.
//!    Note the grouping: a line mentioning "PM" is a time block even without
//!    a separator, and "AM"/"PM" may appear anywhere in the line.
//! 2. `DetailTip` when the trimmed line starts with `-`.
//! 3. `PlainText` otherwise.

use crate::domain::model::{IconHint, ItineraryLine};

const TIME_SEPARATOR: &str = " - ";
const DURATION_OPEN: &str = " (";

pub fn parse(itinerary: &str) -> Vec<ItineraryLine> {
    itinerary.lines().filter_map(classify_line).collect()
}

/// Classifies a single line; `None` for blank lines.
pub fn classify_line(line: &str) -> Option<ItineraryLine> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    if is_time_block(line) {
        return Some(time_block(line));
    }

    if let Some(rest) = trimmed.strip_prefix('-') {
        let text = rest.trim().to_string();
        return Some(ItineraryLine::DetailTip {
            icon_hint: icon_hint(&text),
            text,
        });
    }

    Some(ItineraryLine::PlainText {
        text: line.to_string(),
    })
}

fn is_time_block(line: &str) -> bool {
    (line.contains(TIME_SEPARATOR) && line.contains("AM")) || line.contains("PM")
}

fn time_block(line: &str) -> ItineraryLine {
    let (time, rest) = line.split_once(TIME_SEPARATOR).unwrap_or((line, ""));
    let (location, duration_raw) = rest.split_once(DURATION_OPEN).unwrap_or((rest, ""));

    let duration = if duration_raw.is_empty() {
        None
    } else {
        let inner = duration_raw.strip_suffix(')').unwrap_or(duration_raw);
        Some(format!("({}", inner))
    };

    ItineraryLine::TimeBlock {
        time: time.trim().to_string(),
        location: location.trim().to_string(),
        duration,
    }
}

fn icon_hint(text: &str) -> IconHint {
    let lower = text.to_lowercase();
    if lower.contains("weather") {
        IconHint::Weather
    } else if lower.contains("travel") {
        IconHint::Travel
    } else {
        IconHint::Info
    }
}
