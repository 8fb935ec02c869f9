//! Deterministic itinerary used when the planning service is unavailable.
//!
//! The text follows the same line conventions the interpreter understands:
//! stops are rendered as `HH:MM AM - NAME` so they classify as time blocks.

use crate::domain::model::{Attraction, Pace, Preferences};
use crate::utils::error::Result;
use crate::utils::validation::{parse_clock_time, CLOCK_FORMAT};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

const TRAVEL_MINUTES: i64 = 20;
const MAX_HOURS_PER_STOP: f64 = 1.5;
const MORNING_STOPS: usize = 2;

pub fn build_itinerary(attractions: &[Attraction], preferences: &Preferences) -> Result<String> {
    // 以固定日期錨定，跨午夜的行程仍保持遞增
    let day = NaiveDate::default();
    let start = day.and_time(parse_clock_time("preferences.startTime", &preferences.start_time)?);
    let mut end = day.and_time(parse_clock_time("preferences.endTime", &preferences.end_time)?);
    if end < start {
        end += Duration::days(1);
    }
    let total_hours = (end - start).num_seconds() as f64 / 3600.0;
    // 午餐與緩衝各算一站
    let hours_per_stop = MAX_HOURS_PER_STOP.min(total_hours / (attractions.len() + 2) as f64);
    let stop_minutes = (hours_per_stop * 60.0) as i64;

    tracing::debug!(
        "Building fallback itinerary: {} attractions, {} minutes per stop",
        attractions.len(),
        stop_minutes
    );

    let split = attractions.len().min(MORNING_STOPS);
    let (morning, afternoon) = attractions.split_at(split);

    let mut lines = vec![
        "📋 Your Customized Itinerary\n".to_string(),
        "------------------------\n".to_string(),
    ];

    lines.push("🌅 Morning Activities:".to_string());
    let after_morning = push_stops(&mut lines, morning, start, stop_minutes);

    let noon = day.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default());
    let lunch = (after_morning + Duration::minutes(30)).max(noon);
    lines.push("\n🍴 Lunch Break:".to_string());
    lines.push(format!(
        "⏰ {} - Take a refreshing break (60 minutes)",
        lunch.format(CLOCK_FORMAT)
    ));
    if preferences.pace == Pace::Relaxed {
        lines.push("💡 Tip: Use this time to rest and recharge".to_string());
    }

    lines.push("\n🌇 Afternoon Activities:".to_string());
    push_stops(&mut lines, afternoon, lunch + Duration::minutes(60), stop_minutes);

    lines.push("\n💡 Travel Tips:".to_string());
    let pace_tips: [&str; 2] = match preferences.pace {
        Pace::Relaxed => [
            "✓ Take your time to enjoy each location",
            "✓ Consider extra breaks between attractions",
        ],
        Pace::Moderate => [
            "✓ Balance sightseeing with rest periods",
            "✓ Stay flexible with timing",
        ],
        Pace::Fast => [
            "✓ Prioritize must-see attractions",
            "✓ Consider splitting into smaller groups for efficiency",
        ],
    };
    lines.extend(pace_tips.iter().map(|tip| tip.to_string()));

    lines.push("\n🎯 General Tips:".to_string());
    lines.push("✓ 👟 Wear comfortable walking shoes".to_string());
    lines.push("✓ 🚰 Carry water and snacks".to_string());
    lines.push("✓ 🕒 Check attraction opening hours".to_string());
    lines.push(format!(
        "✓ 🚶 {} is your main mode of transport",
        title_case(preferences.transportation.as_str())
    ));

    lines.push("\n🌤️ Preparation:".to_string());
    lines.push("✓ Check weather forecast".to_string());
    lines.push("✓ Bring umbrella/sunscreen as needed".to_string());
    lines.push("✓ Carry a portable charger".to_string());

    Ok(lines.join("\n"))
}

/// Appends one block per stop and returns the time the section ends.
fn push_stops(
    lines: &mut Vec<String>,
    stops: &[Attraction],
    mut current: NaiveDateTime,
    stop_minutes: i64,
) -> NaiveDateTime {
    for (i, attraction) in stops.iter().enumerate() {
        lines.push(format!(
            "\n⏰ {} - {}",
            current.format(CLOCK_FORMAT),
            attraction.name.to_uppercase()
        ));
        lines.push(format!("📍 {}", attraction.description));
        if attraction.rating != 0.0 {
            lines.push(format!("⭐ Rating: {:?}", attraction.rating));
        }
        lines.push(format!("⏱️ Duration: {} minutes", stop_minutes));

        if i + 1 < stops.len() {
            current = current + Duration::minutes(stop_minutes + TRAVEL_MINUTES);
            lines.push(format!(
                "🚶 {} minutes travel to next location",
                TRAVEL_MINUTES
            ));
        } else {
            current = current + Duration::minutes(stop_minutes);
        }
    }
    current
}

/// Upper-cases the first letter of every alphabetic run, lower-cases the rest.
fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut at_word_start = true;
    for c in value.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::interpreter;
    use crate::domain::model::{GeoPoint, ItineraryLine, Transportation};
    use crate::utils::error::PlannerError;

    fn attraction(name: &str, rating: f64) -> Attraction {
        Attraction {
            id: name.to_lowercase().replace(' ', "-"),
            name: name.to_string(),
            description: format!("{} description", name),
            rating,
            photos: vec![],
            location: GeoPoint {
                lat: 45.67,
                lng: -111.04,
            },
        }
    }

    #[test]
    fn test_schedule_times() {
        let attractions = vec![
            attraction("Museum of the Rockies", 4.7),
            attraction("Main Street", 0.0),
            attraction("Gallatin History Museum", 4.5),
            attraction("Bridger Ridge", 4.0),
        ];
        // 9 hours over 6 slots caps at 1.5h = 90 minutes per stop
        let text = build_itinerary(&attractions, &Preferences::default()).unwrap();

        assert!(text.contains("⏰ 09:00 AM - MUSEUM OF THE ROCKIES"));
        assert!(text.contains("⏰ 10:50 AM - MAIN STREET"));
        assert!(text.contains("⏱️ Duration: 90 minutes"));
        // morning ends 12:20, lunch 12:50
        assert!(text.contains("⏰ 12:50 PM - Take a refreshing break (60 minutes)"));
        assert!(text.contains("⏰ 01:50 PM - GALLATIN HISTORY MUSEUM"));
        assert!(text.contains("⏰ 03:40 PM - BRIDGER RIDGE"));
        assert!(text.contains("⭐ Rating: 4.0"));
        assert!(!text.contains("Main Street description\n⭐"));
        assert!(text.contains("✓ 🚶 Walking is your main mode of transport"));
        assert!(text.contains("✓ Balance sightseeing with rest periods"));
    }

    #[test]
    fn test_lunch_never_before_noon_and_relaxed_tip() {
        let preferences = Preferences {
            start_time: "8:00 AM".to_string(),
            end_time: "10:00 AM".to_string(),
            pace: Pace::Relaxed,
            transportation: Transportation::PublicTransport,
        };
        let text = build_itinerary(&[attraction("Pier", 0.0)], &preferences).unwrap();

        // 2 hours over 3 slots = 40 minutes
        assert!(text.contains("⏱️ Duration: 40 minutes"));
        assert!(text.contains("⏰ 12:00 PM - Take a refreshing break (60 minutes)"));
        assert!(text.contains("💡 Tip: Use this time to rest and recharge"));
        assert!(text.contains("Public_Transport is your main mode of transport"));
        assert!(!text.contains("travel to next location"));
    }

    #[test]
    fn test_invalid_time_is_rejected() {
        let preferences = Preferences {
            start_time: "breakfast".to_string(),
            ..Preferences::default()
        };
        let err = build_itinerary(&[], &preferences).unwrap_err();
        assert!(matches!(err, PlannerError::InvalidConfigValueError { .. }));
    }

    #[test]
    fn test_output_interprets_into_time_blocks() {
        let attractions = vec![attraction("Central Park", 4.8), attraction("The Met", 4.9)];
        let text = build_itinerary(&attractions, &Preferences::default()).unwrap();
        let lines = interpreter::parse(&text);

        let blocks: Vec<&ItineraryLine> = lines
            .iter()
            .filter(|line| matches!(line, ItineraryLine::TimeBlock { .. }))
            .collect();
        assert_eq!(blocks.len(), 3);
        assert_eq!(
            blocks[2],
            &ItineraryLine::TimeBlock {
                time: "⏰ 12:50 PM".to_string(),
                location: "Take a refreshing break".to_string(),
                duration: Some("(60 minutes".to_string()),
            }
        );
    }

    #[test]
    fn test_overnight_window_keeps_lunch_after_morning() {
        let preferences = Preferences {
            start_time: "10:00 PM".to_string(),
            end_time: "4:00 AM".to_string(),
            ..Preferences::default()
        };
        let attractions = vec![
            attraction("Night Market", 4.2),
            attraction("Observatory", 4.6),
            attraction("Jazz Club", 4.4),
        ];
        // 6 hours over 5 slots = 72 minutes; morning ends 12:44 AM
        let text = build_itinerary(&attractions, &preferences).unwrap();

        assert!(text.contains("⏱️ Duration: 72 minutes"));
        assert!(text.contains("⏰ 10:00 PM - NIGHT MARKET"));
        assert!(text.contains("⏰ 11:32 PM - OBSERVATORY"));
        assert!(text.contains("⏰ 01:14 AM - Take a refreshing break (60 minutes)"));
        assert!(text.contains("⏰ 02:14 AM - JAZZ CLUB"));
        assert!(!text.contains("12:00 PM"));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("walking"), "Walking");
        assert_eq!(title_case("public_transport"), "Public_Transport");
    }
}
