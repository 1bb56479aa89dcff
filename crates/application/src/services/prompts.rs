//! Prompt texts and inline keyboards for each form state
//!
//! Pure builders: everything here is a function of the catalog, the
//! directory and the current session values, so prompts are trivially
//! re-derivable when a go-back replay re-renders an earlier state.

use chrono::{DateTime, Days};
use chrono_tz::Tz;
use domain::value_objects::selection_token::{
    GO_BACK_DATA, NO_ACTION_DATA, PICKER_DOWN_HOUR_DATA, PICKER_DOWN_MINUTE_DATA,
    PICKER_SAVE_DATA, PICKER_UP_HOUR_DATA, PICKER_UP_MINUTE_DATA, POST_TO_CHANNEL_DATA,
    RESTART_DATA,
};
use domain::{Pace, RouteCatalog, SelectionToken, StartPointDirectory, TimePicker};

use crate::ports::{Button, Keyboard};

/// Buttons per row in the numbered route-selection block
const ROUTE_BUTTONS_PER_ROW: usize = 5;

fn service_row() -> Vec<Button> {
    vec![
        Button::new("Go back", GO_BACK_DATA),
        Button::new("Restart", RESTART_DATA),
    ]
}

fn restart_row() -> Vec<Button> {
    vec![Button::new("Restart", RESTART_DATA)]
}

/// Date prompt with Today/Tomorrow presets
///
/// The preset buttons carry the formatted date itself as their payload,
/// so a press arrives exactly like typed free text.
#[must_use]
pub fn date_prompt(now: DateTime<Tz>) -> (String, Keyboard) {
    let today = now.format("%B %d").to_string();
    let tomorrow = now
        .checked_add_days(Days::new(1))
        .unwrap_or(now)
        .format("%B %d")
        .to_string();

    let keyboard = Keyboard::new(vec![
        vec![
            Button::new("Tomorrow", tomorrow),
            Button::new("Today", today),
        ],
        restart_row(),
    ]);
    ("Pick a date".to_string(), keyboard)
}

/// Time prompt: the hour/minute picker grid
///
/// Two columns of up/value/down cells; the value cells are display-only
/// and carry the no-action token.
#[must_use]
pub fn time_prompt(picker: TimePicker) -> (String, Keyboard) {
    let keyboard = Keyboard::new(vec![
        vec![
            Button::new("\u{25b2}", PICKER_UP_HOUR_DATA),
            Button::new("\u{25b2}", PICKER_UP_MINUTE_DATA),
        ],
        vec![
            Button::new(format!("{:02}", picker.hour()), NO_ACTION_DATA),
            Button::new(format!("{:02}", picker.minute()), NO_ACTION_DATA),
        ],
        vec![
            Button::new("\u{25bc}", PICKER_DOWN_HOUR_DATA),
            Button::new("\u{25bc}", PICKER_DOWN_MINUTE_DATA),
        ],
        vec![Button::new("Save", PICKER_SAVE_DATA)],
        service_row(),
    ]);
    ("Pick a time".to_string(), keyboard)
}

/// One page of the numbered route listing
///
/// The text shows each route's caption prefixed with its stable index;
/// the keyboard offers a selection button per listed route, a page row,
/// and the service row. Page buttons are a pure view refresh.
#[must_use]
pub fn route_list(catalog: &RouteCatalog, offset: usize, page_len: usize) -> (String, Keyboard) {
    let start = offset * page_len;
    let lines: Vec<String> = catalog
        .page(offset, page_len)
        .iter()
        .enumerate()
        .map(|(i, route)| format!("{}. {}", start + i, route.caption))
        .collect();
    let text = if lines.is_empty() {
        "No routes loaded".to_string()
    } else {
        lines.join("\n")
    };

    let mut rows: Vec<Vec<Button>> = Vec::new();
    let indices: Vec<usize> = (start..start + catalog.page(offset, page_len).len()).collect();
    for chunk in indices.chunks(ROUTE_BUTTONS_PER_ROW) {
        rows.push(
            chunk
                .iter()
                .map(|&i| Button::new(i.to_string(), SelectionToken::Route(i).to_string()))
                .collect(),
        );
    }

    let total_pages = catalog.total_pages(page_len);
    if total_pages > 1 {
        rows.push(
            (0..total_pages)
                .map(|p| Button::new(format!("p{p}"), SelectionToken::Page(p).to_string()))
                .collect(),
        );
    }
    rows.push(service_row());

    (text, Keyboard::new(rows))
}

/// Start point prompt: grouped listing with one button per entry
#[must_use]
pub fn start_point_prompt(directory: &StartPointDirectory) -> (String, Keyboard) {
    let mut lines = vec!["Choose a starting point".to_string()];
    let mut rows: Vec<Vec<Button>> = Vec::new();

    for (group, members) in directory.grouped() {
        lines.push(format!("\n{group}:"));
        for (handle, entry) in members {
            lines.push(format!("  {handle}. {}", entry.formatted()));
            rows.push(vec![Button::new(
                entry.name.clone(),
                SelectionToken::StartPoint(handle).to_string(),
            )]);
        }
    }
    rows.push(service_row());

    (lines.join("\n"), Keyboard::new(rows))
}

/// Pace prompt with the fixed preset row
///
/// Preset payloads are the pace wire labels, not selection tokens.
#[must_use]
pub fn pace_prompt() -> (String, Keyboard) {
    let presets = Pace::ALL
        .into_iter()
        .map(|p| Button::new(p.button_label(), p.label()))
        .collect();
    let keyboard = Keyboard::new(vec![presets, service_row()]);
    ("Define a pace".to_string(), keyboard)
}

/// Keyboard attached to a freshly composed announcement
#[must_use]
pub fn announcement_keyboard() -> Keyboard {
    Keyboard::new(vec![vec![Button::new("Post to channel", POST_TO_CHANNEL_DATA)]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use domain::Route;

    fn catalog(n: usize) -> RouteCatalog {
        RouteCatalog::new(
            (0..n)
                .map(|i| {
                    Route::new(
                        format!("R{i:02}"),
                        "10 km",
                        "100 m",
                        format!("https://example.com/{i}"),
                        vec![],
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn date_prompt_presets_carry_formatted_dates() {
        let now = chrono_tz::UTC.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        let (text, kb) = date_prompt(now);
        assert_eq!(text, "Pick a date");
        assert_eq!(kb.rows[0][0].label, "Tomorrow");
        assert_eq!(kb.rows[0][0].token, "March 10");
        assert_eq!(kb.rows[0][1].token, "March 09");
        assert_eq!(kb.rows[1][0].token, RESTART_DATA);
    }

    #[test]
    fn time_prompt_shows_padded_values() {
        let (_, kb) = time_prompt(TimePicker::new(7, 0).unwrap());
        assert_eq!(kb.rows[1][0].label, "07");
        assert_eq!(kb.rows[1][1].label, "00");
        assert_eq!(kb.rows[1][0].token, NO_ACTION_DATA);
        assert_eq!(kb.rows[3][0].token, PICKER_SAVE_DATA);
    }

    #[test]
    fn route_list_numbers_by_absolute_index() {
        let (text, kb) = route_list(&catalog(12), 1, 10);
        assert!(text.starts_with("10. [R10]"));
        assert_eq!(kb.rows[0][0].token, "route-10");
        // 2 pages worth of routes -> page row present
        let page_row = &kb.rows[kb.rows.len() - 2];
        assert_eq!(page_row.len(), 2);
        assert_eq!(page_row[1].token, "1");
    }

    #[test]
    fn single_page_catalog_has_no_page_row() {
        let (_, kb) = route_list(&catalog(3), 0, 10);
        // selection row + service row only
        assert_eq!(kb.rows.len(), 2);
    }

    #[test]
    fn start_point_prompt_groups_and_handles() {
        let dir = StartPointDirectory::new([
            ("Fountain".to_string(), "https://maps/f".to_string(), Some("City".to_string())),
            ("Dam".to_string(), "https://maps/d".to_string(), None),
        ]);
        let (text, kb) = start_point_prompt(&dir);
        assert!(text.contains("City:"));
        assert!(text.contains("Other:"));
        assert_eq!(kb.rows[0][0].token, "start-point-0");
        assert_eq!(kb.rows[1][0].label, "Dam");
    }

    #[test]
    fn pace_prompt_uses_wire_labels() {
        let (_, kb) = pace_prompt();
        let tokens: Vec<_> = kb.rows[0].iter().map(|b| b.token.as_str()).collect();
        assert_eq!(tokens, vec!["easy/recovery", "Z2", "FAST"]);
    }
}
