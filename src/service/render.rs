use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tera::{Context, Tera};

use crate::models::timetable::SwimSession;

// Matches the layout the CLI has always printed: Type | Starts | Ends inside
// a 54-column border.
const COLUMNS: [usize; 3] = [24, 13, 13];

const CAPTION_FORMAT: &str = "%A %B %d";
const CLOCK_FORMAT: &str = "%H:%M";

/// Renders the sessions as a bordered fixed-width table, preceded by a bold
/// caption naming the day the window starts on.
pub fn render_table(window_start: DateTime<Utc>, sessions: &[SwimSession], tz: Tz) -> String {
    let caption = window_start.with_timezone(&tz).format(CAPTION_FORMAT);
    let mut out = format!(" \x1b[1mSwimming times for {}\x1b[0m\n", caption);

    out.push_str(&border_row('┌', '┬', '┐'));
    out.push('\n');
    out.push_str(&body_row(["Type", "Starts", "Ends"]));
    out.push('\n');
    out.push_str(&border_row('├', '┼', '┤'));
    out.push('\n');
    for session in sessions {
        out.push_str(&body_row([
            &session.name,
            &session.start.format(CLOCK_FORMAT).to_string(),
            &session.end.format(CLOCK_FORMAT).to_string(),
        ]));
        out.push('\n');
    }
    out.push_str(&border_row('└', '┴', '┘'));
    out
}

fn border_row(left: char, mid: char, right: char) -> String {
    let mut row = String::new();
    row.push(left);
    for (i, width) in COLUMNS.iter().enumerate() {
        if i > 0 {
            row.push(mid);
        }
        for _ in 0..*width {
            row.push('─');
        }
    }
    row.push(right);
    row
}

fn body_row(cells: [&str; 3]) -> String {
    let mut row = String::from("│");
    for (cell, width) in cells.into_iter().zip(COLUMNS) {
        let cell: String = cell.chars().take(width).collect();
        row.push_str(&format!("{:<width$}│", cell, width = width));
    }
    row
}

/// Loads every HTML template under the configured directory once at startup.
pub fn load_templates(template_dir: &str) -> Result<Tera, tera::Error> {
    let glob = format!("{}/**/*.html", template_dir.trim_end_matches('/'));
    Tera::new(&glob)
}

#[derive(Serialize)]
struct SessionRow {
    name: String,
    starts: String,
    ends: String,
}

pub fn render_index_page(templates: &Tera) -> Result<String, tera::Error> {
    templates.render("template.html", &Context::new())
}

pub fn render_results_page(
    templates: &Tera,
    window_start: DateTime<Utc>,
    sessions: &[SwimSession],
    tz: Tz,
) -> Result<String, tera::Error> {
    let rows: Vec<SessionRow> = sessions
        .iter()
        .map(|session| SessionRow {
            name: session.name.clone(),
            starts: session.start.format(CLOCK_FORMAT).to_string(),
            ends: session.end.format(CLOCK_FORMAT).to_string(),
        })
        .collect();

    let mut context = Context::new();
    context.insert(
        "stamp",
        &window_start.with_timezone(&tz).format(CAPTION_FORMAT).to_string(),
    );
    context.insert("results", &rows);
    templates.render("result.html", &context)
}
