//! Text grid rendering for the user table.

use crate::table::{Thumbnail, UserRow};

pub const HEADERS: [&str; 6] = [
    "Registered Users",
    "Image",
    "Roll No.",
    "Gender",
    "Attendance",
    "Predicted Age",
];

/// Fixed header cell width; wider cells grow their column.
const MIN_COLUMN_WIDTH: usize = 19;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderStyle {
    /// Colour the attendance cell green (present) or red (otherwise).
    pub color: bool,
}

impl RenderStyle {
    pub fn plain() -> Self {
        Self { color: false }
    }

    pub fn colored() -> Self {
        Self { color: true }
    }
}

impl std::fmt::Display for Thumbnail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Thumbnail::Loaded { width, height } => write!(f, "{width}x{height}"),
            Thumbnail::NotFound => f.write_str("Image not found"),
        }
    }
}

fn cells(row: &UserRow) -> [String; 6] {
    [
        row.name.clone(),
        row.thumbnail.to_string(),
        row.roll_no.clone(),
        row.gender.to_string(),
        row.attendance.to_string(),
        row.age.to_string(),
    ]
}

/// Render the header plus one line per row, boxed with ASCII rules.
pub fn render_table(rows: &[UserRow], style: RenderStyle) -> String {
    let body: Vec<[String; 6]> = rows.iter().map(cells).collect();

    let mut widths = HEADERS.map(|h| h.chars().count().max(MIN_COLUMN_WIDTH));
    for line in &body {
        for (w, cell) in widths.iter_mut().zip(line) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let rule = {
        let mut s = String::from("+");
        for w in &widths {
            s.push_str(&"-".repeat(w + 2));
            s.push('+');
        }
        s.push('\n');
        s
    };

    let mut out = String::new();
    out.push_str(&rule);
    push_line(&mut out, &HEADERS.map(str::to_owned), &widths, None);
    out.push_str(&rule);
    for (row, line) in rows.iter().zip(&body) {
        let color = style.color.then(|| if row.attendance.is_present() { GREEN } else { RED });
        push_line(&mut out, line, &widths, color);
    }
    if !body.is_empty() {
        out.push_str(&rule);
    }
    out
}

/// Attendance is the only coloured column.
const ATTENDANCE_COLUMN: usize = 4;

fn push_line(out: &mut String, cells: &[String; 6], widths: &[usize; 6], color: Option<&str>) {
    out.push('|');
    for (i, (cell, w)) in cells.iter().zip(widths).enumerate() {
        let pad = " ".repeat(w - cell.chars().count());
        match color {
            Some(c) if i == ATTENDANCE_COLUMN => {
                out.push_str(&format!(" {c}{cell}{RESET}{pad} |"));
            }
            _ => out.push_str(&format!(" {cell}{pad} |")),
        }
    }
    out.push('\n');
}
