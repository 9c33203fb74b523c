//! PGN export of finished games.

use chess_core::{DrawReason, Outcome, START_FEN, WinReason};

use arbiter::GameReport;

/// Game metadata that does not come from the report itself.
#[derive(Debug, Clone)]
pub struct PgnHeaders<'a> {
    pub event: &'a str,
    pub site: &'a str,
    /// `YYYY.MM.DD`.
    pub date: String,
    pub round: u32,
}

/// Renders `report` as a PGN game: the seven-tag roster, setup tags for a
/// non-standard start, a termination tag and the movetext with result.
pub fn render(report: &GameReport, headers: &PgnHeaders<'_>) -> String {
    let mut tags: Vec<(&str, String)> = vec![
        ("Event", headers.event.to_string()),
        ("Site", headers.site.to_string()),
        ("Date", headers.date.clone()),
        ("Round", headers.round.to_string()),
        ("White", report.white.clone()),
        ("Black", report.black.clone()),
        ("Result", report.outcome.result_tag().to_string()),
    ];
    if report.start_fen != START_FEN {
        tags.push(("SetUp", "1".to_string()));
        tags.push(("FEN", report.start_fen.clone()));
    }
    tags.push(("Termination", termination(&report.outcome).to_string()));
    tags.push(("PlyCount", report.stats.plies.to_string()));

    let mut out = String::new();
    for (key, value) in tags {
        out.push_str(&format!("[{key} \"{}\"]\n", escape(&value)));
    }
    out.push('\n');
    out.push_str(&wrap(&report.movetext(), 80));
    out.push('\n');
    out
}

/// Several games separated by blank lines.
pub fn render_all<'r>(
    reports: impl IntoIterator<Item = &'r GameReport>,
    event: &str,
    date: &str,
) -> String {
    reports
        .into_iter()
        .enumerate()
        .map(|(i, report)| {
            render(
                report,
                &PgnHeaders {
                    event,
                    site: "arena",
                    date: date.to_string(),
                    round: i as u32 + 1,
                },
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn termination(outcome: &Outcome) -> &'static str {
    match outcome {
        Outcome::Decisive {
            reason: WinReason::Checkmate,
            ..
        }
        | Outcome::Draw {
            reason:
                DrawReason::Stalemate
                | DrawReason::InsufficientMaterial
                | DrawReason::FiftyMove
                | DrawReason::Repetition,
        } => "normal",
        Outcome::Decisive {
            reason: WinReason::ForfeitByIllegalMoveExhaustion,
            ..
        } => "rules infraction",
        Outcome::Decisive {
            reason: WinReason::Resignation,
            ..
        } => "resignation",
        Outcome::Draw {
            reason: DrawReason::MoveLimit,
        } => "adjudication",
        Outcome::Aborted { .. } => "abandoned",
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Breaks movetext into lines of at most `width` characters.
fn wrap(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut line_len = 0;
    for word in text.split_whitespace() {
        if line_len > 0 && line_len + 1 + word.len() > width {
            out.push('\n');
            line_len = 0;
        } else if line_len > 0 {
            out.push(' ');
            line_len += 1;
        }
        out.push_str(word);
        line_len += word.len();
    }
    out
}

#[cfg(test)]
#[path = "pgn_tests.rs"]
mod pgn_tests;
