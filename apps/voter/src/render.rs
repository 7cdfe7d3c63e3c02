//! Plain-text rendering of election views.

use std::fmt::Write as _;

use client_core::{ElectionSnapshot, SyncState};

pub fn render_snapshot(snapshot: &ElectionSnapshot) -> String {
    let election = &snapshot.election;
    let policy = if election.multiple {
        "multiple choice"
    } else {
        "single choice"
    };
    let mut out = format!("#{} {} ({policy})\n", election.id, election.name);

    match &snapshot.state {
        SyncState::Idle | SyncState::Loading => out.push_str("  loading...\n"),
        SyncState::Failed(err) => {
            let _ = writeln!(out, "  error: {err}");
        }
        SyncState::Ready { error, .. } => {
            render_rows(&mut out, snapshot);
            if let Some(err) = error {
                let _ = writeln!(out, "  last action failed: {err}");
            }
        }
        SyncState::Submitting { mutation, .. } => {
            render_rows(&mut out, snapshot);
            let _ = writeln!(out, "  submitting {}...", mutation.method());
        }
    }
    out
}

fn render_rows(out: &mut String, snapshot: &ElectionSnapshot) {
    let width = snapshot
        .rows
        .iter()
        .map(|row| row.name.chars().count())
        .max()
        .unwrap_or(0);
    for row in &snapshot.rows {
        let mark = if row.checked { "x" } else { " " };
        let _ = writeln!(
            out,
            "  [{mark}] {:<width$}  {}",
            row.name,
            row.supported,
            width = width
        );
    }
}
