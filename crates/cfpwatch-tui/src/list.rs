// Non-interactive listing: the filtered, sorted view as a text table, CSV
// or JSON.

use std::io::Write;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;

use cfpwatch_core::conference::Conference;
use cfpwatch_core::deadline::{countdown_label, days_remaining, deadline_display};

/// Shown when the filtered view is empty.
pub const EMPTY_MESSAGE: &str = "There are no upcoming conferences for the selected categories - \
enable \"Show past conferences\" to see previous ones";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

/// One output row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListRow {
    pub id: String,
    pub conference: String,
    pub date: String,
    pub location: String,
    pub deadline: String,
    pub timezone: String,
    pub countdown: String,
    pub days_left: Option<i64>,
    pub tags: String,
}

impl ListRow {
    pub fn new(conf: &Conference, now: DateTime<Utc>) -> Self {
        let status = conf.deadline_status();
        ListRow {
            id: conf.id.clone().unwrap_or_default(),
            conference: conf.display_title(),
            date: conf.date.clone().unwrap_or_default(),
            location: conf.location(),
            deadline: deadline_display(conf.deadline.as_deref()),
            timezone: conf.timezone.clone().unwrap_or_default(),
            countdown: countdown_label(status, now),
            days_left: status.instant().map(|t| days_remaining(t, now)),
            tags: conf.tags.join(", "),
        }
    }
}

pub fn rows(conferences: &[&Conference], now: DateTime<Utc>) -> Vec<ListRow> {
    conferences.iter().map(|c| ListRow::new(c, now)).collect()
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

fn width(s: &str) -> usize {
    s.chars().count()
}

/// Aligned plain-text table. An empty list prints the empty-view message.
pub fn write_table<W: Write>(out: &mut W, rows: &[ListRow]) -> anyhow::Result<()> {
    if rows.is_empty() {
        writeln!(out, "{EMPTY_MESSAGE}")?;
        return Ok(());
    }

    let header = ["CONFERENCE", "DEADLINE", "COUNTDOWN", "DATE", "LOCATION", "TAGS"];
    let cells: Vec<[&str; 6]> = rows
        .iter()
        .map(|r| {
            [
                r.conference.as_str(),
                r.deadline.as_str(),
                r.countdown.as_str(),
                r.date.as_str(),
                r.location.as_str(),
                r.tags.as_str(),
            ]
        })
        .collect();

    let mut widths = header.map(width);
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(width(cell));
        }
    }

    for row in std::iter::once(&header).chain(cells.iter()) {
        let line = row
            .iter()
            .zip(widths)
            .map(|(cell, w)| format!("{cell:<w$}"))
            .collect::<Vec<_>>()
            .join("  ");
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}

pub fn write_csv<W: Write>(out: &mut W, rows: &[ListRow]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for row in rows {
        writer.serialize(row).context("failed to write CSV row")?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(out: &mut W, rows: &[ListRow]) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, rows).context("failed to write JSON")?;
    writeln!(out)?;
    Ok(())
}

pub fn write<W: Write>(out: &mut W, format: OutputFormat, rows: &[ListRow]) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => write_table(out, rows),
        OutputFormat::Csv => write_csv(out, rows),
        OutputFormat::Json => write_json(out, rows),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
