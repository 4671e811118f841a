//! Text and JSON output

use std::io::{self, Write};

use bibdiff_core::{ComparisonSummary, NormalizedRecord, ReconciliationRow};
use serde::Serialize;

const ABSENT: &str = "—";

/// One block per row: marker, presence count and title, then a line per
/// source.
pub fn write_text<W: Write>(
    out: &mut W,
    sources: &[&str],
    rows: &[ReconciliationRow<'_>],
) -> io::Result<()> {
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        let marker = if row.is_complete { "all" } else { "partial" };
        writeln!(
            out,
            "[{marker}] {}/{} {}",
            row.present_count,
            row.per_source.len(),
            row.representative_title()
        )?;
        for (name, slot) in sources.iter().zip(&row.per_source) {
            match slot {
                Some(record) => writeln!(out, "  {name}: {}", record_line(record))?,
                None => writeln!(out, "  {name}: {ABSENT}")?,
            }
        }
    }
    Ok(())
}

fn record_line(record: &NormalizedRecord) -> String {
    let title = if record.title.is_empty() {
        "(untitled)"
    } else {
        record.title.as_str()
    };
    [
        title,
        or_absent(&record.author),
        or_absent(&record.year_display),
        or_absent(&record.venue),
    ]
    .join(" | ")
}

fn or_absent(value: &str) -> &str {
    if value.is_empty() {
        ABSENT
    } else {
        value
    }
}

#[derive(Serialize)]
struct JsonReport<'r, 'a> {
    sources: &'r [&'r str],
    rows: &'r [ReconciliationRow<'a>],
}

/// Rows as pretty JSON, with the source names that label each slot
pub fn write_json<W: Write>(
    out: &mut W,
    sources: &[&str],
    rows: &[ReconciliationRow<'_>],
) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, &JsonReport { sources, rows })?;
    writeln!(out)
}

/// One value per line, or a JSON array
pub fn write_list<W: Write>(out: &mut W, values: &[&str], json: bool) -> io::Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, values)?;
        return writeln!(out);
    }
    for value in values {
        writeln!(out, "{value}")?;
    }
    Ok(())
}

/// Summary printed to stderr
pub fn status_line(summary: &ComparisonSummary) -> String {
    let per_source = summary
        .sources
        .iter()
        .map(|(name, count)| format!("{name} {count}"))
        .collect::<Vec<_>>()
        .join(", ");

    let mut line = format!(
        "{} records from {} sources ({per_source}); {} publications, {} in all sources",
        summary.total_records,
        summary.sources.len(),
        summary.rows,
        summary.complete_rows,
    );
    if summary.shadowed_records > 0 {
        line.push_str(&format!(
            "; {} duplicate(s) shadowed",
            summary.shadowed_records
        ));
    }
    line
}
