use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use rust_xlsxwriter::Workbook;

use crate::layout::TABLE_HEADERS;
use crate::state::TableRow;

/// Write the row set as UTF-8 CSV with a header row. Fields containing the
/// separator, quotes or line breaks are quoted with doubled inner quotes.
pub fn write_csv(path: &Path, rows: &[TableRow]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed creating {}", path.display()))?;
    let mut out = BufWriter::new(file);

    let headers: Vec<String> = TABLE_HEADERS.iter().map(|h| h.to_string()).collect();
    write_csv_row(&mut out, &headers)?;
    for row in rows {
        write_csv_row(&mut out, &row.cells())?;
    }
    out.flush().context("failed flushing csv")?;
    Ok(())
}

fn write_csv_row<W: Write>(out: &mut W, cells: &[String]) -> Result<()> {
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            write!(out, ",").context("failed writing csv")?;
        }
        if needs_quotes(cell) {
            let escaped = cell.replace('"', "\"\"");
            write!(out, "\"{escaped}\"").context("failed writing csv")?;
        } else {
            write!(out, "{cell}").context("failed writing csv")?;
        }
    }
    writeln!(out).context("failed writing csv")?;
    Ok(())
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write the same row set as a one-sheet XLSX workbook, with a generated-at
/// stamp under the data.
pub fn write_xlsx(path: &Path, rows: &[TableRow], gameweek: u32) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(format!("GW{gameweek}"))?;

    for (col, header) in TABLE_HEADERS.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }
    for (i, row) in rows.iter().enumerate() {
        for (col, value) in row.cells().iter().enumerate() {
            sheet
                .write_string((i + 1) as u32, col as u16, value)
                .with_context(|| format!("write cell ({},{col})", i + 1))?;
        }
    }

    let stamp = format!("Generated {}", Local::now().format("%Y-%m-%d %H:%M"));
    sheet.write_string((rows.len() + 2) as u32, 0, &stamp)?;

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;
    Ok(())
}
