use crate::error::{DashError, Result};
use crate::models::{Observation, RawRecord, RawTable};
use crate::transform::is_year_label;
use csv::{ReaderBuilder, Trim, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

pub const COUNTRY_CODE_COL: &str = "Country Code";
pub const COUNTRY_NAME_COL: &str = "Country Name";

/// Header of the long-format export.
pub const EXPORT_HEADER: [&str; 5] =
    ["Country Code", "Country Name", "Region", "Year", "Value"];

/// Load the wide table (one row per country, one column per year) from a CSV file.
pub fn load_wide_csv<P: AsRef<Path>>(path: P) -> Result<RawTable> {
    let path = path.as_ref();
    let table = read_wide_csv(File::open(path)?)?;
    log::info!(
        "loaded {} rows, {} columns from {}",
        table.records.len(),
        table.headers.len(),
        path.display()
    );
    Ok(table)
}

/// Parse the wide table from any reader.
///
/// Only the `Country Code`, `Country Name` and four-digit year columns are
/// kept. Empty cells become `None`; non-numeric cells and `NaN`/`inf` are
/// logged and treated as absent.
pub fn read_wide_csv<R: Read>(rdr: R) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(rdr);
    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();

    let code_idx = headers
        .iter()
        .position(|h| h == COUNTRY_CODE_COL)
        .ok_or_else(|| {
            DashError::Configuration(format!("missing required column {COUNTRY_CODE_COL:?}"))
        })?;
    let name_idx = headers.iter().position(|h| h == COUNTRY_NAME_COL);
    let year_idx: Vec<(usize, &str)> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| is_year_label(h))
        .map(|(i, h)| (i, h.as_str()))
        .collect();

    let mut records = Vec::new();
    for (line, row) in rdr.records().enumerate() {
        let row = row?;
        let code = row.get(code_idx).unwrap_or_default();
        if code.is_empty() {
            log::warn!("row {}: empty {COUNTRY_CODE_COL}, skipped", line + 2);
            continue;
        }
        let mut rec = RawRecord::new(code);
        rec.country_name = name_idx
            .and_then(|i| row.get(i))
            .filter(|s| !s.is_empty())
            .map(String::from);
        for (i, label) in &year_idx {
            let cell = row.get(*i).unwrap_or_default();
            let value = if cell.is_empty() {
                None
            } else {
                match cell.parse::<f64>() {
                    Ok(v) if v.is_finite() => Some(v),
                    Ok(_) => {
                        log::warn!("{code} {label}: non-finite value {cell:?} treated as missing");
                        None
                    }
                    Err(_) => {
                        log::warn!("{code} {label}: non-numeric value {cell:?} treated as missing");
                        None
                    }
                }
            };
            rec.values.insert((*label).to_string(), value);
        }
        records.push(rec);
    }

    Ok(RawTable { headers, records })
}

/// Prefix cells that a spreadsheet would evaluate as a formula.
fn sanitize_cell(s: &str) -> String {
    match s.chars().next() {
        Some('=' | '+' | '-' | '@') => format!("'{s}"),
        _ => s.to_string(),
    }
}

/// Write observations as long-format CSV (UTF-8, header row, one row per observation).
pub fn write_csv<W: Write>(points: &[Observation], out: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(out);
    wtr.write_record(EXPORT_HEADER)?;
    for p in points {
        wtr.write_record([
            sanitize_cell(&p.country_code),
            p.country_name.as_deref().map(sanitize_cell).unwrap_or_default(),
            p.region.as_deref().map(sanitize_cell).unwrap_or_default(),
            p.year.to_string(),
            p.value.map(|v| v.to_string()).unwrap_or_default(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// CSV export as bytes, for download buttons and the like.
pub fn export_csv_bytes(points: &[Observation]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(points, &mut buf)?;
    Ok(buf)
}

/// Save observations as CSV with header.
pub fn save_csv<P: AsRef<Path>>(points: &[Observation], path: P) -> Result<()> {
    write_csv(points, File::create(path)?)
}

/// Save observations as pretty JSON array.
pub fn save_json<P: AsRef<Path>>(points: &[Observation], path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(points)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
