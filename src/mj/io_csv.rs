// Primitives for reading CSV files.

use log::debug;
use snafu::prelude::*;

use crate::mj::io_common::{rows_to_ballots, rows_to_tallies, split_header, Row};
use crate::mj::*;

pub fn read_csv_tallies(path: &str, cfs: &TallySource) -> MjResult<Vec<ParsedTally>> {
    let (header, rows) = get_records(path, cfs)?;
    rows_to_tallies(&header, &rows)
}

pub fn read_csv_ballots(path: &str, cfs: &TallySource) -> MjResult<ParsedSource> {
    let (header, rows) = get_records(path, cfs)?;
    rows_to_ballots(path, &header, &rows)
}

fn get_records(path: &str, cfs: &TallySource) -> MjResult<(Vec<String>, Vec<Row>)> {
    let first_row = cfs.first_data_row_index()?;
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let mut rows: Vec<Row> = Vec::new();
    // The index starts at 1 to respect most conventions in the excel world
    for (idx, line_r) in rdr.into_records().enumerate() {
        let line = line_r.context(CsvLineParseSnafu {})?;
        let lineno = line
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 1);
        debug!("get_records: {:?} {:?}", lineno, line);
        rows.push((lineno, line.iter().map(|s| s.to_string()).collect()));
    }
    split_header(path, rows, first_row)
}
