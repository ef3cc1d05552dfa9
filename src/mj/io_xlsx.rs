// Tallies and ballots stored in Excel workbooks.

use calamine::{open_workbook, DataType, Range, Reader, Xlsx};
use log::debug;
use snafu::prelude::*;

use crate::mj::io_common::{rows_to_ballots, rows_to_tallies, split_header, Row};
use crate::mj::*;

pub fn read_xlsx_tallies(path: &str, cfs: &TallySource) -> MjResult<Vec<ParsedTally>> {
    let (header, rows) = get_rows(path, cfs)?;
    rows_to_tallies(&header, &rows)
}

pub fn read_xlsx_ballots(path: &str, cfs: &TallySource) -> MjResult<ParsedSource> {
    let (header, rows) = get_rows(path, cfs)?;
    rows_to_ballots(path, &header, &rows)
}

fn cell_to_string(lineno: usize, cell: &DataType) -> MjResult<String> {
    match cell {
        DataType::Empty => Ok(String::new()),
        DataType::String(s) => Ok(s.clone()),
        DataType::Int(i) => Ok(i.to_string()),
        // Excel stores all the numbers as floats.
        DataType::Float(f) if f.fract() == 0.0 => Ok(format!("{}", *f as i64)),
        _ => ExcelWrongCellTypeSnafu {
            lineno: lineno as u64,
            content: format!("{:?}", cell),
        }
        .fail(),
    }
}

fn get_rows(path: &str, cfs: &TallySource) -> MjResult<(Vec<String>, Vec<Row>)> {
    let first_row = cfs.first_data_row_index()?;
    let wrange = get_range(path, cfs)?;
    // The range starts at the first non-empty cell.
    let (row_start, col_start) = wrange.start().unwrap_or((0, 0));
    let mut rows: Vec<Row> = Vec::new();
    for (idx, row) in wrange.rows().enumerate() {
        let lineno = row_start as usize + idx + 1;
        let mut cells: Vec<String> = vec![String::new(); col_start as usize];
        for cell in row.iter() {
            cells.push(cell_to_string(lineno, cell)?);
        }
        debug!("get_rows: {:?} {:?}", lineno, cells);
        rows.push((lineno, cells));
    }
    split_header(path, rows, first_row)
}

fn get_range(path: &str, cfs: &TallySource) -> MjResult<Range<DataType>> {
    let worksheet_name_o = cfs.excel_worksheet_name.clone();
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        &path, &worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet_name_o {
        let wrange = workbook
            .worksheet_range(&worksheet_name)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let all_worksheets = workbook.worksheets();
        match all_worksheets.as_slice() {
            [] => EmptyExcelSnafu { path }.fail(),
            [(worksheet_name, wrange)] => {
                debug!(
                    "get_range: path: {:?} worksheet: {:?}",
                    &path, &worksheet_name
                );
                Ok(wrange.clone())
            }
            _ => whatever!(
                "{}: too many worksheets, the worksheet name must be provided with excelWorksheetName",
                path
            ),
        }
    }
}
