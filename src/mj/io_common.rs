// Layout of tabular sources, shared between the CSV and the Excel readers.

use log::debug;
use snafu::prelude::*;
use std::path::Path;

use crate::mj::*;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

pub fn make_default_id(path: &str) -> impl Fn(usize) -> String {
    let simplified_file_name = simplify_file_name(path);
    move |lineno| format!("{}-{:08}", simplified_file_name, lineno)
}

/// A row of cells, with its line number (starting at 1).
pub type Row = (usize, Vec<String>);

/// Separates the header from the data rows.
///
/// The header is the row just above `first_data_row`. Rows are numbered from 1.
pub fn split_header(
    path: &str,
    rows: Vec<Row>,
    first_data_row: usize,
) -> MjResult<(Vec<String>, Vec<Row>)> {
    if first_data_row < 2 {
        whatever!(
            "{}: firstDataRowIndex must be at least 2, the row above the data holds the header",
            path
        );
    }
    let header_lineno = first_data_row - 1;
    let mut header: Option<Vec<String>> = None;
    let mut data: Vec<Row> = Vec::new();
    for (lineno, cells) in rows.into_iter() {
        if lineno == header_lineno {
            header = Some(cells);
        } else if lineno >= first_data_row && !cells.iter().all(|c| c.trim().is_empty()) {
            data.push((lineno, cells));
        }
    }
    let header = header.context(MissingHeaderSnafu {
        lineno: header_lineno,
        path,
    })?;
    debug!("split_header: {:?}: header: {:?}", path, header);
    Ok((header, data))
}

fn cell(cells: &[String], idx: usize) -> &str {
    cells.get(idx).map(|s| s.trim()).unwrap_or("")
}

fn find_column(header: &[String], name: &str) -> Option<usize> {
    header
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}

fn parse_count(lineno: usize, content: &str) -> MjResult<i64> {
    if content.is_empty() {
        return Ok(0);
    }
    content
        .parse::<i64>()
        .ok()
        .context(ParsingCountSnafu { lineno, content })
}

/// Reads one row of counts per option.
///
/// The option id is in the `id` column (or the first column if no column is named
/// so). An optional `label` column holds the labels, an optional `approvals` column
/// the approval counts. All the other named columns are grade labels.
pub fn rows_to_tallies(header: &[String], rows: &[Row]) -> MjResult<Vec<ParsedTally>> {
    let id_idx = find_column(header, "id").unwrap_or(0);
    let label_idx = find_column(header, "label");
    let approvals_idx = find_column(header, "approvals");
    let grade_cols: Vec<(usize, String)> = header
        .iter()
        .enumerate()
        .filter(|(idx, h)| {
            *idx != id_idx
                && Some(*idx) != label_idx
                && Some(*idx) != approvals_idx
                && !h.trim().is_empty()
        })
        .map(|(idx, h)| (idx, h.trim().to_string()))
        .collect();

    let mut res: Vec<ParsedTally> = Vec::new();
    for (lineno, cells) in rows.iter() {
        let id = cell(cells, id_idx);
        if id.is_empty() {
            whatever!("Line {}: missing option id", lineno);
        }
        let mut mentions: Vec<(String, i64)> = Vec::new();
        for (idx, grade) in grade_cols.iter() {
            let count = parse_count(*lineno, cell(cells, *idx))?;
            mentions.push((grade.clone(), count));
        }
        let approvals = match approvals_idx {
            Some(idx) => Some(parse_count(*lineno, cell(cells, idx))?),
            None => None,
        };
        let label = label_idx
            .map(|idx| cell(cells, idx))
            .filter(|l| !l.is_empty())
            .map(|l| l.to_string());
        debug!(
            "rows_to_tallies: lineno: {:?} id: {:?} mentions: {:?} approvals: {:?}",
            lineno, id, mentions, approvals
        );
        res.push(ParsedTally {
            id: id.to_string(),
            label,
            mentions,
            approvals,
        });
    }
    Ok(res)
}

/// Reads one row per ballot.
///
/// The first column identifies the ballot, the header names the option of every
/// other column. An optional `count` column holds the weight of the ballot.
pub fn rows_to_ballots(path: &str, header: &[String], rows: &[Row]) -> MjResult<ParsedSource> {
    let default_id = make_default_id(path);
    let count_idx = find_column(header, "count").filter(|idx| *idx != 0);
    let option_cols: Vec<(usize, String)> = header
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(idx, h)| Some(*idx) != count_idx && !h.trim().is_empty())
        .map(|(idx, h)| (idx, h.trim().to_string()))
        .collect();

    let mut ballots: Vec<ParsedBallot> = Vec::new();
    for (lineno, cells) in rows.iter() {
        let id = match cell(cells, 0) {
            "" => default_id(*lineno),
            s => s.to_string(),
        };
        let count = match count_idx.map(|idx| cell(cells, idx)) {
            None | Some("") => None,
            Some(content) => {
                let c = parse_count(*lineno, content)?;
                if c < 0 {
                    return ParsingCountSnafu {
                        lineno: *lineno,
                        content: c.to_string(),
                    }
                    .fail();
                }
                Some(c as u64)
            }
        };
        let choices: Vec<(String, String)> = option_cols
            .iter()
            .map(|(idx, option_id)| (option_id.clone(), cell(cells, *idx).to_string()))
            .filter(|(_, c)| !c.is_empty())
            .collect();
        debug!(
            "rows_to_ballots: lineno: {:?} id: {:?} choices: {:?}",
            lineno, id, choices
        );
        ballots.push(ParsedBallot {
            id: Some(id),
            count,
            choices,
        });
    }
    Ok(ParsedSource::Ballots {
        options: option_cols.into_iter().map(|(_, o)| o).collect(),
        ballots,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(lineno: usize, cells: &[&str]) -> Row {
        (lineno, cells.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn header_above_the_data() {
        let rows = vec![
            row(1, &["title"]),
            row(2, &["id", "Good"]),
            row(3, &["a", "2"]),
            row(4, &["", ""]),
        ];
        let (header, data) = split_header("t.csv", rows, 3).unwrap();
        assert_eq!(header, vec!["id".to_string(), "Good".to_string()]);
        assert_eq!(data, vec![row(3, &["a", "2"])]);
        assert!(split_header("t.csv", vec![], 1).is_err());
        assert!(matches!(
            split_header("t.csv", vec![row(1, &["a"])], 3),
            Err(MjError::MissingHeader { lineno: 2, .. })
        ));
    }

    #[test]
    fn tallies_with_labels() {
        let header: Vec<String> = ["Good", "ID", "Label", "Bad"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = vec![
            row(2, &["3", "a", " Alice ", ""]),
            row(3, &["1", "b", "", "4"]),
        ];
        let res = rows_to_tallies(&header, &rows).unwrap();
        assert_eq!(
            res[0],
            ParsedTally {
                id: "a".to_string(),
                label: Some("Alice".to_string()),
                mentions: vec![("Good".to_string(), 3), ("Bad".to_string(), 0)],
                approvals: None,
            }
        );
        assert_eq!(res[1].label, None);
        assert_eq!(res[1].mentions[1], ("Bad".to_string(), 4));
    }

    #[test]
    fn bad_counts() {
        let header: Vec<String> = vec!["id".to_string(), "approvals".to_string()];
        let rows = vec![row(2, &["a", "three"])];
        assert!(matches!(
            rows_to_tallies(&header, &rows),
            Err(MjError::ParsingCount { lineno: 2, .. })
        ));
        let rows = vec![row(2, &["a", "-3"])];
        let res = rows_to_tallies(&header, &rows).unwrap();
        assert_eq!(res[0].approvals, Some(-3));
    }

    #[test]
    fn ballots_with_blanks() {
        let header: Vec<String> = ["voter", "x", "count", "y"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = vec![
            row(2, &["v1", "Good", "2", ""]),
            row(3, &["", "", "", "Bad"]),
        ];
        let res = rows_to_ballots("/data/b.csv", &header, &rows).unwrap();
        match res {
            ParsedSource::Ballots { options, ballots } => {
                assert_eq!(options, vec!["x".to_string(), "y".to_string()]);
                assert_eq!(ballots[0].count, Some(2));
                assert_eq!(
                    ballots[0].choices,
                    vec![("x".to_string(), "Good".to_string())]
                );
                assert_eq!(ballots[1].id, Some("b.csv-00000003".to_string()));
                assert_eq!(ballots[1].count, None);
            }
            ParsedSource::Tallies(_) => panic!("expected ballots"),
        }
    }
}
