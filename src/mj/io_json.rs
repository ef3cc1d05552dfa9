// Tallies written in JSON.

use std::collections::BTreeMap;
use std::fs;

use log::debug;
use serde::Deserialize;
use snafu::prelude::*;

use crate::mj::*;

#[derive(Debug, Clone, Deserialize)]
struct JsonTallies {
    options: Vec<JsonOptionTally>,
}

#[derive(Debug, Clone, Deserialize)]
struct JsonOptionTally {
    id: String,
    label: Option<String>,
    tally: Option<BTreeMap<String, i64>>,
    approvals: Option<i64>,
}

pub fn read_json_tallies(path: &str) -> MjResult<Vec<ParsedTally>> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JsonTallies = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_json_tallies: {:?}", js);
    Ok(js
        .options
        .into_iter()
        .map(|o| ParsedTally {
            id: o.id,
            label: o.label,
            mentions: o.tally.unwrap_or_default().into_iter().collect(),
            approvals: o.approvals,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_approvals() {
        let path = concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/approval_basic/approvals.json"
        );
        let res = read_json_tallies(path).unwrap();
        assert_eq!(res.len(), 4);
        assert_eq!(res[0].id, "a");
        assert_eq!(res[0].approvals, Some(5));
        assert!(res[0].mentions.is_empty());
    }

    #[test]
    fn read_mentions() {
        let path = concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/mj_multi_source/tallies.json"
        );
        let res = read_json_tallies(path).unwrap();
        assert_eq!(res[0].label, Some("Alice".to_string()));
        assert!(res[0].mentions.contains(&("Good".to_string(), 1)));
        assert_eq!(res[0].approvals, None);
    }
}
