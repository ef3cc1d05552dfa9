use crate::mj::io_common::simplify_file_name;
use crate::mj::*;

use snafu::prelude::*;
use std::fs;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "contestName")]
    pub contest_name: String,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "contestDate")]
    pub contest_date: Option<String>,
    #[serde(rename = "contestJurisdiction")]
    pub contest_jurisdiction: Option<String>,
    #[serde(rename = "contestOffice")]
    pub contest_office: Option<String>,
}

/// The `config` section of the summary.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub contest: String,
    pub date: Option<String>,
    pub jurisdiction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub office: Option<String>,
    #[serde(rename = "votingSystem")]
    pub voting_system: String,
    #[serde(rename = "gradeScale", skip_serializing_if = "Option::is_none")]
    pub grade_scale: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct TallySource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "firstDataRowIndex")]
    pub first_data_row_index: Option<JSValue>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    #[serde(rename = "treatBlankAsWorst")]
    pub treat_blank_as_worst: Option<bool>,
}

impl TallySource {
    /// The first row with data, starting at 1. The header is the row just above.
    pub fn first_data_row_index(&self) -> MjResult<usize> {
        match &self.first_data_row_index {
            None => Ok(2),
            x => read_js_int(x),
        }
    }

    pub fn treat_blank_as_worst(&self) -> bool {
        self.treat_blank_as_worst.unwrap_or(true)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OptionEntry {
    pub id: String,
    pub label: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct MjConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "votingSystem")]
    pub voting_system: Option<String>,
    #[serde(rename = "gradeScale")]
    pub grade_scale: Option<String>,
    pub options: Option<Vec<OptionEntry>>,
    #[serde(rename = "tallySources", default)]
    pub tally_sources: Vec<TallySource>,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum VotingSystem {
    MajorityJudgment,
    Approval,
}

impl VotingSystem {
    pub fn name(&self) -> &'static str {
        match self {
            VotingSystem::MajorityJudgment => "majorityJudgment",
            VotingSystem::Approval => "approval",
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum GradeScale {
    Mention7,
    Mention5,
}

impl GradeScale {
    pub fn name(&self) -> &'static str {
        match self {
            GradeScale::Mention7 => "mention7",
            GradeScale::Mention5 => "mention5",
        }
    }
}

impl MjConfig {
    /// A configuration for a contest run from the command line only.
    pub fn from_input(input: &str) -> MjConfig {
        MjConfig {
            output_settings: OutputSettings {
                contest_name: simplify_file_name(input),
                output_directory: None,
                contest_date: None,
                contest_jurisdiction: None,
                contest_office: None,
            },
            voting_system: None,
            grade_scale: None,
            options: None,
            tally_sources: vec![],
        }
    }

    pub fn voting_system(&self) -> MjResult<VotingSystem> {
        match self.voting_system.as_deref() {
            None | Some("majorityJudgment") => Ok(VotingSystem::MajorityJudgment),
            Some("approval") => Ok(VotingSystem::Approval),
            Some(x) => whatever!("unknown voting system: {}", x),
        }
    }

    pub fn grade_scale(&self) -> MjResult<GradeScale> {
        match self.grade_scale.as_deref() {
            None | Some("mention7") => Ok(GradeScale::Mention7),
            Some("mention5") => Ok(GradeScale::Mention5),
            Some(x) => whatever!("unknown grade scale: {}", x),
        }
    }
}

pub fn read_config(path: &str) -> MjResult<MjConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: MjConfig = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(config)
}

pub fn read_summary(path: String) -> MjResult<JSValue> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

fn read_js_int(x: &Option<JSValue>) -> MjResult<usize> {
    match x {
        Some(JSValue::Number(n)) => n
            .as_u64()
            .map(|x| x as usize)
            .context(ParsingJsonNumberSnafu {
                content: n.to_string(),
            }),
        Some(JSValue::String(s)) => s
            .trim()
            .parse::<usize>()
            .ok()
            .context(ParsingJsonNumberSnafu { content: s.clone() }),
        other => None.context(ParsingJsonNumberSnafu {
            content: format!("{:?}", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let js = r#"{
            "outputSettings": {"contestName": "Board", "outputDirectory": null,
                               "contestDate": "2024-05-01", "contestJurisdiction": null,
                               "contestOffice": null},
            "tallySources": [{"provider": "csv", "filePath": "t.csv", "firstDataRowIndex": "3"}]
        }"#;
        let config: MjConfig = serde_json::from_str(js).unwrap();
        assert_eq!(config.output_settings.contest_name, "Board");
        assert_eq!(
            config.voting_system().unwrap(),
            VotingSystem::MajorityJudgment
        );
        assert_eq!(config.grade_scale().unwrap(), GradeScale::Mention7);
        assert_eq!(config.options, None);
        let source = &config.tally_sources[0];
        assert_eq!(source.first_data_row_index().unwrap(), 3);
        assert!(source.treat_blank_as_worst());
    }

    #[test]
    fn unknown_names_are_rejected() {
        let mut config = MjConfig::from_input("/tmp/votes.csv");
        assert_eq!(config.output_settings.contest_name, "votes.csv");
        config.voting_system = Some("borda".to_string());
        assert!(config.voting_system().is_err());
        config.grade_scale = Some("mention3".to_string());
        assert!(config.grade_scale().is_err());
        config.grade_scale = Some("mention5".to_string());
        assert_eq!(config.grade_scale().unwrap(), GradeScale::Mention5);
    }

    #[test]
    fn data_row_index() {
        assert_eq!(read_js_int(&Some(serde_json::json!(4))).unwrap(), 4);
        assert!(read_js_int(&Some(serde_json::json!(-1))).is_err());
        assert!(read_js_int(&Some(serde_json::json!("x"))).is_err());
    }
}
