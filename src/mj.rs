pub mod config_reader;
mod io_common;
mod io_csv;
mod io_json;
mod io_xlsx;

use log::{debug, info, warn};

use majority_judgment::*;
use snafu::prelude::*;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::mj::config_reader::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum MjError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Missing worksheet in {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Line {lineno}: could not understand cell {content}"))]
    ExcelWrongCellType { lineno: u64, content: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing the summary to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading a CSV line"))]
    CsvLineParse { source: csv::Error },
    #[snafu(display("Missing header row {lineno} in {path}"))]
    MissingHeader { lineno: usize, path: String },
    #[snafu(display("Line {lineno}: could not read the count {content:?}"))]
    ParsingCount { lineno: usize, content: String },
    #[snafu(display("Could not read the index {content}"))]
    ParsingJsonNumber { content: String },
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("Tabulation error: {source}"))]
    Tabulation { source: JudgmentErrors },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type MjResult<T> = Result<T, MjError>;

/// One row of counts, as read from a source.
/// This is before checking the grades against the scale.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedTally {
    pub id: String,
    pub label: Option<String>,
    pub mentions: Vec<(String, i64)>,
    pub approvals: Option<i64>,
}

/// A ballot, as parsed by the readers.
/// The choices are (option id, cell content). Empty cells are not kept.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedBallot {
    pub id: Option<String>,
    pub count: Option<u64>,
    pub choices: Vec<(String, String)>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ParsedSource {
    Tallies(Vec<ParsedTally>),
    /// The ballots, along with all the option ids found in the header.
    Ballots {
        options: Vec<String>,
        ballots: Vec<ParsedBallot>,
    },
}

/// Command line settings that take precedence over the configuration file.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct SourceOverrides {
    pub input: Option<String>,
    pub input_type: Option<String>,
    pub grade_scale: Option<String>,
    pub voting_system: Option<String>,
    pub excel_worksheet_name: Option<String>,
}

fn read_source(root: &Path, cfs: &TallySource) -> MjResult<ParsedSource> {
    let p: PathBuf = root.join(&cfs.file_path);
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read tally file {:?}", p2);
    let res = match cfs.provider.as_str() {
        "json" => ParsedSource::Tallies(io_json::read_json_tallies(&p2)?),
        "csv" => ParsedSource::Tallies(io_csv::read_csv_tallies(&p2, cfs)?),
        "xlsx" => ParsedSource::Tallies(io_xlsx::read_xlsx_tallies(&p2, cfs)?),
        "csv_ballots" => io_csv::read_csv_ballots(&p2, cfs)?,
        "xlsx_ballots" => io_xlsx::read_xlsx_ballots(&p2, cfs)?,
        x => whatever!("Provider not implemented {:?}", x),
    };
    Ok(res)
}

/// Keeps the options in order of first appearance, with their labels.
#[derive(Debug, Default)]
struct OptionRegistry {
    declared: bool,
    options: Vec<VoteOption>,
}

impl OptionRegistry {
    fn new(config: &MjConfig) -> MjResult<OptionRegistry> {
        match config.options.as_ref() {
            Some(opts) => {
                let declared: Vec<VoteOption> = opts
                    .iter()
                    .map(|o| VoteOption::new(&o.id, o.label.as_deref().unwrap_or(&o.id)))
                    .collect();
                let options = validate_options(&declared, &TabulationRules::DEFAULT_RULES)
                    .context(TabulationSnafu {})?;
                Ok(OptionRegistry {
                    declared: true,
                    options,
                })
            }
            None => Ok(OptionRegistry::default()),
        }
    }

    /// Registers an option seen in a source.
    /// When the options are declared, unknown options are rejected.
    fn see(&mut self, id: &str, label: Option<&str>) -> MjResult<()> {
        let id = id.trim();
        if self.options.iter().any(|o| o.id == id) {
            return Ok(());
        }
        if self.declared {
            return Err(JudgmentErrors::UnknownOption(id.to_string())).context(TabulationSnafu {});
        }
        self.options
            .push(VoteOption::new(id, label.map(|l| l.trim()).unwrap_or(id)));
        Ok(())
    }

    /// The options that a ballot source covers.
    fn ballot_options(&mut self, header: &[String]) -> MjResult<Vec<VoteOption>> {
        for id in header.iter() {
            self.see(id, None)?;
        }
        if self.declared {
            Ok(self.options.clone())
        } else {
            Ok(self
                .options
                .iter()
                .filter(|o| header.iter().any(|h| h.trim() == o.id))
                .cloned()
                .collect())
        }
    }

    fn validated(&self) -> MjResult<Vec<VoteOption>> {
        validate_options(&self.options, &TabulationRules::DEFAULT_RULES).context(TabulationSnafu {})
    }
}

fn is_approval_mark(cell: &str) -> bool {
    !matches!(
        cell.trim().to_lowercase().as_str(),
        "" | "0" | "no" | "false"
    )
}

fn tabulate_judgment<G: Grade>(config: &MjConfig, root: &Path) -> MjResult<Vec<JSValue>> {
    let mut registry = OptionRegistry::new(config)?;
    let mut tallies: HashMap<String, MentionTally<G>> = HashMap::new();

    for cfs in config.tally_sources.iter() {
        match read_source(root, cfs)? {
            ParsedSource::Tallies(rows) => {
                for row in rows.iter() {
                    if row.approvals.is_some() {
                        whatever!(
                            "Option {}: approval counts cannot be used in a majority judgment vote",
                            row.id
                        );
                    }
                    registry.see(&row.id, row.label.as_deref())?;
                    let tally: MentionTally<G> = MentionTally::from_labelled_counts(&row.mentions)
                        .context(TabulationSnafu {})?;
                    debug!("tabulate_judgment: option {:?} tally: {:?}", row.id, tally);
                    tallies
                        .entry(row.id.trim().to_string())
                        .or_default()
                        .merge(&tally);
                }
            }
            ParsedSource::Ballots { options, ballots } => {
                let source_options = registry.ballot_options(&options)?;
                let mut judgment_ballots: Vec<JudgmentBallot<G>> = Vec::new();
                for pb in ballots.iter() {
                    let mut judgments: Vec<(String, G)> = Vec::new();
                    for (option_id, cell) in pb.choices.iter() {
                        let grade = G::from_label(cell).context(TabulationSnafu {})?;
                        judgments.push((option_id.trim().to_string(), grade));
                    }
                    debug!("Judgments for ballot {:?}: {:?}", pb.id, judgments);
                    judgment_ballots.push(JudgmentBallot {
                        judgments,
                        count: pb.count.unwrap_or(1),
                    });
                }
                let rules = TabulationRules {
                    blank_as_worst: cfs.treat_blank_as_worst(),
                    ..TabulationRules::DEFAULT_RULES
                };
                let summaries = tally_judgment_ballots(&source_options, &judgment_ballots, &rules)
                    .context(TabulationSnafu {})?;
                for s in summaries.iter() {
                    tallies.entry(s.id.clone()).or_default().merge(&s.tally);
                }
            }
        }
    }

    let summaries: Vec<OptionSummary<G>> = registry
        .validated()?
        .iter()
        .map(|o| {
            let tally = tallies.remove(&o.id).unwrap_or_default();
            OptionSummary::new(&o.id, &o.label, tally)
        })
        .collect();

    let res = run_majority_judgment(&summaries, &TabulationRules::DEFAULT_RULES)
        .context(TabulationSnafu {})?;
    Ok(judgment_results_to_json(&res))
}

fn tabulate_approval(config: &MjConfig, root: &Path) -> MjResult<Vec<JSValue>> {
    let mut registry = OptionRegistry::new(config)?;
    let mut approvals: HashMap<String, u64> = HashMap::new();

    for cfs in config.tally_sources.iter() {
        match read_source(root, cfs)? {
            ParsedSource::Tallies(rows) => {
                for row in rows.iter() {
                    if !row.mentions.is_empty() {
                        whatever!(
                            "Option {}: grade counts cannot be used in an approval vote",
                            row.id
                        );
                    }
                    let count = match row.approvals {
                        Some(c) if c >= 0 => c as u64,
                        Some(c) => whatever!("Option {}: negative approval count {}", row.id, c),
                        None => whatever!("Option {}: missing approval count", row.id),
                    };
                    registry.see(&row.id, row.label.as_deref())?;
                    let e = approvals.entry(row.id.trim().to_string()).or_insert(0);
                    *e = e.saturating_add(count);
                }
            }
            ParsedSource::Ballots { options, ballots } => {
                let source_options = registry.ballot_options(&options)?;
                let approval_ballots: Vec<ApprovalBallot> = ballots
                    .iter()
                    .map(|pb| ApprovalBallot {
                        approved: pb
                            .choices
                            .iter()
                            .filter(|(_, cell)| is_approval_mark(cell))
                            .map(|(option_id, _)| option_id.trim().to_string())
                            .collect(),
                        count: pb.count.unwrap_or(1),
                    })
                    .collect();
                let counted = tally_approval_ballots(&source_options, &approval_ballots)
                    .context(TabulationSnafu {})?;
                for ao in counted.iter() {
                    let e = approvals.entry(ao.id.clone()).or_insert(0);
                    *e = e.saturating_add(ao.approvals);
                }
            }
        }
    }

    let options: Vec<ApprovalOption> = registry
        .validated()?
        .iter()
        .map(|o| {
            ApprovalOption::new(&o.id, &o.label, approvals.get(&o.id).copied().unwrap_or(0))
        })
        .collect();

    let res =
        run_approval(&options, &TabulationRules::DEFAULT_RULES).context(TabulationSnafu {})?;
    Ok(approval_results_to_json(&res))
}

fn judgment_results_to_json<G: Grade>(res: &[AnalysisResult<G>]) -> Vec<JSValue> {
    let mut l: Vec<JSValue> = Vec::new();
    for r in res.iter() {
        let mut tally: JSMap<String, JSValue> = JSMap::new();
        for (grade, count) in r.tally.iter() {
            if count > 0 {
                tally.insert(grade.label().to_string(), json!(count));
            }
        }
        l.push(json!({
            "rank": r.rank,
            "id": r.id,
            "label": r.label,
            "majorityGrade": r.majority_grade.label(),
            "score": r.tie_break_score,
            "isWinner": r.is_winner,
            "isExAequo": r.is_ex_aequo,
            "total": r.tally.total(),
            "tally": tally
        }));
    }
    l
}

fn approval_results_to_json(res: &[ApprovalResult]) -> Vec<JSValue> {
    res.iter()
        .map(|r| {
            json!({
                "rank": r.rank,
                "id": r.id,
                "label": r.label,
                "approvals": r.approvals,
                "isWinner": r.is_winner,
                "isExAequo": r.is_ex_aequo
            })
        })
        .collect()
}

fn build_summary_js(
    config: &MjConfig,
    voting_system: VotingSystem,
    grade_scale: Option<GradeScale>,
    results: Vec<JSValue>,
) -> JSValue {
    let c = OutputConfig {
        contest: config.output_settings.contest_name.clone(),
        date: config.output_settings.contest_date.clone(),
        jurisdiction: config.output_settings.contest_jurisdiction.clone(),
        office: config.output_settings.contest_office.clone(),
        voting_system: voting_system.name().to_string(),
        grade_scale: grade_scale.map(|gs| gs.name().to_string()),
    };
    json!({
        "config": c,
        "results": results })
}

fn apply_overrides(config: &mut MjConfig, overrides: &SourceOverrides) {
    if let Some(input) = overrides.input.clone() {
        config.tally_sources = vec![TallySource {
            provider: overrides
                .input_type
                .clone()
                .unwrap_or_else(|| "csv".to_string()),
            file_path: input,
            first_data_row_index: None,
            excel_worksheet_name: None,
            treat_blank_as_worst: None,
        }];
    }
    if let Some(name) = overrides.excel_worksheet_name.clone() {
        for cfs in config.tally_sources.iter_mut() {
            cfs.excel_worksheet_name = Some(name.clone());
        }
    }
    if let Some(gs) = overrides.grade_scale.clone() {
        config.grade_scale = Some(gs);
    }
    if let Some(vs) = overrides.voting_system.clone() {
        config.voting_system = Some(vs);
    }
}

fn write_summary(
    config: &MjConfig,
    root: &Path,
    out: Option<String>,
    pretty_js_stats: &str,
) -> MjResult<()> {
    let out_path: Option<PathBuf> = match (out, config.output_settings.output_directory.clone()) {
        (Some(o), _) if o == "stdout" => None,
        (Some(o), _) => Some(PathBuf::from(o)),
        (None, Some(dir)) => Some(root.join(dir).join("summary.json")),
        (None, None) => None,
    };
    match out_path {
        Some(p) => {
            let path = p.display().to_string();
            info!("Writing summary to {:?}", path);
            fs::write(&p, pretty_js_stats).context(WritingOutputSnafu { path })?;
        }
        None => {
            println!("{}", pretty_js_stats);
        }
    }
    Ok(())
}

/// Runs a contest end to end: reads the configuration and the sources, ranks the
/// options and outputs the summary.
///
/// Arguments:
/// * `config_path` the contest configuration in JSON, if any
/// * `check_summary_path` a reference summary to compare the output with
/// * `out` where to write the summary ('stdout' or a file path)
/// * `overrides` command line settings taking precedence over the configuration
pub fn run_contest(
    config_path: Option<String>,
    check_summary_path: Option<String>,
    out: Option<String>,
    overrides: &SourceOverrides,
) -> MjResult<()> {
    let (mut config, mut root) = match config_path {
        Some(p) => {
            let config = read_config(&p)?;
            let root = Path::new(p.as_str())
                .parent()
                .context(MissingParentDirSnafu {})?
                .to_path_buf();
            (config, root)
        }
        None => (
            MjConfig::from_input(overrides.input.as_deref().unwrap_or("contest")),
            PathBuf::new(),
        ),
    };
    // Paths given on the command line are relative to the working directory.
    if overrides.input.is_some() {
        root = PathBuf::new();
    }
    apply_overrides(&mut config, overrides);
    info!("config: {:?}", config);

    if config.tally_sources.is_empty() {
        whatever!("No tally source: use --input or tallySources in the configuration");
    }

    let voting_system = config.voting_system()?;
    let (grade_scale, results) = match voting_system {
        VotingSystem::MajorityJudgment => {
            let gs = config.grade_scale()?;
            let results = match gs {
                GradeScale::Mention7 => tabulate_judgment::<Mention>(&config, &root)?,
                GradeScale::Mention5 => tabulate_judgment::<ShortMention>(&config, &root)?,
            };
            (Some(gs), results)
        }
        VotingSystem::Approval => (None, tabulate_approval(&config, &root)?),
    };

    // Assemble the final json
    let result_js = build_summary_js(&config, voting_system, grade_scale, results);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    write_summary(&config, &root, out, &pretty_js_stats)?;

    // The reference summary, if provided for comparison
    if let Some(summary_p) = check_summary_path {
        let summary_ref = read_summary(summary_p)?;
        debug!("summary: {:?}", summary_ref);
        if summary_ref != result_js {
            let pretty_js_summary_ref =
                serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
            warn!("Found differences with the reference summary");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_str(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_dir() -> String {
        format!("{}/tests", env!("CARGO_MANIFEST_DIR"))
    }

    fn run_contest_test(test_name: &str) -> MjResult<()> {
        let _ = env_logger::builder().is_test(true).try_init();
        let test_dir = test_dir();
        info!("Running test {}", test_name);
        run_contest(
            Some(format!("{}/{}/{}_config.json", test_dir, test_name, test_name)),
            Some(format!(
                "{}/{}/{}_expected_summary.json",
                test_dir, test_name, test_name
            )),
            None,
            &SourceOverrides::default(),
        )
    }

    fn test_wrapper(test_name: &str) {
        let res = run_contest_test(test_name);
        if let Err(e) = &res {
            eprintln!("An error occured {}", e);
        }
        assert!(res.is_ok(), "{:?}", res);
    }

    #[test]
    fn mj_basic() {
        test_wrapper("mj_basic");
    }

    #[test]
    fn mj_ballots() {
        test_wrapper("mj_ballots");
    }

    #[test]
    fn mj_multi_source() {
        test_wrapper("mj_multi_source");
    }

    #[test]
    fn approval_basic() {
        test_wrapper("approval_basic");
    }

    #[test]
    fn approval_ballots() {
        test_wrapper("approval_ballots");
    }

    #[test]
    fn negative_counts_are_rejected() {
        let res = run_contest_test("mj_negative");
        assert!(matches!(
            res,
            Err(MjError::Tabulation {
                source: JudgmentErrors::NegativeCount { .. }
            })
        ));
    }

    #[test]
    fn unknown_grades_are_rejected() {
        let res = run_contest_test("mj_unknown_grade");
        assert!(matches!(
            res,
            Err(MjError::Tabulation {
                source: JudgmentErrors::UnknownGrade(_)
            })
        ));
    }

    #[test]
    fn input_from_the_command_line() {
        let _ = env_logger::builder().is_test(true).try_init();
        let overrides = SourceOverrides {
            input: Some(format!("{}/mj_basic/tallies.csv", test_dir())),
            ..SourceOverrides::default()
        };
        let res = run_contest(None, None, Some("stdout".to_string()), &overrides);
        assert!(res.is_ok(), "{:?}", res);
    }

    #[test]
    fn overrides_replace_the_sources() {
        let mut config = MjConfig::from_input("x.csv");
        config.tally_sources.push(TallySource {
            provider: "json".to_string(),
            file_path: "a.json".to_string(),
            first_data_row_index: None,
            excel_worksheet_name: None,
            treat_blank_as_worst: None,
        });
        let overrides = SourceOverrides {
            input: Some("b.xlsx".to_string()),
            input_type: Some("xlsx".to_string()),
            grade_scale: Some("mention5".to_string()),
            voting_system: None,
            excel_worksheet_name: Some("Votes".to_string()),
        };
        apply_overrides(&mut config, &overrides);
        assert_eq!(config.tally_sources.len(), 1);
        assert_eq!(config.tally_sources[0].provider, "xlsx");
        assert_eq!(config.tally_sources[0].file_path, "b.xlsx");
        assert_eq!(
            config.tally_sources[0].excel_worksheet_name,
            Some("Votes".to_string())
        );
        assert_eq!(config.grade_scale().unwrap(), GradeScale::Mention5);
        assert_eq!(
            config.voting_system().unwrap(),
            VotingSystem::MajorityJudgment
        );
    }

    #[test]
    fn approval_marks() {
        assert!(is_approval_mark("x"));
        assert!(is_approval_mark(" Yes "));
        assert!(is_approval_mark("1"));
        assert!(!is_approval_mark(""));
        assert!(!is_approval_mark("0"));
        assert!(!is_approval_mark("No"));
        assert!(!is_approval_mark("false"));
    }

    #[test]
    fn declared_options_reject_unknown_ids() {
        let mut config = MjConfig::from_input("x.csv");
        config.options = Some(vec![
            OptionEntry {
                id: "a".to_string(),
                label: Some("Alice".to_string()),
            },
            OptionEntry {
                id: "b".to_string(),
                label: None,
            },
        ]);
        let mut registry = OptionRegistry::new(&config).unwrap();
        assert!(registry.see("a", None).is_ok());
        assert!(matches!(
            registry.see("c", None),
            Err(MjError::Tabulation {
                source: JudgmentErrors::UnknownOption(_)
            })
        ));
        let options = registry.validated().unwrap();
        assert_eq!(
            options,
            vec![VoteOption::new("a", "Alice"), VoteOption::new("b", "b")]
        );
    }

    #[test]
    fn declared_options_need_two_distinct_labels() {
        let mut config = MjConfig::from_input("x.csv");
        config.options = Some(vec![
            OptionEntry {
                id: "y".to_string(),
                label: Some("Yes".to_string()),
            },
            OptionEntry {
                id: "y2".to_string(),
                label: Some("YES".to_string()),
            },
        ]);
        assert!(matches!(
            OptionRegistry::new(&config),
            Err(MjError::Tabulation {
                source: JudgmentErrors::DuplicateLabel(_)
            })
        ));

        config.options = Some(vec![OptionEntry {
            id: "y".to_string(),
            label: None,
        }]);
        assert!(matches!(
            OptionRegistry::new(&config),
            Err(MjError::Tabulation {
                source: JudgmentErrors::NotEnoughOptions { min: 2, actual: 1 }
            })
        ));
    }
}
