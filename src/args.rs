use clap::Parser;

/// This is a majority judgment tabulation program.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The file containing the contest description in JSON.
    /// See the manual for the format of this file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference file containing the outcome of a contest in JSON format. If provided, mjtab will
    /// check that the tabulated output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the contest will be written in JSON format to the given
    /// location. Setting this option overrides the output directory that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) If specified, the file containing the tallies or the ballots. Setting this option
    /// overrides the sources that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default csv) The type of the input: json, csv, xlsx, csv_ballots or xlsx_ballots.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default mention7) The grade scale: mention7 or mention5.
    #[clap(long, value_parser)]
    pub grade_scale: Option<String>,

    /// (default majorityJudgment) The voting system: majorityJudgment or approval.
    #[clap(long, value_parser)]
    pub voting_system: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
