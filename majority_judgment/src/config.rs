// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

use crate::grades::Grade;
use crate::tally::MentionTally;

/// Maximum number of options accepted in a single vote.
pub const MAX_OPTIONS: usize = 20;

/// Minimum number of distinct options in a vote.
pub const MIN_OPTIONS: usize = 2;

/// Maximum length of an option label, in bytes, after trimming.
pub const MAX_LABEL_LEN: usize = 200;

/// An option that can be voted on.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct VoteOption {
    pub id: String,
    pub label: String,
}

impl VoteOption {
    pub fn new(id: &str, label: &str) -> VoteOption {
        VoteOption {
            id: id.to_string(),
            label: label.to_string(),
        }
    }
}

/// An option along with the current snapshot of its tally.
///
/// The tally is provided by the caller and never modified by this crate.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct OptionSummary<G: Grade> {
    pub id: String,
    pub label: String,
    pub tally: MentionTally<G>,
}

impl<G: Grade> OptionSummary<G> {
    pub fn new(id: &str, label: &str, tally: MentionTally<G>) -> OptionSummary<G> {
        OptionSummary {
            id: id.to_string(),
            label: label.to_string(),
            tally,
        }
    }
}

/// An option with its raw number of approvals.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct ApprovalOption {
    pub id: String,
    pub label: String,
    pub approvals: u64,
}

impl ApprovalOption {
    pub fn new(id: &str, label: &str, approvals: u64) -> ApprovalOption {
        ApprovalOption {
            id: id.to_string(),
            label: label.to_string(),
            approvals,
        }
    }
}

/// A judgment ballot: the grades given by one voter (or by `count` identical voters).
///
/// Options of the vote missing from `judgments` have not been judged by this voter.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct JudgmentBallot<G: Grade> {
    pub judgments: Vec<(String, G)>,
    pub count: u64,
}

/// An approval ballot: the set of options approved by one voter (or by `count` identical voters).
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ApprovalBallot {
    pub approved: Vec<String>,
    pub count: u64,
}

// ******** Output data structures *********

/// The analysis of one option, as computed by the ranking.
///
/// This is a plain value: it is recomputed from the tallies at every call.
#[derive(PartialEq, Debug, Clone)]
pub struct AnalysisResult<G: Grade> {
    pub id: String,
    pub label: String,
    pub majority_grade: G,
    pub tie_break_score: f64,
    /// 1-based. Tied options share a rank and the next rank skips accordingly.
    pub rank: u32,
    pub is_winner: bool,
    pub is_ex_aequo: bool,
    pub tally: MentionTally<G>,
}

impl<G: Grade> AnalysisResult<G> {
    /// The tie-break score, rounded to two decimals for display.
    pub fn score_display(&self) -> String {
        format!("{:.2}", self.tie_break_score)
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ApprovalResult {
    pub id: String,
    pub label: String,
    pub approvals: u64,
    pub rank: u32,
    pub is_winner: bool,
    pub is_ex_aequo: bool,
}

/// Errors caused by malformed input. They are raised before any ranking is attempted.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum JudgmentErrors {
    /// A count below zero was provided for a grade.
    NegativeCount { grade: String, count: i64 },
    /// A grade label that does not belong to the scale.
    UnknownGrade(String),
    /// A grade position that does not belong to the scale.
    GradePositionOutOfRange(usize),
    /// A vector of counts that does not have one entry per grade.
    WrongScaleSize { expected: usize, actual: usize },
    DuplicateOption(String),
    /// Two options with the same label, ignoring case.
    DuplicateLabel(String),
    UnknownOption(String),
    /// The same option was judged twice in one ballot.
    DuplicateJudgment(String),
    EmptyLabel,
    LabelTooLong(usize),
    TooManyOptions { max: usize, actual: usize },
    NotEnoughOptions { min: usize, actual: usize },
}

impl Error for JudgmentErrors {}

impl Display for JudgmentErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JudgmentErrors::NegativeCount { grade, count } => {
                write!(f, "negative count {} for grade {}", count, grade)
            }
            JudgmentErrors::UnknownGrade(label) => write!(f, "unknown grade {:?}", label),
            JudgmentErrors::GradePositionOutOfRange(p) => {
                write!(f, "grade position {} is outside the scale", p)
            }
            JudgmentErrors::WrongScaleSize { expected, actual } => write!(
                f,
                "expected {} counts (one per grade) but received {}",
                expected, actual
            ),
            JudgmentErrors::DuplicateOption(id) => write!(f, "duplicate option {:?}", id),
            JudgmentErrors::DuplicateLabel(label) => {
                write!(f, "duplicate option label {:?}", label)
            }
            JudgmentErrors::UnknownOption(id) => write!(f, "unknown option {:?}", id),
            JudgmentErrors::DuplicateJudgment(id) => {
                write!(f, "option {:?} judged more than once in a ballot", id)
            }
            JudgmentErrors::EmptyLabel => write!(f, "empty labels are not allowed"),
            JudgmentErrors::LabelTooLong(len) => write!(
                f,
                "label too long ({} bytes, max {})",
                len, MAX_LABEL_LEN
            ),
            JudgmentErrors::TooManyOptions { max, actual } => {
                write!(f, "too many options: {} (max {})", actual, max)
            }
            JudgmentErrors::NotEnoughOptions { min, actual } => {
                write!(f, "not enough options: {} (min {})", actual, min)
            }
        }
    }
}

// ********* Configuration **********

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TabulationRules {
    /// Options left unjudged in a ballot count as the worst grade.
    /// When false, they are not counted at all.
    pub blank_as_worst: bool,
    /// Maximum number of options in a vote, if any.
    pub max_options: Option<usize>,
}

impl TabulationRules {
    pub const DEFAULT_RULES: TabulationRules = TabulationRules {
        blank_as_worst: true,
        max_options: Some(MAX_OPTIONS),
    };
}

impl Default for TabulationRules {
    fn default() -> Self {
        TabulationRules::DEFAULT_RULES
    }
}
