// ********* Grade scales ***********

use std::fmt::{Debug, Display};
use std::hash::Hash;

use crate::config::JudgmentErrors;

/// An ordered, closed scale of qualitative grades.
///
/// Every grade has a stable position on its scale: 0 is the best grade, and
/// `ALL.len() - 1` the worst. All the comparisons in this crate go through
/// the positions, never through the labels.
///
/// Implementations must list at least two grades in `ALL`.
pub trait Grade: Copy + Eq + Hash + Debug + Display + 'static {
    /// All the grades of the scale, from the best to the worst.
    const ALL: &'static [Self];

    /// The position on the scale (0 = best).
    fn position(self) -> usize;

    /// The human-readable name of the grade.
    fn label(self) -> &'static str;

    fn from_position(position: usize) -> Result<Self, JudgmentErrors> {
        Self::ALL
            .get(position)
            .copied()
            .ok_or(JudgmentErrors::GradePositionOutOfRange(position))
    }

    /// Finds a grade by its label.
    ///
    /// The comparison ignores case, whitespaces, dashes and underscores so that
    /// `Very good`, `VeryGood` and `very_good` all designate the same grade.
    fn from_label(label: &str) -> Result<Self, JudgmentErrors> {
        let key = label_key(label);
        Self::ALL
            .iter()
            .copied()
            .find(|g| label_key(g.label()) == key)
            .ok_or_else(|| JudgmentErrors::UnknownGrade(label.to_string()))
    }

    fn best() -> Self {
        Self::ALL[0]
    }

    fn worst() -> Self {
        Self::ALL[Self::ALL.len() - 1]
    }

    fn scale_size() -> usize {
        Self::ALL.len()
    }
}

fn label_key(label: &str) -> String {
    label
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// The seven-level scale.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Mention {
    Excellent = 0,
    VeryGood = 1,
    Good = 2,
    Fair = 3,
    Passable = 4,
    Inadequate = 5,
    Bad = 6,
}

impl Grade for Mention {
    const ALL: &'static [Mention] = &[
        Mention::Excellent,
        Mention::VeryGood,
        Mention::Good,
        Mention::Fair,
        Mention::Passable,
        Mention::Inadequate,
        Mention::Bad,
    ];

    fn position(self) -> usize {
        self as usize
    }

    fn label(self) -> &'static str {
        match self {
            Mention::Excellent => "Excellent",
            Mention::VeryGood => "Very good",
            Mention::Good => "Good",
            Mention::Fair => "Fair",
            Mention::Passable => "Passable",
            Mention::Inadequate => "Inadequate",
            Mention::Bad => "Bad",
        }
    }
}

impl Display for Mention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The five-level scale.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum ShortMention {
    VeryGood = 0,
    Good = 1,
    Passable = 2,
    Insufficient = 3,
    ToReject = 4,
}

impl Grade for ShortMention {
    const ALL: &'static [ShortMention] = &[
        ShortMention::VeryGood,
        ShortMention::Good,
        ShortMention::Passable,
        ShortMention::Insufficient,
        ShortMention::ToReject,
    ];

    fn position(self) -> usize {
        self as usize
    }

    fn label(self) -> &'static str {
        match self {
            ShortMention::VeryGood => "Very good",
            ShortMention::Good => "Good",
            ShortMention::Passable => "Passable",
            ShortMention::Insufficient => "Insufficient",
            ShortMention::ToReject => "To reject",
        }
    }
}

impl Display for ShortMention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
