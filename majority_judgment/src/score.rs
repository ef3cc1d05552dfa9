use log::{debug, warn};

use crate::grades::Grade;
use crate::tally::MentionTally;

/// How the ballots of a tally are spread around a given grade.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct MedianSplit {
    /// Ballots strictly better than the grade.
    pub better: u64,
    /// Ballots exactly at the grade.
    pub at: u64,
    /// Ballots strictly worse than the grade.
    pub worse: u64,
}

impl MedianSplit {
    pub fn total(&self) -> u64 {
        self.better.saturating_add(self.at).saturating_add(self.worse)
    }
}

pub fn median_split<G: Grade>(tally: &MentionTally<G>, majority: G) -> MedianSplit {
    let mut split = MedianSplit {
        better: 0,
        at: 0,
        worse: 0,
    };
    let pos = majority.position();
    for (grade, count) in tally.iter() {
        let bucket = match grade.position() {
            p if p < pos => &mut split.better,
            p if p == pos => &mut split.at,
            _ => &mut split.worse,
        };
        *bucket = bucket.saturating_add(count);
    }
    split
}

/// The continuous tie-break score of a tally around its majority grade.
///
/// With `pc`, `qc` and `rc` the shares of ballots strictly better than, strictly
/// worse than and exactly at the majority grade, the score is `(pc - qc) / rc`,
/// or `pc - qc` when no ballot sits at the majority grade. An empty tally scores 0.
///
/// The shares all have the same denominator, so the score is computed directly
/// from the counts. It is always finite.
pub fn tie_break_score<G: Grade>(tally: &MentionTally<G>, majority: G) -> f64 {
    let split = median_split(tally, majority);
    let total = split.total();
    if total == 0 {
        return 0.0;
    }
    let diff = split.better as f64 - split.worse as f64;
    let score = if split.at > 0 {
        diff / split.at as f64
    } else {
        // Only reachable when the given grade is not the majority grade of the tally.
        warn!(
            "tie_break_score: no ballot at grade {:?} for split {:?}",
            majority, split
        );
        diff / total as f64
    };
    debug!(
        "tie_break_score: majority: {:?} split: {:?} score: {:?}",
        majority, split, score
    );
    score
}
