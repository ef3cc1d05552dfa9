use std::marker::PhantomData;

use crate::config::JudgmentErrors;
use crate::grades::Grade;

/// The number of ballots received at each grade by one option.
///
/// Counts are stored by grade position (best first), so there is always
/// exactly one count per grade of the scale.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct MentionTally<G: Grade> {
    counts: Vec<u64>,
    _scale: PhantomData<G>,
}

impl<G: Grade> Default for MentionTally<G> {
    fn default() -> Self {
        MentionTally::empty()
    }
}

impl<G: Grade> MentionTally<G> {
    pub fn empty() -> MentionTally<G> {
        MentionTally {
            counts: vec![0; G::scale_size()],
            _scale: PhantomData,
        }
    }

    /// Builds a tally from one count per grade, ordered from the best grade to the worst.
    pub fn from_counts(counts: &[u64]) -> Result<MentionTally<G>, JudgmentErrors> {
        if counts.len() != G::scale_size() {
            return Err(JudgmentErrors::WrongScaleSize {
                expected: G::scale_size(),
                actual: counts.len(),
            });
        }
        Ok(MentionTally {
            counts: counts.to_vec(),
            _scale: PhantomData,
        })
    }

    /// Builds a tally from signed counts, as they may come out of an external store.
    ///
    /// Negative counts are rejected. A grade may appear several times, its counts add up.
    pub fn from_signed_counts(entries: &[(G, i64)]) -> Result<MentionTally<G>, JudgmentErrors> {
        let mut tally = MentionTally::empty();
        for (grade, count) in entries.iter() {
            let c = u64::try_from(*count).map_err(|_| JudgmentErrors::NegativeCount {
                grade: grade.label().to_string(),
                count: *count,
            })?;
            tally.add(*grade, c);
        }
        Ok(tally)
    }

    /// Same as `from_signed_counts`, with the grades designated by their labels.
    pub fn from_labelled_counts<S: AsRef<str>>(
        entries: &[(S, i64)],
    ) -> Result<MentionTally<G>, JudgmentErrors> {
        let mut resolved: Vec<(G, i64)> = Vec::with_capacity(entries.len());
        for (label, count) in entries.iter() {
            resolved.push((G::from_label(label.as_ref())?, *count));
        }
        MentionTally::from_signed_counts(&resolved)
    }

    /// Counts individual judgments.
    pub fn from_judgments<I: IntoIterator<Item = G>>(judgments: I) -> MentionTally<G> {
        let mut tally = MentionTally::empty();
        for grade in judgments {
            tally.add(grade, 1);
        }
        tally
    }

    /// Builder-style variant of `add`.
    pub fn with(mut self, grade: G, count: u64) -> MentionTally<G> {
        self.add(grade, count);
        self
    }

    pub fn add(&mut self, grade: G, count: u64) {
        let c = &mut self.counts[grade.position()];
        *c = c.saturating_add(count);
    }

    /// Adds all the counts of another tally to this one.
    pub fn merge(&mut self, other: &MentionTally<G>) {
        for (grade, count) in other.iter() {
            self.add(grade, count);
        }
    }

    pub fn count(&self, grade: G) -> u64 {
        self.counts[grade.position()]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().fold(0u64, |acc, c| acc.saturating_add(*c))
    }

    /// The counts per grade, from the best grade to the worst.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Iterates over (grade, count), from the best grade to the worst.
    pub fn iter(&self) -> impl Iterator<Item = (G, u64)> + '_ {
        G::ALL.iter().map(move |g| (*g, self.counts[g.position()]))
    }
}
