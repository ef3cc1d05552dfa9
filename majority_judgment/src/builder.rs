pub use crate::config::*;
use crate::ballots::{tally_judgment_ballots, validate_options};
use crate::grades::Grade;

/// A builder for collecting judgment ballots and ranking the options.
///
/// ```
/// use majority_judgment::builder::Builder;
/// use majority_judgment::{Mention, TabulationRules, VoteOption};
/// # use majority_judgment::JudgmentErrors;
///
/// let mut builder = Builder::new(&TabulationRules::DEFAULT_RULES)?
///     .options(&[VoteOption::new("a", "Anna"), VoteOption::new("b", "Bob")])?;
///
/// builder.add_ballot_simple(&[
///     ("a".to_string(), Mention::Good),
///     ("b".to_string(), Mention::Fair),
/// ])?;
/// // Bob is not judged in this ballot: it counts as the worst grade.
/// builder.add_ballot_simple(&[("a".to_string(), Mention::VeryGood)])?;
///
/// let results = builder.rank()?;
/// assert_eq!(results[0].label, "Anna");
/// assert_eq!(results[0].majority_grade, Mention::VeryGood);
///
/// # Ok::<(), JudgmentErrors>(())
/// ```
pub struct Builder<G: Grade> {
    pub(crate) _rules: TabulationRules,
    pub(crate) _options: Option<Vec<VoteOption>>,
    pub(crate) _ballots: Vec<JudgmentBallot<G>>,
}

impl<G: Grade> Builder<G> {
    pub fn new(rules: &TabulationRules) -> Result<Builder<G>, JudgmentErrors> {
        Ok(Builder {
            _rules: rules.clone(),
            _options: None,
            _ballots: Vec::new(),
        })
    }

    /// Declares the options of the vote.
    ///
    /// If no options are declared, they are inferred from the ballots, in order of
    /// first appearance.
    pub fn options(self, opts: &[VoteOption]) -> Result<Builder<G>, JudgmentErrors> {
        let validated = validate_options(opts, &self._rules)?;
        Ok(Builder {
            _rules: self._rules,
            _options: Some(validated),
            _ballots: Vec::new(),
        })
    }

    /// Adds the ballot of a single voter.
    pub fn add_ballot_simple(&mut self, judgments: &[(String, G)]) -> Result<(), JudgmentErrors> {
        self.add_ballot(judgments, 1)
    }

    /// Adds a ballot cast `count` times.
    pub fn add_ballot(
        &mut self,
        judgments: &[(String, G)],
        count: u64,
    ) -> Result<(), JudgmentErrors> {
        self.add_judgment_ballot(&JudgmentBallot {
            judgments: judgments.to_vec(),
            count,
        })
    }

    pub fn add_judgment_ballot(
        &mut self,
        ballot: &JudgmentBallot<G>,
    ) -> Result<(), JudgmentErrors> {
        if let Some(opts) = self._options.as_deref() {
            for (option_id, _) in ballot.judgments.iter() {
                if !opts.iter().any(|o| o.id == *option_id) {
                    return Err(JudgmentErrors::UnknownOption(option_id.clone()));
                }
            }
        }
        self._ballots.push(ballot.clone());
        Ok(())
    }

    fn resolved_options(&self) -> Vec<VoteOption> {
        if let Some(opts) = self._options.as_ref() {
            return opts.clone();
        }
        let mut res: Vec<VoteOption> = Vec::new();
        for (option_id, _) in self._ballots.iter().flat_map(|b| b.judgments.iter()) {
            if !res.iter().any(|o| o.id == *option_id) {
                res.push(VoteOption::new(option_id, option_id));
            }
        }
        res
    }

    /// The tallies of all the options, in declaration order.
    pub fn summaries(&self) -> Result<Vec<OptionSummary<G>>, JudgmentErrors> {
        tally_judgment_ballots(&self.resolved_options(), &self._ballots, &self._rules)
    }

    pub fn rank(&self) -> Result<Vec<AnalysisResult<G>>, JudgmentErrors> {
        crate::run_majority_judgment(&self.summaries()?, &self._rules)
    }
}
