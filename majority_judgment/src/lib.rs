mod approval;
mod ballots;
pub mod builder;
mod config;
mod grades;
pub mod manual;
mod median;
pub mod quick_start;
mod ranking;
mod score;
mod tally;

use log::{debug, info};

pub use crate::approval::rank_approvals;
pub use crate::ballots::{
    normalize_label, tally_approval_ballots, tally_judgment_ballots, validate_options,
};
pub use crate::config::*;
pub use crate::grades::{Grade, Mention, ShortMention};
pub use crate::median::majority_grade;
pub use crate::ranking::{assign_ranks, compare_merit, ex_aequo_flags, rank_options};
pub use crate::score::{median_split, tie_break_score, MedianSplit};
pub use crate::tally::MentionTally;

fn check_option_count(count: usize, rules: &TabulationRules) -> Result<(), JudgmentErrors> {
    match rules.max_options {
        Some(max) if count > max => Err(JudgmentErrors::TooManyOptions { max, actual: count }),
        _ => Ok(()),
    }
}

/// Ranks the options of a majority judgment vote.
///
/// Arguments:
/// * `options` the options with the current snapshot of their tallies
/// * `rules` the rules that govern this vote
///
/// The results are listed from the best option to the worst. See `rank_options`
/// for the tie policy.
pub fn run_majority_judgment<G: Grade>(
    options: &[OptionSummary<G>],
    rules: &TabulationRules,
) -> Result<Vec<AnalysisResult<G>>, JudgmentErrors> {
    info!(
        "Processing {:?} options on a {:?}-grade scale, rules: {:?}",
        options.len(),
        G::scale_size(),
        rules
    );
    check_option_count(options.len(), rules)?;
    for o in options.iter() {
        debug!(
            "run_majority_judgment: option {:?} total: {:?} counts: {:?}",
            o.id,
            o.tally.total(),
            o.tally.counts()
        );
    }

    let res = rank_options(options)?;
    for r in res.iter() {
        info!(
            "{:>4} {} -> {} ({}){}",
            r.rank,
            r.label,
            r.majority_grade,
            r.score_display(),
            if r.is_ex_aequo { " ex-aequo" } else { "" }
        );
    }
    Ok(res)
}

/// Ranks the options of an approval vote by their number of approvals.
pub fn run_approval(
    options: &[ApprovalOption],
    rules: &TabulationRules,
) -> Result<Vec<ApprovalResult>, JudgmentErrors> {
    info!("Processing {:?} approval options", options.len());
    check_option_count(options.len(), rules)?;

    let res = rank_approvals(options)?;
    for r in res.iter() {
        info!(
            "{:>4} {} -> {} approvals{}",
            r.rank,
            r.label,
            r.approvals,
            if r.is_ex_aequo { " ex-aequo" } else { "" }
        );
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn end_to_end_seven_grades() {
        init();
        let scenario: MentionTally<Mention> = MentionTally::from_labelled_counts(&[
            ("Bad", 1),
            ("Inadequate", 1),
            ("Passable", 0),
            ("Fair", 1),
            ("Good", 2),
            ("Very good", 1),
            ("Excellent", 0),
        ])
        .unwrap();
        let options = vec![
            OptionSummary::new("s", "Scenario", scenario),
            OptionSummary::new("e", "Empty", MentionTally::empty()),
            OptionSummary::new(
                "x",
                "Excellent",
                MentionTally::empty().with(Mention::Excellent, 1),
            ),
        ];
        let res = run_majority_judgment(&options, &TabulationRules::DEFAULT_RULES).unwrap();
        let ids: Vec<&str> = res.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "s", "e"]);
        assert_eq!(res[0].majority_grade, Mention::Excellent);
        assert_eq!(res[0].tie_break_score, 0.0);
        assert_eq!(res[1].majority_grade, Mention::Good);
        assert!(res[1].tie_break_score.is_finite());
        assert_eq!(res[2].majority_grade, Mention::Bad);
        assert_eq!(res[2].tie_break_score, 0.0);
        assert_eq!(res[2].tally.total(), 0);
    }

    #[test]
    fn option_limit() {
        init();
        let options: Vec<ApprovalOption> = (0..3)
            .map(|i| ApprovalOption::new(&format!("o{}", i), "o", i))
            .collect();
        let rules = TabulationRules {
            max_options: Some(2),
            ..TabulationRules::DEFAULT_RULES
        };
        assert_eq!(
            run_approval(&options, &rules),
            Err(JudgmentErrors::TooManyOptions { max: 2, actual: 3 })
        );
        let res = run_approval(&options, &TabulationRules::DEFAULT_RULES).unwrap();
        assert_eq!(res[0].id, "o2");
    }

    #[test]
    fn results_are_recomputed_identically() {
        init();
        let options = vec![
            OptionSummary::new(
                "a",
                "A",
                MentionTally::empty()
                    .with(ShortMention::Good, 3)
                    .with(ShortMention::Passable, 1),
            ),
            OptionSummary::new("b", "B", MentionTally::empty().with(ShortMention::Good, 2)),
        ];
        let first = run_majority_judgment(&options, &TabulationRules::DEFAULT_RULES).unwrap();
        let second = run_majority_judgment(&options, &TabulationRules::DEFAULT_RULES).unwrap();
        assert_eq!(first, second);
    }
}
