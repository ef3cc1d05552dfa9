use log::debug;
use std::cmp::Ordering;
use std::collections::HashSet;

use crate::config::{AnalysisResult, JudgmentErrors, OptionSummary};
use crate::grades::Grade;
use crate::median::majority_grade;
use crate::score::tie_break_score;

/// Compares two (majority grade, tie-break score) pairs.
///
/// `Ordering::Less` means that `a` ranks before `b`: a better grade first, then a
/// higher score. `Ordering::Equal` is a tie.
pub fn compare_merit<G: Grade>(a: (G, f64), b: (G, f64)) -> Ordering {
    a.0.position()
        .cmp(&b.0.position())
        .then_with(|| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal))
}

/// Assigns ranks to a sequence that is already sorted from the best to the worst.
///
/// The first element gets rank 1. An element equal to its predecessor shares its
/// rank, any other element gets its 1-based position. Ranks are not compressed
/// after a tie group: one winner followed by three tied options and a last one
/// gives `1, 2, 2, 2, 5`.
pub fn assign_ranks<T, F>(sorted: &[T], same: F) -> Vec<u32>
where
    F: Fn(&T, &T) -> bool,
{
    let mut ranks: Vec<u32> = Vec::with_capacity(sorted.len());
    for (idx, elt) in sorted.iter().enumerate() {
        let rank = match (idx, ranks.last()) {
            (i, Some(&prev_rank)) if same(&sorted[i - 1], elt) => prev_rank,
            (i, _) => (i + 1) as u32,
        };
        ranks.push(rank);
    }
    ranks
}

/// For ranks produced by `assign_ranks`, flags the entries that share their rank.
pub fn ex_aequo_flags(ranks: &[u32]) -> Vec<bool> {
    (0..ranks.len())
        .map(|i| {
            (i > 0 && ranks[i - 1] == ranks[i]) || (i + 1 < ranks.len() && ranks[i + 1] == ranks[i])
        })
        .collect()
}

pub(crate) fn check_unique_ids<'a, I: Iterator<Item = &'a String>>(
    ids: I,
) -> Result<(), JudgmentErrors> {
    let mut seen: HashSet<&String> = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(JudgmentErrors::DuplicateOption(id.clone()));
        }
    }
    Ok(())
}

/// Ranks options by majority judgment.
///
/// The output lists one result per input option, from the best to the worst.
/// Tied options share their rank and are all flagged as ex-aequo; inside a tie
/// group, the options keep their input order. The ranks themselves do not
/// depend on the input order.
pub fn rank_options<G: Grade>(
    options: &[OptionSummary<G>],
) -> Result<Vec<AnalysisResult<G>>, JudgmentErrors> {
    check_unique_ids(options.iter().map(|o| &o.id))?;

    let mut merits: Vec<(&OptionSummary<G>, G, f64)> = options
        .iter()
        .map(|o| {
            let grade = majority_grade(&o.tally);
            let score = tie_break_score(&o.tally, grade);
            (o, grade, score)
        })
        .collect();

    // Stable: ties keep the input order.
    merits.sort_by(|a, b| compare_merit((a.1, a.2), (b.1, b.2)));

    let ranks = assign_ranks(&merits, |a, b| {
        compare_merit((a.1, a.2), (b.1, b.2)) == Ordering::Equal
    });
    let ex_aequos = ex_aequo_flags(&ranks);
    debug!("rank_options: ranks: {:?}", ranks);

    let res = merits
        .iter()
        .zip(ranks.iter().zip(ex_aequos.iter()))
        .map(|((o, grade, score), (&rank, &is_ex_aequo))| AnalysisResult {
            id: o.id.clone(),
            label: o.label.clone(),
            majority_grade: *grade,
            tie_break_score: *score,
            rank,
            is_winner: rank == 1,
            is_ex_aequo,
            tally: o.tally.clone(),
        })
        .collect();
    Ok(res)
}
