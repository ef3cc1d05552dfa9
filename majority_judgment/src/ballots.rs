// Aggregation of individual ballots into per-option tallies.

use log::debug;
use std::collections::{HashMap, HashSet};

use crate::config::*;
use crate::grades::Grade;
use crate::ranking::check_unique_ids;
use crate::tally::MentionTally;

/// Trims a human-entered label and checks its length.
pub fn normalize_label(s: &str) -> Result<String, JudgmentErrors> {
    let t = s.trim();
    if t.is_empty() {
        return Err(JudgmentErrors::EmptyLabel);
    }
    if t.len() > MAX_LABEL_LEN {
        return Err(JudgmentErrors::LabelTooLong(t.len()));
    }
    Ok(t.to_string())
}

/// Normalizes the ids and labels of the options of a vote.
///
/// Rejected: duplicate ids, labels equal up to case, fewer than `MIN_OPTIONS`
/// options and more options than allowed by the rules.
pub fn validate_options(
    options: &[VoteOption],
    rules: &TabulationRules,
) -> Result<Vec<VoteOption>, JudgmentErrors> {
    if options.len() < MIN_OPTIONS {
        return Err(JudgmentErrors::NotEnoughOptions {
            min: MIN_OPTIONS,
            actual: options.len(),
        });
    }
    if let Some(max) = rules.max_options {
        if options.len() > max {
            return Err(JudgmentErrors::TooManyOptions {
                max,
                actual: options.len(),
            });
        }
    }
    let mut res: Vec<VoteOption> = Vec::with_capacity(options.len());
    for o in options.iter() {
        res.push(VoteOption {
            id: normalize_label(&o.id)?,
            label: normalize_label(&o.label)?,
        });
    }
    check_unique_ids(res.iter().map(|o| &o.id))?;
    let mut seen_labels: HashSet<String> = HashSet::new();
    for o in res.iter() {
        if !seen_labels.insert(o.label.to_lowercase()) {
            return Err(JudgmentErrors::DuplicateLabel(o.label.clone()));
        }
    }
    Ok(res)
}

/// Builds the tally of every option from judgment ballots.
///
/// Options not judged in a ballot count as the worst grade when
/// `rules.blank_as_worst` is set, and are not counted otherwise.
/// The output follows the order of `options`.
pub fn tally_judgment_ballots<G: Grade>(
    options: &[VoteOption],
    ballots: &[JudgmentBallot<G>],
    rules: &TabulationRules,
) -> Result<Vec<OptionSummary<G>>, JudgmentErrors> {
    check_unique_ids(options.iter().map(|o| &o.id))?;
    let mut tallies: HashMap<&str, MentionTally<G>> = options
        .iter()
        .map(|o| (o.id.as_str(), MentionTally::empty()))
        .collect();

    for ballot in ballots.iter() {
        let mut judged: HashSet<&str> = HashSet::new();
        for (option_id, grade) in ballot.judgments.iter() {
            if !judged.insert(option_id.as_str()) {
                return Err(JudgmentErrors::DuplicateJudgment(option_id.clone()));
            }
            let tally = tallies
                .get_mut(option_id.as_str())
                .ok_or_else(|| JudgmentErrors::UnknownOption(option_id.clone()))?;
            tally.add(*grade, ballot.count);
        }
        if rules.blank_as_worst && judged.len() < options.len() {
            for o in options.iter() {
                if !judged.contains(o.id.as_str()) {
                    if let Some(tally) = tallies.get_mut(o.id.as_str()) {
                        tally.add(G::worst(), ballot.count);
                    }
                }
            }
        }
    }
    debug!(
        "tally_judgment_ballots: {:?} ballots over {:?} options",
        ballots.len(),
        options.len()
    );

    Ok(options
        .iter()
        .map(|o| OptionSummary {
            id: o.id.clone(),
            label: o.label.clone(),
            tally: tallies.remove(o.id.as_str()).unwrap_or_default(),
        })
        .collect())
}

/// Counts the approvals of every option. An option listed twice in a ballot counts once.
/// The output follows the order of `options`.
pub fn tally_approval_ballots(
    options: &[VoteOption],
    ballots: &[ApprovalBallot],
) -> Result<Vec<ApprovalOption>, JudgmentErrors> {
    check_unique_ids(options.iter().map(|o| &o.id))?;
    let mut counts: HashMap<&str, u64> = options.iter().map(|o| (o.id.as_str(), 0)).collect();

    for ballot in ballots.iter() {
        let approved: HashSet<&str> = ballot.approved.iter().map(|s| s.as_str()).collect();
        for option_id in approved {
            let c = counts
                .get_mut(option_id)
                .ok_or_else(|| JudgmentErrors::UnknownOption(option_id.to_string()))?;
            *c = c.saturating_add(ballot.count);
        }
    }

    Ok(options
        .iter()
        .map(|o| ApprovalOption {
            id: o.id.clone(),
            label: o.label.clone(),
            approvals: counts.get(o.id.as_str()).copied().unwrap_or(0),
        })
        .collect())
}
