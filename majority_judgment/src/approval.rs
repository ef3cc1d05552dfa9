use log::debug;

use crate::config::{ApprovalOption, ApprovalResult, JudgmentErrors};
use crate::ranking::{assign_ranks, check_unique_ids, ex_aequo_flags};

/// Ranks options by their number of approvals, most approved first.
///
/// Same rank policy as the majority judgment ranking. There is no secondary key:
/// options with the same number of approvals share their rank and are ex-aequo.
/// They are listed in input order.
pub fn rank_approvals(options: &[ApprovalOption]) -> Result<Vec<ApprovalResult>, JudgmentErrors> {
    check_unique_ids(options.iter().map(|o| &o.id))?;

    let mut sorted: Vec<&ApprovalOption> = options.iter().collect();
    sorted.sort_by(|a, b| b.approvals.cmp(&a.approvals));

    let ranks = assign_ranks(&sorted, |a, b| a.approvals == b.approvals);
    let ex_aequos = ex_aequo_flags(&ranks);
    debug!("rank_approvals: ranks: {:?}", ranks);

    Ok(sorted
        .iter()
        .zip(ranks.iter().zip(ex_aequos.iter()))
        .map(|(o, (&rank, &is_ex_aequo))| ApprovalResult {
            id: o.id.clone(),
            label: o.label.clone(),
            approvals: o.approvals,
            rank,
            is_winner: rank == 1,
            is_ex_aequo,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(res: &[ApprovalResult]) -> Vec<(&str, u32, bool, bool)> {
        res.iter()
            .map(|r| (r.id.as_str(), r.rank, r.is_winner, r.is_ex_aequo))
            .collect()
    }

    #[test]
    fn most_approved_first() {
        let options = vec![
            ApprovalOption::new("a", "A", 2),
            ApprovalOption::new("b", "B", 9),
            ApprovalOption::new("c", "C", 4),
        ];
        let res = rank_approvals(&options).unwrap();
        assert_eq!(
            summary(&res),
            vec![
                ("b", 1, true, false),
                ("c", 2, false, false),
                ("a", 3, false, false)
            ]
        );
        assert_eq!(res[0].approvals, 9);
    }

    #[test]
    fn ties_share_the_rank_and_keep_the_gap() {
        let options = vec![
            ApprovalOption::new("a", "A", 5),
            ApprovalOption::new("b", "B", 3),
            ApprovalOption::new("c", "C", 3),
            ApprovalOption::new("d", "D", 8),
            ApprovalOption::new("e", "E", 3),
            ApprovalOption::new("f", "F", 0),
        ];
        let res = rank_approvals(&options).unwrap();
        assert_eq!(
            summary(&res),
            vec![
                ("d", 1, true, false),
                ("a", 2, false, false),
                ("b", 3, false, true),
                ("c", 3, false, true),
                ("e", 3, false, true),
                ("f", 6, false, false),
            ]
        );
    }

    #[test]
    fn tie_for_first_place() {
        let options = vec![
            ApprovalOption::new("a", "A", 4),
            ApprovalOption::new("b", "B", 4),
        ];
        let res = rank_approvals(&options).unwrap();
        assert_eq!(summary(&res), vec![("a", 1, true, true), ("b", 1, true, true)]);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let options = vec![
            ApprovalOption::new("a", "A", 4),
            ApprovalOption::new("a", "A again", 1),
        ];
        assert_eq!(
            rank_approvals(&options),
            Err(JudgmentErrors::DuplicateOption("a".to_string()))
        );
    }
}
