use log::debug;

use crate::grades::Grade;
use crate::tally::MentionTally;

/// The majority grade (lower median) of a tally.
///
/// Walking from the best grade to the worst, this is the first grade at which
/// the cumulative count reaches half of the ballots. An exact tie at the
/// midpoint resolves toward the better grade.
///
/// A tally without any ballot gets the worst grade.
pub fn majority_grade<G: Grade>(tally: &MentionTally<G>) -> G {
    let total = tally.total();
    if total == 0 {
        debug!("majority_grade: empty tally, using the worst grade");
        return G::worst();
    }

    // running >= total / 2, compared in integers.
    let total2 = total as u128;
    let mut running: u128 = 0;
    for (grade, count) in tally.iter() {
        running += count as u128;
        if 2 * running >= total2 {
            debug!(
                "majority_grade: total: {:?} cumulative: {:?} -> {:?}",
                total, running, grade
            );
            return grade;
        }
    }
    // The cumulative count equals the total on the last grade.
    G::worst()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grades::{Mention, ShortMention};

    #[test]
    fn empty_tally_is_the_worst_grade() {
        let t: MentionTally<Mention> = MentionTally::empty();
        assert_eq!(majority_grade(&t), Mention::Bad);
        let t5: MentionTally<ShortMention> = MentionTally::empty();
        assert_eq!(majority_grade(&t5), ShortMention::ToReject);
    }

    #[test]
    fn single_grade() {
        for g in Mention::ALL.iter() {
            let t = MentionTally::empty().with(*g, 5);
            assert_eq!(majority_grade(&t), *g);
        }
        let t = MentionTally::empty().with(Mention::Excellent, 1);
        assert_eq!(majority_grade(&t), Mention::Excellent);
    }

    #[test]
    fn odd_total() {
        // Good, Very good, Excellent -> Very good
        let t = MentionTally::empty()
            .with(Mention::Good, 1)
            .with(Mention::VeryGood, 1)
            .with(Mention::Excellent, 1);
        assert_eq!(majority_grade(&t), Mention::VeryGood);
    }

    #[test]
    fn even_total_takes_the_better_side_of_the_midpoint() {
        // Excellent, Very good, Good, Good: half of the ballots are at Very good or better.
        let t = MentionTally::empty()
            .with(Mention::Good, 2)
            .with(Mention::VeryGood, 1)
            .with(Mention::Excellent, 1);
        assert_eq!(majority_grade(&t), Mention::VeryGood);

        // One ballot short of half at Very good.
        let t = MentionTally::empty()
            .with(Mention::Good, 3)
            .with(Mention::VeryGood, 1)
            .with(Mention::Excellent, 1);
        assert_eq!(majority_grade(&t), Mention::Good);

        // Half the ballots on Excellent, half on Bad.
        let t = MentionTally::empty()
            .with(Mention::Excellent, 2)
            .with(Mention::Bad, 2);
        assert_eq!(majority_grade(&t), Mention::Excellent);
    }

    #[test]
    fn six_ballot_scenario() {
        let t: MentionTally<Mention> = MentionTally::from_labelled_counts(&[
            ("Bad", 1),
            ("Inadequate", 1),
            ("Passable", 0),
            ("Fair", 1),
            ("Good", 2),
            ("Very good", 1),
            ("Excellent", 0),
        ])
        .unwrap();
        assert_eq!(t.total(), 6);
        assert_eq!(majority_grade(&t), Mention::Good);
    }

    #[test]
    fn gaps_in_the_scale() {
        let t = MentionTally::empty()
            .with(ShortMention::VeryGood, 1)
            .with(ShortMention::ToReject, 2);
        assert_eq!(majority_grade(&t), ShortMention::ToReject);
    }
}
