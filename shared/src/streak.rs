use chrono::NaiveDate;

use crate::Week;

/// Earliest day with a positive count.
pub fn first_contribution_date(weeks: &[Week]) -> Option<NaiveDate> {
    weeks
        .iter()
        .flat_map(|week| week.contribution_days.iter())
        .filter(|day| day.contribution_count > 0)
        .map(|day| day.date)
        .min()
}

/// Longest run of consecutive calendar days with a positive count.
pub fn longest_streak(weeks: &[Week]) -> u32 {
    let mut days: Vec<_> = weeks
        .iter()
        .flat_map(|week| week.contribution_days.iter())
        .collect();
    days.sort_by_key(|day| day.date);

    let mut longest = 0;
    let mut current = 0;
    let mut previous: Option<NaiveDate> = None;
    for day in days {
        if day.contribution_count == 0 {
            current = 0;
            previous = None;
            continue;
        }

        let continues = previous
            .and_then(|prev| prev.succ_opt())
            .is_some_and(|next| next == day.date);
        current = if continues { current + 1 } else { 1 };
        longest = longest.max(current);
        previous = Some(day.date);
    }

    longest
}
