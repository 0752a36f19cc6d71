use chrono::NaiveDateTime;

use crate::model::ForecastEntry;

/// Pick the entry whose timestamp is closest to `target`.
///
/// The series does not need to be sorted. On equal distance the entry seen
/// first is kept; `None` only for an empty series.
pub fn select_nearest(series: &[ForecastEntry], target: NaiveDateTime) -> Option<&ForecastEntry> {
    let mut best: Option<(&ForecastEntry, i64)> = None;

    for entry in series {
        let diff = (entry.timestamp - target).num_seconds().abs();
        match best {
            Some((_, best_diff)) if diff >= best_diff => {}
            _ => best = Some((entry, diff)),
        }
    }

    best.map(|(entry, _)| entry)
}
