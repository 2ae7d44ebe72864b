use rand::Rng;

use crate::domain::{is_weekday, YearMonth};

pub const DEFAULT_DATE_ATTEMPTS: u32 = 100;

/// Splits `1..=last_day` into `count` contiguous segments of `last_day / count`
/// days. The final segment also takes the remainder.
pub fn segments(last_day: u32, count: u32) -> Vec<(u32, u32)> {
    if count == 0 {
        return Vec::new();
    }
    let width = last_day / count;
    (0..count)
        .map(|idx| {
            let start = 1 + idx * width;
            let end = if idx + 1 == count {
                last_day
            } else {
                (idx + 1) * width
            };
            (start, end)
        })
        .collect()
}

/// Picks one order day per segment of `month`, preferring Monday to Friday.
///
/// Each segment gets up to `attempts` random picks; if none lands on a
/// weekday an arbitrary day of the segment is used, so the result can hold
/// a weekend date. Always returns `orders` ascending days when
/// `orders <= days_in_month`.
pub fn generate_dates<R: Rng + ?Sized>(
    rng: &mut R,
    month: YearMonth,
    orders: u32,
    attempts: u32,
) -> Vec<u32> {
    let mut days: Vec<u32> = segments(month.days_in_month(), orders)
        .into_iter()
        .map(|(start, end)| pick_day(rng, month, start, end, attempts))
        .collect();
    days.sort_unstable();
    days
}

fn pick_day<R: Rng + ?Sized>(
    rng: &mut R,
    month: YearMonth,
    start: u32,
    end: u32,
    attempts: u32,
) -> u32 {
    for _ in 0..attempts {
        let day = rng.gen_range(start..=end);
        if month.date(day).map(is_weekday).unwrap_or(false) {
            return day;
        }
    }
    let day = rng.gen_range(start..=end);
    tracing::warn!(
        year = month.year(),
        month = month.month(),
        day,
        "no weekday found in segment {}..={}, using {}",
        start,
        end,
        day
    );
    day
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn leap_february_splits_in_two() {
        assert_eq!(segments(29, 2), vec![(1, 14), (15, 29)]);
        assert_eq!(segments(31, 3), vec![(1, 10), (11, 20), (21, 31)]);
        assert_eq!(segments(30, 1), vec![(1, 30)]);
    }

    #[test]
    fn one_date_per_segment_on_weekdays() {
        let month = YearMonth::new(2024, 2).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..200 {
            let days = generate_dates(&mut rng, month, 2, DEFAULT_DATE_ATTEMPTS);
            assert_eq!(days.len(), 2);
            assert!((1..=14).contains(&days[0]));
            assert!((15..=29).contains(&days[1]));
            for day in days {
                assert!(is_weekday(month.date(day).unwrap()));
            }
        }
    }

    #[test]
    fn weekend_only_segment_falls_back() {
        // 2024-06-01 and 02 are Saturday and Sunday.
        let month = YearMonth::new(2024, 6).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let day = pick_day(&mut rng, month, 1, 2, DEFAULT_DATE_ATTEMPTS);
        assert!(day == 1 || day == 2);
    }

    #[test]
    fn zero_attempts_still_returns_dates() {
        let month = YearMonth::new(2025, 1).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let days = generate_dates(&mut rng, month, 4, 0);
        assert_eq!(days.len(), 4);
        assert!(days.windows(2).all(|pair| pair[0] <= pair[1]));
    }
}
