use std::time::Instant;

/// Characters per word in the standard WPM convention
pub const CHARS_PER_WORD: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsSnapshot {
    pub words_per_minute: f64,
    pub accuracy_percent: u8,
}

impl Default for MetricsSnapshot {
    fn default() -> Self {
        Self {
            words_per_minute: 0.0,
            accuracy_percent: 100,
        }
    }
}

impl MetricsSnapshot {
    pub fn measure(typed: &str, target: &str, started_at: Option<Instant>, now: Instant) -> Self {
        Self {
            words_per_minute: started_at.map_or(0.0, |start| compute_speed(typed, start, now)),
            accuracy_percent: compute_accuracy(typed, target),
        }
    }
}

/// Share of typed characters that match the target, as a whole percentage.
///
/// Only positions present in both strings are compared; typed characters past
/// the end of the target count neither for nor against.
pub fn compute_accuracy(typed: &str, target: &str) -> u8 {
    let (compared, matches) = typed
        .chars()
        .zip(target.chars())
        .fold((0usize, 0usize), |(compared, matches), (t, e)| {
            (compared + 1, matches + usize::from(t == e))
        });

    if compared == 0 {
        return 100;
    }

    // round half up in integers; float division can land just under .5
    ((200 * matches + compared) / (2 * compared)) as u8
}

/// Gross words per minute since `started_at`
pub fn compute_speed(typed: &str, started_at: Instant, now: Instant) -> f64 {
    let elapsed_minutes = now.saturating_duration_since(started_at).as_secs_f64() / 60.0;
    if elapsed_minutes <= 0.0 {
        return 0.0;
    }

    typed.chars().count() as f64 / CHARS_PER_WORD / elapsed_minutes
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_accuracy_empty_typed() {
        assert_eq!(compute_accuracy("", "anything at all"), 100);
        assert_eq!(compute_accuracy("", ""), 100);
    }

    #[test]
    fn test_accuracy_exact_prefix() {
        let target = "the quick brown fox";
        for end in 1..=target.len() {
            assert_eq!(compute_accuracy(&target[..end], target), 100);
        }
    }

    #[test]
    fn test_accuracy_ignores_target_tail() {
        assert_eq!(
            compute_accuracy("hxllo", "hello"),
            compute_accuracy("hxllo", "hello world and more")
        );
        assert_eq!(compute_accuracy("hxllo", "hello"), 80);
    }

    #[test]
    fn test_accuracy_rounds_half_up() {
        // 1 of 8 wrong: 87.5 -> 88
        assert_eq!(compute_accuracy("abcdefgX", "abcdefgh"), 88);
        // 2 of 3 right: 66.67 -> 67
        assert_eq!(compute_accuracy("abX", "abc"), 67);
        // 1 of 3 right: 33.33 -> 33
        assert_eq!(compute_accuracy("aXY", "abc"), 33);
    }

    #[test]
    fn test_accuracy_rounds_inexact_halves_up() {
        // 57 of 200: 28.5 -> 29, not representable after dividing first
        let typed = format!("{}{}", "a".repeat(57), "b".repeat(143));
        assert_eq!(compute_accuracy(&typed, &"a".repeat(200)), 29);

        // 1 of 200: 0.5 -> 1
        let typed = format!("a{}", "b".repeat(199));
        assert_eq!(compute_accuracy(&typed, &"a".repeat(200)), 1);

        // 199 of 200: 99.5 -> 100
        let typed = format!("{}b", "a".repeat(199));
        assert_eq!(compute_accuracy(&typed, &"a".repeat(200)), 100);
    }

    #[test]
    fn test_accuracy_all_wrong() {
        assert_eq!(compute_accuracy("xyz", "abc"), 0);
    }

    #[test]
    fn test_accuracy_excludes_out_of_range_positions() {
        // only "ab" is comparable, both match
        assert_eq!(compute_accuracy("abcdef", "ab"), 100);
        // nothing is comparable
        assert_eq!(compute_accuracy("abc", ""), 100);
        // one of two comparable positions matches
        assert_eq!(compute_accuracy("aXzzzz", "ab"), 50);
    }

    #[test]
    fn test_accuracy_counts_chars_not_bytes() {
        assert_eq!(compute_accuracy("café", "café au lait"), 100);
        assert_eq!(compute_accuracy("cafe", "café"), 75);
    }

    #[test]
    fn test_speed_zero_at_start() {
        let start = Instant::now();
        assert_eq!(compute_speed("hello", start, start), 0.0);
    }

    #[test]
    fn test_speed_one_word_per_minute() {
        let start = Instant::now();
        let now = start + Duration::from_secs(60);
        assert_eq!(compute_speed("hello", start, now), 1.0);
    }

    #[test]
    fn test_speed_scales_with_time() {
        let start = Instant::now();
        let now = start + Duration::from_secs(30);
        // 50 chars = 10 words in half a minute
        assert_eq!(compute_speed(&"a".repeat(50), start, now), 20.0);
    }

    #[test]
    fn test_speed_is_not_clamped() {
        let start = Instant::now();
        let now = start + Duration::from_millis(10);
        assert!(compute_speed("hello world", start, now) > 1000.0);
    }

    #[test]
    fn test_speed_with_clock_behind_start() {
        let now = Instant::now();
        let start = now + Duration::from_secs(5);
        assert_eq!(compute_speed("hello", start, now), 0.0);
    }

    #[test]
    fn test_measure_without_start() {
        let snapshot = MetricsSnapshot::measure("ab", "ab", None, Instant::now());
        assert_eq!(snapshot.words_per_minute, 0.0);
        assert_eq!(snapshot.accuracy_percent, 100);
    }

    #[test]
    fn test_measure_bundles_both_metrics() {
        let start = Instant::now();
        let snapshot =
            MetricsSnapshot::measure("hxllo", "hello", Some(start), start + Duration::from_secs(60));
        assert_eq!(snapshot.words_per_minute, 1.0);
        assert_eq!(snapshot.accuracy_percent, 80);
    }

    #[test]
    fn test_default_snapshot() {
        let snapshot = MetricsSnapshot::default();
        assert_eq!(snapshot.words_per_minute, 0.0);
        assert_eq!(snapshot.accuracy_percent, 100);
    }
}
