/// Clock text for timeline labels.
use crate::Seconds;

/// Placeholder shown for an endpoint that is not set yet.
pub const CLOCK_PLACEHOLDER: &str = "--:--.--";

/// Format seconds as `MM:SS.CC` (centisecond precision).
///
/// Negative inputs clamp to zero; minutes widen past two digits rather than
/// wrapping.
pub fn to_clock(seconds: Seconds) -> String {
    if !seconds.is_finite() {
        return CLOCK_PLACEHOLDER.to_string();
    }

    let total_centis = (seconds * 100.0).round().max(0.0) as u64;
    let minutes = total_centis / 6000;
    let secs = (total_centis % 6000) / 100;
    let centis = total_centis % 100;
    format!("{:02}:{:02}.{:02}", minutes, secs, centis)
}

/// Format seconds as `HH:MM:SS` (whole-second precision), for duration
/// summaries.
pub fn to_hms(seconds: Seconds) -> String {
    if !seconds.is_finite() {
        return "--:--:--".to_string();
    }

    let total = seconds.round().max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_clock_basic() {
        assert_eq!(to_clock(0.0), "00:00.00");
        assert_eq!(to_clock(1.5), "00:01.50");
        assert_eq!(to_clock(61.25), "01:01.25");
        assert_eq!(to_clock(600.0), "10:00.00");
    }

    #[test]
    fn test_to_clock_rounds_centis() {
        assert_eq!(to_clock(0.004), "00:00.00");
        assert_eq!(to_clock(0.005), "00:00.01");
        assert_eq!(to_clock(59.996), "01:00.00");
    }

    #[test]
    fn test_to_clock_clamps_negative() {
        assert_eq!(to_clock(-3.0), "00:00.00");
    }

    #[test]
    fn test_to_clock_wide_minutes() {
        assert_eq!(to_clock(6000.0), "100:00.00");
    }

    #[test]
    fn test_to_hms() {
        assert_eq!(to_hms(0.0), "00:00:00");
        assert_eq!(to_hms(59.6), "00:01:00");
        assert_eq!(to_hms(3723.0), "01:02:03");
        assert_eq!(to_hms(-1.0), "00:00:00");
    }
}
