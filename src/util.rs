/// MM:SS rendering of a countdown, zero-padded on both sides.
pub fn format_mm_ss(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Time-of-day word for the "Good morning, ..." header.
pub fn greeting_for_hour(hour: u32) -> &'static str {
    match hour {
        0..=11 => "morning",
        12..=17 => "afternoon",
        _ => "evening",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_mm_ss() {
        assert_eq!(format_mm_ss(0), "00:00");
        assert_eq!(format_mm_ss(59), "00:59");
        assert_eq!(format_mm_ss(60), "01:00");
        assert_eq!(format_mm_ss(1500), "25:00");
        assert_eq!(format_mm_ss(3599), "59:59");
        assert_eq!(format_mm_ss(3600), "60:00");
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   "), 0);
        assert_eq!(word_count("one"), 1);
        assert_eq!(word_count("a few words here"), 4);
        assert_eq!(word_count("  leading and   trailing  "), 3);
        assert_eq!(word_count("line\nbreaks\tcount\ntoo"), 4);
    }

    #[test]
    fn test_greeting_boundaries() {
        assert_eq!(greeting_for_hour(0), "morning");
        assert_eq!(greeting_for_hour(11), "morning");
        assert_eq!(greeting_for_hour(12), "afternoon");
        assert_eq!(greeting_for_hour(17), "afternoon");
        assert_eq!(greeting_for_hour(18), "evening");
        assert_eq!(greeting_for_hour(23), "evening");
    }
}
