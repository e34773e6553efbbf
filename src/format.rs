// ABOUTME: Display helpers for counts shown in the TUI and headless output.
// ABOUTME: Thousands separators, percentages, and simple pluralization.

/// Format an integer with comma thousands separators: 12345 -> "12,345".
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a percentage with two decimals: 81.004 -> "81.00%".
pub fn percent(value: f64) -> String {
    format!("{:.2}%", value)
}

/// `"1 Novel"`, `"3 Novels"`.
pub fn plural(count: u64, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_small_numbers_untouched() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(7), "7");
        assert_eq!(thousands(999), "999");
    }

    #[test]
    fn thousands_inserts_separators() {
        assert_eq!(thousands(1_000), "1,000");
        assert_eq!(thousands(12_345), "12,345");
        assert_eq!(thousands(740_700), "740,700");
        assert_eq!(thousands(1_234_567_890), "1,234,567,890");
    }

    #[test]
    fn percent_has_two_decimals() {
        assert_eq!(percent(81.004), "81.00%");
        assert_eq!(percent(100.0), "100.00%");
    }

    #[test]
    fn plural_handles_one() {
        assert_eq!(plural(1, "Hamlet"), "1 Hamlet");
        assert_eq!(plural(0, "Hamlet"), "0 Hamlets");
        assert_eq!(plural(4, "Novel"), "4 Novels");
    }
}
