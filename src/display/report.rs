//! Report formatting utilities for terminal output

use crate::models::Money;

/// Share of a total, one decimal place; tiny non-zero shares show as "<0.1%"
pub fn format_percentage(pct: f64) -> String {
    if pct > 0.0 && pct < 0.05 {
        "<0.1%".to_string()
    } else {
        format!("{:.1}%", pct)
    }
}

/// Bar scaled against the largest amount in the table
pub fn format_bar(amount: Money, largest: Money, width: usize) -> String {
    let (amount, largest) = (amount.abs().minor(), largest.abs().minor());
    if largest == 0 || amount == 0 {
        return " ".repeat(width);
    }

    let filled = ((amount as f64 / largest as f64) * width as f64).round() as usize;
    let filled = filled.clamp(1, width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Bar for a monthly net, prefixed with its sign
pub fn format_net_bar(net: Money, widest: Money, width: usize) -> String {
    let sign = if net.is_negative() { '-' } else { '+' };
    format!("{}{}", sign, format_bar(net, widest, width))
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Format a double separator line
pub fn double_separator(width: usize) -> String {
    "═".repeat(width)
}

/// Truncate to at most `max_chars` characters, ending in an ellipsis
///
/// Counts characters rather than bytes so Persian text is never split inside
/// a code point.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else if max_chars <= 1 {
        "…".chars().take(max_chars).collect()
    } else {
        let mut cut: String = s.chars().take(max_chars - 1).collect();
        cut.push('…');
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(0.01), "<0.1%");
        assert_eq!(format_percentage(0.0), "0.0%");
        assert_eq!(format_percentage(47.826), "47.8%");
        assert_eq!(format_percentage(100.0), "100.0%");
    }

    #[test]
    fn test_format_bar() {
        let bar = format_bar(Money::from_minor(500), Money::from_minor(1_000), 10);
        assert_eq!(bar.chars().filter(|c| *c == '█').count(), 5);
        assert_eq!(bar.chars().count(), 10);
        assert_eq!(format_bar(Money::from_minor(5), Money::zero(), 4), "    ");

        // A small but non-zero amount still shows
        let sliver = format_bar(Money::from_minor(1), Money::from_minor(1_000_000), 8);
        assert!(sliver.starts_with('█'));
    }

    #[test]
    fn test_format_net_bar() {
        let widest = Money::from_minor(400);
        assert_eq!(format_net_bar(Money::from_minor(-400), widest, 4), "-████");
        assert_eq!(format_net_bar(Money::from_minor(200), widest, 4), "+██░░");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello World", 5), "Hell…");
        assert_eq!(truncate("Hi", 5), "Hi");
        assert_eq!(truncate("تامین نان روزانه", 6), "تامین…");
    }

    #[test]
    fn test_separators() {
        assert_eq!(separator(3), "───");
        assert_eq!(double_separator(2), "══");
    }
}
