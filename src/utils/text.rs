use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncate text to a display width, appending an ellipsis when cut.
///
/// # Examples
/// ```
/// use leadgrid::utils::text::truncate_text;
/// assert_eq!(truncate_text("1200 Congress Avenue", 10), "1200 Co...");
/// ```
pub fn truncate_text(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }

    const ELLIPSIS: &str = "...";
    let ellipsis_width = ELLIPSIS.width();

    if max_width <= ellipsis_width {
        return ELLIPSIS[..max_width].to_string();
    }

    let target_width = max_width - ellipsis_width;
    let mut result = String::new();
    let mut current_width = 0;

    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if current_width + ch_width > target_width {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }

    result.push_str(ELLIPSIS);
    result
}

/// Format a price as whole dollars with thousands separators.
///
/// # Examples
/// ```
/// use leadgrid::utils::text::format_price;
/// assert_eq!(format_price(Some(1250000.0)), "$1,250,000");
/// assert_eq!(format_price(None), "-");
/// ```
pub fn format_price(price: Option<f64>) -> String {
    let Some(price) = price else {
        return "-".to_string();
    };

    let whole = price.round() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if whole < 0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Render an optional count (beds, baths) without a trailing `.0`.
pub fn format_count(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 => format!("{}", v as i64),
        Some(v) => format!("{:.1}", v),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text_short_text_untouched() {
        assert_eq!(truncate_text("Austin", 10), "Austin");
    }

    #[test]
    fn test_truncate_text_wide_chars() {
        // Each CJK character is two columns wide
        assert_eq!(truncate_text("東京都港区六本木", 9), "東京都...");
        assert_eq!(truncate_text("abcdef", 2), "..");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Some(999.0)), "$999");
        assert_eq!(format_price(Some(50000.0)), "$50,000");
        assert_eq!(format_price(Some(2_000_000.4)), "$2,000,000");
        assert_eq!(format_price(Some(-1500.0)), "-$1,500");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(Some(3.0)), "3");
        assert_eq!(format_count(Some(2.5)), "2.5");
        assert_eq!(format_count(None), "-");
    }
}
