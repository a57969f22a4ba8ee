//! Utility functions used across the covid-plots workspace

/// Formats a value with thousands separators and no scientific notation.
///
/// Fractional parts are rounded away; axis ticks on count panels are whole numbers.
pub fn format_plain_count(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Makes a country name safe to use as one path component.
pub fn sanitize_file_component(input: &str) -> String {
    let cleaned: String = input
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            other => other,
        })
        .collect();
    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        "_".to_string()
    } else {
        cleaned
    }
}

/// Splits a comma-separated country list, trimming entries and dropping empty ones.
pub fn split_country_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_plain_count() {
        assert_eq!(format_plain_count(0.0), "0");
        assert_eq!(format_plain_count(999.0), "999");
        assert_eq!(format_plain_count(1000.0), "1,000");
        assert_eq!(format_plain_count(38_249_060.0), "38,249,060");
        assert_eq!(format_plain_count(-12_345.4), "-12,345");
        assert_eq!(format_plain_count(f64::NAN), "0");
    }

    #[test]
    fn test_sanitize_file_component() {
        assert_eq!(sanitize_file_component("Germany"), "Germany");
        assert_eq!(sanitize_file_component("Korea, South"), "Korea, South");
        assert_eq!(sanitize_file_component("a/b\\c"), "a_b_c");
        assert_eq!(sanitize_file_component(".."), "_");
        assert_eq!(sanitize_file_component("  "), "_");
    }

    #[test]
    fn test_split_country_list() {
        assert_eq!(
            split_country_list("Germany, France,,  Italy "),
            vec!["Germany", "France", "Italy"]
        );
        assert!(split_country_list(" , ").is_empty());
    }
}
