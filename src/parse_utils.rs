pub fn trim_ascii_whitespace(b: &[u8]) -> Option<&[u8]> {
    let start = b.iter().position(|&c| !c.is_ascii_whitespace())?;
    let end = b.iter().rposition(|&c| !c.is_ascii_whitespace())?;
    Some(&b[start..=end])
}

/// Parse one tab-separated field, naming the column in the error message.
pub fn parse_field<T: std::str::FromStr>(field: &str, column: &str) -> Result<T, String> {
    field
        .trim()
        .parse::<T>()
        .map_err(|_| format!("expected a number in column \"{column}\", found \"{field}\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_ascii_whitespace() {
        assert_eq!(trim_ascii_whitespace(b"  ab c\t"), Some(&b"ab c"[..]));
        assert_eq!(trim_ascii_whitespace(b" \t "), None);
    }

    #[test]
    fn test_parse_field() {
        assert_eq!(parse_field::<usize>("12", "qilo"), Ok(12));
        assert!(parse_field::<f64>("x", "id2").is_err());
    }
}
