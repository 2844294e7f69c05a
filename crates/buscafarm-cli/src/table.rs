//! Plain-text rendering of session records.
//!
//! Field tables are left-aligned in two columns with a fixed gutter, values
//! truncated so one long field cannot wrap the terminal.

/// Space between the field and value columns
const COLUMN_PADDING: usize = 8;

/// Longest value printed before truncation
const MAX_VALUE_WIDTH: usize = 60;

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Render a titled two-column table.
pub fn render_table(title: &str, rows: &[(String, String)]) -> String {
    let key_width = rows.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    for (key, value) in rows {
        let value = truncate_string(value, MAX_VALUE_WIDTH);
        out.push_str(&format!(
            "{:<width$}{}\n",
            key,
            value,
            width = key_width + COLUMN_PADDING
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Farmácia", 20), "Farmácia");
        assert_eq!(truncate_string("Farmácia Central", 10), "Farmác...");
        assert_eq!(truncate_string("abcdef", 2), "ab");
    }

    #[test]
    fn test_render_table_aligns_values() {
        let rows = vec![
            ("id".to_string(), "9".to_string()),
            ("name".to_string(), "Farma Boa".to_string()),
        ];
        let out = render_table("Pharmacy", &rows);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "Pharmacy");
        assert_eq!(lines[1], format!("id{}9", " ".repeat(2 + COLUMN_PADDING)));
        assert_eq!(lines[2], format!("name{}Farma Boa", " ".repeat(COLUMN_PADDING)));
    }
}
