//! CSV header parsing and normalization.

/// Header row of a CSV file, as written and as normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvHeaders {
    /// Header values as they appear in the file (trimmed).
    pub raw: Vec<String>,
    /// snake_case column names used in DataFrames.
    pub columns: Vec<String>,
}

impl CsvHeaders {
    /// Builds headers from raw values, normalizing each one.
    ///
    /// Headers that normalize to nothing are named `column_<n>` (1-based).
    pub fn from_raw(raw: Vec<String>) -> Self {
        let columns = raw
            .iter()
            .enumerate()
            .map(|(idx, value)| {
                let normalized = normalize_column_name(value);
                if normalized.is_empty() {
                    format!("column_{}", idx + 1)
                } else {
                    normalized
                }
            })
            .collect();
        Self { raw, columns }
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// First normalized name that occurs more than once.
    pub fn first_duplicate(&self) -> Option<&str> {
        self.columns
            .iter()
            .enumerate()
            .find(|(idx, name)| self.columns[..*idx].contains(name))
            .map(|(_, name)| name.as_str())
    }
}

/// Normalizes a header to snake_case.
///
/// Letters are lowercased, digits kept, and every run of other characters
/// becomes a single underscore; leading and trailing separators are dropped.
/// `GP_CODE`, `gp code` and ` Gp-Code ` all become `gp_code`.
pub fn normalize_column_name(raw: &str) -> String {
    let mut normalized = String::with_capacity(raw.len());
    let mut pending_separator = false;
    for ch in raw.trim().trim_start_matches('\u{feff}').chars() {
        if ch.is_alphanumeric() {
            if pending_separator && !normalized.is_empty() {
                normalized.push('_');
            }
            pending_separator = false;
            normalized.extend(ch.to_lowercase());
        } else {
            pending_separator = true;
        }
    }
    normalized
}

/// Parses a CSV line into fields, handling quoted values.
pub fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if !in_quotes => {
                in_quotes = true;
            }
            '"' if in_quotes => {
                // Check for escaped quote ("")
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => {
                current.push(c);
            }
        }
    }

    fields.push(current.trim().to_string());
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_column_name() {
        assert_eq!(normalize_column_name("GP_CODE"), "gp_code");
        assert_eq!(normalize_column_name("  Count Of Appointments "), "count_of_appointments");
        assert_eq!(normalize_column_name("Gp-Code"), "gp_code");
        assert_eq!(normalize_column_name("\u{feff}APPT_STATUS"), "appt_status");
        assert_eq!(normalize_column_name("__Region  Name__"), "region_name");
        assert_eq!(normalize_column_name("---"), "");
    }

    #[test]
    fn test_headers_fill_blank_names() {
        let headers = CsvHeaders::from_raw(vec!["GP_CODE".to_string(), String::new()]);
        assert_eq!(headers.columns, vec!["gp_code", "column_2"]);
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn test_headers_first_duplicate() {
        let headers = CsvHeaders::from_raw(vec![
            "GP_CODE".to_string(),
            "gp code".to_string(),
            "HCP_TYPE".to_string(),
        ]);
        assert_eq!(headers.first_duplicate(), Some("gp_code"));

        let unique = CsvHeaders::from_raw(vec!["A".to_string(), "B".to_string()]);
        assert_eq!(unique.first_duplicate(), None);
    }

    #[test]
    fn test_parse_csv_line_simple() {
        let result = parse_csv_line("a,b,c");
        assert_eq!(result, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_csv_line_quoted() {
        let result = parse_csv_line("\"NHS ENGLAND, LONDON\",b,c");
        assert_eq!(result, vec!["NHS ENGLAND, LONDON", "b", "c"]);
    }

    #[test]
    fn test_parse_csv_line_escaped_quotes() {
        let result = parse_csv_line("\"he said \"\"hello\"\"\",b");
        assert_eq!(result, vec!["he said \"hello\"", "b"]);
    }
}
