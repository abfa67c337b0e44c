use sheetsync_contracts::RawCsvRecord;

// Lenient by construction: an unterminated quote flushes whatever was buffered.
pub fn tokenize_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                current.push('"');
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    fields.push(current.trim().to_string());
    fields
}

pub fn parse_csv(text: &str) -> Vec<RawCsvRecord> {
    // Sheet exports often lead with a BOM that `str::trim` leaves in place.
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
    let mut lines = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty());

    let Some(header_line) = lines.next() else {
        return Vec::new();
    };

    let headers = tokenize_line(header_line)
        .into_iter()
        .map(|h| h.to_lowercase())
        .collect::<Vec<_>>();

    lines
        .map(|line| {
            let mut cols = tokenize_line(line).into_iter();
            let mut record = RawCsvRecord::with_capacity(headers.len());
            for header in &headers {
                record.insert(header.clone(), cols.next().unwrap_or_default());
            }
            record
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_splits_plain_fields() {
        assert_eq!(tokenize_line("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn tokenize_keeps_commas_inside_quotes() {
        assert_eq!(tokenize_line(r#""a,b",c"#), vec!["a,b", "c"]);
    }

    #[test]
    fn tokenize_unescapes_doubled_quotes() {
        assert_eq!(tokenize_line(r#""a""b",c"#), vec![r#"a"b"#, "c"]);
    }

    #[test]
    fn tokenize_flushes_unterminated_quote() {
        assert_eq!(tokenize_line(r#""a,b"#), vec!["a,b"]);
    }

    #[test]
    fn tokenize_trims_fields_and_keeps_empty_ones() {
        assert_eq!(tokenize_line("  a , ,b  ,"), vec!["a", "", "b", ""]);
        assert_eq!(tokenize_line(""), vec![""]);
    }

    #[test]
    fn tokenize_quote_mid_field_toggles_mode() {
        assert_eq!(tokenize_line(r#"ab"c,d"e,f"#), vec!["abc,de", "f"]);
    }

    #[test]
    fn parse_empty_text_yields_no_records() {
        assert!(parse_csv("").is_empty());
        assert!(parse_csv("\n\r\n\n").is_empty());
        assert!(parse_csv("app_no,label,url\n").is_empty());
    }

    #[test]
    fn parse_rectangular_table_round_trips_cells() {
        for cols in 1..5usize {
            for rows in 0..4usize {
                let header = (0..cols)
                    .map(|c| format!("Col{c}"))
                    .collect::<Vec<_>>()
                    .join(",");
                let body = (0..rows)
                    .map(|r| {
                        (0..cols)
                            .map(|c| format!(" r{r}c{c} "))
                            .collect::<Vec<_>>()
                            .join(",")
                    })
                    .collect::<Vec<_>>();
                let mut text = header;
                for line in &body {
                    text.push_str("\r\n");
                    text.push_str(line);
                }

                let records = parse_csv(&text);
                assert_eq!(records.len(), rows);
                for (r, record) in records.iter().enumerate() {
                    assert_eq!(record.len(), cols);
                    for c in 0..cols {
                        assert_eq!(
                            record.get(&format!("col{c}")).map(String::as_str),
                            Some(format!("r{r}c{c}").as_str())
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn parse_lowercases_headers_and_pads_missing_columns() {
        let records = parse_csv("EMAIL,App_No,Allowed\nx@y.z,1\n\nq@r.s,2,yes,extra\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["email"], "x@y.z");
        assert_eq!(records[0]["app_no"], "1");
        assert_eq!(records[0]["allowed"], "");
        assert_eq!(records[1]["allowed"], "yes");
        assert_eq!(records[1].len(), 3);
    }

    #[test]
    fn parse_duplicate_header_keeps_later_column() {
        let records = parse_csv("a,A,b\n1,2,3");
        assert_eq!(records[0].len(), 2);
        assert_eq!(records[0]["a"], "2");
        assert_eq!(records[0]["b"], "3");
    }

    #[test]
    fn parse_drops_leading_byte_order_mark() {
        let records = parse_csv("\u{FEFF}app_no,label,url\r\n1,Wiki,https://wiki.example\r\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["app_no"], "1");
        assert!(records[0].keys().all(|k| !k.starts_with('\u{FEFF}')));
    }
}
