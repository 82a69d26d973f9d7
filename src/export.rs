//! Rendering a [`ResultSet`] as a document.
//!
//! CSV follows RFC 4180 (CRLF line endings, quoting only where needed). HTML is
//! a bare `<table>` fragment for embedding in a page.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::results::ResultSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Html,
}

/// Render `rs` in the requested format.
#[must_use]
pub fn render(rs: &ResultSet, format: ExportFormat) -> Vec<u8> {
    match format {
        ExportFormat::Csv => to_csv(rs),
        ExportFormat::Html => to_html(rs),
    }
}

/// Header row of column names, then one record per row. NULL is an empty field.
#[must_use]
pub fn to_csv(rs: &ResultSet) -> Vec<u8> {
    let mut output = String::new();

    if !rs.column_names().is_empty() {
        let header: Vec<String> = rs.column_names().iter().map(|c| escape_csv(c)).collect();
        output.push_str(&header.join(","));
        output.push_str("\r\n");
    }

    for row in rs {
        let fields: Vec<String> = row
            .values()
            .iter()
            .map(|v| escape_csv(&v.to_string()))
            .collect();
        output.push_str(&fields.join(","));
        output.push_str("\r\n");
    }

    output.into_bytes()
}

fn escape_csv(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// `<table>` with a `<thead>` of column names and a `<tbody>` of rows.
#[must_use]
pub fn to_html(rs: &ResultSet) -> Vec<u8> {
    let mut output = String::from("<table>\n<thead><tr>");
    for column in rs.column_names() {
        output.push_str("<th>");
        output.push_str(&escape_html(column));
        output.push_str("</th>");
    }
    output.push_str("</tr></thead>\n<tbody>\n");

    for row in rs {
        output.push_str("<tr>");
        for value in row.values() {
            if value.is_null() {
                output.push_str("<td></td>");
            } else {
                output.push_str("<td>");
                output.push_str(&escape_html(&value.to_string()));
                output.push_str("</td>");
            }
        }
        output.push_str("</tr>\n");
    }
    output.push_str("</tbody>\n</table>\n");

    output.into_bytes()
}

fn escape_html(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            _ => output.push(ch),
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::result_set_from;
    use crate::types::SqlValue;

    /// Minimal RFC 4180 reader: quoted fields, doubled quotes, CRLF records.
    fn parse_csv(input: &str) -> Vec<Vec<String>> {
        let mut records = Vec::new();
        let mut record = Vec::new();
        let mut field = String::new();
        let mut in_quotes = false;
        let mut chars = input.chars().peekable();
        while let Some(c) = chars.next() {
            if in_quotes {
                match c {
                    '"' if chars.peek() == Some(&'"') => {
                        field.push('"');
                        chars.next();
                    }
                    '"' => in_quotes = false,
                    _ => field.push(c),
                }
                continue;
            }
            match c {
                '"' => in_quotes = true,
                ',' => record.push(std::mem::take(&mut field)),
                '\r' if chars.peek() == Some(&'\n') => {
                    chars.next();
                    record.push(std::mem::take(&mut field));
                    records.push(std::mem::take(&mut record));
                }
                _ => field.push(c),
            }
        }
        records
    }

    #[test]
    fn csv_round_trips_quotes_and_commas() {
        let tricky = "He said \"hi\", yo";
        let rs = result_set_from(
            &["id", "note"],
            vec![
                vec![SqlValue::Int(1), SqlValue::from(tricky)],
                vec![SqlValue::Int(2), SqlValue::from("line\r\nbreak")],
                vec![SqlValue::Int(3), SqlValue::Null],
            ],
        );
        let csv = String::from_utf8(to_csv(&rs)).unwrap();
        assert!(csv.contains("\"He said \"\"hi\"\", yo\""));

        let records = parse_csv(&csv);
        assert_eq!(records.len(), 4);
        assert_eq!(records[0], vec!["id", "note"]);
        assert_eq!(records[1], vec!["1", tricky]);
        assert_eq!(records[2], vec!["2", "line\r\nbreak"]);
        assert_eq!(records[3], vec!["3", ""]);
    }

    #[test]
    fn html_escapes_markup() {
        let rs = result_set_from(
            &["a<b"],
            vec![vec![SqlValue::from("<script>\"x\" & y</script>")]],
        );
        let html = String::from_utf8(render(&rs, ExportFormat::Html)).unwrap();
        assert!(html.contains("<th>a&lt;b</th>"));
        assert!(html.contains("<td>&lt;script&gt;&quot;x&quot; &amp; y&lt;/script&gt;</td>"));
        assert!(!html.contains("<script>"));
    }
}
