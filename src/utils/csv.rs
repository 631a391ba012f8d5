//! CSV rendering for record exports
//!
//! Produces a header row followed by one row per record with every value
//! double-quoted; embedded quotes are doubled. Consumers download the
//! result as-is, so no trailing newline is emitted.

/// Render a header and rows into CSV text
pub fn render(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = headers.join(",");
    for row in rows {
        out.push('\n');
        let quoted: Vec<String> = row.iter().map(|v| quote(v)).collect();
        out.push_str(&quoted.join(","));
    }
    out
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
