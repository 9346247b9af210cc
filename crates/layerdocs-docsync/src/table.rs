//! Markdown table rendering.
//!
//! Tables use the minimal-separator convention: the separator row's dash
//! runs are exactly as wide as the header labels, regardless of how wide the
//! data is. Rows are emitted in the order given; callers sort beforehand.
//!
//! ```text
//! | Region | Layer ARN |
//! | ------ | --------- |
//! | us-east-1 | arn:aws:lambda:... |
//! ```

/// One table row, one string per column.
pub type Row = Vec<String>;

/// A header plus rows, ready to render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Column labels.
    pub header: Vec<String>,

    /// Data rows in display order.
    pub rows: Vec<Row>,
}

impl Table {
    /// Creates an empty table with the given column labels.
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row.
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    /// Renders the table as markdown.
    pub fn render(&self) -> String {
        render_table(&self.rows, &self.header)
    }
}

/// Renders `rows` under `header` as a markdown table, without a trailing newline.
///
/// # Example
///
/// ```rust
/// use layerdocs_docsync::render_table;
///
/// let rows = vec![vec!["5".to_string(), "v1.2.0".to_string()]];
/// let table = render_table(&rows, &["Layer version", "DuckDB version"]);
/// assert_eq!(
///     table,
///     "| Layer version | DuckDB version |\n| ------------- | -------------- |\n| 5 | v1.2.0 |"
/// );
/// ```
pub fn render_table<H: AsRef<str>>(rows: &[Row], header: &[H]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(render_row(header.iter()));
    lines.push(render_row(
        header.iter().map(|label| "-".repeat(label.as_ref().chars().count())),
    ));
    for row in rows {
        lines.push(render_row(row.iter()));
    }
    lines.join("\n")
}

fn render_row<I, S>(cells: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut line = String::from("|");
    for cell in cells {
        line.push(' ');
        line.push_str(cell.as_ref());
        line.push_str(" |");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separator_width_follows_header_only() {
        let mut table = Table::new(["Region", "Layer ARN"]);
        table.push_row(["ap-southeast-2", "arn:aws:lambda:ap-southeast-2:1:layer:x:1"]);

        let rendered = table.render();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines[0], "| Region | Layer ARN |");
        assert_eq!(lines[1], "| ------ | --------- |");
        assert_eq!(lines[2], "| ap-southeast-2 | arn:aws:lambda:ap-southeast-2:1:layer:x:1 |");
    }

    #[test]
    fn test_rows_keep_given_order() {
        let mut table = Table::new(["k"]);
        table.push_row(["b"]);
        table.push_row(["a"]);
        table.push_row(["c"]);
        assert_eq!(table.render(), "| k |\n| - |\n| b |\n| a |\n| c |");
    }

    #[test]
    fn test_header_only_table() {
        let table = Table::new(["A", "Bee"]);
        assert_eq!(table.render(), "| A | Bee |\n| - | --- |");
    }
}
