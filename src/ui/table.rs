//! Box-drawn tables.

use console::measure_text_width;

/// A simple table for formatted output.
///
/// Column widths are measured on visible text, so cells may carry ANSI
/// styling.
#[derive(Debug)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    column_widths: Vec<usize>,
}

impl Table {
    /// Create a new table with the given headers.
    pub fn new(headers: &[&str]) -> Self {
        let headers: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
        let column_widths = headers.iter().map(|h| measure_text_width(h)).collect();

        Self {
            headers,
            rows: Vec::new(),
            column_widths,
        }
    }

    /// Add a row. Extra cells beyond the header count are dropped.
    pub fn add_row(&mut self, row: Vec<String>) {
        for (width, cell) in self.column_widths.iter_mut().zip(&row) {
            *width = (*width).max(measure_text_width(cell));
        }
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render the table as a string, without a trailing newline.
    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows.len() + 4);
        lines.push(self.border('┌', '┬', '┐'));
        lines.push(self.line(&self.headers));
        lines.push(self.border('├', '┼', '┤'));
        for row in &self.rows {
            lines.push(self.line(row));
        }
        lines.push(self.border('└', '┴', '┘'));
        lines.join("\n")
    }

    fn border(&self, left: char, mid: char, right: char) -> String {
        let segments: Vec<String> = self
            .column_widths
            .iter()
            .map(|w| "─".repeat(w + 2))
            .collect();
        format!("{}{}{}", left, segments.join(&mid.to_string()), right)
    }

    fn line(&self, row: &[String]) -> String {
        let mut s = String::from("│");
        for (i, width) in self.column_widths.iter().enumerate() {
            let cell = row.get(i).map(String::as_str).unwrap_or("");
            let pad = width - measure_text_width(cell);
            s.push(' ');
            s.push_str(cell);
            s.push_str(&" ".repeat(pad));
            s.push_str(" │");
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_table_renders_headers() {
        let table = Table::new(&["Tool", "Status"]);
        assert!(table.is_empty());
        let output = table.render();
        assert!(output.contains("Tool"));
        assert_eq!(output.lines().count(), 4);
    }

    #[test]
    fn rows_are_aligned() {
        let mut table = Table::new(&["Tool", "Status"]);
        table.add_row(row(&["node", "Installed"]));
        table.add_row(row(&["claude", "Already satisfied"]));

        let output = table.render();
        let widths: Vec<usize> = output.lines().map(measure_text_width).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn styled_cells_do_not_skew_widths() {
        let mut table = Table::new(&["A"]);
        table.add_row(vec!["\u{1b}[32mok\u{1b}[0m".to_string()]);
        table.add_row(row(&["ok"]));

        let output = table.render();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(measure_text_width(lines[3]), measure_text_width(lines[4]));
    }

    #[test]
    fn missing_cells_are_blank() {
        let mut table = Table::new(&["A", "B", "C"]);
        table.add_row(row(&["only"]));
        let output = table.render();
        assert!(output.contains("only"));
        assert!(output.contains("┬"));
    }
}
