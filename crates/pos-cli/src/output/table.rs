use std::fmt::Write as _;

use serde::Serialize;

/// A presentation record that can be laid out as a table row.
pub(crate) trait Row: Serialize {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

/// Renders rows as left-aligned columns separated by two spaces.
pub(crate) fn render_table<R: Row>(rows: &[R]) -> String {
    let cells: Vec<Vec<String>> = rows.iter().map(Row::cells).collect();
    let mut widths: Vec<usize> = R::HEADERS.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut output = String::new();
    push_line(&mut output, R::HEADERS.iter().copied(), &widths);
    for row in &cells {
        push_line(&mut output, row.iter().map(String::as_str), &widths);
    }
    output
}

/// Renders one row as `header: value` lines.
pub(crate) fn render_record<R: Row>(row: &R) -> String {
    let width = R::HEADERS
        .iter()
        .map(|h| h.chars().count())
        .max()
        .unwrap_or(0);

    let mut output = String::new();
    for (header, cell) in R::HEADERS.iter().zip(row.cells()) {
        let _ = writeln!(output, "{:<width$}  {cell}", format!("{header}:"), width = width + 1);
    }
    output
}

fn push_line<'a>(output: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let mut line = String::new();
    for (cell, width) in cells.zip(widths) {
        let _ = write!(line, "{cell:<width$}  ");
    }
    output.push_str(line.trim_end());
    output.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Pair {
        name: String,
        qty: u32,
    }

    impl Row for Pair {
        const HEADERS: &'static [&'static str] = &["NAME", "QTY"];

        fn cells(&self) -> Vec<String> {
            vec![self.name.clone(), self.qty.to_string()]
        }
    }

    fn pair(name: &str, qty: u32) -> Pair {
        Pair {
            name: name.to_string(),
            qty,
        }
    }

    #[test]
    fn columns_align_to_widest_cell() {
        let table = render_table(&[pair("mug", 3), pair("teapot", 12)]);

        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "NAME    QTY");
        assert_eq!(lines[1], "mug     3");
        assert_eq!(lines[2], "teapot  12");
    }

    #[test]
    fn record_lists_each_field() {
        let record = render_record(&pair("mug", 3));

        assert_eq!(record, "NAME:  mug\nQTY:   3\n");
    }
}
