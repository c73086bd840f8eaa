//! Fixed-width grid table layout, shared by every encoder.
//!
//! ```text
//! +------+-------+
//! | name | count |
//! +======+=======+
//! | pan  | 1     |
//! +------+-------+
//! | wye  | 123   |
//! +------+-------+
//! ```
//!
//! Each row is a `+`/`|` frame around cells padded to their column's width,
//! so all rows come out equally wide.
//!
//! Table cells hold raw text. Encoders pass a [`CellStyle`] that escapes each
//! cell for their dialect and says how wide the escaped cell is: the source
//! width for markup that is parsed as text, the printed width for troff.

use crate::error::Result;
use crate::model::TableModel;

/// A cell as it is written out, with the columns it occupies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub width: usize,
}

impl Cell {
    /// A cell whose written and measured forms are the same.
    pub fn plain(text: &str) -> Self {
        Cell {
            text: text.to_string(),
            width: text.chars().count(),
        }
    }
}

/// How raw cell text becomes a [`Cell`].
pub trait CellStyle {
    fn cell(&self, raw: &str) -> Cell;
}

impl<F> CellStyle for F
where
    F: Fn(&str) -> Cell,
{
    fn cell(&self, raw: &str) -> Cell {
        self(raw)
    }
}

/// Per-column width: the widest cell in that column, header included.
pub fn column_widths(table: &TableModel, style: &dyn CellStyle) -> Result<Vec<usize>> {
    Ok(widths_of(&styled(table, style)?))
}

/// Render the table as grid lines, without trailing newlines.
pub fn render_lines(table: &TableModel, style: &dyn CellStyle) -> Result<Vec<String>> {
    let rows = styled(table, style)?;
    let widths = widths_of(&rows);
    let border = rule(&widths, '-');

    let mut lines = Vec::with_capacity(1 + 2 * rows.len());
    lines.push(border.clone());
    for (i, cells) in rows.iter().enumerate() {
        lines.push(row(cells, &widths));
        lines.push(if i == 0 { rule(&widths, '=') } else { border.clone() });
    }
    Ok(lines)
}

/// Render the table as one newline-terminated block.
pub fn render(table: &TableModel, style: &dyn CellStyle) -> Result<String> {
    let mut out = String::new();
    for line in render_lines(table, style)? {
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}

/// Header first, then body rows, every cell styled.
fn styled(table: &TableModel, style: &dyn CellStyle) -> Result<Vec<Vec<Cell>>> {
    table.check_arity()?;
    Ok(std::iter::once(&table.header)
        .chain(&table.rows)
        .map(|cells| cells.iter().map(|c| style.cell(c)).collect())
        .collect())
}

fn widths_of(rows: &[Vec<Cell>]) -> Vec<usize> {
    let mut widths = vec![0; rows.first().map_or(0, Vec::len)];
    for cells in rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.width);
        }
    }
    widths
}

fn rule(widths: &[usize], fill: char) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.extend(std::iter::repeat(fill).take(width + 2));
        line.push('+');
    }
    line
}

fn row(cells: &[Cell], widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (cell, width) in cells.iter().zip(widths) {
        line.push(' ');
        line.push_str(&cell.text);
        line.extend(std::iter::repeat(' ').take(width.saturating_sub(cell.width)));
        line.push_str(" |");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn sample() -> TableModel {
        let mut table = TableModel::new(["name", "count"]);
        table.push_row(["pan", "1"]);
        table.push_row(["wye", "123"]);
        table
    }

    #[test]
    fn widths_take_the_longest_cell() {
        assert_eq!(column_widths(&sample(), &Cell::plain).unwrap(), vec![4, 5]);
    }

    #[test]
    fn renders_grid() {
        assert_eq!(
            render(&sample(), &Cell::plain).unwrap(),
            "+------+-------+\n\
             | name | count |\n\
             +======+=======+\n\
             | pan  | 1     |\n\
             +------+-------+\n\
             | wye  | 123   |\n\
             +------+-------+\n"
        );
    }

    #[test]
    fn all_rows_share_one_width() {
        let mut table = TableModel::new(["Name", "Class", "Args"]);
        table.push_row(["strlen", "string", "1"]);
        table.push_row(["**", "arithmetic", "2"]);
        table.push_row(["splitax", "conversion", "variadic"]);
        table.push_row(["é", "", ""]);
        let lines = render_lines(&table, &Cell::plain).unwrap();
        let width = lines[0].chars().count();
        assert!(lines.iter().all(|l| l.chars().count() == width));
        assert_eq!(lines.len(), 3 + 2 * 4);
    }

    #[test]
    fn header_only_table() {
        let table = TableModel::new(["a"]);
        assert_eq!(render(&table, &Cell::plain).unwrap(), "+---+\n| a |\n+===+\n");
    }

    #[test]
    fn padding_follows_the_measured_width() {
        // Escapes that print as one character pad like one character.
        let printed = |raw: &str| Cell {
            text: raw.replace('-', "\\-"),
            width: raw.chars().count(),
        };
        let mut table = TableModel::new(["Name", "Args"]);
        table.push_row(["-", "1,2"]);
        let lines = render_lines(&table, &printed).unwrap();
        assert_eq!(lines[0], "+------+------+");
        assert_eq!(lines[3], "| \\-    | 1,2  |");
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let mut table = sample();
        table.push_row(["x", "y", "z"]);
        assert!(matches!(render(&table, &Cell::plain), Err(Error::Structural(_))));
    }
}
