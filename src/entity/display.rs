//! # Tabular display for entities
//!
//! [`EntityDisplay`] borrows an [`Entity`] and renders its first member rows as a
//! [`comfy-table`](https://docs.rs/comfy-table) table when used with `{}`.
//!
//! Layout
//! -----------------
//! * first column: the class-index key owning each row;
//! * one column per scalar field, masked entries rendered as `--`;
//! * temporal fields in their own format, the scale in the header;
//! * matrix fields as bracketed rows;
//! * nested entities flattened with dotted names (`coordinates.x`);
//! * opaque fields listed under the table.
//!
//! ```rust,ignore
//! println!("{}", orbits.show().with_head_rows(5));
//! ```
use std::fmt;

use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Row, Table};
use itertools::Itertools;

use crate::{
    constants::DISPLAY_HEAD_ROWS,
    entity::Entity,
    field::{ArrayColumn, Field},
    time::TimeFormat,
};

/// Display adaptor for an [`Entity`].
pub struct EntityDisplay<'a> {
    entity: &'a Entity,
    head_rows: usize,
}

impl EntityDisplay<'_> {
    /// Number of member rows to render.
    pub fn with_head_rows(mut self, rows: usize) -> Self {
        self.head_rows = rows;
        self
    }
}

fn array_cell(column: &ArrayColumn, row: usize) -> String {
    match column {
        ArrayColumn::Float(v) => format!("{:.6}", v[row]),
        ArrayColumn::Matrix(m) => format!(
            "[{}]",
            m.row(row).iter().map(|x| format!("{x:.3e}")).join(", ")
        ),
        other => other.value(row).map(|v| v.to_string()).unwrap_or_default(),
    }
}

/// Append one `(header, cells)` pair per renderable column of `entity`.
fn collect_columns(
    prefix: &str,
    entity: &Entity,
    rows: usize,
    columns: &mut Vec<(String, Vec<String>)>,
    opaque: &mut Vec<String>,
) {
    for (name, field) in entity.fields() {
        let header = format!("{prefix}{name}");
        match field {
            Field::Array(column) => {
                let cells = (0..rows).map(|row| array_cell(column, row)).collect();
                columns.push((header, cells));
            }
            Field::Masked(column) => {
                let cells = (0..rows)
                    .map(|row| {
                        if column.is_masked(row) {
                            "--".to_string()
                        } else {
                            array_cell(column.values(), row)
                        }
                    })
                    .collect();
                columns.push((header, cells));
            }
            Field::Temporal(column) => {
                let unit = match column.format() {
                    TimeFormat::Mjd => "MJD",
                    TimeFormat::Jd => "JD",
                };
                let values = column.values();
                let cells = values[..rows].iter().map(|t| format!("{t:.6}")).collect();
                columns.push((format!("{header} ({unit} {:?})", column.scale()), cells));
            }
            Field::Nested(nested) => {
                collect_columns(&format!("{header}."), nested, rows, columns, opaque);
            }
            Field::Opaque(value) => opaque.push(format!("{header}: {value}")),
        }
    }
}

impl fmt::Display for EntityDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.head_rows.min(self.entity.member_length());

        let mut columns = Vec::new();
        let mut opaque = Vec::new();
        collect_columns("", self.entity, rows, &mut columns, &mut opaque);

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        let mut header = vec![Cell::new("index")];
        header.extend(columns.iter().map(|(name, _)| Cell::new(name)));
        table.set_header(header);

        let codes = self.entity.index.row_codes();
        let keys = self.entity.index();
        for row in 0..rows {
            let mut cells = vec![Cell::new(keys[codes[row]].to_string())];
            cells.extend(
                columns
                    .iter()
                    .map(|(_, values)| Cell::new(&values[row]).set_alignment(CellAlignment::Right)),
            );
            table.add_row(Row::from(cells));
        }

        writeln!(f, "{table}")?;
        if rows < self.entity.member_length() {
            writeln!(
                f,
                "... {} more rows ({} elements in total)",
                self.entity.member_length() - rows,
                self.entity.len()
            )?;
        }
        for line in opaque {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

impl Entity {
    /// Table of the first member rows, see [`EntityDisplay`].
    pub fn show(&self) -> EntityDisplay<'_> {
        EntityDisplay {
            entity: self,
            head_rows: DISPLAY_HEAD_ROWS,
        }
    }

    /// Rendered table as an owned string.
    pub fn show_string(&self) -> String {
        self.show().to_string()
    }
}
