use std::borrow::Cow;

use serde::Serialize;

use crate::Table;

impl<V: Serialize> Table<V> {
    /// Render the table as comma-separated text.
    ///
    /// The header line is `<title>,<col1>,...` in column order, followed by
    /// one line per row of `<row-key>,<cell1>,...` in row order, each line
    /// terminated by `\n`. Cells are the JSON renderings of [`Table::get`],
    /// so registered-but-empty coordinates print the default, and a missing
    /// value (possible only without a configured default) prints `null`.
    ///
    /// Every field has literal commas stripped first. The escape is lossy by
    /// contract: a field that loses characters here will not survive a
    /// [`Table::parse`] round-trip. Use [`Table::to_csv_quoted`] when keys
    /// or values can contain commas.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        out.push_str(&strip_commas(self.title()));
        for col in self.cols() {
            out.push(',');
            out.push_str(&strip_commas(col));
        }
        out.push('\n');

        for row in self.rows() {
            out.push_str(&strip_commas(row));
            for col in self.cols() {
                out.push(',');
                out.push_str(&strip_commas(&self.render_cell(row, col)));
            }
            out.push('\n');
        }
        out
    }

    /// RFC 4180 rendering of the table: same layout as [`Table::to_csv`],
    /// with fields quoted as needed instead of comma-stripped.
    pub fn to_csv_quoted(&self) -> String {
        match self.write_quoted() {
            Ok(out) => out,
            Err(err) => {
                log::warn!("quoted CSV rendering failed: {err}");
                String::new()
            }
        }
    }

    fn write_quoted(&self) -> Result<String, csv::Error> {
        let mut buf = Vec::new();
        {
            let mut writer = csv::Writer::from_writer(&mut buf);

            let mut record = Vec::with_capacity(self.col_count() + 1);
            record.push(self.title().to_string());
            record.extend(self.cols().map(str::to_string));
            writer.write_record(&record)?;

            for row in self.rows() {
                record.clear();
                record.push(row.to_string());
                for col in self.cols() {
                    record.push(self.render_cell(row, col));
                }
                writer.write_record(&record)?;
            }
            writer.flush()?;
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    fn render_cell(&self, row: &str, col: &str) -> String {
        match self.get(row, col) {
            Some(value) => serde_json::to_string(value).unwrap_or_else(|err| {
                log::warn!("cell ({row:?}, {col:?}) is not JSON-serializable: {err}");
                "null".to_string()
            }),
            None => "null".to_string(),
        }
    }
}

fn strip_commas(field: &str) -> Cow<'_, str> {
    if !field.contains(',') {
        return Cow::Borrowed(field);
    }
    log::warn!("stripping commas from CSV field {field:?}; the field will not round-trip");
    Cow::Owned(field.replace(',', ""))
}
