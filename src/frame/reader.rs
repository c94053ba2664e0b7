use memchr::memchr_iter;
use memmap2::Mmap;
use std::{fs::File, io::BufRead, path::Path, str};
use tracing::{debug, warn};

use crate::{
    frame::{Result, TableError, column::Column, table::Table},
    helpers::{inference::infer_value, tokenizer::tokenize_line},
};

const BOM: char = '\u{feff}';

/// What to do with a data line whose field count differs from the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowLengthPolicy {
    /// Pad short rows with empty text and drop surplus fields
    #[default]
    Pad,
    /// Fail with [`TableError::RowLengthMismatch`]
    Strict,
}

/// Options for turning delimited text into a [`Table`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    pub separator: char,
    pub row_length: RowLengthPolicy,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            separator: ',',
            row_length: RowLengthPolicy::default(),
        }
    }
}

impl ParseOptions {
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    pub fn with_row_length(mut self, policy: RowLengthPolicy) -> Self {
        self.row_length = policy;
        self
    }
}

/// Accumulates tokenized lines into columns
struct TableBuilder<'o> {
    options: &'o ParseOptions,
    columns: Vec<Column>,
    has_header: bool,
    rows: usize,
}

impl<'o> TableBuilder<'o> {
    fn new(options: &'o ParseOptions) -> Self {
        TableBuilder {
            options,
            columns: Vec::new(),
            has_header: false,
            rows: 0,
        }
    }

    /// `line_no` is 1-based and only used for diagnostics
    fn push_line(&mut self, line: &str, line_no: usize) -> Result<()> {
        let line = if line_no == 1 {
            line.strip_prefix(BOM).unwrap_or(line)
        } else {
            line
        };

        let Some(fields) = tokenize_line(line, self.options.separator) else {
            return Ok(());
        };

        if !self.has_header {
            for name in fields {
                if self.columns.iter().any(|c| c.name() == name) {
                    return Err(TableError::DuplicateColumn(name.into_owned()));
                }
                self.columns.push(Column::new(name, Vec::new()));
            }
            self.has_header = true;
            debug!(columns = self.columns.len(), "parsed header");
            return Ok(());
        }

        let expected = self.columns.len();
        if fields.len() != expected {
            if self.options.row_length == RowLengthPolicy::Strict {
                return Err(TableError::RowLengthMismatch {
                    line: line_no,
                    expected,
                    found: fields.len(),
                });
            }
            warn!(
                line = line_no,
                expected,
                found = fields.len(),
                "row length differs from header, padding/truncating"
            );
        }

        let mut fields = fields.into_iter();
        for col in &mut self.columns {
            let value = match fields.next() {
                Some(raw) => infer_value(&raw),
                None => infer_value(""),
            };
            col.push(value);
        }
        self.rows += 1;
        Ok(())
    }

    fn finish(self) -> Table {
        debug!(
            rows = self.rows,
            columns = self.columns.len(),
            "finished parsing table"
        );
        Table::from_columns(self.columns)
    }
}

fn strip_line_end(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

impl Table {
    /// Builds a table from text lines; the first non-empty line is the header.
    ///
    /// Line terminators, if still attached, are stripped. Empty lines are
    /// skipped. No non-empty lines gives a table without columns.
    ///
    /// # Example
    /// ```rust
    /// # use columnar_frame::{ParseOptions, Table, Value};
    /// let table = Table::from_lines(["a,b", "1,x"], &ParseOptions::default()).unwrap();
    /// assert_eq!(table.column("a").unwrap(), &[Value::Int(1)]);
    /// ```
    pub fn from_lines<I, S>(lines: I, options: &ParseOptions) -> Result<Table>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = TableBuilder::new(options);
        for (i, line) in lines.into_iter().enumerate() {
            builder.push_line(strip_line_end(line.as_ref()), i + 1)?;
        }
        Ok(builder.finish())
    }

    /// Reads lines from any buffered reader.
    ///
    /// # Errors
    /// Read failures surface as [`TableError::InputUnavailable`], or
    /// [`TableError::InvalidUtf8`] for undecodable bytes.
    pub fn from_reader<R: BufRead>(reader: R, options: &ParseOptions) -> Result<Table> {
        let mut builder = TableBuilder::new(options);
        for (i, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| match e.kind() {
                std::io::ErrorKind::InvalidData => TableError::InvalidUtf8 { line: i + 1 },
                _ => TableError::InputUnavailable(e),
            })?;
            builder.push_line(strip_line_end(&line), i + 1)?;
        }
        Ok(builder.finish())
    }

    /// Loads a delimited text file using memory mapping.
    ///
    /// The file is closed and unmapped before this returns, on success or error.
    ///
    /// # Example
    /// ```no_run
    /// # use columnar_frame::{ParseOptions, Table};
    /// let table = Table::from_path("data.csv".as_ref(), &ParseOptions::default()).unwrap();
    /// println!("{table}");
    /// ```
    pub fn from_path(path: &Path, options: &ParseOptions) -> Result<Table> {
        let file = File::open(path)?;
        if file.metadata()?.len() == 0 {
            debug!(path = %path.display(), "empty input file");
            return Ok(Table::default());
        }

        // SAFETY: the map is read-only and dropped before returning
        let mmap = unsafe { Mmap::map(&file)? };
        debug!(path = %path.display(), bytes = mmap.len(), "mapped input file");
        Self::from_bytes(&mmap[..], options)
    }

    fn from_bytes(buf: &[u8], options: &ParseOptions) -> Result<Table> {
        let mut builder = TableBuilder::new(options);
        let mut start = 0;
        let mut line_no = 0;

        let ends = memchr_iter(b'\n', buf).chain(
            // Last line without a trailing newline
            (buf.last() != Some(&b'\n')).then_some(buf.len()),
        );
        for end in ends {
            line_no += 1;
            let line = str::from_utf8(&buf[start..end])
                .map_err(|_| TableError::InvalidUtf8 { line: line_no })?;
            start = end + 1;
            builder.push_line(strip_line_end(line), line_no)?;
        }

        Ok(builder.finish())
    }
}

/// Parses lines with `separator` and the default row-length policy
pub fn parse_table<I, S>(lines: I, separator: char) -> Result<Table>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Table::from_lines(lines, &ParseOptions::default().with_separator(separator))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Value;

    fn make_table_from_str(csv: &str) -> Table {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "{}", csv).unwrap();
        Table::from_path(tmp.path(), &ParseOptions::default()).unwrap()
    }

    #[test]
    fn test_header_and_rows() {
        let table = make_table_from_str("id,value\n1,10\n2,20\n3,30\n");
        assert_eq!(table.num_rows(), 3);
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["id", "value"]);
        assert_eq!(table.column("value").unwrap()[2], Value::Int(30));
    }

    #[test]
    fn test_crlf_bom_and_missing_final_newline() {
        let table = make_table_from_str("\u{feff}name,score\r\n\r\nann,1.5\r\nbob,2");
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["name", "score"]);
        assert_eq!(
            table.column("score").unwrap(),
            &[Value::Float(1.5), Value::Int(2)]
        );
    }

    #[test]
    fn test_leading_empty_lines_before_header() {
        let table = Table::from_lines(["", "", "a", "1"], &ParseOptions::default()).unwrap();
        assert_eq!(table.column("a").unwrap(), &[Value::Int(1)]);
    }

    #[test]
    fn test_empty_inputs() {
        let table = make_table_from_str("");
        assert_eq!(table.num_columns(), 0);
        assert_eq!(table.num_rows(), 0);

        let table = make_table_from_str("\n\n\n");
        assert_eq!(table.num_columns(), 0);
        assert_eq!(table.to_string(), "Table({})");
    }

    #[test]
    fn test_header_only() {
        let table = parse_table(["a;b"], ';').unwrap();
        assert_eq!(table.num_columns(), 2);
        assert_eq!(table.num_rows(), 0);
        assert!(table.is_aligned());
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = parse_table(["a,b,c", "1,2", "4,5,6,7"], ',').unwrap();
        assert!(table.is_aligned());
        assert_eq!(
            table.column("c").unwrap(),
            &[Value::Text(String::new()), Value::Int(6)]
        );
    }

    #[test]
    fn test_strict_policy_rejects_short_rows() {
        let options = ParseOptions::default().with_row_length(RowLengthPolicy::Strict);
        let err = Table::from_lines(["a,b,c", "1,2,3", "1,2"], &options).unwrap_err();
        assert!(matches!(
            err,
            TableError::RowLengthMismatch { line: 3, expected: 3, found: 2 }
        ));
    }

    #[test]
    fn test_duplicate_header() {
        assert!(matches!(
            parse_table(["a,b,a"], ','),
            Err(TableError::DuplicateColumn(name)) if name == "a"
        ));
    }

    #[test]
    fn test_header_is_not_type_inferred() {
        let table = parse_table(["1,\"2\"", "x,y"], ',').unwrap();
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["1", "2"]);
    }

    #[test]
    fn test_missing_file() {
        let err = Table::from_path(Path::new("/definitely/not/here.csv"), &ParseOptions::default())
            .unwrap_err();
        assert!(matches!(err, TableError::InputUnavailable(_)));
    }

    #[test]
    fn test_invalid_utf8() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(b"a\n\xff\xfe\n").unwrap();
        let err = Table::from_path(tmp.path(), &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, TableError::InvalidUtf8 { line: 2 }));
    }

    #[test]
    fn test_from_reader() {
        let input = "a\tb\n1\t\"x\ty\"\n";
        let options = ParseOptions::default().with_separator('\t');
        let table = Table::from_reader(input.as_bytes(), &options).unwrap();
        assert_eq!(table.column("b").unwrap(), &[Value::Text("x\ty".into())]);
    }

    #[test]
    fn test_reader_failure_is_input_unavailable() {
        use std::io::{BufReader, Error, ErrorKind, Read};

        struct Broken;

        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(Error::new(ErrorKind::Other, "disk went away"))
            }
        }

        let err = Table::from_reader(BufReader::new(Broken), &ParseOptions::default())
            .unwrap_err();
        assert!(matches!(err, TableError::InputUnavailable(_)));
    }
}
