use crate::error::{Error, Result};
use crate::{GraphId, Weight, V};
use std::convert::TryFrom;
use std::io::{BufRead, Write};

/// A command read from the stream.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Command {
    /// A new graph record follows: one matrix row per vertex.
    AddGraph,
    /// Report the current ranking.
    Query,
    EndOfInput,
}

/// Parameters fixed for the whole stream.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Params {
    /// Vertex count of every graph (`d`).
    pub num_verts: usize,
    /// Ranking capacity (`k`).
    pub capacity: usize,
}

impl Params {
    /// Checks that both values are at least 1, that every vertex fits in `V`, and that a
    /// `d x d` weight matrix can be addressed.
    pub fn new(num_verts: usize, capacity: usize) -> Result<Self> {
        let invalid = Error::InvalidParameters {
            num_verts,
            capacity,
        };
        if num_verts < 1 || capacity < 1 || V::try_from(num_verts).is_err() {
            return Err(invalid);
        }
        let matrix_bytes = num_verts
            .checked_mul(num_verts)
            .and_then(|n| n.checked_mul(core::mem::size_of::<Weight>()));
        match matrix_bytes {
            Some(bytes) if bytes <= isize::MAX as usize => {}
            _ => return Err(invalid),
        }
        Ok(Self {
            num_verts,
            capacity,
        })
    }
}

/// Supplies commands and matrix rows to the ingestion loop.
pub trait RecordSource {
    fn next_command(&mut self) -> Result<Command>;

    /// Reads the next row of the current record into `row`, which has one slot per vertex.
    fn next_matrix_row(&mut self, row: &mut [Weight]) -> Result<()>;

    /// Discards `count` rows of the current record without parsing them.
    fn skip_remaining_rows(&mut self, count: usize) -> Result<()>;
}

/// Reads a line-oriented command stream.
///
/// The stream starts with the vertex count and ranking capacity. After that, every
/// non-blank line outside a record is a command: a word starting with `A` adds a graph
/// (`AggiungiGrafo`), a word starting with `T` queries the ranking (`TopK`). A graph
/// command is followed by one line per vertex, each holding that many comma-separated
/// weights.
///
/// A record that ends early (a command line shows up where a row was expected) is
/// reported as `UnexpectedEndOfRecord`, and the command line is left for the next
/// `next_command` call.
pub struct LineReader<R> {
    input: R,
    line: String,
    line_number: usize,
    // `line` holds a line that was read but handed back with `unread_line`.
    pending: bool,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            line: String::new(),
            line_number: 0,
            pending: false,
        }
    }

    /// Line number of the most recently read line (1-based).
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    // Returns false at end of input.
    fn read_line(&mut self) -> Result<bool> {
        if self.pending {
            self.pending = false;
            return Ok(true);
        }
        self.line.clear();
        let n = self.input.read_line(&mut self.line)?;
        if n == 0 {
            return Ok(false);
        }
        self.line_number += 1;
        Ok(true)
    }

    fn unread_line(&mut self) {
        self.pending = true;
    }

    // Reads a line that belongs to the current record. A command line ends the record and
    // stays unread.
    fn read_record_line(&mut self) -> Result<()> {
        if !self.read_line()? {
            return Err(Error::UnexpectedEndOfRecord {
                line: self.line_number,
            });
        }
        if is_command_line(&self.line) {
            self.unread_line();
            return Err(Error::UnexpectedEndOfRecord {
                line: self.line_number,
            });
        }
        Ok(())
    }

    /// Reads the stream header: the vertex count then the ranking capacity, separated by
    /// whitespace or commas, possibly on separate lines.
    pub fn read_params(&mut self) -> Result<Params> {
        let mut values: Vec<usize> = Vec::with_capacity(2);
        while values.len() < 2 {
            if !self.read_line()? {
                return Err(Error::MissingParameters);
            }
            for token in fields(&self.line) {
                if values.len() == 2 {
                    break;
                }
                let value = token.parse::<usize>().map_err(|_| Error::MalformedRow {
                    line: self.line_number,
                    message: format!("expected a parameter, found {:?}", token),
                })?;
                values.push(value);
            }
        }
        Params::new(values[0], values[1])
    }
}

fn is_command_line(line: &str) -> bool {
    line.trim_start()
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic())
}

fn fields(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
}

impl<R: BufRead> RecordSource for LineReader<R> {
    fn next_command(&mut self) -> Result<Command> {
        loop {
            if !self.read_line()? {
                return Ok(Command::EndOfInput);
            }
            let token = match self.line.split_whitespace().next() {
                Some(token) => token,
                None => continue,
            };
            return match token.chars().next() {
                Some('A') => Ok(Command::AddGraph),
                Some('T') => Ok(Command::Query),
                _ => Err(Error::UnknownCommand {
                    line: self.line_number,
                    token: token.to_string(),
                }),
            };
        }
    }

    fn next_matrix_row(&mut self, row: &mut [Weight]) -> Result<()> {
        self.read_record_line()?;
        let line_number = self.line_number;
        let mut count = 0;
        for token in fields(&self.line) {
            if count == row.len() {
                return Err(Error::MalformedRow {
                    line: line_number,
                    message: format!("expected {} weights, found more", row.len()),
                });
            }
            row[count] = token.parse::<Weight>().map_err(|_| Error::MalformedRow {
                line: line_number,
                message: if token.starts_with('-') {
                    format!("negative weight {:?}", token)
                } else {
                    format!("invalid weight {:?}", token)
                },
            })?;
            count += 1;
        }
        if count != row.len() {
            return Err(Error::MalformedRow {
                line: line_number,
                message: format!("expected {} weights, found {}", row.len(), count),
            });
        }
        Ok(())
    }

    fn skip_remaining_rows(&mut self, count: usize) -> Result<()> {
        for _ in 0..count {
            self.read_record_line()?;
        }
        Ok(())
    }
}

/// Writes one ranking report: ids separated by spaces, then a newline.
pub fn write_ranking<W: Write + ?Sized>(output: &mut W, ids: &[GraphId]) -> std::io::Result<()> {
    let mut first = true;
    for id in ids.iter() {
        if !first {
            write!(output, " ")?;
        }
        write!(output, "{}", id)?;
        first = false;
    }
    writeln!(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(text: &str) -> LineReader<Cursor<&str>> {
        LineReader::new(Cursor::new(text))
    }

    #[test]
    fn params() {
        fn case(description: &str, text: &str, expected: Option<Params>) {
            let result = reader(text).read_params();
            match expected {
                Some(p) => assert_eq!(result.ok(), Some(p), "{}", description),
                None => assert!(result.is_err(), "{}", description),
            }
        }
        let p = |d, k| Some(Params { num_verts: d, capacity: k });
        case("one line", "3 2\n", p(3, 2));
        case("comma", "3,2\n", p(3, 2));
        case("two lines", "3\n\n2\n", p(3, 2));
        case("missing", "3\n", None);
        case("zero vertices", "0 2\n", None);
        case("zero capacity", "3 0\n", None);
        case("garbage", "three 2\n", None);
        case("largest vertex id", "4294967296 1\n", None);
        case("matrix too large", "4294967295 1\n", None);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn params_limits() {
        assert!(Params::new(1, 1).is_ok());
        assert!(Params::new(usize::MAX, 1).is_err());
        match Params::new(1 << 32, 3) {
            Err(Error::InvalidParameters {
                num_verts,
                capacity,
            }) => {
                assert_eq!(num_verts, 1 << 32);
                assert_eq!(capacity, 3);
            }
            other => panic!("expected invalid parameters, got {:?}", other),
        }
    }

    #[test]
    fn commands() {
        let mut r = reader("AggiungiGrafo\n\n  TopK\nXyz\n");
        assert_eq!(r.next_command().ok(), Some(Command::AddGraph));
        assert_eq!(r.next_command().ok(), Some(Command::Query));
        match r.next_command() {
            Err(Error::UnknownCommand { line, token }) => {
                assert_eq!(line, 4);
                assert_eq!(token, "Xyz");
            }
            other => panic!("expected unknown command, got {:?}", other),
        }
        assert_eq!(r.next_command().ok(), Some(Command::EndOfInput));
    }

    #[test]
    fn rows() {
        fn case(description: &str, text: &str, expected: Option<&[Weight]>) {
            let mut row = [0; 3];
            let result = reader(text).next_matrix_row(&mut row);
            match expected {
                Some(weights) => {
                    assert!(result.is_ok(), "{}: {:?}", description, result);
                    assert_eq!(&row[..], weights, "{}", description);
                }
                None => assert!(
                    matches!(result, Err(ref e) if e.is_record_local()),
                    "{}: {:?}",
                    description,
                    result
                ),
            }
        }
        case("commas", "0,4,1\n", Some(&[0, 4, 1]));
        case("spaces around fields", " 0, 4 ,1 \n", Some(&[0, 4, 1]));
        case("trailing comma", "0,4,1,\n", Some(&[0, 4, 1]));
        case("no newline", "7,8,9", Some(&[7, 8, 9]));
        case("too few", "0,4\n", None);
        case("too many", "0,4,1,2\n", None);
        case("negative", "0,-4,1\n", None);
        case("non-numeric", "0,x,1\n", None);
        case("end of input", "", None);
    }

    #[test]
    fn command_ends_short_record() {
        let mut r = reader("0,1,0\nTopK\nAggiungiGrafo\n");
        let mut row = [0; 3];
        r.next_matrix_row(&mut row).unwrap();
        match r.next_matrix_row(&mut row) {
            Err(Error::UnexpectedEndOfRecord { line }) => assert_eq!(line, 2),
            other => panic!("expected end of record, got {:?}", other),
        }
        assert_eq!(r.next_command().ok(), Some(Command::Query));
        assert_eq!(r.line_number(), 2);
        assert_eq!(r.next_command().ok(), Some(Command::AddGraph));
        assert_eq!(r.line_number(), 3);
    }

    #[test]
    fn skip_stops_at_command() {
        let mut r = reader("1,2\nAggiungiGrafo\n3,4\n");
        let result = r.skip_remaining_rows(3);
        assert!(matches!(result, Err(ref e) if e.is_record_local()), "{:?}", result);
        assert_eq!(r.next_command().ok(), Some(Command::AddGraph));
        let mut row = [0; 2];
        r.next_matrix_row(&mut row).unwrap();
        assert_eq!(row, [3, 4]);
        assert_eq!(r.line_number(), 3);
    }

    #[test]
    fn skip_rows() {
        let mut r = reader("1,2\n3,4\nTopK\n");
        r.skip_remaining_rows(2).unwrap();
        assert_eq!(r.next_command().ok(), Some(Command::Query));
        assert!(r.skip_remaining_rows(1).is_err());
    }

    #[test]
    fn ranking_format() {
        fn case(ids: &[GraphId], expected: &str) {
            let mut out: Vec<u8> = Vec::new();
            write_ranking(&mut out, ids).unwrap();
            assert_eq!(String::from_utf8(out).unwrap(), expected);
        }
        case(&[], "\n");
        case(&[1], "1\n");
        case(&[3, 0, 2], "3 0 2\n");
    }
}
