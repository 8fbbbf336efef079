use crate::error::{Error, Result};
use crate::matrix::AdjacencyMatrix;
use crate::stream::{Command, RecordSource};
use crate::Weight;
use std::collections::VecDeque;

pub fn init_test() {
    drop(env_logger::try_init());
}

pub fn matrix_from_rows(rows: &[&[Weight]]) -> AdjacencyMatrix {
    AdjacencyMatrix::from_rows(rows)
}

enum Item {
    Command(Command),
    Row(Vec<Weight>),
    BadRow,
}

/// An in-memory `RecordSource` that replays a scripted stream.
pub struct ScriptedSource {
    items: VecDeque<Item>,
    line: usize,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
            line: 0,
        }
    }

    pub fn graph(&mut self, rows: &[&[Weight]]) {
        self.items.push_back(Item::Command(Command::AddGraph));
        for &row in rows.iter() {
            self.items.push_back(Item::Row(row.to_vec()));
        }
    }

    /// Adds a graph whose row `bad_row` cannot be parsed.
    pub fn malformed_graph(&mut self, rows: &[&[Weight]], bad_row: usize) {
        self.items.push_back(Item::Command(Command::AddGraph));
        for (i, &row) in rows.iter().enumerate() {
            if i == bad_row {
                self.items.push_back(Item::BadRow);
            } else {
                self.items.push_back(Item::Row(row.to_vec()));
            }
        }
    }

    pub fn query(&mut self) {
        self.items.push_back(Item::Command(Command::Query));
    }

    pub fn is_drained(&self) -> bool {
        self.items.is_empty()
    }

    fn next_item(&mut self) -> Option<Item> {
        self.line += 1;
        self.items.pop_front()
    }
}

impl RecordSource for ScriptedSource {
    fn next_command(&mut self) -> Result<Command> {
        match self.next_item() {
            None => Ok(Command::EndOfInput),
            Some(Item::Command(c)) => Ok(c),
            Some(_) => panic!("script: expected a command at item {}", self.line),
        }
    }

    fn next_matrix_row(&mut self, row: &mut [Weight]) -> Result<()> {
        match self.next_item() {
            Some(Item::Row(values)) => {
                row.copy_from_slice(&values);
                Ok(())
            }
            Some(Item::BadRow) => Err(Error::MalformedRow {
                line: self.line,
                message: "scripted bad row".to_string(),
            }),
            Some(Item::Command(_)) => panic!("script: expected a row at item {}", self.line),
            None => Err(Error::UnexpectedEndOfRecord { line: self.line }),
        }
    }

    fn skip_remaining_rows(&mut self, count: usize) -> Result<()> {
        for _ in 0..count {
            match self.next_item() {
                Some(Item::Row(_)) | Some(Item::BadRow) => {}
                Some(Item::Command(_)) => panic!("script: skipped past a command at item {}", self.line),
                None => return Err(Error::UnexpectedEndOfRecord { line: self.line }),
            }
        }
        Ok(())
    }
}
