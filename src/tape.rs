//! Bounded byte memory with a single cursor

use crate::error::MemoryError;

#[derive(Debug, Clone)]
pub struct Tape {
    cells: Vec<u8>,
    cursor: usize,
}

impl Tape {
    pub fn new(size: usize) -> Self {
        Tape {
            cells: vec![0; size],
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Value of the cell under the cursor
    pub fn get(&self) -> u8 {
        self.cells[self.cursor]
    }

    pub fn set(&mut self, value: u8) {
        self.cells[self.cursor] = value;
    }

    pub fn add(&mut self, value: u8) {
        let cell = &mut self.cells[self.cursor];
        *cell = cell.wrapping_add(value);
    }

    pub fn sub(&mut self, value: u8) {
        let cell = &mut self.cells[self.cursor];
        *cell = cell.wrapping_sub(value);
    }

    /// Move the cursor by `by` cells. The cursor is left untouched on error.
    pub fn shift(&mut self, by: isize) -> Result<(), MemoryError> {
        self.cursor = self.resolve(by)?;
        Ok(())
    }

    /// Cell at `offset` relative to the cursor
    pub fn cell_at(&mut self, offset: isize) -> Result<&mut u8, MemoryError> {
        let index = self.resolve(offset)?;
        Ok(&mut self.cells[index])
    }

    /// Move left until a zero cell or the first cell is reached
    pub fn scan_left(&mut self) {
        while self.cursor > 0 && self.cells[self.cursor] != 0 {
            self.cursor -= 1;
        }
    }

    /// Move right until a zero cell or the last cell is reached
    pub fn scan_right(&mut self) {
        let last = self.cells.len().saturating_sub(1);
        while self.cursor < last && self.cells[self.cursor] != 0 {
            self.cursor += 1;
        }
    }

    fn resolve(&self, offset: isize) -> Result<usize, MemoryError> {
        self.cursor
            .checked_add_signed(offset)
            .filter(|&index| index < self.cells.len())
            .ok_or(MemoryError {
                cursor: self.cursor as isize + offset,
                tape_size: self.cells.len(),
            })
    }
}
