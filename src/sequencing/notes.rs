/*
Pitch Rows
==========

Every voice grid has the same eight rows, highest first. A row picks a base
pitch; the voice's octave shift then moves it by whole octaves:

    frequency = row_hz * 2 ^ octave        octave in -2..=2

| row | note | Hz     |
| --- | ---- | ------ |
| 0   | C5   | 523.25 |
| 1   | A4   | 440.00 |
| 2   | G4   | 392.00 |
| 3   | E4   | 329.63 |
| 4   | D4   | 293.66 |
| 5   | C4   | 261.63 |
| 6   | A3   | 220.00 |
| 7   | G3   | 196.00 |

A voice at octave -2 turns row 7 into a 49 Hz bass note.
*/

use crate::NUM_ROWS;

pub const MIN_OCTAVE: i8 = -2;
pub const MAX_OCTAVE: i8 = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowNote {
    pub name: &'static str,
    pub hz: f32,
}

pub const ROWS: [RowNote; NUM_ROWS] = [
    RowNote { name: "C5", hz: 523.25 },
    RowNote { name: "A4", hz: 440.0 },
    RowNote { name: "G4", hz: 392.0 },
    RowNote { name: "E4", hz: 329.63 },
    RowNote { name: "D4", hz: 293.66 },
    RowNote { name: "C4", hz: 261.63 },
    RowNote { name: "A3", hz: 220.0 },
    RowNote { name: "G3", hz: 196.0 },
];

pub fn row_frequency(row: usize) -> Option<f32> {
    ROWS.get(row).map(|note| note.hz)
}

#[inline]
pub fn shifted_frequency(hz: f32, octave: i8) -> f32 {
    hz * 2f32.powi(i32::from(octave))
}

pub fn clamp_octave(octave: i8) -> i8 {
    octave.clamp(MIN_OCTAVE, MAX_OCTAVE)
}
