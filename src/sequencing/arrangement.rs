#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::MAX_SONG_SLOTS;

/// The song: a fixed row of slots, each empty or naming a library pattern.
///
/// Playback walks the filled slots left to right, one pattern loop per
/// slot, and wraps back to the first filled slot after the last.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "Vec<Option<usize>>", into = "Vec<Option<usize>>")
)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongArrangement {
    slots: [Option<usize>; MAX_SONG_SLOTS],
}

impl Default for SongArrangement {
    fn default() -> Self {
        Self {
            slots: [None; MAX_SONG_SLOTS],
        }
    }
}

impl SongArrangement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a list that may be shorter or longer than the slot row.
    pub fn from_slots(slots: &[Option<usize>]) -> Self {
        let mut arrangement = Self::default();
        arrangement.import_slots(slots);
        arrangement
    }

    /// Returns false when `slot` is outside the row.
    pub fn set_slot(&mut self, slot: usize, pattern: Option<usize>) -> bool {
        match self.slots.get_mut(slot) {
            Some(cell) => {
                *cell = pattern;
                true
            }
            None => false,
        }
    }

    pub fn clear_slot(&mut self, slot: usize) -> bool {
        self.set_slot(slot, None)
    }

    pub fn slot(&self, slot: usize) -> Option<usize> {
        self.slots.get(slot).copied().flatten()
    }

    pub fn slots(&self) -> &[Option<usize>; MAX_SONG_SLOTS] {
        &self.slots
    }

    /// Replace every slot, padding with empties or dropping the overflow.
    pub fn import_slots(&mut self, slots: &[Option<usize>]) {
        self.slots = [None; MAX_SONG_SLOTS];
        for (cell, value) in self.slots.iter_mut().zip(slots) {
            *cell = *value;
        }
    }

    pub fn clear(&mut self) {
        self.slots = [None; MAX_SONG_SLOTS];
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Index of the first filled slot, or 0 when nothing is arranged.
    pub fn first_filled_slot(&self) -> usize {
        self.slots.iter().position(Option::is_some).unwrap_or(0)
    }

    /// The slot that plays after `current`: the next filled slot to the
    /// right, else the first filled slot, else 0.
    pub fn next_filled_slot(&self, current: usize) -> usize {
        self.slots
            .iter()
            .enumerate()
            .skip(current + 1)
            .find(|(_, slot)| slot.is_some())
            .map_or_else(|| self.first_filled_slot(), |(index, _)| index)
    }

    /// Filled slots in playback order, as `(slot, pattern)`.
    pub fn filled(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, pattern)| pattern.map(|p| (slot, p)))
    }

    pub fn filled_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Fix up pattern references after library entry `removed` is deleted:
    /// slots naming it are emptied, later indices shift down by one.
    pub fn remap_after_delete(&mut self, removed: usize) {
        for slot in self.slots.iter_mut() {
            *slot = match *slot {
                Some(index) if index == removed => None,
                Some(index) if index > removed => Some(index - 1),
                other => other,
            };
        }
    }
}

impl From<Vec<Option<usize>>> for SongArrangement {
    fn from(slots: Vec<Option<usize>>) -> Self {
        Self::from_slots(&slots)
    }
}

impl From<SongArrangement> for Vec<Option<usize>> {
    fn from(arrangement: SongArrangement) -> Self {
        arrangement.slots.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sparse() -> SongArrangement {
        SongArrangement::from_slots(&[None, Some(2), None, Some(5)])
    }

    #[test]
    fn walks_filled_slots_and_wraps() {
        let song = sparse();
        assert_eq!(song.first_filled_slot(), 1);
        assert_eq!(song.next_filled_slot(1), 3);
        assert_eq!(song.next_filled_slot(3), 1);
        assert_eq!(song.next_filled_slot(MAX_SONG_SLOTS - 1), 1);
    }

    #[test]
    fn empty_song_stays_on_slot_zero() {
        let song = SongArrangement::new();
        assert_eq!(song.first_filled_slot(), 0);
        assert_eq!(song.next_filled_slot(0), 0);
        assert_eq!(song.next_filled_slot(7), 0);
    }

    #[test]
    fn import_pads_and_truncates() {
        let song = SongArrangement::from_slots(&[Some(1); 40]);
        assert_eq!(song.filled_count(), MAX_SONG_SLOTS);

        let song = SongArrangement::from_slots(&[Some(4)]);
        assert_eq!(song.slot(0), Some(4));
        assert_eq!(song.filled_count(), 1);
    }

    #[test]
    fn delete_remaps_references() {
        let mut song = SongArrangement::from_slots(&[Some(0), Some(1), Some(2), Some(1), None]);
        song.remap_after_delete(1);
        assert_eq!(&song.slots()[..5], &[Some(0), None, Some(1), None, None]);
    }

    #[test]
    fn set_slot_rejects_out_of_range() {
        let mut song = SongArrangement::new();
        assert!(song.set_slot(31, Some(0)));
        assert!(!song.set_slot(32, Some(0)));
        assert!(song.clear_slot(31));
        assert!(song.is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serialises_as_a_plain_list() {
        let song: SongArrangement = serde_json::from_str("[0, null, 2]").unwrap();
        assert_eq!(song.filled().collect::<Vec<_>>(), vec![(0, 0), (2, 2)]);
        let back: Vec<Option<usize>> = serde_json::from_str(&serde_json::to_string(&song).unwrap()).unwrap();
        assert_eq!(back.len(), MAX_SONG_SLOTS);
    }
}
