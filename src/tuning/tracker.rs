use super::{
    resolver::{resolve, ReferenceAnchor},
    table::{TuningSystem, TuningTable},
};

/// Multiset of the MIDI notes currently held down.
///
/// One counter per MIDI note, so inserting and removing never allocates.
#[derive(Debug, Clone)]
pub struct HeldNotes {
    counts: [u8; 128],
    len: usize,
}

impl HeldNotes {
    pub fn new() -> Self {
        Self {
            counts: [0; 128],
            len: 0,
        }
    }

    pub fn insert(&mut self, note: u8) {
        let slot = &mut self.counts[(note & 0x7f) as usize];
        if *slot < u8::MAX {
            *slot += 1;
            self.len += 1;
        }
    }

    /// Remove one instance of `note`. Returns false if it was not held.
    pub fn remove(&mut self, note: u8) -> bool {
        let slot = &mut self.counts[(note & 0x7f) as usize];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        self.len -= 1;
        true
    }

    pub fn contains(&self, note: u8) -> bool {
        self.counts[(note & 0x7f) as usize] > 0
    }

    /// Lowest held note, i.e. the bass.
    pub fn lowest(&self) -> Option<u8> {
        self.counts.iter().position(|&c| c > 0).map(|n| n as u8)
    }

    /// Number of held notes, counting duplicates.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.counts = [0; 128];
        self.len = 0;
    }

    /// Held notes in ascending order (duplicates collapsed).
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, c)| **c > 0)
            .map(|(n, _)| n as u8)
    }
}

impl Default for HeldNotes {
    fn default() -> Self {
        Self::new()
    }
}

/// How the first note after a reset establishes the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorSeed {
    /// Anchor at the note's equal-temperament frequency in Hz.
    EqualTemperament,
    /// Anchor at the note's just ratio above `root_note` (root = 1.0).
    ///
    /// Resolved values are then playback ratios for a sample recorded at
    /// `root_note`.
    RootRatio { root_note: u8 },
}

/// All shared tuning state: active table, reference anchor and held notes.
///
/// Owned by the render thread. Every mutation happens while applying queued
/// messages at the start of a block, never while voices are rendering.
#[derive(Debug, Clone)]
pub struct TuningContext {
    system: TuningSystem,
    table: TuningTable,
    anchor: Option<ReferenceAnchor>,
    held: HeldNotes,
}

impl TuningContext {
    pub fn new(system: TuningSystem) -> Self {
        Self::with_table(system, TuningTable::for_system(system))
    }

    /// Use a custom table, reported as `system` for display purposes.
    pub fn with_table(system: TuningSystem, table: TuningTable) -> Self {
        Self {
            system,
            table,
            anchor: None,
            held: HeldNotes::new(),
        }
    }

    /// Register a pressed note and return its resolved frequency.
    ///
    /// The bass is taken from the notes held before this one. Re-anchoring
    /// only happens when at least two notes were already held and their
    /// lowest differs from the current anchor. The new anchor frequency is
    /// resolved from the old anchor, so drift accumulates over a session.
    pub fn note_on(&mut self, note: u8, seed: AnchorSeed) -> f64 {
        let note = note & 0x7f;

        let anchor = match self.anchor {
            None => self.seed_anchor(note, seed),
            Some(current) => {
                let mut anchor = current;
                if self.held.len() > 1 {
                    if let Some(bass) = self.held.lowest() {
                        if bass != anchor.note {
                            let frequency = resolve(bass, &anchor, &self.table);
                            anchor = ReferenceAnchor::new(bass, frequency);
                        }
                    }
                }
                anchor
            }
        };
        self.anchor = Some(anchor);
        self.held.insert(note);

        resolve(note, &anchor, &self.table)
    }

    /// Register a pressed note without touching the anchor.
    ///
    /// For keys that cannot sound yet. They still count toward the bass of
    /// later chords and are released by `note_off` as usual.
    pub fn hold(&mut self, note: u8) {
        self.held.insert(note & 0x7f);
    }

    pub fn note_off(&mut self, note: u8) {
        self.held.remove(note & 0x7f);
    }

    /// Treat every key as released. The anchor is kept.
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    /// Forget the anchor. The next note-on seeds a fresh one.
    pub fn reset(&mut self) {
        self.anchor = None;
    }

    /// Swap the ratio table. The anchor is left untouched.
    pub fn set_system(&mut self, system: TuningSystem) {
        self.system = system;
        self.table = TuningTable::for_system(system);
    }

    pub fn system(&self) -> TuningSystem {
        self.system
    }

    pub fn table(&self) -> &TuningTable {
        &self.table
    }

    pub fn anchor(&self) -> Option<ReferenceAnchor> {
        self.anchor
    }

    pub fn held(&self) -> &HeldNotes {
        &self.held
    }

    fn seed_anchor(&self, note: u8, seed: AnchorSeed) -> ReferenceAnchor {
        match seed {
            AnchorSeed::EqualTemperament => ReferenceAnchor::equal_tempered(note),
            AnchorSeed::RootRatio { root_note } => {
                let root = ReferenceAnchor::new(root_note, 1.0);
                ReferenceAnchor::new(note, resolve(note, &root, &self.table))
            }
        }
    }
}

impl Default for TuningContext {
    fn default() -> Self {
        Self::new(TuningSystem::default())
    }
}
