use super::{midi_note_to_hz, table::TuningTable};

/*
Resolving a Note Against the Anchor
===================================

Equal temperament gives every note a fixed frequency. Here a note's frequency
depends on which note is currently acting as the harmonic root (the anchor):

    frequency = anchor_hz * ratio(interval) * 2^octave

where `interval` is the distance from the anchor folded into one octave and
`octave` is how many whole octaves were folded away.


Folding the Interval
--------------------

MIDI distances can be negative (a note below the anchor). Rust's `/` and `%`
truncate toward zero, so a remainder can come out negative. The rule is:

  - a zero distance stays at interval 0, octave 0
  - any other distance whose remainder is <= 0 gets 12 added to the interval
    and one octave taken away

  distance   truncated (int, oct)   folded (int, oct)   ratio * 2^oct
  --------   --------------------   -----------------   -------------
     +4          (4, 0)                 (4, 0)            5/4
     -1         (-1, 0)                (11, -1)          15/8 * 1/2
    -12          (0, -1)               (12, -2)           2 * 1/4
    +12          (0, 1)                (12, 0)            2

A remainder of exactly 0 for a nonzero distance lands on 12, which the table
answers with the octave ratio. Every row above is the right octave-reduced
interval, and because the octave factor is a power of two, moving a note up an
octave doubles its frequency exactly.
*/

/// The note currently acting as the harmonic root, and its frequency.
///
/// For sampled sounds `frequency` is a playback ratio relative to the sample
/// root instead of Hz. The math is the same.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceAnchor {
    pub note: u8,
    pub frequency: f64,
}

impl ReferenceAnchor {
    pub fn new(note: u8, frequency: f64) -> Self {
        Self { note, frequency }
    }

    /// Anchor a note at its equal-temperament frequency.
    pub fn equal_tempered(note: u8) -> Self {
        Self::new(note, midi_note_to_hz(note))
    }

    /// Distance of the anchor from equal temperament, in cents.
    ///
    /// Only meaningful for Hz anchors.
    pub fn drift_cents(&self) -> f64 {
        let et = midi_note_to_hz(self.note);
        if self.frequency <= 0.0 {
            return 0.0;
        }
        1200.0 * (self.frequency / et).log2()
    }
}

/// Fold a signed semitone distance into `(interval, octave_shift)`.
///
/// `interval` is in `0..=12`; see the table above for why 12 can appear.
#[inline]
pub fn fold_interval(distance: i32) -> (usize, i32) {
    if distance == 0 {
        return (0, 0);
    }

    let mut octave = distance / 12;
    let mut interval = distance % 12;
    if interval <= 0 {
        interval += 12;
        octave -= 1;
    }

    (interval as usize, octave)
}

/// Frequency of `note` relative to `anchor` under `table`.
#[inline]
pub fn resolve(note: u8, anchor: &ReferenceAnchor, table: &TuningTable) -> f64 {
    let distance = note as i32 - anchor.note as i32;
    let (interval, octave) = fold_interval(distance);

    anchor.frequency * table.ratio_for(interval) * 2.0_f64.powi(octave)
}
