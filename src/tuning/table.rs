#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ratio of the octave. Fixed for every system.
pub const OCTAVE: f64 = 2.0;

/// The just-intonation systems a table can be built from.
///
/// The "limit" is the largest prime appearing in the interval ratios.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TuningSystem {
    /// Pythagorean tuning, built from stacked pure fifths.
    ThreeLimit,
    FiveLimit,
    #[default]
    SevenLimit,
}

impl TuningSystem {
    pub const ALL: [TuningSystem; 3] = [
        TuningSystem::ThreeLimit,
        TuningSystem::FiveLimit,
        TuningSystem::SevenLimit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TuningSystem::ThreeLimit => "3-Limit (Pythagorean)",
            TuningSystem::FiveLimit => "5-Limit",
            TuningSystem::SevenLimit => "7-Limit",
        }
    }
}

impl std::fmt::Display for TuningSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// Index 0 is the minor second (1 semitone), index 10 the major seventh.
const THREE_LIMIT: [f64; 11] = [
    256.0 / 243.0, // Minor 2nd
    9.0 / 8.0,     // Major 2nd
    32.0 / 27.0,   // Minor 3rd
    81.0 / 64.0,   // Major 3rd
    4.0 / 3.0,     // Perfect 4th
    729.0 / 512.0, // Tritone
    3.0 / 2.0,     // Perfect 5th
    128.0 / 81.0,  // Minor 6th
    27.0 / 16.0,   // Major 6th
    16.0 / 9.0,    // Minor 7th
    243.0 / 128.0, // Major 7th
];

const FIVE_LIMIT: [f64; 11] = [
    16.0 / 15.0, // Minor 2nd
    9.0 / 8.0,   // Major 2nd
    6.0 / 5.0,   // Minor 3rd
    5.0 / 4.0,   // Major 3rd
    4.0 / 3.0,   // Perfect 4th
    25.0 / 18.0, // Tritone
    3.0 / 2.0,   // Perfect 5th
    8.0 / 5.0,   // Minor 6th
    5.0 / 3.0,   // Major 6th
    9.0 / 5.0,   // Minor 7th
    15.0 / 8.0,  // Major 7th
];

const SEVEN_LIMIT: [f64; 11] = [
    15.0 / 14.0, // Minor 2nd
    8.0 / 7.0,   // Major 2nd
    6.0 / 5.0,   // Minor 3rd
    5.0 / 4.0,   // Major 3rd
    4.0 / 3.0,   // Perfect 4th
    7.0 / 5.0,   // Tritone
    3.0 / 2.0,   // Perfect 5th
    8.0 / 5.0,   // Minor 6th
    5.0 / 3.0,   // Major 6th
    7.0 / 4.0,   // Minor 7th
    15.0 / 8.0,  // Major 7th
];

/// Interval ratios for one tuning system.
///
/// The table is `Copy`, so swapping systems replaces it as a whole value and a
/// resolution in progress always sees one complete table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TuningTable {
    ratios: [f64; 11],
}

impl TuningTable {
    pub fn for_system(system: TuningSystem) -> Self {
        let ratios = match system {
            TuningSystem::ThreeLimit => THREE_LIMIT,
            TuningSystem::FiveLimit => FIVE_LIMIT,
            TuningSystem::SevenLimit => SEVEN_LIMIT,
        };
        Self { ratios }
    }

    /// Twelve-tone equal temperament expressed as a table (ratio(k) = 2^(k/12)).
    pub fn equal_tempered() -> Self {
        let mut ratios = [0.0; 11];
        for (k, ratio) in ratios.iter_mut().enumerate() {
            *ratio = 2.0_f64.powf((k + 1) as f64 / 12.0);
        }
        Self { ratios }
    }

    /// Build a custom table from the ratios for 1..=11 semitones.
    ///
    /// Returns `None` if any ratio is not a positive finite number.
    pub fn from_ratios(ratios: [f64; 11]) -> Option<Self> {
        if ratios.iter().all(|r| r.is_finite() && *r > 0.0) {
            Some(Self { ratios })
        } else {
            None
        }
    }

    /// Ratio for an interval already reduced into `0..=12` semitones.
    ///
    /// Unison is exactly 1.0 and is never read from the table. Anything at or
    /// above 12 is the octave.
    #[inline]
    pub fn ratio_for(&self, interval: usize) -> f64 {
        match interval {
            0 => 1.0,
            1..=11 => self.ratios[interval - 1],
            _ => OCTAVE,
        }
    }

    pub fn ratios(&self) -> &[f64; 11] {
        &self.ratios
    }
}

impl Default for TuningTable {
    fn default() -> Self {
        Self::for_system(TuningSystem::default())
    }
}

impl From<TuningSystem> for TuningTable {
    fn from(system: TuningSystem) -> Self {
        Self::for_system(system)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unison_and_octave_are_fixed() {
        for system in TuningSystem::ALL {
            let table = TuningTable::for_system(system);
            assert_eq!(table.ratio_for(0), 1.0);
            assert_eq!(table.ratio_for(12), OCTAVE);
        }
    }

    #[test]
    fn systems_differ_where_expected() {
        let three = TuningTable::for_system(TuningSystem::ThreeLimit);
        let five = TuningTable::for_system(TuningSystem::FiveLimit);
        let seven = TuningTable::for_system(TuningSystem::SevenLimit);

        // Pythagorean vs. syntonic major third
        assert_eq!(three.ratio_for(4), 81.0 / 64.0);
        assert_eq!(five.ratio_for(4), 5.0 / 4.0);
        // Harmonic seventh only appears in 7-limit
        assert_eq!(five.ratio_for(10), 9.0 / 5.0);
        assert_eq!(seven.ratio_for(10), 7.0 / 4.0);
        // Fifth is pure in all of them
        assert_eq!(three.ratio_for(7), five.ratio_for(7));
        assert_eq!(five.ratio_for(7), seven.ratio_for(7));
    }

    #[test]
    fn equal_tempered_fifth() {
        let table = TuningTable::equal_tempered();
        assert!((table.ratio_for(7) - 1.498_307_076_876_681_5).abs() < 1e-12);
    }

    #[test]
    fn rejects_non_positive_ratios() {
        let mut ratios = FIVE_LIMIT;
        let custom = TuningTable::from_ratios(ratios).unwrap();
        assert_eq!(custom.ratios(), &FIVE_LIMIT);
        assert_eq!(custom, TuningTable::for_system(TuningSystem::FiveLimit));
        ratios[3] = 0.0;
        assert!(TuningTable::from_ratios(ratios).is_none());
        ratios[3] = f64::NAN;
        assert!(TuningTable::from_ratios(ratios).is_none());
    }

    #[test]
    fn default_is_seven_limit() {
        assert_eq!(
            TuningTable::default(),
            TuningTable::for_system(TuningSystem::SevenLimit)
        );
    }
}
