//! Zodiac affinity table
//!
//! Per animal: two trine partners (best), the six-harmony partner (good),
//! the harm partner (challenging) and the clashing sign (conflict).

use crate::calendar::Animal;
use serde::{Deserialize, Serialize};

/// Affinity groups for one animal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZodiacAffinity {
    pub animal: Animal,
    pub best: [Animal; 2],
    pub good: Animal,
    pub challenging: Animal,
    pub conflict: Animal,
}

/// Classification of a (user, candidate) animal pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZodiacMatch {
    Best,
    Good,
    Challenging,
    Conflict,
    Neutral,
}

// ============================================================================
// EMBEDDED AFFINITY TABLE (indexed by branch)
// ============================================================================

use Animal::{Dog, Dragon, Goat, Horse, Monkey, Ox, Pig, Rabbit, Rat, Rooster, Snake, Tiger};

const fn affinity(animal: Animal, best: [Animal; 2], good: Animal, challenging: Animal, conflict: Animal) -> ZodiacAffinity {
    ZodiacAffinity { animal, best, good, challenging, conflict }
}

pub static ZODIAC_AFFINITIES: [ZodiacAffinity; 12] = [
    affinity(Rat, [Dragon, Monkey], Ox, Goat, Horse),
    affinity(Ox, [Snake, Rooster], Rat, Horse, Goat),
    affinity(Tiger, [Horse, Dog], Pig, Snake, Monkey),
    affinity(Rabbit, [Goat, Pig], Dog, Dragon, Rooster),
    affinity(Dragon, [Rat, Monkey], Rooster, Rabbit, Dog),
    affinity(Snake, [Ox, Rooster], Monkey, Tiger, Pig),
    affinity(Horse, [Tiger, Dog], Goat, Ox, Rat),
    affinity(Goat, [Rabbit, Pig], Horse, Rat, Ox),
    affinity(Monkey, [Rat, Dragon], Snake, Pig, Tiger),
    affinity(Rooster, [Ox, Snake], Dragon, Dog, Rabbit),
    affinity(Dog, [Tiger, Horse], Rabbit, Rooster, Dragon),
    affinity(Pig, [Rabbit, Goat], Tiger, Monkey, Snake),
];

pub fn affinity_of(animal: Animal) -> &'static ZodiacAffinity {
    &ZODIAC_AFFINITIES[animal.branch().index()]
}

/// Classify `candidate` relative to the user's `sign`. Same sign is neutral.
pub fn zodiac_match(sign: Animal, candidate: Animal) -> ZodiacMatch {
    let row = affinity_of(sign);
    if row.best.contains(&candidate) {
        ZodiacMatch::Best
    } else if row.good == candidate {
        ZodiacMatch::Good
    } else if row.challenging == candidate {
        ZodiacMatch::Challenging
    } else if row.conflict == candidate {
        ZodiacMatch::Conflict
    } else {
        ZodiacMatch::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_indexed_by_branch() {
        for animal in Animal::ALL {
            assert_eq!(affinity_of(animal).animal, animal);
        }
    }

    #[test]
    fn test_table_matches_modular_rules() {
        for row in ZODIAC_AFFINITIES.iter() {
            let a = row.animal.index();
            for best in row.best {
                let b = best.index();
                assert_ne!(a, b);
                assert_eq!((a + 12 - b) % 4, 0, "trine {:?}/{:?}", row.animal, best);
            }
            assert_eq!((a + row.good.index()) % 12, 1, "harmony {:?}", row.animal);
            assert_eq!((a + row.challenging.index()) % 12, 7, "harm {:?}", row.animal);
            assert_eq!((a + 6) % 12, row.conflict.index(), "clash {:?}", row.animal);
        }
    }

    #[test]
    fn test_relations_are_symmetric() {
        for sign in Animal::ALL {
            for other in Animal::ALL {
                assert_eq!(zodiac_match(sign, other), zodiac_match(other, sign));
            }
        }
    }

    #[test]
    fn test_tiger_pairs() {
        assert_eq!(zodiac_match(Tiger, Dog), ZodiacMatch::Best);
        assert_eq!(zodiac_match(Tiger, Horse), ZodiacMatch::Best);
        assert_eq!(zodiac_match(Tiger, Pig), ZodiacMatch::Good);
        assert_eq!(zodiac_match(Tiger, Snake), ZodiacMatch::Challenging);
        assert_eq!(zodiac_match(Tiger, Monkey), ZodiacMatch::Conflict);
        assert_eq!(zodiac_match(Tiger, Tiger), ZodiacMatch::Neutral);
        assert_eq!(zodiac_match(Tiger, Rat), ZodiacMatch::Neutral);
    }
}
