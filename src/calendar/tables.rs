//! Calendar Lookup Tables
//!
//! Heavenly stems, earthly branches, their elements, the hidden stems carried
//! by each branch, and the twelve approximate solar-term boundary dates.
//!
//! Solar terms are fixed month/day approximations, not solar longitude.

use crate::elements::{Element, Polarity};
use crate::error::UnknownName;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Heavenly stem (天干)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stem {
    Jia,
    Yi,
    Bing,
    Ding,
    Wu,
    Ji,
    Geng,
    Xin,
    Ren,
    Gui,
}

/// Earthly branch (地支)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Branch {
    Zi,
    Chou,
    Yin,
    Mao,
    Chen,
    Si,
    Wu,
    Wei,
    Shen,
    You,
    Xu,
    Hai,
}

/// Zodiac animal, in branch order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Animal {
    Rat,
    Ox,
    Tiger,
    Rabbit,
    Dragon,
    Snake,
    Horse,
    Goat,
    Monkey,
    Rooster,
    Dog,
    Pig,
}

/// Approximate solar-term boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolarTerm {
    pub name: &'static str,
    pub month: u32,
    pub day: u32,
}

impl SolarTerm {
    /// Month/day as a comparable number (Feb 4 → 204)
    pub const fn ordinal(&self) -> u32 {
        self.month * 100 + self.day
    }
}

// ============================================================================
// EMBEDDED TABLES
// ============================================================================

const STEMS: [Stem; 10] = [
    Stem::Jia, Stem::Yi, Stem::Bing, Stem::Ding, Stem::Wu,
    Stem::Ji, Stem::Geng, Stem::Xin, Stem::Ren, Stem::Gui,
];

const BRANCHES: [Branch; 12] = [
    Branch::Zi, Branch::Chou, Branch::Yin, Branch::Mao, Branch::Chen, Branch::Si,
    Branch::Wu, Branch::Wei, Branch::Shen, Branch::You, Branch::Xu, Branch::Hai,
];

const ANIMALS: [Animal; 12] = [
    Animal::Rat, Animal::Ox, Animal::Tiger, Animal::Rabbit, Animal::Dragon, Animal::Snake,
    Animal::Horse, Animal::Goat, Animal::Monkey, Animal::Rooster, Animal::Dog, Animal::Pig,
];

const BRANCH_ELEMENTS: [Element; 12] = [
    Element::Water, // Zi
    Element::Earth, // Chou
    Element::Wood,  // Yin
    Element::Wood,  // Mao
    Element::Earth, // Chen
    Element::Fire,  // Si
    Element::Fire,  // Wu
    Element::Earth, // Wei
    Element::Metal, // Shen
    Element::Metal, // You
    Element::Earth, // Xu
    Element::Water, // Hai
];

/// Hidden stems: initial, middle and residual qi
static HIDDEN_STEMS: [&[Stem]; 12] = [
    &[Stem::Gui],                     // Zi
    &[Stem::Ji, Stem::Gui, Stem::Xin], // Chou
    &[Stem::Jia, Stem::Bing, Stem::Wu], // Yin
    &[Stem::Yi],                      // Mao
    &[Stem::Wu, Stem::Yi, Stem::Gui], // Chen
    &[Stem::Bing, Stem::Wu, Stem::Geng], // Si
    &[Stem::Ding, Stem::Ji],          // Wu
    &[Stem::Ji, Stem::Ding, Stem::Yi], // Wei
    &[Stem::Geng, Stem::Ren, Stem::Wu], // Shen
    &[Stem::Xin],                     // You
    &[Stem::Wu, Stem::Xin, Stem::Ding], // Xu
    &[Stem::Ren, Stem::Jia],          // Hai
];

/// Twelve month-opening solar terms. Index 0 (Start of Spring) opens the Tiger month.
pub static SOLAR_TERMS: [SolarTerm; 12] = [
    SolarTerm { name: "LiChun", month: 2, day: 4 },
    SolarTerm { name: "JingZhe", month: 3, day: 6 },
    SolarTerm { name: "QingMing", month: 4, day: 5 },
    SolarTerm { name: "LiXia", month: 5, day: 6 },
    SolarTerm { name: "MangZhong", month: 6, day: 6 },
    SolarTerm { name: "XiaoShu", month: 7, day: 7 },
    SolarTerm { name: "LiQiu", month: 8, day: 8 },
    SolarTerm { name: "BaiLu", month: 9, day: 8 },
    SolarTerm { name: "HanLu", month: 10, day: 8 },
    SolarTerm { name: "LiDong", month: 11, day: 7 },
    SolarTerm { name: "DaXue", month: 12, day: 7 },
    SolarTerm { name: "XiaoHan", month: 1, day: 6 },
];

/// Solar-term index whose span crosses the Gregorian new year (DaXue, Dec 7 → Jan 5)
pub const YEAR_WRAP_TERM: usize = 10;

/// Branch index of the first solar month (Tiger)
pub const FIRST_MONTH_BRANCH: usize = 2;

/// "Five Tigers": stem of the Tiger month, keyed by year stem index mod 5
pub const FIVE_TIGERS_START: [usize; 5] = [2, 4, 6, 8, 0];

/// "Five Rats": stem of the Rat hour, keyed by day stem index mod 5
pub const FIVE_RATS_START: [usize; 5] = [0, 2, 4, 6, 8];

// ============================================================================
// ACCESSORS
// ============================================================================

impl Stem {
    pub const ALL: [Stem; 10] = STEMS;

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stem at `index` mod 10
    pub const fn from_index(index: usize) -> Stem {
        STEMS[index % 10]
    }

    /// Two stems per element: yang then yin
    pub const fn element(self) -> Element {
        Element::from_index(self.index() / 2)
    }

    pub const fn polarity(self) -> Polarity {
        if self.index() % 2 == 0 {
            Polarity::Yang
        } else {
            Polarity::Yin
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Stem::Jia => "Jia",
            Stem::Yi => "Yi",
            Stem::Bing => "Bing",
            Stem::Ding => "Ding",
            Stem::Wu => "Wu",
            Stem::Ji => "Ji",
            Stem::Geng => "Geng",
            Stem::Xin => "Xin",
            Stem::Ren => "Ren",
            Stem::Gui => "Gui",
        }
    }
}

impl Branch {
    pub const ALL: [Branch; 12] = BRANCHES;

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Branch at `index` mod 12
    pub const fn from_index(index: usize) -> Branch {
        BRANCHES[index % 12]
    }

    pub const fn element(self) -> Element {
        BRANCH_ELEMENTS[self.index()]
    }

    pub const fn animal(self) -> Animal {
        ANIMALS[self.index()]
    }

    /// Hidden stems, 1-3, strongest first
    pub fn hidden_stems(self) -> &'static [Stem] {
        HIDDEN_STEMS[self.index()]
    }

    pub const fn name(self) -> &'static str {
        match self {
            Branch::Zi => "Zi",
            Branch::Chou => "Chou",
            Branch::Yin => "Yin",
            Branch::Mao => "Mao",
            Branch::Chen => "Chen",
            Branch::Si => "Si",
            Branch::Wu => "Wu",
            Branch::Wei => "Wei",
            Branch::Shen => "Shen",
            Branch::You => "You",
            Branch::Xu => "Xu",
            Branch::Hai => "Hai",
        }
    }
}

impl Animal {
    pub const ALL: [Animal; 12] = ANIMALS;

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn branch(self) -> Branch {
        BRANCHES[self.index()]
    }

    pub const fn name(self) -> &'static str {
        match self {
            Animal::Rat => "Rat",
            Animal::Ox => "Ox",
            Animal::Tiger => "Tiger",
            Animal::Rabbit => "Rabbit",
            Animal::Dragon => "Dragon",
            Animal::Snake => "Snake",
            Animal::Horse => "Horse",
            Animal::Goat => "Goat",
            Animal::Monkey => "Monkey",
            Animal::Rooster => "Rooster",
            Animal::Dog => "Dog",
            Animal::Pig => "Pig",
        }
    }
}

impl fmt::Display for Stem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Animal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Animal {
    type Err = UnknownName;

    /// Case-insensitive; accepts Sheep/Ram for Goat and Rooster/Chicken alike
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lowered = trimmed.to_ascii_lowercase();
        let canonical = match lowered.as_str() {
            "sheep" | "ram" => "goat",
            "chicken" | "cock" => "rooster",
            "boar" => "pig",
            "mouse" => "rat",
            other => other,
        };
        ANIMALS
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(canonical))
            .ok_or_else(|| UnknownName {
                kind: "zodiac animal",
                value: trimmed.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_stems_per_element() {
        for element in Element::ALL {
            let stems: Vec<Stem> = Stem::ALL.into_iter().filter(|s| s.element() == element).collect();
            assert_eq!(stems.len(), 2, "{} should have 2 stems", element);
            assert_eq!(stems[0].polarity(), Polarity::Yang);
            assert_eq!(stems[1].polarity(), Polarity::Yin);
        }
    }

    #[test]
    fn test_stem_elements() {
        assert_eq!(Stem::Jia.element(), Element::Wood);
        assert_eq!(Stem::Ding.element(), Element::Fire);
        assert_eq!(Stem::Ji.element(), Element::Earth);
        assert_eq!(Stem::Geng.element(), Element::Metal);
        assert_eq!(Stem::Gui.element(), Element::Water);
    }

    #[test]
    fn test_branch_elements_and_animals() {
        assert_eq!(Branch::Zi.element(), Element::Water);
        assert_eq!(Branch::Zi.animal(), Animal::Rat);
        assert_eq!(Branch::Wu.element(), Element::Fire);
        assert_eq!(Branch::Wu.animal(), Animal::Horse);
        assert_eq!(Branch::Shen.element(), Element::Metal);
        assert_eq!(Branch::Hai.animal(), Animal::Pig);

        // Four earth branches sit between the seasons
        let earth = Branch::ALL.iter().filter(|b| b.element() == Element::Earth).count();
        assert_eq!(earth, 4);
    }

    #[test]
    fn test_hidden_stems_non_empty_and_bounded() {
        for branch in Branch::ALL {
            let hidden = branch.hidden_stems();
            assert!(
                (1..=3).contains(&hidden.len()),
                "{} has {} hidden stems",
                branch,
                hidden.len()
            );
        }
        // Main qi of single-stem branches matches the branch element
        assert_eq!(Branch::Zi.hidden_stems()[0].element(), Element::Water);
        assert_eq!(Branch::Mao.hidden_stems()[0].element(), Element::Wood);
        assert_eq!(Branch::You.hidden_stems()[0].element(), Element::Metal);
    }

    #[test]
    fn test_solar_terms_cover_twelve_months() {
        let mut months: Vec<u32> = SOLAR_TERMS.iter().map(|t| t.month).collect();
        months.sort_unstable();
        assert_eq!(months, (1..=12).collect::<Vec<_>>());
        assert_eq!(SOLAR_TERMS[0].ordinal(), 204);
        assert_eq!(SOLAR_TERMS[YEAR_WRAP_TERM].month, 12);
    }

    #[test]
    fn test_index_wraps() {
        assert_eq!(Stem::from_index(10), Stem::Jia);
        assert_eq!(Stem::from_index(13), Stem::Ding);
        assert_eq!(Branch::from_index(12), Branch::Zi);
        assert_eq!(Branch::from_index(FIRST_MONTH_BRANCH), Branch::Yin);
    }

    #[test]
    fn test_animal_parse() {
        assert_eq!("horse".parse::<Animal>().unwrap(), Animal::Horse);
        assert_eq!("Sheep".parse::<Animal>().unwrap(), Animal::Goat);
        assert_eq!(" DOG ".parse::<Animal>().unwrap(), Animal::Dog);
        assert!("Cat".parse::<Animal>().is_err());
        for animal in Animal::ALL {
            assert_eq!(animal.branch().animal(), animal);
        }
    }
}
