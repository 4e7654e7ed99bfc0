//! Four Pillars Calculator
//!
//! Converts a validated birth date and hour into year, month, day and hour
//! pillars on the sexagenary cycle.
//!
//! Anchors:
//! - Year: 4 CE is stem 0 (Jia), branch 0 (Zi). The solar year starts at LiChun (Feb 4).
//! - Month: solar month 0 opens at LiChun on the Tiger branch; stem via "Five Tigers".
//! - Day: 1900-01-01 is stem 0 (Jia), branch 10 (Xu). Civil day counts only.
//! - Hour: two-hour slots, 23:00-00:59 is Rat; stem via "Five Rats".

use crate::calendar::tables::{
    Animal, Branch, Stem, FIRST_MONTH_BRANCH, FIVE_RATS_START, FIVE_TIGERS_START,
    SOLAR_TERMS, YEAR_WRAP_TERM,
};
use crate::elements::{Element, Polarity};
use crate::error::ValidationError;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use smallvec::SmallVec;
use std::ops::RangeInclusive;

/// Birth years accepted by the calculator
pub const SUPPORTED_YEARS: RangeInclusive<i32> = 1900..=2100;

/// Hour used when the birth time is unknown
pub const DEFAULT_BIRTH_HOUR: u8 = 12;

/// `num_days_from_ce` of 1900-01-01, the day-pillar reference date
const REFERENCE_DAY_ORDINAL: i32 = 693_596;
const REFERENCE_DAY_STEM: i64 = 0;
const REFERENCE_DAY_BRANCH: i64 = 10;

/// Year offset placing 4 CE at the start of the cycle
const YEAR_ANCHOR: i32 = 4;

/// Validated birth moment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BirthInput {
    date: NaiveDate,
    hour: Option<u8>,
}

impl BirthInput {
    pub fn new(date: NaiveDate, hour: Option<u8>) -> Result<Self, ValidationError> {
        check_year(date.year())?;
        if let Some(h) = hour {
            if h > 23 {
                return Err(ValidationError::InvalidHour(h));
            }
        }
        Ok(Self { date, hour })
    }

    pub fn from_ymd(year: i32, month: u32, day: u32, hour: Option<u8>) -> Result<Self, ValidationError> {
        check_year(year)?;
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(ValidationError::InvalidDate { year, month, day })?;
        Self::new(date, hour)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Birth hour, noon when unknown
    pub fn hour(&self) -> u8 {
        self.hour.unwrap_or(DEFAULT_BIRTH_HOUR)
    }

    pub fn hour_known(&self) -> bool {
        self.hour.is_some()
    }
}

fn check_year(year: i32) -> Result<(), ValidationError> {
    if SUPPORTED_YEARS.contains(&year) {
        Ok(())
    } else {
        Err(ValidationError::YearOutOfRange {
            year,
            min: *SUPPORTED_YEARS.start(),
            max: *SUPPORTED_YEARS.end(),
        })
    }
}

/// One stem/branch pillar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pillar {
    stem: Stem,
    branch: Branch,
    stem_element: Element,
    branch_element: Element,
    hidden_stems: SmallVec<[Stem; 3]>,
}

impl Pillar {
    fn from_indices(stem_index: usize, branch_index: usize) -> Self {
        let stem = Stem::from_index(stem_index);
        let branch = Branch::from_index(branch_index);
        Self {
            stem,
            branch,
            stem_element: stem.element(),
            branch_element: branch.element(),
            hidden_stems: SmallVec::from_slice(branch.hidden_stems()),
        }
    }

    pub fn stem(&self) -> Stem {
        self.stem
    }

    pub fn branch(&self) -> Branch {
        self.branch
    }

    pub fn stem_element(&self) -> Element {
        self.stem_element
    }

    pub fn branch_element(&self) -> Element {
        self.branch_element
    }

    pub fn hidden_stems(&self) -> &[Stem] {
        &self.hidden_stems
    }
}

/// Year, month, day and hour pillars of a birth moment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FullChart {
    year: Pillar,
    month: Pillar,
    day: Pillar,
    hour: Pillar,
    animal_sign: Animal,
    solar_year: i32,
    solar_month_index: usize,
}

impl FullChart {
    pub fn year(&self) -> &Pillar {
        &self.year
    }

    pub fn month(&self) -> &Pillar {
        &self.month
    }

    pub fn day(&self) -> &Pillar {
        &self.day
    }

    pub fn hour(&self) -> &Pillar {
        &self.hour
    }

    pub fn animal_sign(&self) -> Animal {
        self.animal_sign
    }

    /// Gregorian year shifted back by one before LiChun
    pub fn solar_year(&self) -> i32 {
        self.solar_year
    }

    /// 0 = Tiger month (from LiChun) .. 11 = Ox month (from XiaoHan)
    pub fn solar_month_index(&self) -> usize {
        self.solar_month_index
    }

    /// Pillars in year, month, day, hour order
    pub fn pillars(&self) -> [&Pillar; 4] {
        [&self.year, &self.month, &self.day, &self.hour]
    }

    /// Element of the year stem
    pub fn year_element(&self) -> Element {
        self.year.stem_element
    }

    /// Element of the day stem (the "day master")
    pub fn day_master(&self) -> Element {
        self.day.stem_element
    }
}

/// Year-only view of a solar year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearProfile {
    pub year: i32,
    pub stem: Stem,
    pub branch: Branch,
    pub element: Element,
    pub animal: Animal,
    pub polarity: Polarity,
    /// Yang years lean toward the element they produce, yin years toward their producer
    pub secondary_element: Element,
    /// Controller of the year element, then the element it controls
    pub needs_balance: [Element; 2],
    /// Year element and the element that produces it
    pub strengths: [Element; 2],
}

/// Compute the four pillars for a validated birth input
pub fn calculate_chart(input: &BirthInput) -> FullChart {
    let date = input.date();
    let (solar_year, solar_month_index) = solar_date(date);

    let year = year_pillar(solar_year);
    let month = month_pillar(year.stem, solar_month_index);
    let day = day_pillar(date);
    let hour = hour_pillar(day.stem, input.hour());

    FullChart {
        year,
        month,
        day,
        hour,
        animal_sign: Branch::from_index(year_branch_index(solar_year)).animal(),
        solar_year,
        solar_month_index,
    }
}

/// Year-only profile: stem, branch, element, animal and polarity of `year`
pub fn year_profile(year: i32) -> Result<YearProfile, ValidationError> {
    check_year(year)?;
    let pillar = year_pillar(year);
    let element = pillar.stem_element;
    let polarity = pillar.stem.polarity();
    let secondary_element = match polarity {
        Polarity::Yang => element.produces(),
        Polarity::Yin => element.produced_by(),
    };

    Ok(YearProfile {
        year,
        stem: pillar.stem,
        branch: pillar.branch,
        element,
        animal: pillar.branch.animal(),
        polarity,
        secondary_element,
        needs_balance: [element.controlled_by(), element.controls()],
        strengths: [element, element.produced_by()],
    })
}

/// Solar year and solar month index (0-11) of a civil date
pub fn solar_date(date: NaiveDate) -> (i32, usize) {
    let start_of_spring = &SOLAR_TERMS[0];
    let before_spring = (date.month(), date.day()) < (start_of_spring.month, start_of_spring.day);
    let solar_year = if before_spring { date.year() - 1 } else { date.year() };
    (solar_year, solar_month_index(date.month(), date.day()))
}

/// Index of the last solar term on or before month/day.
///
/// Jan 1-5 precede every boundary in the calendar year and fall in the
/// December term that wraps the new year.
pub fn solar_month_index(month: u32, day: u32) -> usize {
    let ordinal = month * 100 + day;
    SOLAR_TERMS
        .iter()
        .enumerate()
        .filter(|(_, term)| term.ordinal() <= ordinal)
        .max_by_key(|(_, term)| term.ordinal())
        .map(|(index, _)| index)
        .unwrap_or(YEAR_WRAP_TERM)
}

fn year_stem_index(solar_year: i32) -> usize {
    (solar_year - YEAR_ANCHOR).rem_euclid(10) as usize
}

fn year_branch_index(solar_year: i32) -> usize {
    (solar_year - YEAR_ANCHOR).rem_euclid(12) as usize
}

pub fn year_pillar(solar_year: i32) -> Pillar {
    Pillar::from_indices(year_stem_index(solar_year), year_branch_index(solar_year))
}

pub fn month_pillar(year_stem: Stem, solar_month_index: usize) -> Pillar {
    let start = FIVE_TIGERS_START[year_stem.index() % 5];
    Pillar::from_indices(
        (start + solar_month_index) % 10,
        (FIRST_MONTH_BRANCH + solar_month_index) % 12,
    )
}

/// Whole civil days since 1900-01-01 (negative before it)
pub fn days_since_reference(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce() - REFERENCE_DAY_ORDINAL)
}

pub fn day_pillar(date: NaiveDate) -> Pillar {
    let days = days_since_reference(date);
    Pillar::from_indices(
        (REFERENCE_DAY_STEM + days).rem_euclid(10) as usize,
        (REFERENCE_DAY_BRANCH + days).rem_euclid(12) as usize,
    )
}

pub fn hour_pillar(day_stem: Stem, hour: u8) -> Pillar {
    let branch_index = ((usize::from(hour) + 1) / 2) % 12;
    let start = FIVE_RATS_START[day_stem.index() % 5];
    Pillar::from_indices((start + branch_index) % 10, branch_index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn chart(y: i32, m: u32, d: u32, hour: Option<u8>) -> FullChart {
        calculate_chart(&BirthInput::from_ymd(y, m, d, hour).unwrap())
    }

    #[test]
    fn test_reference_ordinal_matches_chrono() {
        assert_eq!(date(1900, 1, 1).num_days_from_ce(), REFERENCE_DAY_ORDINAL);
        assert_eq!(days_since_reference(date(1900, 1, 1)), 0);
        assert_eq!(days_since_reference(date(1900, 1, 31)), 30);
        assert_eq!(days_since_reference(date(1899, 12, 31)), -1);
    }

    #[test]
    fn test_reference_day_is_jia_xu() {
        let c = chart(1900, 1, 1, Some(12));
        assert_eq!(c.day().stem(), Stem::Jia);
        assert_eq!(c.day().branch(), Branch::Xu);
        assert_eq!(c.day().stem().index(), 0);
        assert_eq!(c.day().branch().index(), 10);
    }

    #[test]
    fn test_day_pillar_sixty_day_period() {
        let mut d = date(1900, 1, 1);
        for _ in 0..400 {
            let later = d + Duration::days(60);
            assert_eq!(day_pillar(d), day_pillar(later), "{} vs {}", d, later);
            d += Duration::days(97);
        }
    }

    #[test]
    fn test_day_pillar_before_reference_normalizes() {
        // One day earlier steps both cycles back: Gui (9) / You (9)
        let p = day_pillar(date(1899, 12, 31));
        assert_eq!(p.stem(), Stem::Gui);
        assert_eq!(p.branch(), Branch::You);
    }

    #[test]
    fn test_year_pillar_sixty_year_period() {
        for y in 1900..=2040 {
            assert_eq!(year_pillar(y), year_pillar(y + 60));
        }
    }

    #[test]
    fn test_1984_is_jia_zi() {
        let p = year_pillar(1984);
        assert_eq!(p.stem(), Stem::Jia);
        assert_eq!(p.branch(), Branch::Zi);
    }

    #[test]
    fn test_year_profile_1990() {
        let profile = year_profile(1990).unwrap();
        assert_eq!(profile.stem, Stem::Geng);
        assert_eq!(profile.branch, Branch::Wu);
        assert_eq!(profile.element, Element::Metal);
        assert_eq!(profile.animal, Animal::Horse);
        assert_eq!(profile.polarity, Polarity::Yang);
        assert_eq!(profile.secondary_element, Element::Water);
        assert_eq!(profile.needs_balance, [Element::Fire, Element::Wood]);
        assert_eq!(profile.strengths, [Element::Metal, Element::Earth]);
    }

    #[test]
    fn test_year_profile_2025_and_1986() {
        let p = year_profile(2025).unwrap();
        assert_eq!(p.element, Element::Wood);
        assert_eq!(p.animal, Animal::Snake);
        assert_eq!(p.polarity, Polarity::Yin);
        // Yin Wood leans toward Water, its producer
        assert_eq!(p.secondary_element, Element::Water);
        assert_eq!(p.needs_balance, [Element::Metal, Element::Earth]);

        let p = year_profile(1986).unwrap();
        assert_eq!(p.element, Element::Fire);
        assert_eq!(p.animal, Animal::Tiger);
        assert_eq!(p.polarity, Polarity::Yang);
        assert_eq!(p.secondary_element, Element::Earth);
        assert_eq!(p.needs_balance, [Element::Water, Element::Metal]);
    }

    #[test]
    fn test_year_profile_rejects_out_of_range() {
        assert!(matches!(
            year_profile(1850),
            Err(ValidationError::YearOutOfRange { year: 1850, .. })
        ));
    }

    #[test]
    fn test_solar_year_switches_at_lichun() {
        assert_eq!(solar_date(date(1990, 2, 3)).0, 1989);
        assert_eq!(solar_date(date(1990, 2, 4)).0, 1990);
        assert_eq!(solar_date(date(1990, 1, 20)).0, 1989);
        assert_eq!(solar_date(date(1990, 12, 31)).0, 1990);

        let c = chart(1990, 1, 20, None);
        assert_eq!(c.animal_sign(), Animal::Snake);
        assert_eq!(c.year().stem(), Stem::Ji);
        let c = chart(1990, 2, 4, None);
        assert_eq!(c.animal_sign(), Animal::Horse);
        assert_eq!(c.year_element(), Element::Metal);
    }

    #[test]
    fn test_solar_month_boundaries() {
        assert_eq!(solar_month_index(2, 4), 0);
        assert_eq!(solar_month_index(3, 5), 0);
        assert_eq!(solar_month_index(3, 6), 1);
        assert_eq!(solar_month_index(6, 15), 4);
        assert_eq!(solar_month_index(12, 6), 9);
        assert_eq!(solar_month_index(12, 7), 10);
        assert_eq!(solar_month_index(12, 31), 10);
        assert_eq!(solar_month_index(1, 1), 10);
        assert_eq!(solar_month_index(1, 5), 10);
        assert_eq!(solar_month_index(1, 6), 11);
        assert_eq!(solar_month_index(2, 3), 11);
    }

    #[test]
    fn test_month_pillar_five_tigers() {
        // Jia/Ji years open with Bing Yin
        let p = month_pillar(Stem::Jia, 0);
        assert_eq!((p.stem(), p.branch()), (Stem::Bing, Branch::Yin));
        let p = month_pillar(Stem::Ji, 0);
        assert_eq!((p.stem(), p.branch()), (Stem::Bing, Branch::Yin));
        // Geng year, Horse month (index 4): Wu + 4 = Ren
        let p = month_pillar(Stem::Geng, 4);
        assert_eq!((p.stem(), p.branch()), (Stem::Ren, Branch::Wu));
        // Ox month closes the year on branch Chou
        let p = month_pillar(Stem::Wu, 11);
        assert_eq!((p.stem(), p.branch()), (Stem::Yi, Branch::Chou));
    }

    #[test]
    fn test_hour_pillar_slots() {
        assert_eq!(hour_pillar(Stem::Jia, 23).branch(), Branch::Zi);
        assert_eq!(hour_pillar(Stem::Jia, 0).branch(), Branch::Zi);
        assert_eq!(hour_pillar(Stem::Jia, 1).branch(), Branch::Chou);
        assert_eq!(hour_pillar(Stem::Jia, 12).branch(), Branch::Wu);
        assert_eq!(hour_pillar(Stem::Jia, 22).branch(), Branch::Hai);

        // Five Rats: Jia day starts at Jia Zi, Yi day at Bing Zi
        assert_eq!(hour_pillar(Stem::Jia, 0).stem(), Stem::Jia);
        assert_eq!(hour_pillar(Stem::Yi, 0).stem(), Stem::Bing);
        assert_eq!(hour_pillar(Stem::Jia, 12).stem(), Stem::Geng);
    }

    #[test]
    fn test_unknown_hour_defaults_to_noon() {
        let unknown = chart(1990, 5, 15, None);
        let noon = chart(1990, 5, 15, Some(12));
        assert_eq!(unknown, noon);
        assert_eq!(unknown.hour().branch(), Branch::Wu);
    }

    #[test]
    fn test_known_chart_1990_05_15() {
        let c = chart(1990, 5, 15, None);
        assert_eq!((c.year().stem(), c.year().branch()), (Stem::Geng, Branch::Wu));
        assert_eq!((c.month().stem(), c.month().branch()), (Stem::Xin, Branch::Si));
        assert_eq!((c.day().stem(), c.day().branch()), (Stem::Geng, Branch::Chen));
        assert_eq!((c.hour().stem(), c.hour().branch()), (Stem::Ren, Branch::Wu));
        assert_eq!(c.hour().hidden_stems(), &[Stem::Ding, Stem::Ji]);
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            BirthInput::from_ymd(1899, 6, 1, None),
            Err(ValidationError::YearOutOfRange { .. })
        ));
        assert!(matches!(
            BirthInput::from_ymd(2101, 1, 1, None),
            Err(ValidationError::YearOutOfRange { .. })
        ));
        assert_eq!(
            BirthInput::from_ymd(1990, 2, 30, None),
            Err(ValidationError::InvalidDate { year: 1990, month: 2, day: 30 })
        );
        assert_eq!(
            BirthInput::from_ymd(1990, 2, 1, Some(24)),
            Err(ValidationError::InvalidHour(24))
        );
        assert!(BirthInput::from_ymd(2000, 2, 29, Some(23)).is_ok());
    }
}
