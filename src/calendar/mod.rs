//! Sexagenary calendar: lookup tables and the four-pillar calculator

pub mod pillars;
pub mod tables;

pub use pillars::{
    calculate_chart, day_pillar, hour_pillar, month_pillar, solar_date, year_pillar, year_profile,
    BirthInput, FullChart, Pillar, YearProfile, DEFAULT_BIRTH_HOUR, SUPPORTED_YEARS,
};
pub use tables::{Animal, Branch, SolarTerm, Stem, SOLAR_TERMS};
