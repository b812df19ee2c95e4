//! Calendar-driven saffron season calculator.
//!
//! The crop year is split into four phases by fixed month/day boundaries:
//!
//! | Period          | Phase             |
//! |-----------------|-------------------|
//! | Dec 1 – May 31  | Dormancy          |
//! | Jun 1 – Sep 30  | Vegetative Growth |
//! | Oct 1 – Oct 20  | Flowering         |
//! | Oct 21 – Nov 30 | Harvest           |
//!
//! Every function here is pure in the date it is given; "today" is supplied
//! by the caller through a [`Clock`](crate::domain::ports::Clock).

use crate::domain::model::{Phase, PhaseInfo, TransitionInfo};
use crate::utils::error::{AdvisorError, Result};
use chrono::{Datelike, NaiveDate};

const DORMANCY_TIPS: &[&str] = &[
    "Minimal watering required",
    "Prepare soil for next cycle",
    "Check for pest damage in stored corms",
];

const VEGETATIVE_TIPS: &[&str] = &[
    "Regular watering needed",
    "Apply organic fertilizer",
    "Monitor for weeds and pests",
    "Ensure good drainage",
];

const FLOWERING_TIPS: &[&str] = &[
    "Monitor daily for flower emergence",
    "Prepare for harvest",
    "Protect from heavy rain",
    "Early morning inspection recommended",
];

const HARVEST_TIPS: &[&str] = &[
    "Harvest flowers early morning",
    "Pick flowers before they fully open",
    "Separate stigmas immediately",
    "Dry stigmas properly in shade",
    "Store in airtight containers",
];

/// Phase in effect on `date`.
pub fn phase_on(date: NaiveDate) -> Phase {
    match (date.month(), date.day()) {
        (12, _) | (1..=5, _) => Phase::Dormancy,
        (6..=9, _) => Phase::VegetativeGrowth,
        (10, 1..=20) => Phase::Flowering,
        (10, _) | (11, _) => Phase::Harvest,
        // month is always 1..=12
        (_, _) => Phase::Dormancy,
    }
}

pub fn phase_info(phase: Phase) -> PhaseInfo {
    let (description, care_tips) = match phase {
        Phase::Dormancy => (
            "Corms are dormant underground. Minimal activity.",
            DORMANCY_TIPS,
        ),
        Phase::VegetativeGrowth => ("Leaves emerge and grow. Corms develop.", VEGETATIVE_TIPS),
        Phase::Flowering => (
            "Purple flowers bloom. Critical period for saffron production.",
            FLOWERING_TIPS,
        ),
        Phase::Harvest => ("Active harvesting of saffron stigmas.", HARVEST_TIPS),
    };

    PhaseInfo {
        phase,
        description,
        care_tips,
    }
}

pub fn current_phase(today: NaiveDate) -> PhaseInfo {
    phase_info(phase_on(today))
}

/// Start date of `phase` in `year`. Saturates at the end of chrono's
/// representable range.
fn anchor(phase: Phase, year: i32) -> NaiveDate {
    let (month, day) = phase.start();
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MAX)
}

/// First start date of `phase` strictly after `today`.
fn next_anchor(phase: Phase, today: NaiveDate) -> NaiveDate {
    let this_year = anchor(phase, today.year());
    if this_year > today {
        this_year
    } else {
        anchor(phase, today.year() + 1)
    }
}

/// Nearest upcoming phase start, with the whole-day countdown to it.
pub fn next_transition(today: NaiveDate) -> TransitionInfo {
    let (next_phase, target_date) = Phase::BY_START
        .iter()
        .map(|&phase| (phase, next_anchor(phase, today)))
        .min_by_key(|&(_, date)| date)
        .unwrap_or((Phase::VegetativeGrowth, next_anchor(Phase::VegetativeGrowth, today)));

    let days = target_date.signed_duration_since(today).num_days();

    TransitionInfo {
        next_phase,
        days_until: u32::try_from(days).unwrap_or(u32::MAX),
        target_date,
    }
}

/// Parses a `YYYY-MM-DD` date supplied at a boundary (CLI flag, query).
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|e| AdvisorError::InvalidDate {
        input: input.to_string(),
        reason: e.to_string(),
    })
}
