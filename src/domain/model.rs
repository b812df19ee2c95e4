use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Latest soil reading taken from the telemetry channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    pub nitrogen: i64,
    pub phosphorus: i64,
    pub potassium: i64,
    pub soil_moisture: i64,
}

impl Reading {
    /// Value for a soil measurement; `None` for kinds this reading does not carry.
    pub fn value(&self, kind: MeasurementKind) -> Option<i64> {
        match kind {
            MeasurementKind::Nitrogen => Some(self.nitrogen),
            MeasurementKind::Phosphorus => Some(self.phosphorus),
            MeasurementKind::Potassium => Some(self.potassium),
            MeasurementKind::SoilMoisture => Some(self.soil_moisture),
            MeasurementKind::Temperature
            | MeasurementKind::Humidity
            | MeasurementKind::ElectricalConductivity => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementKind {
    Nitrogen,
    Phosphorus,
    Potassium,
    SoilMoisture,
    Temperature,
    Humidity,
    ElectricalConductivity,
}

impl MeasurementKind {
    pub const ALL: [MeasurementKind; 7] = [
        MeasurementKind::Nitrogen,
        MeasurementKind::Phosphorus,
        MeasurementKind::Potassium,
        MeasurementKind::SoilMoisture,
        MeasurementKind::Temperature,
        MeasurementKind::Humidity,
        MeasurementKind::ElectricalConductivity,
    ];

    /// Kinds delivered by the soil sensor.
    pub const SOIL: [MeasurementKind; 4] = [
        MeasurementKind::Nitrogen,
        MeasurementKind::Phosphorus,
        MeasurementKind::Potassium,
        MeasurementKind::SoilMoisture,
    ];

    pub fn key(self) -> &'static str {
        match self {
            MeasurementKind::Nitrogen => "nitrogen",
            MeasurementKind::Phosphorus => "phosphorus",
            MeasurementKind::Potassium => "potassium",
            MeasurementKind::SoilMoisture => "soil_moisture",
            MeasurementKind::Temperature => "temperature",
            MeasurementKind::Humidity => "humidity",
            MeasurementKind::ElectricalConductivity => "electrical_conductivity",
        }
    }

    pub fn is_macronutrient(self) -> bool {
        matches!(
            self,
            MeasurementKind::Nitrogen | MeasurementKind::Phosphorus | MeasurementKind::Potassium
        )
    }
}

impl fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Agronomically acceptable band `[low, high]` for one measurement kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRange {
    pub low: f64,
    pub high: f64,
    pub unit: Cow<'static, str>,
}

impl ReferenceRange {
    pub const fn new(low: f64, high: f64, unit: &'static str) -> Self {
        Self {
            low,
            high,
            unit: Cow::Borrowed(unit),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "low")]
    Below,
    #[serde(rename = "ok")]
    InRange,
    #[serde(rename = "high")]
    Above,
}

/// Cultivation stage of the saffron crop cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    #[serde(rename = "Dormancy")]
    Dormancy,
    #[serde(rename = "Vegetative Growth")]
    VegetativeGrowth,
    #[serde(rename = "Flowering")]
    Flowering,
    #[serde(rename = "Harvest")]
    Harvest,
}

impl Phase {
    /// Phases in the order their start dates fall within a calendar year.
    pub const BY_START: [Phase; 4] = [
        Phase::VegetativeGrowth,
        Phase::Flowering,
        Phase::Harvest,
        Phase::Dormancy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Phase::Dormancy => "Dormancy",
            Phase::VegetativeGrowth => "Vegetative Growth",
            Phase::Flowering => "Flowering",
            Phase::Harvest => "Harvest",
        }
    }

    /// Month and day on which the phase begins.
    pub fn start(self) -> (u32, u32) {
        match self {
            Phase::VegetativeGrowth => (6, 1),
            Phase::Flowering => (10, 1),
            Phase::Harvest => (10, 21),
            Phase::Dormancy => (12, 1),
        }
    }

    pub fn next(self) -> Phase {
        match self {
            Phase::Dormancy => Phase::VegetativeGrowth,
            Phase::VegetativeGrowth => Phase::Flowering,
            Phase::Flowering => Phase::Harvest,
            Phase::Harvest => Phase::Dormancy,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseInfo {
    pub phase: Phase,
    pub description: &'static str,
    pub care_tips: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransitionInfo {
    pub next_phase: Phase,
    pub days_until: u32,
    pub target_date: NaiveDate,
}

impl TransitionInfo {
    /// Year-less label such as "October 21".
    pub fn date_label(&self) -> String {
        self.target_date.format("%B %d").to_string()
    }
}
