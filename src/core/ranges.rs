use crate::domain::model::{MeasurementKind, ReferenceRange};

pub static NITROGEN: ReferenceRange = ReferenceRange::new(30.0, 50.0, "mg/kg");
pub static PHOSPHORUS: ReferenceRange = ReferenceRange::new(20.0, 40.0, "mg/kg");
pub static POTASSIUM: ReferenceRange = ReferenceRange::new(150.0, 200.0, "mg/kg");
pub static SOIL_MOISTURE: ReferenceRange = ReferenceRange::new(12.0, 15.0, "%");
pub static TEMPERATURE: ReferenceRange = ReferenceRange::new(10.0, 40.0, "°C");
pub static HUMIDITY: ReferenceRange = ReferenceRange::new(30.0, 90.0, "%");
pub static ELECTRICAL_CONDUCTIVITY: ReferenceRange = ReferenceRange::new(0.2, 2.0, "dS/m");

pub fn range_for(kind: MeasurementKind) -> &'static ReferenceRange {
    match kind {
        MeasurementKind::Nitrogen => &NITROGEN,
        MeasurementKind::Phosphorus => &PHOSPHORUS,
        MeasurementKind::Potassium => &POTASSIUM,
        MeasurementKind::SoilMoisture => &SOIL_MOISTURE,
        MeasurementKind::Temperature => &TEMPERATURE,
        MeasurementKind::Humidity => &HUMIDITY,
        MeasurementKind::ElectricalConductivity => &ELECTRICAL_CONDUCTIVITY,
    }
}
