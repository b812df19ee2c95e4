use crate::core::classifier::classify;
use crate::core::ranges::range_for;
use crate::core::season::{current_phase, next_transition};
use crate::domain::model::{MeasurementKind, Reading, ReferenceRange, Status};
use crate::domain::ports::{Clock, TelemetrySource};
use crate::utils::error::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingResponse {
    pub nitrogen: i64,
    pub phosphorus: i64,
    pub potassium: i64,
    pub soil_moisture: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonResponse {
    pub current_season: String,
    pub description: String,
    pub care_tips: Vec<String>,
    pub next_season: String,
    pub days_until_next: u32,
    pub next_season_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangesResponse {
    pub nitrogen: ReferenceRange,
    pub phosphorus: ReferenceRange,
    pub potassium: ReferenceRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldAssessment {
    pub value: i64,
    pub status: Status,
    pub range: ReferenceRange,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<Recommendation>,
}

/// Fertilizer guidance for one macronutrient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: String,
    pub dosage: String,
    pub timing: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Irrigation,
    Npk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Critical,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthGrade {
    Excellent,
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResponse {
    pub fields: BTreeMap<MeasurementKind, FieldAssessment>,
    pub health_score: u8,
    pub grade: HealthGrade,
    pub alerts: Vec<Alert>,
}

pub fn build_reading_response(reading: Reading) -> ReadingResponse {
    ReadingResponse {
        nitrogen: reading.nitrogen,
        phosphorus: reading.phosphorus,
        potassium: reading.potassium,
        soil_moisture: reading.soil_moisture,
    }
}

pub fn build_season_response(today: NaiveDate) -> SeasonResponse {
    let current = current_phase(today);
    let next = next_transition(today);

    SeasonResponse {
        current_season: current.phase.name().to_string(),
        description: current.description.to_string(),
        care_tips: current.care_tips.iter().map(|tip| tip.to_string()).collect(),
        next_season: next.next_phase.name().to_string(),
        days_until_next: next.days_until,
        next_season_date: next.date_label(),
    }
}

pub fn build_ranges_response() -> RangesResponse {
    RangesResponse {
        nitrogen: range_for(MeasurementKind::Nitrogen).clone(),
        phosphorus: range_for(MeasurementKind::Phosphorus).clone(),
        potassium: range_for(MeasurementKind::Potassium).clone(),
    }
}

pub fn build_assessment_response(reading: Reading) -> AssessmentResponse {
    let fields: BTreeMap<_, _> = MeasurementKind::SOIL
        .into_iter()
        .filter_map(|kind| {
            let value = reading.value(kind)?;
            let range = range_for(kind);
            let status = classify(value as f64, range);
            Some((
                kind,
                FieldAssessment {
                    value,
                    status,
                    range: range.clone(),
                    message: status_message(kind, status),
                    recommendation: recommendation_for(kind, status),
                },
            ))
        })
        .collect();

    let statuses: Vec<_> = fields.iter().map(|(kind, field)| (*kind, field.status)).collect();
    let health_score = health_score(statuses.iter().copied());

    AssessmentResponse {
        grade: grade_for(health_score),
        health_score,
        alerts: alerts_for(statuses),
        fields,
    }
}

/// Actionable alerts, dry soil first, then each deficient macronutrient in
/// N, P, K order, then a single alert for any macronutrient excess.
pub fn alerts_for(statuses: impl IntoIterator<Item = (MeasurementKind, Status)>) -> Vec<Alert> {
    let statuses: BTreeMap<_, _> = statuses.into_iter().collect();
    let status_of = |kind: MeasurementKind| statuses.get(&kind).copied();
    let mut alerts = Vec::new();

    if status_of(MeasurementKind::SoilMoisture) == Some(Status::Below) {
        alerts.push(Alert {
            kind: AlertKind::Irrigation,
            severity: AlertSeverity::Critical,
            message: "Moisture LOW → Turn ON irrigation".to_string(),
        });
    }

    for (kind, message) in [
        (MeasurementKind::Nitrogen, "Nitrogen LOW → Add Urea"),
        (MeasurementKind::Phosphorus, "Phosphorus LOW → Add DAP"),
        (MeasurementKind::Potassium, "Potassium LOW → Add Potash"),
    ] {
        if status_of(kind) == Some(Status::Below) {
            alerts.push(Alert {
                kind: AlertKind::Npk,
                severity: AlertSeverity::Warning,
                message: message.to_string(),
            });
        }
    }

    let excess = statuses
        .iter()
        .any(|(kind, status)| kind.is_macronutrient() && *status == Status::Above);
    if excess {
        alerts.push(Alert {
            kind: AlertKind::Npk,
            severity: AlertSeverity::Critical,
            message: "NPK VERY HIGH → Stop fertilizing".to_string(),
        });
    }

    alerts
}

/// Fertilizer plan for a macronutrient; `None` for every other kind.
pub fn recommendation_for(kind: MeasurementKind, status: Status) -> Option<Recommendation> {
    const MONITOR: &str = "Monitor weekly until levels normalize";
    const MAINTAIN: &str = "Maintain current fertilization schedule";

    let (action, dosage, timing) = match (kind, status) {
        (MeasurementKind::Nitrogen, Status::Below) => (
            "Apply Urea fertilizer",
            "20-30 kg/hectare",
            "Apply in split doses over 2 weeks",
        ),
        (MeasurementKind::Nitrogen, Status::Above) => {
            ("Stop all nitrogen fertilization", "N/A", MONITOR)
        }
        (MeasurementKind::Nitrogen, Status::InRange) => {
            (MAINTAIN, "10-15 kg/hectare monthly", "Regular maintenance")
        }
        (MeasurementKind::Phosphorus, Status::Below) => (
            "Apply DAP (Di-Ammonium Phosphate)",
            "15-20 kg/hectare",
            "Apply before flowering stage",
        ),
        (MeasurementKind::Phosphorus, Status::Above) => {
            ("Stop all phosphorus fertilization", "N/A", MONITOR)
        }
        (MeasurementKind::Phosphorus, Status::InRange) => {
            (MAINTAIN, "8-12 kg/hectare monthly", "Regular maintenance")
        }
        (MeasurementKind::Potassium, Status::Below) => (
            "Apply Potash (Muriate of Potash)",
            "20-25 kg/hectare",
            "Apply during vegetative growth",
        ),
        (MeasurementKind::Potassium, Status::Above) => {
            ("Stop all potassium fertilization", "N/A", MONITOR)
        }
        (MeasurementKind::Potassium, Status::InRange) => {
            (MAINTAIN, "10-15 kg/hectare monthly", "Regular maintenance")
        }
        _ => return None,
    };

    Some(Recommendation {
        action: action.to_string(),
        dosage: dosage.to_string(),
        timing: timing.to_string(),
    })
}

/// Field health on a 0..=100 scale. Moisture outside its band costs 30,
/// each deficient macronutrient 15, and any macronutrient excess 25 once.
pub fn health_score(statuses: impl IntoIterator<Item = (MeasurementKind, Status)>) -> u8 {
    let mut penalty: u32 = 0;
    let mut excess = false;

    for (kind, status) in statuses {
        match (kind, status) {
            (MeasurementKind::SoilMoisture, Status::Below | Status::Above) => penalty += 30,
            (kind, Status::Below) if kind.is_macronutrient() => penalty += 15,
            (kind, Status::Above) if kind.is_macronutrient() => excess = true,
            _ => {}
        }
    }
    if excess {
        penalty += 25;
    }

    100u32.saturating_sub(penalty) as u8
}

pub fn grade_for(score: u8) -> HealthGrade {
    match score {
        80..=u8::MAX => HealthGrade::Excellent,
        60..=79 => HealthGrade::Good,
        40..=59 => HealthGrade::Fair,
        _ => HealthGrade::Poor,
    }
}

fn status_message(kind: MeasurementKind, status: Status) -> String {
    let text = match (kind, status) {
        (MeasurementKind::SoilMoisture, Status::InRange) => "Soil moisture is at optimal levels",
        (MeasurementKind::SoilMoisture, Status::Below) => {
            "Soil moisture is too low - irrigation needed"
        }
        (MeasurementKind::SoilMoisture, Status::Above) => {
            "Soil moisture is too high - reduce watering"
        }
        (MeasurementKind::Nitrogen, Status::InRange) => "Nitrogen levels are balanced",
        (MeasurementKind::Nitrogen, Status::Below) => "Nitrogen deficiency detected",
        (MeasurementKind::Nitrogen, Status::Above) => "Excessive nitrogen - stop fertilization",
        (MeasurementKind::Phosphorus, Status::InRange) => "Phosphorus levels are adequate",
        (MeasurementKind::Phosphorus, Status::Below) => "Phosphorus deficiency detected",
        (MeasurementKind::Phosphorus, Status::Above) => {
            "Excessive phosphorus - stop fertilization"
        }
        (MeasurementKind::Potassium, Status::InRange) => "Potassium levels are adequate",
        (MeasurementKind::Potassium, Status::Below) => "Potassium deficiency detected",
        (MeasurementKind::Potassium, Status::Above) => "Excessive potassium - stop fertilization",
        (kind, status) => {
            let word = match status {
                Status::Below => "low",
                Status::InRange => "ok",
                Status::Above => "high",
            };
            return format!("{}: {}", kind, word);
        }
    };
    text.to_string()
}

/// Request-scoped façade over the telemetry source and the calendar.
/// Cheap to clone; shared as router state.
#[derive(Clone)]
pub struct AdvisoryService {
    source: Arc<dyn TelemetrySource>,
    clock: Arc<dyn Clock>,
}

impl AdvisoryService {
    pub fn new(source: Arc<dyn TelemetrySource>, clock: Arc<dyn Clock>) -> Self {
        Self { source, clock }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub async fn sensor_reading(&self) -> Result<ReadingResponse> {
        let reading = self.source.latest_reading().await?;
        tracing::debug!(?reading, "Fetched latest reading");
        Ok(build_reading_response(reading))
    }

    pub fn season(&self) -> SeasonResponse {
        build_season_response(self.today())
    }

    pub fn ranges(&self) -> RangesResponse {
        build_ranges_response()
    }

    pub async fn assessment(&self) -> Result<AssessmentResponse> {
        let reading = self.source.latest_reading().await?;
        let assessment = build_assessment_response(reading);
        tracing::debug!(
            score = assessment.health_score,
            grade = ?assessment.grade,
            alerts = assessment.alerts.len(),
            "Assessed latest reading"
        );
        Ok(assessment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(n: i64, p: i64, k: i64, m: i64) -> Reading {
        Reading {
            nitrogen: n,
            phosphorus: p,
            potassium: k,
            soil_moisture: m,
        }
    }

    #[test]
    fn test_reading_response_is_passthrough() {
        let response = build_reading_response(reading(40, 30, 180, 13));
        assert_eq!(response.nitrogen, 40);
        assert_eq!(response.phosphorus, 30);
        assert_eq!(response.potassium, 180);
        assert_eq!(response.soil_moisture, 13);
    }

    #[test]
    fn test_season_response_mid_october() {
        let today = NaiveDate::from_ymd_opt(2025, 10, 15).unwrap();
        let response = build_season_response(today);
        assert_eq!(response.current_season, "Flowering");
        assert_eq!(response.next_season, "Harvest");
        assert_eq!(response.days_until_next, 6);
        assert_eq!(response.next_season_date, "October 21");
        assert_eq!(response.care_tips.len(), 4);
    }

    #[test]
    fn test_ranges_response_shape() {
        let value = serde_json::to_value(build_ranges_response()).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert_eq!(value["nitrogen"]["unit"], "mg/kg");
        assert_eq!(value["potassium"]["high"], 200.0);
        assert!(obj.get("soil_moisture").is_none());
    }

    #[test]
    fn test_assessment_all_in_range() {
        let response = build_assessment_response(reading(40, 30, 180, 13));
        assert_eq!(response.health_score, 100);
        assert_eq!(response.grade, HealthGrade::Excellent);
        assert!(response
            .fields
            .values()
            .all(|field| field.status == Status::InRange));
        assert_eq!(
            response.fields[&MeasurementKind::Nitrogen].message,
            "Nitrogen levels are balanced"
        );
    }

    #[test]
    fn test_assessment_penalties() {
        // dry soil, nitrogen and phosphorus deficient, potassium in excess
        let response = build_assessment_response(reading(10, 5, 250, 3));
        assert_eq!(response.health_score, 100 - 30 - 15 - 15 - 25);
        assert_eq!(response.grade, HealthGrade::Poor);
        assert_eq!(
            response.fields[&MeasurementKind::SoilMoisture].message,
            "Soil moisture is too low - irrigation needed"
        );
        assert_eq!(
            response.fields[&MeasurementKind::Potassium].status,
            Status::Above
        );
    }

    #[test]
    fn test_excess_penalty_applies_once() {
        let score = health_score([
            (MeasurementKind::Nitrogen, Status::Above),
            (MeasurementKind::Phosphorus, Status::Above),
            (MeasurementKind::Potassium, Status::Above),
            (MeasurementKind::SoilMoisture, Status::InRange),
        ]);
        assert_eq!(score, 75);
        assert_eq!(grade_for(score), HealthGrade::Good);
    }

    #[test]
    fn test_grade_thresholds() {
        assert_eq!(grade_for(100), HealthGrade::Excellent);
        assert_eq!(grade_for(80), HealthGrade::Excellent);
        assert_eq!(grade_for(79), HealthGrade::Good);
        assert_eq!(grade_for(40), HealthGrade::Fair);
        assert_eq!(grade_for(39), HealthGrade::Poor);
        assert_eq!(grade_for(0), HealthGrade::Poor);
    }

    fn messages(alerts: &[Alert]) -> Vec<&str> {
        alerts.iter().map(|alert| alert.message.as_str()).collect()
    }

    #[test]
    fn test_no_alerts_when_everything_is_in_range() {
        let response = build_assessment_response(reading(40, 30, 180, 13));
        assert!(response.alerts.is_empty());
    }

    #[test]
    fn test_dry_soil_raises_critical_irrigation_alert() {
        let response = build_assessment_response(reading(40, 30, 180, 8));
        assert_eq!(
            response.alerts,
            vec![Alert {
                kind: AlertKind::Irrigation,
                severity: AlertSeverity::Critical,
                message: "Moisture LOW → Turn ON irrigation".to_string(),
            }]
        );
    }

    #[test]
    fn test_wet_soil_raises_no_alert() {
        let response = build_assessment_response(reading(40, 30, 180, 20));
        assert_eq!(
            response.fields[&MeasurementKind::SoilMoisture].status,
            Status::Above
        );
        assert!(response.alerts.is_empty());
    }

    #[test]
    fn test_each_deficiency_raises_a_warning() {
        let response = build_assessment_response(reading(10, 5, 100, 13));
        assert_eq!(
            messages(&response.alerts),
            vec![
                "Nitrogen LOW → Add Urea",
                "Phosphorus LOW → Add DAP",
                "Potassium LOW → Add Potash",
            ]
        );
        assert!(response
            .alerts
            .iter()
            .all(|alert| alert.kind == AlertKind::Npk && alert.severity == AlertSeverity::Warning));
    }

    #[test]
    fn test_excess_raises_one_critical_alert() {
        let response = build_assessment_response(reading(60, 50, 250, 13));
        assert_eq!(response.alerts.len(), 1);
        assert_eq!(response.alerts[0].kind, AlertKind::Npk);
        assert_eq!(response.alerts[0].severity, AlertSeverity::Critical);
        assert_eq!(response.alerts[0].message, "NPK VERY HIGH → Stop fertilizing");
    }

    #[test]
    fn test_alert_order_and_json_shape() {
        let response = build_assessment_response(reading(10, 30, 250, 3));
        assert_eq!(
            messages(&response.alerts),
            vec![
                "Moisture LOW → Turn ON irrigation",
                "Nitrogen LOW → Add Urea",
                "NPK VERY HIGH → Stop fertilizing",
            ]
        );
        let value = serde_json::to_value(&response.alerts[0]).unwrap();
        assert_eq!(value["type"], "irrigation");
        assert_eq!(value["severity"], "critical");
    }

    #[test]
    fn test_recommendations_for_low_nutrients() {
        let urea = recommendation_for(MeasurementKind::Nitrogen, Status::Below).unwrap();
        assert_eq!(urea.action, "Apply Urea fertilizer");
        assert_eq!(urea.dosage, "20-30 kg/hectare");
        assert_eq!(urea.timing, "Apply in split doses over 2 weeks");

        let dap = recommendation_for(MeasurementKind::Phosphorus, Status::Below).unwrap();
        assert_eq!(dap.action, "Apply DAP (Di-Ammonium Phosphate)");
        assert_eq!(dap.timing, "Apply before flowering stage");

        let potash = recommendation_for(MeasurementKind::Potassium, Status::Below).unwrap();
        assert_eq!(potash.action, "Apply Potash (Muriate of Potash)");
        assert_eq!(potash.dosage, "20-25 kg/hectare");
    }

    #[test]
    fn test_recommendations_for_high_nutrients() {
        for (kind, action) in [
            (MeasurementKind::Nitrogen, "Stop all nitrogen fertilization"),
            (MeasurementKind::Phosphorus, "Stop all phosphorus fertilization"),
            (MeasurementKind::Potassium, "Stop all potassium fertilization"),
        ] {
            let rec = recommendation_for(kind, Status::Above).unwrap();
            assert_eq!(rec.action, action);
            assert_eq!(rec.dosage, "N/A");
            assert_eq!(rec.timing, "Monitor weekly until levels normalize");
        }
    }

    #[test]
    fn test_recommendations_for_balanced_nutrients() {
        let n = recommendation_for(MeasurementKind::Nitrogen, Status::InRange).unwrap();
        let p = recommendation_for(MeasurementKind::Phosphorus, Status::InRange).unwrap();
        let k = recommendation_for(MeasurementKind::Potassium, Status::InRange).unwrap();
        assert_eq!(n.action, "Maintain current fertilization schedule");
        assert_eq!(n.dosage, "10-15 kg/hectare monthly");
        assert_eq!(p.dosage, "8-12 kg/hectare monthly");
        assert_eq!(k.dosage, "10-15 kg/hectare monthly");
        assert_eq!(k.timing, "Regular maintenance");
    }

    #[test]
    fn test_moisture_has_no_recommendation() {
        assert!(recommendation_for(MeasurementKind::SoilMoisture, Status::Below).is_none());
        let response = build_assessment_response(reading(40, 30, 180, 3));
        assert!(response.fields[&MeasurementKind::SoilMoisture]
            .recommendation
            .is_none());
        assert!(response.fields[&MeasurementKind::Nitrogen]
            .recommendation
            .is_some());
        let value = serde_json::to_value(&response).unwrap();
        assert!(value["fields"]["soil_moisture"].get("recommendation").is_none());
    }
}
