//! Pregnancy vitals and the derived figures shown on the Pregnancy tab.

use chrono::NaiveDate;
use serde::Deserialize;

use super::patient::ObstetricEvent;
use crate::utils::format_gestational_age;

/// Vitals for the patient's current (open) pregnancy.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CurrentPregnancy {
    pub id: i64,
    pub patient_id: i64,
    /// Gestational age in days at the time of the first ANC encounter.
    pub gestational_age: Option<i64>,
    pub para: Option<i64>,
    pub cs: Option<i64>,
    pub planned: Option<bool>,
    pub age_at_lmp: Option<i64>,
    pub lmp: Option<String>,
    pub edd: Option<String>,
    pub pregnancy_outcome: Option<String>,
    pub diagnosis_date: Option<String>,
    pub apgar_first_minute: Option<i64>,
    pub apgar_fifth_minute: Option<i64>,
}

impl CurrentPregnancy {
    pub fn lmp_date(&self) -> Option<NaiveDate> {
        let lmp = self.lmp.as_ref()?;
        NaiveDate::parse_from_str(lmp.get(..10)?, "%Y-%m-%d").ok()
    }
}

/// One row of the patient's pregnancy history.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pregnancy {
    pub id: i64,
    pub patient_id: i64,
    pub lmp: Option<String>,
    pub edd: Option<String>,
    pub end_time: Option<String>,
}

/// Current pregnancy plus the display figures derived from it. Rebuilt from
/// scratch on every fetch; nothing here is cached across navigations.
#[derive(Debug, Clone, Default)]
pub struct PregnancySummary {
    pub pregnancy: CurrentPregnancy,
    pub gestational_age_label: String,
    pub interval_days: i64,
}

impl PregnancySummary {
    pub fn derive(pregnancy: CurrentPregnancy, history: &[ObstetricEvent]) -> Self {
        let gestational_age_label = format_gestational_age(pregnancy.gestational_age);
        let interval_days = obstetric_interval_days(history, pregnancy.lmp_date());
        Self {
            pregnancy,
            gestational_age_label,
            interval_days,
        }
    }
}

/// Days between the most recent obstetric event and the current LMP.
///
/// `history` is sorted most recent first. When the subtraction comes out
/// negative and an older event exists, the gap between the two most recent
/// events is used instead. This fallback is longstanding clinic convention;
/// keep it as is. The result never goes below zero.
pub fn obstetric_interval_days(history: &[ObstetricEvent], lmp: Option<NaiveDate>) -> i64 {
    let Some(latest) = history.first().and_then(|e| e.event_date()) else {
        return 0;
    };
    let Some(lmp) = lmp else {
        return 0;
    };

    let mut interval = (lmp - latest).num_days();
    if interval < 0 {
        if let Some(previous) = history.get(1).and_then(|e| e.event_date()) {
            interval = (latest - previous).num_days();
        }
    }
    interval.max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(date: &str) -> ObstetricEvent {
        ObstetricEvent {
            date: Some(date.to_string()),
            ..Default::default()
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_interval_empty_history() {
        assert_eq!(obstetric_interval_days(&[], Some(date("2020-04-21"))), 0);
    }

    #[test]
    fn test_interval_missing_lmp() {
        assert_eq!(obstetric_interval_days(&[event("2020-04-01")], None), 0);
    }

    #[test]
    fn test_interval_simple() {
        let history = [event("2020-04-01")];
        assert_eq!(
            obstetric_interval_days(&history, Some(date("2020-04-21"))),
            20
        );
    }

    #[test]
    fn test_interval_fallback_to_prior_events() {
        // LMP before the most recent event: use the gap between the two
        // most recent events instead.
        let history = [event("2020-04-21"), event("2019-01-01")];
        assert_eq!(
            obstetric_interval_days(&history, Some(date("2020-04-01"))),
            476
        );
    }

    #[test]
    fn test_interval_never_negative() {
        // Negative with no second event to fall back to
        let history = [event("2020-04-21")];
        assert_eq!(
            obstetric_interval_days(&history, Some(date("2020-04-01"))),
            0
        );
    }

    #[test]
    fn test_interval_unparseable_latest_date() {
        let history = [event("garbage")];
        assert_eq!(
            obstetric_interval_days(&history, Some(date("2020-04-21"))),
            0
        );
    }

    #[test]
    fn test_summary_derivation() {
        let pregnancy = CurrentPregnancy {
            gestational_age: Some(10),
            lmp: Some("2020-04-21".to_string()),
            ..Default::default()
        };
        let history = [event("2020-04-01")];
        let summary = PregnancySummary::derive(pregnancy, &history);
        assert_eq!(summary.gestational_age_label, "2 weeks");
        assert_eq!(summary.interval_days, 20);
    }

    #[test]
    fn test_parse_current_pregnancy() {
        let json = r#"{
            "id": 44,
            "patientId": 1111120,
            "gestationalAge": 63,
            "para": 2,
            "cs": 0,
            "planned": false,
            "ageAtLmp": 27,
            "lmp": "2020-04-21T00:00:00Z",
            "edd": "2021-01-26T00:00:00Z",
            "pregnancyOutcome": "",
            "diagnosisDate": "2020-06-23T00:00:00Z"
        }"#;

        let pregnancy: CurrentPregnancy = serde_json::from_str(json).expect("parse pregnancy");
        assert_eq!(pregnancy.id, 44);
        assert_eq!(pregnancy.gestational_age, Some(63));
        assert_eq!(pregnancy.lmp_date(), NaiveDate::from_ymd_opt(2020, 4, 21));
    }
}
