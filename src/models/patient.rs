use chrono::{Datelike, NaiveDate, Utc};
use serde::Deserialize;

/// Basic patient demographics as returned by the API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Patient {
    pub id: i64,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub dob: Option<String>,
    pub ssn: Option<String>,
    pub country_of_birth: Option<String>,
    pub district: Option<String>,
    pub community: Option<String>,
    pub address: Option<String>,
    pub education: Option<String>,
    pub ethnicity: Option<String>,
    pub hiv: Option<bool>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        match self.middle_name {
            Some(ref middle) if !middle.is_empty() => {
                format!("{} {} {}", self.first_name, middle, self.last_name)
            }
            _ => format!("{} {}", self.first_name, self.last_name),
        }
    }

    pub fn date_of_birth(&self) -> Option<NaiveDate> {
        let dob = self.dob.as_ref()?;
        NaiveDate::parse_from_str(dob.get(..10)?, "%Y-%m-%d").ok()
    }

    /// Age in whole years, or None if the date of birth is missing/unparseable
    pub fn age(&self) -> Option<i32> {
        let dob = self.date_of_birth()?;
        let today = Utc::now().date_naive();
        let mut age = today.year() - dob.year();
        if (today.month(), today.day()) < (dob.month(), dob.day()) {
            age -= 1;
        }
        Some(age)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NextOfKin {
    pub patient_id: i64,
    pub name: Option<String>,
    pub phone_number: Option<String>,
}

/// One entry in a patient's obstetric history (delivery, miscarriage, etc.),
/// sorted most recent first by the server.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObstetricEvent {
    pub id: i64,
    pub patient_id: i64,
    pub event: String,
    pub date: Option<String>,
}

impl ObstetricEvent {
    pub fn event_date(&self) -> Option<NaiveDate> {
        let date = self.date.as_ref()?;
        NaiveDate::parse_from_str(date.get(..10)?, "%Y-%m-%d").ok()
    }
}

/// Full response from `GET /patients/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientRecord {
    pub patient: Patient,
    pub next_of_kins: Vec<NextOfKin>,
    pub obstetric_history: Vec<ObstetricEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        let patient = Patient {
            first_name: "Maria".to_string(),
            middle_name: Some("Elena".to_string()),
            last_name: "Garcia".to_string(),
            ..Default::default()
        };
        assert_eq!(patient.full_name(), "Maria Elena Garcia");

        let no_middle = Patient {
            first_name: "Ana".to_string(),
            last_name: "Tzul".to_string(),
            ..Default::default()
        };
        assert_eq!(no_middle.full_name(), "Ana Tzul");
    }

    #[test]
    fn test_parse_patient_record() {
        let json = r#"{
            "patient": {
                "id": 1111120,
                "firstName": "Maria",
                "lastName": "Garcia",
                "dob": "1992-03-15T00:00:00Z",
                "district": "Cayo",
                "community": "San Ignacio",
                "education": "Secondary",
                "hiv": true
            },
            "nextOfKins": [
                {"patientId": 1111120, "name": "Jose Garcia", "phoneNumber": "6101234"}
            ],
            "obstetricHistory": [
                {"id": 9, "patientId": 1111120, "event": "Live Born", "date": "2020-04-01T00:00:00Z"}
            ]
        }"#;

        let record: PatientRecord = serde_json::from_str(json).expect("parse patient record");
        assert_eq!(record.patient.id, 1111120);
        assert_eq!(record.patient.district.as_deref(), Some("Cayo"));
        assert_eq!(record.patient.hiv, Some(true));
        assert_eq!(record.next_of_kins.len(), 1);
        assert_eq!(record.obstetric_history.len(), 1);
        assert_eq!(
            record.obstetric_history[0].event_date(),
            NaiveDate::from_ymd_opt(2020, 4, 1)
        );
    }

    #[test]
    fn test_event_date_unparseable() {
        let event = ObstetricEvent {
            date: Some("not-a-date".to_string()),
            ..Default::default()
        };
        assert!(event.event_date().is_none());

        let missing = ObstetricEvent::default();
        assert!(missing.event_date().is_none());
    }
}
