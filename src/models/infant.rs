//! Infants born of the current pregnancy, with their diagnoses and HIV
//! and syphilis screenings.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Infant {
    pub patient_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub dob: Option<String>,
}

impl Infant {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InfantDiagnosis {
    pub diagnosis_id: i64,
    pub patient_id: i64,
    pub diagnosis: Option<String>,
    pub doctor: Option<String>,
    pub comments: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HivScreening {
    pub id: i64,
    pub patient_id: i64,
    pub mother_id: i64,
    pub pregnancy_id: i64,
    pub test_name: Option<String>,
    pub screening_date: Option<String>,
    pub due_date: Option<String>,
    pub date_sample_taken: Option<String>,
    pub sample_code: Option<String>,
    pub date_sample_shipped: Option<String>,
    pub destination: Option<String>,
    pub date_sample_received_at_hq: Option<String>,
    pub date_result_received: Option<String>,
    pub result: Option<String>,
    pub date_result_shared: Option<String>,
    pub timely: Option<bool>,
}

/// One syphilis lab screening for an infant. Unlike HIV screenings these
/// are derived from lab orders, so there is no shipping chain and the
/// timeliness column arrives as text.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyphilisScreening {
    pub id: i64,
    pub test_name: Option<String>,
    pub result: Option<String>,
    pub screening_date: Option<String>,
    pub date_result_received: Option<String>,
    pub date_sample_taken: Option<String>,
    pub timely: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hiv_screening() {
        let json = r#"{
            "id": 77,
            "patientId": 2222233,
            "motherId": 1111120,
            "pregnancyId": 44,
            "testName": "PCR 1",
            "screeningDate": "2020-02-20T00:00:00Z",
            "dueDate": "2020-02-15T00:00:00Z",
            "dateSampleTaken": "2020-02-20T00:00:00Z",
            "sampleCode": "BZ-0441",
            "result": "Negative",
            "timely": false
        }"#;

        let screening: HivScreening = serde_json::from_str(json).expect("parse hiv screening");
        assert_eq!(screening.test_name.as_deref(), Some("PCR 1"));
        assert_eq!(screening.mother_id, 1111120);
        assert_eq!(screening.timely, Some(false));
    }

    #[test]
    fn test_parse_syphilis_screening() {
        let json = r#"{
            "id": 310,
            "testName": "VDRL",
            "result": "Non-Reactive",
            "screeningDate": "2020-03-02T00:00:00Z",
            "dateResultReceived": "2020-03-09T00:00:00Z",
            "dateSampleTaken": null,
            "timely": "N/A"
        }"#;

        let screening: SyphilisScreening =
            serde_json::from_str(json).expect("parse syphilis screening");
        assert_eq!(screening.test_name.as_deref(), Some("VDRL"));
        assert_eq!(screening.result.as_deref(), Some("Non-Reactive"));
        assert!(screening.date_sample_taken.is_none());
    }

    #[test]
    fn test_infant_display_name() {
        let infant = Infant {
            first_name: "Ana".to_string(),
            last_name: "Smith".to_string(),
            ..Default::default()
        };
        assert_eq!(infant.display_name(), "Ana Smith");
    }
}
