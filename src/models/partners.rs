//! Partner follow-up records: syphilis treatments and contact tracing.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartnerSyphilisTreatment {
    pub id: i64,
    pub patient_id: i64,
    pub pregnancy_id: i64,
    pub medication: Option<String>,
    pub dosage: Option<String>,
    pub comments: Option<String>,
    pub date: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactTracing {
    pub id: i64,
    pub patient_id: i64,
    pub pregnancy_id: i64,
    pub test: Option<String>,
    pub test_result: Option<String>,
    pub comments: Option<String>,
    pub date: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_contact_tracing() {
        let json = r#"{
            "id": 3,
            "patientId": 1111120,
            "pregnancyId": 44,
            "test": "VDRL",
            "testResult": "Non-reactive",
            "comments": "Partner tested at clinic",
            "date": "2020-10-05T00:00:00Z"
        }"#;

        let tracing: ContactTracing = serde_json::from_str(json).expect("parse contact tracing");
        assert_eq!(tracing.test.as_deref(), Some("VDRL"));
        assert_eq!(tracing.test_result.as_deref(), Some("Non-reactive"));
    }
}
