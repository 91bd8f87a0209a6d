//! Home visits and hospital admissions recorded during a pregnancy.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HomeVisit {
    pub id: i64,
    pub patient_id: i64,
    pub pregnancy_id: i64,
    pub reason: Option<String>,
    pub comments: Option<String>,
    pub date_of_visit: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

/// Payload for creating or updating a home visit. An edit sends the visit
/// id in the body; a create omits it and lets the server assign one.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeVisitPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub patient_id: i64,
    pub pregnancy_id: i64,
    pub reason: String,
    pub comments: String,
    pub date_of_visit: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HospitalAdmission {
    pub id: i64,
    pub patient_id: i64,
    pub pregnancy_id: i64,
    pub date_admitted: Option<String>,
    pub facility: Option<String>,
    pub reason: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_home_visit() {
        let json = r#"{
            "id": 12,
            "patientId": 1111120,
            "pregnancyId": 44,
            "reason": "Routine follow up",
            "comments": "Patient doing well",
            "dateOfVisit": "2020-08-12T00:00:00Z",
            "createdBy": "nurse@health.gov.bz"
        }"#;

        let visit: HomeVisit = serde_json::from_str(json).expect("parse home visit");
        assert_eq!(visit.id, 12);
        assert_eq!(visit.pregnancy_id, 44);
        assert_eq!(visit.reason.as_deref(), Some("Routine follow up"));
    }

    #[test]
    fn test_serialize_visit_payload() {
        let payload = HomeVisitPayload {
            id: None,
            patient_id: 1111120,
            pregnancy_id: 44,
            reason: "Missed appointment".to_string(),
            comments: String::new(),
            date_of_visit: "2020-09-01".to_string(),
        };

        let json = serde_json::to_value(&payload).expect("serialize payload");
        assert_eq!(json["patientId"], 1111120);
        assert_eq!(json["dateOfVisit"], "2020-09-01");
        // Creates must not send an id field at all
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_edit_payload_carries_visit_id() {
        let payload = HomeVisitPayload {
            id: Some(12),
            patient_id: 1111120,
            pregnancy_id: 44,
            reason: "Follow up".to_string(),
            comments: "Rescheduled".to_string(),
            date_of_visit: "2020-09-08".to_string(),
        };

        let json = serde_json::to_value(&payload).expect("serialize payload");
        assert_eq!(json["id"], 12);
        assert_eq!(json["pregnancyId"], 44);
    }
}
