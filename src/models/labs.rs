use serde::Deserialize;

/// A lab result released for the current pregnancy.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabResult {
    pub test_request_item_id: i64,
    pub test_request_id: i64,
    pub patient_id: i64,
    pub test_name: Option<String>,
    pub test_result: Option<String>,
    pub date_sample_taken: Option<String>,
    pub date_order_received_by_lab: Option<String>,
    pub result_date: Option<String>,
    pub released_time: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lab_results() {
        let json = r#"[
            {
                "testRequestItemId": 901,
                "testRequestId": 90,
                "patientId": 1111120,
                "testName": "Hemoglobin",
                "testResult": "11.2",
                "dateSampleTaken": "2020-07-01T00:00:00Z",
                "resultDate": "2020-07-03T00:00:00Z",
                "releasedTime": "2020-07-03T14:05:00Z"
            }
        ]"#;

        let results: Vec<LabResult> = serde_json::from_str(json).expect("parse lab results");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].test_name.as_deref(), Some("Hemoglobin"));
        assert_eq!(results[0].test_result.as_deref(), Some("11.2"));
    }
}
