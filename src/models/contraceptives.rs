use serde::Deserialize;

/// A contraceptive method recorded for a pregnancy (typically postpartum).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContraceptiveUsed {
    pub id: i64,
    pub patient_id: i64,
    pub pregnancy_id: i64,
    pub contraceptive: Option<String>,
    pub comments: Option<String>,
    pub date_used: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_contraceptive() {
        let json = r#"{
            "id": 5,
            "patientId": 1111120,
            "pregnancyId": 44,
            "contraceptive": "Condom",
            "comments": "",
            "dateUsed": "2021-02-10T00:00:00Z"
        }"#;

        let used: ContraceptiveUsed = serde_json::from_str(json).expect("parse contraceptive");
        assert_eq!(used.contraceptive.as_deref(), Some("Condom"));
        assert_eq!(used.pregnancy_id, 44);
    }
}
