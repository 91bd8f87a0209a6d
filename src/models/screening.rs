//! The missing-PCRs report: raw screening records keyed by infant, and the
//! consolidation that folds them into one row per infant.

use serde::Deserialize;

/// Infant screening tests promoted to dedicated report columns.
const REPORT_TESTS: [&str; 4] = ["PCR 1", "PCR 2", "PCR 3", "ELISA"];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportMother {
    pub first_name: String,
    pub last_name: String,
    pub dob: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportInfant {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub dob: Option<String>,
    pub mother: ReportMother,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportScreening {
    pub test_name: String,
    pub due_date: Option<String>,
    pub date_sample_taken: Option<String>,
}

/// One raw record from `GET /reports/missingPcrs/{year}`: a single screening
/// for a single infant. An infant typically appears in several records.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScreeningRecord {
    pub infant: ReportInfant,
    pub screening: ReportScreening,
}

/// One consolidated report row per infant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsolidatedInfantScreening {
    pub infant_id: i64,
    pub infant_name: String,
    pub infant_dob: Option<String>,
    pub mother_name: String,
    pub mother_dob: Option<String>,
    pub pcr1_due_date: Option<String>,
    pub pcr1_date_sample_taken: Option<String>,
    pub pcr2_due_date: Option<String>,
    pub pcr2_date_sample_taken: Option<String>,
    pub pcr3_due_date: Option<String>,
    pub pcr3_date_sample_taken: Option<String>,
    pub elisa_due_date: Option<String>,
    pub elisa_date_sample_taken: Option<String>,
}

/// Fold raw per-test records into one row per distinct infant.
///
/// Rows come out in first-occurrence order of each infant id. Descriptive
/// fields are taken from the infant's first record. For each named test the
/// first matching record supplies the due date and sample date; infants
/// without that test get None for both. Test names not in the report set are
/// ignored.
pub fn consolidate_screenings(records: &[ScreeningRecord]) -> Vec<ConsolidatedInfantScreening> {
    let mut infant_ids: Vec<i64> = Vec::new();
    for record in records {
        if !infant_ids.contains(&record.infant.id) {
            infant_ids.push(record.infant.id);
        }
    }

    infant_ids
        .into_iter()
        .map(|infant_id| {
            let for_infant: Vec<&ScreeningRecord> = records
                .iter()
                .filter(|r| r.infant.id == infant_id)
                .collect();
            // Non-empty by construction: the id came from one of these records
            let first = for_infant[0];

            let find_test = |name: &str| -> (Option<String>, Option<String>) {
                match for_infant.iter().find(|r| r.screening.test_name == name) {
                    Some(r) => (
                        r.screening.due_date.clone(),
                        r.screening.date_sample_taken.clone(),
                    ),
                    None => (None, None),
                }
            };

            let (pcr1_due_date, pcr1_date_sample_taken) = find_test(REPORT_TESTS[0]);
            let (pcr2_due_date, pcr2_date_sample_taken) = find_test(REPORT_TESTS[1]);
            let (pcr3_due_date, pcr3_date_sample_taken) = find_test(REPORT_TESTS[2]);
            let (elisa_due_date, elisa_date_sample_taken) = find_test(REPORT_TESTS[3]);

            ConsolidatedInfantScreening {
                infant_id,
                infant_name: format!("{} {}", first.infant.first_name, first.infant.last_name),
                infant_dob: first.infant.dob.clone(),
                mother_name: format!(
                    "{} {}",
                    first.infant.mother.first_name, first.infant.mother.last_name
                ),
                mother_dob: first.infant.mother.dob.clone(),
                pcr1_due_date,
                pcr1_date_sample_taken,
                pcr2_due_date,
                pcr2_date_sample_taken,
                pcr3_due_date,
                pcr3_date_sample_taken,
                elisa_due_date,
                elisa_date_sample_taken,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(infant_id: i64, name: &str, test: &str, due: &str, taken: &str) -> ScreeningRecord {
        ScreeningRecord {
            infant: ReportInfant {
                id: infant_id,
                first_name: name.to_string(),
                last_name: "Smith".to_string(),
                dob: Some("2020-01-15".to_string()),
                mother: ReportMother {
                    first_name: "Mother".to_string(),
                    last_name: "Smith".to_string(),
                    dob: Some("1995-06-01".to_string()),
                },
            },
            screening: ReportScreening {
                test_name: test.to_string(),
                due_date: Some(due.to_string()),
                date_sample_taken: Some(taken.to_string()),
            },
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(consolidate_screenings(&[]).is_empty());
    }

    #[test]
    fn test_one_row_per_infant_first_occurrence_order() {
        let records = vec![
            record(7, "Ana", "PCR 1", "2020-02-01", "2020-02-03"),
            record(3, "Ben", "PCR 1", "2020-03-01", "2020-03-02"),
            record(7, "Ana", "PCR 2", "2020-03-15", "2020-03-16"),
            record(3, "Ben", "ELISA", "2021-07-01", "2021-07-05"),
            record(7, "Ana", "PCR 3", "2020-07-15", "2020-07-20"),
        ];

        let rows = consolidate_screenings(&records);
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].infant_id, 7);
        assert_eq!(rows[0].infant_name, "Ana Smith");
        assert_eq!(rows[0].mother_name, "Mother Smith");
        assert_eq!(rows[0].pcr1_due_date.as_deref(), Some("2020-02-01"));
        assert_eq!(rows[0].pcr2_date_sample_taken.as_deref(), Some("2020-03-16"));
        assert_eq!(rows[0].pcr3_due_date.as_deref(), Some("2020-07-15"));
        assert!(rows[0].elisa_due_date.is_none());
        assert!(rows[0].elisa_date_sample_taken.is_none());

        assert_eq!(rows[1].infant_id, 3);
        assert_eq!(rows[1].pcr1_date_sample_taken.as_deref(), Some("2020-03-02"));
        assert!(rows[1].pcr2_due_date.is_none());
        assert_eq!(rows[1].elisa_due_date.as_deref(), Some("2021-07-01"));
    }

    #[test]
    fn test_unknown_test_names_ignored() {
        let records = vec![record(1, "Ana", "Rapid Test", "2020-02-01", "2020-02-03")];
        let rows = consolidate_screenings(&records);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].pcr1_due_date.is_none());
        assert!(rows[0].pcr2_due_date.is_none());
        assert!(rows[0].pcr3_due_date.is_none());
        assert!(rows[0].elisa_due_date.is_none());
    }

    #[test]
    fn test_reordering_input_yields_same_rows() {
        let records = vec![
            record(7, "Ana", "PCR 1", "2020-02-01", "2020-02-03"),
            record(3, "Ben", "PCR 2", "2020-03-01", "2020-03-02"),
            record(7, "Ana", "ELISA", "2021-07-01", "2021-07-05"),
        ];
        let mut reversed = records.clone();
        reversed.reverse();

        let mut rows_a = consolidate_screenings(&records);
        let mut rows_b = consolidate_screenings(&reversed);
        rows_a.sort_by_key(|r| r.infant_id);
        rows_b.sort_by_key(|r| r.infant_id);
        assert_eq!(rows_a, rows_b);
    }

    #[test]
    fn test_parse_report_record() {
        let json = r#"{
            "infant": {
                "id": 2222233,
                "firstName": "Ana",
                "lastName": "Smith",
                "dob": "2020-01-15T00:00:00Z",
                "mother": {"firstName": "Mother", "lastName": "Smith", "dob": "1995-06-01T00:00:00Z"}
            },
            "screening": {
                "testName": "PCR 1",
                "dueDate": "2020-02-15T00:00:00Z",
                "dateSampleTaken": null
            }
        }"#;

        let record: ScreeningRecord = serde_json::from_str(json).expect("parse screening record");
        assert_eq!(record.infant.id, 2222233);
        assert_eq!(record.screening.test_name, "PCR 1");
        assert!(record.screening.date_sample_taken.is_none());
    }
}
