//! API client for communicating with the EMTCT REST API.
//!
//! This module provides the `ApiClient` struct for making authenticated
//! requests for patient, pregnancy, infant, and report data. Every screen
//! fetches fresh data through these methods on entry; nothing is cached or
//! retried here.

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::auth::SessionData;
use crate::models::{
    ContactTracing, ContraceptiveUsed, CurrentPregnancy, HivScreening, HomeVisit,
    HomeVisitPayload, HospitalAdmission, Infant, InfantDiagnosis, LabResult,
    PartnerSyphilisTreatment, PatientRecord, Pregnancy, ScreeningRecord, SyphilisScreening,
};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Default base URL for the EMTCT API
const DEFAULT_BASE_URL: &str = "https://emtct.health.gov.bz/api";

/// HTTP request timeout in seconds.
/// 30s allows for slow clinic connections while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(rename = "accessToken")]
    access_token: String,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// The infant syphilis screenings endpoint wraps its list in an envelope
/// that repeats the infant's demographics.
#[derive(Debug, Deserialize)]
struct SyphilisScreeningsResponse {
    #[serde(default)]
    screenings: Option<Vec<SyphilisScreening>>,
}

/// API client for the EMTCT service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client against the given base URL
    pub fn new(base_url: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            token: None,
        })
    }

    /// Set the bearer token for authenticated requests
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    /// Authenticate against the login endpoint and return session data
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<SessionData> {
        let url = format!("{}/auth/login", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&LoginRequest { email, password })
            .send()
            .await
            .context("Failed to send authentication request")?;

        let response = Self::check_response(response).await?;

        let auth: AuthResponse = response.json().await.context("Failed to parse auth response")?;

        Ok(SessionData {
            token: auth.access_token,
            email: email.to_string(),
            created_at: Utc::now(),
        })
    }

    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = self.token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send POST request to {}", url))?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .put(&url)
            .headers(self.auth_headers()?)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send PUT request to {}", url))?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    // ===== Data Fetching Methods =====

    /// Fetch a patient's demographics, next of kin, and obstetric history
    pub async fn fetch_patient(&self, patient_id: i64) -> Result<PatientRecord> {
        self.get(&format!("/patients/{}", patient_id)).await
    }

    /// Fetch the patient's current (open) pregnancy vitals
    pub async fn fetch_current_pregnancy(&self, patient_id: i64) -> Result<CurrentPregnancy> {
        self.get(&format!("/patients/{}/currentPregnancy", patient_id))
            .await
    }

    /// Fetch all of the patient's past and present pregnancies
    pub async fn fetch_pregnancies(&self, patient_id: i64) -> Result<Vec<Pregnancy>> {
        let pregnancies: Option<Vec<Pregnancy>> =
            self.get(&format!("/patients/{}/pregnancies", patient_id)).await?;
        Ok(pregnancies.unwrap_or_default())
    }

    /// Fetch lab results released during a pregnancy
    pub async fn fetch_lab_results(
        &self,
        patient_id: i64,
        pregnancy_id: i64,
    ) -> Result<Vec<LabResult>> {
        let results: Option<Vec<LabResult>> = self
            .get(&format!(
                "/patients/{}/pregnancy/{}/labResults",
                patient_id, pregnancy_id
            ))
            .await?;
        Ok(results.unwrap_or_default())
    }

    /// Fetch home visits recorded during a pregnancy
    pub async fn fetch_home_visits(
        &self,
        patient_id: i64,
        pregnancy_id: i64,
    ) -> Result<Vec<HomeVisit>> {
        let visits: Option<Vec<HomeVisit>> = self
            .get(&format!(
                "/patients/{}/pregnancy/{}/homeVisits",
                patient_id, pregnancy_id
            ))
            .await?;
        Ok(visits.unwrap_or_default())
    }

    /// Create a new home visit
    pub async fn create_home_visit(&self, payload: &HomeVisitPayload) -> Result<HomeVisit> {
        debug!(patient_id = payload.patient_id, "Creating home visit");
        self.post("/patient/homeVisits", payload).await
    }

    /// Update an existing home visit. The visit id travels in the body,
    /// not the path.
    pub async fn update_home_visit(
        &self,
        patient_id: i64,
        pregnancy_id: i64,
        payload: &HomeVisitPayload,
    ) -> Result<HomeVisit> {
        debug!(visit_id = payload.id, "Updating home visit");
        self.put(
            &format!("/patients/{}/pregnancy/{}/homeVisits", patient_id, pregnancy_id),
            payload,
        )
        .await
    }

    /// Fetch hospital admissions. Scoped to the patient; the records carry
    /// their own pregnancy ids.
    pub async fn fetch_hospital_admissions(
        &self,
        patient_id: i64,
    ) -> Result<Vec<HospitalAdmission>> {
        let admissions: Option<Vec<HospitalAdmission>> = self
            .get(&format!("/patient/{}/hospitalAdmissions", patient_id))
            .await?;
        Ok(admissions.unwrap_or_default())
    }

    /// Fetch the patient's contraceptive use records
    pub async fn fetch_contraceptives_used(
        &self,
        patient_id: i64,
    ) -> Result<Vec<ContraceptiveUsed>> {
        let used: Option<Vec<ContraceptiveUsed>> = self
            .get(&format!("/patient/{}/contraceptivesUsed", patient_id))
            .await?;
        Ok(used.unwrap_or_default())
    }

    /// Fetch syphilis treatments administered to the patient's partner
    pub async fn fetch_partner_syphilis_treatments(
        &self,
        patient_id: i64,
    ) -> Result<Vec<PartnerSyphilisTreatment>> {
        let treatments: Option<Vec<PartnerSyphilisTreatment>> = self
            .get(&format!("/patient/{}/partners/syphilisTreatments", patient_id))
            .await?;
        Ok(treatments.unwrap_or_default())
    }

    /// Fetch contact tracing records for the patient's partner
    pub async fn fetch_contact_tracing(&self, patient_id: i64) -> Result<Vec<ContactTracing>> {
        let tracings: Option<Vec<ContactTracing>> = self
            .get(&format!("/partners/{}/contactTracing", patient_id))
            .await?;
        Ok(tracings.unwrap_or_default())
    }

    /// Fetch infants born of a pregnancy
    pub async fn fetch_infants(&self, patient_id: i64, pregnancy_id: i64) -> Result<Vec<Infant>> {
        let infants: Option<Vec<Infant>> = self
            .get(&format!(
                "/patients/{}/pregnancy/{}/infant",
                patient_id, pregnancy_id
            ))
            .await?;
        Ok(infants.unwrap_or_default())
    }

    /// Fetch HIV screenings for one infant
    pub async fn fetch_infant_hiv_screenings(
        &self,
        patient_id: i64,
        infant_id: i64,
    ) -> Result<Vec<HivScreening>> {
        let screenings: Option<Vec<HivScreening>> = self
            .get(&format!(
                "/patient/{}/infant/{}/hivScreenings",
                patient_id, infant_id
            ))
            .await?;
        Ok(screenings.unwrap_or_default())
    }

    /// Fetch syphilis screenings for one infant
    pub async fn fetch_infant_syphilis_screenings(
        &self,
        patient_id: i64,
        infant_id: i64,
    ) -> Result<Vec<SyphilisScreening>> {
        let response: SyphilisScreeningsResponse = self
            .get(&format!(
                "/patient/{}/infant/{}/syphilisScreenings",
                patient_id, infant_id
            ))
            .await?;
        Ok(response.screenings.unwrap_or_default())
    }

    /// Fetch diagnoses for one infant
    pub async fn fetch_infant_diagnoses(
        &self,
        patient_id: i64,
        infant_id: i64,
    ) -> Result<Vec<InfantDiagnosis>> {
        let diagnoses: Option<Vec<InfantDiagnosis>> = self
            .get(&format!(
                "/patients/{}/infant/{}/diagnoses",
                patient_id, infant_id
            ))
            .await?;
        Ok(diagnoses.unwrap_or_default())
    }

    /// Fetch the raw screening records backing the missing-PCRs report
    pub async fn fetch_missing_pcrs(&self, year: i32) -> Result<Vec<ScreeningRecord>> {
        let records: Option<Vec<ScreeningRecord>> =
            self.get(&format!("/reports/missingPcrs/{}", year)).await?;
        Ok(records.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_auth_response() {
        let json = r#"{"accessToken": "eyJhbGciOiJIUzI1NiJ9.e30.abc123"}"#;
        let auth: AuthResponse = serde_json::from_str(json).expect("parse auth response");
        assert_eq!(auth.access_token, "eyJhbGciOiJIUzI1NiJ9.e30.abc123");
    }

    #[test]
    fn test_parse_infants_response() {
        let json = r#"[
            {"patientId": 2222233, "firstName": "Ana", "lastName": "Smith", "dob": "2020-01-15T00:00:00Z"},
            {"patientId": 2222234, "firstName": "Ben", "lastName": "Smith", "dob": "2020-01-15T00:00:00Z"}
        ]"#;

        let infants: Vec<Infant> = serde_json::from_str(json).expect("parse infants");
        assert_eq!(infants.len(), 2);
        assert_eq!(infants[0].display_name(), "Ana Smith");
    }

    #[test]
    fn test_null_list_responses_become_empty() {
        // The backend serializes empty collections as JSON null
        let parsed: Option<Vec<HomeVisit>> = serde_json::from_str("null").expect("parse null");
        assert!(parsed.unwrap_or_default().is_empty());
    }

    #[test]
    fn test_parse_syphilis_screenings_envelope() {
        let json = r#"{
            "infant": {"patientId": 2222233, "firstName": "Ana", "lastName": "Smith"},
            "screenings": [
                {"id": 310, "testName": "VDRL", "result": "Non-Reactive",
                 "screeningDate": "2020-03-02T00:00:00Z", "timely": "N/A"}
            ]
        }"#;

        let response: SyphilisScreeningsResponse =
            serde_json::from_str(json).expect("parse screenings envelope");
        let screenings = response.screenings.unwrap_or_default();
        assert_eq!(screenings.len(), 1);
        assert_eq!(screenings[0].test_name.as_deref(), Some("VDRL"));
    }

    #[test]
    fn test_syphilis_screenings_envelope_with_null_list() {
        let json = r#"{"infant": {"patientId": 2222233}, "screenings": null}"#;
        let response: SyphilisScreeningsResponse =
            serde_json::from_str(json).expect("parse screenings envelope");
        assert!(response.screenings.unwrap_or_default().is_empty());
    }
}
