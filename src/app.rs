//! Application state management for the EMTCT terminal client.
//!
//! This module contains the core `App` struct that manages all application
//! state, including UI state, per-screen fetch state, session management,
//! and background task coordination.

use std::collections::HashMap;
use std::future::Future;
use std::io::{self, Write};

use anyhow::Result;
use chrono::{Datelike, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::api::ApiClient;
use crate::auth::{CredentialStore, Session};
use crate::config::Config;
use crate::fetch::{Loadable, SubmitState};
use crate::models::{
    consolidate_screenings, ConsolidatedInfantScreening, ContactTracing, ContraceptiveUsed,
    CurrentPregnancy, HivScreening, HomeVisit, HomeVisitPayload, HospitalAdmission, Infant,
    InfantDiagnosis, LabResult, PartnerSyphilisTreatment, PatientRecord, Pregnancy,
    PregnancySummary, ScreeningRecord, SyphilisScreening,
};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
/// A tab refresh issues at most a handful of requests; 32 leaves headroom.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length for email input
const MAX_EMAIL_LENGTH: usize = 64;

/// Maximum length for password input
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for patient id input
const MAX_PATIENT_ID_LENGTH: usize = 10;

pub fn can_add_email_char(current: &str) -> bool {
    current.len() < MAX_EMAIL_LENGTH
}

pub fn can_add_password_char(current: &str) -> bool {
    current.len() < MAX_PASSWORD_LENGTH
}

pub fn can_add_patient_id_char(current: &str) -> bool {
    current.len() < MAX_PATIENT_ID_LENGTH
}

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Pregnancy,
    Labs,
    Visits,
    Contraceptives,
    Infants,
    Partners,
}

impl Tab {
    /// Get the display title for this tab.
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Pregnancy => "Pregnancy",
            Tab::Labs => "Labs",
            Tab::Visits => "Visits",
            Tab::Contraceptives => "Contraceptives",
            Tab::Infants => "Infants",
            Tab::Partners => "Partners",
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Tab::Pregnancy => Tab::Labs,
            Tab::Labs => Tab::Visits,
            Tab::Visits => Tab::Contraceptives,
            Tab::Contraceptives => Tab::Infants,
            Tab::Infants => Tab::Partners,
            Tab::Partners => Tab::Pregnancy,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Tab::Pregnancy => Tab::Partners,
            Tab::Labs => Tab::Pregnancy,
            Tab::Visits => Tab::Labs,
            Tab::Contraceptives => Tab::Visits,
            Tab::Infants => Tab::Contraceptives,
            Tab::Partners => Tab::Infants,
        }
    }
}

/// Sub-view for the Visits tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitsView {
    HomeVisits,
    Admissions,
}

/// Sub-view for the Partners tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartnersView {
    Treatments,
    ContactTracing,
}

/// Sub-view for the infant detail panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfantDetailView {
    Details,
    HivScreenings,
    SyphilisScreenings,
    Diagnoses,
    PcrReport,
}

/// Current UI focus area (list panel or detail panel)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Detail,
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    EnteringPatient,
    ShowingHelp,
    LoggingIn,
    ConfirmingQuit,
    EditingVisit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoginFocus {
    Email,
    Password,
    Button,
}

/// Field focus within the home visit form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitField {
    Date,
    Reason,
    Comments,
}

impl VisitField {
    pub fn next(&self) -> Self {
        match self {
            VisitField::Date => VisitField::Reason,
            VisitField::Reason => VisitField::Comments,
            VisitField::Comments => VisitField::Date,
        }
    }
}

/// Create/edit form state for a home visit
#[derive(Debug, Clone)]
pub struct VisitForm {
    /// Some(id) when editing an existing visit, None when creating
    pub editing_id: Option<i64>,
    pub date_of_visit: String,
    pub reason: String,
    pub comments: String,
    pub focus: VisitField,
    pub submit: SubmitState,
}

impl VisitForm {
    fn new() -> Self {
        Self {
            editing_id: None,
            date_of_visit: Utc::now().date_naive().format("%Y-%m-%d").to_string(),
            reason: String::new(),
            comments: String::new(),
            focus: VisitField::Date,
            submit: SubmitState::Idle,
        }
    }

    fn from_visit(visit: &HomeVisit) -> Self {
        Self {
            editing_id: Some(visit.id),
            date_of_visit: visit
                .date_of_visit
                .as_deref()
                .map(|d| d.chars().take(10).collect())
                .unwrap_or_default(),
            reason: visit.reason.clone().unwrap_or_default(),
            comments: visit.comments.clone().unwrap_or_default(),
            focus: VisitField::Date,
            submit: SubmitState::Idle,
        }
    }

    pub fn field_mut(&mut self) -> &mut String {
        match self.focus {
            VisitField::Date => &mut self.date_of_visit,
            VisitField::Reason => &mut self.reason,
            VisitField::Comments => &mut self.comments,
        }
    }
}

// ============================================================================
// Background Task Results
// ============================================================================

/// One data slot that can have an in-flight background fetch. Starting a new
/// fetch for a slot aborts the previous task so a slow response can never
/// overwrite newer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum FetchSlot {
    Patient,
    Pregnancy,
    PregnancyHistory,
    Labs,
    HomeVisits,
    Admissions,
    Contraceptives,
    Infants,
    HivScreenings,
    SyphilisScreenings,
    Diagnoses,
    SyphilisTreatments,
    ContactTracing,
    PcrReport,
    SaveVisit,
}

/// Results sent from background fetch tasks back to the main loop.
/// Errors travel as strings so every screen can surface them uniformly.
enum FetchResult {
    Patient(Result<PatientRecord, String>),
    CurrentPregnancy(Box<Result<CurrentPregnancy, String>>),
    Pregnancies(Result<Vec<Pregnancy>, String>),
    Labs(Result<Vec<LabResult>, String>),
    HomeVisits(Result<Vec<HomeVisit>, String>),
    Admissions(Result<Vec<HospitalAdmission>, String>),
    Contraceptives(Result<Vec<ContraceptiveUsed>, String>),
    Infants(Result<Vec<Infant>, String>),
    /// HIV screenings for a specific infant (infant_id, result)
    HivScreenings(i64, Result<Vec<HivScreening>, String>),
    /// Syphilis screenings for a specific infant (infant_id, result)
    SyphilisScreenings(i64, Result<Vec<SyphilisScreening>, String>),
    /// Diagnoses for a specific infant (infant_id, result)
    Diagnoses(i64, Result<Vec<InfantDiagnosis>, String>),
    SyphilisTreatments(Result<Vec<PartnerSyphilisTreatment>, String>),
    ContactTracing(Result<Vec<ContactTracing>, String>),
    /// Raw records for the missing-PCRs report (year, result)
    PcrReport(i32, Result<Vec<ScreeningRecord>, String>),
    VisitSaved(Result<HomeVisit, String>),
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub session: Session,
    pub api: ApiClient,

    // UI state
    pub state: AppState,
    pub current_tab: Tab,
    pub focus: Focus,
    pub visits_view: VisitsView,
    pub partners_view: PartnersView,
    pub infant_detail_view: InfantDetailView,

    // Login form state
    pub login_email: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,

    // Patient lookup prompt
    pub patient_input: String,
    pub patient_id: Option<i64>,

    // Fetched data, one Loadable slot per screen
    pub patient: Loadable<PatientRecord>,
    pub pregnancy: Loadable<PregnancySummary>,
    pub pregnancies: Loadable<Vec<Pregnancy>>,
    pub labs: Loadable<Vec<LabResult>>,
    pub home_visits: Loadable<Vec<HomeVisit>>,
    pub admissions: Loadable<Vec<HospitalAdmission>>,
    pub contraceptives: Loadable<Vec<ContraceptiveUsed>>,
    pub infants: Loadable<Vec<Infant>>,
    pub hiv_screenings: Loadable<Vec<HivScreening>>,
    pub syphilis_screenings: Loadable<Vec<SyphilisScreening>>,
    pub infant_diagnoses: Loadable<Vec<InfantDiagnosis>>,
    pub syphilis_treatments: Loadable<Vec<PartnerSyphilisTreatment>>,
    pub contact_tracing: Loadable<Vec<ContactTracing>>,
    pub pcr_report: Loadable<Vec<ConsolidatedInfantScreening>>,
    pub report_year: i32,

    /// Id of the current pregnancy, set once vitals arrive. Most record
    /// fetches are scoped to it.
    pub pregnancy_id: Option<i64>,

    // Selection indices
    pub history_selection: usize,
    pub labs_selection: usize,
    pub visits_selection: usize,
    pub admissions_selection: usize,
    pub contraceptives_selection: usize,
    pub infants_selection: usize,
    pub screenings_selection: usize,
    pub syphilis_selection: usize,
    pub diagnoses_selection: usize,
    pub report_selection: usize,
    pub treatments_selection: usize,
    pub tracing_selection: usize,

    // Home visit create/edit form
    pub visit_form: Option<VisitForm>,

    // Background task coordination
    fetch_tasks: HashMap<FetchSlot, JoinHandle<()>>,
    fetch_rx: mpsc::Receiver<FetchResult>,
    fetch_tx: mpsc::Sender<FetchResult>,

    // Status message
    pub status_message: Option<String>,
}

impl App {
    /// Create a new application instance
    pub fn new() -> Result<Self> {
        debug!("App::new() starting");
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let data_dir = config.data_dir()?;
        debug!(?data_dir, "Data directory configured");

        let mut session = Session::new(data_dir);
        let load_result = session.load();
        debug!(?load_result, has_data = session.data.is_some(), "Session loaded");

        let mut api = ApiClient::new(config.base_url())?;

        if let Some(ref data) = session.data {
            debug!(expired = data.is_expired(), "Session found");
            if !data.is_expired() {
                api.set_token(data.token.clone());
                debug!("Token set on API client");
            }
        }

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let login_email = std::env::var("EMTCT_EMAIL")
            .ok()
            .or_else(|| config.last_email.clone())
            .unwrap_or_default();
        let login_password = std::env::var("EMTCT_PASSWORD").unwrap_or_default();

        Ok(Self {
            config,
            session,
            api,

            state: AppState::Normal,
            current_tab: Tab::Pregnancy,
            focus: Focus::List,
            visits_view: VisitsView::HomeVisits,
            partners_view: PartnersView::Treatments,
            infant_detail_view: InfantDetailView::Details,

            login_email,
            login_password,
            login_focus: LoginFocus::Email,
            login_error: None,

            patient_input: String::new(),
            patient_id: None,

            patient: Loadable::Idle,
            pregnancy: Loadable::Idle,
            pregnancies: Loadable::Idle,
            labs: Loadable::Idle,
            home_visits: Loadable::Idle,
            admissions: Loadable::Idle,
            contraceptives: Loadable::Idle,
            infants: Loadable::Idle,
            hiv_screenings: Loadable::Idle,
            syphilis_screenings: Loadable::Idle,
            infant_diagnoses: Loadable::Idle,
            syphilis_treatments: Loadable::Idle,
            contact_tracing: Loadable::Idle,
            pcr_report: Loadable::Idle,
            report_year: Utc::now().year(),

            pregnancy_id: None,

            history_selection: 0,
            labs_selection: 0,
            visits_selection: 0,
            admissions_selection: 0,
            contraceptives_selection: 0,
            infants_selection: 0,
            screenings_selection: 0,
            syphilis_selection: 0,
            diagnoses_selection: 0,
            report_selection: 0,
            treatments_selection: 0,
            tracing_selection: 0,

            visit_form: None,

            fetch_tasks: HashMap::new(),
            fetch_rx: rx,
            fetch_tx: tx,

            status_message: None,
        })
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Check if the user is authenticated with a valid session
    pub fn is_authenticated(&self) -> bool {
        self.session.is_valid()
    }

    /// Interactive login from the terminal, used by the --login flag
    pub async fn login_interactive(&mut self) -> Result<()> {
        println!("\n=== EMTCT Login ===\n");

        let email = if let Some(ref last_email) = self.config.last_email {
            print!("Email [{}]: ", last_email);
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            let input = input.trim();

            if input.is_empty() {
                last_email.clone()
            } else {
                input.to_string()
            }
        } else {
            print!("Email: ");
            io::stdout().flush()?;

            let mut email = String::new();
            io::stdin().read_line(&mut email)?;
            email.trim().to_string()
        };

        let password = if CredentialStore::has_credentials(&email) {
            print!("Use stored password? [Y/n]: ");
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if input.trim().to_lowercase() != "n" {
                CredentialStore::get_password(&email)?
            } else {
                rpassword::prompt_password("Password: ")?
            }
        } else {
            rpassword::prompt_password("Password: ")?
        };

        println!("\nAuthenticating...");

        let session_data = self.api.authenticate(&email, &password).await?;

        CredentialStore::store(&email, &password)?;

        self.config.last_email = Some(email);
        self.config.save()?;

        self.session.update(session_data);
        self.session.save()?;

        if let Some(ref data) = self.session.data {
            self.api.set_token(data.token.clone());
        }

        println!("Login successful!\n");
        Ok(())
    }

    /// Attempt login with the credentials from the login form
    pub async fn attempt_login(&mut self) -> Result<()> {
        let email = self.login_email.clone();
        let password = self.login_password.clone();

        if email.is_empty() || password.is_empty() {
            self.login_error = Some("Email and password required".to_string());
            return Err(anyhow::anyhow!("Email and password required"));
        }

        self.login_error = None;

        match self.api.authenticate(&email, &password).await {
            Ok(session_data) => {
                if let Err(e) = CredentialStore::store(&email, &password) {
                    warn!(error = %e, "Failed to store credentials");
                }

                self.config.last_email = Some(email);
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }

                self.session.update(session_data);
                if let Err(e) = self.session.save() {
                    warn!(error = %e, "Failed to save session");
                }

                if let Some(ref data) = self.session.data {
                    self.api.set_token(data.token.clone());
                }

                self.login_password.clear();
                self.state = AppState::Normal;
                info!("Login successful");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                let text = e.to_string().to_lowercase();
                let user_message = if text.contains("401") || text.contains("unauthorized") {
                    "Invalid email or password".to_string()
                } else if text.contains("network") || text.contains("connect") {
                    "Unable to connect to server. Check your internet connection.".to_string()
                } else if text.contains("timeout") {
                    "Connection timed out. Please try again.".to_string()
                } else {
                    format!("Login failed: {}", e)
                };
                self.login_error = Some(user_message);
                Err(e)
            }
        }
    }

    /// Start the login process (show login overlay)
    pub fn start_login(&mut self) {
        self.state = AppState::LoggingIn;
        self.login_focus = if self.login_email.is_empty() {
            LoginFocus::Email
        } else {
            LoginFocus::Password
        };
        self.login_error = None;
    }

    // =========================================================================
    // Patient loading
    // =========================================================================

    /// Load a patient by id: reset all screen state and start the initial
    /// fetches. Any in-flight fetches for the previous patient are aborted.
    pub fn load_patient(&mut self, patient_id: i64) {
        info!(patient_id, "Loading patient");

        for (_, handle) in self.fetch_tasks.drain() {
            handle.abort();
        }

        self.patient_id = Some(patient_id);
        self.pregnancy_id = None;

        self.patient = Loadable::Idle;
        self.pregnancy = Loadable::Idle;
        self.pregnancies = Loadable::Idle;
        self.labs = Loadable::Idle;
        self.home_visits = Loadable::Idle;
        self.admissions = Loadable::Idle;
        self.contraceptives = Loadable::Idle;
        self.infants = Loadable::Idle;
        self.hiv_screenings = Loadable::Idle;
        self.syphilis_screenings = Loadable::Idle;
        self.infant_diagnoses = Loadable::Idle;
        self.syphilis_treatments = Loadable::Idle;
        self.contact_tracing = Loadable::Idle;
        self.pcr_report = Loadable::Idle;

        self.history_selection = 0;
        self.labs_selection = 0;
        self.visits_selection = 0;
        self.admissions_selection = 0;
        self.contraceptives_selection = 0;
        self.infants_selection = 0;
        self.screenings_selection = 0;
        self.syphilis_selection = 0;
        self.diagnoses_selection = 0;
        self.report_selection = 0;
        self.treatments_selection = 0;
        self.tracing_selection = 0;

        self.current_tab = Tab::Pregnancy;
        self.focus = Focus::List;
        self.infant_detail_view = InfantDetailView::Details;

        self.fetch_patient();
        self.fetch_pregnancy();
        self.fetch_pregnancy_history();
    }

    /// Switch to a tab and re-fetch its data. Every entry hits the API
    /// fresh; nothing is reused across navigations.
    pub fn switch_tab(&mut self, tab: Tab) {
        self.current_tab = tab;
        self.focus = Focus::List;
        self.refresh_current_tab();
    }

    /// Re-fetch the data backing the current tab
    pub fn refresh_current_tab(&mut self) {
        if self.patient_id.is_none() {
            return;
        }
        match self.current_tab {
            Tab::Pregnancy => {
                self.fetch_patient();
                self.fetch_pregnancy();
                self.fetch_pregnancy_history();
            }
            Tab::Labs => self.fetch_labs(),
            Tab::Visits => {
                self.fetch_home_visits();
                self.fetch_admissions();
            }
            Tab::Contraceptives => self.fetch_contraceptives(),
            Tab::Infants => {
                self.fetch_infants();
                self.fetch_infant_detail();
            }
            Tab::Partners => {
                self.fetch_syphilis_treatments();
                self.fetch_contact_tracing();
            }
        }
    }

    // =========================================================================
    // Background fetches
    // =========================================================================

    /// Spawn a fetch task for a slot, aborting any previous task for the
    /// same slot first.
    fn spawn_fetch<F>(&mut self, slot: FetchSlot, fut: F)
    where
        F: Future<Output = FetchResult> + Send + 'static,
    {
        if let Some(handle) = self.fetch_tasks.remove(&slot) {
            handle.abort();
        }

        let tx = self.fetch_tx.clone();
        let handle = tokio::spawn(async move {
            let result = fut.await;
            if let Err(e) = tx.send(result).await {
                error!(error = %e, "Failed to send fetch result - channel closed");
            }
        });
        self.fetch_tasks.insert(slot, handle);
    }

    fn fetch_patient(&mut self) {
        let Some(patient_id) = self.patient_id else { return };
        let api = self.api.clone();
        self.patient = Loadable::Pending;
        self.spawn_fetch(FetchSlot::Patient, async move {
            FetchResult::Patient(api.fetch_patient(patient_id).await.map_err(|e| e.to_string()))
        });
    }

    fn fetch_pregnancy(&mut self) {
        let Some(patient_id) = self.patient_id else { return };
        let api = self.api.clone();
        self.pregnancy = Loadable::Pending;
        self.spawn_fetch(FetchSlot::Pregnancy, async move {
            FetchResult::CurrentPregnancy(Box::new(
                api.fetch_current_pregnancy(patient_id)
                    .await
                    .map_err(|e| e.to_string()),
            ))
        });
    }

    fn fetch_pregnancy_history(&mut self) {
        let Some(patient_id) = self.patient_id else { return };
        let api = self.api.clone();
        self.pregnancies = Loadable::Pending;
        self.spawn_fetch(FetchSlot::PregnancyHistory, async move {
            FetchResult::Pregnancies(
                api.fetch_pregnancies(patient_id)
                    .await
                    .map_err(|e| e.to_string()),
            )
        });
    }

    fn fetch_labs(&mut self) {
        let (Some(patient_id), Some(pregnancy_id)) = (self.patient_id, self.pregnancy_id) else {
            return;
        };
        let api = self.api.clone();
        self.labs = Loadable::Pending;
        self.spawn_fetch(FetchSlot::Labs, async move {
            FetchResult::Labs(
                api.fetch_lab_results(patient_id, pregnancy_id)
                    .await
                    .map_err(|e| e.to_string()),
            )
        });
    }

    pub fn fetch_home_visits(&mut self) {
        let (Some(patient_id), Some(pregnancy_id)) = (self.patient_id, self.pregnancy_id) else {
            return;
        };
        let api = self.api.clone();
        self.home_visits = Loadable::Pending;
        self.spawn_fetch(FetchSlot::HomeVisits, async move {
            FetchResult::HomeVisits(
                api.fetch_home_visits(patient_id, pregnancy_id)
                    .await
                    .map_err(|e| e.to_string()),
            )
        });
    }

    fn fetch_admissions(&mut self) {
        let Some(patient_id) = self.patient_id else { return };
        let api = self.api.clone();
        self.admissions = Loadable::Pending;
        self.spawn_fetch(FetchSlot::Admissions, async move {
            FetchResult::Admissions(
                api.fetch_hospital_admissions(patient_id)
                    .await
                    .map_err(|e| e.to_string()),
            )
        });
    }

    fn fetch_contraceptives(&mut self) {
        let Some(patient_id) = self.patient_id else { return };
        let api = self.api.clone();
        self.contraceptives = Loadable::Pending;
        self.spawn_fetch(FetchSlot::Contraceptives, async move {
            FetchResult::Contraceptives(
                api.fetch_contraceptives_used(patient_id)
                    .await
                    .map_err(|e| e.to_string()),
            )
        });
    }

    fn fetch_infants(&mut self) {
        let (Some(patient_id), Some(pregnancy_id)) = (self.patient_id, self.pregnancy_id) else {
            return;
        };
        let api = self.api.clone();
        self.infants = Loadable::Pending;
        self.spawn_fetch(FetchSlot::Infants, async move {
            FetchResult::Infants(
                api.fetch_infants(patient_id, pregnancy_id)
                    .await
                    .map_err(|e| e.to_string()),
            )
        });
    }

    fn fetch_syphilis_treatments(&mut self) {
        let Some(patient_id) = self.patient_id else { return };
        let api = self.api.clone();
        self.syphilis_treatments = Loadable::Pending;
        self.spawn_fetch(FetchSlot::SyphilisTreatments, async move {
            FetchResult::SyphilisTreatments(
                api.fetch_partner_syphilis_treatments(patient_id)
                    .await
                    .map_err(|e| e.to_string()),
            )
        });
    }

    fn fetch_contact_tracing(&mut self) {
        let Some(patient_id) = self.patient_id else { return };
        let api = self.api.clone();
        self.contact_tracing = Loadable::Pending;
        self.spawn_fetch(FetchSlot::ContactTracing, async move {
            FetchResult::ContactTracing(
                api.fetch_contact_tracing(patient_id)
                    .await
                    .map_err(|e| e.to_string()),
            )
        });
    }

    /// The infant currently highlighted in the Infants list
    pub fn selected_infant_id(&self) -> Option<i64> {
        self.infants
            .as_ready()
            .and_then(|infants| infants.get(self.infants_selection))
            .map(|infant| infant.patient_id)
    }

    /// Fetch the data for the active infant detail view. Called on view
    /// switches, selection moves, and once the infant list arrives.
    pub fn fetch_infant_detail(&mut self) {
        match self.infant_detail_view {
            InfantDetailView::Details => {}
            InfantDetailView::HivScreenings => self.fetch_hiv_screenings(),
            InfantDetailView::SyphilisScreenings => self.fetch_syphilis_screenings(),
            InfantDetailView::Diagnoses => self.fetch_infant_diagnoses(),
            InfantDetailView::PcrReport => self.fetch_pcr_report(),
        }
    }

    fn fetch_hiv_screenings(&mut self) {
        let Some(patient_id) = self.patient_id else { return };
        let Some(infant_id) = self.selected_infant_id() else {
            return;
        };
        let api = self.api.clone();
        self.hiv_screenings = Loadable::Pending;
        self.screenings_selection = 0;
        self.spawn_fetch(FetchSlot::HivScreenings, async move {
            FetchResult::HivScreenings(
                infant_id,
                api.fetch_infant_hiv_screenings(patient_id, infant_id)
                    .await
                    .map_err(|e| e.to_string()),
            )
        });
    }

    fn fetch_syphilis_screenings(&mut self) {
        let Some(patient_id) = self.patient_id else { return };
        let Some(infant_id) = self.selected_infant_id() else {
            return;
        };
        let api = self.api.clone();
        self.syphilis_screenings = Loadable::Pending;
        self.syphilis_selection = 0;
        self.spawn_fetch(FetchSlot::SyphilisScreenings, async move {
            FetchResult::SyphilisScreenings(
                infant_id,
                api.fetch_infant_syphilis_screenings(patient_id, infant_id)
                    .await
                    .map_err(|e| e.to_string()),
            )
        });
    }

    fn fetch_infant_diagnoses(&mut self) {
        let Some(patient_id) = self.patient_id else { return };
        let Some(infant_id) = self.selected_infant_id() else {
            return;
        };
        let api = self.api.clone();
        self.infant_diagnoses = Loadable::Pending;
        self.diagnoses_selection = 0;
        self.spawn_fetch(FetchSlot::Diagnoses, async move {
            FetchResult::Diagnoses(
                infant_id,
                api.fetch_infant_diagnoses(patient_id, infant_id)
                    .await
                    .map_err(|e| e.to_string()),
            )
        });
    }

    pub fn fetch_pcr_report(&mut self) {
        let api = self.api.clone();
        let year = self.report_year;
        self.pcr_report = Loadable::Pending;
        self.report_selection = 0;
        self.spawn_fetch(FetchSlot::PcrReport, async move {
            FetchResult::PcrReport(
                year,
                api.fetch_missing_pcrs(year).await.map_err(|e| e.to_string()),
            )
        });
    }

    // =========================================================================
    // Home visit form
    // =========================================================================

    /// Open the form to create a new home visit
    pub fn open_new_visit_form(&mut self) {
        if self.pregnancy_id.is_none() {
            self.status_message = Some("No current pregnancy to attach a visit to".to_string());
            return;
        }
        self.visit_form = Some(VisitForm::new());
        self.state = AppState::EditingVisit;
    }

    /// Open the form to edit the selected home visit
    pub fn open_edit_visit_form(&mut self) {
        let Some(visits) = self.home_visits.as_ready() else {
            return;
        };
        let Some(visit) = visits.get(self.visits_selection) else {
            return;
        };
        self.visit_form = Some(VisitForm::from_visit(visit));
        self.state = AppState::EditingVisit;
    }

    /// Submit the open visit form (POST for create, PUT for edit)
    pub fn submit_visit_form(&mut self) {
        let (Some(patient_id), Some(pregnancy_id)) = (self.patient_id, self.pregnancy_id) else {
            return;
        };
        let Some(form) = self.visit_form.as_mut() else {
            return;
        };
        if form.submit.is_submitting() {
            return;
        }

        if form.date_of_visit.trim().is_empty() || form.reason.trim().is_empty() {
            form.submit = SubmitState::Failed("Date and reason are required".to_string());
            return;
        }

        let payload = HomeVisitPayload {
            id: form.editing_id,
            patient_id,
            pregnancy_id,
            reason: form.reason.trim().to_string(),
            comments: form.comments.trim().to_string(),
            date_of_visit: form.date_of_visit.trim().to_string(),
        };
        form.submit = SubmitState::Submitting;

        let api = self.api.clone();
        self.spawn_fetch(FetchSlot::SaveVisit, async move {
            let result = match payload.id {
                Some(_) => api.update_home_visit(patient_id, pregnancy_id, &payload).await,
                None => api.create_home_visit(&payload).await,
            };
            FetchResult::VisitSaved(result.map_err(|e| e.to_string()))
        });
    }

    /// Close the visit form without saving
    pub fn cancel_visit_form(&mut self) {
        if let Some(handle) = self.fetch_tasks.remove(&FetchSlot::SaveVisit) {
            handle.abort();
        }
        self.visit_form = None;
        self.state = AppState::Normal;
    }

    // =========================================================================
    // Background task processing
    // =========================================================================

    /// Check for completed background tasks and process results
    pub fn check_background_tasks(&mut self) {
        let mut results = Vec::new();
        while let Ok(result) = self.fetch_rx.try_recv() {
            results.push(result);
        }
        for result in results {
            self.process_fetch_result(result);
        }
    }

    /// Process a single result from a background fetch task
    fn process_fetch_result(&mut self, result: FetchResult) {
        match result {
            FetchResult::Patient(res) => {
                if let Ok(ref record) = res {
                    debug!(events = record.obstetric_history.len(), "Patient fetched");
                    // Interval depends on obstetric history; rebuild the
                    // summary if the vitals arrived first.
                    if let Some(summary) = self.pregnancy.as_ready() {
                        let vitals = summary.pregnancy.clone();
                        self.pregnancy = Loadable::Ready(PregnancySummary::derive(
                            vitals,
                            &record.obstetric_history,
                        ));
                    }
                }
                self.history_selection = 0;
                self.patient = Loadable::from_result(res);
            }
            FetchResult::CurrentPregnancy(res) => match *res {
                Ok(vitals) => {
                    let had_pregnancy_id = self.pregnancy_id.is_some();
                    self.pregnancy_id = Some(vitals.id);
                    let history = self
                        .patient
                        .as_ready()
                        .map(|r| r.obstetric_history.clone())
                        .unwrap_or_default();
                    self.pregnancy =
                        Loadable::Ready(PregnancySummary::derive(vitals, &history));
                    // Pregnancy-scoped tabs could not fetch before the id
                    // was known; kick the current one now.
                    if !had_pregnancy_id && self.current_tab != Tab::Pregnancy {
                        self.refresh_current_tab();
                    }
                }
                Err(e) => {
                    self.pregnancy = Loadable::Failed(e);
                }
            },
            FetchResult::Pregnancies(res) => {
                self.pregnancies = Loadable::from_result(res);
            }
            FetchResult::Labs(res) => {
                self.labs_selection = 0;
                self.labs = Loadable::from_result(res);
            }
            FetchResult::HomeVisits(res) => {
                self.visits_selection = 0;
                self.home_visits = Loadable::from_result(res);
            }
            FetchResult::Admissions(res) => {
                self.admissions_selection = 0;
                self.admissions = Loadable::from_result(res);
            }
            FetchResult::Contraceptives(res) => {
                self.contraceptives_selection = 0;
                self.contraceptives = Loadable::from_result(res);
            }
            FetchResult::Infants(res) => {
                self.infants_selection = 0;
                self.infants = Loadable::from_result(res);
                // The detail pane may have been waiting for an infant id
                if self.current_tab == Tab::Infants {
                    self.fetch_infant_detail();
                }
            }
            FetchResult::HivScreenings(infant_id, res) => {
                if self.selected_infant_id() == Some(infant_id) {
                    self.hiv_screenings = Loadable::from_result(res);
                }
            }
            FetchResult::SyphilisScreenings(infant_id, res) => {
                if self.selected_infant_id() == Some(infant_id) {
                    self.syphilis_screenings = Loadable::from_result(res);
                }
            }
            FetchResult::Diagnoses(infant_id, res) => {
                if self.selected_infant_id() == Some(infant_id) {
                    self.infant_diagnoses = Loadable::from_result(res);
                }
            }
            FetchResult::SyphilisTreatments(res) => {
                self.treatments_selection = 0;
                self.syphilis_treatments = Loadable::from_result(res);
            }
            FetchResult::ContactTracing(res) => {
                self.tracing_selection = 0;
                self.contact_tracing = Loadable::from_result(res);
            }
            FetchResult::PcrReport(year, res) => {
                if year == self.report_year {
                    self.pcr_report =
                        Loadable::from_result(res.map(|records| consolidate_screenings(&records)));
                }
            }
            FetchResult::VisitSaved(res) => match res {
                Ok(visit) => {
                    info!(visit_id = visit.id, "Home visit saved");
                    self.visit_form = None;
                    self.state = AppState::Normal;
                    self.status_message = Some("Visit saved".to_string());
                    self.fetch_home_visits();
                }
                Err(e) => {
                    error!(error = %e, "Failed to save home visit");
                    if let Some(form) = self.visit_form.as_mut() {
                        form.submit = SubmitState::Failed(e);
                    }
                }
            },
        }
    }

    // =========================================================================
    // List navigation
    // =========================================================================

    /// Length of the list the cursor currently moves through
    fn current_list_len(&self) -> usize {
        fn len<T>(ld: &Loadable<Vec<T>>) -> usize {
            ld.as_ready().map(|v| v.len()).unwrap_or(0)
        }

        match self.current_tab {
            Tab::Pregnancy => self
                .patient
                .as_ready()
                .map(|r| r.obstetric_history.len())
                .unwrap_or(0),
            Tab::Labs => len(&self.labs),
            Tab::Visits => match self.visits_view {
                VisitsView::HomeVisits => len(&self.home_visits),
                VisitsView::Admissions => len(&self.admissions),
            },
            Tab::Contraceptives => len(&self.contraceptives),
            Tab::Infants => match (self.focus, self.infant_detail_view) {
                (Focus::Detail, InfantDetailView::HivScreenings) => len(&self.hiv_screenings),
                (Focus::Detail, InfantDetailView::SyphilisScreenings) => {
                    len(&self.syphilis_screenings)
                }
                (Focus::Detail, InfantDetailView::Diagnoses) => len(&self.infant_diagnoses),
                (Focus::Detail, InfantDetailView::PcrReport) => len(&self.pcr_report),
                _ => len(&self.infants),
            },
            Tab::Partners => match self.partners_view {
                PartnersView::Treatments => len(&self.syphilis_treatments),
                PartnersView::ContactTracing => len(&self.contact_tracing),
            },
        }
    }

    fn current_selection_mut(&mut self) -> &mut usize {
        match self.current_tab {
            Tab::Pregnancy => &mut self.history_selection,
            Tab::Labs => &mut self.labs_selection,
            Tab::Visits => match self.visits_view {
                VisitsView::HomeVisits => &mut self.visits_selection,
                VisitsView::Admissions => &mut self.admissions_selection,
            },
            Tab::Contraceptives => &mut self.contraceptives_selection,
            Tab::Infants => match (self.focus, self.infant_detail_view) {
                (Focus::Detail, InfantDetailView::HivScreenings) => {
                    &mut self.screenings_selection
                }
                (Focus::Detail, InfantDetailView::SyphilisScreenings) => {
                    &mut self.syphilis_selection
                }
                (Focus::Detail, InfantDetailView::Diagnoses) => &mut self.diagnoses_selection,
                (Focus::Detail, InfantDetailView::PcrReport) => &mut self.report_selection,
                _ => &mut self.infants_selection,
            },
            Tab::Partners => match self.partners_view {
                PartnersView::Treatments => &mut self.treatments_selection,
                PartnersView::ContactTracing => &mut self.tracing_selection,
            },
        }
    }

    /// Move the cursor in the active list, clamped to the list bounds
    pub fn move_selection(&mut self, delta: i64) {
        let len = self.current_list_len();
        if len == 0 {
            return;
        }
        let max = len - 1;
        let selection = self.current_selection_mut();
        let next = (*selection as i64 + delta).clamp(0, max as i64) as usize;
        let moved = next != *selection;
        *selection = next;

        // Moving through the infant list changes whose detail is shown
        if moved
            && self.current_tab == Tab::Infants
            && self.focus == Focus::List
            && self.infant_detail_view != InfantDetailView::Details
        {
            self.fetch_infant_detail();
        }
    }

    /// Switch the infant detail view and fetch its data
    pub fn set_infant_detail_view(&mut self, view: InfantDetailView) {
        self.infant_detail_view = view;
        self.fetch_infant_detail();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_cycle_round_trip() {
        let mut tab = Tab::Pregnancy;
        for _ in 0..6 {
            tab = tab.next();
        }
        assert_eq!(tab, Tab::Pregnancy);
        assert_eq!(Tab::Pregnancy.prev(), Tab::Partners);
        assert_eq!(Tab::Partners.next(), Tab::Pregnancy);
    }

    #[test]
    fn test_visit_field_cycle() {
        assert_eq!(VisitField::Date.next(), VisitField::Reason);
        assert_eq!(VisitField::Comments.next(), VisitField::Date);
    }

    #[test]
    fn test_visit_form_from_existing() {
        let visit = HomeVisit {
            id: 12,
            reason: Some("Follow up".to_string()),
            comments: None,
            date_of_visit: Some("2020-08-12T00:00:00Z".to_string()),
            ..Default::default()
        };
        let form = VisitForm::from_visit(&visit);
        assert_eq!(form.editing_id, Some(12));
        assert_eq!(form.date_of_visit, "2020-08-12");
        assert_eq!(form.reason, "Follow up");
        assert!(form.comments.is_empty());
    }

    #[test]
    fn test_input_length_limits() {
        assert!(can_add_patient_id_char("123"));
        assert!(!can_add_patient_id_char(&"9".repeat(10)));
        assert!(can_add_email_char("nurse@health.gov.bz"));
        assert!(!can_add_password_char(&"x".repeat(128)));
    }
}
