//! Data models for EMTCT clinical records.
//!
//! All wire types deserialize from the API's camelCase JSON. Derived display
//! figures (gestational age label, obstetric interval, consolidated
//! screenings) are computed here, never read from the wire.

pub mod contraceptives;
pub mod encounters;
pub mod infant;
pub mod labs;
pub mod partners;
pub mod patient;
pub mod pregnancy;
pub mod screening;

pub use contraceptives::ContraceptiveUsed;
pub use encounters::{HomeVisit, HomeVisitPayload, HospitalAdmission};
pub use infant::{HivScreening, Infant, InfantDiagnosis, SyphilisScreening};
pub use labs::LabResult;
pub use partners::{ContactTracing, PartnerSyphilisTreatment};
pub use patient::{ObstetricEvent, Patient, PatientRecord};
pub use pregnancy::{obstetric_interval_days, CurrentPregnancy, Pregnancy, PregnancySummary};
pub use screening::{consolidate_screenings, ConsolidatedInfantScreening, ScreeningRecord};
