//! REST API client module for the EMTCT service.
//!
//! This module provides the `ApiClient` for communicating with the
//! EMTCT API to fetch patient, pregnancy, infant, and report data.
//!
//! The API uses JWT bearer token authentication obtained through
//! the login endpoint.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
