//! Clinic Core Library
//!
//! Local-first domain state for the clinic front desk: patient registry,
//! appointment book, lab results and a rolling activity log, plus the views
//! the dashboard and patient profile are rendered from.
//!
//! # Architecture
//!
//! ```text
//!         UI action
//!             │
//!             ▼
//!     ┌───────────────┐   mutation + audit line   ┌──────────────────┐
//!     │    Clinic     │ ────────────────────────▶ │   Repositories   │
//!     │  (workflows)  │                           │ patients, appts, │
//!     └───────────────┘                           │ activity, labs   │
//!                                                 └────────┬─────────┘
//!                                                          │ whole-collection
//!                                                          ▼ JSON rewrite
//!                                                 ┌──────────────────┐
//!                                                 │  KeyValueStore   │
//!                                                 │ (SQLite / memory)│
//!                                                 └────────┬─────────┘
//!                                                          │ snapshots
//!                                                          ▼
//!                                      KPIs · patient timeline · search/sort
//! ```
//!
//! # Modules
//!
//! - [`store`]: key-value slots and the JSON collection adapter
//! - [`models`]: domain types (Patient, Appointment, ActivityEntry, LabResult)
//! - [`repo`]: one repository per collection
//! - [`views`]: derived views (KPIs, timeline, search)
//! - [`session`]: session gate
//! - [`clinic`]: front-desk workflows
//! - [`config`]: configuration

pub mod clinic;
pub mod config;
pub mod models;
pub mod repo;
pub mod session;
pub mod store;
pub mod views;

// Re-export commonly used types
pub use clinic::Clinic;
pub use config::{ClinicConfig, DemoCredentials, StorageKeys};
pub use models::{
    ActivityEntry, ActivityMetadata, Appointment, AppointmentStatus, LabResult, LabStatus,
    NewAppointment, NewLabResult, NewPatient, Patient, PatientUpdate, ResultValue,
};
pub use repo::{RepoError, Repositories};
pub use session::SessionGate;
pub use store::{KeyValueStore, MemoryStore, SqliteStore};
pub use views::{DashboardKpis, PatientQuery, TimelineDay, TimelineEvent};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use tracing::info;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum ClinicError {
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Authentication error: {0}")]
    AuthError(String),
}

impl From<store::StoreError> for ClinicError {
    fn from(e: store::StoreError) -> Self {
        ClinicError::StorageError(e.to_string())
    }
}

impl From<repo::RepoError> for ClinicError {
    fn from(e: repo::RepoError) -> Self {
        match e {
            RepoError::Store(e) => e.into(),
            RepoError::Validation(msg) => ClinicError::InvalidInput(msg),
            RepoError::InvalidStatus(status) => ClinicError::InvalidStatus(status),
        }
    }
}

impl From<session::AuthError> for ClinicError {
    fn from(e: session::AuthError) -> Self {
        match e {
            session::AuthError::Store(e) => e.into(),
            other => ClinicError::AuthError(other.to_string()),
        }
    }
}

impl From<models::UnknownStatus> for ClinicError {
    fn from(e: models::UnknownStatus) -> Self {
        ClinicError::InvalidStatus(e.0)
    }
}

impl<T> From<std::sync::PoisonError<T>> for ClinicError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        ClinicError::StorageError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Install a `tracing` subscriber. Safe to call more than once.
#[uniffi::export]
pub fn init_logging(filter: Option<String>) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let filter = filter
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".into());
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Open or create the clinic store at the given path.
#[uniffi::export]
pub fn open_clinic(database_path: String) -> Result<Arc<ClinicCore>, ClinicError> {
    let config = ClinicConfig {
        database_path: Some(database_path.into()),
        ..Default::default()
    };
    ClinicCore::with_config(config).map(Arc::new)
}

/// Create an in-memory clinic store (for testing and demos).
#[uniffi::export]
pub fn open_clinic_in_memory() -> Result<Arc<ClinicCore>, ClinicError> {
    ClinicCore::with_config(ClinicConfig::default()).map(Arc::new)
}

/// Open the clinic store described by `CLINIC_*` environment variables.
#[uniffi::export]
pub fn open_clinic_from_env() -> Result<Arc<ClinicCore>, ClinicError> {
    ClinicCore::with_config(ClinicConfig::from_env()).map(Arc::new)
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe clinic state for FFI.
#[derive(uniffi::Object)]
pub struct ClinicCore {
    store: Arc<Mutex<SqliteStore>>,
    session: SessionGate,
    config: ClinicConfig,
}

impl ClinicCore {
    /// Build from a config (not exported; use the factory functions over FFI).
    pub fn with_config(config: ClinicConfig) -> Result<Self, ClinicError> {
        let store = match &config.database_path {
            Some(path) => SqliteStore::open(path)?,
            None => SqliteStore::open_in_memory()?,
        };
        info!(path = ?config.database_path, "opened clinic store");
        Ok(Self {
            store: Arc::new(Mutex::new(store)),
            session: SessionGate::in_memory(),
            config,
        })
    }
}

#[uniffi::export]
impl ClinicCore {
    // =========================================================================
    // Patient Operations
    // =========================================================================

    pub fn list_patients(&self) -> Result<Vec<FfiPatient>, ClinicError> {
        let store = self.store.lock()?;
        let clinic = Clinic::new(&*store, &self.config.keys);
        let patients = clinic.repositories().patients.list();
        Ok(patients.into_iter().map(|p| p.into()).collect())
    }

    pub fn get_patient(&self, id: String) -> Result<Option<FfiPatient>, ClinicError> {
        let store = self.store.lock()?;
        let clinic = Clinic::new(&*store, &self.config.keys);
        Ok(clinic.repositories().patients.get(&id).map(|p| p.into()))
    }

    pub fn create_patient(&self, patient: FfiNewPatient) -> Result<FfiPatient, ClinicError> {
        let store = self.store.lock()?;
        let clinic = Clinic::new(&*store, &self.config.keys);
        let created = clinic.repositories().patients.create(patient.into())?;
        Ok(created.into())
    }

    /// Returns the whole updated registry.
    pub fn update_patient(
        &self,
        id: String,
        update: FfiPatientUpdate,
    ) -> Result<Vec<FfiPatient>, ClinicError> {
        let store = self.store.lock()?;
        let clinic = Clinic::new(&*store, &self.config.keys);
        let patients = clinic.repositories().patients.update(&id, update.into())?;
        Ok(patients.into_iter().map(|p| p.into()).collect())
    }

    /// Filter and sort the registry.
    pub fn search_patients(
        &self,
        term: String,
        sort: FfiSortKey,
        direction: FfiSortDirection,
    ) -> Result<Vec<FfiPatient>, ClinicError> {
        let store = self.store.lock()?;
        let clinic = Clinic::new(&*store, &self.config.keys);
        let query = PatientQuery {
            term,
            sort: sort.into(),
            direction: direction.into(),
        };
        let patients = views::search_patients(&clinic.repositories().patients.list(), &query);
        Ok(patients.into_iter().map(|p| p.into()).collect())
    }

    /// Distinct patient names for the booking form.
    pub fn patient_name_options(&self) -> Result<Vec<String>, ClinicError> {
        let store = self.store.lock()?;
        let clinic = Clinic::new(&*store, &self.config.keys);
        Ok(views::patient_name_options(
            &clinic.repositories().patients.list(),
        ))
    }

    // =========================================================================
    // Appointment Operations
    // =========================================================================

    pub fn list_appointments(&self) -> Result<Vec<FfiAppointment>, ClinicError> {
        let store = self.store.lock()?;
        let clinic = Clinic::new(&*store, &self.config.keys);
        let appointments = clinic.repositories().appointments.list();
        Ok(appointments.into_iter().map(|a| a.into()).collect())
    }

    pub fn get_appointment(&self, id: String) -> Result<Option<FfiAppointment>, ClinicError> {
        let store = self.store.lock()?;
        let clinic = Clinic::new(&*store, &self.config.keys);
        Ok(clinic.repositories().appointments.get(&id).map(|a| a.into()))
    }

    /// Appointments linked to a patient by ID.
    pub fn list_patient_appointments(
        &self,
        patient_id: String,
    ) -> Result<Vec<FfiAppointment>, ClinicError> {
        let store = self.store.lock()?;
        let clinic = Clinic::new(&*store, &self.config.keys);
        let appointments = clinic
            .repositories()
            .appointments
            .list_for_patient(&patient_id);
        Ok(appointments.into_iter().map(|a| a.into()).collect())
    }

    /// Book an appointment and log it.
    pub fn schedule_appointment(
        &self,
        appointment: FfiNewAppointment,
    ) -> Result<FfiAppointment, ClinicError> {
        let store = self.store.lock()?;
        let clinic = Clinic::new(&*store, &self.config.keys);
        let created = clinic.schedule_appointment(appointment.into())?;
        Ok(created.into())
    }

    /// Delete an appointment and log it. Returns the remaining appointments.
    pub fn delete_appointment(&self, id: String) -> Result<Vec<FfiAppointment>, ClinicError> {
        let store = self.store.lock()?;
        let clinic = Clinic::new(&*store, &self.config.keys);
        let remaining = clinic.delete_appointment(&id)?;
        Ok(remaining.into_iter().map(|a| a.into()).collect())
    }

    /// Move an appointment to `upcoming`, `completed` or `cancelled` and log it.
    pub fn update_appointment_status(
        &self,
        id: String,
        status: String,
    ) -> Result<Vec<FfiAppointment>, ClinicError> {
        let store = self.store.lock()?;
        let clinic = Clinic::new(&*store, &self.config.keys);
        let appointments = clinic.set_appointment_status(&id, &status)?;
        Ok(appointments.into_iter().map(|a| a.into()).collect())
    }

    // =========================================================================
    // Activity Operations
    // =========================================================================

    pub fn list_activity(&self) -> Result<Vec<FfiActivityEntry>, ClinicError> {
        let store = self.store.lock()?;
        let clinic = Clinic::new(&*store, &self.config.keys);
        let entries = clinic.repositories().activity.list();
        Ok(entries.into_iter().map(|e| e.into()).collect())
    }

    /// Append a free-form entry. An empty message is ignored.
    pub fn add_activity(
        &self,
        message: String,
        kind: Option<String>,
    ) -> Result<Vec<FfiActivityEntry>, ClinicError> {
        let store = self.store.lock()?;
        let clinic = Clinic::new(&*store, &self.config.keys);
        let metadata = models::ActivityMetadata {
            kind,
            ..Default::default()
        };
        let entries = clinic.repositories().activity.add(&message, metadata)?;
        Ok(entries.into_iter().map(|e| e.into()).collect())
    }

    pub fn delete_activity(&self, id: String) -> Result<Vec<FfiActivityEntry>, ClinicError> {
        let store = self.store.lock()?;
        let clinic = Clinic::new(&*store, &self.config.keys);
        let entries = clinic.repositories().activity.delete(&id)?;
        Ok(entries.into_iter().map(|e| e.into()).collect())
    }

    pub fn clear_activity(&self) -> Result<Vec<FfiActivityEntry>, ClinicError> {
        let store = self.store.lock()?;
        let clinic = Clinic::new(&*store, &self.config.keys);
        let entries = clinic.repositories().activity.clear()?;
        Ok(entries.into_iter().map(|e| e.into()).collect())
    }

    // =========================================================================
    // Lab Operations
    // =========================================================================

    /// Log a lab upload for a patient (counts toward Pending Labs).
    pub fn record_lab_result(
        &self,
        patient_id: String,
    ) -> Result<Vec<FfiActivityEntry>, ClinicError> {
        let store = self.store.lock()?;
        let clinic = Clinic::new(&*store, &self.config.keys);
        let entries = clinic.record_lab_result(&patient_id)?;
        Ok(entries.into_iter().map(|e| e.into()).collect())
    }

    /// Store a full lab result and log the upload.
    pub fn create_lab_result(&self, lab: FfiNewLabResult) -> Result<FfiLabResult, ClinicError> {
        let input: NewLabResult = lab.try_into()?;
        let store = self.store.lock()?;
        let clinic = Clinic::new(&*store, &self.config.keys);
        let created = clinic.record_lab_result_detail(input)?;
        Ok(created.into())
    }

    pub fn list_lab_results(
        &self,
        patient_id: Option<String>,
    ) -> Result<Vec<FfiLabResult>, ClinicError> {
        let store = self.store.lock()?;
        let clinic = Clinic::new(&*store, &self.config.keys);
        let labs = match patient_id {
            Some(id) => clinic.repositories().lab_results.list_for_patient(&id),
            None => clinic.repositories().lab_results.list(),
        };
        Ok(labs.into_iter().map(|l| l.into()).collect())
    }

    pub fn update_lab_result(
        &self,
        id: String,
        update: FfiLabResultUpdate,
    ) -> Result<Vec<FfiLabResult>, ClinicError> {
        let update: models::LabResultUpdate = update.try_into()?;
        let store = self.store.lock()?;
        let clinic = Clinic::new(&*store, &self.config.keys);
        let labs = clinic.repositories().lab_results.update(&id, update)?;
        Ok(labs.into_iter().map(|l| l.into()).collect())
    }

    pub fn archive_lab_result(&self, id: String) -> Result<Vec<FfiLabResult>, ClinicError> {
        let store = self.store.lock()?;
        let clinic = Clinic::new(&*store, &self.config.keys);
        let labs = clinic.repositories().lab_results.archive(&id)?;
        Ok(labs.into_iter().map(|l| l.into()).collect())
    }

    pub fn delete_lab_result(&self, id: String) -> Result<Vec<FfiLabResult>, ClinicError> {
        let store = self.store.lock()?;
        let clinic = Clinic::new(&*store, &self.config.keys);
        let labs = clinic.repositories().lab_results.delete(&id)?;
        Ok(labs.into_iter().map(|l| l.into()).collect())
    }

    // =========================================================================
    // Derived Views
    // =========================================================================

    /// Dashboard KPIs for the current local date.
    pub fn dashboard_kpis(&self) -> Result<FfiDashboardKpis, ClinicError> {
        let store = self.store.lock()?;
        let clinic = Clinic::new(&*store, &self.config.keys);
        let today = chrono::Local::now().date_naive();
        Ok(clinic.kpis(today).into())
    }

    /// Patient timeline, oldest event first.
    pub fn patient_timeline(
        &self,
        patient_id: String,
    ) -> Result<Vec<FfiTimelineEvent>, ClinicError> {
        let store = self.store.lock()?;
        let clinic = Clinic::new(&*store, &self.config.keys);
        let events = clinic
            .timeline(&patient_id)
            .ok_or_else(|| ClinicError::NotFound(format!("patient {}", patient_id)))?;
        Ok(events.into_iter().map(|e| e.into()).collect())
    }

    /// Patient timeline grouped by calendar day.
    pub fn patient_timeline_by_day(
        &self,
        patient_id: String,
    ) -> Result<Vec<FfiTimelineDay>, ClinicError> {
        let store = self.store.lock()?;
        let clinic = Clinic::new(&*store, &self.config.keys);
        let events = clinic
            .timeline(&patient_id)
            .ok_or_else(|| ClinicError::NotFound(format!("patient {}", patient_id)))?;
        Ok(views::group_by_day(&events)
            .into_iter()
            .map(|d| d.into())
            .collect())
    }

    // =========================================================================
    // Session Operations
    // =========================================================================

    pub fn login(&self, email: String, password: String) -> Result<String, ClinicError> {
        Ok(self
            .session
            .login(&email, &password, &self.config.credentials)?)
    }

    pub fn logout(&self) -> Result<(), ClinicError> {
        Ok(self.session.logout()?)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }
}

/// Numeric strings are stored as numbers, anything else as text.
fn parse_result_value(raw: String) -> ResultValue {
    match raw.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => ResultValue::Number(n),
        _ => ResultValue::Text(raw),
    }
}


// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: String,
    pub full_name: String,
    pub dob: String,
    pub gender: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub notes: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Patient> for FfiPatient {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id,
            full_name: patient.full_name,
            dob: patient.dob,
            gender: patient.gender,
            phone: patient.phone,
            email: patient.email,
            address: patient.address,
            notes: patient.notes,
            created_at: patient.created_at,
            updated_at: patient.updated_at,
        }
    }
}

/// FFI-safe registration input.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewPatient {
    pub full_name: String,
    pub dob: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl From<FfiNewPatient> for NewPatient {
    fn from(p: FfiNewPatient) -> Self {
        NewPatient {
            full_name: p.full_name,
            dob: p.dob,
            gender: p.gender,
            phone: p.phone,
            email: p.email,
            address: p.address,
            notes: p.notes,
        }
    }
}

/// FFI-safe partial patient update.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientUpdate {
    pub full_name: Option<String>,
    pub dob: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl From<FfiPatientUpdate> for PatientUpdate {
    fn from(u: FfiPatientUpdate) -> Self {
        PatientUpdate {
            full_name: u.full_name,
            dob: u.dob,
            gender: u.gender,
            phone: u.phone,
            email: u.email,
            address: u.address,
            notes: u.notes,
        }
    }
}

/// FFI-safe appointment.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAppointment {
    pub id: String,
    pub patient_id: Option<String>,
    pub patient_name: String,
    pub date_time: String,
    pub reason: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Appointment> for FfiAppointment {
    fn from(appt: Appointment) -> Self {
        Self {
            id: appt.id,
            patient_id: appt.patient_id,
            patient_name: appt.patient_name,
            date_time: appt.date_time,
            reason: appt.reason,
            status: appt.status.to_string(),
            created_at: appt.created_at,
            updated_at: appt.updated_at,
        }
    }
}

/// FFI-safe booking input.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewAppointment {
    pub patient_id: Option<String>,
    pub patient_name: String,
    pub date_time: String,
    pub reason: String,
}

impl From<FfiNewAppointment> for NewAppointment {
    fn from(a: FfiNewAppointment) -> Self {
        NewAppointment {
            patient_id: a.patient_id,
            patient_name: a.patient_name,
            date_time: a.date_time,
            reason: a.reason,
        }
    }
}

/// FFI-safe activity entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiActivityEntry {
    pub id: String,
    pub message: String,
    pub kind: Option<String>,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub patient_id: Option<String>,
    /// Patient name at logging time; the timeline falls back to it when there is no ID
    pub patient_name: Option<String>,
    pub created_at: i64,
}

impl From<ActivityEntry> for FfiActivityEntry {
    fn from(entry: ActivityEntry) -> Self {
        Self {
            id: entry.id,
            message: entry.message,
            kind: entry.kind,
            entity_type: entry.entity_type,
            entity_id: entry.entity_id,
            patient_id: entry.patient_id,
            patient_name: entry.patient_name,
            created_at: entry.created_at,
        }
    }
}

/// FFI-safe lab result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiLabResult {
    pub id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub appointment_id: Option<String>,
    pub test_name: String,
    pub result_value: String,
    pub unit: String,
    pub reference_range: String,
    pub status: String,
    pub is_archived: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<LabResult> for FfiLabResult {
    fn from(lab: LabResult) -> Self {
        Self {
            id: lab.id,
            patient_id: lab.patient_id,
            patient_name: lab.patient_name,
            appointment_id: lab.appointment_id,
            test_name: lab.test_name,
            result_value: lab.result_value.to_string(),
            unit: lab.unit,
            reference_range: lab.reference_range,
            status: lab.status.as_str().to_string(),
            is_archived: lab.is_archived,
            created_at: lab.created_at,
            updated_at: lab.updated_at,
        }
    }
}

/// FFI-safe lab input. Numeric result values are stored as numbers.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewLabResult {
    pub patient_id: String,
    pub patient_name: Option<String>,
    pub appointment_id: Option<String>,
    pub test_name: String,
    pub result_value: String,
    pub unit: Option<String>,
    pub reference_range: Option<String>,
    pub status: Option<String>,
}

impl TryFrom<FfiNewLabResult> for NewLabResult {
    type Error = ClinicError;

    fn try_from(lab: FfiNewLabResult) -> Result<Self, Self::Error> {
        let status = lab.status.as_deref().map(str::parse::<LabStatus>).transpose()?;
        let result_value = parse_result_value(lab.result_value);
        Ok(NewLabResult {
            patient_id: lab.patient_id,
            patient_name: lab.patient_name,
            appointment_id: lab.appointment_id,
            test_name: lab.test_name,
            result_value,
            unit: lab.unit,
            reference_range: lab.reference_range,
            status,
        })
    }
}

/// FFI-safe partial lab update; `None` leaves the field as it is.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiLabResultUpdate {
    pub appointment_id: Option<String>,
    pub test_name: Option<String>,
    pub result_value: Option<String>,
    pub unit: Option<String>,
    pub reference_range: Option<String>,
    pub status: Option<String>,
    pub is_archived: Option<bool>,
}

impl TryFrom<FfiLabResultUpdate> for models::LabResultUpdate {
    type Error = ClinicError;

    fn try_from(update: FfiLabResultUpdate) -> Result<Self, Self::Error> {
        Ok(models::LabResultUpdate {
            appointment_id: update.appointment_id,
            test_name: update.test_name,
            result_value: update.result_value.map(parse_result_value),
            unit: update.unit,
            reference_range: update.reference_range,
            status: update
                .status
                .as_deref()
                .map(str::parse::<LabStatus>)
                .transpose()?,
            is_archived: update.is_archived,
        })
    }
}

/// FFI-safe dashboard KPIs.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDashboardKpis {
    pub patients: u32,
    pub todays_appointments: u32,
    pub pending_labs: u32,
}

impl From<DashboardKpis> for FfiDashboardKpis {
    fn from(kpis: DashboardKpis) -> Self {
        Self {
            patients: kpis.patients as u32,
            todays_appointments: kpis.todays_appointments as u32,
            pending_labs: kpis.pending_labs as u32,
        }
    }
}

/// FFI-safe timeline event.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTimelineEvent {
    pub id: String,
    /// "appointment" or "lab"
    pub kind: String,
    /// Local date-time, `YYYY-MM-DDTHH:MM:SS`
    pub date: String,
    pub label: String,
    pub title: String,
    pub description: String,
    /// True when the event was attributed by name or message rather than ID
    pub heuristic_match: bool,
}

impl From<TimelineEvent> for FfiTimelineEvent {
    fn from(event: TimelineEvent) -> Self {
        let kind = match event.kind {
            views::TimelineEventKind::Appointment => "appointment",
            views::TimelineEventKind::Lab => "lab",
        };
        Self {
            id: event.id,
            kind: kind.to_string(),
            date: event.date.format("%Y-%m-%dT%H:%M:%S").to_string(),
            label: event.label,
            title: event.title,
            description: event.description,
            heuristic_match: event.matched_by.is_heuristic(),
        }
    }
}

/// FFI-safe timeline day group.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTimelineDay {
    /// `YYYY-MM-DD`
    pub date: String,
    pub label: String,
    pub events: Vec<FfiTimelineEvent>,
}

impl From<TimelineDay> for FfiTimelineDay {
    fn from(day: TimelineDay) -> Self {
        Self {
            date: day.date.format("%Y-%m-%d").to_string(),
            label: day.label,
            events: day.events.into_iter().map(|e| e.into()).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, uniffi::Enum)]
pub enum FfiSortKey {
    Name,
    CreatedAt,
}

impl From<FfiSortKey> for views::SortKey {
    fn from(key: FfiSortKey) -> Self {
        match key {
            FfiSortKey::Name => views::SortKey::Name,
            FfiSortKey::CreatedAt => views::SortKey::CreatedAt,
        }
    }
}

#[derive(Debug, Clone, Copy, uniffi::Enum)]
pub enum FfiSortDirection {
    Asc,
    Desc,
}

impl From<FfiSortDirection> for views::SortDirection {
    fn from(direction: FfiSortDirection) -> Self {
        match direction {
            FfiSortDirection::Asc => views::SortDirection::Asc,
            FfiSortDirection::Desc => views::SortDirection::Desc,
        }
    }
}
