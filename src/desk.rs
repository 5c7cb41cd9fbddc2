//! Policy desk: the views and commands the front end drives
//!
//! Holds the backend, the session and the configuration, and builds each
//! view fresh from a backend query. Nothing is cached between calls.
//!
//! # Example
//! ```ignore
//! let session = Session::start(StaticAuth::signed_in(user_id));
//! let mut desk = PolicyDesk::new(CsvStore::open("data")?, session, TrackerConfig::default());
//!
//! let stats = desk.dashboard(Utc::now());
//! for row in desk.renewals(Utc::now()) {
//!     println!("{} {}", row.policy.policy_number, row.badge());
//! }
//! ```

use chrono::{DateTime, Utc};
use log::{error, info, warn};

use crate::client::{Client, UserId};
use crate::config::TrackerConfig;
use crate::create::PolicyForm;
use crate::error::{DeskError, StoreError};
use crate::notify::Notifier;
use crate::renewal::RenewalRow;
use crate::report::{DashboardStats, ReportData};
use crate::session::{AuthProvider, Session};
use crate::store::Backend;

pub const MSG_NOT_AUTHENTICATED: &str = "Usuario no autenticado";
pub const MSG_POLICY_CREATED: &str = "Póliza creada exitosamente";
pub const MSG_POLICY_FAILED: &str = "Error al crear la póliza";
pub const MSG_SIGN_OUT_FAILED: &str = "Error al cerrar sesión";

/// Read paths degrade to an empty result; the failure is only logged
fn or_empty<T: Default>(what: &str, result: Result<T, StoreError>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!("{} fetch failed, showing empty result: {}", what, e);
            T::default()
        }
    }
}

pub struct PolicyDesk<B: Backend, A: AuthProvider> {
    backend: B,
    session: Session<A>,
    config: TrackerConfig,
}

impl<B: Backend, A: AuthProvider> PolicyDesk<B, A> {
    pub fn new(backend: B, session: Session<A>, config: TrackerConfig) -> Self {
        Self { backend, session, config }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn session(&self) -> &Session<A> {
        &self.session
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    fn owner(&self) -> Option<UserId> {
        self.session.owner_id()
    }

    /// Summary cards: client count, active count, expiring soon, revenue
    pub fn dashboard(&self, now: DateTime<Utc>) -> DashboardStats {
        let Some(owner) = self.owner() else {
            return DashboardStats::default();
        };

        let clients = or_empty("clients", self.backend.list_clients_by_owner(owner));
        let policies = or_empty("policies", self.backend.list_policies_by_owner(owner));

        DashboardStats::compute(now, self.config.dashboard_window(), clients.len(), &policies)
    }

    /// Active policies expiring within the renewals window, soonest first
    pub fn renewals(&self, now: DateTime<Utc>) -> Vec<RenewalRow> {
        let Some(owner) = self.owner() else {
            return Vec::new();
        };

        let (from, to) = self.config.renewals_window().bounds(now);
        let rows = or_empty("renewals", self.backend.list_expiring_between(owner, from, to));

        rows.into_iter()
            .map(|row| RenewalRow::build(now, row, &self.config.urgency))
            .collect()
    }

    /// Report page aggregates
    ///
    /// A failed policy fetch yields an all-zero report, client count included.
    pub fn report(&self) -> ReportData {
        let Some(owner) = self.owner() else {
            return ReportData::default();
        };

        let policies = match self.backend.list_policies_by_owner(owner) {
            Ok(p) => p,
            Err(e) => {
                warn!("report fetch failed, showing empty result: {}", e);
                return ReportData::default();
            }
        };
        let clients = or_empty("clients", self.backend.list_clients_by_owner(owner));

        ReportData::compute(clients.len(), &policies, self.config.revenue_bucketing)
    }

    /// The user's clients ordered by name
    pub fn clients(&self) -> Vec<Client> {
        match self.owner() {
            Some(owner) => or_empty("clients", self.backend.list_clients_by_owner(owner)),
            None => Vec::new(),
        }
    }

    /// Profile full name for the header, when one is set
    pub fn greeting_name(&self) -> Option<String> {
        let owner = self.owner()?;
        or_empty("profile", self.backend.profile(owner)).and_then(|p| p.full_name)
    }

    /// Validate the form and insert a new active policy
    ///
    /// - no signed-in user: one error notification, nothing written
    /// - invalid input: field errors returned, no notification, nothing written
    /// - backend failure (client lookup or insert): one error notification,
    ///   form left intact for retry
    /// - success: one success notification, form reset, `on_success` invoked
    pub fn create_policy(
        &mut self,
        form: &mut PolicyForm,
        notifier: &mut dyn Notifier,
        on_success: Option<&mut dyn FnMut()>,
    ) -> Result<(), DeskError> {
        let Some(owner) = self.owner() else {
            notifier.error(MSG_NOT_AUTHENTICATED);
            return Err(DeskError::NotAuthenticated);
        };

        let clients = match self.backend.list_clients_by_owner(owner) {
            Ok(clients) => clients,
            Err(e) => {
                error!("Error loading clients for new policy: {}", e);
                notifier.error(MSG_POLICY_FAILED);
                return Err(DeskError::Store(e));
            }
        };
        let input = form.validate(&clients).map_err(DeskError::Validation)?;
        let policy_number = input.policy_number.clone();

        match self.backend.insert_policy(input.into_new_policy(owner)) {
            Ok(()) => {
                info!("Created policy {} for user {}", policy_number, owner);
                notifier.success(MSG_POLICY_CREATED);
                form.reset();
                if let Some(callback) = on_success {
                    callback();
                }
                Ok(())
            }
            Err(e) => {
                error!("Error creating policy {}: {}", policy_number, e);
                notifier.error(MSG_POLICY_FAILED);
                Err(DeskError::Store(e))
            }
        }
    }

    /// End the session; the desk shows empty views afterwards
    pub fn sign_out(&mut self, notifier: &mut dyn Notifier) -> Result<(), DeskError> {
        if let Err(e) = self.session.sign_out() {
            error!("Sign-out failed: {}", e);
            notifier.error(MSG_SIGN_OUT_FAILED);
            return Err(DeskError::Auth(e));
        }
        Ok(())
    }
}
