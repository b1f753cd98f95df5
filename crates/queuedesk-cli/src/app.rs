//! Command handlers for the queuedesk CLI.
//!
//! `App` owns the configuration and the auth flow (and through it the
//! gateway and session store). Every command except login/logout first
//! restores the persisted session and requires the admin role.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::{debug, warn};

use queuedesk_core::api::ApiClient;
use queuedesk_core::auth::{AuthFlow, CredentialStore, LoginError, SessionStore};
use queuedesk_core::config::Config;
use queuedesk_core::models::{AppointmentScope, Direction, NewAppointment, QueueSummary, User};
use queuedesk_core::utils::{is_iso_date, today_iso};

use crate::render;

/// Refresh period for `queue list --watch`.
const WATCH_INTERVAL_SECS: u64 = 10;

pub struct App {
    config: Config,
    flow: AuthFlow,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let session = match config.session_dir() {
            Ok(dir) => SessionStore::open(dir),
            Err(e) => {
                warn!(error = %e, "No cache directory, session will not persist");
                SessionStore::in_memory()
            }
        };
        Self::with_session(config, Arc::new(session))
    }

    fn with_session(config: Config, session: Arc<SessionStore>) -> Result<Self> {
        let api = ApiClient::new(config.base_url(), session)
            .context("Failed to create HTTP client")?;

        Ok(Self {
            config,
            flow: AuthFlow::new(api),
        })
    }

    fn api(&self) -> &ApiClient {
        self.flow.api()
    }

    /// Restore the session and insist on an authenticated admin.
    async fn require_admin(&mut self) -> Result<User> {
        match self.flow.refetch_me().await {
            Ok(user) => Ok(user),
            Err(LoginError::NotSignedIn) => bail!("Not signed in - run `queuedesk login` first"),
            Err(e) => bail!("{} - run `queuedesk login` to sign in again", e),
        }
    }

    fn hospital_id(&self) -> Option<&str> {
        self.config.hospital_id.as_deref()
    }

    fn resolve_date(date: Option<String>) -> Result<String> {
        match date {
            Some(date) if !is_iso_date(&date) => bail!("Dates must be YYYY-MM-DD, got {:?}", date),
            Some(date) => Ok(date),
            None => Ok(today_iso()),
        }
    }

    /// The given department, or the hospital's first one.
    async fn resolve_department(&self, department: Option<String>) -> Result<String> {
        if let Some(id) = department {
            return Ok(id);
        }
        let departments = self.api().list_departments(self.hospital_id()).await?;
        departments
            .into_iter()
            .next()
            .map(|d| d.id)
            .context("No departments found - create one with `queuedesk departments create`")
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    pub async fn login(
        &mut self,
        email: Option<String>,
        password: Option<String>,
        remember: bool,
    ) -> Result<()> {
        let email = match email.or_else(|| self.config.last_email.clone()) {
            Some(email) => email,
            None => prompt("Email: ")?,
        };

        let password = match password {
            Some(password) => password,
            None if CredentialStore::has_credentials(&email) => {
                debug!("Using remembered password");
                CredentialStore::get_password(&email)?
            }
            None => rpassword::prompt_password("Password: ")?,
        };

        let user = self.flow.login(&email, &password).await?;

        if remember {
            if let Err(e) = CredentialStore::store(&user.email, &password) {
                warn!(error = %e, "Failed to store credentials");
            }
        }
        self.config.last_email = Some(user.email.clone());
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }

        println!("Signed in as {}", user.display());
        Ok(())
    }

    pub fn logout(&mut self, forget: bool) -> Result<()> {
        self.flow.logout();
        if forget {
            if let Some(ref email) = self.config.last_email {
                CredentialStore::delete(email)?;
            }
        }
        println!("Signed out");
        Ok(())
    }

    pub async fn whoami(&mut self) -> Result<()> {
        let user = self.require_admin().await?;
        render::print_user(&user);
        Ok(())
    }

    // =========================================================================
    // Overview
    // =========================================================================

    pub async fn overview(&mut self, department: Option<String>, date: Option<String>) -> Result<()> {
        self.require_admin().await?;
        let date = Self::resolve_date(date)?;
        let overview = self
            .api()
            .fetch_overview(self.hospital_id(), department.as_deref(), Some(&date))
            .await?;
        render::print_overview(&overview, &date);
        Ok(())
    }

    // =========================================================================
    // Departments
    // =========================================================================

    pub async fn list_departments(&mut self) -> Result<()> {
        self.require_admin().await?;
        let departments = self.api().list_departments(self.hospital_id()).await?;
        render::print_departments(&departments);
        Ok(())
    }

    pub async fn create_department(&mut self, name: &str) -> Result<()> {
        self.require_admin().await?;
        let Some(hospital_id) = self.hospital_id() else {
            bail!("Missing hospital id - set QUEUEDESK_HOSPITAL_ID or pass --hospital-id");
        };
        let department = self.api().create_department(name, hospital_id).await?;
        println!("Created department {} ({})", department.name, department.id);
        Ok(())
    }

    // =========================================================================
    // Queue
    // =========================================================================

    pub async fn list_queue(
        &mut self,
        department: Option<String>,
        date: Option<String>,
        watch: bool,
    ) -> Result<()> {
        self.require_admin().await?;
        let date = Self::resolve_date(date)?;
        let department = self.resolve_department(department).await?;

        if !watch {
            let items = self.api().list_queue(&department, Some(&date)).await?;
            render::print_queue(&QueueSummary::from_items(items));
            return Ok(());
        }

        let mut ticker = tokio::time::interval(Duration::from_secs(WATCH_INTERVAL_SECS));
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    // A failed refresh is shown and the watch carries on,
                    // unless the session is gone
                    match self.api().list_queue(&department, Some(&date)).await {
                        Ok(items) => render::print_queue(&QueueSummary::from_items(items)),
                        Err(e) if e.is_unauthorized() => return Err(e.into()),
                        Err(e) => eprintln!("Refresh failed: {}", e),
                    }
                }
                _ = tokio::signal::ctrl_c() => return Ok(()),
            }
        }
    }

    pub async fn next_in_queue(&mut self, department: Option<String>, date: Option<String>) -> Result<()> {
        self.require_admin().await?;
        let date = Self::resolve_date(date)?;
        let department = self.resolve_department(department).await?;
        let next = self.api().next_in_queue(&department, Some(&date)).await?;
        println!(
            "Now serving #{} (appointment {}) - {}",
            next.position, next.appointment_id, next.status
        );
        Ok(())
    }

    pub async fn move_in_queue(&mut self, id: &str, direction: Direction) -> Result<()> {
        self.require_admin().await?;
        let moved = self.api().move_in_queue(id, direction).await?;
        println!("{} is now at position #{} ({})", moved.id, moved.position, moved.status);
        Ok(())
    }

    // =========================================================================
    // Appointments
    // =========================================================================

    pub async fn complete_appointment(&mut self, id: &str) -> Result<()> {
        self.require_admin().await?;
        let action = self.api().complete_appointment(id).await?;
        render::print_appointment_action(&action);
        Ok(())
    }

    pub async fn cancel_appointment(&mut self, id: &str) -> Result<()> {
        self.require_admin().await?;
        let action = self.api().cancel_appointment(id).await?;
        render::print_appointment_action(&action);
        Ok(())
    }

    pub async fn my_appointments(&mut self, scope: Option<AppointmentScope>) -> Result<()> {
        self.require_admin().await?;
        let appointments = self.api().my_appointments(scope).await?;
        render::print_appointments(&appointments);
        Ok(())
    }

    pub async fn create_appointment(&mut self, department: String, date: String, time: String) -> Result<()> {
        self.require_admin().await?;
        let Some(hospital_id) = self.hospital_id().map(str::to_string) else {
            bail!("Missing hospital id - set QUEUEDESK_HOSPITAL_ID or pass --hospital-id");
        };
        let date = Self::resolve_date(Some(date))?;
        let created = self
            .api()
            .create_appointment(&NewAppointment {
                department_id: department,
                hospital_id,
                date,
                time,
            })
            .await?;
        render::print_created_appointment(&created);
        Ok(())
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
