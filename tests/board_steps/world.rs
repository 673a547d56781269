//! Shared world state for task board BDD scenarios.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use esg_taskboard::board::{
    adapters::memory::InMemoryTaskBoardApi,
    domain::{ReportId, Task, TaskId, User, UserId},
    services::{BoardConfig, BoardSession, MutationOutcome},
};
use mockable::Clock;
use rstest::fixture;

/// Report every scenario board is mounted for.
pub const REPORT_ID: &str = "esg-2026";

/// Clock pinned to 2026-10-17 so derived due dates are stable.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioClock(DateTime<Utc>);

impl Default for ScenarioClock {
    fn default() -> Self {
        Self(
            Utc.with_ymd_and_hms(2026, 10, 17, 9, 30, 0)
                .single()
                .unwrap_or_default(),
        )
    }
}

impl Clock for ScenarioClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Session type used by the BDD world.
pub type TestSession = BoardSession<InMemoryTaskBoardApi, ScenarioClock>;

/// Scenario world for task board behaviour tests.
pub struct BoardWorld {
    pub api: Arc<InMemoryTaskBoardApi>,
    pub seed_tasks: Vec<Task>,
    pub seed_users: Vec<User>,
    pub session: Option<TestSession>,
    pub last_outcome: Option<MutationOutcome>,
}

impl BoardWorld {
    /// Creates a world with an empty server.
    #[must_use]
    pub fn new() -> Self {
        esg_taskboard::telemetry::init_tracing_once();
        Self {
            api: Arc::new(InMemoryTaskBoardApi::new()),
            seed_tasks: Vec::new(),
            seed_users: Vec::new(),
            session: None,
            last_outcome: None,
        }
    }

    /// Returns the mounted session.
    ///
    /// # Errors
    ///
    /// Returns an error when the scenario has not mounted the board.
    pub fn session(&self) -> Result<&TestSession, eyre::Report> {
        self.session
            .as_ref()
            .ok_or_else(|| eyre::eyre!("board not mounted in scenario world"))
    }

    /// Returns the mounted session for mutation.
    ///
    /// # Errors
    ///
    /// Returns an error when the scenario has not mounted the board.
    pub fn session_mut(&mut self) -> Result<&mut TestSession, eyre::Report> {
        self.session
            .as_mut()
            .ok_or_else(|| eyre::eyre!("board not mounted in scenario world"))
    }

    /// Mounts the board against the seeded server.
    ///
    /// # Errors
    ///
    /// Returns an error when seeding or mounting fails.
    pub fn mount(&mut self) -> Result<(), eyre::Report> {
        let report_id = ReportId::new(REPORT_ID)?;
        self.api
            .seed_report(report_id.clone(), self.seed_tasks.clone())?;
        self.api.seed_users(self.seed_users.clone())?;
        let session = run_async(BoardSession::mount(
            Arc::clone(&self.api),
            Arc::new(ScenarioClock::default()),
            BoardConfig::default(),
            report_id,
        ))?;
        self.session = Some(session);
        Ok(())
    }

    /// Reads a task from the local store.
    ///
    /// # Errors
    ///
    /// Returns an error when the board is not mounted or the task is unknown.
    pub fn task(&self, raw_id: &str) -> Result<Task, eyre::Report> {
        let task_id = TaskId::new(raw_id)?;
        self.session()?
            .store()
            .get(&task_id)?
            .ok_or_else(|| eyre::eyre!("task {raw_id} missing from store"))
    }
}

impl Default for BoardWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BoardWorld {
    BoardWorld::default()
}

/// Parses a user identifier from step text.
///
/// # Errors
///
/// Returns an error for a blank identifier.
pub fn user_id(raw: &str) -> Result<UserId, eyre::Report> {
    Ok(UserId::new(raw)?)
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
