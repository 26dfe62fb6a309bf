//! Sheetwright - review-gated session core for a spreadsheet analyst assistant
//!
//! Sheetwright owns the state behind an assistant panel that works on a
//! spreadsheet: conversation turns with thinking and summary phases, the
//! audit trail of tool invocations awaiting review, detected-issue
//! insights, plan proposals and an append-only version ledger.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Session models, errors and port traits
//! - **Service Layer** (`services`): The conversation controller and the
//!   review components it routes actions to
//! - **Application Layer** (`application`): Event fan-out and timer-driven
//!   turn progression
//! - **Infrastructure Layer** (`infrastructure`): Clocks, the scripted
//!   backend, configuration and logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use sheetwright::domain::models::AssistMode;
//! use sheetwright::domain::ports::Clock;
//! use sheetwright::infrastructure::backend::ScriptedBackend;
//! use sheetwright::infrastructure::clock::{SequentialIdGenerator, SystemClock};
//! use sheetwright::services::ConversationController;
//!
//! # fn main() -> sheetwright::domain::SessionResult<()> {
//! let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
//! let backend = Arc::new(ScriptedBackend::new(Arc::clone(&clock)));
//! let mut session =
//!     ConversationController::new(backend, clock, Arc::new(SequentialIdGenerator::new()))
//!         .with_mode(AssistMode::Analyst);
//!
//! let turn = session.submit("Build a P&L for a burger restaurant")?;
//! session.begin_thinking(&turn)?;
//! session.record_interim(&turn, "Adding annual totals")?;
//! session.finalize(&turn, "Done", vec!["Parsed request".to_string()])?;
//! session.approve_invocation("tool_1")?;
//! session.commit();
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use application::{EventBus, TurnDriver};
pub use domain::models::{AssistMode, Config, Message, Turn, TurnId, TurnPhase};
pub use domain::ports::{AssistantBackend, Clock, IdGenerator};
pub use domain::{ErrorKind, SessionError, SessionResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{ConversationController, SessionEvent};
