//! Donation flow - the control logic of an interactive data donation session
//!
//! A participant is asked for a file, the file is checked to be a zip archive,
//! its listing is shown for consent and, only on explicit consent, a donation
//! command is handed to the host. Rendering and storage belong to the host,
//! reached through the [`Host`] trait.

pub mod archive;
pub mod config;
pub mod error;
pub mod flow;
pub mod host;
pub mod i18n;
pub mod prompt;
pub mod protocol;
pub mod session;

pub use error::{Error, Result};

// Re-export commonly used types
pub use archive::{extract, validate, ArchiveListing, ArchiveRecord};
pub use config::FlowConfig;
pub use flow::{DonationFlow, FlowState, Outcome, Step};
pub use host::{run_flow, Host, ScriptedHost};
pub use protocol::{DonationCommand, RequestKind, UiRequest, UiResponse};
