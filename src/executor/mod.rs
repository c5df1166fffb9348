pub mod batch;
pub mod command;
pub mod interface;
pub mod script;
pub mod validator;

// Re-exports for convenience (used in commands and main.rs)
pub use batch::{BatchExecutor, ExecutionResult};
pub use command::{CommandBuilder, MutationCommand, ReservationProfile};
pub use interface::{DryRunInterface, ManagementInterface, PowerShellInterface};
pub use validator::{EntryValidator, SkippedEntry, ValidEntry};
