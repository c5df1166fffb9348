pub mod prompt;
pub mod progress;
pub mod reporter;

pub use prompt::MenuPrompt;
pub use progress::create_spinner;
pub use reporter::{ConsoleReporter, MemoryReporter, ReportEvent, Reporter};
