pub mod apply;

pub use apply::{apply, plan, run_operation, Plan, RunSummary};
