pub mod model;
pub mod report;
pub mod verify;

pub use model::load_program;
pub use report::{json_report, text_report};
pub use verify::{verify, Verdict, Verification};
