//! Action validation and browser-automation demo capture.

pub mod dependencies;
pub mod error;
pub mod runner;
pub mod session;
pub mod validator;

pub use dependencies::probe_dependencies;
pub use error::{DemoError, DemoResult, FailureClass};
pub use runner::DemoRunner;
pub use session::BrowserSession;
pub use validator::validate_actions;
