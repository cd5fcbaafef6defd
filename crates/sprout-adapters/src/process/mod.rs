//! Command runner adapters.

mod scripted;
mod system;

pub use scripted::StaticCommandRunner;
pub use system::{ProcessError, SystemCommandRunner};
