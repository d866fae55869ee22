//! External service integrations.

pub mod providers {
    pub use crate::providers::*;
}

pub mod orchestrator {
    pub use crate::orchestrator::*;
}
