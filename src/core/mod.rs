// Domain-layer modules and shared errors/models
pub mod identifier {
    pub use crate::identifier::*;
}

pub mod profile {
    pub use crate::profile::*;
}

pub mod classifier {
    pub use crate::classifier::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
