pub mod router;
pub mod types;
pub mod handlers {
    pub mod animals;
    pub mod checkups;
    pub mod common;
    pub mod health;
    pub mod references;
}

pub use router::{create_router, ApiDoc};
pub use types::AppState;
