use sea_orm::DatabaseConnection;

/// Shared application state.
///
/// Domain routers take what they need out of this (an Arc'd pool clone),
/// so handing it around by reference is cheap.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}
