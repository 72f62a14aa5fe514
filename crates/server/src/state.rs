use crate::pow::PowGuard;
use axum::extract::FromRef;
use storage::Db;

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub pow: PowGuard,
    pub admin_token: String,
}

impl FromRef<AppState> for Db {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
