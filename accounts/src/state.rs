use crate::db::DB;
use crate::utils::token::TokenIssuer;

#[derive(Clone)]
pub struct AppState {
    pub db: DB,
    pub tokens: TokenIssuer,
}
