use crate::db::{DbPool, OrmConn};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
}

impl AppState {
    /// The ORM connection shares the sqlx pool, so both see the same connections.
    pub fn new(pool: DbPool) -> Self {
        let orm = crate::db::orm_from_pool(&pool);
        Self { pool, orm }
    }
}
