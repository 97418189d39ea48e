//! Database connection utilities.

use diesel::pg::PgConnection;
use diesel::prelude::*;
use quillforge_error::{DatabaseError, DatabaseErrorKind, QuillforgeResult};

/// Establish a connection to the PostgreSQL database.
///
/// Loads a `.env` file when present, then reads `DATABASE_URL`.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is not set or the connection fails.
pub fn establish_connection() -> QuillforgeResult<PgConnection> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").map_err(|_| {
        DatabaseError::new(DatabaseErrorKind::Connection(
            "DATABASE_URL environment variable not set".to_string(),
        ))
    })?;

    Ok(PgConnection::establish(&database_url).map_err(DatabaseError::from)?)
}
