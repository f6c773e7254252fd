use thiserror::Error;

/// Driver errors sorted into the cases callers branch on.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("foreign key violation: {message}")]
    ForeignKey { message: String },
    #[error("record not found")]
    NotFound,
    #[error("database timeout")]
    Timeout,
    #[error("persistence error: {0}")]
    Persistence(String),
}

/// Map a sqlx error onto [`DbError`], keeping the violated constraint name.
pub fn classify(err: sqlx::Error) -> DbError {
    match err {
        sqlx::Error::RowNotFound => DbError::NotFound,
        sqlx::Error::PoolTimedOut => DbError::Timeout,
        sqlx::Error::Database(db) if db.is_unique_violation() => DbError::Duplicate {
            constraint: db.constraint().unwrap_or("unknown").to_string(),
        },
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => DbError::ForeignKey {
            message: db.message().to_string(),
        },
        sqlx::Error::Database(db)
            if db
                .message()
                .contains("canceling statement due to statement timeout") =>
        {
            DbError::Timeout
        }
        other => DbError::Persistence(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        assert!(matches!(classify(sqlx::Error::RowNotFound), DbError::NotFound));
    }

    #[test]
    fn pool_timeout_maps_to_timeout() {
        assert!(matches!(classify(sqlx::Error::PoolTimedOut), DbError::Timeout));
    }

    #[test]
    fn other_errors_keep_their_message() {
        let err = classify(sqlx::Error::Protocol("unexpected message".to_string()));
        match err {
            DbError::Persistence(message) => assert!(message.contains("unexpected message")),
            other => panic!("expected persistence error, got {other:?}"),
        }
    }
}
