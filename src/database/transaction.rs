use std::fmt::Display;
use std::panic::AssertUnwindSafe;

use futures::future::BoxFuture;
use futures::FutureExt;
use sqlx::{PgConnection, PgPool};
use tracing::{debug, warn};

/// Run `work` inside a transaction.
///
/// Commits when `work` returns `Ok`. Rolls back when it returns `Err` or panics;
/// a failed rollback is logged and the original error (or panic) still wins.
pub async fn within_transaction<T, E, F>(pool: &PgPool, work: F) -> Result<T, E>
where
    F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, Result<T, E>>,
    E: From<sqlx::Error> + Display,
{
    let mut tx = pool.begin().await?;

    let outcome = AssertUnwindSafe(work(&mut *tx)).catch_unwind().await;

    match outcome {
        Ok(Ok(value)) => {
            tx.commit().await?;
            Ok(value)
        }
        Ok(Err(err)) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "close transaction");
            }
            debug!(error = %err, "rollback transaction");
            Err(err)
        }
        Err(panic) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "close transaction after panic");
            }
            std::panic::resume_unwind(panic)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::manager::DatabaseError;
    use sqlx::postgres::PgPoolOptions;

    async fn test_pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for Postgres tests");
        PgPoolOptions::new()
            .max_connections(1)
            .connect(&url)
            .await
            .expect("connect to DATABASE_URL")
    }

    async fn row_count(pool: &PgPool, table: &str) -> i64 {
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(pool)
            .await
            .unwrap();
        count
    }

    #[tokio::test]
    #[ignore = "needs DATABASE_URL"]
    async fn rolls_back_on_error() {
        let pool = test_pool().await;
        sqlx::query("CREATE TEMP TABLE tx_rollback (v INT)").execute(&pool).await.unwrap();

        let result: Result<(), DatabaseError> = within_transaction(&pool, |conn| {
            Box::pin(async move {
                sqlx::query("INSERT INTO tx_rollback VALUES (1)").execute(&mut *conn).await?;
                Err(DatabaseError::Conflict("forced".to_string()))
            })
        })
        .await;

        assert!(matches!(result, Err(DatabaseError::Conflict(_))));
        assert_eq!(row_count(&pool, "tx_rollback").await, 0);
    }

    #[tokio::test]
    #[ignore = "needs DATABASE_URL"]
    async fn commits_on_success() {
        let pool = test_pool().await;
        sqlx::query("CREATE TEMP TABLE tx_commit (v INT)").execute(&pool).await.unwrap();

        let value = within_transaction(&pool, |conn| {
            Box::pin(async move {
                sqlx::query("INSERT INTO tx_commit VALUES (1)").execute(&mut *conn).await?;
                Ok::<_, DatabaseError>(42)
            })
        })
        .await
        .unwrap();

        assert_eq!(value, 42);
        assert_eq!(row_count(&pool, "tx_commit").await, 1);
    }

    #[tokio::test]
    #[ignore = "needs DATABASE_URL"]
    #[allow(unreachable_code)]
    async fn rolls_back_and_resumes_panic() {
        let pool = test_pool().await;
        sqlx::query("CREATE TEMP TABLE tx_panic (v INT)").execute(&pool).await.unwrap();

        let outcome = AssertUnwindSafe(within_transaction(&pool, |conn| {
            Box::pin(async move {
                sqlx::query("INSERT INTO tx_panic VALUES (1)").execute(&mut *conn).await?;
                panic!("work blew up");
                Ok::<(), DatabaseError>(())
            })
        }))
        .catch_unwind()
        .await;

        let panic = outcome.expect_err("panic should propagate out of within_transaction");
        assert_eq!(panic.downcast_ref::<&str>(), Some(&"work blew up"));
        assert_eq!(row_count(&pool, "tx_panic").await, 0);
    }
}
