#![cfg(feature = "sqlite")]

use sql_session::prelude::*;
use tempfile::tempdir;

fn unique_db_path(prefix: &str) -> String {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join(format!("{prefix}.db"));
    std::mem::forget(dir);
    path.to_string_lossy().into_owned()
}

const SCHEMA: &str = "CREATE TABLE items (id INTEGER PRIMARY KEY, name TEXT, qty INTEGER)";

fn seed_rows() -> Vec<[SqlValue; 3]> {
    vec![
        [SqlValue::Int(1), "bolt".into(), SqlValue::Int(10)],
        [SqlValue::Int(2), "nut".into(), SqlValue::Int(25)],
        [SqlValue::Int(3), "washer".into(), SqlValue::Null],
    ]
}

async fn run_async(path: String) -> Result<(ResultSet, i64), SqlSessionError> {
    let mut session = Session::new(ConnectionDescriptor::sqlite(path));
    session.execute_non_query(SCHEMA, &[]).await?;
    session.begin_transaction().await?;
    for row in seed_rows() {
        session.insert("items", &["id", "name", "qty"], &row).await?;
    }
    session.commit().await?;
    session
        .update("items", &["qty"], &[SqlValue::Int(30)], &[("name", SqlValue::from("nut"))])
        .await?;
    let rows = session
        .select::<&str, &str>("items", &["id", "name", "qty"], &[])
        .await?;
    let total = session
        .execute_scalar("SELECT SUM(qty) FROM items", &[])
        .await?;
    Ok((rows, total))
}

fn run_blocking(path: String) -> Result<(ResultSet, i64), SqlSessionError> {
    let mut session = BlockingSession::new(ConnectionDescriptor::sqlite(path))?;
    session.execute_non_query(SCHEMA, &[])?;
    session.begin_transaction()?;
    for row in seed_rows() {
        session.insert("items", &["id", "name", "qty"], &row)?;
    }
    session.commit()?;
    session.update("items", &["qty"], &[SqlValue::Int(30)], &[("name", SqlValue::from("nut"))])?;
    let rows = session.select::<&str, &str>("items", &["id", "name", "qty"], &[])?;
    let total = session.execute_scalar("SELECT SUM(qty) FROM items", &[])?;
    Ok((rows, total))
}

#[test]
fn blocking_and_async_modes_agree() -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    let (async_rows, async_total) = runtime.block_on(run_async(unique_db_path("async")))?;
    drop(runtime);

    let (blocking_rows, blocking_total) = run_blocking(unique_db_path("blocking"))?;

    assert_eq!(async_rows, blocking_rows);
    assert_eq!(async_total, blocking_total);
    assert_eq!(blocking_total, 40);
    assert_eq!(blocking_rows.len(), 3);
    assert_eq!(blocking_rows.rows()[2].get("qty"), Some(&SqlValue::Null));
    Ok(())
}

#[test]
fn blocking_session_state_errors_match() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = BlockingSession::new(ConnectionDescriptor::sqlite(unique_db_path("state")))?;
    assert!(matches!(session.commit(), Err(SqlSessionError::StateError(_))));
    session.begin_transaction()?;
    assert!(session.is_open());
    session.rollback()?;
    assert!(!session.is_open());
    assert_eq!(session.transaction_state(), TransactionState::RolledBack);
    Ok(())
}

#[test]
fn dropping_a_blocking_session_mid_transaction_rolls_back() -> Result<(), Box<dyn std::error::Error>> {
    let path = unique_db_path("blockdrop");
    {
        let mut session = BlockingSession::new(ConnectionDescriptor::sqlite(path.clone()))?;
        session.execute_non_query(SCHEMA, &[])?;
        session.begin_transaction()?;
        session.insert("items", &["id", "name"], &[SqlValue::Int(1), "x".into()])?;
    }
    let mut session = BlockingSession::new(ConnectionDescriptor::sqlite(path))?;
    let n: i64 = session.execute_scalar("SELECT COUNT(*) FROM items", &[])?;
    assert_eq!(n, 0);
    Ok(())
}
