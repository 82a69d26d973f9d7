#![cfg(feature = "sqlite")]

use sql_session::prelude::*;
use tempfile::tempdir;

fn unique_db_path(prefix: &str) -> String {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join(format!("{prefix}.db"));
    std::mem::forget(dir);
    path.to_string_lossy().into_owned()
}

async fn ledger(prefix: &str) -> Result<(Session, String), SqlSessionError> {
    let path = unique_db_path(prefix);
    let mut session = Session::new(ConnectionDescriptor::sqlite(path.clone()));
    session
        .execute_non_query("CREATE TABLE ledger (id INTEGER PRIMARY KEY, amount INTEGER)", &[])
        .await?;
    Ok((session, path))
}

async fn count(session: &mut Session) -> Result<i64, SqlSessionError> {
    session
        .execute_scalar("SELECT COUNT(*) FROM ledger", &[])
        .await
}

#[tokio::test]
async fn commit_persists_writes() -> Result<(), Box<dyn std::error::Error>> {
    let (mut session, _) = ledger("commit").await?;

    session.begin_transaction().await?;
    assert_eq!(session.transaction_state(), TransactionState::Active);
    session
        .insert("ledger", &["id", "amount"], &[SqlValue::Int(1), SqlValue::Int(10)])
        .await?;
    assert!(session.is_open(), "connection stays open inside a transaction");
    session
        .insert("ledger", &["id", "amount"], &[SqlValue::Int(2), SqlValue::Int(20)])
        .await?;
    session.commit().await?;

    assert_eq!(session.transaction_state(), TransactionState::Committed);
    assert!(!session.is_open());
    assert_eq!(count(&mut session).await?, 2);
    Ok(())
}

#[tokio::test]
async fn rollback_discards_writes() -> Result<(), Box<dyn std::error::Error>> {
    let (mut session, _) = ledger("rollback").await?;

    session.begin_transaction().await?;
    session
        .insert("ledger", &["id", "amount"], &[SqlValue::Int(1), SqlValue::Int(10)])
        .await?;
    assert_eq!(count(&mut session).await?, 1, "visible inside the transaction");
    session.rollback().await?;

    assert_eq!(session.transaction_state(), TransactionState::RolledBack);
    assert!(!session.is_open());
    assert_eq!(count(&mut session).await?, 0);
    Ok(())
}

#[tokio::test]
async fn commit_or_rollback_without_begin_is_a_state_error() -> Result<(), Box<dyn std::error::Error>> {
    let (mut session, _) = ledger("nobegin").await?;

    let err = session.commit().await.unwrap_err();
    assert!(matches!(err, SqlSessionError::StateError(ref m) if m.contains("transaction not started")));
    let err = session.rollback().await.unwrap_err();
    assert!(matches!(err, SqlSessionError::StateError(_)));
    assert_eq!(session.transaction_state(), TransactionState::New);

    session.begin_transaction().await?;
    session.commit().await?;
    let err = session.commit().await.unwrap_err();
    assert!(matches!(err, SqlSessionError::StateError(_)));
    Ok(())
}

#[tokio::test]
async fn second_begin_is_rejected_and_scope_can_restart() -> Result<(), Box<dyn std::error::Error>> {
    let (mut session, _) = ledger("rebegin").await?;

    session.begin_transaction().await?;
    let err = session.begin_transaction().await.unwrap_err();
    assert!(matches!(err, SqlSessionError::StateError(_)));
    assert_eq!(session.transaction_state(), TransactionState::Active);
    session.rollback().await?;

    session.begin_transaction().await?;
    session
        .insert("ledger", &["id", "amount"], &[SqlValue::Int(5), SqlValue::Int(50)])
        .await?;
    session.commit().await?;
    assert_eq!(count(&mut session).await?, 1);
    Ok(())
}

#[tokio::test]
async fn close_rolls_back_an_active_transaction() -> Result<(), Box<dyn std::error::Error>> {
    let (mut session, _) = ledger("close").await?;

    session.begin_transaction().await?;
    session
        .insert("ledger", &["id", "amount"], &[SqlValue::Int(1), SqlValue::Int(10)])
        .await?;
    session.close().await?;

    assert!(!session.is_open());
    assert_eq!(session.transaction_state(), TransactionState::RolledBack);
    assert_eq!(count(&mut session).await?, 0);
    Ok(())
}

#[tokio::test]
async fn dropping_an_active_session_discards_its_writes() -> Result<(), Box<dyn std::error::Error>> {
    let (mut session, path) = ledger("drop").await?;

    session.begin_transaction().await?;
    session
        .insert("ledger", &["id", "amount"], &[SqlValue::Int(1), SqlValue::Int(10)])
        .await?;
    drop(session);

    let mut fresh = Session::new(
        SqliteOptionsBuilder::new(path)
            .busy_timeout(std::time::Duration::from_secs(5))
            .build(),
    );
    assert_eq!(count(&mut fresh).await?, 0);
    Ok(())
}

#[tokio::test]
async fn failed_commit_rolls_back_and_closes() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::new(
        SqliteOptionsBuilder::new(unique_db_path("fkcommit"))
            .foreign_keys(true)
            .build(),
    );
    session
        .execute_non_query("CREATE TABLE parent (id INTEGER PRIMARY KEY)", &[])
        .await?;
    session
        .execute_non_query(
            "CREATE TABLE child (id INTEGER PRIMARY KEY, \
             parent_id INTEGER REFERENCES parent(id) DEFERRABLE INITIALLY DEFERRED)",
            &[],
        )
        .await?;

    session.begin_transaction().await?;
    session
        .insert("child", &["id", "parent_id"], &[SqlValue::Int(1), SqlValue::Int(99)])
        .await?;

    let err = session.commit().await.unwrap_err();
    assert!(matches!(err, SqlSessionError::CommandError(ref m) if m.contains("FOREIGN KEY")), "{err}");
    assert_eq!(session.transaction_state(), TransactionState::RolledBack);
    assert!(!session.is_open());

    let n: i64 = session.execute_scalar("SELECT COUNT(*) FROM child", &[]).await?;
    assert_eq!(n, 0);
    Ok(())
}
