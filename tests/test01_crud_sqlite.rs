#![cfg(feature = "sqlite")]

use sql_session::prelude::*;
use tempfile::tempdir;

fn unique_db_path(prefix: &str) -> String {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join(format!("{prefix}.db"));
    // Leak the tempdir so the file persists for the duration of the test binary.
    std::mem::forget(dir);
    path.to_string_lossy().into_owned()
}

async fn session_with_users(prefix: &str) -> Result<Session, SqlSessionError> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let mut session = Session::new(ConnectionDescriptor::sqlite(unique_db_path(prefix)));
    session
        .execute_non_query(
            "CREATE TABLE Users (id INTEGER PRIMARY KEY, name TEXT, score REAL)",
            &[],
        )
        .await?;
    Ok(session)
}

#[tokio::test]
async fn insert_update_delete_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = session_with_users("crud").await?;

    let inserted = session
        .insert("Users", &["id", "name"], &[SqlValue::Int(1), "a".into()])
        .await?;
    assert_eq!(inserted, 1);

    let rows = session
        .select("Users", &["id", "name"], &[("id", SqlValue::Int(1))])
        .await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows.rows()[0].get("name"), Some(&SqlValue::from("a")));

    let updated = session
        .update(
            "Users",
            &["name"],
            &["b".into()],
            &[("id", SqlValue::Int(1))],
        )
        .await?;
    assert_eq!(updated, 1);

    let rows = session
        .select("Users", &["*"], &[("id", SqlValue::Int(1))])
        .await?;
    assert_eq!(rows.rows()[0].get("name"), Some(&SqlValue::from("b")));
    assert_eq!(rows.column_names(), ["id", "name", "score"]);

    let deleted = session.delete("Users", &[("id", SqlValue::Int(1))]).await?;
    assert_eq!(deleted, 1);

    let rows = session
        .select("Users", &["id"], &[("id", SqlValue::Int(1))])
        .await?;
    assert!(rows.is_empty());
    Ok(())
}

#[tokio::test]
async fn connection_is_released_after_every_call() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = session_with_users("release").await?;
    assert!(!session.is_open());

    session
        .insert("Users", &["id", "name"], &[SqlValue::Int(1), "a".into()])
        .await?;
    assert!(!session.is_open());

    let err = session
        .execute_non_query("INSERT INTO Missing (x) VALUES (1)", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, SqlSessionError::CommandError(_)));
    assert!(!session.is_open());
    Ok(())
}

#[tokio::test]
async fn where_on_a_set_column_binds_two_parameters() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = session_with_users("setwhere").await?;
    session
        .insert("Users", &["id", "name"], &[SqlValue::Int(1), "a".into()])
        .await?;

    let updated = session
        .update(
            "Users",
            &["id"],
            &[SqlValue::Int(2)],
            &[("id", SqlValue::Int(1))],
        )
        .await?;
    assert_eq!(updated, 1);

    let command = session.command();
    assert_eq!(command.text(), "UPDATE [Users] SET [id]=@id WHERE [id]=@p_id");
    let names: Vec<&str> = command.parameters().iter().map(Parameter::name).collect();
    assert_eq!(names, ["id", "p_id"]);

    let moved: i64 = session
        .execute_scalar("SELECT COUNT(*) FROM Users WHERE id = @id", &Parameter::list([("id", 2)])?)
        .await?;
    assert_eq!(moved, 1);
    Ok(())
}

#[tokio::test]
async fn parameters_do_not_leak_between_commands() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = session_with_users("clearing").await?;
    session
        .insert(
            "Users",
            &["id", "name", "score"],
            &[SqlValue::Int(1), "a".into(), SqlValue::Float(1.5)],
        )
        .await?;
    assert_eq!(session.command().parameters().len(), 3);

    let rows = session.execute_tabular("SELECT name FROM Users", &[]).await?;
    assert_eq!(rows.len(), 1);
    assert!(session.command().parameters().is_empty());
    assert_eq!(session.command().kind(), CommandKind::Text);
    Ok(())
}

#[tokio::test]
async fn create_and_run_reports_by_kind() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = session_with_users("outcome").await?;
    let outcome = session
        .create_and_run::<_, &str>(
            QueryKind::Insert,
            "Users",
            &["id", "name"],
            &[SqlValue::Int(7), "z".into()],
            &[],
        )
        .await?;
    assert_eq!(outcome, QueryOutcome::RowsAffected(1));

    let statement = StatementBuilder::select("Users")
        .columns(["name"])
        .filter("id", 7)
        .build()?;
    let outcome = session.run_statement(QueryKind::Select, &statement).await?;
    let rows = outcome.into_rows().expect("select returns rows");
    assert_eq!(rows.first_value(), Some(&SqlValue::from("z")));
    Ok(())
}

#[tokio::test]
async fn null_filters_never_match() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = session_with_users("nullwhere").await?;
    session
        .insert("Users", &["id", "name"], &[SqlValue::Int(1), SqlValue::Null])
        .await?;
    let rows = session
        .select("Users", &["id"], &[("name", SqlValue::Null)])
        .await?;
    assert!(rows.is_empty());
    Ok(())
}

#[tokio::test]
async fn invalid_metadata_is_rejected_before_connecting() {
    let mut session = Session::new(ConnectionDescriptor::sqlite(unique_db_path("invalid")));

    let err = session
        .insert("Users", &["id", "name"], &[SqlValue::Int(1)])
        .await
        .unwrap_err();
    assert!(matches!(err, SqlSessionError::ArgumentError(_)));

    let err = session
        .insert("Users; DROP TABLE Users", &["id"], &[SqlValue::Int(1)])
        .await
        .unwrap_err();
    assert!(matches!(err, SqlSessionError::ArgumentError(_)));

    let empty: [&str; 0] = [];
    let err = session
        .select::<&str, &str>("Users", &empty, &[])
        .await
        .unwrap_err();
    assert!(matches!(err, SqlSessionError::ArgumentError(_)));
    assert!(!session.is_open());
}

#[tokio::test]
async fn cancelled_call_does_not_leave_the_connection_open() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = session_with_users("cancel").await?;

    let slow = "WITH RECURSIVE c(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM c WHERE x < 1000000) \
                SELECT x FROM c";
    let outcome = tokio::time::timeout(
        std::time::Duration::from_millis(5),
        session.execute_tabular(slow, &[]),
    )
    .await;
    assert!(outcome.is_err(), "query should still be running after 5ms");
    assert!(!session.is_open());

    let n: i64 = session.execute_scalar("SELECT COUNT(*) FROM Users", &[]).await?;
    assert_eq!(n, 0);
    assert!(!session.is_open());
    Ok(())
}

#[tokio::test]
async fn open_failure_is_a_connection_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("no_such_dir").join("app.db");
    let mut session = Session::new(ConnectionDescriptor::sqlite(path.to_string_lossy()));

    let err = session
        .execute_non_query("CREATE TABLE t (x INTEGER)", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, SqlSessionError::ConnectionError(_)), "{err}");
    assert!(!session.is_open());

    let err = session.begin_transaction().await.unwrap_err();
    assert!(matches!(err, SqlSessionError::ConnectionError(_)));
    assert_eq!(session.transaction_state(), TransactionState::New);
    assert!(!session.is_open());
}
