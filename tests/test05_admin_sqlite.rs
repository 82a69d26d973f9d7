#![cfg(feature = "sqlite")]

use sql_session::prelude::*;
use tempfile::tempdir;

fn unique_db_path(prefix: &str) -> String {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join(format!("{prefix}.db"));
    std::mem::forget(dir);
    path.to_string_lossy().into_owned()
}

#[tokio::test]
async fn tsql_templates_surface_engine_errors_and_release_the_connection()
-> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::new(ConnectionDescriptor::sqlite(unique_db_path("admin")));
    session
        .execute_non_query("CREATE TABLE Orders (id INTEGER)", &[])
        .await?;

    let err = clone_table_structure(&mut session, "Orders", "Orders_copy")
        .await
        .unwrap_err();
    assert!(matches!(err, SqlSessionError::CommandError(_)));
    assert_eq!(
        session.command().text(),
        "SELECT * INTO [Orders_copy] FROM [Orders] WHERE 1=0"
    );
    assert!(!session.is_open());

    let err = backup_database(&mut session, "main", "/tmp/never.bak")
        .await
        .unwrap_err();
    assert!(matches!(err, SqlSessionError::CommandError(_)));
    assert_eq!(session.command().parameters().len(), 1);
    assert!(!session.is_open());
    Ok(())
}

#[tokio::test]
async fn admin_arguments_are_validated_first() {
    let mut session = Session::new(ConnectionDescriptor::sqlite(unique_db_path("adminargs")));
    let err = restore_database(&mut session, "", "x.bak").await.unwrap_err();
    assert!(matches!(err, SqlSessionError::ArgumentError(_)));
    let err = clone_table_with_data(&mut session, "Orders", "bad name")
        .await
        .unwrap_err();
    assert!(matches!(err, SqlSessionError::ArgumentError(_)));
    assert_eq!(session.command().text(), "");
}
