#![cfg(feature = "sqlite")]

use chrono::NaiveDateTime;
use sql_session::prelude::*;
use tempfile::tempdir;

fn unique_db_path(prefix: &str) -> String {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join(format!("{prefix}.db"));
    std::mem::forget(dir);
    path.to_string_lossy().into_owned()
}

async fn seeded(prefix: &str) -> Result<Session, SqlSessionError> {
    let mut session = Session::new(ConnectionDescriptor::sqlite(unique_db_path(prefix)));
    session
        .execute_non_query(
            "CREATE TABLE events (id INTEGER, label TEXT, at TEXT, weight REAL, flag INTEGER)",
            &[],
        )
        .await?;
    let params = Parameter::list([
        ("id", SqlValue::Int(1)),
        ("label", SqlValue::Null),
        (
            "at",
            SqlValue::Timestamp(
                NaiveDateTime::parse_from_str("2024-03-01 12:30:00", "%Y-%m-%d %H:%M:%S")
                    .expect("valid timestamp"),
            ),
        ),
        ("weight", SqlValue::Float(2.5)),
        ("flag", SqlValue::Bool(true)),
    ])?;
    session
        .execute_non_query(
            "INSERT INTO events (id, label, at, weight, flag) VALUES (@id, @label, @at, @weight, @flag)",
            &params,
        )
        .await?;
    Ok(session)
}

#[tokio::test]
async fn scalars_decode_through_the_conversion_table() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = seeded("scalars").await?;

    let n: i64 = session.execute_scalar("SELECT COUNT(*) FROM events", &[]).await?;
    assert_eq!(n, 1);

    let w: f64 = session.execute_scalar("SELECT weight FROM events", &[]).await?;
    assert!((w - 2.5).abs() < f64::EPSILON);

    let flag: bool = session.execute_scalar("SELECT flag FROM events", &[]).await?;
    assert!(flag);

    let at: NaiveDateTime = session.execute_scalar("SELECT at FROM events", &[]).await?;
    assert_eq!(at.format("%F %T").to_string(), "2024-03-01 12:30:00");

    let id_text: String = session.execute_scalar("SELECT id FROM events", &[]).await?;
    assert_eq!(id_text, "1");
    Ok(())
}

#[tokio::test]
async fn null_and_missing_rows_give_zero_values() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = seeded("zeros").await?;

    let label: String = session.execute_scalar("SELECT label FROM events", &[]).await?;
    assert_eq!(label, "");
    let label: Option<String> = session.execute_scalar("SELECT label FROM events", &[]).await?;
    assert_eq!(label, None);

    let none: i64 = session
        .execute_scalar(
            "SELECT id FROM events WHERE id = @id",
            &Parameter::list([("id", 99)])?,
        )
        .await?;
    assert_eq!(none, 0);
    Ok(())
}

#[tokio::test]
async fn unsupported_scalar_conversion_fails() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = seeded("badconv").await?;
    let err = session
        .execute_scalar::<NaiveDateTime>("SELECT weight FROM events", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, SqlSessionError::ConversionError(_)));
    Ok(())
}

#[tokio::test]
async fn table_valued_function_form() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::new(ConnectionDescriptor::sqlite(unique_db_path("tvf")));
    let rows = session
        .execute_function("json_each", &Parameter::list([("doc", "[10,20]")])?)
        .await?;
    assert_eq!(session.command().text(), "SELECT * FROM [json_each](@doc)");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows.rows()[0].get("value"), Some(&SqlValue::Int(10)));
    assert_eq!(rows.rows()[1].get("value"), Some(&SqlValue::Int(20)));
    Ok(())
}

#[tokio::test]
async fn stored_procedures_are_a_command_error_on_sqlite() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = seeded("proc").await?;
    let err = session
        .execute_proc("dbo.usp_tick", &Parameter::list([("n", 1)])?)
        .await
        .unwrap_err();
    assert!(matches!(err, SqlSessionError::CommandError(_)));
    assert_eq!(session.command().kind(), CommandKind::StoredProcedure);
    assert_eq!(session.command().text(), "[dbo].[usp_tick]");
    assert!(!session.is_open());
    Ok(())
}
