use std::borrow::Cow;

use tiberius::Query;

use crate::error::SqlSessionError;
use crate::param::Parameter;
use crate::translation::translate_and_report;
use crate::types::SqlValue;

/// Rewrite `@name` placeholders to `@Pn` and bind the values in parameter order.
///
/// # Errors
/// Returns `SqlSessionError::ArgumentError` if a parameter has no `@name`
/// placeholder in `sql`.
pub fn bind_query_params<'a>(
    sql: &'a str,
    params: &[Parameter],
) -> Result<Query<'a>, SqlSessionError> {
    let names: Vec<&str> = params.iter().map(Parameter::name).collect();
    let (translated, found) = translate_and_report(sql, &names);
    if let Some(missing) = params
        .iter()
        .zip(&found)
        .find_map(|(param, hit)| (!hit).then_some(param))
    {
        return Err(SqlSessionError::ArgumentError(format!(
            "parameter {} does not appear in the statement",
            missing.placeholder()
        )));
    }
    Ok(bind_positional(translated, params))
}

/// Bind values to SQL that already uses `@P1..@Pn`.
#[must_use]
pub fn bind_positional<'a>(sql: impl Into<Cow<'a, str>>, params: &[Parameter]) -> Query<'a> {
    let mut query = Query::new(sql);

    for param in params {
        match param.value() {
            SqlValue::Int(i) => query.bind(*i),
            SqlValue::Float(f) => query.bind(*f),
            SqlValue::Text(s) => query.bind(s.clone()),
            SqlValue::Bool(b) => query.bind(*b),
            SqlValue::Timestamp(dt) => query.bind(dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
            SqlValue::Null => query.bind(Option::<String>::None),
            SqlValue::Json(v) => query.bind(v.to_string()),
            SqlValue::Blob(bytes) => query.bind(bytes.clone()),
        }
    }

    query
}

/// `EXEC [proc] @a = @P1, @b = @P2`, ready for [`bind_positional`].
#[must_use]
pub fn procedure_text(quoted_procedure: &str, params: &[Parameter]) -> String {
    let args = params
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{} = @P{}", p.placeholder(), i + 1))
        .collect::<Vec<_>>()
        .join(", ");
    if args.is_empty() {
        format!("EXEC {quoted_procedure}")
    } else {
        format!("EXEC {quoted_procedure} {args}")
    }
}
