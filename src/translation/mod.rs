//! Named-to-positional placeholder rewriting.
//!
//! SQL Server's RPC binding (what tiberius speaks) is positional: parameters are
//! declared as `@P1..@Pn`. Statements in this crate use `@name` placeholders, so
//! before a command goes to SQL Server every `@name` that matches a bound
//! parameter is rewritten to `@P<position>`.

use std::borrow::Cow;

mod scanner;

use scanner::{
    State, closes_block_comment, is_glued, opens_block_comment, opens_line_comment,
    scan_identifier,
};

/// Rewrite `@name` placeholders to `@P<n>`, where `n` is the 1-based position of
/// `name` in `names` (matched case-insensitively, as SQL Server does).
///
/// String literals, quoted and bracketed identifiers, comments and `@@` system
/// variables are skipped. Names that are not in `names` (for example a local
/// `DECLARE @total int`) are left untouched. Returns a borrowed `Cow` when
/// nothing was rewritten.
///
/// ```rust
/// use sql_session::translation::translate_named_placeholders;
///
/// let sql = "UPDATE [T] SET [name]=@name WHERE [id]=@p_id";
/// let out = translate_named_placeholders(sql, &["name", "p_id"]);
/// assert_eq!(out, "UPDATE [T] SET [name]=@P1 WHERE [id]=@P2");
/// ```
#[must_use]
pub fn translate_named_placeholders<'a, S: AsRef<str>>(sql: &'a str, names: &[S]) -> Cow<'a, str> {
    translate_and_report(sql, names).0
}

/// Same rewrite as [`translate_named_placeholders`], also reporting which names
/// occurred: `found[i]` is `true` when `names[i]` was rewritten at least once.
#[must_use]
pub fn translate_and_report<'a, S: AsRef<str>>(
    sql: &'a str,
    names: &[S],
) -> (Cow<'a, str>, Vec<bool>) {
    let mut found = vec![false; names.len()];
    if names.is_empty() {
        return (Cow::Borrowed(sql), found);
    }

    let bytes = sql.as_bytes();
    let mut out: Option<String> = None;
    let mut copied_to = 0;
    let mut state = State::Normal;
    let mut idx = 0;

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => match b {
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                b'[' => state = State::Bracketed,
                _ if opens_line_comment(bytes, idx) => state = State::LineComment,
                _ if opens_block_comment(bytes, idx) => {
                    state = State::BlockComment(1);
                    idx += 1;
                }
                b'@' if !is_glued(bytes, idx) => {
                    if let Some((end, name)) = scan_identifier(bytes, idx + 1)
                        && let Some(pos) = names
                            .iter()
                            .position(|n| n.as_ref().eq_ignore_ascii_case(name))
                    {
                        found[pos] = true;
                        let buf = out.get_or_insert_with(|| String::with_capacity(sql.len()));
                        buf.push_str(&sql[copied_to..idx]);
                        buf.push_str("@P");
                        buf.push_str(&(pos + 1).to_string());
                        copied_to = end;
                        idx = end;
                        continue;
                    }
                }
                _ => {}
            },
            State::SingleQuoted => {
                if b == b'\'' {
                    if bytes.get(idx + 1) == Some(&b'\'') {
                        idx += 1;
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::DoubleQuoted => {
                if b == b'"' {
                    if bytes.get(idx + 1) == Some(&b'"') {
                        idx += 1;
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::Bracketed => {
                if b == b']' {
                    if bytes.get(idx + 1) == Some(&b']') {
                        idx += 1;
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment(depth) => {
                if opens_block_comment(bytes, idx) {
                    state = State::BlockComment(depth + 1);
                    idx += 1;
                } else if closes_block_comment(bytes, idx) {
                    state = if depth == 1 {
                        State::Normal
                    } else {
                        State::BlockComment(depth - 1)
                    };
                    idx += 1;
                }
            }
        }
        idx += 1;
    }

    let sql = match out {
        Some(mut buf) => {
            buf.push_str(&sql[copied_to..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(sql),
    };
    (sql, found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_by_position() {
        let sql = "INSERT INTO [T]([id],[name]) VALUES (@id,@name)";
        let out = translate_named_placeholders(sql, &["id", "name"]);
        assert_eq!(out, "INSERT INTO [T]([id],[name]) VALUES (@P1,@P2)");
    }

    #[test]
    fn longer_names_are_not_prefix_matched() {
        let sql = "SELECT * FROM t WHERE a=@id2 AND b=@id";
        let out = translate_named_placeholders(sql, &["id", "id2"]);
        assert_eq!(out, "SELECT * FROM t WHERE a=@P2 AND b=@P1");
    }

    #[test]
    fn skips_literals_brackets_and_comments() {
        let sql = "SELECT '@id', [@id], \"@id\" -- @id\n/* @id /* @id */ */ FROM t WHERE x=@id";
        let out = translate_named_placeholders(sql, &["id"]);
        assert_eq!(
            out,
            "SELECT '@id', [@id], \"@id\" -- @id\n/* @id /* @id */ */ FROM t WHERE x=@P1"
        );
    }

    #[test]
    fn leaves_system_and_unknown_variables() {
        let sql = "DECLARE @total int; SELECT @@ROWCOUNT, @total, @ID, user@id";
        let out = translate_named_placeholders(sql, &["id"]);
        assert_eq!(out, "DECLARE @total int; SELECT @@ROWCOUNT, @total, @P1, user@id");
    }

    #[test]
    fn unchanged_sql_is_borrowed() {
        let sql = "SELECT 1";
        assert!(matches!(translate_named_placeholders(sql, &["id"]), Cow::Borrowed(_)));
        let none: [&str; 0] = [];
        assert!(matches!(translate_named_placeholders("SELECT @id", &none), Cow::Borrowed(_)));
    }

    #[test]
    fn reports_names_missing_from_the_text() {
        let sql = "SELECT '@b' FROM t WHERE a=@A";
        let (out, found) = translate_and_report(sql, &["a", "b", "c"]);
        assert_eq!(out, "SELECT '@b' FROM t WHERE a=@P1");
        assert_eq!(found, [true, false, false]);
    }

    #[test]
    fn keeps_multibyte_text_intact() {
        let sql = "SELECT N'çağrı', @ad";
        let out = translate_named_placeholders(sql, &["ad"]);
        assert_eq!(out, "SELECT N'çağrı', @P1");
    }
}
