// ABOUTME: Column value model and conversion of each storage class to a SQL literal
// ABOUTME: Guarantees no value can produce a token that breaks statement syntax

use rusqlite::types::ValueRef;
use std::fmt::Write;

/// A single column value read from the source database
///
/// Maps SQLite storage classes one to one. Text that is not valid UTF-8 is
/// kept as raw bytes in `RawText`; `Other` covers values of an unrecognized
/// kind and is serialized through the text rule.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Text(String),
    RawText(Vec<u8>),
    Integer(i64),
    Real(f64),
    Blob(Vec<u8>),
    Other(String),
}

impl SqlValue {
    /// Convert the value into a literal token for an INSERT statement
    ///
    /// - Null → `NULL`
    /// - Text → single-quoted, with embedded `'` doubled; text holding a NUL
    ///   character becomes `CAST(X'..' AS TEXT)` since a quoted literal ends at NUL
    /// - RawText → `CAST(X'..' AS TEXT)` over the original bytes
    /// - Integer → decimal digits
    /// - Real → shortest round-trip decimal, always with a `.` or exponent
    /// - Blob → `X'..'` hex literal
    /// - Other → stringified and quoted with the text rule
    ///
    /// # Examples
    ///
    /// ```
    /// # use sqlite_seed_export::sqlite::SqlValue;
    /// assert_eq!(SqlValue::Text("O'Brien".into()).to_sql_literal(), "'O''Brien'");
    /// assert_eq!(SqlValue::Blob(vec![0xde, 0xad]).to_sql_literal(), "X'dead'");
    /// assert_eq!(SqlValue::Null.to_sql_literal(), "NULL");
    /// assert_eq!(
    ///     SqlValue::RawText(vec![0x61, 0xff]).to_sql_literal(),
    ///     "CAST(X'61ff' AS TEXT)"
    /// );
    /// ```
    pub fn to_sql_literal(&self) -> String {
        match self {
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Text(s) => text_literal(s),
            SqlValue::RawText(bytes) => text_from_bytes(bytes),
            SqlValue::Integer(i) => i.to_string(),
            SqlValue::Real(f) => real_literal(*f),
            SqlValue::Blob(bytes) => blob_literal(bytes),
            SqlValue::Other(s) => {
                tracing::debug!("Serializing unrecognized value through text fallback");
                text_literal(s)
            }
        }
    }
}

impl From<ValueRef<'_>> for SqlValue {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => SqlValue::Null,
            ValueRef::Integer(i) => SqlValue::Integer(i),
            ValueRef::Real(f) => SqlValue::Real(f),
            ValueRef::Text(bytes) => match std::str::from_utf8(bytes) {
                Ok(s) => SqlValue::Text(s.to_string()),
                Err(_) => {
                    tracing::debug!(
                        "Text value of {} bytes is not valid UTF-8, keeping raw bytes",
                        bytes.len()
                    );
                    SqlValue::RawText(bytes.to_vec())
                }
            },
            ValueRef::Blob(bytes) => SqlValue::Blob(bytes.to_vec()),
        }
    }
}

fn text_literal(s: &str) -> String {
    if s.contains('\0') {
        return text_from_bytes(s.as_bytes());
    }
    format!("'{}'", s.replace('\'', "''"))
}

fn text_from_bytes(bytes: &[u8]) -> String {
    format!("CAST({} AS TEXT)", blob_literal(bytes))
}

fn real_literal(f: f64) -> String {
    if f.is_nan() {
        // SQLite stores NaN as NULL
        return "NULL".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "1e999" } else { "-1e999" }.to_string();
    }
    // Debug formatting is the shortest representation that round-trips and
    // keeps a fractional part or exponent, so the literal replays as REAL.
    format!("{:?}", f)
}

fn blob_literal(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2 + 3);
    out.push_str("X'");
    for byte in bytes {
        let _ = write!(out, "{:02x}", byte);
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_literal() {
        assert_eq!(SqlValue::Null.to_sql_literal(), "NULL");
    }

    #[test]
    fn test_text_quotes_are_doubled() {
        assert_eq!(
            SqlValue::Text("O'Brien".to_string()).to_sql_literal(),
            "'O''Brien'"
        );
        assert_eq!(
            SqlValue::Text("BNB's Chain".to_string()).to_sql_literal(),
            "'BNB''s Chain'"
        );
        assert_eq!(SqlValue::Text("''".to_string()).to_sql_literal(), "''''''");
    }

    #[test]
    fn test_text_other_characters_untouched() {
        let raw = "line1\nline2\t\"quoted\" \\ ; -- not a comment 链";
        assert_eq!(
            SqlValue::Text(raw.to_string()).to_sql_literal(),
            format!("'{}'", raw)
        );
    }

    #[test]
    fn test_text_with_nul_uses_hex_cast() {
        assert_eq!(
            SqlValue::Text("a\0b'c".to_string()).to_sql_literal(),
            "CAST(X'6100622763' AS TEXT)"
        );
        assert_eq!(
            SqlValue::Text("\0".to_string()).to_sql_literal(),
            "CAST(X'00' AS TEXT)"
        );
    }

    #[test]
    fn test_raw_text_keeps_bytes() {
        assert_eq!(
            SqlValue::RawText(vec![0x61, 0xff, 0x62]).to_sql_literal(),
            "CAST(X'61ff62' AS TEXT)"
        );
        assert_eq!(SqlValue::RawText(Vec::new()).to_sql_literal(), "CAST(X'' AS TEXT)");
    }

    #[test]
    fn test_integer_literals() {
        assert_eq!(SqlValue::Integer(42).to_sql_literal(), "42");
        assert_eq!(SqlValue::Integer(-7).to_sql_literal(), "-7");
        assert_eq!(
            SqlValue::Integer(i64::MIN).to_sql_literal(),
            "-9223372036854775808"
        );
    }

    #[test]
    fn test_real_literals_round_trip() {
        for f in [0.1, 1.0, -2.5, 1e300, 1e-7, 123456.789, f64::MAX, f64::MIN_POSITIVE] {
            let literal = SqlValue::Real(f).to_sql_literal();
            assert!(
                literal.contains('.') || literal.contains('e'),
                "literal {} must replay as REAL",
                literal
            );
            assert_eq!(literal.parse::<f64>().unwrap(), f);
        }
    }

    #[test]
    fn test_real_special_values() {
        assert_eq!(SqlValue::Real(f64::INFINITY).to_sql_literal(), "1e999");
        assert_eq!(SqlValue::Real(f64::NEG_INFINITY).to_sql_literal(), "-1e999");
        assert_eq!(SqlValue::Real(f64::NAN).to_sql_literal(), "NULL");
    }

    #[test]
    fn test_blob_literals() {
        assert_eq!(SqlValue::Blob(vec![]).to_sql_literal(), "X''");
        assert_eq!(
            SqlValue::Blob(vec![0x00, 0x0f, 0xff, 0x27]).to_sql_literal(),
            "X'000fff27'"
        );
    }

    #[test]
    fn test_other_falls_back_to_quoted_text() {
        assert_eq!(
            SqlValue::Other("it's\u{FFFD}".to_string()).to_sql_literal(),
            "'it''s\u{FFFD}'"
        );
    }

    #[test]
    fn test_from_value_ref() {
        assert_eq!(SqlValue::from(ValueRef::Null), SqlValue::Null);
        assert_eq!(SqlValue::from(ValueRef::Integer(3)), SqlValue::Integer(3));
        assert_eq!(SqlValue::from(ValueRef::Real(0.5)), SqlValue::Real(0.5));
        assert_eq!(
            SqlValue::from(ValueRef::Text(b"abc")),
            SqlValue::Text("abc".to_string())
        );
        assert_eq!(
            SqlValue::from(ValueRef::Blob(&[1, 2])),
            SqlValue::Blob(vec![1, 2])
        );
        assert_eq!(
            SqlValue::from(ValueRef::Text(&[0x61, 0xff, 0x62])),
            SqlValue::RawText(vec![0x61, 0xff, 0x62])
        );
        assert_eq!(
            SqlValue::from(ValueRef::Text(b"a\0b")),
            SqlValue::Text("a\0b".to_string())
        );
    }
}
