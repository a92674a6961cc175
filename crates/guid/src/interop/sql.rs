use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::model::Guid;

impl ToSql for Guid {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

/// TEXT columns hold the 26-character text form. BLOB columns may hold
/// either the text bytes or the 26 raw bytes.
impl FromSql for Guid {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Text(bytes) => {
                Guid::parse(bytes).map_err(|err| FromSqlError::Other(Box::new(err)))
            }
            ValueRef::Blob(bytes) => Guid::parse(bytes)
                .or_else(|_| Guid::try_from(bytes))
                .map_err(|err| FromSqlError::Other(Box::new(err))),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::{Connection, params};

    fn connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE items (id TEXT PRIMARY KEY, raw BLOB)", [])
            .unwrap();
        conn
    }

    #[test]
    fn test_text_roundtrip() {
        let conn = connection();
        let id: Guid = "xokp8l85n201pq00dw00rs6rgq".parse().unwrap();
        conn.execute("INSERT INTO items (id) VALUES (?1)", params![id])
            .unwrap();

        let stored: String = conn
            .query_row("SELECT id FROM items", [], |row| row.get(0))
            .unwrap();
        assert_eq!(stored, "xokp8l85n201pq00dw00rs6rgq");

        let back: Guid = conn
            .query_row("SELECT id FROM items", [], |row| row.get(0))
            .unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_blob_text_bytes() {
        let conn = connection();
        conn.execute(
            "INSERT INTO items (id, raw) VALUES ('a', ?1)",
            params![b"xokp8l85n201pq00dw00rs6rgq".to_vec()],
        )
        .unwrap();

        let back: Guid = conn
            .query_row("SELECT raw FROM items", [], |row| row.get(0))
            .unwrap();
        assert_eq!(back.fingerprint(), 2222);
    }

    #[test]
    fn test_blob_raw_bytes() {
        let conn = connection();
        let id: Guid = "xokp8l85n201pq00dw00rs6rgq".parse().unwrap();
        conn.execute(
            "INSERT INTO items (id, raw) VALUES ('a', ?1)",
            params![id.as_bytes().to_vec()],
        )
        .unwrap();

        let back: Guid = conn
            .query_row("SELECT raw FROM items", [], |row| row.get(0))
            .unwrap();
        assert_eq!(back, id);
        assert_eq!(Guid::column_result(ValueRef::Blob(id.as_bytes())).unwrap(), id);
    }

    #[test]
    fn test_blob_wrong_length() {
        let err = Guid::column_result(ValueRef::Blob(&[0u8; 25])).unwrap_err();
        assert!(matches!(err, FromSqlError::Other(_)));
    }

    #[test]
    fn test_null_and_invalid() {
        let conn = connection();
        conn.execute("INSERT INTO items (id, raw) VALUES ('nope', NULL)", [])
            .unwrap();

        let missing: Option<Guid> = conn
            .query_row("SELECT raw FROM items", [], |row| row.get(0))
            .unwrap();
        assert_eq!(missing, None);

        let invalid = conn.query_row("SELECT id FROM items", [], |row| row.get::<_, Guid>(0));
        assert!(invalid.is_err());
    }
}
