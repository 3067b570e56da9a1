use crate::error::{Result, StoreError};
use msisdn_core::domain::{Msisdn, Subscriber, SubscriberId};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::str::FromStr;

/// Persists subscriber records. MSISDN values crossing this boundary are
/// already canonical; the column only enforces its 32-character width.
pub struct SubscribersRepo<'a> {
    conn: &'a Connection,
}

impl<'a> SubscribersRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn create(&self, now_utc: i64, name: &str, msisdn: &Msisdn) -> Result<Subscriber> {
        let subscriber = Subscriber {
            id: SubscriberId::new(),
            name: name.trim().to_string(),
            msisdn: msisdn.clone(),
            created_at: now_utc,
            updated_at: now_utc,
        };
        subscriber.validate()?;

        self.conn.execute(
            "INSERT INTO subscribers (id, name, msisdn, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                subscriber.id.to_string(),
                subscriber.name,
                subscriber.msisdn.as_str(),
                subscriber.created_at,
                subscriber.updated_at,
            ],
        )?;
        Ok(subscriber)
    }

    pub fn get(&self, id: &SubscriberId) -> Result<Subscriber> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, msisdn, created_at, updated_at
                 FROM subscribers WHERE id = ?1;",
                params![id.to_string()],
                row_to_raw,
            )
            .optional()?;
        match row {
            Some(raw) => raw_to_subscriber(raw),
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }

    pub fn list(&self) -> Result<Vec<Subscriber>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, msisdn, created_at, updated_at
             FROM subscribers ORDER BY created_at, name;",
        )?;
        let rows = stmt.query_map([], row_to_raw)?;
        let mut subscribers = Vec::new();
        for raw in rows {
            subscribers.push(raw_to_subscriber(raw?)?);
        }
        Ok(subscribers)
    }

    pub fn find_by_msisdn(&self, msisdn: &Msisdn) -> Result<Vec<Subscriber>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, msisdn, created_at, updated_at
             FROM subscribers WHERE msisdn = ?1 ORDER BY created_at, name;",
        )?;
        let rows = stmt.query_map(params![msisdn.as_str()], row_to_raw)?;
        let mut subscribers = Vec::new();
        for raw in rows {
            subscribers.push(raw_to_subscriber(raw?)?);
        }
        Ok(subscribers)
    }

    pub fn update_msisdn(
        &self,
        now_utc: i64,
        id: &SubscriberId,
        msisdn: &Msisdn,
    ) -> Result<Subscriber> {
        let updated = self.conn.execute(
            "UPDATE subscribers SET msisdn = ?1, updated_at = ?2 WHERE id = ?3;",
            params![msisdn.as_str(), now_utc, id.to_string()],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.get(id)
    }

    pub fn delete(&self, id: &SubscriberId) -> Result<()> {
        let deleted = self.conn.execute(
            "DELETE FROM subscribers WHERE id = ?1;",
            params![id.to_string()],
        )?;
        if deleted == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

type RawRow = (String, String, String, i64, i64);

fn row_to_raw(row: &Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
    ))
}

fn raw_to_subscriber(raw: RawRow) -> Result<Subscriber> {
    let (id, name, msisdn, created_at, updated_at) = raw;
    let id = SubscriberId::from_str(&id).map_err(|_| StoreError::InvalidId(id))?;
    Ok(Subscriber {
        id,
        name,
        msisdn: Msisdn::from_canonical(msisdn),
        created_at,
        updated_at,
    })
}

#[cfg(test)]
mod tests {
    use crate::error::StoreError;
    use crate::Store;
    use msisdn_core::domain::Msisdn;
    use msisdn_core::SubscriberId;

    fn store() -> Store {
        let store = Store::open_in_memory().expect("open");
        store.migrate().expect("migrate");
        store
    }

    fn msisdn(value: &str) -> Msisdn {
        Msisdn::from_canonical(value.to_string())
    }

    #[test]
    fn create_get_roundtrip() {
        let store = store();
        let created = store
            .subscribers()
            .create(1_700_000_000, "Ada Lovelace", &msisdn("27831234567"))
            .expect("create");
        let fetched = store.subscribers().get(&created.id).expect("get");
        assert_eq!(fetched, created);
        assert_eq!(fetched.msisdn.as_str(), "27831234567");
    }

    #[test]
    fn create_rejects_blank_name() {
        let store = store();
        let err = store
            .subscribers()
            .create(0, "   ", &msisdn("27831234567"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Core(_)));
    }

    #[test]
    fn column_width_is_enforced() {
        let store = store();
        let wide = "2".repeat(33);
        let err = store
            .subscribers()
            .create(0, "Ada", &msisdn(&wide))
            .unwrap_err();
        assert!(matches!(err, StoreError::Sql(_)));
    }

    #[test]
    fn update_msisdn_bumps_updated_at() {
        let store = store();
        let created = store
            .subscribers()
            .create(100, "Ada", &msisdn("27831234567"))
            .expect("create");
        let updated = store
            .subscribers()
            .update_msisdn(200, &created.id, &msisdn("27841234567"))
            .expect("update");
        assert_eq!(updated.msisdn.as_str(), "27841234567");
        assert_eq!(updated.created_at, 100);
        assert_eq!(updated.updated_at, 200);
    }

    #[test]
    fn find_by_msisdn_matches_exact_value() {
        let store = store();
        store
            .subscribers()
            .create(0, "Ada", &msisdn("27831234567"))
            .expect("create");
        store
            .subscribers()
            .create(0, "Grace", &msisdn("27841234567"))
            .expect("create");
        let found = store
            .subscribers()
            .find_by_msisdn(&msisdn("27831234567"))
            .expect("find");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Ada");
    }

    #[test]
    fn delete_missing_is_not_found() {
        let store = store();
        let err = store.subscribers().delete(&SubscriberId::new()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn migrations_are_idempotent() {
        let store = store();
        store.migrate().expect("second run");
        assert_eq!(store.schema_version().expect("version"), 1);
    }
}
