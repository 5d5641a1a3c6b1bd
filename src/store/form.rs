use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::core::FormFields;

const CONTRACT_ADDRESS: &str = "contract_address";
const ABI_TEXT: &str = "abi_text";

/// SQLite-backed persistence for the playground form fields
///
/// Values are stored exactly as typed and are not validated on restore.
#[derive(Debug)]
pub struct FormStore {
    conn: Connection,
}

impl FormStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).with_context(|| format!("open db {}", path.display()))?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.init()?;
        Ok(store)
    }

    /// Restore the saved fields; missing fields come back empty
    pub fn load(&self) -> Result<FormFields> {
        Ok(FormFields {
            contract_address: self.get(CONTRACT_ADDRESS)?.unwrap_or_default(),
            abi_text: self.get(ABI_TEXT)?.unwrap_or_default(),
        })
    }

    /// Save both fields atomically
    pub fn save(&self, form: &FormFields) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        set(&tx, CONTRACT_ADDRESS, &form.contract_address)?;
        set(&tx, ABI_TEXT, &form.abi_text)?;
        tx.commit()?;
        Ok(())
    }

    fn get(&self, field: &str) -> Result<Option<String>> {
        Ok(self
            .conn
            .query_row(
                "SELECT value FROM form WHERE field = ?1",
                params![field],
                |row| row.get(0),
            )
            .optional()?)
    }

    fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS form (
                field TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }
}

fn set(conn: &Connection, field: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO form(field, value) VALUES (?1, ?2)
         ON CONFLICT(field) DO UPDATE SET value=excluded.value",
        params![field, value],
    )?;
    Ok(())
}
