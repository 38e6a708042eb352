use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension, Row};
use rusqlite_migration::{Migrations, M};

use crate::app::{ContentError, Result};
use crate::domain::{
    format_date, parse_date, Entry, Link, LinkUpdate, Publisher, PublisherHash, PublisherUpdate,
};
use crate::store::Store;

const PUBLISHER_COLUMNS: &str = "id, name, website, rss, type, category, hash";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(mut conn: Connection) -> Result<Self> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        migrations.to_latest(&mut conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ContentError::Other(format!("Store connection poisoned: {e}")))
    }

    /// Run raw SQL against the connection, used by tests to install
    /// failure-injecting triggers.
    #[cfg(test)]
    pub(crate) fn execute_batch(&self, sql: &str) -> Result<()> {
        self.conn()?.execute_batch(sql)?;
        Ok(())
    }

    fn row_to_link(row: &Row<'_>) -> rusqlite::Result<Link> {
        let date: String = row.get(2)?;
        Ok(Link {
            link: row.get(0)?,
            title: row.get(1)?,
            date: parse_date(&date).map_err(|e| conversion_error(2, e))?,
            kind: row.get(3)?,
            category: row.get(4)?,
        })
    }

    fn row_to_publisher(row: &Row<'_>) -> rusqlite::Result<Publisher> {
        Ok(Publisher {
            id: row.get(0)?,
            name: row.get(1)?,
            website: row.get(2)?,
            rss: row.get(3)?,
            kind: row.get(4)?,
            category: row.get(5)?,
            hash: row.get(6)?,
        })
    }

    fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<Entry> {
        let date = row
            .get::<_, Option<String>>(3)?
            .map(|s| parse_date(&s))
            .transpose()
            .map_err(|e| conversion_error(3, e))?;
        Ok(Entry {
            title: row.get(0)?,
            link: row.get(1)?,
            publisher: row.get(2)?,
            date,
        })
    }
}

fn conversion_error(column: usize, err: ContentError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(err))
}

fn not_found_unless_changed(changed: usize, what: String) -> Result<()> {
    if changed == 0 {
        Err(ContentError::NotFound(what))
    } else {
        Ok(())
    }
}

impl Store for SqliteStore {
    fn add_link(&self, link: &Link) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO links (link, title, date, type, category) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                link.link,
                link.title,
                format_date(link.date),
                link.kind,
                link.category
            ],
        )?;
        Ok(())
    }

    fn get_links(&self) -> Result<Vec<Link>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT link, title, date, type, category FROM links ORDER BY date, title")?;
        let links = stmt
            .query_map([], Self::row_to_link)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(links)
    }

    fn get_link_by_title(&self, title: &str) -> Result<Option<Link>> {
        let conn = self.conn()?;
        let link = conn
            .query_row(
                "SELECT link, title, date, type, category FROM links WHERE title = ?1",
                params![title],
                Self::row_to_link,
            )
            .optional()?;
        Ok(link)
    }

    fn update_link(&self, link: &str, update: &LinkUpdate) -> Result<()> {
        let conn = self.conn()?;
        let exists: i64 = conn.query_row(
            "SELECT COUNT(*) FROM links WHERE link = ?1",
            params![link],
            |row| row.get(0),
        )?;
        not_found_unless_changed(exists as usize, format!("link {link:?}"))?;

        if let Some(date) = update.date {
            conn.execute(
                "UPDATE links SET date = ?1 WHERE link = ?2",
                params![format_date(date), link],
            )?;
        }
        if let Some(ref kind) = update.kind {
            conn.execute(
                "UPDATE links SET type = ?1 WHERE link = ?2",
                params![kind, link],
            )?;
        }
        if let Some(ref category) = update.category {
            conn.execute(
                "UPDATE links SET category = ?1 WHERE link = ?2",
                params![category, link],
            )?;
        }
        Ok(())
    }

    fn delete_link(&self, link: &str) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM links WHERE link = ?1", params![link])?;
        not_found_unless_changed(deleted, format!("link {link:?}"))
    }

    fn add_publisher(&self, publisher: &Publisher) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO publishers (name, website, rss, type, category, hash)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                publisher.name,
                publisher.website,
                publisher.rss,
                publisher.kind,
                publisher.category,
                publisher.hash
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn get_publisher(&self, id: i64) -> Result<Option<Publisher>> {
        let conn = self.conn()?;
        let publisher = conn
            .query_row(
                &format!("SELECT {PUBLISHER_COLUMNS} FROM publishers WHERE id = ?1"),
                params![id],
                Self::row_to_publisher,
            )
            .optional()?;
        Ok(publisher)
    }

    fn get_publisher_by_name(&self, name: &str) -> Result<Option<Publisher>> {
        let conn = self.conn()?;
        let publisher = conn
            .query_row(
                &format!("SELECT {PUBLISHER_COLUMNS} FROM publishers WHERE name = ?1"),
                params![name],
                Self::row_to_publisher,
            )
            .optional()?;
        Ok(publisher)
    }

    fn list_publishers(&self) -> Result<Vec<Publisher>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare(&format!("SELECT {PUBLISHER_COLUMNS} FROM publishers ORDER BY id"))?;
        let publishers = stmt
            .query_map([], Self::row_to_publisher)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(publishers)
    }

    fn update_publisher(&self, name: &str, update: &PublisherUpdate) -> Result<()> {
        let conn = self.conn()?;
        let exists: i64 = conn.query_row(
            "SELECT COUNT(*) FROM publishers WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )?;
        not_found_unless_changed(exists as usize, format!("publisher {name:?}"))?;

        // The stored fingerprint belongs to the old feed.
        if let Some(ref rss) = update.rss {
            conn.execute(
                "UPDATE publishers SET rss = ?1, hash = NULL WHERE name = ?2",
                params![rss, name],
            )?;
        }
        if let Some(ref kind) = update.kind {
            conn.execute(
                "UPDATE publishers SET type = ?1 WHERE name = ?2",
                params![kind, name],
            )?;
        }
        if let Some(ref category) = update.category {
            conn.execute(
                "UPDATE publishers SET category = ?1 WHERE name = ?2",
                params![category, name],
            )?;
        }
        Ok(())
    }

    fn delete_publisher(&self, name: &str) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM publishers WHERE name = ?1", params![name])?;
        not_found_unless_changed(deleted, format!("publisher {name:?}"))
    }

    fn get_publisher_hashes(&self) -> Result<Vec<PublisherHash>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, name, rss, hash FROM publishers ORDER BY id")?;
        let hashes = stmt
            .query_map([], |row| {
                Ok(PublisherHash {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    rss: row.get(2)?,
                    hash: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(hashes)
    }

    fn update_publisher_hash(&self, id: i64, hash: &str) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE publishers SET hash = ?1 WHERE id = ?2",
            params![hash, id],
        )?;
        not_found_unless_changed(updated, format!("publisher with id {id}"))
    }

    fn add_entry(&self, entry: &Entry) -> Result<bool> {
        let conn = self.conn()?;
        // OR IGNORE covers the (publisher, link) uniqueness only; SQLite
        // still raises foreign key failures.
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO entries (title, link, publisher, date) VALUES (?1, ?2, ?3, ?4)",
            params![
                entry.title,
                entry.link,
                entry.publisher,
                entry.date.map(format_date)
            ],
        )?;
        Ok(inserted > 0)
    }

    fn get_entries(&self) -> Result<Vec<Entry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT title, link, publisher, date FROM entries ORDER BY date DESC, rowid",
        )?;
        let entries = stmt
            .query_map([], Self::row_to_entry)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    fn get_entries_by_publisher(&self, publisher_id: i64) -> Result<Vec<Entry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT title, link, publisher, date FROM entries
             WHERE publisher = ?1 ORDER BY date DESC, rowid",
        )?;
        let entries = stmt
            .query_map(params![publisher_id], Self::row_to_entry)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    fn delete_entry(&self, link: &str) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM entries WHERE link = ?1", params![link])?;
        not_found_unless_changed(deleted, format!("entry {link:?}"))
    }
}
