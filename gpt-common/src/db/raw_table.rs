//! In-memory raw tables
//!
//! Each table is bulk-loaded from the store and fully re-read after every
//! write. The `read_only` flag is carried for callers; nothing here refuses
//! a write because of it.

use crate::db::schema::{Row, TableDef};
use crate::db::store::Store;
use crate::models::{
    Arrangement, ArrangementGoal, Artist, Entity, Guitar, PracticeSession, Song, SongGoal,
    StringSet, Style,
};
use crate::Result;
use tracing::{debug, info, warn};

/// A typed record backed by one table
pub trait Record: Sized + Clone {
    const ENTITY: Entity;

    fn id(&self) -> Option<i64>;

    fn from_row(row: &Row) -> Result<Self>;

    fn to_row(&self) -> Row;

    fn table() -> &'static TableDef {
        Self::ENTITY.table()
    }
}

#[derive(Debug, Clone)]
pub struct RawTable<T> {
    pub rows: Vec<T>,
    pub read_only: bool,
}

impl<T: Record> RawTable<T> {
    pub fn new(read_only: bool) -> Self {
        Self {
            rows: Vec::new(),
            read_only,
        }
    }

    /// Replace the cached rows with a fresh SELECT
    pub async fn read(&mut self, store: &Store) -> Result<()> {
        let rows = store.read_table(T::table()).await?;
        self.rows = rows
            .iter()
            .filter_map(|row| match T::from_row(row) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping unreadable {} row {:?}: {}", T::table().name, row.get("id"), e);
                    None
                }
            })
            .collect();
        debug!("Reloaded {} ({} rows)", T::table().name, self.rows.len());
        Ok(())
    }

    /// Insert a new row (any id is ignored), then reload
    pub async fn insert(&mut self, store: &Store, row: &Row) -> Result<()> {
        store.insert_row(T::table(), row).await?;
        info!("Inserted row into {}", T::table().name);
        self.read(store).await
    }

    /// Update the row matching `id`, then reload
    pub async fn update(&mut self, store: &Store, id: i64, row: &Row) -> Result<()> {
        let affected = store.update_row(T::table(), id, row).await?;
        info!("Updated {} id {} ({} rows)", T::table().name, id, affected);
        self.read(store).await
    }

    pub async fn delete(&mut self, store: &Store, id: i64) -> Result<()> {
        let affected = store.delete_row(T::table(), id).await?;
        info!("Deleted {} id {} ({} rows)", T::table().name, id, affected);
        self.read(store).await
    }

    pub fn get(&self, id: i64) -> Option<&T> {
        self.rows.iter().find(|r| r.id() == Some(id))
    }
}

/// One pending single-row write
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOp {
    pub entity: Entity,
    pub kind: WriteKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WriteKind {
    Insert(Row),
    Update(i64, Row),
    Delete(i64),
}

impl WriteOp {
    pub fn insert(entity: Entity, row: Row) -> Self {
        Self {
            entity,
            kind: WriteKind::Insert(row),
        }
    }

    pub fn update(entity: Entity, id: i64, row: Row) -> Self {
        Self {
            entity,
            kind: WriteKind::Update(id, row),
        }
    }

    pub fn delete(entity: Entity, id: i64) -> Self {
        Self {
            entity,
            kind: WriteKind::Delete(id),
        }
    }
}

/// Every raw table the services work from
#[derive(Debug, Clone)]
pub struct Tables {
    pub artists: RawTable<Artist>,
    pub styles: RawTable<Style>,
    pub string_sets: RawTable<StringSet>,
    pub songs: RawTable<Song>,
    pub arrangements: RawTable<Arrangement>,
    pub arrangement_goals: RawTable<ArrangementGoal>,
    pub song_goals: RawTable<SongGoal>,
    pub guitars: RawTable<Guitar>,
    pub sessions: RawTable<PracticeSession>,
}

impl Tables {
    /// Empty tables, all sharing one read-only flag
    pub fn empty(read_only: bool) -> Self {
        Self {
            artists: RawTable::new(read_only),
            styles: RawTable::new(read_only),
            string_sets: RawTable::new(read_only),
            songs: RawTable::new(read_only),
            arrangements: RawTable::new(read_only),
            arrangement_goals: RawTable::new(read_only),
            song_goals: RawTable::new(read_only),
            guitars: RawTable::new(read_only),
            sessions: RawTable::new(read_only),
        }
    }

    /// Bulk-load every table
    pub async fn load(store: &Store, read_only: bool) -> Result<Self> {
        let mut tables = Self::empty(read_only);
        for entity in Entity::ALL {
            tables.reload(store, entity).await?;
        }
        info!(
            "Loaded tables: {} sessions, {} arrangements, {} songs, {} guitars",
            tables.sessions.rows.len(),
            tables.arrangements.rows.len(),
            tables.songs.rows.len(),
            tables.guitars.rows.len()
        );
        Ok(tables)
    }

    pub async fn reload(&mut self, store: &Store, entity: Entity) -> Result<()> {
        match entity {
            Entity::Artist => self.artists.read(store).await,
            Entity::Style => self.styles.read(store).await,
            Entity::StringSet => self.string_sets.read(store).await,
            Entity::Song => self.songs.read(store).await,
            Entity::Arrangement => self.arrangements.read(store).await,
            Entity::ArrangementGoal => self.arrangement_goals.read(store).await,
            Entity::SongGoal => self.song_goals.read(store).await,
            Entity::Guitar => self.guitars.read(store).await,
            Entity::Session => self.sessions.read(store).await,
        }
    }

    pub fn is_read_only(&self, entity: Entity) -> bool {
        match entity {
            Entity::Artist => self.artists.read_only,
            Entity::Style => self.styles.read_only,
            Entity::StringSet => self.string_sets.read_only,
            Entity::Song => self.songs.read_only,
            Entity::Arrangement => self.arrangements.read_only,
            Entity::ArrangementGoal => self.arrangement_goals.read_only,
            Entity::SongGoal => self.song_goals.read_only,
            Entity::Guitar => self.guitars.read_only,
            Entity::Session => self.sessions.read_only,
        }
    }

    /// Run one write against the store, then reload the owning table
    pub async fn apply(&mut self, store: &Store, op: &WriteOp) -> Result<()> {
        match &op.kind {
            WriteKind::Insert(row) => match op.entity {
                Entity::Artist => self.artists.insert(store, row).await,
                Entity::Style => self.styles.insert(store, row).await,
                Entity::StringSet => self.string_sets.insert(store, row).await,
                Entity::Song => self.songs.insert(store, row).await,
                Entity::Arrangement => self.arrangements.insert(store, row).await,
                Entity::ArrangementGoal => self.arrangement_goals.insert(store, row).await,
                Entity::SongGoal => self.song_goals.insert(store, row).await,
                Entity::Guitar => self.guitars.insert(store, row).await,
                Entity::Session => self.sessions.insert(store, row).await,
            },
            WriteKind::Update(id, row) => match op.entity {
                Entity::Artist => self.artists.update(store, *id, row).await,
                Entity::Style => self.styles.update(store, *id, row).await,
                Entity::StringSet => self.string_sets.update(store, *id, row).await,
                Entity::Song => self.songs.update(store, *id, row).await,
                Entity::Arrangement => self.arrangements.update(store, *id, row).await,
                Entity::ArrangementGoal => self.arrangement_goals.update(store, *id, row).await,
                Entity::SongGoal => self.song_goals.update(store, *id, row).await,
                Entity::Guitar => self.guitars.update(store, *id, row).await,
                Entity::Session => self.sessions.update(store, *id, row).await,
            },
            WriteKind::Delete(id) => match op.entity {
                Entity::Artist => self.artists.delete(store, *id).await,
                Entity::Style => self.styles.delete(store, *id).await,
                Entity::StringSet => self.string_sets.delete(store, *id).await,
                Entity::Song => self.songs.delete(store, *id).await,
                Entity::Arrangement => self.arrangements.delete(store, *id).await,
                Entity::ArrangementGoal => self.arrangement_goals.delete(store, *id).await,
                Entity::SongGoal => self.song_goals.delete(store, *id).await,
                Entity::Guitar => self.guitars.delete(store, *id).await,
                Entity::Session => self.sessions.delete(store, *id).await,
            },
        }
    }

    /// Apply `ops` in order; the first failure stops the sequence
    pub async fn apply_all(&mut self, store: &Store, ops: &[WriteOp]) -> Result<()> {
        for op in ops {
            self.apply(store, op).await?;
        }
        Ok(())
    }
}
