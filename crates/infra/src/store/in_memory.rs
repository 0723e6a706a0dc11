//! In-memory store for tests/dev.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tracing::instrument;

use escola_core::{
    NewProfessor, PopulatedProfessor, Professor, ProfessorId, ProfessorPatch, User, UserId,
};

use super::r#trait::{ProfessorStore, StoreError, UserDirectory};

/// Both collections behind one handle, like a document database.
///
/// Professors are keyed by time-ordered ids, so map order is creation order.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    professores: RwLock<BTreeMap<ProfessorId, Professor>>,
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an owner account.
    pub fn insert_user(&self, user: User) -> Result<(), StoreError> {
        write(&self.users)?.insert(user.id, user);
        Ok(())
    }

    /// Drop an owner account. Professors referencing it are left in place.
    pub fn remove_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(write(&self.users)?.remove(&id))
    }

    fn populate(&self, professor: Professor) -> Result<PopulatedProfessor, StoreError> {
        let owner = read(&self.users)?.get(&professor.user_ref).cloned();
        Ok(professor.populate(owner))
    }
}

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, StoreError> {
    lock.read()
        .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, StoreError> {
    lock.write()
        .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))
}

#[async_trait]
impl ProfessorStore for InMemoryStore {
    async fn list_all(&self) -> Result<Vec<PopulatedProfessor>, StoreError> {
        let snapshot: Vec<Professor> = read(&self.professores)?.values().cloned().collect();
        snapshot.into_iter().map(|p| self.populate(p)).collect()
    }

    async fn get_by_id(&self, id: ProfessorId) -> Result<Option<PopulatedProfessor>, StoreError> {
        let found = read(&self.professores)?.get(&id).cloned();
        found.map(|p| self.populate(p)).transpose()
    }

    #[instrument(skip(self, new), err)]
    async fn create(&self, new: NewProfessor) -> Result<Professor, StoreError> {
        let mut map = write(&self.professores)?;
        let mut id = ProfessorId::new();
        while map.contains_key(&id) {
            id = ProfessorId::new();
        }
        let professor = new.into_professor(id);
        map.insert(id, professor.clone());
        Ok(professor)
    }

    #[instrument(skip(self, patch), fields(id = %id), err)]
    async fn update_by_id(
        &self,
        id: ProfessorId,
        patch: ProfessorPatch,
    ) -> Result<Option<Professor>, StoreError> {
        let mut map = write(&self.professores)?;
        Ok(map.get_mut(&id).map(|p| {
            p.apply(&patch);
            p.clone()
        }))
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn delete_by_id(&self, id: ProfessorId) -> Result<bool, StoreError> {
        Ok(write(&self.professores)?.remove(&id).is_some())
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Professor>, StoreError> {
        Ok(read(&self.professores)?
            .values()
            .filter(|p| p.user_ref == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserDirectory for InMemoryStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(read(&self.users)?.get(&id).cloned())
    }
}
