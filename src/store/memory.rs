use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{TaskStore, UserStore};
use crate::error::AppError;
use crate::models::{Task, User};

/// In-memory `UserStore` (non-persistent, for tests and local runs).
#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.email.to_lowercase() == email.to_lowercase())
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn insert(&self, user: &User) -> Result<User, AppError> {
        // Check and insert under one write lock, like the unique index does.
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.email.to_lowercase() == user.email.to_lowercase())
        {
            return Err(AppError::DuplicateEmail);
        }
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }
}

/// In-memory `TaskStore` (non-persistent, for tests and local runs).
#[derive(Clone, Default)]
pub struct InMemoryTaskStore {
    tasks: Arc<RwLock<HashMap<Uuid, Task>>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn find_by_id(&self, owner: &str, id: Uuid) -> Result<Option<Task>, AppError> {
        let tasks = self.tasks.read().await;
        Ok(tasks.get(&id).filter(|t| t.user_id == owner).cloned())
    }

    async fn list_by_owner(&self, owner: &str) -> Result<Vec<Task>, AppError> {
        let tasks = self.tasks.read().await;
        let mut owned: Vec<Task> = tasks
            .values()
            .filter(|t| t.user_id == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(owned)
    }

    async fn insert(&self, task: &Task) -> Result<Task, AppError> {
        let mut tasks = self.tasks.write().await;
        if tasks.contains_key(&task.id) {
            return Err(AppError::Database(format!(
                "duplicate key value violates unique constraint on tasks.id ({})",
                task.id
            )));
        }
        tasks.insert(task.id, task.clone());
        Ok(task.clone())
    }

    async fn update(&self, task: &Task) -> Result<Option<Task>, AppError> {
        let mut tasks = self.tasks.write().await;
        match tasks.get_mut(&task.id) {
            Some(stored) if stored.user_id == task.user_id => {
                stored.title = task.title.clone();
                stored.description = task.description.clone();
                stored.completed = task.completed;
                stored.updated_at = task.updated_at;
                Ok(Some(stored.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete(&self, owner: &str, id: Uuid) -> Result<bool, AppError> {
        let mut tasks = self.tasks.write().await;
        match tasks.get(&id) {
            Some(task) if task.user_id == owner => {
                tasks.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskCreate;
    use chrono::{Duration, Utc};
    use pretty_assertions::assert_eq;

    fn task_for(owner: &str, title: &str) -> Task {
        Task::new(
            TaskCreate {
                title: title.to_string(),
                description: None,
            },
            owner,
        )
    }

    #[actix_rt::test]
    async fn test_user_email_is_unique_case_insensitively() {
        let store = InMemoryUserStore::new();
        let user = User {
            id: Uuid::new_v4(),
            email: "alice@example.com".into(),
            password_hash: "hash".into(),
            name: "Alice".into(),
            created_at: Utc::now(),
        };
        store.insert(&user).await.unwrap();

        let shouting = User {
            id: Uuid::new_v4(),
            email: "ALICE@example.com".into(),
            ..user.clone()
        };
        assert!(matches!(
            store.insert(&shouting).await,
            Err(AppError::DuplicateEmail)
        ));
        assert_eq!(store.len().await, 1);
        assert!(store
            .find_by_email("Alice@Example.com")
            .await
            .unwrap()
            .is_some());
        assert!(store.find_by_id(user.id).await.unwrap().is_some());
    }

    #[actix_rt::test]
    async fn test_lookup_and_uniqueness_agree_beyond_ascii() {
        let store = InMemoryUserStore::new();
        let user = User {
            id: Uuid::new_v4(),
            email: "émile@example.com".into(),
            password_hash: "hash".into(),
            name: "Émile".into(),
            created_at: Utc::now(),
        };
        store.insert(&user).await.unwrap();

        let found = store.find_by_email("ÉMILE@example.com").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));

        let upper = User {
            id: Uuid::new_v4(),
            email: "ÉMILE@example.com".into(),
            ..user.clone()
        };
        assert!(matches!(
            store.insert(&upper).await,
            Err(AppError::DuplicateEmail)
        ));
    }

    #[actix_rt::test]
    async fn test_list_is_owner_scoped_and_ordered() {
        let store = InMemoryTaskStore::new();
        let mut first = task_for("u1", "first");
        let mut second = task_for("u1", "second");
        let other = task_for("u2", "other");
        let base = Utc::now();
        first.created_at = base;
        second.created_at = base + Duration::seconds(1);

        store.insert(&second).await.unwrap();
        store.insert(&other).await.unwrap();
        store.insert(&first).await.unwrap();

        let titles: Vec<String> = store
            .list_by_owner("u1")
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["first".to_string(), "second".to_string()]);
    }

    #[actix_rt::test]
    async fn test_equal_timestamps_fall_back_to_id_order() {
        let store = InMemoryTaskStore::new();
        let now = Utc::now();
        let mut a = task_for("u1", "a");
        let mut b = task_for("u1", "b");
        a.created_at = now;
        b.created_at = now;
        store.insert(&a).await.unwrap();
        store.insert(&b).await.unwrap();

        let ids: Vec<Uuid> = store
            .list_by_owner("u1")
            .await
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        let mut expected = vec![a.id, b.id];
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[actix_rt::test]
    async fn test_foreign_rows_are_invisible() {
        let store = InMemoryTaskStore::new();
        let task = task_for("u1", "mine");
        store.insert(&task).await.unwrap();

        assert!(store.find_by_id("u2", task.id).await.unwrap().is_none());

        let mut hijack = task.clone();
        hijack.user_id = "u2".into();
        hijack.title = "stolen".into();
        assert!(store.update(&hijack).await.unwrap().is_none());
        assert!(!store.delete("u2", task.id).await.unwrap());

        let stored = store.find_by_id("u1", task.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "mine");
    }
}
