use async_trait::async_trait;
use regex::RegexBuilder;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::User;
use crate::query::{SortOrder, UserQuery};

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user, failing with `DuplicateEmail` if the email is taken
    async fn create(&self, user: User) -> UserResult<User>;

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>>;

    /// Replace an existing user document
    async fn update(&self, user: User) -> UserResult<User>;

    /// `false` when nothing was deleted
    async fn delete(&self, id: Uuid) -> UserResult<bool>;

    async fn email_exists(&self, email: &str) -> UserResult<bool>;

    /// Count users matching the query's search filter
    async fn count(&self, query: &UserQuery) -> UserResult<u64>;

    /// Fetch one sorted page of users matching the query's search filter
    async fn find_page(&self, query: &UserQuery) -> UserResult<Vec<User>>;
}

/// In-memory implementation of UserRepository (for development/testing).
///
/// List queries follow the document store: the search pattern is a
/// case-insensitive regex on the field's string value, sorting compares the
/// field's JSON value with missing fields first, a negative skip is an error
/// and a negative page size is read as its absolute value.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn matching(users: &HashMap<Uuid, User>, query: &UserQuery) -> UserResult<Vec<(Value, User)>> {
        let regex = query
            .search
            .as_ref()
            .map(|term| {
                RegexBuilder::new(&term.pattern)
                    .case_insensitive(true)
                    .build()
                    .map(|re| (term.field.as_str(), re))
                    .map_err(|e| UserError::Database(format!("invalid $regex: {e}")))
            })
            .transpose()?;

        let mut docs = Vec::with_capacity(users.len());
        for user in users.values() {
            let doc = serde_json::to_value(user).map_err(|e| UserError::Internal(e.to_string()))?;
            let keep = match &regex {
                Some((field, re)) => doc
                    .get(*field)
                    .and_then(Value::as_str)
                    .is_some_and(|s| re.is_match(s)),
                None => true,
            };
            if keep {
                docs.push((doc, user.clone()));
            }
        }
        Ok(docs)
    }
}

fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Number(_)) => 1,
        Some(Value::String(_)) => 2,
        Some(Value::Object(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Bool(_)) => 5,
    }
}

fn compare_field(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(UserError::DuplicateEmail(user.email));
        }

        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, email = %user.email, "Created user");
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id) {
            return Err(UserError::NotFound(user.id));
        }

        if users.values().any(|u| u.id != user.id && u.email == user.email) {
            return Err(UserError::DuplicateEmail(user.email));
        }

        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, "Updated user");
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let mut users = self.users.write().await;

        if users.remove(&id).is_some() {
            tracing::info!(user_id = %id, "Deleted user");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn email_exists(&self, email: &str) -> UserResult<bool> {
        let users = self.users.read().await;
        Ok(users.values().any(|u| u.email == email))
    }

    async fn count(&self, query: &UserQuery) -> UserResult<u64> {
        let users = self.users.read().await;
        Ok(Self::matching(&users, query)?.len() as u64)
    }

    async fn find_page(&self, query: &UserQuery) -> UserResult<Vec<User>> {
        let skip = usize::try_from(query.skip())
            .map_err(|_| UserError::Database("skip must be non-negative".to_string()))?;
        let limit = usize::try_from(query.page_size.unsigned_abs()).unwrap_or(usize::MAX);

        let users = self.users.read().await;
        let mut docs = Self::matching(&users, query)?;

        let field = query.sort_field.as_str();
        docs.sort_by(|(a, ua), (b, ub)| {
            let ord = compare_field(a.get(field), b.get(field));
            let ord = match query.sort_order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            };
            ord.then_with(|| ua.id.cmp(&ub.id))
        });

        Ok(docs
            .into_iter()
            .map(|(_, user)| user)
            .skip(skip)
            .take(limit)
            .collect())
    }
}
