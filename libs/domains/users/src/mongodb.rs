//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Binary, Bson, Document, doc, spec::BinarySubtype},
    error::{ErrorKind, WriteFailure},
    options::{FindOptions, IndexOptions},
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::User;
use crate::query::UserQuery;
use crate::repository::UserRepository;

const DUPLICATE_KEY: i32 = 11000;

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    /// Repository over the `users` collection of `db`
    pub fn new(db: Database) -> Self {
        Self::with_collection(db, "users")
    }

    pub fn with_collection(db: Database, collection_name: &str) -> Self {
        let collection = db.collection::<User>(collection_name);
        Self { collection }
    }

    /// Unique email index; safe to call on every startup
    pub async fn init_indexes(&self) -> UserResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("idx_email_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(index).await?;
        tracing::info!("User indexes created successfully");
        Ok(())
    }

    /// `{ <field>: { $regex: <pattern>, $options: "i" } }`, or `{}` without a search
    fn build_filter(query: &UserQuery) -> Document {
        let mut filter = doc! {};

        if let Some(ref term) = query.search {
            filter.insert(
                term.field.as_str(),
                doc! { "$regex": term.pattern.as_str(), "$options": "i" },
            );
        }

        filter
    }

    fn build_sort(query: &UserQuery) -> Document {
        let mut sort = Document::new();
        sort.insert(query.sort_field.as_str(), query.sort_order.as_i32());
        sort
    }

    /// Documents are written through the binary serializer, where a
    /// `Uuid` becomes generic binary rather than a string.
    fn id_filter(id: Uuid) -> Document {
        let id = Bson::Binary(Binary {
            subtype: BinarySubtype::Generic,
            bytes: id.as_bytes().to_vec(),
        });
        doc! { "_id": id }
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY
    )
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn create(&self, user: User) -> UserResult<User> {
        match self.collection.insert_one(&user).await {
            Ok(_) => {
                tracing::info!(user_id = %user.id, "User created successfully");
                Ok(user)
            }
            Err(e) if is_duplicate_key(&e) => Err(UserError::DuplicateEmail(user.email)),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        Ok(self.collection.find_one(Self::id_filter(id)).await?)
    }

    #[instrument(skip(self))]
    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn update(&self, user: User) -> UserResult<User> {
        let result = match self
            .collection
            .replace_one(Self::id_filter(user.id), &user)
            .await
        {
            Ok(result) => result,
            Err(e) if is_duplicate_key(&e) => return Err(UserError::DuplicateEmail(user.email)),
            Err(e) => return Err(e.into()),
        };

        if result.matched_count == 0 {
            return Err(UserError::NotFound(user.id));
        }

        tracing::info!(user_id = %user.id, "User updated successfully");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let result = self.collection.delete_one(Self::id_filter(id)).await?;

        if result.deleted_count > 0 {
            tracing::info!(user_id = %id, "User deleted successfully");
        }
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn email_exists(&self, email: &str) -> UserResult<bool> {
        let count = self
            .collection
            .count_documents(doc! { "email": email })
            .await?;
        Ok(count > 0)
    }

    #[instrument(skip(self))]
    async fn count(&self, query: &UserQuery) -> UserResult<u64> {
        let count = self
            .collection
            .count_documents(Self::build_filter(query))
            .await?;
        Ok(count)
    }

    #[instrument(skip(self))]
    async fn find_page(&self, query: &UserQuery) -> UserResult<Vec<User>> {
        let skip = u64::try_from(query.skip()).map_err(|_| {
            UserError::Database(format!("skip must be non-negative, got {}", query.skip()))
        })?;

        let options = FindOptions::builder()
            .sort(Self::build_sort(query))
            .skip(skip)
            .limit(query.page_size)
            .build();

        let cursor = self
            .collection
            .find(Self::build_filter(query))
            .with_options(options)
            .await?;
        let users: Vec<User> = cursor.try_collect().await?;

        Ok(users)
    }
}
