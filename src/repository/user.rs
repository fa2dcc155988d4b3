//! User persistence.

use async_trait::async_trait;
use mongodb::Collection;
use serde::{Deserialize, Serialize};

use super::RepositoryError;
use crate::mongo::{ConnectionError, DatabaseConnection, MongoConnection};

const USERS_COLLECTION: &str = "users";

/// User aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {}

/// Storage for [`User`] aggregates.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn save(&self, user: &User) -> Result<(), RepositoryError>;
}

/// MongoDB-backed user repository.
pub struct MongoUserRepository {
    connection: MongoConnection,
    users: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(connection: &MongoConnection) -> Result<Self, RepositoryError> {
        let users = connection.database()?.collection(USERS_COLLECTION);
        Ok(Self {
            connection: connection.clone(),
            users,
        })
    }

    pub fn collection_name(&self) -> &str {
        self.users.name()
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn save(&self, _user: &User) -> Result<(), RepositoryError> {
        if self.connection.is_closed() {
            return Err(ConnectionError::Closed.into());
        }
        // Persistence is not implemented yet.
        Ok(())
    }
}
