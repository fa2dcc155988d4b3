use std::sync::Arc;

use crate::mongo::MongoConnection;
use crate::repository::{MongoUserRepository, RepositoryError, UserRepository};

#[derive(Clone)]
pub struct AppState {
    pub connection: MongoConnection,
    pub users: Arc<dyn UserRepository>,
}

impl AppState {
    pub fn new(connection: &MongoConnection) -> Result<Self, RepositoryError> {
        let users = Arc::new(MongoUserRepository::new(connection)?);

        Ok(Self {
            connection: connection.clone(),
            users,
        })
    }
}
