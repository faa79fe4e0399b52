//! PostgreSQL adapter for AccountRepository

use async_trait::async_trait;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::domain::entities::{Account, AccountFilter, AccountId, NewAccount};
use crate::domain::ports::AccountRepository;
use crate::entity::accounts;
use crate::error::DomainError;

/// PostgreSQL implementation of AccountRepository
pub struct PostgresAccountRepository {
    db: DatabaseConnection,
}

impl PostgresAccountRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, DomainError> {
        let result = accounts::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let result = accounts::Entity::find()
            .filter(accounts::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_credentials(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<Account>, DomainError> {
        let result = accounts::Entity::find()
            .filter(accounts::Column::Email.eq(email))
            .filter(accounts::Column::PasswordHash.eq(password_hash))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn search(
        &self,
        filter: &AccountFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Account>, DomainError> {
        let mut query = accounts::Entity::find();

        if let Some(first_name) = &filter.first_name {
            query = query
                .filter(Expr::col(accounts::Column::FirstName).ilike(format!("%{first_name}%")));
        }
        if let Some(last_name) = &filter.last_name {
            query =
                query.filter(Expr::col(accounts::Column::LastName).ilike(format!("%{last_name}%")));
        }
        if let Some(email) = &filter.email {
            query = query.filter(Expr::col(accounts::Column::Email).ilike(format!("%{email}%")));
        }

        let results = query
            .order_by_asc(accounts::Column::Id)
            .offset(offset as u64)
            .limit(limit as u64)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(&self, account: &NewAccount) -> Result<Account, DomainError> {
        let model = accounts::ActiveModel {
            first_name: Set(account.first_name.clone()),
            last_name: Set(account.last_name.clone()),
            email: Set(account.email.clone()),
            password_hash: Set(account.password_hash.clone()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn update(&self, id: &AccountId, account: &NewAccount) -> Result<Account, DomainError> {
        let result = accounts::ActiveModel {
            id: Set(id.0),
            first_name: Set(account.first_name.clone()),
            last_name: Set(account.last_name.clone()),
            email: Set(account.email.clone()),
            password_hash: Set(account.password_hash.clone()),
        }
        .update(&self.db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn delete(&self, id: &AccountId) -> Result<(), DomainError> {
        accounts::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }
}

/// Convert SeaORM model to domain entity
impl From<accounts::Model> for Account {
    fn from(model: accounts::Model) -> Self {
        Account {
            id: AccountId(model.id),
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            password_hash: model.password_hash,
        }
    }
}
