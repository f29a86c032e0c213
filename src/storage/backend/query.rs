//! Query operations for SeaOrmStorage
//!
//! This module contains all read-only database operations.

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};

use super::SeaOrmStorage;
use super::converters::{model_to_mapping, record_model_to_access_record};
use crate::errors::{Result, TinyhopError};
use crate::storage::{AccessRecord, Mapping};

use migration::entities::{access_record, link};

impl SeaOrmStorage {
    pub async fn lookup(&self, token: &str) -> Result<Mapping> {
        let db = &self.db;
        let token_owned = token.to_string();

        let model = self
            .guarded(&format!("lookup({})", token), async {
                link::Entity::find_by_id(token_owned).one(db).await
            })
            .await?;

        model
            .map(model_to_mapping)
            .ok_or_else(|| TinyhopError::not_found(format!("Link not found: {}", token)))
    }

    /// Analytics read path; expired mappings are returned like any other.
    pub async fn read_analytics(&self, token: &str) -> Result<Mapping> {
        self.lookup(token).await
    }

    /// 某个 token 的全部访问记录，按时间正序
    pub async fn read_all(&self, token: &str) -> Result<Vec<AccessRecord>> {
        let db = &self.db;

        let models = self
            .guarded(&format!("read_all({})", token), async {
                access_record::Entity::find()
                    .filter(access_record::Column::Token.eq(token))
                    .order_by_asc(access_record::Column::AccessedAt)
                    .order_by_asc(access_record::Column::Id)
                    .all(db)
                    .await
            })
            .await?;

        Ok(models
            .into_iter()
            .map(record_model_to_access_record)
            .collect())
    }

    /// 链接总数（健康检查用）
    pub async fn count(&self) -> Result<u64> {
        let db = &self.db;
        self.guarded("count", async { link::Entity::find().count(db).await })
            .await
    }
}
