//! Write operations for SeaOrmStorage
//!
//! Uniqueness and counter updates are enforced by the database itself:
//! inserts rely on the primary key, increments are a single `UPDATE ... SET
//! access_count = access_count + 1`.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, ExprTrait, QueryFilter,
    TransactionTrait, sea_query::Expr,
};
use tracing::{debug, info};

use super::SeaOrmStorage;
use super::converters::{new_mapping_to_active_model, record_model_to_access_record};
use crate::errors::{Result, TinyhopError};
use crate::storage::{AccessRecord, Mapping, NewMapping};

use migration::entities::{access_record, link};

impl SeaOrmStorage {
    /// 原子插入；token 已存在时返回 `Conflict`
    pub async fn insert(&self, new: NewMapping) -> Result<Mapping> {
        let db = &self.db;
        let active_model = new_mapping_to_active_model(&new);

        self.guarded(&format!("insert({})", new.token), async {
            link::Entity::insert(active_model).exec(db).await
        })
        .await?;

        info!("Link created: {}", new.token);
        Ok(Mapping {
            token: new.token,
            destination: new.destination,
            created_at: new.created_at,
            expires_at: new.expires_at,
            access_count: 0,
            password_hash: new.password_hash,
        })
    }

    /// 原子自增访问计数
    pub async fn increment_access_count(&self, token: &str) -> Result<()> {
        let db = &self.db;

        let result = self
            .guarded(&format!("increment_access_count({})", token), async {
                link::Entity::update_many()
                    .col_expr(
                        link::Column::AccessCount,
                        Expr::col(link::Column::AccessCount).add(Expr::val(1i64)),
                    )
                    .filter(link::Column::Token.eq(token))
                    .exec(db)
                    .await
            })
            .await?;

        if result.rows_affected == 0 {
            return Err(TinyhopError::not_found(format!("Link not found: {}", token)));
        }
        Ok(())
    }

    /// 追加一条访问记录（不修改计数）
    pub async fn append(
        &self,
        token: &str,
        accessed_at: DateTime<Utc>,
        caller_address: &str,
    ) -> Result<AccessRecord> {
        let db = &self.db;
        let model = access_record::ActiveModel {
            token: Set(token.to_string()),
            accessed_at: Set(accessed_at),
            caller_address: Set(caller_address.to_string()),
            ..Default::default()
        };

        let inserted = self
            .guarded(&format!("append({})", token), async { model.insert(db).await })
            .await?;

        Ok(record_model_to_access_record(inserted))
    }

    /// 在同一事务内自增计数并写入访问记录
    ///
    /// 两者要么同时提交，要么都不生效。事务以写语句开头，
    /// SQLite 下直接拿写锁，避免读锁升级时的 BUSY。
    pub async fn record_access(
        &self,
        token: &str,
        accessed_at: DateTime<Utc>,
        caller_address: &str,
    ) -> Result<AccessRecord> {
        let db = &self.db;

        let inserted = self
            .guarded(&format!("record_access({})", token), async {
                let txn = db.begin().await?;

                let updated = link::Entity::update_many()
                    .col_expr(
                        link::Column::AccessCount,
                        Expr::col(link::Column::AccessCount).add(Expr::val(1i64)),
                    )
                    .filter(link::Column::Token.eq(token))
                    .exec(&txn)
                    .await?;

                if updated.rows_affected == 0 {
                    txn.rollback().await?;
                    return Ok(None);
                }

                let record = access_record::ActiveModel {
                    token: Set(token.to_string()),
                    accessed_at: Set(accessed_at),
                    caller_address: Set(caller_address.to_string()),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;

                txn.commit().await?;
                Ok::<_, sea_orm::DbErr>(Some(record))
            })
            .await?;

        match inserted {
            Some(model) => {
                debug!("Access recorded for {} from {}", token, caller_address);
                Ok(record_model_to_access_record(model))
            }
            None => Err(TinyhopError::not_found(format!("Link not found: {}", token))),
        }
    }
}
