use crate::storage::{AccessRecord, Mapping, NewMapping};
use migration::entities::{access_record, link};

/// 将 Sea-ORM Model 转换为 Mapping
pub fn model_to_mapping(model: link::Model) -> Mapping {
    Mapping {
        token: model.token,
        destination: model.destination,
        created_at: model.created_at,
        expires_at: model.expires_at,
        password_hash: model.password_hash,
        access_count: model.access_count.max(0) as u64,
    }
}

/// 插入用 ActiveModel；计数从 0 开始
pub fn new_mapping_to_active_model(link: &NewMapping) -> link::ActiveModel {
    use sea_orm::ActiveValue::Set;

    link::ActiveModel {
        token: Set(link.token.clone()),
        destination: Set(link.destination.clone()),
        created_at: Set(link.created_at),
        expires_at: Set(link.expires_at),
        access_count: Set(0),
        password_hash: Set(link.password_hash.clone()),
    }
}

pub fn record_model_to_access_record(model: access_record::Model) -> AccessRecord {
    AccessRecord {
        id: model.id,
        token: model.token,
        accessed_at: model.accessed_at,
        caller_address: model.caller_address,
    }
}
