pub mod access_record;
pub mod link;

pub use access_record::Entity as AccessRecordEntity;
pub use link::Entity as LinkEntity;
