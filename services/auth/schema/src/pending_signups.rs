use sea_orm::entity::prelude::*;

/// Unconfirmed registration awaiting OTP verification. Keyed by email:
/// a repeated signup request for the same address overwrites the row
/// rather than stacking duplicates. Deleted by successful promotion.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "pending_signups")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub email: String,
    pub name: String,
    /// Argon2 hash; the cleartext password never reaches storage.
    pub password_hash: String,
    pub role: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
