use sea_orm::entity::prelude::*;

/// One issued one-time code. Stores only the argon2 hash of the code.
/// Active iff not consumed, not expired, and under the attempt budget;
/// issuing a new code for an email consumes all of its predecessors.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "otp_codes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub email: String,
    pub code_hash: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub attempts: i32,
    pub consumed: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
