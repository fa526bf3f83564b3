//! Session token entity model for Sea-ORM database interaction.
//!
//! Each row is one live bearer token. Only the SHA-256 digest of the token
//! is stored; the plaintext is handed to the client once, at login.

use sea_orm::entity::prelude::*;

/// Sea-ORM entity model representing an issued bearer token.
///
/// # Database Schema
///
/// | Column       | Type                  | Description                          |
/// |--------------|-----------------------|--------------------------------------|
/// | id           | INTEGER (Primary Key) | Generated token id                   |
/// | user_id      | INTEGER               | Owning user, cascades on delete      |
/// | token_hash   | VARCHAR(64) UNIQUE    | Hex SHA-256 of the plaintext token   |
/// | created_at   | TIMESTAMPTZ           | Issuance time                        |
/// | expires_at   | TIMESTAMPTZ           | Token is rejected from this instant  |
/// | last_used_at | TIMESTAMPTZ NULL      | Last successful authentication       |
///
/// Revocation deletes the row, so a token is valid exactly while its row
/// exists and `expires_at` lies in the future.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "session_tokens")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,

    #[sea_orm(unique)]
    pub token_hash: String,

    pub created_at: DateTimeWithTimeZone,

    pub expires_at: DateTimeWithTimeZone,

    pub last_used_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
