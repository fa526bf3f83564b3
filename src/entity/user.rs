//! User entity model for Sea-ORM database interaction.
//!
//! Users are created at registration and read at login. They are never
//! mutated or deleted by the API.

use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Sea-ORM entity model representing a registered user.
///
/// # Database Schema
///
/// | Column        | Type                 | Description                          |
/// |---------------|----------------------|--------------------------------------|
/// | id            | INTEGER (Primary Key)| Generated user id                    |
/// | email         | VARCHAR(255) UNIQUE  | Login identity, stored lower-cased   |
/// | name          | VARCHAR(255)         | Display name                         |
/// | password_hash | VARCHAR              | Argon2 PHC string                    |
/// | created_at    | TIMESTAMPTZ          | Registration time                    |
///
/// The model serializes straight into API responses; `password_hash` is
/// never written out.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Normalized email address. Unique across all users.
    #[sea_orm(unique)]
    pub email: String,

    pub name: String,

    #[serde(skip_serializing)]
    pub password_hash: String,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::session_token::Entity")]
    SessionTokens,
}

impl Related<super::session_token::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SessionTokens.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
