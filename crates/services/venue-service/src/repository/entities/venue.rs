//! Venue database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{Venue, VenueStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "venues")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub address: String,
    pub capacity: i32,
    /// `ACTIVE` or `INACTIVE`
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Venue {
    fn from(model: Model) -> Self {
        Venue {
            id: model.id,
            name: model.name,
            address: model.address,
            capacity: model.capacity,
            // Unknown values only appear after manual edits; treat them as inactive.
            status: model.status.parse().unwrap_or(VenueStatus::Inactive),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
