//! Event database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::Event;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub date: DateTimeUtc,
    pub venue_id: Uuid,
    pub organizer_id: Uuid,
    pub capacity: i32,
    pub price: f64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Event {
    fn from(model: Model) -> Self {
        Event {
            id: model.id,
            title: model.title,
            description: model.description,
            date: model.date,
            venue_id: model.venue_id,
            organizer_id: model.organizer_id,
            capacity: model.capacity,
            price: model.price,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
