//! Attendee database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{Attendee, AttendeeStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "attendees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    #[sea_orm(unique)]
    pub ticket_number: String,
    /// `REGISTERED`, `ATTENDED`, `CANCELLED` or `REFUNDED`
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Attendee {
    fn from(model: Model) -> Self {
        Attendee {
            id: model.id,
            event_id: model.event_id,
            user_id: model.user_id,
            ticket_number: model.ticket_number,
            // Unknown values never occupy a seat.
            status: model.status.parse().unwrap_or(AttendeeStatus::Cancelled),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
