//! Attendee service - registrations, cancellation and check-in.
//!
//! Registration asks event-service twice: once to confirm the event exists
//! and once for its availability. Capacity is not locked between that answer
//! and the insert, so concurrent registrations can overshoot by a few seats.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{generate_ticket_number, Attendee, AttendeeStatus, Event, RegistrationCount};

use crate::client::EventServiceClient;
use crate::repository::{AttendeeRepository, ALREADY_REGISTERED};

/// Answer of `GET /event/:eventId/status`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationStatus {
    pub is_registered: bool,
    pub registration: Option<Attendee>,
}

/// Attendee service trait for dependency injection.
#[async_trait]
pub trait AttendeeService: Send + Sync {
    async fn register(&self, event_id: Uuid, user_id: Uuid) -> AppResult<Attendee>;

    async fn user_registrations(&self, user_id: Uuid) -> AppResult<Vec<Attendee>>;

    async fn registration_status(&self, event_id: Uuid, user_id: Uuid) -> AppResult<RegistrationStatus>;

    async fn cancel(&self, event_id: Uuid, user_id: Uuid) -> AppResult<()>;

    /// Registrations of an event; only its organizer may list them.
    async fn event_attendees(&self, event_id: Uuid, organizer_id: Uuid) -> AppResult<Vec<Attendee>>;

    async fn check_in(&self, event_id: Uuid, organizer_id: Uuid, user_id: Uuid) -> AppResult<Attendee>;

    async fn find_by_ticket(&self, ticket_number: &str) -> AppResult<Attendee>;

    async fn registration_count(&self, event_id: Uuid) -> AppResult<RegistrationCount>;
}

/// Concrete [`AttendeeService`].
pub struct AttendeeManager {
    repo: Arc<dyn AttendeeRepository>,
    events: Arc<dyn EventServiceClient>,
}

impl AttendeeManager {
    pub fn new(repo: Arc<dyn AttendeeRepository>, events: Arc<dyn EventServiceClient>) -> Self {
        Self { repo, events }
    }

    async fn find_event(&self, event_id: Uuid) -> AppResult<Event> {
        self.events
            .get_event(event_id)
            .await?
            .ok_or_else(|| AppError::not_found("Event not found"))
    }

    async fn ensure_organizer(&self, event_id: Uuid, organizer_id: Uuid) -> AppResult<()> {
        let event = self.find_event(event_id).await?;
        if !event.is_owned_by(organizer_id) {
            return Err(AppError::forbidden("You are not the organizer of this event"));
        }
        Ok(())
    }
}

#[async_trait]
impl AttendeeService for AttendeeManager {
    async fn register(&self, event_id: Uuid, user_id: Uuid) -> AppResult<Attendee> {
        self.find_event(event_id).await?;

        let availability = self.events.registration_availability(event_id).await?;
        if !availability.available {
            tracing::debug!(%event_id, reason = %availability.reason, "Registration refused");
            return Err(AppError::validation("Event registration is full or closed"));
        }

        if self.repo.find_by_event_and_user(event_id, user_id).await?.is_some() {
            return Err(AppError::validation(ALREADY_REGISTERED));
        }

        let attendee = self
            .repo
            .create(event_id, user_id, generate_ticket_number(Utc::now()))
            .await?;
        tracing::info!(%event_id, %user_id, ticket = %attendee.ticket_number, "Attendee registered");
        Ok(attendee)
    }

    async fn user_registrations(&self, user_id: Uuid) -> AppResult<Vec<Attendee>> {
        self.repo.list_by_user(user_id).await
    }

    async fn registration_status(&self, event_id: Uuid, user_id: Uuid) -> AppResult<RegistrationStatus> {
        let registration = self.repo.find_by_event_and_user(event_id, user_id).await?;
        Ok(RegistrationStatus {
            is_registered: registration.is_some(),
            registration,
        })
    }

    async fn cancel(&self, event_id: Uuid, user_id: Uuid) -> AppResult<()> {
        let registration = self
            .repo
            .find_by_event_and_user(event_id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Registration not found"))?;

        if registration.status == AttendeeStatus::Cancelled {
            return Err(AppError::validation("Registration is already cancelled"));
        }

        self.repo
            .set_status(registration.id, AttendeeStatus::Cancelled)
            .await?;
        tracing::info!(%event_id, %user_id, "Registration cancelled");
        Ok(())
    }

    async fn event_attendees(&self, event_id: Uuid, organizer_id: Uuid) -> AppResult<Vec<Attendee>> {
        self.ensure_organizer(event_id, organizer_id).await?;
        self.repo.list_by_event(event_id).await
    }

    async fn check_in(&self, event_id: Uuid, organizer_id: Uuid, user_id: Uuid) -> AppResult<Attendee> {
        self.ensure_organizer(event_id, organizer_id).await?;

        let registration = self
            .repo
            .find_by_event_and_user(event_id, user_id)
            .await?
            .filter(|r| r.status == AttendeeStatus::Registered)
            .ok_or_else(|| AppError::not_found("Active registration not found"))?;

        let attendee = self
            .repo
            .set_status(registration.id, AttendeeStatus::Attended)
            .await?;
        tracing::info!(%event_id, %user_id, "Attendee checked in");
        Ok(attendee)
    }

    async fn find_by_ticket(&self, ticket_number: &str) -> AppResult<Attendee> {
        self.repo
            .find_by_ticket(ticket_number)
            .await?
            .ok_or_else(|| AppError::not_found("Ticket not found"))
    }

    async fn registration_count(&self, event_id: Uuid) -> AppResult<RegistrationCount> {
        let count = self.repo.count_active(event_id).await?;
        Ok(RegistrationCount { event_id, count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use domain::RegistrationAvailability;
    use mockall::predicate::eq;

    use crate::client::MockEventServiceClient;
    use crate::repository::MockAttendeeRepository;

    fn event(id: Uuid, organizer_id: Uuid) -> Event {
        let now = Utc::now();
        Event {
            id,
            title: "RustConf".into(),
            description: "Talks".into(),
            date: now + Duration::days(5),
            venue_id: Uuid::new_v4(),
            organizer_id,
            capacity: 2,
            price: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    fn attendee(event_id: Uuid, user_id: Uuid, status: AttendeeStatus) -> Attendee {
        let now = Utc::now();
        Attendee {
            id: Uuid::new_v4(),
            event_id,
            user_id,
            ticket_number: "TKT-1-ABCDEF".into(),
            status,
            created_at: now,
            updated_at: now,
        }
    }

    fn availability(available: bool) -> RegistrationAvailability {
        RegistrationAvailability {
            available,
            reason: if available { "Registration open" } else { "Event is full" }.into(),
            current_registrations: if available { 1 } else { 2 },
            max_capacity: 2,
            remaining_spots: if available { 1 } else { 0 },
        }
    }

    fn events_for(organizer_id: Uuid, open: bool) -> MockEventServiceClient {
        let mut events = MockEventServiceClient::new();
        events
            .expect_get_event()
            .returning(move |id| Ok(Some(event(id, organizer_id))));
        events
            .expect_registration_availability()
            .returning(move |_| Ok(availability(open)));
        events
    }

    fn manager(repo: MockAttendeeRepository, events: MockEventServiceClient) -> AttendeeManager {
        AttendeeManager::new(Arc::new(repo), Arc::new(events))
    }

    #[tokio::test]
    async fn register_inserts_with_ticket() {
        let (event_id, user_id) = (Uuid::new_v4(), Uuid::new_v4());
        let mut repo = MockAttendeeRepository::new();
        repo.expect_find_by_event_and_user().returning(|_, _| Ok(None));
        repo.expect_create()
            .withf(move |e, u, ticket| *e == event_id && *u == user_id && ticket.starts_with("TKT-"))
            .times(1)
            .returning(|e, u, ticket| {
                let mut a = attendee(e, u, AttendeeStatus::Registered);
                a.ticket_number = ticket;
                Ok(a)
            });

        let registered = manager(repo, events_for(Uuid::new_v4(), true))
            .register(event_id, user_id)
            .await
            .unwrap();

        assert_eq!(registered.status, AttendeeStatus::Registered);
        assert!(registered.ticket_number.starts_with("TKT-"));
    }

    #[tokio::test]
    async fn register_for_missing_event_is_not_found() {
        let mut events = MockEventServiceClient::new();
        events.expect_get_event().returning(|_| Ok(None));
        events.expect_registration_availability().times(0);

        let err = manager(MockAttendeeRepository::new(), events)
            .register(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFoundMsg(ref m) if m == "Event not found"));
    }

    #[tokio::test]
    async fn register_when_full_is_rejected() {
        let mut repo = MockAttendeeRepository::new();
        repo.expect_create().times(0);

        let err = manager(repo, events_for(Uuid::new_v4(), false))
            .register(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(ref m) if m == "Event registration is full or closed"));
    }

    #[tokio::test]
    async fn register_twice_is_rejected() {
        let mut repo = MockAttendeeRepository::new();
        repo.expect_find_by_event_and_user()
            .returning(|e, u| Ok(Some(attendee(e, u, AttendeeStatus::Cancelled))));
        repo.expect_create().times(0);

        let err = manager(repo, events_for(Uuid::new_v4(), true))
            .register(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(ref m) if m == ALREADY_REGISTERED));
    }

    #[tokio::test]
    async fn register_when_event_service_is_down() {
        let mut events = MockEventServiceClient::new();
        events
            .expect_get_event()
            .returning(|_| Err(AppError::service_unavailable("event-service")));

        let err = manager(MockAttendeeRepository::new(), events)
            .register(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();

        assert_eq!(err.status(), axum::http::StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn cancel_marks_registration_cancelled() {
        let existing = attendee(Uuid::new_v4(), Uuid::new_v4(), AttendeeStatus::Registered);
        let registration_id = existing.id;
        let mut repo = MockAttendeeRepository::new();
        repo.expect_find_by_event_and_user()
            .returning(move |_, _| Ok(Some(existing.clone())));
        repo.expect_set_status()
            .with(eq(registration_id), eq(AttendeeStatus::Cancelled))
            .times(1)
            .returning(|id, status| {
                let mut a = attendee(Uuid::new_v4(), Uuid::new_v4(), status);
                a.id = id;
                Ok(a)
            });

        manager(repo, MockEventServiceClient::new())
            .cancel(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn cancel_twice_or_missing_is_rejected() {
        let mut repo = MockAttendeeRepository::new();
        repo.expect_find_by_event_and_user()
            .returning(|e, u| Ok(Some(attendee(e, u, AttendeeStatus::Cancelled))));
        let twice = manager(repo, MockEventServiceClient::new())
            .cancel(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();

        let mut repo = MockAttendeeRepository::new();
        repo.expect_find_by_event_and_user().returning(|_, _| Ok(None));
        let missing = manager(repo, MockEventServiceClient::new())
            .cancel(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(twice, AppError::Validation(_)));
        assert!(matches!(missing, AppError::NotFoundMsg(ref m) if m == "Registration not found"));
    }

    #[tokio::test]
    async fn event_attendees_require_ownership() {
        let mut repo = MockAttendeeRepository::new();
        repo.expect_list_by_event().times(0);

        let err = manager(repo, events_for(Uuid::new_v4(), true))
            .event_attendees(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ForbiddenMsg(_)));
    }

    #[tokio::test]
    async fn check_in_moves_registered_to_attended() {
        let organizer = Uuid::new_v4();
        let mut repo = MockAttendeeRepository::new();
        repo.expect_find_by_event_and_user()
            .returning(|e, u| Ok(Some(attendee(e, u, AttendeeStatus::Registered))));
        repo.expect_set_status()
            .withf(|_, status| *status == AttendeeStatus::Attended)
            .returning(|_, status| Ok(attendee(Uuid::new_v4(), Uuid::new_v4(), status)));

        let checked_in = manager(repo, events_for(organizer, true))
            .check_in(Uuid::new_v4(), organizer, Uuid::new_v4())
            .await
            .unwrap();

        assert_eq!(checked_in.status, AttendeeStatus::Attended);
    }

    #[tokio::test]
    async fn check_in_requires_active_registration() {
        let organizer = Uuid::new_v4();
        let mut repo = MockAttendeeRepository::new();
        repo.expect_find_by_event_and_user()
            .returning(|e, u| Ok(Some(attendee(e, u, AttendeeStatus::Attended))));
        repo.expect_set_status().times(0);

        let err = manager(repo, events_for(organizer, true))
            .check_in(Uuid::new_v4(), organizer, Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFoundMsg(ref m) if m == "Active registration not found"));
    }

    #[tokio::test]
    async fn count_reports_active_rows() {
        let event_id = Uuid::new_v4();
        let mut repo = MockAttendeeRepository::new();
        repo.expect_count_active().with(eq(event_id)).returning(|_| Ok(7));

        let count = manager(repo, MockEventServiceClient::new())
            .registration_count(event_id)
            .await
            .unwrap();

        assert_eq!(count, RegistrationCount { event_id, count: 7 });
    }

    #[tokio::test]
    async fn unknown_ticket_is_not_found() {
        let mut repo = MockAttendeeRepository::new();
        repo.expect_find_by_ticket().returning(|_| Ok(None));

        let err = manager(repo, MockEventServiceClient::new())
            .find_by_ticket("TKT-0-NOPE00")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFoundMsg(ref m) if m == "Ticket not found"));
    }
}
