//! Integration tests for the meetup services over in-memory repositories

use meetup_service::contract::*;
use meetup_service::domain::events::ChangeEvent;
use std::sync::Arc;

mod common;
use common::mocks::{FailingPublisher, RecordingPublisher};
use common::{create_test_context, create_test_context_with, days_from_today, event_dto, named_dto, print_test_header};

fn speaker_dto(name: &str) -> SpeakerDto {
    named_dto::<Speaker>(name)
}

fn sponsor_dto(name: &str) -> SponsorDto {
    named_dto::<Sponsor>(name)
}

#[tokio::test]
async fn test_create_then_get_round_trip_for_valid_names() {
    print_test_header(
        "test_create_then_get_round_trip_for_valid_names",
        &["Names of length 1..=50 are accepted and read back unchanged"],
    );

    let ctx = create_test_context();

    for name in ["A", "Grace Hopper", "x".repeat(50).as_str()] {
        let created = ctx.speakers.create(speaker_dto(name)).await.unwrap();
        assert!(created.id > 0);

        let fetched = ctx.speakers.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched.name.as_deref(), Some(name));

        let sponsor = ctx.sponsors.create(sponsor_dto(name)).await.unwrap();
        let fetched = ctx.sponsors.get_by_id(sponsor.id).await.unwrap();
        assert_eq!(fetched.name.as_deref(), Some(name));
    }
}

#[tokio::test]
async fn test_invalid_names_never_reach_repository() {
    print_test_header(
        "test_invalid_names_never_reach_repository",
        &["Empty or too long names fail with InvalidValue before any insert"],
    );

    let ctx = create_test_context();

    for name in ["", "   ", "x".repeat(51).as_str()] {
        let err = ctx.speakers.create(speaker_dto(name)).await.unwrap_err();
        assert!(matches!(err, MeetupError::InvalidValue { .. }), "{name:?}: {err:?}");

        let err = ctx.sponsors.create(sponsor_dto(name)).await.unwrap_err();
        assert!(matches!(err, MeetupError::InvalidValue { .. }));
    }

    let err = ctx.speakers.create(SpeakerDto::default()).await.unwrap_err();
    assert!(matches!(err, MeetupError::InvalidValue { .. }));

    assert_eq!(ctx.speaker_repo.create_calls(), 0);
    assert_eq!(ctx.sponsor_repo.create_calls(), 0);

    let mut long_event = event_dto(&"x".repeat(201), vec![], vec![]);
    let err = ctx.events.create(long_event.clone()).await.unwrap_err();
    assert!(matches!(err, MeetupError::InvalidValue { .. }));

    long_event.name = Some("x".repeat(200));
    assert!(ctx.events.create(long_event).await.is_ok());
}

#[tokio::test]
async fn test_get_all_sorted_by_name_with_stable_ties() {
    let ctx = create_test_context();
    let first_bob = ctx.speaker_repo.insert("Bob");
    ctx.speaker_repo.insert("Alice");
    let second_bob = ctx.speaker_repo.insert("Bob");
    ctx.speaker_repo.insert("Carol");
    ctx.speaker_repo.print_state("after inserts");

    let all = ctx.speakers.get_all().await.unwrap();

    let names: Vec<_> = all.iter().map(|s| s.name.clone().unwrap()).collect();
    assert_eq!(names, vec!["Alice", "Bob", "Bob", "Carol"]);
    assert_eq!(all[1].id, first_bob.id);
    assert_eq!(all[2].id, second_bob.id);
}

#[tokio::test]
async fn test_get_all_unavailable_store_is_not_found() {
    let ctx = create_test_context();
    ctx.sponsor_repo.set_unavailable(true);

    let err = ctx.sponsors.get_all().await.unwrap_err();

    assert_eq!(err, MeetupError::none_found(EntityKind::Sponsor));
}

#[tokio::test]
async fn test_empty_store_lists_nothing() {
    let ctx = create_test_context();

    assert!(ctx.speakers.get_all().await.unwrap().is_empty());
    assert!(ctx.events.get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_event_date_boundaries() {
    print_test_header(
        "test_event_date_boundaries",
        &["Yesterday is rejected, today and tomorrow are accepted"],
    );

    let ctx = create_test_context();

    let mut dto = event_dto("Past", vec![], vec![]);
    dto.date = Some(days_from_today(-1));
    let err = ctx.events.create(dto).await.unwrap_err();
    match err {
        MeetupError::InvalidValue { detail } => assert!(detail.contains("Date must be in the future")),
        other => panic!("unexpected error: {other:?}"),
    }

    let mut dto = event_dto("Today", vec![], vec![]);
    dto.date = Some(days_from_today(0));
    assert!(ctx.events.create(dto).await.is_ok());

    let mut dto = event_dto("Tomorrow", vec![], vec![]);
    dto.date = Some(days_from_today(1));
    assert!(ctx.events.create(dto).await.is_ok());

    assert_eq!(ctx.event_repo.len(), 2);
}

#[tokio::test]
async fn test_update_missing_id_is_not_found_for_every_kind() {
    let ctx = create_test_context();

    let err = ctx.speakers.update(9999, speaker_dto("Ghost")).await.unwrap_err();
    assert_eq!(err, MeetupError::not_found(EntityKind::Speaker, 9999));

    let err = ctx.sponsors.update(9999, sponsor_dto("Ghost")).await.unwrap_err();
    assert_eq!(err, MeetupError::not_found(EntityKind::Sponsor, 9999));

    let err = ctx
        .events
        .update(9999, event_dto("Ghost", vec![], vec![]))
        .await
        .unwrap_err();
    assert_eq!(err, MeetupError::not_found(EntityKind::Event, 9999));
    assert_eq!(err.to_string(), "Event with Id: 9999 was not found");
}

#[tokio::test]
async fn test_update_validates_before_lookup() {
    let ctx = create_test_context();

    let err = ctx.speakers.update(9999, speaker_dto("")).await.unwrap_err();

    assert!(matches!(err, MeetupError::InvalidValue { .. }));
}

#[tokio::test]
async fn test_event_create_drops_unknown_association_ids() {
    print_test_header(
        "test_event_create_drops_unknown_association_ids",
        &["Only ids that resolve to stored sponsors/speakers are attached"],
    );

    let ctx = create_test_context();
    let acme = ctx.sponsor_repo.insert("Acme");
    let ada = ctx.speaker_repo.insert("Ada");

    let created = ctx
        .events
        .create(event_dto("RustConf", vec![acme.id, 404, acme.id], vec![ada.id, 405]))
        .await
        .unwrap();

    assert_eq!(created.sponsors_ids, vec![acme.id]);
    assert_eq!(created.speakers_ids, vec![ada.id]);

    let fetched = ctx.events.get_by_id(created.id).await.unwrap();
    assert_eq!(fetched.sponsors_ids, vec![acme.id]);
}

#[tokio::test]
async fn test_event_update_rebuilds_associations() {
    let ctx = create_test_context();
    let acme = ctx.sponsor_repo.insert("Acme");
    let globex = ctx.sponsor_repo.insert("Globex");
    let ada = ctx.speaker_repo.insert("Ada");

    let created = ctx
        .events
        .create(event_dto("RustConf", vec![acme.id], vec![ada.id]))
        .await
        .unwrap();

    let mut change = event_dto("RustConf 2", vec![globex.id, 77], vec![]);
    change.location = Some("Lisbon".to_string());
    let updated = ctx.events.update(created.id, change).await.unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name.as_deref(), Some("RustConf 2"));
    assert_eq!(updated.location.as_deref(), Some("Lisbon"));
    assert_eq!(updated.sponsors_ids, vec![globex.id]);
    assert!(updated.speakers_ids.is_empty());
}

#[tokio::test]
async fn test_events_listed_by_date() {
    let ctx = create_test_context();

    let mut later = event_dto("Later", vec![], vec![]);
    later.date = Some(days_from_today(20));
    let mut sooner = event_dto("Sooner", vec![], vec![]);
    sooner.date = Some(days_from_today(2));
    ctx.events.create(later).await.unwrap();
    ctx.events.create(sooner).await.unwrap();

    let names: Vec<_> = ctx
        .events
        .get_all()
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.name.unwrap())
        .collect();
    assert_eq!(names, vec!["Sooner", "Later"]);
}

#[tokio::test]
async fn test_delete_returns_removed_entity() {
    let ctx = create_test_context();
    let speaker = ctx.speakers.create(speaker_dto("Linus")).await.unwrap();

    let removed = ctx.speakers.delete(speaker.id).await.unwrap();
    assert_eq!(removed, speaker);

    let err = ctx.speakers.get_by_id(speaker.id).await.unwrap_err();
    assert_eq!(err, MeetupError::not_found(EntityKind::Speaker, speaker.id));

    let err = ctx.speakers.delete(speaker.id).await.unwrap_err();
    assert!(matches!(err, MeetupError::NotFound { .. }));

    let event = ctx.events.create(event_dto("Gone", vec![], vec![])).await.unwrap();
    assert_eq!(ctx.events.delete(event.id).await.unwrap().id, event.id);
    assert_eq!(ctx.event_repo.len(), 0);
}

#[tokio::test]
async fn test_change_notices_published() {
    let publisher = Arc::new(RecordingPublisher::default());
    let ctx = create_test_context_with(publisher.clone());

    let sponsor = ctx.sponsors.create(sponsor_dto("Acme")).await.unwrap();
    ctx.sponsors.update(sponsor.id, sponsor_dto("Acme Corp")).await.unwrap();
    ctx.sponsors.delete(sponsor.id).await.unwrap();

    let events = publisher.events();
    assert_eq!(events.len(), 3);
    assert!(matches!(events[0], ChangeEvent::Created(_)));
    assert!(matches!(events[1], ChangeEvent::Updated(_)));
    assert!(matches!(events[2], ChangeEvent::Deleted(_)));
    assert_eq!(events[1].record().name, "Acme Corp");
    assert_eq!(events[2].record().entity, "sponsor");
}

#[tokio::test]
async fn test_publisher_failure_does_not_fail_mutation() {
    let ctx = create_test_context_with(Arc::new(FailingPublisher));

    let created = ctx.speakers.create(speaker_dto("Barbara")).await.unwrap();

    assert_eq!(ctx.speaker_repo.len(), 1);
    assert_eq!(created.name.as_deref(), Some("Barbara"));
}
