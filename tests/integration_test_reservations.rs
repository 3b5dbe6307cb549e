mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::{Duration, NaiveTime, Timelike, Utc, Weekday};
use common::{hm, parse_body, upcoming, TestApp};
use serde_json::json;
use tokio::task::JoinSet;
use tower::ServiceExt;

/// A start roughly an hour from now, inside the cancellation window.
fn imminent() -> (chrono::NaiveDate, NaiveTime, NaiveTime) {
    let start = Utc::now().naive_utc() + Duration::hours(1);
    let start_time = NaiveTime::from_hms_opt(start.hour(), start.minute(), 0).unwrap();
    let (end, wrapped) = start_time.overflowing_add_signed(Duration::minutes(30));
    let end_time = if wrapped == 0 { end } else { NaiveTime::from_hms_opt(23, 59, 59).unwrap() };
    (start.date(), start_time, end_time)
}

#[tokio::test]
async fn test_create_reservation() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let court_id = app.create_court(&admin, "Central", 20.0).await;
    let (player, profile) = app.player("Ana").await;
    let monday = upcoming(Weekday::Mon);

    let res = app.book(&player, &court_id, monday, "10:00", 2).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = parse_body(res).await;

    assert_eq!(body["status"], "ACTIVE");
    assert_eq!(body["penalty_applied"], false);
    assert_eq!(body["start_time"], "10:00:00");
    assert_eq!(body["end_time"], "12:00:00");
    assert_eq!(body["date"], monday.to_string());
    assert_eq!(body["user_id"], profile["user_id"]);
}

#[tokio::test]
async fn test_overlapping_booking_is_rejected() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let court_id = app.create_court(&admin, "Central", 20.0).await;
    let (ana, _) = app.player("Ana").await;
    let (ben, _) = app.player("Ben").await;
    let monday = upcoming(Weekday::Mon);

    assert_eq!(app.book(&ana, &court_id, monday, "10:00", 2).await.status(), StatusCode::CREATED);

    assert_eq!(app.book(&ben, &court_id, monday, "11:00", 1).await.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.book(&ben, &court_id, monday, "09:00", 2).await.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.book(&ben, &court_id, monday, "12:00", 2).await.status(), StatusCode::CREATED);
    assert_eq!(app.book(&ben, &court_id, monday, "08:00", 2).await.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_booking_input_rules() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let court_id = app.create_court(&admin, "Central", 20.0).await;
    let (player, _) = app.player("Cai").await;
    let monday = upcoming(Weekday::Mon);

    // off-grid start, after-close start, last slot for two hours, three hours
    assert_eq!(app.book(&player, &court_id, monday, "10:30", 1).await.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.book(&player, &court_id, monday, "21:00", 1).await.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.book(&player, &court_id, monday, "20:00", 2).await.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.book(&player, &court_id, monday, "10:00", 3).await.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.book(&player, &court_id, monday, "ten", 1).await.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.book(&player, "missing", monday, "10:00", 1).await.status(), StatusCode::NOT_FOUND);

    assert_eq!(app.book(&player, &court_id, monday, "20:00", 1).await.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_booking_requires_a_day_of_notice() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let court_id = app.create_court(&admin, "Central", 20.0).await;
    let (player, _) = app.player("Dee").await;

    let today = Utc::now().date_naive();
    let res = app.book(&player, &court_id, today, "20:00", 1).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = parse_body(res).await;
    assert!(body["error"].as_str().unwrap().contains("24 hours"));
}

#[tokio::test]
async fn test_booking_lead_is_configurable() {
    let app = TestApp::with_config(|config| config.booking_lead_hours = 24 * 30).await;
    let admin = app.admin().await;
    let court_id = app.create_court(&admin, "Central", 20.0).await;
    let (player, _) = app.player("Ida").await;

    let res = app.book(&player, &court_id, upcoming(Weekday::Mon), "10:00", 1).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_owner_cancellation_applies_penalty() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let court_id = app.create_court(&admin, "Central", 20.0).await;
    let (player, _) = app.player("Eli").await;
    let monday = upcoming(Weekday::Mon);

    let created = parse_body(app.book(&player, &court_id, monday, "18:00", 1).await).await;
    let id = created["id"].as_str().unwrap();

    let mine = parse_body(app.get("/api/v1/reservations/mine", &player).await).await;
    let listed = &mine.as_array().unwrap()[0];
    assert_eq!(listed["cancellable"], true);
    assert_eq!(listed["court_name"], "Central");
    assert!(listed["cancellable_until"].as_str().unwrap().contains("16:00:00"));

    let res = app.write("POST", &format!("/api/v1/reservations/{}/cancel", id), &player, None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let cancelled = parse_body(res).await;
    assert_eq!(cancelled["status"], "CANCELLED");
    assert_eq!(cancelled["penalty_applied"], true);

    let res = app.write("POST", &format!("/api/v1/reservations/{}/cancel", id), &player, None).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let mine = parse_body(app.get("/api/v1/reservations/mine", &player).await).await;
    assert_eq!(mine[0]["cancellable"], false);

    // the slot is bookable again
    assert_eq!(app.book(&player, &court_id, monday, "18:00", 1).await.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_cancellation_window_closes_two_hours_before_start() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let court_id = app.create_court(&admin, "Central", 20.0).await;
    let (player, profile) = app.player("Fin").await;

    let (date, start, end) = imminent();
    let reservation = app.insert_reservation(profile["user_id"].as_str().unwrap(), &court_id, date, start, end).await;

    let mine = parse_body(app.get("/api/v1/reservations/mine", &player).await).await;
    assert_eq!(mine[0]["cancellable"], false);

    let res = app.write("POST", &format!("/api/v1/reservations/{}/cancel", reservation.id), &player, None).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let stored = app.state.reservation_repo.find_by_id(&reservation.id).await.unwrap().unwrap();
    assert_eq!(stored.status.as_str(), "ACTIVE");

    // administrators are not bound by the window
    let res = app.write("POST", &format!("/api/v1/admin/reservations/{}/cancel", reservation.id), &admin, None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["status"], "CANCELLED_ADMIN");
    assert_eq!(body["penalty_applied"], false);
}

#[tokio::test]
async fn test_only_owner_can_cancel() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let court_id = app.create_court(&admin, "Central", 20.0).await;
    let (owner, _) = app.player("Gia").await;
    let (other, _) = app.player("Hal").await;

    let created = parse_body(app.book(&owner, &court_id, upcoming(Weekday::Tue), "09:00", 1).await).await;
    let res = app.write("POST", &format!("/api/v1/reservations/{}/cancel", created["id"].as_str().unwrap()), &other, None).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.write("POST", "/api/v1/reservations/missing/cancel", &owner, None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_status_transitions_are_final() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let court_id = app.create_court(&admin, "Central", 20.0).await;
    let (player, _) = app.player("Ivy").await;
    let monday = upcoming(Weekday::Mon);

    let a = parse_body(app.book(&player, &court_id, monday, "07:00", 1).await).await;
    let a = a["id"].as_str().unwrap();

    let res = app.write("POST", &format!("/api/v1/admin/reservations/{}/complete", a), &player, None).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.write("POST", &format!("/api/v1/admin/reservations/{}/complete", a), &admin, None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["status"], "COMPLETED");

    for action in ["cancel", "complete"] {
        let res = app.write("POST", &format!("/api/v1/admin/reservations/{}/{}", a, action), &admin, None).await;
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }
    let res = app.write("POST", &format!("/api/v1/reservations/{}/cancel", a), &player, None).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_concurrent_bookings_for_one_slot_admit_one() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let court_id = app.create_court(&admin, "Central", 20.0).await;
    let monday = upcoming(Weekday::Mon);

    let mut tasks = JoinSet::new();
    for i in 0..6 {
        let (player, _) = app.player(&format!("Racer{}", i)).await;
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/reservations")
            .header(header::COOKIE, format!("access_token={}", player.access_token))
            .header("X-CSRF-Token", &player.csrf_token)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({
                "court_id": court_id,
                "date": monday.to_string(),
                "start_time": "15:00",
                "duration_hours": 1
            }).to_string()))
            .unwrap();

        let router = app.router.clone();
        tasks.spawn(async move { router.oneshot(request).await.unwrap().status() });
    }

    let mut statuses = Vec::new();
    while let Some(status) = tasks.join_next().await {
        statuses.push(status.unwrap());
    }

    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::CREATED).count(), 1);
    assert!(statuses.iter().all(|s| matches!(*s, StatusCode::CREATED | StatusCode::BAD_REQUEST | StatusCode::CONFLICT)));

    let active = app.state.reservation_repo.list_active_for_court_on(&court_id, monday).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].start_time, hm(15, 0));
}
