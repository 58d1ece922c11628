use std::time::Duration;

use avinya_footer::routes::SUBSCRIBED_MESSAGE;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{
    api_client, assert_is_redirect_to, spawn_app, SUBMISSION_TIMEOUT_MILLISECONDS,
    SUCCESS_WINDOW_MILLISECONDS,
};

#[tokio::test]
async fn subscribe_with_a_valid_email_reaches_the_service_and_shows_success() {
    let app = spawn_app().await;

    Mock::given(path("/subscriptions"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.subscription_server)
        .await;

    let resp = app
        .post_subscriptions("email=ursula_le_guin%40gmail.com".into())
        .await;
    assert_is_redirect_to(&resp, "/");

    let html_page = app.get_footer_html().await;
    assert!(html_page.contains(SUBSCRIBED_MESSAGE));
    assert!(html_page.contains(r#"value="""#));
}

#[tokio::test]
async fn the_service_receives_the_submitted_email() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .mount(&app.subscription_server)
        .await;

    app.post_subscriptions("email=ursula_le_guin%40gmail.com".into())
        .await;

    let received = app.subscription_server.received_requests().await.unwrap();
    let body: serde_json::Value =
        serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(body["email"], "ursula_le_guin@gmail.com");
}

#[tokio::test]
async fn success_resets_to_idle_after_the_display_window() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .mount(&app.subscription_server)
        .await;

    app.post_subscriptions("email=ursula_le_guin%40gmail.com".into())
        .await;
    let status = app.get_subscription_status().await;
    assert_eq!(status["status"], "succeeded");
    assert_eq!(status["raw_input"], "");

    tokio::time::sleep(Duration::from_millis(SUCCESS_WINDOW_MILLISECONDS + 500))
        .await;

    let status = app.get_subscription_status().await;
    assert_eq!(status["status"], "idle");
    assert!(status["error_reason"].is_null());
}

#[tokio::test]
async fn invalid_emails_never_reach_the_service() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.subscription_server)
        .await;

    let test_cases = vec![
        ("email=", "empty input", "Please enter your email address."),
        (
            "email=not-an-email",
            "invalid shape",
            "Please enter a valid email address.",
        ),
        (
            "email=user%40example",
            "invalid shape",
            "Please enter a valid email address.",
        ),
    ];

    for (body, reason, message) in test_cases {
        let resp = app.post_subscriptions(body.into()).await;
        assert_is_redirect_to(&resp, "/");

        let status = app.get_subscription_status().await;
        assert_eq!(status["status"], "failed", "payload {}", body);
        assert_eq!(status["error_reason"], reason, "payload {}", body);

        let html_page = app.get_footer_html().await;
        assert!(
            html_page.contains(message),
            "missing feedback for payload {}",
            body
        );
    }
}

#[tokio::test]
async fn subscribe_returns_a_400_when_the_email_field_is_missing() {
    let app = spawn_app().await;

    let test_cases = vec![("", "missing the email"), ("name=le%20guin", "only a name")];

    for (invalid_body, err_message) in test_cases {
        let resp = app.post_subscriptions(invalid_body.into()).await;

        assert_eq!(
            400,
            resp.status().as_u16(),
            "The API did not fail with 400 Bad request when for a payload of {}",
            err_message
        )
    }
}

#[tokio::test]
async fn a_service_error_keeps_the_input_and_shows_a_failure() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.subscription_server)
        .await;

    let resp = app
        .post_subscriptions("email=user%40example.com".into())
        .await;
    assert_is_redirect_to(&resp, "/");

    let status = app.get_subscription_status().await;
    assert_eq!(status["status"], "failed");
    assert_eq!(status["error_reason"], "submission failed");
    assert_eq!(status["raw_input"], "user@example.com");

    let html_page = app.get_footer_html().await;
    assert!(html_page.contains("Please try again."));
    assert!(html_page.contains(r#"value="user@example.com""#));
}

#[tokio::test]
async fn a_slow_service_is_reported_as_a_failure() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(
            SUBMISSION_TIMEOUT_MILLISECONDS * 3,
        )))
        .mount(&app.subscription_server)
        .await;

    app.post_subscriptions("email=user%40example.com".into())
        .await;

    let status = app.get_subscription_status().await;
    assert_eq!(status["status"], "failed");
    assert_eq!(status["error_reason"], "submission failed");
}

#[tokio::test]
async fn a_failed_submission_can_be_retried() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&app.subscription_server)
        .await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .mount(&app.subscription_server)
        .await;

    app.post_subscriptions("email=user%40example.com".into())
        .await;
    assert_eq!(app.get_subscription_status().await["status"], "failed");

    app.post_subscriptions("email=user%40example.com".into())
        .await;
    let status = app.get_subscription_status().await;
    assert_eq!(status["status"], "succeeded");
    assert!(status["error_reason"].is_null());
}

#[tokio::test]
async fn each_visitor_has_their_own_form() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .mount(&app.subscription_server)
        .await;

    app.post_subscriptions("email=user%40example.com".into())
        .await;
    assert_eq!(app.get_subscription_status().await["status"], "succeeded");

    let other_visitor: serde_json::Value = api_client()
        .get(&format!("{}/subscriptions/status", &app.address))
        .send()
        .await
        .expect("failed to execute request.")
        .json()
        .await
        .unwrap();
    assert_eq!(other_visitor["status"], "idle");
}
