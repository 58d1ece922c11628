use avinya_footer::{
    configuration::{get_config, SubscriptionServiceKind},
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
};
use once_cell::sync::Lazy;
use wiremock::MockServer;

pub const SUCCESS_WINDOW_MILLISECONDS: u64 = 1000;
pub const SUBMISSION_TIMEOUT_MILLISECONDS: u64 = 1000;

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    // Use of a sink allow for logs to be dumped by default when running tests.
    // If you do need them use:
    // # `TEST_LOG=1 cargo test health_check_works | bunyan`
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::stdout,
        );
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::sink,
        );
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub subscription_server: MockServer,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn health(&self) -> reqwest::Response {
        self.api_client
            .get(&format!("{}/health", &self.address))
            .send()
            .await
            .expect("failed to execute request.")
    }

    pub async fn post_subscriptions(&self, body: String) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/subscriptions", &self.address))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .expect("failed to execute request.")
    }

    pub async fn get_footer_html(&self) -> String {
        self.api_client
            .get(&format!("{}/", &self.address))
            .send()
            .await
            .expect("failed to execute request.")
            .text()
            .await
            .unwrap()
    }

    pub async fn get_subscription_status(&self) -> serde_json::Value {
        self.api_client
            .get(&format!("{}/subscriptions/status", &self.address))
            .send()
            .await
            .expect("failed to execute request.")
            .json()
            .await
            .unwrap()
    }
}

pub fn api_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .cookie_store(true)
        .build()
        .unwrap()
}

pub fn assert_is_redirect_to(response: &reqwest::Response, location: &str) {
    assert_eq!(response.status().as_u16(), 303);
    assert_eq!(response.headers().get("Location").unwrap(), location);
}

// spawn_app launches application in the background.
pub async fn spawn_app() -> TestApp {
    // the first time initialise is called the code in tracing is invoked otherwise we skip.
    Lazy::force(&TRACING);

    let subscription_server = MockServer::start().await;

    let config = {
        let mut c = get_config().expect("failed to read configuration");
        c.application.port = 0;
        c.subscription_form.success_display_milliseconds =
            SUCCESS_WINDOW_MILLISECONDS;
        c.subscription_form.submission_timeout_milliseconds =
            SUBMISSION_TIMEOUT_MILLISECONDS;
        c.subscription_service.kind = SubscriptionServiceKind::Http;
        c.subscription_service.base_url = subscription_server.uri();
        c
    };

    let application = Application::build(config)
        .await
        .expect("failed to build application");
    let port = application.port();

    let _ = tokio::spawn(application.run_until_stopped());

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        subscription_server,
        api_client: api_client(),
    }
}
