use std::net::TcpListener;
use std::sync::Arc;

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::Key;
use actix_web::{dev::Server, web, App, HttpServer};
use anyhow::Context;
use secrecy::{ExposeSecret, Secret};
use tracing_actix_web::TracingLogger;

use crate::configuration::Settings;
use crate::form::FormRegistry;
use crate::routes::{footer, health, subscribe, subscription_status};
use crate::subscription_service::build_subscription_service;

pub struct Application {
    port: u16,
    server: Server,
    registry: web::Data<FormRegistry>,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, anyhow::Error> {
        let service = build_subscription_service(&config.subscription_service)
            .context("failed to build the subscription service client")?;
        let registry = web::Data::new(FormRegistry::new(
            Arc::from(service),
            config.subscription_form.form_settings(),
            config.subscription_form.idle_form_ttl(),
        ));

        let address = format!(
            "{}:{}",
            config.application.host, config.application.port
        );
        let listener = TcpListener::bind(&address)
            .with_context(|| format!("failed to bind to {}", address))?;
        let port = listener.local_addr()?.port();

        let server = run(
            listener,
            registry.clone(),
            config.application.hmac_secret,
            config.application.secure_cookies,
        )?;

        Ok(Self {
            port,
            server,
            registry,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until the server stops, then tear down every open form.
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        let outcome = self.server.await;
        self.registry.shutdown().await;
        outcome
    }
}

pub fn run(
    listener: TcpListener,
    registry: web::Data<FormRegistry>,
    hmac_secret: Secret<String>,
    secure_cookies: bool,
) -> Result<Server, anyhow::Error> {
    let secret_key = Key::try_from(hmac_secret.expose_secret().as_bytes())
        .context("the hmac secret must be at least 64 bytes long")?;

    let server = HttpServer::new(move || {
        App::new()
            .wrap(
                SessionMiddleware::builder(
                    CookieSessionStore::default(),
                    secret_key.clone(),
                )
                .cookie_secure(secure_cookies)
                .build(),
            )
            .wrap(TracingLogger::default())
            .route("/", web::get().to(footer))
            .route("/health", web::get().to(health))
            .route("/subscriptions", web::post().to(subscribe))
            .route("/subscriptions/status", web::get().to(subscription_status))
            .app_data(registry.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
