use actix_web::{web, HttpResponse};

use crate::form::FormRegistry;
use crate::routes::{current_snapshot, e500, seeother};
use crate::session::TypedSession;

#[derive(serde::Deserialize)]
pub struct FormData {
    email: String,
}

#[tracing::instrument(
    name = "newsletter form submitted",
    skip(form, session, registry),
    fields(form_id = tracing::field::Empty)
)]
pub async fn subscribe(
    form: web::Form<FormData>,
    session: TypedSession,
    registry: web::Data<FormRegistry>,
) -> Result<HttpResponse, actix_web::Error> {
    let form_id = session.form_id().map_err(e500)?;
    tracing::Span::current().record("form_id", tracing::field::display(form_id));

    let controller = registry.get_or_create(form_id).await;
    controller.on_input_change(form.0.email).await;

    // every outcome is already reflected in the form state, the page
    // renders it after the redirect.
    if let Err(e) = controller.submit().await {
        tracing::info!(error = %e, "newsletter submission not accepted");
    }

    Ok(seeother("/"))
}

pub async fn subscription_status(
    session: TypedSession,
    registry: web::Data<FormRegistry>,
) -> Result<HttpResponse, actix_web::Error> {
    let snapshot = current_snapshot(&session, &registry).await?;

    Ok(HttpResponse::Ok().json(snapshot))
}
