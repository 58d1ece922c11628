use actix_web::http::header::ContentType;
use actix_web::{web, HttpResponse};
use chrono::Datelike;

use crate::form::{FailureReason, FormRegistry, FormSnapshot, SubmissionStatus};
use crate::routes::e500;
use crate::session::TypedSession;

const QUICK_LINKS: [(&str, &str); 5] = [
    ("Home", "#"),
    ("Events", "#events"),
    ("Register", "#register"),
    ("About", "#about"),
    ("Contact", "#contact"),
];

const SOCIAL_LINKS: [&str; 5] =
    ["Instagram", "Twitter", "Facebook", "LinkedIn", "GitHub"];

const EVENT_STATS: [(&str, &str); 4] = [
    ("Events", "50+"),
    ("Participants", "5000+"),
    ("Prizes", "₹10L+"),
    ("Days", "3"),
];

pub const SUBSCRIBED_MESSAGE: &str =
    "Thanks for subscribing! We'll keep you updated.";

pub async fn footer(
    session: TypedSession,
    registry: web::Data<FormRegistry>,
) -> Result<HttpResponse, actix_web::Error> {
    let snapshot = current_snapshot(&session, &registry).await?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(render_footer(&snapshot, chrono::Utc::now().year())))
}

/// The visitor's form as it stands, without creating one for a mere page view.
pub async fn current_snapshot(
    session: &TypedSession,
    registry: &FormRegistry,
) -> Result<FormSnapshot, actix_web::Error> {
    let form = match session.get_form_id().map_err(e500)? {
        Some(form_id) => registry.get(form_id).await,
        None => None,
    };

    Ok(match form {
        Some(form) => form.snapshot().await,
        None => FormSnapshot::idle(),
    })
}

/// Visitor-facing feedback for the newsletter form, if any.
pub fn feedback_message(snapshot: &FormSnapshot) -> Option<&'static str> {
    match (snapshot.status, &snapshot.error_reason) {
        (SubmissionStatus::Idle, _) => None,
        (SubmissionStatus::Pending, _) => Some("Subscribing..."),
        (SubmissionStatus::Succeeded, _) => Some(SUBSCRIBED_MESSAGE),
        (SubmissionStatus::Failed, Some(FailureReason::EmptyInput)) => {
            Some("Please enter your email address.")
        }
        (SubmissionStatus::Failed, Some(FailureReason::InvalidShape)) => {
            Some("Please enter a valid email address.")
        }
        (SubmissionStatus::Failed, _) => {
            Some("We could not subscribe you right now. Please try again.")
        }
    }
}

pub fn render_footer(snapshot: &FormSnapshot, year: i32) -> String {
    let stats_html: String = EVENT_STATS
        .iter()
        .map(|(label, value)| {
            format!(r#"<li><strong>{value}</strong> <span>{label}</span></li>"#)
        })
        .collect();
    let quick_links_html: String = QUICK_LINKS
        .iter()
        .map(|(name, href)| format!(r#"<li><a href="{href}">{name}</a></li>"#))
        .collect();
    let social_html: String = SOCIAL_LINKS
        .iter()
        .map(|label| format!(r##"<a href="#" aria-label="{label}">{label}</a>"##))
        .collect::<Vec<_>>()
        .join(" ");

    let status = snapshot.status.as_str();
    let feedback_html = match feedback_message(snapshot) {
        Some(msg) => format!(
            r#"<p class="subscribe-{status}" role="status">{msg}</p>"#
        ),
        None => String::new(),
    };
    let raw_input = htmlescape::encode_minimal(&snapshot.raw_input);
    let disabled = if snapshot.status == SubmissionStatus::Pending {
        " disabled"
    } else {
        ""
    };

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta http-equiv="content-type" content="text/html; charset=utf-8">
    <title>Avinya '25</title>
</head>
<body id="top">
<footer>
    <ul class="event-stats">{stats_html}</ul>
    <section class="brand">
        <h1>Avinya '25</h1>
        <p>Where innovation meets tradition. Join us for the most spectacular techno-cultural fest that celebrates the fusion of technology and culture.</p>
        <nav class="social">{social_html}</nav>
        <p>Made with love by IIIT Dharwad</p>
    </section>
    <section class="quick-links">
        <h3>Quick Links</h3>
        <ul>{quick_links_html}</ul>
    </section>
    <section class="contact">
        <h3>Get in Touch</h3>
        <address>
            IIIT Dharwad Campus<br>
            WALMI Campus, PB Road<br>
            Dharwad - 580009, Karnataka<br>
            <a href="mailto:contact@avinya.iiitdwd.ac.in">contact@avinya.iiitdwd.ac.in</a>
        </address>
    </section>
    <section class="newsletter" data-status="{status}">
        <h3>Stay Updated</h3>
        <p>Get the latest updates about events, registrations, and announcements directly in your inbox.</p>
        <form name="subscribe" action="/subscriptions" method="post">
            <input
                type="email"
                placeholder="Enter your email"
                name="email"
                value="{raw_input}"
            >
            <button type="submit"{disabled}>Subscribe</button>
        </form>
        {feedback_html}
    </section>
    <section class="legal">
        <span>&copy; {year} Avinya - IIIT Dharwad. All rights reserved.</span>
        <a href="#">Privacy Policy</a>
        <a href="#">Terms of Service</a>
        <a href="#">Code of Conduct</a>
    </section>
    <a href="#top" class="scroll-to-top" aria-label="Scroll to top">&uarr;</a>
</footer>
</body>
</html>
"##
    )
}
