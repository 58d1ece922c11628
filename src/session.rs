use std::future::{ready, Ready};

use actix_session::{Session, SessionExt, SessionGetError, SessionInsertError};
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use uuid::Uuid;

/// Session cookie that remembers which newsletter form belongs to a visitor.
#[derive(Clone)]
pub struct TypedSession(Session);

impl TypedSession {
    const FORM_ID_KEY: &'static str = "newsletter_form_id";

    pub fn insert_form_id(&self, form_id: Uuid) -> Result<(), SessionInsertError> {
        self.0.insert(Self::FORM_ID_KEY, form_id)
    }

    pub fn get_form_id(&self) -> Result<Option<Uuid>, SessionGetError> {
        self.0.get(Self::FORM_ID_KEY)
    }

    /// Return the visitor's form id, assigning a fresh one on first visit.
    pub fn form_id(&self) -> Result<Uuid, anyhow::Error> {
        if let Some(form_id) = self.get_form_id()? {
            return Ok(form_id);
        }

        let form_id = Uuid::new_v4();
        self.insert_form_id(form_id)?;
        Ok(form_id)
    }
}

impl FromRequest for TypedSession {
    type Error = <Session as FromRequest>::Error;
    type Future = Ready<Result<TypedSession, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(TypedSession(req.get_session())))
    }
}
