//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations such as signing a user in or requiring that the
//! caller owns a resource.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Start a fresh session for the authenticated user.
    ///
    /// The session key is renewed so a cookie issued before login cannot be
    /// replayed as an authenticated one.
    pub fn sign_in(&self, user_id: &UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current user id from the session, if present.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let id = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match id {
            Some(raw) => match UserId::new(raw) {
                Ok(id) => Ok(Some(id)),
                Err(error) => {
                    tracing::warn!("invalid user id in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Require an authenticated user id or return `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Require that the signed-in user is `owner`.
    ///
    /// Fails with `401 Unauthorized` without a session and `403 Forbidden`
    /// when the session belongs to somebody else.
    pub fn require_owner(&self, owner: &UserId) -> Result<UserId, Error> {
        let current = self.require_user_id()?;
        if current == *owner {
            Ok(current)
        } else {
            tracing::info!(user_id = %current, target = %owner, "cross-user access refused");
            Err(Error::forbidden("cannot modify another user"))
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}


#[cfg(test)]
mod owner_tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;

    const OWNER: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
    const STRANGER: &str = "9b2f1a47-52a5-4c43-9a6f-0b2c5c0f4e11";

    #[rstest]
    #[case(OWNER, StatusCode::OK)]
    #[case(STRANGER, StatusCode::FORBIDDEN)]
    #[actix_web::test]
    async fn require_owner_compares_session_user(
        #[case] target: &str,
        #[case] expected: StatusCode,
    ) {
        let app = test::init_service(
            App::new()
                .wrap(crate::inbound::http::test_utils::test_session_middleware())
                .route(
                    "/sign-in",
                    web::get().to(|session: SessionContext| async move {
                        session.sign_in(&UserId::new(OWNER).expect("fixture id"))?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/owned/{id}",
                    web::get().to(|session: SessionContext, path: web::Path<String>| async move {
                        let target = UserId::new(path.into_inner()).expect("fixture id");
                        session.require_owner(&target)?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                ),
        )
        .await;

        let sign_in =
            test::call_service(&app, test::TestRequest::get().uri("/sign-in").to_request()).await;
        let cookie = sign_in
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/owned/{target}"))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), expected);
    }
}
