use std::sync::Arc;

use axum::extract::FromRef;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginForm, SignupForm},
        error::{AuthError, Conflict},
        password::{hash_password_async, verify_password_async},
        repo::{NewUser, UserRepo},
        validation::{validate_login, validate_signup},
    },
    session::{SessionId, SessionStore, SessionUser},
    state::AppState,
};

/// A freshly created session.
#[derive(Debug)]
pub struct Established {
    pub session_id: SessionId,
    pub user: SessionUser,
}

/// Signup, login and logout over an injected credential store and session store.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepo>,
    sessions: Arc<dyn SessionStore>,
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.users.clone(), state.sessions.clone())
    }
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepo>, sessions: Arc<dyn SessionStore>) -> Self {
        Self { users, sessions }
    }

    /// Registers a user and signs them in under a new session id. A session
    /// the client presented beforehand is destroyed once the account exists.
    #[instrument(skip_all, fields(username = %form.username.trim()))]
    pub async fn signup(
        &self,
        form: &SignupForm,
        previous: Option<&SessionId>,
    ) -> Result<Established, AuthError> {
        let valid = validate_signup(form).map_err(AuthError::Validation)?;

        // Best effort; the unique constraints decide races.
        if let Some(existing) = self
            .users
            .find_by_username_or_email(&valid.username, &valid.email)
            .await?
        {
            let conflict = if existing.email == valid.email {
                Conflict::Email
            } else {
                Conflict::Username
            };
            warn!(?conflict, "signup rejected");
            return Err(AuthError::Conflict(conflict));
        }

        let password_hash = hash_password_async(valid.password.to_owned()).await?;
        let user = self
            .users
            .create(NewUser {
                username: valid.username,
                email: valid.email,
                password_hash,
            })
            .await?;

        let identity = user.identity();
        drop(user);
        self.discard(previous).await;
        let established = self.establish(identity).await?;
        info!(user_id = %established.user.id, email = %established.user.email, "user registered");
        Ok(established)
    }

    /// Authenticates and issues a new session id. A session the client
    /// presented beforehand is destroyed.
    #[instrument(skip_all)]
    pub async fn login(
        &self,
        form: &LoginForm,
        previous: Option<&SessionId>,
    ) -> Result<Established, AuthError> {
        let valid = validate_login(form).map_err(AuthError::Validation)?;

        let (identity, hash) = match self.users.find_by_email(&valid.email).await? {
            Some(user) => (Some(user.identity()), Some(user.password_hash)),
            None => (None, None),
        };
        // The hash moves into the verifier and is wiped when it returns.
        let ok = verify_password_async(valid.password.to_owned(), hash).await?;

        let identity = match identity {
            Some(identity) if ok => identity,
            Some(identity) => {
                warn!(user_id = %identity.id, "login invalid password");
                return Err(AuthError::InvalidCredentials);
            }
            None => {
                warn!(email = %valid.email, "login unknown email");
                return Err(AuthError::InvalidCredentials);
            }
        };

        self.discard(previous).await;
        let established = self.establish(identity).await?;
        info!(user_id = %established.user.id, "user logged in");
        Ok(established)
    }

    /// Destroys the session if there is one. No session is not an error.
    #[instrument(skip_all)]
    pub async fn logout(&self, current: Option<&SessionId>) -> anyhow::Result<()> {
        match current {
            Some(id) => {
                self.sessions.destroy(id).await?;
                debug!(session = ?id, "session destroyed");
                Ok(())
            }
            None => Ok(()),
        }
    }

    pub async fn current_user(&self, id: &SessionId) -> anyhow::Result<Option<SessionUser>> {
        self.sessions.get(id).await
    }

    async fn discard(&self, previous: Option<&SessionId>) {
        if let Some(prev) = previous {
            if let Err(e) = self.sessions.destroy(prev).await {
                error!(error = %e, "failed to drop previous session");
            }
        }
    }

    async fn establish(&self, user: SessionUser) -> Result<Established, AuthError> {
        let session_id = SessionId::generate()?;
        self.sessions.set(&session_id, user.clone()).await?;
        Ok(Established { session_id, user })
    }
}
