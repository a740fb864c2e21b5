//! Learner sign-in for the terminal.
//!
//! The session is kept in the OS keychain. When no keychain is available it
//! falls back to `.eduint/session.json` under the working directory, readable
//! only by the current user. Learner commands pass through
//! [`ensure_access`], which restores that session and runs the sign-in flow
//! when a gated page would redirect.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};

use eduint_auth::{guard, AuthClient, AuthError, AuthState, Navigation, Session, SignUpOutcome, User};
use eduint_exercise::Page;

use crate::console::Console;

/// Directory holding CLI state.
pub const STATE_DIR: &str = ".eduint";

/// Fallback session file name inside [`STATE_DIR`].
pub const SESSION_FILE_NAME: &str = "session.json";

const DEFAULT_KEYRING_SERVICE: &str = "eduint-cli";
const KEYRING_USER: &str = "session";

/// Keyring service name. `EDUINT_KEYRING_SERVICE` overrides it so test runs
/// stay away from a real session.
fn keyring_service() -> String {
    std::env::var("EDUINT_KEYRING_SERVICE").unwrap_or_else(|_| DEFAULT_KEYRING_SERVICE.to_string())
}

/// Stored session: keychain first, file second.
pub struct SessionStore {
    path: PathBuf,
    entry: Option<keyring::Entry>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("path", &self.path)
            .field("keyring", &self.entry.is_some())
            .finish()
    }
}

impl SessionStore {
    /// Store backed by the keychain, with its file fallback under `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        let entry = match keyring::Entry::new(&keyring_service(), KEYRING_USER) {
            Ok(entry) => Some(entry),
            Err(error) => {
                tracing::warn!(%error, "Keyring unavailable; sessions are stored on disk");
                None
            }
        };
        Self {
            path: dir.join(STATE_DIR).join(SESSION_FILE_NAME),
            entry,
        }
    }

    /// Store that only uses the file under `dir`.
    pub fn file_only(dir: &Path) -> Self {
        Self {
            path: dir.join(STATE_DIR).join(SESSION_FILE_NAME),
            entry: None,
        }
    }

    /// Path of the fallback session file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored session. Priority: keychain, then file. Unreadable
    /// entries count as no session.
    pub fn load(&self) -> Option<Session> {
        if let Some(json) = self
            .entry
            .as_ref()
            .and_then(|entry| entry.get_password().ok())
            .filter(|json| !json.trim().is_empty())
        {
            match serde_json::from_str(&json) {
                Ok(session) => return Some(session),
                Err(e) => tracing::warn!(error = %e, "Ignoring unreadable keyring session"),
            }
        }
        self.load_file()
    }

    /// Stores `session` in the keychain, or in the file when the keychain
    /// refuses it.
    pub fn save(&self, session: &Session) -> anyhow::Result<()> {
        let json = serde_json::to_string(session).context("Failed to serialize session")?;
        if let Some(entry) = &self.entry {
            match entry.set_password(&json) {
                Ok(()) => return self.remove_file(),
                Err(error) => tracing::warn!(%error, "Keyring store failed; falling back to file"),
            }
        }
        self.save_file(&json)
    }

    /// Removes the stored session from the keychain and the file.
    pub fn clear(&self) -> anyhow::Result<()> {
        if let Some(entry) = &self.entry {
            if let Err(error) = entry.delete_credential() {
                tracing::debug!(%error, "No keyring session to delete");
            }
        }
        self.remove_file()
    }

    fn load_file(&self) -> Option<Session> {
        let contents = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring unreadable session file");
                None
            }
        }
    }

    fn save_file(&self, json: &str) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                    tracing::warn!("Failed to chmod 0700 {}: {e}", parent.display());
                }
            }
        }
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to chmod {}", self.path.display()))?;
        }
        Ok(())
    }

    fn remove_file(&self) -> anyhow::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", self.path.display())),
        }
    }
}

/// Restores the stored session, checking it with the service.
async fn restore(auth: &AuthClient, store: &SessionStore) -> anyhow::Result<AuthState> {
    let Some(session) = store.load() else {
        return Ok(AuthState::SignedOut);
    };
    match auth.current_user(&session.access_token).await {
        Ok(user) => Ok(AuthState::SignedIn(user)),
        Err(AuthError::SessionExpired) => {
            tracing::info!("Stored session expired");
            store.clear()?;
            Ok(AuthState::SignedOut)
        }
        Err(e) => Err(e.into()),
    }
}

/// Makes sure `page` may be shown, signing the learner in if needed.
///
/// Returns the signed-in user for gated pages.
pub async fn ensure_access(
    page: Page,
    auth: &AuthClient,
    store: &SessionStore,
    console: &mut Console,
) -> anyhow::Result<Option<User>> {
    let mut state = AuthState::Loading;
    loop {
        match guard(page, &state) {
            Navigation::Render => return Ok(state.user().cloned()),
            Navigation::Wait => state = restore(auth, store).await?,
            Navigation::Redirect { to, notice } => {
                println!("{notice}");
                tracing::debug!(from = %page, to = %to, "Redirecting to sign-in");
                let session = sign_in_flow(auth, console).await?;
                store.save(&session)?;
                state = AuthState::SignedIn(session.user);
            }
        }
    }
}

/// Entry chosen on the sign-in menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    SignIn,
    SignUp,
}

impl Choice {
    fn parse(input: &str) -> Self {
        if input == "2" {
            Self::SignUp
        } else {
            Self::SignIn
        }
    }

    /// Greeting once a session is obtained. Sign-up prints the outcome
    /// message instead.
    const fn greeting(self) -> Option<&'static str> {
        match self {
            Self::SignIn => Some("Welcome back!"),
            Self::SignUp => None,
        }
    }
}

/// Interactive sign-in or sign-up until a session is obtained.
async fn sign_in_flow(auth: &AuthClient, console: &mut Console) -> anyhow::Result<Session> {
    loop {
        println!();
        println!("1) Sign in");
        println!("2) Create an account");
        let choice = Choice::parse(&read_required(console, "Choose").await?);
        let email = read_required(console, "Email").await?;
        let password = read_required(console, "Password").await?;

        let result = match choice {
            Choice::SignUp => {
                let confirm = read_required(console, "Confirm password").await?;
                match auth.sign_up(&email, &password, &confirm).await {
                    Ok(outcome) => {
                        println!("{}", outcome.message());
                        match outcome {
                            SignUpOutcome::SignedIn(session) => Ok(session),
                            SignUpOutcome::ConfirmationRequired(_) => continue,
                        }
                    }
                    Err(e) => Err(e),
                }
            }
            Choice::SignIn => auth.sign_in(&email, &password).await,
        };

        match result {
            Ok(session) => {
                if let Some(greeting) = choice.greeting() {
                    println!("{greeting}");
                }
                return Ok(session);
            }
            Err(e) => println!("{e}"),
        }
    }
}

async fn read_required(console: &mut Console, label: &str) -> anyhow::Result<String> {
    match console.ask(label).await? {
        Some(value) if !value.is_empty() => Ok(value),
        _ => bail!("Sign-in cancelled"),
    }
}
