//! Page access gate.
//!
//! Gated pages render only for a signed-in learner. While the session is
//! still being restored the caller waits rather than redirecting, so a
//! returning learner is not bounced to the sign-in page.

use eduint_exercise::Page;

use crate::User;

/// What is known about the current learner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// Session restore has not finished.
    Loading,
    /// No session.
    SignedOut,
    /// A session exists for this user.
    SignedIn(User),
}

impl AuthState {
    /// The signed-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        match self {
            Self::SignedIn(user) => Some(user),
            Self::Loading | Self::SignedOut => None,
        }
    }
}

/// Decision for a page visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Show the page.
    Render,
    /// Show a loading indicator until the auth state settles.
    Wait,
    /// Go elsewhere and show a notice.
    Redirect {
        /// Target page.
        to: Page,
        /// Message for the learner.
        notice: &'static str,
    },
}

/// Decides whether `page` can be shown in `state`.
///
/// # Examples
///
/// ```
/// use eduint_auth::{guard, AuthState, Navigation};
/// use eduint_exercise::Page;
///
/// assert_eq!(guard(Page::Home, &AuthState::SignedOut), Navigation::Render);
/// assert_eq!(
///     guard(Page::Gamified, &AuthState::SignedOut),
///     Navigation::Redirect { to: Page::Auth, notice: "Please sign in to play games" }
/// );
/// ```
#[must_use]
pub const fn guard(page: Page, state: &AuthState) -> Navigation {
    let Some(notice) = page.sign_in_notice() else {
        return Navigation::Render;
    };
    match state {
        AuthState::Loading => Navigation::Wait,
        AuthState::SignedOut => Navigation::Redirect {
            to: Page::Auth,
            notice,
        },
        AuthState::SignedIn(_) => Navigation::Render,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn learner() -> AuthState {
        AuthState::SignedIn(User {
            id: "u1".to_string(),
            email: Some("learner@example.com".to_string()),
            created_at: None,
        })
    }

    #[test]
    fn test_public_pages_always_render() {
        for page in [Page::Home, Page::Features, Page::StudyAbroad, Page::About, Page::Auth] {
            assert_eq!(guard(page, &AuthState::SignedOut), Navigation::Render);
            assert_eq!(guard(page, &AuthState::Loading), Navigation::Render);
        }
        assert_eq!(guard(Page::NotFound, &AuthState::SignedOut), Navigation::Render);
    }

    #[test]
    fn test_gated_pages_redirect_when_signed_out() {
        for page in Page::ALL.into_iter().filter(Page::requires_auth) {
            match guard(page, &AuthState::SignedOut) {
                Navigation::Redirect { to, notice } => {
                    assert_eq!(to, Page::Auth);
                    assert!(notice.starts_with("Please sign in"));
                }
                other => unreachable!("{page} gave {other:?}"),
            }
        }
    }

    #[test]
    fn test_gated_pages_wait_while_loading() {
        assert_eq!(guard(Page::MockTests, &AuthState::Loading), Navigation::Wait);
        assert_eq!(guard(Page::Practice, &AuthState::Loading), Navigation::Wait);
    }

    #[test]
    fn test_gated_pages_render_when_signed_in() {
        let state = learner();
        for page in Page::ALL {
            assert_eq!(guard(page, &state), Navigation::Render);
        }
        assert_eq!(state.user().map(|u| u.id.as_str()), Some("u1"));
    }

    #[test]
    fn test_notice_is_page_specific() {
        assert_eq!(
            guard(Page::MockTests, &AuthState::SignedOut),
            Navigation::Redirect {
                to: Page::Auth,
                notice: "Please sign in to access mock tests",
            }
        );
        assert_eq!(
            guard(Page::AnalyticsDashboard, &AuthState::SignedOut),
            Navigation::Redirect {
                to: Page::Auth,
                notice: "Please sign in to access your analytics dashboard",
            }
        );
    }
}
