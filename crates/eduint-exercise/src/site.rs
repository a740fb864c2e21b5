//! Page map.
//!
//! Every route the product serves, which ones need a signed-in learner, and
//! where each practice module is practised.

use std::fmt;

use serde::Serialize;

use crate::model::Module;

/// A page of the product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    /// Landing page.
    Home,
    /// Feature overview.
    Features,
    /// Study-abroad guidance.
    StudyAbroad,
    /// About the product.
    About,
    /// Sign in / sign up.
    Auth,
    /// Practice module list.
    Materials,
    /// Reading practice quiz.
    Practice,
    /// Essay practice.
    WritingPractice,
    /// Listening practice.
    ListeningPractice,
    /// Speaking practice.
    SpeakingPractice,
    /// Mock test list.
    MockTests,
    /// Timed mock test.
    TestTaking,
    /// Analytics overview.
    Analytics,
    /// Analytics dashboard.
    AnalyticsDashboard,
    /// Game list.
    Gamified,
    /// A game in progress.
    Gameplay,
    /// Anything else.
    NotFound,
}

impl Page {
    /// All routable pages (excluding `NotFound`).
    pub const ALL: [Self; 16] = [
        Self::Home,
        Self::Features,
        Self::StudyAbroad,
        Self::About,
        Self::Auth,
        Self::Materials,
        Self::Practice,
        Self::WritingPractice,
        Self::ListeningPractice,
        Self::SpeakingPractice,
        Self::MockTests,
        Self::TestTaking,
        Self::Analytics,
        Self::AnalyticsDashboard,
        Self::Gamified,
        Self::Gameplay,
    ];

    /// Route path.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Features => "/features",
            Self::StudyAbroad => "/study-abroad",
            Self::About => "/about",
            Self::Auth => "/auth",
            Self::Materials => "/materials",
            Self::Practice => "/practice",
            Self::WritingPractice => "/writing-practice",
            Self::ListeningPractice => "/listening-practice",
            Self::SpeakingPractice => "/speaking-practice",
            Self::MockTests => "/mock-tests",
            Self::TestTaking => "/test-taking",
            Self::Analytics => "/analytics",
            Self::AnalyticsDashboard => "/analytics-dashboard",
            Self::Gamified => "/gamified",
            Self::Gameplay => "/gameplay",
            Self::NotFound => "/404",
        }
    }

    /// Resolves a path, ignoring any query string and trailing slash.
    ///
    /// # Examples
    ///
    /// ```
    /// use eduint_exercise::Page;
    ///
    /// assert_eq!(Page::from_path("/practice?module=Reading"), Page::Practice);
    /// assert_eq!(Page::from_path("/gamified/"), Page::Gamified);
    /// assert_eq!(Page::from_path("/pricing"), Page::NotFound);
    /// ```
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };
        Self::ALL
            .into_iter()
            .find(|p| p.path() == path)
            .unwrap_or(Self::NotFound)
    }

    /// Returns `true` for pages that need a signed-in learner.
    #[must_use]
    pub const fn requires_auth(&self) -> bool {
        self.sign_in_notice().is_some()
    }

    /// Message shown when an anonymous visitor is sent to sign in.
    #[must_use]
    pub const fn sign_in_notice(&self) -> Option<&'static str> {
        match self {
            Self::Materials => Some("Please sign in to access materials"),
            Self::Practice
            | Self::WritingPractice
            | Self::ListeningPractice
            | Self::SpeakingPractice => Some("Please sign in to access practice materials"),
            Self::MockTests | Self::TestTaking => Some("Please sign in to access mock tests"),
            Self::Analytics => Some("Please sign in to access analytics"),
            Self::AnalyticsDashboard => Some("Please sign in to access your analytics dashboard"),
            Self::Gamified => Some("Please sign in to play games"),
            Self::Gameplay => Some("Please sign in to start playing"),
            Self::Home
            | Self::Features
            | Self::StudyAbroad
            | Self::About
            | Self::Auth
            | Self::NotFound => None,
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Page where a module is practised.
///
/// Reading has no dedicated page and uses the generic practice quiz.
#[must_use]
pub const fn practice_page(module: Module) -> Page {
    match module {
        Module::Writing => Page::WritingPractice,
        Module::Listening => Page::ListeningPractice,
        Module::Speaking => Page::SpeakingPractice,
        Module::Reading => Page::Practice,
    }
}
