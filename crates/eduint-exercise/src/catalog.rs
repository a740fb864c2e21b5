//! Static catalog content.
//!
//! Module cards, games, mock-test formats, achievements and the marketing
//! pages are fixed data compiled into the binary. Nothing here is fetched.

use serde::Serialize;

use crate::model::{GameType, Module};
use crate::site::{practice_page, Page};

/// A labelled figure, e.g. `"Questions" / "120K+"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stat {
    /// What is counted.
    pub label: &'static str,
    /// Display value.
    pub value: &'static str,
}

const fn stat(label: &'static str, value: &'static str) -> Stat {
    Stat { label, value }
}

/// A practice module card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModuleInfo {
    /// The module.
    pub module: Module,
    /// Card text.
    pub description: &'static str,
    /// Card figures.
    pub stats: &'static [Stat],
}

impl ModuleInfo {
    /// Page the card opens.
    #[must_use]
    pub const fn page(&self) -> Page {
        practice_page(self.module)
    }
}

/// Game difficulty label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Difficulty {
    /// Easy.
    Easy,
    /// Medium.
    Medium,
    /// Hard.
    Hard,
}

/// A game card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameInfo {
    /// The game.
    pub game: GameType,
    /// Card text.
    pub description: &'static str,
    /// Difficulty.
    pub difficulty: Difficulty,
    /// Typical play time.
    pub duration: &'static str,
    /// Typical points range.
    pub points: &'static str,
}

/// A mock-test format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MockTestInfo {
    /// Format name.
    pub title: &'static str,
    /// Length.
    pub duration: &'static str,
    /// Card text.
    pub description: &'static str,
    /// Bullet points.
    pub features: &'static [&'static str],
}

/// A titled blurb (achievements, features, study-abroad steps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Blurb {
    /// Heading.
    pub title: &'static str,
    /// Body text.
    pub description: &'static str,
}

const fn blurb(title: &'static str, description: &'static str) -> Blurb {
    Blurb { title, description }
}

/// A study-abroad destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    /// Country.
    pub name: &'static str,
    /// Typical minimum band range.
    pub min_band: &'static str,
    /// Partner universities.
    pub universities: &'static str,
    /// Visa type.
    pub visa_type: &'static str,
    /// Notable scholarships.
    pub scholarships: &'static str,
}

/// Header content of an informational page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarketingPage {
    /// Which page.
    pub page: Page,
    /// Heading.
    pub title: &'static str,
    /// Sub-heading.
    pub tagline: &'static str,
    /// Sections or blurbs shown on the page.
    pub highlights: &'static [Blurb],
}

/// A line of recent activity on the sample dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Activity {
    /// Relative date.
    pub date: &'static str,
    /// Exercise taken.
    pub test: &'static str,
    /// Percentage score.
    pub score: u32,
}

/// Sample analytics shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSample {
    /// Overall band.
    pub overall: f64,
    /// Reading band.
    pub reading: f64,
    /// Writing band.
    pub writing: f64,
    /// Listening band.
    pub listening: f64,
    /// Speaking band.
    pub speaking: f64,
    /// Target band.
    pub target: f64,
    /// Study streak in days.
    pub streak: u32,
    /// Tests completed.
    pub tests_completed: u32,
    /// Recent activity.
    pub recent: &'static [Activity],
}

impl AnalyticsSample {
    /// Module bands in display order.
    #[must_use]
    pub const fn module_bands(&self) -> [(Module, f64); 4] {
        [
            (Module::Reading, self.reading),
            (Module::Writing, self.writing),
            (Module::Listening, self.listening),
            (Module::Speaking, self.speaking),
        ]
    }

    /// Progress toward the target band, as a percentage.
    #[must_use]
    pub fn target_progress(&self) -> f64 {
        if self.target <= 0.0 {
            return 0.0;
        }
        self.overall / self.target * 100.0
    }
}

/// All static content.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    /// Practice modules.
    pub modules: &'static [ModuleInfo],
    /// Games.
    pub games: &'static [GameInfo],
    /// Mock-test formats.
    pub mock_tests: &'static [MockTestInfo],
    /// Game achievements.
    pub achievements: &'static [Blurb],
    /// Informational pages.
    pub pages: &'static [MarketingPage],
    /// Study-abroad destinations.
    pub destinations: &'static [Destination],
    /// Platform figures on the landing page.
    pub stats: &'static [Stat],
    /// Sample dashboard.
    pub analytics: AnalyticsSample,
}

impl Catalog {
    /// The compiled-in catalog.
    #[must_use]
    pub fn get() -> &'static Self {
        &CATALOG
    }

    /// Card for a module.
    #[must_use]
    pub fn module(&self, module: Module) -> Option<&ModuleInfo> {
        self.modules.iter().find(|m| m.module == module)
    }

    /// Card for a game.
    #[must_use]
    pub fn game(&self, game: GameType) -> Option<&GameInfo> {
        self.games.iter().find(|g| g.game == game)
    }

    /// Content of an informational page.
    #[must_use]
    pub fn page(&self, page: Page) -> Option<&MarketingPage> {
        self.pages.iter().find(|p| p.page == page)
    }
}

static CATALOG: Catalog = Catalog {
    modules: &[
        ModuleInfo {
            module: Module::Reading,
            description: "Master IELTS Reading with passages from academic journals, newspapers, and books",
            stats: &[stat("Questions", "120K+"), stat("Tests", "2,000+"), stat("Time", "60 min")],
        },
        ModuleInfo {
            module: Module::Writing,
            description: "Practice Task 1 (graphs, charts) and Task 2 (essays) with AI evaluation",
            stats: &[stat("Tasks", "50K+"), stat("Templates", "200+"), stat("Time", "60 min")],
        },
        ModuleInfo {
            module: Module::Listening,
            description: "Improve listening skills with authentic recordings and various accents",
            stats: &[stat("Recordings", "80K+"), stat("Tests", "1,500+"), stat("Time", "30 min")],
        },
        ModuleInfo {
            module: Module::Speaking,
            description: "Practice with AI interview simulation and get instant feedback on fluency",
            stats: &[stat("Topics", "1,000+"), stat("Tests", "800+"), stat("Time", "15 min")],
        },
    ],
    games: &[
        GameInfo {
            game: GameType::VocabularyRace,
            description: "Speed challenge to match words with meanings",
            difficulty: Difficulty::Easy,
            duration: "5 min",
            points: "100-500",
        },
        GameInfo {
            game: GameType::GrammarBattle,
            description: "Fix sentences and compete with other learners",
            difficulty: Difficulty::Medium,
            duration: "10 min",
            points: "200-800",
        },
        GameInfo {
            game: GameType::ListeningPuzzle,
            description: "Complete the story by listening to audio clips",
            difficulty: Difficulty::Medium,
            duration: "15 min",
            points: "300-1000",
        },
        GameInfo {
            game: GameType::ReadingSprint,
            description: "Answer questions as fast as you can",
            difficulty: Difficulty::Hard,
            duration: "20 min",
            points: "500-1500",
        },
    ],
    mock_tests: &[
        MockTestInfo {
            title: "Full IELTS Academic Test",
            duration: "2 hours 45 minutes",
            description: "Complete IELTS exam experience with all 4 modules",
            features: &[
                "Reading (60 min)",
                "Writing (60 min)",
                "Listening (30 min)",
                "Speaking (15 min)",
            ],
        },
        MockTestInfo {
            title: "Quick Practice Test",
            duration: "30 minutes",
            description: "Short focused practice on specific skills",
            features: &[
                "Choose any module",
                "Instant feedback",
                "Time management practice",
                "Flexible scheduling",
            ],
        },
        MockTestInfo {
            title: "Target Band Test",
            duration: "Variable",
            description: "Customized test based on your target band score",
            features: &[
                "Adaptive difficulty",
                "Personalized questions",
                "Band prediction",
                "Weakness analysis",
            ],
        },
    ],
    achievements: &[
        blurb("First Steps", "Complete your first practice"),
        blurb("Speed Demon", "Finish 10 exercises in under 5 minutes"),
        blurb("Perfect Score", "Get 100% on any module"),
        blurb("Streak Master", "Maintain a 30-day study streak"),
    ],
    pages: &[
        MarketingPage {
            page: Page::Home,
            title: "Master IELTS with Unlimited AI Practice",
            tagline: "Your complete IELTS Academic companion powered by AI. Get unlimited mock tests, personalized coaching, and real-time feedback to achieve your dream band score.",
            highlights: &[],
        },
        MarketingPage {
            page: Page::Features,
            title: "Powerful Features",
            tagline: "Everything you need to reach your target band score",
            highlights: &[
                blurb("Comprehensive IELTS Materials", "Access unlimited Reading, Writing, Listening, and Speaking modules with authentic IELTS-style questions updated daily."),
                blurb("AI-Powered Study Coach", "Get personalized learning paths, weak area identification, and adaptive recommendations from our intelligent AI mentor."),
                blurb("Timed Mock Tests", "Experience real IELTS exam conditions with our authentic simulator. Complete with timer, actual test format, and instant results."),
                blurb("Advanced Analytics Dashboard", "Track your progress with detailed insights, performance graphs, score predictions, and comprehensive reports."),
                blurb("Gamified Learning Experience", "Make IELTS prep fun with vocabulary races, grammar battles, listening puzzles, and achievement rewards."),
                blurb("Study Abroad Hub", "Complete migration guide with country-specific visa requirements, scholarship info, and university recommendations."),
                blurb("Skill-Focused Modules", "Dedicated sections for each IELTS skill with targeted practice, tips, and techniques for improvement."),
                blurb("Success Path Planning", "Get a customized roadmap to your target band score with milestone tracking and achievement celebrations."),
                blurb("Community Learning", "Join study groups, participate in discussions, share tips, and learn from successful IELTS achievers."),
                blurb("Daily Updates", "Fresh content every day based on latest IELTS trends, topics, and question patterns from around the world."),
            ],
        },
        MarketingPage {
            page: Page::StudyAbroad,
            title: "Study & Migrate Abroad Hub",
            tagline: "Complete guidance for Bangladeshi students planning to study or migrate to UK, Canada, Australia, USA, and beyond",
            highlights: &[
                blurb("Choose Your Destination", "Select the country and university that matches your career goals and budget."),
                blurb("Achieve Target IELTS Score", "Use our platform to reach the required band score for your chosen destination."),
                blurb("Prepare Your Documents", "Get guidance on all required documents including SOP, LORs, and financial proof."),
                blurb("Apply for Scholarships", "Explore and apply for scholarships to reduce your education costs."),
                blurb("Complete Visa Process", "Follow our step-by-step visa application guide for your destination country."),
                blurb("Start Your Journey", "Get pre-departure guidance and connect with other Bangladeshi students abroad."),
            ],
        },
        MarketingPage {
            page: Page::About,
            title: "About Eduint IELTS Infinity",
            tagline: "Empowering Bangladeshi students to achieve their global dreams through AI-powered IELTS preparation",
            highlights: &[
                blurb("Our Mission", "To democratize IELTS preparation for every Bangladeshi student by providing unlimited, AI-powered, world-class learning resources that make achieving dream band scores accessible and affordable."),
                blurb("Our Vision", "To become the #1 IELTS preparation platform in South Asia, enabling thousands of students to pursue higher education and career opportunities in top universities and countries worldwide."),
            ],
        },
    ],
    destinations: &[
        Destination {
            name: "United Kingdom",
            min_band: "6.5-7.0",
            universities: "150+ Partner Unis",
            visa_type: "Student Visa (Tier 4)",
            scholarships: "Commonwealth, Chevening",
        },
        Destination {
            name: "Canada",
            min_band: "6.0-7.0",
            universities: "100+ Partner Unis",
            visa_type: "Study Permit",
            scholarships: "Vanier, Trudeau",
        },
        Destination {
            name: "Australia",
            min_band: "6.5-7.0",
            universities: "120+ Partner Unis",
            visa_type: "Student Visa (500)",
            scholarships: "Australia Awards",
        },
        Destination {
            name: "United States",
            min_band: "6.5-7.5",
            universities: "200+ Partner Unis",
            visa_type: "F-1 Student Visa",
            scholarships: "Fulbright, Various",
        },
    ],
    stats: &[
        stat("Active Learners", "10,000+"),
        stat("Practice Questions", "500K+"),
        stat("Average Band Score", "8.5"),
        stat("Success Rate", "95%"),
    ],
    analytics: AnalyticsSample {
        overall: 6.5,
        reading: 7.0,
        writing: 6.0,
        listening: 6.5,
        speaking: 6.5,
        target: 7.5,
        streak: 12,
        tests_completed: 24,
        recent: &[
            Activity { date: "Today", test: "Reading Practice", score: 85 },
            Activity { date: "Yesterday", test: "Mock Test", score: 78 },
            Activity { date: "2 days ago", test: "Vocabulary Game", score: 92 },
            Activity { date: "3 days ago", test: "Listening Practice", score: 81 },
        ],
    },
};

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::band::is_valid_band;

    #[test]
    fn test_every_module_and_game_has_a_card() {
        let catalog = Catalog::get();
        for module in Module::ALL {
            assert!(catalog.module(module).is_some(), "{module}");
        }
        for game in GameType::ALL {
            assert!(catalog.game(game).is_some(), "{game}");
        }
    }

    #[test]
    fn test_module_cards_open_practice_pages() {
        let catalog = Catalog::get();
        assert_eq!(
            catalog.module(Module::Reading).unwrap().page(),
            Page::Practice
        );
        assert_eq!(
            catalog.module(Module::Speaking).unwrap().page(),
            Page::SpeakingPractice
        );
    }

    #[test]
    fn test_marketing_pages_are_public() {
        for page in Catalog::get().pages {
            assert!(!page.page.requires_auth(), "{}", page.page);
        }
    }

    #[test]
    fn test_sample_analytics_bands_are_valid() {
        let sample = Catalog::get().analytics;
        for (_, band) in sample.module_bands() {
            assert!(is_valid_band(band));
        }
        assert!(is_valid_band(sample.overall));
        assert!((sample.target_progress() - 86.666).abs() < 0.01);
    }

    #[test]
    fn test_catalog_serializes() {
        let json = serde_json::to_value(Catalog::get()).unwrap();
        assert_eq!(json["games"][1]["game"], "Grammar Battle");
        assert_eq!(json["games"][1]["difficulty"], "Medium");
        assert_eq!(json["modules"][0]["module"], "Reading");
        assert_eq!(json["mockTests"].as_array().unwrap().len(), 3);
        assert_eq!(json["analytics"]["testsCompleted"], 24);
        assert_eq!(json["pages"][2]["page"], "study-abroad");
    }
}
