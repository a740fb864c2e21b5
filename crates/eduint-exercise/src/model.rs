//! Records exchanged with the content generator.
//!
//! Field names follow the JSON the generator asks the model to emit
//! (`camelCase`), so these types deserialize model output directly and
//! serialize back into the endpoint responses unchanged.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ============================================================================
// Module
// ============================================================================

/// IELTS practice module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Module {
    /// Academic reading passages (default).
    #[default]
    Reading,
    /// Essay structure and planning.
    Writing,
    /// Listening comprehension.
    Listening,
    /// Speaking strategy.
    Speaking,
}

impl Module {
    /// All modules in catalog order.
    pub const ALL: [Self; 4] = [Self::Reading, Self::Writing, Self::Listening, Self::Speaking];

    /// Parses a module name case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "reading" => Some(Self::Reading),
            "writing" => Some(Self::Writing),
            "listening" => Some(Self::Listening),
            "speaking" => Some(Self::Speaking),
            _ => None,
        }
    }

    /// Parses a module name, falling back to Reading.
    #[must_use]
    pub fn from_name_or_default(name: &str) -> Self {
        Self::from_name(name).unwrap_or_default()
    }

    /// Display name, as used in prompts and page titles.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Reading => "Reading",
            Self::Writing => "Writing",
            Self::Listening => "Listening",
            Self::Speaking => "Speaking",
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Module {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Module {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_name(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid module '{s}': expected one of 'Reading', 'Writing', 'Listening', 'Speaking'"
            ))
        })
    }
}

// ============================================================================
// Questions
// ============================================================================

/// Mock-test section a question belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Section {
    /// Reading comprehension.
    Reading,
    /// Listening scenario.
    Listening,
    /// Grammar.
    Grammar,
    /// Vocabulary.
    Vocabulary,
}

impl Section {
    /// Parses a section name case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "reading" => Some(Self::Reading),
            "listening" => Some(Self::Listening),
            "grammar" => Some(Self::Grammar),
            "vocabulary" => Some(Self::Vocabulary),
            _ => None,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Reading => "Reading",
            Self::Listening => "Listening",
            Self::Grammar => "Grammar",
            Self::Vocabulary => "Vocabulary",
        };
        f.write_str(s)
    }
}

/// Models sometimes echo the template literally ("Reading|Listening") or
/// invent a section; those are dropped rather than failing the whole test.
fn lenient_section<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Section>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Section::from_name))
}

/// A multiple-choice question.
///
/// Practice questions carry a passage (reading text, simulated transcript,
/// essay prompt or speaking topic); mock-test questions also carry a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Context shown above the question.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passage: Option<String>,

    /// The question text.
    pub question: String,

    /// Answer options, normally four.
    pub options: Vec<String>,

    /// Text of the correct option.
    pub correct: String,

    /// Mock-test section.
    #[serde(
        default,
        deserialize_with = "lenient_section",
        skip_serializing_if = "Option::is_none"
    )]
    pub section: Option<Section>,
}

impl Question {
    /// Creates a question without passage or section.
    #[must_use]
    pub fn new(question: impl Into<String>, options: Vec<String>, correct: impl Into<String>) -> Self {
        Self {
            passage: None,
            question: question.into(),
            options,
            correct: correct.into(),
            section: None,
        }
    }

    /// Attaches a passage.
    #[must_use]
    pub fn with_passage(mut self, passage: impl Into<String>) -> Self {
        self.passage = Some(passage.into());
        self
    }

    /// Attaches a section.
    #[must_use]
    pub const fn with_section(mut self, section: Section) -> Self {
        self.section = Some(section);
        self
    }

    /// Returns `true` if `option` is the correct answer.
    #[must_use]
    pub fn is_correct(&self, option: &str) -> bool {
        self.correct == option
    }

    /// Returns `true` if the question has options and its answer is among them.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        !self.options.is_empty() && self.options.iter().any(|o| o == &self.correct)
    }
}

// ============================================================================
// Games
// ============================================================================

/// Mini-game variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GameType {
    /// Match words with meanings (default).
    #[default]
    VocabularyRace,
    /// Fill the blank with the right grammar.
    GrammarBattle,
    /// Answer questions about a described audio clip.
    ListeningPuzzle,
    /// Quick reading questions.
    ReadingSprint,
}

impl GameType {
    /// All games in catalog order.
    pub const ALL: [Self; 4] = [
        Self::VocabularyRace,
        Self::GrammarBattle,
        Self::ListeningPuzzle,
        Self::ReadingSprint,
    ];

    /// Display name, which is also the wire name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::VocabularyRace => "Vocabulary Race",
            Self::GrammarBattle => "Grammar Battle",
            Self::ListeningPuzzle => "Listening Puzzle",
            Self::ReadingSprint => "Reading Sprint",
        }
    }

    /// Parses a game name, ignoring case, spaces, dashes and underscores.
    ///
    /// Accepts both "Grammar Battle" and "grammar-battle".
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let key: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "vocabularyrace" => Some(Self::VocabularyRace),
            "grammarbattle" => Some(Self::GrammarBattle),
            "listeningpuzzle" => Some(Self::ListeningPuzzle),
            "readingsprint" => Some(Self::ReadingSprint),
            _ => None,
        }
    }

    /// Parses a game name, falling back to Vocabulary Race.
    #[must_use]
    pub fn from_name_or_default(name: &str) -> Self {
        Self::from_name(name).unwrap_or_default()
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for GameType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for GameType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_name(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid game type '{s}': expected one of 'Vocabulary Race', 'Grammar Battle', 'Listening Puzzle', 'Reading Sprint'"
            ))
        })
    }
}

/// One round of a mini-game.
///
/// Exactly one of the prompt fields is expected, depending on the game.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameItem {
    /// Vocabulary Race: the word to define.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word: Option<String>,
    /// Grammar Battle: sentence with a blank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    /// Listening Puzzle: described audio.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    /// Reading Sprint: short passage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passage: Option<String>,
    /// Answer options.
    pub options: Vec<String>,
    /// Text of the correct option.
    pub correct: String,
}

impl GameItem {
    /// The text to show for this round.
    #[must_use]
    pub fn prompt(&self) -> &str {
        self.word
            .as_deref()
            .or(self.question.as_deref())
            .or(self.audio.as_deref())
            .or(self.passage.as_deref())
            .unwrap_or_default()
    }
}

// ============================================================================
// Listening
// ============================================================================

/// A listening scenario: the transcript to play and questions about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListeningContent {
    /// Conversation or monologue to be spoken aloud.
    pub transcript: String,
    /// Questions about the transcript.
    pub questions: Vec<Question>,
}

// ============================================================================
// Writing
// ============================================================================

/// Academic writing task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WritingTask {
    /// Describe a chart, table, map or process.
    Task1,
    /// Argumentative essay (default).
    #[default]
    Task2,
}

impl WritingTask {
    /// Parses "task1"/"task2"; anything else is Task 2.
    #[must_use]
    pub fn from_name_or_default(name: &str) -> Self {
        let key: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        if key == "task1" || key == "1" {
            Self::Task1
        } else {
            Self::Task2
        }
    }

    /// Minutes allowed when the generated topic omits them.
    #[must_use]
    pub const fn default_time_limit(&self) -> u32 {
        match self {
            Self::Task1 => 20,
            Self::Task2 => 40,
        }
    }

    /// Minimum words when the generated topic omits them.
    #[must_use]
    pub const fn default_word_limit(&self) -> u32 {
        match self {
            Self::Task1 => 150,
            Self::Task2 => 250,
        }
    }

    /// Wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Task1 => "task1",
            Self::Task2 => "task2",
        }
    }
}

impl fmt::Display for WritingTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Task1 => f.write_str("Task 1"),
            Self::Task2 => f.write_str("Task 2"),
        }
    }
}

/// Accepts the spellings models produce ("task1", "Task 1"); unknown or null
/// values are Task 2.
impl<'de> Deserialize<'de> for WritingTask {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map_or_else(Self::default, |s| Self::from_name_or_default(&s)))
    }
}

/// A generated writing prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WritingTopic {
    /// Which task this topic is for.
    #[serde(default)]
    pub task_type: WritingTask,
    /// The prompt itself.
    pub topic: String,
    /// Instructions shown under the prompt.
    #[serde(default)]
    pub instructions: String,
    /// Minutes allowed.
    #[serde(default)]
    pub time_limit: u32,
    /// Minimum words.
    #[serde(default)]
    pub word_limit: u32,
}

impl WritingTopic {
    /// Forces the requested task and fills limits the model left out.
    #[must_use]
    pub fn normalized(mut self, task: WritingTask) -> Self {
        self.task_type = task;
        if self.time_limit == 0 {
            self.time_limit = task.default_time_limit();
        }
        if self.word_limit == 0 {
            self.word_limit = task.default_word_limit();
        }
        self
    }
}

// ============================================================================
// Speaking
// ============================================================================

/// Part of the speaking test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeakingPart {
    /// Familiar-topic interview (default).
    #[default]
    Part1,
    /// Cue card long turn.
    Part2,
    /// Abstract discussion.
    Part3,
}

impl SpeakingPart {
    /// All parts in order.
    pub const ALL: [Self; 3] = [Self::Part1, Self::Part2, Self::Part3];

    /// Parses "part1"/"part2"; anything else is Part 3.
    #[must_use]
    pub fn from_name_or_default(name: &str) -> Self {
        let key: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "part1" | "1" => Self::Part1,
            "part2" | "2" => Self::Part2,
            _ => Self::Part3,
        }
    }

    /// Wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Part1 => "part1",
            Self::Part2 => "part2",
            Self::Part3 => "part3",
        }
    }
}

impl fmt::Display for SpeakingPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Part1 => f.write_str("Part 1"),
            Self::Part2 => f.write_str("Part 2"),
            Self::Part3 => f.write_str("Part 3"),
        }
    }
}

impl<'de> Deserialize<'de> for SpeakingPart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map_or_else(Self::default, |s| Self::from_name_or_default(&s)))
    }
}

/// A generated speaking topic.
///
/// Parts 1 and 3 carry `questions`; part 2 carries cue-card `prompts` and a
/// preparation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakingTopic {
    /// Which part this topic is for.
    #[serde(default)]
    pub part: SpeakingPart,
    /// Topic title or cue card heading.
    pub topic: String,
    /// Interview questions (parts 1 and 3).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<String>,
    /// Cue card bullet points (part 2).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prompts: Vec<String>,
    /// Minutes to speak.
    #[serde(default)]
    pub time_limit: u32,
    /// Minutes to prepare (part 2).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preparation_time: Option<u32>,
    /// Instructions for the candidate.
    #[serde(default)]
    pub instructions: String,
}

// ============================================================================
// Evaluations
// ============================================================================

/// Band and feedback for one assessment criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    /// Band for this criterion.
    pub score: f64,
    /// Examiner feedback.
    #[serde(default)]
    pub feedback: String,
}

/// Examiner-style assessment of an essay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WritingEvaluation {
    /// Overall band.
    pub overall_band: f64,
    /// Task achievement / response.
    pub task_achievement: CriterionScore,
    /// Coherence and cohesion.
    pub coherence_cohesion: CriterionScore,
    /// Lexical resource.
    pub lexical_resource: CriterionScore,
    /// Grammatical range and accuracy.
    pub grammatical_range: CriterionScore,
    /// What went well.
    #[serde(default)]
    pub strengths: Vec<String>,
    /// What to work on.
    #[serde(default)]
    pub improvements: Vec<String>,
    /// Words in the submitted essay.
    #[serde(default)]
    pub word_count: usize,
}

impl WritingEvaluation {
    /// Criterion scores with their display labels.
    #[must_use]
    pub fn criteria(&self) -> [(&'static str, &CriterionScore); 4] {
        [
            ("Task Achievement", &self.task_achievement),
            ("Coherence & Cohesion", &self.coherence_cohesion),
            ("Lexical Resource", &self.lexical_resource),
            ("Grammatical Range", &self.grammatical_range),
        ]
    }
}

/// Examiner-style assessment of a spoken response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakingEvaluation {
    /// Overall band.
    pub overall_band: f64,
    /// Fluency and coherence.
    pub fluency_coherence: CriterionScore,
    /// Lexical resource.
    pub lexical_resource: CriterionScore,
    /// Grammatical range and accuracy.
    pub grammatical_range: CriterionScore,
    /// Pronunciation (judged from the transcript).
    pub pronunciation: CriterionScore,
    /// What went well.
    #[serde(default)]
    pub strengths: Vec<String>,
    /// What to work on.
    #[serde(default)]
    pub improvements: Vec<String>,
    /// Estimated speaking duration, free text.
    #[serde(default)]
    pub duration: String,
}

impl SpeakingEvaluation {
    /// Criterion scores with their display labels.
    #[must_use]
    pub fn criteria(&self) -> [(&'static str, &CriterionScore); 4] {
        [
            ("Fluency & Coherence", &self.fluency_coherence),
            ("Lexical Resource", &self.lexical_resource),
            ("Grammatical Range", &self.grammatical_range),
            ("Pronunciation", &self.pronunciation),
        ]
    }
}

/// Counts whitespace-separated words.
///
/// # Examples
///
/// ```
/// use eduint_exercise::word_count;
///
/// assert_eq!(word_count("  Cities are   growing.\nFast. "), 4);
/// assert_eq!(word_count("   "), 0);
/// ```
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
