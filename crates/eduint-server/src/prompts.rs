//! Prompt templates for the generation endpoints.
//!
//! Each endpoint sends one system message describing the JSON shape to emit
//! and one user message with the concrete request. Generation prompts embed a
//! millisecond timestamp so repeated calls ask for fresh material.

use eduint_exercise::{GameType, Module, SpeakingPart, WritingTask};

/// Number of questions in a generated mock test.
pub const MOCK_TEST_QUESTIONS: u32 = 15;

/// Number of questions generated for a listening scenario.
pub const LISTENING_QUESTIONS: u32 = 5;

/// A system/user message pair for one gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Instructions and output shape.
    pub system: String,
    /// The concrete request.
    pub user: String,
}

const QUESTION_SHAPE: &str = r#"[
  {
    "passage": "%PASSAGE%",
    "question": "%QUESTION%",
    "options": ["option1", "option2", "option3", "option4"],
    "correct": "exact matching option text"
  }
]"#;

fn question_shape(passage: &str, question: &str) -> String {
    QUESTION_SHAPE
        .replace("%PASSAGE%", passage)
        .replace("%QUESTION%", question)
}

// ============================================================================
// Practice and mock test
// ============================================================================

/// Prompt for `count` practice questions in `module`.
#[must_use]
pub fn practice_questions(module: Module, count: u32) -> Prompt {
    let (role, items, shape) = match module {
        Module::Reading => (
            "an IELTS Academic Reading test generator",
            "- A realistic passage (100-150 words) on academic topics\n- A clear question about the passage",
            question_shape("passage text here", "question text here"),
        ),
        Module::Listening => (
            "an IELTS Listening test generator",
            "- A simulated audio transcript/description\n- A clear question",
            question_shape("You would hear: 'transcript here'", "question text here"),
        ),
        Module::Writing => (
            "an IELTS Writing task analyzer",
            "- A realistic IELTS writing prompt\n- A question about approach/structure",
            question_shape("Essay prompt: prompt text here", "question about structure/approach"),
        ),
        Module::Speaking => (
            "an IELTS Speaking test generator",
            "- A speaking topic/prompt\n- A question about response strategy",
            question_shape("Topic: topic description", "question about response strategy"),
        ),
    };

    Prompt {
        system: format!(
            "You are {role}. Generate {count} unique {module} questions. Each question should include:\n\
             {items}\n\
             - 4 multiple choice options\n\
             - The correct answer\n\n\
             Return ONLY valid JSON array format:\n{shape}"
        ),
        user: format!(
            "Generate {count} unique {module} practice questions for IELTS. Make them varied and realistic. \
             Return only the JSON array, no additional text."
        ),
    }
}

/// Prompt for a full mock test.
#[must_use]
pub fn mock_test(timestamp: i64) -> Prompt {
    Prompt {
        system: format!(
            "You are an IELTS Academic test creator. Generate a COMPLETELY UNIQUE and VARIED mock test with \
             {MOCK_TEST_QUESTIONS} questions.\n\n\
             CRITICAL: Create FRESH, ORIGINAL content every time. Never repeat topics, passages, or questions.\n\n\
             Rotate topics across science and technology, society and culture, environment, education, \
             health, arts and humanities, and economics.\n\n\
             Generate {MOCK_TEST_QUESTIONS} questions distributed as:\n\
             - 5 Reading comprehension with diverse academic passages (120-160 words each)\n\
             - 3 Listening scenario descriptions (announcements, lectures, interviews)\n\
             - 4 Grammar questions (conditionals, passive voice, reported speech, relative clauses, articles)\n\
             - 3 Vocabulary questions (academic word list, collocations, phrasal verbs, synonyms)\n\n\
             Return ONLY valid JSON array:\n\
             [\n  {{\n    \"section\": \"Reading|Listening|Grammar|Vocabulary\",\n    \
             \"passage\": \"engaging passage with specific facts and details\",\n    \
             \"question\": \"clear, exam-style question\",\n    \
             \"options\": [\"option1\", \"option2\", \"option3\", \"option4\"],\n    \
             \"correct\": \"exact matching option text\"\n  }}\n]"
        ),
        user: format!(
            "Generate a unique IELTS Academic test NOW at {timestamp}. Make it completely different from any \
             previous test. Use fresh topics and scenarios. Return only the JSON array."
        ),
    }
}

// ============================================================================
// Games
// ============================================================================

/// Prompt for `count` rounds of `game`.
#[must_use]
pub fn game_content(game: GameType, count: u32) -> Prompt {
    let (items, field, example) = match game {
        GameType::VocabularyRace => (
            "- A challenging English word (IELTS level)\n- 4 multiple choice options with synonyms/meanings",
            "word",
            "word here",
        ),
        GameType::GrammarBattle => (
            "- A sentence with a blank to fill\n- 4 grammar options",
            "question",
            "sentence with blank ___",
        ),
        GameType::ListeningPuzzle => (
            "- A simulated audio transcript scenario\n- A clear question about what was heard\n- 4 multiple choice options",
            "audio",
            "Audio transcript description",
        ),
        GameType::ReadingSprint => (
            "- A short passage or fact\n- 4 multiple choice options",
            "passage",
            "passage text here",
        ),
    };

    Prompt {
        system: format!(
            "Generate {count} unique {game} items for IELTS preparation. Each should include:\n\
             {items}\n\
             - The correct answer\n\n\
             Return ONLY valid JSON array format:\n\
             [\n  {{\n    \"{field}\": \"{example}\",\n    \
             \"options\": [\"option1\", \"option2\", \"option3\", \"option4\"],\n    \
             \"correct\": \"exact matching option\"\n  }}\n]"
        ),
        user: format!(
            "Generate {count} unique {game} game items. Make them varied and realistic for IELTS preparation. \
             Return only the JSON array, no additional text."
        ),
    }
}

// ============================================================================
// Listening
// ============================================================================

/// Prompt for a listening scenario with questions.
#[must_use]
pub fn listening_content(timestamp: i64) -> Prompt {
    Prompt {
        system: format!(
            "Generate a COMPLETELY UNIQUE IELTS Listening test scenario with transcript and questions.\n\n\
             CRITICAL: Create FRESH, ORIGINAL content every time. Never repeat scenarios, topics, or contexts.\n\n\
             Rotate through university contexts, travel and tourism, social situations, workplace, \
             services and short academic lectures.\n\n\
             Use natural, conversational English with specific names, dates, locations, numbers and prices \
             that listeners must catch.\n\n\
             Return ONLY valid JSON:\n\
             {{\n  \"transcript\": \"Natural 220-280 word conversation or monologue with specific details\",\n  \
             \"questions\": [\n    {{\n      \"question\": \"Clear question testing specific information from transcript\",\n      \
             \"options\": [\"Option A\", \"Option B\", \"Option C\", \"Option D\"],\n      \
             \"correct\": \"Exact matching correct option\"\n    }}\n  ]\n}}\n\n\
             Generate {LISTENING_QUESTIONS} varied questions testing: main ideas, specific details, \
             speaker's opinion, purpose, and inference."
        ),
        user: format!(
            "Generate a unique IELTS Listening scenario RIGHT NOW at {timestamp}. Make it completely different \
             from any previous scenario. Use a fresh context and topic. Return only valid JSON."
        ),
    }
}

// ============================================================================
// Writing
// ============================================================================

/// Prompt for a writing topic.
#[must_use]
pub fn writing_topic(task: WritingTask, timestamp: i64) -> Prompt {
    let guidance = match task {
        WritingTask::Task1 => {
            "Rotate through line graphs, bar charts, pie charts, tables, process diagrams and maps. \
             The topic must describe specific data points, time periods and measurements."
        }
        WritingTask::Task2 => {
            "Rotate through education, technology, environment, society, health, arts, government and work. \
             Alternate question types: opinion, discussion, advantages/disadvantages, problem/solution and two-part."
        }
    };
    let instructions = match task {
        WritingTask::Task1 => {
            "Summarize the information by selecting and reporting the main features, and make comparisons where relevant."
        }
        WritingTask::Task2 => {
            "Write an essay giving your opinion and supporting it with relevant examples."
        }
    };
    let time_limit = task.default_time_limit();
    let word_limit = task.default_word_limit();
    let wire = task.as_str();

    Prompt {
        system: format!(
            "Generate a COMPLETELY UNIQUE IELTS Academic Writing {task} topic.\n\n\
             CRITICAL: Create FRESH content every single time.\n\n\
             {guidance}\n\n\
             Return ONLY valid JSON:\n\
             {{\n  \"taskType\": \"{wire}\",\n  \"topic\": \"...\",\n  \
             \"instructions\": \"{instructions} Write at least {word_limit} words.\",\n  \
             \"timeLimit\": {time_limit},\n  \"wordLimit\": {word_limit}\n}}"
        ),
        user: format!(
            "Generate a unique IELTS Writing {task} topic RIGHT NOW at {timestamp}. Make it completely different \
             from any previous topic. Use fresh angles and perspectives. Return only valid JSON."
        ),
    }
}

/// Prompt for assessing an essay.
#[must_use]
pub fn evaluate_writing(task: WritingTask, topic: &str, essay: &str, word_count: usize) -> Prompt {
    Prompt {
        system: format!(
            "You are an expert IELTS examiner. Evaluate this IELTS Academic Writing {task} essay according to \
             official IELTS criteria.\n\n\
             Return ONLY a valid JSON object with this exact structure:\n\
             {{\n  \"overallBand\": 7.5,\n  \
             \"taskAchievement\": {{ \"score\": 7.5, \"feedback\": \"How well the task requirements were met\" }},\n  \
             \"coherenceCohesion\": {{ \"score\": 7.5, \"feedback\": \"Organization, paragraphing, and linking devices\" }},\n  \
             \"lexicalResource\": {{ \"score\": 7.5, \"feedback\": \"Vocabulary range, accuracy, and appropriateness\" }},\n  \
             \"grammaticalRange\": {{ \"score\": 7.5, \"feedback\": \"Grammar variety, accuracy, and complexity\" }},\n  \
             \"strengths\": [\"Strength 1\", \"Strength 2\", \"Strength 3\"],\n  \
             \"improvements\": [\"Area for improvement 1\", \"Area for improvement 2\"],\n  \
             \"wordCount\": {word_count}\n}}\n\n\
             Use band scores from 0 to 9 in 0.5 increments. Be specific and constructive in feedback."
        ),
        user: format!("Topic: {topic}\n\nStudent's Essay:\n{essay}\n\nEvaluate this essay now."),
    }
}

// ============================================================================
// Speaking
// ============================================================================

/// Prompt for a speaking topic.
#[must_use]
pub fn speaking_topic(part: SpeakingPart, timestamp: i64) -> Prompt {
    let system = match part {
        SpeakingPart::Part1 => {
            "Generate a UNIQUE and VARIED IELTS Speaking Part 1 topic. Return ONLY a valid JSON object:\n\
             {\n  \"part\": \"part1\",\n  \"topic\": \"Topic name\",\n  \
             \"questions\": [\"Question 1?\", \"Question 2?\", \"Question 3?\", \"Question 4?\"],\n  \
             \"timeLimit\": 5,\n  \"instructions\": \"Answer questions about familiar topics\"\n}\n\n\
             Choose a familiar topic such as hometown, family, work, hobbies, food, technology, travel, \
             music, health or celebrations. Generate 4 simple, personal questions about it."
        }
        SpeakingPart::Part2 => {
            "Generate a UNIQUE and VARIED IELTS Speaking Part 2 cue card. Return ONLY a valid JSON object:\n\
             {\n  \"part\": \"part2\",\n  \"topic\": \"Describe...\",\n  \
             \"prompts\": [\"You should say:\", \"- Point 1\", \"- Point 2\", \"- Point 3\", \"And explain...\"],\n  \
             \"timeLimit\": 2,\n  \"preparationTime\": 1,\n  \
             \"instructions\": \"You have 1 minute to prepare. Speak for 2 minutes.\"\n}\n\n\
             Choose a person, place, object, event, skill, decision, piece of media or time period, \
             and write specific bullet points for it."
        }
        SpeakingPart::Part3 => {
            "Generate UNIQUE and VARIED IELTS Speaking Part 3 discussion questions. Return ONLY a valid JSON object:\n\
             {\n  \"part\": \"part3\",\n  \"topic\": \"Abstract discussion topic\",\n  \
             \"questions\": [\"Deep question 1?\", \"Deep question 2?\", \"Deep question 3?\"],\n  \
             \"timeLimit\": 5,\n  \"instructions\": \"Discuss abstract ideas and give detailed opinions\"\n}\n\n\
             Choose an abstract theme such as technology and society, education systems, sustainability, \
             globalization or media influence. Generate 3 thought-provoking, analytical questions."
        }
    };

    Prompt {
        system: system.to_string(),
        user: format!(
            "Generate unique IELTS Speaking {} content now. Timestamp: {timestamp}. \
             Make it completely different from previous generations.",
            part.as_str()
        ),
    }
}

/// Prompt for assessing a spoken response from its transcript.
#[must_use]
pub fn evaluate_speaking(part: SpeakingPart, topic: &str, transcript: &str) -> Prompt {
    Prompt {
        system: format!(
            "You are an expert IELTS Speaking examiner. Evaluate this IELTS Speaking {part} response from its \
             transcript according to official IELTS criteria. Judge pronunciation from word choice and \
             transcription quality.\n\n\
             Return ONLY a valid JSON object with this exact structure:\n\
             {{\n  \"overallBand\": 7.0,\n  \
             \"fluencyCoherence\": {{ \"score\": 7.0, \"feedback\": \"Flow, hesitation, and logical sequencing\" }},\n  \
             \"lexicalResource\": {{ \"score\": 7.0, \"feedback\": \"Vocabulary range and precision\" }},\n  \
             \"grammaticalRange\": {{ \"score\": 7.0, \"feedback\": \"Grammar variety and accuracy\" }},\n  \
             \"pronunciation\": {{ \"score\": 7.0, \"feedback\": \"Clarity and intelligibility\" }},\n  \
             \"strengths\": [\"Strength 1\", \"Strength 2\"],\n  \
             \"improvements\": [\"Area for improvement 1\", \"Area for improvement 2\"],\n  \
             \"duration\": \"Estimated speaking time, e.g. 1 minute 40 seconds\"\n}}\n\n\
             Use band scores from 0 to 9 in 0.5 increments. Be specific and constructive in feedback."
        ),
        user: format!("Topic: {topic}\n\nCandidate's Response:\n{transcript}\n\nEvaluate this response now."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_practice_prompt_embeds_count_and_module() {
        let prompt = practice_questions(Module::Listening, 7);
        assert!(prompt.system.contains("Generate 7 unique Listening questions"));
        assert!(prompt.system.contains("You would hear:"));
        assert!(prompt.user.starts_with("Generate 7 unique Listening practice questions"));
    }

    #[test]
    fn test_each_module_has_its_own_template() {
        let systems: Vec<String> = Module::ALL
            .iter()
            .map(|m| practice_questions(*m, 5).system)
            .collect();
        for (i, a) in systems.iter().enumerate() {
            for b in &systems[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_mock_test_prompt_has_distribution_and_timestamp() {
        let prompt = mock_test(1_700_000_000_000);
        assert!(prompt.system.contains("with 15 questions"));
        assert!(prompt.system.contains("5 Reading"));
        assert!(prompt.system.contains("3 Vocabulary"));
        assert!(prompt.user.contains("1700000000000"));
    }

    #[test]
    fn test_game_prompt_names_the_prompt_field() {
        let prompt = game_content(GameType::ListeningPuzzle, 3);
        assert!(prompt.system.contains(r#""audio": "Audio transcript description""#));
        assert!(prompt.user.contains("3 unique Listening Puzzle game items"));

        let prompt = game_content(GameType::GrammarBattle, 4);
        assert!(prompt.system.contains(r#""question": "sentence with blank ___""#));
    }

    #[test]
    fn test_writing_topic_prompt_uses_task_limits() {
        let prompt = writing_topic(WritingTask::Task1, 42);
        assert!(prompt.system.contains(r#""taskType": "task1""#));
        assert!(prompt.system.contains(r#""timeLimit": 20"#));
        assert!(prompt.system.contains(r#""wordLimit": 150"#));
        assert!(prompt.user.contains("Writing Task 1 topic RIGHT NOW at 42"));

        let prompt = writing_topic(WritingTask::Task2, 42);
        assert!(prompt.system.contains("Write at least 250 words."));
    }

    #[test]
    fn test_evaluate_writing_user_message() {
        let prompt = evaluate_writing(WritingTask::Task2, "Cities", "My essay.", 2);
        assert_eq!(
            prompt.user,
            "Topic: Cities\n\nStudent's Essay:\nMy essay.\n\nEvaluate this essay now."
        );
        assert!(prompt.system.contains(r#""wordCount": 2"#));
        assert!(prompt.system.contains("Writing Task 2 essay"));
    }

    #[test]
    fn test_speaking_prompts_per_part() {
        assert!(speaking_topic(SpeakingPart::Part1, 1).system.contains("4 simple, personal questions"));
        assert!(speaking_topic(SpeakingPart::Part2, 1).system.contains(r#""preparationTime": 1"#));
        let part3 = speaking_topic(SpeakingPart::Part3, 9);
        assert!(part3.system.contains(r#""part": "part3""#));
        assert!(part3.user.contains("Speaking part3 content now. Timestamp: 9."));
    }

    #[test]
    fn test_evaluate_speaking_prompt() {
        let prompt = evaluate_speaking(SpeakingPart::Part2, "A journey", "I went to Rome ");
        assert!(prompt.system.contains("Speaking Part 2 response"));
        assert!(prompt.system.contains(r#""pronunciation""#));
        assert!(prompt.user.contains("Candidate's Response:\nI went to Rome "));
    }
}
