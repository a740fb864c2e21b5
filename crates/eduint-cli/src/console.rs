//! Line-oriented terminal input and exercise rendering.

use std::io::Write;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use eduint_exercise::{format_clock, GameItem, Question};

/// Learner input read from stdin.
pub struct Console {
    lines: Lines<BufReader<Stdin>>,
}

impl Console {
    /// Attaches to stdin.
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Next line with surrounding whitespace removed; `None` at end of input.
    ///
    /// Cancel safe, so it can sit in a `select!` next to a countdown.
    pub async fn next_line(&mut self) -> anyhow::Result<Option<String>> {
        let line = self
            .lines
            .next_line()
            .await
            .context("Failed to read from stdin")?;
        Ok(line.map(|l| l.trim().to_string()))
    }

    /// Prints `label` and reads one answer.
    pub async fn ask(&mut self, label: &str) -> anyhow::Result<Option<String>> {
        print!("{label}: ");
        std::io::stdout().flush().context("Failed to write to stdout")?;
        self.next_line().await
    }
}

/// Letter shown next to option `index`.
pub fn option_label(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .and_then(|i| b'A'.checked_add(i))
        .map_or('?', char::from)
}

/// Resolves learner input to one of `options`.
///
/// Accepts the option letter ("b"), its number ("2") or the option text.
pub fn resolve_option<'a>(input: &str, options: &'a [String]) -> Option<&'a str> {
    let input = input.trim();
    let index = match input.len() {
        1 => input.chars().next().and_then(|c| {
            if c.is_ascii_alphabetic() {
                u8::try_from(c.to_ascii_uppercase())
                    .ok()
                    .map(|b| usize::from(b - b'A'))
            } else {
                c.to_digit(10)
                    .and_then(|d| usize::try_from(d).ok())
                    .and_then(|d| d.checked_sub(1))
            }
        }),
        _ => None,
    };
    index
        .and_then(|i| options.get(i))
        .or_else(|| options.iter().find(|o| o.eq_ignore_ascii_case(input)))
        .map(String::as_str)
}

/// Renders a quiz question with lettered options.
pub fn render_question(number: usize, total: usize, question: &Question, selected: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(passage) = question.passage.as_deref().filter(|p| !p.is_empty()) {
        out.push_str(passage);
        out.push_str("\n\n");
    }
    out.push_str(&format!("Question {number} of {total}\n{}\n", question.question));
    for (i, option) in question.options.iter().enumerate() {
        let marker = if selected == Some(option.as_str()) { '*' } else { ' ' };
        out.push_str(&format!("{marker} {}) {option}\n", option_label(i)));
    }
    out
}

/// Renders a game round.
pub fn render_round(round: usize, rounds: usize, item: &GameItem, time_left: u32, score: u32) -> String {
    let mut out = format!(
        "Round {round}/{rounds}  Score: {score}  Time: {}\n",
        format_clock(time_left)
    );
    let prompt = item.prompt();
    if let Some(passage) = item.passage.as_deref().filter(|p| !p.is_empty() && *p != prompt) {
        out.push_str(passage);
        out.push('\n');
    }
    out.push_str(prompt);
    out.push('\n');
    for (i, option) in item.options.iter().enumerate() {
        out.push_str(&format!("  {}) {option}\n", option_label(i)));
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn options() -> Vec<String> {
        vec!["glad".into(), "sad".into(), "late".into(), "tall".into()]
    }

    #[test]
    fn test_option_labels() {
        assert_eq!(option_label(0), 'A');
        assert_eq!(option_label(3), 'D');
    }

    #[test]
    fn test_resolve_option_by_letter_number_and_text() {
        let opts = options();
        assert_eq!(resolve_option("b", &opts), Some("sad"));
        assert_eq!(resolve_option("D", &opts), Some("tall"));
        assert_eq!(resolve_option("3", &opts), Some("late"));
        assert_eq!(resolve_option("Glad", &opts), Some("glad"));
        assert_eq!(resolve_option("0", &opts), None);
        assert_eq!(resolve_option("z", &opts), None);
        assert_eq!(resolve_option("happy", &opts), None);
    }

    #[test]
    fn test_render_question_marks_selection() {
        let q = Question::new("Which word means 'happy'?", options(), "glad");
        let text = render_question(1, 5, &q, Some("sad"));
        assert!(text.starts_with("Question 1 of 5\nWhich word means 'happy'?\n"));
        assert!(text.contains("  A) glad\n"));
        assert!(text.contains("* B) sad\n"));
    }

    #[test]
    fn test_render_round() {
        let item = GameItem {
            word: Some("Ubiquitous".to_string()),
            options: options(),
            correct: "glad".to_string(),
            ..GameItem::default()
        };
        let text = render_round(2, 3, &item, 27, 380);
        assert!(text.starts_with("Round 2/3  Score: 380  Time: 0:27\nUbiquitous\n"));
    }
}
