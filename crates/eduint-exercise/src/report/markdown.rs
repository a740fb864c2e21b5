//! Markdown rendering of results.
//!
//! The learner CLI prints this after every exercise. Layout:
//!
//! - Title and summary table (exercise, duration, score or band)
//! - Question review for quizzes, criterion table for evaluations
//! - Strengths and improvements for evaluations
//! - Footer with the completion time

use chrono::{DateTime, Utc};
use std::fmt::Write;

use super::{Outcome, ResultsReport};
use crate::band::ScoreSummary;
use crate::model::CriterionScore;
use crate::quiz::ReviewItem;

/// Renders a [`ResultsReport`] as Markdown.
pub struct MarkdownGenerator<'a> {
    report: &'a ResultsReport,
}

impl<'a> MarkdownGenerator<'a> {
    /// Creates a generator for `report`.
    #[must_use]
    pub const fn new(report: &'a ResultsReport) -> Self {
        Self { report }
    }

    /// Renders the whole report.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();

        self.write_title(&mut output);
        self.write_summary(&mut output);
        self.write_details(&mut output);
        self.write_footer(&mut output);

        output
    }

    fn write_title(&self, output: &mut String) {
        let _ = writeln!(
            output,
            "# {} Results\n",
            escape_markdown(&self.report.title)
        );
    }

    fn write_summary(&self, output: &mut String) {
        let _ = writeln!(output, "| Metric | Value |");
        let _ = writeln!(output, "|--------|-------|");
        let _ = writeln!(output, "| Exercise | {} |", self.report.kind);
        let _ = writeln!(
            output,
            "| Duration | {} |",
            format_duration(self.report.duration_seconds)
        );

        match &self.report.outcome {
            Outcome::Quiz { summary, .. } => Self::write_score_rows(output, summary),
            Outcome::Game(result) => {
                let _ = writeln!(output, "| Score | {} points |", result.score);
                let _ = writeln!(
                    output,
                    "| Rounds Won | {}/{} |",
                    result.rounds_won, result.rounds
                );
            }
            Outcome::Writing(eval) => {
                let _ = writeln!(output, "| Overall Band | {:.1} |", eval.overall_band);
                let _ = writeln!(output, "| Word Count | {} |", eval.word_count);
            }
            Outcome::Speaking(eval) => {
                let _ = writeln!(output, "| Overall Band | {:.1} |", eval.overall_band);
                if !eval.duration.is_empty() {
                    let _ = writeln!(
                        output,
                        "| Speaking Time | {} |",
                        escape_markdown(&eval.duration)
                    );
                }
            }
        }
        let _ = writeln!(output);
    }

    fn write_score_rows(output: &mut String, summary: &ScoreSummary) {
        let _ = writeln!(
            output,
            "| Score | {}/{} ({}%) |",
            summary.correct, summary.total, summary.percentage
        );
        let _ = writeln!(output, "| Estimated Band | {:.1} |", summary.band);
    }

    fn write_details(&self, output: &mut String) {
        match &self.report.outcome {
            Outcome::Quiz { review, .. } => Self::write_review(output, review),
            Outcome::Game(_) => {}
            Outcome::Writing(eval) => {
                Self::write_criteria(output, &eval.criteria());
                Self::write_feedback(output, &eval.strengths, &eval.improvements);
            }
            Outcome::Speaking(eval) => {
                Self::write_criteria(output, &eval.criteria());
                Self::write_feedback(output, &eval.strengths, &eval.improvements);
            }
        }
    }

    fn write_review(output: &mut String, review: &[ReviewItem]) {
        if review.is_empty() {
            return;
        }
        let _ = writeln!(output, "## Review\n");
        let _ = writeln!(output, "| # | Question | Your Answer | Correct Answer | |");
        let _ = writeln!(output, "|---|----------|-------------|----------------|---|");
        for item in review {
            let mark = if item.is_correct { "✓" } else { "✗" };
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} | {} |",
                item.number,
                escape_markdown(&item.question),
                item.given.as_deref().map_or_else(|| "-".to_string(), escape_markdown),
                escape_markdown(&item.correct),
                mark
            );
        }
        let _ = writeln!(output);
    }

    fn write_criteria(output: &mut String, criteria: &[(&str, &CriterionScore)]) {
        let _ = writeln!(output, "## Criteria\n");
        let _ = writeln!(output, "| Criterion | Band | Feedback |");
        let _ = writeln!(output, "|-----------|------|----------|");
        for (label, criterion) in criteria {
            let _ = writeln!(
                output,
                "| {} | {:.1} | {} |",
                label,
                criterion.score,
                escape_markdown(&criterion.feedback)
            );
        }
        let _ = writeln!(output);
    }

    fn write_feedback(output: &mut String, strengths: &[String], improvements: &[String]) {
        if !strengths.is_empty() {
            let _ = writeln!(output, "## Strengths\n");
            for s in strengths {
                let _ = writeln!(output, "- {s}");
            }
            let _ = writeln!(output);
        }
        if !improvements.is_empty() {
            let _ = writeln!(output, "## Areas for Improvement\n");
            for s in improvements {
                let _ = writeln!(output, "- {s}");
            }
            let _ = writeln!(output);
        }
    }

    fn write_footer(&self, output: &mut String) {
        let _ = writeln!(output, "---\n");
        let _ = writeln!(
            output,
            "*Completed {}*",
            format_timestamp(&self.report.completed_at)
        );
    }
}

/// Formats seconds as e.g. "1m 5s".
fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if secs > 0 || parts.is_empty() {
        parts.push(format!("{secs}s"));
    }
    parts.join(" ")
}

fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Escapes characters that would break table cells or add formatting.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '*' | '_' | '`' | '#' | '[' | ']' | '\\' | '<' | '>' | '|' => {
                result.push('\\');
                result.push(ch);
            }
            '\n' => result.push_str("<br>"),
            _ => result.push(ch),
        }
    }
    result
}
