//! Prompt and validation loops over stdin.
//!
//! # Responsibility
//! - Collect validated primitives for the core workflows.
//! - Provide an explicit cancel path: empty input (or EOF) cancels the
//!   surrounding operation instead of looping forever.

use chrono::NaiveDate;
use coursebook_core::{parse_course_date, Assignment, GradingPrompt};
use std::io::{self, BufRead, Write};

/// Reads one trimmed line. `None` means EOF.
pub fn read_raw_line(prompt: &str) -> Option<String> {
    print!("{prompt}");
    io::stdout().flush().ok()?;

    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line).ok()?;
    if read == 0 {
        return None;
    }

    Some(line.trim().to_string())
}

/// Reads one trimmed line. `None` means EOF or an empty (cancel) line.
pub fn read_line(prompt: &str) -> Option<String> {
    read_raw_line(prompt).filter(|line| !line.is_empty())
}

/// Single-shot positional selection; `None` on cancel or non-numeric input.
pub fn read_selection(prompt: &str) -> Option<usize> {
    let text = read_line(prompt)?;
    match text.parse::<usize>() {
        Ok(index) => Some(index),
        Err(_) => {
            println!("Invalid input");
            None
        }
    }
}

/// Re-prompts until a positive integer point value is entered.
pub fn read_point_value(prompt: &str) -> Option<u32> {
    loop {
        let text = read_line(prompt)?;
        match text.parse::<u32>() {
            Ok(value) if value > 0 => return Some(value),
            _ => println!("Invalid input"),
        }
    }
}

/// Re-prompts until awarded points satisfy `0 < points <= max`.
pub fn read_points_awarded(max: u32) -> Option<f64> {
    loop {
        let text = read_line("Enter points awarded: ")?;
        match text.parse::<f64>() {
            Ok(points) if points > 0.0 && points <= f64::from(max) => return Some(points),
            _ => println!("Invalid input"),
        }
    }
}

/// Re-prompts until a strict `YYYY-MM-DD` calendar date is entered.
pub fn read_date(prompt: &str) -> Option<NaiveDate> {
    loop {
        let text = read_line(prompt)?;
        match parse_course_date(&text) {
            Ok(date) => return Some(date),
            Err(err) => println!("{err}"),
        }
    }
}

/// Yes/no confirmation; anything but `y`/`yes` declines.
pub fn confirm(prompt: &str) -> bool {
    match read_line(prompt) {
        Some(answer) => matches!(answer.to_lowercase().as_str(), "y" | "yes"),
        None => false,
    }
}

/// Stdin-backed collaborator for the grading workflow.
pub struct StdinPrompt;

impl GradingPrompt for StdinPrompt {
    fn points_awarded(&mut self, assignment: &Assignment) -> Option<f64> {
        read_points_awarded(assignment.point_value)
    }

    fn submission_date(&mut self) -> Option<NaiveDate> {
        read_date("Enter date turned in (YYYY-MM-DD): ")
    }

    fn confirm_penalty(&mut self, days_late: i64, penalty_percent: u32) -> bool {
        confirm(&format!(
            "Assignment is {days_late} days late, impose {penalty_percent}% penalty? (y/n): "
        ))
    }

    fn confirm_overwrite(&mut self, previous_points: f64) -> bool {
        println!("This assignment has been previously graded.");
        println!("Points awarded: {previous_points}");
        confirm("Would you like to update? (y/n): ")
    }
}
