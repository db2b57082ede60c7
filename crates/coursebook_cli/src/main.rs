//! Interactive console front-end for the Coursebook grade tracker.
//!
//! # Responsibility
//! - Bootstrap logging and the course database.
//! - Drive the main menu loop and delegate every decision to core services.
//!
//! # Invariants
//! - No error is fatal: every failed operation prints a warning and returns
//!   control to the menu.

mod input;
mod render;

use coursebook_core::db::open_db;
use coursebook_core::{
    default_log_level, init_logging, Course, GradeOutcome, GradingError, GradingService,
    LatePolicy, RosterService, SqliteAssignmentRepository, SqliteGradeRepository,
    SqliteStudentRepository,
};
use log::info;
use std::error::Error;

type Roster<'conn> = RosterService<
    SqliteStudentRepository<'conn>,
    SqliteAssignmentRepository<'conn>,
    SqliteGradeRepository<'conn>,
>;
type Grading<'conn> =
    GradingService<SqliteGradeRepository<'conn>, SqliteStudentRepository<'conn>>;

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let db_path = env_or("COURSEBOOK_DB", "coursebook.db");
    let course_name = env_or("COURSEBOOK_COURSE", "CSCI3771");
    let log_dir = env_or("COURSEBOOK_LOG_DIR", "./logs");

    if let Err(message) = init_logging(default_log_level(), &log_dir) {
        eprintln!("warning: logging disabled: {message}");
    }

    let conn = open_db(&db_path)?;
    let roster: Roster<'_> = RosterService::new(
        SqliteStudentRepository::new(&conn, course_name.as_str()),
        SqliteAssignmentRepository::new(&conn, course_name.as_str()),
        SqliteGradeRepository::new(&conn, course_name.as_str()),
    );
    let grading: Grading<'_> = GradingService::new(
        SqliteGradeRepository::new(&conn, course_name.as_str()),
        SqliteStudentRepository::new(&conn, course_name.as_str()),
        LatePolicy::default(),
    );

    let mut course = roster.load_course(&course_name)?;
    info!("event=cli_start module=cli status=ok course={course_name}");

    loop {
        render::main_menu();
        let Some(choice) = input::read_raw_line(">: ") else {
            break;
        };

        println!();
        match choice.as_str() {
            "1" => render::roster(&course),
            "2" => render::assignments(&course),
            "3" => add_assignment(&roster, &mut course),
            "4" => add_student(&roster, &mut course),
            "5" => grade_student(&grading, &mut course),
            "6" => print_grades(&grading, &course),
            "7" => delete_student(&roster, &mut course),
            "8" => update_or_delete_assignment(&roster, &mut course),
            "9" => recompute_totals(&roster, &mut course),
            "0" => break,
            _ => println!("Invalid input"),
        }
    }

    Ok(())
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn add_student(roster: &Roster<'_>, course: &mut Course) {
    let Some(name) = input::read_line("Student name (First Last): ") else {
        return;
    };
    let Some(number) = input::read_line("Student number (@01234567): ") else {
        return;
    };

    match roster.add_student(course, &name, &number) {
        Ok(()) => println!("Student added successfully"),
        Err(err) => println!("Student not added: {err}"),
    }
}

fn add_assignment(roster: &Roster<'_>, course: &mut Course) {
    let Some(name) = input::read_line("Assignment name: ") else {
        return;
    };
    let Some(due_date) = input::read_date("Enter a due date in YYYY-MM-DD format: ") else {
        return;
    };
    let Some(point_value) = input::read_point_value("Point value: ") else {
        return;
    };

    match roster.add_assignment(course, &name, due_date, point_value) {
        Ok(()) => println!("Assignment added successfully"),
        Err(err) => println!("Assignment not added: {err}"),
    }
}

fn grade_student(grading: &Grading<'_>, course: &mut Course) {
    render::roster(course);
    let Some(student_index) = input::read_selection("Enter line number: ") else {
        return;
    };
    let Some(student) = course.student_at(student_index) else {
        println!("Invalid input");
        return;
    };
    println!("Grading assignments for {}", student.full_name());

    render::assignments(course);
    let Some(assignment_index) = input::read_selection("Enter line number: ") else {
        return;
    };
    let Some(assignment) = course.assignment_at(assignment_index) else {
        println!("Invalid input");
        return;
    };
    println!("Assignment: {}", assignment.name);
    println!("Points possible: {}", assignment.point_value);
    println!("Due date: {}", assignment.due_date);

    let mut prompt = input::StdinPrompt;
    match grading.grade(course, student_index, assignment_index, &mut prompt) {
        Ok(GradeOutcome::Recorded { points_earned, .. }) => {
            println!("Grade recorded: {points_earned} points");
        }
        Ok(GradeOutcome::Replaced {
            previous_points,
            points_earned,
            ..
        }) => {
            println!("Grade updated: {previous_points} -> {points_earned} points");
        }
        Ok(GradeOutcome::Declined) => println!("Existing grade kept"),
        Ok(GradeOutcome::Cancelled) => println!("Grading cancelled"),
        Err(err @ GradingError::TotalWriteFailed { .. }) => {
            println!("Warning: {err}");
            println!("Run `Recompute Totals` to reconcile stored totals.");
        }
        Err(err) => println!("Grading failed: {err}"),
    }
}

fn print_grades(grading: &Grading<'_>, course: &Course) {
    render::roster(course);
    let Some(selection) = input::read_line("Enter line number or 'A' for all: ") else {
        return;
    };

    if selection.eq_ignore_ascii_case("a") {
        for index in 0..course.students().len() {
            print_one_grade_sheet(grading, course, index);
        }
        return;
    }

    match selection.parse::<usize>() {
        Ok(index) if index < course.students().len() => {
            print_one_grade_sheet(grading, course, index);
        }
        _ => println!("Invalid input"),
    }
}

fn print_one_grade_sheet(grading: &Grading<'_>, course: &Course, index: usize) {
    match grading.student_report(course, index) {
        Ok(report) => render::grade_sheet(course.name(), &report),
        Err(err) => println!("Could not build grade sheet: {err}"),
    }
}

fn delete_student(roster: &Roster<'_>, course: &mut Course) {
    render::roster(course);
    let Some(index) = input::read_selection("Enter line number of student to delete: ") else {
        return;
    };
    let Some(student) = course.student_at(index) else {
        println!("Invalid input");
        return;
    };

    if !input::confirm(&format!(
        "Really remove student {}? (y/n): ",
        student.full_name()
    )) {
        return;
    }

    match roster.delete_student(course, index) {
        Ok(student) => println!("{} deleted from records", student.full_name()),
        Err(err) => println!("Student not deleted: {err}"),
    }
}

fn update_or_delete_assignment(roster: &Roster<'_>, course: &mut Course) {
    render::assignments(course);
    let Some(index) =
        input::read_selection("Enter line number of assignment to update/delete: ")
    else {
        return;
    };
    let Some(assignment) = course.assignment_at(index) else {
        println!("Invalid input");
        return;
    };
    let name = assignment.name.clone();

    let Some(action) = input::read_line(&format!("(u)pdate or (d)elete `{name}`? (u/d): "))
    else {
        return;
    };

    match action.to_lowercase().as_str() {
        "d" => match roster.delete_assignment(course, index) {
            Ok(assignment) => {
                println!("`{}` deleted; student totals recomputed", assignment.name);
            }
            Err(err) => println!("Assignment not deleted: {err}"),
        },
        "u" => {
            println!("Enter new details for `{name}`");
            let Some(due_date) = input::read_date("Enter a due date in YYYY-MM-DD format: ")
            else {
                return;
            };
            let Some(point_value) = input::read_point_value("Point value: ") else {
                return;
            };

            match roster.update_assignment(course, index, due_date, point_value) {
                Ok(()) => println!("Assignment updated; recorded grades kept"),
                Err(err) => println!("Assignment not updated: {err}"),
            }
        }
        _ => println!("Invalid input"),
    }
}

fn recompute_totals(roster: &Roster<'_>, course: &mut Course) {
    match roster.recompute_totals(course) {
        Ok(()) => println!("Totals recomputed from the grade ledger"),
        Err(err) => println!("Recompute failed: {err}"),
    }
}
