//! Menu and table rendering.
//!
//! # Responsibility
//! - Print the main menu, roster/assignment selection tables and grade
//!   sheets. Plain text only; no business logic.

use coursebook_core::{Course, StudentReport};

pub fn main_menu() {
    println!();
    println!("* MAIN MENU *");
    println!("=============");
    println!("1: View Roster");
    println!("2: View Assignments");
    println!("-------------------");
    println!("3: Add New Assignment");
    println!("4: Add New Student");
    println!("5: Input Student Grade");
    println!("6: Print Student Grades");
    println!("-------------------");
    println!("7: Delete Student");
    println!("8: Update/Delete Assignment");
    println!("9: Recompute Totals");
    println!("0: Quit");
}

pub fn roster(course: &Course) {
    println!("{:>2}: {:<20}\t{}", "#", "Name", "Student Number");
    for (index, student) in course.students().iter().enumerate() {
        let last_first = format!("{}, {}", student.last_name, student.first_name);
        println!("{index:>2}: {last_first:<20}\t{}", student.number);
    }
}

pub fn assignments(course: &Course) {
    println!(
        "{:>2}: {:<20}\t{:<10}\t{}",
        "#", "Name", "Due Date", "Point Value"
    );
    for (index, assignment) in course.assignments().iter().enumerate() {
        println!(
            "{index:>2}: {:<20}\t{}\t{}",
            assignment.name, assignment.due_date, assignment.point_value
        );
    }
}

pub fn grade_sheet(course_name: &str, report: &StudentReport) {
    println!("- - - - - - - - - - - -");
    println!(
        " {course_name} grades for {} ({})",
        report.student.full_name(),
        report.student.number
    );
    println!(
        "{:<20}\t{:<15}\t{}",
        "Assignment", "Points Possible", "Points Awarded"
    );
    for entry in &report.entries {
        println!(
            "{:<20}\t{:<15}\t{}",
            entry.assignment_name, entry.points_possible, entry.points_earned
        );
    }

    match report.percent {
        Some(percent) => println!(
            "{} has a total of {} points out of {} possible: {percent:.1}%",
            report.student.first_name, report.total_earned, report.total_possible
        ),
        None => println!(
            "{} has not completed any assignments",
            report.student.first_name
        ),
    }
    println!("- - - - - - - - - - - -");
}
