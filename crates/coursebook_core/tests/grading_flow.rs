use chrono::NaiveDate;
use coursebook_core::db::open_db_in_memory;
use coursebook_core::{
    Assignment, Course, GradeOutcome, GradeRepository, GradingError, GradingPrompt,
    GradingService, LatePolicy, RosterService, SqliteAssignmentRepository,
    SqliteGradeRepository, SqliteStudentRepository,
};
use rusqlite::Connection;

const COURSE: &str = "CSCI3771";

/// Scripted collaborator standing in for the interactive prompt loops.
struct ScriptedPrompt {
    points: Option<f64>,
    date: Option<&'static str>,
    accept_penalty: bool,
    accept_overwrite: bool,
}

impl ScriptedPrompt {
    fn answering(points: f64, date: &'static str) -> Self {
        Self {
            points: Some(points),
            date: Some(date),
            accept_penalty: true,
            accept_overwrite: true,
        }
    }
}

impl GradingPrompt for ScriptedPrompt {
    fn points_awarded(&mut self, _assignment: &Assignment) -> Option<f64> {
        self.points
    }

    fn submission_date(&mut self) -> Option<NaiveDate> {
        self.date
            .map(|text| coursebook_core::parse_course_date(text).unwrap())
    }

    fn confirm_penalty(&mut self, _days_late: i64, _penalty_percent: u32) -> bool {
        self.accept_penalty
    }

    fn confirm_overwrite(&mut self, _previous_points: f64) -> bool {
        self.accept_overwrite
    }
}

fn seeded_course(conn: &Connection) -> Course {
    let roster = RosterService::new(
        SqliteStudentRepository::new(conn, COURSE),
        SqliteAssignmentRepository::new(conn, COURSE),
        SqliteGradeRepository::new(conn, COURSE),
    );

    let mut course = roster.load_course(COURSE).unwrap();
    roster
        .add_student(&mut course, "Ada Lovelace", "@01")
        .unwrap();
    roster
        .add_assignment(
            &mut course,
            "hw1",
            NaiveDate::from_ymd_opt(2020, 11, 1).unwrap(),
            100,
        )
        .unwrap();
    course
}

fn grading(conn: &Connection) -> GradingService<SqliteGradeRepository<'_>, SqliteStudentRepository<'_>> {
    GradingService::new(
        SqliteGradeRepository::new(conn, COURSE),
        SqliteStudentRepository::new(conn, COURSE),
        LatePolicy::default(),
    )
}

#[test]
fn three_days_late_with_penalty_stores_seventy_percent() {
    let conn = open_db_in_memory().unwrap();
    let mut course = seeded_course(&conn);
    let service = grading(&conn);

    let mut prompt = ScriptedPrompt::answering(100.0, "2020-11-04");
    let outcome = service.grade(&mut course, 0, 0, &mut prompt).unwrap();

    assert_eq!(
        outcome,
        GradeOutcome::Recorded {
            points_earned: 70.0,
            days_late: 3,
            penalized: true,
        }
    );

    let ledger = SqliteGradeRepository::new(&conn, COURSE);
    let entry = ledger.find_entry("@01", "hw1").unwrap().unwrap();
    assert_eq!(entry.points_earned, 70.0);
    assert_eq!(entry.points_possible, 100);
    assert_eq!(course.student_at(0).unwrap().total_points, 70.0);
}

#[test]
fn fourteen_days_late_with_penalty_stores_zero() {
    let conn = open_db_in_memory().unwrap();
    let mut course = seeded_course(&conn);
    let service = grading(&conn);

    let mut prompt = ScriptedPrompt::answering(100.0, "2020-11-15");
    let outcome = service.grade(&mut course, 0, 0, &mut prompt).unwrap();

    assert_eq!(
        outcome,
        GradeOutcome::Recorded {
            points_earned: 0.0,
            days_late: 14,
            penalized: true,
        }
    );
    assert_eq!(course.student_at(0).unwrap().total_points, 0.0);
}

#[test]
fn declining_the_penalty_keeps_raw_points() {
    let conn = open_db_in_memory().unwrap();
    let mut course = seeded_course(&conn);
    let service = grading(&conn);

    let mut prompt = ScriptedPrompt {
        accept_penalty: false,
        ..ScriptedPrompt::answering(90.0, "2020-11-04")
    };
    let outcome = service.grade(&mut course, 0, 0, &mut prompt).unwrap();

    assert_eq!(
        outcome,
        GradeOutcome::Recorded {
            points_earned: 90.0,
            days_late: 3,
            penalized: false,
        }
    );
    assert_eq!(course.student_at(0).unwrap().total_points, 90.0);
}

#[test]
fn on_time_submission_never_offers_a_penalty() {
    let conn = open_db_in_memory().unwrap();
    let mut course = seeded_course(&conn);
    let service = grading(&conn);

    // accept_penalty=true must not matter when nothing is late.
    let mut prompt = ScriptedPrompt::answering(85.0, "2020-11-01");
    let outcome = service.grade(&mut course, 0, 0, &mut prompt).unwrap();

    assert_eq!(
        outcome,
        GradeOutcome::Recorded {
            points_earned: 85.0,
            days_late: 0,
            penalized: false,
        }
    );
}

#[test]
fn regrade_with_confirmation_replaces_value_and_total() {
    let conn = open_db_in_memory().unwrap();
    let mut course = seeded_course(&conn);
    let service = grading(&conn);

    let mut first = ScriptedPrompt::answering(60.0, "2020-11-01");
    service.grade(&mut course, 0, 0, &mut first).unwrap();

    let mut second = ScriptedPrompt::answering(95.0, "2020-11-01");
    let outcome = service.grade(&mut course, 0, 0, &mut second).unwrap();

    assert_eq!(
        outcome,
        GradeOutcome::Replaced {
            previous_points: 60.0,
            points_earned: 95.0,
            days_late: 0,
            penalized: false,
        }
    );

    // Total reflects exactly the new value, not old + new.
    assert_eq!(course.student_at(0).unwrap().total_points, 95.0);
    let ledger = SqliteGradeRepository::new(&conn, COURSE);
    assert_eq!(ledger.sum_for_student("@01").unwrap(), 95.0);
    let students = SqliteStudentRepository::new(&conn, COURSE);
    assert_eq!(stored_total(&students), 95.0);
}

#[test]
fn regrade_declined_leaves_ledger_and_total_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let mut course = seeded_course(&conn);
    let service = grading(&conn);

    let mut first = ScriptedPrompt::answering(60.0, "2020-11-01");
    service.grade(&mut course, 0, 0, &mut first).unwrap();

    let mut second = ScriptedPrompt {
        accept_overwrite: false,
        ..ScriptedPrompt::answering(95.0, "2020-11-01")
    };
    let outcome = service.grade(&mut course, 0, 0, &mut second).unwrap();

    assert_eq!(outcome, GradeOutcome::Declined);
    assert_eq!(course.student_at(0).unwrap().total_points, 60.0);
    let ledger = SqliteGradeRepository::new(&conn, COURSE);
    assert_eq!(
        ledger.find_entry("@01", "hw1").unwrap().unwrap().points_earned,
        60.0
    );
}

#[test]
fn cancelling_a_prompt_aborts_with_no_side_effects() {
    let conn = open_db_in_memory().unwrap();
    let mut course = seeded_course(&conn);
    let service = grading(&conn);

    let mut no_points = ScriptedPrompt {
        points: None,
        ..ScriptedPrompt::answering(0.0, "2020-11-01")
    };
    assert_eq!(
        service.grade(&mut course, 0, 0, &mut no_points).unwrap(),
        GradeOutcome::Cancelled
    );

    let mut no_date = ScriptedPrompt {
        date: None,
        ..ScriptedPrompt::answering(50.0, "2020-11-01")
    };
    assert_eq!(
        service.grade(&mut course, 0, 0, &mut no_date).unwrap(),
        GradeOutcome::Cancelled
    );

    let ledger = SqliteGradeRepository::new(&conn, COURSE);
    assert!(ledger.find_entry("@01", "hw1").unwrap().is_none());
    assert_eq!(course.student_at(0).unwrap().total_points, 0.0);
}

#[test]
fn out_of_range_selection_aborts_with_no_side_effects() {
    let conn = open_db_in_memory().unwrap();
    let mut course = seeded_course(&conn);
    let service = grading(&conn);

    let mut prompt = ScriptedPrompt::answering(50.0, "2020-11-01");
    let err = service.grade(&mut course, 5, 0, &mut prompt).unwrap_err();
    assert!(matches!(err, GradingError::SelectionOutOfRange(5)));

    let err = service.grade(&mut course, 0, 3, &mut prompt).unwrap_err();
    assert!(matches!(err, GradingError::SelectionOutOfRange(3)));

    let ledger = SqliteGradeRepository::new(&conn, COURSE);
    assert!(ledger.find_entry("@01", "hw1").unwrap().is_none());
}

#[test]
fn out_of_contract_points_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let mut course = seeded_course(&conn);
    let service = grading(&conn);

    let mut too_many = ScriptedPrompt::answering(150.0, "2020-11-01");
    let err = service.grade(&mut course, 0, 0, &mut too_many).unwrap_err();
    assert!(matches!(err, GradingError::Validation(_)));

    let mut zero = ScriptedPrompt::answering(0.0, "2020-11-01");
    let err = service.grade(&mut course, 0, 0, &mut zero).unwrap_err();
    assert!(matches!(err, GradingError::Validation(_)));
}

#[test]
fn report_totals_and_percent_follow_the_ledger() {
    let conn = open_db_in_memory().unwrap();
    let mut course = seeded_course(&conn);
    let roster = RosterService::new(
        SqliteStudentRepository::new(&conn, COURSE),
        SqliteAssignmentRepository::new(&conn, COURSE),
        SqliteGradeRepository::new(&conn, COURSE),
    );
    roster
        .add_assignment(
            &mut course,
            "hw2",
            NaiveDate::from_ymd_opt(2020, 12, 1).unwrap(),
            50,
        )
        .unwrap();
    let service = grading(&conn);

    let mut first = ScriptedPrompt::answering(70.0, "2020-11-01");
    service.grade(&mut course, 0, 0, &mut first).unwrap();
    let mut second = ScriptedPrompt::answering(50.0, "2020-12-01");
    service.grade(&mut course, 0, 1, &mut second).unwrap();

    let report = service.student_report(&course, 0).unwrap();
    assert_eq!(report.entries.len(), 2);
    assert_eq!(report.total_possible, 150);
    assert_eq!(report.total_earned, 120.0);
    assert_eq!(report.percent, Some(80.0));
}

#[test]
fn report_for_ungraded_student_has_no_percent() {
    let conn = open_db_in_memory().unwrap();
    let course = seeded_course(&conn);
    let service = grading(&conn);

    let report = service.student_report(&course, 0).unwrap();
    assert!(report.entries.is_empty());
    assert_eq!(report.total_possible, 0);
    assert_eq!(report.total_earned, 0.0);
    assert_eq!(report.percent, None);
}

fn stored_total(students: &SqliteStudentRepository<'_>) -> f64 {
    use coursebook_core::StudentRepository;
    students.list_students().unwrap()[0].total_points
}
