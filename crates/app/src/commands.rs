//! Command handlers
//!
//! Everything here goes through the [`Roster`] facade; nothing touches the
//! store directly.

use roster_core::{
    Classroom, ClassroomUpdate, Error, RandomSource, Result, Roster, RosterConfig, Session,
    SessionStore, SettingsUpdate, Student, StudentUpdate,
};
use uuid::Uuid;

use crate::state::AppState;
use crate::{ClassCommand, Cli, Command, StudentCommand};

pub fn run(cli: Cli) -> Result<()> {
    let config = RosterConfig::discover(cli.config.as_deref())?;
    let state = AppState::open(config, cli.db)?;
    let mut roster = state.roster();

    match cli.command {
        Command::Class(command) => class_command(&roster, command),
        Command::Student(command) => student_command(&roster, command),
        Command::Call { class } => call(&mut roster, class.as_deref()),
        Command::Reset { class } => {
            let classroom = resolve_class(&roster, class.as_deref())?;
            roster.reset_called_students(classroom.id)?;
            println!("Reset calls for {}", classroom.name);
            Ok(())
        }
        Command::Status => status(&roster),
    }
}

fn class_command<S: SessionStore, R: RandomSource>(
    roster: &Roster<S, R>,
    command: ClassCommand,
) -> Result<()> {
    match command {
        ClassCommand::Add { name } => match roster.add_classroom(&name)? {
            Some(id) => println!("Created class {} ({})", name.trim(), id),
            None => println!("Class name must not be empty"),
        },
        ClassCommand::List => {
            let session = roster.session()?;
            if session.classes.is_empty() {
                println!("No classes yet");
            }
            for classroom in &session.classes {
                let marker = if session.current_class_id == Some(classroom.id) {
                    "*"
                } else {
                    " "
                };
                println!("{} {}  {}  {}", marker, classroom.name, summary(classroom), classroom.id);
            }
        }
        ClassCommand::Rename { class, name } => {
            let classroom = resolve_class(roster, Some(class.as_str()))?;
            roster.update_classroom(classroom.id, &ClassroomUpdate::new().name(name.trim()))?;
            println!("Renamed {} to {}", classroom.name, name.trim());
        }
        ClassCommand::Delete { class } => {
            let classroom = resolve_class(roster, Some(class.as_str()))?;
            roster.delete_classroom(classroom.id)?;
            println!("Deleted {}", classroom.name);
        }
        ClassCommand::Use { class } => {
            let classroom = resolve_class(roster, Some(class.as_str()))?;
            roster.set_current_class(classroom.id)?;
            println!("Now using {}", classroom.name);
        }
        ClassCommand::Settings {
            class,
            allow_duplicates,
            prioritize_new,
        } => {
            let classroom = resolve_class(roster, class.as_deref())?;
            let update = SettingsUpdate {
                allow_duplicates,
                prioritize_new_students: prioritize_new,
            };
            let session = roster.update_settings(classroom.id, update)?;
            if let Some(classroom) = session.classroom(classroom.id) {
                println!(
                    "{}: allow duplicates = {}, prioritize new = {}",
                    classroom.name,
                    classroom.settings.allow_duplicates,
                    classroom.settings.prioritize_new_students
                );
            }
        }
    }
    Ok(())
}

fn student_command<S: SessionStore, R: RandomSource>(
    roster: &Roster<S, R>,
    command: StudentCommand,
) -> Result<()> {
    match command {
        StudentCommand::Add { class, names } => {
            let classroom = resolve_class(roster, class.as_deref())?;
            let mut added = 0;
            for name in &names {
                if roster.add_student(classroom.id, name)?.is_some() {
                    added += 1;
                }
            }
            println!("Added {} student(s) to {}", added, classroom.name);
        }
        StudentCommand::Bulk { class, names } => {
            let classroom = resolve_class(roster, class.as_deref())?;
            let text = names.join("\n");
            let requested = text.lines().filter(|line| !line.trim().is_empty()).count();
            let added = roster.add_students_bulk(classroom.id, &text)?;
            println!(
                "Added {} student(s) to {}, skipped {}",
                added.len(),
                classroom.name,
                requested.saturating_sub(added.len())
            );
        }
        StudentCommand::Remove { class, student } => {
            let classroom = resolve_class(roster, class.as_deref())?;
            let target = resolve_student(&classroom, &student)?;
            roster.delete_student(classroom.id, target.id)?;
            println!("Removed {}", target.name);
        }
        StudentCommand::Absent { class, names } => {
            let classroom = resolve_class(roster, class.as_deref())?;
            let marked = roster.mark_absent_by_names(classroom.id, &names.join(","))?;
            let session = roster.session()?;
            let names: Vec<&str> = session
                .classroom(classroom.id)
                .map(|c| {
                    marked
                        .iter()
                        .filter_map(|id| c.student(*id))
                        .map(|s| s.name.as_str())
                        .collect()
                })
                .unwrap_or_default();
            if names.is_empty() {
                println!("No present students matched");
            } else {
                println!("Marked absent: {}", names.join(", "));
            }
        }
        StudentCommand::Present { class, student } => {
            let classroom = resolve_class(roster, class.as_deref())?;
            let target = resolve_student(&classroom, &student)?;
            roster.update_student(classroom.id, target.id, &StudentUpdate::new().absent(false))?;
            println!("{} is present", target.name);
        }
        StudentCommand::AllPresent { class } => {
            let classroom = resolve_class(roster, class.as_deref())?;
            roster.mark_all_present(classroom.id)?;
            println!("Everyone in {} is present", classroom.name);
        }
        StudentCommand::List { class } => {
            let classroom = resolve_class(roster, class.as_deref())?;
            print_students(&classroom);
        }
    }
    Ok(())
}

fn call<S: SessionStore, R: RandomSource>(
    roster: &mut Roster<S, R>,
    class: Option<&str>,
) -> Result<()> {
    let classroom = resolve_class(roster, class)?;
    match roster.select_next(classroom.id)? {
        Some(student) => {
            let at = student
                .last_called_at
                .map(|t| format!(" at {}", t.with_timezone(&chrono::Local).format("%H:%M")))
                .unwrap_or_default();
            println!("Called: {}{}", student.name, at);
        }
        None => println!("No students are present in {}", classroom.name),
    }
    Ok(())
}

fn status<S: SessionStore, R: RandomSource>(roster: &Roster<S, R>) -> Result<()> {
    match roster.current_classroom()? {
        Some(classroom) => {
            println!("{}  {}", classroom.name, summary(&classroom));
            print_students(&classroom);
        }
        None => println!("No class selected"),
    }
    Ok(())
}

fn summary(classroom: &Classroom) -> String {
    let stats = classroom.stats();
    format!(
        "{} present, {} absent, {} not called, {} called",
        stats.present, stats.absent, stats.not_called, stats.called
    )
}

fn print_students(classroom: &Classroom) {
    if classroom.students.is_empty() {
        println!("  (no students)");
    }
    for student in &classroom.students {
        let tag = if student.is_absent {
            "absent".to_string()
        } else if let Some(at) = student.last_called_at {
            format!("called {}", at.with_timezone(&chrono::Local).format("%H:%M"))
        } else if student.has_been_called {
            "called".to_string()
        } else {
            "-".to_string()
        };
        println!("  {:<12} {}", tag, student.name);
    }
}

/// Find a class by id or case-insensitive name, defaulting to the current one
fn resolve_class<S: SessionStore, R: RandomSource>(
    roster: &Roster<S, R>,
    class: Option<&str>,
) -> Result<Classroom> {
    let session = roster.session()?;
    let found = match class {
        Some(query) => find_class(&session, query),
        None => session.current_classroom(),
    };

    found.cloned().ok_or_else(|| match class {
        Some(query) => Error::InvalidOperation(format!("No class matches '{}'", query)),
        None => Error::InvalidOperation(
            "No class selected; pass --class or run `roster class use`".to_string(),
        ),
    })
}

fn find_class<'a>(session: &'a Session, query: &str) -> Option<&'a Classroom> {
    if let Ok(id) = Uuid::parse_str(query) {
        if let Some(classroom) = session.classroom(id) {
            return Some(classroom);
        }
    }
    let needle = query.trim().to_lowercase();
    session
        .classes
        .iter()
        .find(|c| c.name.to_lowercase() == needle)
}

fn resolve_student(classroom: &Classroom, query: &str) -> Result<Student> {
    let by_id = Uuid::parse_str(query)
        .ok()
        .and_then(|id| classroom.student(id));

    by_id
        .or_else(|| classroom.student_by_name(query))
        .cloned()
        .ok_or_else(|| {
            Error::InvalidOperation(format!("No student in {} matches '{}'", classroom.name, query))
        })
}
