//! In-session views: day choice, exercise list and keyboard, per-exercise
//! prompt, current progress and the end-of-session summary.

use ironset_protocol::{
    Button, ButtonAction, Command, DayProgram, ExerciseRecord, Keyboard, Reply, TrainingProgram,
    WorkoutSession,
};

use crate::messages::main_menu;
use crate::{completion_counter, escape_html, format_set};

/// Program overview plus a reply keyboard with one entry per day.
pub fn day_prompt(program: &TrainingProgram) -> Reply {
    let mut text = String::from("📋 <b>Training programs:</b>\n\n");
    for day in &program.days {
        text.push_str(&format!(
            "<b>{}</b>\n{}\n<i>Exercises: {}</i>\n\n",
            escape_html(&day.label),
            escape_html(&day.description),
            day.len()
        ));
    }
    text.push_str("Choose a training day:");

    let mut rows: Vec<Vec<String>> = program
        .days
        .chunks(2)
        .map(|pair| pair.iter().map(|day| day.label.clone()).collect())
        .collect();
    rows.push(vec![Command::Cancel.as_slash().to_owned()]);

    Reply::text(text).with_keyboard(Keyboard::Suggestions(rows))
}

/// Numbered list of every exercise of the day. Hides the day keyboard.
pub fn exercise_list(day: &DayProgram) -> Reply {
    let mut text = String::from("📝 <b>Full exercise list:</b>\n\n");
    for (i, exercise) in day.exercises.iter().enumerate() {
        text.push_str(&format!("{}. {}\n", i + 1, escape_html(exercise)));
    }
    text.push_str(&format!(
        "\nTotal exercises: {}\n\n👇 Pick an exercise to enter results:",
        day.len()
    ));
    Reply::text(text).with_keyboard(Keyboard::Remove)
}

/// One button per exercise with a completion marker, then session actions.
pub fn exercise_keyboard(day: &DayProgram, session: &WorkoutSession) -> Keyboard {
    let mut rows: Vec<Vec<Button>> = day
        .exercises
        .iter()
        .enumerate()
        .map(|(i, exercise)| {
            let status = if session.is_completed(i) { "✅" } else { "◻️" };
            vec![Button::new(
                format!("{status} {}. {exercise}", i + 1),
                ButtonAction::SelectExercise(i),
            )]
        })
        .collect();

    rows.push(vec![Button::new("📊 Current progress", ButtonAction::Progress)]);
    rows.push(vec![Button::new("💡 Recommendations", ButtonAction::Recommend)]);
    rows.push(vec![Button::new("🏁 Finish workout", ButtonAction::Finish)]);
    Keyboard::Inline(rows)
}

pub fn choose_exercise(day: &DayProgram, session: &WorkoutSession) -> Reply {
    Reply::text(format!(
        "🎯 <b>Choose an exercise:</b> ({} done)",
        completion_counter(session.completed_exercises.len(), day.len())
    ))
    .with_keyboard(exercise_keyboard(day, session))
}

/// Asks for "weight reps"; shows the last archived result when there is one.
pub fn exercise_prompt(exercise: &str, previous: Option<&ExerciseRecord>) -> Reply {
    let mut text = format!("💪 <b>Exercise:</b> {}\n\n", escape_html(exercise));
    if let Some(record) = previous {
        text.push_str(&format!(
            "Last time: {}\n\n",
            format_set(record.weight, record.reps)
        ));
    }
    text.push_str(
        "Enter weight and reps:\n\
         <code>weight reps</code>\n\
         Example: <code>60 10</code>\n\n\
         Or send /skip to skip it",
    );

    Reply::text(text).with_keyboard(Keyboard::Inline(vec![vec![
        Button::new("⏱ Rest timer", ButtonAction::Timer),
        Button::new("⬅️ Back", ButtonAction::Back),
    ]]))
}

pub fn session_progress(day: &DayProgram, session: &WorkoutSession) -> Reply {
    let mut text = format!(
        "📊 <b>Current progress ({}):</b>\n\n",
        escape_html(&session.day)
    );
    if session.is_empty() {
        text.push_str("No exercises recorded yet.\n");
    } else {
        push_records(&mut text, &session.exercises);
    }
    text.push_str(&format!(
        "\n✅ Completed: {}",
        completion_counter(session.exercises.len(), day.len())
    ));
    Reply::text(text)
}

/// End-of-session summary. `day` is `None` when the stored label no longer
/// exists in the program, in which case the total is omitted.
pub fn session_summary(day: Option<&DayProgram>, session: &WorkoutSession) -> Reply {
    let mut text = String::from("🎉 Workout finished! 🎉\n\n<b>Your results:</b>\n");
    push_records(&mut text, &session.exercises);
    match day {
        Some(day) => text.push_str(&format!(
            "\n💪 Completed: {} exercises",
            completion_counter(session.exercises.len(), day.len())
        )),
        None => text.push_str(&format!(
            "\n💪 Completed: {} exercises",
            session.exercises.len()
        )),
    }
    text.push_str("\n\nGreat job! Next workout in 1-2 days.");
    Reply::text(text).with_keyboard(main_menu())
}

fn push_records(text: &mut String, records: &[ExerciseRecord]) {
    for (i, record) in records.iter().enumerate() {
        text.push_str(&format!(
            "{}. {}: {}\n",
            i + 1,
            escape_html(&record.name),
            format_set(record.weight, record.reps)
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ironset_protocol::SetInput;

    fn day_a() -> DayProgram {
        TrainingProgram::default().days[0].clone()
    }

    #[test]
    fn keyboard_marks_completed_exercises() {
        let day = day_a();
        let now = Utc::now();
        let mut session = WorkoutSession::new(&day.label, now);
        session.record_set(1, &day.exercises[1], SetInput { weight: 10.0, reps: 8 }, now);

        let keyboard = exercise_keyboard(&day, &session);
        let buttons: Vec<&Button> = keyboard.inline_buttons().collect();
        assert_eq!(buttons.len(), day.len() + 3);
        assert!(buttons[0].label.starts_with("◻️ 1."));
        assert!(buttons[1].label.starts_with("✅ 2."));
        assert_eq!(buttons[1].action, ButtonAction::SelectExercise(1));
        assert_eq!(buttons[day.len() + 2].action, ButtonAction::Finish);
    }

    #[test]
    fn day_prompt_offers_every_label_and_cancel() {
        let reply = day_prompt(&TrainingProgram::default());
        let Some(Keyboard::Suggestions(rows)) = reply.keyboard else {
            panic!("day prompt must carry a suggestion keyboard");
        };
        assert_eq!(rows[0], vec!["Day A".to_owned(), "Day B".to_owned()]);
        assert_eq!(rows[1], vec!["/cancel".to_owned()]);
        assert!(reply.text.contains("<i>Exercises: 7</i>"));
    }

    #[test]
    fn progress_counts_recorded_exercises() {
        let day = day_a();
        let now = Utc::now();
        let mut session = WorkoutSession::new(&day.label, now);
        assert!(session_progress(&day, &session)
            .text
            .contains("No exercises recorded yet"));

        session.record_set(0, &day.exercises[0], SetInput { weight: 60.0, reps: 10 }, now);
        let text = session_progress(&day, &session).text;
        assert!(text.contains("60 kg × 10 reps"));
        assert!(text.ends_with("✅ Completed: 1/7"));
    }

    #[test]
    fn prompt_shows_previous_result() {
        let record = ExerciseRecord {
            name: "Bench".to_owned(),
            weight: 62.5,
            reps: 8,
            timestamp: Utc::now(),
        };
        let reply = exercise_prompt("Bench", Some(&record));
        assert!(reply.text.contains("Last time: 62.5 kg × 8 reps"));
        assert_eq!(
            reply.keyboard.map(|k| k.inline_buttons().count()),
            Some(2)
        );
    }

    #[test]
    fn summary_without_program_day_still_renders() {
        let now = Utc::now();
        let mut session = WorkoutSession::new("Legacy day", now);
        session.record_set(0, "Squat", SetInput { weight: 100.0, reps: 5 }, now);
        let text = session_summary(None, &session).text;
        assert!(text.contains("1. Squat: 100 kg × 5 reps"));
        assert!(text.contains("Completed: 1 exercises"));
    }
}
