//! History, statistics and recommendation reports.

use ironset_coach::{Coach, Recommendation};
use ironset_protocol::{DayProgram, Reply, TrainingProgram, UserProfile};

use crate::chart::bar_chart;
use crate::{escape_html, format_set, format_weight};

/// How many archived sessions the history view lists by default.
pub const HISTORY_SESSIONS: usize = 5;
/// How many exercises are listed per session before collapsing the rest.
pub const HISTORY_EXERCISES: usize = 3;
/// How many body-weight entries the statistics chart covers.
pub const WEIGHT_CHART_POINTS: usize = 10;

/// The last `limit` archived sessions, numbered from the first workout ever.
pub fn history(profile: &UserProfile, limit: usize) -> Reply {
    if profile.history.is_empty() {
        return Reply::text(
            "📊 You have no recorded workouts yet.\nStart your first one: /train",
        );
    }

    let total = profile.history.len();
    let skip = total.saturating_sub(limit);
    let mut text = String::from("📊 <b>Your workout history:</b>\n\n");

    for (offset, session) in profile.history.iter().enumerate().skip(skip) {
        text.push_str(&format!(
            "<b>Workout {} ({}) - {}:</b>\n",
            offset + 1,
            escape_html(&session.day),
            session.start_time.format("%d.%m.%Y")
        ));
        for (j, record) in session.exercises.iter().take(HISTORY_EXERCISES).enumerate() {
            text.push_str(&format!(
                "  {}. {}: {}\n",
                j + 1,
                escape_html(&record.name),
                format_set(record.weight, record.reps)
            ));
        }
        if session.exercises.len() > HISTORY_EXERCISES {
            text.push_str(&format!(
                "  ... and {} more exercises\n",
                session.exercises.len() - HISTORY_EXERCISES
            ));
        }
        text.push('\n');
    }

    text.push_str(&format!("Total workouts: {total}"));
    Reply::text(text)
}

pub fn stats(profile: &UserProfile, program: &TrainingProgram) -> Reply {
    if profile.history.is_empty() && profile.weight_history.is_empty() {
        return Reply::text("📈 No data for statistics yet.\nStart your first workout: /train");
    }

    let mut text = String::from("📈 <b>Your statistics:</b>\n\n");
    text.push_str(&format!(
        "Total workouts: <b>{}</b>\n",
        profile.history.len()
    ));

    for day in &program.days {
        let count = profile
            .history
            .iter()
            .filter(|session| session.day == day.label)
            .count();
        text.push_str(&format!(
            "{}: <b>{count}</b> workouts\n",
            escape_html(&day.label)
        ));
    }
    let other = profile
        .history
        .iter()
        .filter(|session| program.day(&session.day).is_none())
        .count();
    if other > 0 {
        text.push_str(&format!("Other days: <b>{other}</b> workouts\n"));
    }

    let exercises = first_seen_exercises(profile);
    if !exercises.is_empty() {
        text.push_str("\n🏆 <b>Best weights:</b>\n");
        for name in exercises {
            if let Some(best) = profile.best_weight(name) {
                text.push_str(&format!(
                    "• {}: {} kg\n",
                    escape_html(name),
                    format_weight(best)
                ));
            }
        }
    }

    match profile.weight_history.as_slice() {
        [] => {}
        [only] => text.push_str(&format!(
            "\n⚖️ Body weight: {} kg\n",
            format_weight(only.weight)
        )),
        records => {
            let start = records.len().saturating_sub(WEIGHT_CHART_POINTS);
            let points: Vec<(String, f64)> = records[start..]
                .iter()
                .map(|r| (r.timestamp.format("%d.%m").to_string(), r.weight))
                .collect();
            text.push_str("\n⚖️ <b>Body weight:</b>\n");
            text.push_str(&bar_chart(&points, "kg"));
            text.push('\n');
        }
    }

    text.push_str("\nKeep it up! 💪");
    Reply::text(text)
}

/// One recommendation per exercise of `day`, with a chart of recent weights
/// where there are at least two records.
pub fn recommendations(day: &DayProgram, profile: &UserProfile, coach: &Coach) -> Reply {
    let mut text = format!(
        "💡 <b>Recommendations ({}):</b>\n\n",
        escape_html(&day.label)
    );
    let dates = profile.session_dates();

    for exercise in &day.exercises {
        let recent = profile.recent_records(exercise, coach.config().window);
        let recommendation = coach.recommend(&recent, &dates);
        text.push_str(&format!(
            "<b>{}</b>\n{}\n",
            escape_html(exercise),
            recommendation_text(&recommendation)
        ));
        if recent.len() >= 2 {
            let points: Vec<(String, f64)> = recent
                .iter()
                .rev()
                .map(|r| (r.timestamp.format("%d.%m").to_string(), r.weight))
                .collect();
            text.push_str(&bar_chart(&points, "kg"));
            text.push('\n');
        }
        text.push('\n');
    }
    Reply::text(text.trim_end().to_owned())
}

pub fn recommendation_text(recommendation: &Recommendation) -> String {
    match recommendation {
        Recommendation::InsufficientData { records, needed } => format!(
            "📊 Keep collecting data: {records}/{needed} workouts recorded."
        ),
        Recommendation::IncreaseWeight { current, min, max } => format!(
            "🚀 Plateau at {} kg with all reps done. Try {}-{} kg next time.",
            format_weight(*current),
            format_weight(*min),
            format_weight(*max)
        ),
        Recommendation::FocusOnTechnique { latest, earlier } => format!(
            "⚠️ Weight dropped from {} to {} kg. Focus on technique and recovery.",
            format_weight(*earlier),
            format_weight(*latest)
        ),
        Recommendation::Progress { latest, gain } => format!(
            "📈 +{} kg over the last three workouts, now at {} kg. Keep it up!",
            format_weight(*gain),
            format_weight(*latest)
        ),
        Recommendation::TrainMoreOften { average_gap_days } => format!(
            "📅 {average_gap_days:.1} days between workouts on average. Try to train more often."
        ),
        Recommendation::RecoverMore { average_gap_days } => format!(
            "😴 Only {average_gap_days:.1} days between workouts. Allow more recovery time."
        ),
        Recommendation::KeepGoing => "💪 Steady work. Keep going!".to_owned(),
    }
}

/// Exercise names across the history, in order of first appearance.
fn first_seen_exercises(profile: &UserProfile) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for record in profile.history.iter().flat_map(|s| s.exercises.iter()) {
        if !names.contains(&record.name.as_str()) {
            names.push(record.name.as_str());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use ironset_protocol::SetInput;

    fn profile_with_sessions(count: usize, exercises_per_session: usize) -> UserProfile {
        let program = TrainingProgram::default();
        let day = &program.days[0];
        let start = Utc::now() - Duration::days(60);
        let mut profile = UserProfile::new("Alex");
        for i in 0..count {
            let at = start + Duration::days(i as i64 * 3);
            profile.begin_session(&day.label, at);
            if let Some(session) = profile.current_session.as_mut() {
                for (index, name) in day.exercises.iter().take(exercises_per_session).enumerate() {
                    let set = SetInput {
                        weight: 50.0 + i as f64 * 2.5,
                        reps: 10,
                    };
                    session.record_set(index, name, set, at);
                }
            }
            profile.finish_session();
        }
        profile
    }

    #[test]
    fn history_shows_last_five_sessions() {
        let profile = profile_with_sessions(7, 5);
        let text = history(&profile, HISTORY_SESSIONS).text;
        assert!(!text.contains("Workout 2 "));
        assert!(text.contains("Workout 3 (Day A)"));
        assert!(text.contains("Workout 7 (Day A)"));
        assert!(text.contains("... and 2 more exercises"));
        assert!(text.ends_with("Total workouts: 7"));
    }

    #[test]
    fn empty_history_points_to_train() {
        let text = history(&UserProfile::new("Alex"), HISTORY_SESSIONS).text;
        assert!(text.contains("/train"));
    }

    #[test]
    fn stats_count_sessions_per_day_and_best_weights() {
        let mut profile = profile_with_sessions(3, 1);
        let now = Utc::now();
        profile.record_body_weight(82.0, now - Duration::days(2));
        profile.record_body_weight(81.0, now);

        let text = stats(&profile, &TrainingProgram::default()).text;
        assert!(text.contains("Total workouts: <b>3</b>"));
        assert!(text.contains("Day A: <b>3</b> workouts"));
        assert!(text.contains("Day B: <b>0</b> workouts"));
        assert!(text.contains("Leg press (4x8-12): 55 kg"));
        assert!(text.contains("<pre>"));
    }

    #[test]
    fn recommendations_cover_every_exercise() {
        let profile = profile_with_sessions(3, 1);
        let program = TrainingProgram::default();
        let day = &program.days[0];
        let text = recommendations(day, &profile, &Coach::default()).text;

        assert!(!text.contains("Plateau"));
        assert!(text.contains("📈 +5 kg"));
        assert_eq!(text.matches("Keep collecting data: 0/3").count(), day.len() - 1);
    }
}
