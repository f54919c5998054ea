//! Fixed prompts, confirmations and error texts.

use ironset_protocol::{
    BodyWeightError, Command, Keyboard, MAX_BODY_WEIGHT, Reply, SetInputError, TrainingProgram,
};

use crate::{escape_html, format_set, format_weight};

/// Reply keyboard with the main commands, shown after a conversation ends.
pub fn main_menu() -> Keyboard {
    Keyboard::Suggestions(vec![
        vec![
            Command::Train.as_slash().to_owned(),
            Command::History.as_slash().to_owned(),
        ],
        vec![
            Command::Stats.as_slash().to_owned(),
            Command::Help.as_slash().to_owned(),
        ],
    ])
}

pub fn welcome(first_name: &str) -> Reply {
    Reply::text(format!(
        "🤖 Hi, {name}!\n\n\
         🏋️ Welcome to the workout tracker.\n\n\
         I keep track of your full-body program, three sessions a week.\n\n\
         📋 Commands:\n\
         /train - start a new workout\n\
         /progress - workout history\n\
         /stats - progress statistics\n\
         /weight - record body weight\n\
         /help - how to use the bot\n\n\
         🎯 You can:\n\
         • see every exercise of the day\n\
         • do exercises in any order\n\
         • come back to skipped exercises",
        name = escape_html(first_name),
    ))
}

pub fn help(program: &TrainingProgram) -> Reply {
    let mut text = String::from(
        "🤖 <b>How to use the bot</b>\n\n\
         <b>Commands:</b>\n\
         /train - start a new workout\n\
         /progress - workout history\n\
         /stats - progress statistics\n\
         /weight - record body weight\n\
         /cancel - cancel the current workout\n\
         /help - this message\n\n\
         <b>Workflow:</b>\n\
         1. Send /train\n\
         2. Pick a training day\n\
         3. Pick exercises in any order\n\
         4. Send results as <code>weight reps</code>, e.g. <code>60 10</code>\n\
         5. Use /skip to skip an exercise and come back later\n\
         6. Press 🏁 when you are done\n\n\
         <b>Program:</b>\n",
    );
    for day in &program.days {
        text.push_str(&format!(
            "• <b>{}</b>: {}\n",
            escape_html(&day.label),
            escape_html(&day.description)
        ));
    }
    text.push_str("\n💡 Alternate the days: week 1 A-B-A, week 2 B-A-B.");
    Reply::text(text)
}

pub fn unknown_day() -> Reply {
    Reply::text("❌ Please choose one of the offered days.")
}

pub fn set_saved(exercise: &str, weight: f64, reps: u32) -> Reply {
    Reply::text(format!(
        "✅ Saved: {}\nResult: {}\n\nChoose the next exercise:",
        escape_html(exercise),
        format_set(weight, reps)
    ))
}

pub fn set_input_error(error: &SetInputError) -> Reply {
    Reply::text(format!(
        "❌ Invalid format: {}\n\n\
         Send it as <code>weight reps</code>\n\
         Example: <code>60 10</code> or <code>32.5 8</code>",
        escape_html(&error.to_string())
    ))
}

pub fn exercise_skipped(exercise: &str) -> Reply {
    Reply::text(format!(
        "⏭️ Skipped: {}\n\nYou can come back to it later.",
        escape_html(exercise)
    ))
}

pub fn empty_session_discarded() -> Reply {
    Reply::text("❌ No exercises were recorded. The workout was cancelled.")
        .with_keyboard(main_menu())
}

pub fn session_not_found() -> Reply {
    Reply::text("❌ Workout session not found. Start over: /train").with_keyboard(main_menu())
}

pub fn cancelled() -> Reply {
    Reply::text("❌ Workout cancelled.").with_keyboard(Keyboard::Remove)
}

pub fn nothing_to_cancel() -> Reply {
    Reply::text("Nothing to cancel.").with_keyboard(main_menu())
}

pub fn nothing_to_skip() -> Reply {
    Reply::text("Nothing to skip right now.")
}

pub fn idle_hint() -> Reply {
    Reply::text("Send /train to start a workout or /help for all commands.")
        .with_keyboard(main_menu())
}

pub fn use_buttons() -> Reply {
    Reply::text("👇 Use the buttons to pick an exercise or finish the workout.")
}

pub fn weigh_in_prompt() -> Reply {
    Reply::text(format!(
        "⚖️ Send your body weight in kg (e.g. <code>81.5</code>), up to {}.\n\
         Or send /skip.",
        format_weight(MAX_BODY_WEIGHT)
    ))
}

pub fn body_weight_error(error: &BodyWeightError) -> Reply {
    Reply::text(format!(
        "❌ Invalid weight: {}\n\nSend a number such as <code>81.5</code> or /skip.",
        escape_html(&error.to_string())
    ))
}

pub fn body_weight_saved(weight: f64, previous: Option<f64>) -> Reply {
    let mut text = format!("✅ Body weight saved: {} kg", format_weight(weight));
    if let Some(previous) = previous {
        let delta = weight - previous;
        let sign = if delta > 0.0 { "+" } else { "" };
        text.push_str(&format!(
            "\nChange since last time: {sign}{} kg",
            format_weight(delta)
        ));
    }
    Reply::text(text).with_keyboard(main_menu())
}

pub fn weigh_in_skipped() -> Reply {
    Reply::text("👌 Body weight skipped.").with_keyboard(main_menu())
}

pub fn timer_started(seconds: u64) -> Reply {
    Reply::text(format!(
        "⏱ Rest timer started: {seconds} s. I'll ping you when it's time."
    ))
}

pub fn timer_finished() -> Reply {
    Reply::text("🔔 Rest is over, time for the next set!")
}

pub fn internal_error() -> Reply {
    Reply::text("❌ Something went wrong. Please try again or start over: /start")
}
