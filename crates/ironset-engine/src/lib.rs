//! # ironset-engine — Conversation state machine
//!
//! One [`ConversationEngine::handle`] call is one turn: load the user
//! directory, apply the inbound event to the sender's profile according to its
//! persisted [`ConversationState`], save, and hand the rendered replies back to
//! the transport. Store failures degrade (empty load, logged save); errors
//! returned from `handle` leave the stored state untouched.

mod timer;

pub use timer::RestTimer;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use ironset_coach::{Coach, CoachConfig};
use ironset_protocol::{
    ButtonAction, Command, ConversationState, DayProgram, FinishOutcome, Inbound, InboundEvent,
    NotifierPort, Reply, Sender, SetInput, TrackerResult, TrainingProgram, UserProfile,
    UserStorePort, WorkoutSession, parse_body_weight,
};
use ironset_render::{messages, reports, views};
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub rest_timer: Duration,
    /// Ask for body weight after a workout is archived.
    pub weigh_in_after_finish: bool,
    /// Sessions listed by the history view.
    pub history_window: usize,
    pub coach: CoachConfig,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self {
            rest_timer: Duration::from_secs(90),
            weigh_in_after_finish: true,
            history_window: reports::HISTORY_SESSIONS,
            coach: CoachConfig::default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of one turn.
#[derive(Debug, Clone)]
pub struct Turn {
    pub replies: Vec<Reply>,
    pub state: ConversationState,
}

pub struct EngineBuilder {
    store: Arc<dyn UserStorePort>,
    notifier: Arc<dyn NotifierPort>,
    config: EngineConfig,
    program: TrainingProgram,
}

impl EngineBuilder {
    pub fn new(store: Arc<dyn UserStorePort>, notifier: Arc<dyn NotifierPort>) -> Self {
        Self {
            store,
            notifier,
            config: EngineConfig::default(),
            program: TrainingProgram::default(),
        }
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn program(mut self, program: TrainingProgram) -> Self {
        self.program = program;
        self
    }

    pub fn build(self) -> Result<ConversationEngine> {
        self.program
            .validate()
            .context("training program failed validation")?;

        let timer = RestTimer::new(self.notifier, self.config.rest_timer);
        let coach = Coach::new(self.config.coach.clone());

        Ok(ConversationEngine {
            config: self.config,
            program: Arc::new(self.program),
            coach,
            store: self.store,
            timer,
        })
    }
}

#[derive(Clone)]
pub struct ConversationEngine {
    config: EngineConfig,
    program: Arc<TrainingProgram>,
    coach: Coach,
    store: Arc<dyn UserStorePort>,
    timer: RestTimer,
}

impl ConversationEngine {
    pub fn program(&self) -> &TrainingProgram {
        &self.program
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[instrument(
        skip(self, inbound),
        fields(user_id = %inbound.sender.user_id, event = inbound.event.kind())
    )]
    pub async fn handle(&self, inbound: Inbound) -> Result<Turn> {
        let Inbound { sender, event } = inbound;
        let mut users = self.store.load().await;

        let profile = users
            .entry(sender.user_id.clone())
            .or_insert_with(|| UserProfile::new(sender.display_name.clone()));
        let before = profile.conversation;

        let replies = self
            .step(profile, &sender, event, Utc::now())
            .with_context(|| format!("turn failed for user {}", sender.user_id))?;

        let state = profile.conversation;
        if before != state {
            debug!(from = before.name(), to = state.name(), "conversation moved");
        }

        if let Err(error) = self.store.save(&users).await {
            warn!(error = %error, "user data not persisted, turn effects may be lost");
        }

        Ok(Turn { replies, state })
    }

    fn step(
        &self,
        profile: &mut UserProfile,
        sender: &Sender,
        event: InboundEvent,
        now: DateTime<Utc>,
    ) -> TrackerResult<Vec<Reply>> {
        match event {
            InboundEvent::Command { command } => self.on_command(profile, sender, command),
            InboundEvent::Text { text } => self.on_text(profile, &text, now),
            InboundEvent::Button { action } => self.on_button(profile, sender, action),
        }
    }

    fn on_command(
        &self,
        profile: &mut UserProfile,
        sender: &Sender,
        command: Command,
    ) -> TrackerResult<Vec<Reply>> {
        let reply = match command {
            Command::Start => {
                profile.conversation = ConversationState::Idle;
                messages::welcome(&sender.display_name).with_keyboard(messages::main_menu())
            }
            Command::Train => {
                profile.conversation = ConversationState::ChoosingDay;
                views::day_prompt(&self.program)
            }
            Command::History => reports::history(profile, self.config.history_window),
            Command::Stats => reports::stats(profile, &self.program),
            Command::Help => messages::help(&self.program),
            Command::Weight => {
                profile.conversation = ConversationState::Weighing;
                messages::weigh_in_prompt()
            }
            Command::Cancel => self.cancel(profile),
            Command::Skip => return self.skip(profile),
        };
        Ok(vec![reply])
    }

    fn on_text(
        &self,
        profile: &mut UserProfile,
        text: &str,
        now: DateTime<Utc>,
    ) -> TrackerResult<Vec<Reply>> {
        match profile.conversation {
            ConversationState::Idle => Ok(vec![messages::idle_hint()]),
            ConversationState::ChoosingDay => Ok(self.choose_day(profile, text, now)),
            ConversationState::ChoosingExercise => {
                if self.open_session(profile).is_none() {
                    return Ok(self.session_lost(profile));
                }
                Ok(vec![messages::use_buttons()])
            }
            ConversationState::EnteringExerciseData { exercise_index } => {
                self.record_set(profile, exercise_index, text, now)
            }
            ConversationState::Weighing => Ok(self.record_body_weight(profile, text, now)),
        }
    }

    fn on_button(
        &self,
        profile: &mut UserProfile,
        sender: &Sender,
        action: ButtonAction,
    ) -> TrackerResult<Vec<Reply>> {
        if profile.conversation == ConversationState::Weighing {
            return Ok(vec![messages::weigh_in_prompt()]);
        }
        let Some((day, session)) = self.open_session(profile) else {
            return Ok(self.session_lost(profile));
        };

        let replies = match action {
            ButtonAction::SelectExercise(index) => match day.exercise(index) {
                Ok(exercise) => {
                    let previous = profile.recent_records(exercise, 1).first().copied();
                    let reply = views::exercise_prompt(exercise, previous);
                    profile.conversation = ConversationState::EnteringExerciseData {
                        exercise_index: index,
                    };
                    vec![reply]
                }
                Err(error) => {
                    warn!(error = %error, "exercise button ignored");
                    vec![views::choose_exercise(day, session)]
                }
            },
            ButtonAction::Progress => vec![views::session_progress(day, session)],
            ButtonAction::Recommend => vec![reports::recommendations(day, profile, &self.coach)],
            ButtonAction::Finish => self.finish(profile),
            ButtonAction::Timer => {
                let _timer = self.timer.start(sender.chat_id.clone());
                vec![messages::timer_started(self.timer.delay().as_secs())]
            }
            ButtonAction::Back => {
                let reply = views::choose_exercise(day, session);
                profile.conversation = ConversationState::ChoosingExercise;
                vec![reply]
            }
        };
        Ok(replies)
    }

    fn choose_day(&self, profile: &mut UserProfile, text: &str, now: DateTime<Utc>) -> Vec<Reply> {
        let Some(day) = self.program.resolve_day(text) else {
            let mut reply = messages::unknown_day();
            reply.keyboard = views::day_prompt(&self.program).keyboard;
            return vec![reply];
        };

        let fresh = WorkoutSession::new(day.label.clone(), now);
        let replies = vec![views::exercise_list(day), views::choose_exercise(day, &fresh)];

        if let Some(replaced) = profile.begin_session(day.label.clone(), now) {
            info!(
                day = %replaced.day,
                records = replaced.exercises.len(),
                "unfinished workout replaced"
            );
        }
        info!(day = %day.label, "workout started");
        profile.conversation = ConversationState::ChoosingExercise;
        replies
    }

    fn record_set(
        &self,
        profile: &mut UserProfile,
        index: usize,
        text: &str,
        now: DateTime<Utc>,
    ) -> TrackerResult<Vec<Reply>> {
        let Some(session) = profile.current_session.as_mut() else {
            return Ok(self.session_lost(profile));
        };
        let Some(day) = self.program.day(&session.day) else {
            return Ok(self.session_lost(profile));
        };
        let exercise = day.exercise(index)?;

        let set = match text.parse::<SetInput>() {
            Ok(set) => set,
            Err(error) => {
                debug!(error = %error, "set input rejected");
                return Ok(vec![messages::set_input_error(&error)]);
            }
        };

        let record = session.record_set(index, exercise, set, now);
        info!(exercise, weight = record.weight, reps = record.reps, "set recorded");

        let replies = vec![
            messages::set_saved(exercise, set.weight, set.reps),
            views::choose_exercise(day, session),
        ];
        profile.conversation = ConversationState::ChoosingExercise;
        Ok(replies)
    }

    fn record_body_weight(
        &self,
        profile: &mut UserProfile,
        text: &str,
        now: DateTime<Utc>,
    ) -> Vec<Reply> {
        let weight = match parse_body_weight(text) {
            Ok(weight) => weight,
            Err(error) => {
                debug!(error = %error, "body weight rejected");
                return vec![messages::body_weight_error(&error)];
            }
        };

        let previous = profile.weight_history.last().map(|record| record.weight);
        profile.record_body_weight(weight, now);
        info!(weight, "body weight recorded");

        let mut replies = vec![messages::body_weight_saved(weight, previous)];
        replies.extend(self.leave_weighing(profile));
        replies
    }

    fn skip(&self, profile: &mut UserProfile) -> TrackerResult<Vec<Reply>> {
        match profile.conversation {
            ConversationState::EnteringExerciseData { exercise_index } => {
                let Some((day, session)) = self.open_session(profile) else {
                    return Ok(self.session_lost(profile));
                };
                let exercise = day.exercise(exercise_index)?;
                let replies = vec![
                    messages::exercise_skipped(exercise),
                    views::choose_exercise(day, session),
                ];
                profile.conversation = ConversationState::ChoosingExercise;
                Ok(replies)
            }
            ConversationState::Weighing => {
                let mut replies = vec![messages::weigh_in_skipped()];
                replies.extend(self.leave_weighing(profile));
                Ok(replies)
            }
            _ => Ok(vec![messages::nothing_to_skip()]),
        }
    }

    fn finish(&self, profile: &mut UserProfile) -> Vec<Reply> {
        match profile.finish_session() {
            FinishOutcome::NoSession => self.session_lost(profile),
            FinishOutcome::Discarded(session) => {
                info!(day = %session.day, "empty workout discarded");
                profile.conversation = ConversationState::Idle;
                vec![messages::empty_session_discarded()]
            }
            FinishOutcome::Archived(session) => {
                info!(
                    day = %session.day,
                    records = session.exercises.len(),
                    total = profile.history.len(),
                    "workout archived"
                );
                let mut replies = vec![views::session_summary(
                    self.program.day(&session.day),
                    &session,
                )];
                if self.config.weigh_in_after_finish {
                    profile.conversation = ConversationState::Weighing;
                    replies.push(messages::weigh_in_prompt());
                } else {
                    profile.conversation = ConversationState::Idle;
                }
                replies
            }
        }
    }

    fn cancel(&self, profile: &mut UserProfile) -> Reply {
        let was_idle = profile.conversation.is_idle();
        profile.conversation = ConversationState::Idle;
        match profile.cancel_session() {
            Some(session) => {
                info!(
                    day = %session.day,
                    records = session.exercises.len(),
                    "workout cancelled"
                );
                messages::cancelled()
            }
            None if !was_idle => messages::cancelled(),
            None => messages::nothing_to_cancel(),
        }
    }

    /// Weighing ends the conversation, unless a workout is still open (the
    /// `/weight` command mid-session), in which case the exercise keyboard
    /// comes back.
    fn leave_weighing(&self, profile: &mut UserProfile) -> Option<Reply> {
        let reply = self
            .open_session(profile)
            .map(|(day, session)| views::choose_exercise(day, session));
        profile.conversation = match reply {
            Some(_) => ConversationState::ChoosingExercise,
            None => ConversationState::Idle,
        };
        reply
    }

    fn open_session<'p>(
        &self,
        profile: &'p UserProfile,
    ) -> Option<(&DayProgram, &'p WorkoutSession)> {
        let session = profile.current_session.as_ref()?;
        let day = self.program.day(&session.day)?;
        Some((day, session))
    }

    fn session_lost(&self, profile: &mut UserProfile) -> Vec<Reply> {
        warn!(state = profile.conversation.name(), "no open workout session");
        profile.conversation = ConversationState::Idle;
        vec![messages::session_not_found()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ironset_protocol::{ChatId, UserDirectory};

    struct NullStore;

    #[async_trait]
    impl UserStorePort for NullStore {
        async fn load(&self) -> UserDirectory {
            UserDirectory::new()
        }

        async fn save(&self, _users: &UserDirectory) -> TrackerResult<()> {
            Ok(())
        }
    }

    struct NullNotifier;

    #[async_trait]
    impl NotifierPort for NullNotifier {
        async fn notify(&self, _chat_id: ChatId, _reply: Reply) -> TrackerResult<()> {
            Ok(())
        }
    }

    #[test]
    fn default_config_matches_documented_values() {
        let config = EngineConfig::default();
        assert_eq!(config.rest_timer, Duration::from_secs(90));
        assert!(config.weigh_in_after_finish);
        assert_eq!(config.history_window, 5);
    }

    #[test]
    fn builder_rejects_invalid_program() {
        let program = TrainingProgram {
            days: vec![DayProgram {
                label: "Day A".to_owned(),
                description: String::new(),
                exercises: Vec::new(),
            }],
        };
        let built = EngineBuilder::new(Arc::new(NullStore), Arc::new(NullNotifier))
            .program(program)
            .build();
        assert!(built.is_err());
    }
}
