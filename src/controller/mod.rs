// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gasearch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gasearch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Interaction state machine for one page.
//!
//! A [`Controller`] lives for exactly one page. It validates user actions, enforces the
//! per-target attempt budget, persists through [`SessionStore`], and hands committing actions
//! back to the host as a [`Navigation`]. The host performs the navigation by dropping the
//! controller and building the next page from the reloaded session.

mod navigation;
mod query;

use std::collections::BTreeSet;

pub use navigation::Navigation;
pub use query::{QueryBuffer, QueryEdit};

use crate::config::Config;
use crate::i18n::{MessageKey, Messages};
use crate::model::{ImageId, SelectionState, SessionState};
use crate::store::{FieldUpdate, SessionStore};

/// A localized message for the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notice {
    pub key: MessageKey,
    pub text: &'static str,
}

/// Blocking user dialogs provided by the host.
pub trait UserPrompt {
    /// Asks a yes/no question; the controller waits for the answer.
    fn confirm(&mut self, message: &str) -> bool;

    fn notify(&mut self, notice: Notice);
}

/// What the host must do after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Stay,
    Navigate(Navigation),
    /// Rebuild the current page from the store without navigating.
    Reload,
}

/// An image the user clicked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectTarget {
    Grid(ImageId),
    /// A thumbnail inside the context window.
    Context(ImageId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftDirection {
    Previous,
    Next,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Submits the current query buffer.
    SubmitTextQuery,
    SubmitSimilarityQuery,
    SubmitBayesQuery,
    AdvanceToNextImage,
    /// Submits a grid image as the answer (modifier-click).
    CheckAnswer(ImageId),
    Select(SelectTarget),
    ShiftContext(ShiftDirection),
    ContextClick { id: ImageId, modifier: bool },
    AddLabelText { text: String, source: Option<ImageId> },
    ClearQuery,
    EditQuery(QueryEdit),
    CloseOverlay,
    ShowHelp,
    ToggleMoreLabels(ImageId),
}

/// Ids shown in the detail overlay around `center`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextWindow {
    pub center: ImageId,
    pub ids: Vec<ImageId>,
}

/// Ids of the context window around `center`, in offset order, dropping ids outside the dataset.
pub fn context_ids(center: ImageId, offsets: &[isize], dataset_size: usize) -> Vec<ImageId> {
    offsets
        .iter()
        .filter_map(|offset| center.checked_offset(*offset))
        .filter(|id| id.get() < dataset_size)
        .collect()
}

/// Startup check that the session store accepts writes.
///
/// While the probe fails the user may retry; declining switches to a non-persistent store.
/// Returns whether the store is still persistent.
pub fn check_storage(
    store: &mut SessionStore,
    messages: Messages,
    prompt: &mut dyn UserPrompt,
) -> bool {
    loop {
        match store.probe() {
            Ok(()) => return true,
            Err(err) => {
                log::warn!("session storage unavailable: {err}");
                if !prompt.confirm(messages.text(MessageKey::StorageWarning)) {
                    store.degrade();
                    return false;
                }
            }
        }
    }
}

pub struct Controller {
    config: Config,
    messages: Messages,
    store: SessionStore,
    session: SessionState,
    selection: SelectionState,
    query: QueryBuffer,
    context: Option<ContextWindow>,
    help_open: bool,
    expanded: BTreeSet<ImageId>,
    target: Option<ImageId>,
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("session", &self.session)
            .field("selection", &self.selection)
            .field("query", &self.query)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl Controller {
    /// Starts a page for the loaded `session` whose target image is `target`.
    ///
    /// The persisted activity log is cleared; it only describes label clicks on the current page.
    pub fn new(
        config: Config,
        messages: Messages,
        mut store: SessionStore,
        mut session: SessionState,
        target: Option<ImageId>,
    ) -> Self {
        if let Err(err) = store.clear_activity() {
            log::warn!("cannot clear activity log: {err}");
        }
        session.activity_log = Default::default();

        let query = if config.show_last_query {
            QueryBuffer::with_text(session.last_query.clone())
        } else {
            QueryBuffer::new()
        };

        log::debug!(
            "page ready: index={} trying={} target={target:?}",
            session.target_index,
            session.attempt_count
        );

        Self {
            config,
            messages,
            store,
            session,
            selection: SelectionState::default(),
            query,
            context: None,
            help_open: false,
            expanded: BTreeSet::new(),
            target,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn messages(&self) -> Messages {
        self.messages
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn query(&self) -> &QueryBuffer {
        &self.query
    }

    pub fn context(&self) -> Option<&ContextWindow> {
        self.context.as_ref()
    }

    pub fn help_open(&self) -> bool {
        self.help_open
    }

    pub fn is_expanded(&self, id: ImageId) -> bool {
        self.expanded.contains(&id)
    }

    pub fn target(&self) -> Option<ImageId> {
        self.target
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Hands the store back for the next page.
    pub fn into_store(self) -> SessionStore {
        self.store
    }

    pub fn budget_exhausted(&self) -> bool {
        self.session.budget_exhausted(self.config.max_attempts)
    }

    pub fn handle(&mut self, action: Action, prompt: &mut dyn UserPrompt) -> Outcome {
        match action {
            Action::SubmitTextQuery => {
                let query = self.query.as_str().to_owned();
                self.submit_text_query(&query, prompt)
            }
            Action::SubmitSimilarityQuery => {
                let selected = self.selection.selected_image_id;
                self.submit_similarity_query(selected, prompt)
            }
            Action::SubmitBayesQuery => {
                let selected = self.selection.selected_image_id;
                self.submit_bayes_query(selected, prompt)
            }
            Action::AdvanceToNextImage => self.advance_to_next_image(prompt),
            Action::CheckAnswer(candidate) => {
                let target = self.target;
                self.check_answer(candidate, target, prompt)
            }
            Action::Select(target) => {
                self.select(target, true);
                Outcome::Stay
            }
            Action::ShiftContext(direction) => {
                self.shift_context(direction);
                Outcome::Stay
            }
            Action::ContextClick { id, modifier } => self.context_click(id, modifier, prompt),
            Action::AddLabelText { text, source } => {
                self.add_label_text(&text, source);
                Outcome::Stay
            }
            Action::ClearQuery => {
                self.clear_query();
                Outcome::Stay
            }
            Action::EditQuery(edit) => {
                self.edit_query(edit);
                Outcome::Stay
            }
            Action::CloseOverlay => {
                self.close_overlay();
                Outcome::Stay
            }
            Action::ShowHelp => {
                self.show_help();
                Outcome::Stay
            }
            Action::ToggleMoreLabels(id) => {
                self.toggle_more_labels(id);
                Outcome::Stay
            }
        }
    }

    fn notify(&self, prompt: &mut dyn UserPrompt, key: MessageKey) {
        prompt.notify(Notice {
            key,
            text: self.messages.text(key),
        });
    }

    /// Asks for confirmation when the next search is the last one for this target.
    fn confirm_final_attempt(&self, prompt: &mut dyn UserPrompt) -> bool {
        if !self.session.is_final_attempt(self.config.max_attempts) {
            return true;
        }
        prompt.confirm(self.messages.text(MessageKey::FinalAttempt))
    }

    fn commit(
        &mut self,
        navigation: Navigation,
        next: SessionState,
        last_query: FieldUpdate,
        activity: FieldUpdate,
        prompt: &mut dyn UserPrompt,
    ) -> Outcome {
        let saved = self.store.save(
            next.target_index,
            next.attempt_count,
            last_query.clone(),
            activity.clone(),
        );
        if let Err(err) = saved {
            log::warn!("cannot persist session before {navigation}: {err}");
            if prompt.confirm(self.messages.text(MessageKey::StorageRetry)) {
                return Outcome::Reload;
            }
            self.store.degrade();
        }

        self.session.target_index = next.target_index;
        self.session.attempt_count = next.attempt_count;
        match last_query {
            FieldUpdate::Keep => {}
            FieldUpdate::Clear => self.session.last_query.clear(),
            FieldUpdate::Set(value) => self.session.last_query = value,
        }
        if activity != FieldUpdate::Keep {
            self.session.activity_log = Default::default();
        }

        log::debug!(
            "navigate {navigation}: index={} trying={}",
            self.session.target_index,
            self.session.attempt_count
        );
        Outcome::Navigate(navigation)
    }

    fn advance(&mut self, navigation: Navigation, prompt: &mut dyn UserPrompt) -> Outcome {
        let next = SessionState::new(self.session.target_index.saturating_add(1), 0);
        self.commit(navigation, next, FieldUpdate::Clear, FieldUpdate::Clear, prompt)
    }

    fn spend_attempt(
        &mut self,
        navigation: Navigation,
        last_query: FieldUpdate,
        prompt: &mut dyn UserPrompt,
    ) -> Outcome {
        let next = SessionState::new(
            self.session.target_index,
            self.session.attempt_count.saturating_add(1),
        );
        self.commit(navigation, next, last_query, FieldUpdate::Keep, prompt)
    }

    pub fn submit_text_query(&mut self, query: &str, prompt: &mut dyn UserPrompt) -> Outcome {
        if self.budget_exhausted() {
            return self.advance(Navigation::Advance, prompt);
        }
        if query.is_empty() {
            return Outcome::Stay;
        }
        if !self.confirm_final_attempt(prompt) {
            return Outcome::Stay;
        }
        self.spend_attempt(
            Navigation::TextQuery(query.to_owned()),
            FieldUpdate::Set(query.to_owned()),
            prompt,
        )
    }

    fn submit_feedback_query(
        &mut self,
        selected: Option<ImageId>,
        navigation: impl FnOnce(ImageId) -> Navigation,
        prompt: &mut dyn UserPrompt,
    ) -> Outcome {
        let Some(selected) = selected else {
            self.notify(prompt, MessageKey::SelectionRequired);
            return Outcome::Stay;
        };
        if self.budget_exhausted() {
            return self.advance(Navigation::Advance, prompt);
        }
        if !self.confirm_final_attempt(prompt) {
            return Outcome::Stay;
        }
        self.spend_attempt(navigation(selected), FieldUpdate::Clear, prompt)
    }

    pub fn submit_similarity_query(
        &mut self,
        selected: Option<ImageId>,
        prompt: &mut dyn UserPrompt,
    ) -> Outcome {
        if !self.config.similarity_search_enabled {
            return Outcome::Stay;
        }
        self.submit_feedback_query(selected, Navigation::Similarity, prompt)
    }

    pub fn submit_bayes_query(
        &mut self,
        selected: Option<ImageId>,
        prompt: &mut dyn UserPrompt,
    ) -> Outcome {
        self.submit_feedback_query(selected, Navigation::Bayes, prompt)
    }

    /// Skips the current target.
    pub fn advance_to_next_image(&mut self, prompt: &mut dyn UserPrompt) -> Outcome {
        self.advance(Navigation::Advance, prompt)
    }

    pub fn check_answer(
        &mut self,
        candidate: ImageId,
        target: Option<ImageId>,
        prompt: &mut dyn UserPrompt,
    ) -> Outcome {
        if target != Some(candidate) {
            self.notify(prompt, MessageKey::WrongAnswer);
            return Outcome::Stay;
        }
        self.notify(prompt, MessageKey::RightAnswer);
        self.advance(Navigation::Answer(candidate), prompt)
    }

    /// Selects an image. Selecting the already selected grid image opens its context window.
    pub fn select(&mut self, target: SelectTarget, allow_context_open: bool) {
        self.selection.highlighted = false;

        let id = match target {
            SelectTarget::Context(_) => return,
            SelectTarget::Grid(id) => id,
        };

        if allow_context_open && self.selection.selected_image_id == Some(id) {
            self.show_context(id);
        }

        self.selection.selected_image_id = Some(id);
        self.selection.highlighted = true;
    }

    /// Opens the context window around `center`.
    pub fn show_context(&mut self, center: ImageId) {
        let ids = context_ids(center, &self.config.context_offsets, self.config.dataset_size);
        log::debug!("context around {center}: {} images", ids.len());
        self.selection.context_center_id = Some(center);
        self.context = Some(ContextWindow { center, ids });
    }

    pub fn shift_context(&mut self, direction: ShiftDirection) {
        if !self.config.shift_in_context_enabled {
            return;
        }
        let Some(center) = self.selection.context_center_id else {
            return;
        };
        let shift = self.config.context_shift;
        let next = match direction {
            ShiftDirection::Previous => center.get().checked_sub(shift),
            ShiftDirection::Next => center
                .get()
                .checked_add(shift)
                .filter(|next| *next <= self.config.dataset_size),
        };
        if let Some(next) = next {
            self.show_context(ImageId::new(next));
        }
    }

    /// A click on a context thumbnail. Only the center may be submitted as the answer.
    pub fn context_click(
        &mut self,
        id: ImageId,
        modifier: bool,
        prompt: &mut dyn UserPrompt,
    ) -> Outcome {
        if !modifier {
            self.select(SelectTarget::Context(id), false);
            return Outcome::Stay;
        }
        if self.selection.context_center_id != Some(id) {
            self.notify(prompt, MessageKey::ContextNotSubmittable);
            return Outcome::Stay;
        }
        let target = self.target;
        self.check_answer(id, target, prompt)
    }

    /// Adds a class name to the query. With a source image the click is also logged.
    pub fn add_label_text(&mut self, text: &str, source: Option<ImageId>) {
        self.query.append_term(text, &self.config.query_connective);

        let Some(source) = source else {
            return;
        };
        self.session.activity_log.push(text, source);
        if let Err(err) = self.store.append_activity(text, source) {
            log::warn!("cannot record activity {text}:{source}: {err}");
        }
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
        self.session.activity_log = Default::default();
        if let Err(err) = self.store.clear_activity() {
            log::warn!("cannot clear activity log: {err}");
        }
    }

    pub fn edit_query(&mut self, edit: QueryEdit) {
        self.query.apply(edit);
    }

    pub fn close_overlay(&mut self) {
        self.context = None;
        self.selection.context_center_id = None;
        self.help_open = false;
    }

    pub fn show_help(&mut self) {
        self.help_open = true;
    }

    pub fn toggle_more_labels(&mut self, id: ImageId) {
        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
    }
}

#[cfg(test)]
mod tests;
