// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gasearch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gasearch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::{fixture, rstest};

use super::{
    check_storage, context_ids, Action, Controller, Navigation, Notice, Outcome, QueryEdit,
    SelectTarget, ShiftDirection, UserPrompt,
};
use crate::config::Config;
use crate::i18n::{MessageKey, Messages};
use crate::model::{ImageId, SessionState};
use crate::store::{FieldUpdate, KeyValueStore, MemoryStore, SessionStore, KEY_ACTIVITY};

const TARGET: ImageId = ImageId::new(120);

#[derive(Debug, Default)]
struct ScriptedPrompt {
    answer: bool,
    confirms: Vec<String>,
    notices: Vec<MessageKey>,
}

impl ScriptedPrompt {
    fn accepting() -> Self {
        Self {
            answer: true,
            ..Self::default()
        }
    }

    fn declining() -> Self {
        Self::default()
    }
}

impl UserPrompt for ScriptedPrompt {
    fn confirm(&mut self, message: &str) -> bool {
        self.confirms.push(message.to_owned());
        self.answer
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice.key);
    }
}

fn page(store: SessionStore, config: &Config) -> Controller {
    let session = store.load();
    Controller::new(config.clone(), Messages::default(), store, session, Some(TARGET))
}

fn page_at(target_index: usize, attempt_count: u32) -> Controller {
    let mut store = SessionStore::new(MemoryStore::new());
    store
        .save(target_index, attempt_count, FieldUpdate::Clear, FieldUpdate::Clear)
        .unwrap();
    page(store, &Config::default())
}

/// Performs a navigation the way the host does: drop the page, reload from the store.
fn navigate(controller: Controller) -> Controller {
    let config = controller.config().clone();
    page(controller.into_store(), &config)
}

#[fixture]
fn fresh() -> Controller {
    page_at(0, 0)
}

#[rstest]
fn text_query_spends_one_attempt(mut fresh: Controller) {
    let mut prompt = ScriptedPrompt::declining();
    let outcome = fresh.submit_text_query("blue fish", &mut prompt);

    assert_eq!(outcome, Outcome::Navigate(Navigation::TextQuery("blue fish".to_owned())));
    assert!(prompt.confirms.is_empty());

    let next = navigate(fresh);
    assert_eq!(next.session().target_index, 0);
    assert_eq!(next.session().attempt_count, 1);
    assert_eq!(next.session().last_query, "blue fish");
    assert_eq!(next.query().as_str(), "blue fish");
}

#[rstest]
fn empty_text_query_is_ignored(mut fresh: Controller) {
    let mut prompt = ScriptedPrompt::accepting();
    assert_eq!(fresh.submit_text_query("", &mut prompt), Outcome::Stay);
    assert_eq!(navigate(fresh).session(), &SessionState::default());
}

#[test]
fn twenty_attempt_scenario_force_advances() {
    let mut controller = page_at(0, 0);
    let mut prompt = ScriptedPrompt::accepting();

    for attempt in 1..=19 {
        let outcome = controller.submit_text_query("reef", &mut prompt);
        assert!(matches!(outcome, Outcome::Navigate(Navigation::TextQuery(_))));
        controller = navigate(controller);
        assert_eq!(controller.session().attempt_count, attempt);
    }
    assert!(prompt.confirms.is_empty());

    let outcome = controller.submit_text_query("reef", &mut prompt);
    assert!(matches!(outcome, Outcome::Navigate(Navigation::TextQuery(_))));
    assert_eq!(prompt.confirms, vec![Messages::default().text(MessageKey::FinalAttempt)]);
    controller = navigate(controller);
    assert_eq!(controller.session().attempt_count, 20);
    assert!(controller.budget_exhausted());

    let outcome = controller.submit_text_query("ignored", &mut prompt);
    assert_eq!(outcome, Outcome::Navigate(Navigation::Advance));
    controller = navigate(controller);
    assert_eq!(controller.session(), &SessionState::new(1, 0));
}

#[rstest]
#[case::text(Action::SubmitTextQuery)]
#[case::similarity(Action::SubmitSimilarityQuery)]
#[case::bayes(Action::SubmitBayesQuery)]
fn declined_final_attempt_changes_nothing(#[case] action: Action) {
    let mut controller = page_at(2, 19);
    controller.select(SelectTarget::Grid(ImageId::new(5)), true);
    controller.add_label_text("coral", None);
    let mut prompt = ScriptedPrompt::declining();

    assert_eq!(controller.handle(action.clone(), &mut prompt), Outcome::Stay);
    assert_eq!(controller.handle(action, &mut prompt), Outcome::Stay);
    assert_eq!(prompt.confirms.len(), 2);

    let next = navigate(controller);
    assert_eq!(next.session(), &SessionState::new(2, 19));
}

#[rstest]
#[case::similarity(Action::SubmitSimilarityQuery)]
#[case::bayes(Action::SubmitBayesQuery)]
fn feedback_query_requires_selection(#[case] action: Action) {
    let mut controller = page_at(0, 20);
    let mut prompt = ScriptedPrompt::accepting();

    assert_eq!(controller.handle(action, &mut prompt), Outcome::Stay);
    assert_eq!(prompt.notices, vec![MessageKey::SelectionRequired]);
    assert_eq!(navigate(controller).session(), &SessionState::new(0, 20));
}

#[rstest]
#[case::similarity(Action::SubmitSimilarityQuery, Navigation::Similarity(ImageId::new(33)))]
#[case::bayes(Action::SubmitBayesQuery, Navigation::Bayes(ImageId::new(33)))]
fn feedback_query_clears_last_query(#[case] action: Action, #[case] expected: Navigation) {
    let mut store = SessionStore::new(MemoryStore::new());
    store.save(1, 4, FieldUpdate::value("old"), FieldUpdate::Clear).unwrap();
    let mut controller = page(store, &Config::default());
    controller.select(SelectTarget::Grid(ImageId::new(33)), true);

    let outcome = controller.handle(action, &mut ScriptedPrompt::declining());
    assert_eq!(outcome, Outcome::Navigate(expected));

    let next = navigate(controller);
    assert_eq!(next.session().attempt_count, 5);
    assert_eq!(next.session().last_query, "");
}

#[test]
fn disabled_similarity_is_refused_silently() {
    let config = Config {
        similarity_search_enabled: false,
        ..Config::default()
    };
    let mut controller = page(SessionStore::new(MemoryStore::new()), &config);
    let mut prompt = ScriptedPrompt::accepting();

    let outcome = controller.submit_similarity_query(Some(ImageId::new(1)), &mut prompt);
    assert_eq!(outcome, Outcome::Stay);
    assert!(prompt.notices.is_empty());
}

#[rstest]
fn exhausted_feedback_query_advances(
    #[values(Action::SubmitSimilarityQuery, Action::SubmitBayesQuery)] action: Action,
) {
    let mut controller = page_at(3, 20);
    controller.select(SelectTarget::Grid(ImageId::new(9)), true);

    let outcome = controller.handle(action, &mut ScriptedPrompt::declining());
    assert_eq!(outcome, Outcome::Navigate(Navigation::Advance));
    assert_eq!(navigate(controller).session(), &SessionState::new(4, 0));
}

#[rstest]
fn correct_answer_advances(mut fresh: Controller) {
    let mut prompt = ScriptedPrompt::accepting();
    fresh.submit_text_query("sand", &mut prompt);
    let mut controller = navigate(fresh);

    let outcome = controller.handle(Action::CheckAnswer(TARGET), &mut prompt);
    assert_eq!(outcome, Outcome::Navigate(Navigation::Answer(TARGET)));
    assert_eq!(prompt.notices, vec![MessageKey::RightAnswer]);
    assert_eq!(navigate(controller).session(), &SessionState::new(1, 0));
}

#[rstest]
fn wrong_answer_only_notifies(mut fresh: Controller) {
    let mut prompt = ScriptedPrompt::accepting();
    let outcome = fresh.check_answer(ImageId::new(121), Some(TARGET), &mut prompt);

    assert_eq!(outcome, Outcome::Stay);
    assert_eq!(prompt.notices, vec![MessageKey::WrongAnswer]);
    assert_eq!(navigate(fresh).session(), &SessionState::default());
}

#[rstest]
fn skipping_clears_query_and_activity(mut fresh: Controller) {
    fresh.add_label_text("shark", Some(ImageId::new(2)));
    let mut prompt = ScriptedPrompt::accepting();
    assert_eq!(fresh.advance_to_next_image(&mut prompt), Outcome::Navigate(Navigation::Advance));

    let store = fresh.into_store();
    assert_eq!(store.load().target_index, 1);
    assert!(store.load().activity_log.is_empty());
}

#[test]
fn budget_never_exceeds_max_and_index_never_decreases() {
    let config = Config {
        max_attempts: 3,
        ..Config::default()
    };
    let mut controller = page(SessionStore::new(MemoryStore::new()), &config);
    let mut prompt = ScriptedPrompt::accepting();
    let mut last_index = 0;

    for step in 0..20 {
        match step % 4 {
            0 | 1 => controller.submit_text_query("kelp", &mut prompt),
            2 => controller.submit_bayes_query(Some(ImageId::new(step)), &mut prompt),
            _ => controller.check_answer(ImageId::new(step), Some(TARGET), &mut prompt),
        };
        controller = navigate(controller);
        let session = controller.session();
        assert!(session.attempt_count <= 3);
        assert!(session.target_index >= last_index);
        last_index = session.target_index;
    }
    assert!(last_index > 0);
}

#[rstest]
#[case(ImageId::new(10), vec![8, 9, 10, 11, 12])]
#[case(ImageId::new(1), vec![0, 1, 2, 3])]
#[case(ImageId::new(0), vec![0, 1, 2])]
#[case(ImageId::new(22035), vec![22033, 22034, 22035])]
fn context_window_stays_in_dataset(#[case] center: ImageId, #[case] expected: Vec<usize>) {
    let expected = expected.into_iter().map(ImageId::new).collect::<Vec<_>>();
    assert_eq!(context_ids(center, &[-2, -1, 0, 1, 2], 22036), expected);
}

#[rstest]
fn second_click_on_selection_opens_context(mut fresh: Controller) {
    let id = ImageId::new(50);
    fresh.select(SelectTarget::Grid(id), true);
    assert_eq!(fresh.selection().highlighted_image_id(), Some(id));
    assert!(fresh.context().is_none());

    fresh.select(SelectTarget::Grid(id), true);
    let window = fresh.context().expect("context window");
    assert_eq!(window.center, id);
    assert_eq!(window.ids.len(), 5);
    assert_eq!(fresh.selection().context_center_id, Some(id));

    fresh.select(SelectTarget::Grid(ImageId::new(51)), true);
    assert_eq!(fresh.context().map(|window| window.center), Some(id));
    assert_eq!(fresh.selection().selected_image_id, Some(ImageId::new(51)));
}

#[rstest]
fn selection_without_context_open_never_opens_window(mut fresh: Controller) {
    let id = ImageId::new(7);
    fresh.select(SelectTarget::Grid(id), false);
    fresh.select(SelectTarget::Grid(id), false);
    assert!(fresh.context().is_none());
}

#[rstest]
fn context_thumbnail_click_only_drops_highlight(mut fresh: Controller) {
    let id = ImageId::new(30);
    fresh.select(SelectTarget::Grid(id), true);
    fresh.select(SelectTarget::Grid(id), true);

    let mut prompt = ScriptedPrompt::accepting();
    let click = Action::ContextClick {
        id: ImageId::new(31),
        modifier: false,
    };
    let outcome = fresh.handle(click, &mut prompt);

    assert_eq!(outcome, Outcome::Stay);
    assert_eq!(fresh.selection().selected_image_id, Some(id));
    assert_eq!(fresh.selection().highlighted_image_id(), None);
    assert_eq!(fresh.context().map(|window| window.center), Some(id));
}

#[rstest]
fn only_context_center_can_be_submitted(mut fresh: Controller) {
    fresh.show_context(TARGET);
    let mut prompt = ScriptedPrompt::accepting();

    let outcome = fresh.context_click(ImageId::new(121), true, &mut prompt);
    assert_eq!(outcome, Outcome::Stay);
    assert_eq!(prompt.notices, vec![MessageKey::ContextNotSubmittable]);

    let outcome = fresh.context_click(TARGET, true, &mut prompt);
    assert_eq!(outcome, Outcome::Navigate(Navigation::Answer(TARGET)));
}

#[rstest]
fn context_center_is_checked_against_page_target(mut fresh: Controller) {
    fresh.show_context(ImageId::new(400));
    let mut prompt = ScriptedPrompt::accepting();

    let outcome = fresh.context_click(ImageId::new(400), true, &mut prompt);
    assert_eq!(outcome, Outcome::Stay);
    assert_eq!(prompt.notices, vec![MessageKey::WrongAnswer]);
}

#[test]
fn shift_context_respects_dataset_bounds() {
    let config = Config {
        dataset_size: 10,
        ..Config::default()
    };
    let mut controller = page(SessionStore::new(MemoryStore::new()), &config);

    controller.shift_context(ShiftDirection::Next);
    assert!(controller.context().is_none());

    controller.show_context(ImageId::new(4));
    controller.shift_context(ShiftDirection::Previous);
    assert_eq!(controller.selection().context_center_id, Some(ImageId::new(1)));
    controller.shift_context(ShiftDirection::Previous);
    assert_eq!(controller.selection().context_center_id, Some(ImageId::new(1)));

    controller.show_context(ImageId::new(7));
    controller.shift_context(ShiftDirection::Next);
    assert_eq!(controller.selection().context_center_id, Some(ImageId::new(10)));
    assert_eq!(controller.context().map(|window| window.ids.len()), Some(2));
    controller.shift_context(ShiftDirection::Next);
    assert_eq!(controller.selection().context_center_id, Some(ImageId::new(10)));

    controller.close_overlay();
    assert_eq!(controller.selection().context_center_id, None);
    assert!(controller.context().is_none());
}

#[test]
fn shift_context_disabled_is_noop() {
    let config = Config {
        shift_in_context_enabled: false,
        ..Config::default()
    };
    let mut controller = page(SessionStore::new(MemoryStore::new()), &config);
    controller.show_context(ImageId::new(40));
    controller.shift_context(ShiftDirection::Next);
    assert_eq!(controller.selection().context_center_id, Some(ImageId::new(40)));
}

#[rstest]
fn label_clicks_build_query_and_activity(mut fresh: Controller) {
    fresh.add_label_text("fish", Some(ImageId::new(3)));
    fresh.add_label_text("coral", None);
    fresh.add_label_text("sand", Some(ImageId::new(8)));

    assert_eq!(fresh.query().as_str(), "fish, coral, sand");
    assert_eq!(fresh.query().cursor(), "fish, coral, sand".len());
    assert_eq!(fresh.session().activity_log.to_string(), "fish:3|sand:8|");
    assert_eq!(fresh.store().load().activity_log.to_string(), "fish:3|sand:8|");

    fresh.clear_query();
    assert!(fresh.query().is_empty());
    assert!(fresh.store().load().activity_log.is_empty());
}

#[test]
fn activity_survives_text_query_and_is_reset_on_page_start() {
    let mut controller = page_at(0, 0);
    controller.add_label_text("whale", Some(ImageId::new(11)));
    controller.submit_text_query("whale", &mut ScriptedPrompt::accepting());

    let store = controller.into_store();
    assert_eq!(store.load().activity_log.to_string(), "whale:11|");

    let next = page(store, &Config::default());
    assert!(next.session().activity_log.is_empty());
    assert!(next.store().load().activity_log.is_empty());
}

#[test]
fn last_query_prefill_follows_config() {
    let mut store = SessionStore::new(MemoryStore::new());
    store.save(0, 1, FieldUpdate::value("octopus"), FieldUpdate::Clear).unwrap();
    let config = Config {
        show_last_query: false,
        ..Config::default()
    };
    let controller = page(store, &config);
    assert!(controller.query().is_empty());
    assert_eq!(controller.session().last_query, "octopus");
}

#[rstest]
fn query_edits_feed_text_submission(mut fresh: Controller) {
    let mut prompt = ScriptedPrompt::accepting();
    for ch in "ray".chars() {
        fresh.handle(Action::EditQuery(QueryEdit::Insert(ch)), &mut prompt);
    }
    assert_eq!(
        fresh.handle(Action::SubmitTextQuery, &mut prompt),
        Outcome::Navigate(Navigation::TextQuery("ray".to_owned()))
    );
}

#[rstest]
fn overlays_and_tile_expansion(mut fresh: Controller) {
    let mut prompt = ScriptedPrompt::accepting();
    fresh.handle(Action::ShowHelp, &mut prompt);
    assert!(fresh.help_open());
    fresh.handle(Action::CloseOverlay, &mut prompt);
    assert!(!fresh.help_open());

    let id = ImageId::new(2);
    fresh.handle(Action::ToggleMoreLabels(id), &mut prompt);
    assert!(fresh.is_expanded(id));
    fresh.handle(Action::ToggleMoreLabels(id), &mut prompt);
    assert!(!fresh.is_expanded(id));
}

#[test]
fn storage_failure_retry_reloads_without_mutation() {
    let mut memory = MemoryStore::with_values([("index", "2"), ("trying", "5")]);
    memory.set_disabled(true);
    let mut controller = page(SessionStore::new(memory), &Config::default());
    let mut prompt = ScriptedPrompt::accepting();

    let outcome = controller.submit_text_query("eel", &mut prompt);
    assert_eq!(outcome, Outcome::Reload);
    assert_eq!(prompt.confirms, vec![Messages::default().text(MessageKey::StorageRetry)]);
    assert_eq!(controller.session(), &SessionState::new(2, 5));
    assert!(controller.store().is_persistent());
}

#[test]
fn storage_failure_decline_degrades_and_navigates() {
    let mut controller = page(SessionStore::new(MemoryStore::disabled()), &Config::default());
    let mut prompt = ScriptedPrompt::declining();

    let outcome = controller.submit_text_query("eel", &mut prompt);
    assert_eq!(outcome, Outcome::Navigate(Navigation::TextQuery("eel".to_owned())));
    assert!(!controller.store().is_persistent());

    let next = navigate(controller);
    assert_eq!(next.session(), &SessionState::default());
}

#[test]
fn page_start_clears_persisted_activity() {
    let memory =
        MemoryStore::with_values([("index", "0"), ("trying", "0"), (KEY_ACTIVITY, "\"a:1|\"")]);
    let controller = page(SessionStore::new(memory), &Config::default());
    let raw = controller.into_store().into_inner().get(KEY_ACTIVITY).unwrap();
    assert_eq!(raw.as_deref(), Some("\"\""));
}

struct AnswerQueue(Vec<bool>);

impl UserPrompt for AnswerQueue {
    fn confirm(&mut self, _message: &str) -> bool {
        if self.0.is_empty() {
            false
        } else {
            self.0.remove(0)
        }
    }

    fn notify(&mut self, _notice: Notice) {}
}

#[test]
fn startup_check_retries_then_degrades() {
    let mut store = SessionStore::new(MemoryStore::disabled());
    let mut prompt = AnswerQueue(vec![true, true]);

    assert!(!check_storage(&mut store, Messages::default(), &mut prompt));
    assert!(prompt.0.is_empty());
    assert!(!store.is_persistent());
}

#[test]
fn startup_check_passes_on_writable_store() {
    let mut store = SessionStore::new(MemoryStore::new());
    assert!(check_storage(&mut store, Messages::default(), &mut ScriptedPrompt::declining()));
    assert!(store.is_persistent());
}
