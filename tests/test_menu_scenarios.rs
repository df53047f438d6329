use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pickr::action::ActionMapper;
use pickr::input::{InputError, InputSource, ScriptedSource, Token};
use pickr::menu::{Engine, MenuDef, MenuItem, MenuOutcome, MenuState};
use pickr::render::{RenderCapability, RenderTier, Renderer};
use pickr::sound::{Cue, SoundHook};

#[derive(Clone, Default)]
struct RecordingSound(Arc<Mutex<Vec<Cue>>>);

impl RecordingSound {
    fn cues(&self) -> Vec<Cue> {
        self.0.lock().unwrap().clone()
    }
}

impl SoundHook for RecordingSound {
    fn fire(&self, cue: Cue) {
        self.0.lock().unwrap().push(cue);
    }
}

/// Scripted source that counts `drain_pending` calls, for asserting the
/// engine flushes at session open and after debounce suppressions.
struct CountingSource {
    inner: ScriptedSource,
    drains: Arc<AtomicUsize>,
}

impl InputSource for CountingSource {
    fn next_token(&mut self) -> Result<Token, InputError> {
        self.inner.next_token()
    }

    fn drain_pending(&mut self) {
        self.drains.fetch_add(1, Ordering::SeqCst);
    }
}

fn sink_renderer() -> Renderer {
    let caps = RenderCapability {
        tier: RenderTier::MinimalDiff,
        compact: true,
    };
    Renderer::new(Box::new(io::sink()), caps)
}

fn engine_with(tokens: Vec<Token>, grace: Duration) -> (Engine, RecordingSound) {
    let sound = RecordingSound::default();
    let engine = Engine::new(
        Box::new(ScriptedSource::new(tokens)),
        Box::new(sound.clone()),
        sink_renderer(),
        ActionMapper::default(),
        grace,
    );
    (engine, sound)
}

fn three_items() -> MenuState {
    MenuState::new("Test")
        .item(MenuItem::data("Alpha", "First"))
        .item(MenuItem::data("Beta", "Second"))
        .item(MenuItem::data("Gamma", "Third"))
}

fn four_companions() -> MenuState {
    MenuState::new("Party")
        .item(MenuItem::data("Knight", ""))
        .item(MenuItem::data("Mage", ""))
        .item(MenuItem::data("Ranger", ""))
        .item(MenuItem::data("Bard", ""))
}

#[test]
fn test_down_down_select() {
    let (mut engine, _) = engine_with(
        vec![Token::Down, Token::Down, Token::Enter],
        Duration::ZERO,
    );
    let mut state = three_items();
    assert_eq!(engine.run(&mut state), MenuOutcome::Selected(2));
}

#[test]
fn test_boundary_moves_fire_no_cue() {
    let (mut engine, sound) = engine_with(
        vec![Token::Up, Token::Down, Token::Enter],
        Duration::ZERO,
    );
    let mut state = three_items();
    assert_eq!(engine.run(&mut state), MenuOutcome::Selected(1));
    // Up at index 0 is a no-op: no move cue for it.
    assert_eq!(sound.cues(), vec![Cue::Move, Cue::Confirm]);
}

#[test]
fn test_down_clamps_at_last_index() {
    let (mut engine, sound) = engine_with(
        vec![Token::Down, Token::Down, Token::Down, Token::Down, Token::Enter],
        Duration::ZERO,
    );
    let mut state = three_items();
    assert_eq!(engine.run(&mut state), MenuOutcome::Selected(2));
    assert_eq!(sound.cues(), vec![Cue::Move, Cue::Move, Cue::Confirm]);
}

#[test]
fn test_multi_select_auto_commits_at_cap() {
    let (mut engine, sound) = engine_with(
        vec![Token::Char(' '), Token::Down, Token::Char(' ')],
        Duration::ZERO,
    );
    let mut state = four_companions().multi(2);
    let outcome = engine.run(&mut state);
    assert_eq!(
        outcome,
        MenuOutcome::SelectedMany([0, 1].into_iter().collect())
    );
    assert_eq!(sound.cues(), vec![Cue::Confirm, Cue::Move, Cue::Confirm]);
}

#[test]
fn test_multi_select_never_exceeds_cap() {
    // Third toggle can never happen: the second one auto-commits.
    let (mut engine, _) = engine_with(
        vec![
            Token::Char(' '),
            Token::Down,
            Token::Char(' '),
            Token::Down,
            Token::Char(' '),
        ],
        Duration::ZERO,
    );
    let mut state = four_companions().multi(2);
    match engine.run(&mut state) {
        MenuOutcome::SelectedMany(indices) => assert_eq!(indices.len(), 2),
        other => panic!("expected SelectedMany, got {other:?}"),
    }
}

#[test]
fn test_multi_select_uncapped_commits_with_select() {
    let (mut engine, _) = engine_with(
        vec![Token::Char(' '), Token::Down, Token::Char(' '), Token::Enter],
        Duration::ZERO,
    );
    let mut state = four_companions().multi(0);
    assert_eq!(
        engine.run(&mut state),
        MenuOutcome::SelectedMany([0, 1].into_iter().collect())
    );
}

#[test]
fn test_multi_select_empty_commit_rejected() {
    let (mut engine, sound) = engine_with(
        vec![Token::Enter, Token::Char(' '), Token::Enter],
        Duration::ZERO,
    );
    let mut state = four_companions().multi(0);
    assert_eq!(
        engine.run(&mut state),
        MenuOutcome::SelectedMany([0].into_iter().collect())
    );
    assert_eq!(sound.cues(), vec![Cue::Error, Cue::Confirm, Cue::Confirm]);
}

#[test]
fn test_toggle_removal_then_commit() {
    let (mut engine, _) = engine_with(
        vec![
            Token::Char(' '),
            Token::Char(' '),
            Token::Down,
            Token::Char(' '),
            Token::Enter,
        ],
        Duration::ZERO,
    );
    let mut state = four_companions().multi(0);
    assert_eq!(
        engine.run(&mut state),
        MenuOutcome::SelectedMany([1].into_iter().collect())
    );
}

#[test]
fn test_cancel_ignored_when_not_cancellable() {
    let (mut engine, sound) = engine_with(
        vec![Token::Esc, Token::Esc, Token::Down, Token::Enter],
        Duration::ZERO,
    );
    let mut state = three_items().cancellable(false);
    assert_eq!(engine.run(&mut state), MenuOutcome::Selected(1));
    assert_eq!(
        sound.cues(),
        vec![Cue::Error, Cue::Error, Cue::Move, Cue::Confirm]
    );
}

#[test]
fn test_cancel_honored_when_cancellable() {
    let (mut engine, sound) = engine_with(vec![Token::Esc], Duration::ZERO);
    let mut state = three_items();
    assert_eq!(engine.run(&mut state), MenuOutcome::Cancelled);
    assert_eq!(sound.cues(), vec![Cue::Cancel]);
}

#[test]
fn test_select_on_disabled_item_fires_error_and_stays() {
    let (mut engine, sound) = engine_with(
        vec![Token::Down, Token::Enter, Token::Up, Token::Enter],
        Duration::ZERO,
    );
    let mut state = MenuState::new("Test")
        .item(MenuItem::data("Open", ""))
        .item(MenuItem::data("Locked", "").disabled());
    assert_eq!(engine.run(&mut state), MenuOutcome::Selected(0));
    assert_eq!(
        sound.cues(),
        vec![Cue::Move, Cue::Error, Cue::Move, Cue::Confirm]
    );
}

#[test]
fn test_digit_jump_selects_directly() {
    let (mut engine, _) = engine_with(vec![Token::Char('3')], Duration::ZERO);
    let mut state = three_items();
    assert_eq!(engine.run(&mut state), MenuOutcome::Selected(2));
}

#[test]
fn test_digit_jump_out_of_range_is_silent() {
    let (mut engine, sound) = engine_with(vec![Token::Char('9'), Token::Esc], Duration::ZERO);
    let mut state = three_items();
    assert_eq!(engine.run(&mut state), MenuOutcome::Cancelled);
    assert_eq!(sound.cues(), vec![Cue::Cancel]);
}

#[test]
fn test_digit_jump_to_disabled_errors() {
    let (mut engine, sound) = engine_with(vec![Token::Char('2'), Token::Esc], Duration::ZERO);
    let mut state = MenuState::new("Test")
        .item(MenuItem::data("Open", ""))
        .item(MenuItem::data("Locked", "").disabled());
    assert_eq!(engine.run(&mut state), MenuOutcome::Cancelled);
    assert_eq!(sound.cues(), vec![Cue::Error, Cue::Cancel]);
}

#[test]
fn test_digit_jump_toggles_in_multi_select() {
    let (mut engine, _) = engine_with(vec![Token::Char('2'), Token::Char('4')], Duration::ZERO);
    let mut state = four_companions().multi(2);
    assert_eq!(
        engine.run(&mut state),
        MenuOutcome::SelectedMany([1, 3].into_iter().collect())
    );
}

#[test]
fn test_debounce_suppresses_first_carried_over_select() {
    let drains = Arc::new(AtomicUsize::new(0));
    let sound = RecordingSound::default();
    let source = CountingSource {
        inner: ScriptedSource::new(vec![Token::Enter, Token::Enter]),
        drains: drains.clone(),
    };
    let mut engine = Engine::new(
        Box::new(source),
        Box::new(sound.clone()),
        sink_renderer(),
        ActionMapper::default(),
        Duration::from_secs(60),
    );
    let mut state = three_items();
    assert_eq!(engine.run(&mut state), MenuOutcome::Selected(0));
    // Suppressed confirm fired no cue; the honored one did.
    assert_eq!(sound.cues(), vec![Cue::Confirm]);
    // One drain at session open, one right after the suppression.
    assert_eq!(drains.load(Ordering::SeqCst), 2);
}

#[test]
fn test_debounce_suppresses_select_and_cancel_independently() {
    let (mut engine, sound) = engine_with(
        vec![Token::Enter, Token::Esc, Token::Esc],
        Duration::from_secs(60),
    );
    let mut state = three_items();
    assert_eq!(engine.run(&mut state), MenuOutcome::Cancelled);
    assert_eq!(sound.cues(), vec![Cue::Cancel]);
}

#[test]
fn test_debounce_suppresses_at_most_one_select() {
    let (mut engine, _) = engine_with(
        vec![Token::Enter, Token::Enter, Token::Enter],
        Duration::from_secs(60),
    );
    let mut state = three_items();
    // Second confirm already lands, even deep inside the grace interval.
    assert_eq!(engine.run(&mut state), MenuOutcome::Selected(0));
}

#[test]
fn test_digit_jump_immune_to_debounce() {
    let (mut engine, _) = engine_with(vec![Token::Char('3')], Duration::from_secs(60));
    let mut state = three_items();
    assert_eq!(engine.run(&mut state), MenuOutcome::Selected(2));
}

#[test]
fn test_movement_unaffected_by_debounce() {
    let (mut engine, _) = engine_with(
        vec![Token::Down, Token::Enter, Token::Enter],
        Duration::from_secs(60),
    );
    let mut state = three_items();
    assert_eq!(engine.run(&mut state), MenuOutcome::Selected(1));
}

#[test]
fn test_callback_value_overrides_index() {
    let (mut engine, _) = engine_with(vec![Token::Enter], Duration::ZERO);
    let mut state = MenuState::new("Test").item(MenuItem::action(
        "Forge",
        "",
        |_| Some("forged".to_string()),
    ));
    assert_eq!(
        engine.run(&mut state),
        MenuOutcome::Value("forged".to_string())
    );
}

#[test]
fn test_callback_without_result_returns_index() {
    let (mut engine, _) = engine_with(vec![Token::Enter], Duration::ZERO);
    let mut state = MenuState::new("Test").item(MenuItem::action("Noop", "", |_| None));
    assert_eq!(engine.run(&mut state), MenuOutcome::Selected(0));
}

#[test]
fn test_nested_menu_runs_synchronously() {
    // Outer Select triggers a callback that reuses the same engine (and the
    // same scripted token stream) for an inner session.
    let (mut engine, _) = engine_with(
        vec![Token::Enter, Token::Down, Token::Enter],
        Duration::ZERO,
    );
    let mut state = MenuState::new("Outer").item(MenuItem::action(
        "Submenu",
        "",
        |engine| {
            let mut inner = MenuState::new("Inner")
                .item(MenuItem::data("One", ""))
                .item(MenuItem::data("Two", ""));
            match engine.run(&mut inner) {
                MenuOutcome::Selected(i) => Some(format!("inner:{i}")),
                _ => None,
            }
        },
    ));
    assert_eq!(
        engine.run(&mut state),
        MenuOutcome::Value("inner:1".to_string())
    );
}

#[test]
fn test_nested_cancel_falls_back_to_outer_index() {
    let (mut engine, _) = engine_with(vec![Token::Enter, Token::Esc], Duration::ZERO);
    let mut state = MenuState::new("Outer").item(MenuItem::action(
        "Submenu",
        "",
        |engine| {
            let mut inner = MenuState::new("Inner").item(MenuItem::data("One", ""));
            match engine.run(&mut inner) {
                MenuOutcome::Selected(i) => Some(format!("inner:{i}")),
                _ => None,
            }
        },
    ));
    assert_eq!(engine.run(&mut state), MenuOutcome::Selected(0));
}

#[test]
fn test_info_consumes_one_token_and_returns_to_menu() {
    let (mut engine, sound) = engine_with(
        vec![Token::Char('i'), Token::Char('x'), Token::Enter],
        Duration::ZERO,
    );
    let mut state = three_items();
    // 'x' dismisses the detail view instead of being interpreted.
    assert_eq!(engine.run(&mut state), MenuOutcome::Selected(0));
    assert_eq!(sound.cues(), vec![Cue::Confirm, Cue::Confirm]);
}

#[test]
fn test_empty_menu_resolves_to_cancelled() {
    let (mut engine, sound) = engine_with(vec![Token::Enter], Duration::ZERO);
    let mut state = MenuState::new("Empty");
    assert_eq!(engine.run(&mut state), MenuOutcome::Cancelled);
    assert!(sound.cues().is_empty());
}

#[test]
fn test_exhausted_input_resolves_to_cancelled() {
    // Input closes before any terminating action: degraded, not a panic.
    let (mut engine, _) = engine_with(vec![Token::Down], Duration::ZERO);
    let mut state = three_items();
    assert_eq!(engine.run(&mut state), MenuOutcome::Cancelled);
    assert_eq!(state.cursor, 1);
}

#[test]
fn test_unbound_tokens_are_ignored() {
    let (mut engine, sound) = engine_with(
        vec![Token::Char('z'), Token::Backspace, Token::Enter],
        Duration::ZERO,
    );
    let mut state = three_items();
    assert_eq!(engine.run(&mut state), MenuOutcome::Selected(0));
    assert_eq!(sound.cues(), vec![Cue::Confirm]);
}

#[test]
fn test_toggle_ignored_in_single_select() {
    let (mut engine, sound) = engine_with(vec![Token::Char(' '), Token::Enter], Duration::ZERO);
    let mut state = three_items();
    assert_eq!(engine.run(&mut state), MenuOutcome::Selected(0));
    assert_eq!(sound.cues(), vec![Cue::Confirm]);
}

#[test]
fn test_left_right_move_cursor() {
    let (mut engine, _) = engine_with(
        vec![Token::Right, Token::Right, Token::Left, Token::Enter],
        Duration::ZERO,
    );
    let mut state = three_items();
    assert_eq!(engine.run(&mut state), MenuOutcome::Selected(1));
}

#[test]
fn test_menu_definition_file_drives_a_session() {
    // Same path the demo binary takes: JSON definition on disk, data-only
    // menu, numeric selection.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shop.json");
    std::fs::write(
        &path,
        r#"{
            "title": "Shop",
            "items": [
                {"label": "Potion", "value": "potion"},
                {"label": "Ether", "value": "ether"},
                {"label": "Excalibur", "enabled": false}
            ]
        }"#,
    )
    .unwrap();

    let json = std::fs::read_to_string(&path).unwrap();
    let mut state = MenuDef::from_json(&json).unwrap().into_state();
    let (mut engine, _) = engine_with(vec![Token::Char('2')], Duration::ZERO);
    assert_eq!(engine.run(&mut state), MenuOutcome::Selected(1));
    assert_eq!(state.items[1].value(), Some("ether"));
}

#[test]
fn test_data_item_value_readable_after_session() {
    let (mut engine, _) = engine_with(vec![Token::Down, Token::Enter], Duration::ZERO);
    let mut state = MenuState::new("Shop")
        .item(MenuItem::data("Potion", "").with_value("potion"))
        .item(MenuItem::data("Ether", "").with_value("ether"));
    let outcome = engine.run(&mut state);
    let MenuOutcome::Selected(i) = outcome else {
        panic!("expected Selected");
    };
    assert_eq!(state.items[i].value(), Some("ether"));
}
