// Copyright 2026 Hypermesh Foundation. All rights reserved.
// ABC De-Fi Learning Suite ("The Academy") - Browser Binding Tests
//
// Run with `wasm-pack test --headless --firefox`.

#![cfg(target_arch = "wasm32")]

use abc_defi_engine::*;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn ledger_levels_up_through_bindings() {
    let mut ledger = XpLedger::new();
    let levels = ledger.js_add_xp(200.0).unwrap();
    assert_eq!(levels, vec![2]);
    assert_eq!(ledger.level(), 2);
    assert!((ledger.xp() - 50.0).abs() < 1e-9);
    assert!(ledger.js_add_xp(-1.0).is_err());
    assert!(!ledger.js_take_notifications().is_null());
}

#[wasm_bindgen_test]
fn degen_game_serves_a_view_after_start() {
    let mut game = DegenGame::new(1);
    game.js_start().unwrap();
    assert!(!game.js_view().is_null());
    assert!(game.js_set_investment_pct(150.0).is_err());
    game.js_ignore().unwrap();

    let mut ledger = XpLedger::new();
    assert!(game.js_continue_day(&mut ledger).is_ok());
}

#[wasm_bindgen_test]
fn chat_rejects_unknown_view() {
    let mut chat = ScamChat::new(2);
    chat.js_start();
    assert!(chat.js_switch_view("bogus").is_err());
    assert!(!chat.js_snapshot().is_null());
}

#[wasm_bindgen_test]
fn bad_config_json_is_an_error() {
    assert!(XpLedger::from_config_json("{ not json").is_err());
    assert!(WhackGame::from_config_json(r#"{ "whack": { "hide_chance": 2.0 } }"#, 1).is_err());
    assert!(Quiz::from_config_json("{}", 1).is_ok());
}

#[wasm_bindgen_test]
fn quest_desk_rejects_unknown_quest() {
    let desk = QuestDesk::new(3);
    assert!(desk.js_is_completed("staking").is_err());
    assert!(!desk.js_is_completed("swap").unwrap());
}

#[wasm_bindgen_test]
fn profile_round_trips_username() {
    let mut profile = Profile::new();
    assert!(profile.js_save("Ada", None).unwrap());
    assert_eq!(profile.js_username(), "Ada");
    assert!(profile.js_save("", None).is_err());
    assert_eq!(js_truncate_address(Some("0x1234567890abcdef".into())), "0x1234...cdef");
}

#[wasm_bindgen_test]
fn whack_stop_without_a_round_is_an_error() {
    let mut game = WhackGame::new(4);
    let mut ledger = XpLedger::new();
    assert!(game.js_stop(&mut ledger).is_err());
    game.js_start();
    assert!(game.js_stop(&mut ledger).is_ok());
    assert!(game.js_stop(&mut ledger).is_err());
}
