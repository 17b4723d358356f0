// Browser-side smoke tests; run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn simulate_runs_in_the_browser() {
    let log = coin_quest::simulate(vec!["for(int i=0; i<2; i++)".into()]).unwrap();
    assert!(log.ends_with("Done. Mario at cell 2."));
}

#[wasm_bindgen_test]
fn empty_simulation_is_rejected() {
    assert!(coin_quest::simulate(Vec::new()).is_err());
}

#[wasm_bindgen_test]
fn start_without_page_markup_reports_missing_element() {
    assert!(coin_quest::start_tutorial().is_err());
}
