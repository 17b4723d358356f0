//! Browser wiring for the tutorial page.
//!
//! Looks up the page's elements, turns DOM events into `UserAction`s for the
//! `Session` and redraws the affected part of the page from session state.
//! Runs are paced with `setTimeout`; each timer carries the run generation it was
//! scheduled for so a cleared or restarted run never receives stale ticks.

use crate::config::TutorialConfig;
use crate::editor::{CHECK_PASSED, EXAMPLE_CODE};
use crate::error::TutorialError;
use crate::map::lands;
use crate::session::{Effect, Mode, Screen, Session, Tick, UserAction};
use tracing::{debug, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, DragEvent, Element, EventTarget, HtmlElement, HtmlTextAreaElement, KeyboardEvent,
    window,
};

thread_local! {
    static PAGE: std::cell::RefCell<Option<Session>> = const { std::cell::RefCell::new(None) };
}

fn with_session<R>(f: impl FnOnce(&mut Session) -> R) -> Option<R> {
    PAGE.with(|cell| cell.borrow_mut().as_mut().map(f))
}

fn document() -> Result<Document, TutorialError> {
    window()
        .and_then(|w| w.document())
        .ok_or(TutorialError::MissingElement("document"))
}

fn element(doc: &Document, id: &'static str) -> Result<Element, TutorialError> {
    doc.get_element_by_id(id).ok_or(TutorialError::MissingElement(id))
}

fn query_all(root: &Document, selector: &str) -> Vec<Element> {
    let Ok(list) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn listen<E>(target: &EventTarget, event: &str, handler: impl FnMut(E) + 'static) -> Result<(), JsValue>
where
    E: FromWasmAbi + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn set_text(doc: &Document, id: &'static str, text: &str) {
    if let Some(el) = doc.get_element_by_id(id) {
        el.set_text_content(Some(text));
    }
}

fn append_text(doc: &Document, id: &'static str, text: &str) {
    if let Some(el) = doc.get_element_by_id(id) {
        let mut current = el.text_content().unwrap_or_default();
        current.push('\n');
        current.push_str(text);
        el.set_text_content(Some(&current));
    }
}

fn set_style(el: &Element, prop: &str, value: &str) {
    if let Some(html) = el.dyn_ref::<HtmlElement>() {
        let _ = html.style().set_property(prop, value);
    }
}

// --- Entry -------------------------------------------------------------------

pub fn start(mut config: TutorialConfig) -> Result<(), JsValue> {
    let doc = document()?;
    let configured = config.map_coins;
    if config.adopt_map_coins(query_all(&doc, "#land .coin").len()) {
        warn!(dom = config.map_coins, configured, "map coin count taken from the page");
    }
    let session = Session::new(config)?;

    let cells = query_all(&doc, ".grid .cell").len();
    if cells != session.world().len() {
        warn!(dom = cells, configured = session.world().len(), "practice row size differs from configuration");
    }

    render_screen(&doc, &session);
    render_mode(&doc, &session);
    render_row(&doc, &session);
    render_map(&doc, &session);
    set_text(&doc, "seq-result", &session.sequence().summary());
    PAGE.with(|cell| cell.replace(Some(session)));

    wire_keyboard(&doc)?;
    wire_tutorial(&doc)?;
    wire_blocks(&doc)?;
    wire_editor(&doc)?;
    wire_map(&doc)?;
    info!("tutorial page ready");
    Ok(())
}

// --- Wiring ------------------------------------------------------------------

fn wire_keyboard(doc: &Document) -> Result<(), JsValue> {
    let doc_keys = doc.clone();
    listen(doc, "keydown", move |evt: KeyboardEvent| {
        if evt.code() != "Space" {
            return;
        }
        let typing_in_field = doc_keys
            .active_element()
            .map(|el| matches!(el.tag_name().as_str(), "INPUT" | "TEXTAREA" | "SELECT"))
            .unwrap_or(false);
        if !typing_in_field {
            evt.prevent_default();
        }
        apply(UserAction::Space { typing_in_field });
    })
}

fn wire_tutorial(doc: &Document) -> Result<(), JsValue> {
    for btn in query_all(doc, ".mode-btn") {
        let mode = Mode::from_data(&btn.get_attribute("data-mode").unwrap_or_default());
        listen(&btn, "click", move |_: web_sys::Event| apply(UserAction::SetMode(mode)))?;
    }
    let to_map = element(doc, "to-map")?;
    listen(&to_map, "click", |_: web_sys::Event| apply(UserAction::ShowMap))?;
    let speech = element(doc, "char-speech")?;
    listen(&speech, "click", |_: web_sys::Event| apply(UserAction::ToggleSpeech))?;
    Ok(())
}

fn wire_blocks(doc: &Document) -> Result<(), JsValue> {
    for block in query_all(doc, ".draggable") {
        let code = block
            .get_attribute("data-code")
            .or_else(|| block.text_content())
            .unwrap_or_default();
        let started = block.clone();
        listen(&block, "dragstart", move |evt: DragEvent| {
            if let Some(dt) = evt.data_transfer() {
                let _ = dt.set_data("text/plain", &code);
            }
            let _ = started.class_list().add_1("dragging");
        })?;
        let ended = block.clone();
        listen(&block, "dragend", move |_: DragEvent| {
            let _ = ended.class_list().remove_1("dragging");
        })?;
    }

    let sequence = element(doc, "sequence")?;
    let over = sequence.clone();
    listen(&sequence, "dragover", move |evt: DragEvent| {
        evt.prevent_default();
        let _ = over.class_list().add_1("drag-over");
    })?;
    let left = sequence.clone();
    listen(&sequence, "dragleave", move |_: DragEvent| {
        let _ = left.class_list().remove_1("drag-over");
    })?;
    let dropped = sequence.clone();
    listen(&sequence, "drop", move |evt: DragEvent| {
        evt.prevent_default();
        let _ = dropped.class_list().remove_1("drag-over");
        let code = evt
            .data_transfer()
            .and_then(|dt| dt.get_data("text/plain").ok())
            .unwrap_or_default();
        apply(UserAction::DropChip(code));
    })?;

    let clear = element(doc, "clear-seq")?;
    listen(&clear, "click", |_: web_sys::Event| apply(UserAction::ClearSequence))?;
    let run = element(doc, "run-seq")?;
    listen(&run, "click", |_: web_sys::Event| apply(UserAction::RunSequence))?;
    Ok(())
}

fn wire_editor(doc: &Document) -> Result<(), JsValue> {
    let editor: HtmlTextAreaElement = element(doc, "code-editor")?.dyn_into()?;
    let example = element(doc, "example-code")?;
    listen(&example, "click", |_: web_sys::Event| apply(UserAction::LoadExample))?;
    let run = element(doc, "run-code")?;
    listen(&run, "click", move |_: web_sys::Event| apply(UserAction::RunCode(editor.value())))?;
    Ok(())
}

fn wire_map(doc: &Document) -> Result<(), JsValue> {
    for area in query_all(doc, ".land-area") {
        let Some(idx) = area.get_attribute("data-land").and_then(|v| v.parse().ok()) else {
            warn!("land area without a numeric data-land");
            continue;
        };
        listen(&area, "click", move |_: web_sys::Event| apply(UserAction::SelectLand(idx)))?;
    }
    let prev = element(doc, "prev-land")?;
    listen(&prev, "click", |_: web_sys::Event| apply(UserAction::PrevLand))?;
    let next = element(doc, "next-land")?;
    listen(&next, "click", |_: web_sys::Event| apply(UserAction::NextLand))?;
    let all = element(doc, "collect-all")?;
    listen(&all, "click", |_: web_sys::Event| apply(UserAction::CollectAllCoins))?;
    for (idx, coin) in query_all(doc, "#land .coin").into_iter().enumerate() {
        listen(&coin, "click", move |_: web_sys::Event| apply(UserAction::ToggleMapCoin(idx)))?;
    }
    Ok(())
}

// --- Dispatch ----------------------------------------------------------------

fn apply(action: UserAction) {
    let Ok(doc) = document() else { return };
    let from_editor = matches!(action, UserAction::RunCode(_));
    with_session(|session| match session.dispatch(action) {
        Ok(effect) => render(&doc, session, effect, from_editor),
        Err(err) => {
            let target = if from_editor { "code-result" } else { "sim-log" };
            set_text(&doc, target, &err.to_string());
        }
    });
}

fn render(doc: &Document, session: &Session, effect: Effect, from_editor: bool) {
    match effect {
        Effect::Nothing => {}
        Effect::Screen => render_screen(doc, session),
        Effect::Mode => render_mode(doc, session),
        Effect::Speech => set_text(doc, "char-speech", session.speech()),
        Effect::Sequence(added) => {
            if let Some(id) = added {
                if let Err(err) = add_chip(doc, session, id) {
                    warn!(?err, "could not draw chip");
                }
            }
            set_text(doc, "seq-result", &session.sequence().summary());
        }
        Effect::Cleared => {
            for chip in query_all(doc, ".chip") {
                chip.remove();
            }
            set_text(doc, "seq-result", &session.sequence().summary());
            set_text(doc, "sim-log", "Cleared sequence.");
            render_row(doc, session);
            render_portal(doc, session.portal_active());
        }
        Effect::RunStarted(generation) => {
            if from_editor {
                set_text(doc, "code-result", CHECK_PASSED);
            }
            set_text(doc, "sim-log", "");
            render_row(doc, session);
            schedule_tick(generation, 0);
        }
        Effect::Example => {
            if let Some(editor) = doc
                .get_element_by_id("code-editor")
                .and_then(|el| el.dyn_into::<HtmlTextAreaElement>().ok())
            {
                editor.set_value(EXAMPLE_CODE);
            }
        }
        Effect::Map => render_map(doc, session),
    }
}

fn add_chip(doc: &Document, session: &Session, id: u32) -> Result<(), JsValue> {
    let Some(chip) = session.sequence().chips().iter().find(|c| c.id == id) else {
        return Ok(());
    };
    let el = doc.create_element("div")?;
    el.set_class_name("block chip");
    el.set_text_content(Some(&chip.code));
    el.set_attribute("title", &chip.code)?;

    let remove = doc.create_element("button")?;
    remove.set_text_content(Some("✕"));
    remove.set_class_name("remove");
    remove.set_attribute(
        "style",
        "margin-left:8px; background:transparent; border:none; color:#fff; cursor:pointer;",
    )?;
    let owner = el.clone();
    listen(&remove, "click", move |_: web_sys::Event| {
        owner.remove();
        apply(UserAction::RemoveChip(id));
    })?;
    el.append_child(&remove)?;

    let sequence = element(doc, "sequence")?;
    match sequence.query_selector(".slot")? {
        Some(slot) => slot.before_with_node_1(&el)?,
        None => {
            sequence.append_child(&el)?;
        }
    }
    Ok(())
}

// --- Run pacing --------------------------------------------------------------

fn schedule_tick(generation: u64, delay_ms: i32) {
    let Some(win) = window() else { return };
    let callback = Closure::once_into_js(move || tick(generation));
    if let Err(err) =
        win.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay_ms)
    {
        warn!(?err, "setTimeout failed; run stalls");
    }
}

fn tick(generation: u64) {
    let Ok(doc) = document() else { return };
    let next = with_session(|session| match session.advance(generation) {
        None => None,
        Some(Tick::Step(step)) => {
            for entry in &step.entries {
                append_text(&doc, "sim-log", entry);
            }
            render_row(&doc, session);
            Some(session.config().step_delay_ms)
        }
        Some(Tick::Done(outcome)) => {
            if let Some(last) = outcome.log.last() {
                append_text(&doc, "sim-log", last);
            }
            render_portal(&doc, session.portal_active());
            debug!(cursor = outcome.final_cursor, "run rendered");
            None
        }
    });
    if let Some(Some(delay)) = next {
        schedule_tick(generation, delay);
    }
}

// --- Rendering ---------------------------------------------------------------

fn render_screen(doc: &Document, session: &Session) {
    let active = match session.screen() {
        Screen::Tutorial => "tutorial",
        Screen::Land => "land",
    };
    for id in ["tutorial", "land"] {
        if let Some(el) = doc.get_element_by_id(id) {
            let hidden = if id == active { "false" } else { "true" };
            let _ = el.set_attribute("aria-hidden", hidden);
        }
    }
}

fn render_mode(doc: &Document, session: &Session) {
    let current = session.mode();
    for btn in query_all(doc, ".mode-btn") {
        let mode = Mode::from_data(&btn.get_attribute("data-mode").unwrap_or_default());
        let _ = btn.class_list().toggle_with_force("active", mode == current);
    }
    if let Some(blocks) = doc.get_element_by_id("blocks-mode") {
        let _ = blocks.class_list().toggle_with_force("hidden", current != Mode::Blocks);
    }
    if let Some(typing) = doc.get_element_by_id("typing-mode") {
        let _ = typing.class_list().toggle_with_force("hidden", current != Mode::Typing);
    }
}

/// Practice row: Mario's position and each cell's coin.
fn render_row(doc: &Document, session: &Session) {
    let world = session.world();
    let span = world.len().saturating_sub(1).max(1) as f64;
    if let Some(mario) = doc.get_element_by_id("mini-mario") {
        let pct = world.cursor() as f64 / span * 100.0;
        set_style(&mario, "left", &format!("{pct}%"));
    }
    for (el, cell) in query_all(doc, ".grid .cell").iter().zip(world.cells()) {
        let _ = el.class_list().toggle_with_force("coin", cell.has_coin);
        let _ = el.class_list().toggle_with_force("collected", cell.collected());
        let _ = el.set_attribute("data-collected", if cell.collected() { "true" } else { "false" });
        set_style(el, "opacity", if cell.collected() { "0.2" } else { "1" });
    }
}

fn render_map(doc: &Document, session: &Session) {
    let map = session.map();
    let land = map.current();
    if let Some(info) = doc.get_element_by_id("land-info") {
        info.set_inner_html(&format!(
            "<strong>{}</strong><p class=\"muted small\">{}</p>",
            land.name, land.desc
        ));
    }
    if let Some(marker) = doc.get_element_by_id("mario-mini") {
        let _ = marker.set_attribute("transform", &land.marker_transform());
    }
    for (el, collected) in query_all(doc, "#land .coin").iter().zip(map.coins()) {
        let _ = el.set_attribute("data-collected", if *collected { "true" } else { "false" });
        let _ = el.set_attribute("opacity", if *collected { "0.25" } else { "1" });
    }
    debug!(land = map.current_index(), of = lands().len(), "map rendered");
    render_portal(doc, session.portal_active());
}

fn render_portal(doc: &Document, active: bool) {
    if let Some(portal) = doc.get_element_by_id("portal") {
        let _ = portal.set_attribute("opacity", if active { "1" } else { "0.3" });
    }
    if let Some(status) = doc.get_element_by_id("portal-status") {
        let html = if active {
            "Portal: <strong style=\"color:var(--green)\">Active</strong>"
        } else {
            "Portal: <span class=\"muted\">Inactive</span>"
        };
        status.set_inner_html(html);
    }
}
