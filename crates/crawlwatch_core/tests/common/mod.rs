#![allow(dead_code)]

use std::sync::Once;

use crawlwatch_core::{update, AppState, Effect, Msg, UrlItem};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

/// Restores a session and answers the first listing with `ids`.
pub fn signed_in_with_page(ids: &[i64], total: u64) -> AppState {
    let (state, effects) = update(AppState::new(), Msg::SessionRestored);
    let request_id = load_request_id(&effects).expect("load effect");
    let (state, _) = update(state, page_loaded(request_id, 1, ids, total));
    state
}

pub fn page_loaded(request_id: u64, page: u32, ids: &[i64], total: u64) -> Msg {
    Msg::PageLoaded {
        request_id,
        page,
        limit: 20,
        items: ids
            .iter()
            .map(|id| UrlItem::new(*id, format!("https://site{id}.example")))
            .collect(),
        total,
    }
}

pub fn load_request_id(effects: &[Effect]) -> Option<u64> {
    effects.iter().find_map(|effect| match effect {
        Effect::LoadPage { request_id, .. } => Some(*request_id),
        _ => None,
    })
}

pub fn apply(state: AppState, msgs: Vec<Msg>) -> (AppState, Vec<Effect>) {
    let mut effects = Vec::new();
    let mut state = state;
    for msg in msgs {
        let (next, mut produced) = update(state, msg);
        effects.append(&mut produced);
        state = next;
    }
    (state, effects)
}
