mod common;

use common::{init_logging, load_request_id, page_loaded, signed_in_with_page};
use crawlwatch_core::{
    update, AppState, Effect, Msg, NoticeKind, PageQuery, SessionState, SortField, SortOrder,
};
use pretty_assertions::assert_eq;

#[test]
fn restored_session_loads_first_page() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::SessionRestored);

    assert_eq!(state.view().session, SessionState::SignedIn);
    assert!(state.view().loading);
    assert_eq!(
        effects,
        vec![Effect::LoadPage {
            request_id: 1,
            query: PageQuery {
                page: 1,
                limit: 20,
                sort_field: None,
                sort_order: SortOrder::Desc,
            },
        }]
    );
}

#[test]
fn login_flow_emits_login_then_loads() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::LoginSubmitted {
            username: " admin ".to_string(),
            password: "password".to_string(),
        },
    );
    assert_eq!(state.session(), SessionState::SigningIn);
    assert_eq!(
        effects,
        vec![Effect::Login {
            username: "admin".to_string(),
            password: "password".to_string(),
        }]
    );

    let (state, effects) = update(state, Msg::LoginSucceeded);
    assert_eq!(state.session(), SessionState::SignedIn);
    assert!(matches!(effects.as_slice(), [Effect::LoadPage { .. }]));
}

#[test]
fn rejected_login_shows_auth_failure() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::LoginSubmitted {
            username: "admin".to_string(),
            password: "wrong".to_string(),
        },
    );
    let (state, effects) = update(state, Msg::LoginFailed("invalid credentials".to_string()));

    assert!(effects.is_empty());
    assert_eq!(state.session(), SessionState::SignedOut);
    assert_eq!(state.notice().unwrap().kind, NoticeKind::AuthFailure);
}

#[test]
fn empty_credentials_never_reach_the_gateway() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::LoginSubmitted {
            username: "   ".to_string(),
            password: "x".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.session(), SessionState::SignedOut);
    assert_eq!(state.notice().unwrap().kind, NoticeKind::AuthFailure);
}

#[test]
fn logout_clears_session_and_stops_poller() {
    init_logging();
    let state = signed_in_with_page(&[1, 2], 2);
    let (state, _) = update(state, Msg::SelectionToggled(1));
    let (state, effects) = update(state, Msg::StartSelectedClicked);
    assert_eq!(effects, vec![Effect::StartJobs { url_ids: vec![1] }]);
    let (state, effects) = update(
        state,
        Msg::JobsStarted(vec![crawlwatch_core::StartedJob {
            url_id: 1,
            job_id: 10,
        }]),
    );
    assert_eq!(effects, vec![Effect::StartPoller]);

    let (state, effects) = update(state, Msg::LogoutClicked);
    assert_eq!(effects, vec![Effect::ClearSession, Effect::StopPoller]);
    let view = state.view();
    assert_eq!(view.session, SessionState::SignedOut);
    assert!(view.rows.is_empty());
    assert_eq!(view.tracked_jobs, 0);
}

#[test]
fn submitted_url_is_validated_before_create() {
    init_logging();
    let state = signed_in_with_page(&[], 0);

    let (state, effects) = update(state, Msg::UrlSubmitted("not a url".to_string()));
    assert!(effects.is_empty());
    assert_eq!(state.notice().unwrap().kind, NoticeKind::ActionFailure);

    let (state, effects) = update(state, Msg::UrlSubmitted("ftp://files.example".to_string()));
    assert!(effects.is_empty());

    let (_state, effects) = update(
        state,
        Msg::UrlSubmitted("  https://example.com/page  ".to_string()),
    );
    assert_eq!(
        effects,
        vec![Effect::CreateUrl {
            url: "https://example.com/page".to_string()
        }]
    );
}

#[test]
fn created_url_triggers_reload() {
    init_logging();
    let state = signed_in_with_page(&[1], 1);
    let (state, effects) = update(
        state,
        Msg::UrlCreated(crawlwatch_core::UrlItem::new(2, "https://new.example")),
    );
    assert!(matches!(effects.as_slice(), [Effect::LoadPage { .. }]));
    assert_eq!(state.notice().unwrap().kind, NoticeKind::Info);
}

#[test]
fn page_load_fetches_results_for_every_row() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::SessionRestored);
    let request_id = load_request_id(&effects).unwrap();
    let (state, effects) = update(state, page_loaded(request_id, 1, &[4, 5, 6], 3));

    assert!(!state.view().loading);
    assert_eq!(state.view().rows.len(), 3);
    assert_eq!(
        effects,
        vec![
            Effect::FetchResult { url_id: 4 },
            Effect::FetchResult { url_id: 5 },
            Effect::FetchResult { url_id: 6 },
        ]
    );
}

#[test]
fn failed_load_keeps_previous_rows() {
    init_logging();
    let state = signed_in_with_page(&[1, 2], 2);
    let (state, effects) = update(state, Msg::ReloadRequested);
    let request_id = load_request_id(&effects).unwrap();

    let (state, effects) = update(
        state,
        Msg::PageLoadFailed {
            request_id,
            error: "http status 500".to_string(),
        },
    );
    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.rows.len(), 2);
    assert!(!view.loading);
    assert_eq!(view.notice.unwrap().kind, NoticeKind::LoadFailure);
}

#[test]
fn stale_page_responses_are_dropped() {
    init_logging();
    let state = signed_in_with_page(&[1], 60);
    let (state, first) = update(state, Msg::PageRequested(2));
    let (state, second) = update(state, Msg::PageRequested(3));
    let first_id = load_request_id(&first).unwrap();
    let second_id = load_request_id(&second).unwrap();

    let (state, _) = update(state, page_loaded(second_id, 3, &[41, 42], 60));
    let (state, effects) = update(state, page_loaded(first_id, 2, &[21, 22], 60));

    assert!(effects.is_empty());
    assert_eq!(state.view().page, 3);
    assert_eq!(state.registry().ids(), vec![41, 42]);
}

#[test]
fn page_navigation_clamps_to_available_pages() {
    init_logging();
    // 41 rows at 20 per page = 3 pages.
    let state = signed_in_with_page(&[1], 41);
    assert_eq!(state.view().total_pages, 3);

    let (state, effects) = update(state, Msg::PageRequested(9));
    assert_eq!(state.registry().page(), 3);
    assert!(matches!(
        effects.as_slice(),
        [Effect::LoadPage {
            query: PageQuery { page: 3, .. },
            ..
        }]
    ));

    let (state, effects) = update(state, Msg::NextPage);
    assert!(effects.is_empty());
    assert_eq!(state.registry().page(), 3);

    let (state, effects) = update(state, Msg::PageRequested(-2));
    assert_eq!(state.registry().page(), 1);
    assert_eq!(effects.len(), 1);

    let (state, effects) = update(state, Msg::PrevPage);
    assert!(effects.is_empty());
    assert_eq!(state.registry().page(), 1);
}

#[test]
fn sort_header_clicks_toggle_then_reset() {
    init_logging();
    let state = signed_in_with_page(&[1, 2], 2);

    let (state, _) = update(state, Msg::SortClicked(SortField::Id));
    let (state, effects) = update(state, Msg::SortClicked(SortField::Id));
    assert_eq!(state.view().sort_field, Some(SortField::Id));
    assert_eq!(state.view().sort_order, SortOrder::Asc);

    let (state, effects_after) = update(state, Msg::SortClicked(SortField::Id));
    assert_eq!(state.view().sort_order, SortOrder::Desc);
    assert_eq!(effects.len(), 1);
    assert_eq!(effects_after.len(), 1);

    let (state, _) = update(state, Msg::SortClicked(SortField::Id));
    assert_eq!(state.view().sort_order, SortOrder::Asc);
    let (state, effects) = update(state, Msg::SortClicked(SortField::Url));
    assert_eq!(state.view().sort_field, Some(SortField::Url));
    assert_eq!(state.view().sort_order, SortOrder::Desc);
    assert!(matches!(
        effects.as_slice(),
        [Effect::LoadPage {
            query: PageQuery {
                sort_field: Some(SortField::Url),
                sort_order: SortOrder::Desc,
                ..
            },
            ..
        }]
    ));
}

#[test]
fn page_size_change_resets_to_first_page() {
    init_logging();
    let state = signed_in_with_page(&[1], 100);
    let (state, _) = update(state, Msg::PageRequested(4));

    let (state, effects) = update(state, Msg::PageSizeChanged(0));
    assert!(effects.is_empty());
    assert_eq!(state.notice().unwrap().kind, NoticeKind::ActionFailure);

    let (state, effects) = update(state, Msg::PageSizeChanged(50));
    assert_eq!(state.registry().page(), 1);
    assert_eq!(state.registry().limit(), 50);
    assert!(matches!(
        effects.as_slice(),
        [Effect::LoadPage {
            query: PageQuery { page: 1, limit: 50, .. },
            ..
        }]
    ));
}

#[test]
fn shutdown_turns_later_messages_into_noops() {
    init_logging();
    let state = signed_in_with_page(&[1], 1);
    let (state, effects) = update(state, Msg::Shutdown);
    assert!(effects.is_empty());
    assert!(state.is_torn_down());

    let before = state.clone();
    let (state, effects) = update(
        state,
        Msg::ResultReceived {
            url_id: 1,
            result: crawlwatch_core::AnalysisResult {
                url_id: 1,
                ..Default::default()
            },
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state, before);
}
