//! HTTP route handlers for the UI API.

use std::collections::BTreeSet;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use browser::core::pagination::{PageWindow, is_offered_page_size};
use browser::core::types::RecordId;
use browser::session::{BrowseSession, SessionView, StaleSelection};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fetch::spawn_fetch;
use crate::state::{AppState, ChangeEvent};

/// Build the API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/view", get(get_view))
        .route("/navigate", post(navigate))
        .route("/refresh", post(refresh))
        .route("/selection", get(get_selection).post(set_selection))
        .route("/select-first", post(select_first))
}

async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Serialize)]
struct ViewResponse {
    #[serde(flatten)]
    view: SessionView,
    rows_per_page_options: Vec<u32>,
}

fn view_response(state: &AppState, session: &BrowseSession) -> Json<ViewResponse> {
    Json(ViewResponse {
        view: session.view(),
        rows_per_page_options: state.rows_per_page_options.to_vec(),
    })
}

/// GET /api/view - current page, checked flags, pagination and status.
async fn get_view(State(state): State<AppState>) -> Json<ViewResponse> {
    let shared = state.shared.lock().await;
    view_response(&state, &shared.session)
}

#[derive(Debug, Deserialize)]
struct NavigateRequest {
    page: Option<u32>,
    rows: Option<u32>,
}

/// POST /api/navigate - load another page or page size.
///
/// Selection is left alone; any fetch still in flight is superseded.
async fn navigate(
    State(state): State<AppState>,
    Json(req): Json<NavigateRequest>,
) -> Result<(StatusCode, Json<ViewResponse>), (StatusCode, String)> {
    if let Some(rows) = req.rows {
        if !is_offered_page_size(rows, &state.rows_per_page_options) {
            return Err((
                StatusCode::BAD_REQUEST,
                format!(
                    "rows per page must be one of {:?}",
                    state.rows_per_page_options
                ),
            ));
        }
    }

    let mut shared = state.shared.lock().await;
    let current = shared.session.window();
    let window = PageWindow::new(
        req.page.unwrap_or(current.page()),
        req.rows.unwrap_or(current.rows_per_page()),
    );
    let ticket = shared.session.navigate(window);
    spawn_fetch(&state, &mut shared, ticket);
    Ok((StatusCode::ACCEPTED, view_response(&state, &shared.session)))
}

/// POST /api/refresh - fetch the current page again.
async fn refresh(State(state): State<AppState>) -> (StatusCode, Json<ViewResponse>) {
    let mut shared = state.shared.lock().await;
    let ticket = shared.session.refresh();
    spawn_fetch(&state, &mut shared, ticket);
    (StatusCode::ACCEPTED, view_response(&state, &shared.session))
}

#[derive(Debug, Deserialize)]
struct SelectionRequest {
    /// `generation` of the view the ids were picked from.
    generation: u64,
    /// Every id checked on the current page, not a delta.
    ids: BTreeSet<RecordId>,
}

fn conflict(err: StaleSelection) -> (StatusCode, String) {
    (StatusCode::CONFLICT, err.to_string())
}

/// POST /api/selection - replace the checked set of the current page.
///
/// 409 if the page has been navigated away from since `generation`.
async fn set_selection(
    State(state): State<AppState>,
    Json(req): Json<SelectionRequest>,
) -> Result<Json<ViewResponse>, (StatusCode, String)> {
    let mut shared = state.shared.lock().await;
    shared
        .session
        .set_checked_for(req.generation, &req.ids)
        .map_err(conflict)?;
    debug!(checked = req.ids.len(), "selection updated");
    publish_selection(&state, &shared.session);
    Ok(view_response(&state, &shared.session))
}

#[derive(Debug, Deserialize)]
struct SelectFirstRequest {
    generation: u64,
    n: i64,
}

/// POST /api/select-first - check the first `n` rows of the current page.
async fn select_first(
    State(state): State<AppState>,
    Json(req): Json<SelectFirstRequest>,
) -> Result<Json<ViewResponse>, (StatusCode, String)> {
    let mut shared = state.shared.lock().await;
    shared
        .session
        .select_first_n_for(req.generation, req.n)
        .map_err(conflict)?;
    publish_selection(&state, &shared.session);
    Ok(view_response(&state, &shared.session))
}

#[derive(Debug, Serialize)]
struct SelectionResponse {
    ids: Vec<RecordId>,
    count: usize,
}

/// GET /api/selection - effectively selected ids across visited pages.
async fn get_selection(State(state): State<AppState>) -> Json<SelectionResponse> {
    let shared = state.shared.lock().await;
    let ids = shared.session.selection().effective_selected_ids();
    Json(SelectionResponse {
        count: ids.len(),
        ids,
    })
}

fn publish_selection(state: &AppState, session: &BrowseSession) {
    let _ = state.event_tx.send(ChangeEvent::SelectionChanged {
        selected_count: session.effective_selected_count(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use browser::core::pagination::{ROWS_PER_PAGE_OPTIONS, ReportTemplate};
    use browser::io::config::BrowserConfig;
    use browser::test_support::{api_page, id_set};

    use crate::fetch::PageFetcher;

    async fn loaded_state(ids: &[u64], total: u64) -> AppState {
        let fetcher = PageFetcher::new(&BrowserConfig::default()).expect("fetcher");
        let session = BrowseSession::new(12, ReportTemplate::default());
        let state = AppState::new(session, fetcher, ROWS_PER_PAGE_OPTIONS.to_vec());
        {
            let mut shared = state.shared.lock().await;
            let ticket = shared.session.go_to_page(1);
            shared
                .session
                .complete_fetch(ticket, Ok(api_page(ids, total)));
        }
        state
    }

    async fn current_generation(state: &AppState) -> u64 {
        state.shared.lock().await.session.generation()
    }

    /// Navigate to `page` and complete the fetch with `ids`.
    async fn load_page(state: &AppState, page: u32, ids: &[u64], total: u64) {
        let mut shared = state.shared.lock().await;
        let ticket = shared.session.go_to_page(page);
        shared
            .session
            .complete_fetch(ticket, Ok(api_page(ids, total)));
    }

    #[tokio::test]
    async fn set_selection_updates_view_and_broadcasts() {
        let state = loaded_state(&[1, 2, 3], 3).await;
        let mut rx = state.event_tx.subscribe();
        let generation = current_generation(&state).await;

        let Json(response) = set_selection(
            State(state.clone()),
            Json(SelectionRequest {
                generation,
                ids: id_set(&[1, 3, 77]),
            }),
        )
        .await
        .expect("current page");

        let checked: Vec<bool> = response.view.rows.iter().map(|r| r.checked).collect();
        assert_eq!(checked, vec![true, false, true]);
        assert_eq!(response.view.selected_count, 2);
        assert_eq!(
            rx.try_recv().expect("event"),
            ChangeEvent::SelectionChanged { selected_count: 2 }
        );
    }

    #[tokio::test]
    async fn select_first_clamps_and_lists_selection() {
        let state = loaded_state(&[5, 6, 7], 3).await;
        let generation = current_generation(&state).await;

        select_first(
            State(state.clone()),
            Json(SelectFirstRequest { generation, n: 99 }),
        )
        .await
        .expect("current page");
        let Json(selection) = get_selection(State(state.clone())).await;
        assert_eq!(selection.count, 3);

        select_first(
            State(state.clone()),
            Json(SelectFirstRequest { generation, n: -1 }),
        )
        .await
        .expect("current page");
        let Json(selection) = get_selection(State(state)).await;
        assert_eq!(selection.count, 0);
        assert!(selection.ids.is_empty());
    }

    #[tokio::test]
    async fn selection_posted_from_a_left_page_is_rejected() {
        let state = loaded_state(&[1, 2, 3], 30).await;
        let page_one = current_generation(&state).await;

        load_page(&state, 2, &[13, 14], 30).await;
        let page_two = current_generation(&state).await;
        set_selection(
            State(state.clone()),
            Json(SelectionRequest {
                generation: page_two,
                ids: id_set(&[13]),
            }),
        )
        .await
        .expect("current page");

        load_page(&state, 1, &[1, 2, 3], 30).await;
        load_page(&state, 2, &[13, 14], 30).await;
        let mut rx = state.event_tx.subscribe();

        let err = set_selection(
            State(state.clone()),
            Json(SelectionRequest {
                generation: page_one,
                ids: id_set(&[1]),
            }),
        )
        .await
        .expect_err("stale");
        assert_eq!(err.0, StatusCode::CONFLICT);

        let err = select_first(
            State(state.clone()),
            Json(SelectFirstRequest {
                generation: page_two,
                n: 0,
            }),
        )
        .await
        .expect_err("stale");
        assert_eq!(err.0, StatusCode::CONFLICT);

        assert!(rx.try_recv().is_err());
        let Json(selection) = get_selection(State(state)).await;
        assert_eq!(selection.ids, vec![RecordId(13)]);
    }

    #[tokio::test]
    async fn navigate_rejects_unoffered_page_size() {
        let state = loaded_state(&[1], 1).await;

        let err = navigate(
            State(state.clone()),
            Json(NavigateRequest {
                page: None,
                rows: Some(7),
            }),
        )
        .await
        .expect_err("rejected");

        assert_eq!(err.0, StatusCode::BAD_REQUEST);
        let shared = state.shared.lock().await;
        assert_eq!(shared.session.window().rows_per_page(), 12);
        assert!(!shared.session.is_loading());
    }

    #[tokio::test]
    async fn view_lists_page_size_options() {
        let state = loaded_state(&[1, 2], 2).await;
        let Json(response) = get_view(State(state)).await;
        let json = serde_json::to_value(&response).expect("json");

        assert_eq!(json["rows_per_page_options"], serde_json::json!([12, 24, 48]));
        assert_eq!(json["report"], "Showing 1 to 2 of 2 entries");
        assert_eq!(json["rows"][1]["id"], 2);
        assert_eq!(json["generation"], 1);
    }
}
