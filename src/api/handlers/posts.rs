//! Posts list, show and edit pages backed by the REST data provider.

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

use super::pages::{Layout, Page};
use crate::{
    auth::AuthGate,
    data::{
        DataError, ListParams, RestDataProvider, SortOrder, Sorter, DEFAULT_PAGE_SIZE,
        MAX_PAGE_SIZE,
    },
    routes::{resources::POSTS, Action, Resource, Resources},
};

const DEFAULT_SORT_FIELD: &str = "id";

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub current: Option<u64>,
    pub page_size: Option<u64>,
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
}

// Page numbers start at 1; page sizes are capped at `MAX_PAGE_SIZE`.
impl From<ListQuery> for ListParams {
    fn from(query: ListQuery) -> Self {
        Self {
            current: query.current.unwrap_or(1).max(1),
            page_size: query
                .page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
            sorter: Some(Sorter {
                field: query.sort.unwrap_or_else(|| DEFAULT_SORT_FIELD.to_string()),
                order: query.order.unwrap_or_default(),
            }),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListContent {
    pub resource: Resource,
    pub data: Vec<Value>,
    pub total: u64,
    pub current: u64,
    pub page_size: u64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RecordContent {
    pub resource: Resource,
    pub id: String,
    pub record: Value,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub data: Value,
    pub redirect_to: String,
}

/// `HttpError`-shaped body for data failures.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DataErrorBody {
    pub message: String,
    pub status_code: u16,
}

/// Routes the failure through `onError`, then maps it to a response.
fn data_error(gate: &AuthGate, err: DataError) -> Response {
    let err = gate.on_error(err);
    let status = match err.status() {
        Some(StatusCode::NOT_FOUND) => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_GATEWAY,
    };
    let body = DataErrorBody {
        message: err.to_string(),
        status_code: err.status().unwrap_or(status).as_u16(),
    };
    (status, Json(body)).into_response()
}

fn posts_resource(resources: &Resources) -> Result<&Resource, Response> {
    resources
        .get(POSTS)
        .ok_or_else(|| StatusCode::NOT_FOUND.into_response())
}

#[instrument(skip(gate, resources, data))]
pub async fn list(
    gate: Extension<Arc<AuthGate>>,
    resources: Extension<Arc<Resources>>,
    data: Extension<Arc<RestDataProvider>>,
    Query(query): Query<ListQuery>,
) -> Response {
    let resource = match posts_resource(&resources) {
        Ok(resource) => resource.clone(),
        Err(response) => return response,
    };
    let params = ListParams::from(query);

    match data.get_list(POSTS, &params).await {
        Ok(list) => Json(Page {
            title: resource.title(Action::List, None),
            page: "posts.list",
            layout: Some(Layout::new(&gate, &resources)),
            content: ListContent {
                resource,
                data: list.data,
                total: list.total,
                current: params.current,
                page_size: params.page_size,
            },
        })
        .into_response(),
        Err(err) => data_error(&gate, err),
    }
}

#[instrument(skip(gate, resources, data))]
pub async fn show(
    gate: Extension<Arc<AuthGate>>,
    resources: Extension<Arc<Resources>>,
    data: Extension<Arc<RestDataProvider>>,
    Path(id): Path<String>,
) -> Response {
    record_page(&gate, &resources, &data, Action::Show, "posts.show", id).await
}

#[instrument(skip(gate, resources, data))]
pub async fn edit(
    gate: Extension<Arc<AuthGate>>,
    resources: Extension<Arc<Resources>>,
    data: Extension<Arc<RestDataProvider>>,
    Path(id): Path<String>,
) -> Response {
    record_page(&gate, &resources, &data, Action::Edit, "posts.edit", id).await
}

/// Saves the edit form and points back to the list.
#[instrument(skip(gate, resources, data, changes))]
pub async fn update(
    gate: Extension<Arc<AuthGate>>,
    resources: Extension<Arc<Resources>>,
    data: Extension<Arc<RestDataProvider>>,
    Path(id): Path<String>,
    Json(changes): Json<Value>,
) -> Response {
    let redirect_to = match posts_resource(&resources) {
        Ok(resource) => resource
            .path(Action::List, None)
            .unwrap_or_else(|| "/".to_string()),
        Err(response) => return response,
    };

    match data.update(POSTS, &id, &changes).await {
        Ok(updated) => Json(UpdateResponse {
            data: updated,
            redirect_to,
        })
        .into_response(),
        Err(err) => data_error(&gate, err),
    }
}

async fn record_page(
    gate: &AuthGate,
    resources: &Resources,
    data: &RestDataProvider,
    action: Action,
    page: &'static str,
    id: String,
) -> Response {
    let resource = match posts_resource(resources) {
        Ok(resource) => resource.clone(),
        Err(response) => return response,
    };

    match data.get_one(POSTS, &id).await {
        Ok(record) => Json(Page {
            title: resource.title(action, Some(&id)),
            page,
            layout: Some(Layout::new(gate, resources)),
            content: RecordContent {
                resource,
                id,
                record,
            },
        })
        .into_response(),
        Err(err) => data_error(gate, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_defaults() {
        let params = ListParams::from(ListQuery::default());
        assert_eq!(params.current, 1);
        assert_eq!(params.page_size, 10);
        assert_eq!(
            params.sorter,
            Some(Sorter {
                field: "id".to_string(),
                order: SortOrder::Desc,
            })
        );
    }

    #[test]
    fn list_query_overrides() {
        let query = ListQuery {
            current: Some(2),
            page_size: Some(25),
            sort: Some("title".to_string()),
            order: Some(SortOrder::Asc),
        };
        let params = ListParams::from(query);
        assert_eq!(params.window(), (25, 50));
        assert_eq!(params.sorter.map(|s| s.field), Some("title".to_string()));
    }

    #[test]
    fn list_query_clamps_out_of_range_values() {
        let zero = ListParams::from(ListQuery {
            current: Some(0),
            page_size: Some(0),
            ..ListQuery::default()
        });
        assert_eq!((zero.current, zero.page_size), (1, 1));

        let huge = ListParams::from(ListQuery {
            current: Some(u64::MAX),
            page_size: Some(u64::MAX),
            ..ListQuery::default()
        });
        assert_eq!(huge.current, u64::MAX);
        assert_eq!(huge.page_size, 100);
        assert_eq!(huge.window(), (u64::MAX, u64::MAX));
    }

    #[test]
    fn data_error_maps_upstream_not_found() {
        let gate = AuthGate::default();
        let response = data_error(
            &gate,
            DataError::Status {
                url: "https://api.fake-rest.refine.dev/posts/0".to_string(),
                status: StatusCode::NOT_FOUND,
            },
        );
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn data_error_maps_other_failures_to_bad_gateway() {
        let gate = AuthGate::default();
        let response = data_error(
            &gate,
            DataError::Status {
                url: "https://api.fake-rest.refine.dev/posts".to_string(),
                status: StatusCode::INTERNAL_SERVER_ERROR,
            },
        );
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
