//! REST calls for one entity resource.
//!
//! `EntityService` knows the URL layout of a resource
//! (`api/<resource>`, `api/_search/<resource>`), builds the requests, and
//! turns responses into entities or pages. It holds no state.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tally_domain::{
    Entity, EntityId, Operation, Page, PageLinks, PageRequest, SearchRequest, clean_entity,
    request::{ApiRequest, HttpMethod},
    response::ApiResponse,
};
use tracing::{debug, warn};

use crate::error::{ApiError, ApplicationResult};
use crate::ports::{Clock, HttpClient};

/// Header carrying the pagination cursors.
pub const LINK_HEADER: &str = "link";
/// Header carrying the total number of items.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

const MERGE_PATCH_CONTENT_TYPE: &str = "application/merge-patch+json";

/// Stateless REST client for the resource of entity type `T`.
pub struct EntityService<T, C, K> {
    client: Arc<C>,
    clock: Arc<K>,
    _entity: PhantomData<fn() -> T>,
}

impl<T, C, K> Clone for EntityService<T, C, K> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            clock: Arc::clone(&self.clock),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity, C: HttpClient, K: Clock> EntityService<T, C, K> {
    /// Creates a service over the given ports.
    pub const fn new(client: Arc<C>, clock: Arc<K>) -> Self {
        Self {
            client,
            clock,
            _entity: PhantomData,
        }
    }

    /// Collection endpoint, e.g. `api/bill-positions`.
    #[must_use]
    pub fn api_url() -> String {
        format!("api/{}", T::RESOURCE)
    }

    /// Search endpoint, e.g. `api/_search/bill-positions`.
    #[must_use]
    pub fn search_url() -> String {
        format!("api/_search/{}", T::RESOURCE)
    }

    fn item_url(id: &EntityId) -> String {
        format!("{}/{id}", Self::api_url())
    }

    /// Builds the search request. Paging is only sent together with a sort.
    #[must_use]
    pub fn search_request(search: &SearchRequest) -> ApiRequest {
        let request = ApiRequest::get(Self::search_url()).with_query("query", &search.query);
        with_paging(request, &search.page)
    }

    /// Builds the list request, including a cache-busting timestamp.
    #[must_use]
    pub fn list_request(&self, page: &PageRequest) -> ApiRequest {
        with_paging(ApiRequest::get(Self::api_url()), page)
            .with_query("cacheBuster", self.clock.now_millis())
    }

    /// Builds the request for a single record.
    #[must_use]
    pub fn get_request(id: &EntityId) -> ApiRequest {
        ApiRequest::get(Self::item_url(id))
    }

    /// Builds a create, update or partial update request.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::MissingIdentifier` for an update of a record
    /// without id, and `ApiError::Encode` if the record cannot be serialized.
    pub fn save_request(operation: Operation, entity: &T) -> ApplicationResult<ApiRequest> {
        let body = clean_entity(entity).map_err(|e| ApiError::Encode(e.to_string()))?;
        let request = match operation {
            Operation::Create => ApiRequest::new(HttpMethod::Post, Self::api_url()),
            Operation::Update => ApiRequest::new(HttpMethod::Put, Self::existing_url(operation, entity)?),
            Operation::PartialUpdate => {
                ApiRequest::new(HttpMethod::Patch, Self::existing_url(operation, entity)?)
                    .with_header("Content-Type", MERGE_PATCH_CONTENT_TYPE)
            }
            other => {
                return Err(ApiError::Encode(format!("{other} does not send a record")));
            }
        };
        Ok(request.with_body(body))
    }

    fn existing_url(operation: Operation, entity: &T) -> ApplicationResult<String> {
        entity
            .id()
            .map(Self::item_url)
            .ok_or(ApiError::MissingIdentifier(operation))
    }

    /// Builds the delete request.
    #[must_use]
    pub fn delete_request(id: &EntityId) -> ApiRequest {
        ApiRequest::new(HttpMethod::Delete, Self::item_url(id))
    }

    /// Searches the collection.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status or an
    /// undecodable response.
    pub async fn search(&self, search: &SearchRequest) -> ApplicationResult<Page<T>> {
        let response = self.send(Self::search_request(search)).await?;
        decode_page(&response)
    }

    /// Lists one page of the collection.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status or an
    /// undecodable response.
    pub async fn list(&self, page: &PageRequest) -> ApplicationResult<Page<T>> {
        let response = self.send(self.list_request(page)).await?;
        decode_page(&response)
    }

    /// Fetches a single record.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status or an
    /// undecodable response.
    pub async fn get(&self, id: &EntityId) -> ApplicationResult<T> {
        let response = self.send(Self::get_request(id)).await?;
        decode_json(&response)
    }

    /// Creates a record and returns it as stored.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status or an
    /// undecodable response.
    pub async fn create(&self, entity: &T) -> ApplicationResult<T> {
        self.save(Operation::Create, entity).await
    }

    /// Replaces an existing record.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::MissingIdentifier` without issuing a request if the
    /// record has no id; otherwise as [`Self::create`].
    pub async fn update(&self, entity: &T) -> ApplicationResult<T> {
        self.save(Operation::Update, entity).await
    }

    /// Updates the set fields of an existing record.
    ///
    /// # Errors
    ///
    /// Same as [`Self::update`].
    pub async fn partial_update(&self, entity: &T) -> ApplicationResult<T> {
        self.save(Operation::PartialUpdate, entity).await
    }

    async fn save(&self, operation: Operation, entity: &T) -> ApplicationResult<T> {
        let request = Self::save_request(operation, entity)?;
        let response = self.send(request).await?;
        decode_json(&response)
    }

    /// Deletes a record.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-2xx status.
    pub async fn delete(&self, id: &EntityId) -> ApplicationResult<()> {
        self.send(Self::delete_request(id)).await?;
        Ok(())
    }

    async fn send(&self, request: ApiRequest) -> ApplicationResult<ApiResponse> {
        debug!(method = %request.method, path = %request.path, "sending request");
        let response = self.client.execute(&request).await?;
        if response.is_success() {
            return Ok(response);
        }
        Err(ApiError::Status {
            status: response.status,
            detail: problem_detail(&response),
        })
    }
}

fn with_paging(request: ApiRequest, page: &PageRequest) -> ApiRequest {
    match &page.sort {
        Some(sort) => request
            .with_query("page", page.page)
            .with_query("size", page.size)
            .with_query("sort", sort),
        None => request,
    }
}

fn decode_json<R: DeserializeOwned>(response: &ApiResponse) -> ApplicationResult<R> {
    serde_json::from_slice(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
}

fn decode_page<T: Entity>(response: &ApiResponse) -> ApplicationResult<Page<T>> {
    let items = decode_json(response)?;
    let links = match response.header(LINK_HEADER) {
        Some(header) => PageLinks::parse(header)?,
        None => PageLinks::single_page(),
    };
    Ok(Page {
        items,
        links,
        total_items: total_count(response),
    })
}

fn total_count(response: &ApiResponse) -> u64 {
    let Some(raw) = response.header(TOTAL_COUNT_HEADER) else {
        warn!("response without {TOTAL_COUNT_HEADER} header");
        return 0;
    };
    raw.trim().parse().unwrap_or_else(|_| {
        warn!(value = raw, "unparseable {TOTAL_COUNT_HEADER} header");
        0
    })
}

/// Extracts a human-readable reason from an error body
/// (`detail`, `title` or `message` of a JSON problem document).
fn problem_detail(response: &ApiResponse) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(&response.body).ok()?;
    ["detail", "title", "message"]
        .iter()
        .find_map(|key| value.get(key).and_then(serde_json::Value::as_str))
        .map(str::to_string)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use crate::ports::HttpClientError;
    use chrono::{DateTime, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::future::Future;
    use std::sync::Mutex;
    use std::time::Duration;
    use tally_domain::BillPosition;

    /// Clock frozen at a known instant.
    pub struct FixedClock;

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()
        }
    }

    /// Mock HTTP client replaying canned responses in order.
    #[derive(Default)]
    pub struct MockHttpClient {
        responses: Mutex<Vec<Result<ApiResponse, HttpClientError>>>,
        pub requests: Mutex<Vec<ApiRequest>>,
    }

    impl MockHttpClient {
        pub fn replying(
            responses: impl IntoIterator<Item = Result<ApiResponse, HttpClientError>>,
        ) -> Self {
            let mut responses: Vec<_> = responses.into_iter().collect();
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn recorded(&self) -> Vec<ApiRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl HttpClient for MockHttpClient {
        fn execute(
            &self,
            request: &ApiRequest,
        ) -> impl Future<Output = Result<ApiResponse, HttpClientError>> + Send {
            self.requests.lock().unwrap().push(request.clone());
            let next = self
                .responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(HttpClientError::Other("no canned response".into())));
            async move { next }
        }
    }

    pub fn json_response(
        status: u16,
        headers: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> Result<ApiResponse, HttpClientError> {
        Ok(ApiResponse::new(
            status,
            headers
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string())),
            serde_json::to_vec(body).unwrap(),
            Duration::from_millis(5),
        ))
    }

    type Service = EntityService<BillPosition, MockHttpClient, FixedClock>;

    fn service(client: MockHttpClient) -> (Service, Arc<MockHttpClient>) {
        let client = Arc::new(client);
        (
            EntityService::new(Arc::clone(&client), Arc::new(FixedClock)),
            client,
        )
    }

    #[test]
    fn test_urls() {
        assert_eq!(Service::api_url(), "api/bill-positions");
        assert_eq!(Service::search_url(), "api/_search/bill-positions");
        assert_eq!(
            Service::get_request(&EntityId::Number(3)).path,
            "api/bill-positions/3"
        );
    }

    #[test]
    fn test_list_request_pages_only_when_sorted() {
        let (service, _) = service(MockHttpClient::default());

        let unsorted = service.list_request(&PageRequest::new(1, 20));
        assert_eq!(
            unsorted.query,
            vec![("cacheBuster".to_string(), "1700000000000".to_string())]
        );

        let sorted = service.list_request(&PageRequest::new(1, 20).sorted("id,asc"));
        assert_eq!(sorted.query_value("page"), Some("1"));
        assert_eq!(sorted.query_value("size"), Some("20"));
        assert_eq!(sorted.query_value("sort"), Some("id,asc"));
        assert_eq!(sorted.query_value("cacheBuster"), Some("1700000000000"));
    }

    #[test]
    fn test_search_request() {
        let request = Service::search_request(
            &SearchRequest::new("pizza").with_page(PageRequest::new(0, 10).sorted("title,desc")),
        );
        assert_eq!(request.path, "api/_search/bill-positions");
        assert_eq!(request.query_value("query"), Some("pizza"));
        assert_eq!(request.query_value("sort"), Some("title,desc"));
        assert_eq!(request.query_value("cacheBuster"), None);
    }

    #[test]
    fn test_save_requests() {
        let draft = BillPosition::new("A");
        let create = Service::save_request(Operation::Create, &draft).unwrap();
        assert_eq!(create.method, HttpMethod::Post);
        assert_eq!(create.path, "api/bill-positions");
        assert_eq!(create.body, Some(json!({ "title": "A" })));

        let saved = BillPosition {
            id: Some(EntityId::Number(5)),
            ..draft.clone()
        };
        let patch = Service::save_request(Operation::PartialUpdate, &saved).unwrap();
        assert_eq!(patch.method, HttpMethod::Patch);
        assert_eq!(patch.path, "api/bill-positions/5");
        assert_eq!(patch.headers.len(), 1);

        assert_eq!(
            Service::save_request(Operation::Update, &draft),
            Err(ApiError::MissingIdentifier(Operation::Update))
        );
    }

    #[tokio::test]
    async fn test_list_decodes_page() {
        let body = json!([{ "id": 1, "title": "a" }, { "id": "2", "title": "b" }]);
        let (service, _) = service(MockHttpClient::replying([json_response(
            200,
            &[
                ("Link", "<api/bill-positions?page=0&size=20>; rel=\"last\", <api/bill-positions?page=0&size=20>; rel=\"first\""),
                ("X-Total-Count", "2"),
            ],
            &body,
        )]));

        let page = service.list(&PageRequest::default()).await.unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_items, 2);
        assert!(page.links.is_single_page());
    }

    #[tokio::test]
    async fn test_missing_headers_default() {
        let (service, _) =
            service(MockHttpClient::replying([json_response(200, &[], &json!([]))]));

        let page = service.search(&SearchRequest::new("x")).await.unwrap();

        assert_eq!(page.total_items, 0);
        assert_eq!(page.links, PageLinks::single_page());
    }

    #[tokio::test]
    async fn test_error_status_carries_detail() {
        let (service, _) = service(MockHttpClient::replying([json_response(
            400,
            &[],
            &json!({ "title": "Bad Request", "detail": "A new billPosition cannot already have an ID" }),
        )]));

        let error = service.create(&BillPosition::new("A")).await.unwrap_err();

        assert_eq!(
            error.to_string(),
            "Request failed with status code 400: A new billPosition cannot already have an ID"
        );
    }

    #[tokio::test]
    async fn test_update_without_id_sends_nothing() {
        let (service, client) = service(MockHttpClient::default());

        let error = service
            .partial_update(&BillPosition::new("A"))
            .await
            .unwrap_err();

        assert_eq!(error, ApiError::MissingIdentifier(Operation::PartialUpdate));
        assert!(client.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_delete_ignores_empty_body() {
        let (service, client) = service(MockHttpClient::replying([Ok(ApiResponse::new(
            204,
            Vec::new(),
            Vec::new(),
            Duration::ZERO,
        ))]));

        service.delete(&EntityId::Number(7)).await.unwrap();

        let requests = client.recorded();
        assert_eq!(requests[0].method, HttpMethod::Delete);
        assert_eq!(requests[0].path, "api/bill-positions/7");
    }

    #[tokio::test]
    async fn test_transport_error_passes_through() {
        let (service, _) = service(MockHttpClient::replying([Err(
            HttpClientError::ConnectionFailed("refused".to_string()),
        )]));

        let error = service.get(&EntityId::Number(1)).await.unwrap_err();

        assert_eq!(error.to_string(), "Network Error: refused");
    }
}
