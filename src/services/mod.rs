//! Data-access layer: typed queries and mutations over the library API with
//! tag-based cache coherence

pub mod cache;
pub mod endpoints;
pub mod tags;

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookInput, BookUpdate, BorrowRequest, BorrowSummaryRow},
    repository::Transport,
};

use cache::{Begin, CacheKey, Flight, Landed, QueryCache, QueryStatus, Snapshot};
use endpoints::{
    CreateBook, CreateBorrowRequest, DeleteBook, GetBooks, GetBorrowSummary, Mutation, Query,
    UpdateBook,
};

/// Outcome of a query as seen by a page
#[derive(Debug)]
pub enum QueryResult<T> {
    Loading,
    Success(T),
    Error(AppError),
}

impl<T> QueryResult<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryResult::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            QueryResult::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&AppError> {
        match self {
            QueryResult::Error(e) => Some(e),
            _ => None,
        }
    }

    pub fn into_result(self) -> AppResult<T> {
        match self {
            QueryResult::Success(data) => Ok(data),
            QueryResult::Error(e) => Err(e),
            QueryResult::Loading => Err(AppError::Internal("query still loading".to_string())),
        }
    }
}

/// Non-fetching view of a cached query
#[derive(Debug, Clone)]
pub struct QuerySnapshot<T> {
    pub status: QueryStatus,
    /// Last fetched value, possibly stale
    pub data: Option<Arc<T>>,
    pub error: Option<String>,
}

/// Queries and mutations against the library API
#[derive(Clone)]
pub struct DataAccess {
    transport: Arc<dyn Transport>,
    cache: Arc<QueryCache>,
}

impl DataAccess {
    pub fn new(transport: Arc<dyn Transport>, cache: Arc<QueryCache>) -> Self {
        Self { transport, cache }
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    /// Read through the cache; a fresh entry answers without a network round-trip
    /// and concurrent readers of a missing entry share one fetch
    pub async fn query<Q: Query>(&self, arg: &Q::Arg) -> QueryResult<Arc<Q::Output>> {
        let key = CacheKey::new(Q::NAME, arg);
        loop {
            match self.cache.begin(&key, Q::provides()) {
                Begin::Hit(snapshot) => return Self::downcast::<Q>(&key, snapshot),
                Begin::Fetch(flight) => return self.fetch::<Q>(&key, flight, arg).await,
                Begin::Wait(mut landed) => {
                    let outcome = match landed.wait_for(Option::is_some).await {
                        Ok(landed) => landed.clone(),
                        Err(_) => None,
                    };
                    match outcome {
                        Some(Landed::Value(snapshot)) => return Self::downcast::<Q>(&key, snapshot),
                        Some(Landed::Failed(message)) => {
                            return QueryResult::Error(AppError::Upstream(message))
                        }
                        // the fetcher went away; start over
                        None => continue,
                    }
                }
            }
        }
    }

    /// Fetch even when a fresh entry exists
    pub async fn refetch<Q: Query>(&self, arg: &Q::Arg) -> QueryResult<Arc<Q::Output>> {
        let key = CacheKey::new(Q::NAME, arg);
        let flight = self.cache.begin_refetch(&key, Q::provides());
        self.fetch::<Q>(&key, flight, arg).await
    }

    fn downcast<Q: Query>(key: &CacheKey, snapshot: Snapshot) -> QueryResult<Arc<Q::Output>> {
        match snapshot.downcast::<Q::Output>() {
            Ok(value) => QueryResult::Success(value),
            Err(_) => QueryResult::Error(AppError::Internal(format!(
                "cached value for {} has an unexpected type",
                key
            ))),
        }
    }

    /// Current state of a query without triggering a fetch
    pub fn observe<Q: Query>(&self, arg: &Q::Arg) -> QuerySnapshot<Q::Output> {
        let key = CacheKey::new(Q::NAME, arg);
        QuerySnapshot {
            status: self.cache.status(&key),
            data: self
                .cache
                .value(&key)
                .and_then(|snapshot| snapshot.downcast::<Q::Output>().ok()),
            error: self.cache.last_error(&key),
        }
    }

    async fn fetch<Q: Query>(
        &self,
        key: &CacheKey,
        flight: Flight,
        arg: &Q::Arg,
    ) -> QueryResult<Arc<Q::Output>> {
        let outcome = match Q::request(arg) {
            Ok(request) => match self.transport.send(request).await {
                Ok(body) => Q::decode(body),
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        };

        match outcome {
            Ok(output) => {
                let value = Arc::new(output);
                self.cache.complete(key, flight, value.clone());
                QueryResult::Success(value)
            }
            Err(e) => {
                tracing::warn!("query {} failed: {}", key, e);
                self.cache.fail(key, flight, e.to_string());
                QueryResult::Error(e)
            }
        }
    }

    /// Issue a write; on success every cached query sharing a tag with the
    /// mutation goes stale. Failures invalidate nothing.
    pub async fn mutate<M: Mutation>(&self, payload: &M::Payload) -> AppResult<M::Output> {
        let request = M::request(payload)?;
        tracing::info!("mutation {}: {} {}", M::NAME, request.method, request.path);

        let body = self.transport.send(request).await?;

        // the write happened even if the echo fails to decode
        let count = self.cache.invalidate(M::invalidates());
        tracing::debug!("mutation {} invalidated {} cached queries", M::NAME, count);

        M::decode(body)
    }

    pub async fn get_books(&self) -> QueryResult<Arc<Vec<Book>>> {
        self.query::<GetBooks>(&()).await
    }

    pub async fn get_borrow_summary(&self) -> QueryResult<Arc<Vec<BorrowSummaryRow>>> {
        self.query::<GetBorrowSummary>(&()).await
    }

    pub async fn create_book(&self, input: BookInput) -> AppResult<Book> {
        self.mutate::<CreateBook>(&input).await
    }

    pub async fn update_book(&self, id: impl Into<String>, input: BookInput) -> AppResult<Book> {
        self.mutate::<UpdateBook>(&BookUpdate {
            id: id.into(),
            input,
        })
        .await
    }

    pub async fn delete_book(&self, id: impl Into<String>) -> AppResult<()> {
        self.mutate::<DeleteBook>(&id.into()).await
    }

    pub async fn create_borrow_request(
        &self,
        request: BorrowRequest,
    ) -> AppResult<serde_json::Value> {
        self.mutate::<CreateBorrowRequest>(&request).await
    }
}
