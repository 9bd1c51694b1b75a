//! Paginated responses with lazy iteration across pages.
//!
//! A [`Paginated`] holds one page of a list endpoint together with a
//! borrowed handle to the client that fetched it. [`Paginated::auto_iter`]
//! yields every item of that page and then follows the `next` links,
//! fetching one page at a time, until a page without a `next` link.

use std::fmt;
use std::future::Future;
use std::ops::Deref;

use futures_util::stream::{self, BoxStream};
use futures_util::{StreamExt, TryStreamExt};
use serde_json::Value;

use super::http::ApiClient;
use crate::model::Model;
use crate::Result;

/// Something that can fetch a page by URL.
///
/// Implemented by [`ApiClient`]; the fetch goes through the same
/// authentication, retry and error classification as every other request.
pub trait PageFetcher {
    /// GET the page at `url` and return its raw JSON body.
    fn fetch_page(&self, url: &str) -> impl Future<Output = Result<Value>> + Send;
}

/// A list response: one page of results plus a link to the next page.
///
/// Usually implemented with [`iterable_response!`](crate::iterable_response).
pub trait IterableResponse: Model {
    /// Element type of `results`.
    type Item: Model + Clone;

    /// Results of this page.
    fn results(&self) -> &[Self::Item];

    /// URL of the next page, if any.
    fn next_url(&self) -> Option<&str>;

    /// Consume the page, keeping only its results.
    fn into_results(self) -> Vec<Self::Item>;
}

/// Implement [`IterableResponse`] for a model with `results` and `next` fields.
#[macro_export]
macro_rules! iterable_response {
    ($response:ty => $item:ty) => {
        impl $crate::client::IterableResponse for $response {
            type Item = $item;

            fn results(&self) -> &[$item] {
                &self.results
            }

            fn next_url(&self) -> ::std::option::Option<&str> {
                self.next.as_deref()
            }

            fn into_results(self) -> ::std::vec::Vec<$item> {
                self.results
            }
        }
    };
}

/// A page of results bound to the client that fetched it.
///
/// The client is borrowed, never owned, and is not part of the page's
/// serialized form or equality. Dereferences to the page itself.
///
/// # Example
///
/// ```no_run
/// use futures_util::StreamExt;
/// use lemon_rs::api::VenuesQuery;
///
/// # async fn example(client: lemon_rs::LemonClient) -> lemon_rs::Result<()> {
/// let venues = client.market_data().venues().get(VenuesQuery::new()).await?;
/// println!("{} venues on {} pages", venues.total, venues.pages);
///
/// // Stream every venue, fetching further pages as needed
/// let mut stream = venues.auto_iter();
/// while let Some(venue) = stream.next().await {
///     println!("{}", venue?.mic);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Paginated<'c, R, C = ApiClient> {
    response: R,
    client: &'c C,
}

impl<'c, R, C> Paginated<'c, R, C>
where
    R: IterableResponse,
    C: PageFetcher + Sync,
{
    /// Bind a page to a client.
    pub fn new(response: R, client: &'c C) -> Self {
        Self { response, client }
    }

    /// The page itself.
    pub fn response(&self) -> &R {
        &self.response
    }

    /// Unbind the page from the client.
    pub fn into_inner(self) -> R {
        self.response
    }

    /// The client used for further page fetches.
    pub fn client(&self) -> &'c C {
        self.client
    }

    /// Returns `true` if the page links to another page.
    pub fn has_next(&self) -> bool {
        self.response.next_url().is_some()
    }

    /// Fetch the following page, or `None` on the last page.
    pub async fn next_page(&self) -> Result<Option<Paginated<'c, R, C>>> {
        match self.response.next_url() {
            Some(url) => fetch(self.client, url)
                .await
                .map(|page| Some(Paginated::new(page, self.client))),
            None => Ok(None),
        }
    }

    /// Stream every item of this page and all following pages.
    ///
    /// Pages are fetched one at a time, in `next`-link order, only once the
    /// previous page's items are consumed. Calling this again starts over
    /// from this page. A failed fetch is yielded once and ends the stream.
    pub fn auto_iter(&self) -> BoxStream<'c, Result<R::Item>> {
        let state = IterState {
            items: self.response.results().to_vec().into_iter(),
            next: self.response.next_url().map(str::to_owned),
            client: self.client,
        };

        stream::unfold(state, |mut state| async move {
            loop {
                if let Some(item) = state.items.next() {
                    return Some((Ok(item), state));
                }
                let Some(url) = state.next.take() else {
                    return None;
                };
                match fetch::<R, C>(state.client, &url).await {
                    Ok(page) => {
                        state.next = page.next_url().map(str::to_owned);
                        state.items = page.into_results().into_iter();
                    }
                    Err(err) => return Some((Err(err), state)),
                }
            }
        })
        .boxed()
    }

    /// Collect every item of this page and all following pages.
    pub async fn collect_all(&self) -> Result<Vec<R::Item>> {
        self.auto_iter().try_collect().await
    }
}

struct IterState<'c, I, C> {
    items: std::vec::IntoIter<I>,
    next: Option<String>,
    client: &'c C,
}

async fn fetch<R, C>(client: &C, url: &str) -> Result<R>
where
    R: Model,
    C: PageFetcher,
{
    let raw = client.fetch_page(url).await?;
    R::from_data(&raw)
}

impl<R, C> Deref for Paginated<'_, R, C> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.response
    }
}

impl<R: PartialEq, C> PartialEq for Paginated<'_, R, C> {
    fn eq(&self, other: &Self) -> bool {
        self.response == other.response
    }
}

impl<R: fmt::Debug, C> fmt::Debug for Paginated<'_, R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paginated")
            .field("response", &self.response)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    crate::model! {
        struct Item {
            id: i64,
        }
    }

    crate::model! {
        struct ItemPage {
            results: Vec<Item>,
            next: Option<String>,
            total: i64,
        }
    }

    crate::iterable_response!(ItemPage => Item);

    #[derive(Default)]
    struct FakeFetcher {
        pages: HashMap<String, Value>,
        calls: AtomicUsize,
    }

    impl FakeFetcher {
        fn with_page(mut self, url: &str, page: Value) -> Self {
            self.pages.insert(url.to_string(), page);
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl PageFetcher for FakeFetcher {
        fn fetch_page(&self, url: &str) -> impl Future<Output = Result<Value>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let page = self.pages.get(url).cloned();
            let url = url.to_string();
            async move {
                page.ok_or_else(|| crate::Error::InvalidInput(format!("no page at {url}")))
            }
        }
    }

    fn first_page(next: Option<&str>) -> ItemPage {
        ItemPage::from_data(&json!({
            "results": [{"id": 1}, {"id": 2}],
            "next": next,
            "total": 3
        }))
        .unwrap()
    }

    fn ids(items: &[Item]) -> Vec<i64> {
        items.iter().map(|item| item.id).collect()
    }

    #[tokio::test]
    async fn test_single_page_makes_no_request() {
        let fetcher = FakeFetcher::default();
        let page = Paginated::new(first_page(None), &fetcher);

        let items = page.collect_all().await.unwrap();
        assert_eq!(ids(&items), [1, 2]);
        assert_eq!(fetcher.calls(), 0);
        assert!(page.next_page().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_follows_next_link_once() {
        let fetcher = FakeFetcher::default()
            .with_page("p2", json!({"results": [{"id": 3}], "next": null, "total": 3}));
        let page = Paginated::new(first_page(Some("p2")), &fetcher);

        let items = page.collect_all().await.unwrap();
        assert_eq!(ids(&items), [1, 2, 3]);
        assert_eq!(fetcher.calls(), 1);

        // restarting walks the same pages again
        let items = page.collect_all().await.unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_fetch_is_lazy() {
        let fetcher = FakeFetcher::default()
            .with_page("p2", json!({"results": [{"id": 3}], "next": null, "total": 3}));
        let page = Paginated::new(first_page(Some("p2")), &fetcher);

        let mut stream = page.auto_iter();
        assert_eq!(stream.next().await.unwrap().unwrap().id, 1);
        assert_eq!(stream.next().await.unwrap().unwrap().id, 2);
        assert_eq!(fetcher.calls(), 0);
        assert_eq!(stream.next().await.unwrap().unwrap().id, 3);
        assert_eq!(fetcher.calls(), 1);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_error_ends_stream() {
        let fetcher = FakeFetcher::default();
        let page = Paginated::new(first_page(Some("missing")), &fetcher);

        let results: Vec<_> = page.auto_iter().collect().await;
        assert_eq!(results.len(), 3);
        assert!(results[2].is_err());
        assert!(page.collect_all().await.is_err());
    }

    #[tokio::test]
    async fn test_next_page() {
        let fetcher = FakeFetcher::default()
            .with_page("p2", json!({"results": [{"id": 3}], "next": null, "total": 3}));
        let page = Paginated::new(first_page(Some("p2")), &fetcher);
        assert!(page.has_next());

        let second = page.next_page().await.unwrap().unwrap();
        assert_eq!(ids(second.results()), [3]);
        assert_eq!(second.total, 3);
        assert!(!second.has_next());
    }
}
