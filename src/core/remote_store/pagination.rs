//! Token-based paging hidden behind a pull-style sequence.

use std::collections::VecDeque;

use async_trait::async_trait;

/// One page of results plus the token for the next one, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_token: Option<String>,
}

/// Something that serves results one page at a time.
#[async_trait]
pub trait PageSource: Send {
    type Item: Send;
    type Error: Send;

    async fn fetch_page(&mut self, token: Option<String>)
        -> Result<Page<Self::Item>, Self::Error>;
}

enum Cursor {
    Start,
    Next(String),
    Exhausted,
}

/// Lazily walks a [`PageSource`]. Pages are fetched only when the buffered
/// items run out, and once the source stops handing out tokens the paginator
/// is finished for good.
pub struct Paginator<S: PageSource> {
    source: S,
    buffer: VecDeque<S::Item>,
    cursor: Cursor,
    pages_fetched: usize,
}

impl<S: PageSource> Paginator<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            buffer: VecDeque::new(),
            cursor: Cursor::Start,
            pages_fetched: 0,
        }
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Next item, fetching another page if needed. An error ends the sequence.
    pub async fn next(&mut self) -> Option<Result<S::Item, S::Error>> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Some(Ok(item));
            }

            let token = match std::mem::replace(&mut self.cursor, Cursor::Exhausted) {
                Cursor::Exhausted => return None,
                Cursor::Start => None,
                Cursor::Next(token) => Some(token),
            };

            match self.source.fetch_page(token).await {
                Ok(page) => {
                    self.pages_fetched += 1;
                    if let Some(next) = page.next_token {
                        self.cursor = Cursor::Next(next);
                    }
                    self.buffer.extend(page.items);
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }

    /// Drains every remaining item.
    pub async fn collect_all(mut self) -> Result<Vec<S::Item>, S::Error> {
        let mut all = Vec::new();
        while let Some(item) = self.next().await {
            all.push(item?);
        }
        tracing::debug!(
            "Collected {} item(s) over {} page(s)",
            all.len(),
            self.pages_fetched()
        );
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct VecPages {
        pages: Vec<Vec<u32>>,
        requested: Vec<Option<String>>,
        fail_on: Option<usize>,
    }

    impl VecPages {
        fn new(pages: Vec<Vec<u32>>) -> Self {
            Self {
                pages,
                requested: Vec::new(),
                fail_on: None,
            }
        }
    }

    #[async_trait]
    impl PageSource for VecPages {
        type Item = u32;
        type Error = String;

        async fn fetch_page(&mut self, token: Option<String>) -> Result<Page<u32>, String> {
            let index = token
                .as_deref()
                .map(|t| t.parse::<usize>().unwrap())
                .unwrap_or(0);
            self.requested.push(token);
            if self.fail_on == Some(index) {
                return Err(format!("page {} failed", index));
            }

            let next_token = if index + 1 < self.pages.len() {
                Some((index + 1).to_string())
            } else {
                None
            };
            Ok(Page {
                items: self.pages[index].clone(),
                next_token,
            })
        }
    }

    #[tokio::test]
    async fn test_walks_every_page_in_order() {
        let pager = Paginator::new(VecPages::new(vec![vec![1, 2], vec![], vec![3]]));
        assert_eq!(pager.collect_all().await.unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_fetches_lazily() {
        let mut pager = Paginator::new(VecPages::new(vec![vec![1, 2], vec![3]]));
        assert_eq!(pager.pages_fetched(), 0);
        assert_eq!(pager.next().await, Some(Ok(1)));
        assert_eq!(pager.pages_fetched(), 1);
        assert_eq!(pager.next().await, Some(Ok(2)));
        assert_eq!(pager.pages_fetched(), 1);
        assert_eq!(pager.next().await, Some(Ok(3)));
        assert_eq!(pager.pages_fetched(), 2);
    }

    #[tokio::test]
    async fn test_does_not_restart_after_exhaustion() {
        let mut pager = Paginator::new(VecPages::new(vec![vec![7]]));
        assert_eq!(pager.next().await, Some(Ok(7)));
        assert_eq!(pager.next().await, None);
        assert_eq!(pager.next().await, None);
        assert_eq!(pager.pages_fetched(), 1);
        assert_eq!(pager.source.requested, vec![None]);
    }

    #[tokio::test]
    async fn test_passes_tokens_through() {
        let mut pager = Paginator::new(VecPages::new(vec![vec![1], vec![2], vec![3]]));
        while pager.next().await.is_some() {}
        assert_eq!(
            pager.source.requested,
            vec![None, Some("1".to_string()), Some("2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_error_ends_the_sequence() {
        let mut source = VecPages::new(vec![vec![1], vec![2]]);
        source.fail_on = Some(1);
        let mut pager = Paginator::new(source);
        assert_eq!(pager.next().await, Some(Ok(1)));
        assert_eq!(pager.next().await, Some(Err("page 1 failed".to_string())));
        assert_eq!(pager.next().await, None);
    }
}
