//! Page cache keyed by the effective query.

use std::collections::{HashMap, VecDeque};
use std::marker::PhantomData;
use std::sync::{Mutex, PoisonError};

use crate::domain::page::ListPage;
use crate::domain::query::EffectiveQuery;
use crate::repository::ListReader;
use crate::repository::errors::RepositoryResult;

/// Pages kept by [`CachedReader::new`].
pub const DEFAULT_CAPACITY: usize = 64;

struct Pages<T> {
    by_query: HashMap<EffectiveQuery, ListPage<T>>,
    /// Insertion order, oldest first.
    order: VecDeque<EffectiveQuery>,
}

impl<T> Pages<T> {
    fn new() -> Self {
        Self {
            by_query: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    fn insert(&mut self, query: EffectiveQuery, page: ListPage<T>, capacity: usize) {
        if self.by_query.insert(query.clone(), page).is_some() {
            return;
        }
        self.order.push_back(query);
        while self.order.len() > capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.by_query.remove(&oldest);
            }
        }
    }

    fn clear(&mut self) {
        self.by_query.clear();
        self.order.clear();
    }
}

/// Wraps a reader so that identical effective queries are served from memory.
///
/// Only successful fetches are stored; a failed fetch is retried the next
/// time the same query is requested. At most `capacity` pages are kept and
/// the oldest one is evicted first.
pub struct CachedReader<R, T> {
    inner: R,
    capacity: usize,
    pages: Mutex<Pages<T>>,
    _rows: PhantomData<fn() -> T>,
}

impl<R, T> CachedReader<R, T>
where
    R: ListReader<T>,
    T: Clone,
{
    pub fn new(inner: R) -> Self {
        Self::with_capacity(inner, DEFAULT_CAPACITY)
    }

    /// A capacity of zero is treated as one.
    pub fn with_capacity(inner: R, capacity: usize) -> Self {
        Self {
            inner,
            capacity: capacity.max(1),
            pages: Mutex::new(Pages::new()),
            _rows: PhantomData,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Forgets every cached page, e.g. after a row was edited.
    pub fn invalidate(&self) {
        self.pages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.pages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .order
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<R, T> ListReader<T> for CachedReader<R, T>
where
    R: ListReader<T>,
    T: Clone,
{
    fn fetch_page(&self, query: &EffectiveQuery) -> RepositoryResult<ListPage<T>> {
        if let Some(page) = self
            .pages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .by_query
            .get(query)
        {
            log::debug!("Serving page {} of cached list query", query.page);
            return Ok(page.clone());
        }

        let page = self.inner.fetch_page(query)?;
        self.pages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(query.clone(), page.clone(), self.capacity);
        Ok(page)
    }
}
