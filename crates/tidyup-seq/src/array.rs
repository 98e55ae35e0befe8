//! The [`AsyncArray`] pipeline.
//!
//! Every pipeline value owns one state cell:
//!
//! - `Source`: a one-shot stream, read at most once.
//! - `Pending`: an operator stage over a parent pipeline, not yet run.
//! - `Resolved`: concrete data, replayed for every later read.
//!
//! Reading a `Pending` pipeline first resolves it, which resolves its parent
//! in turn, so stages run in registration order and each stage is drained
//! into a buffer before the next one starts. A stage reading directly from a
//! `Source` pulls only what it needs, so `take` over an infinite stream
//! terminates.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};
use futures::lock::Mutex;
use futures::stream::{self, BoxStream, Stream, StreamExt, TryStreamExt};
use tracing::trace;

use crate::count::IntoCount;
use crate::error::{BoxError, SeqError};

/// Bounds shared by every sequence element.
pub trait Element: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> Element for T {}

/// Fallible stream of elements flowing between stages.
pub type ItemStream<T> = BoxStream<'static, Result<T, SeqError>>;

type RunStage<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<Vec<T>, SeqError>> + Send + Sync>;

struct Pending<T> {
    stage: &'static str,
    run: RunStage<T>,
}

enum State<T> {
    /// `None` once the stream has been handed out.
    Source(Option<ItemStream<T>>),
    Pending(Pending<T>),
    Resolved(Arc<[T]>),
}

/// A lazy, chainable asynchronous sequence.
///
/// Cloning is cheap and yields a handle to the same pipeline value. Operators
/// never mutate the value they are called on; they return a new pipeline.
pub struct AsyncArray<T> {
    state: Arc<Mutex<State<T>>>,
}

impl<T> Clone for AsyncArray<T> {
    fn clone(&self) -> Self {
        AsyncArray {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> fmt::Debug for AsyncArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncArray").finish_non_exhaustive()
    }
}

impl<T: Element> Default for AsyncArray<T> {
    fn default() -> Self {
        AsyncArray::empty()
    }
}

impl<T: Element> FromIterator<T> for AsyncArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        AsyncArray::new(iter)
    }
}

impl<T: Element> From<Vec<T>> for AsyncArray<T> {
    fn from(items: Vec<T>) -> Self {
        AsyncArray::new(items)
    }
}

fn replay<T: Element>(data: Arc<[T]>) -> ItemStream<T> {
    stream::iter((0..data.len()).map(move |i| Ok(data[i].clone()))).boxed()
}

impl AsyncArray<usize> {
    /// `0, 1, .., len - 1`.
    pub fn indexed(len: impl IntoCount) -> Self {
        AsyncArray::new(0..len.into_count())
    }
}

impl<T: Element> AsyncArray<T> {
    fn with_state(state: State<T>) -> Self {
        AsyncArray {
            state: Arc::new(Mutex::new(state)),
        }
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// A sequence over already-available items. Replayable.
    pub fn new<I: IntoIterator<Item = T>>(items: I) -> Self {
        let data: Arc<[T]> = items.into_iter().collect();
        AsyncArray::with_state(State::Resolved(data))
    }

    pub fn empty() -> Self {
        AsyncArray::new(Vec::new())
    }

    /// A sequence over a one-shot stream, which may be infinite.
    pub fn from_stream<S>(source: S) -> Self
    where
        S: Stream<Item = T> + Send + 'static,
    {
        AsyncArray::with_state(State::Source(Some(source.map(Ok).boxed())))
    }

    /// Like [`from_stream`](Self::from_stream), for a stream that can fail.
    pub fn from_try_stream<S, E>(source: S) -> Self
    where
        S: Stream<Item = Result<T, E>> + Send + 'static,
        E: Into<BoxError>,
    {
        let source = source.map(|item| item.map_err(SeqError::stream));
        AsyncArray::with_state(State::Source(Some(source.boxed())))
    }

    /// Await a source that is itself produced asynchronously.
    pub async fn from_future<F, I>(source: F) -> Self
    where
        F: Future<Output = I>,
        I: IntoIterator<Item = T>,
    {
        AsyncArray::new(source.await)
    }

    // ========================================================================
    // Materialization
    // ========================================================================

    /// Run every pending stage and cache the result.
    ///
    /// A failing stage leaves the pipeline unresolved. A failing source is
    /// left exhausted.
    pub async fn resolve(&self) -> Result<Arc<[T]>, SeqError> {
        let mut state = self.state.lock().await;
        let data: Arc<[T]> = match &mut *state {
            State::Resolved(data) => return Ok(Arc::clone(data)),
            State::Source(source) => match source.take() {
                Some(stream) => stream.try_collect::<Vec<T>>().await?.into(),
                None => Arc::from(Vec::new()),
            },
            State::Pending(pending) => {
                let stage = pending.stage;
                let run = Arc::clone(&pending.run);
                let items = run().await?;
                trace!(stage, items = items.len(), "stage materialized");
                items.into()
            }
        };
        *state = State::Resolved(Arc::clone(&data));
        Ok(data)
    }

    /// Elements as seen by a consumer of this pipeline.
    async fn input(&self) -> Result<ItemStream<T>, SeqError> {
        {
            let mut state = self.state.lock().await;
            match &mut *state {
                State::Resolved(data) => return Ok(replay(Arc::clone(data))),
                State::Source(source) => {
                    return Ok(source.take().unwrap_or_else(|| stream::empty().boxed()));
                }
                State::Pending(_) => {}
            }
        }
        self.resolve().await.map(replay)
    }

    /// Collect the whole pipeline into a vector.
    pub async fn to_vec(&self) -> Result<Vec<T>, SeqError> {
        Ok(self.resolve().await?.to_vec())
    }

    /// Asynchronous iteration over the pipeline.
    pub fn stream(&self) -> ItemStream<T> {
        let this = self.clone();
        stream::once(async move { this.input().await })
            .try_flatten()
            .boxed()
    }

    // ========================================================================
    // Operators
    // ========================================================================

    fn pipe<U, Op>(&self, stage: &'static str, op: Op) -> AsyncArray<U>
    where
        U: Element,
        Op: Fn(ItemStream<T>) -> ItemStream<U> + Send + Sync + 'static,
    {
        let parent = self.clone();
        let op = Arc::new(op);
        let run: RunStage<U> = Arc::new(move || {
            let parent = parent.clone();
            let op = Arc::clone(&op);
            async move {
                let input = parent.input().await?;
                op(input).try_collect::<Vec<U>>().await
            }
            .boxed()
        });
        AsyncArray::with_state(State::Pending(Pending { stage, run }))
    }

    /// Transform each element. `f` receives the element and its index within
    /// this stage's input.
    pub fn map<U, F, Fut>(&self, f: F) -> AsyncArray<U>
    where
        U: Element,
        F: Fn(T, usize) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = U> + Send + 'static,
    {
        let f = Arc::new(f);
        self.pipe("map", move |input| {
            let f = Arc::clone(&f);
            input
                .enumerate()
                .then(move |(index, item)| {
                    let f = Arc::clone(&f);
                    async move { Ok::<U, SeqError>(f(item?, index).await) }
                })
                .boxed()
        })
    }

    /// [`map`](Self::map) with a fallible callback.
    pub fn try_map<U, F, Fut, E>(&self, f: F) -> AsyncArray<U>
    where
        U: Element,
        F: Fn(T, usize) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<U, E>> + Send + 'static,
        E: Into<BoxError>,
    {
        let f = Arc::new(f);
        self.pipe("map", move |input| {
            let f = Arc::clone(&f);
            input
                .enumerate()
                .then(move |(index, item)| {
                    let f = Arc::clone(&f);
                    async move {
                        f(item?, index)
                            .await
                            .map_err(|e| SeqError::callback("map", index, e))
                    }
                })
                .boxed()
        })
    }

    /// Keep elements for which `predicate` resolves to `true`.
    pub fn filter<F, Fut>(&self, predicate: F) -> AsyncArray<T>
    where
        F: Fn(T, usize) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        let predicate = Arc::new(predicate);
        self.pipe("filter", move |input| {
            let predicate = Arc::clone(&predicate);
            input
                .enumerate()
                .filter_map(move |(index, item)| {
                    let predicate = Arc::clone(&predicate);
                    async move {
                        match item {
                            Ok(value) => predicate(value.clone(), index).await.then_some(Ok(value)),
                            Err(error) => Some(Err(error)),
                        }
                    }
                })
                .boxed()
        })
    }

    /// [`filter`](Self::filter) with a fallible predicate.
    pub fn try_filter<F, Fut, E>(&self, predicate: F) -> AsyncArray<T>
    where
        F: Fn(T, usize) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<bool, E>> + Send + 'static,
        E: Into<BoxError>,
    {
        let predicate = Arc::new(predicate);
        self.pipe("filter", move |input| {
            let predicate = Arc::clone(&predicate);
            input
                .enumerate()
                .filter_map(move |(index, item)| {
                    let predicate = Arc::clone(&predicate);
                    async move {
                        let value = match item {
                            Ok(value) => value,
                            Err(error) => return Some(Err(error)),
                        };
                        match predicate(value.clone(), index).await {
                            Ok(true) => Some(Ok(value)),
                            Ok(false) => None,
                            Err(e) => Some(Err(SeqError::callback("filter", index, e))),
                        }
                    }
                })
                .boxed()
        })
    }

    /// Replace each element with the items `f` resolves to, in order.
    pub fn flat_map<U, F, Fut, I>(&self, f: F) -> AsyncArray<U>
    where
        U: Element,
        F: Fn(T, usize) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = I> + Send + 'static,
        I: IntoIterator<Item = U>,
        I::IntoIter: Send + 'static,
    {
        let f = Arc::new(f);
        self.pipe("flat_map", move |input| {
            let f = Arc::clone(&f);
            input
                .enumerate()
                .then(move |(index, item)| {
                    let f = Arc::clone(&f);
                    async move {
                        let items = f(item?, index).await;
                        Ok::<_, SeqError>(stream::iter(items.into_iter().map(Ok::<U, SeqError>)))
                    }
                })
                .try_flatten()
                .boxed()
        })
    }

    /// Like [`flat_map`](Self::flat_map), where `f` resolves to a stream.
    pub fn flat_map_stream<U, F, Fut, S>(&self, f: F) -> AsyncArray<U>
    where
        U: Element,
        F: Fn(T, usize) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = S> + Send + 'static,
        S: Stream<Item = U> + Send + 'static,
    {
        let f = Arc::new(f);
        self.pipe("flat_map", move |input| {
            let f = Arc::clone(&f);
            input
                .enumerate()
                .then(move |(index, item)| {
                    let f = Arc::clone(&f);
                    async move {
                        let items = f(item?, index).await;
                        Ok::<_, SeqError>(items.map(Ok::<U, SeqError>))
                    }
                })
                .try_flatten()
                .boxed()
        })
    }

    /// At most the first `count` elements. Upstream is not read past the
    /// limit.
    pub fn take(&self, count: impl IntoCount) -> AsyncArray<T> {
        let limit = count.into_count();
        self.pipe("take", move |input| input.take(limit).boxed())
    }

    /// Everything after the first `count` elements.
    pub fn drop(&self, count: impl IntoCount) -> AsyncArray<T> {
        let limit = count.into_count();
        self.pipe("drop", move |input| {
            input
                .enumerate()
                .filter_map(move |(index, item)| {
                    future::ready((item.is_err() || index >= limit).then_some(item))
                })
                .boxed()
        })
    }

    // ========================================================================
    // Terminals
    // ========================================================================

    /// Fold without a seed: the first element is the seed and `f` first runs
    /// on the second element, with index 1. `None` for an empty sequence.
    pub async fn reduce<F, Fut>(&self, mut f: F) -> Result<Option<T>, SeqError>
    where
        F: FnMut(T, T, usize) -> Fut,
        Fut: Future<Output = T>,
    {
        let mut input = self.input().await?;
        let mut acc = None;
        let mut index = 0;
        while let Some(item) = input.try_next().await? {
            acc = Some(match acc {
                None => item,
                Some(previous) => f(previous, item, index).await,
            });
            index += 1;
        }
        Ok(acc)
    }

    /// Fold from `initial`; `f` first runs on the first element, with index 0.
    pub async fn fold<U, F, Fut>(&self, initial: U, mut f: F) -> Result<U, SeqError>
    where
        F: FnMut(U, T, usize) -> Fut,
        Fut: Future<Output = U>,
    {
        let mut input = self.input().await?;
        let mut acc = initial;
        let mut index = 0;
        while let Some(item) = input.try_next().await? {
            acc = f(acc, item, index).await;
            index += 1;
        }
        Ok(acc)
    }

    pub async fn for_each<F, Fut>(&self, mut f: F) -> Result<(), SeqError>
    where
        F: FnMut(T, usize) -> Fut,
        Fut: Future<Output = ()>,
    {
        let mut input = self.input().await?;
        let mut index = 0;
        while let Some(item) = input.try_next().await? {
            f(item, index).await;
            index += 1;
        }
        Ok(())
    }

    pub async fn try_for_each<F, Fut, E>(&self, mut f: F) -> Result<(), SeqError>
    where
        F: FnMut(T, usize) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: Into<BoxError>,
    {
        let mut input = self.input().await?;
        let mut index = 0;
        while let Some(item) = input.try_next().await? {
            f(item, index)
                .await
                .map_err(|e| SeqError::callback("for_each", index, e))?;
            index += 1;
        }
        Ok(())
    }

    /// `true` at the first element satisfying `predicate`.
    pub async fn some<F, Fut>(&self, mut predicate: F) -> Result<bool, SeqError>
    where
        F: FnMut(T, usize) -> Fut,
        Fut: Future<Output = bool>,
    {
        let mut input = self.input().await?;
        let mut index = 0;
        while let Some(item) = input.try_next().await? {
            if predicate(item, index).await {
                return Ok(true);
            }
            index += 1;
        }
        Ok(false)
    }

    /// `false` at the first element failing `predicate`.
    pub async fn every<F, Fut>(&self, mut predicate: F) -> Result<bool, SeqError>
    where
        F: FnMut(T, usize) -> Fut,
        Fut: Future<Output = bool>,
    {
        let mut input = self.input().await?;
        let mut index = 0;
        while let Some(item) = input.try_next().await? {
            if !predicate(item, index).await {
                return Ok(false);
            }
            index += 1;
        }
        Ok(true)
    }

    pub async fn find<F, Fut>(&self, mut predicate: F) -> Result<Option<T>, SeqError>
    where
        F: FnMut(T, usize) -> Fut,
        Fut: Future<Output = bool>,
    {
        let mut input = self.input().await?;
        let mut index = 0;
        while let Some(item) = input.try_next().await? {
            if predicate(item.clone(), index).await {
                return Ok(Some(item));
            }
            index += 1;
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn new_is_resolved_and_replayable() {
        let array = AsyncArray::new([1, 2, 3]);
        assert_eq!(block_on(array.to_vec()).unwrap(), vec![1, 2, 3]);
        assert_eq!(block_on(array.to_vec()).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn one_shot_source_is_cached_by_to_vec() {
        let array = AsyncArray::from_stream(stream::iter(vec!['a', 'b']));
        assert_eq!(block_on(array.to_vec()).unwrap(), vec!['a', 'b']);
        assert_eq!(block_on(array.to_vec()).unwrap(), vec!['a', 'b']);
    }

    #[test]
    fn indexed_counts_from_zero() {
        let array = AsyncArray::indexed(4);
        assert_eq!(block_on(array.to_vec()).unwrap(), vec![0, 1, 2, 3]);
        assert!(block_on(AsyncArray::indexed(-2).to_vec()).unwrap().is_empty());
    }

    #[test]
    fn debug_hides_state() {
        assert_eq!(format!("{:?}", AsyncArray::new([1])), "AsyncArray { .. }");
    }
}
