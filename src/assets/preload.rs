use std::sync::{Arc, OnceLock, mpsc};

use crate::{
    assets::decode::{PreparedFrame, decode_frame},
    assets::source::FrameSource,
    foundation::core::FrameIndex,
    foundation::error::{ReelError, ReelResult},
};

/// Settled state of one frame slot.
#[derive(Clone, Debug)]
pub enum FrameSlot {
    /// The frame decoded successfully.
    Loaded(Arc<PreparedFrame>),
    /// Loading or decoding failed; the slot stays unavailable forever.
    Failed,
}

/// Observable state of one slot, including the not-yet-settled case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotState {
    Pending,
    Loaded,
    Failed,
}

/// Fixed-length table of frame slots, each written at most once.
///
/// Loader threads settle slots; the sequencer only reads them.
#[derive(Debug)]
pub struct FrameStore {
    slots: Vec<OnceLock<FrameSlot>>,
}

impl FrameStore {
    /// Create a store with `frame_count` pending slots.
    pub fn new(frame_count: usize) -> Self {
        Self {
            slots: (0..frame_count).map(|_| OnceLock::new()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn state(&self, index: FrameIndex) -> SlotState {
        match self.slots.get(index.0).and_then(OnceLock::get) {
            None => SlotState::Pending,
            Some(FrameSlot::Loaded(_)) => SlotState::Loaded,
            Some(FrameSlot::Failed) => SlotState::Failed,
        }
    }

    /// Loaded frame at `index`, or `None` while pending, after failure, or out of range.
    pub fn get(&self, index: FrameIndex) -> Option<Arc<PreparedFrame>> {
        match self.slots.get(index.0)?.get()? {
            FrameSlot::Loaded(frame) => Some(Arc::clone(frame)),
            FrameSlot::Failed => None,
        }
    }

    /// Lowest index whose frame has loaded so far.
    pub fn first_loaded(&self) -> Option<FrameIndex> {
        self.slots
            .iter()
            .position(|s| matches!(s.get(), Some(FrameSlot::Loaded(_))))
            .map(FrameIndex)
    }

    /// Settle `index` with `slot`. Returns `false` when the slot was already settled or the index is
    /// out of range; the first write always wins.
    pub fn settle(&self, index: FrameIndex, slot: FrameSlot) -> bool {
        match self.slots.get(index.0) {
            Some(cell) => cell.set(slot).is_ok(),
            None => false,
        }
    }

    pub fn stats(&self) -> PreloadStats {
        let mut stats = PreloadStats {
            requested: self.slots.len(),
            ..PreloadStats::default()
        };
        for slot in &self.slots {
            match slot.get() {
                None => stats.pending += 1,
                Some(FrameSlot::Loaded(_)) => stats.loaded += 1,
                Some(FrameSlot::Failed) => stats.failed += 1,
            }
        }
        stats
    }
}

/// Counts of slot states at one point in time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct PreloadStats {
    pub requested: usize,
    pub loaded: usize,
    pub failed: usize,
    pub pending: usize,
}

impl PreloadStats {
    /// Every slot has either loaded or failed.
    pub fn is_settled(&self) -> bool {
        self.pending == 0
    }
}

/// Emitted once per slot when its load settles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameEvent {
    pub index: FrameIndex,
    pub state: SlotState,
}

/// Options for [`start_preload`].
#[derive(Clone, Debug, Default)]
pub struct PreloadOpts {
    /// Override rayon worker threads. `None` uses rayon's default.
    pub threads: Option<usize>,
}

/// Running preload of a frame sequence.
///
/// Dropping the handle does not cancel outstanding loads; they run to completion or failure.
pub struct Preload {
    store: Arc<FrameStore>,
    events: mpsc::Receiver<FrameEvent>,
    received: usize,
    _pool: rayon::ThreadPool,
}

impl Preload {
    /// Shared store being filled by this preload.
    pub fn store(&self) -> Arc<FrameStore> {
        Arc::clone(&self.store)
    }

    /// Drain events for slots settled since the previous call. Never blocks.
    pub fn poll(&mut self) -> Vec<FrameEvent> {
        let events: Vec<FrameEvent> = self.events.try_iter().collect();
        self.received += events.len();
        events
    }

    /// Block until every slot has settled, then report final counts.
    pub fn wait(&mut self) -> PreloadStats {
        while self.received < self.store.len() {
            if self.events.recv().is_err() {
                break;
            }
            self.received += 1;
        }
        self.store.stats()
    }
}

/// Start loading `frame_count` frames from `source`.
///
/// One independent job per frame is spawned in index order. A failing frame only marks its own
/// slot as [`FrameSlot::Failed`].
#[tracing::instrument(skip(source, opts))]
pub fn start_preload(
    source: Arc<dyn FrameSource>,
    frame_count: usize,
    opts: &PreloadOpts,
) -> ReelResult<Preload> {
    let pool = build_thread_pool(opts.threads)?;
    let store = Arc::new(FrameStore::new(frame_count));
    let (tx, rx) = mpsc::channel::<FrameEvent>();

    for i in 0..frame_count {
        let index = FrameIndex(i);
        let source = Arc::clone(&source);
        let store = Arc::clone(&store);
        let tx = tx.clone();
        pool.spawn(move || {
            let state = load_one(source.as_ref(), &store, index);
            // The receiver may be gone if the handle was dropped; the slot is settled regardless.
            let _ = tx.send(FrameEvent { index, state });
        });
    }

    Ok(Preload {
        store,
        events: rx,
        received: 0,
        _pool: pool,
    })
}

/// Start a preload and block until every slot has settled.
pub fn preload_blocking(
    source: Arc<dyn FrameSource>,
    frame_count: usize,
    opts: &PreloadOpts,
) -> ReelResult<(Arc<FrameStore>, PreloadStats)> {
    let mut preload = start_preload(source, frame_count, opts)?;
    let stats = preload.wait();
    tracing::debug!(
        loaded = stats.loaded,
        failed = stats.failed,
        "frame preload settled"
    );
    Ok((preload.store(), stats))
}

fn load_one(source: &dyn FrameSource, store: &FrameStore, index: FrameIndex) -> SlotState {
    let number = index.number();
    let slot = match source.load(number).and_then(|bytes| decode_frame(number, &bytes)) {
        Ok(frame) => {
            tracing::trace!(number, "frame loaded");
            FrameSlot::Loaded(Arc::new(frame))
        }
        Err(e) => {
            tracing::warn!(number, error = %e, "frame unavailable");
            FrameSlot::Failed
        }
    };
    if !store.settle(index, slot) {
        tracing::warn!(number, "frame slot already settled");
    }
    store.state(index)
}

fn build_thread_pool(threads: Option<usize>) -> ReelResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ReelError::config("preload 'threads' must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("preload-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/preload.rs"]
mod tests;
