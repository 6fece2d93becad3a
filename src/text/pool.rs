use super::run::GlyphRun;

/// Free list of cleared runs, so repeated layouts reuse their buffers.
#[derive(Clone, Debug)]
pub struct RunPool {
    free: Vec<GlyphRun>,
    max_free: usize,
}

impl Default for RunPool {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RETENTION)
    }
}

impl RunPool {
    /// Number of free runs kept by [`RunPool::default`].
    pub const DEFAULT_RETENTION: usize = 100;

    /// A pool keeping at most `max_free` runs around.
    pub fn new(max_free: usize) -> Self {
        Self {
            free: Vec::new(),
            max_free,
        }
    }

    /// A pool that never retains anything; every run is freshly allocated.
    pub fn unpooled() -> Self {
        Self::new(0)
    }

    pub fn max_free(&self) -> usize {
        self.max_free
    }

    /// Number of runs waiting for reuse.
    pub fn len(&self) -> usize {
        self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    /// Returns a cleared run.
    pub fn obtain(&mut self) -> GlyphRun {
        self.free.pop().unwrap_or_default()
    }

    /// Takes a run back, dropping it when the pool is full.
    pub fn free(&mut self, mut run: GlyphRun) {
        if self.free.len() < self.max_free {
            run.clear();
            self.free.push(run);
        }
    }

    /// Takes back every run of `runs`, leaving it empty.
    pub fn free_all(&mut self, runs: &mut Vec<GlyphRun>) {
        for run in runs.drain(..) {
            self.free(run);
        }
    }
}
