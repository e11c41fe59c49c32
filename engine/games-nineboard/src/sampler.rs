//! Uniform random index sources used by expansion and playouts.

use rand::Rng;
use rand_chacha::ChaCha20Rng;

/// Source of uniformly distributed indices.
pub trait MoveSampler {
    /// Return an index in `[0, len)`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

impl MoveSampler for ChaCha20Rng {
    #[inline]
    fn pick(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}

/// Replays a fixed sequence of indices, cycling when exhausted.
///
/// Each scripted value is reduced modulo `len`, so a script of `[0]` always
/// takes the lowest legal move.
#[derive(Debug, Clone)]
pub struct ScriptedSampler {
    script: Vec<usize>,
    cursor: usize,
    calls: usize,
}

impl ScriptedSampler {
    pub fn new(script: Vec<usize>) -> Self {
        assert!(!script.is_empty(), "scripted sampler needs at least one value");
        Self {
            script,
            cursor: 0,
            calls: 0,
        }
    }

    /// Number of indices handed out so far.
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl MoveSampler for ScriptedSampler {
    fn pick(&mut self, len: usize) -> usize {
        let value = self.script[self.cursor];
        self.cursor = (self.cursor + 1) % self.script.len();
        self.calls += 1;
        value % len
    }
}
