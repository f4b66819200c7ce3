//! Unique id generation for nodes created by the editor.
//!
//! The engine never invents ids on its own; it asks an injected
//! [`IdGenerator`]. Production authoring uses [`RandomIdGenerator`], tests use
//! [`SequentialIdGenerator`] so that results are reproducible.

use rand::distr::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The kind of node an id is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKind {
    Question,
    Answer,
    EndPage,
}

impl IdKind {
    pub fn prefix(self) -> &'static str {
        match self {
            IdKind::Question => "q",
            IdKind::Answer => "a",
            IdKind::EndPage => "end",
        }
    }
}

/// Source of fresh node ids.
///
/// The editor retries when a generated id collides with an existing one, so
/// implementations only need to be unique with high probability.
pub trait IdGenerator: Send {
    fn next_id(&mut self, kind: IdKind) -> String;
}

/// Random alphanumeric ids such as `q-x7Gk2PzQ`.
pub struct RandomIdGenerator {
    rng: StdRng,
    length: usize,
}

impl RandomIdGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            length: 10,
        }
    }

    /// A reproducible generator, for fixtures and snapshot tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            length: 10,
        }
    }

    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length.max(1);
        self
    }
}

impl Default for RandomIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for RandomIdGenerator {
    fn next_id(&mut self, kind: IdKind) -> String {
        let suffix: String = (0..self.length)
            .map(|_| self.rng.sample(Alphanumeric) as char)
            .collect();
        format!("{}-{}", kind.prefix(), suffix)
    }
}

/// Deterministic ids `q-1`, `a-2`, `end-3`, ... sharing one counter.
#[derive(Debug, Clone, Default)]
pub struct SequentialIdGenerator {
    next: u64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self, kind: IdKind) -> String {
        self.next += 1;
        format!("{}-{}", kind.prefix(), self.next)
    }
}
