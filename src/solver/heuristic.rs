//! Lower bounds on the remaining number of moves.
//!
//! Each heuristic memoizes its results per fingerprint in a [`BoundedCache`]
//! which it owns, so the cache outlives a single search.

use std::collections::VecDeque;
use std::fmt::{self, Display, Formatter};
use std::hash::Hash;

use fnv::FnvHashMap;
use separator::Separatable;

use crate::solver::SearchState;
use crate::state::{Fingerprint, State};

const CACHE_CAPACITY: usize = 10_000;
const CACHE_EVICT_BATCH: usize = 1_000;

pub trait Heuristic {
    type State: SearchState;

    /// Estimate of the moves left to reach a goal from `state`.
    fn calculate(&mut self, state: &Self::State) -> u32;

    /// Whether the estimate never exceeds the real remaining cost.
    ///
    /// Self-declared, the solver only refuses heuristics that say `false`.
    fn is_admissible(&self) -> bool;

    fn name(&self) -> &str;

    fn cache_stats(&self) -> Option<CacheStats> {
        None
    }
}

impl<H: Heuristic + ?Sized> Heuristic for &mut H {
    type State = H::State;

    fn calculate(&mut self, state: &Self::State) -> u32 {
        (**self).calculate(state)
    }

    fn is_admissible(&self) -> bool {
        (**self).is_admissible()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn cache_stats(&self) -> Option<CacheStats> {
        (**self).cache_stats()
    }
}

impl<H: Heuristic + ?Sized> Heuristic for Box<H> {
    type State = H::State;

    fn calculate(&mut self, state: &Self::State) -> u32 {
        (**self).calculate(state)
    }

    fn is_admissible(&self) -> bool {
        (**self).is_admissible()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn cache_stats(&self) -> Option<CacheStats> {
        (**self).cache_stats()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
}

impl Display for CacheStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} hits, {} misses, {} entries",
            self.hits.separated_string(),
            self.misses.separated_string(),
            self.size.separated_string()
        )
    }
}

/// Map with a maximum size which forgets the oldest *inserted* entries first.
///
/// Lookups don't refresh entries so this is not an LRU.
#[derive(Debug)]
pub(crate) struct BoundedCache<K, V> {
    map: FnvHashMap<K, V>,
    order: VecDeque<K>,
    capacity: usize,
    evict_batch: usize,
    hits: u64,
    misses: u64,
}

impl<K: Eq + Hash + Clone, V: Copy> BoundedCache<K, V> {
    pub(crate) fn new(capacity: usize, evict_batch: usize) -> Self {
        BoundedCache {
            map: FnvHashMap::default(),
            order: VecDeque::new(),
            capacity,
            evict_batch,
            hits: 0,
            misses: 0,
        }
    }

    pub(crate) fn get(&mut self, key: &K) -> Option<V> {
        let value = self.map.get(key).cloned();
        if value.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        value
    }

    pub(crate) fn insert(&mut self, key: K, value: V) {
        if self.map.insert(key.clone(), value).is_none() {
            self.order.push_back(key);
        }

        if self.map.len() > self.capacity {
            for _ in 0..self.evict_batch {
                match self.order.pop_front() {
                    Some(oldest) => {
                        self.map.remove(&oldest);
                    }
                    None => break,
                }
            }
        }
    }

    pub(crate) fn get_or_insert_with<F: FnOnce() -> V>(&mut self, key: &K, f: F) -> V {
        if let Some(value) = self.get(key) {
            return value;
        }
        let value = f();
        self.insert(key.clone(), value);
        value
    }

    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    pub(crate) fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.len(),
        }
    }
}

fn default_cache() -> BoundedCache<Fingerprint, u32> {
    BoundedCache::new(CACHE_CAPACITY, CACHE_EVICT_BATCH)
}

/// Sum of distances when each box in turn claims its nearest goal that's still free.
///
/// The exclusive greedy assignment can be larger than the optimal assignment
/// so the estimate may overshoot on some levels even though it claims admissibility.
#[derive(Debug)]
pub struct GreedyMatching {
    cache: BoundedCache<Fingerprint, u32>,
}

impl GreedyMatching {
    pub fn new() -> Self {
        GreedyMatching {
            cache: default_cache(),
        }
    }

    fn compute(state: &State) -> u32 {
        let goals = state.map().goals();
        let mut used = vec![false; goals.len()];
        let mut total = 0;

        for &b in state.boxes() {
            let nearest = goals
                .iter()
                .enumerate()
                .filter(|&(i, _)| !used[i])
                .min_by_key(|&(_, &goal)| b.dist(goal));
            if let Some((i, &goal)) = nearest {
                used[i] = true;
                total += b.dist(goal);
            }
        }

        total
    }
}

impl Default for GreedyMatching {
    fn default() -> Self {
        Self::new()
    }
}

impl Heuristic for GreedyMatching {
    type State = State;

    fn calculate(&mut self, state: &State) -> u32 {
        self.cache
            .get_or_insert_with(state.fingerprint(), || Self::compute(state))
    }

    fn is_admissible(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "greedy"
    }

    fn cache_stats(&self) -> Option<CacheStats> {
        Some(self.cache.stats())
    }
}

/// Sum of distances from each box to its nearest goal, goals may be shared.
#[derive(Debug)]
pub struct NearestGoal {
    cache: BoundedCache<Fingerprint, u32>,
}

impl NearestGoal {
    pub fn new() -> Self {
        NearestGoal {
            cache: default_cache(),
        }
    }

    fn compute(state: &State) -> u32 {
        let goals = state.map().goals();
        state
            .boxes()
            .iter()
            .map(|&b| goals.iter().map(|&g| b.dist(g)).min().unwrap_or(0))
            .sum()
    }
}

impl Default for NearestGoal {
    fn default() -> Self {
        Self::new()
    }
}

impl Heuristic for NearestGoal {
    type State = State;

    fn calculate(&mut self, state: &State) -> u32 {
        self.cache
            .get_or_insert_with(state.fingerprint(), || Self::compute(state))
    }

    fn is_admissible(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "nearest"
    }

    fn cache_stats(&self) -> Option<CacheStats> {
        Some(self.cache.stats())
    }
}

/// Number of boxes not on a goal.
#[derive(Debug)]
pub struct MisplacedBoxes {
    cache: BoundedCache<Fingerprint, u32>,
}

impl MisplacedBoxes {
    pub fn new() -> Self {
        MisplacedBoxes {
            cache: default_cache(),
        }
    }

    fn compute(state: &State) -> u32 {
        let map = state.map();
        state.boxes().iter().filter(|&&b| !map.is_goal(b)).count() as u32
    }
}

impl Default for MisplacedBoxes {
    fn default() -> Self {
        Self::new()
    }
}

impl Heuristic for MisplacedBoxes {
    type State = State;

    fn calculate(&mut self, state: &State) -> u32 {
        self.cache
            .get_or_insert_with(state.fingerprint(), || Self::compute(state))
    }

    fn is_admissible(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "misplaced"
    }

    fn cache_stats(&self) -> Option<CacheStats> {
        Some(self.cache.stats())
    }
}
