use std::any::Any;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::time::{Duration, Instant};

use fnv::{FnvHashMap, FnvHashSet};
use log::{debug, info, trace};
use separator::Separatable;

use crate::config::{ConfigErr, Limits};
use crate::solver::heuristic::Heuristic;
use crate::solver::outcome::{Outcome, SearchStats, Termination};
use crate::solver::SearchState;

/// Reading the clock for every popped state is measurable so it's sampled at most this often.
const TIMEOUT_CHECK_INTERVAL: Duration = Duration::from_millis(100);

/// Bookkeeping went wrong - a bug, not a property of the puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchErr {
    MissingScore,
    BrokenPath,
}

impl Display for SearchErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            SearchErr::MissingScore => write!(f, "Expanded state has no g score"),
            SearchErr::BrokenPath => write!(f, "Parent chain doesn't lead to the initial state"),
        }
    }
}

impl Error for SearchErr {}

struct OpenEntry<S> {
    f: u32,
    /// Insertion counter, earlier entries win ties.
    order: u64,
    state: Rc<S>,
}

impl<S> PartialEq for OpenEntry<S> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<S> Eq for OpenEntry<S> {}

impl<S> PartialOrd for OpenEntry<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S> Ord for OpenEntry<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.f, self.order).cmp(&(other.f, other.order))
    }
}

/// Everything that lives only for the duration of one search.
struct SearchContext<S: SearchState> {
    heap: BinaryHeap<Reverse<OpenEntry<S>>>,
    open_set: FnvHashSet<S::Fingerprint>,
    closed: FnvHashSet<S::Fingerprint>,
    parents: FnvHashMap<S::Fingerprint, Rc<S>>,
    g_scores: FnvHashMap<S::Fingerprint, u32>,
    f_scores: FnvHashMap<S::Fingerprint, u32>,
    root: Option<S::Fingerprint>,
    counter: u64,
    explored: usize,
    generated: usize,
    max_depth: u32,
    cleanups: usize,
    state_bytes: usize,
    started: Instant,
    last_timeout_check: Option<Instant>,
    next_memory_check: usize,
}

impl<S: SearchState> SearchContext<S> {
    fn new(started: Instant, memory_check_interval: usize) -> Self {
        SearchContext {
            heap: BinaryHeap::new(),
            open_set: FnvHashSet::default(),
            closed: FnvHashSet::default(),
            parents: FnvHashMap::default(),
            g_scores: FnvHashMap::default(),
            f_scores: FnvHashMap::default(),
            root: None,
            counter: 0,
            explored: 0,
            generated: 0,
            max_depth: 0,
            cleanups: 0,
            state_bytes: 0,
            started,
            last_timeout_check: None,
            next_memory_check: memory_check_interval,
        }
    }

    fn push(&mut self, state: Rc<S>, f: u32) {
        self.open_set.insert(state.fingerprint().clone());
        self.heap.push(Reverse(OpenEntry {
            f,
            order: self.counter,
            state,
        }));
        self.counter += 1;
    }

    fn pop(&mut self) -> Option<OpenEntry<S>> {
        self.heap.pop().map(|Reverse(entry)| entry)
    }

    /// An entry is stale if the state got a better score after it was pushed
    /// or if the state was already expanded through another entry.
    fn is_stale(&self, entry: &OpenEntry<S>) -> bool {
        let fp = entry.state.fingerprint();
        self.closed.contains(fp) || self.f_scores.get(fp) != Some(&entry.f)
    }

    fn close(&mut self, state: &S) {
        let fp = state.fingerprint();
        self.open_set.remove(fp);
        self.closed.insert(fp.clone());
        self.explored += 1;
    }

    fn reconstruct_path(&self, goal: &S) -> Result<Vec<S>, SearchErr> {
        let goal_fp = goal.fingerprint();
        let depth = *self.g_scores.get(goal_fp).ok_or(SearchErr::MissingScore)?;

        let mut path = vec![goal.clone()];
        let mut current = goal_fp;
        for _ in 0..depth {
            let parent = self.parents.get(current).ok_or(SearchErr::BrokenPath)?;
            path.push((**parent).clone());
            current = parent.fingerprint();
        }

        if self.root.as_ref() != Some(current) {
            return Err(SearchErr::BrokenPath);
        }

        path.reverse();
        Ok(path)
    }

    fn approx_memory(&self) -> usize {
        let fp = mem::size_of::<S::Fingerprint>();
        let score = fp + mem::size_of::<u32>();
        let entry = mem::size_of::<Reverse<OpenEntry<S>>>() + self.state_bytes;
        let parent = fp + mem::size_of::<Rc<S>>() + self.state_bytes;

        self.heap.len() * entry
            + self.parents.len() * parent
            + (self.g_scores.len() + self.f_scores.len()) * score
            + (self.open_set.len() + self.closed.len()) * fp
    }

    /// Drops everything the rest of the search can do without.
    ///
    /// The closed set stays complete - it's what prevents re-expanding states.
    /// Scores are only needed for pending states and parent links only
    /// on the way back from them.
    fn prune(&mut self) {
        let before = self.approx_memory();

        let entries = mem::take(&mut self.heap).into_vec();
        let live: Vec<_> = entries
            .into_iter()
            .filter(|Reverse(entry)| !self.is_stale(entry))
            .collect();
        self.heap = BinaryHeap::from(live);

        let open_set = &self.open_set;
        self.g_scores.retain(|fp, _| open_set.contains(fp));
        self.f_scores.retain(|fp, _| open_set.contains(fp));

        let mut parents = FnvHashMap::default();
        for Reverse(entry) in self.heap.iter() {
            let mut fp = entry.state.fingerprint();
            while let Some(parent) = self.parents.get(fp) {
                if parents.contains_key(fp) {
                    break;
                }
                parents.insert(fp.clone(), Rc::clone(parent));
                fp = parent.fingerprint();
            }
        }
        self.parents = parents;

        self.cleanups += 1;
        debug!(
            "Pruned search tables: ~{} -> ~{} bytes",
            before.separated_string(),
            self.approx_memory().separated_string()
        );
    }
}

/// A* over any [`SearchState`] with unit move cost.
///
/// The solver can be reused, every call to [`solve`](AStarSolver::solve)
/// starts from empty tables. The heuristic (and its cache) is kept between searches.
pub struct AStarSolver<H: Heuristic> {
    heuristic: H,
    limits: Limits,
    ctx: SearchContext<H::State>,
    termination: Termination,
}

impl<H: Heuristic> AStarSolver<H> {
    pub fn new(heuristic: H, limits: Limits) -> Result<Self, ConfigErr> {
        limits.validate()?;
        if !heuristic.is_admissible() {
            return Err(ConfigErr::InadmissibleHeuristic(heuristic.name().to_string()));
        }

        Ok(AStarSolver {
            heuristic,
            limits,
            ctx: SearchContext::new(Instant::now(), limits.memory_check_interval),
            termination: Termination::NotStarted,
        })
    }

    pub fn heuristic(&self) -> &H {
        &self.heuristic
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Why the last search stopped.
    pub fn termination(&self) -> &Termination {
        &self.termination
    }

    pub fn termination_reason(&self) -> String {
        self.termination.to_string()
    }

    pub fn stats(&self) -> SearchStats {
        let ctx = &self.ctx;
        SearchStats {
            states_explored: ctx.explored,
            states_generated: ctx.generated,
            max_depth: ctx.max_depth,
            frontier_size: ctx.open_set.len(),
            heap_size: ctx.heap.len(),
            closed_size: ctx.closed.len(),
            g_scores_size: ctx.g_scores.len(),
            f_scores_size: ctx.f_scores.len(),
            parents_size: ctx.parents.len(),
            cleanups: ctx.cleanups,
            limits: self.limits,
            heuristic: self.heuristic.name().to_string(),
            cache: self.heuristic.cache_stats(),
        }
    }

    pub fn solve(&mut self, initial: &H::State) -> Outcome<H::State> {
        let started = Instant::now();
        self.ctx = SearchContext::new(started, self.limits.memory_check_interval);
        self.termination = Termination::NotStarted;
        debug!(
            "Starting search with heuristic {}, {}",
            self.heuristic.name(),
            self.limits
        );

        // a panicking state or heuristic ends only this search
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.search(initial)));
        let mut outcome = match result {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(err)) => self.failed(Termination::Failed(err.to_string())),
            Err(payload) => self.failed(Termination::Failed(panic_message(&*payload))),
        };
        outcome.set_elapsed(started.elapsed());

        info!(
            "{} - explored {}, generated {}",
            self.termination,
            self.ctx.explored.separated_string(),
            self.ctx.generated.separated_string()
        );
        outcome
    }

    fn search(&mut self, initial: &H::State) -> Result<Outcome<H::State>, SearchErr> {
        self.ctx.generated = 1;
        if initial.is_goal() {
            self.termination = Termination::InitialIsGoal;
            return Ok(Outcome::solved(
                vec![initial.clone()],
                0,
                1,
                self.termination.clone(),
            ));
        }

        let h = self.heuristic.calculate(initial);
        let fp = initial.fingerprint().clone();
        self.ctx.state_bytes = initial.approx_bytes();
        self.ctx.root = Some(fp.clone());
        self.ctx.g_scores.insert(fp.clone(), 0);
        self.ctx.f_scores.insert(fp, h);
        self.ctx.push(Rc::new(initial.clone()), h);

        loop {
            if self.ctx.heap.is_empty() {
                return Ok(self.failed(Termination::FrontierExhausted));
            }
            if let Some(termination) = self.check_limits() {
                return Ok(self.failed(termination));
            }

            let entry = match self.ctx.pop() {
                Some(entry) => entry,
                None => return Ok(self.failed(Termination::FrontierExhausted)),
            };
            if self.ctx.is_stale(&entry) {
                continue;
            }

            let current = entry.state;
            self.ctx.close(&current);

            if current.is_goal() {
                let path = self.ctx.reconstruct_path(&current)?;
                self.termination = Termination::SolutionFound;
                return Ok(Outcome::solved(
                    path,
                    self.ctx.explored,
                    self.ctx.generated,
                    self.termination.clone(),
                ));
            }

            self.expand(&current)?;
        }
    }

    fn expand(&mut self, current: &Rc<H::State>) -> Result<(), SearchErr> {
        let ctx = &mut self.ctx;
        let heuristic = &mut self.heuristic;

        let g = *ctx
            .g_scores
            .get(current.fingerprint())
            .ok_or(SearchErr::MissingScore)?;
        let tentative_g = g + 1;

        for mov in current.possible_moves() {
            let successor = match current.apply_move(mov) {
                Ok(successor) => successor,
                Err(err) => {
                    trace!("Skipping {:?}: {}", mov, err);
                    continue;
                }
            };
            ctx.generated += 1;

            let fp = successor.fingerprint();
            if ctx.closed.contains(fp) {
                continue;
            }
            if let Some(&old_g) = ctx.g_scores.get(fp) {
                if tentative_g >= old_g {
                    continue;
                }
            }

            if tentative_g > ctx.max_depth {
                ctx.max_depth = tentative_g;
                debug!("Visited new depth: {}", tentative_g);
            }

            let f = tentative_g + heuristic.calculate(&successor);
            let fp = fp.clone();
            ctx.parents.insert(fp.clone(), Rc::clone(current));
            ctx.g_scores.insert(fp.clone(), tentative_g);
            ctx.f_scores.insert(fp, f);
            // an older entry for the same state, if any, is now stale
            ctx.push(Rc::new(successor), f);
        }

        Ok(())
    }

    fn check_limits(&mut self) -> Option<Termination> {
        let ctx = &mut self.ctx;

        if ctx.explored >= self.limits.max_states {
            return Some(Termination::StateLimit(self.limits.max_states));
        }

        let now = Instant::now();
        let due = ctx
            .last_timeout_check
            .map_or(true, |last| now.duration_since(last) >= TIMEOUT_CHECK_INTERVAL);
        if due {
            ctx.last_timeout_check = Some(now);
            if now.duration_since(ctx.started) >= self.limits.timeout {
                return Some(Termination::Timeout(self.limits.timeout));
            }
        }

        if ctx.explored >= ctx.next_memory_check {
            ctx.next_memory_check = ctx.explored + self.limits.memory_check_interval;

            let limit = self.limits.memory_limit;
            if ctx.approx_memory() > limit {
                ctx.prune();
                let tolerance = limit.saturating_add(limit / 10);
                if ctx.approx_memory() > tolerance {
                    return Some(Termination::MemoryLimit(limit));
                }
            }
        }

        None
    }

    fn failed(&mut self, termination: Termination) -> Outcome<H::State> {
        self.termination = termination;
        Outcome::failed(
            self.ctx.explored,
            self.ctx.generated,
            self.termination.clone(),
        )
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
