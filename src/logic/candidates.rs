//! Candidate generation: every 4-player group, each of its 3 team splits, on each open court.

use crate::models::PlayerId;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Upper bound on candidates collected for one pick inside a round.
pub const MAX_CANDIDATES_PER_PICK: usize = 5000;

/// One possible match: two teams of two on a specific court.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MatchCandidate {
    pub team_1: [PlayerId; 2],
    pub team_2: [PlayerId; 2],
    pub court: u32,
}

impl MatchCandidate {
    /// Team 1 then team 2, the seat order used in `Match::players`.
    pub fn players(&self) -> [PlayerId; 4] {
        [self.team_1[0], self.team_1[1], self.team_2[0], self.team_2[1]]
    }

    /// The four cross-net pairs.
    pub fn opponent_pairs(&self) -> [(PlayerId, PlayerId); 4] {
        let [a, b] = self.team_1;
        let [c, d] = self.team_2;
        [(a, c), (a, d), (b, c), (b, d)]
    }
}

/// The 3 ways to split four players into two teams of two.
pub fn team_splits(group: [PlayerId; 4]) -> [([PlayerId; 2], [PlayerId; 2]); 3] {
    let [a, b, c, d] = group;
    [([a, b], [c, d]), ([a, c], [b, d]), ([a, d], [b, c])]
}

/// Lexicographic k-combinations of a pool, yielded lazily.
struct Combinations {
    pool: Vec<PlayerId>,
    indices: Vec<usize>,
    started: bool,
    done: bool,
}

impl Combinations {
    fn new(pool: Vec<PlayerId>, k: usize) -> Self {
        let done = k > pool.len();
        Self {
            pool,
            indices: (0..k).collect(),
            started: false,
            done,
        }
    }

    fn current(&self) -> Vec<PlayerId> {
        self.indices.iter().map(|&i| self.pool[i]).collect()
    }
}

impl Iterator for Combinations {
    type Item = Vec<PlayerId>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.current());
        }
        let n = self.pool.len();
        let k = self.indices.len();
        let mut i = k;
        loop {
            if i == 0 {
                self.done = true;
                return None;
            }
            i -= 1;
            if self.indices[i] < n - k + i {
                break;
            }
        }
        self.indices[i] += 1;
        for j in i + 1..k {
            self.indices[j] = self.indices[j - 1] + 1;
        }
        Some(self.current())
    }
}

/// Fixed members, the pool fillers are drawn from, and how many fillers a group needs.
fn group_basis(available: &[PlayerId], must_play: &[PlayerId]) -> (Vec<PlayerId>, Vec<PlayerId>, usize) {
    let must: Vec<PlayerId> = available
        .iter()
        .copied()
        .filter(|id| must_play.contains(id))
        .collect();

    if must.len() >= 4 {
        return (Vec::new(), must, 4);
    }
    let others: Vec<PlayerId> = available
        .iter()
        .copied()
        .filter(|id| !must.contains(id))
        .collect();
    let k = 4 - must.len();
    (must, others, k)
}

/// n choose k, saturating at `usize::MAX`.
fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    (0..k).fold(1usize, |acc, i| acc.saturating_mul(n - i) / (i + 1))
}

/// All valid 4-player groups from `available`, honouring the must-play set.
///
/// With 4+ must-play players a group is drawn entirely from them; with 1-3 every
/// group holds all of them plus fillers; with none any 4 players form a group.
/// Must-play ids not in `available` are ignored. Order follows `available`.
pub fn four_player_groups<'a>(
    available: &'a [PlayerId],
    must_play: &'a [PlayerId],
) -> impl Iterator<Item = [PlayerId; 4]> + 'a {
    let (fixed, pool, k) = group_basis(available, must_play);
    let enough = available.len() >= 4;
    Combinations::new(pool, k)
        .filter(move |_| enough)
        .filter_map(move |combo| {
            let group: Vec<PlayerId> = fixed.iter().copied().chain(combo).collect();
            <[PlayerId; 4]>::try_from(group).ok()
        })
}

/// Up to `count` distinct groups drawn uniformly at random, with the same must-play rule
/// as [`four_player_groups`]. Every available player can appear.
pub fn sample_four_player_groups<R: Rng + ?Sized>(
    available: &[PlayerId],
    must_play: &[PlayerId],
    count: usize,
    rng: &mut R,
) -> Vec<[PlayerId; 4]> {
    let (fixed, pool, k) = group_basis(available, must_play);
    if available.len() < 4 || pool.len() < k {
        return Vec::new();
    }

    let mut seen: HashSet<[PlayerId; 4]> = HashSet::new();
    let mut groups = Vec::with_capacity(count);
    // Duplicate draws are discarded, so bound the draws rather than loop until `count`.
    let max_draws = count.saturating_mul(4);
    for _ in 0..max_draws {
        if groups.len() >= count {
            break;
        }
        let members: Vec<PlayerId> = fixed
            .iter()
            .copied()
            .chain(pool.choose_multiple(rng, k).copied())
            .collect();
        let Ok(group) = <[PlayerId; 4]>::try_from(members) else {
            continue;
        };
        let mut key = group;
        key.sort_unstable();
        if seen.insert(key) {
            groups.push(group);
        }
    }
    groups
}

/// Lazily enumerate candidates: each group, each team split, each open court.
///
/// Yields nothing when fewer than 4 players or no courts are available.
pub fn candidates<'a>(
    available: &'a [PlayerId],
    open_courts: &'a [u32],
    must_play: &'a [PlayerId],
) -> impl Iterator<Item = MatchCandidate> + 'a {
    four_player_groups(available, must_play).flat_map(move |group| expand_group(group, open_courts))
}

fn expand_group(group: [PlayerId; 4], open_courts: &[u32]) -> impl Iterator<Item = MatchCandidate> + '_ {
    team_splits(group).into_iter().flat_map(move |(team_1, team_2)| {
        open_courts.iter().map(move |&court| MatchCandidate {
            team_1,
            team_2,
            court,
        })
    })
}

/// Candidates for one pick, at most `limit` of them.
///
/// The full enumeration is used when it fits under `limit`. Otherwise whole groups are
/// sampled at random (each with all its splits and courts), so the cap never favours
/// the players that happen to lead `available`.
pub fn generate_candidates<R: Rng + ?Sized>(
    available: &[PlayerId],
    open_courts: &[u32],
    must_play: &[PlayerId],
    limit: usize,
    rng: &mut R,
) -> Vec<MatchCandidate> {
    if available.len() < 4 || open_courts.is_empty() || limit == 0 {
        return Vec::new();
    }
    let (_, pool, k) = group_basis(available, must_play);
    let per_group = 3 * open_courts.len();
    let total = binomial(pool.len(), k).saturating_mul(per_group);
    if total <= limit {
        return candidates(available, open_courts, must_play).collect();
    }

    let budget = (limit / per_group).max(1);
    sample_four_player_groups(available, must_play, budget, rng)
        .into_iter()
        .flat_map(|group| expand_group(group, open_courts))
        .take(limit)
        .collect()
}
