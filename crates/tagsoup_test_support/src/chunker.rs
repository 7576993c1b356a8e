//! Chunk plans for streaming tests.
//!
//! Provides deterministic chunk plans plus seeded fuzz plans for reproducible
//! streaming coverage in CI, and a greedy shrinker that reduces a failing plan
//! to the boundaries that matter.

use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BoundaryPolicy {
    /// Boundaries only on UTF-8 character boundaries; chunks go through `write`.
    Utf8Aligned,
    /// Any byte offset; chunks go through `write_bytes`.
    ByteStream,
}

impl fmt::Display for BoundaryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryPolicy::Utf8Aligned => f.write_str("utf8"),
            BoundaryPolicy::ByteStream => f.write_str("bytes"),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ChunkPlan {
    Fixed {
        size: usize,
        policy: BoundaryPolicy,
    },
    Boundaries {
        indices: Vec<usize>,
        policy: BoundaryPolicy,
    },
}

impl fmt::Display for ChunkPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkPlan::Fixed { size, policy } => {
                write!(f, "fixed size={size} policy={policy}")
            }
            ChunkPlan::Boundaries { indices, policy } => {
                write!(
                    f,
                    "boundaries count={} policy={policy} indices={indices:?}",
                    indices.len()
                )
            }
        }
    }
}

impl ChunkPlan {
    pub fn fixed(size: usize) -> Self {
        Self::Fixed {
            size,
            policy: BoundaryPolicy::Utf8Aligned,
        }
    }

    pub fn fixed_unaligned(size: usize) -> Self {
        Self::Fixed {
            size,
            policy: BoundaryPolicy::ByteStream,
        }
    }

    pub fn boundaries(indices: impl Into<Vec<usize>>) -> Self {
        Self::Boundaries {
            indices: indices.into(),
            policy: BoundaryPolicy::Utf8Aligned,
        }
    }

    pub fn boundaries_unaligned(indices: impl Into<Vec<usize>>) -> Self {
        Self::Boundaries {
            indices: indices.into(),
            policy: BoundaryPolicy::ByteStream,
        }
    }

    pub fn policy(&self) -> BoundaryPolicy {
        match self {
            ChunkPlan::Fixed { policy, .. } | ChunkPlan::Boundaries { policy, .. } => *policy,
        }
    }

    /// Interior split offsets this plan produces for `input`, ascending.
    pub fn split_points(&self, input: &str) -> Vec<usize> {
        let len = input.len();
        let mut points = match self {
            ChunkPlan::Fixed { size, .. } => {
                assert!(*size > 0, "chunk size must be > 0");
                (1..)
                    .map(|i| i * size)
                    .take_while(|&idx| idx < len)
                    .collect()
            }
            ChunkPlan::Boundaries { indices, .. } => indices.clone(),
        };
        points.sort_unstable();
        points.dedup();
        filter_boundaries_by_policy(input, &points, self.policy())
    }

    /// Call `f` with each chunk in order. Chunks are never empty.
    pub fn for_each_chunk(&self, input: &str, mut f: impl FnMut(&[u8])) {
        let bytes = input.as_bytes();
        let policy = self.policy();
        let mut last = 0usize;
        for idx in self.split_points(input) {
            assert_chunk_boundary(input, idx, policy);
            f(&bytes[last..idx]);
            last = idx;
        }
        if last < bytes.len() {
            f(&bytes[last..]);
        }
    }
}

fn assert_chunk_boundary(input: &str, idx: usize, policy: BoundaryPolicy) {
    if matches!(policy, BoundaryPolicy::Utf8Aligned) {
        assert!(
            input.is_char_boundary(idx),
            "chunk boundary must be UTF-8 aligned: {idx}"
        );
    }
}

fn filter_boundaries_by_policy(
    input: &str,
    indices: &[usize],
    policy: BoundaryPolicy,
) -> Vec<usize> {
    let len = input.len();
    indices
        .iter()
        .copied()
        .filter(|&idx| idx > 0 && idx < len)
        .filter(|&idx| {
            !matches!(policy, BoundaryPolicy::Utf8Aligned) || input.is_char_boundary(idx)
        })
        .collect()
}

#[derive(Clone, Debug)]
pub struct ChunkPlanCase {
    pub label: String,
    pub plan: ChunkPlan,
}

/// Build deterministic + fuzz chunk plans for the given input.
///
/// - Deterministic includes fixed sizes and boundary-aware splits around
///   `<`, `</`, `>`, `&`, `--` and quotes.
/// - Fuzz plans are seeded for CI reproducibility.
pub fn build_chunk_plans(
    input: &str,
    fuzz_runs: usize,
    fuzz_seed: u64,
    policy: BoundaryPolicy,
) -> Vec<ChunkPlanCase> {
    let mut plans = Vec::new();

    for size in [1usize, 2, 3, 4, 8, 16, 64] {
        plans.push(ChunkPlanCase {
            label: format!("fixed size={size}"),
            plan: fixed_plan(size, policy),
        });
    }

    let token_boundaries = token_boundary_indices(input, policy);
    if !token_boundaries.is_empty() {
        plans.push(ChunkPlanCase {
            label: format!("token-boundaries count={}", token_boundaries.len()),
            plan: boundaries_plan(token_boundaries.clone(), policy),
        });
    }

    if fuzz_runs > 0 {
        let mut candidates = internal_boundaries(input, policy);
        candidates.extend(token_boundaries);
        candidates.sort_unstable();
        candidates.dedup();
        for i in 0..fuzz_runs {
            let seed = fuzz_seed.wrapping_add(i as u64);
            let mut rng = Lcg::new(seed);
            let plan = if !candidates.is_empty() {
                let max = candidates.len().clamp(1, 32);
                let mut picks = candidates.clone();
                rng.shuffle(&mut picks);
                let count = 1 + rng.gen_range(max);
                picks.truncate(count);
                picks.sort_unstable();
                boundaries_plan(picks, policy)
            } else {
                // Fallback for empty/1-byte inputs.
                fixed_plan(1, policy)
            };
            plans.push(ChunkPlanCase {
                label: format!("fuzz boundaries seed=0x{seed:016x}"),
                plan,
            });
        }
    }

    plans
}

/// Every interior offset the policy allows.
pub fn internal_boundaries(input: &str, policy: BoundaryPolicy) -> Vec<usize> {
    let all: Vec<usize> = (1..input.len()).collect();
    filter_boundaries_by_policy(input, &all, policy)
}

fn fixed_plan(size: usize, policy: BoundaryPolicy) -> ChunkPlan {
    match policy {
        BoundaryPolicy::Utf8Aligned => ChunkPlan::fixed(size),
        BoundaryPolicy::ByteStream => ChunkPlan::fixed_unaligned(size),
    }
}

fn boundaries_plan(indices: Vec<usize>, policy: BoundaryPolicy) -> ChunkPlan {
    match policy {
        BoundaryPolicy::Utf8Aligned => ChunkPlan::boundaries(indices),
        BoundaryPolicy::ByteStream => ChunkPlan::boundaries_unaligned(indices),
    }
}

fn token_boundary_indices(input: &str, policy: BoundaryPolicy) -> Vec<usize> {
    let bytes = input.as_bytes();
    let mut out = Vec::new();
    for (i, &b) in bytes.iter().enumerate() {
        if matches!(b, b'<' | b'>' | b'"' | b'\'' | b'&' | b';') {
            out.push(i);
            out.push(i + 1);
        }
        if bytes[i..].starts_with(b"</") || bytes[i..].starts_with(b"--") {
            out.push(i + 2);
        }
    }
    out.sort_unstable();
    out.dedup();
    filter_boundaries_by_policy(input, &out, policy)
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ShrinkStats {
    pub original_boundaries: usize,
    pub final_boundaries: usize,
    pub checks: usize,
}

/// Drop boundaries one at a time while `fails` keeps failing.
pub fn shrink_chunk_plan(
    input: &str,
    plan: &ChunkPlan,
    mut fails: impl FnMut(&ChunkPlan) -> bool,
) -> (ChunkPlan, ShrinkStats) {
    let policy = plan.policy();
    let mut boundaries = plan.split_points(input);
    let mut stats = ShrinkStats {
        original_boundaries: boundaries.len(),
        ..ShrinkStats::default()
    };
    let mut changed = true;
    while changed {
        changed = false;
        let mut i = 0usize;
        while i < boundaries.len() {
            let mut candidate = boundaries.clone();
            candidate.remove(i);
            let candidate_plan = boundaries_plan(candidate.clone(), policy);
            stats.checks += 1;
            if fails(&candidate_plan) {
                boundaries = candidate;
                changed = true;
            } else {
                i += 1;
            }
        }
    }
    stats.final_boundaries = boundaries.len();
    (boundaries_plan(boundaries, policy), stats)
}

/// Linear congruential generator; deterministic across platforms.
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.state
    }

    pub fn gen_range(&mut self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        (self.next_u64() >> 32) as usize % upper
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        if items.len() < 2 {
            return;
        }
        for i in (1..items.len()).rev() {
            let j = self.gen_range(i + 1);
            items.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(plan: &ChunkPlan, input: &str) -> Vec<Vec<u8>> {
        let mut out = Vec::new();
        plan.for_each_chunk(input, |chunk| out.push(chunk.to_vec()));
        out
    }

    #[test]
    fn fixed_plan_covers_input() {
        let out = chunks(&ChunkPlan::fixed(3), "abcdefgh");
        assert_eq!(out, vec![b"abc".to_vec(), b"def".to_vec(), b"gh".to_vec()]);
    }

    #[test]
    fn aligned_plans_skip_interior_offsets() {
        let input = "a\u{00E9}b";
        assert_eq!(ChunkPlan::boundaries(vec![2, 0, 9]).split_points(input), Vec::<usize>::new());
        assert_eq!(ChunkPlan::boundaries_unaligned(vec![2]).split_points(input), vec![2]);
        assert_eq!(internal_boundaries(input, BoundaryPolicy::Utf8Aligned), vec![1, 3]);
    }

    #[test]
    fn fuzz_plans_are_reproducible() {
        let input = "<p a='1'>x &amp; y</p><!-- c -->";
        let first = build_chunk_plans(input, 4, 7, BoundaryPolicy::Utf8Aligned);
        let second = build_chunk_plans(input, 4, 7, BoundaryPolicy::Utf8Aligned);
        let labels: Vec<_> = first.iter().map(|case| case.plan.clone()).collect();
        let again: Vec<_> = second.iter().map(|case| case.plan.clone()).collect();
        assert_eq!(labels, again);
        assert!(first.iter().any(|case| case.label.starts_with("token-boundaries")));
    }

    #[test]
    fn shrinker_keeps_only_failing_boundary() {
        let input = "0123456789";
        let plan = ChunkPlan::boundaries(vec![2, 4, 6, 8]);
        let (shrunk, stats) =
            shrink_chunk_plan(input, &plan, |candidate| candidate.split_points(input).contains(&6));
        assert_eq!(shrunk, ChunkPlan::boundaries(vec![6]));
        assert_eq!(stats.original_boundaries, 4);
        assert_eq!(stats.final_boundaries, 1);
    }

    #[test]
    fn lcg_shuffle_is_a_permutation() {
        let mut rng = Lcg::new(0xC0FFEE);
        let mut items: Vec<u32> = (0..16).collect();
        rng.shuffle(&mut items);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..16).collect::<Vec<_>>());
    }
}
