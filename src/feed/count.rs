//! Total-count discovery
//!
//! Posts are numbered densely from 1, so the count is the last ordinal that
//! exists. It is found by galloping from a fixed guess and then bisecting
//! between the last hit and the first miss. A gap in the numbering makes the
//! count stop at the gap.

use std::future::Future;

use crate::address::BucketDate;
use crate::api::PageStore;
use crate::models::Channel;

use super::probe;

/// First ordinal probed after ordinal 1
pub const INITIAL_GUESS: u64 = 16;

/// Find the length of the prefix `1..=n` for which `exists` holds
///
/// `exists` must be monotone: true up to some `n`, false after.
pub async fn search_count<F, Fut>(mut exists: F) -> u64
where
    F: FnMut(u64) -> Fut,
    Fut: Future<Output = bool>,
{
    if !exists(1).await {
        return 0;
    }

    let (mut left, mut right) = if exists(INITIAL_GUESS).await {
        let mut low = INITIAL_GUESS;
        let mut high = INITIAL_GUESS * 2;
        while exists(high).await {
            low = high;
            match high.checked_mul(2) {
                Some(next) => high = next,
                None => return low,
            }
        }
        (low + 1, high)
    } else {
        (2, INITIAL_GUESS)
    };

    // Invariant: left - 1 exists, right does not
    while left < right {
        let mid = left + (right - left) / 2;
        if exists(mid).await {
            left = mid + 1;
        } else {
            right = mid;
        }
    }

    left - 1
}

/// Number of posts in `channel` on `date`
pub async fn count<S: PageStore>(store: &S, channel: &Channel, date: BucketDate) -> u64 {
    let mut probes = 0_u32;
    let total = search_count(|index| {
        probes += 1;
        probe::exists(store, channel, date, index)
    })
    .await;

    tracing::debug!("{channel} has {total} posts on {date} ({probes} probes)");
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;
    use std::cell::Cell;

    /// Run the search against a channel of `n` posts, returning (count, probes)
    fn run(n: u64) -> (u64, usize) {
        let calls = Cell::new(0_usize);
        let total = tokio_test::block_on(search_count(|i| {
            calls.set(calls.get() + 1);
            async move { i <= n }
        }));
        (total, calls.get())
    }

    #[test]
    fn test_empty_channel_uses_one_probe() {
        assert_eq!(run(0), (0, 1));
    }

    #[test]
    fn test_exact_counts() {
        for n in [1, 2, 3, 15, 16, 17, 31, 32, 33, 100, 1000, 4097] {
            assert_eq!(run(n).0, n, "count for {n}");
        }
    }

    #[test]
    fn test_guess_boundary() {
        let mut probed = Vec::new();
        let total = tokio_test::block_on(search_count(|i| {
            probed.push(i);
            async move { i <= 16 }
        }));
        assert_eq!(total, 16);
        // 1, the guess, one doubling, then bisection of [17, 32)
        assert_eq!(&probed[..3], &[1, 16, 32]);
        assert!(probed[3..].iter().all(|&i| (17..32).contains(&i)));
    }

    #[test]
    fn test_probes_grow_logarithmically() {
        for n in [10_u64, 1_000, 100_000, 10_000_000] {
            let (_, probes) = run(n);
            let bound = 2 * (64 - n.leading_zeros()) as usize + 4;
            assert!(probes <= bound, "{probes} probes for n = {n}");
        }
    }

    #[tokio::test]
    async fn test_count_against_store() {
        let date = BucketDate::new(1, 2).unwrap();
        let store = MemoryStore::new(date);
        let channel = Channel::named("news");
        store.seed_posts(&channel, 21);

        assert_eq!(count(&store, &channel, date).await, 21);
        assert_eq!(count(&store, &Channel::global(), date).await, 0);
    }

    #[tokio::test]
    async fn test_unreadable_guess_truncates_count() {
        let date = BucketDate::new(1, 2).unwrap();
        let store = MemoryStore::new(date);
        let channel = Channel::global();
        store.seed_posts(&channel, 20);
        store.fail("rnwpost-01-02-16");

        assert_eq!(count(&store, &channel, date).await, 15);
    }
}
