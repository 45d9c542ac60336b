use std::panic;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

/// Runs `f` over `items` with at most `limit` calls in flight and returns
/// the results in input order.
///
/// Workers claim the next index from a shared atomic cursor, so a slow item
/// never holds back the others. Each worker only produces `(index, result)`
/// pairs for the indices it claimed; the pairs are put back in order once
/// every worker has finished.
pub fn bounded_map<T, R, F>(items: &[T], limit: usize, f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    if items.is_empty() {
        return Vec::new();
    }

    let workers = limit.clamp(1, items.len());
    let cursor = AtomicUsize::new(0);
    let cursor = &cursor;
    let f = &f;

    let mut indexed: Vec<(usize, R)> = thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(move |_| {
                scope.spawn(move || {
                    let mut done = Vec::new();
                    loop {
                        let idx = cursor.fetch_add(1, Ordering::Relaxed);
                        let Some(item) = items.get(idx) else { break };
                        done.push((idx, f(item)));
                    }
                    done
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap_or_else(|e| panic::resume_unwind(e)))
            .collect()
    });

    indexed.sort_unstable_by_key(|(idx, _)| *idx);
    indexed.into_iter().map(|(_, result)| result).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn keeps_input_order_when_completion_order_differs() {
        let items: Vec<u64> = (0..30).collect();
        // later items finish first
        let out = bounded_map(&items, 8, |n| {
            thread::sleep(Duration::from_millis(30 - n));
            n * 10
        });
        assert_eq!(out, items.iter().map(|n| n * 10).collect::<Vec<_>>());
    }

    #[test]
    fn never_exceeds_limit() {
        let in_flight = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);
        let items: Vec<usize> = (0..40).collect();

        bounded_map(&items, 5, |_| {
            let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(5));
            in_flight.fetch_sub(1, Ordering::SeqCst);
        });

        let peak = peak.load(Ordering::SeqCst);
        assert!(peak <= 5, "peak concurrency was {}", peak);
        assert!(peak >= 1);
    }

    #[test]
    fn every_item_is_processed_once() {
        let calls = AtomicUsize::new(0);
        let items = vec!["a"; 17];
        let out = bounded_map(&items, 12, |s| {
            calls.fetch_add(1, Ordering::SeqCst);
            s.len()
        });
        assert_eq!(out.len(), 17);
        assert_eq!(calls.load(Ordering::SeqCst), 17);
    }

    #[test]
    fn empty_input_spawns_nothing() {
        let out: Vec<u8> = bounded_map(&[] as &[u8], 4, |b| *b);
        assert!(out.is_empty());
    }
}
