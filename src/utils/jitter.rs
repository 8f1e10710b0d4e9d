// src/utils/jitter.rs
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;

/// Uniform delay in whole seconds between `min_secs` and `max_secs`, both inclusive.
/// Bounds given in the wrong order are swapped rather than rejected.
pub fn random_delay(min_secs: u64, max_secs: u64) -> Duration {
    let (lo, hi) = if min_secs <= max_secs {
        (min_secs, max_secs)
    } else {
        (max_secs, min_secs)
    };
    Duration::from_secs(rand::thread_rng().gen_range(lo..=hi))
}

pub fn pick_user_agent(agents: &[String]) -> Option<&str> {
    agents.choose(&mut rand::thread_rng()).map(String::as_str)
}
