use crate::{Config, Error, Grid, MagicSquareGenerator, Splitter, SumVerifier, ValueSource};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};

/// Run `workers` independent searches on the rayon thread pool and return whichever square is
/// found first. The others stop at their next attempt.
///
/// Each worker gets its own value source from `make_source(worker_index)`, so nothing random is
/// shared between threads. Give each worker a differently seeded source, or they'll all search
/// the same sequence.
///
/// `config.max_attempts` applies to each worker separately.
pub fn par_generate<V, F>(
    size: usize,
    workers: usize,
    config: &Config,
    make_source: F,
) -> Result<Grid, Error>
where
    V: ValueSource,
    F: Fn(usize) -> V + Sync,
{
    if workers == 0 {
        return Err(Error::InvalidInput("need at least one worker".to_owned()));
    }

    let found = AtomicBool::new(false);
    let outcome = (0..workers).into_par_iter().find_map_any(|worker| {
        let mut generator = MagicSquareGenerator::new(make_source(worker), Splitter, SumVerifier);
        *generator.config() = config.clone();
        match generator.search(size, Some(&found)) {
            Ok(Some((grid, attempts))) => {
                if config.log_attempts {
                    eprintln!("Worker {} won after {} attempts", worker, attempts);
                }
                Some(Ok(grid))
            }
            Ok(None) | Err(Error::AttemptsExhausted(_)) => None,
            Err(err) => {
                found.store(true, Ordering::Relaxed);
                Some(Err(err))
            }
        }
    });

    match outcome {
        Some(result) => result,
        // Every worker hit its ceiling.
        None => Err(Error::AttemptsExhausted(total_ceiling(config, workers))),
    }
}

/// Attempts made in total when every worker runs out.
fn total_ceiling(config: &Config, workers: usize) -> u64 {
    config
        .max_attempts
        .unwrap_or(0)
        .saturating_mul(workers as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LineExtractor, RandomValues, SquareValidator, UniqueValues};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn seeded(worker: usize) -> RandomValues<ChaCha20Rng> {
        let mut rng = ChaCha20Rng::seed_from_u64(1234);
        rng.set_stream(worker as u64);
        RandomValues::new(rng)
    }

    #[test]
    fn parallel_finds_a_square() {
        let grid = par_generate(2, 4, &Config::default(), seeded).unwrap();
        assert_eq!(grid.size(), 2);
        assert!(SumVerifier.verify(&Splitter.split(&grid).unwrap()));
    }

    #[test]
    fn parallel_needs_workers() {
        assert!(matches!(
            par_generate(2, 0, &Config::default(), seeded),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn parallel_reports_errors() {
        assert!(matches!(
            par_generate(0, 3, &Config::default(), seeded),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn parallel_ceiling() {
        let config = Config {
            max_attempts: Some(10),
            ..Config::default()
        };
        // Distinct values never make a 2x2 square.
        let result = par_generate(2, 3, &config, |worker| UniqueValues::wrap(seeded(worker)));
        assert_eq!(result, Err(Error::AttemptsExhausted(30)));
    }

    #[test]
    fn total_ceiling_saturates() {
        let config = Config {
            max_attempts: Some(u64::MAX / 2),
            ..Config::default()
        };
        assert_eq!(total_ceiling(&config, 3), u64::MAX);
        assert_eq!(total_ceiling(&Config::default(), 3), 0);
    }
}
