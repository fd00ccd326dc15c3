//! Magic squares, found the hard way.
//!
//! A magic square is an NxN grid of numbers where every row, every column, and both diagonals add
//! up to the same total. There are clever ways to build them. This crate doesn't use any of them:
//! it fills a grid with random numbers, checks whether it happens to be magic, and tries again if
//! it isn't. That's only practical for tiny squares (3x3 takes a few hundred million tries), but
//! it's a nice exercise in gluing small parts together.
//!
//! The search is made of three swappable parts:
//!
//! - a [`ValueSource`] that produces the numbers for each attempt,
//! - a [`LineExtractor`] that breaks a grid into its rows, columns, and diagonals,
//! - a [`SquareValidator`] that decides whether those lines all share a sum.
//!
//! [`MagicSquareGenerator`] runs the loop.
//!
//! ## Generating a square
//!
//! The quickest way in is `generate_square`, which uses values `1..=19` from the thread-local
//! random number generator:
//!
//! ```
//! let square = magic_square::generate_square(2).unwrap();
//! assert_eq!(square.size(), 2);
//! ```
//!
//! (A 2x2 square is only magic if all four numbers are equal, so this one's found quickly.)
//!
//! To control the parts, build a generator yourself. Seeding the random number generator makes
//! the result reproducible:
//!
//! ```
//! use magic_square::{MagicSquareGenerator, RandomValues, Splitter, SumVerifier};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let source = RandomValues::new(ChaCha20Rng::seed_from_u64(42));
//! let mut generator = MagicSquareGenerator::new(source, Splitter, SumVerifier);
//! generator.config().max_attempts = Some(1_000_000);
//!
//! let square = generator.generate(2).unwrap();
//! println!("{}", square);
//! ```
//!
//! Use `UniqueValues` instead of `RandomValues` to require that no number appears twice. Be
//! careful with it: no 2x2 square has distinct values, so without `max_attempts` that search never
//! ends.
//!
//! ## Termination
//!
//! By default the search has no attempt limit and will happily spin forever on a size it can't
//! realistically solve. Set `Config::max_attempts` if `size` comes from somewhere you don't
//! control.

mod grid;
mod lines;
mod parallel;
mod source;
mod verify;

pub use grid::{Grid, GridSet, TEXT_BOX_WIDTH};
pub use lines::{Line, LineExtractor, LineSet, Splitter};
pub use parallel::par_generate;
pub use source::{RandomValues, UniqueValues, ValueSource, HIGH, LOW};
pub use verify::{SquareValidator, SumVerifier};

use rand::Rng;
use std::error;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// How often `log_attempts` reports progress.
const LOG_INTERVAL: u64 = 10_000_000;

/************************
 *     Errors           *
 ************************/

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A grid, size, or range that can't be worked with.
    InvalidInput(String),
    /// Asked for more distinct values than the value range holds.
    UnsatisfiableConstraint { requested: usize, available: usize },
    /// Gave up after this many attempts. Only happens when `Config::max_attempts` is set.
    AttemptsExhausted(u64),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Error::UnsatisfiableConstraint {
                requested,
                available,
            } => write!(
                f,
                "Can't draw {} distinct values from a range of only {}",
                requested, available
            ),
            Error::AttemptsExhausted(attempts) => {
                write!(f, "No magic square found after {} attempts", attempts)
            }
        }
    }
}

impl error::Error for Error {}

/************************
 *     Generator        *
 ************************/

/// Brute-force magic square search: generate values, lay them out, split into lines, verify,
/// repeat.
pub struct MagicSquareGenerator<V: ValueSource, E: LineExtractor, X: SquareValidator> {
    source: V,
    extractor: E,
    validator: X,
    config: Config,
}

impl<V: ValueSource, E: LineExtractor, X: SquareValidator> MagicSquareGenerator<V, E, X> {
    pub fn new(source: V, extractor: E, validator: X) -> MagicSquareGenerator<V, E, X> {
        MagicSquareGenerator {
            source,
            extractor,
            validator,
            config: Config::default(),
        }
    }

    pub fn config(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Search until a `size`x`size` magic square turns up.
    ///
    /// Unless `max_attempts` is set, this doesn't return until it succeeds, which for `size >= 4`
    /// is effectively never.
    pub fn generate(&mut self, size: usize) -> Result<Grid, Error> {
        self.generate_with_stats(size).map(|(grid, _)| grid)
    }

    /// Like `generate`, but also says how many attempts it took.
    pub fn generate_with_stats(&mut self, size: usize) -> Result<(Grid, u64), Error> {
        match self.search(size, None)? {
            Some(found) => Ok(found),
            // Without a stop flag nothing can cancel the search.
            None => unreachable!("search cancelled without a stop flag"),
        }
    }

    /// The retry loop. Returns `Ok(None)` if `stop` was raised by someone else first.
    pub(crate) fn search(
        &mut self,
        size: usize,
        stop: Option<&AtomicBool>,
    ) -> Result<Option<(Grid, u64)>, Error> {
        if size == 0 {
            return Err(Error::InvalidInput("size must be at least 1".to_owned()));
        }
        let count = size
            .checked_mul(size)
            .ok_or_else(|| Error::InvalidInput(format!("size {} is too large", size)))?;

        if self.config.log_attempts {
            eprintln!(
                "Searching for a {}x{} square ({}, {}, {})",
                size,
                size,
                V::NAME,
                E::NAME,
                X::NAME
            );
        }

        let start_time = Instant::now();
        let mut attempts: u64 = 0;
        loop {
            if stop.is_some_and(|stop| stop.load(Ordering::Relaxed)) {
                return Ok(None);
            }
            if let Some(max_attempts) = self.config.max_attempts {
                if attempts >= max_attempts {
                    return Err(Error::AttemptsExhausted(attempts));
                }
            }
            attempts += 1;

            let values = self.source.generate(count)?;
            if values.len() != count {
                return Err(Error::InvalidInput(format!(
                    "{} produced {} values, expected {}",
                    V::NAME,
                    values.len(),
                    count
                )));
            }
            let grid = Grid::from_values(size, values);
            let lines = self.extractor.split(&grid)?;
            if self.validator.verify(&lines) {
                if let Some(stop) = stop {
                    stop.store(true, Ordering::Relaxed);
                }
                if self.config.log_attempts {
                    eprintln!("Found after {} attempts", attempts);
                }
                if self.config.log_elapsed {
                    eprintln!("  elapsed: {:5?}ms", start_time.elapsed().as_millis());
                }
                return Ok(Some((grid, attempts)));
            }

            if self.config.log_rejected {
                eprint!("Rejected attempt {}:\n{}", attempts, grid);
            }
            if self.config.log_attempts && attempts % LOG_INTERVAL == 0 {
                eprintln!("Attempts = {:12}", attempts);
                if self.config.log_elapsed {
                    eprintln!("  elapsed: {:5?}ms", start_time.elapsed().as_millis());
                }
            }
        }
    }
}

/************************
 *     Entry points     *
 ************************/

/// Which value source the convenience entry points use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Source {
    /// `RandomValues`: values may repeat.
    #[default]
    Standard,
    /// `UniqueValues`: all values distinct.
    Unique,
}

impl FromStr for Source {
    type Err = Error;

    fn from_str(word: &str) -> Result<Source, Error> {
        match word {
            "standard" => Ok(Source::Standard),
            "unique" => Ok(Source::Unique),
            _ => Err(Error::InvalidInput(format!(
                "unknown value source '{}' (expected 'standard' or 'unique')",
                word
            ))),
        }
    }
}

/// Find a `size`x`size` magic square of values in `1..=19`, using the thread-local random number
/// generator. May run forever for `size >= 4`.
pub fn generate_square(size: usize) -> Result<Grid, Error> {
    generate_square_with(size, Source::Standard, rand::rng())
}

/// Find a `size`x`size` magic square, choosing the value source and random number generator. The
/// line extractor and validator are always `Splitter` and `SumVerifier`.
pub fn generate_square_with<R: Rng>(size: usize, source: Source, rng: R) -> Result<Grid, Error> {
    match source {
        Source::Standard => {
            MagicSquareGenerator::new(RandomValues::new(rng), Splitter, SumVerifier).generate(size)
        }
        Source::Unique => {
            MagicSquareGenerator::new(UniqueValues::new(rng), Splitter, SumVerifier).generate(size)
        }
    }
}

/************************
 *     Config           *
 ************************/

// When running `main`, this is loaded from command line args.
// See `Config` in `main.rs`.
/// Configuration options. Set these using `MagicSquareGenerator.config()`.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Give up with `Error::AttemptsExhausted` after this many attempts. `None` searches forever.
    pub max_attempts: Option<u64>,
    /// Log the start and end of the search, and progress every ten million attempts
    pub log_attempts: bool,
    /// Log every rejected grid (this is a lot of output!)
    pub log_rejected: bool,
    /// Log how long the search has taken
    pub log_elapsed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    /// Hands out pre-written batches, in order.
    struct Scripted(std::vec::IntoIter<Vec<i32>>);

    impl ValueSource for Scripted {
        const NAME: &'static str = "Scripted";

        fn generate(&mut self, count: usize) -> Result<Vec<i32>, Error> {
            let batch = self.0.next().expect("script ran out");
            assert_eq!(batch.len(), count);
            Ok(batch)
        }
    }

    /// Always hands out the same non-magic batch.
    struct Stuck;

    impl ValueSource for Stuck {
        const NAME: &'static str = "Stuck";

        fn generate(&mut self, count: usize) -> Result<Vec<i32>, Error> {
            Ok((1..=count as i32).collect())
        }
    }

    #[test]
    fn retries_until_magic() {
        let script = vec![
            vec![1, 2, 3, 4, 5, 6, 7, 8, 9],
            vec![5, 5, 5, 5, 5, 5, 5, 5, 4],
            vec![2, 7, 6, 9, 5, 1, 4, 3, 8],
            vec![8, 1, 6, 3, 5, 7, 4, 9, 2],
        ];
        let mut generator =
            MagicSquareGenerator::new(Scripted(script.into_iter()), Splitter, SumVerifier);
        let (grid, attempts) = generator.generate_with_stats(3).unwrap();
        assert_eq!(attempts, 3);
        assert_eq!(
            grid,
            Grid::from_rows(vec![vec![2, 7, 6], vec![9, 5, 1], vec![4, 3, 8]])
        );
    }

    #[test]
    fn zero_size_is_invalid() {
        let mut generator = MagicSquareGenerator::new(Stuck, Splitter, SumVerifier);
        assert!(matches!(generator.generate(0), Err(Error::InvalidInput(_))));
        assert!(matches!(generate_square(0), Err(Error::InvalidInput(_))));
    }

    /// Hands out one value too few.
    struct Short;

    impl ValueSource for Short {
        const NAME: &'static str = "Short";

        fn generate(&mut self, count: usize) -> Result<Vec<i32>, Error> {
            Ok(vec![1; count - 1])
        }
    }

    #[test]
    fn wrong_batch_length_is_invalid() {
        let mut generator = MagicSquareGenerator::new(Short, Splitter, SumVerifier);
        generator.config().max_attempts = Some(1);
        assert_eq!(
            generator.generate(2),
            Err(Error::InvalidInput("Short produced 3 values, expected 4".to_owned()))
        );
    }

    #[test]
    fn attempt_ceiling() {
        let mut generator = MagicSquareGenerator::new(Stuck, Splitter, SumVerifier);
        generator.config().max_attempts = Some(25);
        assert_eq!(generator.generate(3), Err(Error::AttemptsExhausted(25)));
    }

    #[test]
    fn source_errors_are_not_retried() {
        let rng = ChaCha20Rng::seed_from_u64(0);
        assert_eq!(
            generate_square_with(5, Source::Unique, rng),
            Err(Error::UnsatisfiableConstraint {
                requested: 25,
                available: 19
            })
        );
    }

    #[test]
    fn size_one_is_always_magic() {
        let rng = ChaCha20Rng::seed_from_u64(0);
        let mut generator = MagicSquareGenerator::new(RandomValues::new(rng), Splitter, SumVerifier);
        let (grid, attempts) = generator.generate_with_stats(1).unwrap();
        assert_eq!(attempts, 1);
        assert_eq!(grid.size(), 1);
    }

    #[test]
    fn size_two_is_constant() {
        let rng = ChaCha20Rng::seed_from_u64(5);
        let grid = generate_square_with(2, Source::Standard, rng).unwrap();
        let values = grid.values().collect::<Vec<_>>();
        assert_eq!(values.len(), 4);
        assert!(values.iter().all(|v| *v == values[0]));
    }

    #[test]
    fn reproducible() {
        let a = generate_square_with(2, Source::Standard, ChaCha20Rng::seed_from_u64(9));
        let b = generate_square_with(2, Source::Standard, ChaCha20Rng::seed_from_u64(9));
        assert_eq!(a.unwrap(), b.unwrap());
    }

    #[test]
    fn parse_source() {
        assert_eq!("standard".parse::<Source>(), Ok(Source::Standard));
        assert_eq!("unique".parse::<Source>(), Ok(Source::Unique));
        assert!("distinct".parse::<Source>().is_err());
    }
}
