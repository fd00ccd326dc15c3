//! Command line front end: find magic squares and print them.

use argh::FromArgs;
use magic_square::{
    par_generate, Error, Grid, GridSet, MagicSquareGenerator, RandomValues, Source, Splitter,
    SumVerifier, UniqueValues, TEXT_BOX_WIDTH,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::process;
use std::time::Instant;

/************************
 *     Main             *
 ************************/

/// magic-square: find magic squares by random search
#[derive(Debug, Clone, FromArgs)]
struct Config {
    /// side length of the square (default 3)
    #[argh(positional, default = "3")]
    size: usize,

    /// don't allow any number to appear twice
    #[argh(switch, short = 'u', long = "unique")]
    unique: bool,

    /// seed for reproducible output (default: seeded from the OS)
    #[argh(option, short = 's')]
    seed: Option<u64>,

    /// how many squares to find (default 1)
    #[argh(option, short = 'n', default = "1")]
    count: usize,

    /// number of parallel searches per square (default 1)
    #[argh(option, short = 'j', default = "1")]
    jobs: usize,

    /// give up after this many attempts (per job)
    #[argh(option, long = "max-attempts")]
    max_attempts: Option<u64>,

    /// don't log anything besides the squares
    #[argh(switch, short = 'q', long = "quiet")]
    quiet: bool,

    /// log search progress
    #[argh(switch, long = "log-attempts")]
    log_attempts: bool,

    /// log how long each search took
    #[argh(switch, long = "log-elapsed")]
    log_elapsed: bool,
}

impl Config {
    fn library_config(&self) -> magic_square::Config {
        magic_square::Config {
            max_attempts: self.max_attempts,
            log_attempts: !self.quiet && self.log_attempts,
            log_rejected: false,
            log_elapsed: !self.quiet && self.log_elapsed,
        }
    }

    fn source(&self) -> Source {
        if self.unique {
            Source::Unique
        } else {
            Source::Standard
        }
    }

    /// Each square (and each job within it) gets its own ChaCha stream.
    fn rng(&self, square: usize, job: usize) -> ChaCha20Rng {
        let mut rng = match self.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed.wrapping_add(square as u64)),
            None => ChaCha20Rng::from_os_rng(),
        };
        rng.set_stream(job as u64);
        rng
    }
}

fn find_one(config: &Config, square: usize) -> Result<Grid, Error> {
    let library_config = config.library_config();
    if config.jobs > 1 {
        return match config.source() {
            Source::Standard => par_generate(config.size, config.jobs, &library_config, |job| {
                RandomValues::new(config.rng(square, job))
            }),
            Source::Unique => par_generate(config.size, config.jobs, &library_config, |job| {
                UniqueValues::new(config.rng(square, job))
            }),
        };
    }

    let rng = config.rng(square, 0);
    match config.source() {
        Source::Standard => {
            let mut generator =
                MagicSquareGenerator::new(RandomValues::new(rng), Splitter, SumVerifier);
            *generator.config() = library_config;
            generator.generate(config.size)
        }
        Source::Unique => {
            let mut generator =
                MagicSquareGenerator::new(UniqueValues::new(rng), Splitter, SumVerifier);
            *generator.config() = library_config;
            generator.generate(config.size)
        }
    }
}

fn main() {
    let config = argh::from_env::<Config>();

    let start_time = Instant::now();
    let mut grids = Vec::new();
    for square in 0..config.count {
        match find_one(&config, square) {
            Ok(grid) => grids.push(grid),
            Err(err) => {
                eprintln!("{}", err);
                process::exit(1);
            }
        }
    }
    if !config.quiet {
        eprintln!("time: {}ms", start_time.elapsed().as_millis());
    }

    if grids.len() == 1 {
        print!("{}", grids[0]);
    } else {
        let width = termsize::get()
            .map(|size| size.cols as usize)
            .unwrap_or(TEXT_BOX_WIDTH);
        print!("{}", GridSet(grids).render(width));
    }
}
