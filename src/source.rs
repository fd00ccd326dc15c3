use crate::Error;
use bitvec::prelude::*;
use rand::Rng;

/// Smallest value a default source produces (inclusive).
pub const LOW: i32 = 1;
/// Upper bound of the default value range (exclusive).
pub const HIGH: i32 = 20;

/// Something that hands out batches of candidate values for a square.
pub trait ValueSource {
    /// Used in log messages.
    const NAME: &'static str;

    fn generate(&mut self, count: usize) -> Result<Vec<i32>, Error>;
}

/************************
 *     RandomValues     *
 ************************/

/// Values drawn independently and uniformly from `low..high`. Repeats are allowed.
#[derive(Debug, Clone)]
pub struct RandomValues<R: Rng> {
    rng: R,
    low: i32,
    high: i32,
}

impl<R: Rng> RandomValues<R> {
    /// A source over the default range `1..20`.
    pub fn new(rng: R) -> RandomValues<R> {
        RandomValues {
            rng,
            low: LOW,
            high: HIGH,
        }
    }

    /// A source over `low..high`. Fails if the range is empty.
    pub fn with_range(rng: R, low: i32, high: i32) -> Result<RandomValues<R>, Error> {
        if low >= high {
            return Err(Error::InvalidInput(format!("empty value range {}..{}", low, high)));
        }
        Ok(RandomValues { rng, low, high })
    }

    /// Number of distinct values this source can produce.
    pub fn range_size(&self) -> usize {
        (self.high as i64 - self.low as i64) as usize
    }
}

impl<R: Rng> ValueSource for RandomValues<R> {
    const NAME: &'static str = "RandomValues";

    fn generate(&mut self, count: usize) -> Result<Vec<i32>, Error> {
        Ok((0..count)
            .map(|_| self.rng.random_range(self.low..self.high))
            .collect())
    }
}

/************************
 *     UniqueValues     *
 ************************/

/// Ranges up to this size are checked for repeats with a bit set; wider ones sort the batch.
const BITSET_LIMIT: usize = 1 << 16;

/// Like `RandomValues`, but every value in a batch is distinct. A batch containing any repeat is
/// thrown away and drawn again from scratch.
#[derive(Debug, Clone)]
pub struct UniqueValues<R: Rng> {
    inner: RandomValues<R>,
    /// One bit per value in the range, all clear between batches. Empty for wide ranges.
    seen: BitVec,
}

impl<R: Rng> UniqueValues<R> {
    pub fn new(rng: R) -> UniqueValues<R> {
        UniqueValues::wrap(RandomValues::new(rng))
    }

    pub fn wrap(inner: RandomValues<R>) -> UniqueValues<R> {
        let range_size = inner.range_size();
        let seen = if range_size <= BITSET_LIMIT {
            bitvec![0; range_size]
        } else {
            BitVec::new()
        };
        UniqueValues { inner, seen }
    }

    fn all_distinct(&mut self, values: &[i32]) -> bool {
        if self.seen.is_empty() {
            let mut sorted = values.to_vec();
            sorted.sort_unstable();
            return sorted.windows(2).all(|pair| pair[0] != pair[1]);
        }

        let low = self.inner.low as i64;
        let index = |value: &i32| (*value as i64 - low) as usize;
        let mut marked = values.len();
        for (i, value) in values.iter().enumerate() {
            if self.seen.replace(index(value), true) {
                marked = i;
                break;
            }
        }
        for value in &values[..marked] {
            self.seen.set(index(value), false);
        }
        marked == values.len()
    }
}

impl<R: Rng> ValueSource for UniqueValues<R> {
    const NAME: &'static str = "UniqueValues";

    fn generate(&mut self, count: usize) -> Result<Vec<i32>, Error> {
        let available = self.inner.range_size();
        if count > available {
            return Err(Error::UnsatisfiableConstraint {
                requested: count,
                available,
            });
        }
        loop {
            let values = self.inner.generate(count)?;
            if self.all_distinct(&values) {
                return Ok(values);
            }
        }
    }
}
