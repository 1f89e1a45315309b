//! Bounded Fibonacci sequence generator.
//!
//! A request is validated once into a [`SequenceRequest`]; generation from a
//! validated request cannot fail. Terms are `BigUint` because the sequence
//! leaves `u64` range after 94 terms.

use std::fmt;
use std::num::IntErrorKind;

use num_bigint::BigUint;

use crate::error::{FibServeError, Result};

/// Largest count accepted by the generator.
pub const MAX_COUNT: i64 = 1000;

const NEGATIVE: &str = "n must be non-negative";
const TOO_LARGE: &str = "n must be <= 1000 to prevent excessive computation";

/// A validated term count in `0..=MAX_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceRequest {
    count: usize,
}

impl SequenceRequest {
    /// Range-check `n`.
    pub fn new(n: i64) -> Result<Self> {
        if n < 0 {
            return Err(FibServeError::InvalidArgument(NEGATIVE));
        }
        if n > MAX_COUNT {
            return Err(FibServeError::InvalidArgument(TOO_LARGE));
        }
        let count = usize::try_from(n).map_err(|_| FibServeError::InvalidArgument(TOO_LARGE))?;
        Ok(Self { count })
    }

    /// Parse a raw query value such as `" 42"` or `"+7"`.
    ///
    /// Text that is not an integer is `MalformedParameter`; an integer too big
    /// for `i64` is still an integer, so it fails the range check instead.
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().parse::<i64>() {
            Ok(n) => Self::new(n),
            Err(e) => match e.kind() {
                IntErrorKind::PosOverflow => Err(FibServeError::InvalidArgument(TOO_LARGE)),
                IntErrorKind::NegOverflow => Err(FibServeError::InvalidArgument(NEGATIVE)),
                _ => Err(FibServeError::MalformedParameter { raw: raw.to_string() }),
            },
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Iteratively build the first `count` terms: 0, 1, 1, 2, 3, ...
    pub fn generate(&self) -> Sequence {
        let mut terms: Vec<BigUint> = Vec::with_capacity(self.count);
        for i in 0..self.count {
            let next = match i {
                0 => BigUint::from(0u8),
                1 => BigUint::from(1u8),
                _ => &terms[i - 1] + &terms[i - 2],
            };
            terms.push(next);
        }
        Sequence(terms)
    }
}

/// Return the first `n` Fibonacci numbers.
pub fn generate(n: i64) -> Result<Sequence> {
    Ok(SequenceRequest::new(n)?.generate())
}

/// Ordered Fibonacci terms. Displays as `"0, 1, 1, 2"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sequence(Vec<BigUint>);

impl Sequence {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[BigUint] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<BigUint> {
        self.0
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{term}")?;
        }
        Ok(())
    }
}
