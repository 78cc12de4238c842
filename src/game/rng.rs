use rand::Rng;

/// Mersenne prime 2^31 - 1.
pub const MODULUS: i64 = 2_147_483_647;
const MULTIPLIER: i64 = 16_807;

/// Park-Miller "minimal standard" generator.
///
/// Every value is a pure function of the seed and the number of values drawn before it, so
/// two matches started from the same seed and fed the same actions evolve identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRng {
    value: i64,
}

impl SeededRng {
    /// Seeds the generator. The recurrence is stuck at zero, so seeds that reduce to zero or
    /// below are shifted back into `1..MODULUS`.
    pub fn new(seed: i64) -> Self {
        let mut value = seed % MODULUS;
        if value <= 0 {
            value += MODULUS - 1;
        }
        // Only `-(MODULUS - 1)` lands here after the shift.
        if value == 0 {
            value = MODULUS - 1;
        }
        Self { value }
    }

    /// Returns the next float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.value = (self.value * MULTIPLIER) % MODULUS;
        (self.value - 1) as f64 / (MODULUS - 1) as f64
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        (self.next_f64() * len as f64).floor() as usize
    }
}

/// Picks a fresh seed for a new match.
pub fn generate_seed() -> i64 {
    rand::thread_rng().gen_range(1..MODULUS)
}

/// Removes up to `amount` random elements from `cards`, in draw order.
///
/// Drawing from an exhausted source is not an error: fewer elements are returned.
pub fn draw<T>(cards: &mut Vec<T>, amount: usize, rng: &mut SeededRng) -> Vec<T> {
    let mut drawn = Vec::with_capacity(amount.min(cards.len()));
    for _ in 0..amount {
        if cards.is_empty() {
            break;
        }
        let index = rng.index(cards.len());
        drawn.push(cards.remove(index));
    }
    drawn
}
