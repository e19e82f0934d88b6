use lazy_static::lazy_static;
use omath_expr::symbols::MATH_SYMBOLS;
use rand::distributions::{Alphanumeric, Slice};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::WeightedIndex;

pub const EXAMPLES: [&str; 3] = [
    "sin(x)^2 + cos(x)^2 = 1",
    "(-b + sqrt(b^2 - 4*a*c)) / (2*a)",
    "root(abs(x - 3), 3) * exp(-x^2 / 2) / sqrt(2 * pi)",
];

fn random_string(rng: &mut impl Rng) -> String {
    let symbol = Slice::new(&MATH_SYMBOLS).unwrap();
    let choice = WeightedIndex::new([1, 1, 3]).unwrap();

    let mut res = String::new();
    for _ in 0..30 {
        match rng.sample(&choice) {
            0 => res.push(' '),
            1 => res.push(rng.sample(Alphanumeric).into()),
            2 => res.push_str(rng.sample(&symbol).0),
            _ => unreachable!(),
        }
    }
    res
}

lazy_static! {
    pub static ref RANDOM_EXAMPLES: [String; 30] = {
        let mut rng = StdRng::from_seed([0; 32]);
        [(); 30].map(|_| random_string(&mut rng))
    };
}
