#[cfg(feature = "qp-trie")]
use omath_expr::symbols::TrieSymbolMap;
use omath_expr::symbols::{HashSymbolMap, SymbolMap, MATH_SYMBOLS};
use omath_expr::{LexemeKind, ParseProperties, Tokenizer};
use rand::distributions::{Alphanumeric, Slice};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::WeightedIndex;

/// A reference map that scans every symbol
struct LinearSymbolMap(Vec<(&'static str, LexemeKind)>);

impl SymbolMap for LinearSymbolMap {
    fn longest_symbol(&self, inp: &str) -> Option<(usize, LexemeKind)> {
        self.0
            .iter()
            .filter(|(symbol, _)| !symbol.is_empty() && inp.starts_with(symbol))
            .max_by_key(|(symbol, _)| symbol.len())
            .map(|&(symbol, kind)| (symbol.len(), kind))
    }
}

fn random_string(rng: &mut impl Rng) -> String {
    let symbol = Slice::new(&MATH_SYMBOLS).unwrap();
    let digits = Slice::new(&['0', '1', '7', '.']).unwrap();
    let choice = WeightedIndex::new([1, 2, 2, 3]).unwrap();

    let mut res = String::new();
    for _ in 0..30 {
        match rng.sample(&choice) {
            0 => res.push(' '),
            1 => res.push(rng.sample(Alphanumeric).into()),
            2 => res.push(*rng.sample(&digits)),
            3 => res.push_str(rng.sample(&symbol).0),
            _ => unreachable!(),
        }
    }
    res
}

macro_rules! make_test {
    ($name:ident, $struct:ident, $factory:ident) => {
        mod $name {
            use super::*;

            #[test]
            fn random_symbols() {
                let props = ParseProperties::standard();
                let linear_symbols = LinearSymbolMap(MATH_SYMBOLS.to_vec());
                let ref_symbols = $struct::$factory(MATH_SYMBOLS);

                let mut rng = StdRng::from_seed([0; 32]);
                for _ in 0..50 {
                    let string = random_string(&mut rng);
                    let mut linear = Tokenizer::with_symbols(&string, &linear_symbols, props);
                    let mut other = Tokenizer::with_symbols(&string, &ref_symbols, props);
                    loop {
                        match (linear.next(), other.next()) {
                            (Some(left), Some(right)) => assert_eq!(left, right),
                            (Some(left), None) => panic!("test missing {left:?}"),
                            (None, Some(right)) => panic!("linear missing {right:?}"),
                            (None, None) => break,
                        }
                    }
                }
            }
        }
    };
}

make_test! {hash, HashSymbolMap, from_iter}
#[cfg(feature = "qp-trie")]
make_test! {qptrie, TrieSymbolMap, from_iter}

#[test]
fn tokens_cover_input() {
    let props = ParseProperties::standard();
    let mut rng = StdRng::from_seed([1; 32]);
    for _ in 0..50 {
        let string = random_string(&mut rng);
        let rebuilt: String = Tokenizer::new(&string, props)
            .map(|token| token.to_string())
            .collect();
        let expected: String = string.split_whitespace().collect();
        assert_eq!(rebuilt, expected);
    }
}
