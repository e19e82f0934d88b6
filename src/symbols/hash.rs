use super::SymbolMap;
use crate::token::LexemeKind;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

#[cfg(feature = "fnv")]
type DefaultState = fnv::FnvBuildHasher;
#[cfg(not(feature = "fnv"))]
type DefaultState = std::collections::hash_map::RandomState;

/// A symbol map with one hash map per symbol length
///
/// Lookups try each length from the longest known symbol down, so they take
/// `O(longest_symbol)` hashes. This is the default map when the `qp-trie` feature is disabled.
///
/// # Example
/// ```
/// use omath_expr::symbols::{HashSymbolMap, MATH_SYMBOLS};
///
/// let symbols = HashSymbolMap::from_iter(MATH_SYMBOLS);
/// ```
#[derive(Debug, Clone)]
pub struct HashSymbolMap<K, S = DefaultState> {
    by_len: Box<[HashMap<K, LexemeKind, S>]>,
}

impl<K, S> HashSymbolMap<K, S>
where
    K: Borrow<str> + Hash + Eq,
    S: BuildHasher + Default,
{
    /// Create from symbol entries with any hasher
    ///
    /// Later entries replace earlier ones with the same text, and empty symbols are dropped.
    pub fn from_iter_hasher<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = (K, LexemeKind)>,
    {
        let mut by_len: Vec<HashMap<K, LexemeKind, S>> = Vec::new();
        for (symbol, kind) in iter {
            let len = symbol.borrow().len();
            if len == 0 {
                continue;
            }
            by_len.extend((by_len.len()..=len).map(|_| HashMap::default()));
            by_len[len].insert(symbol, kind);
        }
        HashSymbolMap {
            by_len: by_len.into(),
        }
    }
}

impl<K> FromIterator<(K, LexemeKind)> for HashSymbolMap<K>
where
    K: Borrow<str> + Hash + Eq,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, LexemeKind)>,
    {
        Self::from_iter_hasher(iter)
    }
}

impl<K, S> SymbolMap for HashSymbolMap<K, S>
where
    K: Borrow<str> + Hash + Eq,
    S: BuildHasher,
{
    fn longest_symbol(&self, inp: &str) -> Option<(usize, LexemeKind)> {
        let longest = inp.len().min(self.by_len.len().saturating_sub(1));
        (1..=longest)
            .rev()
            .filter(|&len| inp.is_char_boundary(len))
            .find_map(|len| self.by_len[len].get(&inp[..len]).map(|&kind| (len, kind)))
    }
}
