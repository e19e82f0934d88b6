use super::SymbolMap;
use crate::token::LexemeKind;
use qp_trie::Trie;
use std::borrow::Borrow;

#[derive(Debug, PartialEq, Eq, Clone)]
struct Key<K>(K);

impl<K> Borrow<[u8]> for Key<K>
where
    K: Borrow<str>,
{
    fn borrow(&self) -> &[u8] {
        self.0.borrow().as_bytes()
    }
}

/// A symbol map backed by a qp-trie
///
/// This is the default map and requires the `qp-trie` feature (enabled by default). Lookups walk
/// the trie once, taking `O(longest_symbol)`.
///
/// # Example
/// ```
/// use omath_expr::symbols::{TrieSymbolMap, MATH_SYMBOLS};
///
/// let symbols = TrieSymbolMap::from_iter(MATH_SYMBOLS);
/// ```
#[derive(Debug, Clone)]
pub struct TrieSymbolMap<K: Clone>(Trie<Key<K>, LexemeKind>);

impl<K> FromIterator<(K, LexemeKind)> for TrieSymbolMap<K>
where
    K: Borrow<str> + Clone,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, LexemeKind)>,
    {
        TrieSymbolMap(
            iter.into_iter()
                .filter(|(symbol, _)| !symbol.borrow().is_empty())
                .map(|(symbol, kind)| (Key(symbol), kind))
                .collect(),
        )
    }
}

impl<K> SymbolMap for TrieSymbolMap<K>
where
    K: Borrow<str> + Clone,
{
    fn longest_symbol(&self, inp: &str) -> Option<(usize, LexemeKind)> {
        let bytes = inp.as_bytes();
        let empty: &[u8] = &[];
        let mut subtrie = self.0.subtrie(empty);
        let mut found = None;
        for len in 1..=bytes.len() {
            let prefix = &bytes[..len];
            subtrie = subtrie.subtrie(prefix);
            if subtrie.is_empty() {
                break;
            }
            // symbols are valid str keys, so a match always ends on a char boundary
            if let Some(&kind) = subtrie.get(prefix) {
                found = Some((len, kind));
            }
        }
        found
    }
}
