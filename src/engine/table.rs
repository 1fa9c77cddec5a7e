use crate::engine::huffman::Codeword;
use crate::engine::symbols::Symbol;
use crate::error::{CodecError, Result};
use crate::protocol::constants::TABLE_BUCKETS;

/// Symbol -> count, as produced by frequency analysis and stored in the header.
pub type FrequencyTable = SymbolTable<u64>;

/// Symbol -> codeword, derived from a built tree.
pub type EncodingMap = SymbolTable<Codeword>;

/// Chained hash table keyed by [`Symbol`].
///
/// Iteration walks the buckets in order and each chain front to back, so the
/// key order depends only on which keys were inserted and in what order.
/// Headers are written in this order.
#[derive(Debug, Clone)]
pub struct SymbolTable<V> {
    buckets: Vec<Vec<(Symbol, V)>>,
    len: usize,
}

impl<V> SymbolTable<V> {
    pub fn new() -> Self {
        Self {
            buckets: (0..TABLE_BUCKETS).map(|_| Vec::new()).collect(),
            len: 0,
        }
    }

    /// Inserts or overwrites. An overwritten key keeps its position.
    pub fn put(&mut self, symbol: Symbol, value: V) {
        let chain = &mut self.buckets[bucket_index(symbol)];
        match chain.iter_mut().find(|(key, _)| *key == symbol) {
            Some(slot) => slot.1 = value,
            None => {
                chain.push((symbol, value));
                self.len += 1;
            }
        }
    }

    pub fn get(&self, symbol: Symbol) -> Result<&V> {
        self.buckets[bucket_index(symbol)]
            .iter()
            .find(|(key, _)| *key == symbol)
            .map(|(_, value)| value)
            .ok_or(CodecError::KeyNotFound(symbol))
    }

    pub fn get_or_insert_with(&mut self, symbol: Symbol, default: impl FnOnce() -> V) -> &mut V {
        let index = bucket_index(symbol);
        let chain = &mut self.buckets[index];
        let position = match chain.iter().position(|(key, _)| *key == symbol) {
            Some(position) => position,
            None => {
                chain.push((symbol, default()));
                self.len += 1;
                chain.len() - 1
            }
        };
        &mut chain[position].1
    }

    pub fn contains_key(&self, symbol: Symbol) -> bool {
        self.buckets[bucket_index(symbol)]
            .iter()
            .any(|(key, _)| *key == symbol)
    }

    pub fn keys(&self) -> Vec<Symbol> {
        self.iter().map(|(symbol, _)| symbol).collect()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &V)> {
        self.buckets
            .iter()
            .flat_map(|chain| chain.iter().map(|(key, value)| (*key, value)))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<V> Default for SymbolTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

// Content equality; two tables with the same pairs compare equal regardless
// of the order they were built in.
impl<V: PartialEq> PartialEq for SymbolTable<V> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len
            && self
                .iter()
                .all(|(symbol, value)| other.get(symbol).map_or(false, |v| v == value))
    }
}

impl<V: Eq> Eq for SymbolTable<V> {}

impl<V> FromIterator<(Symbol, V)> for SymbolTable<V> {
    fn from_iter<I: IntoIterator<Item = (Symbol, V)>>(iter: I) -> Self {
        let mut table = SymbolTable::new();
        for (symbol, value) in iter {
            table.put(symbol, value);
        }
        table
    }
}

fn bucket_index(symbol: Symbol) -> usize {
    let input = symbol.code() as u32;
    let mut hash = ((input >> 16) ^ input).wrapping_mul(0x45d9f3b);
    hash = ((hash >> 16) ^ hash).wrapping_mul(0x45d9f3b);
    hash = (hash >> 16) ^ hash;
    (hash as i32).unsigned_abs() as usize % TABLE_BUCKETS
}
