/*!

Frequency table models for the arithmetic coder.

`FrequencyTable` keeps one count per symbol and lazily derives the
cumulative-sum array the coder queries; any mutation drops the derived
array. `Checked` layers assertion-grade validation over any model for use
in tests.

*/

use std::cell::OnceCell;

use crate::error::{Error, Result};

use super::{Border, Frequency, Model, Symbol};

/// A table of symbol frequencies with cached cumulative sums.
pub struct FrequencyTable {
    /// main table: symbol -> frequency
    frequencies: Vec<Frequency>,
    /// sum of all frequencies, maintained eagerly
    total: Border,
    /// cumulative sums of length N+1, derived on first query
    cumulative: OnceCell<Vec<Border>>,
}

impl FrequencyTable {
    /// Creates a table from a vector of per-symbol counts. At least one
    /// symbol is required; counts may all be zero.
    pub fn new(frequencies: Vec<Frequency>) -> Result<FrequencyTable> {
        if frequencies.is_empty() {
            return Err(Error::EmptyModel);
        }
        let total = frequencies.iter().map(|&f| f as Border).sum();
        Ok(FrequencyTable {
            frequencies,
            total,
            cumulative: OnceCell::new(),
        })
    }

    /// Creates a table with every frequency set to one.
    pub fn flat(num_symbols: usize) -> Result<FrequencyTable> {
        FrequencyTable::new(vec![1; num_symbols])
    }

    fn check_symbol(&self, symbol: Symbol) -> Result<()> {
        if symbol < self.frequencies.len() {
            Ok(())
        } else {
            Err(Error::SymbolOutOfRange(symbol))
        }
    }

    fn cumulative(&self) -> &[Border] {
        self.cumulative.get_or_init(|| {
            let mut cumul = Vec::with_capacity(self.frequencies.len() + 1);
            let mut sum: Border = 0;
            cumul.push(0);
            for &freq in self.frequencies.iter() {
                sum += freq as Border;
                cumul.push(sum);
            }
            debug_assert_eq!(sum, self.total);
            cumul
        })
    }
}

impl Model for FrequencyTable {
    fn symbol_count(&self) -> usize {
        self.frequencies.len()
    }

    fn get(&self, symbol: Symbol) -> Result<Frequency> {
        self.check_symbol(symbol)?;
        Ok(self.frequencies[symbol])
    }

    fn set(&mut self, symbol: Symbol, freq: Frequency) -> Result<()> {
        self.check_symbol(symbol)?;
        let removed = self.frequencies[symbol] as Border;
        self.total = self.total - removed + freq as Border;
        self.frequencies[symbol] = freq;
        self.cumulative.take();
        Ok(())
    }

    fn increment(&mut self, symbol: Symbol) -> Result<()> {
        self.check_symbol(symbol)?;
        self.total += 1;
        self.frequencies[symbol] += 1;
        self.cumulative.take();
        Ok(())
    }

    fn total(&self) -> Border {
        self.total
    }

    fn low(&self, symbol: Symbol) -> Result<Border> {
        self.check_symbol(symbol)?;
        Ok(self.cumulative()[symbol])
    }

    fn high(&self, symbol: Symbol) -> Result<Border> {
        self.check_symbol(symbol)?;
        Ok(self.cumulative()[symbol + 1])
    }

    fn symbol_for(&self, value: Border) -> Symbol {
        // largest symbol whose lower bound does not exceed the value;
        // zero-frequency runs share one bound and are stepped over
        let cumul = self.cumulative();
        let mut start = 0;
        let mut end = self.frequencies.len();
        while end - start > 1 {
            let middle = (start + end) >> 1;
            if cumul[middle] > value {
                end = middle;
            } else {
                start = middle;
            }
        }
        start
    }
}

/// A validating wrapper around any model.
///
/// Every query is forwarded and its result checked against the cumulative
/// invariants; a violation panics. Meant for pinning down a misbehaving
/// model in tests, not for the coding hot path.
pub struct Checked<M> {
    inner: M,
}

impl<M: Model> Checked<M> {
    /// Wraps a model.
    pub fn new(inner: M) -> Checked<M> {
        Checked { inner }
    }

    /// Unwraps the model.
    pub fn into_inner(self) -> M {
        self.inner
    }

    fn checked_bounds(&self, symbol: Symbol) -> Result<(Border, Border)> {
        let low = self.inner.low(symbol)?;
        let high = self.inner.high(symbol)?;
        assert!(
            low <= high && high <= self.inner.total(),
            "cumulative bounds of symbol {} out of range: [{}, {}) of {}",
            symbol,
            low,
            high,
            self.inner.total()
        );
        Ok((low, high))
    }
}

impl<M: Model> Model for Checked<M> {
    fn symbol_count(&self) -> usize {
        let count = self.inner.symbol_count();
        assert!(count > 0, "model reports no symbols");
        count
    }

    fn get(&self, symbol: Symbol) -> Result<Frequency> {
        self.inner.get(symbol)
    }

    fn set(&mut self, symbol: Symbol, freq: Frequency) -> Result<()> {
        self.inner.set(symbol, freq)
    }

    fn increment(&mut self, symbol: Symbol) -> Result<()> {
        self.inner.increment(symbol)
    }

    fn total(&self) -> Border {
        self.inner.total()
    }

    fn low(&self, symbol: Symbol) -> Result<Border> {
        self.checked_bounds(symbol).map(|(low, _)| low)
    }

    fn high(&self, symbol: Symbol) -> Result<Border> {
        self.checked_bounds(symbol).map(|(_, high)| high)
    }

    fn symbol_for(&self, value: Border) -> Symbol {
        let symbol = self.inner.symbol_for(value);
        if value < self.inner.total() {
            match self.checked_bounds(symbol) {
                Ok((low, high)) => assert!(
                    low <= value && value < high,
                    "symbol {} does not own value {}",
                    symbol,
                    value
                ),
                Err(_) => panic!("selected symbol {} is out of range", symbol),
            }
        }
        symbol
    }
}
