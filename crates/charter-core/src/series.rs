//! TimeSeries container for indicator output.

/// A series aligned 1:1 with an input price array.
///
/// Every slot is either a value or `None` for "not yet available"
/// (warm-up). A series never pads undefined slots with zero.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries<T> {
    values: Vec<Option<T>>,
}

impl<T> TimeSeries<T> {
    /// Creates a new empty TimeSeries.
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Creates a series of `len` undefined slots.
    pub fn undefined(len: usize) -> Self {
        let mut values = Vec::with_capacity(len);
        values.resize_with(len, || None);
        Self { values }
    }

    /// Wraps already-aligned slots.
    pub fn from_slots(values: Vec<Option<T>>) -> Self {
        Self { values }
    }

    /// Number of slots (defined or not).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if this series has no slots.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Gets the value at the given index, if defined.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.values.get(index).and_then(|v| v.as_ref())
    }

    /// Whether the slot at `index` holds a value.
    pub fn is_defined(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// Index of the first defined slot.
    pub fn first_defined(&self) -> Option<usize> {
        self.values.iter().position(Option::is_some)
    }

    /// Last defined value.
    pub fn last(&self) -> Option<&T> {
        self.values.iter().rev().find_map(|v| v.as_ref())
    }

    /// Returns an iterator over defined (index, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.as_ref().map(|val| (i, val)))
    }

    /// Returns the underlying slots.
    pub fn values(&self) -> &[Option<T>] {
        &self.values
    }

    /// Sets the slot at `index`. Out-of-range indices are ignored.
    pub fn set(&mut self, index: usize, value: Option<T>) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value;
        }
    }
}

impl<T> Default for TimeSeries<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> TimeSeries<T> {
    /// Creates a TimeSeries from a slice of values, all defined.
    pub fn from_values(values: &[T]) -> Self {
        Self {
            values: values.iter().cloned().map(Some).collect(),
        }
    }
}

impl<T> FromIterator<Option<T>> for TimeSeries<T> {
    fn from_iter<I: IntoIterator<Item = Option<T>>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
