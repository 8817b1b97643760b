use crate::general::ConfigurationError;

/// RingBuffer provides a buffer with a user-defined capacity. As soon as the capacity is reached,
/// the buffer overwrites the oldest value when a new value is pushed to it. Iteration always
/// yields the values in the order in which they were pushed (oldest first).
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    vals: Vec<T>,
    capacity: usize,
    idx: usize, // index of the oldest value once the buffer is full
}

impl<T: Clone> RingBuffer<T> {
    pub fn new(capacity: usize) -> Result<RingBuffer<T>, ConfigurationError> {
        if capacity == 0 {
            return Err(ConfigurationError);
        }

        Ok(RingBuffer {
            vals: Vec::with_capacity(capacity),
            capacity,
            idx: 0,
        })
    }

    /// push appends a value in O(1). If the buffer is full, the oldest value is evicted first.
    pub fn push(&mut self, val: T) {
        if self.vals.len() < self.capacity {
            self.vals.push(val);
        } else {
            self.vals[self.idx] = val;
            self.idx = (self.idx + 1) % self.capacity;
        }
    }

    /// iter returns an iterator over the values from the oldest to the newest one.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let (newer, older) = self.vals.split_at(self.idx);
        older.iter().chain(newer.iter())
    }

    /// last returns the most recently pushed value.
    pub fn last(&self) -> Option<&T> {
        if self.vals.len() < self.capacity || self.idx == 0 {
            self.vals.last()
        } else {
            self.vals.get(self.idx - 1)
        }
    }

    /// snapshot returns an order-preserving copy of the buffer content that is decoupled from
    /// subsequent pushes.
    pub fn snapshot(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.vals.clear();
        self.idx = 0;
    }

    pub fn len(&self) -> usize {
        self.vals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vals.is_empty()
    }
}

impl<T: Into<f64> + Copy> RingBuffer<T> {
    pub fn get_avg(&self) -> Option<f64> {
        if self.vals.is_empty() {
            return None;
        }
        Some(self.get_sum() / self.vals.len() as f64)
    }

    fn get_sum(&self) -> f64 {
        let mut sum = 0.0;
        for val in self.vals.iter() {
            sum += (*val).into()
        }
        sum
    }
}
