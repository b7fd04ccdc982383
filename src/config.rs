//! Construction options.

/// Default starting capacity of a [`Set`](crate::Set).
pub const DEFAULT_SET_CAPACITY: usize = 64;

/// Default starting capacity of a [`Dict`](crate::Dict).
pub const DEFAULT_DICT_CAPACITY: usize = 64;

/// Table construction options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    pub(crate) initial_capacity: usize,
    pub(crate) shrink: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_SET_CAPACITY,
            shrink: true,
        }
    }
}

impl Config {
    /// Defaults used by [`Set::new`](crate::Set::new).
    #[must_use]
    pub fn set() -> Self {
        Self::default()
    }

    /// Defaults used by [`Dict::new`](crate::Dict::new).
    #[must_use]
    pub fn dict() -> Self {
        Self {
            initial_capacity: DEFAULT_DICT_CAPACITY,
            ..Self::default()
        }
    }

    /// Sets the number of slots allocated up front.
    ///
    /// Capacity only ever doubles or halves from here, and never shrinks
    /// below it. Must be at least 1; this is checked when the table is
    /// built.
    #[must_use]
    pub fn initial_capacity(mut self, slots: usize) -> Self {
        self.initial_capacity = slots;
        self
    }

    /// Enables or disables halving the table once occupancy falls to a
    /// quarter of its capacity.
    ///
    /// Defaults to `true`.
    #[must_use]
    pub fn shrink(mut self, enabled: bool) -> Self {
        self.shrink = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let c = Config::dict().initial_capacity(8).shrink(false);
        assert_eq!(
            c,
            Config {
                initial_capacity: 8,
                shrink: false
            }
        );
        assert_eq!(
            Config::set(),
            Config {
                initial_capacity: DEFAULT_SET_CAPACITY,
                shrink: true
            }
        );
    }
}
