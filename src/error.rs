use std::fmt;

/// Why an ordering operation on an [`OrderedMap`](crate::OrderedMap) was
/// rejected. A rejected operation never leaves the map partially modified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error<K, V> {
    /// A key the operation depends on, either the subject or the mark it is
    /// positioned against, is not in the map.
    KeyNotFound(K),

    /// An insert would have overwritten an existing entry. Carries the key and
    /// value already stored there; call `set` and then a move if overwriting
    /// was the intent.
    DuplicateKeyValue { key: K, value: V },
}

impl<K, V> Error<K, V> {
    /// The key the error is about.
    pub fn key(&self) -> &K {
        match self {
            Error::KeyNotFound(key) => key,
            Error::DuplicateKeyValue { key, .. } => key,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Display for Error<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::KeyNotFound(key) => write!(f, "key not found: {:?}", key),
            Error::DuplicateKeyValue { key, value } => write!(
                f,
                "key {:?} already exists with value {:?}",
                key, value
            ),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> std::error::Error for Error<K, V> {}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn test_display() {
        let not_found: Error<&str, u32> = Error::KeyNotFound("missing");
        assert_eq!("key not found: \"missing\"", not_found.to_string());

        let duplicate = Error::DuplicateKeyValue {
            key: 7,
            value: "seven",
        };
        assert_eq!(
            "key 7 already exists with value \"seven\"",
            duplicate.to_string()
        );
        assert_eq!(&7, duplicate.key());
    }

    #[test]
    fn test_boxes_as_std_error() {
        let err: Box<dyn std::error::Error> =
            Box::new(Error::<u64, u64>::KeyNotFound(1));
        assert_eq!("key not found: 1", err.to_string());
    }
}
