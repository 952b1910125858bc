/// Per-field intent in a partial update.
///
/// `Remove` deletes the field from the stored record; it is never written as
/// a null or empty value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    Keep,
    Set(T),
    Remove,
}

impl<T> Default for FieldUpdate<T> {
    fn default() -> Self {
        FieldUpdate::Keep
    }
}

impl<T> FieldUpdate<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, FieldUpdate::Keep)
    }

    /// Map a set value through a fallible normalizer that may turn it into `Remove`.
    pub fn try_normalize<U, E>(
        self,
        f: impl FnOnce(T) -> Result<Option<U>, E>,
    ) -> Result<FieldUpdate<U>, E> {
        Ok(match self {
            FieldUpdate::Keep => FieldUpdate::Keep,
            FieldUpdate::Remove => FieldUpdate::Remove,
            FieldUpdate::Set(v) => match f(v)? {
                Some(u) => FieldUpdate::Set(u),
                None => FieldUpdate::Remove,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_normalize_turns_none_into_remove() {
        let update: FieldUpdate<&str> = FieldUpdate::Set("   ");
        let normalized: Result<FieldUpdate<String>, ()> = update.try_normalize(|s| {
            let t = s.trim();
            Ok(if t.is_empty() { None } else { Some(t.to_string()) })
        });
        assert_eq!(normalized, Ok(FieldUpdate::Remove));
    }
}
