//! Transient entry state behind the "select first N rows" control.

/// Owned numeric entry; cleared every time it is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectFirstInput {
    value: Option<i64>,
}

impl SelectFirstInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, value: Option<i64>) {
        self.value = value;
    }

    pub fn value(&self) -> Option<i64> {
        self.value
    }

    /// Hand out the entered count (0 when empty) and reset the entry.
    ///
    /// The count is passed on unclamped; the reconciler clamps it.
    pub fn take(&mut self) -> i64 {
        self.value.take().unwrap_or(0)
    }
}

/// Guidance shown next to the entry for the current page.
pub fn helper_text(max_on_page: usize) -> String {
    if max_on_page == 0 {
        return "No rows available on this page.".to_string();
    }
    format!("Enter number of rows to select on the current page (max {max_on_page}).")
}

/// The control is inert while the page has no rows.
pub fn is_disabled(max_on_page: usize) -> bool {
    max_on_page == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_defaults_to_zero_and_clears() {
        let mut input = SelectFirstInput::new();
        assert_eq!(input.take(), 0);

        input.set(Some(-3));
        assert_eq!(input.take(), -3);
        assert_eq!(input.value(), None);
    }

    #[test]
    fn helper_text_mentions_page_maximum() {
        assert_eq!(helper_text(0), "No rows available on this page.");
        assert_eq!(
            helper_text(12),
            "Enter number of rows to select on the current page (max 12)."
        );
        assert!(is_disabled(0));
        assert!(!is_disabled(1));
    }
}
