//! Focus targets and the cyclic focus trap.

use std::fmt;

/// Something inside a modal that can hold focus.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FocusTarget {
    /// The modal heading. Focusable programmatically, never part of the tab order.
    Title,
    /// A named form field. Only fields are remembered across opens.
    Field(String),
    /// A button such as submit or cancel.
    Button(String),
}

impl FocusTarget {
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    pub fn button(name: impl Into<String>) -> Self {
        Self::Button(name.into())
    }

    /// Field name, if this target is a named field.
    pub fn field_name(&self) -> Option<&str> {
        match self {
            Self::Field(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for FocusTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title => write!(f, "title"),
            Self::Field(name) => write!(f, "field:{name}"),
            Self::Button(name) => write!(f, "button:{name}"),
        }
    }
}

/// The focus surface a modal exposes to the accessibility controller.
pub trait FocusScope {
    /// Focusable descendants in tab order.
    fn focusables(&self) -> Vec<FocusTarget>;

    /// Currently focused target, if any.
    fn focused(&self) -> Option<FocusTarget>;

    /// Move focus to `target`. Unknown targets are ignored.
    fn focus(&mut self, target: &FocusTarget);

    /// Heading target, if the modal has one.
    fn title(&self) -> Option<FocusTarget> {
        None
    }

    fn scroll_offset(&self) -> u16 {
        0
    }

    fn set_scroll_offset(&mut self, offset: u16) {
        _ = offset;
    }
}

/// Direction of a tab step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabDirection {
    Forward,
    Backward,
}

/// Compute the next focus target when tabbing inside a trap.
///
/// Focus wraps from the last focusable to the first (and back), so it never
/// leaves the trap. When nothing in the trap is focused, forward lands on the
/// first focusable and backward on the last. Returns `None` when the trap is
/// empty.
pub fn cycle<'a>(
    focusables: &'a [FocusTarget],
    current: Option<&FocusTarget>,
    direction: TabDirection,
) -> Option<&'a FocusTarget> {
    let last = focusables.len().checked_sub(1)?;
    let position = current.and_then(|c| focusables.iter().position(|f| f == c));

    let next = match (direction, position) {
        (TabDirection::Forward, Some(i)) if i == last => 0,
        (TabDirection::Forward, Some(i)) => i + 1,
        (TabDirection::Forward, None) => 0,
        (TabDirection::Backward, Some(0) | None) => last,
        (TabDirection::Backward, Some(i)) => i - 1,
    };
    focusables.get(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets() -> Vec<FocusTarget> {
        vec![
            FocusTarget::field("name"),
            FocusTarget::field("email"),
            FocusTarget::button("submit"),
        ]
    }

    #[test]
    fn test_tab_on_last_wraps_to_first() {
        let focusables = targets();
        let next = cycle(&focusables, focusables.last(), TabDirection::Forward);
        assert_eq!(next, Some(&FocusTarget::field("name")));
    }

    #[test]
    fn test_shift_tab_on_first_wraps_to_last() {
        let focusables = targets();
        let next = cycle(&focusables, focusables.first(), TabDirection::Backward);
        assert_eq!(next, Some(&FocusTarget::button("submit")));
    }

    #[test]
    fn test_tab_moves_within_trap() {
        let focusables = targets();
        let next = cycle(&focusables, Some(&focusables[0]), TabDirection::Forward);
        assert_eq!(next, Some(&FocusTarget::field("email")));
        let prev = cycle(&focusables, Some(&focusables[2]), TabDirection::Backward);
        assert_eq!(prev, Some(&FocusTarget::field("email")));
    }

    #[test]
    fn test_unfocused_enters_at_the_ends() {
        let focusables = targets();
        assert_eq!(
            cycle(&focusables, Some(&FocusTarget::Title), TabDirection::Forward),
            Some(&FocusTarget::field("name"))
        );
        assert_eq!(
            cycle(&focusables, None, TabDirection::Backward),
            Some(&FocusTarget::button("submit"))
        );
    }

    #[test]
    fn test_empty_trap_is_noop() {
        assert_eq!(cycle(&[], None, TabDirection::Forward), None);
        assert_eq!(
            cycle(&[], Some(&FocusTarget::Title), TabDirection::Backward),
            None
        );
    }

    #[test]
    fn test_single_focusable_stays() {
        let focusables = vec![FocusTarget::button("close")];
        for direction in [TabDirection::Forward, TabDirection::Backward] {
            assert_eq!(
                cycle(&focusables, Some(&focusables[0]), direction),
                Some(&focusables[0])
            );
        }
    }

    #[test]
    fn test_field_name() {
        assert_eq!(FocusTarget::field("email").field_name(), Some("email"));
        assert_eq!(FocusTarget::button("submit").field_name(), None);
        assert_eq!(FocusTarget::Title.field_name(), None);
    }
}
