//! Page arithmetic and pagination affordances

use serde::{Deserialize, Serialize};

/// Maximum number of numbered page buttons shown at once
pub const PAGE_WINDOW: u32 = 5;

/// `ceil(count / limit)`; zero rows means zero pages
pub fn total_pages(count: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    let pages = count.div_ceil(u64::from(limit));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Clamp a requested page into `[0, total_pages - 1]`
///
/// Returns `None` when there are no pages at all.
pub fn clamp_page(requested: i64, total_pages: u32) -> Option<u32> {
    if total_pages == 0 {
        return None;
    }
    let last = i64::from(total_pages) - 1;
    let clamped = requested.clamp(0, last);
    u32::try_from(clamped).ok()
}

/// A numbered page button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageButton {
    pub index: u32,
    pub current: bool,
}

impl PageButton {
    /// One-based label shown to the user
    pub fn label(&self) -> u32 {
        self.index + 1
    }
}

/// Everything the pagination control needs to draw itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageControls {
    pub previous: Option<u32>,
    pub next: Option<u32>,
    pub buttons: Vec<PageButton>,
    /// Set while a page is loading; every affordance is inert
    pub disabled: bool,
}

impl PageControls {
    pub fn can_go_previous(&self) -> bool {
        !self.disabled && self.previous.is_some()
    }

    pub fn can_go_next(&self) -> bool {
        !self.disabled && self.next.is_some()
    }

    /// Resolve a click on page `requested` into a page change, if allowed
    pub fn request(&self, requested: i64, total_pages: u32) -> Option<u32> {
        if self.disabled {
            return None;
        }
        clamp_page(requested, total_pages)
    }
}

/// Pagination state as rendered by the control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
    pub loading: bool,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, count: u64, loading: bool) -> Self {
        Self {
            page,
            limit,
            total_pages: total_pages(count, limit),
            loading,
        }
    }

    pub fn controls(&self) -> PageControls {
        if self.total_pages == 0 {
            return PageControls {
                previous: None,
                next: None,
                buttons: Vec::new(),
                disabled: self.loading,
            };
        }

        let last = self.total_pages - 1;
        let current = self.page.min(last);

        let half = PAGE_WINDOW / 2;
        let mut start = current.saturating_sub(half);
        let end = (start + PAGE_WINDOW - 1).min(last);
        if end - start + 1 < PAGE_WINDOW {
            start = end.saturating_sub(PAGE_WINDOW - 1);
        }

        let buttons = (start..=end)
            .map(|index| PageButton {
                index,
                current: index == current,
            })
            .collect();

        PageControls {
            previous: current.checked_sub(1),
            next: if current < last { Some(current + 1) } else { None },
            buttons,
            disabled: self.loading,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(51, 25), 3);
    }

    #[test]
    fn test_zero_count_has_no_navigation() {
        let controls = Pagination::new(0, 10, 0, false).controls();
        assert!(controls.buttons.is_empty());
        assert!(!controls.can_go_next());
        assert!(!controls.can_go_previous());
        assert_eq!(controls.request(0, 0), None);
    }

    #[test]
    fn test_loading_disables_everything() {
        let controls = Pagination::new(1, 10, 100, true).controls();
        assert!(controls.disabled);
        assert!(!controls.can_go_next());
        assert!(!controls.can_go_previous());
        assert_eq!(controls.request(3, 10), None);
    }

    #[test]
    fn test_window_is_centred() {
        let controls = Pagination::new(5, 10, 200, false).controls();
        let indexes: Vec<u32> = controls.buttons.iter().map(|b| b.index).collect();
        assert_eq!(indexes, vec![3, 4, 5, 6, 7]);
        assert_eq!(controls.previous, Some(4));
        assert_eq!(controls.next, Some(6));
    }

    #[test]
    fn test_window_sticks_to_the_end() {
        let controls = Pagination::new(19, 10, 200, false).controls();
        let indexes: Vec<u32> = controls.buttons.iter().map(|b| b.index).collect();
        assert_eq!(indexes, vec![15, 16, 17, 18, 19]);
        assert_eq!(controls.next, None);
        assert!(controls.buttons.last().is_some_and(|b| b.current));
    }

    #[test]
    fn test_single_page() {
        let controls = Pagination::new(0, 10, 1, false).controls();
        assert_eq!(controls.buttons.len(), 1);
        assert_eq!(controls.buttons[0].label(), 1);
        assert!(!controls.can_go_next());
        assert!(!controls.can_go_previous());
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(-3, 4), Some(0));
        assert_eq!(clamp_page(2, 4), Some(2));
        assert_eq!(clamp_page(9, 4), Some(3));
        assert_eq!(clamp_page(0, 0), None);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_total_pages_covers_count(count in 0u64..100_000, limit in prop::sample::select(vec![10u32, 25, 50])) {
            let pages = total_pages(count, limit);
            prop_assert!(u64::from(pages) * u64::from(limit) >= count);
            if pages > 0 {
                prop_assert!(u64::from(pages - 1) * u64::from(limit) < count);
            } else {
                prop_assert_eq!(count, 0);
            }
        }

        #[test]
        fn prop_controls_stay_in_range(page in 0u32..500, count in 0u64..5_000) {
            let pagination = Pagination::new(page, 10, count, false);
            let controls = pagination.controls();
            prop_assert!(controls.buttons.len() as u32 <= PAGE_WINDOW);
            for button in &controls.buttons {
                prop_assert!(button.index < pagination.total_pages);
            }
            if let Some(next) = controls.next {
                prop_assert!(next < pagination.total_pages);
            }
        }
    }
}
