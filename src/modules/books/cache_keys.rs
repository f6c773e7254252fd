//! Cache key layout and the invalidation policy for book listings.
//!
//! List windows are cached under `books:list:{skip}:{limit}`. Creating a book
//! deletes only the windows in [`INVALIDATED_WINDOWS`]; every other cached
//! window stays stale until its TTL runs out.

use std::time::Duration;

use super::models::PageWindow;

pub const LIST_KEY_PREFIX: &str = "books:list";

/// Lifetime of every cached list window.
pub const LIST_TTL: Duration = Duration::from_secs(300);

/// First-page windows dropped after every successful book creation.
pub const INVALIDATED_WINDOWS: [PageWindow; 3] = [
    PageWindow::first_page(100),
    PageWindow::first_page(10),
    PageWindow::first_page(50),
];

pub fn list_key(window: PageWindow) -> String {
    format!("{LIST_KEY_PREFIX}:{}:{}", window.skip(), window.limit())
}

pub fn invalidation_keys() -> impl Iterator<Item = String> {
    INVALIDATED_WINDOWS.into_iter().map(list_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_embeds_exact_window() {
        let window = PageWindow::new(20, 10).unwrap();
        assert_eq!(list_key(window), "books:list:20:10");
        // "1:10" and "11:1" must not collapse into the same key
        assert_ne!(
            list_key(PageWindow::new(1, 10).unwrap()),
            list_key(PageWindow::new(11, 1).unwrap())
        );
    }

    #[test]
    fn invalidation_covers_common_first_pages() {
        let keys: Vec<String> = invalidation_keys().collect();
        assert_eq!(
            keys,
            vec!["books:list:0:100", "books:list:0:10", "books:list:0:50"]
        );
    }

    #[test]
    fn list_ttl_is_five_minutes() {
        assert_eq!(LIST_TTL, Duration::from_secs(300));
    }

    #[test]
    fn invalidated_windows_are_valid_windows() {
        for window in INVALIDATED_WINDOWS {
            assert_eq!(
                PageWindow::new(window.skip(), window.limit()).unwrap(),
                window
            );
        }
    }
}
