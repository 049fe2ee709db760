//! Pagination helpers

/// Row offset of a 1-based page; computed in `i64` so any `u32` page is safe
pub fn page_offset(page: u32, per_page: u32) -> i64 {
    i64::from(page.saturating_sub(1)) * i64::from(per_page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_offset() {
        assert_eq!(page_offset(1, 20), 0);
        assert_eq!(page_offset(0, 20), 0);
        assert_eq!(page_offset(3, 20), 40);
    }

    #[test]
    fn test_page_offset_does_not_overflow_on_huge_pages() {
        assert_eq!(page_offset(50_000_000, 100), 4_999_999_900);
        assert_eq!(
            page_offset(u32::MAX, u32::MAX),
            i64::from(u32::MAX - 1) * i64::from(u32::MAX)
        );
    }
}
