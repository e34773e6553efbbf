// ABOUTME: Offset pagination for the leaderboard view.
// ABOUTME: Page count, rank numbering, and first/prev/next/last control availability.

/// Fixed number of rows the backend returns per leaderboard page.
pub const PAGE_SIZE: u64 = 20;

/// Current page (1-based) and total page count derived from the ranked-user count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current: u32,
    pub total_pages: u32,
}

impl Pagination {
    pub fn new(current: u32, total_count: u64) -> Self {
        let total_pages = total_count.div_ceil(PAGE_SIZE);
        Self {
            current: current.max(1),
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
        }
    }

    /// Controls are only shown when there is more than one page.
    pub fn shows_controls(&self) -> bool {
        self.total_pages > 1
    }

    pub fn prev_disabled(&self) -> bool {
        self.current <= 1
    }

    pub fn next_disabled(&self) -> bool {
        self.current >= self.total_pages
    }

    /// 1-based global rank of the row at `index` on this page.
    pub fn rank(&self, index: usize) -> u64 {
        (u64::from(self.current) - 1) * PAGE_SIZE + index as u64 + 1
    }

    pub fn first(&self) -> Option<u32> {
        (!self.prev_disabled()).then_some(1)
    }

    pub fn prev(&self) -> Option<u32> {
        (!self.prev_disabled()).then(|| self.current - 1)
    }

    pub fn next(&self) -> Option<u32> {
        (!self.next_disabled()).then(|| self.current + 1)
    }

    pub fn last(&self) -> Option<u32> {
        (!self.next_disabled()).then_some(self.total_pages)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current: 1,
            total_pages: 1,
        }
    }
}
