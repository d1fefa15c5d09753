use crate::config::EngineConfig;

/// Validated page window of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePlan {
    pub page: u32,
    pub per_page: u32,
}

impl PagePlan {
    /// Default and clamp the requested page and page size.
    ///
    /// Page `0` is treated as the first page, `per_page` `0` (or absent) as the
    /// configured default, and `per_page` is capped at `max_per_page`.
    #[must_use]
    pub fn new(page: Option<u32>, per_page: Option<u32>, config: &EngineConfig) -> Self {
        let page = page.unwrap_or(1).max(1);
        let per_page = match per_page {
            Some(0) | None => config.default_per_page,
            Some(size) => size,
        }
        .clamp(1, config.max_per_page.max(1));

        Self { page, per_page }
    }

    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }

    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }

    #[must_use]
    pub fn total_pages(&self, total_count: u64) -> u64 {
        total_pages(total_count, u64::from(self.per_page))
    }
}

/// `ceil(total_count / per_page)`; zero rows means zero pages.
#[must_use]
pub fn total_pages(total_count: u64, per_page: u64) -> u64 {
    if per_page == 0 {
        return 0;
    }
    total_count.div_ceil(per_page)
}
