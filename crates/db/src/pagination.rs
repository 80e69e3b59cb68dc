use serde::Deserialize;

pub const DEFAULT_PER_PAGE: u32 = 10;

#[derive(Deserialize, Default, Debug, Clone)]
pub struct PaginationQuery {
    pub page: Option<String>,
}

impl PaginationQuery {
    pub fn page(&self) -> Option<&str> {
        self.page.as_deref()
    }
}

/// Page-number pagination over an ordered listing.
///
/// Requests that cannot be served are clamped instead of rejected: a missing,
/// non-numeric or below-one page number yields the first page, a number past
/// the end yields the last page. An empty listing still has a single empty
/// page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    per_page: i64,
}

/// Position of one page inside a listing of `count` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: i64,
    pub num_pages: i64,
    pub count: i64,
    pub offset: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub window: PageWindow,
}

impl Paginator {
    pub fn new(per_page: u32) -> Self {
        Self {
            per_page: i64::from(per_page.max(1)),
        }
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
    }

    pub fn num_pages(&self, count: i64) -> i64 {
        if count <= 0 {
            1
        } else {
            (count + self.per_page - 1) / self.per_page
        }
    }

    pub fn window(&self, count: i64, requested: Option<&str>) -> PageWindow {
        let count = count.max(0);
        let num_pages = self.num_pages(count);
        let number = match requested.map(str::trim) {
            None | Some("") => 1,
            Some(raw) => match raw.parse::<i64>() {
                Ok(number) if number < 1 => 1,
                Ok(number) => number.min(num_pages),
                // Too many digits for an i64 is still "past the end"
                Err(_) if raw.bytes().all(|b| b.is_ascii_digit()) => num_pages,
                Err(_) => 1,
            },
        };

        PageWindow {
            number,
            num_pages,
            count,
            offset: (number - 1) * self.per_page,
            limit: self.per_page,
        }
    }

    pub fn paginate<T>(&self, items: Vec<T>, requested: Option<&str>) -> Page<T> {
        let window = self.window(items.len() as i64, requested);
        let items = items
            .into_iter()
            .skip(window.offset as usize)
            .take(window.limit as usize)
            .collect();
        Page { items, window }
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PER_PAGE)
    }
}

impl PageWindow {
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn next_page_number(&self) -> Option<i64> {
        self.has_next().then_some(self.number + 1)
    }

    pub fn previous_page_number(&self) -> Option<i64> {
        self.has_previous().then_some(self.number - 1)
    }
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, window: PageWindow) -> Self {
        Self { items, window }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            window: self.window,
        }
    }
}
