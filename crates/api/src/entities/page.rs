use db::{models::PostEntry, pagination::Page};
use serde::Serialize;

use super::PostView;

#[derive(Clone, Serialize, Debug)]
pub struct PageView<T> {
    pub items: Vec<T>,
    pub number: i64,
    pub num_pages: i64,
    pub count: i64,
    pub has_next: bool,
    pub has_previous: bool,
    pub next_page: Option<i64>,
    pub previous_page: Option<i64>,
}

impl<T> PageView<T> {
    pub fn build<S>(page: Page<S>, f: impl FnMut(S) -> T) -> Self {
        let window = page.window;
        Self {
            items: page.items.into_iter().map(f).collect(),
            number: window.number,
            num_pages: window.num_pages,
            count: window.count,
            has_next: window.has_next(),
            has_previous: window.has_previous(),
            next_page: window.next_page_number(),
            previous_page: window.previous_page_number(),
        }
    }
}

impl From<Page<PostEntry>> for PageView<PostView> {
    fn from(page: Page<PostEntry>) -> Self {
        Self::build(page, PostView::new)
    }
}
