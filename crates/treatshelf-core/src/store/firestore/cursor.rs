//! Lazy, forward-only cursor over an ordered collection listing

use crate::ports::{DocResult, Document, DocumentClient, PageQuery};
use std::collections::VecDeque;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CursorState {
    /// No page fetched yet.
    Fresh,
    /// More pages may follow `next_token`.
    Open,
    /// Last page fetched; only the buffer remains.
    Draining,
    Stopped,
}

/// Pages through a collection on demand.
///
/// The cursor is single pass: once it returns `None`, fails, or is stopped it
/// yields nothing more. Dropping it stops it.
pub struct DocumentCursor<'a, C: DocumentClient + ?Sized> {
    client: &'a C,
    collection: &'a str,
    order_by: &'a str,
    page_size: u32,
    buffer: VecDeque<Document>,
    next_token: Option<String>,
    state: CursorState,
    yielded: usize,
}

impl<'a, C: DocumentClient + ?Sized> DocumentCursor<'a, C> {
    pub fn new(client: &'a C, collection: &'a str, order_by: &'a str, page_size: u32) -> Self {
        Self {
            client,
            collection,
            order_by,
            page_size: page_size.max(1),
            buffer: VecDeque::new(),
            next_token: None,
            state: CursorState::Fresh,
            yielded: 0,
        }
    }

    /// Next document, fetching another page when the buffer runs dry.
    pub async fn next(&mut self) -> DocResult<Option<Document>> {
        loop {
            if let Some(doc) = self.buffer.pop_front() {
                self.yielded += 1;
                return Ok(Some(doc));
            }

            match self.state {
                CursorState::Fresh | CursorState::Open => {}
                CursorState::Draining => {
                    self.stop();
                    return Ok(None);
                }
                CursorState::Stopped => return Ok(None),
            }

            let query = PageQuery {
                order_by: self.order_by.to_string(),
                page_size: self.page_size,
                page_token: self.next_token.take(),
            };

            let page = match self.client.list_page(self.collection, &query).await {
                Ok(page) => page,
                Err(e) => {
                    self.stop();
                    return Err(e);
                }
            };

            self.buffer.extend(page.documents);
            self.state = match page.next_page_token {
                Some(token) if !token.is_empty() => {
                    self.next_token = Some(token);
                    CursorState::Open
                }
                _ => CursorState::Draining,
            };
        }
    }

    /// Release the cursor. Safe to call more than once.
    pub fn stop(&mut self) {
        if self.state == CursorState::Stopped {
            return;
        }
        debug!(
            "cursor over {:?} stopped after {} documents",
            self.collection, self.yielded
        );
        self.buffer.clear();
        self.next_token = None;
        self.state = CursorState::Stopped;
    }

    pub fn is_stopped(&self) -> bool {
        self.state == CursorState::Stopped
    }
}

impl<C: DocumentClient + ?Sized> Drop for DocumentCursor<'_, C> {
    fn drop(&mut self) {
        self.stop();
    }
}
