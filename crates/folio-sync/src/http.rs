//! # HTTP Remote Cart
//!
//! [`RemoteCart`] over the bookstore REST API.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET    {base}/cart            → [ WireLine, … ]                        │
//! │  POST   {base}/cart            ← WireLine (quantity per QuantitySyncMode)│
//! │  DELETE {base}/cart/{book_id}                                           │
//! │                                                                         │
//! │  Every request: Authorization: Bearer <token>                           │
//! │  No token      → SyncError::Unauthenticated (request not sent)          │
//! │  401 / 403     → SyncError::Unauthorized                                │
//! │  other non-2xx → SyncError::Http { status, body }                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use folio_core::{BookId, CartItem};
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, warn};
use url::Url;

use crate::auth::TokenProvider;
use crate::config::{FolioConfig, QuantitySyncMode};
use crate::error::{SyncError, SyncResult};
use crate::protocol::{LineUpsert, WireLine};
use crate::remote::RemoteCart;

/// Longest response body kept in an error message.
const MAX_ERROR_BODY: usize = 512;

pub struct HttpRemoteCart {
    client: Client,
    base: Url,
    tokens: Arc<dyn TokenProvider>,
    quantity_mode: QuantitySyncMode,
}

impl HttpRemoteCart {
    pub fn new(config: &FolioConfig, tokens: Arc<dyn TokenProvider>) -> SyncResult<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(HttpRemoteCart {
            client,
            base: config.api_url()?,
            tokens,
            quantity_mode: config.quantity_mode(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn cart_url(&self) -> SyncResult<Url> {
        Ok(self.base.join("cart")?)
    }

    fn line_url(&self, book_id: &BookId) -> SyncResult<Url> {
        let mut url = self.cart_url()?;
        url.path_segments_mut()
            .map_err(|_| SyncError::InvalidUrl(format!("{} cannot be a base", self.base)))?
            .push(book_id.as_str());
        Ok(url)
    }

    fn token(&self) -> SyncResult<String> {
        self.tokens.bearer_token().ok_or(SyncError::Unauthenticated)
    }

    /// Maps non-success statuses to errors, keeping a bounded slice of the body.
    async fn check(response: Response) -> SyncResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SyncError::Unauthorized(status.as_u16()));
        }

        let mut body = response.text().await.unwrap_or_default();
        if body.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }

        Err(SyncError::Http {
            status: status.as_u16(),
            body,
        })
    }
}

impl std::fmt::Debug for HttpRemoteCart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRemoteCart")
            .field("base", &self.base.as_str())
            .field("quantity_mode", &self.quantity_mode)
            .finish()
    }
}

#[async_trait]
impl RemoteCart for HttpRemoteCart {
    async fn fetch_cart(&self) -> SyncResult<Vec<CartItem>> {
        let token = self.token()?;
        let url = self.cart_url()?;
        debug!(%url, "Fetching server cart");

        let response = self.client.get(url).bearer_auth(token).send().await?;
        let lines: Vec<WireLine> = Self::check(response).await?.json().await?;

        let mut items = Vec::with_capacity(lines.len());
        for line in lines {
            match CartItem::try_from(line) {
                Ok(item) => items.push(item),
                Err(e) => warn!(error = %e, "Skipping unreadable server cart line"),
            }
        }

        Ok(items)
    }

    async fn upsert_line(&self, line: &LineUpsert) -> SyncResult<()> {
        let token = self.token()?;
        let url = self.cart_url()?;
        let body = line.to_wire(self.quantity_mode);
        debug!(
            book_id = %line.book_id,
            quantity = body.quantity,
            mode = %self.quantity_mode,
            "Upserting server cart line"
        );

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn delete_line(&self, book_id: &BookId) -> SyncResult<()> {
        let token = self.token()?;
        let url = self.line_url(book_id)?;
        debug!(book_id = %book_id, "Deleting server cart line");

        let response = self.client.delete(url).bearer_auth(token).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}
