mod dto;
pub mod gemini;

use async_trait::async_trait;
use bytes::Bytes;
use time::macros::date;
use tracing::debug;

pub use dto::{ExtractedItem, StockEntry};

use crate::error::Result;
use crate::profile::TransportMode;

/// The two generative transforms the app delegates. Both are stateless:
/// bytes in, typed candidates out; no retries, no streaming.
#[async_trait]
pub trait AiModel: Send + Sync {
    /// Receipt or product photo to candidate inventory items, 0..N.
    async fn extract_receipt_items(
        &self,
        image: Bytes,
        content_type: &str,
    ) -> Result<Vec<ExtractedItem>>;

    /// Up to a handful of product names to buy, biased by transport mode.
    async fn suggest_purchases(
        &self,
        stock: &[StockEntry],
        mode: TransportMode,
    ) -> Result<Vec<String>>;
}

/// Stand-in used when no API credential is configured. Returns fixed data so
/// the import and suggestion pipelines stay demoable offline.
pub struct Offline;

impl Offline {
    pub fn canned_receipt_items() -> Vec<ExtractedItem> {
        vec![
            ExtractedItem {
                name: "Pommes".into(),
                quantity: 6,
                expiry_date: Some(date!(2024 - 06 - 01)),
                category: Some("Fruits & Légumes".into()),
            },
            ExtractedItem {
                name: "Lait".into(),
                quantity: 2,
                expiry_date: Some(date!(2024 - 05 - 20)),
                category: Some("Produits Laitiers".into()),
            },
        ]
    }

    pub fn canned_suggestions() -> Vec<String> {
        vec!["Pâtes".into(), "Sauce Tomate".into(), "Fromage râpé".into()]
    }
}

#[async_trait]
impl AiModel for Offline {
    async fn extract_receipt_items(
        &self,
        _image: Bytes,
        _content_type: &str,
    ) -> Result<Vec<ExtractedItem>> {
        debug!("no AI credential configured, returning canned receipt items");
        Ok(Self::canned_receipt_items())
    }

    async fn suggest_purchases(
        &self,
        _stock: &[StockEntry],
        _mode: TransportMode,
    ) -> Result<Vec<String>> {
        debug!("no AI credential configured, returning canned suggestions");
        Ok(Self::canned_suggestions())
    }
}

#[cfg(test)]
pub(crate) mod test_models {
    use super::*;
    use crate::error::Error;

    /// Suggests exactly the wrapped names; extraction mirrors `Offline`.
    pub struct NamesModel(pub Vec<String>);

    #[async_trait]
    impl AiModel for NamesModel {
        async fn extract_receipt_items(
            &self,
            _image: Bytes,
            _content_type: &str,
        ) -> Result<Vec<ExtractedItem>> {
            Ok(Offline::canned_receipt_items())
        }

        async fn suggest_purchases(
            &self,
            _stock: &[StockEntry],
            _mode: TransportMode,
        ) -> Result<Vec<String>> {
            Ok(self.0.clone())
        }
    }

    /// Every call fails, as if the remote endpoint were unreachable.
    pub struct FailingModel;

    #[async_trait]
    impl AiModel for FailingModel {
        async fn extract_receipt_items(
            &self,
            _image: Bytes,
            _content_type: &str,
        ) -> Result<Vec<ExtractedItem>> {
            Err(Error::UnexpectedResponse("model endpoint unreachable".into()))
        }

        async fn suggest_purchases(
            &self,
            _stock: &[StockEntry],
            _mode: TransportMode,
        ) -> Result<Vec<String>> {
            Err(Error::UnexpectedResponse("model endpoint unreachable".into()))
        }
    }
}
