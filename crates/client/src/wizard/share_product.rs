//! Share one of the seller's products into a conversation.

use kasuwa_core::{ConversationId, ProductId};

use super::{Completion, FieldErrors, Flow, Step};
use crate::http::Request;
use crate::models::{NewMessage, ProductSummary};

/// Longest accepted note.
pub const NOTE_MAX_CHARS: usize = 1000;

/// Steps of [`ShareProductFlow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareProductStep {
    PickProduct,
    Compose,
}

impl Step for ShareProductStep {
    const FIRST: Self = Self::PickProduct;

    fn next(self) -> Option<Self> {
        match self {
            Self::PickProduct => Some(Self::Compose),
            Self::Compose => None,
        }
    }

    fn previous(self) -> Option<Self> {
        match self {
            Self::PickProduct => None,
            Self::Compose => Some(Self::PickProduct),
        }
    }
}

/// The chosen product and an optional note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareProductDraft {
    pub product: Option<ProductId>,
    pub note: String,
}

/// Product sharing into one conversation.
#[derive(Debug, Clone)]
pub struct ShareProductFlow {
    conversation: ConversationId,
    products: Vec<ProductSummary>,
}

impl ShareProductFlow {
    /// Share into `conversation`, choosing among `products`.
    #[must_use]
    pub const fn new(conversation: ConversationId, products: Vec<ProductSummary>) -> Self {
        Self {
            conversation,
            products,
        }
    }

    /// Products that can be shared.
    #[must_use]
    pub fn products(&self) -> &[ProductSummary] {
        &self.products
    }

    fn find(&self, id: &ProductId) -> Option<&ProductSummary> {
        self.products.iter().find(|p| &p.id == id)
    }
}

impl Flow for ShareProductFlow {
    type Step = ShareProductStep;
    type Fields = ShareProductDraft;

    const NAME: &'static str = "share_product";

    fn validate(&self, step: ShareProductStep, fields: &ShareProductDraft) -> FieldErrors {
        let mut errors = FieldErrors::new();
        match step {
            ShareProductStep::PickProduct => match &fields.product {
                None => errors.insert("product", "choose a product to share"),
                Some(id) if self.find(id).is_none() => {
                    errors.insert("product", "that product is no longer available");
                }
                Some(_) => {}
            },
            ShareProductStep::Compose => {
                if fields.note.chars().count() > NOTE_MAX_CHARS {
                    errors.insert(
                        "note",
                        format!("note must be at most {NOTE_MAX_CHARS} characters"),
                    );
                }
            }
        }
        errors
    }

    fn prepare(&self, fields: &ShareProductDraft) -> Result<Request, FieldErrors> {
        let mut errors = FieldErrors::new();
        let Some(product) = fields.product.as_ref().and_then(|id| self.find(id)) else {
            errors.insert("product", "choose a product to share");
            return Err(errors);
        };

        let note = fields.note.trim();
        let message = NewMessage {
            text: if note.is_empty() {
                product.name.clone()
            } else {
                note.to_owned()
            },
            product_id: Some(product.id.clone()),
        };
        Request::post(format!("/chats/{}/messages", self.conversation))
            .json(&message)
            .map_err(|e| {
                errors.insert("form", e.to_string());
                errors
            })
    }

    fn completion(&self) -> Completion {
        Completion::Saved
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    use super::*;
    use crate::http::Body;
    use crate::wizard::Wizard;

    fn flow() -> ShareProductFlow {
        ShareProductFlow::new(
            ConversationId::new("c-9"),
            vec![ProductSummary {
                id: ProductId::new("p-1"),
                name: "Ofada rice 50kg".to_string(),
                price: Decimal::new(85_000, 0),
                thumbnail: None,
                status: kasuwa_core::ProductStatus::Active,
                min_order_quantity: Some(2),
            }],
        )
    }

    #[test]
    fn test_product_must_be_one_of_the_sellers() {
        let mut wizard = Wizard::new(flow());
        assert!(wizard.advance().is_err());
        wizard.update(|d| d.product = Some(ProductId::new("p-404")));
        assert!(wizard.advance().is_err());
        assert_eq!(
            wizard.errors().get("product"),
            Some("that product is no longer available")
        );
    }

    #[test]
    fn test_blank_note_uses_product_name() {
        let mut wizard = Wizard::new(flow());
        wizard.update(|d| d.product = Some(ProductId::new("p-1")));
        wizard.advance().unwrap();

        let submission = wizard.begin_submit().unwrap();
        assert_eq!(submission.request.endpoint(), "/chats/c-9/messages");
        let Some(Body::Json(body)) = submission.request.body() else {
            panic!("expected JSON body");
        };
        assert_eq!(
            body,
            &serde_json::json!({ "text": "Ofada rice 50kg", "product_id": "p-1" })
        );
    }

    #[test]
    fn test_long_note_rejected() {
        let mut wizard = Wizard::new(flow());
        wizard.update(|d| {
            d.product = Some(ProductId::new("p-1"));
            d.note = "a".repeat(NOTE_MAX_CHARS + 1);
        });
        wizard.advance().unwrap();
        assert!(wizard.begin_submit().is_err());
        assert!(wizard.errors().contains("note"));
    }
}
