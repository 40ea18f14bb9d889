//! Purchase request and its validation gate.

use common::{ArticleId, UserId};
use serde::{Deserialize, Serialize};

use crate::amount::TokenAmount;
use crate::article::Article;
use crate::error::DomainError;

/// An ephemeral, per-invocation purchase request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    /// The buying user.
    pub user_id: UserId,

    /// The article being purchased.
    pub article_id: ArticleId,

    /// The price the buyer agreed to, in wei.
    pub price: TokenAmount,
}

impl PurchaseRequest {
    /// Creates a new purchase request.
    pub fn new(user_id: impl Into<UserId>, article_id: impl Into<ArticleId>, price: TokenAmount) -> Self {
        Self {
            user_id: user_id.into(),
            article_id: article_id.into(),
            price,
        }
    }
}

/// Checks the numeric constraints on a requested price: positive and an
/// exact multiple of 10^18 wei (a whole token quantity).
pub fn validate_price(price: TokenAmount) -> Result<(), DomainError> {
    if price.is_zero() {
        return Err(DomainError::NonPositivePrice);
    }
    if !price.is_whole_tokens() {
        return Err(DomainError::FractionalTokenAmount);
    }
    Ok(())
}

/// Validates a purchase request against the article's current state.
///
/// Rejects fractional or non-positive prices, unpublished articles, and
/// stale prices. Not-for-sale and self-purchase are left to the
/// orchestrator, which re-reads the article anyway.
pub fn validate_request(request: &PurchaseRequest, article: &Article) -> Result<(), DomainError> {
    validate_price(request.price)?;

    if !article.is_public() {
        return Err(DomainError::NotPublished(article.article_id.clone()));
    }

    if let Some(current) = article.price
        && current != request.price
    {
        return Err(DomainError::PriceMismatch {
            requested: request.price,
            current,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::ArticleStatus;

    fn public_article(price: Option<TokenAmount>) -> Article {
        Article {
            article_id: ArticleId::new("article-1"),
            user_id: UserId::new("seller"),
            title: "On Pricing".to_string(),
            status: ArticleStatus::Public,
            price,
        }
    }

    #[test]
    fn accepts_whole_token_price_matching_article() {
        let price = TokenAmount::from_tokens(3);
        let request = PurchaseRequest::new("buyer", "article-1", price);
        let article = public_article(Some(price));

        assert!(validate_request(&request, &article).is_ok());
    }

    #[test]
    fn rejects_fractional_price() {
        let price = TokenAmount::from_wei(1_500_000_000_000_000_000);
        assert_eq!(
            validate_price(price),
            Err(DomainError::FractionalTokenAmount)
        );
    }

    #[test]
    fn rejects_zero_price() {
        assert_eq!(
            validate_price(TokenAmount::from_wei(0)),
            Err(DomainError::NonPositivePrice)
        );
    }

    #[test]
    fn rejects_stale_price() {
        let current = TokenAmount::from_tokens(5);
        let request = PurchaseRequest::new("buyer", "article-1", TokenAmount::from_tokens(3));
        let article = public_article(Some(current));

        assert_eq!(
            validate_request(&request, &article),
            Err(DomainError::PriceMismatch {
                requested: TokenAmount::from_tokens(3),
                current,
            })
        );
    }

    #[test]
    fn rejects_unpublished_article() {
        let price = TokenAmount::from_tokens(3);
        let request = PurchaseRequest::new("buyer", "article-1", price);
        let mut article = public_article(Some(price));
        article.status = ArticleStatus::Draft;

        assert_eq!(
            validate_request(&request, &article),
            Err(DomainError::NotPublished(ArticleId::new("article-1")))
        );
    }

    #[test]
    fn unpriced_article_passes_price_match() {
        // Not-for-sale is the orchestrator's rejection; the validator only
        // guards against stale prices.
        let request = PurchaseRequest::new("buyer", "article-1", TokenAmount::from_tokens(3));
        let article = public_article(None);

        assert!(validate_request(&request, &article).is_ok());
    }
}
