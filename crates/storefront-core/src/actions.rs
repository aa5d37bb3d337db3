//! Cart and checkout actions.
//!
//! Each action serves one request: it reads the cart through the cookie
//! jar, applies one change, persists the whole cart and revalidates the
//! `cart` tag. Outcomes with nothing to do are `Ok(None)`.

use storefront_cache::{CacheTag, CookieJar};
use storefront_commerce::cart::Cart;
use storefront_commerce::checkout::{CheckoutFlow, CheckoutState, Order};
use storefront_commerce::ids::VariantId;

use crate::{Storefront, StorefrontError};

impl Storefront {
    /// Read the cart of the client.
    pub async fn get_cart(&self, jar: &CookieJar) -> Result<Option<Cart>, StorefrontError> {
        self.store().load(jar).await
    }

    /// Add one unit of a variant to the cart, creating the cart if needed.
    ///
    /// A missing id returns `None`. An unknown id is logged and returns the
    /// current cart untouched. Neither persists anything.
    pub async fn add_item(
        &self,
        jar: &mut CookieJar,
        variant_id: Option<&str>,
    ) -> Result<Option<Cart>, StorefrontError> {
        let Some(variant_id) = variant_id.filter(|id| !id.is_empty()) else {
            return Ok(None);
        };

        let cart = self.store().load(jar).await?;

        let Some((product, variant)) = self
            .catalog()
            .find_variant(&VariantId::new(variant_id))
            .await
        else {
            tracing::error!(variant_id, "product or variant not found");
            return Ok(cart);
        };

        let mut cart = cart.unwrap_or_default();
        let line_id = cart.add_variant(&product, &variant)?;
        self.persist(jar, &cart).await?;

        tracing::info!(
            variant_id,
            line_id = %line_id,
            total_quantity = cart.total_quantity,
            "item added to cart"
        );
        Ok(Some(cart))
    }

    /// Set the quantity of a line, matched by line id or variant id.
    ///
    /// Zero or less removes the line. Returns `None` when there is no cart.
    /// The cart is persisted even if no line matched.
    pub async fn update_item(
        &self,
        jar: &mut CookieJar,
        line_id: &str,
        quantity: i64,
    ) -> Result<Option<Cart>, StorefrontError> {
        let Some(mut cart) = self.store().load(jar).await? else {
            return Ok(None);
        };

        let affected = cart.update_line(line_id, quantity)?;
        if affected == 0 {
            tracing::debug!(line_id, "no cart line matched");
        }
        self.persist(jar, &cart).await?;

        tracing::info!(line_id, quantity, affected, "cart line updated");
        Ok(Some(cart))
    }

    /// Turn the cart into an order and clear the cart.
    ///
    /// Returns `None`, touching nothing, when there is no cart or it is
    /// empty.
    pub async fn create_order(&self, jar: &mut CookieJar) -> Result<Option<Order>, StorefrontError> {
        let Some(cart) = self.store().load(jar).await? else {
            return Ok(None);
        };
        let Some(order) = Order::from_cart(&cart) else {
            return Ok(None);
        };

        tracing::info!(
            order_id = %order.id,
            order_number = order.order_number,
            total = %order.total_price,
            lines = order.line_items.len(),
            "order created"
        );
        self.orders().record(order.clone());

        self.store().clear(jar).await?;
        self.revalidator().revalidate(CacheTag::Cart);
        Ok(Some(order))
    }

    /// Drive a checkout flow through one submission.
    ///
    /// The order creator's result decides between success and failure;
    /// storage errors also end in the failed state rather than being
    /// returned. Only an illegal transition is an error.
    pub async fn place_order<'f>(
        &self,
        jar: &mut CookieJar,
        flow: &'f mut CheckoutFlow,
    ) -> Result<&'f CheckoutState, StorefrontError> {
        flow.begin()?;

        let state = match self.create_order(jar).await {
            Ok(order) => flow.complete(order)?,
            Err(e) => {
                tracing::error!(error = %e, "order creation failed");
                flow.fail(e.to_string())?
            }
        };

        if let CheckoutState::Failed(reason) = state {
            tracing::warn!(reason = %reason, "checkout failed");
        }
        Ok(state)
    }

    async fn persist(&self, jar: &mut CookieJar, cart: &Cart) -> Result<(), StorefrontError> {
        self.store().save(jar, cart).await?;
        self.revalidator().revalidate(CacheTag::Cart);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PersistenceMode, StorefrontConfig};
    use http::header::{COOKIE, SET_COOKIE};
    use http::{HeaderMap, HeaderValue};
    use storefront_cache::Cache;
    use storefront_commerce::checkout::CheckoutView;

    fn cookie_storefront() -> Storefront {
        Storefront::builder(StorefrontConfig::default()).build()
    }

    fn session_storefront() -> Storefront {
        let mut config = StorefrontConfig::default();
        config.persistence.mode = PersistenceMode::Session;
        Storefront::builder(config).build()
    }

    fn total(cart: &Cart) -> String {
        cart.cost.total_amount.display_amount()
    }

    async fn scenario(storefront: Storefront) {
        let mut jar = CookieJar::new();

        let cart = storefront.add_item(&mut jar, Some("1-1")).await.unwrap().unwrap();
        assert_eq!(total(&cart), "50.00");
        assert_eq!(cart.total_quantity, 1);

        let cart = storefront.add_item(&mut jar, Some("1-1")).await.unwrap().unwrap();
        assert_eq!(cart.total_quantity, 2);
        assert_eq!(total(&cart), "100.00");
        let line_id = cart.lines[0].id.to_string();

        let cart = storefront.update_item(&mut jar, &line_id, 3).await.unwrap().unwrap();
        assert_eq!(total(&cart), "150.00");

        let cart = storefront.update_item(&mut jar, &line_id, 0).await.unwrap().unwrap();
        assert!(cart.lines.is_empty());
        assert_eq!(total(&cart), "0.00");

        let stored = storefront.get_cart(&jar).await.unwrap().unwrap();
        assert_eq!(stored, cart);
    }

    #[tokio::test]
    async fn test_cart_scenario_cookie_mode() {
        scenario(cookie_storefront()).await;
    }

    #[tokio::test]
    async fn test_cart_scenario_session_mode() {
        scenario(session_storefront()).await;
    }

    #[tokio::test]
    async fn test_quantity_counts_adds() {
        let storefront = cookie_storefront();
        let mut jar = CookieJar::new();
        let adds = ["1-1", "3-1", "2-1", "1-1", "1-2"];

        let mut cart = None;
        for id in adds {
            cart = storefront.add_item(&mut jar, Some(id)).await.unwrap();
        }

        let cart = cart.unwrap();
        assert_eq!(cart.total_quantity, adds.len() as i64);
        let sum: i64 = cart.lines.iter().map(|l| l.cost.total_amount.amount_cents).sum();
        assert_eq!(cart.cost.total_amount.amount_cents, sum);
    }

    #[tokio::test]
    async fn test_add_item_without_id() {
        let storefront = cookie_storefront();
        let mut jar = CookieJar::new();

        assert!(storefront.add_item(&mut jar, None).await.unwrap().is_none());
        assert!(storefront.add_item(&mut jar, Some("")).await.unwrap().is_none());
        assert!(!jar.has_changes());
    }

    #[tokio::test]
    async fn test_add_unknown_variant_returns_cart_unchanged() {
        let storefront = cookie_storefront();
        let mut jar = CookieJar::new();

        assert!(storefront.add_item(&mut jar, Some("9-9")).await.unwrap().is_none());
        assert!(!jar.has_changes());

        let cart = storefront.add_item(&mut jar, Some("3-1")).await.unwrap().unwrap();
        let mut jar = CookieJar::from_headers(&request_from(&jar));
        let generation = storefront.revalidator().generation(CacheTag::Cart);

        let unchanged = storefront.add_item(&mut jar, Some("9-9")).await.unwrap().unwrap();
        assert_eq!(unchanged, cart);
        assert!(!jar.has_changes());
        assert!(storefront.revalidator().is_fresh(CacheTag::Cart, generation));
    }

    #[tokio::test]
    async fn test_update_without_cart() {
        let storefront = cookie_storefront();
        let mut jar = CookieJar::new();
        assert!(storefront.update_item(&mut jar, "line-1", 2).await.unwrap().is_none());
        assert!(!jar.has_changes());
    }

    #[tokio::test]
    async fn test_update_zero_removes_exactly_one_line() {
        let storefront = cookie_storefront();
        let mut jar = CookieJar::new();
        storefront.add_item(&mut jar, Some("1-1")).await.unwrap();
        let cart = storefront.add_item(&mut jar, Some("3-1")).await.unwrap().unwrap();
        assert_eq!(cart.lines.len(), 2);

        let cart = storefront.update_item(&mut jar, "missing", 0).await.unwrap().unwrap();
        assert_eq!(cart.lines.len(), 2);

        let cart = storefront.update_item(&mut jar, "3-1", 0).await.unwrap().unwrap();
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].merchandise.id.as_str(), "1-1");
    }

    #[tokio::test]
    async fn test_mutations_revalidate_cart_tag() {
        let storefront = cookie_storefront();
        let mut jar = CookieJar::new();
        let seen = storefront.revalidator().generation(CacheTag::Cart);

        storefront.add_item(&mut jar, Some("1-1")).await.unwrap();
        assert!(!storefront.revalidator().is_fresh(CacheTag::Cart, seen));
        assert_eq!(storefront.revalidator().generation(CacheTag::Products), 0);
    }

    #[tokio::test]
    async fn test_create_order_without_cart() {
        let storefront = cookie_storefront();
        let mut jar = CookieJar::new();

        assert!(storefront.create_order(&mut jar).await.unwrap().is_none());
        assert!(!jar.has_changes());
        assert!(storefront.orders().is_empty());
    }

    #[tokio::test]
    async fn test_create_order_with_empty_cart() {
        let storefront = cookie_storefront();
        let mut jar = CookieJar::new();
        storefront.add_item(&mut jar, Some("1-1")).await.unwrap();
        storefront.update_item(&mut jar, "1-1", 0).await.unwrap();

        let mut jar = CookieJar::from_headers(&request_from(&jar));
        assert!(storefront.create_order(&mut jar).await.unwrap().is_none());
        assert!(!jar.has_changes());
    }

    #[tokio::test]
    async fn test_create_order_clears_cart() {
        for storefront in [cookie_storefront(), session_storefront()] {
            let mut jar = CookieJar::new();
            storefront.add_item(&mut jar, Some("1-1")).await.unwrap();
            let cart = storefront.add_item(&mut jar, Some("2-1")).await.unwrap().unwrap();

            let order = storefront.create_order(&mut jar).await.unwrap().unwrap();
            assert_eq!(order.total_price, cart.cost.total_amount);
            assert_eq!(order.total_price.display_amount(), "75.00");
            assert_eq!(order.line_items, cart.lines);

            assert!(storefront.get_cart(&jar).await.unwrap().is_none());
            assert_eq!(storefront.orders().len(), 1);
        }
    }

    #[tokio::test]
    async fn test_cookie_headers_roundtrip() {
        let storefront = cookie_storefront();

        let mut jar = CookieJar::new();
        storefront.add_item(&mut jar, Some("3-1")).await.unwrap();
        let response = jar.set_cookie_headers().unwrap();
        let set_cookie = response.get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(set_cookie.starts_with("cart="));
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("SameSite=Lax"));
        assert!(set_cookie.contains("Max-Age=2592000"));

        let mut browser = CookieJar::new();
        browser.apply_set_cookie(&response);
        let jar = CookieJar::from_headers(&browser.request_headers().unwrap());
        let cart = storefront.get_cart(&jar).await.unwrap().unwrap();
        assert_eq!(cart.total_quantity, 1);
    }

    #[tokio::test]
    async fn test_malformed_cookie_is_no_cart() {
        let storefront = cookie_storefront();
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("cart=%7Bnot-json"));

        let jar = CookieJar::from_headers(&headers);
        assert!(storefront.get_cart(&jar).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unreadable_session_cart_starts_over() {
        let cache = Cache::in_memory();
        let mut config = StorefrontConfig::default();
        config.persistence.mode = PersistenceMode::Session;
        let storefront = Storefront::builder(config)
            .with_session_cache(cache.clone())
            .build();

        let mut jar = CookieJar::new();
        storefront.add_item(&mut jar, Some("1-1")).await.unwrap();
        let session = jar.get("cart").unwrap().to_string();
        cache
            .set(&format!("session:{}", session), &serde_json::json!({"garbage": true}))
            .await
            .unwrap();

        let mut jar = CookieJar::from_headers(&request_from(&jar));
        assert!(storefront.get_cart(&jar).await.unwrap().is_none());

        let cart = storefront.add_item(&mut jar, Some("3-1")).await.unwrap().unwrap();
        assert_eq!(cart.total_quantity, 1);
        assert_eq!(total(&cart), "15.00");
        assert_eq!(storefront.get_cart(&jar).await.unwrap(), Some(cart));
    }

    #[tokio::test]
    async fn test_place_order_success() {
        let storefront = cookie_storefront();
        let mut jar = CookieJar::new();
        storefront.add_item(&mut jar, Some("1-2")).await.unwrap();

        let mut flow = CheckoutFlow::new();
        let state = storefront.place_order(&mut jar, &mut flow).await.unwrap();
        assert!(matches!(state, CheckoutState::Success(_)));
        assert_eq!(flow.redirect(), Some("/"));

        let cart = storefront.get_cart(&jar).await.unwrap();
        assert_eq!(flow.view(cart.as_ref()), CheckoutView::Confirmation);
    }

    #[tokio::test]
    async fn test_place_order_without_cart_fails() {
        let storefront = cookie_storefront();
        let mut jar = CookieJar::new();

        let mut flow = CheckoutFlow::new();
        let state = storefront.place_order(&mut jar, &mut flow).await.unwrap();
        assert!(matches!(state, CheckoutState::Failed(_)));
        assert!(flow.redirect().is_none());

        flow.retry().unwrap();
        storefront.add_item(&mut jar, Some("3-1")).await.unwrap();
        let state = storefront.place_order(&mut jar, &mut flow).await.unwrap();
        assert!(matches!(state, CheckoutState::Success(_)));
    }

    #[tokio::test]
    async fn test_place_order_twice_is_rejected() {
        let storefront = cookie_storefront();
        let mut jar = CookieJar::new();
        storefront.add_item(&mut jar, Some("3-1")).await.unwrap();

        let mut flow = CheckoutFlow::new();
        storefront.place_order(&mut jar, &mut flow).await.unwrap();
        assert!(storefront.place_order(&mut jar, &mut flow).await.is_err());
        assert_eq!(storefront.orders().len(), 1);
    }

    fn request_from(jar: &CookieJar) -> HeaderMap {
        jar.request_headers().unwrap()
    }
}
