//! In-memory record of placed orders.

use std::sync::RwLock;

use storefront_commerce::checkout::Order;

/// Orders placed during this process. Nothing is persisted.
#[derive(Debug, Default)]
pub struct OrderLog {
    orders: RwLock<Vec<Order>>,
}

impl OrderLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an order.
    pub fn record(&self, order: Order) {
        let mut orders = match self.orders.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        orders.push(order);
    }

    /// All orders, oldest first.
    pub fn all(&self) -> Vec<Order> {
        match self.orders.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Most recent order with an order number. Numbers may repeat.
    pub fn find_by_number(&self, order_number: u32) -> Option<Order> {
        self.all()
            .into_iter()
            .rev()
            .find(|o| o.order_number == order_number)
    }

    pub fn len(&self) -> usize {
        self.all().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_commerce::cart::Cart;
    use storefront_commerce::catalog::seed_products;

    fn order() -> Order {
        let products = seed_products();
        let mug = &products[2];
        let mut cart = Cart::new();
        cart.add_variant(mug, &mug.variants[0]).unwrap();
        Order::from_cart(&cart).unwrap()
    }

    #[test]
    fn test_record_and_find() {
        let log = OrderLog::new();
        assert!(log.is_empty());

        let first = order();
        let second = order();
        log.record(first.clone());
        log.record(second.clone());

        assert_eq!(log.len(), 2);
        assert_eq!(log.all()[0].id, first.id);
        assert_eq!(log.find_by_number(second.order_number).unwrap().id, second.id);
    }
}
