use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use domain::{
    Customer, CustomerEvent, EventDispatcher, EventEnvelope, EventHandler, HandlerError, Money,
    Order, OrderItem,
};

fn bench_order_total(c: &mut Criterion) {
    let items: Vec<OrderItem> = (1..=100)
        .map(|i| {
            OrderItem::new(
                i.to_string(),
                format!("Product {i}"),
                Money::from_cents(1000),
                "SKU-001",
                2,
            )
            .unwrap()
        })
        .collect();
    let order = Order::new("123", "123", items).unwrap();

    c.bench_function("domain/order_total_100_items", |b| b.iter(|| order.total()));
}

struct Nop;

impl EventHandler<CustomerEvent> for Nop {
    fn handle(&self, _event: &EventEnvelope<CustomerEvent>) -> Result<(), HandlerError> {
        Ok(())
    }
}

fn bench_customer_created_dispatch(c: &mut Criterion) {
    let events = EventDispatcher::new();
    for _ in 0..10 {
        events.register("CustomerCreated", Arc::new(Nop));
    }

    c.bench_function("domain/create_customer_10_handlers", |b| {
        b.iter(|| Customer::new("1", "Customer 1", &events).unwrap())
    });
}

criterion_group!(benches, bench_order_total, bench_customer_created_dispatch);
criterion_main!(benches);
