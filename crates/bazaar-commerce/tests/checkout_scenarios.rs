//! End-to-end checkout scenarios: store, pricing, validation and submission.

use bazaar_commerce::prelude::*;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct Toasts(Mutex<Vec<String>>);

impl Notifier for Toasts {
    fn success(&self, message: &str) {
        self.0.lock().unwrap().push(format!("ok: {message}"));
    }
    fn error(&self, message: &str) {
        self.0.lock().unwrap().push(format!("error: {message}"));
    }
}

#[derive(Default)]
struct History(Mutex<Vec<Route>>);

impl Navigator for History {
    fn navigate(&self, route: Route) {
        self.0.lock().unwrap().push(route);
    }
}

fn bdt(major: i64) -> Money {
    Money::from_major(major, Currency::BDT)
}

fn customer() -> CheckoutForm {
    CheckoutForm::new()
        .name("Nusrat Jahan")
        .phone("01712345678")
        .address("Road 27, Banani")
        .delivery_area(DeliveryArea::InsideDhaka)
}

fn submitter() -> (OrderSubmitter, Arc<Toasts>, Arc<History>) {
    let toasts = Arc::new(Toasts::default());
    let history = Arc::new(History::default());
    let submitter = OrderSubmitter::new(toasts.clone(), history.clone());
    (submitter, toasts, history)
}

#[test]
fn test_cart_cod_inside_dhaka_totals() {
    let mut store = LineItemStore::new(Currency::BDT);
    store
        .add_item(AddItem::new("p-1", "Kurti", bdt(500)).quantity(2))
        .unwrap();

    let pricing = pricing::calculate(
        store.effective_items(),
        Some(DeliveryArea::InsideDhaka),
        PaymentMethod::Cod,
        store.currency,
    )
    .unwrap();

    assert_eq!(pricing.subtotal, bdt(1000));
    assert_eq!(pricing.delivery_charge, bdt(60));
    assert_eq!(pricing.grand_total, bdt(1060));
}

#[test]
fn test_preorder_bkash_totals() {
    let mut store = LineItemStore::new(Currency::BDT);
    store
        .set_preorder(PreorderRequest::new("p-9", "Jamdani", bdt(1000), 1))
        .unwrap();

    let form = customer().payment(PaymentMethod::Bkash).transaction_id("TXN1");
    assert_eq!(validate(&form, store.effective_items()), Ok(()));

    let pricing = pricing::calculate(
        store.effective_items(),
        form.delivery_area,
        form.payment_method,
        store.currency,
    )
    .unwrap();

    assert_eq!(pricing.subtotal, bdt(200));
    assert_eq!(pricing.delivery_charge, bdt(0));
    assert_eq!(pricing.grand_total, bdt(200));
}

#[test]
fn test_grand_total_is_subtotal_plus_delivery() {
    let mut store = LineItemStore::new(Currency::BDT);
    store.add_item(AddItem::new("p-1", "Kurti", bdt(750))).unwrap();
    store
        .add_item(AddItem::new("p-2", "Orna", Money::new(12_550, Currency::BDT)).quantity(3))
        .unwrap();

    for area in [DeliveryArea::InsideDhaka, DeliveryArea::OutsideDhaka] {
        for payment in [PaymentMethod::Cod, PaymentMethod::Bkash, PaymentMethod::Nagad] {
            let pricing =
                pricing::calculate(store.effective_items(), Some(area), payment, store.currency)
                    .unwrap();
            assert_eq!(
                pricing.grand_total,
                pricing.subtotal.try_add(&pricing.delivery_charge).unwrap()
            );
            assert!(!pricing.grand_total.is_negative());
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_empty_name_blocks_submission() {
    let (mut submitter, toasts, history) = submitter();
    let mut store = LineItemStore::new(Currency::BDT);
    store.add_item(AddItem::new("p-1", "Kurti", bdt(500))).unwrap();
    let before = store.clone();

    let err = submitter
        .submit(&mut store, &customer().name(""))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CommerceError::Validation(ValidationError::NameRequired)
    ));
    assert_eq!(err.to_string(), "Name is required");
    assert_eq!(store, before);
    assert_eq!(submitter.state(), SubmissionState::Idle);
    assert_eq!(*toasts.0.lock().unwrap(), vec!["error: Name is required"]);
    assert!(history.0.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_empty_store_blocks_submission() {
    let (mut submitter, toasts, _) = submitter();
    let mut store = LineItemStore::new(Currency::BDT);

    let err = submitter.submit(&mut store, &customer()).await.unwrap_err();

    assert_eq!(err.to_string(), "Your cart is empty");
    assert_eq!(*toasts.0.lock().unwrap(), vec!["error: Your cart is empty"]);
}

#[tokio::test(start_paused = true)]
async fn test_success_clears_store_and_redirects_after_delay() {
    let (submitter, toasts, history) = submitter();
    let mut submitter = submitter.with_config(SubmissionConfig {
        submit_delay: Duration::from_secs(2),
        redirect_delay: Duration::from_secs(2),
    });

    let mut store = LineItemStore::new(Currency::BDT);
    store.add_item(AddItem::new("p-1", "Kurti", bdt(500))).unwrap();
    store
        .set_preorder(PreorderRequest::new("p-9", "Jamdani", "1000", 1))
        .unwrap();

    let started = tokio::time::Instant::now();
    let payload = submitter
        .submit(&mut store, &customer().payment(PaymentMethod::Nagad).transaction_id("NG-77"))
        .await
        .unwrap();

    assert!(started.elapsed() >= Duration::from_secs(4));
    assert!(store.cart().is_empty());
    assert!(store.preorder().is_none());
    assert_eq!(submitter.state(), SubmissionState::Success);
    assert_eq!(*history.0.lock().unwrap(), vec![Route::OrderConfirmation]);
    assert_eq!(
        *toasts.0.lock().unwrap(),
        vec!["ok: Order placed successfully!"]
    );

    assert!(payload.is_preorder);
    assert_eq!(payload.status, OrderStatus::Pending);
    assert_eq!(payload.total_amount, bdt(200));
    assert_eq!(payload.transaction_id.as_deref(), Some("NG-77"));
}

#[tokio::test(start_paused = true)]
async fn test_resubmission_after_success_runs_full_flow() {
    let (mut submitter, toasts, _) = submitter();
    let mut store = LineItemStore::new(Currency::BDT);
    store.add_item(AddItem::new("p-1", "Kurti", bdt(500))).unwrap();

    submitter.submit(&mut store, &customer()).await.unwrap();
    let err = submitter.submit(&mut store, &customer()).await.unwrap_err();

    assert_eq!(err.to_string(), "Your cart is empty");
    assert_eq!(submitter.state(), SubmissionState::Idle);
    assert_eq!(toasts.0.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_product_page_to_cart() {
    let catalog = StaticCatalog::from_json(
        r#"{
            "products": [
                {
                    "_id": "p-1",
                    "name": "Tangail Saree",
                    "price": "3500",
                    "category_id": "women",
                    "total_stock": 4,
                    "images": [{ "image": { "secure_url": "https://cdn.example/saree.jpg" } }],
                    "variantsId": [
                        { "_id": "v-red", "name": "Red", "offer_price": "3200", "selling_price": "3500", "stock": 2 }
                    ]
                },
                { "_id": "p-2", "name": "Jamdani", "price": 9000, "pre_order": 1, "category_id": "women" }
            ],
            "categories": [{ "_id": "women", "name": "Women" }],
            "business": { "name": "Bazaar" }
        }"#,
    )
    .unwrap();

    let page = load_product_page(&catalog, &ProductId::new("p-1")).await.unwrap();
    assert_eq!(page.related.len(), 1);

    let product = &page.product;
    let variant = product.default_variant();
    let mut selector = QuantitySelector::new(product.available_stock(variant));
    selector.increment();
    selector.increment();
    assert_eq!(selector.count(), 2);

    let mut store = LineItemStore::new(Currency::BDT);
    store.add_product(product, variant, selector.count()).unwrap();

    let line = &store.cart()[0];
    assert_eq!(line.unit_price, bdt(3200));
    assert_eq!(line.variant_name.as_deref(), Some("Red"));
    assert_eq!(line.image.as_deref(), Some("https://cdn.example/saree.jpg"));

    let jamdani = &page.related[0];
    assert!(matches!(
        store.add_product(jamdani, None, 1),
        Err(CommerceError::PreorderOnly(_))
    ));
}
