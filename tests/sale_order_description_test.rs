mod common;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use quotation_builder::{
    entities::{
        sale_order::SaleOrderState,
        sale_order_template, sale_order_template_line,
        translation::FIELD_WEBSITE_DESCRIPTION,
    },
    models::{Patch, SaleOrderValues},
    ServiceError,
};

use common::TestDb;

#[tokio::test]
async fn order_without_template_keeps_manual_description() {
    let db = TestDb::new().await;
    let customer = db.customer(None).await;
    let order = db.order(customer.id, None).await;
    assert_eq!(order.website_description, None);

    let order = db
        .services
        .orders
        .write_order(
            order.id,
            SaleOrderValues {
                website_description: Patch::Value("<p>Hand written</p>".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    db.services
        .orders
        .recompute_website_description(&[order.id])
        .await
        .unwrap();
    // Changing the customer queues a recompute that skips template-less orders.
    let other = db.customer(Some("fr_FR")).await;
    let order = db
        .services
        .orders
        .write_order(
            order.id,
            SaleOrderValues {
                customer_id: Patch::Value(other.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(order.website_description.as_deref(), Some("<p>Hand written</p>"));
}

#[tokio::test]
async fn creating_with_template_copies_its_description() {
    let db = TestDb::new().await;
    let customer = db.customer(None).await;
    let template = db.template(Some("<h1>Our offer</h1>"), 0).await;

    let order = db.order(customer.id, Some(template.id)).await;

    assert_eq!(order.template_id, Some(template.id));
    assert_eq!(order.website_description.as_deref(), Some("<h1>Our offer</h1>"));
}

#[tokio::test]
async fn template_description_is_resolved_in_customer_language() {
    let db = TestDb::new().await;
    let customer = db.customer(Some("fr_FR")).await;
    let template = db.template(Some("<h1>Our offer</h1>"), 0).await;
    db.translate::<sale_order_template::Entity>(
        template.id,
        FIELD_WEBSITE_DESCRIPTION,
        "fr_FR",
        "<h1>Notre offre</h1>",
    )
    .await;

    let order = db.order(customer.id, Some(template.id)).await;
    assert_eq!(order.website_description.as_deref(), Some("<h1>Notre offre</h1>"));

    // Switching to a customer without a translation falls back to the source text.
    let english = db.customer(Some("en_US")).await;
    let order = db
        .services
        .orders
        .write_order(
            order.id,
            SaleOrderValues {
                customer_id: Patch::Value(english.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(order.website_description.as_deref(), Some("<h1>Our offer</h1>"));
}

#[tokio::test]
async fn explicit_description_wins_over_template_in_same_write() {
    let db = TestDb::new().await;
    let customer = db.customer(None).await;
    let first = db.template(Some("<p>First</p>"), 0).await;
    let second = db.template(Some("<p>Second</p>"), 0).await;
    let order = db.order(customer.id, Some(first.id)).await;

    let order = db
        .services
        .orders
        .write_order(
            order.id,
            SaleOrderValues {
                template_id: Patch::Value(second.id),
                website_description: Patch::Value("<p>Custom</p>".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(order.template_id, Some(second.id));
    assert_eq!(order.website_description.as_deref(), Some("<p>Custom</p>"));

    // A later dependency change recomputes again.
    let order = db
        .services
        .orders
        .write_order(
            order.id,
            SaleOrderValues {
                template_id: Patch::Value(first.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(order.website_description.as_deref(), Some("<p>First</p>"));
}

#[tokio::test]
async fn untracked_writes_do_not_recompute() {
    let db = TestDb::new().await;
    let customer = db.customer(None).await;
    let template = db.template(Some("<p>Template</p>"), 0).await;
    let order = db.order(customer.id, Some(template.id)).await;

    let order = db
        .services
        .orders
        .write_order(
            order.id,
            SaleOrderValues {
                website_description: Patch::Value("<p>Edited</p>".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let order = db
        .services
        .orders
        .write_order(
            order.id,
            SaleOrderValues {
                name: Patch::Value("S00043".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(order.name, "S00043");
    assert_eq!(order.website_description.as_deref(), Some("<p>Edited</p>"));
    assert_eq!(order.version, 3);
}

#[tokio::test]
async fn recompute_is_idempotent() {
    let db = TestDb::new().await;
    let customer = db.customer(None).await;
    let template = db.template(Some("<p>Stable</p>"), 0).await;
    let order = db.order(customer.id, Some(template.id)).await;

    db.services
        .orders
        .recompute_website_description(&[order.id])
        .await
        .unwrap();
    let first = db.services.orders.get_order(order.id).await.unwrap().unwrap();
    db.services
        .orders
        .recompute_website_description(&[order.id])
        .await
        .unwrap();
    let second = db.services.orders.get_order(order.id).await.unwrap().unwrap();

    assert_eq!(first.website_description, second.website_description);
    assert_eq!(second.website_description.as_deref(), Some("<p>Stable</p>"));
}

#[tokio::test]
async fn apply_template_rebuilds_lines_and_options_with_descriptions() {
    let db = TestDb::new().await;
    let customer = db.customer(Some("fr_FR")).await;
    let chair = db.product("Chair", Some("<p>Chair from product</p>")).await;
    let desk = db.product("Desk", Some("<p>Desk from product</p>")).await;
    let lamp = db.product("Lamp", Some("<p>Lamp from product</p>")).await;

    let template = db.template(Some("<p>Template</p>"), 15).await;
    let described = db
        .template_line(template.id, 1, Some(&chair), Some("<p>Chair from template</p>"))
        .await;
    db.template_line(template.id, 2, Some(&desk), None).await;
    db.template_option(template.id, 1, &lamp, Some("<p>Lamp from template</p>"))
        .await;
    db.translate::<sale_order_template_line::Entity>(
        described.id,
        FIELD_WEBSITE_DESCRIPTION,
        "fr_FR",
        "<p>Chaise</p>",
    )
    .await;

    let order = db.order(customer.id, None).await;
    db.services
        .lines
        .create_line(quotation_builder::SaleOrderLineValues {
            order_id: Patch::Value(order.id),
            name: Patch::Value("Stale line".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let order = db
        .services
        .orders
        .apply_template(order.id, template.id)
        .await
        .unwrap();

    assert_eq!(order.template_id, Some(template.id));
    assert_eq!(order.website_description.as_deref(), Some("<p>Template</p>"));
    assert_eq!(
        order.validity_date,
        Some(Utc::now().date_naive() + Duration::days(15))
    );

    let lines = db.services.lines.lines_for_order(order.id).await.unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].product_id, Some(chair.id));
    assert_eq!(lines[0].website_description.as_deref(), Some("<p>Chaise</p>"));
    assert_eq!(lines[1].product_id, Some(desk.id));
    assert_eq!(
        lines[1].website_description.as_deref(),
        Some("<p>Desk from product</p>")
    );

    let options = db.services.options.options_for_order(order.id).await.unwrap();
    assert_eq!(options.len(), 1);
    assert_eq!(options[0].product_id, Some(lamp.id));
    assert_eq!(
        options[0].website_description.as_deref(),
        Some("<p>Lamp from template</p>")
    );
}

#[tokio::test]
async fn apply_template_without_validity_clears_the_date() {
    let db = TestDb::new().await;
    let customer = db.customer(None).await;
    let template = db.template(None, 0).await;
    let order = db.order(customer.id, None).await;
    db.services
        .orders
        .write_order(
            order.id,
            SaleOrderValues {
                validity_date: Patch::Value(Utc::now().date_naive()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let order = db
        .services
        .orders
        .apply_template(order.id, template.id)
        .await
        .unwrap();
    assert_eq!(order.validity_date, None);
    assert_eq!(order.website_description, None);
}

#[tokio::test]
async fn apply_template_refuses_confirmed_orders() {
    let db = TestDb::new().await;
    let customer = db.customer(None).await;
    let template = db.template(Some("<p>Template</p>"), 0).await;
    let order = db.order(customer.id, None).await;
    let order = db.set_state(order, SaleOrderState::Sale).await;

    let result = db.services.orders.apply_template(order.id, template.id).await;
    assert_matches!(result, Err(ServiceError::InvalidOperation(_)));

    let unchanged = db.services.orders.get_order(order.id).await.unwrap().unwrap();
    assert_eq!(unchanged.template_id, None);
}

#[tokio::test]
async fn missing_records_are_reported() {
    let db = TestDb::new().await;
    let customer = db.customer(None).await;
    let order = db.order(customer.id, None).await;

    let result = db
        .services
        .orders
        .apply_template(order.id, uuid::Uuid::new_v4())
        .await;
    assert_matches!(result, Err(ServiceError::NotFound(_)));

    let result = db
        .services
        .orders
        .create_order(SaleOrderValues {
            name: Patch::Value("S1".to_string()),
            customer_id: Patch::Value(uuid::Uuid::new_v4()),
            ..Default::default()
        })
        .await;
    assert_matches!(result, Err(ServiceError::NotFound(_)));

    let result = db
        .services
        .orders
        .create_order(SaleOrderValues {
            customer_id: Patch::Value(customer.id),
            ..Default::default()
        })
        .await;
    assert_matches!(result, Err(ServiceError::ValidationError(_)));
}
