mod common;

use assert_matches::assert_matches;
use quotation_builder::{
    entities::{product, translation::FIELD_QUOTATION_DESCRIPTION},
    models::{Patch, SaleOrderLineValues},
    services::sale_order_lines::{inject_quotation_description, SaleOrderLineService},
    ServiceError,
};
use rstest::rstest;
use rust_decimal::Decimal;
use uuid::Uuid;

use common::TestDb;

fn line_values(order_id: Uuid, product_id: Option<Uuid>) -> SaleOrderLineValues {
    SaleOrderLineValues {
        order_id: Patch::Value(order_id),
        product_id: product_id.map_or(Patch::Omitted, Patch::Value),
        ..Default::default()
    }
}

#[tokio::test]
async fn line_with_product_defaults_description_and_fields() {
    let db = TestDb::new().await;
    let customer = db.customer(None).await;
    let order = db.order(customer.id, None).await;
    let product = db.product("Desk", Some("<p>Solid oak desk</p>")).await;

    let line = db
        .services
        .lines
        .create_line(line_values(order.id, Some(product.id)))
        .await
        .unwrap();

    assert_eq!(line.website_description.as_deref(), Some("<p>Solid oak desk</p>"));
    assert_eq!(line.name, "Desk");
    assert_eq!(line.price_unit, Decimal::new(1950, 2));
    assert_eq!(line.product_uom_qty, Decimal::ONE);
}

#[rstest]
#[case::omitted(Patch::Omitted)]
#[case::cleared(Patch::Cleared)]
#[case::empty(Patch::Value(String::new()))]
#[tokio::test]
async fn falsy_description_triggers_the_product_default(#[case] description: Patch<String>) {
    let db = TestDb::new().await;
    let customer = db.customer(None).await;
    let order = db.order(customer.id, None).await;
    let product = db.product("Desk", Some("<p>Solid oak desk</p>")).await;

    let line = db
        .services
        .lines
        .create_line(SaleOrderLineValues {
            website_description: description,
            ..line_values(order.id, Some(product.id))
        })
        .await
        .unwrap();

    assert_eq!(line.website_description.as_deref(), Some("<p>Solid oak desk</p>"));
}

#[tokio::test]
async fn explicit_description_wins_on_create_and_write() {
    let db = TestDb::new().await;
    let customer = db.customer(None).await;
    let order = db.order(customer.id, None).await;
    let desk = db.product("Desk", Some("<p>Desk</p>")).await;
    let chair = db.product("Chair", Some("<p>Chair</p>")).await;

    let line = db
        .services
        .lines
        .create_line(SaleOrderLineValues {
            website_description: Patch::Value("<p>Mine</p>".to_string()),
            ..line_values(order.id, Some(desk.id))
        })
        .await
        .unwrap();
    assert_eq!(line.website_description.as_deref(), Some("<p>Mine</p>"));

    let updated = db
        .services
        .lines
        .write_lines(
            &[line.id],
            SaleOrderLineValues {
                product_id: Patch::Value(chair.id),
                website_description: Patch::Value("<p>Still mine</p>".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated[0].product_id, Some(chair.id));
    assert_eq!(updated[0].website_description.as_deref(), Some("<p>Still mine</p>"));
}

#[tokio::test]
async fn product_change_alone_rederives_description() {
    let db = TestDb::new().await;
    let customer = db.customer(None).await;
    let order = db.order(customer.id, None).await;
    let desk = db.product("Desk", Some("<p>Desk</p>")).await;
    let chair = db.product("Chair", Some("<p>Chair</p>")).await;
    let line = db
        .services
        .lines
        .create_line(line_values(order.id, Some(desk.id)))
        .await
        .unwrap();

    let updated = db
        .services
        .lines
        .write_lines(
            &[line.id],
            SaleOrderLineValues {
                product_id: Patch::Value(chair.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated[0].website_description.as_deref(), Some("<p>Chair</p>"));
    // Name is not re-derived on write.
    assert_eq!(updated[0].name, "Desk");
}

#[tokio::test]
async fn clearing_description_with_product_rederives_it() {
    let db = TestDb::new().await;
    let customer = db.customer(None).await;
    let order = db.order(customer.id, None).await;
    let desk = db.product("Desk", Some("<p>Desk</p>")).await;
    let line = db
        .services
        .lines
        .create_line(SaleOrderLineValues {
            website_description: Patch::Value("<p>Custom</p>".to_string()),
            ..line_values(order.id, Some(desk.id))
        })
        .await
        .unwrap();

    let updated = db
        .services
        .lines
        .write_lines(
            &[line.id],
            SaleOrderLineValues {
                product_id: Patch::Value(desk.id),
                website_description: Patch::Cleared,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated[0].website_description.as_deref(), Some("<p>Desk</p>"));

    // Without a product in the change-set, clearing sticks.
    let updated = db
        .services
        .lines
        .write_lines(
            &[line.id],
            SaleOrderLineValues {
                website_description: Patch::Cleared,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated[0].website_description, None);

    let stored = db.services.lines.get_line(line.id).await.unwrap().unwrap();
    assert_eq!(stored.website_description, None);
    assert_eq!(stored.product_id, Some(desk.id));
}

#[tokio::test]
async fn batch_create_applies_the_default_per_line() {
    let db = TestDb::new().await;
    let customer = db.customer(None).await;
    let order = db.order(customer.id, None).await;
    let desk = db.product("Desk", Some("<p>Desk</p>")).await;
    let chair = db.product("Chair", None).await;

    let lines = db
        .services
        .lines
        .create_lines(vec![
            line_values(order.id, Some(desk.id)),
            line_values(order.id, Some(chair.id)),
            SaleOrderLineValues {
                name: Patch::Value("Delivery notes".to_string()),
                website_description: Patch::Value("<p>Note</p>".to_string()),
                ..line_values(order.id, None)
            },
        ])
        .await
        .unwrap();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0].website_description.as_deref(), Some("<p>Desk</p>"));
    assert_eq!(lines[1].website_description, None);
    assert_eq!(lines[2].website_description.as_deref(), Some("<p>Note</p>"));
}

#[tokio::test]
async fn batch_create_is_all_or_nothing() {
    let db = TestDb::new().await;
    let customer = db.customer(None).await;
    let order = db.order(customer.id, None).await;
    let desk = db.product("Desk", Some("<p>Desk</p>")).await;

    let result = db
        .services
        .lines
        .create_lines(vec![
            line_values(order.id, Some(desk.id)),
            line_values(order.id, Some(Uuid::new_v4())),
        ])
        .await;

    assert_matches!(result, Err(ServiceError::NotFound(_)));
    assert!(db.services.lines.lines_for_order(order.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn line_without_product_or_name_is_rejected() {
    let db = TestDb::new().await;
    let customer = db.customer(None).await;
    let order = db.order(customer.id, None).await;

    let result = db.services.lines.create_line(line_values(order.id, None)).await;
    assert_matches!(result, Err(ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn injection_uses_the_service_language() {
    let db = TestDb::new().await;
    let desk = db.product("Desk", Some("<p>Desk</p>")).await;
    db.translate::<product::Entity>(desk.id, FIELD_QUOTATION_DESCRIPTION, "de_DE", "<p>Schreibtisch</p>")
        .await;

    let values = SaleOrderLineValues {
        product_id: Patch::Value(desk.id),
        ..Default::default()
    };
    let german = inject_quotation_description(&*db.pool, values.clone(), Some("de_DE"))
        .await
        .unwrap();
    let source = inject_quotation_description(&*db.pool, values, None)
        .await
        .unwrap();
    assert_eq!(german.website_description, Patch::Value("<p>Schreibtisch</p>".to_string()));
    assert_eq!(source.website_description, Patch::Value("<p>Desk</p>".to_string()));

    let customer = db.customer(None).await;
    let order = db.order(customer.id, None).await;
    let service = SaleOrderLineService::new(db.pool.clone()).with_lang("de_DE");
    let line = service
        .create_line(line_values(order.id, Some(desk.id)))
        .await
        .unwrap();
    assert_eq!(line.website_description.as_deref(), Some("<p>Schreibtisch</p>"));
}

#[tokio::test]
async fn injection_passes_through_without_product() {
    let db = TestDb::new().await;
    let values = SaleOrderLineValues {
        name: Patch::Value("Section".to_string()),
        ..Default::default()
    };

    let injected = inject_quotation_description(&*db.pool, values.clone(), None)
        .await
        .unwrap();
    assert_eq!(injected, values);
}
