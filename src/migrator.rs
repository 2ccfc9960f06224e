use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_catalog_tables::Migration),
            Box::new(m20240101_000002_create_quotation_template_tables::Migration),
            Box::new(m20240101_000003_create_sale_order_tables::Migration),
        ]
    }
}

mod m20240101_000001_create_catalog_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_catalog_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Customers::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Customers::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Customers::Name).string().not_null())
                        .col(ColumnDef::new(Customers::Email).string().null())
                        .col(ColumnDef::new(Customers::Lang).string_len(16).null())
                        .col(
                            ColumnDef::new(Customers::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Customers::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Products::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Products::Name).string().not_null())
                        .col(
                            ColumnDef::new(Products::ListPrice)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Products::UomId).uuid().null())
                        .col(ColumnDef::new(Products::QuotationDescription).text().null())
                        .col(
                            ColumnDef::new(Products::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Products::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Products::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Translations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Translations::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Translations::ResModel).string().not_null())
                        .col(ColumnDef::new(Translations::ResId).uuid().not_null())
                        .col(ColumnDef::new(Translations::Field).string().not_null())
                        .col(ColumnDef::new(Translations::Lang).string_len(16).not_null())
                        .col(ColumnDef::new(Translations::Value).text().not_null())
                        .to_owned(),
                )
                .await?;

            // Upserts target this key.
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .unique()
                        .name("idx_translations_record_field_lang")
                        .table(Translations::Table)
                        .col(Translations::ResModel)
                        .col(Translations::ResId)
                        .col(Translations::Field)
                        .col(Translations::Lang)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Translations::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Customers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Customers {
        Table,
        Id,
        Name,
        Email,
        Lang,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Products {
        Table,
        Id,
        Name,
        ListPrice,
        UomId,
        QuotationDescription,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Translations {
        Table,
        Id,
        ResModel,
        ResId,
        Field,
        Lang,
        Value,
    }
}

mod m20240101_000002_create_quotation_template_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_quotation_template_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(SaleOrderTemplates::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SaleOrderTemplates::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SaleOrderTemplates::Name).string().not_null())
                        .col(
                            ColumnDef::new(SaleOrderTemplates::WebsiteDescription)
                                .text()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(SaleOrderTemplates::NumberOfDays)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(SaleOrderTemplates::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(SaleOrderTemplates::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SaleOrderTemplates::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(SaleOrderTemplateLines::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SaleOrderTemplateLines::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SaleOrderTemplateLines::TemplateId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SaleOrderTemplateLines::Sequence)
                                .integer()
                                .not_null()
                                .default(10),
                        )
                        .col(ColumnDef::new(SaleOrderTemplateLines::ProductId).uuid().null())
                        .col(ColumnDef::new(SaleOrderTemplateLines::Name).string().not_null())
                        .col(
                            ColumnDef::new(SaleOrderTemplateLines::ProductUomQty)
                                .decimal()
                                .not_null()
                                .default(1),
                        )
                        .col(ColumnDef::new(SaleOrderTemplateLines::UomId).uuid().null())
                        .col(
                            ColumnDef::new(SaleOrderTemplateLines::WebsiteDescription)
                                .text()
                                .null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_sale_order_template_lines_template_id")
                                .from(SaleOrderTemplateLines::Table, SaleOrderTemplateLines::TemplateId)
                                .to(SaleOrderTemplates::Table, SaleOrderTemplates::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_sale_order_template_lines_product_id")
                                .from(SaleOrderTemplateLines::Table, SaleOrderTemplateLines::ProductId)
                                .to(Products::Table, Products::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(SaleOrderTemplateOptions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SaleOrderTemplateOptions::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SaleOrderTemplateOptions::TemplateId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SaleOrderTemplateOptions::Sequence)
                                .integer()
                                .not_null()
                                .default(10),
                        )
                        .col(
                            ColumnDef::new(SaleOrderTemplateOptions::ProductId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SaleOrderTemplateOptions::Name).string().not_null())
                        .col(
                            ColumnDef::new(SaleOrderTemplateOptions::Quantity)
                                .decimal()
                                .not_null()
                                .default(1),
                        )
                        .col(ColumnDef::new(SaleOrderTemplateOptions::UomId).uuid().null())
                        .col(
                            ColumnDef::new(SaleOrderTemplateOptions::WebsiteDescription)
                                .text()
                                .null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_sale_order_template_options_template_id")
                                .from(
                                    SaleOrderTemplateOptions::Table,
                                    SaleOrderTemplateOptions::TemplateId,
                                )
                                .to(SaleOrderTemplates::Table, SaleOrderTemplates::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_sale_order_template_options_product_id")
                                .from(
                                    SaleOrderTemplateOptions::Table,
                                    SaleOrderTemplateOptions::ProductId,
                                )
                                .to(Products::Table, Products::Id),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(SaleOrderTemplateOptions::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(SaleOrderTemplateLines::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(SaleOrderTemplates::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum SaleOrderTemplates {
        Table,
        Id,
        Name,
        WebsiteDescription,
        NumberOfDays,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum SaleOrderTemplateLines {
        Table,
        Id,
        TemplateId,
        Sequence,
        ProductId,
        Name,
        ProductUomQty,
        UomId,
        WebsiteDescription,
    }

    #[derive(DeriveIden)]
    enum SaleOrderTemplateOptions {
        Table,
        Id,
        TemplateId,
        Sequence,
        ProductId,
        Name,
        Quantity,
        UomId,
        WebsiteDescription,
    }

    #[derive(DeriveIden)]
    enum Products {
        Table,
        Id,
    }
}

mod m20240101_000003_create_sale_order_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_sale_order_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(SaleOrders::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(SaleOrders::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(SaleOrders::Name).string_len(64).not_null())
                        .col(ColumnDef::new(SaleOrders::CustomerId).uuid().not_null())
                        .col(ColumnDef::new(SaleOrders::TemplateId).uuid().null())
                        .col(
                            ColumnDef::new(SaleOrders::State)
                                .string_len(16)
                                .not_null()
                                .default("draft"),
                        )
                        .col(ColumnDef::new(SaleOrders::WebsiteDescription).text().null())
                        .col(ColumnDef::new(SaleOrders::ValidityDate).date().null())
                        .col(
                            ColumnDef::new(SaleOrders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SaleOrders::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(SaleOrders::Version)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_sale_orders_customer_id")
                                .from(SaleOrders::Table, SaleOrders::CustomerId)
                                .to(Customers::Table, Customers::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_sale_orders_template_id")
                                .from(SaleOrders::Table, SaleOrders::TemplateId)
                                .to(SaleOrderTemplates::Table, SaleOrderTemplates::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_sale_orders_customer_id")
                        .table(SaleOrders::Table)
                        .col(SaleOrders::CustomerId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(SaleOrderLines::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SaleOrderLines::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SaleOrderLines::OrderId).uuid().not_null())
                        .col(
                            ColumnDef::new(SaleOrderLines::Sequence)
                                .integer()
                                .not_null()
                                .default(10),
                        )
                        .col(ColumnDef::new(SaleOrderLines::ProductId).uuid().null())
                        .col(ColumnDef::new(SaleOrderLines::Name).string().not_null())
                        .col(
                            ColumnDef::new(SaleOrderLines::ProductUomQty)
                                .decimal()
                                .not_null()
                                .default(1),
                        )
                        .col(ColumnDef::new(SaleOrderLines::UomId).uuid().null())
                        .col(
                            ColumnDef::new(SaleOrderLines::PriceUnit)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(SaleOrderLines::Discount)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(SaleOrderLines::WebsiteDescription).text().null())
                        .col(
                            ColumnDef::new(SaleOrderLines::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SaleOrderLines::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_sale_order_lines_order_id")
                                .from(SaleOrderLines::Table, SaleOrderLines::OrderId)
                                .to(SaleOrders::Table, SaleOrders::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_sale_order_lines_product_id")
                                .from(SaleOrderLines::Table, SaleOrderLines::ProductId)
                                .to(Products::Table, Products::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_sale_order_lines_order_id")
                        .table(SaleOrderLines::Table)
                        .col(SaleOrderLines::OrderId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(SaleOrderOptions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SaleOrderOptions::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SaleOrderOptions::OrderId).uuid().not_null())
                        .col(
                            ColumnDef::new(SaleOrderOptions::Sequence)
                                .integer()
                                .not_null()
                                .default(10),
                        )
                        .col(ColumnDef::new(SaleOrderOptions::ProductId).uuid().null())
                        .col(ColumnDef::new(SaleOrderOptions::UomId).uuid().null())
                        .col(ColumnDef::new(SaleOrderOptions::Name).string().not_null())
                        .col(
                            ColumnDef::new(SaleOrderOptions::Quantity)
                                .decimal()
                                .not_null()
                                .default(1),
                        )
                        .col(
                            ColumnDef::new(SaleOrderOptions::PriceUnit)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(SaleOrderOptions::Discount)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(SaleOrderOptions::LineId).uuid().null())
                        .col(ColumnDef::new(SaleOrderOptions::WebsiteDescription).text().null())
                        .col(
                            ColumnDef::new(SaleOrderOptions::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SaleOrderOptions::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_sale_order_options_order_id")
                                .from(SaleOrderOptions::Table, SaleOrderOptions::OrderId)
                                .to(SaleOrders::Table, SaleOrders::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_sale_order_options_product_id")
                                .from(SaleOrderOptions::Table, SaleOrderOptions::ProductId)
                                .to(Products::Table, Products::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_sale_order_options_line_id")
                                .from(SaleOrderOptions::Table, SaleOrderOptions::LineId)
                                .to(SaleOrderLines::Table, SaleOrderLines::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_sale_order_options_order_id")
                        .table(SaleOrderOptions::Table)
                        .col(SaleOrderOptions::OrderId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(SaleOrderOptions::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(SaleOrderLines::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(SaleOrders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum SaleOrders {
        Table,
        Id,
        Name,
        CustomerId,
        TemplateId,
        State,
        WebsiteDescription,
        ValidityDate,
        CreatedAt,
        UpdatedAt,
        Version,
    }

    #[derive(DeriveIden)]
    enum SaleOrderLines {
        Table,
        Id,
        OrderId,
        Sequence,
        ProductId,
        Name,
        ProductUomQty,
        UomId,
        PriceUnit,
        Discount,
        WebsiteDescription,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum SaleOrderOptions {
        Table,
        Id,
        OrderId,
        Sequence,
        ProductId,
        UomId,
        Name,
        Quantity,
        PriceUnit,
        Discount,
        LineId,
        WebsiteDescription,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Customers {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Products {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum SaleOrderTemplates {
        Table,
        Id,
    }
}
