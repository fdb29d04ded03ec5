use sea_orm_migration::prelude::*;

/// Schema of the Product Store database.
pub struct ProductsMigrator;

#[async_trait::async_trait]
impl MigratorTrait for ProductsMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240101_000001_create_products_table::Migration)]
    }
}

/// Schema of the Transaction Service database.
pub struct TransactionsMigrator;

#[async_trait::async_trait]
impl MigratorTrait for TransactionsMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(
            m20240101_000002_create_transactions_table::Migration,
        )]
    }
}

mod m20240101_000001_create_products_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_products_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Products::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Products::Name).string_len(255).not_null())
                        .col(
                            ColumnDef::new(Products::Stock)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Products::Price)
                                .decimal()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Products {
        Table,
        Id,
        Name,
        Stock,
        Price,
    }
}

mod m20240101_000002_create_transactions_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_transactions_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Transactions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Transactions::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Transactions::Timestamp).date_time().not_null())
                        .col(ColumnDef::new(Transactions::Type).string().not_null())
                        .col(ColumnDef::new(Transactions::ProductId).integer().not_null())
                        .col(ColumnDef::new(Transactions::Quantity).integer().not_null())
                        .col(
                            ColumnDef::new(Transactions::UnitPrice)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Transactions::TotalPrice)
                                .decimal()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Transactions::Note).text().null())
                        .to_owned(),
                )
                .await?;

            // History lookups always filter on the product
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_transactions_product_id")
                        .table(Transactions::Table)
                        .col(Transactions::ProductId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Transactions::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Transactions {
        Table,
        Id,
        Timestamp,
        Type,
        ProductId,
        Quantity,
        UnitPrice,
        TotalPrice,
        Note,
    }
}
