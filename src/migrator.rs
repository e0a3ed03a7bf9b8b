use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_products_and_boms::Migration),
            Box::new(m20250301_000002_create_mrp_tags::Migration),
            Box::new(m20250301_000003_create_repair_orders::Migration),
            Box::new(m20250301_000004_create_mrp_productions::Migration),
            Box::new(m20250301_000005_create_quality_triggers::Migration),
        ]
    }
}

mod m20250301_000001_create_products_and_boms {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000001_create_products_and_boms"
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
                        .col(ColumnDef::new(Products::Name).string().not_null())
                        .col(ColumnDef::new(Products::DefaultCode).string().null())
                        .col(
                            ColumnDef::new(Products::Tracking)
                                .string()
                                .not_null()
                                .default("none"),
                        )
                        .col(
                            ColumnDef::new(Products::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Products::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(MrpBoms::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MrpBoms::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(MrpBoms::ProductId).integer().not_null())
                        .col(
                            ColumnDef::new(MrpBoms::ProductQty)
                                .double()
                                .not_null()
                                .default(1.0),
                        )
                        .col(
                            ColumnDef::new(MrpBoms::BomType)
                                .string()
                                .not_null()
                                .default("normal"),
                        )
                        .col(
                            ColumnDef::new(MrpBoms::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MrpBoms::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_mrp_boms_product")
                                .from(MrpBoms::Table, MrpBoms::ProductId)
                                .to(Products::Table, Products::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(MrpBomLines::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MrpBomLines::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(MrpBomLines::BomId).integer().not_null())
                        .col(ColumnDef::new(MrpBomLines::ProductId).integer().not_null())
                        .col(ColumnDef::new(MrpBomLines::ProductQty).double().not_null())
                        .col(
                            ColumnDef::new(MrpBomLines::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MrpBomLines::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_mrp_bom_lines_bom")
                                .from(MrpBomLines::Table, MrpBomLines::BomId)
                                .to(MrpBoms::Table, MrpBoms::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_mrp_bom_lines_product")
                                .from(MrpBomLines::Table, MrpBomLines::ProductId)
                                .to(Products::Table, Products::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_mrp_boms_product_id")
                        .table(MrpBoms::Table)
                        .col(MrpBoms::ProductId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(MrpBomLines::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(MrpBoms::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Products {
        Table,
        Id,
        Name,
        DefaultCode,
        Tracking,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub enum MrpBoms {
        Table,
        Id,
        ProductId,
        ProductQty,
        BomType,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum MrpBomLines {
        Table,
        Id,
        BomId,
        ProductId,
        ProductQty,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250301_000002_create_mrp_tags {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000002_create_mrp_tags"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(MrpTags::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MrpTags::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(MrpTags::Name).string().not_null())
                        .col(ColumnDef::new(MrpTags::ParentId).integer().null())
                        .col(
                            ColumnDef::new(MrpTags::Color)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(MrpTags::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MrpTags::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        // Children survive their parent.
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_mrp_tags_parent")
                                .from(MrpTags::Table, MrpTags::ParentId)
                                .to(MrpTags::Table, MrpTags::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_mrp_tags_parent_id")
                        .table(MrpTags::Table)
                        .col(MrpTags::ParentId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_mrp_tags_name")
                        .table(MrpTags::Table)
                        .col(MrpTags::Name)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(MrpTags::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum MrpTags {
        Table,
        Id,
        Name,
        ParentId,
        Color,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250301_000003_create_repair_orders {
    use super::m20250301_000001_create_products_and_boms::Products;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000003_create_repair_orders"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(RepairOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RepairOrders::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(RepairOrders::Name).string().not_null())
                        .col(ColumnDef::new(RepairOrders::ProductId).integer().not_null())
                        .col(
                            ColumnDef::new(RepairOrders::ProductQty)
                                .double()
                                .not_null()
                                .default(1.0),
                        )
                        .col(
                            ColumnDef::new(RepairOrders::State)
                                .string()
                                .not_null()
                                .default("draft"),
                        )
                        .col(
                            ColumnDef::new(RepairOrders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RepairOrders::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_repair_orders_product")
                                .from(RepairOrders::Table, RepairOrders::ProductId)
                                .to(Products::Table, Products::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(RepairOrders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum RepairOrders {
        Table,
        Id,
        Name,
        ProductId,
        ProductQty,
        State,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250301_000004_create_mrp_productions {
    use super::m20250301_000001_create_products_and_boms::{MrpBoms, Products};
    use super::m20250301_000002_create_mrp_tags::MrpTags;
    use super::m20250301_000003_create_repair_orders::RepairOrders;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000004_create_mrp_productions"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(MrpProductions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MrpProductions::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(MrpProductions::Name).string().not_null())
                        .col(
                            ColumnDef::new(MrpProductions::ProductId)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MrpProductions::BomId).integer().null())
                        .col(
                            ColumnDef::new(MrpProductions::ProductQty)
                                .double()
                                .not_null()
                                .default(1.0),
                        )
                        .col(
                            ColumnDef::new(MrpProductions::State)
                                .string()
                                .not_null()
                                .default("draft"),
                        )
                        .col(ColumnDef::new(MrpProductions::RepairId).integer().null())
                        .col(
                            ColumnDef::new(MrpProductions::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MrpProductions::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_mrp_productions_product")
                                .from(MrpProductions::Table, MrpProductions::ProductId)
                                .to(Products::Table, Products::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_mrp_productions_bom")
                                .from(MrpProductions::Table, MrpProductions::BomId)
                                .to(MrpBoms::Table, MrpBoms::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_mrp_productions_repair")
                                .from(MrpProductions::Table, MrpProductions::RepairId)
                                .to(RepairOrders::Table, RepairOrders::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_mrp_productions_repair_id")
                        .table(MrpProductions::Table)
                        .col(MrpProductions::RepairId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(MrpProductionTags::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MrpProductionTags::ProductionId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MrpProductionTags::TagId)
                                .integer()
                                .not_null(),
                        )
                        .primary_key(
                            Index::create()
                                .col(MrpProductionTags::ProductionId)
                                .col(MrpProductionTags::TagId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_mrp_production_tags_production")
                                .from(MrpProductionTags::Table, MrpProductionTags::ProductionId)
                                .to(MrpProductions::Table, MrpProductions::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_mrp_production_tags_tag")
                                .from(MrpProductionTags::Table, MrpProductionTags::TagId)
                                .to(MrpTags::Table, MrpTags::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(MrpProductionTags::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(MrpProductions::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum MrpProductions {
        Table,
        Id,
        Name,
        ProductId,
        BomId,
        ProductQty,
        State,
        RepairId,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum MrpProductionTags {
        Table,
        ProductionId,
        TagId,
    }
}

mod m20250301_000005_create_quality_triggers {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000005_create_quality_triggers"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(StockPickingTypes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StockPickingTypes::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(StockPickingTypes::Name).string().not_null())
                        .col(ColumnDef::new(StockPickingTypes::Code).string().not_null())
                        .col(
                            ColumnDef::new(StockPickingTypes::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(StockPickingTypes::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockPickingTypes::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(QcTriggers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(QcTriggers::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(QcTriggers::Name).string().not_null())
                        .col(
                            ColumnDef::new(QcTriggers::PickingTypeId)
                                .integer()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(QcTriggers::PartnerSelectable)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(QcTriggers::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(QcTriggers::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(QcTriggers::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_qc_triggers_picking_type")
                                .from(QcTriggers::Table, QcTriggers::PickingTypeId)
                                .to(StockPickingTypes::Table, StockPickingTypes::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(QcTriggers::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(StockPickingTypes::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum StockPickingTypes {
        Table,
        Id,
        Name,
        Code,
        Active,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum QcTriggers {
        Table,
        Id,
        Name,
        PickingTypeId,
        PartnerSelectable,
        Active,
        CreatedAt,
        UpdatedAt,
    }
}
