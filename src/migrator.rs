use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_lookup_tables::Migration),
            Box::new(m20240101_000002_create_rooms_table::Migration),
            Box::new(m20240101_000003_create_inventory_table::Migration),
            Box::new(m20240101_000004_create_guests_table::Migration),
            Box::new(m20240101_000005_create_transaction_tables::Migration),
        ]
    }
}

#[derive(DeriveIden)]
enum RoomType {
    Table,
    RoomTypeId,
    TypeName,
    BaseRate,
    Capacity,
}

#[derive(DeriveIden)]
enum RoomStatus {
    Table,
    StatusId,
    StatusName,
}

#[derive(DeriveIden)]
enum InventoryCategory {
    Table,
    CategoryId,
    CategoryName,
}

#[derive(DeriveIden)]
enum InventoryType {
    Table,
    InvTypeId,
    TypeName,
}

#[derive(DeriveIden)]
enum InventoryStatus {
    Table,
    InvstatId,
    InvstatName,
}

#[derive(DeriveIden)]
enum Gender {
    Table,
    GenderId,
    GenderName,
}

#[derive(DeriveIden)]
enum Rooms {
    Table,
    RoomId,
    RoomNumber,
    RoomTypeId,
    StatusId,
}

#[derive(DeriveIden)]
enum Inventory {
    Table,
    InvId,
    Name,
    CategoryId,
    InvTypeId,
    Quantity,
    InvstatId,
}

#[derive(DeriveIden)]
enum Guests {
    Table,
    GuestId,
    Name,
    Contact,
    GenderId,
    Dob,
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    TransId,
    GuestId,
    RoomId,
    Checkin,
    Checkout,
    Amount,
    DateCreated,
}

#[derive(DeriveIden)]
enum SalesDetails {
    Table,
    SaleId,
    TransId,
    InvId,
    Quantity,
    UnitCost,
}

/// Inserts fixed lookup rows. Rows are written in one statement.
async fn seed<T, C>(
    manager: &SchemaManager<'_>,
    table: T,
    columns: C,
    rows: Vec<Vec<SimpleExpr>>,
) -> Result<(), DbErr>
where
    T: IntoTableRef,
    C: IntoIterator,
    C::Item: IntoIden,
{
    let mut insert = Query::insert();
    insert.into_table(table).columns(columns);
    for row in rows {
        insert
            .values(row)
            .map_err(|e| DbErr::Migration(format!("invalid seed row: {e}")))?;
    }
    manager.exec_stmt(insert).await
}

fn restrict(fk: &mut ForeignKeyCreateStatement) -> &mut ForeignKeyCreateStatement {
    fk.on_delete(ForeignKeyAction::Restrict)
        .on_update(ForeignKeyAction::Cascade)
}

mod m20240101_000001_create_lookup_tables {
    use super::*;
    use rust_decimal::Decimal;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_lookup_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(RoomType::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RoomType::RoomTypeId)
                                .integer()
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(RoomType::TypeName)
                                .string_len(64)
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(RoomType::BaseRate)
                                .decimal_len(10, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(RoomType::Capacity)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(RoomStatus::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RoomStatus::StatusId)
                                .integer()
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(RoomStatus::StatusName)
                                .string_len(64)
                                .not_null()
                                .unique_key(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(InventoryCategory::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryCategory::CategoryId)
                                .integer()
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(InventoryCategory::CategoryName)
                                .string_len(64)
                                .not_null()
                                .unique_key(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(InventoryType::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryType::InvTypeId)
                                .integer()
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(InventoryType::TypeName)
                                .string_len(64)
                                .not_null()
                                .unique_key(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(InventoryStatus::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryStatus::InvstatId)
                                .integer()
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(InventoryStatus::InvstatName)
                                .string_len(64)
                                .not_null()
                                .unique_key(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Gender::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Gender::GenderId)
                                .integer()
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Gender::GenderName)
                                .string_len(32)
                                .not_null()
                                .unique_key(),
                        )
                        .to_owned(),
                )
                .await?;

            seed(
                manager,
                RoomType::Table,
                [
                    RoomType::RoomTypeId,
                    RoomType::TypeName,
                    RoomType::BaseRate,
                    RoomType::Capacity,
                ],
                vec![
                    vec![1.into(), "Standard".into(), Decimal::new(150000, 2).into(), 2.into()],
                    vec![2.into(), "Deluxe".into(), Decimal::new(250000, 2).into(), 3.into()],
                    vec![3.into(), "Suite".into(), Decimal::new(400000, 2).into(), 4.into()],
                ],
            )
            .await?;

            seed(
                manager,
                RoomStatus::Table,
                [RoomStatus::StatusId, RoomStatus::StatusName],
                ["Available", "Occupied", "Reserved", "Maintenance"]
                    .iter()
                    .zip(1..)
                    .map(|(name, id)| vec![id.into(), (*name).into()])
                    .collect(),
            )
            .await?;

            seed(
                manager,
                InventoryCategory::Table,
                [
                    InventoryCategory::CategoryId,
                    InventoryCategory::CategoryName,
                ],
                ["Toiletries", "Linens", "Food & Beverage", "Cleaning Supplies"]
                    .iter()
                    .zip(1..)
                    .map(|(name, id)| vec![id.into(), (*name).into()])
                    .collect(),
            )
            .await?;

            seed(
                manager,
                InventoryType::Table,
                [InventoryType::InvTypeId, InventoryType::TypeName],
                ["Consumable", "Reusable"]
                    .iter()
                    .zip(1..)
                    .map(|(name, id)| vec![id.into(), (*name).into()])
                    .collect(),
            )
            .await?;

            // Names must match StockStatus::as_str
            seed(
                manager,
                InventoryStatus::Table,
                [InventoryStatus::InvstatId, InventoryStatus::InvstatName],
                ["Available", "Low Stock", "Out of Stock"]
                    .iter()
                    .zip(1..)
                    .map(|(name, id)| vec![id.into(), (*name).into()])
                    .collect(),
            )
            .await?;

            seed(
                manager,
                Gender::Table,
                [Gender::GenderId, Gender::GenderName],
                ["Male", "Female", "Other"]
                    .iter()
                    .zip(1..)
                    .map(|(name, id)| vec![id.into(), (*name).into()])
                    .collect(),
            )
            .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Gender::Table).if_exists().to_owned())
                .await?;
            manager
                .drop_table(
                    Table::drop()
                        .table(InventoryStatus::Table)
                        .if_exists()
                        .to_owned(),
                )
                .await?;
            manager
                .drop_table(
                    Table::drop()
                        .table(InventoryType::Table)
                        .if_exists()
                        .to_owned(),
                )
                .await?;
            manager
                .drop_table(
                    Table::drop()
                        .table(InventoryCategory::Table)
                        .if_exists()
                        .to_owned(),
                )
                .await?;
            manager
                .drop_table(Table::drop().table(RoomStatus::Table).if_exists().to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(RoomType::Table).if_exists().to_owned())
                .await
        }
    }
}

mod m20240101_000002_create_rooms_table {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_rooms_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Rooms::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Rooms::RoomId)
                                .integer()
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Rooms::RoomNumber)
                                .string_len(32)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Rooms::RoomTypeId).integer().not_null())
                        .col(ColumnDef::new(Rooms::StatusId).integer().not_null())
                        .foreign_key(restrict(
                            ForeignKey::create()
                                .name("fk_rooms_room_type")
                                .from(Rooms::Table, Rooms::RoomTypeId)
                                .to(RoomType::Table, RoomType::RoomTypeId),
                        ))
                        .foreign_key(restrict(
                            ForeignKey::create()
                                .name("fk_rooms_room_status")
                                .from(Rooms::Table, Rooms::StatusId)
                                .to(RoomStatus::Table, RoomStatus::StatusId),
                        ))
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_rooms_status_id")
                        .table(Rooms::Table)
                        .col(Rooms::StatusId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Rooms::Table).if_exists().to_owned())
                .await
        }
    }
}

mod m20240101_000003_create_inventory_table {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_inventory_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Inventory::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Inventory::InvId)
                                .integer()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Inventory::Name).string_len(128).not_null())
                        .col(ColumnDef::new(Inventory::CategoryId).integer().not_null())
                        .col(ColumnDef::new(Inventory::InvTypeId).integer().not_null())
                        .col(
                            ColumnDef::new(Inventory::Quantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Inventory::InvstatId).integer().not_null())
                        .foreign_key(restrict(
                            ForeignKey::create()
                                .name("fk_inventory_category")
                                .from(Inventory::Table, Inventory::CategoryId)
                                .to(InventoryCategory::Table, InventoryCategory::CategoryId),
                        ))
                        .foreign_key(restrict(
                            ForeignKey::create()
                                .name("fk_inventory_type")
                                .from(Inventory::Table, Inventory::InvTypeId)
                                .to(InventoryType::Table, InventoryType::InvTypeId),
                        ))
                        .foreign_key(restrict(
                            ForeignKey::create()
                                .name("fk_inventory_status")
                                .from(Inventory::Table, Inventory::InvstatId)
                                .to(InventoryStatus::Table, InventoryStatus::InvstatId),
                        ))
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_inventory_quantity")
                        .table(Inventory::Table)
                        .col(Inventory::Quantity)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Inventory::Table).if_exists().to_owned())
                .await
        }
    }
}

mod m20240101_000004_create_guests_table {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_guests_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Guests::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Guests::GuestId)
                                .integer()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Guests::Name).string_len(128).not_null())
                        .col(ColumnDef::new(Guests::Contact).string_len(64).not_null())
                        .col(ColumnDef::new(Guests::GenderId).integer().not_null())
                        .col(ColumnDef::new(Guests::Dob).date().not_null())
                        .foreign_key(restrict(
                            ForeignKey::create()
                                .name("fk_guests_gender")
                                .from(Guests::Table, Guests::GenderId)
                                .to(Gender::Table, Gender::GenderId),
                        ))
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Guests::Table).if_exists().to_owned())
                .await
        }
    }
}

mod m20240101_000005_create_transaction_tables {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_transaction_tables"
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
                            ColumnDef::new(Transactions::TransId)
                                .integer()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Transactions::GuestId).integer().not_null())
                        .col(ColumnDef::new(Transactions::RoomId).integer().not_null())
                        .col(ColumnDef::new(Transactions::Checkin).date_time().not_null())
                        .col(ColumnDef::new(Transactions::Checkout).date_time().null())
                        .col(
                            ColumnDef::new(Transactions::Amount)
                                .decimal_len(10, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Transactions::DateCreated).date().not_null())
                        .foreign_key(restrict(
                            ForeignKey::create()
                                .name("fk_transactions_guest")
                                .from(Transactions::Table, Transactions::GuestId)
                                .to(Guests::Table, Guests::GuestId),
                        ))
                        .foreign_key(restrict(
                            ForeignKey::create()
                                .name("fk_transactions_room")
                                .from(Transactions::Table, Transactions::RoomId)
                                .to(Rooms::Table, Rooms::RoomId),
                        ))
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(SalesDetails::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SalesDetails::SaleId)
                                .integer()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(SalesDetails::TransId).integer().not_null())
                        .col(ColumnDef::new(SalesDetails::InvId).integer().not_null())
                        .col(ColumnDef::new(SalesDetails::Quantity).integer().not_null())
                        .col(
                            ColumnDef::new(SalesDetails::UnitCost)
                                .decimal_len(10, 2)
                                .not_null()
                                .default(0),
                        )
                        .foreign_key(restrict(
                            ForeignKey::create()
                                .name("fk_sales_details_transaction")
                                .from(SalesDetails::Table, SalesDetails::TransId)
                                .to(Transactions::Table, Transactions::TransId),
                        ))
                        .foreign_key(restrict(
                            ForeignKey::create()
                                .name("fk_sales_details_inventory")
                                .from(SalesDetails::Table, SalesDetails::InvId)
                                .to(Inventory::Table, Inventory::InvId),
                        ))
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_transactions_checkin")
                        .table(Transactions::Table)
                        .col(Transactions::Checkin)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(
                    Table::drop()
                        .table(SalesDetails::Table)
                        .if_exists()
                        .to_owned(),
                )
                .await?;
            manager
                .drop_table(
                    Table::drop()
                        .table(Transactions::Table)
                        .if_exists()
                        .to_owned(),
                )
                .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{Database, EntityTrait, PaginatorTrait};

    #[tokio::test]
    async fn fresh_schema_has_seeded_lookups() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let statuses = crate::entities::inventory_status::Entity::find()
            .all(&db)
            .await
            .unwrap();
        let names: Vec<_> = statuses.iter().map(|s| s.invstat_name.as_str()).collect();
        assert_eq!(names, vec!["Available", "Low Stock", "Out of Stock"]);

        let room_statuses = crate::entities::room_status::Entity::find()
            .count(&db)
            .await
            .unwrap();
        assert_eq!(room_statuses, 4);
    }

    #[tokio::test]
    async fn down_then_up_is_repeatable() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        Migrator::down(&db, None).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let genders = crate::entities::gender::Entity::find()
            .count(&db)
            .await
            .unwrap();
        assert_eq!(genders, 3);
    }
}
