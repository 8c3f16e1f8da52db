use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    errors::ErrorResponse,
    handlers::{
        common::{DeletedResponse, UpdatedResponse},
        dashboard, guests, health, inventory, rooms, transactions,
    },
    services,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hotel Operations API",
        version = "0.1.0",
        description = r#"
# Hotel Operations API

Back office for a small hotel: rooms, guests, stays, the supplies
inventory and the dashboard that summarises them.

## Inventory status

An item's status is derived from its quantity on every write. With the
default threshold of 100: `0` is **Out of Stock**, `1..99` is
**Low Stock**, `100` and above is **Available**. A status sent by the
client is ignored.

## Errors

Failures share one envelope:

```json
{
  "error": "Conflict",
  "message": "Room number already exists",
  "request_id": "3f0c9a5e-7d1e-4a8b-b5f2-0d8b1c2e4f6a",
  "timestamp": "2025-01-25T10:30:00+00:00"
}
```

Every response carries an `x-request-id` header.
"#
    ),
    paths(
        rooms::room_lookups,
        rooms::list_rooms,
        rooms::get_room,
        rooms::create_room,
        rooms::update_room,
        rooms::delete_room,
        inventory::inventory_lookups,
        inventory::inventory_summary,
        inventory::low_stock_items,
        inventory::list_inventory,
        inventory::get_inventory_item,
        inventory::create_inventory,
        inventory::update_inventory,
        inventory::delete_inventory,
        guests::guest_lookups,
        guests::list_guests,
        guests::get_guest,
        guests::create_guest,
        guests::update_guest,
        guests::delete_guest,
        dashboard::rooms_overview,
        dashboard::dashboard_summary,
        transactions::list_transactions,
        transactions::create_transaction,
        transactions::delete_transaction,
        transactions::list_sales,
        transactions::create_sale,
        health::health,
        health::readiness,
    ),
    components(schemas(
        ErrorResponse,
        UpdatedResponse,
        DeletedResponse,
        rooms::RoomRequest,
        rooms::RoomCreated,
        services::rooms::RoomLookups,
        services::rooms::RoomTypeOption,
        services::rooms::RoomStatusOption,
        services::rooms::RoomListing,
        services::rooms::RoomRecord,
        inventory::InventoryRequest,
        inventory::InventoryCreated,
        services::inventory::StockStatus,
        services::inventory::InventoryLookups,
        services::inventory::CategoryOption,
        services::inventory::TypeOption,
        services::inventory::StatusOption,
        services::inventory::InventorySummary,
        services::inventory::LowStockItem,
        services::inventory::InventoryItemView,
        guests::GuestRequest,
        guests::GuestCreated,
        services::guests::GuestLookups,
        services::guests::GenderOption,
        services::guests::GuestView,
        services::dashboard::RoomsOverview,
        services::dashboard::StatusCount,
        services::dashboard::DashboardRoom,
        services::dashboard::DashboardSummary,
        transactions::TransactionRequest,
        transactions::TransactionCreated,
        transactions::SaleRequest,
        transactions::SaleCreated,
        services::transactions::TransactionView,
        services::transactions::SaleLine,
        health::HealthStatus,
        health::LivenessResponse,
        health::ReadinessResponse,
    )),
    tags(
        (name = "rooms", description = "Rooms and their type/status lookups"),
        (name = "inventory", description = "Supplies with quantity-derived stock status"),
        (name = "guests", description = "Guest records"),
        (name = "dashboard", description = "Aggregates for the dashboard page"),
        (name = "transactions", description = "Stays and the items sold against them"),
        (name = "health", description = "Liveness and readiness probes"),
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_resource() {
        let json = serde_json::to_string(&ApiDoc::openapi()).unwrap();
        assert!(json.contains("Hotel Operations API"));
        for path in [
            "/api/rooms/{id}",
            "/api/inventory/low-stock",
            "/api/guests/lookups",
            "/api/dashboard/rooms",
            "/api/transactions/{id}/sales",
            "/api/health/ready",
        ] {
            assert!(json.contains(path), "missing {path}");
        }
    }
}
