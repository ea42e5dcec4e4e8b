mod catalog;
mod customers;
mod loyalty;
mod orders;
mod place_order;
mod purchase_orders;
mod returns;
mod users;

pub use catalog::CatalogOperation;
pub use customers::{ContactUpdate, CustomerOperation, NewCustomer};
pub use loyalty::LoyaltyOperation;
pub use orders::{OrderDetails, OrderQuery};
pub use place_order::{
    LineRequest, OrderDraft, PlaceOrderOperation, PlacedOrder, PlacementPhase, PlacementTrace,
};
pub use purchase_orders::{PurchaseLineRequest, PurchaseOrderOperation};
pub use returns::{ReturnOperation, ReturnRequest};
pub use users::{MIN_PASSWORD_LEN, UserOperation};
